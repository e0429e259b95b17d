use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind, SpatialRank};

/// Configuration to create a [BatchNorm] layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchNormConfig {
    pub rank: SpatialRank,
    pub num_features: usize,
    /// Added to the variance for numerical stability. Default: 1e-5
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Running statistics update factor. Default: 0.1
    #[serde(default = "default_momentum")]
    pub momentum: f64,
}

pub(crate) fn default_epsilon() -> f64 {
    1e-5
}

pub(crate) fn default_momentum() -> f64 {
    0.1
}

impl BatchNormConfig {
    pub fn new(rank: SpatialRank, num_features: usize) -> Self {
        BatchNormConfig {
            rank,
            num_features,
            epsilon: default_epsilon(),
            momentum: default_momentum(),
        }
    }

    pub fn init(&self) -> Result<BatchNorm> {
        BatchNorm::new_with_params(self.rank, self.num_features, self.epsilon, self.momentum)
    }
}

/// Batch normalization over `num_features` channels.
///
/// Statistics are shared across the samples of a batch, which is exactly what
/// per-sample gradient training cannot allow; see the replacement helpers in
/// [`crate::utils`].
pub struct BatchNorm {
    rank: SpatialRank,
    num_features: usize,
    eps: f64,
    momentum: f64,
    // Parameters (Learnable)
    gamma: TensorData,
    beta: TensorData,
    // Buffers (Non-learnable)
    running_mean: TensorData,
    running_var: TensorData,
}

impl BatchNorm {
    pub fn new(rank: SpatialRank, num_features: usize) -> Result<Self> {
        Self::new_with_params(rank, num_features, default_epsilon(), default_momentum())
    }

    pub fn new_with_params(
        rank: SpatialRank,
        num_features: usize,
        eps: f64,
        momentum: f64,
    ) -> Result<Self> {
        Ok(BatchNorm {
            rank,
            num_features,
            eps,
            momentum,
            gamma: TensorData::ones(&[num_features])?,
            beta: TensorData::zeros(&[num_features])?,
            running_mean: TensorData::zeros(&[num_features])?,
            running_var: TensorData::ones(&[num_features])?,
        })
    }

    pub fn rank(&self) -> SpatialRank {
        self.rank
    }
}

impl Module for BatchNorm {
    fn kind(&self) -> ModuleKind {
        ModuleKind::BatchNorm(self.rank)
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::BatchNorm(BatchNormConfig {
            rank: self.rank,
            num_features: self.num_features,
            epsilon: self.eps,
            momentum: self.momentum,
        })
    }

    fn parameters(&self) -> Vec<&TensorData> {
        vec![&self.gamma, &self.beta]
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        state.insert("gamma".to_string(), self.gamma.clone());
        state.insert("beta".to_string(), self.beta.clone());
        state.insert("running_mean".to_string(), self.running_mean.clone());
        state.insert("running_var".to_string(), self.running_var.clone());
        state
    }

    fn num_features(&self) -> Option<usize> {
        Some(self.num_features)
    }
}
