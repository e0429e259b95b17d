use serde::{Deserialize, Serialize};

use super::batchnorm::default_epsilon;
use crate::error::{NormSwapError, Result};
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

/// Configuration to create a [GroupNorm] layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNormConfig {
    /// The number of groups to separate the channels into
    pub num_groups: usize,
    /// The number of channels expected in the input
    pub num_channels: usize,
    /// A value required for numerical stability. Default: 1e-5
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// When `true`, the layer has learnable per-channel affine parameters
    /// initialized to ones (weights) and zeros (biases). Default: `true`
    #[serde(default = "default_affine")]
    pub affine: bool,
}

fn default_affine() -> bool {
    true
}

impl GroupNormConfig {
    pub fn new(num_groups: usize, num_channels: usize) -> Self {
        GroupNormConfig {
            num_groups,
            num_channels,
            epsilon: default_epsilon(),
            affine: default_affine(),
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_affine(mut self, affine: bool) -> Self {
        self.affine = affine;
        self
    }

    /// Initialize a new [group norm](GroupNorm) module.
    ///
    /// Fails unless `num_groups` is positive and divides `num_channels`.
    pub fn init(&self) -> Result<GroupNorm> {
        if self.num_groups == 0 {
            return Err(NormSwapError::InvalidParameter(
                "GroupNorm needs at least one group".to_string(),
            ));
        }
        if self.num_channels % self.num_groups != 0 {
            return Err(NormSwapError::InvalidParameter(format!(
                "num_channels ({}) must be divisible by num_groups ({})",
                self.num_channels, self.num_groups
            )));
        }

        let (gamma, beta) = if self.affine {
            (
                Some(TensorData::ones(&[self.num_channels])?),
                Some(TensorData::zeros(&[self.num_channels])?),
            )
        } else {
            (None, None)
        };

        Ok(GroupNorm {
            num_groups: self.num_groups,
            num_channels: self.num_channels,
            epsilon: self.epsilon,
            gamma,
            beta,
        })
    }
}

/// Group normalization: statistics per sample over groups of channels.
#[derive(Debug)]
pub struct GroupNorm {
    num_groups: usize,
    num_channels: usize,
    epsilon: f64,
    gamma: Option<TensorData>,
    beta: Option<TensorData>,
}

impl GroupNorm {
    /// Affine group norm with default epsilon.
    pub fn new(num_groups: usize, num_channels: usize) -> Result<Self> {
        GroupNormConfig::new(num_groups, num_channels).init()
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
    }

    pub fn affine(&self) -> bool {
        self.gamma.is_some()
    }
}

impl Module for GroupNorm {
    fn kind(&self) -> ModuleKind {
        ModuleKind::GroupNorm
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::GroupNorm(GroupNormConfig {
            num_groups: self.num_groups,
            num_channels: self.num_channels,
            epsilon: self.epsilon,
            affine: self.affine(),
        })
    }

    fn parameters(&self) -> Vec<&TensorData> {
        self.gamma.iter().chain(self.beta.iter()).collect()
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        if let Some(ref gamma) = self.gamma {
            state.insert("gamma".to_string(), gamma.clone());
        }
        if let Some(ref beta) = self.beta {
            state.insert("beta".to_string(), beta.clone());
        }
        state
    }

    fn num_features(&self) -> Option<usize> {
        Some(self.num_channels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groupnorm_divisibility() {
        assert!(GroupNorm::new(4, 16).is_ok());
        assert!(matches!(
            GroupNorm::new(32, 48),
            Err(NormSwapError::InvalidParameter(_))
        ));
        assert!(GroupNorm::new(0, 0).is_err());
    }

    #[test]
    fn test_groupnorm_without_affine_has_no_params() {
        let gn = GroupNormConfig::new(2, 8).with_affine(false).init().unwrap();
        assert!(!gn.affine());
        assert!(gn.parameters().is_empty());
        assert!(gn.state_dict().is_empty());
    }

    #[test]
    fn test_groupnorm_affine_params() {
        let gn = GroupNorm::new(2, 8).unwrap();
        assert_eq!(gn.parameters().len(), 2);
        assert_eq!(gn.num_groups(), 2);
        assert_eq!(gn.num_features(), Some(8));
    }
}
