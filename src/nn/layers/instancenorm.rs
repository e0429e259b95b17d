use serde::{Deserialize, Serialize};

use super::batchnorm::{default_epsilon, default_momentum};
use crate::error::Result;
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind, SpatialRank};

/// Configuration to create an [InstanceNorm] layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNormConfig {
    pub rank: SpatialRank,
    /// The number of channels expected in the input
    pub num_features: usize,
    /// A value required for numerical stability. Default: 1e-5
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_momentum")]
    pub momentum: f64,
    /// Learnable per-channel scale and shift. Default: `false`
    #[serde(default)]
    pub affine: bool,
    /// Keep running mean/variance buffers. Default: `false`
    #[serde(default)]
    pub track_running_stats: bool,
}

impl InstanceNormConfig {
    pub fn new(rank: SpatialRank, num_features: usize) -> Self {
        InstanceNormConfig {
            rank,
            num_features,
            epsilon: default_epsilon(),
            momentum: default_momentum(),
            affine: false,
            track_running_stats: false,
        }
    }

    pub fn with_affine(mut self, affine: bool) -> Self {
        self.affine = affine;
        self
    }

    pub fn with_track_running_stats(mut self, track: bool) -> Self {
        self.track_running_stats = track;
        self
    }

    pub fn init(&self) -> Result<InstanceNorm> {
        let n = self.num_features;
        let stats = self.track_running_stats;
        Ok(InstanceNorm {
            config: self.clone(),
            gamma: self.affine.then(|| TensorData::ones(&[n])).transpose()?,
            beta: self.affine.then(|| TensorData::zeros(&[n])).transpose()?,
            running_mean: stats.then(|| TensorData::zeros(&[n])).transpose()?,
            running_var: stats.then(|| TensorData::ones(&[n])).transpose()?,
        })
    }
}

/// Instance normalization: statistics per sample and per channel.
pub struct InstanceNorm {
    config: InstanceNormConfig,
    gamma: Option<TensorData>,
    beta: Option<TensorData>,
    running_mean: Option<TensorData>,
    running_var: Option<TensorData>,
}

impl InstanceNorm {
    /// Instance norm with the usual defaults: no affine, no running stats.
    pub fn new(rank: SpatialRank, num_features: usize) -> Result<Self> {
        InstanceNormConfig::new(rank, num_features).init()
    }

    pub fn rank(&self) -> SpatialRank {
        self.config.rank
    }
}

impl Module for InstanceNorm {
    fn kind(&self) -> ModuleKind {
        ModuleKind::InstanceNorm(self.config.rank)
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::InstanceNorm(self.config.clone())
    }

    fn parameters(&self) -> Vec<&TensorData> {
        self.gamma.iter().chain(self.beta.iter()).collect()
    }

    fn state_dict(&self) -> StateDict {
        let entries = [
            ("gamma", &self.gamma),
            ("beta", &self.beta),
            ("running_mean", &self.running_mean),
            ("running_var", &self.running_var),
        ];
        entries
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|t| (key.to_string(), t.clone())))
            .collect()
    }

    fn num_features(&self) -> Option<usize> {
        Some(self.config.num_features)
    }
}
