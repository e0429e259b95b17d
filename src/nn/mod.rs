use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{NormSwapError, Result};
use crate::io::{ModuleConfig, StateDict, TensorData};

pub mod layers;
pub mod tree;

pub use layers::{
    BatchNorm, BatchNormConfig, Conv2d, Conv2dConfig, Dropout, Flatten, GroupNorm,
    GroupNormConfig, Identity, InstanceNorm, InstanceNormConfig, Linear, LinearConfig, ReLU,
    Sequential, SequentialBuilder,
};
pub use tree::{get_submodule, get_submodule_mut, named_modules, num_params, summary};

/// Number of spatial dimensions a normalization layer expects.
///
/// `One` is sequence data `(B, C, L)`, `Two` images `(B, C, H, W)`,
/// `Three` volumes `(B, C, D, H, W)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum SpatialRank {
    One,
    Two,
    Three,
}

impl SpatialRank {
    pub fn dims(self) -> usize {
        match self {
            SpatialRank::One => 1,
            SpatialRank::Two => 2,
            SpatialRank::Three => 3,
        }
    }
}

impl TryFrom<usize> for SpatialRank {
    type Error = NormSwapError;

    fn try_from(dims: usize) -> Result<Self> {
        match dims {
            1 => Ok(SpatialRank::One),
            2 => Ok(SpatialRank::Two),
            3 => Ok(SpatialRank::Three),
            other => Err(NormSwapError::UnsupportedRank(other)),
        }
    }
}

impl From<SpatialRank> for usize {
    fn from(rank: SpatialRank) -> usize {
        rank.dims()
    }
}

/// Runtime type tag of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleKind {
    Sequential,
    Linear,
    Conv2d,
    ReLU,
    Flatten,
    Dropout,
    Identity,
    BatchNorm(SpatialRank),
    InstanceNorm(SpatialRank),
    GroupNorm,
}

impl ModuleKind {
    /// Spatial rank for the rank-specific normalization kinds.
    pub fn rank(self) -> Option<SpatialRank> {
        match self {
            ModuleKind::BatchNorm(rank) | ModuleKind::InstanceNorm(rank) => Some(rank),
            _ => None,
        }
    }

    pub fn is_normalization(self) -> bool {
        matches!(
            self,
            ModuleKind::BatchNorm(_) | ModuleKind::InstanceNorm(_) | ModuleKind::GroupNorm
        )
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Sequential => f.write_str("Sequential"),
            ModuleKind::Linear => f.write_str("Linear"),
            ModuleKind::Conv2d => f.write_str("Conv2d"),
            ModuleKind::ReLU => f.write_str("ReLU"),
            ModuleKind::Flatten => f.write_str("Flatten"),
            ModuleKind::Dropout => f.write_str("Dropout"),
            ModuleKind::Identity => f.write_str("Identity"),
            ModuleKind::BatchNorm(rank) => write!(f, "BatchNorm{}d", rank.dims()),
            ModuleKind::InstanceNorm(rank) => write!(f, "InstanceNorm{}d", rank.dims()),
            ModuleKind::GroupNorm => f.write_str("GroupNorm"),
        }
    }
}

/// Selects which modules a replacement pass applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleType {
    /// Exact kind equality, rank included.
    Exact(ModuleKind),
    /// Batch normalization of any rank.
    AnyBatchNorm,
}

impl ModuleType {
    pub fn matches(self, kind: ModuleKind) -> bool {
        match self {
            ModuleType::Exact(target) => target == kind,
            ModuleType::AnyBatchNorm => matches!(kind, ModuleKind::BatchNorm(_)),
        }
    }
}

impl From<ModuleKind> for ModuleType {
    fn from(kind: ModuleKind) -> Self {
        ModuleType::Exact(kind)
    }
}

/// A node in a module tree.
///
/// Containers own their children through named slots; leaves keep the
/// defaults for the child accessors. Names are unique within a container and
/// are reported in construction order.
pub trait Module {
    fn kind(&self) -> ModuleKind;

    /// Architecture description that rebuilds an equivalent module
    /// (parameters are freshly initialized, not copied).
    fn config(&self) -> ModuleConfig;

    /// Learnable parameters of this module and all of its descendants.
    fn parameters(&self) -> Vec<&TensorData>;

    /// Parameters and buffers keyed by dotted path relative to this module.
    fn state_dict(&self) -> StateDict;

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        Vec::new()
    }

    fn child_mut(&mut self, _name: &str) -> Option<&mut Box<dyn Module>> {
        None
    }

    /// Swap the child at `name` for `module` and hand back the previous one.
    fn replace_child(&mut self, name: &str, module: Box<dyn Module>) -> Result<Box<dyn Module>> {
        match self.child_mut(name) {
            Some(slot) => Ok(std::mem::replace(slot, module)),
            None => Err(NormSwapError::lookup(name, name)),
        }
    }

    /// Channel count for normalization layers.
    fn num_features(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_conversion() {
        assert_eq!(SpatialRank::try_from(2).ok(), Some(SpatialRank::Two));
        assert!(matches!(
            SpatialRank::try_from(4),
            Err(NormSwapError::UnsupportedRank(4))
        ));
        assert!(SpatialRank::try_from(0).is_err());
        assert_eq!(usize::from(SpatialRank::Three), 3);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ModuleKind::BatchNorm(SpatialRank::Two).to_string(), "BatchNorm2d");
        assert_eq!(
            ModuleKind::InstanceNorm(SpatialRank::One).to_string(),
            "InstanceNorm1d"
        );
        assert_eq!(ModuleKind::GroupNorm.to_string(), "GroupNorm");
    }

    #[test]
    fn test_module_type_matching() {
        let bn2 = ModuleKind::BatchNorm(SpatialRank::Two);
        let bn3 = ModuleKind::BatchNorm(SpatialRank::Three);

        assert!(ModuleType::AnyBatchNorm.matches(bn2));
        assert!(ModuleType::AnyBatchNorm.matches(bn3));
        assert!(!ModuleType::AnyBatchNorm.matches(ModuleKind::GroupNorm));
        assert!(!ModuleType::AnyBatchNorm.matches(ModuleKind::InstanceNorm(SpatialRank::Two)));

        assert!(ModuleType::from(bn2).matches(bn2));
        assert!(!ModuleType::from(bn2).matches(bn3));
    }
}
