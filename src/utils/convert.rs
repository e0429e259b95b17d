//! Converters from one normalization kind to another.
//!
//! Each converter only reads `kind()` and `num_features()` of its input and
//! builds a fresh module; the input is left untouched.

use crate::error::{NormSwapError, Result};
use crate::nn::{GroupNormConfig, Identity, InstanceNorm, Module};

/// Group count used by [`batchnorm_to_groupnorm`], capped by the channel count.
///
/// 32 follows *Accurate, Large Minibatch SGD: Training ImageNet in 1 Hour*
/// (<https://arxiv.org/abs/1706.02677>).
pub const DEFAULT_NUM_GROUPS: usize = 32;

/// Instance norm of the same spatial rank and channel count.
///
/// The result uses the instance norm defaults: no affine parameters and no
/// running statistics.
pub fn batchnorm_to_instancenorm(module: &dyn Module) -> Result<Box<dyn Module>> {
    let kind = module.kind();
    let rank = kind
        .rank()
        .ok_or_else(|| NormSwapError::conversion(kind, "no spatial rank to match"))?;
    let num_features = module
        .num_features()
        .ok_or_else(|| NormSwapError::conversion(kind, "no channel count"))?;
    let norm = InstanceNorm::new(rank, num_features)
        .map_err(|err| NormSwapError::conversion(kind, err.to_string()))?;
    Ok(Box::new(norm))
}

/// Group norm with `min(32, C)` groups over `C` channels, affine disabled.
///
/// Fails when `C` is not a multiple of the group count (e.g. 48 channels).
pub fn batchnorm_to_groupnorm(module: &dyn Module) -> Result<Box<dyn Module>> {
    let kind = module.kind();
    let num_channels = module
        .num_features()
        .filter(|_| kind.is_normalization())
        .ok_or_else(|| NormSwapError::conversion(kind, "no channel count"))?;
    let num_groups = DEFAULT_NUM_GROUPS.min(num_channels);
    let norm = GroupNormConfig::new(num_groups, num_channels)
        .with_affine(false)
        .init()
        .map_err(|err| NormSwapError::conversion(kind, err.to_string()))?;
    Ok(Box::new(norm))
}

/// Ignores its input and returns an [`Identity`].
pub fn to_identity(_module: &dyn Module) -> Result<Box<dyn Module>> {
    Ok(Box::new(Identity::new()))
}
