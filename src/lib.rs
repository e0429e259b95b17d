//! Swap normalization layers inside an already-built module tree.
//!
//! Training with per-sample gradients rules out batch normalization, since
//! its statistics mix samples. The helpers in [`utils`] walk a tree of
//! [`Module`]s and replace every batch norm with a group norm, an instance
//! norm or an identity, keeping the rest of the tree as is.
//!
//! ```
//! use normswap::nn::{BatchNorm, Conv2d, Module, ModuleKind, ReLU, Sequential, SpatialRank};
//! use normswap::utils::replace_batchnorm;
//!
//! let model = Sequential::builder()
//!     .add_named("conv", Box::new(Conv2d::new(3, 64, 3, 1, 1, false)?))
//!     .add_named("bn", Box::new(BatchNorm::new(SpatialRank::Two, 64)?))
//!     .add_unnamed(Box::new(ReLU))
//!     .build()?;
//!
//! let model = replace_batchnorm(Box::new(model))?;
//! let bn = normswap::nn::get_submodule(&*model, "bn")?;
//! assert_eq!(bn.kind(), ModuleKind::GroupNorm);
//! # Ok::<(), normswap::NormSwapError>(())
//! ```

pub mod error;
pub mod io;
pub mod nn;
pub mod tensor;
pub mod utils;

pub use error::{NormSwapError, Result};
pub use io::{ModuleConfig, StateDict, TensorData};
pub use nn::{
    BatchNorm, Conv2d, Dropout, Flatten, GroupNorm, Identity, InstanceNorm, Linear, Module,
    ModuleKind, ModuleType, ReLU, Sequential, SequentialBuilder, SpatialRank,
};
pub use utils::{
    batchnorm_to_groupnorm, batchnorm_to_instancenorm, nullify_batchnorm_modules,
    nullify_modules, replace_all_modules, replace_all_modules_in_place, replace_batchnorm,
};
