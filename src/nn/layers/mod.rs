pub mod batchnorm;
pub mod conv;
pub mod dropout;
pub mod flatten;
pub mod groupnorm;
pub mod identity;
pub mod instancenorm;
pub mod linear;
pub mod relu;
pub mod sequential;
pub mod sequential_builder;

pub use batchnorm::{BatchNorm, BatchNormConfig};
pub use conv::{Conv2d, Conv2dConfig};
pub use dropout::Dropout;
pub use flatten::Flatten;
pub use groupnorm::{GroupNorm, GroupNormConfig};
pub use identity::Identity;
pub use instancenorm::{InstanceNorm, InstanceNormConfig};
pub use linear::{Linear, LinearConfig};
pub use relu::ReLU;
pub use sequential::Sequential;
pub use sequential_builder::SequentialBuilder;
