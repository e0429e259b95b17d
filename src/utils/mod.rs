pub mod convert;
pub mod replace;

pub use convert::{
    DEFAULT_NUM_GROUPS, batchnorm_to_groupnorm, batchnorm_to_instancenorm, to_identity,
};
pub use replace::{
    Replacement, nullify_batchnorm_modules, nullify_modules, replace_all_modules,
    replace_all_modules_in_place, replace_batchnorm, replace_batchnorm_with_instancenorm,
    replace_submodule, restore,
};
