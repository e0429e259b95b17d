//! Serializable architecture descriptions.
//!
//! A [`ModuleConfig`] describes a module tree without its weights. It can be
//! read from JSON, built into modules, and produced back from any module via
//! [`Module::config`], which makes it the by-value view used to compare trees.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nn::{
    BatchNormConfig, Conv2dConfig, Dropout, Flatten, GroupNormConfig, Identity,
    InstanceNormConfig, LinearConfig, Module, ReLU, Sequential,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModuleConfig {
    Sequential { layers: Vec<LayerConfig> },
    Linear(LinearConfig),
    Conv2d(Conv2dConfig),
    ReLU,
    Flatten,
    Dropout { p: f32 },
    Identity,
    BatchNorm(BatchNormConfig),
    InstanceNorm(InstanceNormConfig),
    GroupNorm(GroupNormConfig),
}

/// One child of a `Sequential`, optionally named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub module: ModuleConfig,
}

impl ModuleConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the described module tree with freshly initialized parameters.
    pub fn init(&self) -> Result<Box<dyn Module>> {
        let module: Box<dyn Module> = match self {
            ModuleConfig::Sequential { layers } => {
                let mut builder = Sequential::builder();
                for layer in layers {
                    let child = layer.module.init()?;
                    builder = match &layer.name {
                        Some(name) => builder.add_named(name.clone(), child),
                        None => builder.add_unnamed(child),
                    };
                }
                Box::new(builder.build()?)
            }
            ModuleConfig::Linear(config) => Box::new(config.init()?),
            ModuleConfig::Conv2d(config) => Box::new(config.init()?),
            ModuleConfig::ReLU => Box::new(ReLU),
            ModuleConfig::Flatten => Box::new(Flatten::new()),
            ModuleConfig::Dropout { p } => Box::new(Dropout::new(*p)?),
            ModuleConfig::Identity => Box::new(Identity::new()),
            ModuleConfig::BatchNorm(config) => Box::new(config.init()?),
            ModuleConfig::InstanceNorm(config) => Box::new(config.init()?),
            ModuleConfig::GroupNorm(config) => Box::new(config.init()?),
        };
        Ok(module)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ModuleConfig> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let config = ModuleConfig::from_json(&text)?;
    log::debug!("loaded module config from {}", path.display());
    Ok(config)
}

pub fn build_from_config(config: &ModuleConfig) -> Result<Box<dyn Module>> {
    let module = config.init()?;
    log::debug!("built {} from config", module.kind());
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NormSwapError;
    use crate::nn::{ModuleKind, SpatialRank, get_submodule};

    const RESNET_STEM: &str = r#"{
        "type": "Sequential",
        "layers": [
            { "name": "conv", "module": { "type": "Conv2d", "in_channels": 3, "out_channels": 64, "kernel_size": 7, "stride": 2, "padding": 3 } },
            { "name": "bn", "module": { "type": "BatchNorm", "rank": 2, "num_features": 64 } },
            { "module": { "type": "ReLU" } }
        ]
    }"#;

    #[test]
    fn test_parse_and_build() {
        let config = ModuleConfig::from_json(RESNET_STEM).unwrap();
        let model = build_from_config(&config).unwrap();

        assert_eq!(model.kind(), ModuleKind::Sequential);
        let bn = get_submodule(&*model, "bn").unwrap();
        assert_eq!(bn.kind(), ModuleKind::BatchNorm(SpatialRank::Two));
        assert_eq!(bn.num_features(), Some(64));
        assert_eq!(get_submodule(&*model, "2").unwrap().kind(), ModuleKind::ReLU);

        // defaults filled in, rebuilt tree describes itself identically
        assert_eq!(model.config(), config);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = ModuleConfig::from_json(RESNET_STEM).unwrap();
        let json = config.to_json().unwrap();
        assert_eq!(ModuleConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rank_out_of_range_is_rejected() {
        let json = r#"{ "type": "BatchNorm", "rank": 4, "num_features": 8 }"#;
        assert!(matches!(
            ModuleConfig::from_json(json),
            Err(NormSwapError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_groupnorm_fails_to_build() {
        let json = r#"{ "type": "GroupNorm", "num_groups": 32, "num_channels": 48 }"#;
        let config = ModuleConfig::from_json(json).unwrap();
        assert!(matches!(
            build_from_config(&config),
            Err(NormSwapError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_oversized_layers_fail_to_build() {
        let linear = r#"{ "type": "Linear", "in_features": 4294967296, "out_features": 4294967296 }"#;
        let config = ModuleConfig::from_json(linear).unwrap();
        assert!(matches!(
            build_from_config(&config),
            Err(NormSwapError::InvalidParameter(_))
        ));

        let conv = r#"{ "type": "Conv2d", "in_channels": 65536, "out_channels": 65536, "kernel_size": 65536 }"#;
        let config = ModuleConfig::from_json(conv).unwrap();
        assert!(matches!(
            build_from_config(&config),
            Err(NormSwapError::InvalidParameter(_))
        ));

        let bn = r#"{ "type": "BatchNorm", "rank": 2, "num_features": 9223372036854775807 }"#;
        let config = ModuleConfig::from_json(bn).unwrap();
        assert!(matches!(
            build_from_config(&config),
            Err(NormSwapError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join("normswap_test_stem.json");
        std::fs::write(&path, RESNET_STEM).unwrap();
        let config = load_config(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(config, Ok(ModuleConfig::Sequential { .. })));
    }
}
