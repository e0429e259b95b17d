use normswap::io::{ModuleConfig, build_from_config, diff_state_dict};
use normswap::nn::{Module, ModuleKind, SpatialRank, get_submodule, summary};
use normswap::utils::replace_batchnorm;

const VGG_BLOCK: &str = r#"{
    "type": "Sequential",
    "layers": [
        { "name": "conv", "module": { "type": "Conv2d", "in_channels": 3, "out_channels": 32, "kernel_size": 3, "padding": 1 } },
        { "name": "bn", "module": { "type": "BatchNorm", "rank": 2, "num_features": 32 } },
        { "module": { "type": "ReLU" } },
        { "name": "classifier", "module": {
            "type": "Sequential",
            "layers": [
                { "module": { "type": "Flatten" } },
                { "module": { "type": "Dropout", "p": 0.5 } },
                { "name": "fc", "module": { "type": "Linear", "in_features": 32, "out_features": 10 } },
                { "name": "bn", "module": { "type": "BatchNorm", "rank": 1, "num_features": 10, "epsilon": 0.001 } }
            ]
        } }
    ]
}"#;

#[test]
fn test_config_build_replace_describe() {
    let config = ModuleConfig::from_json(VGG_BLOCK).unwrap();
    let model = build_from_config(&config).unwrap();
    let model = replace_batchnorm(model).unwrap();

    assert_eq!(
        get_submodule(&*model, "classifier.bn").unwrap().kind(),
        ModuleKind::GroupNorm
    );
    assert_eq!(
        get_submodule(&*model, "classifier.1").unwrap().kind(),
        ModuleKind::Dropout
    );

    // the rewritten architecture serializes and rebuilds to the same shape
    let json = model.config().to_json().unwrap();
    assert!(json.contains("\"GroupNorm\""));
    assert!(!json.contains("\"BatchNorm\""));
    let rebuilt = build_from_config(&ModuleConfig::from_json(&json).unwrap()).unwrap();
    assert_eq!(rebuilt.config(), model.config());
}

#[test]
fn test_summary_lists_every_module() {
    let model = build_from_config(&ModuleConfig::from_json(VGG_BLOCK).unwrap()).unwrap();
    let text = summary(&*model);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 9);
    assert_eq!(lines[0], "(root): Sequential");
    assert!(lines.contains(&"bn: BatchNorm2d(32)"));
    assert!(lines.contains(&"classifier.bn: BatchNorm1d(10)"));
    assert!(lines.contains(&"2: ReLU"));
}

#[test]
fn test_state_dict_after_replacement() {
    let model = build_from_config(&ModuleConfig::from_json(VGG_BLOCK).unwrap()).unwrap();
    let before = model.state_dict();
    let model = replace_batchnorm(model).unwrap();
    let after = model.state_dict();

    assert!(after.contains_key("conv.weight"));
    assert!(after.contains_key("classifier.fc.bias"));
    assert!(!after.keys().any(|k| k.starts_with("bn.")));

    // only batch norm entries go away, the group norms bring none
    let diff = diff_state_dict(&before, &after);
    assert!(diff.unexpected_keys.is_empty());
    assert!(diff.shape_mismatches.is_empty());
    assert_eq!(diff.missing_keys.len(), 8);
    assert!(
        diff.missing_keys
            .iter()
            .all(|k| k.starts_with("bn.") || k.starts_with("classifier.bn."))
    );
}

#[test]
fn test_rank_is_carried_through_config() {
    let model = build_from_config(&ModuleConfig::from_json(VGG_BLOCK).unwrap()).unwrap();
    assert_eq!(
        get_submodule(&*model, "classifier.bn").unwrap().kind().rank(),
        Some(SpatialRank::One)
    );
}
