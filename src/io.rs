use std::collections::BTreeMap;

pub mod config;

pub use crate::tensor::TensorData;
pub use config::{LayerConfig, ModuleConfig, build_from_config, load_config};

/// Parameters and buffers of a module tree, keyed by dotted path
/// (`"features.1.running_mean"`).
pub type StateDict = BTreeMap<String, TensorData>;

/// Summary of differences between two state dicts.
///
/// Handy for checking what a replacement pass changed: take `before` from the
/// original tree and `after` from the rewritten one.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StateDictDiff {
    /// Keys that exist in `expected` but are missing from `actual`.
    pub missing_keys: Vec<String>,
    /// Keys that exist in `actual` but not in `expected`.
    pub unexpected_keys: Vec<String>,
    /// Keys present in both, but with differing shapes:
    /// `(key, expected_shape, actual_shape)`.
    pub shape_mismatches: Vec<(String, Vec<usize>, Vec<usize>)>,
}

impl StateDictDiff {
    /// Returns true if there are no missing, unexpected, or shape-mismatched keys.
    pub fn is_empty(&self) -> bool {
        self.missing_keys.is_empty()
            && self.unexpected_keys.is_empty()
            && self.shape_mismatches.is_empty()
    }
}

/// Compute a diff between an "expected" and an "actual" state dict.
///
/// Purely informational, nothing is mutated.
pub fn diff_state_dict(expected: &StateDict, actual: &StateDict) -> StateDictDiff {
    let mut diff = StateDictDiff::default();

    for (key, expected_td) in expected {
        match actual.get(key) {
            None => diff.missing_keys.push(key.clone()),
            Some(actual_td) => {
                if expected_td.shape != actual_td.shape {
                    diff.shape_mismatches.push((
                        key.clone(),
                        expected_td.shape.clone(),
                        actual_td.shape.clone(),
                    ));
                }
            }
        }
    }

    for key in actual.keys() {
        if !expected.contains_key(key) {
            diff.unexpected_keys.push(key.clone());
        }
    }

    diff
}
