use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

/// Flattens (B, D1, D2, ...) into (B, D1 * D2 * ...).
pub struct Flatten;

impl Flatten {
    pub fn new() -> Self {
        Flatten
    }
}

impl Default for Flatten {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for Flatten {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Flatten
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::Flatten
    }

    fn parameters(&self) -> Vec<&TensorData> {
        vec![]
    }

    fn state_dict(&self) -> StateDict {
        StateDict::new()
    }
}
