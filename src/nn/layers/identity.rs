use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

/// Passthrough placeholder, used where a layer has been nullified.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Identity {
    pub fn new() -> Self {
        Identity
    }
}

impl Module for Identity {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Identity
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::Identity
    }

    fn parameters(&self) -> Vec<&TensorData> {
        vec![]
    }

    fn state_dict(&self) -> StateDict {
        StateDict::new()
    }
}
