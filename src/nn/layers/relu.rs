use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

pub struct ReLU;

impl Module for ReLU {
    fn kind(&self) -> ModuleKind {
        ModuleKind::ReLU
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::ReLU
    }

    fn parameters(&self) -> Vec<&TensorData> {
        vec![] // No learnable params
    }

    fn state_dict(&self) -> StateDict {
        StateDict::new()
    }
}
