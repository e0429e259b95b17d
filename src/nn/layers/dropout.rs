use crate::error::{NormSwapError, Result};
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

pub struct Dropout {
    p: f32,
}

impl Dropout {
    /// Create a new Dropout layer
    ///
    /// # Arguments
    /// * `p` - Probability of an element being zeroed out, in \[0, 1\]
    pub fn new(p: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(NormSwapError::InvalidParameter(format!(
                "Dropout probability must be in [0, 1], got {p}"
            )));
        }
        Ok(Self { p })
    }

    pub fn p(&self) -> f32 {
        self.p
    }
}

impl Module for Dropout {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Dropout
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::Dropout { p: self.p }
    }

    fn parameters(&self) -> Vec<&TensorData> {
        vec![]
    }

    fn state_dict(&self) -> StateDict {
        StateDict::new()
    }
}
