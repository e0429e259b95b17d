use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

/// Configuration to create a [Linear] layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConfig {
    pub in_features: usize,
    pub out_features: usize,
    #[serde(default = "default_bias")]
    pub bias: bool,
}

fn default_bias() -> bool {
    true
}

impl LinearConfig {
    pub fn init(&self) -> Result<Linear> {
        Linear::new(self.in_features, self.out_features, self.bias)
    }
}

/// Fully-connected (dense/linear) layer
///
/// Holds W as (in_features, out_features) and b as (out_features).
pub struct Linear {
    weight: TensorData,
    bias: Option<TensorData>,
}

impl Linear {
    /// Create a new linear layer with zeroed weight and bias.
    pub fn new(in_features: usize, out_features: usize, use_bias: bool) -> Result<Self> {
        let weight = TensorData::zeros(&[in_features, out_features])?;
        let bias = if use_bias {
            Some(TensorData::zeros(&[out_features])?)
        } else {
            None
        };
        Ok(Linear { weight, bias })
    }

    pub fn in_features(&self) -> usize {
        self.weight.shape.first().copied().unwrap_or(0)
    }

    pub fn out_features(&self) -> usize {
        self.weight.shape.get(1).copied().unwrap_or(0)
    }
}

impl Module for Linear {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Linear
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::Linear(LinearConfig {
            in_features: self.in_features(),
            out_features: self.out_features(),
            bias: self.bias.is_some(),
        })
    }

    fn parameters(&self) -> Vec<&TensorData> {
        let mut params = vec![&self.weight];
        if let Some(ref bias) = self.bias {
            params.push(bias);
        }
        params
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        state.insert("weight".to_string(), self.weight.clone());
        if let Some(ref bias) = self.bias {
            state.insert("bias".to_string(), bias.clone());
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_shapes() {
        let layer = Linear::new(3, 5, true).unwrap();
        assert_eq!(layer.state_dict()["weight"].shape, vec![3, 5]);
        assert_eq!(layer.parameters().len(), 2);
        assert_eq!(layer.in_features(), 3);
        assert_eq!(layer.out_features(), 5);
    }

    #[test]
    fn test_linear_without_bias() {
        let layer = Linear::new(3, 5, false).unwrap();
        let state = layer.state_dict();
        assert!(state.contains_key("weight"));
        assert!(!state.contains_key("bias"));
    }

    #[test]
    fn test_linear_rejects_oversized_shape() {
        let huge = 1usize << (usize::BITS / 2);
        assert!(matches!(
            Linear::new(huge, huge, true),
            Err(crate::NormSwapError::InvalidParameter(_))
        ));
    }
}
