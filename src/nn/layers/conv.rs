use serde::{Deserialize, Serialize};

use crate::error::{NormSwapError, Result};
use crate::io::{ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind};

/// Configuration to create a [Conv2d] layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conv2dConfig {
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: usize,
    #[serde(default = "default_stride")]
    pub stride: usize,
    #[serde(default)]
    pub padding: usize,
    #[serde(default = "default_bias")]
    pub bias: bool,
}

fn default_stride() -> usize {
    1
}

fn default_bias() -> bool {
    true
}

impl Conv2dConfig {
    pub fn init(&self) -> Result<Conv2d> {
        Conv2d::new(
            self.in_channels,
            self.out_channels,
            self.kernel_size,
            self.stride,
            self.padding,
            self.bias,
        )
    }
}

pub struct Conv2d {
    weight: TensorData,       // [out_channels, in_channels, kernel, kernel]
    bias: Option<TensorData>, // [out_channels]
    stride: usize,
    padding: usize,
}

impl Conv2d {
    pub fn new(
        in_ch: usize,
        out_ch: usize,
        kernel: usize,
        stride: usize,
        padding: usize,
        use_bias: bool,
    ) -> Result<Self> {
        if in_ch == 0 || out_ch == 0 {
            return Err(NormSwapError::InvalidParameter(format!(
                "Conv2d channels must be positive, got in={in_ch} out={out_ch}"
            )));
        }
        if kernel == 0 {
            return Err(NormSwapError::InvalidParameter(
                "Conv2d kernel size must be positive".to_string(),
            ));
        }
        if stride == 0 {
            return Err(NormSwapError::InvalidParameter(
                "Conv2d stride must be positive".to_string(),
            ));
        }
        let weight = TensorData::zeros(&[out_ch, in_ch, kernel, kernel])?;
        let bias = if use_bias {
            Some(TensorData::zeros(&[out_ch])?)
        } else {
            None
        };
        Ok(Conv2d {
            weight,
            bias,
            stride,
            padding,
        })
    }

    pub fn out_channels(&self) -> usize {
        self.weight.shape.first().copied().unwrap_or(0)
    }
}

impl Module for Conv2d {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Conv2d
    }

    fn config(&self) -> ModuleConfig {
        let dim = |i: usize| self.weight.shape.get(i).copied().unwrap_or(0);
        ModuleConfig::Conv2d(Conv2dConfig {
            in_channels: dim(1),
            out_channels: dim(0),
            kernel_size: dim(2),
            stride: self.stride,
            padding: self.padding,
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
