use crate::error::{NormSwapError, Result};

/// Flat parameter/buffer storage.
///
/// `data.len()` always equals the product of `shape`. Layers keep their
/// learnable weights and running statistics in this form; nothing here
/// computes forward passes.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorData {
    pub data: Vec<f32>,
    pub shape: Vec<usize>,
}

/// Number of elements in `shape`, rejecting shapes whose buffer could not
/// be allocated.
pub fn checked_numel(shape: &[usize]) -> Result<usize> {
    let too_large = || NormSwapError::InvalidParameter(format!("shape {shape:?} is too large"));
    let numel = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(too_large)?;
    match numel.checked_mul(size_of::<f32>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(numel),
        _ => Err(too_large()),
    }
}

impl TensorData {
    /// Returns `None` when the data length does not match the shape.
    pub fn new(data: Vec<f32>, shape: &[usize]) -> Option<Self> {
        if checked_numel(shape).ok()? != data.len() {
            return None;
        }
        Some(TensorData {
            data,
            shape: shape.to_vec(),
        })
    }

    pub fn full(value: f32, shape: &[usize]) -> Result<Self> {
        let size = checked_numel(shape)?;
        Ok(TensorData {
            data: vec![value; size],
            shape: shape.to_vec(),
        })
    }

    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::full(0.0, shape)
    }

    pub fn ones(shape: &[usize]) -> Result<Self> {
        Self::full(1.0, shape)
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }
}
