use std::collections::HashSet;

use super::sequential::LayerEntry;
use crate::error::{NormSwapError, Result};
use crate::nn::{Module, Sequential};

/// Builder for constructing Sequential models with named or unnamed layers
///
/// # Examples
///
/// ```
/// use normswap::nn::{BatchNorm, Linear, ReLU, Sequential, SpatialRank};
///
/// let model = Sequential::builder()
///     .add_named("encoder", Box::new(Linear::new(784, 128, true)?))
///     .add_named("bn", Box::new(BatchNorm::new(SpatialRank::One, 128)?))
///     .add_unnamed(Box::new(ReLU))
///     .build()?;
/// # Ok::<(), normswap::NormSwapError>(())
/// ```
pub struct SequentialBuilder {
    entries: Vec<LayerEntry>,
}

impl SequentialBuilder {
    /// Create a new empty builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an unnamed layer, addressed by its index
    #[must_use]
    pub fn add_unnamed(mut self, layer: Box<dyn Module>) -> Self {
        self.entries.push(LayerEntry { name: None, layer });
        self
    }

    /// Add a named layer
    ///
    /// Empty strings are treated as unnamed.
    #[must_use]
    pub fn add_named(mut self, name: impl Into<String>, layer: Box<dyn Module>) -> Self {
        let name = name.into();
        let name = if name.is_empty() { None } else { Some(name) };
        self.entries.push(LayerEntry { name, layer });
        self
    }

    /// Build the Sequential model from the accumulated layers
    ///
    /// Fails with [`NormSwapError::DuplicateChild`] when two layers end up
    /// with the same key, including a name that collides with another
    /// layer's index. Names containing `.` are rejected since they would
    /// break path lookups.
    pub fn build(self) -> Result<Sequential> {
        let mut seen = HashSet::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let key = entry.key(i);
            if key.contains('.') {
                return Err(NormSwapError::InvalidParameter(format!(
                    "child name `{key}` must not contain '.'"
                )));
            }
            if !seen.insert(key.clone()) {
                return Err(NormSwapError::DuplicateChild(key));
            }
        }
        Ok(Sequential {
            layers: self.entries,
        })
    }
}

impl Default for SequentialBuilder {
    fn default() -> Self {
        Self::new()
    }
}
