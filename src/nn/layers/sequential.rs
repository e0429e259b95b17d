use crate::io::{LayerConfig, ModuleConfig, StateDict, TensorData};
use crate::nn::{Module, ModuleKind, SequentialBuilder};

pub(crate) struct LayerEntry {
    pub(crate) name: Option<String>,
    pub(crate) layer: Box<dyn Module>,
}

impl LayerEntry {
    /// Explicit name, or the position in the container for unnamed layers.
    pub(crate) fn key(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => index.to_string(),
        }
    }

    fn has_key(&self, index: usize, key: &str) -> bool {
        match &self.name {
            Some(name) => name == key,
            None => index.to_string() == key,
        }
    }
}

/// Ordered container of child modules.
///
/// Children are addressed by their explicit name or, when unnamed, by their
/// index (`"0"`, `"1"`, ...), the same keys that appear in the state dict.
pub struct Sequential {
    pub(crate) layers: Vec<LayerEntry>,
}

impl Sequential {
    /// Unnamed layers, addressed by index.
    pub fn new(layers: Vec<Box<dyn Module>>) -> Self {
        Sequential {
            layers: layers
                .into_iter()
                .map(|layer| LayerEntry { name: None, layer })
                .collect(),
        }
    }

    pub fn builder() -> SequentialBuilder {
        SequentialBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Explicit names in order, `None` for unnamed layers.
    pub fn layer_names(&self) -> Vec<Option<&str>> {
        self.layers.iter().map(|e| e.name.as_deref()).collect()
    }
}

impl Module for Sequential {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Sequential
    }

    fn config(&self) -> ModuleConfig {
        ModuleConfig::Sequential {
            layers: self
                .layers
                .iter()
                .map(|e| LayerConfig {
                    name: e.name.clone(),
                    module: e.layer.config(),
                })
                .collect(),
        }
    }

    fn parameters(&self) -> Vec<&TensorData> {
        self.layers.iter().flat_map(|e| e.layer.parameters()).collect()
    }

    fn state_dict(&self) -> StateDict {
        let mut state = StateDict::new();
        for (i, entry) in self.layers.iter().enumerate() {
            let prefix = entry.key(i);
            for (key, value) in entry.layer.state_dict() {
                state.insert(format!("{}.{}", prefix, key), value);
            }
        }
        state
    }

    fn named_children(&self) -> Vec<(String, &dyn Module)> {
        self.layers
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key(i), &*e.layer))
            .collect()
    }

    fn child_mut(&mut self, name: &str) -> Option<&mut Box<dyn Module>> {
        self.layers
            .iter_mut()
            .enumerate()
            .find(|(i, e)| e.has_key(*i, name))
            .map(|(_, e)| &mut e.layer)
    }
}
