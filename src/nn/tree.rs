//! Path-based access to a module tree.
//!
//! Paths are dotted child names relative to the root (`"encoder.0.bn"`); the
//! root itself is addressed by the empty path.

use crate::error::{NormSwapError, Result};
use crate::nn::Module;

/// Every module in the tree with its dotted path, depth-first, children in
/// construction order. The root comes first with an empty path.
pub fn named_modules(root: &dyn Module) -> Vec<(String, &dyn Module)> {
    let mut out = Vec::new();
    collect(root, String::new(), &mut out);
    out
}

fn collect<'a>(
    module: &'a dyn Module,
    path: String,
    out: &mut Vec<(String, &'a dyn Module)>,
) {
    let children = module.named_children();
    out.push((path.clone(), module));
    for (name, child) in children {
        collect(child, join(&path, &name), out);
    }
}

pub(crate) fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Splits `"a.b.c"` into the parent path `"a.b"` and the child name `"c"`.
pub(crate) fn split_parent(path: &str) -> (&str, &str) {
    match path.rsplit_once('.') {
        Some((parent, name)) => (parent, name),
        None => ("", path),
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let root = path.is_empty();
    path.split('.').filter(move |_| !root)
}

pub fn get_submodule<'a>(root: &'a dyn Module, path: &str) -> Result<&'a dyn Module> {
    let mut current = root;
    for segment in segments(path) {
        current = current
            .named_children()
            .into_iter()
            .find(|(name, _)| name == segment)
            .map(|(_, child)| child)
            .ok_or_else(|| NormSwapError::lookup(path, segment))?;
    }
    Ok(current)
}

pub fn get_submodule_mut<'a>(
    root: &'a mut dyn Module,
    path: &str,
) -> Result<&'a mut dyn Module> {
    let mut current = root;
    for segment in segments(path) {
        let child = current
            .child_mut(segment)
            .ok_or_else(|| NormSwapError::lookup(path, segment))?;
        current = &mut **child;
    }
    Ok(current)
}

/// Total number of learnable scalars in the tree.
pub fn num_params(root: &dyn Module) -> usize {
    root.parameters().iter().map(|p| p.numel()).sum()
}

/// One `path: kind` line per module, `(root)` standing in for the empty path.
pub fn summary(root: &dyn Module) -> String {
    named_modules(root)
        .into_iter()
        .map(|(path, module)| {
            let path = if path.is_empty() { "(root)" } else { path.as_str() };
            match module.num_features() {
                Some(features) => format!("{path}: {}({features})", module.kind()),
                None => format!("{path}: {}", module.kind()),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
