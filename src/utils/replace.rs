//! Find-and-replace over a module tree.
//!
//! Matches are collected first (depth-first, children in construction order)
//! and swapped one by one afterwards. A matched module is replaced as a whole,
//! so nothing below it is visited. Replacements are not transactional: if a
//! converter fails, the swaps already made stay in place.

use std::fmt;

use crate::error::{NormSwapError, Result};
use crate::nn::tree::{join, split_parent};
use crate::nn::{Module, ModuleType, get_submodule_mut};
use crate::utils::convert::{batchnorm_to_groupnorm, batchnorm_to_instancenorm, to_identity};

/// A module taken out of the tree, and where it used to live.
pub struct Replacement {
    /// Dotted path of the slot; empty for the root.
    pub path: String,
    pub previous: Box<dyn Module>,
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Replacement")
            .field("path", &self.path)
            .field("previous", &self.previous.kind())
            .finish()
    }
}

/// Replace the module at `path` with `converter(module)` and return the old one.
///
/// The parent is resolved by walking every segment but the last from `root`.
/// The root has no parent slot, so an empty path is a lookup failure.
pub fn replace_submodule<F>(
    root: &mut dyn Module,
    path: &str,
    converter: F,
) -> Result<Box<dyn Module>>
where
    F: FnOnce(&dyn Module) -> Result<Box<dyn Module>>,
{
    if path.is_empty() {
        return Err(NormSwapError::lookup(path, ""));
    }
    let (parent_path, name) = split_parent(path);
    let parent = get_submodule_mut(root, parent_path)?;
    let slot = parent
        .child_mut(name)
        .ok_or_else(|| NormSwapError::lookup(path, name))?;

    let replacement = converter(&**slot)?;
    log::debug!("replaced {}: {} -> {}", path, slot.kind(), replacement.kind());
    Ok(std::mem::replace(slot, replacement))
}

fn matching_paths(root: &dyn Module, target: ModuleType) -> Vec<String> {
    let mut paths = Vec::new();
    for (name, child) in root.named_children() {
        collect_matches(child, name, target, &mut paths);
    }
    paths
}

fn collect_matches(
    module: &dyn Module,
    path: String,
    target: ModuleType,
    out: &mut Vec<String>,
) {
    if target.matches(module.kind()) {
        out.push(path);
        return;
    }
    for (name, child) in module.named_children() {
        let child_path = join(&path, &name);
        collect_matches(child, child_path, target, out);
    }
}

/// Replace every module matching `target` inside `root`, in place.
///
/// If the root itself matches, the caller's box is swapped for
/// `converter(root)` and nothing else is visited. Returns the taken-out
/// modules in traversal order; hand them to [`restore`] to undo the pass.
///
/// On error the tree keeps the replacements made so far.
pub fn replace_all_modules_in_place<F>(
    root: &mut Box<dyn Module>,
    target: impl Into<ModuleType>,
    mut converter: F,
) -> Result<Vec<Replacement>>
where
    F: FnMut(&dyn Module) -> Result<Box<dyn Module>>,
{
    let target = target.into();

    if target.matches(root.kind()) {
        let replacement = converter(&**root)?;
        log::debug!("replaced root: {} -> {}", root.kind(), replacement.kind());
        let previous = std::mem::replace(root, replacement);
        return Ok(vec![Replacement {
            path: String::new(),
            previous,
        }]);
    }

    let paths = matching_paths(&**root, target);
    log::trace!("{} module(s) matching {:?}", paths.len(), target);

    let mut replaced = Vec::with_capacity(paths.len());
    for path in paths {
        let previous = replace_submodule(&mut **root, &path, &mut converter)?;
        replaced.push(Replacement { path, previous });
    }
    Ok(replaced)
}

/// Replace every module matching `target` and return the rewritten tree.
///
/// Same traversal as [`replace_all_modules_in_place`]. The returned box is
/// `root` itself unless the root matched, in which case it is
/// `converter(root)`.
pub fn replace_all_modules<F>(
    root: Box<dyn Module>,
    target: impl Into<ModuleType>,
    converter: F,
) -> Result<Box<dyn Module>>
where
    F: FnMut(&dyn Module) -> Result<Box<dyn Module>>,
{
    let mut root = root;
    replace_all_modules_in_place(&mut root, target, converter)?;
    Ok(root)
}

/// Put replaced modules back, newest first.
pub fn restore(root: &mut Box<dyn Module>, replacements: Vec<Replacement>) -> Result<()> {
    for Replacement { path, previous } in replacements.into_iter().rev() {
        if path.is_empty() {
            *root = previous;
            continue;
        }
        replace_submodule(&mut **root, &path, move |_| Ok(previous))?;
    }
    Ok(())
}

/// Replace every module matching `target` with an [`Identity`](crate::nn::Identity).
pub fn nullify_modules(
    root: Box<dyn Module>,
    target: impl Into<ModuleType>,
) -> Result<Box<dyn Module>> {
    replace_all_modules(root, target, to_identity)
}

/// Replace every batch norm, of any rank, with an [`Identity`](crate::nn::Identity).
pub fn nullify_batchnorm_modules(root: Box<dyn Module>) -> Result<Box<dyn Module>> {
    nullify_modules(root, ModuleType::AnyBatchNorm)
}

/// Replace every batch norm with a non-affine group norm.
pub fn replace_batchnorm(root: Box<dyn Module>) -> Result<Box<dyn Module>> {
    replace_all_modules(root, ModuleType::AnyBatchNorm, batchnorm_to_groupnorm)
}

/// Replace every batch norm with an instance norm of the same rank.
pub fn replace_batchnorm_with_instancenorm(root: Box<dyn Module>) -> Result<Box<dyn Module>> {
    replace_all_modules(root, ModuleType::AnyBatchNorm, batchnorm_to_instancenorm)
}
