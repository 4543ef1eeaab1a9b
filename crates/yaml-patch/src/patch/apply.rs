//! Patch apply logic.
//!
//! Each operation walks its path from the root, resolving every parent token
//! into a container, and then issues a single terminal call against the last
//! container.

use serde_yaml::Value;
use tracing::debug;
use yaml_patch_pointer::{decompose, is_child, parse_pointer};

use crate::codec::{self, Format};
use crate::node::{Container, Node};
use crate::patch::path_finder;
use crate::patch::types::{Op, Patch, PatchError};

// ── Path navigation ───────────────────────────────────────────────────────

/// Resolve every parent of `pointer` and return the container holding its
/// final key, along with that key.
fn find_container<'a>(
    root: &'a mut Node,
    pointer: &str,
    op: &'static str,
) -> Result<(&'a mut dyn Container, String), PatchError> {
    let (parents, key) = decompose(pointer)?;
    let mut container = root.container()?;
    for part in &parents {
        container = match container.get_mut(part)? {
            Some(node) => node.container()?,
            None => {
                return Err(PatchError::MissingPath {
                    op,
                    path: pointer.to_string(),
                })
            }
        };
    }
    Ok((container, key))
}

// ── Individual operation applicators ─────────────────────────────────────

fn apply_add(root: &mut Node, path: &str, node: Node) -> Result<(), PatchError> {
    let (container, key) = find_container(root, path, "add")?;
    container.add(&key, node)?;
    Ok(())
}

fn apply_remove(root: &mut Node, path: &str) -> Result<Node, PatchError> {
    let (container, key) = find_container(root, path, "remove")?;
    Ok(container.remove(&key)?)
}

fn apply_replace(root: &mut Node, path: &str, value: &Value) -> Result<(), PatchError> {
    let (container, key) = find_container(root, path, "replace")?;
    if container.get(&key)?.is_none() {
        return Err(PatchError::MissingKey {
            op: "replace",
            path: path.to_string(),
        });
    }
    container.set(&key, Node::wrap(value.clone()))?;
    Ok(())
}

fn apply_move(root: &mut Node, from: &str, path: &str) -> Result<(), PatchError> {
    if is_child(&parse_pointer(from), &parse_pointer(path)) {
        return Err(PatchError::InvalidTarget {
            from: from.to_string(),
            path: path.to_string(),
        });
    }
    let (container, key) = find_container(root, from, "move")?;
    if container.get(&key)?.is_none() {
        return Err(PatchError::MissingKey {
            op: "move",
            path: from.to_string(),
        });
    }
    let node = container.remove(&key)?;
    apply_add(root, path, node)
}

fn apply_copy(root: &mut Node, from: &str, path: &str) -> Result<(), PatchError> {
    let (container, key) = find_container(root, from, "copy")?;
    let node = container
        .get(&key)?
        .cloned()
        .ok_or_else(|| PatchError::MissingKey {
            op: "copy",
            path: from.to_string(),
        })?;
    apply_add(root, path, node)
}

fn apply_test(root: &mut Node, path: &str, expected: Option<&Value>) -> Result<(), PatchError> {
    let (container, key) = find_container(root, path, "test")?;
    let actual = container.get(&key)?;
    let passed = match (actual, expected) {
        (None, None) | (None, Some(Value::Null)) => true,
        (None, Some(_)) => false,
        (Some(node), None) => node.is_null(),
        (Some(node), Some(expected)) => node.to_value() == *expected,
    };
    if passed {
        Ok(())
    } else {
        Err(PatchError::TestFailed {
            path: path.to_string(),
        })
    }
}

// ── Main apply functions ──────────────────────────────────────────────────

fn perform(root: &mut Node, op: &Op) -> Result<(), PatchError> {
    debug!(op = op.name(), path = op.path(), from = op.from_path(), "applying operation");
    match op {
        Op::Add { path, value } => apply_add(root, path, Node::wrap(value.clone())),
        Op::Remove { path } => apply_remove(root, path).map(drop),
        Op::Replace { path, value } => apply_replace(root, path, value),
        Op::Move { from, path } => apply_move(root, from, path),
        Op::Copy { from, path } => apply_copy(root, from, path),
        Op::Test { path, value } => apply_test(root, path, value.as_ref()),
    }
}

/// Apply a single operation to the tree, in place.
///
/// Extended paths are expanded first and the operation is applied once per
/// match, last match first, so that removing or inserting sequence elements
/// does not shift the positions of matches still to be processed.
pub fn apply_op(root: &mut Node, op: &Op) -> Result<(), PatchError> {
    if !path_finder::is_extended(op.path()) {
        return perform(root, op);
    }
    let paths = path_finder::find(root, op.path())?;
    if paths.is_empty() {
        return Err(PatchError::UnexpandablePath(op.path().to_string()));
    }
    debug!(path = op.path(), matches = paths.len(), "expanded path");
    for path in paths.iter().rev() {
        perform(root, &op.with_path(path))?;
    }
    Ok(())
}

/// Apply a sequence of operations in order, stopping at the first failure.
///
/// The tree is mutated in place; on error it is left as the operations before
/// the failing one made it.
pub fn apply_ops(root: &mut Node, ops: &[Op]) -> Result<(), PatchError> {
    for op in ops {
        apply_op(root, op)?;
    }
    Ok(())
}

impl Patch {
    pub fn apply_to(&self, root: &mut Node) -> Result<(), PatchError> {
        apply_ops(root, &self.ops)
    }

    /// Decode `doc`, apply every operation, and encode the result as YAML.
    pub fn apply(&self, doc: &[u8]) -> Result<Vec<u8>, PatchError> {
        let mut root = Node::wrap(codec::decode(doc)?);
        self.apply_to(&mut root)?;
        Ok(codec::encode(&root, Format::Yaml)?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
