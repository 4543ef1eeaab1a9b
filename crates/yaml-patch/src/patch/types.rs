//! Core types for patch operations.

use serde_yaml::Value;
use thiserror::Error;
use yaml_patch_pointer::PointerError;

use crate::codec::CodecError;
use crate::node::NodeError;

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("invalid operation: {0}")]
    InvalidOp(String),
    #[error("unexpected op: {0}")]
    UnknownOp(String),
    #[error(transparent)]
    Pointer(#[from] PointerError),
    #[error("{op} operation does not apply: doc is missing path: {path}")]
    MissingPath { op: &'static str, path: String },
    #[error("{op} operation does not apply: doc is missing key: {path}")]
    MissingKey { op: &'static str, path: String },
    #[error("cannot move {from} into its own child {path}")]
    InvalidTarget { from: String, path: String },
    #[error("testing value {path} failed")]
    TestFailed { path: String },
    #[error("could not expand pointer: {0}")]
    UnexpandablePath(String),
    #[error(transparent)]
    Node(#[from] NodeError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ── Op ────────────────────────────────────────────────────────────────────

/// One patch operation. Paths are kept as pointer strings because extended
/// paths are only expanded against the document at apply time.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    /// `value: None` expects the target to be absent or null.
    Test { path: String, value: Option<Value> },
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Op::Add { .. } => "add",
            Op::Remove { .. } => "remove",
            Op::Replace { .. } => "replace",
            Op::Move { .. } => "move",
            Op::Copy { .. } => "copy",
            Op::Test { .. } => "test",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => path,
        }
    }

    pub fn from_path(&self) -> Option<&str> {
        match self {
            Op::Move { from, .. } | Op::Copy { from, .. } => Some(from),
            _ => None,
        }
    }

    /// The same operation aimed at another path.
    pub fn with_path(&self, new_path: &str) -> Op {
        let mut op = self.clone();
        match &mut op {
            Op::Add { path, .. }
            | Op::Remove { path }
            | Op::Replace { path, .. }
            | Op::Move { path, .. }
            | Op::Copy { path, .. }
            | Op::Test { path, .. } => *path = new_path.to_string(),
        }
        op
    }
}

/// An ordered list of operations, decoded from one operations file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    pub ops: Vec<Op>,
}

impl Patch {
    pub fn new(ops: Vec<Op>) -> Self {
        Patch { ops }
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let op = Op::Move {
            from: "/a".into(),
            path: "/b".into(),
        };
        assert_eq!(op.name(), "move");
        assert_eq!(op.path(), "/b");
        assert_eq!(op.from_path(), Some("/a"));

        let retargeted = op.with_path("/c");
        assert_eq!(retargeted.path(), "/c");
        assert_eq!(retargeted.from_path(), Some("/a"));
    }

    #[test]
    fn error_messages() {
        let e = PatchError::MissingPath {
            op: "add",
            path: "/a/b".into(),
        };
        assert_eq!(
            e.to_string(),
            "add operation does not apply: doc is missing path: /a/b"
        );
        let e = PatchError::from(NodeError::KeyNotFound("k".into()));
        assert_eq!(e.to_string(), "unable to remove nonexistent key: k");
    }
}
