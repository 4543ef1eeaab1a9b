//! Pointer-addressable document tree.
//!
//! A [`Node`] starts out holding the raw decoded value. The first time the
//! patch driver needs to look inside it, it is resolved into a [`NodeMap`] or
//! a [`NodeSlice`], and stays that way. Children of a resolved node are again
//! unresolved nodes, so only the branches a patch actually walks are ever
//! converted. Everything else is re-emitted exactly as it was decoded.

use std::collections::HashSet;
use std::fmt;
use std::mem;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};
use thiserror::Error;
use tracing::trace;

mod container;
mod map;
mod slice;

pub use container::Container;
pub use map::NodeMap;
pub use slice::{NodeSlice, MAX_SET_GROWTH};

// ── Error ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NodeError {
    #[error("don't know how to convert {found} into {expected}")]
    TypeMismatch { expected: Shape, found: Shape },
    #[error("unable to remove nonexistent key: {0}")]
    KeyNotFound(String),
    #[error("unable to access invalid index: {index} (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("invalid index: {0:?}")]
    InvalidIndex(String),
}

/// The shape of a value, as far as resolution is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Null,
    Bool,
    Number,
    String,
    Tagged,
    Sequence,
    Mapping,
    /// A mapping with at least one mapping or sequence used as a key.
    ComplexKeyMapping,
    /// A mapping with distinct keys that share a string form, like `1` and
    /// `"1"`.
    CollidingKeyMapping,
}

impl Shape {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Shape::Null,
            Value::Bool(_) => Shape::Bool,
            Value::Number(_) => Shape::Number,
            Value::String(_) => Shape::String,
            Value::Tagged(_) => Shape::Tagged,
            Value::Sequence(_) => Shape::Sequence,
            Value::Mapping(m) => mapping_shape(m),
        }
    }
}

fn mapping_shape(mapping: &Mapping) -> Shape {
    let mut seen = HashSet::with_capacity(mapping.len());
    for key in mapping.keys() {
        match key_to_string(key) {
            Some(token) if !seen.insert(token.clone()) => return Shape::CollidingKeyMapping,
            Some(_) => {}
            None => return Shape::ComplexKeyMapping,
        }
    }
    Shape::Mapping
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Number => "number",
            Shape::String => "string",
            Shape::Tagged => "tagged value",
            Shape::Sequence => "sequence",
            Shape::Mapping => "mapping",
            Shape::ComplexKeyMapping => "mapping with non-scalar keys",
            Shape::CollidingKeyMapping => "mapping with colliding keys",
        };
        f.write_str(s)
    }
}

// ── Keys ──────────────────────────────────────────────────────────────────

/// String form of a mapping key. Pointer tokens are always strings, so scalar
/// keys are stringified; mappings, sequences and tagged keys have no token.
pub fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        _ => None,
    }
}

/// String form of a scalar value, used by `key=value` selectors.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        other => key_to_string(other),
    }
}

// ── Node ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Raw,
    Map,
    Slice,
}

#[derive(Debug, Clone)]
enum NodeState {
    Raw(Value),
    Map(NodeMap),
    Slice(NodeSlice),
}

/// One position in the document tree.
#[derive(Debug, Clone)]
pub struct Node {
    state: NodeState,
}

impl Node {
    /// Wrap a decoded value without inspecting it.
    pub fn wrap(value: Value) -> Self {
        Node {
            state: NodeState::Raw(value),
        }
    }

    /// An empty node, used to fill the gap when a sequence grows on `set`.
    pub fn placeholder() -> Self {
        Node::wrap(Value::Null)
    }

    pub fn kind(&self) -> NodeKind {
        match self.state {
            NodeState::Raw(_) => NodeKind::Raw,
            NodeState::Map(_) => NodeKind::Map,
            NodeState::Slice(_) => NodeKind::Slice,
        }
    }

    /// The raw value, if the node has not been resolved.
    pub fn raw(&self) -> Option<&Value> {
        match &self.state {
            NodeState::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.state, NodeState::Raw(Value::Null))
    }

    /// Whether the node is, or would resolve to, a sequence. Never resolves.
    pub fn looks_like_sequence(&self) -> bool {
        matches!(
            self.state,
            NodeState::Slice(_) | NodeState::Raw(Value::Sequence(_))
        )
    }

    /// Resolve as a mapping, or return the mapping resolved earlier.
    ///
    /// Fails with [`NodeError::TypeMismatch`] and leaves the node untouched if
    /// it holds anything other than a mapping with scalar keys.
    pub fn as_mapping(&mut self) -> Result<&mut NodeMap, NodeError> {
        if matches!(&self.state, NodeState::Raw(raw) if Shape::of(raw) == Shape::Mapping) {
            let state = mem::replace(&mut self.state, NodeState::Raw(Value::Null));
            self.state = match state {
                NodeState::Raw(Value::Mapping(mapping)) => {
                    trace!(entries = mapping.len(), "resolving node as mapping");
                    NodeState::Map(NodeMap::from_mapping(mapping))
                }
                other => other,
            };
        }
        match &mut self.state {
            NodeState::Map(map) => Ok(map),
            other => Err(NodeError::TypeMismatch {
                expected: Shape::Mapping,
                found: other.shape(),
            }),
        }
    }

    /// Resolve as a sequence, or return the sequence resolved earlier.
    pub fn as_sequence(&mut self) -> Result<&mut NodeSlice, NodeError> {
        if matches!(self.state, NodeState::Raw(Value::Sequence(_))) {
            let state = mem::replace(&mut self.state, NodeState::Raw(Value::Null));
            self.state = match state {
                NodeState::Raw(Value::Sequence(items)) => {
                    trace!(items = items.len(), "resolving node as sequence");
                    NodeState::Slice(NodeSlice::from_sequence(items))
                }
                other => other,
            };
        }
        match &mut self.state {
            NodeState::Slice(slice) => Ok(slice),
            other => Err(NodeError::TypeMismatch {
                expected: Shape::Sequence,
                found: other.shape(),
            }),
        }
    }

    /// Resolve as whichever container the node holds: a sequence if it looks
    /// like one, a mapping otherwise.
    pub fn container(&mut self) -> Result<&mut dyn Container, NodeError> {
        if self.looks_like_sequence() {
            Ok(self.as_sequence()?)
        } else {
            Ok(self.as_mapping()?)
        }
    }

    /// The scalar stored under `key`, if this node is a mapping holding one.
    /// Never resolves.
    pub fn field_as_string(&self, key: &str) -> Option<String> {
        match &self.state {
            NodeState::Raw(Value::Mapping(mapping)) => mapping
                .iter()
                .find(|(k, _)| key_to_string(k).as_deref() == Some(key))
                .and_then(|(_, v)| scalar_to_string(v)),
            NodeState::Map(map) => map
                .get(key)
                .and_then(Node::raw)
                .and_then(scalar_to_string),
            _ => None,
        }
    }

    /// The value to re-emit for this node.
    pub fn to_value(&self) -> Value {
        match &self.state {
            NodeState::Raw(value) => value.clone(),
            NodeState::Map(map) => map.to_value(),
            NodeState::Slice(slice) => slice.to_value(),
        }
    }

    pub fn into_value(self) -> Value {
        match self.state {
            NodeState::Raw(value) => value,
            NodeState::Map(map) => map.into_value(),
            NodeState::Slice(slice) => slice.into_value(),
        }
    }
}

impl NodeState {
    fn shape(&self) -> Shape {
        match self {
            NodeState::Raw(value) => Shape::of(value),
            NodeState::Map(_) => Shape::Mapping,
            NodeState::Slice(_) => Shape::Sequence,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::wrap(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.state {
            NodeState::Raw(value) => value.serialize(serializer),
            NodeState::Map(map) => map.serialize(serializer),
            NodeState::Slice(slice) => slice.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::wrap)
    }
}
