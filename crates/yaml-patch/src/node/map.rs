use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use super::{key_to_string, Node, NodeError};

/// A resolved mapping: string keys to owned child nodes.
///
/// Insertion order is kept so that an untouched document is re-emitted with
/// its keys in their original order.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    entries: IndexMap<String, Node>,
}

impl NodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded mapping. [`Node::as_mapping`] only calls this for
    /// mappings whose keys all have distinct string forms.
    pub(crate) fn from_mapping(mapping: Mapping) -> Self {
        let entries = mapping
            .into_iter()
            .filter_map(|(k, v)| key_to_string(&k).map(|key| (key, Node::wrap(v))))
            .collect();
        NodeMap { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Node)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// The node at `key`. `None` means the key is absent; a key holding an
    /// explicit null yields `Some` node whose value is null.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Set or replace the node at `key`.
    pub fn set(&mut self, key: &str, node: Node) {
        self.entries.insert(key.to_string(), node);
    }

    /// Add the node at `key`. An existing entry is replaced, as RFC 6902 does
    /// for `add` on an object member.
    pub fn add(&mut self, key: &str, node: Node) {
        self.set(key, node);
    }

    /// Remove the entry at `key`, returning its node. The remaining entries
    /// keep their relative order.
    pub fn remove(&mut self, key: &str) -> Result<Node, NodeError> {
        self.entries
            .shift_remove(key)
            .ok_or_else(|| NodeError::KeyNotFound(key.to_string()))
    }

    pub fn to_value(&self) -> Value {
        let mut mapping = Mapping::with_capacity(self.entries.len());
        for (key, node) in &self.entries {
            mapping.insert(Value::String(key.clone()), node.to_value());
        }
        Value::Mapping(mapping)
    }

    pub fn into_value(self) -> Value {
        let mut mapping = Mapping::with_capacity(self.entries.len());
        for (key, node) in self.entries {
            mapping.insert(Value::String(key), node.into_value());
        }
        Value::Mapping(mapping)
    }
}

impl Serialize for NodeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(&self.entries)
    }
}
