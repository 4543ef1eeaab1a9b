use serde::{Serialize, Serializer};
use serde_yaml::Value;
use yaml_patch_pointer::{parse_index, IndexToken};

use super::{Node, NodeError};

/// A resolved sequence of owned child nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeSlice {
    items: Vec<Node>,
}

/// How many positions a single `set` may add past the end of a sequence.
pub const MAX_SET_GROWTH: usize = 1 << 16;

fn index(token: &str) -> Result<usize, NodeError> {
    parse_index(token).map_err(|_| NodeError::InvalidIndex(token.to_string()))
}

impl NodeSlice {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_sequence(items: Vec<Value>) -> Self {
        NodeSlice {
            items: items.into_iter().map(Node::wrap).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Node> {
        self.items.iter_mut()
    }

    /// The node at position `token`.
    pub fn get(&self, token: &str) -> Result<&Node, NodeError> {
        let i = index(token)?;
        let len = self.items.len();
        self.items
            .get(i)
            .ok_or(NodeError::IndexOutOfRange { index: i, len })
    }

    pub fn get_mut(&mut self, token: &str) -> Result<&mut Node, NodeError> {
        let i = index(token)?;
        let len = self.items.len();
        self.items
            .get_mut(i)
            .ok_or(NodeError::IndexOutOfRange { index: i, len })
    }

    /// Overwrite position `token`. Setting past the end grows the sequence,
    /// filling the positions in between with placeholders, by at most
    /// [`MAX_SET_GROWTH`] positions.
    pub fn set(&mut self, token: &str, node: Node) -> Result<(), NodeError> {
        let i = index(token)?;
        let len = self.items.len();
        if i < len {
            self.items[i] = node;
            return Ok(());
        }
        let out_of_range = NodeError::IndexOutOfRange { index: i, len };
        let growth = (i - len)
            .checked_add(1)
            .filter(|n| *n <= MAX_SET_GROWTH)
            .ok_or_else(|| out_of_range.clone())?;
        self.items.try_reserve(growth).map_err(|_| out_of_range)?;
        self.items.resize_with(i, Node::placeholder);
        self.items.push(node);
        Ok(())
    }

    /// Insert at position `token`, shifting everything from there on one
    /// position later. `-` appends.
    pub fn add(&mut self, token: &str, node: Node) -> Result<(), NodeError> {
        let len = self.items.len();
        let i = IndexToken::parse(token)
            .map_err(|_| NodeError::InvalidIndex(token.to_string()))?
            .resolve(len);
        if i > len {
            return Err(NodeError::IndexOutOfRange { index: i, len });
        }
        self.items.insert(i, node);
        Ok(())
    }

    /// Delete position `token`, shifting everything after it one position
    /// earlier. Returns the removed node.
    pub fn remove(&mut self, token: &str) -> Result<Node, NodeError> {
        let i = index(token)?;
        let len = self.items.len();
        if i >= len {
            return Err(NodeError::IndexOutOfRange { index: i, len });
        }
        Ok(self.items.remove(i))
    }

    pub fn to_value(&self) -> Value {
        Value::Sequence(self.items.iter().map(Node::to_value).collect())
    }

    pub fn into_value(self) -> Value {
        Value::Sequence(self.items.into_iter().map(Node::into_value).collect())
    }
}

impl Serialize for NodeSlice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}
