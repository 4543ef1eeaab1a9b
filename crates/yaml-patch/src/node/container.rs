use serde_yaml::Value;

use super::{Node, NodeError, NodeMap, NodeSlice};

/// Key-addressed access shared by [`NodeMap`] and [`NodeSlice`].
///
/// Keys are pointer tokens. `get` reports a missing mapping key or an
/// out-of-range position as `Ok(None)`; a token that can never address the
/// container (a non-numeric sequence index) is an error.
pub trait Container {
    fn get(&self, key: &str) -> Result<Option<&Node>, NodeError>;

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut Node>, NodeError>;

    fn set(&mut self, key: &str, node: Node) -> Result<(), NodeError>;

    fn add(&mut self, key: &str, node: Node) -> Result<(), NodeError>;

    fn remove(&mut self, key: &str) -> Result<Node, NodeError>;

    /// Every child with the token that addresses it, in document order.
    fn entries_mut(&mut self) -> Vec<(String, &mut Node)>;

    fn to_value(&self) -> Value;
}

impl Container for NodeMap {
    fn get(&self, key: &str) -> Result<Option<&Node>, NodeError> {
        Ok(NodeMap::get(self, key))
    }

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut Node>, NodeError> {
        Ok(NodeMap::get_mut(self, key))
    }

    fn set(&mut self, key: &str, node: Node) -> Result<(), NodeError> {
        NodeMap::set(self, key, node);
        Ok(())
    }

    fn add(&mut self, key: &str, node: Node) -> Result<(), NodeError> {
        NodeMap::add(self, key, node);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<Node, NodeError> {
        NodeMap::remove(self, key)
    }

    fn entries_mut(&mut self) -> Vec<(String, &mut Node)> {
        self.iter_mut().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn to_value(&self) -> Value {
        NodeMap::to_value(self)
    }
}

impl Container for NodeSlice {
    fn get(&self, key: &str) -> Result<Option<&Node>, NodeError> {
        match NodeSlice::get(self, key) {
            Ok(node) => Ok(Some(node)),
            Err(NodeError::IndexOutOfRange { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn get_mut(&mut self, key: &str) -> Result<Option<&mut Node>, NodeError> {
        match NodeSlice::get_mut(self, key) {
            Ok(node) => Ok(Some(node)),
            Err(NodeError::IndexOutOfRange { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, node: Node) -> Result<(), NodeError> {
        NodeSlice::set(self, key, node)
    }

    fn add(&mut self, key: &str, node: Node) -> Result<(), NodeError> {
        NodeSlice::add(self, key, node)
    }

    fn remove(&mut self, key: &str) -> Result<Node, NodeError> {
        NodeSlice::remove(self, key)
    }

    fn entries_mut(&mut self) -> Vec<(String, &mut Node)> {
        self.iter_mut()
            .enumerate()
            .map(|(i, node)| (i.to_string(), node))
            .collect()
    }

    fn to_value(&self) -> Value {
        NodeSlice::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(s: &str) -> Node {
        Node::wrap(serde_yaml::from_str(s).unwrap())
    }

    #[test]
    fn missing_children_are_none() {
        let mut map = root("{a: 1}");
        assert!(map.container().unwrap().get("b").unwrap().is_none());

        let mut seq = root("[1]");
        let seq = seq.container().unwrap();
        assert!(seq.get("1").unwrap().is_none());
        assert_eq!(
            seq.get("one").unwrap_err(),
            NodeError::InvalidIndex("one".to_string())
        );
    }

    #[test]
    fn entries_carry_their_tokens() {
        let mut seq = root("[x, y]");
        let tokens: Vec<String> = seq
            .container()
            .unwrap()
            .entries_mut()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(tokens, vec!["0", "1"]);

        let mut map = root("{b: 1, a: 2}");
        let tokens: Vec<String> = map
            .container()
            .unwrap()
            .entries_mut()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(tokens, vec!["b", "a"]);
    }

    #[test]
    fn mutations_through_the_trait() {
        let mut doc = root("{list: [a, b]}");
        {
            let map = doc.container().unwrap();
            map.add("extra", Node::wrap("x".into())).unwrap();
            let list = map.get_mut("list").unwrap().unwrap().container().unwrap();
            list.add("-", Node::wrap("c".into())).unwrap();
            list.remove("0").unwrap();
        }
        assert_eq!(
            doc.to_value(),
            serde_yaml::from_str::<Value>("{list: [b, c], extra: x}").unwrap()
        );
    }
}
