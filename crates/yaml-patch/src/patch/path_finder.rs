//! Expansion of extended paths.
//!
//! A token of the form `key=value` matches every child of the current
//! container that is a mapping whose `key` entry is a scalar equal to
//! `value`:
//!
//! ```text
//! /spec/containers/name=sidecar/image
//! ```
//!
//! expands to `/spec/containers/2/image` if the third container is the one
//! named `sidecar`. Every other token is followed literally.

use yaml_patch_pointer::{escape_component, parse_pointer, PointerError};

use crate::node::Node;

/// Whether `pointer` contains a `key=value` selector.
pub fn is_extended(pointer: &str) -> bool {
    parse_pointer(pointer).iter().any(|token| token.contains('='))
}

/// Expand `pointer` into concrete pointers, in document order.
///
/// The last token does not need to exist, so that `add` can target a new key
/// under a selected parent. Intermediate tokens that don't resolve simply
/// contribute no paths.
pub fn find(root: &mut Node, pointer: &str) -> Result<Vec<String>, PointerError> {
    if !pointer.starts_with('/') {
        return Err(PointerError::MissingLeadingSlash(pointer.to_string()));
    }
    let tokens = parse_pointer(pointer);
    let mut found = Vec::new();
    walk(root, &tokens, String::new(), &mut found);
    Ok(found)
}

fn walk(node: &mut Node, tokens: &[String], prefix: String, found: &mut Vec<String>) {
    let Some((token, rest)) = tokens.split_first() else {
        found.push(prefix);
        return;
    };
    let Ok(container) = node.container() else {
        return;
    };

    if let Some((key, value)) = token.split_once('=') {
        for (child_token, child) in container.entries_mut() {
            if child.field_as_string(key).as_deref() == Some(value) {
                let path = format!("{prefix}/{}", escape_component(&child_token));
                walk(child, rest, path, found);
            }
        }
        return;
    }

    let path = format!("{prefix}/{}", escape_component(token));
    match container.get_mut(token) {
        Ok(Some(child)) => walk(child, rest, path, found),
        Ok(None) | Err(_) if rest.is_empty() => found.push(path),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(s: &str) -> Node {
        Node::wrap(serde_yaml::from_str(s).unwrap())
    }

    const CONTAINERS: &str = r#"
spec:
  containers:
  - name: app
    image: app:1
  - name: sidecar
    image: proxy:1
  - name: sidecar
    image: proxy:2
"#;

    #[test]
    fn detects_extended_syntax() {
        assert!(is_extended("/a/name=x/b"));
        assert!(is_extended("/a/name=x"));
        assert!(!is_extended("/a/b/0"));
        assert!(!is_extended(""));
    }

    #[test]
    fn expands_selector_in_sequence() {
        let mut root = doc(CONTAINERS);
        let paths = find(&mut root, "/spec/containers/name=sidecar/image").unwrap();
        assert_eq!(
            paths,
            vec!["/spec/containers/1/image", "/spec/containers/2/image"]
        );
    }

    #[test]
    fn selector_as_last_token() {
        let mut root = doc(CONTAINERS);
        let paths = find(&mut root, "/spec/containers/name=app").unwrap();
        assert_eq!(paths, vec!["/spec/containers/0"]);
    }

    #[test]
    fn selector_over_mapping_values() {
        let mut root = doc("jobs:\n  build: {kind: ci}\n  ship: {kind: cd}\n");
        let paths = find(&mut root, "/jobs/kind=cd").unwrap();
        assert_eq!(paths, vec!["/jobs/ship"]);
    }

    #[test]
    fn new_final_key_is_allowed() {
        let mut root = doc(CONTAINERS);
        let paths = find(&mut root, "/spec/containers/name=app/ports").unwrap();
        assert_eq!(paths, vec!["/spec/containers/0/ports"]);
    }

    #[test]
    fn no_match_yields_nothing() {
        let mut root = doc(CONTAINERS);
        assert!(find(&mut root, "/spec/containers/name=db/image")
            .unwrap()
            .is_empty());
        assert!(find(&mut root, "/spec/missing/name=app").unwrap().is_empty());
    }

    #[test]
    fn non_scalar_fields_never_match() {
        let mut root = doc("- {name: [a]}\n- {name: a}\n");
        assert_eq!(find(&mut root, "/name=a").unwrap(), vec!["/1"]);
    }

    #[test]
    fn numeric_and_boolean_fields_compare_as_strings() {
        let mut root = doc("- {port: 80}\n- {port: 443, tls: true}\n");
        assert_eq!(find(&mut root, "/port=443").unwrap(), vec!["/1"]);
        assert_eq!(find(&mut root, "/tls=true").unwrap(), vec!["/1"]);
    }

    #[test]
    fn relative_pointer_rejected() {
        let mut root = doc("{}");
        assert!(find(&mut root, "a=b").is_err());
    }
}
