//! Pointer (RFC 6901 style) utilities for yaml-patch.
//!
//! Paths address positions inside a YAML document: `/spec/containers/0/image`.
//! Each `/`-separated token is either a mapping key or a sequence index.
//!
//! # Example
//!
//! ```
//! use yaml_patch_pointer::{decompose, format_pointer, parse_pointer};
//!
//! let path = parse_pointer("/foo/bar");
//! assert_eq!(path, vec!["foo".to_string(), "bar".to_string()]);
//! assert_eq!(format_pointer(&path), "/foo/bar");
//!
//! let (parents, key) = decompose("/foo/bar/0").unwrap();
//! assert_eq!(parents, vec!["foo", "bar"]);
//! assert_eq!(key, "0");
//! ```

use thiserror::Error;

pub mod types;
pub use types::{IndexToken, Path, PathStep};

pub mod validate;
pub use validate::{
    validate_path, validate_pointer, ValidationError, MAX_PATH_LENGTH, MAX_POINTER_LENGTH,
};

/// Token reserved for "one past the last element" of a sequence.
pub const APPEND_TOKEN: &str = "-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PointerError {
    #[error("path is missing leading '/': {0:?}")]
    MissingLeadingSlash(String),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("invalid index token: {0:?}")]
    InvalidIndex(String),
    #[error("path has no parent")]
    NoParent,
}

/// Unescapes a pointer token.
///
/// `~1` is replaced with `/` and `~0` with `~`.
///
/// ```
/// use yaml_patch_pointer::unescape_component;
///
/// assert_eq!(unescape_component("a~0b"), "a~b");
/// assert_eq!(unescape_component("c~1d"), "c/d");
/// ```
pub fn unescape_component(component: &str) -> String {
    if !component.contains('~') {
        return component.to_string();
    }
    // ~1 before ~0, otherwise "~01" would decode to "/"
    component.replace("~1", "/").replace("~0", "~")
}

/// Escapes a pointer token.
///
/// ```
/// use yaml_patch_pointer::escape_component;
///
/// assert_eq!(escape_component("a~b"), "a~0b");
/// assert_eq!(escape_component("c/d"), "c~1d");
/// ```
pub fn escape_component(component: &str) -> String {
    if !component.contains('/') && !component.contains('~') {
        return component.to_string();
    }
    component.replace('~', "~0").replace('/', "~1")
}

/// Parse a pointer string into unescaped tokens.
///
/// The empty string is the root and yields no tokens. A lone `/` yields a
/// single empty token.
pub fn parse_pointer(pointer: &str) -> Path {
    if pointer.is_empty() {
        return Vec::new();
    }
    let rest = pointer.strip_prefix('/').unwrap_or(pointer);
    rest.split('/').map(unescape_component).collect()
}

/// Format tokens back into a pointer string.
pub fn format_pointer(path: &[String]) -> String {
    let mut out = String::new();
    for component in path {
        out.push('/');
        out.push_str(&escape_component(component));
    }
    out
}

/// Split a pointer into its parent tokens and final key.
///
/// The pointer must be non-empty and start with `/`; operations never target
/// the document root itself.
pub fn decompose(pointer: &str) -> Result<(Path, PathStep), PointerError> {
    if !pointer.starts_with('/') {
        return Err(PointerError::MissingLeadingSlash(pointer.to_string()));
    }
    validate_pointer(pointer)?;
    let mut path = parse_pointer(pointer);
    validate_path(&path)?;
    let key = path.pop().ok_or(PointerError::NoParent)?;
    Ok((path, key))
}

/// Check if `parent` is a strict prefix of `child`.
pub fn is_child(parent: &[String], child: &[String]) -> bool {
    parent.len() < child.len() && child.starts_with(parent)
}

/// Check if a token consists only of ASCII digits.
pub fn is_integer(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a token as a non-negative sequence position.
///
/// Leading zeros are accepted (`"01"` is position 1); signs, whitespace and
/// values that overflow `usize` are not.
pub fn parse_index(token: &str) -> Result<usize, PointerError> {
    if !is_integer(token) {
        return Err(PointerError::InvalidIndex(token.to_string()));
    }
    token
        .parse()
        .map_err(|_| PointerError::InvalidIndex(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_component() {
        assert_eq!(unescape_component("foo"), "foo");
        assert_eq!(unescape_component("a~0b~1c"), "a~b/c");
        assert_eq!(unescape_component("~01"), "~1");
        assert_eq!(unescape_component("~1~1"), "//");
    }

    #[test]
    fn test_escape_component() {
        assert_eq!(escape_component("foo"), "foo");
        assert_eq!(escape_component("a~b/c"), "a~0b~1c");
        assert_eq!(escape_component("~~"), "~0~0");
    }

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer(""), Vec::<String>::new());
        assert_eq!(parse_pointer("/"), vec![""]);
        assert_eq!(parse_pointer("/foo/bar"), vec!["foo", "bar"]);
        assert_eq!(parse_pointer("/a~0b/c~1d/1"), vec!["a~b", "c/d", "1"]);
        assert_eq!(parse_pointer("/foo///"), vec!["foo", "", "", ""]);
    }

    #[test]
    fn test_format_pointer() {
        assert_eq!(format_pointer(&[]), "");
        assert_eq!(format_pointer(&["".to_string()]), "/");
        assert_eq!(
            format_pointer(&["a~b".to_string(), "c/d".to_string()]),
            "/a~0b/c~1d"
        );
    }

    #[test]
    fn test_decompose() {
        let (parents, key) = decompose("/a/b/c").unwrap();
        assert_eq!(parents, vec!["a", "b"]);
        assert_eq!(key, "c");

        let (parents, key) = decompose("/top").unwrap();
        assert!(parents.is_empty());
        assert_eq!(key, "top");

        let (parents, key) = decompose("/").unwrap();
        assert!(parents.is_empty());
        assert_eq!(key, "");
    }

    #[test]
    fn test_decompose_rejects_relative_and_root() {
        assert_eq!(
            decompose("foo/bar"),
            Err(PointerError::MissingLeadingSlash("foo/bar".to_string()))
        );
        assert!(matches!(
            decompose(""),
            Err(PointerError::MissingLeadingSlash(_))
        ));
    }

    #[test]
    fn test_is_child() {
        let parent = vec!["foo".to_string()];
        let child = vec!["foo".to_string(), "bar".to_string()];
        let sibling = vec!["baz".to_string()];

        assert!(is_child(&parent, &child));
        assert!(!is_child(&child, &parent));
        assert!(!is_child(&parent, &sibling));
        assert!(!is_child(&parent, &parent));
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Ok(0));
        assert_eq!(parse_index("42"), Ok(42));
        assert_eq!(parse_index("007"), Ok(7));
        assert!(parse_index("-1").is_err());
        assert!(parse_index("+1").is_err());
        assert!(parse_index("1.5").is_err());
        assert!(parse_index("").is_err());
        assert!(parse_index("-").is_err());
        assert!(parse_index("99999999999999999999999999").is_err());
    }
}
