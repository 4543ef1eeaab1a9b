//! Type definitions for pointer paths.

use crate::{parse_index, PointerError, APPEND_TOKEN};

/// A step in a pointer path: a mapping key or a sequence index, always
/// string-shaped.
pub type PathStep = String;

/// A pointer path.
pub type Path = Vec<PathStep>;

/// A token interpreted against a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexToken {
    /// `-`, one past the last element.
    Append,
    Position(usize),
}

impl IndexToken {
    /// Parse a token, accepting `-` as [`IndexToken::Append`].
    pub fn parse(token: &str) -> Result<Self, PointerError> {
        if token == APPEND_TOKEN {
            return Ok(IndexToken::Append);
        }
        parse_index(token).map(IndexToken::Position)
    }

    /// Resolve against a sequence of length `len`.
    pub fn resolve(self, len: usize) -> usize {
        match self {
            IndexToken::Append => len,
            IndexToken::Position(i) => i,
        }
    }
}
