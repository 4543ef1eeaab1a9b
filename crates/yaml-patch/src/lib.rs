//! yaml-patch — pointer-addressed patches for YAML documents.
//!
//! A document is decoded into a lazy [`Node`] tree. Containers are only
//! materialized along the paths an operation touches; everything else is
//! carried through as the decoded value and re-emitted unchanged.
//!
//! ```
//! use yaml_patch::patch::decode_patch;
//!
//! let patch = decode_patch(b"- {op: add, path: /tags/-, value: beta}").unwrap();
//! let out = patch.apply(b"tags: [alpha]\n").unwrap();
//! assert_eq!(out, b"tags:\n- alpha\n- beta\n");
//! ```

pub mod cli;
pub mod codec;
pub mod node;
pub mod patch;
pub mod placeholder;

pub use codec::{CodecError, Format};
pub use node::{Container, Node, NodeError, NodeKind, NodeMap, NodeSlice, Shape};
pub use patch::{Op, Patch, PatchError};
pub use placeholder::{PlaceholderError, PlaceholderWrapper};
