//! Patch operations over a [`Node`](crate::node::Node) tree.
//!
//! - `types`       — `Op`, `Patch` and `PatchError`
//! - `codec`       — decoding operations files
//! - `path_finder` — expansion of `key=value` selector paths
//! - `apply`       — the driver that turns operations into container calls

pub mod apply;
pub mod codec;
pub mod path_finder;
pub mod types;

pub use apply::{apply_op, apply_ops};
pub use codec::{decode_patch, from_yaml, from_yaml_patch};
pub use path_finder::is_extended;
pub use types::{Op, Patch, PatchError};
