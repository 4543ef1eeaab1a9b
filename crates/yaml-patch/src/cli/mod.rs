//! Core logic behind the `yaml-patch` binary.
//!
//! The binary only parses arguments and does I/O; everything between the raw
//! bytes of stdin and the bytes written to stdout happens in [`run`].

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::codec::{self, CodecError, Format};
use crate::node::Node;
use crate::patch::{decode_patch, Patch, PatchError};
use crate::placeholder::{PlaceholderError, PlaceholderWrapper};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("error reading opsfile {path}: {source}")]
    ReadOpsFile { path: PathBuf, source: io::Error },
    #[error("error decoding opsfile {name}: {source}")]
    DecodeOps { name: String, source: PatchError },
    #[error("error decoding document: {0}")]
    DecodeDoc(#[source] CodecError),
    #[error("error applying patch from {name}: {source}")]
    Apply { name: String, source: PatchError },
    #[error("error encoding document: {0}")]
    Encode(#[source] CodecError),
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),
}

// ── Options ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub placeholder_left: String,
    pub placeholder_right: String,
    pub output: Format,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            placeholder_left: "{{".to_string(),
            placeholder_right: "}}".to_string(),
            output: Format::Yaml,
        }
    }
}

/// The raw contents of one operations file and the name it is reported by.
#[derive(Debug, Clone)]
pub struct OpsSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl OpsSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        OpsSource {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self, CliError> {
        let bytes = std::fs::read(path).map_err(|source| CliError::ReadOpsFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(OpsSource::new(path.display().to_string(), bytes))
    }
}

/// Read every operations file, in order.
pub fn load_ops_files(paths: &[PathBuf]) -> Result<Vec<OpsSource>, CliError> {
    paths.iter().map(|p| OpsSource::read(p)).collect()
}

// ── yaml-patch ────────────────────────────────────────────────────────────

/// Apply every operations file to `doc`, in order, and encode the result.
///
/// All operations files are decoded before the document is touched, so a
/// malformed file fails the run without any patch being applied. Placeholders
/// are protected on the way in and restored on the way out.
pub fn run(doc: &[u8], ops: &[OpsSource], options: &Options) -> Result<Vec<u8>, CliError> {
    let placeholders =
        PlaceholderWrapper::new(&options.placeholder_left, &options.placeholder_right)?;

    let patches = ops
        .iter()
        .map(|source| {
            decode_patch(&placeholders.wrap(&source.bytes))
                .map(|patch| (source.name.as_str(), patch))
                .map_err(|source_err| CliError::DecodeOps {
                    name: source.name.clone(),
                    source: source_err,
                })
        })
        .collect::<Result<Vec<(&str, Patch)>, _>>()?;

    let value = codec::decode(&placeholders.wrap(doc)).map_err(CliError::DecodeDoc)?;
    let mut root = Node::wrap(value);

    for (name, patch) in &patches {
        info!(opsfile = %name, ops = patch.len(), "applying patch");
        patch.apply_to(&mut root).map_err(|source| CliError::Apply {
            name: name.to_string(),
            source,
        })?;
    }

    let out = codec::encode(&root, options.output).map_err(CliError::Encode)?;
    Ok(placeholders.unwrap(&out).into_owned())
}

// ── Tests ─────────────────────────────────────────────────────────────────
