//! Document codec: YAML in, YAML or JSON out.
//!
//! Decoding normalizes mapping keys to strings so the tree only ever deals in
//! string pointer tokens.

use serde::Serialize;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::node::key_to_string;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("error decoding YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("error encoding JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("mapping key must be a scalar, found {0}")]
    NonScalarKey(String),
    #[error("duplicate mapping key: {0}")]
    DuplicateKey(String),
}

/// Output encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Yaml,
    Json,
}

/// Decode a YAML (or JSON) document. Blank input is a null document.
pub fn decode(bytes: &[u8]) -> Result<Value, CodecError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    let value: Value = serde_yaml::from_slice(bytes)?;
    normalize_keys(value)
}

/// Encode anything serializable (usually a root [`crate::Node`]).
pub fn encode<T: Serialize + ?Sized>(value: &T, format: Format) -> Result<Vec<u8>, CodecError> {
    match format {
        Format::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
        Format::Json => {
            let mut out = serde_json::to_vec_pretty(value)?;
            out.push(b'\n');
            Ok(out)
        }
    }
}

fn normalize_keys(value: Value) -> Result<Value, CodecError> {
    match value {
        Value::Mapping(mapping) => {
            let mut out = Mapping::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = key_to_string(&k).ok_or_else(|| {
                    CodecError::NonScalarKey(crate::node::Shape::of(&k).to_string())
                })?;
                if out.contains_key(key.as_str()) {
                    return Err(CodecError::DuplicateKey(key));
                }
                out.insert(Value::String(key), normalize_keys(v)?);
            }
            Ok(Value::Mapping(out))
        }
        Value::Sequence(items) => items
            .into_iter()
            .map(normalize_keys)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Sequence),
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Ok(Value::Tagged(Box::new(TaggedValue {
                tag,
                value: normalize_keys(value)?,
            })))
        }
        scalar => Ok(scalar),
    }
}
