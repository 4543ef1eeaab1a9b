//! YAML codec for patch operations.
//!
//! An operations file is a YAML sequence of mappings:
//!
//! ```yaml
//! - op: replace
//!   path: /spec/replicas
//!   value: 3
//! - op: move
//!   from: /metadata/labels/old
//!   path: /metadata/labels/new
//! ```

use serde_yaml::{Mapping, Value};

use crate::codec;
use crate::patch::types::{Op, Patch, PatchError};

// ── Field helpers ─────────────────────────────────────────────────────────

fn get_str(map: &Mapping, field: &str) -> Result<String, PatchError> {
    match map.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(PatchError::InvalidOp(format!("{field} must be a string"))),
        None => Err(PatchError::InvalidOp(format!("missing {field}"))),
    }
}

fn get_value(map: &Mapping, op: &str) -> Result<Value, PatchError> {
    map.get("value")
        .cloned()
        .ok_or_else(|| PatchError::InvalidOp(format!("{op} operation requires a value")))
}

// ── Deserialization ───────────────────────────────────────────────────────

/// Decode one operation from its YAML form.
pub fn from_yaml(v: &Value) -> Result<Op, PatchError> {
    let map = v
        .as_mapping()
        .ok_or_else(|| PatchError::InvalidOp("operation must be a mapping".into()))?;
    let op = get_str(map, "op")?;
    let path = get_str(map, "path")?;
    match op.as_str() {
        "add" => Ok(Op::Add {
            value: get_value(map, "add")?,
            path,
        }),
        "remove" => Ok(Op::Remove { path }),
        "replace" => Ok(Op::Replace {
            value: get_value(map, "replace")?,
            path,
        }),
        "move" => Ok(Op::Move {
            from: get_str(map, "from")?,
            path,
        }),
        "copy" => Ok(Op::Copy {
            from: get_str(map, "from")?,
            path,
        }),
        "test" => Ok(Op::Test {
            value: map.get("value").cloned(),
            path,
        }),
        other => Err(PatchError::UnknownOp(other.to_string())),
    }
}

/// Decode a list of operations.
pub fn from_yaml_patch(v: &Value) -> Result<Patch, PatchError> {
    match v {
        Value::Null => Ok(Patch::default()),
        Value::Sequence(items) => items
            .iter()
            .map(from_yaml)
            .collect::<Result<Vec<_>, _>>()
            .map(Patch::new),
        _ => Err(PatchError::InvalidOp("patch must be a sequence".into())),
    }
}

/// Decode an operations file.
pub fn decode_patch(bytes: &[u8]) -> Result<Patch, PatchError> {
    let v = codec::decode(bytes)?;
    from_yaml_patch(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(s: &str) -> Result<Patch, PatchError> {
        decode_patch(s.as_bytes())
    }

    #[test]
    fn decodes_every_kind() {
        let patch = decode(
            r#"
- op: add
  path: /a
  value: {b: 1}
- op: remove
  path: /c
- op: replace
  path: /d/0
  value: x
- op: move
  from: /e
  path: /f
- op: copy
  from: /g
  path: /h
- op: test
  path: /i
  value: 3
- op: test
  path: /j
"#,
        )
        .unwrap();
        assert_eq!(patch.len(), 7);
        assert_eq!(
            patch.ops[0],
            Op::Add {
                path: "/a".into(),
                value: serde_yaml::from_str("{b: 1}").unwrap()
            }
        );
        assert_eq!(patch.ops[1], Op::Remove { path: "/c".into() });
        assert_eq!(
            patch.ops[3],
            Op::Move {
                from: "/e".into(),
                path: "/f".into()
            }
        );
        assert_eq!(
            patch.ops[6],
            Op::Test {
                path: "/j".into(),
                value: None
            }
        );
    }

    #[test]
    fn explicit_null_value_is_kept() {
        let patch = decode("- {op: add, path: /a, value: null}").unwrap();
        assert_eq!(
            patch.ops[0],
            Op::Add {
                path: "/a".into(),
                value: Value::Null
            }
        );
    }

    #[test]
    fn empty_file_is_empty_patch() {
        assert!(decode("").unwrap().is_empty());
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_operations() {
        assert!(matches!(
            decode("- {op: frobnicate, path: /a}"),
            Err(PatchError::UnknownOp(ref op)) if op == "frobnicate"
        ));
        assert!(matches!(
            decode("- {op: add, path: /a}"),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            decode("- {op: move, path: /a}"),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            decode("- {op: remove}"),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            decode("- {op: remove, path: 3}"),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(
            decode("op: add"),
            Err(PatchError::InvalidOp(_))
        ));
        assert!(matches!(decode("- [1, 2]"), Err(PatchError::InvalidOp(_))));
        assert!(matches!(decode("- {op: ["), Err(PatchError::Codec(_))));
    }
}
