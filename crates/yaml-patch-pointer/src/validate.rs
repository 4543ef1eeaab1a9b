//! Size limits on pointers, checked before a pointer is walked.

use thiserror::Error;

/// Longest accepted pointer string, in bytes.
pub const MAX_POINTER_LENGTH: usize = 1024;

/// Deepest accepted path, in tokens.
pub const MAX_PATH_LENGTH: usize = 256;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("pointer must be empty or start with '/'")]
    PointerInvalid,
    #[error("pointer longer than 1024 bytes")]
    PointerTooLong,
    #[error("path deeper than 256 steps")]
    PathTooLong,
}

/// Validate a pointer string.
///
/// # Errors
///
/// - the pointer is non-empty but doesn't start with `/`
/// - the pointer exceeds the maximum length
///
/// ```
/// use yaml_patch_pointer::validate_pointer;
///
/// validate_pointer("").unwrap();
/// validate_pointer("/foo/bar").unwrap();
/// validate_pointer("foo").unwrap_err();
/// ```
pub fn validate_pointer(pointer: &str) -> Result<(), ValidationError> {
    if pointer.is_empty() {
        return Ok(());
    }
    if !pointer.starts_with('/') {
        return Err(ValidationError::PointerInvalid);
    }
    if pointer.len() > MAX_POINTER_LENGTH {
        return Err(ValidationError::PointerTooLong);
    }
    Ok(())
}

/// Validate a parsed path.
pub fn validate_path(path: &[String]) -> Result<(), ValidationError> {
    if path.len() > MAX_PATH_LENGTH {
        return Err(ValidationError::PathTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_absolute_pointer() {
        assert!(validate_pointer("").is_ok());
        assert!(validate_pointer("/").is_ok());
        assert!(validate_pointer("/foo/bar").is_ok());
    }

    #[test]
    fn test_validate_relative_pointer() {
        assert_eq!(validate_pointer("foo"), Err(ValidationError::PointerInvalid));
    }

    #[test]
    fn test_validate_long_pointer() {
        let at_limit = "/".to_string() + &"a".repeat(MAX_POINTER_LENGTH - 1);
        assert!(validate_pointer(&at_limit).is_ok());
        let over = at_limit + "a";
        assert_eq!(validate_pointer(&over), Err(ValidationError::PointerTooLong));
        assert_eq!(
            ValidationError::PointerTooLong.to_string(),
            "pointer longer than 1024 bytes"
        );
    }

    #[test]
    fn test_validate_path_depth() {
        let ok: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        assert!(validate_path(&ok).is_ok());
        let deep: Vec<String> = (0..300).map(|i| i.to_string()).collect();
        assert_eq!(validate_path(&deep), Err(ValidationError::PathTooLong));
    }
}
