//! Validation helper functions for configuration types.

use std::path::Path;

use crate::core::errors::{Result, ShardMergeError};

/// Validate that a value is a bare file name (non-empty, no path separators).
pub fn validate_file_name(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShardMergeError::validation(
            format!("{} must not be empty", field),
            field,
        ));
    }
    if value.contains('/') || value.contains('\\') {
        return Err(ShardMergeError::validation(
            format!("{} must be a file name, not a path (got {:?})", field, value),
            field,
        ));
    }
    Ok(())
}

/// Validate that a path is not empty.
pub fn validate_non_empty_path(value: &Path, field: &str) -> Result<()> {
    if value.as_os_str().is_empty() {
        return Err(ShardMergeError::validation(
            format!("{} must not be empty", field),
            field,
        ));
    }
    Ok(())
}

/// Validate that a usize value does not exceed `max`.
pub fn validate_max_usize(value: usize, max: usize, field: &str) -> Result<()> {
    if value > max {
        return Err(ShardMergeError::validation(
            format!("{} must be at most {}", field, max),
            field,
        ));
    }
    Ok(())
}
