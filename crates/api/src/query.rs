//! Helpers for required query and body parameters.
//!
//! Scope keys arrive as `Option`s so a missing key is answered with a 400 and
//! a readable message rather than a deserialization rejection.

use crate::error::{AppError, AppResult};

/// Unwrap a required parameter or fail with `"{name} is required"`.
pub fn require<T>(value: Option<T>, name: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
}

/// Like [`require`], but also rejects blank strings.
pub fn require_text(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(AppError::BadRequest(format!("{name} is required"))),
    }
}
