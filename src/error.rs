//! Error taxonomy.
//!
//! Fatal conditions abort the current operation and surface as [`Error`].
//! Recoverable validation failures accumulate as [`ValidationError`] records
//! and are reported through `Distiller::get_errors`; they never halt a
//! validation pass.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Fatal failure raised by the distiller or one of its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The pattern cannot be compiled to a path matcher.
    #[error("malformed pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    /// No extractor can service the given request.
    #[error("no extractor supports the given request")]
    UnsupportedRequest,

    /// `get_data` was called but the request did not pass validation.
    #[error("the request did not pass validation")]
    InvalidRequest,
}

/// One reportable validation failure.
///
/// Errors are accumulated in encounter order and never deduplicated; a single
/// field can produce several records when more than one validator rejects it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    /// Dot-joined path of the offending field.
    pub field: String,
    /// Human-readable failure message from the validator.
    pub message: String,
    /// Name of the validator that rejected the value.
    pub validator: &'static str,
    /// The value the validator saw.
    pub value: Value,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_display() {
        let error = ValidationError {
            field: "user.email".to_string(),
            message: "Value is required and can't be empty".to_string(),
            validator: "NotEmpty",
            value: Value::Null,
        };
        assert_eq!(
            format!("{error}"),
            "user.email: Value is required and can't be empty"
        );
    }

    #[test]
    fn fatal_error_display() {
        let error = Error::Pattern {
            pattern: "a.{".to_string(),
            reason: "unbalanced braces".to_string(),
        };
        assert_eq!(format!("{error}"), "malformed pattern `a.{`: unbalanced braces");
    }
}
