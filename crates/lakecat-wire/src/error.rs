//! Error types for wire-format encoding and decoding.
//!
//! All failures are synchronous and surface at the point of construction
//! or decode. Unknown wire keys are never an error; they are ignored to
//! allow additive wire-format evolution.

use serde_json::Value;
use thiserror::Error;

/// Result type alias for wire operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors raised while building schemas, constructing records, or
/// converting to and from the wire format.
#[derive(Debug, Error)]
pub enum WireError {
    /// A required field was absent at construction or decode time.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Internal name of the missing field.
        field: String,
    },

    /// A supplied or decoded value does not match the field's declared kind.
    #[error("type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Internal name of the offending field.
        field: String,
        /// The kind the field descriptor declares.
        expected: &'static str,
        /// Description of the value actually seen.
        actual: String,
    },

    /// A discriminated wire dict lacks its discriminator key.
    #[error("missing discriminator key: {alias}")]
    MissingDiscriminator {
        /// Wire alias of the discriminator field.
        alias: String,
    },

    /// The discriminator key is present but its value maps to no variant.
    #[error("unknown discriminator value for {alias}: {value}")]
    UnknownDiscriminatorValue {
        /// Wire alias of the discriminator field.
        alias: String,
        /// The unmapped value.
        value: String,
    },

    /// A schema or discriminator map violated a build-time invariant.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// Description of the violated invariant.
        message: String,
    },

    /// JSON text could not be parsed or serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WireError {
    /// Creates a missing-required-field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.into(),
        }
    }

    /// Creates a type-mismatch error.
    #[must_use]
    pub fn type_mismatch(
        field: impl Into<String>,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual: actual.into(),
        }
    }

    /// Creates a missing-discriminator error.
    #[must_use]
    pub fn missing_discriminator(alias: impl Into<String>) -> Self {
        Self::MissingDiscriminator {
            alias: alias.into(),
        }
    }

    /// Creates an unknown-discriminator-value error.
    #[must_use]
    pub fn unknown_discriminator(alias: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownDiscriminatorValue {
            alias: alias.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid-schema error.
    #[must_use]
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }
}

/// Returns a short name for a JSON value's type, for error messages.
#[must_use]
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = WireError::missing_field("file_path");
        assert_eq!(err.to_string(), "missing required field: file_path");

        let err = WireError::type_mismatch("spec_id", "integer", "string");
        assert_eq!(
            err.to_string(),
            "type mismatch for field spec_id: expected integer, got string"
        );

        let err = WireError::unknown_discriminator("content", "unknown-kind");
        assert_eq!(
            err.to_string(),
            "unknown discriminator value for content: unknown-kind"
        );
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&Value::Null), "null");
        assert_eq!(json_kind(&serde_json::json!(42)), "number");
        assert_eq!(json_kind(&serde_json::json!("x")), "string");
        assert_eq!(json_kind(&serde_json::json!([1, 2])), "array");
        assert_eq!(json_kind(&serde_json::json!({"a": 1})), "object");
    }
}
