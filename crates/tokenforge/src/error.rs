//! Error types for token import.
//!
//! Only the top-level entry points fail hard. Individual extractors degrade
//! to empty results instead of returning these errors.

use thiserror::Error;

/// Errors returned by the top-level import entry points.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input text is not valid JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The input parsed, but the top-level value is not an object.
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead (`array`, `string`, ...).
        found: &'static str,
    },

    /// Every source was read but none of them produced a token.
    #[error("no design tokens found in the provided sources")]
    NoTokens,
}

/// Errors that can occur when loading [`ImportOptions`](crate::ImportOptions).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid YAML or has unknown fields.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_yaml::Error),
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Names the kind of a JSON value for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

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
    fn test_not_an_object_display() {
        let err = ImportError::NotAnObject { found: "array" };
        let msg = err.to_string();
        assert!(msg.contains("object"));
        assert!(msg.contains("array"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ invalid").unwrap_err();
        let err: ImportError = json_err.into();
        assert!(matches!(err, ImportError::InvalidJson(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn test_json_kind() {
        assert_eq!(json_kind(&serde_json::json!([1])), "array");
        assert_eq!(json_kind(&serde_json::json!("x")), "string");
        assert_eq!(json_kind(&serde_json::json!({})), "object");
    }
}
