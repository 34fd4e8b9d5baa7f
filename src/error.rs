//! Error types for schema construction and value operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::{CodecError, Schema};
use crate::value::Value;

/// Errors raised while constructing or deriving schemas.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("cannot intersect transform types")]
    IntersectTransform,

    #[error("enum requires at least one value")]
    EmptyEnum,

    #[error("invalid enum value at '{key}': expected string or number")]
    InvalidEnumValue { key: String },

    #[error("unexpected kind '{kind}' in template literal")]
    TemplateLiteralKind { kind: String },

    #[error("template literal parse error: {message}")]
    TemplateLiteralParse { message: String },

    #[error("template literal expands to more than {limit} strings")]
    TemplateLiteralExpansion { limit: usize },

    #[error("unable to dereference schema with $id '{reference}'")]
    Dereference { reference: String },

    #[error("module has no definition named '{key}'")]
    UnknownImport { key: String },

    #[error("invalid schema at {path}: {message}")]
    InvalidSchema { path: String, message: String },
}

/// Errors raised by the value engine.
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("unknown schema kind '{}'", .schema.kind_name())]
    UnknownKind { schema: Box<Schema> },

    #[error("unable to dereference schema with $id '{reference}'")]
    Dereference { reference: String },

    #[error("invalid regular expression '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unable to decode value at '{path}': {source}")]
    TransformDecode {
        schema: Box<Schema>,
        path: String,
        value: Value,
        #[source]
        source: CodecError,
    },

    #[error("unable to encode value at '{path}': {source}")]
    TransformEncode {
        schema: Box<Schema>,
        path: String,
        value: Value,
        #[source]
        source: CodecError,
    },

    #[error("unable to decode value as it does not match the expected schema: {}", first(.violations))]
    DecodeCheck { violations: Vec<Violation> },

    #[error("unable to encode value as it does not match the expected schema: {}", first(.violations))]
    EncodeCheck { violations: Vec<Violation> },

    #[error("value does not match the expected schema: {}", first(.violations))]
    Assert { violations: Vec<Violation> },
}

impl ValueError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValueError::DecodeCheck { .. }
            | ValueError::EncodeCheck { .. }
            | ValueError::Assert { .. }
            | ValueError::TransformDecode { .. }
            | ValueError::TransformEncode { .. } => 1,
            _ => 2,
        }
    }

    /// Violations carried by check failures.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValueError::DecodeCheck { violations }
            | ValueError::EncodeCheck { violations }
            | ValueError::Assert { violations } => violations,
            _ => &[],
        }
    }
}

fn first(violations: &[Violation]) -> String {
    violations
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "no violations reported".to_string())
}

/// Errors loading schema or value documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Schema(#[from] TypeError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

/// A single structural failure with path context.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Violation {
    /// JSON Pointer (RFC 6901) to the offending value.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::string;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::Schema(TypeError::EmptyEnum);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn value_error_exit_codes() {
        let err = ValueError::Assert {
            violations: vec![Violation {
                path: "/x".into(),
                message: "expected number".into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValueError::Dereference {
            reference: "T".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn unknown_kind_names_schema() {
        let err = ValueError::UnknownKind {
            schema: Box::new(string()),
        };
        assert_eq!(err.to_string(), "unknown schema kind 'String'");
    }

    #[test]
    fn violation_display() {
        let violation = Violation {
            path: "/buyer/email".into(),
            message: "expected string".into(),
        };
        assert_eq!(violation.to_string(), "/buyer/email: expected string");

        let root = Violation {
            path: String::new(),
            message: "expected object".into(),
        };
        assert_eq!(root.to_string(), "(root): expected object");
    }

    #[test]
    fn assert_error_reports_first_violation() {
        let err = ValueError::Assert {
            violations: vec![Violation {
                path: "/x".into(),
                message: "expected number".into(),
            }],
        };
        assert_eq!(
            err.to_string(),
            "value does not match the expected schema: /x: expected number"
        );
    }
}
