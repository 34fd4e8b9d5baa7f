//! Loading schema, value and policy documents.
//!
//! Handles reading JSON from files and strings and converting it into
//! [`Schema`], [`Value`] and [`Policy`].

use std::path::Path;

use serde_json::Value as Json;

use crate::error::LoadError;
use crate::schema::Schema;
use crate::types::Policy;
use crate::value::Value;

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_json(path: &Path) -> Result<Json, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_json_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_json_str(content: &str) -> Result<Json, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a wire-form schema from a file path.
///
/// # Errors
///
/// Returns the errors of [`load_json`], or `LoadError::Schema` if the
/// document is not a well-formed schema.
pub fn load_schema(path: &Path) -> Result<Schema, LoadError> {
    let json = load_json(path)?;
    Ok(Schema::from_json(&json)?)
}

/// Load a wire-form schema from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` or `LoadError::Schema`.
pub fn load_schema_str(content: &str) -> Result<Schema, LoadError> {
    let json = load_json_str(content)?;
    Ok(Schema::from_json(&json)?)
}

/// Load a value document from a file path.
///
/// # Errors
///
/// Returns the errors of [`load_json`].
pub fn load_value(path: &Path) -> Result<Value, LoadError> {
    load_json(path).map(Value::from)
}

/// Load a [`Policy`] from a JSON file with camelCase flags.
///
/// Missing flags keep their defaults.
///
/// # Errors
///
/// Returns the errors of [`load_json`], or `LoadError::InvalidJson` if the
/// document does not describe a policy.
pub fn load_policy(path: &Path) -> Result<Policy, LoadError> {
    let json = load_json(path)?;
    serde_json::from_value(json).map_err(|source| LoadError::InvalidJson { source })
}
