//! Public value operations.
//!
//! Every operation is a method on [`Context`]; the free functions of the
//! same name run against a process-wide default context (default policy,
//! empty registries).

use once_cell::sync::Lazy;

use crate::error::{ValueError, Violation};
use crate::registry::Context;
use crate::schema::Schema;
use crate::value::{check, clean, decode, default, encode, errors, has_transform as scan, Value};

static DEFAULT: Lazy<Context> = Lazy::new(Context::new);

fn scope(references: &[Schema]) -> Vec<&Schema> {
    references.iter().collect()
}

impl Context {
    /// Returns true if `value` satisfies `schema`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError` if the schema graph cannot be walked (unknown
    /// kind, unresolvable `$ref`, invalid pattern).
    pub fn check(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        check::check(self, schema, &scope(references), value)
    }

    /// Collects every structural failure of `value` against `schema`.
    ///
    /// # Errors
    ///
    /// Same as [`Context::check`].
    pub fn errors(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: &Value,
    ) -> Result<Vec<Violation>, ValueError> {
        errors::errors(self, schema, &scope(references), value)
    }

    /// Checks `value`, failing with the collected violations.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Assert` if the value does not match.
    pub fn assert(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: &Value,
    ) -> Result<(), ValueError> {
        let references = scope(references);
        if check::check(self, schema, &references, value)? {
            return Ok(());
        }
        let violations = errors::errors(self, schema, &references, value)?;
        Err(ValueError::Assert { violations })
    }

    /// Removes properties and elements not described by `schema`.
    ///
    /// # Errors
    ///
    /// Same as [`Context::check`].
    pub fn clean(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: Value,
    ) -> Result<Value, ValueError> {
        clean::clean(self, schema, &scope(references), value)
    }

    /// Fills in `default` annotations where `value` is missing data.
    ///
    /// # Errors
    ///
    /// Same as [`Context::check`].
    pub fn default_value(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: Value,
    ) -> Result<Value, ValueError> {
        default::default(self, schema, &scope(references), value)
    }

    /// Checks an encoded value and runs every decode codec over it.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::DecodeCheck` if the input does not match the
    /// schema, or `ValueError::TransformDecode` if a codec fails.
    pub fn decode(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: Value,
    ) -> Result<Value, ValueError> {
        let references = scope(references);
        if !check::check(self, schema, &references, &value)? {
            let violations = errors::errors(self, schema, &references, &value)?;
            return Err(ValueError::DecodeCheck { violations });
        }
        if !scan::has_transform(schema, &references)? {
            return Ok(value);
        }
        decode::decode(self, schema, &references, "", value)
    }

    /// Runs every encode codec over a decoded value and checks the result.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::TransformEncode` if a codec fails, or
    /// `ValueError::EncodeCheck` if the encoded value does not match.
    pub fn encode(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: Value,
    ) -> Result<Value, ValueError> {
        let references = scope(references);
        let encoded = if scan::has_transform(schema, &references)? {
            encode::encode(self, schema, &references, "", value)?
        } else {
            value
        };
        if !check::check(self, schema, &references, &encoded)? {
            let violations = errors::errors(self, schema, &references, &encoded)?;
            return Err(ValueError::EncodeCheck { violations });
        }
        Ok(encoded)
    }

    /// Runs the full input pipeline on a copy of `value`: clean, default,
    /// assert, then decode.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::Assert` if the cleaned and defaulted value does
    /// not match, or any error of [`Context::decode`].
    pub fn parse(
        &self,
        schema: &Schema,
        references: &[Schema],
        value: &Value,
    ) -> Result<Value, ValueError> {
        let cleaned = self.clean(schema, references, value.clone())?;
        let defaulted = self.default_value(schema, references, cleaned)?;
        self.assert(schema, references, &defaulted)?;
        self.decode(schema, references, defaulted)
    }
}

/// [`Context::check`] with the default context.
///
/// # Errors
///
/// See [`Context::check`].
pub fn check(schema: &Schema, references: &[Schema], value: &Value) -> Result<bool, ValueError> {
    DEFAULT.check(schema, references, value)
}

/// [`Context::errors`] with the default context.
///
/// # Errors
///
/// See [`Context::errors`].
pub fn errors(
    schema: &Schema,
    references: &[Schema],
    value: &Value,
) -> Result<Vec<Violation>, ValueError> {
    DEFAULT.errors(schema, references, value)
}

/// [`Context::assert`] with the default context.
///
/// # Errors
///
/// See [`Context::assert`].
pub fn assert(schema: &Schema, references: &[Schema], value: &Value) -> Result<(), ValueError> {
    DEFAULT.assert(schema, references, value)
}

/// [`Context::clean`] with the default context.
///
/// # Errors
///
/// See [`Context::clean`].
pub fn clean(schema: &Schema, references: &[Schema], value: Value) -> Result<Value, ValueError> {
    DEFAULT.clean(schema, references, value)
}

/// [`Context::default_value`] with the default context.
///
/// # Errors
///
/// See [`Context::default_value`].
pub fn default(schema: &Schema, references: &[Schema], value: Value) -> Result<Value, ValueError> {
    DEFAULT.default_value(schema, references, value)
}

/// [`Context::decode`] with the default context.
///
/// # Errors
///
/// See [`Context::decode`].
pub fn decode(schema: &Schema, references: &[Schema], value: Value) -> Result<Value, ValueError> {
    DEFAULT.decode(schema, references, value)
}

/// [`Context::encode`] with the default context.
///
/// # Errors
///
/// See [`Context::encode`].
pub fn encode(schema: &Schema, references: &[Schema], value: Value) -> Result<Value, ValueError> {
    DEFAULT.encode(schema, references, value)
}

/// [`Context::parse`] with the default context.
///
/// # Errors
///
/// See [`Context::parse`].
pub fn parse(schema: &Schema, references: &[Schema], value: &Value) -> Result<Value, ValueError> {
    DEFAULT.parse(schema, references, value)
}

/// Returns true if any schema reachable from `schema` carries a codec.
///
/// # Errors
///
/// Returns `ValueError::Dereference` if a reachable `$ref` has no target.
pub fn has_transform(schema: &Schema, references: &[Schema]) -> Result<bool, ValueError> {
    scan::has_transform(schema, &scope(references))
}
