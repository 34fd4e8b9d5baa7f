//! Typecraft
//!
//! Runtime schema construction, composition, validation and value
//! transformation.
//!
//! Schemas are plain data built with the constructors in [`build`] and
//! derived with the algebraic operators in [`compose`]. A [`Context`] checks,
//! cleans, defaults, decodes and encodes [`Value`]s against them. Schemas
//! serialize to a JSON Schema superset (see [`Schema::to_json`]).
//!
//! # Example
//!
//! ```
//! use typecraft::build::{number, object, string};
//! use typecraft::compose::{optional, partial};
//! use typecraft::{check, errors, Value};
//! use serde_json::json;
//!
//! let user = object([
//!     ("id", number()),
//!     ("name", string()),
//!     ("email", optional(&string())),
//! ]);
//!
//! let value = Value::from(json!({ "id": 1, "name": "ada" }));
//! assert!(check(&user, &[], &value).unwrap());
//!
//! let missing = Value::from(json!({ "id": 1 }));
//! let violations = errors(&user, &[], &missing).unwrap();
//! assert_eq!(violations[0].path, "/name");
//!
//! // Every property of a partial object is optional.
//! assert!(check(&partial(&user), &[], &Value::from(json!({}))).unwrap());
//! ```
//!
//! # Value operations
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`check`] | `true` if the value matches |
//! | [`errors`] | every violation with a JSON pointer |
//! | [`clean`] | drops properties the schema does not describe |
//! | [`default`] | fills in `default` annotations |
//! | [`decode`] / [`encode`] | runs transform codecs, checking the encoded side |
//! | [`parse`] | clean, default, assert, then decode |
//!
//! Free functions use a default [`Context`]; build a context to change the
//! [`Policy`] or register custom kinds and string formats.

pub mod build;
pub mod compose;
mod error;
mod linter;
mod loader;
pub mod pattern;
mod registry;
mod resolver;
mod schema;
mod types;
mod validator;
mod value;
mod wire;

pub use error::{LoadError, TypeError, ValueError, Violation};
pub use linter::{
    is_schema, lint, lint_file, lint_schema, Diagnostic, FileResult, FileStatus, LintResult,
    Severity,
};
pub use loader::{
    load_json, load_json_str, load_policy, load_schema, load_schema_str, load_value,
};
pub use registry::{Context, FormatRegistry, TypeRegistry};
pub use resolver::Module;
pub use schema::{
    AdditionalProperties, ArraySchema, BigIntBounds, ByteBounds, Codec, CodecError,
    ComputedSchema, CustomSchema, DateBounds, DefaultValue, FunctionSchema, ImportSchema,
    IntersectSchema, NumberBounds, ObjectSchema, RecordSchema, RegExpSchema, Schema, SchemaKind,
    SchemaOptions, StringConstraints,
};
pub use types::{Hint, Kind, LiteralValue, Policy, KNOWN_KINDS};
pub use validator::{
    assert, check, clean, decode, default, encode, errors, has_transform, parse,
};
pub use value::hash::hash;
pub use value::{Object, Value};
pub use wire::{TYPE_NAMES, X_KIND};
