//! Core shared types: schema kinds, hints, literal values and the value policy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The discriminant of a schema.
///
/// Every [`Schema`](crate::Schema) carries exactly one kind; it never changes
/// after construction. `Custom` stands in for any user-registered kind, whose
/// name is available through [`Schema::kind_name`](crate::Schema::kind_name).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Any,
    Unknown,
    Never,
    Void,
    Null,
    Undefined,
    Boolean,
    Number,
    Integer,
    BigInt,
    String,
    Symbol,
    RegExp,
    Date,
    Literal,
    Array,
    Object,
    Record,
    Tuple,
    Union,
    Intersect,
    Not,
    Ref,
    This,
    Promise,
    Iterator,
    AsyncIterator,
    Function,
    Constructor,
    TemplateLiteral,
    Uint8Array,
    Computed,
    MappedKey,
    MappedResult,
    Import,
    Argument,
    Custom,
}

/// Names of all built-in kinds. Anything else is a custom kind.
pub const KNOWN_KINDS: &[&str] = &[
    "Any",
    "Unknown",
    "Never",
    "Void",
    "Null",
    "Undefined",
    "Boolean",
    "Number",
    "Integer",
    "BigInt",
    "String",
    "Symbol",
    "RegExp",
    "Date",
    "Literal",
    "Array",
    "Object",
    "Record",
    "Tuple",
    "Union",
    "Intersect",
    "Not",
    "Ref",
    "This",
    "Promise",
    "Iterator",
    "AsyncIterator",
    "Function",
    "Constructor",
    "TemplateLiteral",
    "Uint8Array",
    "Computed",
    "MappedKey",
    "MappedResult",
    "Import",
    "Argument",
];

impl Kind {
    /// Returns the canonical kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Any => "Any",
            Kind::Unknown => "Unknown",
            Kind::Never => "Never",
            Kind::Void => "Void",
            Kind::Null => "Null",
            Kind::Undefined => "Undefined",
            Kind::Boolean => "Boolean",
            Kind::Number => "Number",
            Kind::Integer => "Integer",
            Kind::BigInt => "BigInt",
            Kind::String => "String",
            Kind::Symbol => "Symbol",
            Kind::RegExp => "RegExp",
            Kind::Date => "Date",
            Kind::Literal => "Literal",
            Kind::Array => "Array",
            Kind::Object => "Object",
            Kind::Record => "Record",
            Kind::Tuple => "Tuple",
            Kind::Union => "Union",
            Kind::Intersect => "Intersect",
            Kind::Not => "Not",
            Kind::Ref => "Ref",
            Kind::This => "This",
            Kind::Promise => "Promise",
            Kind::Iterator => "Iterator",
            Kind::AsyncIterator => "AsyncIterator",
            Kind::Function => "Function",
            Kind::Constructor => "Constructor",
            Kind::TemplateLiteral => "TemplateLiteral",
            Kind::Uint8Array => "Uint8Array",
            Kind::Computed => "Computed",
            Kind::MappedKey => "MappedKey",
            Kind::MappedResult => "MappedResult",
            Kind::Import => "Import",
            Kind::Argument => "Argument",
            Kind::Custom => "Custom",
        }
    }

    /// Returns true for names in [`KNOWN_KINDS`].
    pub fn is_known(name: &str) -> bool {
        KNOWN_KINDS.contains(&name)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secondary tag refining how a schema was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    /// A union of literals built by `enumeration`. Operators treat it as atomic.
    Enum,
    /// The root of a `recursive` schema.
    Recursive,
}

/// The value carried by a `Literal` schema.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl LiteralValue {
    /// Property-key form of the literal (`1` -> `"1"`, `true` -> `"true"`).
    pub fn to_key(&self) -> String {
        match self {
            LiteralValue::String(s) => s.clone(),
            LiteralValue::Number(n) => format_number(*n),
            LiteralValue::Boolean(b) => b.to_string(),
        }
    }

    /// Wire `type` name for this literal.
    pub fn type_name(&self) -> &'static str {
        match self {
            LiteralValue::String(_) => "string",
            LiteralValue::Number(_) => "number",
            LiteralValue::Boolean(_) => "boolean",
        }
    }

    /// Returns true when `value` is exactly this literal.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (LiteralValue::String(a), Value::String(b)) => a == b,
            (LiteralValue::Number(a), Value::Number(b)) => a == b,
            (LiteralValue::Boolean(a), Value::Boolean(b)) => a == b,
            _ => false,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            LiteralValue::String(s) => Value::String(s.clone()),
            LiteralValue::Number(n) => Value::Number(*n),
            LiteralValue::Boolean(b) => Value::Boolean(*b),
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        LiteralValue::String(value.to_string())
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        LiteralValue::String(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        LiteralValue::Number(value)
    }
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        LiteralValue::Number(value as f64)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        LiteralValue::Boolean(value)
    }
}

/// Formats a number the way property keys spell it: integral values
/// drop the fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i128)
    } else if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{}", n)
    }
}

/// Edge-case semantics consulted by the value engine.
///
/// All flags default to `false`. The policy is plain data threaded through
/// every value operation via [`Context`](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Policy {
    /// An optional property that is present must satisfy its schema even
    /// when its value is `undefined`.
    pub exact_optional_property_types: bool,
    /// Arrays are accepted where objects are expected.
    pub allow_array_object: bool,
    /// `NaN` and infinities are accepted as numbers.
    pub allow_nan: bool,
    /// `null` is accepted where `void` is expected.
    pub allow_null_void: bool,
}

impl Policy {
    pub fn exact_optional_property_types(mut self, enabled: bool) -> Self {
        self.exact_optional_property_types = enabled;
        self
    }

    pub fn allow_array_object(mut self, enabled: bool) -> Self {
        self.allow_array_object = enabled;
        self
    }

    pub fn allow_nan(mut self, enabled: bool) -> Self {
        self.allow_nan = enabled;
        self
    }

    pub fn allow_null_void(mut self, enabled: bool) -> Self {
        self.allow_null_void = enabled;
        self
    }

    /// Object-like values: objects, and arrays when `allow_array_object` is set.
    pub fn is_object_like(&self, value: &Value) -> bool {
        match value {
            Value::Object(_) => true,
            Value::Array(_) => self.allow_array_object,
            _ => false,
        }
    }

    /// Record-like values. Dates and byte arrays are never records.
    pub fn is_record_like(&self, value: &Value) -> bool {
        self.is_object_like(value)
    }

    pub fn is_number_like(&self, value: f64) -> bool {
        self.allow_nan || value.is_finite()
    }

    pub fn is_void_like(&self, value: &Value) -> bool {
        match value {
            Value::Undefined => true,
            Value::Null => self.allow_null_void,
            _ => false,
        }
    }

    /// Whether an optional property must be validated.
    ///
    /// With exact optional property types any present key counts; otherwise
    /// a key holding `undefined` is treated as absent.
    pub fn is_exact_optional_property(&self, value: &Value, key: &str) -> bool {
        match value.get(key) {
            None => false,
            Some(Value::Undefined) => self.exact_optional_property_types,
            Some(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_keys() {
        assert_eq!(LiteralValue::from(1i64).to_key(), "1");
        assert_eq!(LiteralValue::from(1.5).to_key(), "1.5");
        assert_eq!(LiteralValue::from(true).to_key(), "true");
        assert_eq!(LiteralValue::from("x").to_key(), "x");
    }

    #[test]
    fn known_kinds_exclude_custom() {
        assert!(Kind::is_known("Object"));
        assert!(!Kind::is_known("Custom"));
        assert!(!Kind::is_known("Money"));
    }

    #[test]
    fn policy_defaults_reject_nan() {
        let policy = Policy::default();
        assert!(!policy.is_number_like(f64::NAN));
        assert!(policy.allow_nan(true).is_number_like(f64::INFINITY));
    }

    #[test]
    fn policy_exact_optional() {
        let value = Value::from(serde_json::json!({ "a": 1 }));
        let mut with_undefined = value.clone();
        if let Value::Object(map) = &mut with_undefined {
            map.insert("b".into(), Value::Undefined);
        }
        let loose = Policy::default();
        let exact = Policy::default().exact_optional_property_types(true);
        assert!(loose.is_exact_optional_property(&value, "a"));
        assert!(!loose.is_exact_optional_property(&with_undefined, "b"));
        assert!(exact.is_exact_optional_property(&with_undefined, "b"));
        assert!(!exact.is_exact_optional_property(&value, "b"));
    }

    #[test]
    fn policy_deserializes_camel_case() {
        let policy: Policy =
            serde_json::from_str(r#"{ "allowNan": true, "allowNullVoid": true }"#).unwrap();
        assert!(policy.allow_nan);
        assert!(policy.allow_null_void);
        assert!(!policy.allow_array_object);
    }
}
