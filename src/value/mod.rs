//! The runtime value model and the value engine.
//!
//! A [`Value`] is an owned tree, so a value graph can never be cyclic.
//! The engine passes (`check`, `clean`, `default`, `decode`, `encode`,
//! `errors`) walk a schema graph against a value tree; each pass lives in
//! its own submodule and is reached through [`Context`](crate::Context).

pub(crate) mod check;
pub(crate) mod clean;
pub(crate) mod decode;
pub(crate) mod default;
pub(crate) mod deref;
pub(crate) mod encode;
pub(crate) mod errors;
pub(crate) mod has_transform;
pub mod hash;

use indexmap::IndexMap;
use serde_json::{Map, Number, Value as Json};

/// Insertion-ordered object map.
pub type Object = IndexMap<String, Value>;

/// A runtime value checked, cleaned, defaulted or transformed against a schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    /// A symbol with an optional description.
    Symbol(Option<String>),
    /// Milliseconds since the Unix epoch. `NaN` is an invalid date.
    Date(f64),
    Uint8Array(Vec<u8>),
    Array(Vec<Value>),
    Object(Object),
    /// Opaque host callable. `constructor` marks callables usable with `new`.
    Function { constructor: bool },
    Promise,
    Iterator,
    AsyncIterator,
}

impl Value {
    /// Creates an empty object value.
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    pub fn is_date(&self) -> bool {
        matches!(self, Value::Date(_))
    }

    /// Integral, finite number.
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_finite() && n.fract() == 0.0)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Own property lookup. Arrays expose their indices.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Own enumerable property names, in order.
    pub fn keys(&self) -> Vec<String> {
        match self {
            Value::Object(map) => map.keys().cloned().collect(),
            Value::Array(items) => (0..items.len()).map(|i| i.to_string()).collect(),
            _ => Vec::new(),
        }
    }

    /// Returns true for values whose content is not traversed
    /// (everything except arrays and objects).
    pub fn is_value_type(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Date(_) => "Date",
            Value::Uint8Array(_) => "Uint8Array",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function { .. } => "function",
            Value::Promise => "Promise",
            Value::Iterator => "Iterator",
            Value::AsyncIterator => "AsyncIterator",
        }
    }

    /// Converts to JSON.
    ///
    /// Lossy for non-JSON values: `undefined` properties are dropped (and
    /// become `null` elsewhere), big integers and symbols become strings,
    /// dates become their timestamp, byte arrays become number arrays and
    /// opaque handles become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Boolean(b) => Json::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::BigInt(n) => Json::String(n.to_string()),
            Value::String(s) => Json::String(s.clone()),
            Value::Symbol(desc) => Json::String(desc.clone().unwrap_or_default()),
            Value::Date(ms) => number_to_json(*ms),
            Value::Uint8Array(bytes) => {
                Json::Array(bytes.iter().map(|b| Json::from(*b)).collect())
            }
            Value::Array(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, value) in map {
                    if !value.is_undefined() {
                        out.insert(key.clone(), value.to_json());
                    }
                }
                Json::Object(out)
            }
            Value::Function { .. } | Value::Promise | Value::Iterator | Value::AsyncIterator => {
                Json::Null
            }
        }
    }
}

fn number_to_json(n: f64) -> Json {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 9.0e15 {
        Json::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Boolean(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        Value::from(json.clone())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}
