//! Schema constructors.
//!
//! Leaf factories are deliberately thin: they only fill in the kind and its
//! constraints. Options are added with the `with_*` methods on [`Schema`].
//! Algebraic operators (union, intersect, record, ...) live in
//! [`compose`](crate::compose).

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value as Json};

use crate::error::TypeError;
use crate::schema::{
    ArraySchema, BigIntBounds, ByteBounds, Codec, CodecError, CustomSchema, DateBounds,
    FunctionSchema, NumberBounds, ObjectSchema, RegExpSchema, Schema, SchemaKind,
    StringConstraints,
};
use crate::types::{Hint, LiteralValue};
use crate::value::Value;

pub fn any() -> Schema {
    Schema::new(SchemaKind::Any)
}

pub fn unknown() -> Schema {
    Schema::new(SchemaKind::Unknown)
}

pub fn never() -> Schema {
    Schema::new(SchemaKind::Never)
}

pub fn void() -> Schema {
    Schema::new(SchemaKind::Void)
}

pub fn null() -> Schema {
    Schema::new(SchemaKind::Null)
}

pub fn undefined() -> Schema {
    Schema::new(SchemaKind::Undefined)
}

pub fn boolean() -> Schema {
    Schema::new(SchemaKind::Boolean)
}

pub fn symbol() -> Schema {
    Schema::new(SchemaKind::Symbol)
}

pub fn number() -> Schema {
    number_with(NumberBounds::default())
}

pub fn number_with(bounds: NumberBounds) -> Schema {
    Schema::new(SchemaKind::Number(bounds))
}

pub fn integer() -> Schema {
    integer_with(NumberBounds::default())
}

pub fn integer_with(bounds: NumberBounds) -> Schema {
    Schema::new(SchemaKind::Integer(bounds))
}

pub fn bigint() -> Schema {
    bigint_with(BigIntBounds::default())
}

pub fn bigint_with(bounds: BigIntBounds) -> Schema {
    Schema::new(SchemaKind::BigInt(bounds))
}

pub fn string() -> Schema {
    string_with(StringConstraints::default())
}

pub fn string_with(constraints: StringConstraints) -> Schema {
    Schema::new(SchemaKind::String(constraints))
}

/// A string schema validated by a registered format.
pub fn formatted(format: impl Into<String>) -> Schema {
    string_with(StringConstraints {
        format: Some(format.into()),
        ..Default::default()
    })
}

pub fn regexp(source: impl Into<String>) -> Schema {
    regexp_with(RegExpSchema {
        source: source.into(),
        ..Default::default()
    })
}

pub fn regexp_with(schema: RegExpSchema) -> Schema {
    Schema::new(SchemaKind::RegExp(schema))
}

pub fn date() -> Schema {
    date_with(DateBounds::default())
}

pub fn date_with(bounds: DateBounds) -> Schema {
    Schema::new(SchemaKind::Date(bounds))
}

pub fn uint8array() -> Schema {
    uint8array_with(ByteBounds::default())
}

pub fn uint8array_with(bounds: ByteBounds) -> Schema {
    Schema::new(SchemaKind::Uint8Array(bounds))
}

pub fn literal(value: impl Into<LiteralValue>) -> Schema {
    Schema::new(SchemaKind::Literal(value.into()))
}

pub fn array(items: Schema) -> Schema {
    array_with(ArraySchema::new(items))
}

pub fn array_with(schema: ArraySchema) -> Schema {
    Schema::new(SchemaKind::Array(schema))
}

impl ArraySchema {
    pub fn new(items: Schema) -> Self {
        Self {
            items: Box::new(items),
            min_items: None,
            max_items: None,
            unique_items: false,
            contains: None,
            min_contains: None,
            max_contains: None,
        }
    }

    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = Some(n);
        self
    }

    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = Some(n);
        self
    }

    pub fn unique_items(mut self) -> Self {
        self.unique_items = true;
        self
    }

    pub fn contains(mut self, schema: Schema) -> Self {
        self.contains = Some(Box::new(schema));
        self
    }

    pub fn min_contains(mut self, n: usize) -> Self {
        self.min_contains = Some(n);
        self
    }

    pub fn max_contains(mut self, n: usize) -> Self {
        self.max_contains = Some(n);
        self
    }
}

/// An object schema. Properties are required unless wrapped in
/// [`optional`](crate::compose::optional).
pub fn object<I, K>(properties: I) -> Schema
where
    I: IntoIterator<Item = (K, Schema)>,
    K: Into<String>,
{
    object_with(ObjectSchema {
        properties: properties
            .into_iter()
            .map(|(key, schema)| (key.into(), schema))
            .collect(),
        ..Default::default()
    })
}

pub fn object_with(schema: ObjectSchema) -> Schema {
    Schema::new(SchemaKind::Object(schema))
}

pub fn tuple(items: Vec<Schema>) -> Schema {
    Schema::new(SchemaKind::Tuple(items))
}

pub fn not(schema: Schema) -> Schema {
    Schema::new(SchemaKind::Not(Box::new(schema)))
}

/// A `$ref` to a schema carrying `$id == id`.
pub fn reference(id: impl Into<String>) -> Schema {
    Schema::new(SchemaKind::Ref(id.into()))
}

/// The self-reference placeholder handed to [`recursive`] callbacks.
pub fn this(id: impl Into<String>) -> Schema {
    Schema::new(SchemaKind::This(id.into()))
}

pub fn promise(item: Schema) -> Schema {
    Schema::new(SchemaKind::Promise(Box::new(item)))
}

pub fn iterator(items: Schema) -> Schema {
    Schema::new(SchemaKind::Iterator(Box::new(items)))
}

pub fn async_iterator(items: Schema) -> Schema {
    Schema::new(SchemaKind::AsyncIterator(Box::new(items)))
}

pub fn function(parameters: Vec<Schema>, returns: Schema) -> Schema {
    Schema::new(SchemaKind::Function(FunctionSchema {
        parameters,
        returns: Box::new(returns),
    }))
}

pub fn constructor(parameters: Vec<Schema>, returns: Schema) -> Schema {
    Schema::new(SchemaKind::Constructor(FunctionSchema {
        parameters,
        returns: Box::new(returns),
    }))
}

/// A generic parameter slot, replaced by [`instantiate`](crate::compose::instantiate).
pub fn argument(index: usize) -> Schema {
    Schema::new(SchemaKind::Argument(index))
}

/// A user-registered kind. Checking it requires a validator in the
/// [`TypeRegistry`](crate::TypeRegistry).
pub fn custom(kind: impl Into<String>, fields: Map<String, Json>) -> Schema {
    Schema::new(SchemaKind::Custom(CustomSchema {
        kind: kind.into(),
        fields,
    }))
}

/// An enum: a union of distinct literals tagged with [`Hint::Enum`].
///
/// # Errors
///
/// Returns `TypeError::EmptyEnum` when no values are given.
pub fn enumeration<I, K, V>(items: I) -> Result<Schema, TypeError>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<LiteralValue>,
{
    let mut values: Vec<LiteralValue> = Vec::new();
    for (_, value) in items {
        let value = value.into();
        if !values.contains(&value) {
            values.push(value);
        }
    }
    if values.is_empty() {
        return Err(TypeError::EmptyEnum);
    }
    let mut schema = Schema::new(SchemaKind::Union(values.into_iter().map(literal).collect()));
    schema.hint = Some(Hint::Enum);
    Ok(schema)
}

/// Builds an enum from a JSON object of string or number members.
///
/// Numeric keys are reverse mappings of numeric members and are skipped.
///
/// # Errors
///
/// Returns `TypeError::EmptyEnum` when `item` is not an object or has no
/// members, and `TypeError::InvalidEnumValue` for members that are neither
/// strings nor numbers.
pub fn enumeration_from_json(item: &Json) -> Result<Schema, TypeError> {
    let Some(map) = item.as_object() else {
        return Err(TypeError::EmptyEnum);
    };
    let mut members: Vec<(String, LiteralValue)> = Vec::new();
    for (key, value) in map {
        if is_numeric_key(key) {
            continue;
        }
        let literal = match value {
            Json::String(s) => LiteralValue::String(s.clone()),
            Json::Number(n) => LiteralValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            _ => return Err(TypeError::InvalidEnumValue { key: key.clone() }),
        };
        members.push((key.clone(), literal));
    }
    enumeration(members)
}

/// Keys like `"0"` or `"-1.5"`. Float spellings such as `"NaN"` or `"inf"`
/// are member names.
fn is_numeric_key(key: &str) -> bool {
    let leading = key.trim_start_matches(['-', '+']).chars().next();
    matches!(leading, Some(c) if c.is_ascii_digit() || c == '.')
        && key.parse::<f64>().map_or(false, f64::is_finite)
}

static RECURSIVE_ORDINAL: AtomicUsize = AtomicUsize::new(0);

/// A self-referential schema.
///
/// `callback` receives a `This` placeholder pointing back at the result,
/// which is assigned a generated `$id` (`T0`, `T1`, ...).
pub fn recursive<F>(callback: F) -> Schema
where
    F: FnOnce(Schema) -> Schema,
{
    let id = format!("T{}", RECURSIVE_ORDINAL.fetch_add(1, Ordering::Relaxed));
    recursive_with_id(id, callback)
}

/// [`recursive`] with an explicit `$id`.
pub fn recursive_with_id<F>(id: impl Into<String>, callback: F) -> Schema
where
    F: FnOnce(Schema) -> Schema,
{
    let id = id.into();
    let mut schema = callback(this(id.clone()));
    schema.options.id = Some(id);
    schema.hint = Some(Hint::Recursive);
    schema
}

/// Starts a transform: `transform(schema).decode(..).encode(..)`.
pub fn transform(schema: Schema) -> TransformDecodeBuilder {
    TransformDecodeBuilder { schema }
}

/// First stage of the transform builder.
pub struct TransformDecodeBuilder {
    schema: Schema,
}

impl TransformDecodeBuilder {
    pub fn decode<D>(self, decode: D) -> TransformEncodeBuilder
    where
        D: Fn(Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        TransformEncodeBuilder {
            schema: self.schema,
            decode: Arc::new(decode),
        }
    }
}

/// Second stage of the transform builder.
pub struct TransformEncodeBuilder {
    schema: Schema,
    decode: Arc<dyn Fn(Value) -> Result<Value, CodecError> + Send + Sync>,
}

impl TransformEncodeBuilder {
    /// Attaches the codec. On an already transformed schema the new codec
    /// wraps the existing one: decode runs inner then outer, encode runs
    /// outer then inner.
    pub fn encode<E>(self, encode: E) -> Schema
    where
        E: Fn(Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        let mut schema = self.schema;
        let codec = match &schema.transform {
            Some(inner) => inner.wrap(self.decode, Arc::new(encode)),
            None => {
                let decode = self.decode;
                Codec::new(move |value| decode(value), encode)
            }
        };
        schema.transform = Some(codec);
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn enumeration_dedupes_values() {
        let schema = enumeration([("A", "a"), ("B", "b"), ("C", "a")]).unwrap();
        assert!(schema.is_enum());
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn enumeration_rejects_empty() {
        let items: Vec<(&str, &str)> = Vec::new();
        assert!(matches!(enumeration(items), Err(TypeError::EmptyEnum)));
        assert!(matches!(
            enumeration_from_json(&Json::Null),
            Err(TypeError::EmptyEnum)
        ));
    }

    #[test]
    fn enumeration_from_json_skips_reverse_mappings() {
        let schema = enumeration_from_json(&serde_json::json!({
            "Up": 0, "Down": 1, "0": "Up", "1": "Down"
        }))
        .unwrap();
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert_eq!(members, &vec![literal(0i64), literal(1i64)]);
    }

    #[test]
    fn enumeration_from_json_keeps_float_spellings() {
        let schema = enumeration_from_json(&serde_json::json!({
            "NaN": "nan", "inf": "inf", "A": "a", "-1.5": "A"
        }))
        .unwrap();
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert_eq!(members, &vec![literal("nan"), literal("inf"), literal("a")]);
    }

    #[test]
    fn enumeration_from_json_rejects_objects() {
        let result = enumeration_from_json(&serde_json::json!({ "A": {} }));
        assert!(matches!(result, Err(TypeError::InvalidEnumValue { key }) if key == "A"));
    }

    #[test]
    fn recursive_assigns_identity() {
        let node = recursive_with_id("Node", |this| object([("next", this)]));
        assert_eq!(node.id(), Some("Node"));
        assert_eq!(node.hint, Some(Hint::Recursive));
        let SchemaKind::Object(object) = &node.kind else {
            panic!("expected object");
        };
        assert_eq!(object.properties["next"].kind(), Kind::This);
        assert_eq!(object.properties["next"].reference(), Some("Node"));
    }

    #[test]
    fn recursive_generates_distinct_ids() {
        let a = recursive(|this| array(this));
        let b = recursive(|this| array(this));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn transform_builder_attaches_codec() {
        let schema = transform(number())
            .decode(|v| Ok(Value::String(format!("{:?}", v))))
            .encode(|_| Ok(Value::Number(1.0)));
        let codec = schema.transform.as_ref().unwrap();
        assert_eq!(codec.encode(Value::Null).unwrap(), Value::Number(1.0));
    }
}
