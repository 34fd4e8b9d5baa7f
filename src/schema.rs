//! The schema data model.
//!
//! A [`Schema`] is plain data: a [`SchemaKind`] with its structural fields,
//! the common [`SchemaOptions`], and the modifier markers (optional,
//! readonly, hint, transform codec). Operators never mutate a schema they
//! receive; they clone and build a new one.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value as Json};

use crate::types::{Hint, Kind, LiteralValue};
use crate::value::Value;

/// Error returned by user codec functions.
pub type CodecError = Box<dyn std::error::Error + Send + Sync>;

type CodecFn = dyn Fn(Value) -> Result<Value, CodecError> + Send + Sync;
type FactoryFn = dyn Fn() -> Value + Send + Sync;

/// A paired decode/encode function attached to a schema.
#[derive(Clone)]
pub struct Codec {
    decode: Arc<CodecFn>,
    encode: Arc<CodecFn>,
}

impl Codec {
    pub fn new<D, E>(decode: D, encode: E) -> Self
    where
        D: Fn(Value) -> Result<Value, CodecError> + Send + Sync + 'static,
        E: Fn(Value) -> Result<Value, CodecError> + Send + Sync + 'static,
    {
        Self {
            decode: Arc::new(decode),
            encode: Arc::new(encode),
        }
    }

    pub fn decode(&self, value: Value) -> Result<Value, CodecError> {
        (self.decode)(value)
    }

    pub fn encode(&self, value: Value) -> Result<Value, CodecError> {
        (self.encode)(value)
    }

    /// Layers an outer codec over this one.
    ///
    /// Decoding runs this codec first and `decode` second; encoding runs
    /// `encode` first and this codec second.
    pub(crate) fn wrap(&self, decode: Arc<CodecFn>, encode: Arc<CodecFn>) -> Codec {
        let inner_decode = Arc::clone(&self.decode);
        let inner_encode = Arc::clone(&self.encode);
        Codec {
            decode: Arc::new(move |value| decode(inner_decode(value)?)),
            encode: Arc::new(move |value| inner_encode(encode(value)?)),
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Codec { .. }")
    }
}

impl PartialEq for Codec {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.decode, &other.decode) && Arc::ptr_eq(&self.encode, &other.encode)
    }
}

/// The `default` annotation: a literal value or a factory invoked fresh
/// on every use.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Factory(Arc<FactoryFn>),
}

impl DefaultValue {
    pub fn materialize(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl PartialEq for DefaultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DefaultValue::Value(a), DefaultValue::Value(b)) => a == b,
            (DefaultValue::Factory(a), DefaultValue::Factory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Options shared by every kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaOptions {
    /// `$id`, used as a `$ref` target.
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub default: Option<DefaultValue>,
    /// Annotations passed through to the wire form untouched.
    pub annotations: Map<String, Json>,
}

/// How an object treats keys it does not declare.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AdditionalProperties {
    /// Unconstrained (absent or `true` on the wire).
    #[default]
    Allow,
    /// `false`: unknown keys are rejected.
    Deny,
    /// Unknown keys must satisfy the schema.
    Schema(Box<Schema>),
}

impl AdditionalProperties {
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            AdditionalProperties::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn is_constrained(&self) -> bool {
        !matches!(self, AdditionalProperties::Allow)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberBounds {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BigIntBounds {
    pub minimum: Option<i128>,
    pub maximum: Option<i128>,
    pub exclusive_minimum: Option<i128>,
    pub exclusive_maximum: Option<i128>,
    pub multiple_of: Option<i128>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    /// Looked up in the [`FormatRegistry`](crate::FormatRegistry).
    pub format: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegExpSchema {
    pub source: String,
    pub flags: String,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateBounds {
    pub minimum_timestamp: Option<f64>,
    pub maximum_timestamp: Option<f64>,
    pub exclusive_minimum_timestamp: Option<f64>,
    pub exclusive_maximum_timestamp: Option<f64>,
    pub multiple_of_timestamp: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ByteBounds {
    pub min_byte_length: Option<usize>,
    pub max_byte_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub items: Box<Schema>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub contains: Option<Box<Schema>>,
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    /// Declared properties. A property is required unless its schema is
    /// marked optional.
    pub properties: IndexMap<String, Schema>,
    pub additional_properties: AdditionalProperties,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

impl ObjectSchema {
    /// Keys of the non-optional properties, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.properties
            .iter()
            .filter(|(_, schema)| !schema.optional)
            .map(|(key, _)| key.as_str())
            .collect()
    }

    pub fn is_required(&self, key: &str) -> bool {
        self.properties.get(key).map_or(false, |s| !s.optional)
    }
}

/// A record: one regex key pattern mapped to a value schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSchema {
    pub pattern: String,
    pub value: Box<Schema>,
    pub additional_properties: AdditionalProperties,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectSchema {
    pub all_of: Vec<Schema>,
    pub unevaluated_properties: AdditionalProperties,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSchema {
    pub parameters: Vec<Schema>,
    pub returns: Box<Schema>,
}

/// A deferred operator application awaiting a forward reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedSchema {
    /// Operator name, e.g. `Partial`, `Index`, `Pick`.
    pub target: String,
    pub parameters: Vec<Schema>,
}

/// A reference into a module's resolved definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSchema {
    pub defs: IndexMap<String, Schema>,
    pub target: String,
}

/// A user-registered kind, validated through the
/// [`TypeRegistry`](crate::TypeRegistry).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomSchema {
    pub kind: String,
    pub fields: Map<String, Json>,
}

/// Variant-specific structure of a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Any,
    Unknown,
    Never,
    Void,
    Null,
    Undefined,
    Boolean,
    Symbol,
    Number(NumberBounds),
    Integer(NumberBounds),
    BigInt(BigIntBounds),
    String(StringConstraints),
    RegExp(RegExpSchema),
    Date(DateBounds),
    Literal(LiteralValue),
    Array(ArraySchema),
    Object(ObjectSchema),
    Record(RecordSchema),
    Tuple(Vec<Schema>),
    Union(Vec<Schema>),
    Intersect(IntersectSchema),
    Not(Box<Schema>),
    Ref(String),
    This(String),
    Promise(Box<Schema>),
    Iterator(Box<Schema>),
    AsyncIterator(Box<Schema>),
    Function(FunctionSchema),
    Constructor(FunctionSchema),
    /// Anchored regex pattern in the template-literal dialect.
    TemplateLiteral(String),
    Uint8Array(ByteBounds),
    Computed(ComputedSchema),
    MappedKey(Vec<String>),
    MappedResult(IndexMap<String, Schema>),
    Import(ImportSchema),
    /// Generic parameter slot replaced by `instantiate`.
    Argument(usize),
    Custom(CustomSchema),
}

/// A schema: kind, options and modifier markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub kind: SchemaKind,
    pub options: SchemaOptions,
    pub optional: bool,
    pub readonly: bool,
    pub hint: Option<Hint>,
    pub transform: Option<Codec>,
}

impl From<SchemaKind> for Schema {
    fn from(kind: SchemaKind) -> Self {
        Schema::new(kind)
    }
}

impl Schema {
    pub fn new(kind: SchemaKind) -> Self {
        Self {
            kind,
            options: SchemaOptions::default(),
            optional: false,
            readonly: false,
            hint: None,
            transform: None,
        }
    }

    pub fn kind(&self) -> Kind {
        match &self.kind {
            SchemaKind::Any => Kind::Any,
            SchemaKind::Unknown => Kind::Unknown,
            SchemaKind::Never => Kind::Never,
            SchemaKind::Void => Kind::Void,
            SchemaKind::Null => Kind::Null,
            SchemaKind::Undefined => Kind::Undefined,
            SchemaKind::Boolean => Kind::Boolean,
            SchemaKind::Symbol => Kind::Symbol,
            SchemaKind::Number(_) => Kind::Number,
            SchemaKind::Integer(_) => Kind::Integer,
            SchemaKind::BigInt(_) => Kind::BigInt,
            SchemaKind::String(_) => Kind::String,
            SchemaKind::RegExp(_) => Kind::RegExp,
            SchemaKind::Date(_) => Kind::Date,
            SchemaKind::Literal(_) => Kind::Literal,
            SchemaKind::Array(_) => Kind::Array,
            SchemaKind::Object(_) => Kind::Object,
            SchemaKind::Record(_) => Kind::Record,
            SchemaKind::Tuple(_) => Kind::Tuple,
            SchemaKind::Union(_) => Kind::Union,
            SchemaKind::Intersect(_) => Kind::Intersect,
            SchemaKind::Not(_) => Kind::Not,
            SchemaKind::Ref(_) => Kind::Ref,
            SchemaKind::This(_) => Kind::This,
            SchemaKind::Promise(_) => Kind::Promise,
            SchemaKind::Iterator(_) => Kind::Iterator,
            SchemaKind::AsyncIterator(_) => Kind::AsyncIterator,
            SchemaKind::Function(_) => Kind::Function,
            SchemaKind::Constructor(_) => Kind::Constructor,
            SchemaKind::TemplateLiteral(_) => Kind::TemplateLiteral,
            SchemaKind::Uint8Array(_) => Kind::Uint8Array,
            SchemaKind::Computed(_) => Kind::Computed,
            SchemaKind::MappedKey(_) => Kind::MappedKey,
            SchemaKind::MappedResult(_) => Kind::MappedResult,
            SchemaKind::Import(_) => Kind::Import,
            SchemaKind::Argument(_) => Kind::Argument,
            SchemaKind::Custom(_) => Kind::Custom,
        }
    }

    /// Kind name; custom kinds report their registered name.
    pub fn kind_name(&self) -> &str {
        match &self.kind {
            SchemaKind::Custom(custom) => &custom.kind,
            _ => self.kind().as_str(),
        }
    }

    /// `IsKindOf`: compares the kind tag by name.
    pub fn is_kind_of(&self, kind: &str) -> bool {
        self.kind_name() == kind
    }

    pub fn id(&self) -> Option<&str> {
        self.options.id.as_deref()
    }

    pub fn is_never(&self) -> bool {
        matches!(self.kind, SchemaKind::Never)
    }

    pub fn is_enum(&self) -> bool {
        self.hint == Some(Hint::Enum)
    }

    pub fn has_transform(&self) -> bool {
        self.transform.is_some()
    }

    /// Ref or This target, if this schema is a reference.
    pub fn reference(&self) -> Option<&str> {
        match &self.kind {
            SchemaKind::Ref(target) | SchemaKind::This(target) => Some(target),
            _ => None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.options.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.options.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.options.default = Some(DefaultValue::Value(value.into()));
        self
    }

    /// Sets a default produced by `factory` each time it is needed.
    pub fn with_default_fn<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.options.default = Some(DefaultValue::Factory(Arc::new(factory)));
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: Json) -> Self {
        self.options.annotations.insert(key.into(), value);
        self
    }

    /// Sets `additionalProperties` on Object and Record schemas and
    /// `unevaluatedProperties` on Intersect schemas. Other kinds are
    /// returned unchanged.
    pub fn additional_properties(mut self, additional: AdditionalProperties) -> Self {
        match &mut self.kind {
            SchemaKind::Object(object) => object.additional_properties = additional,
            SchemaKind::Record(record) => record.additional_properties = additional,
            SchemaKind::Intersect(intersect) => intersect.unevaluated_properties = additional,
            _ => {}
        }
        self
    }

    /// Shorthand for `additional_properties(AdditionalProperties::Deny)`.
    pub fn strict(self) -> Self {
        self.additional_properties(AdditionalProperties::Deny)
    }

    /// Copies options and modifiers of `source` onto this schema, keeping
    /// any option already set here.
    pub(crate) fn inherit(mut self, source: &Schema) -> Self {
        let options = &source.options;
        if self.options.id.is_none() {
            self.options.id = options.id.clone();
        }
        if self.options.title.is_none() {
            self.options.title = options.title.clone();
        }
        if self.options.description.is_none() {
            self.options.description = options.description.clone();
        }
        if self.options.default.is_none() {
            self.options.default = options.default.clone();
        }
        for (key, value) in &options.annotations {
            self.options
                .annotations
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        self.optional |= source.optional;
        self.readonly |= source.readonly;
        self
    }

    /// Applies `f` to every direct child schema, rebuilding this node.
    pub fn try_map_children<E, F>(mut self, f: &mut F) -> Result<Schema, E>
    where
        F: FnMut(Schema) -> Result<Schema, E>,
    {
        fn boxed<E, F>(schema: Box<Schema>, f: &mut F) -> Result<Box<Schema>, E>
        where
            F: FnMut(Schema) -> Result<Schema, E>,
        {
            Ok(Box::new(f(*schema)?))
        }
        fn rest<E, F>(schemas: Vec<Schema>, f: &mut F) -> Result<Vec<Schema>, E>
        where
            F: FnMut(Schema) -> Result<Schema, E>,
        {
            schemas.into_iter().map(|s| f(s)).collect()
        }
        fn additional<E, F>(
            additional: AdditionalProperties,
            f: &mut F,
        ) -> Result<AdditionalProperties, E>
        where
            F: FnMut(Schema) -> Result<Schema, E>,
        {
            Ok(match additional {
                AdditionalProperties::Schema(schema) => {
                    AdditionalProperties::Schema(boxed(schema, f)?)
                }
                other => other,
            })
        }

        self.kind = match self.kind {
            SchemaKind::Array(mut array) => {
                array.items = boxed(array.items, f)?;
                if let Some(contains) = array.contains.take() {
                    array.contains = Some(boxed(contains, f)?);
                }
                SchemaKind::Array(array)
            }
            SchemaKind::Object(mut object) => {
                let mut properties = IndexMap::with_capacity(object.properties.len());
                for (key, property) in object.properties {
                    properties.insert(key, f(property)?);
                }
                object.properties = properties;
                object.additional_properties = additional(object.additional_properties, f)?;
                SchemaKind::Object(object)
            }
            SchemaKind::Record(mut record) => {
                record.value = boxed(record.value, f)?;
                record.additional_properties = additional(record.additional_properties, f)?;
                SchemaKind::Record(record)
            }
            SchemaKind::Tuple(items) => SchemaKind::Tuple(rest(items, f)?),
            SchemaKind::Union(any_of) => SchemaKind::Union(rest(any_of, f)?),
            SchemaKind::Intersect(intersect) => SchemaKind::Intersect(IntersectSchema {
                all_of: rest(intersect.all_of, f)?,
                unevaluated_properties: additional(intersect.unevaluated_properties, f)?,
            }),
            SchemaKind::Not(inner) => SchemaKind::Not(boxed(inner, f)?),
            SchemaKind::Promise(inner) => SchemaKind::Promise(boxed(inner, f)?),
            SchemaKind::Iterator(inner) => SchemaKind::Iterator(boxed(inner, f)?),
            SchemaKind::AsyncIterator(inner) => SchemaKind::AsyncIterator(boxed(inner, f)?),
            SchemaKind::Function(function) => SchemaKind::Function(FunctionSchema {
                parameters: rest(function.parameters, f)?,
                returns: boxed(function.returns, f)?,
            }),
            SchemaKind::Constructor(function) => SchemaKind::Constructor(FunctionSchema {
                parameters: rest(function.parameters, f)?,
                returns: boxed(function.returns, f)?,
            }),
            SchemaKind::Computed(computed) => SchemaKind::Computed(ComputedSchema {
                target: computed.target,
                parameters: rest(computed.parameters, f)?,
            }),
            SchemaKind::MappedResult(properties) => {
                let mut mapped = IndexMap::with_capacity(properties.len());
                for (key, property) in properties {
                    mapped.insert(key, f(property)?);
                }
                SchemaKind::MappedResult(mapped)
            }
            leaf => leaf,
        };
        Ok(self)
    }

    /// Infallible form of [`Schema::try_map_children`].
    pub fn map_children<F>(self, mut f: F) -> Schema
    where
        F: FnMut(Schema) -> Schema,
    {
        let result: Result<Schema, std::convert::Infallible> =
            self.try_map_children(&mut |schema| Ok(f(schema)));
        match result {
            Ok(schema) => schema,
            Err(never) => match never {},
        }
    }

    /// Direct child schemas, in structural order.
    pub fn children(&self) -> Vec<&Schema> {
        let mut out = Vec::new();
        match &self.kind {
            SchemaKind::Array(array) => {
                out.push(array.items.as_ref());
                if let Some(contains) = &array.contains {
                    out.push(contains.as_ref());
                }
            }
            SchemaKind::Object(object) => {
                out.extend(object.properties.values());
                out.extend(object.additional_properties.schema());
            }
            SchemaKind::Record(record) => {
                out.push(record.value.as_ref());
                out.extend(record.additional_properties.schema());
            }
            SchemaKind::Tuple(items) | SchemaKind::Union(items) => out.extend(items),
            SchemaKind::Intersect(intersect) => {
                out.extend(&intersect.all_of);
                out.extend(intersect.unevaluated_properties.schema());
            }
            SchemaKind::Not(inner)
            | SchemaKind::Promise(inner)
            | SchemaKind::Iterator(inner)
            | SchemaKind::AsyncIterator(inner) => out.push(inner.as_ref()),
            SchemaKind::Function(function) | SchemaKind::Constructor(function) => {
                out.extend(&function.parameters);
                out.push(function.returns.as_ref());
            }
            SchemaKind::Computed(computed) => out.extend(&computed.parameters),
            SchemaKind::MappedResult(properties) => out.extend(properties.values()),
            SchemaKind::Import(import) => out.extend(import.defs.values()),
            _ => {}
        }
        out
    }
}
