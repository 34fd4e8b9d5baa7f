//! JSON wire form of schemas.
//!
//! Standard kinds serialize to plain JSON Schema (`type`, `properties`,
//! `required`, `anyOf`, `allOf`, `$ref`, ...). Kinds JSON Schema has no word
//! for carry a distinguishing `type` string (`"Uint8Array"`, `"Function"`,
//! `"bigint"`, ...), and the engine-internal kinds (`Computed`, `MappedKey`,
//! `MappedResult`, `Argument` and custom kinds) carry an `x-kind` marker.
//!
//! Modifier markers are not part of the wire form. Deserializing re-derives
//! `optional` from each object's `required` list; `readonly`, hints and
//! transform codecs do not survive a round trip.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::build::{never, unknown};
use crate::error::TypeError;
use crate::linter::{lint_schema, Severity};
use crate::registry::TypeRegistry;
use crate::schema::{
    AdditionalProperties, ArraySchema, BigIntBounds, ByteBounds, ComputedSchema, CustomSchema,
    DateBounds, FunctionSchema, ImportSchema, IntersectSchema, NumberBounds, ObjectSchema,
    RecordSchema, RegExpSchema, Schema, SchemaKind, StringConstraints,
};
use crate::types::{Kind, LiteralValue};
use crate::value::errors::pointer;
use crate::value::Value;

/// Key marking engine-internal and custom kinds.
pub const X_KIND: &str = "x-kind";

/// Every `type` string the wire form uses.
pub const TYPE_NAMES: &[&str] = &[
    "null",
    "boolean",
    "number",
    "integer",
    "string",
    "array",
    "object",
    "void",
    "undefined",
    "symbol",
    "bigint",
    "Date",
    "Uint8Array",
    "RegExp",
    "Function",
    "Constructor",
    "Promise",
    "Iterator",
    "AsyncIterator",
];

const OPTION_KEYS: &[&str] = &["$id", "title", "description", "default"];

/// Keywords consumed by the structural parse. Anything else on a schema
/// object is kept as a pass-through annotation.
const KEYWORDS: &[&str] = &[
    "type",
    "const",
    "properties",
    "required",
    "additionalProperties",
    "patternProperties",
    "unevaluatedProperties",
    "minProperties",
    "maxProperties",
    "items",
    "additionalItems",
    "minItems",
    "maxItems",
    "uniqueItems",
    "contains",
    "minContains",
    "maxContains",
    "anyOf",
    "allOf",
    "not",
    "$ref",
    "$defs",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "pattern",
    "format",
    "source",
    "flags",
    "minimumTimestamp",
    "maximumTimestamp",
    "exclusiveMinimumTimestamp",
    "exclusiveMaximumTimestamp",
    "multipleOfTimestamp",
    "minByteLength",
    "maxByteLength",
    "item",
    "parameters",
    "returns",
    "target",
    "keys",
    "index",
    X_KIND,
];

impl Schema {
    /// Serializes to the wire form.
    pub fn to_json(&self) -> Json {
        Json::Object(emit(self))
    }

    /// Parses the wire form.
    ///
    /// The document is linted first; the first error-level diagnostic is
    /// reported with its JSON pointer.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidSchema` when the document is not a
    /// well-formed schema.
    pub fn from_json(json: &Json) -> Result<Schema, TypeError> {
        let diagnostics = lint_schema(json, &TypeRegistry::new());
        if let Some(diagnostic) = diagnostics
            .into_iter()
            .find(|d| d.severity == Severity::Error)
        {
            return Err(TypeError::InvalidSchema {
                path: if diagnostic.path.is_empty() {
                    "/".to_string()
                } else {
                    diagnostic.path
                },
                message: diagnostic.message,
            });
        }
        parse(json, "")
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let json = Json::deserialize(deserializer)?;
        Schema::from_json(&json).map_err(D::Error::custom)
    }
}

// === Serialization ===

fn emit(schema: &Schema) -> Map<String, Json> {
    let mut out = Map::new();
    let options = &schema.options;
    if let Some(id) = &options.id {
        put(&mut out, "$id", id.as_str());
    }
    if let Some(title) = &options.title {
        put(&mut out, "title", title.as_str());
    }
    if let Some(description) = &options.description {
        put(&mut out, "description", description.as_str());
    }
    structure(&schema.kind, &mut out);
    if let Some(default) = &options.default {
        put(&mut out, "default", default.materialize().to_json());
    }
    for (key, value) in &options.annotations {
        out.entry(key.clone()).or_insert_with(|| value.clone());
    }
    out
}

fn put(out: &mut Map<String, Json>, key: &str, value: impl Into<Json>) {
    out.insert(key.to_string(), value.into());
}

fn put_opt<T: Into<Json>>(out: &mut Map<String, Json>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        put(out, key, value);
    }
}

/// Integral floats serialize without a fractional part.
fn float(n: f64) -> Json {
    Value::Number(n).to_json()
}

/// Big integers outside the `i64` range serialize as decimal strings.
fn big(n: i128) -> Json {
    i64::try_from(n)
        .map(Json::from)
        .unwrap_or_else(|_| Json::String(n.to_string()))
}

fn nested(schema: &Schema) -> Json {
    Json::Object(emit(schema))
}

fn nested_list(schemas: &[Schema]) -> Json {
    Json::Array(schemas.iter().map(nested).collect())
}

fn nested_map(schemas: &IndexMap<String, Schema>) -> Json {
    Json::Object(
        schemas
            .iter()
            .map(|(key, schema)| (key.clone(), nested(schema)))
            .collect(),
    )
}

fn emit_additional(out: &mut Map<String, Json>, key: &str, additional: &AdditionalProperties) {
    match additional {
        AdditionalProperties::Allow => {}
        AdditionalProperties::Deny => put(out, key, false),
        AdditionalProperties::Schema(schema) => put(out, key, nested(schema)),
    }
}

fn emit_number_bounds(out: &mut Map<String, Json>, bounds: &NumberBounds) {
    put_opt(out, "minimum", bounds.minimum.map(float));
    put_opt(out, "maximum", bounds.maximum.map(float));
    put_opt(out, "exclusiveMinimum", bounds.exclusive_minimum.map(float));
    put_opt(out, "exclusiveMaximum", bounds.exclusive_maximum.map(float));
    put_opt(out, "multipleOf", bounds.multiple_of.map(float));
}

fn structure(kind: &SchemaKind, out: &mut Map<String, Json>) {
    match kind {
        SchemaKind::Any | SchemaKind::Unknown => {}
        SchemaKind::Never => put(out, "not", Json::Object(Map::new())),
        SchemaKind::Void => put(out, "type", "void"),
        SchemaKind::Null => put(out, "type", "null"),
        SchemaKind::Undefined => put(out, "type", "undefined"),
        SchemaKind::Boolean => put(out, "type", "boolean"),
        SchemaKind::Symbol => put(out, "type", "symbol"),
        SchemaKind::Number(bounds) => {
            put(out, "type", "number");
            emit_number_bounds(out, bounds);
        }
        SchemaKind::Integer(bounds) => {
            put(out, "type", "integer");
            emit_number_bounds(out, bounds);
        }
        SchemaKind::BigInt(bounds) => {
            put(out, "type", "bigint");
            put_opt(out, "minimum", bounds.minimum.map(big));
            put_opt(out, "maximum", bounds.maximum.map(big));
            put_opt(out, "exclusiveMinimum", bounds.exclusive_minimum.map(big));
            put_opt(out, "exclusiveMaximum", bounds.exclusive_maximum.map(big));
            put_opt(out, "multipleOf", bounds.multiple_of.map(big));
        }
        SchemaKind::String(constraints) => {
            put(out, "type", "string");
            put_opt(out, "minLength", constraints.min_length);
            put_opt(out, "maxLength", constraints.max_length);
            put_opt(out, "pattern", constraints.pattern.clone());
            put_opt(out, "format", constraints.format.clone());
        }
        SchemaKind::RegExp(regexp) => {
            put(out, "type", "RegExp");
            put(out, "source", regexp.source.as_str());
            put(out, "flags", regexp.flags.as_str());
            put_opt(out, "minLength", regexp.min_length);
            put_opt(out, "maxLength", regexp.max_length);
        }
        SchemaKind::Date(bounds) => {
            put(out, "type", "Date");
            put_opt(out, "minimumTimestamp", bounds.minimum_timestamp.map(float));
            put_opt(out, "maximumTimestamp", bounds.maximum_timestamp.map(float));
            put_opt(
                out,
                "exclusiveMinimumTimestamp",
                bounds.exclusive_minimum_timestamp.map(float),
            );
            put_opt(
                out,
                "exclusiveMaximumTimestamp",
                bounds.exclusive_maximum_timestamp.map(float),
            );
            put_opt(out, "multipleOfTimestamp", bounds.multiple_of_timestamp.map(float));
        }
        SchemaKind::Literal(value) => {
            put(out, "type", value.type_name());
            put(out, "const", value.to_value().to_json());
        }
        SchemaKind::Array(array) => {
            put(out, "type", "array");
            put(out, "items", nested(&array.items));
            put_opt(out, "minItems", array.min_items);
            put_opt(out, "maxItems", array.max_items);
            if array.unique_items {
                put(out, "uniqueItems", true);
            }
            if let Some(contains) = &array.contains {
                put(out, "contains", nested(contains));
            }
            put_opt(out, "minContains", array.min_contains);
            put_opt(out, "maxContains", array.max_contains);
        }
        SchemaKind::Object(object) => {
            put(out, "type", "object");
            put(out, "properties", nested_map(&object.properties));
            let required = object.required();
            if !required.is_empty() {
                put(out, "required", required);
            }
            emit_additional(out, "additionalProperties", &object.additional_properties);
            put_opt(out, "minProperties", object.min_properties);
            put_opt(out, "maxProperties", object.max_properties);
        }
        SchemaKind::Record(record) => {
            put(out, "type", "object");
            let mut patterns = Map::new();
            patterns.insert(record.pattern.clone(), nested(&record.value));
            put(out, "patternProperties", Json::Object(patterns));
            emit_additional(out, "additionalProperties", &record.additional_properties);
            put_opt(out, "minProperties", record.min_properties);
            put_opt(out, "maxProperties", record.max_properties);
        }
        SchemaKind::Tuple(items) => {
            put(out, "type", "array");
            if !items.is_empty() {
                put(out, "items", nested_list(items));
            }
            put(out, "additionalItems", false);
            put(out, "minItems", items.len());
            put(out, "maxItems", items.len());
        }
        SchemaKind::Union(members) => put(out, "anyOf", nested_list(members)),
        SchemaKind::Intersect(intersect) => {
            if intersect
                .all_of
                .iter()
                .all(|member| member.kind() == Kind::Object)
            {
                put(out, "type", "object");
            }
            put(out, "allOf", nested_list(&intersect.all_of));
            emit_additional(out, "unevaluatedProperties", &intersect.unevaluated_properties);
        }
        SchemaKind::Not(inner) => put(out, "not", nested(inner)),
        SchemaKind::Ref(target) | SchemaKind::This(target) => put(out, "$ref", target.as_str()),
        SchemaKind::Promise(item) => {
            put(out, "type", "Promise");
            put(out, "item", nested(item));
        }
        SchemaKind::Iterator(items) => {
            put(out, "type", "Iterator");
            put(out, "items", nested(items));
        }
        SchemaKind::AsyncIterator(items) => {
            put(out, "type", "AsyncIterator");
            put(out, "items", nested(items));
        }
        SchemaKind::Function(function) => {
            put(out, "type", "Function");
            put(out, "parameters", nested_list(&function.parameters));
            put(out, "returns", nested(&function.returns));
        }
        SchemaKind::Constructor(function) => {
            put(out, "type", "Constructor");
            put(out, "parameters", nested_list(&function.parameters));
            put(out, "returns", nested(&function.returns));
        }
        SchemaKind::TemplateLiteral(pattern) => {
            put(out, "type", "string");
            put(out, "pattern", pattern.as_str());
        }
        SchemaKind::Uint8Array(bounds) => {
            put(out, "type", "Uint8Array");
            put_opt(out, "minByteLength", bounds.min_byte_length);
            put_opt(out, "maxByteLength", bounds.max_byte_length);
        }
        SchemaKind::Computed(computed) => {
            put(out, X_KIND, "Computed");
            put(out, "target", computed.target.as_str());
            put(out, "parameters", nested_list(&computed.parameters));
        }
        SchemaKind::MappedKey(keys) => {
            put(out, X_KIND, "MappedKey");
            put(out, "keys", keys.clone());
        }
        SchemaKind::MappedResult(properties) => {
            put(out, X_KIND, "MappedResult");
            put(out, "properties", nested_map(properties));
        }
        SchemaKind::Import(import) => {
            put(out, "$defs", nested_map(&import.defs));
            put(out, "$ref", import.target.as_str());
        }
        SchemaKind::Argument(index) => {
            put(out, X_KIND, "Argument");
            put(out, "index", *index);
        }
        SchemaKind::Custom(custom) => {
            put(out, X_KIND, custom.kind.as_str());
            for (key, value) in &custom.fields {
                out.insert(key.clone(), value.clone());
            }
        }
    }
}

// === Deserialization ===

fn invalid(path: &str, message: impl Into<String>) -> TypeError {
    TypeError::InvalidSchema {
        path: if path.is_empty() { "/".to_string() } else { path.to_string() },
        message: message.into(),
    }
}

fn text<'a>(map: &'a Map<String, Json>, key: &str) -> Option<&'a str> {
    map.get(key).and_then(Json::as_str)
}

fn count(map: &Map<String, Json>, key: &str) -> Option<usize> {
    map.get(key)
        .and_then(Json::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn number(map: &Map<String, Json>, key: &str) -> Option<f64> {
    map.get(key).and_then(Json::as_f64)
}

fn integer(map: &Map<String, Json>, key: &str) -> Option<i128> {
    match map.get(key)? {
        Json::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from)),
        Json::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn number_bounds(map: &Map<String, Json>) -> NumberBounds {
    NumberBounds {
        minimum: number(map, "minimum"),
        maximum: number(map, "maximum"),
        exclusive_minimum: number(map, "exclusiveMinimum"),
        exclusive_maximum: number(map, "exclusiveMaximum"),
        multiple_of: number(map, "multipleOf"),
    }
}

fn parse(json: &Json, path: &str) -> Result<Schema, TypeError> {
    let map = match json {
        Json::Bool(true) => return Ok(unknown()),
        Json::Bool(false) => return Ok(never()),
        Json::Object(map) => map,
        _ => return Err(invalid(path, "expected schema")),
    };
    let kind = parse_kind(map, path)?;
    let custom = matches!(kind, SchemaKind::Custom(_));
    let mut schema = Schema::new(kind);
    schema.options.id = text(map, "$id").map(String::from);
    schema.options.title = text(map, "title").map(String::from);
    schema.options.description = text(map, "description").map(String::from);
    if let Some(default) = map.get("default") {
        schema = schema.with_default(Value::from(default));
    }
    if !custom {
        for (key, value) in map {
            if !KEYWORDS.contains(&key.as_str()) && !OPTION_KEYS.contains(&key.as_str()) {
                schema.options.annotations.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(schema)
}

fn parse_list(items: &[Json], path: &str) -> Result<Vec<Schema>, TypeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse(item, &pointer(path, &index.to_string())))
        .collect()
}

fn parse_map(map: &Map<String, Json>, path: &str) -> Result<IndexMap<String, Schema>, TypeError> {
    let mut out = IndexMap::with_capacity(map.len());
    for (key, item) in map {
        out.insert(key.clone(), parse(item, &pointer(path, key))?);
    }
    Ok(out)
}

fn parse_child(map: &Map<String, Json>, key: &str, path: &str) -> Result<Box<Schema>, TypeError> {
    let at = pointer(path, key);
    match map.get(key) {
        Some(child) => Ok(Box::new(parse(child, &at)?)),
        None => Err(invalid(&at, format!("missing required keyword '{key}'"))),
    }
}

fn parse_additional(value: Option<&Json>, path: &str) -> Result<AdditionalProperties, TypeError> {
    Ok(match value {
        None | Some(Json::Bool(true)) => AdditionalProperties::Allow,
        Some(Json::Bool(false)) => AdditionalProperties::Deny,
        Some(schema) => AdditionalProperties::Schema(Box::new(parse(schema, path)?)),
    })
}

fn parse_kind(map: &Map<String, Json>, path: &str) -> Result<SchemaKind, TypeError> {
    if let Some(kind) = text(map, X_KIND) {
        return parse_extension(map, kind, path);
    }
    if let (Some(defs), Some(target)) = (map.get("$defs").and_then(Json::as_object), text(map, "$ref")) {
        return Ok(SchemaKind::Import(ImportSchema {
            defs: parse_map(defs, &pointer(path, "$defs"))?,
            target: target.to_string(),
        }));
    }
    if let Some(target) = text(map, "$ref") {
        return Ok(SchemaKind::Ref(target.to_string()));
    }
    if let Some(value) = map.get("const") {
        let literal = match value {
            Json::String(s) => LiteralValue::String(s.clone()),
            Json::Bool(b) => LiteralValue::Boolean(*b),
            Json::Number(n) => LiteralValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            _ => return Err(invalid(&pointer(path, "const"), "unsupported const value")),
        };
        return Ok(SchemaKind::Literal(literal));
    }
    if let Some(members) = map.get("anyOf").and_then(Json::as_array) {
        return Ok(SchemaKind::Union(parse_list(members, &pointer(path, "anyOf"))?));
    }
    if let Some(members) = map.get("allOf").and_then(Json::as_array) {
        return Ok(SchemaKind::Intersect(IntersectSchema {
            all_of: parse_list(members, &pointer(path, "allOf"))?,
            unevaluated_properties: parse_additional(
                map.get("unevaluatedProperties"),
                &pointer(path, "unevaluatedProperties"),
            )?,
        }));
    }
    if let Some(inner) = map.get("not") {
        return Ok(match inner {
            Json::Object(empty) if empty.is_empty() => SchemaKind::Never,
            _ => SchemaKind::Not(Box::new(parse(inner, &pointer(path, "not"))?)),
        });
    }
    match text(map, "type") {
        Some(name) => parse_typed(map, name, path),
        None => Ok(SchemaKind::Unknown),
    }
}

fn parse_typed(map: &Map<String, Json>, name: &str, path: &str) -> Result<SchemaKind, TypeError> {
    Ok(match name {
        "null" => SchemaKind::Null,
        "boolean" => SchemaKind::Boolean,
        "void" => SchemaKind::Void,
        "undefined" => SchemaKind::Undefined,
        "symbol" => SchemaKind::Symbol,
        "number" => SchemaKind::Number(number_bounds(map)),
        "integer" => SchemaKind::Integer(number_bounds(map)),
        "bigint" => SchemaKind::BigInt(BigIntBounds {
            minimum: integer(map, "minimum"),
            maximum: integer(map, "maximum"),
            exclusive_minimum: integer(map, "exclusiveMinimum"),
            exclusive_maximum: integer(map, "exclusiveMaximum"),
            multiple_of: integer(map, "multipleOf"),
        }),
        "string" => SchemaKind::String(StringConstraints {
            min_length: count(map, "minLength"),
            max_length: count(map, "maxLength"),
            pattern: text(map, "pattern").map(String::from),
            format: text(map, "format").map(String::from),
        }),
        "RegExp" => SchemaKind::RegExp(RegExpSchema {
            source: text(map, "source").unwrap_or_default().to_string(),
            flags: text(map, "flags").unwrap_or_default().to_string(),
            min_length: count(map, "minLength"),
            max_length: count(map, "maxLength"),
        }),
        "Date" => SchemaKind::Date(DateBounds {
            minimum_timestamp: number(map, "minimumTimestamp"),
            maximum_timestamp: number(map, "maximumTimestamp"),
            exclusive_minimum_timestamp: number(map, "exclusiveMinimumTimestamp"),
            exclusive_maximum_timestamp: number(map, "exclusiveMaximumTimestamp"),
            multiple_of_timestamp: number(map, "multipleOfTimestamp"),
        }),
        "Uint8Array" => SchemaKind::Uint8Array(ByteBounds {
            min_byte_length: count(map, "minByteLength"),
            max_byte_length: count(map, "maxByteLength"),
        }),
        "array" => parse_array(map, path)?,
        "object" => parse_object(map, path)?,
        "Promise" => SchemaKind::Promise(parse_child(map, "item", path)?),
        "Iterator" => SchemaKind::Iterator(parse_child(map, "items", path)?),
        "AsyncIterator" => SchemaKind::AsyncIterator(parse_child(map, "items", path)?),
        "Function" => SchemaKind::Function(parse_function(map, path)?),
        "Constructor" => SchemaKind::Constructor(parse_function(map, path)?),
        other => return Err(invalid(&pointer(path, "type"), format!("unknown type '{other}'"))),
    })
}

fn parse_function(map: &Map<String, Json>, path: &str) -> Result<FunctionSchema, TypeError> {
    let parameters = map
        .get("parameters")
        .and_then(Json::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    Ok(FunctionSchema {
        parameters: parse_list(parameters, &pointer(path, "parameters"))?,
        returns: parse_child(map, "returns", path)?,
    })
}

fn parse_array(map: &Map<String, Json>, path: &str) -> Result<SchemaKind, TypeError> {
    let items_path = pointer(path, "items");
    match map.get("items") {
        Some(Json::Array(items)) => return Ok(SchemaKind::Tuple(parse_list(items, &items_path)?)),
        None if map.get("additionalItems") == Some(&Json::Bool(false)) => {
            return Ok(SchemaKind::Tuple(Vec::new()))
        }
        _ => {}
    }
    let items = match map.get("items") {
        Some(items) => parse(items, &items_path)?,
        None => unknown(),
    };
    let contains = match map.get("contains") {
        Some(contains) => Some(Box::new(parse(contains, &pointer(path, "contains"))?)),
        None => None,
    };
    Ok(SchemaKind::Array(ArraySchema {
        items: Box::new(items),
        min_items: count(map, "minItems"),
        max_items: count(map, "maxItems"),
        unique_items: map
            .get("uniqueItems")
            .and_then(Json::as_bool)
            .unwrap_or(false),
        contains,
        min_contains: count(map, "minContains"),
        max_contains: count(map, "maxContains"),
    }))
}

fn parse_object(map: &Map<String, Json>, path: &str) -> Result<SchemaKind, TypeError> {
    let additional = parse_additional(
        map.get("additionalProperties"),
        &pointer(path, "additionalProperties"),
    )?;
    let patterns = map.get("patternProperties").and_then(Json::as_object);
    if let (None, Some(patterns)) = (map.get("properties"), patterns) {
        if let (1, Some((pattern, value))) = (patterns.len(), patterns.iter().next()) {
            let at = pointer(&pointer(path, "patternProperties"), pattern);
            return Ok(SchemaKind::Record(RecordSchema {
                pattern: pattern.clone(),
                value: Box::new(parse(value, &at)?),
                additional_properties: additional,
                min_properties: count(map, "minProperties"),
                max_properties: count(map, "maxProperties"),
            }));
        }
    }
    let required: Vec<&str> = map
        .get("required")
        .and_then(Json::as_array)
        .map(|names| names.iter().filter_map(Json::as_str).collect())
        .unwrap_or_default();
    let mut properties = IndexMap::new();
    if let Some(declared) = map.get("properties").and_then(Json::as_object) {
        let at = pointer(path, "properties");
        for (key, property) in declared {
            let mut schema = parse(property, &pointer(&at, key))?;
            schema.optional = !required.contains(&key.as_str());
            properties.insert(key.clone(), schema);
        }
    }
    Ok(SchemaKind::Object(ObjectSchema {
        properties,
        additional_properties: additional,
        min_properties: count(map, "minProperties"),
        max_properties: count(map, "maxProperties"),
    }))
}

fn parse_extension(map: &Map<String, Json>, kind: &str, path: &str) -> Result<SchemaKind, TypeError> {
    Ok(match kind {
        "Computed" => {
            let parameters = map
                .get("parameters")
                .and_then(Json::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            SchemaKind::Computed(ComputedSchema {
                target: text(map, "target").unwrap_or_default().to_string(),
                parameters: parse_list(parameters, &pointer(path, "parameters"))?,
            })
        }
        "MappedKey" => SchemaKind::MappedKey(
            map.get("keys")
                .and_then(Json::as_array)
                .map(|keys| keys.iter().filter_map(Json::as_str).map(String::from).collect())
                .unwrap_or_default(),
        ),
        "MappedResult" => match map.get("properties").and_then(Json::as_object) {
            Some(properties) => {
                SchemaKind::MappedResult(parse_map(properties, &pointer(path, "properties"))?)
            }
            None => SchemaKind::MappedResult(IndexMap::new()),
        },
        "Argument" => SchemaKind::Argument(count(map, "index").unwrap_or_default()),
        name => SchemaKind::Custom(CustomSchema {
            kind: name.to_string(),
            fields: map
                .iter()
                .filter(|(key, _)| key.as_str() != X_KIND && !OPTION_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{
        array, array_with, custom, date, formatted, literal, number, object, reference, string,
        tuple, uint8array,
    };
    use crate::compose::{intersect, optional, record, union};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn object_wire_form() {
        let schema = object([("x", number()), ("y", optional(&string()))]).with_id("Point");
        assert_eq!(
            schema.to_json(),
            json!({
                "$id": "Point",
                "type": "object",
                "properties": {
                    "x": { "type": "number" },
                    "y": { "type": "string" }
                },
                "required": ["x"]
            })
        );
    }

    #[test]
    fn optional_is_rederived_from_required() {
        let schema = object([("x", number()), ("y", optional(&string()))]);
        let parsed = Schema::from_json(&schema.to_json()).unwrap();
        assert_eq!(parsed, schema);
    }

    #[test]
    fn special_kinds_wire_form() {
        assert_eq!(crate::build::any().to_json(), json!({}));
        assert_eq!(never().to_json(), json!({ "not": {} }));
        assert_eq!(literal("a").to_json(), json!({ "type": "string", "const": "a" }));
        assert_eq!(date().to_json(), json!({ "type": "Date" }));
        assert_eq!(uint8array().to_json(), json!({ "type": "Uint8Array" }));
        assert_eq!(
            tuple(vec![number(), string()]).to_json(),
            json!({
                "type": "array",
                "items": [{ "type": "number" }, { "type": "string" }],
                "additionalItems": false,
                "minItems": 2,
                "maxItems": 2
            })
        );
        assert_eq!(
            record(&string(), &number()).to_json(),
            json!({
                "type": "object",
                "patternProperties": { "^(.*)$": { "type": "number" } }
            })
        );
    }

    #[test]
    fn intersect_of_objects_is_typed() {
        let schema = intersect(&[object([("x", number())]), object([("y", number())])]).unwrap();
        let json = schema.to_json();
        assert_eq!(json["type"], json!("object"));
        assert_eq!(json["allOf"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn round_trips_structural_kinds() {
        let schemas = vec![
            union(&[string(), number()]),
            array_with(ArraySchema::new(number()).min_items(1).unique_items()),
            tuple(vec![literal(1i64), literal(true)]),
            record(&string(), &array(number())),
            reference("Node"),
            formatted("email"),
            custom("Money", Map::new()),
        ];
        for schema in schemas {
            let parsed = Schema::from_json(&schema.to_json()).unwrap();
            assert_eq!(parsed, schema);
        }
    }

    #[test]
    fn annotations_pass_through() {
        let parsed = Schema::from_json(&json!({
            "type": "string",
            "title": "Name",
            "examples": ["a"]
        }))
        .unwrap();
        assert_eq!(parsed.options.title.as_deref(), Some("Name"));
        assert_eq!(parsed.options.annotations["examples"], json!(["a"]));
        assert_eq!(parsed.to_json()["examples"], json!(["a"]));
    }

    #[test]
    fn empty_schema_is_unknown() {
        assert_eq!(Schema::from_json(&json!({})).unwrap().kind(), Kind::Unknown);
        assert_eq!(Schema::from_json(&json!(false)).unwrap().kind(), Kind::Never);
    }

    #[test]
    fn invalid_documents_report_their_path() {
        let err = Schema::from_json(&json!({
            "type": "object",
            "properties": { "x": { "type": "nope" } }
        }))
        .unwrap_err();
        match err {
            TypeError::InvalidSchema { path, message } => {
                assert_eq!(path, "/properties/x/type");
                assert!(message.contains("nope"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn serde_delegates_to_wire_form() {
        let schema = object([("id", number())]);
        let text = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&text).unwrap();
        assert_eq!(back, schema);
        assert!(serde_json::from_str::<Schema>(r#"{"type": 1}"#).is_err());
    }
}
