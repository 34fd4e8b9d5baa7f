//! Transform decoding: children first, then the schema's own codec.

use crate::compose::{from_key, key_of_property_keys};
use crate::error::ValueError;
use crate::registry::Context;
use crate::schema::{AdditionalProperties, Schema, SchemaKind};
use crate::value::Value;

use super::check::{check, regex};
use super::deref::{deref, import, pushref};
use super::errors::pointer;

/// Runs the decode half of `schema`'s codec, if any.
fn apply(schema: &Schema, path: &str, value: Value) -> Result<Value, ValueError> {
    let Some(codec) = &schema.transform else {
        return Ok(value);
    };
    let original = value.clone();
    codec
        .decode(value)
        .map_err(|source| ValueError::TransformDecode {
            schema: Box::new(schema.clone()),
            path: path.to_string(),
            value: original,
            source,
        })
}

/// Applies an additional/unevaluated-properties codec to the keys `known`
/// does not claim.
fn additional<F>(
    additional: &AdditionalProperties,
    path: &str,
    map: &mut crate::value::Object,
    known: F,
) -> Result<(), ValueError>
where
    F: Fn(&str) -> bool,
{
    let Some(schema) = additional.schema().filter(|s| s.has_transform()) else {
        return Ok(());
    };
    for (key, slot) in map.iter_mut() {
        if known(key.as_str()) {
            continue;
        }
        let current = std::mem::take(slot);
        *slot = apply(schema, &pointer(path, key), current)?;
    }
    Ok(())
}

pub(crate) fn decode(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    path: &str,
    value: Value,
) -> Result<Value, ValueError> {
    let scoped = pushref(schema, references);
    let references: &[&Schema] = &scoped;
    let decoded = match &schema.kind {
        SchemaKind::Array(array) => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let at = pointer(path, &index.to_string());
                    out.push(decode(ctx, &array.items, references, &at, item)?);
                }
                Value::Array(out)
            }
            other => other,
        },
        SchemaKind::Tuple(items) => match value {
            Value::Array(values) => {
                let mut out = Vec::with_capacity(values.len());
                for (index, element) in values.into_iter().enumerate() {
                    match items.get(index) {
                        Some(item) => {
                            let at = pointer(path, &index.to_string());
                            out.push(decode(ctx, item, references, &at, element)?);
                        }
                        None => out.push(element),
                    }
                }
                Value::Array(out)
            }
            other => other,
        },
        SchemaKind::Object(object) => match value {
            Value::Object(mut map) => {
                let exact = ctx.policy.exact_optional_property_types;
                for (key, property) in &object.properties {
                    let Some(slot) = map.get_mut(key) else {
                        continue;
                    };
                    // an undefined optional slot skips its codec
                    if slot.is_undefined()
                        && (!matches!(property.kind, SchemaKind::Undefined) || exact)
                    {
                        continue;
                    }
                    let current = std::mem::take(slot);
                    *slot = decode(ctx, property, references, &pointer(path, key), current)?;
                }
                additional(&object.additional_properties, path, &mut map, |key| {
                    object.properties.contains_key(key)
                })?;
                Value::Object(map)
            }
            other => other,
        },
        SchemaKind::Record(record) => match value {
            Value::Object(mut map) => {
                let key_pattern = regex(&record.pattern)?;
                for (key, slot) in map.iter_mut() {
                    if !key_pattern.is_match(key) {
                        continue;
                    }
                    let current = std::mem::take(slot);
                    *slot = decode(ctx, &record.value, references, &pointer(path, key), current)?;
                }
                additional(&record.additional_properties, path, &mut map, |key| {
                    key_pattern.is_match(key)
                })?;
                Value::Object(map)
            }
            other => other,
        },
        SchemaKind::Intersect(intersect) => match value {
            Value::Object(mut map) => {
                let known = key_of_property_keys(schema);
                for key in &known {
                    let Some(slot) = map.get_mut(key) else {
                        continue;
                    };
                    let property = from_key(schema, key);
                    let current = std::mem::take(slot);
                    *slot = decode(ctx, &property, references, &pointer(path, key), current)?;
                }
                additional(&intersect.unevaluated_properties, path, &mut map, |key| {
                    known.iter().any(|k| k == key)
                })?;
                Value::Object(map)
            }
            other => other,
        },
        SchemaKind::Union(members) => {
            let mut decoded = None;
            for member in members {
                if check(ctx, member, references, &value)? {
                    decoded = Some(decode(ctx, member, references, path, value.clone())?);
                    break;
                }
            }
            decoded.unwrap_or(value)
        }
        SchemaKind::Not(inner) => decode(ctx, inner, references, path, value)?,
        SchemaKind::Ref(id) | SchemaKind::This(id) => {
            let target = deref(id, references)?;
            decode(ctx, target, references, path, value)?
        }
        SchemaKind::Import(module) => {
            let (target, scope) = import(module, references)?;
            decode(ctx, target, &scope, path, value)?
        }
        _ => value,
    };
    apply(schema, path, decoded)
}
