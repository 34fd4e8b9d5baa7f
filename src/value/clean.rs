//! `Clean`: removes properties and tuple elements the schema does not
//! describe. Values of the wrong shape are returned untouched.

use crate::compose::key_of_property_keys;
use crate::error::ValueError;
use crate::registry::Context;
use crate::schema::{AdditionalProperties, IntersectSchema, Schema, SchemaKind};
use crate::value::{Object, Value};

use super::check::{check, regex};
use super::deref::{deref, import, pushref};

pub(crate) fn clean(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    value: Value,
) -> Result<Value, ValueError> {
    let scoped = pushref(schema, references);
    let references: &[&Schema] = &scoped;
    match &schema.kind {
        SchemaKind::Array(array) => match value {
            Value::Array(items) => Ok(Value::Array(
                items
                    .into_iter()
                    .map(|item| clean(ctx, &array.items, references, item))
                    .collect::<Result<_, _>>()?,
            )),
            other => Ok(other),
        },
        SchemaKind::Tuple(items) => match value {
            Value::Array(values) => {
                let mut cleaned = Vec::with_capacity(items.len().min(values.len()));
                for (item, element) in items.iter().zip(values) {
                    cleaned.push(clean(ctx, item, references, element)?);
                }
                Ok(Value::Array(cleaned))
            }
            other => Ok(other),
        },
        SchemaKind::Object(object) => match value {
            Value::Object(map) => {
                let mut out = Object::with_capacity(map.len());
                for (key, item) in map {
                    if let Some(property) = object.properties.get(&key) {
                        out.insert(key, clean(ctx, property, references, item)?);
                    } else if let Some(kept) =
                        additional(ctx, &object.additional_properties, references, item)?
                    {
                        out.insert(key, kept);
                    }
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        },
        SchemaKind::Record(record) => match value {
            Value::Object(map) => {
                let key_pattern = regex(&record.pattern)?;
                let mut out = Object::with_capacity(map.len());
                for (key, item) in map {
                    if key_pattern.is_match(&key) {
                        out.insert(key, clean(ctx, &record.value, references, item)?);
                    } else if let Some(kept) =
                        additional(ctx, &record.additional_properties, references, item)?
                    {
                        out.insert(key, kept);
                    }
                }
                Ok(Value::Object(out))
            }
            other => Ok(other),
        },
        SchemaKind::Intersect(intersect) => {
            clean_intersect(ctx, schema, intersect, references, value)
        }
        SchemaKind::Union(members) => {
            for member in members {
                if is_checkable(ctx, member) && check(ctx, member, references, &value)? {
                    return clean(ctx, member, references, value);
                }
            }
            Ok(value)
        }
        SchemaKind::Ref(id) | SchemaKind::This(id) => {
            let target = deref(id, references)?;
            clean(ctx, target, references, value)
        }
        SchemaKind::Import(module) => {
            let (target, scope) = import(module, references)?;
            clean(ctx, target, &scope, value)
        }
        _ => Ok(value),
    }
}

/// Union branches that `check` can evaluate without failing on the kind.
fn is_checkable(ctx: &Context, schema: &Schema) -> bool {
    match &schema.kind {
        SchemaKind::Custom(custom) => ctx.types.has(&custom.kind),
        SchemaKind::Computed(_)
        | SchemaKind::MappedKey(_)
        | SchemaKind::MappedResult(_)
        | SchemaKind::Argument(_) => false,
        _ => true,
    }
}

/// Keeps an undeclared property only when an additional-properties schema
/// accepts it.
fn additional(
    ctx: &Context,
    additional: &AdditionalProperties,
    references: &[&Schema],
    item: Value,
) -> Result<Option<Value>, ValueError> {
    match additional.schema() {
        Some(schema) if check(ctx, schema, references, &item)? => {
            Ok(Some(clean(ctx, schema, references, item)?))
        }
        _ => Ok(None),
    }
}

fn clean_intersect(
    ctx: &Context,
    schema: &Schema,
    intersect: &IntersectSchema,
    references: &[&Schema],
    value: Value,
) -> Result<Value, ValueError> {
    let mut composite = Value::object();
    for member in &intersect.all_of {
        let cleaned = clean(ctx, member, references, value.clone())?;
        composite = match (composite, cleaned) {
            (Value::Object(mut acc), Value::Object(next)) => {
                acc.extend(next);
                Value::Object(acc)
            }
            (_, next) => next,
        };
    }
    let (Value::Object(original), Value::Object(mut merged), Some(unevaluated)) = (
        &value,
        composite.clone(),
        intersect.unevaluated_properties.schema(),
    ) else {
        return Ok(composite);
    };
    let known = key_of_property_keys(schema);
    for (key, item) in original {
        if known.contains(key) {
            continue;
        }
        if check(ctx, unevaluated, references, item)? {
            merged.insert(key.clone(), clean(ctx, unevaluated, references, item.clone())?);
        }
    }
    Ok(Value::Object(merged))
}
