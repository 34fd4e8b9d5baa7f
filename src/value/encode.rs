//! Transform encoding: the schema's own codec first, then children.

use tracing::debug;

use crate::compose::{from_key, key_of_property_keys};
use crate::error::ValueError;
use crate::registry::Context;
use crate::schema::{AdditionalProperties, Schema, SchemaKind};
use crate::value::{Object, Value};

use super::check::{check, regex};
use super::deref::{deref, import, pushref};
use super::errors::pointer;

fn apply(schema: &Schema, path: &str, value: Value) -> Result<Value, ValueError> {
    let Some(codec) = &schema.transform else {
        return Ok(value);
    };
    let original = value.clone();
    codec
        .encode(value)
        .map_err(|source| ValueError::TransformEncode {
            schema: Box::new(schema.clone()),
            path: path.to_string(),
            value: original,
            source,
        })
}

fn additional<F>(
    additional: &AdditionalProperties,
    path: &str,
    map: &mut Object,
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

pub(crate) fn encode(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    path: &str,
    value: Value,
) -> Result<Value, ValueError> {
    let scoped = pushref(schema, references);
    let references: &[&Schema] = &scoped;
    if let SchemaKind::Union(members) = &schema.kind {
        let encoded = apply(schema, path, value)?;
        return encode_union(ctx, schema, members, references, path, encoded);
    }
    let value = apply(schema, path, value)?;
    let encoded = match &schema.kind {
        SchemaKind::Array(array) => match value {
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let at = pointer(path, &index.to_string());
                    out.push(encode(ctx, &array.items, references, &at, item)?);
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
                            out.push(encode(ctx, item, references, &at, element)?);
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
                    if slot.is_undefined()
                        && (!matches!(property.kind, SchemaKind::Undefined) || exact)
                    {
                        continue;
                    }
                    let current = std::mem::take(slot);
                    *slot = encode(ctx, property, references, &pointer(path, key), current)?;
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
                    *slot = encode(ctx, &record.value, references, &pointer(path, key), current)?;
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
                    *slot = encode(ctx, &property, references, &pointer(path, key), current)?;
                }
                additional(&intersect.unevaluated_properties, path, &mut map, |key| {
                    known.iter().any(|k| k == key)
                })?;
                Value::Object(map)
            }
            other => other,
        },
        SchemaKind::Not(inner) => apply(inner, path, value)?,
        SchemaKind::Ref(id) | SchemaKind::This(id) => {
            let target = deref(id, references)?;
            encode(ctx, target, references, path, value)?
        }
        SchemaKind::Import(module) => {
            let (target, scope) = import(module, references)?;
            encode(ctx, target, &scope, path, value)?
        }
        _ => value,
    };
    Ok(encoded)
}

/// Picks the branch to encode with. A branch the value already satisfies
/// wins; otherwise each branch is tried speculatively and the first whose
/// output satisfies the union is kept. When no branch produces such an
/// output, the first codec failure is returned.
fn encode_union(
    ctx: &Context,
    schema: &Schema,
    members: &[Schema],
    references: &[&Schema],
    path: &str,
    value: Value,
) -> Result<Value, ValueError> {
    for member in members {
        if check(ctx, member, references, &value)? {
            return encode(ctx, member, references, path, value);
        }
    }
    let mut failure = None;
    for (index, member) in members.iter().enumerate() {
        match encode(ctx, member, references, path, value.clone()) {
            Ok(candidate) if check(ctx, schema, references, &candidate)? => {
                debug!(path, branch = index, "union encoded through speculative branch");
                return Ok(candidate);
            }
            Ok(_) => {}
            Err(err) => {
                debug!(path, branch = index, error = %err, "union branch failed to encode");
                failure.get_or_insert(err);
            }
        }
    }
    match failure {
        Some(err) => Err(err),
        None => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, literal, number, object, transform};
    use crate::compose::union;
    use serde_json::json;

    fn stringify() -> Schema {
        transform(number())
            .decode(|v| Ok(Value::String(v.as_f64().unwrap_or_default().to_string())))
            .encode(|v| {
                let text = v.as_str().unwrap_or_default().to_string();
                Ok(Value::Number(text.parse::<f64>()?))
            })
    }

    fn run(schema: &Schema, value: Value) -> Result<Value, ValueError> {
        encode(&Context::new(), schema, &[], "", value)
    }

    #[test]
    fn encodes_nested_properties() {
        let schema = object([("n", stringify()), ("items", array(stringify()))]);
        let mut map = Object::new();
        map.insert("n".into(), Value::from("1"));
        map.insert("items".into(), Value::Array(vec!["2".into(), "3".into()]));
        let encoded = run(&schema, Value::Object(map)).unwrap();
        assert_eq!(encoded.to_json(), json!({ "n": 1, "items": [2, 3] }));
    }

    #[test]
    fn parent_encodes_before_children() {
        let schema = transform(array(stringify()))
            .decode(Ok)
            .encode(|v| {
                let count = v.as_str().map(str::len).unwrap_or_default();
                Ok(Value::Array(vec![Value::from("7"); count]))
            });
        let encoded = run(&schema, Value::from("ab")).unwrap();
        assert_eq!(encoded.to_json(), json!([7, 7]));
    }

    #[test]
    fn union_falls_back_to_speculative_branch() {
        let schema = union(&[literal("none"), stringify()]);
        assert_eq!(run(&schema, Value::from("none")).unwrap(), Value::from("none"));
        assert_eq!(run(&schema, Value::from("4")).unwrap(), Value::Number(4.0));
    }

    #[test]
    fn codec_errors_carry_path() {
        let schema = object([("n", stringify())]);
        let mut map = Object::new();
        map.insert("n".into(), Value::from("x"));
        let err = run(&schema, Value::Object(map)).unwrap_err();
        assert!(matches!(
            err,
            ValueError::TransformEncode { ref path, .. } if path == "/n"
        ));
    }
}
