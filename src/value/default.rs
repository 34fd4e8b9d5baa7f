//! `Default`: fills in `default` annotations where a value is missing.

use crate::error::ValueError;
use crate::registry::Context;
use crate::schema::{Schema, SchemaKind};
use crate::value::Value;

use super::check::{check, regex};
use super::deref::{deref, import, pushref};

/// Returns the schema default when `value` is undefined. When both are
/// objects, the value's own keys win over the default's.
fn value_or_default(schema: &Schema, value: Value) -> Value {
    let Some(default) = &schema.options.default else {
        return value;
    };
    match value {
        Value::Undefined => default.materialize(),
        Value::Object(map) => match default.materialize() {
            Value::Object(mut merged) => {
                merged.extend(map);
                Value::Object(merged)
            }
            _ => Value::Object(map),
        },
        other => other,
    }
}

fn has_default(schema: &Schema) -> bool {
    schema.options.default.is_some()
}

pub(crate) fn default(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    value: Value,
) -> Result<Value, ValueError> {
    let scoped = pushref(schema, references);
    let references: &[&Schema] = &scoped;
    match &schema.kind {
        SchemaKind::Array(array) => {
            let value = if value.is_array() {
                value
            } else {
                value_or_default(schema, value)
            };
            match value {
                Value::Array(items) => Ok(Value::Array(
                    items
                        .into_iter()
                        .map(|item| default(ctx, &array.items, references, item))
                        .collect::<Result<_, _>>()?,
                )),
                other => Ok(other),
            }
        }
        SchemaKind::Date(_) => match value {
            Value::Date(ms) => Ok(Value::Date(ms)),
            other => Ok(value_or_default(schema, other)),
        },
        SchemaKind::Object(object) => {
            let defaulted = value_or_default(schema, value);
            let Value::Object(mut map) = defaulted else {
                return Ok(defaulted);
            };
            for (key, property) in &object.properties {
                let current = map.get(key).cloned().unwrap_or_default();
                let defaulted = default(ctx, property, references, current)?;
                if !defaulted.is_undefined() {
                    map.insert(key.clone(), defaulted);
                }
            }
            if let Some(additional) = object
                .additional_properties
                .schema()
                .filter(|s| has_default(s))
            {
                for (key, slot) in map.iter_mut() {
                    if object.properties.contains_key(key) {
                        continue;
                    }
                    let current = std::mem::take(slot);
                    *slot = default(ctx, additional, references, current)?;
                }
            }
            Ok(Value::Object(map))
        }
        SchemaKind::Record(record) => {
            let defaulted = value_or_default(schema, value);
            let Value::Object(mut map) = defaulted else {
                return Ok(defaulted);
            };
            let key_pattern = regex(&record.pattern)?;
            let additional = record
                .additional_properties
                .schema()
                .filter(|s| has_default(s));
            let keys: Vec<String> = map.keys().cloned().collect();
            for key in keys {
                let target = if key_pattern.is_match(&key) {
                    Some(record.value.as_ref()).filter(|s| has_default(s))
                } else {
                    additional
                };
                if let Some(target) = target {
                    if let Some(slot) = map.get_mut(&key) {
                        let current = std::mem::take(slot);
                        *slot = default(ctx, target, references, current)?;
                    }
                }
            }
            Ok(Value::Object(map))
        }
        SchemaKind::Tuple(items) => {
            let defaulted = value_or_default(schema, value);
            let Value::Array(mut values) = defaulted else {
                return Ok(defaulted);
            };
            for (index, item) in items.iter().enumerate() {
                let current = values.get(index).cloned().unwrap_or_default();
                let next = default(ctx, item, references, current)?;
                if index < values.len() {
                    values[index] = next;
                } else if next.is_undefined() {
                    break;
                } else {
                    values.push(next);
                }
            }
            Ok(Value::Array(values))
        }
        SchemaKind::Intersect(intersect) => {
            let defaulted = value_or_default(schema, value);
            let mut composite = Value::object();
            for member in &intersect.all_of {
                let next = default(ctx, member, references, defaulted.clone())?;
                composite = match (composite, next) {
                    (Value::Object(mut acc), Value::Object(next)) => {
                        acc.extend(next);
                        Value::Object(acc)
                    }
                    (_, next) => next,
                };
            }
            Ok(composite)
        }
        SchemaKind::Union(members) => {
            let defaulted = value_or_default(schema, value);
            for member in members {
                let candidate = default(ctx, member, references, defaulted.clone())?;
                if check(ctx, member, references, &candidate)? {
                    return Ok(candidate);
                }
            }
            Ok(defaulted)
        }
        SchemaKind::Ref(id) | SchemaKind::This(id) => {
            let target = deref(id, references)?;
            default(ctx, target, references, value_or_default(schema, value))
        }
        SchemaKind::Import(module) => {
            let (target, scope) = import(module, references)?;
            default(ctx, target, &scope, value_or_default(schema, value))
        }
        _ => Ok(value_or_default(schema, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, number, object, string, tuple};
    use crate::compose::{optional, union};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(schema: &Schema, value: Value) -> serde_json::Value {
        default(&Context::new(), schema, &[], value).unwrap().to_json()
    }

    #[test]
    fn fills_missing_properties() {
        let schema = object([
            ("x", number().with_default(1i64)),
            ("y", optional(&string())),
            ("z", string().with_default("z")),
        ]);
        assert_eq!(
            run(&schema, Value::from(json!({ "z": "given" }))),
            json!({ "z": "given", "x": 1 })
        );
    }

    #[test]
    fn undefined_properties_are_not_added() {
        let schema = object([("y", optional(&string()))]);
        let result = default(&Context::new(), &schema, &[], Value::object()).unwrap();
        assert_eq!(result, Value::object());
    }

    #[test]
    fn object_default_merges_under_value() {
        let schema = object([("a", number()), ("b", number())])
            .with_default(Value::from(json!({ "a": 1, "b": 2 })));
        assert_eq!(run(&schema, Value::from(json!({ "b": 5 }))), json!({ "a": 1, "b": 5 }));
        assert_eq!(run(&schema, Value::Undefined), json!({ "a": 1, "b": 2 }));
    }

    #[test]
    fn factory_defaults_are_fresh() {
        let schema = array(number()).with_default_fn(|| Value::Array(Vec::new()));
        let first = default(&Context::new(), &schema, &[], Value::Undefined).unwrap();
        let second = default(&Context::new(), &schema, &[], Value::Undefined).unwrap();
        assert_eq!(first, Value::Array(Vec::new()));
        assert_eq!(first, second);
    }

    #[test]
    fn array_elements_are_defaulted() {
        let schema = array(object([("n", number().with_default(0i64))]));
        assert_eq!(
            run(&schema, Value::from(json!([{}, { "n": 3 }]))),
            json!([{ "n": 0 }, { "n": 3 }])
        );
    }

    #[test]
    fn tuple_elements_are_defaulted() {
        let schema = tuple(vec![number().with_default(1i64), string().with_default("s")]);
        assert_eq!(run(&schema, Value::from(json!([5]))), json!([5, "s"]));
    }

    #[test]
    fn union_picks_first_branch_that_checks() {
        let schema = union(&[
            object([("kind", crate::build::literal("a")), ("n", number().with_default(1i64))]),
            object([("kind", crate::build::literal("b")), ("s", string().with_default("x"))]),
        ]);
        assert_eq!(
            run(&schema, Value::from(json!({ "kind": "b" }))),
            json!({ "kind": "b", "s": "x" })
        );
    }

    #[test]
    fn non_objects_pass_through() {
        let schema = object([("x", number().with_default(1i64))]);
        assert_eq!(run(&schema, Value::from("text")), json!("text"));
    }
}
