//! Indexed access: `T[K]`.

use crate::build::never;
use crate::schema::{Schema, SchemaKind};

use super::pick::key_union;
use super::template::template_literal_generate;
use super::{
    computed, evaluate_intersect, is_deferred, map_keys, map_result, union_evaluated, NUMBER_KEY,
};

/// Property keys selected by a key schema.
///
/// Literals yield their key, `Number`/`Integer` the [`NUMBER_KEY`]
/// sentinel, finite template literals their expansion and unions the keys
/// of every member. Other kinds select nothing.
pub fn index_property_keys(key: &Schema) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    collect_keys(key, &mut keys);
    keys
}

fn collect_keys(key: &Schema, out: &mut Vec<String>) {
    fn push(out: &mut Vec<String>, key: String) {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    match &key.kind {
        SchemaKind::TemplateLiteral(_) => {
            for generated in template_literal_generate(key).unwrap_or_default() {
                push(out, generated);
            }
        }
        SchemaKind::Union(members) => {
            for member in members {
                collect_keys(member, out);
            }
        }
        SchemaKind::Literal(value) => push(out, value.to_key()),
        SchemaKind::Number(_) | SchemaKind::Integer(_) => push(out, NUMBER_KEY.to_string()),
        _ => {}
    }
}

/// `T[K]` where `key` is a key schema (literal, union of literals, number,
/// finite template literal, `MappedKey` or a reference).
pub fn index(schema: &Schema, key: &Schema) -> Schema {
    if is_deferred(schema) || is_deferred(key) {
        return computed("Index", vec![schema.clone(), key.clone()]);
    }
    match &key.kind {
        SchemaKind::MappedResult(properties) => map_result(properties, |key| index(schema, key)),
        SchemaKind::MappedKey(keys) => map_keys(keys, |key| index(schema, key)),
        _ => from_keys(schema, &index_property_keys(key)),
    }
}

/// `T[K]` over explicit property keys.
pub fn index_keys<K: AsRef<str>>(schema: &Schema, keys: &[K]) -> Schema {
    index(schema, &key_union(keys))
}

fn from_keys(schema: &Schema, keys: &[String]) -> Schema {
    let results: Vec<Schema> = keys.iter().map(|key| from_key(schema, key)).collect();
    union_evaluated(&results)
}

pub(crate) fn from_key(schema: &Schema, key: &str) -> Schema {
    match &schema.kind {
        SchemaKind::Intersect(intersect) => {
            let results: Vec<Schema> = intersect
                .all_of
                .iter()
                .map(|member| from_key(member, key))
                .filter(|result| !result.is_never())
                .collect();
            evaluate_intersect(results)
        }
        SchemaKind::Union(members) => {
            let results: Vec<Schema> = members.iter().map(|member| from_key(member, key)).collect();
            if results.iter().any(Schema::is_never) {
                never()
            } else {
                union_evaluated(&results)
            }
        }
        SchemaKind::Tuple(items) => {
            if key == NUMBER_KEY {
                union_evaluated(items)
            } else {
                key.parse::<usize>()
                    .ok()
                    .and_then(|i| items.get(i))
                    .cloned()
                    .unwrap_or_else(never)
            }
        }
        SchemaKind::Array(array) => {
            if key == NUMBER_KEY || key.parse::<usize>().is_ok() {
                array.items.as_ref().clone()
            } else {
                never()
            }
        }
        SchemaKind::Object(object) => object.properties.get(key).cloned().unwrap_or_else(never),
        _ => never(),
    }
}
