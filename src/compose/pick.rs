//! `Pick<T, K>`.

use crate::build::object_with;
use crate::schema::{ObjectSchema, Schema, SchemaKind};
use crate::types::LiteralValue;

use super::{
    computed, create_intersect, derived_object, index_property_keys, is_deferred, map_keys,
    map_result, union,
};

/// Keeps only the properties of `schema` selected by the key schema.
///
/// Distributes over unions and intersections. Kinds without properties
/// (enums included) yield an empty object.
pub fn pick(schema: &Schema, keys: &Schema) -> Schema {
    if let SchemaKind::MappedResult(properties) = &schema.kind {
        return map_result(properties, |property| pick(property, keys));
    }
    if let SchemaKind::MappedKey(names) = &keys.kind {
        return map_keys(names, |key| pick(schema, key));
    }
    if is_deferred(schema) || is_deferred(keys) {
        return computed("Pick", vec![schema.clone(), keys.clone()]);
    }
    resolve(schema, &index_property_keys(keys))
}

/// [`pick`] over explicit property names.
pub fn pick_keys<K: AsRef<str>>(schema: &Schema, keys: &[K]) -> Schema {
    pick(schema, &key_union(keys))
}

pub(crate) fn key_union<K: AsRef<str>>(keys: &[K]) -> Schema {
    let literals: Vec<Schema> = keys
        .iter()
        .map(|key| Schema::new(SchemaKind::Literal(LiteralValue::from(key.as_ref()))))
        .collect();
    union(&literals)
}

fn resolve(schema: &Schema, keys: &[String]) -> Schema {
    match &schema.kind {
        SchemaKind::Intersect(intersect) => create_intersect(
            intersect
                .all_of
                .iter()
                .map(|member| resolve(member, keys))
                .collect(),
        ),
        SchemaKind::Union(members) if !schema.is_enum() => union(
            &members
                .iter()
                .map(|member| resolve(member, keys))
                .collect::<Vec<_>>(),
        ),
        SchemaKind::Object(object) => {
            let properties = object
                .properties
                .iter()
                .filter(|(key, _)| keys.contains(key))
                .map(|(key, property)| (key.clone(), property.clone()))
                .collect();
            derived_object(
                schema,
                ObjectSchema {
                    properties,
                    ..object.clone()
                },
            )
        }
        _ => object_with(ObjectSchema::default()),
    }
}
