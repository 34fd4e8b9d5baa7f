//! `Omit<T, K>`.

use crate::build::object_with;
use crate::schema::{ObjectSchema, Schema, SchemaKind};

use super::pick::key_union;
use super::{
    computed, create_intersect, derived_object, index_property_keys, is_deferred, map_keys,
    map_result, union,
};

/// Removes the properties of `schema` selected by the key schema.
///
/// Distributes over unions and intersections. Kinds without properties
/// yield an empty object.
pub fn omit(schema: &Schema, keys: &Schema) -> Schema {
    if let SchemaKind::MappedResult(properties) = &schema.kind {
        return map_result(properties, |property| omit(property, keys));
    }
    if let SchemaKind::MappedKey(names) = &keys.kind {
        return map_keys(names, |key| omit(schema, key));
    }
    if is_deferred(schema) || is_deferred(keys) {
        return computed("Omit", vec![schema.clone(), keys.clone()]);
    }
    resolve(schema, &index_property_keys(keys))
}

/// [`omit`] over explicit property names.
pub fn omit_keys<K: AsRef<str>>(schema: &Schema, keys: &[K]) -> Schema {
    omit(schema, &key_union(keys))
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
                .filter(|(key, _)| !keys.contains(key))
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
