//! `Required<T>`.

use crate::build::object_with;
use crate::schema::{ObjectSchema, Schema, SchemaKind};

use super::{
    computed, create_intersect, derived_object, is_deferred, map_result, optional_remove, union,
};

/// Makes every property required. The inverse of [`partial`](super::partial).
pub fn required(schema: &Schema) -> Schema {
    if let SchemaKind::MappedResult(properties) = &schema.kind {
        return map_result(properties, required);
    }
    resolve(schema)
}

fn resolve(schema: &Schema) -> Schema {
    if is_deferred(schema) {
        return computed("Required", vec![schema.clone()]);
    }
    if schema.is_enum() {
        return schema.clone();
    }
    match &schema.kind {
        SchemaKind::Intersect(intersect) => {
            create_intersect(intersect.all_of.iter().map(resolve).collect())
        }
        SchemaKind::Union(members) => union(&members.iter().map(resolve).collect::<Vec<_>>()),
        SchemaKind::Object(object) => derived_object(
            schema,
            ObjectSchema {
                properties: object
                    .properties
                    .iter()
                    .map(|(key, property)| (key.clone(), optional_remove(property)))
                    .collect(),
                ..object.clone()
            },
        ),
        SchemaKind::BigInt(_)
        | SchemaKind::Boolean
        | SchemaKind::Integer(_)
        | SchemaKind::Literal(_)
        | SchemaKind::Null
        | SchemaKind::Number(_)
        | SchemaKind::String(_)
        | SchemaKind::Symbol
        | SchemaKind::Undefined => schema.clone(),
        _ => object_with(ObjectSchema::default()),
    }
}
