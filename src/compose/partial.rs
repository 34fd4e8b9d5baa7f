//! `Partial<T>`.

use crate::build::object_with;
use crate::schema::{ObjectSchema, Schema, SchemaKind};

use super::{computed, create_intersect, derived_object, is_deferred, map_result, optional, union};

/// Makes every property optional.
///
/// Distributes over unions and intersections, leaves primitive kinds and
/// enums untouched, and turns any other kind into an empty object.
pub fn partial(schema: &Schema) -> Schema {
    if let SchemaKind::MappedResult(properties) = &schema.kind {
        return map_result(properties, partial);
    }
    resolve(schema)
}

fn resolve(schema: &Schema) -> Schema {
    if is_deferred(schema) {
        return computed("Partial", vec![schema.clone()]);
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
                    .map(|(key, property)| (key.clone(), optional(property)))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, number, object, reference, string};
    use crate::compose::intersect;
    use crate::types::Kind;

    #[test]
    fn every_property_becomes_optional() {
        let schema = partial(&object([("x", number()), ("y", string())]));
        let SchemaKind::Object(object) = &schema.kind else {
            panic!("expected object");
        };
        assert!(object.required().is_empty());
    }

    #[test]
    fn distributes_over_intersect_and_defers_nested_refs() {
        let schema = intersect(&[object([("x", number())]), reference("B")]).unwrap();
        let SchemaKind::Intersect(inner) = partial(&schema).kind else {
            panic!("expected intersect");
        };
        assert_eq!(inner.all_of[0].kind(), Kind::Object);
        assert_eq!(inner.all_of[1].kind(), Kind::Computed);
    }

    #[test]
    fn primitives_are_identity_and_containers_degrade() {
        assert_eq!(partial(&number()), number());
        assert_eq!(partial(&array(number())).kind(), Kind::Object);
    }
}
