//! `Composite<[A, B, ...]>`: flattens an intersection of object types into
//! a single object.

use indexmap::IndexMap;

use crate::build::object_with;
use crate::error::TypeError;
use crate::schema::{ObjectSchema, Schema};

use super::indexed::from_key;
use super::{intersect_evaluated, key_of_property_keys};

/// Builds one object over the keys of every member. Each property is the
/// evaluated intersection of that key's type in the members that have it.
///
/// # Errors
///
/// Returns `TypeError::IntersectTransform` when a property would intersect
/// transformed schemas.
pub fn composite(types: &[Schema]) -> Result<Schema, TypeError> {
    let mut keys: Vec<String> = Vec::new();
    for schema in types {
        for key in key_of_property_keys(schema) {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    let mut properties = IndexMap::with_capacity(keys.len());
    for key in keys {
        let members: Vec<Schema> = types
            .iter()
            .map(|schema| from_key(schema, &key))
            .filter(|result| !result.is_never())
            .collect();
        properties.insert(key, intersect_evaluated(&members)?);
    }
    Ok(object_with(ObjectSchema {
        properties,
        ..Default::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{number, object, string, transform};
    use crate::compose::optional;
    use crate::schema::SchemaKind;
    use crate::types::Kind;

    #[test]
    fn merges_member_properties() {
        let a = object([("x", number()), ("y", string())]);
        let b = object([("y", string()), ("z", optional(&number()))]);
        let schema = composite(&[a, b]).unwrap();
        let SchemaKind::Object(object) = &schema.kind else {
            panic!("expected object");
        };
        assert_eq!(object.required(), vec!["x", "y"]);
        assert_eq!(object.properties["y"].kind(), Kind::Intersect);
        assert!(object.properties["z"].optional);
    }

    #[test]
    fn rejects_transformed_overlap() {
        let codec = transform(number()).decode(Ok).encode(Ok);
        let a = object([("x", codec)]);
        let b = object([("x", number())]);
        assert!(matches!(
            composite(&[a, b]),
            Err(TypeError::IntersectTransform)
        ));
    }
}
