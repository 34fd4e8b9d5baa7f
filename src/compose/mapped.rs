//! Mapped types: `{ [K in Keys]: F<K> }`.

use indexmap::IndexMap;

use crate::build::{literal, object};
use crate::schema::{Schema, SchemaKind};

use super::{index_property_keys, mapped_result};

/// Builds an object with one property per key selected by `keys`.
///
/// `f` is called once with a `MappedKey` standing for every key. Operators
/// applied to it inside `f` record per-key results in `MappedResult` nodes;
/// each key's property is then obtained by substituting that key into the
/// returned body. Optional and readonly markers on the body carry over to
/// the property.
pub fn mapped<F>(keys: &Schema, f: F) -> Schema
where
    F: FnOnce(&Schema) -> Schema,
{
    let keys = index_property_keys(keys);
    let body = f(&Schema::new(SchemaKind::MappedKey(keys.clone())));
    object(
        keys.iter()
            .map(|key| (key.clone(), substitute(key, &body)))
            .collect::<Vec<_>>(),
    )
}

fn substitute(key: &str, schema: &Schema) -> Schema {
    let replaced = match &schema.kind {
        SchemaKind::MappedResult(properties) => match properties.get(key) {
            Some(property) => substitute(key, property),
            None => return schema.clone(),
        },
        SchemaKind::MappedKey(keys) => {
            if keys.iter().any(|k| k == key) {
                literal(key)
            } else {
                let properties: IndexMap<String, Schema> = keys
                    .iter()
                    .map(|k| (k.clone(), literal(k.as_str())))
                    .collect();
                return mapped_result(properties);
            }
        }
        _ => return schema.clone().map_children(|child| substitute(key, &child)),
    };
    let mut replaced = replaced;
    replaced.optional |= schema.optional;
    replaced.readonly |= schema.readonly;
    replaced
}
