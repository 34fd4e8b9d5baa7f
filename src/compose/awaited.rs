//! `Awaited<T>`.

use crate::schema::{Schema, SchemaKind};

use super::{computed, create_intersect, is_deferred, union};

/// Unwraps (nested) promises, distributing over unions and intersections.
pub fn awaited(schema: &Schema) -> Schema {
    if is_deferred(schema) {
        return computed("Awaited", vec![schema.clone()]);
    }
    match &schema.kind {
        SchemaKind::Promise(item) => awaited(item),
        SchemaKind::Union(members) => union(&members.iter().map(awaited).collect::<Vec<_>>()),
        SchemaKind::Intersect(intersect) => {
            create_intersect(intersect.all_of.iter().map(awaited).collect())
        }
        _ => schema.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{number, promise, reference, string};
    use crate::types::Kind;

    #[test]
    fn unwraps_nested_promises() {
        assert_eq!(awaited(&promise(promise(number()))), number());
        assert_eq!(awaited(&string()), string());
    }

    #[test]
    fn distributes_over_union() {
        let schema = union(&[promise(number()), string()]);
        assert_eq!(awaited(&schema), union(&[number(), string()]));
    }

    #[test]
    fn defers_on_reference() {
        assert_eq!(awaited(&reference("P")).kind(), Kind::Computed);
    }
}
