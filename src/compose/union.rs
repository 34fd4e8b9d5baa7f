//! Union construction.

use crate::build::never;
use crate::schema::{Schema, SchemaKind};

/// `A | B | ...`.
///
/// An empty union is `Never`; a single member is returned as is. The union
/// is optional when any member is; members lose their own optional marker.
pub fn union(types: &[Schema]) -> Schema {
    match types {
        [] => never(),
        [single] => single.clone(),
        _ => create_union(types.to_vec()),
    }
}

/// Union with evaluation: `Never` members are discarded and nested unions
/// (other than enums) are flattened before the identity rules apply.
pub fn union_evaluated(types: &[Schema]) -> Schema {
    let mut members = Vec::with_capacity(types.len());
    let mut optional = false;
    flatten(types, &mut members, &mut optional);
    let mut result = match members.len() {
        0 => never(),
        1 => members.remove(0),
        _ => create_union(members),
    };
    result.optional |= optional;
    result
}

fn flatten(types: &[Schema], out: &mut Vec<Schema>, optional: &mut bool) {
    for schema in types {
        *optional |= schema.optional;
        match &schema.kind {
            SchemaKind::Never => {}
            SchemaKind::Union(members) if !schema.is_enum() => flatten(members, out, optional),
            _ => {
                let mut member = schema.clone();
                member.optional = false;
                out.push(member);
            }
        }
    }
}

pub(crate) fn create_union(types: Vec<Schema>) -> Schema {
    let optional = types.iter().any(|schema| schema.optional);
    let members = types
        .into_iter()
        .map(|mut schema| {
            schema.optional = false;
            schema
        })
        .collect();
    let mut schema = Schema::new(SchemaKind::Union(members));
    schema.optional = optional;
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{enumeration, literal, number, string};
    use crate::compose::optional;
    use crate::types::Kind;

    #[test]
    fn identity_laws() {
        assert!(union(&[]).is_never());
        assert_eq!(union(&[number()]), number());
        assert_eq!(union(&[number(), string()]).kind(), Kind::Union);
    }

    #[test]
    fn optional_member_makes_union_optional() {
        let schema = union(&[optional(&number()), string()]);
        assert!(schema.optional);
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert!(members.iter().all(|m| !m.optional));
    }

    #[test]
    fn evaluated_discards_never_and_flattens() {
        let nested = union(&[literal("a"), literal("b")]);
        let schema = union_evaluated(&[nested, never(), literal("c")]);
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert_eq!(members, &vec![literal("a"), literal("b"), literal("c")]);
    }

    #[test]
    fn evaluated_keeps_enums_atomic() {
        let colors = enumeration([("Red", "red"), ("Blue", "blue")]).unwrap();
        let schema = union_evaluated(&[colors.clone(), number()]);
        let SchemaKind::Union(members) = &schema.kind else {
            panic!("expected union");
        };
        assert_eq!(members[0], colors);
    }

    #[test]
    fn evaluated_collapses_to_single_or_never() {
        assert!(union_evaluated(&[never(), never()]).is_never());
        assert_eq!(union_evaluated(&[never(), number()]), number());
    }
}
