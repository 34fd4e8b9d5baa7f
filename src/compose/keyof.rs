//! `keyof` and property key sets.

use crate::build::{literal, number, string};
use crate::pattern::{self, PATTERN_NUMBER, PATTERN_NUMBER_EXACT, PATTERN_STRING_EXACT};
use crate::schema::{Schema, SchemaKind};

use super::{computed, is_deferred, map_result, union_evaluated, NUMBER_KEY};

/// Property keys of a schema.
///
/// Objects yield their property names in declaration order, arrays the
/// [`NUMBER_KEY`] sentinel, tuples their indices. A union yields the keys
/// common to every member; an intersection yields the keys of any member.
pub fn key_of_property_keys(schema: &Schema) -> Vec<String> {
    property_keys(schema, false)
}

/// An anchored regex matching every key of `schema`, including record
/// patterns. Used to find unevaluated properties of an intersection.
pub fn key_of_pattern(schema: &Schema) -> String {
    let alternatives: Vec<String> = property_keys(schema, true)
        .into_iter()
        .map(|key| format!("({key})"))
        .collect();
    format!("^({})$", alternatives.join("|"))
}

fn property_keys(schema: &Schema, patterns: bool) -> Vec<String> {
    match &schema.kind {
        SchemaKind::Intersect(intersect) => {
            let mut keys: Vec<String> = Vec::new();
            for member in &intersect.all_of {
                for key in property_keys(member, patterns) {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            keys
        }
        SchemaKind::Union(members) => {
            let mut sets = members.iter().map(|member| property_keys(member, patterns));
            let Some(first) = sets.next() else {
                return Vec::new();
            };
            let rest: Vec<Vec<String>> = sets.collect();
            first
                .into_iter()
                .filter(|key| rest.iter().all(|set| set.contains(key)))
                .collect()
        }
        SchemaKind::Tuple(items) => (0..items.len()).map(|i| i.to_string()).collect(),
        SchemaKind::Array(_) if patterns => vec![PATTERN_NUMBER.to_string()],
        SchemaKind::Array(_) => vec![NUMBER_KEY.to_string()],
        SchemaKind::Object(object) if patterns => {
            object.properties.keys().map(|key| pattern::escape(key)).collect()
        }
        SchemaKind::Object(object) => object.properties.keys().cloned().collect(),
        SchemaKind::Record(record) if patterns => vec![strip_anchors(&record.pattern).to_string()],
        _ => Vec::new(),
    }
}

fn strip_anchors(pattern: &str) -> &str {
    match pattern.strip_prefix('^').and_then(|p| p.strip_suffix('$')) {
        Some(inner) => inner,
        None => pattern,
    }
}

/// `keyof T`: a union of the literal keys of `schema`.
///
/// The numeric sentinel becomes `Number`. A record yields its key type:
/// `String` or `Number` for the standard patterns, otherwise a template
/// literal over the pattern.
pub fn key_of(schema: &Schema) -> Schema {
    if is_deferred(schema) {
        return computed("KeyOf", vec![schema.clone()]);
    }
    match &schema.kind {
        SchemaKind::MappedResult(properties) => map_result(properties, key_of),
        SchemaKind::Record(record) => match record.pattern.as_str() {
            PATTERN_STRING_EXACT => string(),
            PATTERN_NUMBER_EXACT => number(),
            pattern => Schema::new(SchemaKind::TemplateLiteral(pattern.to_string())),
        },
        _ => {
            let keys: Vec<Schema> = key_of_property_keys(schema)
                .into_iter()
                .map(|key| {
                    if key == NUMBER_KEY {
                        number()
                    } else {
                        literal(key)
                    }
                })
                .collect();
            union_evaluated(&keys)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, reference, tuple};
    use crate::compose::{intersect, record, union};
    use crate::types::Kind;
    use pretty_assertions::assert_eq;

    fn point() -> Schema {
        crate::build::object([("x", number()), ("y", number())])
    }

    #[test]
    fn object_keys_in_declaration_order() {
        assert_eq!(key_of_property_keys(&point()), vec!["x", "y"]);
        let SchemaKind::Union(members) = key_of(&point()).kind else {
            panic!("expected union");
        };
        assert_eq!(members, vec![literal("x"), literal("y")]);
    }

    #[test]
    fn union_keys_are_common_keys() {
        let a = crate::build::object([("x", number())]);
        let b = crate::build::object([("y", number())]);
        assert!(key_of(&union(&[a.clone(), b.clone()])).is_never());
        let both = intersect(&[a, b]).unwrap();
        assert_eq!(key_of_property_keys(&both), vec!["x", "y"]);
    }

    #[test]
    fn array_and_tuple_keys() {
        assert_eq!(key_of(&array(string())).kind(), Kind::Number);
        assert_eq!(
            key_of_property_keys(&tuple(vec![string(), number()])),
            vec!["0", "1"]
        );
    }

    #[test]
    fn record_keys() {
        assert_eq!(key_of(&record(&string(), &number())).kind(), Kind::String);
        assert_eq!(key_of(&record(&number(), &number())).kind(), Kind::Number);
    }

    #[test]
    fn pattern_includes_records_and_escapes_names() {
        let a = crate::build::object([("a.b", number())]);
        let b = record(&number(), &string());
        let pattern = key_of_pattern(&intersect(&[a, b]).unwrap());
        assert_eq!(pattern, r"^((a\.b)|((0|[1-9][0-9]*)))$");
    }

    #[test]
    fn deferred_on_reference() {
        let schema = key_of(&reference("A"));
        assert_eq!(schema.kind(), Kind::Computed);
    }
}
