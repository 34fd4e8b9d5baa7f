//! `Record<K, V>`.

use crate::build::{never, object_with};
use crate::pattern::{PATTERN_NEVER_EXACT, PATTERN_NUMBER_EXACT, PATTERN_STRING_EXACT};
use crate::schema::{AdditionalProperties, ObjectSchema, RecordSchema, Schema, SchemaKind};

use super::template::is_template_literal_finite;
use super::{computed, index_property_keys, is_deferred};

/// Builds a record from a key schema and a value schema.
///
/// Keys that enumerate to a finite set (literals, unions of literals,
/// enums, booleans, finite template literals) produce an object with one
/// required property per key. Open key kinds produce a pattern record:
/// `Number`/`Integer` use the numeric pattern, `String` its own pattern or
/// the any-string pattern, `Any` the any-string pattern, `Never` a pattern
/// matching nothing and `RegExp` its source. Other key kinds yield `Never`.
pub fn record(key: &Schema, value: &Schema) -> Schema {
    if is_deferred(key) || matches!(value.kind, SchemaKind::Computed(_)) {
        return computed("Record", vec![key.clone(), value.clone()]);
    }
    match &key.kind {
        SchemaKind::Union(_) | SchemaKind::Literal(_) => from_keys(index_property_keys(key), value),
        SchemaKind::TemplateLiteral(pattern) => {
            if is_template_literal_finite(key) {
                from_keys(index_property_keys(key), value)
            } else {
                from_pattern(pattern, value)
            }
        }
        SchemaKind::Boolean => from_keys(vec!["true".into(), "false".into()], value),
        SchemaKind::Integer(_) | SchemaKind::Number(_) => from_pattern(PATTERN_NUMBER_EXACT, value),
        SchemaKind::RegExp(regexp) => from_pattern(&regexp.source, value),
        SchemaKind::String(constraints) => from_pattern(
            constraints.pattern.as_deref().unwrap_or(PATTERN_STRING_EXACT),
            value,
        ),
        SchemaKind::Any => from_pattern(PATTERN_STRING_EXACT, value),
        SchemaKind::Never => from_pattern(PATTERN_NEVER_EXACT, value),
        _ => never(),
    }
}

fn from_pattern(pattern: &str, value: &Schema) -> Schema {
    Schema::new(SchemaKind::Record(RecordSchema {
        pattern: pattern.to_string(),
        value: Box::new(value.clone()),
        additional_properties: AdditionalProperties::default(),
        min_properties: None,
        max_properties: None,
    }))
}

fn from_keys(keys: Vec<String>, value: &Schema) -> Schema {
    let mut property = value.clone();
    property.optional = false;
    object_with(ObjectSchema {
        properties: keys
            .into_iter()
            .map(|key| (key, property.clone()))
            .collect(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{any, boolean, enumeration, literal, number, reference, regexp, string};
    use crate::compose::{key_of_property_keys, template_literal_syntax, union};
    use crate::types::Kind;
    use pretty_assertions::assert_eq;

    #[test]
    fn finite_keys_build_an_object() {
        let schema = record(&union(&[literal("a"), literal("b")]), &number());
        let SchemaKind::Object(object) = &schema.kind else {
            panic!("expected object");
        };
        assert_eq!(object.required(), vec!["a", "b"]);

        let colors = enumeration([("Red", "red"), ("Blue", "blue")]).unwrap();
        assert_eq!(
            key_of_property_keys(&record(&colors, &number())),
            vec!["red", "blue"]
        );
        assert_eq!(
            key_of_property_keys(&record(&boolean(), &number())),
            vec!["true", "false"]
        );
    }

    #[test]
    fn open_keys_build_a_pattern_record() {
        let cases = [
            (string(), PATTERN_STRING_EXACT.to_string()),
            (number(), PATTERN_NUMBER_EXACT.to_string()),
            (any(), PATTERN_STRING_EXACT.to_string()),
            (never(), PATTERN_NEVER_EXACT.to_string()),
            (regexp("^x_"), "^x_".to_string()),
        ];
        for (key, expected) in cases {
            let SchemaKind::Record(inner) = record(&key, &number()).kind else {
                panic!("expected record for {}", key.kind_name());
            };
            assert_eq!(inner.pattern, expected);
        }
    }

    #[test]
    fn infinite_template_literal_stays_a_pattern() {
        let key = template_literal_syntax("${\"a\"|\"b\"}_${number}").unwrap();
        let schema = record(&key, &string());
        assert_eq!(schema.kind(), Kind::Record);
    }

    #[test]
    fn deferred_on_reference_key() {
        assert_eq!(record(&reference("K"), &number()).kind(), Kind::Computed);
    }
}
