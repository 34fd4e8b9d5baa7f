//! Integration tests for Check and Errors.

use serde_json::{json, Map};
use typecraft::build::{
    array, array_with, custom, date, formatted, integer, literal, number, object, object_with,
    recursive_with_id, reference, string, tuple, undefined, void,
};
use typecraft::compose::{intersect, optional, record, union};
use typecraft::{
    check, errors, AdditionalProperties, ArraySchema, Context, Object, ObjectSchema, Policy,
    Schema, Value, ValueError,
};

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

// === End-to-end Scenarios ===

mod scenarios {
    use super::*;

    #[test]
    fn optional_property_must_match_when_present() {
        let schema = object([("x", number()), ("y", optional(&string()))]);
        assert!(check(&schema, &[], &value(json!({ "x": 1 }))).unwrap());
        assert!(!check(&schema, &[], &value(json!({ "x": 1, "y": 2 }))).unwrap());
    }

    #[test]
    fn record_checks_every_matching_key() {
        let schema = record(&string(), &number());
        let input = value(json!({ "a": 1, "b": "x" }));
        assert!(!check(&schema, &[], &input).unwrap());

        let cleaned = typecraft::clean(&schema, &[], input.clone()).unwrap();
        assert_eq!(cleaned, input);
        assert!(!check(&schema, &[], &cleaned).unwrap());

        let violations = errors(&schema, &[], &input).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "/b");
    }
}

// === Object Rules ===

mod objects {
    use super::*;

    #[test]
    fn required_property_accepting_undefined_must_be_present() {
        let schema = object([("x", union(&[number(), undefined()]))]);
        assert!(!check(&schema, &[], &Value::object()).unwrap());

        let mut present = Object::new();
        present.insert("x".into(), Value::Undefined);
        assert!(check(&schema, &[], &Value::Object(present)).unwrap());
    }

    #[test]
    fn additional_properties_false_rejects_unknown_keys() {
        let schema = object_with(ObjectSchema {
            additional_properties: AdditionalProperties::Deny,
            ..ObjectSchema::default()
        });
        assert!(check(&schema, &[], &value(json!({}))).unwrap());
        assert!(!check(&schema, &[], &value(json!({ "a": 1 }))).unwrap());
    }

    #[test]
    fn additional_properties_schema_checks_unknown_keys() {
        let mut inner = ObjectSchema::default();
        inner.properties.insert("id".into(), number());
        inner.additional_properties = AdditionalProperties::Schema(Box::new(string()));
        let schema = object_with(inner);
        assert!(check(&schema, &[], &value(json!({ "id": 1, "note": "a" }))).unwrap());
        assert!(!check(&schema, &[], &value(json!({ "id": 1, "note": 2 }))).unwrap());
    }

    #[test]
    fn exact_optional_policy() {
        let schema = object([("x", optional(&number()))]);
        let mut map = Object::new();
        map.insert("x".into(), Value::Undefined);
        let input = Value::Object(map);

        assert!(check(&schema, &[], &input).unwrap());
        let exact = Context::new().with_policy(Policy::default().exact_optional_property_types(true));
        assert!(!exact.check(&schema, &[], &input).unwrap());
    }

    #[test]
    fn intersection_requires_every_member() {
        let schema = intersect(&[object([("x", number())]), object([("y", string())])]).unwrap();
        assert!(check(&schema, &[], &value(json!({ "x": 1, "y": "a" }))).unwrap());
        assert!(!check(&schema, &[], &value(json!({ "x": 1 }))).unwrap());
    }
}

// === Arrays and Tuples ===

mod sequences {
    use super::*;

    #[test]
    fn array_cardinality_and_uniqueness() {
        let schema = array_with(ArraySchema::new(integer()).min_items(1).max_items(3).unique_items());
        assert!(check(&schema, &[], &value(json!([1, 2]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([1, 2, 3, 4]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([1, 1]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([1.5]))).unwrap());
    }

    #[test]
    fn array_contains_counts_matches() {
        let schema = array_with(
            ArraySchema::new(number())
                .contains(literal(0.0))
                .min_contains(2),
        );
        assert!(check(&schema, &[], &value(json!([0, 1, 0]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([0, 1]))).unwrap());
    }

    #[test]
    fn tuple_length_is_exact() {
        let schema = tuple(vec![string(), number()]);
        assert!(check(&schema, &[], &value(json!(["a", 1]))).unwrap());
        assert!(!check(&schema, &[], &value(json!(["a"]))).unwrap());
        assert!(!check(&schema, &[], &value(json!(["a", 1, 2]))).unwrap());
        assert!(!check(&schema, &[], &value(json!([1, "a"]))).unwrap());
    }
}

// === References and Recursion ===

mod references {
    use super::*;

    fn tree() -> Schema {
        recursive_with_id("Node", |this| {
            object([("value", number()), ("children", array(this))])
        })
    }

    #[test]
    fn recursive_schema_checks_deep_values() {
        let input = value(json!({
            "value": 1,
            "children": [
                { "value": 2, "children": [] },
                { "value": 3, "children": [{ "value": 4, "children": [] }] }
            ]
        }));
        assert!(check(&tree(), &[], &input).unwrap());

        let bad = value(json!({
            "value": 1,
            "children": [{ "value": "two", "children": [] }]
        }));
        assert!(!check(&tree(), &[], &bad).unwrap());
        assert_eq!(errors(&tree(), &[], &bad).unwrap()[0].path, "/children/0/value");
    }

    #[test]
    fn references_resolve_against_the_reference_list() {
        let refs = [object([("x", number())]).with_id("Point")];
        let schema = array(reference("Point"));
        assert!(check(&schema, &refs, &value(json!([{ "x": 1 }]))).unwrap());
        assert!(!check(&schema, &refs, &value(json!([{ "x": "1" }]))).unwrap());
    }

    #[test]
    fn reference_reaching_itself_does_not_accept_anything() {
        let refs = [union(&[reference("Loop"), number()]).with_id("Loop")];
        assert!(check(&reference("Loop"), &refs, &value(json!(1))).unwrap());
        assert!(!check(&reference("Loop"), &refs, &value(json!("x"))).unwrap());
        assert!(!errors(&reference("Loop"), &refs, &value(json!("x"))).unwrap().is_empty());

        let bare = [reference("Self").with_id("Self")];
        assert!(!check(&reference("Self"), &bare, &value(json!(1))).unwrap());
        assert_eq!(errors(&reference("Self"), &bare, &value(json!(1))).unwrap().len(), 1);
    }

    #[test]
    fn missing_reference_is_an_error() {
        let err = check(&reference("Nowhere"), &[], &value(json!(1))).unwrap_err();
        assert!(matches!(err, ValueError::Dereference { reference } if reference == "Nowhere"));
    }
}

// === Registries and Policy ===

mod registries {
    use super::*;

    #[test]
    fn unregistered_custom_kind_is_an_error() {
        let schema = custom("Even", Map::new());
        let err = check(&schema, &[], &value(json!(2))).unwrap_err();
        assert!(matches!(err, ValueError::UnknownKind { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn registered_custom_kind_is_used() {
        let ctx = Context::new().with_kind("Even", |_, value| {
            matches!(value, Value::Number(n) if n % 2.0 == 0.0)
        });
        let schema = custom("Even", Map::new());
        assert!(ctx.check(&schema, &[], &value(json!(2))).unwrap());
        assert!(!ctx.check(&schema, &[], &value(json!(3))).unwrap());
    }

    #[test]
    fn string_formats_come_from_the_registry() {
        let schema = formatted("uuid");
        let id = value(json!("0b6f1c2e-7a43-4d0e-9a61-3f1c2d4e5f60"));
        assert!(!check(&schema, &[], &id).unwrap());

        let ctx = Context::new().with_format("uuid", |s| s.len() == 36 && s.matches('-').count() == 4);
        assert!(ctx.check(&schema, &[], &id).unwrap());
    }

    #[test]
    fn void_and_nan_follow_policy() {
        assert!(!check(&void(), &[], &Value::Null).unwrap());
        let lenient = Context::new().with_policy(Policy::default().allow_null_void(true).allow_nan(true));
        assert!(lenient.check(&void(), &[], &Value::Null).unwrap());
        assert!(lenient.check(&number(), &[], &Value::Number(f64::INFINITY)).unwrap());
    }

    #[test]
    fn dates_are_distinct_from_numbers() {
        assert!(check(&date(), &[], &Value::Date(0.0)).unwrap());
        assert!(!check(&date(), &[], &Value::Date(f64::NAN)).unwrap());
        assert!(!check(&date(), &[], &value(json!(0))).unwrap());
    }
}
