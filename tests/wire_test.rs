//! Wire-form tests: interoperability with a JSON Schema validator and
//! round trips through `to_json`/`from_json`.

use pretty_assertions::assert_eq;
use serde_json::{json, Value as Json};
use typecraft::build::{
    array_with, bigint, boolean, date, integer_with, literal, never, null, number, object,
    object_with, string_with, tuple, uint8array, unknown,
};
use typecraft::compose::{intersect, optional, record, union};
use typecraft::{
    check, AdditionalProperties, ArraySchema, Kind, NumberBounds, ObjectSchema, Schema,
    StringConstraints, Value, X_KIND,
};

/// Asserts that the native check and a draft-7 validator over the wire form
/// agree on every sample.
fn assert_agrees(schema: &Schema, samples: &[Json]) {
    let wire = schema.to_json();
    let validator = jsonschema::draft7::new(&wire)
        .unwrap_or_else(|e| panic!("wire form {wire} did not compile: {e}"));
    for sample in samples {
        let native = check(schema, &[], &Value::from(sample.clone())).unwrap();
        assert_eq!(
            native,
            validator.is_valid(sample),
            "disagreement on {sample} against {wire}"
        );
    }
}

// === Interoperability ===

mod interoperability {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalars() {
        assert_agrees(&number(), &[json!(1), json!(1.5), json!("1"), json!(null)]);
        assert_agrees(&boolean(), &[json!(true), json!(0)]);
        assert_agrees(&null(), &[json!(null), json!(false)]);
        assert_agrees(&literal("on"), &[json!("on"), json!("off"), json!(1)]);
        assert_agrees(&unknown(), &[json!(1), json!({}), json!(null)]);
        assert_agrees(&never(), &[json!(1), json!(null)]);
    }

    #[test]
    fn numeric_bounds() {
        let schema = integer_with(NumberBounds {
            minimum: Some(0.0),
            exclusive_maximum: Some(10.0),
            multiple_of: Some(2.0),
            ..NumberBounds::default()
        });
        assert_agrees(
            &schema,
            &[json!(0), json!(4), json!(3), json!(10), json!(-2), json!(4.5)],
        );
    }

    #[test]
    fn string_constraints() {
        let schema = string_with(StringConstraints {
            min_length: Some(2),
            max_length: Some(4),
            pattern: Some("^[a-z]+$".into()),
            ..StringConstraints::default()
        });
        assert_agrees(
            &schema,
            &[json!("ab"), json!("abcd"), json!("a"), json!("abcde"), json!("AB")],
        );
    }

    #[test]
    fn objects_and_required() {
        let schema = object([("id", number()), ("name", optional(&string_with(Default::default())))]);
        assert_agrees(
            &schema,
            &[
                json!({ "id": 1 }),
                json!({ "id": 1, "name": "a" }),
                json!({ "name": "a" }),
                json!({ "id": 1, "name": 2 }),
                json!([]),
            ],
        );

        let closed = object_with(ObjectSchema {
            additional_properties: AdditionalProperties::Deny,
            ..ObjectSchema::default()
        });
        assert_agrees(&closed, &[json!({}), json!({ "a": 1 })]);
    }

    #[test]
    fn arrays_and_tuples() {
        let schema = array_with(ArraySchema::new(number()).min_items(1).unique_items());
        assert_agrees(&schema, &[json!([1, 2]), json!([]), json!([1, 1]), json!(["a"])]);

        let pair = tuple(vec![string_with(Default::default()), number()]);
        assert_agrees(
            &pair,
            &[json!(["a", 1]), json!(["a"]), json!(["a", 1, 2]), json!([1, "a"])],
        );
    }

    #[test]
    fn compositions() {
        let either = union(&[number(), string_with(Default::default())]);
        assert_agrees(&either, &[json!(1), json!("a"), json!(true)]);

        let both = intersect(&[object([("x", number())]), object([("y", number())])]).unwrap();
        assert_agrees(
            &both,
            &[json!({ "x": 1, "y": 2 }), json!({ "x": 1 }), json!({ "x": 1, "y": "2" })],
        );

        let map = record(&string_with(Default::default()), &number());
        assert_agrees(&map, &[json!({ "a": 1 }), json!({ "a": "b" }), json!({})]);
    }
}

// === Wire Shape ===

mod wire_shape {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extension_kinds_use_distinct_type_names() {
        assert_eq!(date().to_json(), json!({ "type": "Date" }));
        assert_eq!(uint8array().to_json(), json!({ "type": "Uint8Array" }));
        assert_eq!(bigint().to_json(), json!({ "type": "bigint" }));
    }

    #[test]
    fn options_and_required_are_emitted() {
        let schema = object([("id", number()), ("note", optional(&string_with(Default::default())))])
            .with_id("Item")
            .with_title("Item")
            .with_description("A line item");
        assert_eq!(
            schema.to_json(),
            json!({
                "$id": "Item",
                "title": "Item",
                "description": "A line item",
                "type": "object",
                "properties": {
                    "id": { "type": "number" },
                    "note": { "type": "string" }
                },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn internal_kinds_are_marked() {
        let deferred = typecraft::compose::partial(&typecraft::build::reference("User"));
        let wire = deferred.to_json();
        assert_eq!(wire[X_KIND], json!("Computed"));
        assert_eq!(Schema::from_json(&wire).unwrap().kind(), Kind::Computed);
    }
}

// === Round Trips ===

mod round_trips {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parsed_documents_check_like_their_source() {
        let document = json!({
            "type": "object",
            "properties": {
                "tags": { "type": "array", "items": { "type": "string" }, "maxItems": 2 },
                "kind": { "anyOf": [{ "const": "a", "type": "string" }, { "const": "b", "type": "string" }] }
            },
            "required": ["kind"]
        });
        let schema = Schema::from_json(&document).unwrap();
        assert_eq!(schema.to_json(), document);
        assert_agrees(
            &schema,
            &[
                json!({ "kind": "a" }),
                json!({ "kind": "c" }),
                json!({ "kind": "b", "tags": ["x", "y", "z"] }),
                json!({ "tags": [] }),
            ],
        );
    }

    #[test]
    fn optional_is_rederived_from_required() {
        let schema = Schema::from_json(&json!({
            "type": "object",
            "properties": { "a": { "type": "number" }, "b": { "type": "number" } },
            "required": ["b"]
        }))
        .unwrap();
        let typecraft::SchemaKind::Object(object) = &schema.kind else {
            panic!("expected object");
        };
        assert!(object.properties["a"].optional);
        assert!(!object.properties["b"].optional);
    }

    #[test]
    fn serde_round_trip() {
        let schema = union(&[null(), array_with(ArraySchema::new(number()).max_items(3))]);
        let text = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&text).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn malformed_documents_are_rejected() {
        let err = Schema::from_json(&json!({ "type": "object", "properties": { "x": { "type": 5 } } }))
            .unwrap_err();
        assert!(err.to_string().contains("/properties/x/type"), "{err}");
    }
}
