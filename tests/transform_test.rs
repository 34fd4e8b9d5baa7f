//! Integration tests for Decode, Encode and codec composition.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use typecraft::build::{array, literal, number, object, string, transform};
use typecraft::compose::union;
use typecraft::{decode, encode, has_transform, CodecError, Schema, Value, ValueError};

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// An object branch whose codec tags decoded values with `seen` and counts
/// its decode calls.
fn tagged_branch(tag: &'static str, field: (&'static str, Schema), calls: Arc<AtomicUsize>) -> Schema {
    let (name, schema) = field;
    transform(object([("kind", literal(tag)), (name, schema)]))
        .decode(move |v| {
            calls.fetch_add(1, Ordering::SeqCst);
            let mut map = v.as_object().cloned().unwrap_or_default();
            map.insert("seen".into(), Value::from(tag));
            Ok(Value::Object(map))
        })
        .encode(|v| {
            let mut map = v.as_object().cloned().unwrap_or_default();
            map.shift_remove("seen");
            Ok(Value::Object(map))
        })
}

/// Number <-> Date codec over millisecond timestamps.
fn timestamp() -> Schema {
    transform(number())
        .decode(|v| Ok(Value::Date(v.as_f64().unwrap_or(f64::NAN))))
        .encode(|v| match v {
            Value::Date(ms) => Ok(Value::Number(ms)),
            other => Err(format!("expected Date, got {}", other.type_name()).into()),
        })
}

// === Union Decoding ===

mod union_branches {
    use super::*;

    #[test]
    fn decode_invokes_only_the_matching_branch() {
        let a_calls = Arc::new(AtomicUsize::new(0));
        let b_calls = Arc::new(AtomicUsize::new(0));
        let schema = union(&[
            tagged_branch("a", ("a", number()), Arc::clone(&a_calls)),
            tagged_branch("b", ("b", string()), Arc::clone(&b_calls)),
        ]);

        let decoded = decode(&schema, &[], value(json!({ "kind": "a", "a": 5 }))).unwrap();
        assert_eq!(decoded.get("seen"), Some(&Value::from("a")));
        assert_eq!(a_calls.load(Ordering::SeqCst), 1);
        assert_eq!(b_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn encode_strips_branch_tags() {
        let schema = union(&[
            tagged_branch("a", ("a", number()), Arc::new(AtomicUsize::new(0))),
            tagged_branch("b", ("b", string()), Arc::new(AtomicUsize::new(0))),
        ]);
        let decoded = value(json!({ "kind": "b", "b": "x", "seen": "b" }));
        let encoded = encode(&schema, &[], decoded).unwrap();
        assert_eq!(encoded.to_json(), json!({ "kind": "b", "b": "x" }));
    }
}

// === Round Trip ===

mod round_trip {
    use super::*;

    fn event() -> Schema {
        object([("name", string()), ("at", timestamp()), ("tags", array(string()))])
    }

    #[test]
    fn encode_then_decode_is_stable_once_decoded() {
        let input = value(json!({ "name": "launch", "at": 1000, "tags": ["x"] }));
        let decoded = decode(&event(), &[], input).unwrap();
        assert_eq!(decoded.get("at"), Some(&Value::Date(1000.0)));

        let encoded = encode(&event(), &[], decoded.clone()).unwrap();
        assert_eq!(encoded.get("at"), Some(&Value::Number(1000.0)));
        assert_eq!(decode(&event(), &[], encoded).unwrap(), decoded);
    }

    #[test]
    fn schemas_without_codecs_pass_values_through() {
        let schema = object([("name", string())]);
        assert!(!has_transform(&schema, &[]).unwrap());
        let input = value(json!({ "name": "a" }));
        assert_eq!(decode(&schema, &[], input.clone()).unwrap(), input);
        assert_eq!(encode(&schema, &[], input.clone()).unwrap(), input);
    }
}

// === Codec Composition ===

mod composition {
    use super::*;

    fn append(suffix: &'static str) -> impl Fn(Value) -> Result<Value, CodecError> + Send + Sync {
        move |v| Ok(Value::String(format!("{}{}", v.as_str().unwrap_or_default(), suffix)))
    }

    fn strip(suffix: &'static str) -> impl Fn(Value) -> Result<Value, CodecError> + Send + Sync {
        move |v| {
            let s = v.as_str().unwrap_or_default();
            Ok(Value::from(s.strip_suffix(suffix).unwrap_or(s)))
        }
    }

    #[test]
    fn decode_runs_inner_then_outer_and_encode_reverses() {
        let inner = transform(string()).decode(append("-inner")).encode(strip("-inner"));
        let outer = transform(inner).decode(append("-outer")).encode(strip("-outer"));

        let decoded = decode(&outer, &[], Value::from("v")).unwrap();
        assert_eq!(decoded, Value::from("v-inner-outer"));
        assert_eq!(encode(&outer, &[], decoded).unwrap(), Value::from("v"));
    }
}

// === Failures ===

mod failures {
    use super::*;

    #[test]
    fn codec_errors_carry_the_path() {
        let failing = transform(number())
            .decode(|v| match v.as_f64() {
                Some(n) if n >= 0.0 => Ok(v),
                _ => Err("negative amounts are not allowed".into()),
            })
            .encode(Ok);
        let schema = object([("amounts", array(failing))]);

        let err = decode(&schema, &[], value(json!({ "amounts": [1, -2] }))).unwrap_err();
        let ValueError::TransformDecode { path, value, .. } = &err else {
            panic!("expected decode error, got {err:?}");
        };
        assert_eq!(path, "/amounts/1");
        assert_eq!(value, &Value::Number(-2.0));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn decode_rejects_values_that_do_not_check() {
        let err = decode(&timestamp(), &[], Value::from("soon")).unwrap_err();
        assert!(matches!(err, ValueError::DecodeCheck { .. }));
        assert_eq!(err.violations()[0].path, "");
    }

    #[test]
    fn union_encode_reports_the_branch_codec_failure() {
        let failing = transform(number())
            .decode(Ok)
            .encode(|_| Err("cannot encode amount".into()));
        let schema = union(&[literal("none"), failing]);

        let err = encode(&schema, &[], Value::from("abc")).unwrap_err();
        let ValueError::TransformEncode { path, value, source, .. } = &err else {
            panic!("expected encode error, got {err:?}");
        };
        assert_eq!(path, "");
        assert_eq!(value, &Value::from("abc"));
        assert_eq!(source.to_string(), "cannot encode amount");
    }

    #[test]
    fn encode_rejects_unencodable_values() {
        let err = encode(&timestamp(), &[], Value::from("soon")).unwrap_err();
        assert!(matches!(err, ValueError::TransformEncode { .. }));
    }
}
