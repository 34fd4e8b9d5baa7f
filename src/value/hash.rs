//! Structural value hashing.
//!
//! FNV-1a (64 bit) over a type-tagged byte stream. Object keys are visited
//! in sorted order, so two objects with the same entries hash alike
//! regardless of insertion order.

use super::Value;

const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const PRIME: u64 = 0x0000_0100_0000_01b3;

#[repr(u8)]
enum Marker {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Object,
    Array,
    Date,
    Uint8Array,
    Symbol,
    BigInt,
    Function,
    Promise,
    Iterator,
    AsyncIterator,
}

struct Fnv1a(u64);

impl Fnv1a {
    fn byte(&mut self, byte: u8) {
        self.0 ^= u64::from(byte);
        self.0 = self.0.wrapping_mul(PRIME);
    }

    fn bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.byte(*byte);
        }
    }

    fn marker(&mut self, marker: Marker) {
        self.byte(marker as u8);
    }

    fn visit(&mut self, value: &Value) {
        match value {
            Value::Undefined => self.marker(Marker::Undefined),
            Value::Null => self.marker(Marker::Null),
            Value::Boolean(b) => {
                self.marker(Marker::Boolean);
                self.byte(u8::from(*b));
            }
            Value::Number(n) => {
                self.marker(Marker::Number);
                self.bytes(&n.to_le_bytes());
            }
            Value::BigInt(n) => {
                self.marker(Marker::BigInt);
                self.bytes(&n.to_le_bytes());
            }
            Value::String(s) => self.string(s),
            Value::Symbol(description) => {
                self.marker(Marker::Symbol);
                match description {
                    Some(description) => self.string(description),
                    None => self.marker(Marker::Undefined),
                }
            }
            Value::Date(ms) => {
                self.marker(Marker::Date);
                self.marker(Marker::Number);
                self.bytes(&ms.to_le_bytes());
            }
            Value::Uint8Array(bytes) => {
                self.marker(Marker::Uint8Array);
                self.bytes(bytes);
            }
            Value::Array(items) => {
                self.marker(Marker::Array);
                for item in items {
                    self.visit(item);
                }
            }
            Value::Object(map) => {
                self.marker(Marker::Object);
                let mut keys: Vec<&String> = map.keys().collect();
                keys.sort();
                for key in keys {
                    self.string(key);
                    self.visit(&map[key.as_str()]);
                }
            }
            Value::Function { constructor } => {
                self.marker(Marker::Function);
                self.byte(u8::from(*constructor));
            }
            Value::Promise => self.marker(Marker::Promise),
            Value::Iterator => self.marker(Marker::Iterator),
            Value::AsyncIterator => self.marker(Marker::AsyncIterator),
        }
    }

    fn string(&mut self, s: &str) {
        self.marker(Marker::String);
        self.bytes(s.as_bytes());
    }
}

/// Returns the FNV-1a 64 structural hash of `value`.
///
/// Opaque handles (functions, promises, iterators) hash by their type
/// marker only.
pub fn hash(value: &Value) -> u64 {
    let mut state = Fnv1a(OFFSET_BASIS);
    state.visit(value);
    state.0
}
