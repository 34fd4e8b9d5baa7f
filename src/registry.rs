//! Injectable lookup tables for custom kinds and string formats, and the
//! [`Context`] that carries them together with the [`Policy`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::schema::Schema;
use crate::types::Policy;
use crate::value::Value;

type KindCheck = dyn Fn(&Schema, &Value) -> bool + Send + Sync;
type FormatCheck = dyn Fn(&str) -> bool + Send + Sync;

/// Validators for user-registered schema kinds, keyed by kind name.
#[derive(Clone, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, Arc<KindCheck>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the validator for `kind`.
    pub fn set<F>(&mut self, kind: impl Into<String>, check: F)
    where
        F: Fn(&Schema, &Value) -> bool + Send + Sync + 'static,
    {
        self.entries.insert(kind.into(), Arc::new(check));
    }

    pub fn has(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    pub fn get(&self, kind: &str) -> Option<&Arc<KindCheck>> {
        self.entries.get(kind)
    }

    pub fn delete(&mut self, kind: &str) -> bool {
        self.entries.remove(kind).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.entries.keys().collect();
        kinds.sort();
        f.debug_struct("TypeRegistry").field("kinds", &kinds).finish()
    }
}

/// Validators for the `format` keyword of string schemas.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    entries: HashMap<String, Arc<FormatCheck>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<F>(&mut self, format: impl Into<String>, check: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.entries.insert(format.into(), Arc::new(check));
    }

    pub fn has(&self, format: &str) -> bool {
        self.entries.contains_key(format)
    }

    /// Tests `value` against a registered format. Unregistered formats fail.
    pub fn check(&self, format: &str, value: &str) -> bool {
        self.entries.get(format).map_or(false, |check| check(value))
    }

    pub fn delete(&mut self, format: &str) -> bool {
        self.entries.remove(format).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formats: Vec<&String> = self.entries.keys().collect();
        formats.sort();
        f.debug_struct("FormatRegistry")
            .field("formats", &formats)
            .finish()
    }
}

/// Configuration threaded through every value operation.
///
/// Value operations are methods on `Context` (see the `validator` module);
/// the crate-level free functions use a default context.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub policy: Policy,
    pub types: TypeRegistry,
    pub formats: FormatRegistry,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Registers a custom kind validator.
    pub fn with_kind<F>(mut self, kind: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Schema, &Value) -> bool + Send + Sync + 'static,
    {
        self.types.set(kind, check);
        self
    }

    /// Registers a string format validator.
    pub fn with_format<F>(mut self, format: impl Into<String>, check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.formats.set(format, check);
        self
    }
}
