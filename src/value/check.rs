//! `Check`: structural validation of a value against a schema.

use std::collections::HashSet;

use regex::Regex;
use tracing::trace;

use crate::compose::key_of_pattern;
use crate::error::ValueError;
use crate::pattern;
use crate::registry::Context;
use crate::schema::{
    AdditionalProperties, ArraySchema, BigIntBounds, ByteBounds, DateBounds, IntersectSchema,
    NumberBounds, ObjectSchema, RecordSchema, Schema, SchemaKind, StringConstraints,
};
use crate::value::hash::hash;
use crate::value::Value;

use super::deref::{deref, import, pushref};

/// Stand-in for a missing property.
pub(crate) static UNDEFINED: Value = Value::Undefined;

pub(crate) fn check(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    value: &Value,
) -> Result<bool, ValueError> {
    Checker::new(ctx).visit(schema, references, value)
}

pub(crate) fn regex(source: &str) -> Result<Regex, ValueError> {
    pattern::compile(source).map_err(|source_error| ValueError::InvalidPattern {
        pattern: source.to_string(),
        source: source_error,
    })
}

pub(crate) fn regex_with_flags(source: &str, flags: &str) -> Result<Regex, ValueError> {
    pattern::compile_with_flags(source, flags).map_err(|source_error| {
        ValueError::InvalidPattern {
            pattern: source.to_string(),
            source: source_error,
        }
    })
}

pub(crate) fn unknown_kind(schema: &Schema) -> ValueError {
    ValueError::UnknownKind {
        schema: Box::new(schema.clone()),
    }
}

/// True when a schema admits `undefined`, so a required key holding it
/// must still be present.
pub(crate) fn extends_undefined(schema: &Schema) -> bool {
    match &schema.kind {
        SchemaKind::Undefined | SchemaKind::Void => true,
        SchemaKind::Intersect(intersect) => intersect.all_of.iter().all(extends_undefined),
        SchemaKind::Union(members) => members.iter().any(extends_undefined),
        SchemaKind::Not(inner) => !extends_undefined(inner),
        _ => false,
    }
}

pub(crate) fn number_in_bounds(bounds: &NumberBounds, n: f64) -> bool {
    bounds.exclusive_maximum.map_or(true, |m| n < m)
        && bounds.exclusive_minimum.map_or(true, |m| n > m)
        && bounds.maximum.map_or(true, |m| n <= m)
        && bounds.minimum.map_or(true, |m| n >= m)
        && bounds.multiple_of.map_or(true, |m| n % m == 0.0)
}

pub(crate) fn bigint_in_bounds(bounds: &BigIntBounds, n: i128) -> bool {
    bounds.exclusive_maximum.map_or(true, |m| n < m)
        && bounds.exclusive_minimum.map_or(true, |m| n > m)
        && bounds.maximum.map_or(true, |m| n <= m)
        && bounds.minimum.map_or(true, |m| n >= m)
        && bounds
            .multiple_of
            .map_or(true, |m| n.checked_rem(m) == Some(0))
}

pub(crate) fn date_in_bounds(bounds: &DateBounds, ms: f64) -> bool {
    bounds.exclusive_maximum_timestamp.map_or(true, |m| ms < m)
        && bounds.exclusive_minimum_timestamp.map_or(true, |m| ms > m)
        && bounds.maximum_timestamp.map_or(true, |m| ms <= m)
        && bounds.minimum_timestamp.map_or(true, |m| ms >= m)
        && bounds.multiple_of_timestamp.map_or(true, |m| ms % m == 0.0)
}

pub(crate) fn bytes_in_bounds(bounds: &ByteBounds, len: usize) -> bool {
    bounds.min_byte_length.map_or(true, |m| len >= m)
        && bounds.max_byte_length.map_or(true, |m| len <= m)
}

/// Length in characters, bounded by optional limits.
pub(crate) fn length_in_bounds(s: &str, min: Option<usize>, max: Option<usize>) -> bool {
    let len = s.chars().count();
    min.map_or(true, |m| len >= m) && max.map_or(true, |m| len <= m)
}

pub(crate) fn count_in_bounds(min: Option<usize>, max: Option<usize>, count: usize) -> bool {
    min.map_or(true, |m| count >= m) && max.map_or(true, |m| count <= m)
}

/// Whether the number of matching elements satisfies `minContains` /
/// `maxContains`. Without `minContains` at least one match is required.
pub(crate) fn contains_in_bounds(array: &ArraySchema, count: usize) -> bool {
    count >= array.min_contains.unwrap_or(1) && array.max_contains.map_or(true, |m| count <= m)
}

pub(crate) fn has_contains(array: &ArraySchema) -> bool {
    array.contains.is_some() || array.min_contains.is_some() || array.max_contains.is_some()
}

pub(crate) fn is_unique(items: &[Value]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(hash(item)))
}

/// Walker state for one `check` call.
pub(crate) struct Checker<'c> {
    ctx: &'c Context,
    /// `(reference, value address)` pairs currently being checked.
    active: HashSet<(String, usize)>,
}

impl<'c> Checker<'c> {
    pub(crate) fn new(ctx: &'c Context) -> Self {
        Self {
            ctx,
            active: HashSet::new(),
        }
    }

    pub(crate) fn visit<'a>(
        &mut self,
        schema: &'a Schema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        let scoped = pushref(schema, references);
        let references: &[&'a Schema] = &scoped;
        let policy = self.ctx.policy;
        let valid = match &schema.kind {
            SchemaKind::Any | SchemaKind::Unknown => true,
            SchemaKind::Never => false,
            SchemaKind::Void => policy.is_void_like(value),
            SchemaKind::Null => value.is_null(),
            SchemaKind::Undefined => value.is_undefined(),
            SchemaKind::Boolean => matches!(value, Value::Boolean(_)),
            SchemaKind::Symbol => matches!(value, Value::Symbol(_)),
            SchemaKind::Number(bounds) => match value {
                Value::Number(n) => policy.is_number_like(*n) && number_in_bounds(bounds, *n),
                _ => false,
            },
            SchemaKind::Integer(bounds) => match value {
                Value::Number(n) if value.is_integer() => number_in_bounds(bounds, *n),
                _ => false,
            },
            SchemaKind::BigInt(bounds) => match value {
                Value::BigInt(n) => bigint_in_bounds(bounds, *n),
                _ => false,
            },
            SchemaKind::String(constraints) => match value {
                Value::String(s) => self.string(constraints, s)?,
                _ => false,
            },
            SchemaKind::RegExp(regexp) => match value {
                Value::String(s) => {
                    length_in_bounds(s, regexp.min_length, regexp.max_length)
                        && regex_with_flags(&regexp.source, &regexp.flags)?.is_match(s)
                }
                _ => false,
            },
            SchemaKind::Date(bounds) => match value {
                Value::Date(ms) => !ms.is_nan() && date_in_bounds(bounds, *ms),
                _ => false,
            },
            SchemaKind::Uint8Array(bounds) => match value {
                Value::Uint8Array(bytes) => bytes_in_bounds(bounds, bytes.len()),
                _ => false,
            },
            SchemaKind::Literal(literal) => literal.matches(value),
            SchemaKind::TemplateLiteral(source) => match value {
                Value::String(s) => regex(source)?.is_match(s),
                _ => false,
            },
            SchemaKind::Array(array) => self.array(array, references, value)?,
            SchemaKind::Tuple(items) => self.tuple(items, references, value)?,
            SchemaKind::Object(object) => self.object(object, references, value)?,
            SchemaKind::Record(record) => self.record(record, references, value)?,
            SchemaKind::Union(members) => {
                for member in members {
                    if self.visit(member, references, value)? {
                        return Ok(true);
                    }
                }
                false
            }
            SchemaKind::Intersect(intersect) => {
                self.intersect(schema, intersect, references, value)?
            }
            SchemaKind::Not(inner) => !self.visit(inner, references, value)?,
            SchemaKind::Ref(id) | SchemaKind::This(id) => {
                self.reference(id, references, value)?
            }
            SchemaKind::Import(module) => {
                let (target, scope) = import(module, references)?;
                self.visit(target, &scope, value)?
            }
            SchemaKind::Promise(_) => matches!(value, Value::Promise),
            SchemaKind::Iterator(_) => matches!(value, Value::Iterator),
            SchemaKind::AsyncIterator(_) => matches!(value, Value::AsyncIterator),
            SchemaKind::Function(_) => matches!(value, Value::Function { .. }),
            SchemaKind::Constructor(_) => matches!(value, Value::Function { constructor: true }),
            SchemaKind::Custom(custom) => match self.ctx.types.get(&custom.kind) {
                Some(check) => check(schema, value),
                None => return Err(unknown_kind(schema)),
            },
            SchemaKind::Computed(_)
            | SchemaKind::MappedKey(_)
            | SchemaKind::MappedResult(_)
            | SchemaKind::Argument(_) => return Err(unknown_kind(schema)),
        };
        Ok(valid)
    }

    fn string(&self, constraints: &StringConstraints, s: &str) -> Result<bool, ValueError> {
        if !length_in_bounds(s, constraints.min_length, constraints.max_length) {
            return Ok(false);
        }
        if let Some(source) = &constraints.pattern {
            if !regex(source)?.is_match(s) {
                return Ok(false);
            }
        }
        match &constraints.format {
            Some(format) => Ok(self.ctx.formats.check(format, s)),
            None => Ok(true),
        }
    }

    fn array<'a>(
        &mut self,
        array: &'a ArraySchema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        let Value::Array(items) = value else {
            return Ok(false);
        };
        if !count_in_bounds(array.min_items, array.max_items, items.len()) {
            return Ok(false);
        }
        for item in items {
            if !self.visit(&array.items, references, item)? {
                return Ok(false);
            }
        }
        if array.unique_items && !is_unique(items) {
            return Ok(false);
        }
        if !has_contains(array) {
            return Ok(true);
        }
        let mut count = 0;
        if let Some(contains) = &array.contains {
            for item in items {
                if self.visit(contains, references, item)? {
                    count += 1;
                }
            }
        }
        Ok(contains_in_bounds(array, count))
    }

    fn tuple<'a>(
        &mut self,
        items: &'a [Schema],
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        let Value::Array(values) = value else {
            return Ok(false);
        };
        if values.len() != items.len() {
            return Ok(false);
        }
        for (item, element) in items.iter().zip(values) {
            if !self.visit(item, references, element)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn object<'a>(
        &mut self,
        object: &'a ObjectSchema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        let policy = self.ctx.policy;
        if !policy.is_object_like(value) {
            return Ok(false);
        }
        let keys = value.keys();
        if !count_in_bounds(object.min_properties, object.max_properties, keys.len()) {
            return Ok(false);
        }
        for (key, property) in &object.properties {
            let present = value.get(key);
            if property.optional {
                if policy.is_exact_optional_property(value, key)
                    && !self.visit(property, references, present.unwrap_or(&UNDEFINED))?
                {
                    return Ok(false);
                }
                continue;
            }
            if !self.visit(property, references, present.unwrap_or(&UNDEFINED))? {
                return Ok(false);
            }
            let admits_missing = extends_undefined(property)
                || matches!(property.kind, SchemaKind::Any | SchemaKind::Unknown);
            if present.is_none() && admits_missing {
                return Ok(false);
            }
        }
        match &object.additional_properties {
            AdditionalProperties::Allow => Ok(true),
            AdditionalProperties::Deny => {
                Ok(keys.iter().all(|key| object.properties.contains_key(key)))
            }
            AdditionalProperties::Schema(additional) => {
                for key in keys.iter().filter(|key| !object.properties.contains_key(*key)) {
                    let item = value.get(key).unwrap_or(&UNDEFINED);
                    if !self.visit(additional, references, item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
        }
    }

    fn record<'a>(
        &mut self,
        record: &'a RecordSchema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        if !self.ctx.policy.is_record_like(value) {
            return Ok(false);
        }
        let keys = value.keys();
        if !count_in_bounds(record.min_properties, record.max_properties, keys.len()) {
            return Ok(false);
        }
        let key_pattern = regex(&record.pattern)?;
        for key in &keys {
            let item = value.get(key).unwrap_or(&UNDEFINED);
            let valid = if key_pattern.is_match(key) {
                self.visit(&record.value, references, item)?
            } else {
                match &record.additional_properties {
                    AdditionalProperties::Allow => true,
                    AdditionalProperties::Deny => false,
                    AdditionalProperties::Schema(additional) => {
                        self.visit(additional, references, item)?
                    }
                }
            };
            if !valid {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn intersect<'a>(
        &mut self,
        schema: &'a Schema,
        intersect: &'a IntersectSchema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        for member in &intersect.all_of {
            if !self.visit(member, references, value)? {
                return Ok(false);
            }
        }
        if !intersect.unevaluated_properties.is_constrained() {
            return Ok(true);
        }
        let known = regex(&key_of_pattern(schema))?;
        for key in value.keys() {
            if known.is_match(&key) {
                continue;
            }
            let valid = match intersect.unevaluated_properties.schema() {
                Some(unevaluated) => {
                    self.visit(unevaluated, references, value.get(&key).unwrap_or(&UNDEFINED))?
                }
                None => false,
            };
            if !valid {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn reference<'a>(
        &mut self,
        id: &str,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        let target = deref(id, references)?;
        let key = (id.to_string(), value as *const Value as usize);
        // Owned values cannot cycle, so re-entry means the reference reached
        // itself without consuming input and proves nothing.
        if self.active.contains(&key) {
            trace!(reference = id, "re-entered reference on the same value, rejecting");
            return Ok(false);
        }
        self.active.insert(key.clone());
        let result = self.visit(target, references, value);
        self.active.remove(&key);
        result
    }
}
