//! `Errors`: the reporting twin of `Check`.
//!
//! Walks the same structure as [`check`](super::check) but keeps going after
//! a failure, recording one [`Violation`] per failed constraint with a JSON
//! pointer to the offending value.

use std::collections::HashSet;

use crate::compose::key_of_pattern;
use crate::error::{ValueError, Violation};
use crate::registry::Context;
use crate::schema::{
    AdditionalProperties, ArraySchema, BigIntBounds, DateBounds, IntersectSchema, NumberBounds,
    ObjectSchema, RecordSchema, Schema, SchemaKind, StringConstraints,
};
use crate::types::{format_number, LiteralValue};
use crate::value::Value;

use super::check::{
    count_in_bounds, extends_undefined, has_contains, is_unique, regex, regex_with_flags,
    unknown_kind, Checker, UNDEFINED,
};
use super::deref::{deref, import, pushref};

pub(crate) fn errors(
    ctx: &Context,
    schema: &Schema,
    references: &[&Schema],
    value: &Value,
) -> Result<Vec<Violation>, ValueError> {
    let mut collector = Collector {
        ctx,
        checker: Checker::new(ctx),
        active: HashSet::new(),
        violations: Vec::new(),
    };
    collector.visit(schema, references, "", value)?;
    Ok(collector.violations)
}

/// Appends an escaped reference token to a JSON pointer.
pub(crate) fn pointer(path: &str, key: &str) -> String {
    format!("{}/{}", path, key.replace('~', "~0").replace('/', "~1"))
}

struct Collector<'c> {
    ctx: &'c Context,
    checker: Checker<'c>,
    /// References being reported on, keyed like the checker's cycle breaker.
    active: HashSet<(String, usize)>,
    violations: Vec<Violation>,
}

impl<'c> Collector<'c> {
    fn push(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(Violation {
            path: path.to_string(),
            message: message.into(),
        });
    }

    fn check<'a>(
        &mut self,
        schema: &'a Schema,
        references: &[&'a Schema],
        value: &Value,
    ) -> Result<bool, ValueError> {
        self.checker.visit(schema, references, value)
    }

    fn visit<'a>(
        &mut self,
        schema: &'a Schema,
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        let scoped = pushref(schema, references);
        let references: &[&'a Schema] = &scoped;
        let policy = self.ctx.policy;
        match &schema.kind {
            SchemaKind::Any | SchemaKind::Unknown => {}
            SchemaKind::Never => self.push(path, "never"),
            SchemaKind::Void => {
                if !policy.is_void_like(value) {
                    self.push(path, "expected void");
                }
            }
            SchemaKind::Null => {
                if !value.is_null() {
                    self.push(path, "expected null");
                }
            }
            SchemaKind::Undefined => {
                if !value.is_undefined() {
                    self.push(path, "expected undefined");
                }
            }
            SchemaKind::Boolean => {
                if !matches!(value, Value::Boolean(_)) {
                    self.push(path, "expected boolean");
                }
            }
            SchemaKind::Symbol => {
                if !matches!(value, Value::Symbol(_)) {
                    self.push(path, "expected symbol");
                }
            }
            SchemaKind::Number(bounds) => match value {
                Value::Number(n) if policy.is_number_like(*n) => {
                    self.number_bounds("number", bounds, path, *n)
                }
                _ => self.push(path, "expected number"),
            },
            SchemaKind::Integer(bounds) => match value {
                Value::Number(n) if value.is_integer() => {
                    self.number_bounds("integer", bounds, path, *n)
                }
                _ => self.push(path, "expected integer"),
            },
            SchemaKind::BigInt(bounds) => match value {
                Value::BigInt(n) => self.bigint_bounds(bounds, path, *n),
                _ => self.push(path, "expected bigint"),
            },
            SchemaKind::String(constraints) => match value {
                Value::String(s) => self.string(constraints, path, s)?,
                _ => self.push(path, "expected string"),
            },
            SchemaKind::RegExp(regexp) => match value {
                Value::String(s) => {
                    self.length(path, s, regexp.min_length, regexp.max_length);
                    if !regex_with_flags(&regexp.source, &regexp.flags)?.is_match(s) {
                        self.push(path, "expected string to match regular expression");
                    }
                }
                _ => self.push(path, "expected string"),
            },
            SchemaKind::Date(bounds) => match value {
                Value::Date(ms) if ms.is_nan() => self.push(path, "invalid Date"),
                Value::Date(ms) => self.date_bounds(bounds, path, *ms),
                _ => self.push(path, "expected Date"),
            },
            SchemaKind::Uint8Array(bounds) => match value {
                Value::Uint8Array(bytes) => {
                    if let Some(min) = bounds.min_byte_length.filter(|m| bytes.len() < *m) {
                        self.push(path, format!("expected byte length greater or equal to {min}"));
                    }
                    if let Some(max) = bounds.max_byte_length.filter(|m| bytes.len() > *m) {
                        self.push(path, format!("expected byte length less or equal to {max}"));
                    }
                }
                _ => self.push(path, "expected Uint8Array"),
            },
            SchemaKind::Literal(literal) => {
                if !literal.matches(value) {
                    self.push(path, format!("expected {}", describe(literal)));
                }
            }
            SchemaKind::TemplateLiteral(source) => match value {
                Value::String(s) if regex(source)?.is_match(s) => {}
                Value::String(_) => {
                    self.push(path, format!("expected string to match '{source}'"));
                }
                _ => self.push(path, "expected string"),
            },
            SchemaKind::Array(array) => self.array(array, references, path, value)?,
            SchemaKind::Tuple(items) => self.tuple(items, references, path, value)?,
            SchemaKind::Object(object) => self.object(object, references, path, value)?,
            SchemaKind::Record(record) => self.record(record, references, path, value)?,
            SchemaKind::Union(members) => {
                let mut matched = false;
                for member in members {
                    if self.check(member, references, value)? {
                        matched = true;
                        break;
                    }
                }
                if !matched {
                    self.push(path, "expected union value");
                }
            }
            SchemaKind::Intersect(intersect) => {
                self.intersect(schema, intersect, references, path, value)?
            }
            SchemaKind::Not(inner) => {
                if self.check(inner, references, value)? {
                    self.push(path, "value should not match");
                }
            }
            SchemaKind::Ref(id) | SchemaKind::This(id) => {
                let target = deref(id, references)?;
                let key = (id.clone(), value as *const Value as usize);
                if self.active.contains(&key) {
                    self.push(path, format!("reference '{id}' recurses without matching"));
                    return Ok(());
                }
                if self.check(target, references, value)? {
                    return Ok(());
                }
                self.active.insert(key.clone());
                let result = self.visit(target, references, path, value);
                self.active.remove(&key);
                result?;
            }
            SchemaKind::Import(module) => {
                let (target, scope) = import(module, references)?;
                self.visit(target, &scope, path, value)?;
            }
            SchemaKind::Promise(_) => {
                if !matches!(value, Value::Promise) {
                    self.push(path, "expected Promise");
                }
            }
            SchemaKind::Iterator(_) => {
                if !matches!(value, Value::Iterator) {
                    self.push(path, "expected Iterator");
                }
            }
            SchemaKind::AsyncIterator(_) => {
                if !matches!(value, Value::AsyncIterator) {
                    self.push(path, "expected AsyncIterator");
                }
            }
            SchemaKind::Function(_) => {
                if !matches!(value, Value::Function { .. }) {
                    self.push(path, "expected function");
                }
            }
            SchemaKind::Constructor(_) => {
                if !matches!(value, Value::Function { constructor: true }) {
                    self.push(path, "expected constructor");
                }
            }
            SchemaKind::Custom(custom) => match self.ctx.types.get(&custom.kind) {
                Some(check) => {
                    if !check(schema, value) {
                        self.push(path, format!("expected kind '{}'", custom.kind));
                    }
                }
                None => return Err(unknown_kind(schema)),
            },
            SchemaKind::Computed(_)
            | SchemaKind::MappedKey(_)
            | SchemaKind::MappedResult(_)
            | SchemaKind::Argument(_) => return Err(unknown_kind(schema)),
        }
        Ok(())
    }

    fn number_bounds(&mut self, name: &str, bounds: &NumberBounds, path: &str, n: f64) {
        if let Some(m) = bounds.exclusive_maximum.filter(|m| n >= *m) {
            self.push(path, format!("expected {name} to be less than {}", format_number(m)));
        }
        if let Some(m) = bounds.exclusive_minimum.filter(|m| n <= *m) {
            self.push(path, format!("expected {name} to be greater than {}", format_number(m)));
        }
        if let Some(m) = bounds.maximum.filter(|m| n > *m) {
            self.push(
                path,
                format!("expected {name} to be less or equal to {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.minimum.filter(|m| n < *m) {
            self.push(
                path,
                format!("expected {name} to be greater or equal to {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.multiple_of.filter(|m| n % *m != 0.0) {
            self.push(
                path,
                format!("expected {name} to be a multiple of {}", format_number(m)),
            );
        }
    }

    fn bigint_bounds(&mut self, bounds: &BigIntBounds, path: &str, n: i128) {
        if let Some(m) = bounds.exclusive_maximum.filter(|m| n >= *m) {
            self.push(path, format!("expected bigint to be less than {m}"));
        }
        if let Some(m) = bounds.exclusive_minimum.filter(|m| n <= *m) {
            self.push(path, format!("expected bigint to be greater than {m}"));
        }
        if let Some(m) = bounds.maximum.filter(|m| n > *m) {
            self.push(path, format!("expected bigint to be less or equal to {m}"));
        }
        if let Some(m) = bounds.minimum.filter(|m| n < *m) {
            self.push(path, format!("expected bigint to be greater or equal to {m}"));
        }
        if let Some(m) = bounds.multiple_of.filter(|m| n.checked_rem(*m) != Some(0)) {
            self.push(path, format!("expected bigint to be a multiple of {m}"));
        }
    }

    fn date_bounds(&mut self, bounds: &DateBounds, path: &str, ms: f64) {
        if let Some(m) = bounds.exclusive_maximum_timestamp.filter(|m| ms >= *m) {
            self.push(
                path,
                format!("expected Date timestamp to be less than {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.exclusive_minimum_timestamp.filter(|m| ms <= *m) {
            self.push(
                path,
                format!("expected Date timestamp to be greater than {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.maximum_timestamp.filter(|m| ms > *m) {
            self.push(
                path,
                format!("expected Date timestamp to be less or equal to {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.minimum_timestamp.filter(|m| ms < *m) {
            self.push(
                path,
                format!("expected Date timestamp to be greater or equal to {}", format_number(m)),
            );
        }
        if let Some(m) = bounds.multiple_of_timestamp.filter(|m| ms % *m != 0.0) {
            self.push(
                path,
                format!("expected Date timestamp to be a multiple of {}", format_number(m)),
            );
        }
    }

    fn length(&mut self, path: &str, s: &str, min: Option<usize>, max: Option<usize>) {
        let len = s.chars().count();
        if let Some(min) = min.filter(|m| len < *m) {
            self.push(path, format!("expected string length greater or equal to {min}"));
        }
        if let Some(max) = max.filter(|m| len > *m) {
            self.push(path, format!("expected string length less or equal to {max}"));
        }
    }

    fn string(
        &mut self,
        constraints: &StringConstraints,
        path: &str,
        s: &str,
    ) -> Result<(), ValueError> {
        self.length(path, s, constraints.min_length, constraints.max_length);
        if let Some(source) = &constraints.pattern {
            if !regex(source)?.is_match(s) {
                self.push(path, format!("expected string to match '{source}'"));
            }
        }
        if let Some(format) = &constraints.format {
            if !self.ctx.formats.has(format) {
                self.push(path, format!("unknown format '{format}'"));
            } else if !self.ctx.formats.check(format, s) {
                self.push(path, format!("expected string to match '{format}' format"));
            }
        }
        Ok(())
    }

    fn array<'a>(
        &mut self,
        array: &'a ArraySchema,
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        let Value::Array(items) = value else {
            self.push(path, "expected array");
            return Ok(());
        };
        if let Some(min) = array.min_items.filter(|m| items.len() < *m) {
            self.push(path, format!("expected array length to be greater or equal to {min}"));
        }
        if let Some(max) = array.max_items.filter(|m| items.len() > *m) {
            self.push(path, format!("expected array length to be less or equal to {max}"));
        }
        for (index, item) in items.iter().enumerate() {
            self.visit(&array.items, references, &pointer(path, &index.to_string()), item)?;
        }
        if array.unique_items && !is_unique(items) {
            self.push(path, "expected array elements to be unique");
        }
        if !has_contains(array) {
            return Ok(());
        }
        let mut count = 0;
        if let Some(contains) = &array.contains {
            for item in items {
                if self.check(contains, references, item)? {
                    count += 1;
                }
            }
        }
        let min = array.min_contains.unwrap_or(1);
        if count < min {
            if array.min_contains.is_some() {
                self.push(
                    path,
                    format!("expected array to contain at least {min} matching values"),
                );
            } else {
                self.push(path, "expected array to contain at least one matching value");
            }
        }
        if let Some(max) = array.max_contains.filter(|m| count > *m) {
            self.push(
                path,
                format!("expected array to contain no more than {max} matching values"),
            );
        }
        Ok(())
    }

    fn tuple<'a>(
        &mut self,
        items: &'a [Schema],
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        let Value::Array(values) = value else {
            self.push(path, "expected tuple");
            return Ok(());
        };
        if values.len() != items.len() {
            self.push(path, format!("expected tuple to have {} elements", items.len()));
            return Ok(());
        }
        for (index, (item, element)) in items.iter().zip(values).enumerate() {
            self.visit(item, references, &pointer(path, &index.to_string()), element)?;
        }
        Ok(())
    }

    fn object<'a>(
        &mut self,
        object: &'a ObjectSchema,
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        let policy = self.ctx.policy;
        if !policy.is_object_like(value) {
            self.push(path, "expected object");
            return Ok(());
        }
        let keys = value.keys();
        self.property_count(path, object.min_properties, object.max_properties, keys.len());
        for (key, property) in &object.properties {
            let at = pointer(path, key);
            match value.get(key) {
                None if !property.optional => {
                    let admits_missing = extends_undefined(property)
                        || matches!(property.kind, SchemaKind::Any | SchemaKind::Unknown);
                    if admits_missing || !self.check(property, references, &UNDEFINED)? {
                        self.push(&at, "expected required property");
                    }
                }
                None => {}
                Some(item) => {
                    if !property.optional || policy.is_exact_optional_property(value, key) {
                        self.visit(property, references, &at, item)?;
                    }
                }
            }
        }
        for key in keys.iter().filter(|key| !object.properties.contains_key(*key)) {
            let at = pointer(path, key);
            match &object.additional_properties {
                AdditionalProperties::Allow => {}
                AdditionalProperties::Deny => self.push(&at, "unexpected property"),
                AdditionalProperties::Schema(additional) => {
                    let item = value.get(key).unwrap_or(&UNDEFINED);
                    self.visit(additional, references, &at, item)?;
                }
            }
        }
        Ok(())
    }

    fn property_count(&mut self, path: &str, min: Option<usize>, max: Option<usize>, n: usize) {
        if count_in_bounds(min, max, n) {
            return;
        }
        if let Some(min) = min.filter(|m| n < *m) {
            self.push(path, format!("expected object to have at least {min} properties"));
        }
        if let Some(max) = max.filter(|m| n > *m) {
            self.push(path, format!("expected object to have no more than {max} properties"));
        }
    }

    fn record<'a>(
        &mut self,
        record: &'a RecordSchema,
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        if !self.ctx.policy.is_record_like(value) {
            self.push(path, "expected object");
            return Ok(());
        }
        let keys = value.keys();
        self.property_count(path, record.min_properties, record.max_properties, keys.len());
        let key_pattern = regex(&record.pattern)?;
        for key in &keys {
            let at = pointer(path, key);
            let item = value.get(key).unwrap_or(&UNDEFINED);
            if key_pattern.is_match(key) {
                self.visit(&record.value, references, &at, item)?;
                continue;
            }
            match &record.additional_properties {
                AdditionalProperties::Allow => {}
                AdditionalProperties::Deny => self.push(&at, "unexpected property"),
                AdditionalProperties::Schema(additional) => {
                    self.visit(additional, references, &at, item)?
                }
            }
        }
        Ok(())
    }

    fn intersect<'a>(
        &mut self,
        schema: &'a Schema,
        intersect: &'a IntersectSchema,
        references: &[&'a Schema],
        path: &str,
        value: &Value,
    ) -> Result<(), ValueError> {
        let before = self.violations.len();
        for member in &intersect.all_of {
            self.visit(member, references, path, value)?;
        }
        if self.violations.len() > before {
            self.push(path, "expected all values to match");
        }
        if !intersect.unevaluated_properties.is_constrained() {
            return Ok(());
        }
        let known = regex(&key_of_pattern(schema))?;
        for key in value.keys() {
            if known.is_match(&key) {
                continue;
            }
            let at = pointer(path, &key);
            match intersect.unevaluated_properties.schema() {
                Some(unevaluated) => {
                    let item = value.get(&key).unwrap_or(&UNDEFINED);
                    if !self.check(unevaluated, references, item)? {
                        self.push(&at, "unexpected property");
                    }
                }
                None => self.push(&at, "unexpected property"),
            }
        }
        Ok(())
    }
}

fn describe(literal: &LiteralValue) -> String {
    match literal {
        LiteralValue::String(s) => format!("'{s}'"),
        other => other.to_key(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, literal, number, object, string, string_with, tuple};
    use crate::compose::{optional, union};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn collect(schema: &Schema, value: serde_json::Value) -> Vec<(String, String)> {
        errors(&Context::new(), schema, &[], &Value::from(value))
            .unwrap()
            .into_iter()
            .map(|v| (v.path, v.message))
            .collect()
    }

    #[test]
    fn pointer_escapes_tokens() {
        assert_eq!(pointer("", "a/b"), "/a~1b");
        assert_eq!(pointer("/x", "m~n"), "/x/m~0n");
    }

    #[test]
    fn valid_values_report_nothing() {
        let schema = object([("x", number()), ("tags", array(string()))]);
        assert!(collect(&schema, json!({ "x": 1, "tags": ["a"] })).is_empty());
    }

    #[test]
    fn nested_paths() {
        let schema = object([("x", number()), ("tags", array(string()))]);
        assert_eq!(
            collect(&schema, json!({ "x": "1", "tags": ["a", 2] })),
            vec![
                ("/x".to_string(), "expected number".to_string()),
                ("/tags/1".to_string(), "expected string".to_string()),
            ]
        );
    }

    #[test]
    fn missing_and_unexpected_properties() {
        let schema = object([("x", number()), ("y", optional(&number()))]).strict();
        assert_eq!(
            collect(&schema, json!({ "z": 1 })),
            vec![
                ("/x".to_string(), "expected required property".to_string()),
                ("/z".to_string(), "unexpected property".to_string()),
            ]
        );
    }

    #[test]
    fn every_failed_constraint_is_reported() {
        let schema = string_with(StringConstraints {
            min_length: Some(3),
            pattern: Some("^[0-9]+$".into()),
            ..Default::default()
        });
        assert_eq!(
            collect(&schema, json!("a")),
            vec![
                (String::new(), "expected string length greater or equal to 3".to_string()),
                (String::new(), "expected string to match '^[0-9]+$'".to_string()),
            ]
        );
    }

    #[test]
    fn union_and_literal_messages() {
        let schema = union(&[literal("a"), literal(1i64)]);
        assert_eq!(
            collect(&schema, json!(true)),
            vec![(String::new(), "expected union value".to_string())]
        );
        assert_eq!(
            collect(&literal("a"), json!("b")),
            vec![(String::new(), "expected 'a'".to_string())]
        );
    }

    #[test]
    fn tuple_length() {
        let schema = tuple(vec![number(), number()]);
        assert_eq!(
            collect(&schema, json!([1])),
            vec![(String::new(), "expected tuple to have 2 elements".to_string())]
        );
    }

    #[test]
    fn unknown_format() {
        let schema = crate::build::formatted("uuid");
        assert_eq!(
            collect(&schema, json!("x")),
            vec![(String::new(), "unknown format 'uuid'".to_string())]
        );
    }
}
