//! Optional and readonly modifiers.
//!
//! The markers are independent flags on a schema. Applied to a
//! `MappedResult` they distribute over its properties.

use crate::schema::{Schema, SchemaKind};

fn with_flags(schema: &Schema, optional: Option<bool>, readonly: Option<bool>) -> Schema {
    if let SchemaKind::MappedResult(properties) = &schema.kind {
        return super::map_result(properties, |property| {
            with_flags(property, optional, readonly)
        });
    }
    let mut out = schema.clone();
    if let Some(flag) = optional {
        out.optional = flag;
    }
    if let Some(flag) = readonly {
        out.readonly = flag;
    }
    out
}

pub fn optional(schema: &Schema) -> Schema {
    with_flags(schema, Some(true), None)
}

pub fn optional_remove(schema: &Schema) -> Schema {
    with_flags(schema, Some(false), None)
}

pub fn readonly(schema: &Schema) -> Schema {
    with_flags(schema, None, Some(true))
}

pub fn readonly_remove(schema: &Schema) -> Schema {
    with_flags(schema, None, Some(false))
}

pub fn readonly_optional(schema: &Schema) -> Schema {
    with_flags(schema, Some(true), Some(true))
}
