//! Intersection construction.

use crate::build::never;
use crate::error::TypeError;
use crate::schema::{IntersectSchema, Schema, SchemaKind};

/// `A & B & ...`.
///
/// An empty intersection is `Never`; a single member is returned as is.
/// The result is optional only when every member is optional.
///
/// # Errors
///
/// Returns `TypeError::IntersectTransform` when any member carries a
/// transform codec.
pub fn intersect(types: &[Schema]) -> Result<Schema, TypeError> {
    match types {
        [] => Ok(never()),
        [single] => Ok(single.clone()),
        _ => {
            reject_transforms(types)?;
            Ok(create_intersect(types.to_vec()))
        }
    }
}

/// Intersection with evaluation: nested intersections are flattened and
/// any `Never` member collapses the result to `Never`.
///
/// # Errors
///
/// Returns `TypeError::IntersectTransform` when any member carries a
/// transform codec.
pub fn intersect_evaluated(types: &[Schema]) -> Result<Schema, TypeError> {
    if types.len() > 1 {
        reject_transforms(types)?;
    }
    Ok(evaluate_intersect(types.to_vec()))
}

fn reject_transforms(types: &[Schema]) -> Result<(), TypeError> {
    if types.iter().any(Schema::has_transform) {
        return Err(TypeError::IntersectTransform);
    }
    Ok(())
}

/// Evaluated intersection without the transform check, for derived schemas.
pub(crate) fn evaluate_intersect(types: Vec<Schema>) -> Schema {
    if types.iter().any(Schema::is_never) {
        return never();
    }
    let all_optional = !types.is_empty() && types.iter().all(|schema| schema.optional);
    let mut members = Vec::with_capacity(types.len());
    for schema in types {
        match schema.kind {
            // Flattened members keep their own options; the nested
            // intersect's `$id`, description and default are dropped.
            SchemaKind::Intersect(inner) if !inner.unevaluated_properties.is_constrained() => {
                members.extend(inner.all_of)
            }
            kind => members.push(Schema { kind, ..schema }),
        }
    }
    let mut result = match members.len() {
        0 => never(),
        1 => members.remove(0),
        _ => create_intersect(members),
    };
    if all_optional {
        result.optional = true;
    }
    result
}

/// Builds an `Intersect` node without the transform check.
pub(crate) fn create_intersect(types: Vec<Schema>) -> Schema {
    let optional = types.iter().all(|schema| schema.optional);
    let all_of = types
        .into_iter()
        .map(|mut schema| {
            schema.optional = false;
            schema
        })
        .collect();
    let mut schema = Schema::new(SchemaKind::Intersect(IntersectSchema {
        all_of,
        ..Default::default()
    }));
    schema.optional = optional;
    schema
}
