//! Type-level dereferencing of `Ref` schemas.

use tracing::debug;

use crate::error::TypeError;
use crate::schema::{Schema, SchemaKind};

/// Inlines every `Ref` in `schema` with the reference carrying the matching
/// `$id`. Recursive edges (a reference back into a target being inlined,
/// and `This`) are left in place.
///
/// # Errors
///
/// Returns `TypeError::Dereference` when a `Ref` has no matching reference.
pub fn deref(schema: &Schema, references: &[Schema]) -> Result<Schema, TypeError> {
    let mut stack = Vec::new();
    resolve(schema.clone(), references, &mut stack)
}

fn resolve(
    schema: Schema,
    references: &[Schema],
    stack: &mut Vec<String>,
) -> Result<Schema, TypeError> {
    if let SchemaKind::Ref(id) = &schema.kind {
        if stack.contains(id) {
            debug!(reference = %id, "leaving recursive reference open");
            return Ok(schema);
        }
        let target = references
            .iter()
            .find(|candidate| candidate.id() == Some(id.as_str()))
            .ok_or_else(|| TypeError::Dereference {
                reference: id.clone(),
            })?;
        let mut inlined = target.clone();
        inlined.options.id = None;
        inlined.optional |= schema.optional;
        inlined.readonly |= schema.readonly;
        stack.push(id.clone());
        let result = resolve(inlined, references, stack);
        stack.pop();
        return result;
    }
    schema.try_map_children(&mut |child| resolve(child, references, stack))
}
