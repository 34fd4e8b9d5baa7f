//! Generic instantiation.

use crate::build::unknown;
use crate::schema::{Schema, SchemaKind};

use super::{compute, is_deferred};

/// Replaces every `Argument(i)` in `schema` with `arguments[i]`, or
/// `Unknown` when no argument is supplied, then evaluates deferred
/// operators whose operands became concrete.
pub fn instantiate(schema: &Schema, arguments: &[Schema]) -> Schema {
    substitute(schema.clone(), arguments)
}

fn substitute(schema: Schema, arguments: &[Schema]) -> Schema {
    if let SchemaKind::Argument(index) = schema.kind {
        let mut replaced = arguments.get(index).cloned().unwrap_or_else(unknown);
        replaced.optional |= schema.optional;
        replaced.readonly |= schema.readonly;
        return replaced;
    }
    let schema = schema.map_children(|child| substitute(child, arguments));
    match &schema.kind {
        SchemaKind::Computed(computed) if !computed.parameters.iter().any(is_deferred) => {
            let mut result = compute(&computed.target, &computed.parameters);
            result.optional |= schema.optional;
            result.readonly |= schema.readonly;
            result
        }
        _ => schema,
    }
}
