//! Algebraic schema operators.
//!
//! Operators never mutate their inputs. Each one dispatches on the kind of
//! its operand, distributing over `Union`/`Intersect` members before it
//! reaches a leaf. Two escape hatches defer evaluation:
//!
//! - a `Ref`, `Computed` or `Argument` operand produces a `Computed` node
//!   (`{target: "Pick", parameters: [..]}`) resolved later by a
//!   [`Module`](crate::Module) or [`instantiate`];
//! - a `MappedKey` key or `MappedResult` target produces a `MappedResult`
//!   keyed by each concrete key, unified later by [`mapped`].

mod awaited;
mod composite;
mod deref;
mod indexed;
mod instantiate;
mod intersect;
mod intrinsic;
mod keyof;
mod mapped;
mod modifiers;
mod omit;
mod partial;
mod pick;
mod record;
mod required;
pub mod template;
mod union;

use indexmap::IndexMap;
use tracing::debug;

use crate::build::{literal, never};
use crate::schema::{ComputedSchema, ObjectSchema, Schema, SchemaKind};

pub use awaited::awaited;
pub use composite::composite;
pub use deref::deref;
pub use indexed::{index, index_keys, index_property_keys};
pub use instantiate::instantiate;
pub use intersect::{intersect, intersect_evaluated};
pub use intrinsic::{capitalize, lowercase, uncapitalize, uppercase};
pub use keyof::{key_of, key_of_pattern, key_of_property_keys};
pub use mapped::mapped;
pub use modifiers::{optional, optional_remove, readonly, readonly_optional, readonly_remove};
pub use omit::{omit, omit_keys};
pub use partial::partial;
pub use pick::{pick, pick_keys};
pub use record::record;
pub use required::required;
pub use template::{
    is_template_literal_finite, template_literal, template_literal_generate,
    template_literal_syntax,
};
pub use union::{union, union_evaluated};

pub(crate) use indexed::from_key;
pub(crate) use intersect::{create_intersect, evaluate_intersect};

/// Property key standing for "any numeric index".
pub const NUMBER_KEY: &str = "[number]";

/// A deferred application of `target` to `parameters`.
pub(crate) fn computed(target: &str, parameters: Vec<Schema>) -> Schema {
    Schema::new(SchemaKind::Computed(ComputedSchema {
        target: target.to_string(),
        parameters,
    }))
}

/// Operands that cannot be evaluated until a reference is resolved.
pub(crate) fn is_deferred(schema: &Schema) -> bool {
    matches!(
        schema.kind,
        SchemaKind::Ref(_) | SchemaKind::Computed(_) | SchemaKind::Argument(_)
    )
}

pub(crate) fn mapped_result(properties: IndexMap<String, Schema>) -> Schema {
    Schema::new(SchemaKind::MappedResult(properties))
}

/// Maps `f` over every property of a `MappedResult`.
pub(crate) fn map_result<F>(properties: &IndexMap<String, Schema>, mut f: F) -> Schema
where
    F: FnMut(&Schema) -> Schema,
{
    mapped_result(
        properties
            .iter()
            .map(|(key, schema)| (key.clone(), f(schema)))
            .collect(),
    )
}

/// Evaluates `f` once per key of a `MappedKey`, passing the key as a literal.
pub(crate) fn map_keys<F>(keys: &[String], mut f: F) -> Schema
where
    F: FnMut(&Schema) -> Schema,
{
    mapped_result(
        keys.iter()
            .map(|key| (key.clone(), f(&literal(key.as_str()))))
            .collect(),
    )
}

/// An object derived from `source`: keeps its options and modifiers but
/// not its identity or codec.
pub(crate) fn derived_object(source: &Schema, object: ObjectSchema) -> Schema {
    let mut schema = Schema::new(SchemaKind::Object(object));
    schema.options = source.options.clone();
    schema.options.id = None;
    schema.optional = source.optional;
    schema.readonly = source.readonly;
    schema
}

/// Applies a deferred operator once its parameters are concrete.
///
/// Unknown targets and missing parameters evaluate to `Never`.
pub(crate) fn compute(target: &str, parameters: &[Schema]) -> Schema {
    match (target, parameters) {
        ("Awaited", [schema]) => awaited(schema),
        ("Index", [schema, key]) => index(schema, key),
        ("KeyOf", [schema]) => key_of(schema),
        ("Partial", [schema]) => partial(schema),
        ("Required", [schema]) => required(schema),
        ("Pick", [schema, keys]) => pick(schema, keys),
        ("Omit", [schema, keys]) => omit(schema, keys),
        ("Record", [key, value]) => record(key, value),
        _ => {
            debug!(
                operator = target,
                parameters = parameters.len(),
                "unknown computed target, using Never"
            );
            never()
        }
    }
}
