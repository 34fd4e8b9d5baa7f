//! Reference bookkeeping shared by the value passes.
//!
//! While descending, every schema carrying an `$id` is pushed onto the
//! in-scope reference list so nested `Ref`/`This` nodes can reach it.

use std::borrow::Cow;

use crate::error::ValueError;
use crate::schema::{ImportSchema, Schema};

/// Adds `schema` to `references` when it carries an `$id` not already present.
pub(crate) fn pushref<'a, 'r>(
    schema: &'a Schema,
    references: &'r [&'a Schema],
) -> Cow<'r, [&'a Schema]> {
    if schema.id().is_some() && !references.iter().any(|r| std::ptr::eq(*r, schema)) {
        let mut owned = references.to_vec();
        owned.push(schema);
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(references)
    }
}

/// Finds the reference whose `$id` is `id`.
pub(crate) fn deref<'a>(id: &str, references: &[&'a Schema]) -> Result<&'a Schema, ValueError> {
    references
        .iter()
        .copied()
        .find(|candidate| candidate.id() == Some(id))
        .ok_or_else(|| ValueError::Dereference {
            reference: id.to_string(),
        })
}

/// Resolves an `Import`: returns its target definition and the reference
/// list extended with every definition of the module.
pub(crate) fn import<'a>(
    import: &'a ImportSchema,
    references: &[&'a Schema],
) -> Result<(&'a Schema, Vec<&'a Schema>), ValueError> {
    let target = import
        .defs
        .get(&import.target)
        .ok_or_else(|| ValueError::Dereference {
            reference: import.target.clone(),
        })?;
    let mut scope = references.to_vec();
    scope.extend(import.defs.values());
    Ok((target, scope))
}
