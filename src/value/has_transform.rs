//! `HasTransform`: whether any schema reachable from a root carries a codec.

use std::collections::HashSet;

use crate::error::ValueError;
use crate::schema::{Schema, SchemaKind};

use super::deref::{deref, import, pushref};

pub(crate) fn has_transform(schema: &Schema, references: &[&Schema]) -> Result<bool, ValueError> {
    let mut visited = HashSet::new();
    visit(schema, references, &mut visited)
}

fn visit<'a>(
    schema: &'a Schema,
    references: &[&'a Schema],
    visited: &mut HashSet<&'a str>,
) -> Result<bool, ValueError> {
    let scoped = pushref(schema, references);
    let references: &[&'a Schema] = &scoped;
    if let Some(id) = schema.id() {
        if !visited.insert(id) {
            return Ok(false);
        }
    }
    if schema.has_transform() {
        return Ok(true);
    }
    match &schema.kind {
        SchemaKind::Ref(id) | SchemaKind::This(id) => {
            let target = deref(id, references)?;
            visit(target, references, visited)
        }
        SchemaKind::Import(module) => {
            let (target, scope) = import(module, references)?;
            visit(target, &scope, visited)
        }
        _ => {
            for child in schema.children() {
                if visit(child, references, visited)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, number, object, recursive_with_id, reference, string, transform};
    use crate::compose::union;

    fn codec() -> Schema {
        transform(number()).decode(Ok).encode(Ok)
    }

    #[test]
    fn finds_nested_codecs() {
        assert!(!has_transform(&object([("x", number())]), &[]).unwrap());
        assert!(has_transform(&object([("x", array(codec()))]), &[]).unwrap());
        assert!(has_transform(&union(&[string(), codec()]), &[]).unwrap());
    }

    #[test]
    fn follows_references_and_terminates_on_recursion() {
        let target = codec().with_id("Codec");
        assert!(has_transform(&array(reference("Codec")), &[&target]).unwrap());

        let tree = recursive_with_id("Tree", |this| object([("children", array(this))]));
        assert!(!has_transform(&tree, &[]).unwrap());
    }
}
