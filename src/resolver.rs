//! Module resolution.
//!
//! A [`Module`] is a closed set of named schemas that may refer to each
//! other by name. Construction resolves every deferred `Computed` node
//! against the module's own definitions and stamps each definition with
//! `$id = name`, so plain `$ref` edges stay open and resolve at validation
//! time through an [`Import`](crate::SchemaKind::Import) schema.

use indexmap::IndexMap;
use tracing::debug;

use crate::build::never;
use crate::compose::compute;
use crate::error::TypeError;
use crate::schema::{ComputedSchema, ImportSchema, Schema, SchemaKind};

/// A set of mutually referential schema definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    definitions: IndexMap<String, Schema>,
}

impl Module {
    /// Builds a module and resolves its computed definitions.
    ///
    /// A computed node whose operand names a missing definition, or that
    /// refers back into its own resolution chain, resolves to `Never`.
    pub fn new<I, K>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        let raw: IndexMap<String, Schema> = definitions
            .into_iter()
            .map(|(name, schema)| (name.into(), schema))
            .collect();
        let resolver = Resolver { raw: &raw };
        let definitions = raw
            .iter()
            .map(|(name, schema)| {
                let mut stack = vec![name.clone()];
                let mut resolved = resolver.resolve(schema.clone(), &mut stack);
                resolved.options.id = Some(name.clone());
                (name.clone(), resolved)
            })
            .collect();
        Self { definitions }
    }

    /// Resolved definitions, in declaration order.
    pub fn definitions(&self) -> &IndexMap<String, Schema> {
        &self.definitions
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.definitions.get(name)
    }

    /// Resolved definitions as a reference list for value operations.
    pub fn references(&self) -> Vec<Schema> {
        self.definitions.values().cloned().collect()
    }

    /// Returns an `Import` schema targeting `name` and carrying every
    /// definition of the module.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::UnknownImport` if the module has no definition
    /// named `name`.
    pub fn import(&self, name: &str) -> Result<Schema, TypeError> {
        if !self.definitions.contains_key(name) {
            return Err(TypeError::UnknownImport {
                key: name.to_string(),
            });
        }
        Ok(Schema::new(SchemaKind::Import(ImportSchema {
            defs: self.definitions.clone(),
            target: name.to_string(),
        })))
    }
}

struct Resolver<'a> {
    raw: &'a IndexMap<String, Schema>,
}

impl Resolver<'_> {
    /// Walks `schema` top-down, evaluating every computed node whose
    /// operands can be made concrete.
    fn resolve(&self, schema: Schema, stack: &mut Vec<String>) -> Schema {
        let computed = match &schema.kind {
            SchemaKind::Computed(computed) => computed.clone(),
            _ => return schema.map_children(|child| self.resolve(child, stack)),
        };
        let mut parameters = Vec::with_capacity(computed.parameters.len());
        for parameter in &computed.parameters {
            match self.operand(parameter.clone(), stack) {
                Some(resolved) => parameters.push(resolved),
                None => {
                    let mut result = never();
                    result.optional = schema.optional;
                    result.readonly = schema.readonly;
                    return result;
                }
            }
        }
        if parameters
            .iter()
            .any(|p| matches!(p.kind, SchemaKind::Argument(_)))
        {
            let mut deferred = schema;
            deferred.kind = SchemaKind::Computed(ComputedSchema {
                target: computed.target,
                parameters,
            });
            return deferred;
        }
        let mut result = compute(&computed.target, &parameters);
        result.optional |= schema.optional;
        result.readonly |= schema.readonly;
        result
    }

    /// Resolves an operand, following `$ref` chains into the raw module.
    /// Returns `None` for missing targets and self-referential chains.
    fn operand(&self, schema: Schema, stack: &mut Vec<String>) -> Option<Schema> {
        let resolved = self.resolve(schema, stack);
        let SchemaKind::Ref(target) = &resolved.kind else {
            return Some(resolved);
        };
        if stack.contains(target) {
            debug!(reference = %target, "self-referential computed operand, using Never");
            return None;
        }
        let Some(definition) = self.raw.get(target) else {
            debug!(reference = %target, "computed operand names a missing definition, using Never");
            return None;
        };
        stack.push(target.clone());
        let operand = self.operand(definition.clone(), stack);
        stack.pop();
        operand.map(|mut operand| {
            operand.options.id = None;
            operand.optional |= resolved.optional;
            operand.readonly |= resolved.readonly;
            operand
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, number, object, reference, string};
    use crate::compose::{key_of_property_keys, optional, partial, pick_keys};
    use crate::types::Kind;

    #[test]
    fn stamps_definition_ids() {
        let module = Module::new([("A", string()), ("B", array(reference("A")))]);
        assert_eq!(module.get("A").and_then(Schema::id), Some("A"));
        assert_eq!(module.get("B").and_then(Schema::id), Some("B"));
        assert_eq!(module.definitions().len(), 2);
    }

    #[test]
    fn resolves_computed_forward_references() {
        let module = Module::new([
            ("Update", partial(&reference("User"))),
            ("User", object([("id", number()), ("name", string())])),
        ]);
        let update = module.get("Update").unwrap();
        let SchemaKind::Object(object) = &update.kind else {
            panic!("expected object, got {}", update.kind());
        };
        assert!(object.required().is_empty());
        assert_eq!(update.id(), Some("Update"));
    }

    #[test]
    fn follows_reference_chains() {
        let module = Module::new([
            ("Ids", pick_keys(&reference("Alias"), &["id"])),
            ("Alias", reference("User")),
            ("User", object([("id", number()), ("name", optional(&string()))])),
        ]);
        assert_eq!(key_of_property_keys(module.get("Ids").unwrap()), vec!["id"]);
        assert_eq!(module.get("Alias").unwrap().kind(), Kind::Ref);
    }

    #[test]
    fn missing_and_self_referential_operands_are_never() {
        let module = Module::new([
            ("Missing", partial(&reference("Nope"))),
            ("Loop", partial(&reference("Loop"))),
        ]);
        assert!(module.get("Missing").unwrap().is_never());
        assert!(module.get("Loop").unwrap().is_never());
    }

    #[test]
    fn nested_computed_nodes_are_resolved() {
        let module = Module::new([
            ("Patch", object([("body", partial(&reference("Body")))])),
            ("Body", object([("x", number())])),
        ]);
        let SchemaKind::Object(patch) = &module.get("Patch").unwrap().kind else {
            panic!("expected object");
        };
        assert_eq!(patch.properties["body"].kind(), Kind::Object);
    }

    #[test]
    fn import_carries_definitions() {
        let module = Module::new([("A", string())]);
        let import = module.import("A").unwrap();
        let SchemaKind::Import(schema) = &import.kind else {
            panic!("expected import");
        };
        assert_eq!(schema.target, "A");
        assert!(schema.defs.contains_key("A"));
        assert!(matches!(
            module.import("B"),
            Err(TypeError::UnknownImport { key }) if key == "B"
        ));
    }
}
