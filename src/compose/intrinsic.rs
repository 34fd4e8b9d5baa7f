//! Intrinsic string mappings: `Capitalize`, `Uncapitalize`, `Uppercase`,
//! `Lowercase`.

use crate::build::literal;
use crate::schema::{Schema, SchemaKind};

use super::template::{literal_union_pattern, template_literal_generate};
use super::{map_keys, map_result, union};

#[derive(Debug, Clone, Copy)]
enum Mode {
    Capitalize,
    Uncapitalize,
    Uppercase,
    Lowercase,
}

impl Mode {
    fn apply(self, value: &str) -> String {
        match self {
            Mode::Uppercase => value.to_uppercase(),
            Mode::Lowercase => value.to_lowercase(),
            Mode::Capitalize | Mode::Uncapitalize => {
                let mut chars = value.chars();
                match chars.next() {
                    Some(first) if matches!(self, Mode::Capitalize) => {
                        first.to_uppercase().chain(chars).collect()
                    }
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

fn intrinsic(schema: &Schema, mode: Mode) -> Schema {
    match &schema.kind {
        SchemaKind::MappedKey(keys) => map_keys(keys, |key| intrinsic(key, mode)),
        SchemaKind::MappedResult(properties) => {
            map_result(properties, |property| intrinsic(property, mode))
        }
        SchemaKind::TemplateLiteral(_) => match template_literal_generate(schema) {
            Ok(values) if !values.is_empty() => {
                let mapped: Vec<String> = values.iter().map(|v| mode.apply(v)).collect();
                let mut out = schema.clone();
                out.kind = SchemaKind::TemplateLiteral(literal_union_pattern(&mapped));
                out
            }
            _ => schema.clone(),
        },
        SchemaKind::Union(members) => {
            let mapped: Vec<Schema> = members.iter().map(|m| intrinsic(m, mode)).collect();
            let mut out = union(&mapped);
            out.options = schema.options.clone();
            out
        }
        SchemaKind::Literal(value) => {
            let mut out = literal(mode.apply(&value.to_key()));
            out.options = schema.options.clone();
            out.optional = schema.optional;
            out.readonly = schema.readonly;
            out
        }
        _ => schema.clone(),
    }
}

pub fn capitalize(schema: &Schema) -> Schema {
    intrinsic(schema, Mode::Capitalize)
}

pub fn uncapitalize(schema: &Schema) -> Schema {
    intrinsic(schema, Mode::Uncapitalize)
}

pub fn uppercase(schema: &Schema) -> Schema {
    intrinsic(schema, Mode::Uppercase)
}

pub fn lowercase(schema: &Schema) -> Schema {
    intrinsic(schema, Mode::Lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{number, string};
    use crate::compose::{template_literal, template_literal_syntax};

    #[test]
    fn maps_literals() {
        assert_eq!(capitalize(&literal("hello")), literal("Hello"));
        assert_eq!(uncapitalize(&literal("Hello")), literal("hello"));
        assert_eq!(uppercase(&literal("hello")), literal("HELLO"));
        assert_eq!(lowercase(&literal("HeLLo")), literal("hello"));
        assert_eq!(capitalize(&literal("")), literal(""));
    }

    #[test]
    fn maps_union_members() {
        let schema = uppercase(&union(&[literal("a"), literal("b")]));
        assert_eq!(schema, union(&[literal("A"), literal("B")]));
    }

    #[test]
    fn finite_template_literal_is_expanded_and_mapped() {
        let schema = template_literal_syntax("on${\"click\"|\"hover\"}").unwrap();
        let mapped = uppercase(&schema);
        assert_eq!(
            template_literal_generate(&mapped).unwrap(),
            vec!["ONCLICK", "ONHOVER"]
        );
    }

    #[test]
    fn infinite_template_literal_is_unchanged() {
        let schema = template_literal(&[literal("id_"), number()]).unwrap();
        assert_eq!(uppercase(&schema), schema);
    }

    #[test]
    fn other_kinds_pass_through() {
        assert_eq!(capitalize(&string()), string());
    }
}
