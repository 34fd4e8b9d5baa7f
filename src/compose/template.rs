//! Template literal types.
//!
//! A template literal is stored as an anchored regex in a small dialect:
//! literal text, `(a|b)` alternations and the open patterns for numbers,
//! strings and booleans. The dialect parses into an [`Expression`] tree of
//! `and`/`or`/`const` nodes. Expressions without an open number or open
//! string are finite and can be expanded to every string they match.

use crate::build::{bigint, boolean, literal, number, string};
use crate::error::TypeError;
use crate::pattern::{PATTERN_BOOLEAN, PATTERN_NUMBER, PATTERN_STRING};
use crate::schema::{Schema, SchemaKind};

use super::union_evaluated;

/// Upper bound on the number of strings a finite template literal may
/// expand to.
pub const EXPANSION_LIMIT: usize = 10_000;

/// Parsed template literal pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    And(Vec<Expression>),
    Or(Vec<Expression>),
    Const(String),
}

fn is_non_escaped(pattern: &[char], index: usize, c: char) -> bool {
    pattern.get(index) == Some(&c) && (index == 0 || pattern[index - 1] != '\\')
}

fn is_open(pattern: &[char], index: usize) -> bool {
    is_non_escaped(pattern, index, '(')
}

fn is_close(pattern: &[char], index: usize) -> bool {
    is_non_escaped(pattern, index, ')')
}

fn is_separator(pattern: &[char], index: usize) -> bool {
    is_non_escaped(pattern, index, '|')
}

fn is_group(pattern: &[char]) -> bool {
    if pattern.len() < 2 || !(is_open(pattern, 0) && is_close(pattern, pattern.len() - 1)) {
        return false;
    }
    let mut depth = 0i32;
    for index in 0..pattern.len() {
        if is_open(pattern, index) {
            depth += 1;
        }
        if is_close(pattern, index) {
            depth -= 1;
        }
        if depth == 0 && index != pattern.len() - 1 {
            return false;
        }
    }
    true
}

fn is_precedence_or(pattern: &[char]) -> bool {
    let mut depth = 0i32;
    for index in 0..pattern.len() {
        if is_open(pattern, index) {
            depth += 1;
        }
        if is_close(pattern, index) {
            depth -= 1;
        }
        if is_separator(pattern, index) && depth == 0 {
            return true;
        }
    }
    false
}

fn is_precedence_and(pattern: &[char]) -> bool {
    (0..pattern.len()).any(|index| is_open(pattern, index))
}

fn unescape(pattern: &[char]) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.iter();
    while let Some(&c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn collapse(mut expressions: Vec<Expression>, wrap: fn(Vec<Expression>) -> Expression) -> Expression {
    match expressions.len() {
        0 => Expression::Const(String::new()),
        1 => expressions.remove(0),
        _ => wrap(expressions),
    }
}

fn parse_or(pattern: &[char]) -> Result<Expression, TypeError> {
    let mut depth = 0i32;
    let mut start = 0;
    let mut expressions = Vec::new();
    for index in 0..pattern.len() {
        if is_open(pattern, index) {
            depth += 1;
        }
        if is_close(pattern, index) {
            depth -= 1;
        }
        if is_separator(pattern, index) && depth == 0 {
            let range = &pattern[start..index];
            if !range.is_empty() {
                expressions.push(parse_chars(range)?);
            }
            start = index + 1;
        }
    }
    let range = &pattern[start..];
    if !range.is_empty() {
        expressions.push(parse_chars(range)?);
    }
    Ok(collapse(expressions, Expression::Or))
}

fn parse_and(pattern: &[char]) -> Result<Expression, TypeError> {
    let mut expressions = Vec::new();
    let mut index = 0;
    while index < pattern.len() {
        if is_open(pattern, index) {
            let end = group_end(pattern, index)?;
            expressions.push(parse_chars(&pattern[index..=end])?);
            index = end + 1;
        } else {
            let end = (index..pattern.len())
                .find(|&scan| is_open(pattern, scan))
                .unwrap_or(pattern.len());
            let range = &pattern[index..end];
            if !range.is_empty() {
                expressions.push(parse_chars(range)?);
            }
            index = end;
        }
    }
    Ok(collapse(expressions, Expression::And))
}

fn group_end(pattern: &[char], start: usize) -> Result<usize, TypeError> {
    let mut depth = 0i32;
    for scan in start..pattern.len() {
        if is_open(pattern, scan) {
            depth += 1;
        }
        if is_close(pattern, scan) {
            depth -= 1;
        }
        if depth == 0 {
            return Ok(scan);
        }
    }
    Err(TypeError::TemplateLiteralParse {
        message: "unclosed group parens in expression".to_string(),
    })
}

fn parse_chars(pattern: &[char]) -> Result<Expression, TypeError> {
    if is_group(pattern) {
        parse_chars(&pattern[1..pattern.len() - 1])
    } else if is_precedence_or(pattern) {
        parse_or(pattern)
    } else if is_precedence_and(pattern) {
        parse_and(pattern)
    } else {
        Ok(Expression::Const(unescape(pattern)))
    }
}

/// Parses an unanchored template literal pattern.
///
/// # Errors
///
/// Returns `TypeError::TemplateLiteralParse` on unbalanced groups.
pub fn parse(pattern: &str) -> Result<Expression, TypeError> {
    let chars: Vec<char> = pattern.chars().collect();
    parse_chars(&chars)
}

/// Parses an anchored (`^...$`) template literal pattern.
///
/// # Errors
///
/// Returns `TypeError::TemplateLiteralParse` on unbalanced groups.
pub fn parse_exact(pattern: &str) -> Result<Expression, TypeError> {
    let inner = pattern.strip_prefix('^').unwrap_or(pattern);
    let inner = inner.strip_suffix('$').unwrap_or(inner);
    parse(inner)
}

fn is_const_pair(expression: &Expression, left: &str, right: &str) -> bool {
    match expression {
        Expression::Or(members) => matches!(
            members.as_slice(),
            [Expression::Const(a), Expression::Const(b)] if a == left && b == right
        ),
        _ => false,
    }
}

/// Returns false when the expression contains an open number or open string.
pub fn is_expression_finite(expression: &Expression) -> bool {
    if is_const_pair(expression, "0", "[1-9][0-9]*")
        || matches!(expression, Expression::Const(c) if c == ".*")
    {
        return false;
    }
    if is_const_pair(expression, "true", "false") {
        return true;
    }
    match expression {
        Expression::And(members) | Expression::Or(members) => {
            members.iter().all(is_expression_finite)
        }
        Expression::Const(_) => true,
    }
}

fn expansion_count(expression: &Expression) -> usize {
    match expression {
        Expression::Const(_) => 1,
        Expression::Or(members) => members
            .iter()
            .fold(0usize, |acc, m| acc.saturating_add(expansion_count(m))),
        Expression::And(members) => members
            .iter()
            .fold(1usize, |acc, m| acc.saturating_mul(expansion_count(m))),
    }
}

fn expand(expression: &Expression) -> Vec<String> {
    match expression {
        Expression::Const(value) => vec![value.clone()],
        Expression::Or(members) => members.iter().flat_map(expand).collect(),
        Expression::And(members) => members.iter().fold(vec![String::new()], |acc, member| {
            let right = expand(member);
            acc.iter()
                .flat_map(|left| right.iter().map(move |r| format!("{left}{r}")))
                .collect()
        }),
    }
}

/// Expands a finite expression into every string it matches, in order.
///
/// # Errors
///
/// Returns `TypeError::TemplateLiteralExpansion` when the expansion would
/// exceed [`EXPANSION_LIMIT`] strings.
pub fn generate_expression(expression: &Expression) -> Result<Vec<String>, TypeError> {
    if expansion_count(expression) > EXPANSION_LIMIT {
        return Err(TypeError::TemplateLiteralExpansion {
            limit: EXPANSION_LIMIT,
        });
    }
    Ok(expand(expression))
}

/// Whether a template literal schema enumerates to a finite set of strings.
/// Non-template schemas and unparsable patterns are not finite.
pub fn is_template_literal_finite(schema: &Schema) -> bool {
    match &schema.kind {
        SchemaKind::TemplateLiteral(pattern) => parse_exact(pattern)
            .map(|expression| is_expression_finite(&expression))
            .unwrap_or(false),
        _ => false,
    }
}

/// Every string a finite template literal matches. Infinite template
/// literals and other kinds yield an empty list.
///
/// # Errors
///
/// Returns parse and expansion-limit errors.
pub fn template_literal_generate(schema: &Schema) -> Result<Vec<String>, TypeError> {
    let SchemaKind::TemplateLiteral(pattern) = &schema.kind else {
        return Ok(Vec::new());
    };
    let expression = parse_exact(pattern)?;
    if !is_expression_finite(&expression) {
        return Ok(Vec::new());
    }
    generate_expression(&expression)
}

/// Escapes the characters the dialect treats as syntax.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn visit(schema: &Schema) -> Result<String, TypeError> {
    match &schema.kind {
        SchemaKind::TemplateLiteral(pattern) => {
            let inner = pattern.strip_prefix('^').unwrap_or(pattern);
            Ok(inner.strip_suffix('$').unwrap_or(inner).to_string())
        }
        SchemaKind::Union(members) => {
            let alternatives = members.iter().map(visit).collect::<Result<Vec<_>, _>>()?;
            Ok(format!("({})", alternatives.join("|")))
        }
        SchemaKind::Number(_) | SchemaKind::Integer(_) | SchemaKind::BigInt(_) => {
            Ok(PATTERN_NUMBER.to_string())
        }
        SchemaKind::String(_) => Ok(PATTERN_STRING.to_string()),
        SchemaKind::Literal(value) => Ok(escape(&value.to_key())),
        SchemaKind::Boolean => Ok(PATTERN_BOOLEAN.to_string()),
        _ => Err(TypeError::TemplateLiteralKind {
            kind: schema.kind_name().to_string(),
        }),
    }
}

/// Builds a template literal from a sequence of kinds.
///
/// Accepted kinds are literals, strings, numbers, integers, bigints,
/// booleans, unions of those and nested template literals.
///
/// # Errors
///
/// Returns `TypeError::TemplateLiteralKind` for any other kind.
pub fn template_literal(kinds: &[Schema]) -> Result<Schema, TypeError> {
    let body = kinds.iter().map(visit).collect::<Result<String, _>>()?;
    Ok(Schema::new(SchemaKind::TemplateLiteral(format!("^{body}$"))))
}

/// Builds a template literal from `${...}` syntax, e.g.
/// `` on${"click"|"hover"}`` or `id_${number}`.
///
/// # Errors
///
/// Propagates [`template_literal`] errors.
pub fn template_literal_syntax(syntax: &str) -> Result<Schema, TypeError> {
    template_literal(&from_syntax(syntax))
}

fn from_syntax(syntax: &str) -> Vec<Schema> {
    match syntax.find('$') {
        Some(index) => {
            let mut kinds = vec![literal(&syntax[..index])];
            kinds.extend(from_terminal(&syntax[index..]));
            kinds
        }
        None => vec![literal(syntax)],
    }
}

fn from_terminal(syntax: &str) -> Vec<Schema> {
    if !syntax[1..].starts_with('{') {
        let mut kinds = vec![literal("$")];
        kinds.extend(from_syntax(&syntax[1..]));
        return kinds;
    }
    match syntax[2..].find('}') {
        Some(offset) => {
            let end = 2 + offset;
            let mut kinds = vec![from_union(&syntax[2..end])];
            kinds.extend(from_syntax(&syntax[end + 1..]));
            kinds
        }
        None => vec![literal(syntax)],
    }
}

fn from_union(syntax: &str) -> Schema {
    let trimmed = syntax.trim().replace(['"', '\''], "");
    match trimmed.as_str() {
        "boolean" => boolean(),
        "number" => number(),
        "bigint" => bigint(),
        "string" => string(),
        _ => {
            let literals: Vec<Schema> = trimmed.split('|').map(|l| literal(l.trim())).collect();
            union_evaluated(&literals)
        }
    }
}

/// Anchored pattern matching exactly the given strings.
pub(crate) fn literal_union_pattern(values: &[String]) -> String {
    let alternatives: Vec<String> = values.iter().map(|v| escape(v)).collect();
    format!("^({})$", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::{array, literal};
    use crate::compose::union;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_alternation_and_sequence() {
        let expression = parse_exact("^x(a|b)$").unwrap();
        assert_eq!(
            expression,
            Expression::And(vec![
                Expression::Const("x".into()),
                Expression::Or(vec![
                    Expression::Const("a".into()),
                    Expression::Const("b".into())
                ]),
            ])
        );
    }

    #[test]
    fn unclosed_group_is_an_error() {
        assert!(matches!(
            parse("a(b"),
            Err(TypeError::TemplateLiteralParse { .. })
        ));
    }

    #[test]
    fn syntax_builds_pattern() {
        let schema = template_literal_syntax("${\"a\"|\"b\"}_${number}").unwrap();
        let SchemaKind::TemplateLiteral(pattern) = &schema.kind else {
            panic!("expected template literal");
        };
        assert_eq!(pattern, "^(a|b)_(0|[1-9][0-9]*)$");
        assert!(!is_template_literal_finite(&schema));
        assert!(template_literal_generate(&schema).unwrap().is_empty());
    }

    #[test]
    fn finite_literal_expands_in_order() {
        let schema = template_literal(&[
            union(&[literal("get"), literal("set")]),
            union(&[literal("X"), literal("Y")]),
        ])
        .unwrap();
        assert!(is_template_literal_finite(&schema));
        assert_eq!(
            template_literal_generate(&schema).unwrap(),
            vec!["getX", "getY", "setX", "setY"]
        );
    }

    #[test]
    fn booleans_are_finite() {
        let schema = template_literal(&[literal("is_"), boolean()]).unwrap();
        assert_eq!(
            template_literal_generate(&schema).unwrap(),
            vec!["is_true", "is_false"]
        );
    }

    #[test]
    fn literals_with_syntax_characters_round_trip() {
        let schema = template_literal(&[literal("a.b"), literal("(c)")]).unwrap();
        assert_eq!(template_literal_generate(&schema).unwrap(), vec!["a.b(c)"]);
    }

    #[test]
    fn rejects_unsupported_kinds() {
        let result = template_literal(&[array(string())]);
        assert!(matches!(
            result,
            Err(TypeError::TemplateLiteralKind { kind }) if kind == "Array"
        ));
    }

    #[test]
    fn expansion_limit() {
        let digits: Vec<Schema> = (0..10i64).map(literal).collect();
        let digit = union(&digits);
        let kinds = vec![digit; 5];
        let schema = template_literal(&kinds).unwrap();
        assert!(matches!(
            template_literal_generate(&schema),
            Err(TypeError::TemplateLiteralExpansion { limit: EXPANSION_LIMIT })
        ));
    }
}
