//! Regex patterns used for record keys and template literals, plus a
//! process-wide cache of compiled expressions.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

pub const PATTERN_BOOLEAN: &str = "(true|false)";
pub const PATTERN_NUMBER: &str = "(0|[1-9][0-9]*)";
pub const PATTERN_STRING: &str = "(.*)";
/// Matches nothing. The `regex` crate has no lookaround, so the empty
/// character class stands in for `(?!.*)`.
pub const PATTERN_NEVER: &str = r"([^\s\S])";

pub const PATTERN_BOOLEAN_EXACT: &str = "^(true|false)$";
pub const PATTERN_NUMBER_EXACT: &str = "^(0|[1-9][0-9]*)$";
pub const PATTERN_STRING_EXACT: &str = "^(.*)$";
pub const PATTERN_NEVER_EXACT: &str = r"^([^\s\S])$";

static CACHE: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Compiles `pattern`, reusing a previously compiled expression.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    if let Ok(cache) = CACHE.lock() {
        if let Some(regex) = cache.get(pattern) {
            return Ok(regex.clone());
        }
    }
    let regex = Regex::new(pattern)?;
    if let Ok(mut cache) = CACHE.lock() {
        cache.insert(pattern.to_string(), regex.clone());
    }
    Ok(regex)
}

/// Compiles a `RegExp` schema's source with its flags.
///
/// Supported flags map onto inline groups (`i`, `m`, `s`); `g`, `u` and `y`
/// carry no meaning for a whole-value test and are ignored.
pub fn compile_with_flags(source: &str, flags: &str) -> Result<Regex, regex::Error> {
    let inline: String = flags
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's'))
        .collect();
    if inline.is_empty() {
        compile(source)
    } else {
        compile(&format!("(?{inline}){source}"))
    }
}

/// Escapes regex metacharacters in a literal.
pub fn escape(value: &str) -> String {
    regex::escape(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_pattern_matches_nothing() {
        let regex = compile(PATTERN_NEVER_EXACT).unwrap();
        assert!(!regex.is_match(""));
        assert!(!regex.is_match("a"));
    }

    #[test]
    fn number_pattern_rejects_leading_zero() {
        let regex = compile(PATTERN_NUMBER_EXACT).unwrap();
        assert!(regex.is_match("0"));
        assert!(regex.is_match("42"));
        assert!(!regex.is_match("042"));
        assert!(!regex.is_match("x"));
    }

    #[test]
    fn flags_become_inline_groups() {
        let regex = compile_with_flags("^abc$", "gi").unwrap();
        assert!(regex.is_match("ABC"));
    }

    #[test]
    fn cache_returns_equivalent_regex() {
        let first = compile("^a+$").unwrap();
        let second = compile("^a+$").unwrap();
        assert_eq!(first.as_str(), second.as_str());
    }
}
