//! Schema linting - static analysis of wire-form schema documents.
//!
//! Validates schema files for:
//! - JSON syntax errors
//! - Keywords whose values have the wrong shape (`type`, `items`, bounds,
//!   `required`, `anyOf`, ...)
//! - Patterns the regex engine cannot compile
//! - `$ref` targets with no matching `$id` or `$defs` entry in the document
//! - Custom kinds (`x-kind`) with no registered validator

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value as Json};

use crate::loader::load_json;
use crate::pattern::{compile, compile_with_flags};
use crate::registry::TypeRegistry;
use crate::types::Kind;
use crate::value::errors::pointer;
use crate::wire::{TYPE_NAMES, X_KIND};

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    /// JSON pointer to the issue (e.g., "/properties/id/minLength")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings count as failures.
pub fn lint(path: &Path, strict: bool, types: &TypeRegistry) -> LintResult {
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path, types);
        total_errors += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        total_warnings += file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema file.
pub fn lint_file(file: &Path, base_path: &Path, types: &TypeRegistry) -> FileResult {
    let display = file.strip_prefix(base_path).unwrap_or(file).to_path_buf();
    let display = if display.as_os_str().is_empty() {
        file.to_path_buf()
    } else {
        display
    };

    let diagnostics = match load_json(file) {
        Ok(schema) => lint_schema(&schema, types),
        Err(e) => vec![Diagnostic {
            severity: Severity::Error,
            code: "E001".to_string(),
            path: String::new(),
            message: format!("syntax error: {}", e),
        }],
    };

    let status = if diagnostics.iter().any(|d| d.severity == Severity::Error) {
        FileStatus::Error
    } else if diagnostics.is_empty() {
        FileStatus::Ok
    } else {
        FileStatus::Warning
    };

    FileResult {
        file: display,
        status,
        diagnostics,
    }
}

/// Lint a wire-form schema document.
///
/// Structural problems are errors. Unresolved `$ref` targets and custom
/// kinds missing from `types` are warnings, since both may be supplied
/// at validation time.
pub fn lint_schema(schema: &Json, types: &TypeRegistry) -> Vec<Diagnostic> {
    let mut linter = Linter {
        types,
        ids: HashSet::new(),
        refs: Vec::new(),
        diagnostics: Vec::new(),
    };
    linter.schema(schema, "");
    linter.unresolved_refs();
    linter.diagnostics
}

/// `IsSchema`: true when `schema` is a structurally valid schema document.
///
/// Custom kinds are accepted whether or not they are registered.
pub fn is_schema(schema: &Json) -> bool {
    !lint_schema(schema, &TypeRegistry::new())
        .iter()
        .any(|d| d.severity == Severity::Error)
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

struct Linter<'a> {
    types: &'a TypeRegistry,
    ids: HashSet<String>,
    /// `$ref` targets with the pointer of the keyword that names them.
    refs: Vec<(String, String)>,
    diagnostics: Vec<Diagnostic>,
}

impl Linter<'_> {
    fn report(&mut self, severity: Severity, code: &str, path: &str, message: String) {
        self.diagnostics.push(Diagnostic {
            severity,
            code: code.to_string(),
            path: path.to_string(),
            message,
        });
    }

    fn error(&mut self, code: &str, path: &str, message: impl Into<String>) {
        self.report(Severity::Error, code, path, message.into());
    }

    fn schema(&mut self, json: &Json, path: &str) {
        let map = match json {
            Json::Bool(_) => return,
            Json::Object(map) => map,
            other => {
                self.error(
                    "E002",
                    path,
                    format!("expected schema, got {}", json_type_name(other)),
                );
                return;
            }
        };

        match map.get("$id") {
            Some(Json::String(id)) => {
                self.ids.insert(id.clone());
            }
            Some(other) => self.error(
                "E008",
                &pointer(path, "$id"),
                format!("expected $id to be a string, got {}", json_type_name(other)),
            ),
            None => {}
        }
        for key in ["title", "description"] {
            if let Some(value) = map.get(key).filter(|v| !v.is_string()) {
                self.error(
                    "E008",
                    &pointer(path, key),
                    format!("expected {key} to be a string, got {}", json_type_name(value)),
                );
            }
        }

        if let Some(kind) = map.get(X_KIND) {
            self.extension(map, kind, path);
            return;
        }

        if let Some(defs) = map.get("$defs") {
            self.definitions(defs, &pointer(path, "$defs"));
        }
        match map.get("$ref") {
            Some(Json::String(target)) => self.refs.push((pointer(path, "$ref"), target.clone())),
            Some(other) => self.error(
                "E008",
                &pointer(path, "$ref"),
                format!("expected $ref to be a string, got {}", json_type_name(other)),
            ),
            None => {}
        }
        if let Some(value) = map.get("const") {
            if !matches!(value, Json::String(_) | Json::Number(_) | Json::Bool(_)) {
                self.error(
                    "E008",
                    &pointer(path, "const"),
                    format!(
                        "expected const to be a string, number or boolean, got {}",
                        json_type_name(value)
                    ),
                );
            }
        }
        for key in ["anyOf", "allOf"] {
            if let Some(list) = map.get(key) {
                self.schema_list(list, &pointer(path, key), key);
            }
        }
        if let Some(inner) = map.get("not") {
            self.schema(inner, &pointer(path, "not"));
        }
        if let Some(unevaluated) = map.get("unevaluatedProperties") {
            self.additional(unevaluated, &pointer(path, "unevaluatedProperties"));
        }

        match map.get("type") {
            None => {}
            Some(Json::String(name)) => self.typed(map, name, path),
            Some(other) => self.error(
                "E003",
                &pointer(path, "type"),
                format!("expected type to be a string, got {}", json_type_name(other)),
            ),
        }
    }

    fn typed(&mut self, map: &Map<String, Json>, name: &str, path: &str) {
        if !TYPE_NAMES.contains(&name) {
            self.error("E003", &pointer(path, "type"), format!("unknown type '{name}'"));
            return;
        }
        match name {
            "object" => self.object(map, path),
            "array" => self.array(map, path),
            "string" => {
                self.counts(map, path, &["minLength", "maxLength"]);
                match map.get("pattern") {
                    Some(Json::String(pattern)) => {
                        self.pattern(pattern, &pointer(path, "pattern"));
                    }
                    Some(other) => self.error(
                        "E007",
                        &pointer(path, "pattern"),
                        format!("expected pattern to be a string, got {}", json_type_name(other)),
                    ),
                    None => {}
                }
                if let Some(format) = map.get("format").filter(|f| !f.is_string()) {
                    self.error(
                        "E008",
                        &pointer(path, "format"),
                        format!("expected format to be a string, got {}", json_type_name(format)),
                    );
                }
            }
            "number" | "integer" => self.numbers(
                map,
                path,
                &["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum", "multipleOf"],
            ),
            "bigint" => self.integers(
                map,
                path,
                &["minimum", "maximum", "exclusiveMinimum", "exclusiveMaximum", "multipleOf"],
            ),
            "Date" => self.numbers(
                map,
                path,
                &[
                    "minimumTimestamp",
                    "maximumTimestamp",
                    "exclusiveMinimumTimestamp",
                    "exclusiveMaximumTimestamp",
                    "multipleOfTimestamp",
                ],
            ),
            "Uint8Array" => self.counts(map, path, &["minByteLength", "maxByteLength"]),
            "RegExp" => self.regexp(map, path),
            "Function" | "Constructor" => {
                self.required_list(map, path, "parameters");
                self.required_schema(map, path, "returns");
            }
            "Promise" => self.required_schema(map, path, "item"),
            "Iterator" | "AsyncIterator" => self.required_schema(map, path, "items"),
            _ => {}
        }
    }

    fn object(&mut self, map: &Map<String, Json>, path: &str) {
        let properties = match map.get("properties") {
            None => None,
            Some(Json::Object(properties)) => {
                let at = pointer(path, "properties");
                for (key, property) in properties {
                    self.schema(property, &pointer(&at, key));
                }
                Some(properties)
            }
            Some(other) => {
                self.error(
                    "E004",
                    &pointer(path, "properties"),
                    format!("expected properties to be an object, got {}", json_type_name(other)),
                );
                None
            }
        };

        if let Some(required) = map.get("required") {
            let at = pointer(path, "required");
            match required.as_array() {
                Some(names) => {
                    for (index, name) in names.iter().enumerate() {
                        let entry = pointer(&at, &index.to_string());
                        match name.as_str() {
                            Some(name) if properties.map_or(false, |p| p.contains_key(name)) => {}
                            Some(name) => self.error(
                                "E006",
                                &entry,
                                format!("required property '{name}' is not declared in properties"),
                            ),
                            None => self.error(
                                "E006",
                                &entry,
                                format!(
                                    "expected required entry to be a string, got {}",
                                    json_type_name(name)
                                ),
                            ),
                        }
                    }
                }
                None => self.error(
                    "E006",
                    &at,
                    format!("expected required to be an array, got {}", json_type_name(required)),
                ),
            }
        }

        match map.get("patternProperties") {
            Some(Json::Object(patterns)) => {
                let at = pointer(path, "patternProperties");
                for (pattern, value) in patterns {
                    let entry = pointer(&at, pattern);
                    self.pattern(pattern, &entry);
                    self.schema(value, &entry);
                }
            }
            Some(other) => self.error(
                "E004",
                &pointer(path, "patternProperties"),
                format!(
                    "expected patternProperties to be an object, got {}",
                    json_type_name(other)
                ),
            ),
            None => {}
        }

        if let Some(additional) = map.get("additionalProperties") {
            self.additional(additional, &pointer(path, "additionalProperties"));
        }
        self.counts(map, path, &["minProperties", "maxProperties"]);
    }

    fn array(&mut self, map: &Map<String, Json>, path: &str) {
        let at = pointer(path, "items");
        match map.get("items") {
            None => {}
            Some(Json::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    self.schema(item, &pointer(&at, &index.to_string()));
                }
            }
            Some(items @ (Json::Object(_) | Json::Bool(_))) => self.schema(items, &at),
            Some(other) => self.error(
                "E004",
                &at,
                format!(
                    "expected items to be a schema or an array of schemas, got {}",
                    json_type_name(other)
                ),
            ),
        }
        if let Some(additional) = map.get("additionalItems") {
            self.additional(additional, &pointer(path, "additionalItems"));
        }
        if let Some(contains) = map.get("contains") {
            self.schema(contains, &pointer(path, "contains"));
        }
        if let Some(unique) = map.get("uniqueItems").filter(|u| !u.is_boolean()) {
            self.error(
                "E008",
                &pointer(path, "uniqueItems"),
                format!("expected uniqueItems to be a boolean, got {}", json_type_name(unique)),
            );
        }
        self.counts(
            map,
            path,
            &["minItems", "maxItems", "minContains", "maxContains"],
        );
    }

    fn regexp(&mut self, map: &Map<String, Json>, path: &str) {
        let flags = match map.get("flags") {
            None => "",
            Some(Json::String(flags)) => flags.as_str(),
            Some(other) => {
                self.error(
                    "E008",
                    &pointer(path, "flags"),
                    format!("expected flags to be a string, got {}", json_type_name(other)),
                );
                ""
            }
        };
        match map.get("source") {
            Some(Json::String(source)) => {
                if let Err(e) = compile_with_flags(source, flags) {
                    self.error(
                        "E007",
                        &pointer(path, "source"),
                        format!("invalid regular expression: {e}"),
                    );
                }
            }
            Some(other) => self.error(
                "E007",
                &pointer(path, "source"),
                format!("expected source to be a string, got {}", json_type_name(other)),
            ),
            None => self.error("E004", path, "missing required keyword 'source'"),
        }
        self.counts(map, path, &["minLength", "maxLength"]);
    }

    fn extension(&mut self, map: &Map<String, Json>, kind: &Json, path: &str) {
        let Some(kind) = kind.as_str() else {
            self.error(
                "E008",
                &pointer(path, X_KIND),
                format!("expected {X_KIND} to be a string, got {}", json_type_name(kind)),
            );
            return;
        };
        match kind {
            "Computed" => {
                if !map.get("target").map_or(false, Json::is_string) {
                    self.error("E004", path, "missing required keyword 'target'");
                }
                self.required_list(map, path, "parameters");
            }
            "MappedKey" => {
                let keys = map.get("keys").and_then(Json::as_array);
                if !keys.map_or(false, |keys| keys.iter().all(Json::is_string)) {
                    self.error(
                        "E008",
                        &pointer(path, "keys"),
                        "expected keys to be an array of strings",
                    );
                }
            }
            "MappedResult" => match map.get("properties") {
                Some(Json::Object(properties)) => {
                    let at = pointer(path, "properties");
                    for (key, property) in properties {
                        self.schema(property, &pointer(&at, key));
                    }
                }
                _ => self.error("E004", path, "missing required keyword 'properties'"),
            },
            "Argument" => {
                if map.get("index").is_none() {
                    self.error("E004", path, "missing required keyword 'index'");
                }
                self.counts(map, path, &["index"]);
            }
            name if Kind::is_known(name) => self.error(
                "E008",
                &pointer(path, X_KIND),
                format!("{X_KIND} '{name}' names a built-in kind"),
            ),
            name if !self.types.has(name) => self.report(
                Severity::Warning,
                "W001",
                &pointer(path, X_KIND),
                format!("no validator registered for kind '{name}'"),
            ),
            _ => {}
        }
    }

    fn definitions(&mut self, defs: &Json, path: &str) {
        let Some(defs) = defs.as_object() else {
            self.error(
                "E008",
                path,
                format!("expected $defs to be an object, got {}", json_type_name(defs)),
            );
            return;
        };
        for (name, def) in defs {
            self.ids.insert(name.clone());
            self.schema(def, &pointer(path, name));
        }
    }

    fn schema_list(&mut self, list: &Json, path: &str, key: &str) {
        match list.as_array() {
            Some(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.schema(item, &pointer(path, &index.to_string()));
                }
            }
            None => self.error(
                "E008",
                path,
                format!("expected {key} to be an array of schemas, got {}", json_type_name(list)),
            ),
        }
    }

    fn additional(&mut self, value: &Json, path: &str) {
        match value {
            Json::Bool(_) => {}
            Json::Object(_) => self.schema(value, path),
            other => self.error(
                "E004",
                path,
                format!("expected a boolean or a schema, got {}", json_type_name(other)),
            ),
        }
    }

    fn required_schema(&mut self, map: &Map<String, Json>, path: &str, key: &str) {
        match map.get(key) {
            Some(child) => self.schema(child, &pointer(path, key)),
            None => self.error("E004", path, format!("missing required keyword '{key}'")),
        }
    }

    fn required_list(&mut self, map: &Map<String, Json>, path: &str, key: &str) {
        match map.get(key) {
            Some(list) => self.schema_list(list, &pointer(path, key), key),
            None => self.error("E004", path, format!("missing required keyword '{key}'")),
        }
    }

    fn pattern(&mut self, pattern: &str, path: &str) {
        if let Err(e) = compile(pattern) {
            self.error("E007", path, format!("invalid pattern '{pattern}': {e}"));
        }
    }

    fn counts(&mut self, map: &Map<String, Json>, path: &str, keys: &[&str]) {
        for key in keys {
            if let Some(value) = map.get(*key).filter(|v| v.as_u64().is_none()) {
                self.error(
                    "E005",
                    &pointer(path, key),
                    format!(
                        "expected {key} to be a non-negative integer, got {}",
                        json_type_name(value)
                    ),
                );
            }
        }
    }

    fn numbers(&mut self, map: &Map<String, Json>, path: &str, keys: &[&str]) {
        for key in keys {
            if let Some(value) = map.get(*key).filter(|v| !v.is_number()) {
                self.error(
                    "E005",
                    &pointer(path, key),
                    format!("expected {key} to be a number, got {}", json_type_name(value)),
                );
            }
        }
    }

    fn integers(&mut self, map: &Map<String, Json>, path: &str, keys: &[&str]) {
        for key in keys {
            let Some(value) = map.get(*key) else {
                continue;
            };
            let valid = match value {
                Json::Number(n) => n.is_i64() || n.is_u64(),
                Json::String(s) => s.parse::<i128>().is_ok(),
                _ => false,
            };
            if !valid {
                self.error(
                    "E005",
                    &pointer(path, key),
                    format!("expected {key} to be an integer, got {}", json_type_name(value)),
                );
            }
        }
    }

    fn unresolved_refs(&mut self) {
        let refs = std::mem::take(&mut self.refs);
        for (path, target) in refs {
            if !self.ids.contains(&target) {
                self.report(
                    Severity::Warning,
                    "W002",
                    &path,
                    format!("unresolved reference '{target}'"),
                );
            }
        }
    }
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn codes(schema: &Json) -> Vec<String> {
        lint_schema(schema, &TypeRegistry::new())
            .into_iter()
            .map(|d| d.code)
            .collect()
    }

    #[test]
    fn lint_valid_schema() {
        let schema = json!({
            "$id": "Order",
            "type": "object",
            "properties": {
                "id": { "type": "string", "minLength": 1 },
                "lines": { "type": "array", "items": { "$ref": "Order" } }
            },
            "required": ["id"]
        });
        assert!(codes(&schema).is_empty());
        assert!(is_schema(&schema));
    }

    #[test]
    fn lint_invalid_type() {
        let schema = json!({ "properties": { "x": { "type": "float" } }, "type": "object" });
        let diagnostics = lint_schema(&schema, &TypeRegistry::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E003");
        assert_eq!(diagnostics[0].path, "/properties/x/type");
        assert!(!is_schema(&schema));
    }

    #[test]
    fn lint_non_schema_items() {
        assert_eq!(codes(&json!({ "type": "array", "items": 3 })), vec!["E004"]);
        assert_eq!(codes(&json!({ "anyOf": [{ "type": "string" }, "x"] })), vec!["E002"]);
    }

    #[test]
    fn lint_non_numeric_bounds() {
        assert_eq!(codes(&json!({ "type": "number", "minimum": "0" })), vec!["E005"]);
        assert_eq!(codes(&json!({ "type": "string", "maxLength": -1 })), vec!["E005"]);
        assert!(codes(&json!({ "type": "bigint", "maximum": "170141183460469231731687303715884105727" })).is_empty());
    }

    #[test]
    fn lint_required_names_unknown_property() {
        let schema = json!({
            "type": "object",
            "properties": { "a": { "type": "string" } },
            "required": ["a", "b"]
        });
        let diagnostics = lint_schema(&schema, &TypeRegistry::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "E006");
        assert_eq!(diagnostics[0].path, "/required/1");
    }

    #[test]
    fn lint_uncompilable_pattern() {
        assert_eq!(codes(&json!({ "type": "string", "pattern": "(" })), vec!["E007"]);
        assert_eq!(
            codes(&json!({ "type": "object", "patternProperties": { "[": {} } })),
            vec!["E007"]
        );
    }

    #[test]
    fn lint_custom_kinds() {
        let schema = json!({ "x-kind": "Money", "currency": "EUR" });
        assert_eq!(codes(&schema), vec!["W001"]);
        assert!(is_schema(&schema));

        let mut types = TypeRegistry::new();
        types.set("Money", |_, _| true);
        assert!(lint_schema(&schema, &types).is_empty());

        assert_eq!(codes(&json!({ "x-kind": "Object" })), vec!["E008"]);
        assert!(codes(&json!({ "x-kind": "Argument", "index": 0 })).is_empty());
    }

    #[test]
    fn lint_unresolved_reference_warning() {
        let diagnostics = lint_schema(&json!({ "$ref": "Missing" }), &TypeRegistry::new());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].code, "W002");

        let module = json!({ "$defs": { "A": { "type": "string" } }, "$ref": "A" });
        assert!(codes(&module).is_empty());
    }

    #[test]
    fn lint_invalid_json_syntax() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bad.json");
        fs::write(&file, "{ not json").unwrap();

        let result = lint_file(&file, dir.path(), &TypeRegistry::new());
        assert_eq!(result.status, FileStatus::Error);
        assert_eq!(result.diagnostics[0].code, "E001");
        assert_eq!(result.file, PathBuf::from("bad.json"));
    }

    #[test]
    fn lint_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"type": "string"}"#).unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/b.json"), r#"{"type": "nope"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let result = lint(dir.path(), false, &TypeRegistry::new());
        assert_eq!(result.files_checked, 2);
        assert_eq!(result.passed, 1);
        assert_eq!(result.failed, 1);
        assert!(!result.is_ok());
    }

    #[test]
    fn lint_strict_mode() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.json"), r#"{"$ref": "Elsewhere"}"#).unwrap();

        let relaxed = lint(dir.path(), false, &TypeRegistry::new());
        assert_eq!(relaxed.failed, 0);
        assert_eq!(relaxed.warnings, 1);

        let strict = lint(dir.path(), true, &TypeRegistry::new());
        assert_eq!(strict.failed, 1);
    }
}
