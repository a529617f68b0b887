// src/core/substitution.rs

//! # Substitution
//!
//! Template expansion for block text. Two placeholder forms are understood:
//!
//! - `$N` (N ≥ 1): positional arguments, looked up as the key `"$N"`.
//! - `{{path}}`: context variables, where `path` may walk into objects and
//!   arrays with `.field` and `[index]` segments.
//!
//! `$0` is never touched, and a doubled `$$` is protected from positional
//! matching. [`escape_dollar_signs`] turns remaining `$$` into a literal `$`.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use thiserror::Error;

/// A table of named values, used both for arguments (`"$1"`, `"file"`) and variables.
pub type Bindings = Map<String, Value>;

/// Placeholders produced by [`preprocess_text`], in creation order.
pub type EscapeTable = Vec<(String, String)>;

lazy_static! {
    static ref ARG_PATTERN: Regex = Regex::new(r"\$(\d+)").expect("valid argument regex");
    static ref VAR_PATTERN: Regex =
        Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_.\[\]]*)\}\}").expect("valid variable regex");
}

const ESCAPED_DOLLAR: &str = "$$";
const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Why a `{{path}}` could not be walked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathResolutionError {
    /// An object has no such key.
    #[error("Key '{0}' not found")]
    KeyNotFound(String),
    /// An array was indexed with something that is not an integer.
    #[error("Invalid array index '{0}'")]
    InvalidIndex(String),
    /// An array index past either end.
    #[error("Array index {index} out of range (length {len})")]
    IndexOutOfRange { index: i64, len: usize },
    /// A scalar was indexed.
    #[error("Cannot access '{segment}' on a {kind} value")]
    NotIndexable { segment: String, kind: &'static str },
}

/// Failures while expanding a template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionError {
    /// A `$N` placeholder had no binding.
    #[error("Missing required argument {placeholder} (position {position}). Available arguments: {available:?}")]
    MissingArgument {
        /// The placeholder as written, e.g. `$2`.
        placeholder: String,
        /// Its 1-based position.
        position: u64,
        /// Keys that were bound.
        available: Vec<String>,
    },
    /// A `{{path}}` placeholder could not be resolved.
    #[error("Variable not found: {{{{{path}}}}} - {source}. Available variables: {available:?}")]
    VariableNotFound {
        /// The reference as written inside the braces.
        path: String,
        /// Where the walk stopped.
        #[source]
        source: PathResolutionError,
        /// Top-level variables that were bound.
        available: Vec<String>,
    },
    /// A resolved value could not be rendered as JSON.
    #[error("Failed to serialize value of {{{{{path}}}}}: {message}")]
    Serialization { path: String, message: String },
}

// --- Escaping ---

/// Replaces every `$$` with an opaque placeholder and returns the mapping.
pub fn preprocess_text(text: &str) -> (String, EscapeTable) {
    let mut table = EscapeTable::new();
    let mut output = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(index) = rest.find(ESCAPED_DOLLAR) {
        let (head, tail) = rest.split_at(index);
        output.push_str(head);
        let placeholder = format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", table.len());
        output.push_str(&placeholder);
        table.push((placeholder, ESCAPED_DOLLAR.to_string()));
        rest = tail.get(ESCAPED_DOLLAR.len()..).unwrap_or_default();
    }
    output.push_str(rest);

    (output, table)
}

/// Restores the placeholders created by [`preprocess_text`].
pub fn postprocess_text(text: &str, table: &EscapeTable) -> String {
    table
        .iter()
        .rev()
        .fold(text.to_string(), |acc, (placeholder, original)| {
            acc.replace(placeholder, original)
        })
}

/// Turns each escaped `$$` into a literal `$`.
pub fn escape_dollar_signs(text: &str) -> String {
    text.replace(ESCAPED_DOLLAR, "$")
}

// --- Value rendering ---

/// Renders a resolved value for insertion into text.
/// Strings are inserted raw; objects and arrays as compact JSON.
fn render_value(value: &Value) -> Result<String, serde_json::Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(value),
        other => Ok(other.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn available_keys(bindings: &Bindings) -> Vec<String> {
    bindings.keys().cloned().collect()
}

// --- Positional arguments ---

/// Replaces every `$N` (N ≥ 1) with its binding. `$0` and `$$` are left alone.
pub fn substitute_arguments(text: &str, arguments: &Bindings) -> Result<String, SubstitutionError> {
    let (protected, table) = preprocess_text(text);
    let mut output = String::with_capacity(protected.len());
    let mut last_end = 0;

    for caps in ARG_PATTERN.captures_iter(&protected) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let position = digits.as_str().parse::<u64>().unwrap_or(u64::MAX);
        if position == 0 {
            continue;
        }

        let value = arguments
            .get(whole.as_str())
            .ok_or_else(|| SubstitutionError::MissingArgument {
                placeholder: whole.as_str().to_string(),
                position,
                available: available_keys(arguments),
            })?;
        let rendered = render_value(value).map_err(|e| SubstitutionError::Serialization {
            path: whole.as_str().to_string(),
            message: e.to_string(),
        })?;

        output.push_str(protected.get(last_end..whole.start()).unwrap_or_default());
        output.push_str(&rendered);
        last_end = whole.end();
    }
    output.push_str(protected.get(last_end..).unwrap_or_default());

    Ok(postprocess_text(&output, &table))
}

/// Distinct `$N` references in `text` (N ≥ 1), sorted numerically.
pub fn find_argument_references(text: &str) -> Vec<String> {
    argument_numbers(text)
        .into_iter()
        .map(|n| format!("${n}"))
        .collect()
}

fn argument_numbers(text: &str) -> BTreeSet<u64> {
    let (protected, _) = preprocess_text(text);
    ARG_PATTERN
        .captures_iter(&protected)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .collect()
}

/// Warns when the referenced positions skip a number, e.g. `$1` and `$3` without `$2`.
pub fn validate_argument_syntax(text: &str) -> Vec<String> {
    let numbers = argument_numbers(text);
    let Some(&highest) = numbers.last() else {
        return Vec::new();
    };

    let missing: Vec<String> = (1..highest)
        .filter(|n| !numbers.contains(n))
        .map(|n| format!("${n}"))
        .collect();
    if missing.is_empty() {
        return Vec::new();
    }

    let found: Vec<String> = numbers.iter().map(|n| format!("${n}")).collect();
    vec![format!(
        "Argument reference skips {} (found {})",
        missing.join(", "),
        found.join(", ")
    )]
}

// --- Structured variables ---

/// Resolves a dotted/bracketed path such as `user.tags[0]` against `variables`.
pub fn resolve_variable_path<'v>(
    path: &str,
    variables: &'v Bindings,
) -> Result<&'v Value, PathResolutionError> {
    let normalized = path.replace('[', ".").replace(']', "");
    let mut segments = normalized.split('.');
    let root = segments.next().unwrap_or_default();

    let mut current = variables
        .get(root)
        .ok_or_else(|| PathResolutionError::KeyNotFound(root.to_string()))?;
    for segment in segments {
        current = step_into(current, segment)?;
    }
    Ok(current)
}

fn step_into<'v>(value: &'v Value, segment: &str) -> Result<&'v Value, PathResolutionError> {
    match value {
        Value::Object(map) => map
            .get(segment)
            .ok_or_else(|| PathResolutionError::KeyNotFound(segment.to_string())),
        Value::Array(items) => {
            let index: i64 = segment
                .parse()
                .map_err(|_| PathResolutionError::InvalidIndex(segment.to_string()))?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .ok_or(PathResolutionError::IndexOutOfRange {
                    index,
                    len: items.len(),
                })
        }
        other => Err(PathResolutionError::NotIndexable {
            segment: segment.to_string(),
            kind: value_kind(other),
        }),
    }
}

/// Replaces every `{{path}}` with the resolved value.
pub fn substitute_variables(text: &str, variables: &Bindings) -> Result<String, SubstitutionError> {
    let mut output = String::with_capacity(text.len());
    let mut last_end = 0;

    for caps in VAR_PATTERN.captures_iter(text) {
        let (Some(whole), Some(path)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let path = path.as_str();
        let value = resolve_variable_path(path, variables).map_err(|source| {
            SubstitutionError::VariableNotFound {
                path: path.to_string(),
                source,
                available: available_keys(variables),
            }
        })?;
        let rendered = render_value(value).map_err(|e| SubstitutionError::Serialization {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        output.push_str(text.get(last_end..whole.start()).unwrap_or_default());
        output.push_str(&rendered);
        last_end = whole.end();
    }
    output.push_str(text.get(last_end..).unwrap_or_default());

    Ok(output)
}

/// Distinct `{{path}}` references in `text`, in order of first appearance.
pub fn find_variable_references(text: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in VAR_PATTERN.captures_iter(text) {
        if let Some(path) = caps.get(1) {
            let path = path.as_str().to_string();
            if !seen.contains(&path) {
                seen.push(path);
            }
        }
    }
    seen
}

/// The top-level variable a reference path starts from: `user` for `user.tags[0]`.
pub fn reference_root(path: &str) -> &str {
    path.split(['.', '[']).next().unwrap_or(path)
}

/// Positional substitution first, then structured variables when any `{{…}}` remains.
/// An empty argument table skips the positional pass, so `$1` in e.g. an awk
/// program passes through untouched.
pub fn substitute_all(
    text: &str,
    arguments: &Bindings,
    variables: &Bindings,
) -> Result<String, SubstitutionError> {
    let expanded = if arguments.is_empty() {
        text.to_string()
    } else {
        substitute_arguments(text, arguments)?
    };
    if VAR_PATTERN.is_match(&expanded) {
        substitute_variables(&expanded, variables)
    } else {
        Ok(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bindings(value: Value) -> Bindings {
        match value {
            Value::Object(map) => map,
            _ => panic!("bindings must be an object"),
        }
    }

    #[test]
    fn test_substitute_arguments_basic() {
        let args = bindings(json!({"$1": "utils.py", "$2": "strict"}));
        let out = substitute_arguments("Review $1 in $2 mode", &args).unwrap();
        assert_eq!(out, "Review utils.py in strict mode");
    }

    #[test]
    fn test_dollar_zero_and_escapes_are_untouched() {
        let args = bindings(json!({"$1": "x"}));
        assert_eq!(substitute_arguments("$0 and $$1 and $1", &args).unwrap(), "$0 and $$1 and x");
        assert_eq!(substitute_arguments("Price is $$10", &Bindings::new()).unwrap(), "Price is $$10");
    }

    #[test]
    fn test_multi_digit_positions() {
        let args = bindings(json!({"$1": "one", "$10": "ten"}));
        assert_eq!(substitute_arguments("$10/$1", &args).unwrap(), "ten/one");
    }

    #[test]
    fn test_missing_argument_lists_available() {
        let args = bindings(json!({"$1": "a"}));
        let err = substitute_arguments("use $2", &args).unwrap_err();
        assert_eq!(
            err,
            SubstitutionError::MissingArgument {
                placeholder: "$2".to_string(),
                position: 2,
                available: vec!["$1".to_string()],
            }
        );
        assert_eq!(err.to_string(), "Missing required argument $2 (position 2). Available arguments: [\"$1\"]");
    }

    #[test]
    fn test_escape_round_trip_and_literal() {
        let text = "cost $$5, pid $$$$, keep $1";
        let (protected, table) = preprocess_text(text);
        assert!(!protected.contains("$$"));
        assert_eq!(table.len(), 3);
        assert_eq!(postprocess_text(&protected, &table), text);
        assert_eq!(escape_dollar_signs("Price is $$10"), "Price is $10");
    }

    #[test]
    fn test_find_and_validate_argument_references() {
        assert_eq!(find_argument_references("$3 $1 $0 $3 $$2"), vec!["$1", "$3"]);
        assert_eq!(
            validate_argument_syntax("Use $1 and $3"),
            vec!["Argument reference skips $2 (found $1, $3)".to_string()]
        );
        assert!(validate_argument_syntax("$1 $2").is_empty());
        assert_eq!(
            validate_argument_syntax("$3 only"),
            vec!["Argument reference skips $1, $2 (found $3)".to_string()]
        );
    }

    #[test]
    fn test_resolve_nested_paths() {
        let vars = bindings(json!({
            "user": {"name": "Ada", "tags": ["admin", "ops"]},
            "matrix": [[1, 2], [3, 4]]
        }));
        assert_eq!(resolve_variable_path("user.name", &vars).unwrap(), &json!("Ada"));
        assert_eq!(resolve_variable_path("user.tags[1]", &vars).unwrap(), &json!("ops"));
        assert_eq!(resolve_variable_path("matrix[1][0]", &vars).unwrap(), &json!(3));
    }

    #[test]
    fn test_resolve_path_failures() {
        let vars = bindings(json!({"user": {"tags": ["a"]}, "n": 5}));
        assert_eq!(
            resolve_variable_path("missing", &vars),
            Err(PathResolutionError::KeyNotFound("missing".to_string()))
        );
        assert_eq!(
            resolve_variable_path("user.tags[4]", &vars),
            Err(PathResolutionError::IndexOutOfRange { index: 4, len: 1 })
        );
        assert_eq!(
            resolve_variable_path("user.tags[x]", &vars),
            Err(PathResolutionError::InvalidIndex("x".to_string()))
        );
        assert!(matches!(
            resolve_variable_path("n.digits", &vars),
            Err(PathResolutionError::NotIndexable { kind: "number", .. })
        ));
    }

    #[test]
    fn test_substitute_variables_renders_values() {
        let vars = bindings(json!({
            "name": "Ada",
            "count": 3,
            "flag": true,
            "user": {"id": 7},
            "list": [1, 2]
        }));
        let out = substitute_variables("{{name}} {{count}} {{flag}} {{user}} {{list}} {{user.id}}", &vars).unwrap();
        assert_eq!(out, r#"Ada 3 true {"id":7} [1,2] 7"#);
    }

    #[test]
    fn test_substitute_variables_error_message() {
        let vars = bindings(json!({"a": 1}));
        let err = substitute_variables("{{b}}", &vars).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Variable not found: {{b}} - Key 'b' not found. Available variables: [\"a\"]"
        );
    }

    #[test]
    fn test_substitute_all_runs_both_passes() {
        let args = bindings(json!({"$1": "{{greeting}}"}));
        let vars = bindings(json!({"greeting": "hello"}));
        assert_eq!(substitute_all("say $1", &args, &vars).unwrap(), "say hello");
        assert_eq!(substitute_all("plain", &Bindings::new(), &Bindings::new()).unwrap(), "plain");
    }

    #[test]
    fn test_substitute_all_without_arguments_keeps_dollar_positions() {
        let awk = "awk '{print $1}' file.txt";
        assert_eq!(substitute_all(awk, &Bindings::new(), &Bindings::new()).unwrap(), awk);

        let vars = bindings(json!({"file": "data.csv"}));
        assert_eq!(
            substitute_all("cut -f$2 {{file}}", &Bindings::new(), &vars).unwrap(),
            "cut -f$2 data.csv"
        );
    }

    #[test]
    fn test_variable_reference_discovery() {
        assert_eq!(
            find_variable_references("{{a}} {{user.name}} {{a}} {{9bad}}"),
            vec!["a".to_string(), "user.name".to_string()]
        );
        assert_eq!(reference_root("user.tags[0]"), "user");
        assert_eq!(reference_root("items[2]"), "items");
    }
}
