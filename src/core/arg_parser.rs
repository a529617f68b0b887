// src/core/arg_parser.rs

use crate::core::substitution::Bindings;
use crate::models::CommandArgument;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failures while turning raw argument text into bindings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    /// The raw text could not be split into shell words.
    #[error("Failed to parse arguments '{raw}': unbalanced quotes or trailing escape")]
    Tokenize { raw: String },
    /// A required argument had neither a token nor a default.
    #[error("Missing required argument: {name} (position {position})")]
    MissingRequired { name: String, position: usize },
}

/// Argument values bound for one command invocation.
///
/// Every declared argument is reachable both positionally (`"$1"`) and by
/// its declared name; extra tokens are reachable positionally only.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ArgumentBindings {
    values: IndexMap<String, String>,
}

impl ArgumentBindings {
    /// Value bound to a positional (`$1`) or declared name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// The value at 1-based `position`.
    pub fn positional(&self, position: usize) -> Option<&str> {
        self.get(&format!("${position}"))
    }

    /// Number of keys, positional and named together.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into a variable table usable by substitution.
    pub fn into_bindings(self) -> Bindings {
        self.values
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    }

    fn bind(&mut self, position: usize, name: Option<&str>, value: &str) {
        self.values.insert(format!("${position}"), value.to_string());
        if let Some(name) = name {
            self.values.insert(name.to_string(), value.to_string());
        }
    }
}

/// Splits raw argument text into shell words. Blank text yields no tokens.
pub fn tokenize(raw: &str) -> Result<Vec<String>, ArgumentError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    shlex::split(raw).ok_or_else(|| ArgumentError::Tokenize {
        raw: raw.to_string(),
    })
}

/// Binds the tokens of `raw` to the declared arguments.
///
/// For each declaration in order: the token at its position wins, otherwise
/// its default, otherwise the call fails if it is required; an optional
/// argument without a default is simply left unbound.
pub fn bind_arguments(
    raw: &str,
    declarations: &[CommandArgument],
) -> Result<ArgumentBindings, ArgumentError> {
    let tokens = tokenize(raw)?;
    let mut bindings = ArgumentBindings::default();

    for (index, declaration) in declarations.iter().enumerate() {
        let position = index + 1;
        match (tokens.get(index), &declaration.default) {
            (Some(token), _) => bindings.bind(position, Some(declaration.name.as_str()), token),
            (None, Some(default)) => {
                bindings.bind(position, Some(declaration.name.as_str()), default);
            }
            (None, None) if declaration.required => {
                return Err(ArgumentError::MissingRequired {
                    name: declaration.name.clone(),
                    position,
                });
            }
            (None, None) => {}
        }
    }

    for (index, token) in tokens.iter().enumerate().skip(declarations.len()) {
        bindings.bind(index + 1, None, token);
    }

    log::debug!("Bound {} argument value(s) from '{}'", bindings.len(), raw);
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations() -> Vec<CommandArgument> {
        vec![
            CommandArgument::required("file"),
            CommandArgument::optional("mode", Some("strict")),
        ]
    }

    #[test]
    fn test_tokenize_respects_quotes() {
        assert_eq!(
            tokenize(r#"one "two words" 'three'"#).unwrap(),
            vec!["one", "two words", "three"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
        assert_eq!(
            tokenize("\"unterminated"),
            Err(ArgumentError::Tokenize { raw: "\"unterminated".to_string() })
        );
    }

    #[test]
    fn test_binds_positional_and_named() {
        let bound = bind_arguments("src/main.rs", &declarations()).unwrap();
        assert_eq!(bound.get("$1"), Some("src/main.rs"));
        assert_eq!(bound.get("file"), Some("src/main.rs"));
        assert_eq!(bound.positional(2), Some("strict"));
        assert_eq!(bound.get("mode"), Some("strict"));
        assert_eq!(bound.len(), 4);
    }

    #[test]
    fn test_extra_tokens_are_positional_only() {
        let bound = bind_arguments("a.rs loose extra1 \"extra 2\"", &declarations()).unwrap();
        assert_eq!(bound.get("mode"), Some("loose"));
        assert_eq!(bound.positional(3), Some("extra1"));
        assert_eq!(bound.positional(4), Some("extra 2"));
        assert_eq!(bound.len(), 6);
    }

    #[test]
    fn test_missing_required_argument() {
        let err = bind_arguments("", &declarations()).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::MissingRequired { name: "file".to_string(), position: 1 }
        );
        assert_eq!(err.to_string(), "Missing required argument: file (position 1)");
    }

    #[test]
    fn test_optional_without_default_is_skipped() {
        let decls = vec![CommandArgument::optional("target", None)];
        let bound = bind_arguments("", &decls).unwrap();
        assert!(bound.is_empty());
    }

    #[test]
    fn test_bindings_feed_substitution() {
        let bound = bind_arguments("notes.md", &declarations()).unwrap();
        let table = bound.into_bindings();
        let out = crate::core::substitution::substitute_all("Read $1 ({{mode}})", &table, &table).unwrap();
        assert_eq!(out, "Read notes.md (strict)");
    }
}
