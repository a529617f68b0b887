// src/core/syntax_analyzer.rs

//! # Syntax Analyzer
//!
//! Cross-checks the variables a flowchart produces against the `{{…}}`
//! references its blocks consume. The check is graph-global: a variable
//! defined anywhere counts as defined everywhere, regardless of execution
//! order or reachability.

use crate::core::command::Command;
use crate::core::flowchart::Flowchart;
use crate::core::substitution::{find_variable_references, reference_root};
use crate::models::{Block, BlockKind};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// Severity of an analyzer finding.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Worth a look; does not block saving.
    Warning,
}

/// A finding attached to a specific block.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// Severity.
    pub level: IssueLevel,
    /// Human-readable description.
    pub message: String,
    /// Id of the offending block.
    pub block_id: String,
    /// Name of the offending block.
    pub block_name: String,
}

impl SyntaxIssue {
    fn warning(block: &Block, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            message: message.into(),
            block_id: block.id().to_string(),
            block_name: block.name.clone(),
        }
    }
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.block_name, self.message)
    }
}

/// Analyzes a bare flowchart.
pub fn analyze(flowchart: &Flowchart) -> Vec<SyntaxIssue> {
    analyze_with_known(flowchart, BTreeSet::new())
}

/// Analyzes a command's flowchart; declared argument names count as defined.
pub fn analyze_command(command: &Command) -> Vec<SyntaxIssue> {
    let known = command.arguments.iter().map(|a| a.name.clone()).collect();
    analyze_with_known(&command.flowchart, known)
}

fn analyze_with_known(flowchart: &Flowchart, mut defined: BTreeSet<String>) -> Vec<SyntaxIssue> {
    let mut issues = Vec::new();
    collect_defined_variables(flowchart, &mut defined, &mut issues);

    for block in flowchart.blocks() {
        let undefined: BTreeSet<String> = block
            .kind
            .template_fields()
            .into_iter()
            .flat_map(find_variable_references)
            .filter(|reference| !defined.contains(reference_root(reference)))
            .collect();

        if !undefined.is_empty() {
            let names: Vec<&str> = undefined.iter().map(String::as_str).collect();
            issues.push(SyntaxIssue::warning(
                block,
                format!("Uninitialized variables used: {}", names.join(", ")),
            ));
        }
    }

    log::debug!("Syntax analysis found {} issue(s)", issues.len());
    issues
}

fn collect_defined_variables(
    flowchart: &Flowchart,
    defined: &mut BTreeSet<String>,
    issues: &mut Vec<SyntaxIssue>,
) {
    for block in flowchart.blocks() {
        match &block.kind {
            BlockKind::Variable(cfg) if !cfg.variable_name.is_empty() => {
                defined.insert(cfg.variable_name.clone());
            }
            BlockKind::Bash(cfg) => {
                if let Some(name) = cfg.captured_variable() {
                    defined.insert(name.to_string());
                }
            }
            BlockKind::Prompt(cfg) => {
                if let Some(schema) = cfg.output_schema.as_ref().filter(|s| !is_blank_schema(s)) {
                    match schema_properties(schema) {
                        Ok(names) => defined.extend(names),
                        Err(message) => issues.push(SyntaxIssue::warning(block, message)),
                    }
                }
            }
            _ => {}
        }
    }
}

fn is_blank_schema(schema: &Value) -> bool {
    match schema {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Property names of an object schema, or the warning explaining why none could be read.
fn schema_properties(schema: &Value) -> Result<Vec<String>, &'static str> {
    let Value::Object(map) = schema else {
        return Err("Structured output schema must be a JSON object.");
    };
    match (map.get("type").and_then(Value::as_str), map.get("properties")) {
        (Some("object"), Some(Value::Object(properties))) => Ok(properties.keys().cloned().collect()),
        _ => Err("Structured output schema should define type \"object\" with properties."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BashConfig, PromptConfig, VariableType};
    use crate::models::CommandArgument;
    use serde_json::json;

    fn chain(blocks: Vec<Block>) -> Flowchart {
        let mut fc = Flowchart::new();
        let mut previous = fc.start_block_id().unwrap().to_string();
        for block in blocks {
            let id = block.id().to_string();
            fc.add_block(block).unwrap();
            fc.connect(&previous, &id).unwrap();
            previous = id;
        }
        fc
    }

    fn schema_prompt(schema: Value) -> Block {
        Block::new(BlockKind::Prompt(PromptConfig {
            prompt: "Classify".to_string(),
            output_schema: Some(schema),
            sound_effect: None,
        }))
        .named("Classify")
    }

    #[test]
    fn test_defined_variables_produce_no_issues() {
        let bash = Block::new(BlockKind::Bash(BashConfig {
            command: "git status".to_string(),
            output_variable: "status".to_string(),
            ..Default::default()
        }));
        let fc = chain(vec![
            Block::variable("count", "3", VariableType::Int),
            bash,
            schema_prompt(json!({"type": "object", "properties": {"verdict": {"type": "string"}}})),
            Block::prompt("{{count}} {{status}} {{verdict}}"),
        ]);
        assert!(analyze(&fc).is_empty());
    }

    #[test]
    fn test_uninitialized_variables_are_sorted() {
        let fc = chain(vec![Block::prompt("{{zeta}} and {{alpha}} and {{zeta}}").named("Ask")]);
        let issues = analyze(&fc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].block_name, "Ask");
        assert_eq!(issues[0].message, "Uninitialized variables used: alpha, zeta");
    }

    #[test]
    fn test_uncaptured_bash_output_is_not_defined() {
        let bash = Block::new(BlockKind::Bash(BashConfig {
            command: "date".to_string(),
            capture_output: false,
            output_variable: "today".to_string(),
            ..Default::default()
        }));
        let fc = chain(vec![bash, Block::branch("{{today}}").named("Check")]);
        let issues = analyze(&fc);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Uninitialized variables used: today");
    }

    #[test]
    fn test_nested_reference_uses_root_variable() {
        let fc = chain(vec![
            schema_prompt(json!({"type": "object", "properties": {"user": {}}})),
            Block::prompt("Hello {{user.name}} {{user.tags[0]}}"),
        ]);
        assert!(analyze(&fc).is_empty());
    }

    #[test]
    fn test_malformed_schemas_are_warned() {
        let fc = chain(vec![
            schema_prompt(json!(["not", "an", "object"])),
            schema_prompt(json!({"type": "array"})),
        ]);
        let messages: Vec<String> = analyze(&fc).into_iter().map(|i| i.message).collect();
        assert_eq!(
            messages,
            vec![
                "Structured output schema must be a JSON object.".to_string(),
                "Structured output schema should define type \"object\" with properties.".to_string(),
            ]
        );
    }

    #[test]
    fn test_definition_order_is_ignored() {
        let fc = chain(vec![
            Block::prompt("{{late}}"),
            Block::variable("late", "x", VariableType::String),
        ]);
        assert!(analyze(&fc).is_empty());
    }

    #[test]
    fn test_command_arguments_count_as_defined() {
        let mut command = Command::new("greet")
            .unwrap()
            .with_arguments(vec![CommandArgument::required("who")]);
        let start = command.flowchart.start_block_id().unwrap().to_string();
        let prompt = Block::prompt("Say hi to {{who}}");
        let prompt_id = prompt.id().to_string();
        command.flowchart.add_block(prompt).unwrap();
        command.flowchart.connect(&start, &prompt_id).unwrap();

        assert!(analyze_command(&command).is_empty());
        assert_eq!(analyze(&command.flowchart).len(), 1);
    }
}
