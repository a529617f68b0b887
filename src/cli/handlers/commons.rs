// src/cli/handlers/commons.rs

// Shared helpers used by several handlers.

use crate::core::bash_security;
use crate::core::command::Command;
use crate::core::flowchart::ValidationResult;
use crate::core::registry::{self, CommandRegistry};
use crate::core::settings::Settings;
use crate::core::syntax_analyzer::SyntaxIssue;
use crate::models::BlockKind;
use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Loads the registry from `dir_override` or the configured command store.
pub fn load_registry(settings: &Settings, dir_override: Option<&Path>) -> Result<CommandRegistry> {
    let dir: PathBuf = match dir_override {
        Some(dir) => dir.to_path_buf(),
        None => settings.commands_dir()?,
    };
    CommandRegistry::load_from_dir(&dir)
        .with_context(|| format!("Failed to load commands from '{}'", dir.display()))
}

/// Resolves `target` as a command file path first, then as a stored command name.
pub fn load_command(target: &str, settings: &Settings) -> Result<Command> {
    let path = Path::new(target);
    if path.is_file() {
        return registry::load_command_file(path)
            .with_context(|| format!("Failed to load command file '{}'", path.display()));
    }

    let name = target.trim_start_matches('/');
    let registry = load_registry(settings, None)?;
    registry
        .get(name)
        .cloned()
        .ok_or_else(|| anyhow!("'{}' is neither a command file nor a stored command", target))
}

/// Security findings of every Bash block, as `(block name, finding, dangerous)`.
pub fn bash_findings(command: &Command) -> Vec<(String, String, bool)> {
    let mut findings = Vec::new();
    for block in command.flowchart.blocks() {
        if let BlockKind::Bash(cfg) = &block.kind {
            let report = bash_security::validate_command(&cfg.command);
            for finding in report.findings {
                let dangerous = finding.starts_with("Dangerous:");
                findings.push((block.name.clone(), finding, dangerous));
            }
        }
    }
    findings
}

/// Prints a validation result as a colored list. Returns `true` when it is valid.
pub fn print_validation(result: &ValidationResult) -> bool {
    for error in &result.errors {
        println!("  {} {}", "error:".red().bold(), error);
    }
    for warning in &result.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
    result.valid
}

/// Prints analyzer findings, one per line.
pub fn print_syntax_issues(issues: &[SyntaxIssue]) {
    for issue in issues {
        println!(
            "  {} [{}] {}",
            "warning:".yellow(),
            issue.block_name.cyan(),
            issue.message
        );
    }
}
