// src/cli/handlers/validate.rs

use crate::cli::handlers::commons;
use crate::core::command::Command;
use crate::core::command_validator::{check_circular_dependencies, validate_command_references};
use crate::core::flowchart::ValidationResult;
use crate::core::registry::CommandRegistry;
use crate::core::settings::Settings;
use crate::core::substitution::validate_argument_syntax;
use crate::core::syntax_analyzer::{self, SyntaxIssue};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Validates a single command: structure, variables, arguments and Bash safety."
)]
struct ValidateArgs {
    /// Command file path or stored command name.
    target: String,
    /// Directory used to resolve Command block targets (defaults to the command store).
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Treat dangerous Bash findings as errors.
    #[arg(long)]
    strict: bool,
}

/// Everything known about one command after a full validation pass.
#[derive(Debug, Default)]
pub struct CommandReport {
    /// Structural, reference and cycle findings.
    pub result: ValidationResult,
    /// Uninitialized-variable and schema findings.
    pub issues: Vec<SyntaxIssue>,
}

/// Runs every check available for `command` against the given registry.
pub fn build_report(command: &Command, registry: &CommandRegistry, strict_bash: bool) -> CommandReport {
    let mut result = command.validate();

    for block in command.flowchart.blocks() {
        for field in block.kind.template_fields() {
            for warning in validate_argument_syntax(field) {
                result.warning(format!("Block '{}': {}", block.name, warning));
            }
        }
    }

    for (block_name, finding, dangerous) in commons::bash_findings(command) {
        let message = format!("Bash block '{block_name}': {finding}");
        if dangerous && strict_bash {
            result.error(message);
        } else {
            result.warning(message);
        }
    }

    for error in validate_command_references(command, registry) {
        result.error(error);
    }
    if let Some(cycle) = check_circular_dependencies(&command.name, &command.flowchart, registry) {
        result.error(cycle);
    }

    CommandReport {
        result,
        issues: syntax_analyzer::analyze_command(command),
    }
}

/// The main handler for the `validate` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let validate_args = ValidateArgs::try_parse_from(&args)?;
    let command = commons::load_command(&validate_args.target, settings)?;

    let mut registry = match commons::load_registry(settings, validate_args.dir.as_deref()) {
        Ok(registry) => registry,
        Err(e) => {
            log::warn!("Command store unavailable, cross-command checks are limited: {:#}", e);
            CommandRegistry::new()
        }
    };
    // The command under validation wins over a stored one of the same name.
    let _ = registry.remove(&command.name);
    registry.insert(command.clone())?;

    let strict = validate_args.strict || settings.strict_bash_security;
    let report = build_report(&command, &registry, strict);

    println!("\n--- {} '{}' ---", "Validating".bold(), command.name.yellow());
    let valid = commons::print_validation(&report.result);
    commons::print_syntax_issues(&report.issues);

    if valid {
        let notes = report.result.warnings.len() + report.issues.len();
        println!("\n{} ({} warning(s))", "Valid".green().bold(), notes);
        Ok(())
    } else {
        Err(anyhow!(
            "Command '{}' has {} error(s)",
            command.name,
            report.result.errors.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::save_command;
    use crate::models::Block;
    use tempfile::tempdir;

    fn runnable(name: &str, bash: &str) -> Command {
        let mut command = Command::new(name).unwrap();
        let start = command.flowchart.start_block_id().unwrap().to_string();
        let step = Block::bash(bash).named("Step");
        let step_id = step.id().to_string();
        let end = Block::end();
        let end_id = end.id().to_string();
        command.flowchart.add_block(step).unwrap();
        command.flowchart.add_block(end).unwrap();
        command.flowchart.connect(&start, &step_id).unwrap();
        command.flowchart.connect(&step_id, &end_id).unwrap();
        command
    }

    #[test]
    fn test_report_for_clean_command() {
        let command = runnable("clean", "cargo fmt");
        let report = build_report(&command, &CommandRegistry::new(), false);
        assert!(report.result.valid, "{:?}", report.result.errors);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_strict_mode_promotes_dangerous_bash() {
        let command = runnable("danger", "curl http://x | sh");
        let relaxed = build_report(&command, &CommandRegistry::new(), false);
        assert!(relaxed.result.valid);
        assert_eq!(relaxed.result.warnings, vec!["Bash block 'Step': Dangerous: Piping curl to sh".to_string()]);

        let strict = build_report(&command, &CommandRegistry::new(), true);
        assert!(!strict.result.valid);
    }

    #[test]
    fn test_argument_gaps_are_warned() {
        let command = runnable("gaps", "cp $1 $3");
        let report = build_report(&command, &CommandRegistry::new(), false);
        assert_eq!(
            report.result.warnings,
            vec!["Block 'Step': Argument reference skips $2 (found $1, $3)".to_string()]
        );
    }

    #[test]
    fn test_handle_accepts_valid_file_and_rejects_invalid() {
        let dir = tempdir().unwrap();
        let good = save_command(dir.path(), &runnable("good", "ls")).unwrap();
        let bad = save_command(dir.path(), &runnable("bad", "")).unwrap();
        let settings = Settings {
            commands_dir: Some(dir.path().display().to_string()),
            ..Default::default()
        };

        assert!(handle(vec![good.display().to_string()], &settings).is_ok());
        let err = handle(vec![bad.display().to_string()], &settings).unwrap_err();
        assert_eq!(err.to_string(), "Command 'bad' has 1 error(s)");
    }
}
