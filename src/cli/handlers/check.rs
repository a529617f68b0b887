// src/cli/handlers/check.rs

use crate::cli::handlers::{commons, validate};
use crate::core::settings::Settings;
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Validates every stored command, including invocation cycles and unknown targets."
)]
struct CheckArgs {
    /// Command directory to check instead of the configured store.
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Also print warnings for commands without errors.
    #[arg(long, short)]
    verbose: bool,
}

/// The main handler for the `check` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let check_args = CheckArgs::try_parse_from(&args)?;
    let registry = commons::load_registry(settings, check_args.dir.as_deref())?;

    if registry.is_empty() {
        println!("\nNo commands found.");
        return Ok(());
    }

    let mut failed = Vec::new();
    for name in registry.names() {
        let Some(command) = registry.get(name) else {
            continue;
        };
        let report = validate::build_report(command, &registry, settings.strict_bash_security);

        if report.result.valid {
            let notes = report.result.warnings.len() + report.issues.len();
            println!("{} {} ({} warning(s))", "✓".green(), name, notes);
            if check_args.verbose {
                commons::print_validation(&report.result);
                commons::print_syntax_issues(&report.issues);
            }
        } else {
            println!("{} {}", "✗".red(), name.bold());
            commons::print_validation(&report.result);
            commons::print_syntax_issues(&report.issues);
            failed.push(name.to_string());
        }
    }

    println!(
        "\nChecked {} command(s), {} with errors.",
        registry.len(),
        failed.len()
    );
    if failed.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Invalid commands: {}", failed.join(", ")))
    }
}
