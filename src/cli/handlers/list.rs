// src/cli/handlers/list.rs

use crate::cli::handlers::commons;
use crate::core::settings::Settings;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists stored commands with their usage.")]
struct ListArgs {
    /// Command directory to list instead of the configured store.
    #[arg(long)]
    dir: Option<PathBuf>,
}

/// The main handler for the `list` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let registry = commons::load_registry(settings, list_args.dir.as_deref())?;

    if registry.is_empty() {
        println!("\nNo commands found.");
        return Ok(());
    }

    println!("\n{}", "Commands:".yellow().bold());
    for name in registry.names() {
        let Some(command) = registry.get(name) else {
            continue;
        };
        println!("  {}", command.usage().cyan());
        if !command.description.is_empty() {
            println!("      {}", command.description.dimmed());
        }
    }
    Ok(())
}
