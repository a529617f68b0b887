// src/cli/handlers/args.rs

use crate::cli::handlers::commons;
use crate::core::settings::Settings;
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows how raw invocation text binds to a command's declared arguments."
)]
struct ArgsArgs {
    /// Command file path or stored command name.
    target: String,
    /// Print the binding table as JSON.
    #[arg(long)]
    json: bool,
    /// The raw invocation text, e.g. `utils.py "two words"`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    raw: Vec<String>,
}

/// Re-quotes CLI words so that shell-style tokenization sees them unchanged.
pub fn join_raw(words: &[String]) -> Result<String> {
    shlex::try_join(words.iter().map(String::as_str)).context("Arguments cannot be quoted safely")
}

/// The main handler for the `args` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let args_args = ArgsArgs::try_parse_from(&args)?;
    let command = commons::load_command(&args_args.target, settings)?;
    let raw = join_raw(&args_args.raw)?;
    let bindings = command.parse_arguments(&raw)?;

    if args_args.json {
        println!("{}", serde_json::to_string_pretty(&bindings)?);
        return Ok(());
    }

    println!("\n{} {}", "Usage:".yellow().bold(), command.usage());
    if bindings.is_empty() {
        println!("  (no bindings)");
    }
    for (key, value) in bindings.iter() {
        println!("  {:<12} {}", key.cyan(), value);
    }
    Ok(())
}
