// src/cli/handlers/show.rs

use crate::cli::handlers::commons;
use crate::core::graph_display;
use crate::core::settings::Settings;
use anyhow::Result;
use clap::Parser;
use colored::Colorize;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Prints a command's flowchart as a tree.")]
struct ShowArgs {
    /// Command file path or stored command name.
    target: String,
}

/// The main handler for the `show` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let command = commons::load_command(&show_args.target, settings)?;

    println!("\n--- {} ---", command.usage().yellow());
    if !command.description.is_empty() {
        println!("{}", command.description);
    }
    println!(
        "{} block(s), {} connection(s)\n",
        command.flowchart.block_count(),
        command.flowchart.connections().len()
    );
    graph_display::display_flowchart(&command.flowchart);
    Ok(())
}
