// src/cli/mod.rs

use clap::Parser;

/// Action registry and dispatch.
pub mod dispatcher;
/// One module per action.
pub mod handlers;

/// flowcoder: validate, inspect and render graph-structured assistant commands.
///
/// Actions:
///   validate <file|name>            Structural, syntax and security report
///   check [--dir <path>]            Validate every stored command, including cycles
///   list                            List stored commands and their usage
///   show <file|name>                Print the flowchart as a tree
///   args <file|name> [raw...]       Show how raw arguments bind
///   render <file|name> --text <t>   Substitute arguments and variables into a template
#[derive(Parser, Debug)]
#[command(author, version, about, verbatim_doc_comment)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action followed by its own arguments.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
