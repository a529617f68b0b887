// src/cli/dispatcher.rs

use crate::cli::handlers;
use crate::core::settings::Settings;
use anyhow::{Result, anyhow};
use colored::Colorize;

/// Defines an action, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    summary: &'static str,
    handler: fn(Vec<String>, &Settings) -> Result<()>,
}

/// The single source of truth for all actions.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "validate",
        aliases: &["lint"],
        summary: "Structural, syntax and security report for one command",
        handler: handlers::validate::handle,
    },
    CommandDefinition {
        name: "check",
        aliases: &[],
        summary: "Validate every stored command, including invocation cycles",
        handler: handlers::check::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        summary: "List stored commands",
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "show",
        aliases: &["tree"],
        summary: "Print a command's flowchart as a tree",
        handler: handlers::show::handle,
    },
    CommandDefinition {
        name: "args",
        aliases: &[],
        summary: "Show how raw arguments bind to a command's declarations",
        handler: handlers::args::handle,
    },
    CommandDefinition {
        name: "render",
        aliases: &[],
        summary: "Substitute arguments and variables into a template",
        handler: handlers::render::handle,
    },
];

/// Finds an action definition by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn print_actions() {
    println!("\n{}", "Available actions:".yellow().bold());
    for cmd in COMMAND_REGISTRY {
        println!("  {:<10} {}", cmd.name.cyan(), cmd.summary);
    }
}

/// Routes `all_args` (action first) to the matching handler.
pub fn dispatch(all_args: Vec<String>, settings: &Settings) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    let mut args = all_args.into_iter();
    let Some(action) = args.next() else {
        print_actions();
        return Ok(());
    };

    match find_command(&action) {
        Some(command) => (command.handler)(args.collect(), settings),
        None => {
            print_actions();
            Err(anyhow!("Unknown action '{}'", action))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_and_alias() {
        assert_eq!(find_command("validate").unwrap().name, "validate");
        assert_eq!(find_command("ls").unwrap().name, "list");
        assert!(find_command("run").is_none());
    }

    #[test]
    fn test_unknown_action_is_an_error() {
        let err = dispatch(vec!["explode".to_string()], &Settings::default()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action 'explode'");
    }
}
