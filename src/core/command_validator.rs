// src/core/command_validator.rs

//! Cross-command checks: invocation cycles and unresolved Command block targets.

use crate::core::command::Command;
use crate::core::flowchart::Flowchart;
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Anything that can look a command up by name.
pub trait CommandSource {
    /// The command registered under `name`, if any.
    fn find_command(&self, name: &str) -> Option<&Command>;
}

impl CommandSource for HashMap<String, Command> {
    fn find_command(&self, name: &str) -> Option<&Command> {
        self.get(name)
    }
}

impl CommandSource for IndexMap<String, Command> {
    fn find_command(&self, name: &str) -> Option<&Command> {
        self.get(name)
    }
}

/// Returns a description of the first invocation cycle reachable from `command_name`.
///
/// The chain is built outermost first, e.g.
/// `A -> B -> C -> Circular dependency detected: A calls itself`.
/// Targets missing from `all_commands` are skipped; see [`validate_command_references`].
pub fn check_circular_dependencies<S>(
    command_name: &str,
    flowchart: &Flowchart,
    all_commands: &S,
) -> Option<String>
where
    S: CommandSource + ?Sized,
{
    visit(command_name, flowchart, all_commands, HashSet::new())
}

fn visit<S>(
    command_name: &str,
    flowchart: &Flowchart,
    all_commands: &S,
    mut visiting: HashSet<String>,
) -> Option<String>
where
    S: CommandSource + ?Sized,
{
    if visiting.contains(command_name) {
        return Some(format!(
            "Circular dependency detected: {command_name} calls itself"
        ));
    }
    visiting.insert(command_name.to_string());

    for (_, call) in flowchart.command_calls() {
        let target_name = call.target_name();
        let Some(target) = all_commands.find_command(target_name) else {
            continue;
        };
        // Each branch gets its own copy so siblings never see each other's path.
        if let Some(error) = visit(target_name, &target.flowchart, all_commands, visiting.clone()) {
            return Some(format!("{command_name} -> {error}"));
        }
    }

    None
}

/// Errors for every Command block whose target is not registered.
pub fn validate_command_references<S>(command: &Command, all_commands: &S) -> Vec<String>
where
    S: CommandSource + ?Sized,
{
    command
        .flowchart
        .command_calls()
        .filter(|(_, call)| {
            !call.target_name().is_empty() && all_commands.find_command(call.target_name()).is_none()
        })
        .map(|(block, call)| {
            format!(
                "Command block '{}' calls unknown command '{}'",
                block.name,
                call.target_name()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Block;

    /// A command whose flowchart calls each of `targets` in sequence.
    fn calling(name: &str, targets: &[&str]) -> Command {
        let mut command = Command::new(name).unwrap();
        let mut previous = command.flowchart.start_block_id().unwrap().to_string();
        for target in targets {
            let block = Block::command_call(*target, "");
            let id = block.id().to_string();
            command.flowchart.add_block(block).unwrap();
            command.flowchart.connect(&previous, &id).unwrap();
            previous = id;
        }
        command
    }

    fn registry(commands: Vec<Command>) -> HashMap<String, Command> {
        commands.into_iter().map(|c| (c.name.clone(), c)).collect()
    }

    fn check(name: &str, all: &HashMap<String, Command>) -> Option<String> {
        check_circular_dependencies(name, &all[name].flowchart, all)
    }

    #[test]
    fn test_direct_self_call() {
        let all = registry(vec![calling("A", &["A"])]);
        let error = check("A", &all).unwrap();
        assert!(error.ends_with("Circular dependency detected: A calls itself"));
    }

    #[test]
    fn test_indirect_cycle_reports_chain() {
        let all = registry(vec![
            calling("A", &["B"]),
            calling("B", &["C"]),
            calling("C", &["A"]),
        ]);
        assert_eq!(
            check("A", &all).as_deref(),
            Some("A -> B -> C -> Circular dependency detected: A calls itself")
        );
    }

    #[test]
    fn test_shared_sibling_target_is_not_a_cycle() {
        let all = registry(vec![
            calling("A", &["B", "C"]),
            calling("B", &["D"]),
            calling("C", &["D"]),
            calling("D", &[]),
        ]);
        assert_eq!(check("A", &all), None);
    }

    #[test]
    fn test_unknown_targets_are_skipped_here_but_reported_elsewhere() {
        let all = registry(vec![calling("A", &["/ghost"])]);
        assert_eq!(check("A", &all), None);
        assert_eq!(
            validate_command_references(&all["A"], &all),
            vec!["Command block 'Command Block' calls unknown command 'ghost'".to_string()]
        );
    }

    #[test]
    fn test_leading_slash_resolves_target() {
        let all = registry(vec![calling("A", &["/B"]), calling("B", &["A"])]);
        assert_eq!(
            check("A", &all).as_deref(),
            Some("A -> B -> Circular dependency detected: A calls itself")
        );
        assert!(validate_command_references(&all["A"], &all).is_empty());
    }
}
