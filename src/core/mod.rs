// src/core/mod.rs

/// Binding raw argument text to declarations.
pub mod arg_parser;
/// Pattern checks for risky shell commands.
pub mod bash_security;
/// The `Command` type.
pub mod command;
/// Cross-command cycle and reference checks.
pub mod command_validator;
/// Binding table for a running command.
pub mod execution;
/// The workflow graph and its structural validation.
pub mod flowchart;
/// ASCII tree rendering.
pub mod graph_display;
/// Config directory resolution.
pub mod paths;
/// The on-disk command store.
pub mod registry;
/// `config.toml` handling.
pub mod settings;
/// `$N` and `{{path}}` expansion.
pub mod substitution;
/// Variable-use and schema checks.
pub mod syntax_analyzer;
