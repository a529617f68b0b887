//! Graph-structured commands for AI coding-assistant sessions.
//!
//! A [`core::command::Command`] owns a [`core::flowchart::Flowchart`] of typed
//! blocks. This crate validates those graphs, binds invocation arguments,
//! substitutes `$N` and `{{path}}` placeholders and detects invocation cycles
//! between commands. Running the blocks is left to an external controller.

/// Command-line front end.
pub mod cli;
/// Shared names and defaults.
pub mod constants;
/// Graph logic, substitution, validation and storage.
pub mod core;
/// Serializable blocks, connections and argument declarations.
pub mod models;
