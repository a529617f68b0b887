// src/cli/handlers/mod.rs

/// `args` action.
pub mod args;
/// `check` action.
pub mod check;
/// Helpers shared by the handlers.
pub mod commons;
/// `list` action.
pub mod list;
/// `render` action.
pub mod render;
/// `show` action.
pub mod show;
/// `validate` action.
pub mod validate;
