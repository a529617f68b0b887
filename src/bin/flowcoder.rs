// src/bin/flowcoder.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use flowcoder::{
    cli::{Cli, dispatcher},
    core::settings::Settings,
};

/// The main entry point of the `flowcoder` application.
/// Sets up logging, loads settings, dispatches to the action handler and
/// performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);
    let settings = Settings::load()?;
    dispatcher::dispatch(cli.args, &settings)
}
