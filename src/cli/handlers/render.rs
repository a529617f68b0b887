// src/cli/handlers/render.rs

use crate::cli::handlers::commons;
use crate::core::execution::ExecutionContext;
use crate::core::settings::Settings;
use crate::core::substitution::escape_dollar_signs;
use crate::models::VariableType;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::Value;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Substitutes a command's arguments and extra variables into a template."
)]
struct RenderArgs {
    /// Command file path or stored command name (its argument declarations are used).
    target: String,
    /// The template text, e.g. `Review $1 for {{focus}}`.
    #[arg(long)]
    text: String,
    /// Raw invocation text bound to the command's arguments.
    #[arg(long, default_value = "")]
    args: String,
    /// Extra variables as a JSON object, e.g. `{"focus": "safety"}`.
    #[arg(long)]
    vars: Option<String>,
    /// Convert the result to a typed value (string, int, float, boolean) and print it as JSON.
    #[arg(long = "as")]
    as_type: Option<String>,
    /// Keep `$$` as written instead of turning it into `$`.
    #[arg(long)]
    keep_escapes: bool,
}

/// Substitutes `text` against the context, then unescapes `$$` unless asked not to.
fn render(context: &ExecutionContext, text: &str, keep_escapes: bool) -> Result<String> {
    let rendered = context.substitute(text)?;
    Ok(if keep_escapes {
        rendered
    } else {
        escape_dollar_signs(&rendered)
    })
}

fn parse_vars(raw: &str) -> Result<serde_json::Map<String, Value>> {
    match serde_json::from_str(raw).context("--vars must be valid JSON")? {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow!("--vars must be a JSON object")),
    }
}

/// The main handler for the `render` action.
pub fn handle(args: Vec<String>, settings: &Settings) -> Result<()> {
    let render_args = RenderArgs::try_parse_from(&args)?;
    let command = commons::load_command(&render_args.target, settings)?;

    let bindings = command.parse_arguments(&render_args.args)?;
    let mut context = ExecutionContext::new(command.name.clone(), bindings)
        .with_max_depth(settings.max_recursion_depth);
    if let Some(raw) = &render_args.vars {
        for (key, value) in parse_vars(raw)? {
            context.set_variable(key, value);
        }
    }

    let rendered = render(&context, &render_args.text, render_args.keep_escapes)?;
    match &render_args.as_type {
        Some(kind) => {
            let kind: VariableType = kind.parse()?;
            println!("{}", kind.coerce(&rendered)?);
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
