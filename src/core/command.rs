// src/core/command.rs

use crate::core::arg_parser::{self, ArgumentBindings, ArgumentError};
use crate::core::flowchart::{Flowchart, ValidationResult};
use crate::models::{CommandArgument, CommandMetadata, is_slug, new_id};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while creating a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The name was blank.
    #[error("Command name cannot be empty")]
    EmptyName,
}

/// A named, reusable workflow: a flowchart plus its declared arguments.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawCommand")]
pub struct Command {
    id: String,
    /// Invocation name, e.g. `review` for `/review`.
    pub name: String,
    /// One-line summary shown in listings.
    pub description: String,
    /// The workflow run for each invocation.
    pub flowchart: Flowchart,
    /// Timestamps, version and tags.
    pub metadata: CommandMetadata,
    /// Declared positional arguments, in order.
    pub arguments: Vec<CommandArgument>,
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    flowchart: Option<Flowchart>,
    #[serde(default)]
    metadata: CommandMetadata,
    #[serde(default)]
    arguments: Vec<CommandArgument>,
}

impl TryFrom<RawCommand> for Command {
    type Error = CommandError;

    fn try_from(raw: RawCommand) -> Result<Self, Self::Error> {
        let mut command = Self::new(raw.name)?;
        if !raw.id.is_empty() {
            command.id = raw.id;
        }
        command.description = raw.description;
        if let Some(flowchart) = raw.flowchart {
            command.flowchart = flowchart;
        }
        command.metadata = raw.metadata;
        command.arguments = raw.arguments;
        Ok(command)
    }
}

impl Command {
    /// Creates a command with a fresh flowchart (holding only a Start block).
    pub fn new(name: impl Into<String>) -> Result<Self, CommandError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CommandError::EmptyName);
        }
        Ok(Self {
            id: new_id(),
            name,
            description: String::new(),
            flowchart: Flowchart::new(),
            metadata: CommandMetadata::default(),
            arguments: Vec::new(),
        })
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style argument declarations.
    pub fn with_arguments(mut self, arguments: Vec<CommandArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Stable identifier, generated when missing on load.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Marks the command as modified now.
    pub fn touch(&mut self) {
        self.metadata.modified = Utc::now();
    }

    /// An independent copy of the flowchart for a single run.
    pub fn create_execution_copy(&self) -> Flowchart {
        self.flowchart.clone()
    }

    /// Binds raw invocation text to the declared arguments.
    pub fn parse_arguments(&self, raw: &str) -> Result<ArgumentBindings, ArgumentError> {
        arg_parser::bind_arguments(raw, &self.arguments)
    }

    /// Usage line such as `/review <file> [mode=strict]`.
    pub fn usage(&self) -> String {
        let mut usage = format!("/{}", self.name);
        for argument in &self.arguments {
            usage.push(' ');
            usage.push_str(&argument.to_string());
        }
        usage
    }

    /// Flowchart validation plus checks on the command name and argument declarations.
    pub fn validate(&self) -> ValidationResult {
        let mut result = self.flowchart.validate();

        if self.name.trim().is_empty() {
            result.error("Command name cannot be empty");
        }
        if !is_slug(&self.name) {
            result.warning(
                "Command name should only contain letters, numbers, hyphens, and underscores",
            );
        }
        if self.name.contains(' ') {
            result.error("Command name cannot contain spaces (use hyphens or underscores)");
        }

        for argument in &self.arguments {
            for err in argument.validate() {
                result.error(format!("Argument '{}': {}", argument.name, err));
            }
        }

        result
    }
}
