// src/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Generates a fresh identifier for blocks, connections and commands.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Returns `true` when `name` is alphanumeric once underscores are ignored.
/// A name made only of underscores is rejected.
pub fn is_identifier(name: &str) -> bool {
    let mut significant = name.chars().filter(|c| *c != '_').peekable();
    significant.peek().is_some() && significant.all(char::is_alphanumeric)
}

/// Returns `true` when `name` only uses letters, digits, hyphens and underscores.
pub fn is_slug(name: &str) -> bool {
    let mut significant = name.chars().filter(|c| *c != '_' && *c != '-').peekable();
    significant.peek().is_some() && significant.all(char::is_alphanumeric)
}

// --- CANVAS MODELS ---

/// Position of a block on the editor canvas. Display-only.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    /// Horizontal canvas coordinate.
    pub x: f64,
    /// Vertical canvas coordinate.
    pub y: f64,
}

impl Position {
    /// Builds a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One of the four attachment points of a block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Port {
    /// Top edge.
    Top,
    /// Left edge.
    Left,
    /// Bottom edge.
    Bottom,
    /// Right edge.
    Right,
}

impl Port {
    /// Parses a port name, falling back to `default` for anything unrecognised.
    pub fn parse_or(value: &str, default: Self) -> Self {
        match value {
            "top" => Self::Top,
            "left" => Self::Left,
            "bottom" => Self::Bottom,
            "right" => Self::Right,
            other => {
                log::debug!("Unknown port '{}', using '{}'.", other, default);
                default
            }
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Bottom => "bottom",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

// --- SCALAR TYPES ---

/// Failure to coerce text into one of the scalar variable kinds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// The text is not a number of the requested kind.
    #[error("Cannot convert '{value}' to {target}")]
    Invalid { value: String, target: VariableType },
    /// The text is not a recognised truth value.
    #[error("Cannot convert '{0}' to boolean. Use: true/false, 1/0, yes/no")]
    Boolean(String),
    /// The type name is not one of the four kinds.
    #[error("Unknown variable type: '{0}'")]
    UnknownType(String),
}

/// The scalar kinds a Variable block or a captured Bash output can take.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    /// Raw text.
    #[default]
    String,
    /// 64-bit signed integer.
    Int,
    /// 64-bit float.
    Float,
    /// `true` or `false`.
    Boolean,
}

impl VariableType {
    /// Serialized name, e.g. `int`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }

    /// Converts substituted text into a typed JSON value.
    ///
    /// Booleans accept `true/1/yes/y` and `false/0/no/n` (case-insensitive);
    /// blank text is `false`.
    pub fn coerce(&self, text: &str) -> Result<Value, ConversionError> {
        let invalid = || ConversionError::Invalid {
            value: text.to_string(),
            target: *self,
        };
        match self {
            Self::String => Ok(Value::String(text.to_string())),
            Self::Int => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| invalid()),
            Self::Float => {
                let parsed = text.trim().parse::<f64>().map_err(|_| invalid())?;
                serde_json::Number::from_f64(parsed)
                    .map(Value::Number)
                    .ok_or_else(invalid)
            }
            Self::Boolean => match text.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "y" => Ok(Value::Bool(true)),
                "false" | "0" | "no" | "n" | "" => Ok(Value::Bool(false)),
                _ => Err(ConversionError::Boolean(text.to_string())),
            },
        }
    }
}

impl FromStr for VariableType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "boolean" => Ok(Self::Boolean),
            other => Err(ConversionError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a variable type, treating unknown names as `string`.
fn lenient_variable_type<'de, D>(deserializer: D) -> Result<VariableType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(match raw {
        Some(name) => name.parse().unwrap_or_else(|_| {
            log::warn!("Unknown variable_type '{}', treating it as string.", name);
            VariableType::String
        }),
        None => VariableType::String,
    })
}

// --- BLOCK MODELS ---

/// The discriminator carried by every serialized block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Entry point.
    Start,
    /// Sends text to the assistant.
    Prompt,
    /// Picks the True or False path.
    Branch,
    /// Terminates the run.
    End,
    /// Sets a variable.
    Variable,
    /// Runs a shell command.
    Bash,
    /// Calls another command.
    Command,
    /// Asks the controller to refresh the assistant session.
    Refresh,
}

impl BlockType {
    /// Serialized name, e.g. `prompt`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Prompt => "prompt",
            Self::Branch => "branch",
            Self::End => "end",
            Self::Variable => "variable",
            Self::Bash => "bash",
            Self::Command => "command",
            Self::Refresh => "refresh",
        }
    }

    /// Human label used in validation messages, e.g. `Prompt`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Prompt => "Prompt",
            Self::Branch => "Branch",
            Self::End => "End",
            Self::Variable => "Variable",
            Self::Bash => "Bash",
            Self::Command => "Command",
            Self::Refresh => "Refresh",
        }
    }

    /// Name given to a block whose name was left blank.
    pub fn default_name(&self) -> String {
        format!("{} Block", self.label())
    }

    /// Where a freshly created block of this type lands on the canvas.
    pub fn default_position(&self) -> Position {
        match self {
            Self::Start => Position::new(100.0, 50.0),
            Self::Prompt => Position::new(100.0, 150.0),
            Self::End => Position::new(100.0, 350.0),
            _ => Position::new(100.0, 250.0),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sends a prompt to the assistant, optionally asking for structured output.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct PromptConfig {
    /// Text sent to the assistant; may hold `$N` and `{{var}}` placeholders.
    pub prompt: String,
    /// JSON-schema-like object describing the structured output.
    pub output_schema: Option<Value>,
    /// Optional sound played when the block finishes.
    pub sound_effect: Option<String>,
}

/// Routes execution to the true or false path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct BranchConfig {
    /// Expression evaluated to pick the True or False path.
    pub condition: String,
}

/// Assigns a typed value to a named variable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct VariableConfig {
    /// Variable to set.
    pub variable_name: String,
    /// Value template, substituted then coerced.
    pub variable_value: String,
    /// Kind the substituted value is coerced to.
    #[serde(deserialize_with = "lenient_variable_type")]
    pub variable_type: VariableType,
}

impl VariableConfig {
    /// Field errors, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.variable_name.is_empty() {
            errors.push("Variable name is required".to_string());
        } else if !is_identifier(&self.variable_name) {
            errors.push("Variable name must be alphanumeric (underscores allowed)".to_string());
        }
        errors
    }
}

/// Runs a shell command, optionally capturing its output into variables.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BashConfig {
    /// Shell command template.
    pub command: String,
    /// Store stdout in `output_variable`.
    pub capture_output: bool,
    /// Variable receiving stdout.
    pub output_variable: String,
    /// Kept as text so that an unknown kind can be reported by validation.
    pub output_type: String,
    /// Directory the command runs in; blank means the session directory.
    pub working_directory: String,
    /// Keep going when the command exits non-zero.
    pub continue_on_error: bool,
    /// Variable receiving the exit code.
    pub exit_code_variable: String,
}

impl Default for BashConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            capture_output: true,
            output_variable: String::new(),
            output_type: VariableType::String.as_str().to_string(),
            working_directory: String::new(),
            continue_on_error: false,
            exit_code_variable: String::new(),
        }
    }
}

impl BashConfig {
    /// The parsed output kind, or `None` if `output_type` is not one of the four scalars.
    pub fn output_kind(&self) -> Option<VariableType> {
        self.output_type.parse().ok()
    }

    /// The variable that receives stdout, when output capture is on.
    pub fn captured_variable(&self) -> Option<&str> {
        let name = self.output_variable.trim();
        (self.capture_output && !name.is_empty()).then_some(name)
    }

    /// Field errors, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.command.trim().is_empty() {
            errors.push("Bash command is required".to_string());
        }
        if !self.output_variable.is_empty() && !is_identifier(&self.output_variable) {
            errors.push(
                "Output variable name must be alphanumeric (underscores allowed)".to_string(),
            );
        }
        if !self.exit_code_variable.is_empty() && !is_identifier(&self.exit_code_variable) {
            errors.push(
                "Exit code variable name must be alphanumeric (underscores allowed)".to_string(),
            );
        }
        if self.output_kind().is_none() {
            errors.push(format!("Invalid output type: {}", self.output_type));
        }

        errors
    }
}

/// Invokes another registered command by name.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CommandCallConfig {
    /// Name of the command to call.
    pub command_name: String,
    /// Raw argument text, substituted before being parsed by the callee.
    pub arguments: String,
    /// The callee sees the caller's variables.
    pub inherit_variables: bool,
    /// The callee's outputs are copied back into the caller.
    pub merge_output: bool,
}

impl CommandCallConfig {
    /// The callee name as it is registered (a leading `/` is tolerated).
    pub fn target_name(&self) -> &str {
        self.command_name.trim().trim_start_matches('/')
    }

    /// Field errors, empty when the configuration is usable.
    pub fn validate(&self) -> Vec<String> {
        if self.target_name().is_empty() {
            vec!["Command name is required".to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Per-type configuration of a block. The `type` tag routes (de)serialization.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    /// Entry point.
    Start,
    /// Sends text to the assistant.
    Prompt(PromptConfig),
    /// Picks the True or False path.
    Branch(BranchConfig),
    /// Terminates the run.
    End,
    /// Sets a variable.
    Variable(VariableConfig),
    /// Runs a shell command.
    Bash(BashConfig),
    /// Calls another command.
    Command(CommandCallConfig),
    /// Asks the controller to refresh the assistant session.
    Refresh,
}

impl BlockKind {
    /// The discriminator of this variant.
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Start => BlockType::Start,
            Self::Prompt(_) => BlockType::Prompt,
            Self::Branch(_) => BlockType::Branch,
            Self::End => BlockType::End,
            Self::Variable(_) => BlockType::Variable,
            Self::Bash(_) => BlockType::Bash,
            Self::Command(_) => BlockType::Command,
            Self::Refresh => BlockType::Refresh,
        }
    }

    /// The template strings of this block that may reference `{{variables}}`.
    pub fn template_fields(&self) -> Vec<&str> {
        match self {
            Self::Prompt(cfg) => vec![cfg.prompt.as_str()],
            Self::Variable(cfg) => vec![cfg.variable_value.as_str()],
            Self::Bash(cfg) => vec![cfg.command.as_str()],
            Self::Branch(cfg) => vec![cfg.condition.as_str()],
            Self::Command(cfg) => vec![cfg.arguments.as_str()],
            Self::Start | Self::End | Self::Refresh => Vec::new(),
        }
    }
}

/// A node of the workflow graph.
///
/// The id is fixed at construction; name, position and configuration stay mutable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "RawBlock")]
pub struct Block {
    id: String,
    /// Display name used in messages.
    pub name: String,
    /// Canvas position.
    pub position: Position,
    /// Type and type-specific configuration.
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// Wire shape of a block, normalised into `Block` on load.
#[derive(Deserialize)]
struct RawBlock {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    position: Option<Position>,
    #[serde(flatten)]
    kind: BlockKind,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        let position = raw
            .position
            .unwrap_or_else(|| raw.kind.block_type().default_position());
        Self::with_id(raw.id, raw.name, position, raw.kind)
    }
}

impl Block {
    /// Creates a block with a generated id, default name and default position.
    pub fn new(kind: BlockKind) -> Self {
        let position = kind.block_type().default_position();
        Self::with_id(String::new(), String::new(), position, kind)
    }

    /// Creates a block with explicit identity. A blank id or name is replaced
    /// by a generated id or the type's default name.
    pub fn with_id(id: String, name: String, position: Position, kind: BlockKind) -> Self {
        let id = if id.is_empty() { new_id() } else { id };
        let name = if name.trim().is_empty() {
            kind.block_type().default_name()
        } else {
            name
        };
        Self {
            id,
            name,
            position,
            kind,
        }
    }

    /// A Start block.
    pub fn start() -> Self {
        Self::new(BlockKind::Start)
    }

    /// An End block.
    pub fn end() -> Self {
        Self::new(BlockKind::End)
    }

    /// A Refresh block.
    pub fn refresh() -> Self {
        Self::new(BlockKind::Refresh)
    }

    /// A Prompt block with the given text.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self::new(BlockKind::Prompt(PromptConfig {
            prompt: prompt.into(),
            ..Default::default()
        }))
    }

    /// A Branch block with the given condition.
    pub fn branch(condition: impl Into<String>) -> Self {
        Self::new(BlockKind::Branch(BranchConfig {
            condition: condition.into(),
        }))
    }

    /// A Variable block.
    pub fn variable(
        name: impl Into<String>,
        value: impl Into<String>,
        variable_type: VariableType,
    ) -> Self {
        Self::new(BlockKind::Variable(VariableConfig {
            variable_name: name.into(),
            variable_value: value.into(),
            variable_type,
        }))
    }

    /// A Bash block capturing output as a string.
    pub fn bash(command: impl Into<String>) -> Self {
        Self::new(BlockKind::Bash(BashConfig {
            command: command.into(),
            ..Default::default()
        }))
    }

    /// A Command block calling `command_name` with raw argument text.
    pub fn command_call(command_name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self::new(BlockKind::Command(CommandCallConfig {
            command_name: command_name.into(),
            arguments: arguments.into(),
            ..Default::default()
        }))
    }

    /// Builder-style rename.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.name = name;
        }
        self
    }

    /// Builder-style move.
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type of this block.
    pub fn block_type(&self) -> BlockType {
        self.kind.block_type()
    }

    /// Per-type configuration checks. Types without rules always pass.
    pub fn validate(&self) -> Vec<String> {
        match &self.kind {
            BlockKind::Variable(cfg) => cfg.validate(),
            BlockKind::Bash(cfg) => cfg.validate(),
            BlockKind::Command(cfg) => cfg.validate(),
            _ => Vec::new(),
        }
    }
}

// --- CONNECTION MODELS ---

/// Construction failures of a connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// The source block id was empty.
    #[error("source_block_id is required")]
    MissingSource,
    /// The target block id was empty.
    #[error("target_block_id is required")]
    MissingTarget,
}

/// A directed edge between two blocks.
///
/// `is_true_path` separates the two outcomes of a Branch block: `true` is the
/// primary path, `false` the alternate one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawConnection")]
pub struct Connection {
    id: String,
    /// Block the edge leaves from.
    pub source_block_id: String,
    /// Block the edge points to.
    pub target_block_id: String,
    /// Attachment point on the source.
    pub source_port: Port,
    /// Attachment point on the target.
    pub target_port: Port,
    /// Which outcome of a Branch source this edge follows.
    pub is_true_path: bool,
    /// Deprecated, read for compatibility only.
    pub condition: Option<String>,
    /// Deprecated, read for compatibility only.
    pub label: Option<String>,
}

#[derive(Deserialize)]
struct RawConnection {
    #[serde(default)]
    id: String,
    #[serde(default)]
    source_block_id: String,
    #[serde(default)]
    target_block_id: String,
    #[serde(default)]
    source_port: Option<String>,
    #[serde(default)]
    target_port: Option<String>,
    #[serde(default = "default_true")]
    is_true_path: bool,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl TryFrom<RawConnection> for Connection {
    type Error = ConnectionError;

    fn try_from(raw: RawConnection) -> Result<Self, Self::Error> {
        let mut connection = Self::new(raw.source_block_id, raw.target_block_id)?;
        if !raw.id.is_empty() {
            connection.id = raw.id;
        }
        connection.source_port = Port::parse_or(raw.source_port.as_deref().unwrap_or("bottom"), Port::Bottom);
        connection.target_port = Port::parse_or(raw.target_port.as_deref().unwrap_or("top"), Port::Top);
        connection.is_true_path = raw.is_true_path;
        connection.condition = raw.condition;
        connection.label = raw.label;
        Ok(connection)
    }
}

fn default_true() -> bool {
    true
}

impl Connection {
    /// Creates a true-path connection from the bottom of `source` to the top of `target`.
    pub fn new(
        source_block_id: impl Into<String>,
        target_block_id: impl Into<String>,
    ) -> Result<Self, ConnectionError> {
        let source_block_id = source_block_id.into();
        let target_block_id = target_block_id.into();
        if source_block_id.is_empty() {
            return Err(ConnectionError::MissingSource);
        }
        if target_block_id.is_empty() {
            return Err(ConnectionError::MissingTarget);
        }
        Ok(Self {
            id: new_id(),
            source_block_id,
            target_block_id,
            source_port: Port::Bottom,
            target_port: Port::Top,
            is_true_path: true,
            condition: None,
            label: None,
        })
    }

    /// Marks this connection as the false path of a branch.
    pub fn false_path(mut self) -> Self {
        self.is_true_path = false;
        self
    }

    /// Sets both ports from their textual names; unknown names fall back to bottom/top.
    pub fn with_ports(mut self, source_port: &str, target_port: &str) -> Self {
        self.source_port = Port::parse_or(source_port, Port::Bottom);
        self.target_port = Port::parse_or(target_port, Port::Top);
        self
    }

    /// Stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.is_true_path { "true" } else { "false" };
        write!(
            f,
            "Connection({} -> {} [{}])",
            self.source_block_id, self.target_block_id, path
        )
    }
}

// --- COMMAND DECLARATION MODELS ---

/// A declared positional argument of a command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandArgument {
    /// Name used for `{{name}}` lookups.
    pub name: String,
    /// Shown in usage listings.
    #[serde(default)]
    pub description: String,
    /// Binding fails when a required argument is absent.
    #[serde(default = "default_true")]
    pub required: bool,
    /// Value used when no token is given.
    #[serde(default)]
    pub default: Option<String>,
}

impl CommandArgument {
    /// A required argument without default.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: true,
            default: None,
        }
    }

    /// An optional argument.
    pub fn optional(name: impl Into<String>, default: Option<&str>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            required: false,
            default: default.map(str::to_string),
        }
    }

    /// Builder-style description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declaration errors, empty when usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push("Argument name is required".to_string());
        }
        if !is_slug(&self.name) {
            errors.push(format!(
                "Argument name '{}' should only contain letters, numbers, hyphens, and underscores",
                self.name
            ));
        }
        if self.required && self.default.is_some() {
            errors.push(format!(
                "Argument '{}' cannot be required and have a default value",
                self.name
            ));
        }

        errors
    }
}

impl fmt::Display for CommandArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.default, self.required) {
            (Some(default), _) => write!(f, "[{}={}]", self.name, default),
            (None, true) => write!(f, "<{}>", self.name),
            (None, false) => write!(f, "[{}]", self.name),
        }
    }
}

/// Bookkeeping carried alongside a command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandMetadata {
    /// Creation time.
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
    /// Last edit time.
    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
    /// Format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Author, if recorded.
    #[serde(default)]
    pub author: Option<String>,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for CommandMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            created: now,
            modified: now,
            version: default_version(),
            author: None,
            tags: Vec::new(),
        }
    }
}
