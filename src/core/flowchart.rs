// src/core/flowchart.rs

//! # Flowchart
//!
//! The workflow graph: blocks keyed by id (in insertion order), directed
//! connections between them, and the designated Start block. Structural
//! validation lives here as well.

use crate::models::{Block, BlockKind, BlockType, CommandCallConfig, Connection, ConnectionError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// Errors raised while building or editing a flowchart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowchartError {
    /// A block with the same id is already part of the graph.
    #[error("Block with id '{0}' already exists")]
    DuplicateBlock(String),
    /// A second Start block was added.
    #[error("Flowchart already has a Start block ('{existing}')")]
    DuplicateStart { existing: String },
    /// No block carries the given id.
    #[error("Block with id '{0}' not found")]
    BlockNotFound(String),
    /// Start blocks are never removed.
    #[error("The Start block cannot be removed")]
    CannotRemoveStart,
    /// Two connections may not share the same (source, target) pair.
    #[error("A connection from '{source_id}' to '{target_id}' already exists")]
    DuplicateConnection { source_id: String, target_id: String },
    /// The connection itself was malformed.
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

/// Outcome of a validation pass. `valid` is `true` exactly when `errors` is empty.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// `true` when no errors were found.
    pub valid: bool,
    /// Problems that make the flowchart unusable.
    pub errors: Vec<String>,
    /// Problems worth reporting that do not block execution.
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationResult {
    /// Builds a result from collected findings.
    pub fn new(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// Records an error and marks the result invalid.
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    /// Records a warning.
    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Appends another result's findings after this one's.
    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.valid = self.errors.is_empty();
    }
}

/// A directed workflow graph.
///
/// `start_block_id` always names the Start block when one exists, also after
/// loading a file that omits the field or points it elsewhere.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "RawFlowchart")]
pub struct Flowchart {
    blocks: IndexMap<String, Block>,
    connections: Vec<Connection>,
    start_block_id: Option<String>,
}

/// Wire shape of a flowchart, normalised into `Flowchart` on load.
#[derive(Deserialize)]
struct RawFlowchart {
    #[serde(default)]
    blocks: IndexMap<String, Block>,
    #[serde(default)]
    connections: Vec<Connection>,
    #[serde(default)]
    start_block_id: Option<String>,
}

impl From<RawFlowchart> for Flowchart {
    fn from(raw: RawFlowchart) -> Self {
        let declared_is_start = raw
            .start_block_id
            .as_deref()
            .and_then(|id| raw.blocks.get(id))
            .is_some_and(|b| b.block_type() == BlockType::Start);

        let start_block_id = if declared_is_start {
            raw.start_block_id
        } else {
            let found = raw
                .blocks
                .values()
                .find(|b| b.block_type() == BlockType::Start)
                .map(|b| b.id().to_string());
            if found != raw.start_block_id {
                log::debug!(
                    "Start block id {:?} does not name a Start block, using {:?}",
                    raw.start_block_id,
                    found
                );
            }
            found
        };

        Self {
            blocks: raw.blocks,
            connections: raw.connections,
            start_block_id,
        }
    }
}

impl Default for Flowchart {
    fn default() -> Self {
        Self::new()
    }
}

impl Flowchart {
    /// Creates a flowchart holding a single Start block.
    pub fn new() -> Self {
        let start = Block::start();
        let start_id = start.id().to_string();
        let mut blocks = IndexMap::new();
        blocks.insert(start_id.clone(), start);
        Self {
            blocks,
            connections: Vec::new(),
            start_block_id: Some(start_id),
        }
    }

    /// Creates a flowchart with no blocks at all. Only useful for tests and loaders.
    pub fn empty() -> Self {
        Self {
            blocks: IndexMap::new(),
            connections: Vec::new(),
            start_block_id: None,
        }
    }

    // --- Mutation ---

    /// Adds a block. A Start block becomes the designated start; a second one is refused.
    pub fn add_block(&mut self, block: Block) -> Result<(), FlowchartError> {
        if self.blocks.contains_key(block.id()) {
            return Err(FlowchartError::DuplicateBlock(block.id().to_string()));
        }
        if block.block_type() == BlockType::Start {
            if let Some(existing) = self.first_start_block() {
                return Err(FlowchartError::DuplicateStart {
                    existing: existing.id().to_string(),
                });
            }
            self.start_block_id = Some(block.id().to_string());
        }
        log::debug!("Adding block '{}' ({})", block.name, block.block_type());
        self.blocks.insert(block.id().to_string(), block);
        Ok(())
    }

    /// Removes a block and every connection touching it. The Start block stays.
    pub fn remove_block(&mut self, block_id: &str) -> Result<Block, FlowchartError> {
        match self.blocks.get(block_id) {
            None => return Err(FlowchartError::BlockNotFound(block_id.to_string())),
            Some(b) if b.block_type() == BlockType::Start => {
                return Err(FlowchartError::CannotRemoveStart);
            }
            Some(_) => {}
        }
        let block = self
            .blocks
            .shift_remove(block_id)
            .ok_or_else(|| FlowchartError::BlockNotFound(block_id.to_string()))?;

        self.connections
            .retain(|c| c.source_block_id != block_id && c.target_block_id != block_id);
        log::debug!("Removed block '{}'", block.name);
        Ok(block)
    }

    /// Appends a connection between two existing blocks.
    /// A second connection over the same (source, target) pair is refused.
    pub fn add_connection(&mut self, connection: Connection) -> Result<(), FlowchartError> {
        for id in [&connection.source_block_id, &connection.target_block_id] {
            if !self.blocks.contains_key(id) {
                return Err(FlowchartError::BlockNotFound(id.clone()));
            }
        }
        let duplicate = self.connections.iter().any(|c| {
            c.source_block_id == connection.source_block_id
                && c.target_block_id == connection.target_block_id
        });
        if duplicate {
            return Err(FlowchartError::DuplicateConnection {
                source_id: connection.source_block_id,
                target_id: connection.target_block_id,
            });
        }
        log::debug!("Adding {}", connection);
        self.connections.push(connection);
        Ok(())
    }

    /// Connects two blocks with a true-path edge and returns the new connection's id.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Result<String, FlowchartError> {
        self.connect_path(source_id, target_id, true)
    }

    /// Connects two blocks on the given branch path.
    pub fn connect_path(
        &mut self,
        source_id: &str,
        target_id: &str,
        is_true_path: bool,
    ) -> Result<String, FlowchartError> {
        let mut connection = Connection::new(source_id, target_id)?;
        connection.is_true_path = is_true_path;
        let id = connection.id().to_string();
        self.add_connection(connection)?;
        Ok(id)
    }

    /// Removes a connection by id, returning it if it existed.
    pub fn remove_connection(&mut self, connection_id: &str) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|c| c.id() == connection_id)?;
        Some(self.connections.remove(index))
    }

    // --- Queries ---

    /// Looks a block up by id.
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.blocks.get(block_id)
    }

    /// Mutable lookup by id.
    pub fn block_mut(&mut self, block_id: &str) -> Option<&mut Block> {
        self.blocks.get_mut(block_id)
    }

    /// Blocks in insertion order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Id of the designated Start block.
    pub fn start_block_id(&self) -> Option<&str> {
        self.start_block_id.as_deref()
    }

    /// The designated Start block, if any.
    pub fn start_block(&self) -> Option<&Block> {
        self.start_block_id
            .as_deref()
            .and_then(|id| self.blocks.get(id))
    }

    /// Outgoing connections of `block_id`.
    pub fn connections_from<'a>(&'a self, block_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.source_block_id == block_id)
    }

    /// Incoming connections of `block_id`.
    pub fn connections_to<'a>(&'a self, block_id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.connections
            .iter()
            .filter(move |c| c.target_block_id == block_id)
    }

    /// Target of the first outgoing connection of a non-branch block.
    pub fn next_block(&self, block_id: &str) -> Option<&Block> {
        self.connections_from(block_id)
            .next()
            .and_then(|c| self.blocks.get(&c.target_block_id))
    }

    /// Target of the branch connection matching `outcome`.
    pub fn next_block_for_branch(&self, block_id: &str, outcome: bool) -> Option<&Block> {
        self.connections_from(block_id)
            .find(|c| c.is_true_path == outcome)
            .and_then(|c| self.blocks.get(&c.target_block_id))
    }

    /// Blocks that invoke another command, paired with their call configuration.
    pub fn command_calls(&self) -> impl Iterator<Item = (&Block, &CommandCallConfig)> {
        self.blocks.values().filter_map(|block| match &block.kind {
            BlockKind::Command(cfg) => Some((block, cfg)),
            _ => None,
        })
    }

    fn first_start_block(&self) -> Option<&Block> {
        self.blocks().find(|b| b.block_type() == BlockType::Start)
    }

    /// Ids of every block reachable from `start_id` by following connections.
    pub fn reachable_from(&self, start_id: &str) -> HashSet<String> {
        let mut reachable = HashSet::new();
        let mut queue = VecDeque::from([start_id.to_string()]);

        while let Some(current) = queue.pop_front() {
            if !reachable.insert(current.clone()) {
                continue;
            }
            for conn in self.connections_from(&current) {
                if !reachable.contains(&conn.target_block_id) {
                    queue.push_back(conn.target_block_id.clone());
                }
            }
        }
        reachable
    }

    // --- Validation ---

    /// Runs the structural checks in a fixed order and collects every finding.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        // 1. Exactly one Start block.
        let start_blocks: Vec<&Block> = self
            .blocks()
            .filter(|b| b.block_type() == BlockType::Start)
            .collect();
        match start_blocks.len() {
            0 => result.error(
                "Flowchart must have a Start block. Add a Start block to define where execution begins.",
            ),
            1 => {}
            n => result.error(format!(
                "Flowchart must have only one Start block (found {n}). Remove the extra Start blocks."
            )),
        }

        // 2. At least one End block.
        if !self.blocks().any(|b| b.block_type() == BlockType::End) {
            result.warning(
                "Flowchart should have at least one End block. Execution will stop when no next block is found.",
            );
        }

        // 3. Reachability from the first Start block. Fully disconnected
        // blocks are left to check 8.
        if let Some(start) = start_blocks.first() {
            let reachable = self.reachable_from(start.id());
            let unreachable: Vec<&str> = self
                .blocks()
                .filter(|b| !reachable.contains(b.id()) && !self.is_disconnected(b))
                .map(|b| b.name.as_str())
                .collect();
            if !unreachable.is_empty() {
                result.warning(format!(
                    "Blocks unreachable from Start: {}. These blocks will never execute.",
                    unreachable.join(", ")
                ));
            }
        }

        // 4. Prompt blocks need text.
        for block in self.blocks() {
            if let BlockKind::Prompt(cfg) = &block.kind
                && cfg.prompt.trim().is_empty()
            {
                result.error(format!(
                    "Prompt block '{}' has an empty prompt. Add prompt text for the assistant.",
                    block.name
                ));
            }
        }

        // 5. Branch blocks need a condition and both paths.
        for block in self.blocks() {
            if let BlockKind::Branch(cfg) = &block.kind {
                self.validate_branch(block, &cfg.condition, &mut result);
            }
        }

        // 6. Per-block configuration rules.
        for block in self.blocks() {
            if matches!(
                block.kind,
                BlockKind::Variable(_) | BlockKind::Bash(_) | BlockKind::Command(_)
            ) {
                for err in block.validate() {
                    result.error(format!(
                        "{} block '{}': {}",
                        block.block_type().label(),
                        block.name,
                        err
                    ));
                }
            }
        }

        // 7. Connection endpoints must exist.
        for conn in &self.connections {
            if !self.blocks.contains_key(&conn.source_block_id) {
                result.error(format!(
                    "Connection references non-existent source block: {}",
                    conn.source_block_id
                ));
            }
            if !self.blocks.contains_key(&conn.target_block_id) {
                result.error(format!(
                    "Connection references non-existent target block: {}",
                    conn.target_block_id
                ));
            }
        }

        // 8. Disconnected blocks.
        for block in self.blocks() {
            if self.is_disconnected(block) {
                result.warning(format!(
                    "Block '{}' is completely disconnected (no incoming or outgoing connections).",
                    block.name
                ));
            }
        }

        log::debug!(
            "Validated flowchart: {} error(s), {} warning(s)",
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    /// A non-Start, non-End block with neither incoming nor outgoing connections.
    fn is_disconnected(&self, block: &Block) -> bool {
        !matches!(block.block_type(), BlockType::Start | BlockType::End)
            && !self
                .connections
                .iter()
                .any(|c| c.source_block_id == block.id() || c.target_block_id == block.id())
    }

    fn validate_branch(&self, block: &Block, condition: &str, result: &mut ValidationResult) {
        if condition.trim().is_empty() {
            result.error(format!(
                "Branch block '{}' has no condition. Add a condition to evaluate.",
                block.name
            ));
        }

        let outgoing: Vec<&Connection> = self.connections_from(block.id()).collect();
        if outgoing.is_empty() {
            result.error(format!(
                "Branch block '{}' has no outgoing connections. Add True and False paths.",
                block.name
            ));
            return;
        }

        let has_true = outgoing.iter().any(|c| c.is_true_path);
        let has_false = outgoing.iter().any(|c| !c.is_true_path);
        if !has_false {
            result.error(format!(
                "Branch block '{}' only has a True path connection. Add a False path for when the condition is not met.",
                block.name
            ));
        } else if !has_true {
            result.error(format!(
                "Branch block '{}' only has a False path connection. Add a True path for when the condition is met.",
                block.name
            ));
        }
    }
}
