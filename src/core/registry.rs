// src/core/registry.rs

use crate::constants::COMMAND_FILE_EXTENSION;
use crate::core::command::Command;
use crate::core::command_validator::CommandSource;
use crate::models::is_slug;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Represents errors that can occur while loading or saving commands.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// A command file could not be parsed.
    #[error("Failed to read command file '{path}': {source}")]
    Json {
        /// File that failed to parse.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// A command could not be turned into JSON.
    #[error("Failed to serialize command '{name}': {source}")]
    Serialize {
        /// Name of the command.
        name: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
    /// The command directory could not be listed.
    #[error("Failed to scan '{path}': {source}")]
    Walk {
        /// Directory being scanned.
        path: String,
        /// Underlying walk error.
        #[source]
        source: walkdir::Error,
    },
    /// No command with that name is registered.
    #[error("Command '{0}' not found.")]
    NotFound(String),
    /// A command with that name is already registered.
    #[error("Command '{0}' already exists.")]
    AlreadyExists(String),
    /// The name cannot be used as a file name inside the command store.
    #[error("Cannot save command '{0}': names may only use letters, digits, hyphens and underscores.")]
    InvalidName(String),
}

type RegistryResult<T> = Result<T, RegistryError>;

/// All known commands, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Command>,
}

impl CommandRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file directly inside `dir`. Unreadable files are logged and skipped.
    /// A missing directory yields an empty registry.
    pub fn load_from_dir(dir: &Path) -> RegistryResult<Self> {
        let mut registry = Self::new();
        if !dir.exists() {
            log::debug!("Command directory {} does not exist yet.", dir.display());
            return Ok(registry);
        }

        let mut files: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|source| RegistryError::Walk {
                path: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            if entry.file_type().is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(COMMAND_FILE_EXTENSION)
            {
                files.push(path.to_path_buf());
            }
        }
        files.sort();

        for path in files {
            match load_command_file(&path) {
                Ok(command) => {
                    if registry.contains(&command.name) {
                        log::warn!(
                            "Duplicate command '{}' in {}, keeping the first one.",
                            command.name,
                            path.display()
                        );
                        continue;
                    }
                    registry.commands.insert(command.name.clone(), command);
                }
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        log::debug!("Loaded {} command(s) from {}", registry.len(), dir.display());
        Ok(registry)
    }

    /// Looks a command up by its exact name.
    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// `true` when `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands in load order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    /// Registers a new command; an existing name is refused.
    pub fn insert(&mut self, command: Command) -> RegistryResult<()> {
        if self.contains(&command.name) {
            return Err(RegistryError::AlreadyExists(command.name));
        }
        self.commands.insert(command.name.clone(), command);
        Ok(())
    }

    /// Unregisters a command and returns it.
    pub fn remove(&mut self, name: &str) -> RegistryResult<Command> {
        self.commands
            .shift_remove(name)
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    /// The underlying name map, as consumed by the cycle checker.
    pub fn as_map(&self) -> &IndexMap<String, Command> {
        &self.commands
    }

    /// Writes every command to `dir` as `<name>.json`.
    pub fn save(&self, dir: &Path) -> RegistryResult<()> {
        for command in self.commands.values() {
            save_command(dir, command)?;
        }
        Ok(())
    }
}

impl CommandSource for CommandRegistry {
    fn find_command(&self, name: &str) -> Option<&Command> {
        self.get(name)
    }
}

/// Reads a single command file.
pub fn load_command_file(path: &Path) -> RegistryResult<Command> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| RegistryError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Writes `command` to `<dir>/<name>.json` as pretty JSON and returns the file path.
/// Names that are not plain slugs are refused so the file always lands inside `dir`.
pub fn save_command(dir: &Path, command: &Command) -> RegistryResult<PathBuf> {
    if !is_slug(&command.name) {
        return Err(RegistryError::InvalidName(command.name.clone()));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.{}", command.name, COMMAND_FILE_EXTENSION));
    let json = serde_json::to_string_pretty(command).map_err(|source| RegistryError::Serialize {
        name: command.name.clone(),
        source,
    })?;
    fs::write(&path, json)?;
    log::debug!("Saved command '{}' to {}", command.name, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::command_validator::check_circular_dependencies;
    use crate::models::Block;
    use tempfile::tempdir;

    fn with_call(name: &str, target: &str) -> Command {
        let mut command = Command::new(name).unwrap();
        let start = command.flowchart.start_block_id().unwrap().to_string();
        let call = Block::command_call(target, "");
        let call_id = call.id().to_string();
        command.flowchart.add_block(call).unwrap();
        command.flowchart.connect(&start, &call_id).unwrap();
        command
    }

    #[test]
    fn test_save_and_load_directory() {
        let dir = tempdir().unwrap();
        let mut registry = CommandRegistry::new();
        registry.insert(Command::new("beta").unwrap()).unwrap();
        registry.insert(Command::new("alpha").unwrap()).unwrap();
        registry.save(dir.path()).unwrap();

        let loaded = CommandRegistry::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.names(), vec!["alpha", "beta"]);
        assert_eq!(loaded.get("beta").unwrap(), registry.get("beta").unwrap());
    }

    #[test]
    fn test_save_refuses_names_that_escape_the_directory() {
        let root = tempdir().unwrap();
        let store = root.path().join("commands");
        for name in ["../outside", "nested/inner", "with space"] {
            let command = Command::new(name).unwrap();
            assert!(matches!(
                save_command(&store, &command),
                Err(RegistryError::InvalidName(n)) if n == name
            ));
        }
        assert!(!root.path().join("outside.json").exists());
        assert!(!store.exists());
    }

    #[test]
    fn test_corrupt_and_foreign_files_are_skipped() {
        let dir = tempdir().unwrap();
        save_command(dir.path(), &Command::new("good").unwrap()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        save_command(&dir.path().join("nested"), &Command::new("deep").unwrap()).unwrap();

        let loaded = CommandRegistry::load_from_dir(dir.path()).unwrap();
        assert_eq!(loaded.names(), vec!["good"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = CommandRegistry::load_from_dir(&dir.path().join("absent")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut registry = CommandRegistry::new();
        registry.insert(Command::new("a").unwrap()).unwrap();
        assert!(matches!(
            registry.insert(Command::new("a").unwrap()),
            Err(RegistryError::AlreadyExists(_))
        ));
        assert_eq!(registry.remove("a").unwrap().name, "a");
        assert!(matches!(registry.remove("a"), Err(RegistryError::NotFound(_))));
    }

    #[test]
    fn test_registry_feeds_cycle_checker() {
        let mut registry = CommandRegistry::new();
        registry.insert(with_call("ping", "pong")).unwrap();
        registry.insert(with_call("pong", "ping")).unwrap();

        let ping = registry.get("ping").unwrap();
        assert_eq!(
            check_circular_dependencies("ping", &ping.flowchart, &registry).as_deref(),
            Some("ping -> pong -> Circular dependency detected: ping calls itself")
        );
        assert!(check_circular_dependencies("ping", &ping.flowchart, registry.as_map()).is_some());
    }
}
