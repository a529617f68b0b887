// src/constants.rs

/// The name of the flowcoder directory inside the system config directory.
pub const CONFIG_DIR_NAME: &str = "flowcoder";

/// The name of the settings file (in ~/.config/flowcoder/).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// The name of the default command store directory (in ~/.config/flowcoder/).
pub const COMMANDS_DIR_NAME: &str = "commands";

/// File extension of a serialized command.
pub const COMMAND_FILE_EXTENSION: &str = "json";

/// How many nested command calls are allowed by default.
pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 10;

/// Overrides the config directory (mostly useful for tests and CI).
pub const CONFIG_DIR_ENV: &str = "FLOWCODER_CONFIG_DIR";

/// Overrides the command store directory.
pub const COMMANDS_DIR_ENV: &str = "FLOWCODER_COMMANDS_DIR";
