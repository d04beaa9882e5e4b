//! Error types for the settings crate.
//!
//! This module provides structured error types for panel switching, row
//! interaction, screen lifecycle and configuration loading.

use flowpilot_params::ParamsError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A switch was requested to a panel that is not registered.
    #[error("Unknown settings panel: {0}")]
    InvalidPanelName(String),

    /// A panel with the same name is already registered.
    #[error("Panel '{0}' is already registered")]
    DuplicatePanel(String),

    /// A parameter is already owned by another writable binding.
    #[error("Parameter '{key}' is already bound by '{owner}', cannot bind it to '{label}'")]
    DuplicateBinding {
        key: String,
        owner: String,
        label: String,
    },

    /// A row index does not exist on the active panel.
    #[error("Row {row} is out of range for panel '{panel}' ({len} rows)")]
    RowOutOfRange {
        panel: String,
        row: usize,
        len: usize,
    },

    /// The row cannot be toggled or pressed.
    #[error("Row '{0}' is not interactive")]
    NotInteractive(String),

    /// A value of the wrong shape was supplied for a binding.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    /// The screen must be shown before it can handle input.
    #[error("Settings screen is not visible")]
    NotVisible,

    /// The screen was disposed and cannot be reused.
    #[error("Settings screen has been disposed")]
    Disposed,

    /// The parameter store failed.
    #[error("Parameter store error: {0}")]
    Params(#[from] ParamsError),

    /// The configuration could not be loaded or saved.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A host collaborator (renderer, device control) failed.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

/// Errors related to the application configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The configuration file could not be written.
    #[error("Failed to write config file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// TOML deserialization error.
    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("Failed to serialize TOML config: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// JSON serialization/deserialization error.
    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    Invalid { key: String, reason: String },

    /// The configuration directory could not be found.
    #[error("Config directory error: {0}")]
    ConfigDirectory(String),
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
