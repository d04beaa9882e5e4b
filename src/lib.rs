//! # FlowPilot Settings
//!
//! Headless host for the FlowPilot settings screen.
//!
//! ## Architecture
//!
//! The workspace is split into:
//!
//! 1. **flowpilot-params** - Typed client over the persisted parameter store
//! 2. **flowpilot-settings** - Field bindings, panels, panel switching, screen lifecycle
//! 3. **flowpilot** - This crate: logging, CLI and a text shell that drives the screen
//!
//! The shell stands in for the dashboard: it routes stdin commands to the
//! screen and prints each frame to stdout, so the settings behaviour can be
//! exercised against a real parameter directory without the vehicle UI.

pub mod cli;
pub mod host;
pub mod shell;

pub use flowpilot_params::{DirStore, MemoryStore, ParamStore, Params};
pub use flowpilot_settings::{AppConfig, ParamsBackend, SettingsScreen};

use std::path::PathBuf;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Logging options taken from the command line
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Filter directive, e.g. `debug` or `flowpilot_settings=trace`.
    /// `RUST_LOG` applies when unset.
    pub level: Option<String>,
    /// Emit JSON lines instead of pretty text
    pub json: bool,
    /// Append to this file instead of writing to stderr
    pub file: Option<PathBuf>,
}

/// Initialize logging
///
/// Sets up structured logging with:
/// - Pretty or JSON formatting
/// - RUST_LOG environment variable support (default `info`)
/// - stderr output, so frames on stdout stay readable
pub fn init_logging(options: &LogOptions) -> anyhow::Result<()> {
    use std::sync::Arc;
    use tracing_subscriber::fmt;
    use tracing_subscriber::fmt::writer::BoxMakeWriter;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = match &options.level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let writer = match &options.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;
            BoxMakeWriter::new(Arc::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    if options.json {
        let fmt_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(true)
            .json();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .with_ansi(options.file.is_none())
            .pretty();
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Open the parameter store selected by the configuration
pub fn open_params(config: &AppConfig) -> anyhow::Result<Params> {
    let params = match config.params.backend {
        ParamsBackend::Directory => {
            let store = DirStore::open(config.params.path.clone())?;
            Params::new(store)
        }
        ParamsBackend::Memory => Params::new(MemoryStore::new()),
    };
    tracing::info!(
        "Using {} parameter store ({})",
        params.backend_name(),
        config.params.path.display()
    );
    Ok(params)
}
