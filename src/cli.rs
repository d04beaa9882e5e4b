//! Command-line interface for the settings shell
//!
//! Flags override values from the configuration file.
//!
//! # Usage
//!
//! ```bash
//! # Use the default config and parameter directory
//! flowpilot-settings
//!
//! # Point at a parameter directory and open the toggles panel
//! flowpilot-settings --params-dir /data/params --panel toggles
//!
//! # Throwaway in-memory store seeded from JSON
//! flowpilot-settings --memory --seed params.json
//! ```

use crate::LogOptions;
use clap::Parser;
use flowpilot_settings::{AppConfig, ParamsBackend};
use std::path::PathBuf;

/// FlowPilot settings screen, driven from the terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "flowpilot-settings")]
#[command(author = "FlowPilot Contributors")]
#[command(version)]
#[command(about = "Settings screen for the FlowPilot dashboard", long_about = None)]
pub struct Args {
    /// Configuration file (.toml or .json)
    ///
    /// Defaults to settings.toml in the user's config directory.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Parameter directory (one file per key)
    #[arg(long, value_name = "DIR", conflicts_with = "memory")]
    pub params_dir: Option<PathBuf>,

    /// Use an in-memory parameter store
    #[arg(long)]
    pub memory: bool,

    /// Seed the in-memory store from a JSON object of key/value pairs
    #[arg(long, value_name = "FILE", requires = "memory")]
    pub seed: Option<PathBuf>,

    /// Panel shown first: device, software or toggles
    #[arg(long, value_name = "NAME")]
    pub panel: Option<String>,

    /// The device has a separate wide road camera
    #[arg(long)]
    pub wide_camera: bool,

    /// Override the reported platform name
    #[arg(long, value_name = "NAME")]
    pub platform: Option<String>,

    /// Initial window width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Initial window height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Log filter (error, warn, info, debug, trace or a full directive)
    ///
    /// Overrides RUST_LOG.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Append logs to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    pub save_config: bool,
}

impl Args {
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            level: self.log_level.clone(),
            json: self.log_json,
            file: self.log_file.clone(),
        }
    }

    /// Overlay command-line values on a loaded configuration
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.params_dir {
            config.params.backend = ParamsBackend::Directory;
            config.params.path = dir.clone();
        }
        if self.memory {
            config.params.backend = ParamsBackend::Memory;
        }
        if let Some(panel) = &self.panel {
            config.ui.default_panel = panel.clone();
        }
        if self.wide_camera {
            config.device.has_wide_camera = true;
        }
        if let Some(platform) = &self.platform {
            config.device.platform_name = Some(platform.clone());
        }
    }

    /// Window size for the first resize, falling back to the configured viewport
    pub fn window_size(&self, config: &AppConfig) -> (u32, u32) {
        (
            self.width.unwrap_or(config.ui.viewport_width),
            self.height.unwrap_or(config.ui.viewport_height),
        )
    }
}
