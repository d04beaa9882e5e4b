//! Application configuration.
//!
//! Loaded from a `.toml` or `.json` file; the extension picks the format.
//! Every section has defaults, so a missing file or a partial one is fine.

use crate::controller::{ControllerOptions, UnknownPanelPolicy};
use crate::error::{ConfigError, ConfigResult};
use crate::panel::{Environment, PanelName};
use crate::screen::ScreenOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which parameter store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamsBackend {
    /// One file per key under a directory
    #[default]
    Directory,
    /// Process-local, lost on exit
    Memory,
}

impl std::fmt::Display for ParamsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directory => write!(f, "directory"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Parameter store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamsSettings {
    pub backend: ParamsBackend,
    /// Root directory of the directory backend
    pub path: PathBuf,
}

impl Default for ParamsSettings {
    fn default() -> Self {
        Self {
            backend: ParamsBackend::Directory,
            path: AppConfig::default_params_path(),
        }
    }
}

/// Hardware facts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Device has a separate wide-angle road camera
    pub has_wide_camera: bool,
    /// Overrides the detected platform name
    pub platform_name: Option<String>,
}

/// Settings screen preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Panel shown when the screen opens
    pub default_panel: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Rows visible without scrolling
    pub rows_per_page: usize,
    pub unknown_panel_policy: UnknownPanelPolicy,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_panel: PanelName::DEVICE.to_string(),
            viewport_width: 1280,
            viewport_height: 720,
            rows_per_page: 8,
            unknown_panel_policy: UnknownPanelPolicy::default(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub params: ParamsSettings,
    pub device: DeviceSettings,
    pub ui: UiSettings,
}

const KNOWN_PANELS: [PanelName; 3] = [PanelName::DEVICE, PanelName::SOFTWARE, PanelName::TOGGLES];

impl AppConfig {
    /// Create config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `<config dir>/flowpilot/settings.toml`
    pub fn default_path() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("flowpilot").join("settings.toml"))
            .ok_or_else(|| {
                ConfigError::ConfigDirectory("could not determine config directory".to_string())
            })
    }

    /// `<data dir>/flowpilot/params`, or `./params` when there is no data dir
    pub fn default_params_path() -> PathBuf {
        dirs::data_dir()
            .map(|dir| dir.join("flowpilot").join("params"))
            .unwrap_or_else(|| PathBuf::from("params"))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            Self::load_from_file(path)
        } else {
            tracing::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.params.backend == ParamsBackend::Directory
            && self.params.path.as_os_str().is_empty()
        {
            return Err(invalid("params.path", "must be set for the directory backend"));
        }

        if !KNOWN_PANELS
            .iter()
            .any(|p| p.as_str() == self.ui.default_panel)
        {
            return Err(invalid(
                "ui.default_panel",
                format!(
                    "unknown panel '{}', expected device, software or toggles",
                    self.ui.default_panel
                ),
            ));
        }

        if self.ui.viewport_width == 0 || self.ui.viewport_height == 0 {
            return Err(invalid("ui.viewport", "dimensions must be > 0"));
        }

        if self.ui.rows_per_page == 0 {
            return Err(invalid("ui.rows_per_page", "must be > 0"));
        }

        if let Some(name) = &self.device.platform_name {
            if name.trim().is_empty() {
                return Err(invalid("device.platform_name", "must not be blank"));
            }
        }

        Ok(())
    }

    pub fn environment(&self) -> Environment {
        Environment {
            has_wide_camera: self.device.has_wide_camera,
        }
    }

    /// Screen options derived from the `[ui]` and `[device]` sections
    pub fn screen_options(&self) -> ScreenOptions {
        ScreenOptions {
            controller: ControllerOptions {
                default_panel: PanelName::new(self.ui.default_panel.clone()),
                env: self.environment(),
                policy: self.ui.unknown_panel_policy,
                rows_per_page: self.ui.rows_per_page,
            },
            virtual_width: self.ui.viewport_width as f32,
            virtual_height: self.ui.viewport_height as f32,
        }
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        reason: reason.into(),
    }
}
