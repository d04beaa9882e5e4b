//! FlowPilot Settings Crate
//!
//! The settings screen of the dashboard: parameter-bound fields, the
//! Device/Software/Toggles panels, the exclusive panel switcher and the
//! screen lifecycle adapter, plus the app configuration it is started with.

pub mod binding;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod host;
pub mod panel;
pub mod panels;
pub mod render;
pub mod screen;
pub mod state;
pub mod types;

pub use binding::{ChangeReport, DisplayTransform, DisplayValue, FieldBinding, FieldKind};
pub use config::{AppConfig, DeviceSettings, ParamsBackend, ParamsSettings, UiSettings};
pub use controller::{
    ActionOutcome, ControllerOptions, Notice, NoticeLevel, PanelButton, PanelSwitchController,
    SettingsSessionState, UnknownPanelPolicy,
};
pub use effect::{FnEffect, MetricFlagEffect, RecordSensorEffect, SideEffect};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
pub use host::{
    CameraType, DeviceCommand, DeviceControl, FixedPlatform, InputRouter, LoggingDeviceControl,
    Navigator, PlatformInfo, ScreenRef, Sensor, SensorRegistry, SettingsHost, SystemPlatform,
};
pub use panel::{
    BuildContext, ButtonStyle, Command, Environment, InfoSource, Panel, PanelDescriptor,
    PanelName, PanelRegistry, PanelRow, RowContent, RowSpec, RowValue,
};
pub use render::{Frame, Renderer, TextRenderer, Viewport};
pub use screen::{ScreenOptions, SettingsScreen, SURFACE_NAME};
pub use state::{settings_state, SettingsState, SettingsStateReader, SettingsStateWriter};
pub use types::{shared, Shared};
