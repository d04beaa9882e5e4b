//! Host collaborators
//!
//! Interfaces to the parts of the dashboard the settings surface talks to
//! but does not own: screen navigation, input routing, camera sensors,
//! platform information and device control.

use crate::types::{shared, Shared};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Camera a calibration screen works on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraType {
    Road,
    Wide,
    Driver,
}

impl fmt::Display for CameraType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Road => write!(f, "road"),
            Self::Wide => write!(f, "wide"),
            Self::Driver => write!(f, "driver"),
        }
    }
}

/// Screens the settings surface can ask the host to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenRef {
    /// Primary driving view
    OnRoad,
    /// Intrinsic calibration for one camera
    Calibration { camera: CameraType, reset: bool },
    /// Training guide
    Training,
}

impl fmt::Display for ScreenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnRoad => write!(f, "on-road"),
            Self::Calibration { camera, reset } => {
                write!(f, "calibration ({} camera, reset={})", camera, reset)
            }
            Self::Training => write!(f, "training"),
        }
    }
}

/// Commands whose execution belongs to the device, not the settings UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCommand {
    Reboot,
    PowerOff,
    Uninstall,
    CheckForUpdate,
}

impl fmt::Display for DeviceCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reboot => write!(f, "reboot"),
            Self::PowerOff => write!(f, "power off"),
            Self::Uninstall => write!(f, "uninstall"),
            Self::CheckForUpdate => write!(f, "check for update"),
        }
    }
}

/// Screen transition host
pub trait Navigator {
    /// Replace the visible screen
    fn set_active_screen(&self, screen: ScreenRef);
}

/// Routes input events to one surface at a time
pub trait InputRouter {
    /// Give exclusive input to `owner`, or to nobody with `None`
    fn set_input_owner(&self, owner: Option<&str>);
}

/// A camera or other recording sensor
pub trait Sensor {
    /// Start or stop recording
    fn record(&self, enabled: bool) -> anyhow::Result<()>;
}

/// Platform information provider
pub trait PlatformInfo {
    /// Human readable platform name, e.g. "Linux" or "Android"
    fn platform_name(&self) -> String;
}

/// Executes device-level commands (reboot, power off, ...)
pub trait DeviceControl {
    fn execute(&self, command: DeviceCommand) -> anyhow::Result<()>;
}

/// Named sensors, looked up when a binding side effect fires.
#[derive(Clone, Default)]
pub struct SensorRegistry {
    sensors: Shared<HashMap<String, Rc<dyn Sensor>>>,
}

impl SensorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            sensors: shared(HashMap::new()),
        }
    }

    /// Register (or replace) a sensor under `name`
    pub fn register(&self, name: impl Into<String>, sensor: Rc<dyn Sensor>) {
        let name = name.into();
        tracing::debug!("Registered sensor {}", name);
        self.sensors.borrow_mut().insert(name, sensor);
    }

    /// Look up a sensor
    pub fn get(&self, name: &str) -> Option<Rc<dyn Sensor>> {
        self.sensors.borrow().get(name).cloned()
    }

    /// Number of registered sensors
    pub fn len(&self) -> usize {
        self.sensors.borrow().len()
    }

    /// Check if no sensors are registered
    pub fn is_empty(&self) -> bool {
        self.sensors.borrow().is_empty()
    }
}

impl fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.sensors.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("SensorRegistry")
            .field("sensors", &names)
            .finish()
    }
}

/// Platform name derived from the compile target
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl PlatformInfo for SystemPlatform {
    fn platform_name(&self) -> String {
        match std::env::consts::OS {
            "linux" => "Linux".to_string(),
            "android" => "Android".to_string(),
            "macos" => "macOS".to_string(),
            "windows" => "Windows".to_string(),
            other => other.to_string(),
        }
    }
}

/// Platform name fixed by configuration
#[derive(Debug, Clone)]
pub struct FixedPlatform(pub String);

impl PlatformInfo for FixedPlatform {
    fn platform_name(&self) -> String {
        self.0.clone()
    }
}

/// Device control that only logs requests.
///
/// Reboot, power off, uninstall and update checks are not implemented on
/// this device yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingDeviceControl;

impl DeviceControl for LoggingDeviceControl {
    fn execute(&self, command: DeviceCommand) -> anyhow::Result<()> {
        tracing::info!("Device command requested: {}", command);
        Ok(())
    }
}

/// Bundle of collaborators handed to the settings surface.
#[derive(Clone)]
pub struct SettingsHost {
    pub navigator: Rc<dyn Navigator>,
    pub input: Rc<dyn InputRouter>,
    pub device: Rc<dyn DeviceControl>,
    pub platform: Rc<dyn PlatformInfo>,
}

impl fmt::Debug for SettingsHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsHost")
            .field("platform", &self.platform.platform_name())
            .finish_non_exhaustive()
    }
}
