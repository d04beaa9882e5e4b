//! Host collaborators for the terminal shell.
//!
//! The shell has no real screen manager, cameras or device services, so
//! these record or log what the settings screen asks for.

use flowpilot_settings::{
    AppConfig, FixedPlatform, InputRouter, LoggingDeviceControl, Navigator, PlatformInfo,
    ScreenRef, Sensor, SensorRegistry, SettingsHost, SystemPlatform,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Records screen change requests for the shell to act on
#[derive(Debug, Default)]
pub struct ShellNavigator {
    requests: RefCell<Vec<ScreenRef>>,
}

impl ShellNavigator {
    /// Drain pending screen requests
    pub fn take_requests(&self) -> Vec<ScreenRef> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl Navigator for ShellNavigator {
    fn set_active_screen(&self, screen: ScreenRef) {
        tracing::info!("Screen change requested: {}", screen);
        self.requests.borrow_mut().push(screen);
    }
}

/// Tracks which surface owns terminal input
#[derive(Debug, Default)]
pub struct ShellInput {
    owner: RefCell<Option<String>>,
}

impl ShellInput {
    pub fn owner(&self) -> Option<String> {
        self.owner.borrow().clone()
    }
}

impl InputRouter for ShellInput {
    fn set_input_owner(&self, owner: Option<&str>) {
        tracing::debug!("Input owner: {:?}", owner);
        *self.owner.borrow_mut() = owner.map(str::to_string);
    }
}

/// Camera stand-in that logs record requests
#[derive(Debug)]
pub struct LoggingSensor {
    name: String,
    recording: RefCell<bool>,
}

impl LoggingSensor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recording: RefCell::new(false),
        }
    }

    pub fn is_recording(&self) -> bool {
        *self.recording.borrow()
    }
}

impl Sensor for LoggingSensor {
    fn record(&self, enabled: bool) -> anyhow::Result<()> {
        tracing::info!(
            "{} recording {}",
            self.name,
            if enabled { "started" } else { "stopped" }
        );
        *self.recording.borrow_mut() = enabled;
        Ok(())
    }
}

/// Collaborators wired for the shell
pub struct ShellHost {
    pub host: SettingsHost,
    pub navigator: Rc<ShellNavigator>,
    pub input: Rc<ShellInput>,
    pub sensors: SensorRegistry,
}

impl ShellHost {
    pub fn new(config: &AppConfig) -> Self {
        let navigator = Rc::new(ShellNavigator::default());
        let input = Rc::new(ShellInput::default());
        let platform: Rc<dyn PlatformInfo> = match &config.device.platform_name {
            Some(name) => Rc::new(FixedPlatform(name.clone())),
            None => Rc::new(SystemPlatform),
        };

        let sensors = SensorRegistry::new();
        sensors.register(
            flowpilot_settings::panels::ROAD_CAMERA_SENSOR,
            Rc::new(LoggingSensor::new("road camera")),
        );

        Self {
            host: SettingsHost {
                navigator: navigator.clone(),
                input: input.clone(),
                device: Rc::new(LoggingDeviceControl),
                platform,
            },
            navigator,
            input,
            sensors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_host_wiring() {
        let mut config = AppConfig::default();
        config.device.platform_name = Some("Android".to_string());
        let shell = ShellHost::new(&config);

        assert_eq!(shell.host.platform.platform_name(), "Android");
        assert!(shell.sensors.get("roadCamera").is_some());

        shell.host.navigator.set_active_screen(ScreenRef::Training);
        assert_eq!(shell.navigator.take_requests(), vec![ScreenRef::Training]);
        assert!(shell.navigator.take_requests().is_empty());

        shell.host.input.set_input_owner(Some("settings"));
        assert_eq!(shell.input.owner().as_deref(), Some("settings"));
    }

    #[test]
    fn test_logging_sensor() {
        let sensor = LoggingSensor::new("road camera");
        sensor.record(true).unwrap();
        assert!(sensor.is_recording());
        sensor.record(false).unwrap();
        assert!(!sensor.is_recording());
    }
}
