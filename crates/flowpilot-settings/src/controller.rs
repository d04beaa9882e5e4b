//! Panel Switch Controller
//!
//! Single-selection state machine over the registered panels. Exactly one
//! panel is active at any time; switching discards the rendered rows of the
//! previous panel and rebuilds the new one from the parameter store.

use crate::binding::{ChangeReport, FieldKind};
use crate::error::{SettingsError, SettingsResult};
use crate::host::{DeviceCommand, ScreenRef, SettingsHost};
use crate::panel::{
    BuildContext, Command, Environment, Panel, PanelName, PanelRegistry, RowContent, RowSpec,
    RowValue,
};
use flowpilot_params::Params;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// What to do when asked to switch to a panel that is not registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPanelPolicy {
    /// Return `InvalidPanelName`
    Strict,
    /// Log and keep the current panel
    Ignore,
}

impl Default for UnknownPanelPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            UnknownPanelPolicy::Strict
        } else {
            UnknownPanelPolicy::Ignore
        }
    }
}

/// Per-visit UI state, reset whenever the surface is shown again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsSessionState {
    pub active_panel: PanelName,
    pub scroll_offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A non-fatal message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// One entry of the exclusive panel button group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelButton {
    pub name: PanelName,
    pub title: String,
    pub checked: bool,
}

/// Result of interacting with a row
#[derive(Debug)]
pub enum ActionOutcome {
    /// The host was asked to show another screen
    Navigated(ScreenRef),
    /// A device command was dispatched
    DeviceCommand(DeviceCommand),
    /// A binding wrote its value
    Written(ChangeReport),
}

/// Options fixed for the lifetime of a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerOptions {
    pub default_panel: PanelName,
    pub env: Environment,
    pub policy: UnknownPanelPolicy,
    /// Rows visible at once; bounds the scroll offset
    pub rows_per_page: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            default_panel: PanelName::DEVICE,
            env: Environment::default(),
            policy: UnknownPanelPolicy::default(),
            rows_per_page: 8,
        }
    }
}

/// Exclusive panel selection plus row interaction.
pub struct PanelSwitchController {
    registry: Rc<PanelRegistry>,
    params: Params,
    host: SettingsHost,
    options: ControllerOptions,
    session: SettingsSessionState,
    panel: Panel,
    notices: Vec<Notice>,
}

impl PanelSwitchController {
    /// Start a session on the default panel.
    pub fn new(
        registry: Rc<PanelRegistry>,
        params: Params,
        host: SettingsHost,
        options: ControllerOptions,
    ) -> SettingsResult<Self> {
        let panel = {
            let ctx = BuildContext {
                params: &params,
                env: options.env,
                platform: &*host.platform,
            };
            registry.build_panel(&options.default_panel, &ctx)?
        };
        tracing::debug!("Settings session started on {}", panel.name);

        Ok(Self {
            session: SettingsSessionState {
                active_panel: panel.name.clone(),
                scroll_offset: 0,
            },
            registry,
            params,
            host,
            options,
            panel,
            notices: Vec::new(),
        })
    }

    /// Make `name` the active panel.
    ///
    /// Selecting the active panel rebuilds it. Unknown names follow the
    /// configured [`UnknownPanelPolicy`].
    pub fn select_panel(&mut self, name: &PanelName) -> SettingsResult<()> {
        if !self.registry.contains(name) {
            return match self.options.policy {
                UnknownPanelPolicy::Strict => {
                    Err(SettingsError::InvalidPanelName(name.to_string()))
                }
                UnknownPanelPolicy::Ignore => {
                    tracing::warn!(
                        "Ignoring switch to unknown panel {}, staying on {}",
                        name,
                        self.session.active_panel
                    );
                    Ok(())
                }
            };
        }

        self.panel = self.build(name)?;
        self.session = SettingsSessionState {
            active_panel: name.clone(),
            scroll_offset: 0,
        };
        tracing::debug!("Switched to panel {}", name);
        Ok(())
    }

    /// Rebuild the active panel from the store
    pub fn refresh(&mut self) -> SettingsResult<()> {
        let name = self.session.active_panel.clone();
        self.panel = self.build(&name)?;
        self.clamp_scroll();
        Ok(())
    }

    pub fn active_panel(&self) -> &PanelName {
        &self.session.active_panel
    }

    /// Rows of the active panel as last built
    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn session(&self) -> &SettingsSessionState {
        &self.session
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The panel selector; exactly one button is checked
    pub fn panel_buttons(&self) -> Vec<PanelButton> {
        self.registry
            .names()
            .into_iter()
            .filter_map(|name| {
                let descriptor = self.registry.descriptor(&name)?;
                Some(PanelButton {
                    checked: name == self.session.active_panel,
                    title: descriptor.title.clone(),
                    name,
                })
            })
            .collect()
    }

    /// Set a toggle row to `checked` and persist it.
    pub fn set_toggle(&mut self, row: usize, checked: bool) -> SettingsResult<ChangeReport> {
        let spec = self.spec_at(row)?;
        let binding = match &spec.content {
            RowContent::Field(binding) if matches!(binding.kind(), FieldKind::Toggle { .. }) => {
                binding
            }
            _ => return Err(SettingsError::NotInteractive(spec.label.clone())),
        };

        let report = binding.on_user_change(&self.params, checked)?;
        let label = spec.label.clone();
        self.panel.rows[row].value = RowValue::Toggle(checked);
        self.record_report(&label, &report);
        Ok(report)
    }

    /// Press a row: flips toggles, fires triggers and runs action commands.
    pub fn press(&mut self, row: usize) -> SettingsResult<ActionOutcome> {
        let spec = self.spec_at(row)?;
        let label = spec.label.clone();

        match &spec.content {
            RowContent::Action { command, .. } => {
                let command = *command;
                self.run_command(&label, command)
            }
            RowContent::Field(binding) => match binding.kind() {
                FieldKind::Toggle { .. } => {
                    let checked = match self.panel.rows[row].value {
                        RowValue::Toggle(checked) => !checked,
                        _ => true,
                    };
                    self.set_toggle(row, checked).map(ActionOutcome::Written)
                }
                FieldKind::Trigger { .. } => {
                    let report = binding.press(&self.params)?;
                    self.record_report(&label, &report);
                    Ok(ActionOutcome::Written(report))
                }
                FieldKind::Display { .. } => Err(SettingsError::NotInteractive(label)),
            },
            RowContent::Info(_) => Err(SettingsError::NotInteractive(label)),
        }
    }

    /// Move the visible window by `delta` rows, clamped to the panel
    pub fn scroll_by(&mut self, delta: isize) -> usize {
        self.session.scroll_offset = self.session.scroll_offset.saturating_add_signed(delta);
        self.clamp_scroll();
        self.session.scroll_offset
    }

    /// Drain queued notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Put undelivered notices back at the front of the queue
    pub fn requeue_notices(&mut self, mut notices: Vec<Notice>) {
        if notices.is_empty() {
            return;
        }
        notices.append(&mut self.notices);
        self.notices = notices;
    }

    pub fn has_notices(&self) -> bool {
        !self.notices.is_empty()
    }

    fn build(&self, name: &PanelName) -> SettingsResult<Panel> {
        let ctx = BuildContext {
            params: &self.params,
            env: self.options.env,
            platform: &*self.host.platform,
        };
        self.registry.build_panel(name, &ctx)
    }

    fn spec_at(&self, row: usize) -> SettingsResult<&RowSpec> {
        let rendered = self
            .panel
            .rows
            .get(row)
            .ok_or_else(|| SettingsError::RowOutOfRange {
                panel: self.panel.name.to_string(),
                row,
                len: self.panel.rows.len(),
            })?;
        self.registry
            .descriptor(&self.panel.name)
            .and_then(|d| d.rows.get(rendered.spec_index))
            .ok_or_else(|| SettingsError::InvalidPanelName(self.panel.name.to_string()))
    }

    fn run_command(&mut self, label: &str, command: Command) -> SettingsResult<ActionOutcome> {
        match command {
            Command::Navigate(screen) => {
                tracing::info!("{}: opening {}", label, screen);
                self.host.navigator.set_active_screen(screen);
                Ok(ActionOutcome::Navigated(screen))
            }
            Command::Device(cmd) => {
                if let Err(e) = self.host.device.execute(cmd) {
                    tracing::warn!("{} failed: {:#}", cmd, e);
                    self.notices.push(Notice::new(
                        NoticeLevel::Error,
                        format!("{} failed: {}", label, e),
                    ));
                }
                Ok(ActionOutcome::DeviceCommand(cmd))
            }
        }
    }

    fn record_report(&mut self, label: &str, report: &ChangeReport) {
        if let Some(e) = &report.write_error {
            self.notices.push(Notice::new(
                NoticeLevel::Error,
                format!("Could not save {}: {}", label, e),
            ));
        }
        for failure in &report.effect_failures {
            self.notices.push(Notice::new(
                NoticeLevel::Warning,
                format!("{}: {} failed: {}", label, failure.effect, failure.reason),
            ));
        }
    }

    fn clamp_scroll(&mut self) {
        let max = self
            .panel
            .rows
            .len()
            .saturating_sub(self.options.rows_per_page);
        self.session.scroll_offset = self.session.scroll_offset.min(max);
    }
}

impl fmt::Debug for PanelSwitchController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelSwitchController")
            .field("session", &self.session)
            .field("rows", &self.panel.rows.len())
            .field("notices", &self.notices.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FixedPlatform, InputRouter, LoggingDeviceControl, Navigator, SensorRegistry};
    use crate::state::{settings_state, SettingsState};
    use flowpilot_params::MemoryStore;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNavigator {
        screens: RefCell<Vec<ScreenRef>>,
    }

    impl Navigator for RecordingNavigator {
        fn set_active_screen(&self, screen: ScreenRef) {
            self.screens.borrow_mut().push(screen);
        }
    }

    struct NoInput;

    impl InputRouter for NoInput {
        fn set_input_owner(&self, _owner: Option<&str>) {}
    }

    fn controller(policy: UnknownPanelPolicy) -> (PanelSwitchController, Rc<RecordingNavigator>) {
        let (writer, _reader) = settings_state(SettingsState::default());
        let registry = PanelRegistry::standard(Rc::new(writer), SensorRegistry::new()).unwrap();
        let navigator = Rc::new(RecordingNavigator::default());
        let host = SettingsHost {
            navigator: navigator.clone(),
            input: Rc::new(NoInput),
            device: Rc::new(LoggingDeviceControl),
            platform: Rc::new(FixedPlatform("Linux".into())),
        };
        let options = ControllerOptions {
            policy,
            rows_per_page: 5,
            ..ControllerOptions::default()
        };
        let controller = PanelSwitchController::new(
            Rc::new(registry),
            Params::new(MemoryStore::new()),
            host,
            options,
        )
        .unwrap();
        (controller, navigator)
    }

    fn checked(controller: &PanelSwitchController) -> Vec<PanelName> {
        controller
            .panel_buttons()
            .into_iter()
            .filter(|b| b.checked)
            .map(|b| b.name)
            .collect()
    }

    #[test]
    fn test_starts_on_default_panel() {
        let (controller, _) = controller(UnknownPanelPolicy::Strict);
        assert_eq!(controller.active_panel(), &PanelName::DEVICE);
        assert_eq!(checked(&controller), vec![PanelName::DEVICE]);
        assert_eq!(controller.session().scroll_offset, 0);
    }

    #[test]
    fn test_exactly_one_panel_active() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        let sequence = [
            PanelName::TOGGLES,
            PanelName::SOFTWARE,
            PanelName::SOFTWARE,
            PanelName::DEVICE,
            PanelName::TOGGLES,
        ];
        for name in &sequence {
            controller.select_panel(name).unwrap();
            assert_eq!(checked(&controller), vec![name.clone()]);
            assert_eq!(&controller.panel().name, name);
        }
    }

    #[test]
    fn test_unknown_panel_policy() {
        let (mut strict, _) = controller(UnknownPanelPolicy::Strict);
        assert!(matches!(
            strict.select_panel(&PanelName::new("network")),
            Err(SettingsError::InvalidPanelName(_))
        ));
        assert_eq!(strict.active_panel(), &PanelName::DEVICE);

        let (mut lenient, _) = controller(UnknownPanelPolicy::Ignore);
        lenient.select_panel(&PanelName::TOGGLES).unwrap();
        lenient.select_panel(&PanelName::new("network")).unwrap();
        assert_eq!(lenient.active_panel(), &PanelName::TOGGLES);
    }

    #[test]
    fn test_scroll_resets_on_switch() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        assert_eq!(controller.scroll_by(100), 3);
        assert_eq!(controller.scroll_by(-5), 0);
        controller.scroll_by(1);
        controller.select_panel(&PanelName::TOGGLES).unwrap();
        assert_eq!(controller.session().scroll_offset, 0);
    }

    #[test]
    fn test_scroll_by_extreme_deltas() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        controller.scroll_by(1);
        assert_eq!(controller.scroll_by(isize::MAX), 3);
        assert_eq!(controller.scroll_by(isize::MIN), 0);
        assert_eq!(controller.scroll_by(isize::MIN), 0);
    }

    #[test]
    fn test_requeued_notices_come_first() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        controller.requeue_notices(vec![Notice::new(NoticeLevel::Error, "first")]);
        controller.requeue_notices(vec![Notice::new(NoticeLevel::Info, "earlier")]);
        controller.requeue_notices(Vec::new());
        let messages: Vec<String> = controller
            .take_notices()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["earlier", "first"]);
        assert!(!controller.has_notices());
    }

    #[test]
    fn test_press_navigation_row() {
        let (mut controller, navigator) = controller(UnknownPanelPolicy::Strict);
        let row = controller
            .panel()
            .labels()
            .iter()
            .position(|l| *l == "Review Training Guide")
            .unwrap();
        let outcome = controller.press(row).unwrap();
        assert!(matches!(outcome, ActionOutcome::Navigated(ScreenRef::Training)));
        assert_eq!(*navigator.screens.borrow(), vec![ScreenRef::Training]);
    }

    #[test]
    fn test_press_read_only_row() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        assert!(matches!(
            controller.press(0),
            Err(SettingsError::NotInteractive(label)) if label == "Dongle ID"
        ));
        assert!(matches!(
            controller.set_toggle(0, true),
            Err(SettingsError::NotInteractive(_))
        ));
        assert!(matches!(
            controller.press(42),
            Err(SettingsError::RowOutOfRange { row: 42, .. })
        ));
    }

    #[test]
    fn test_press_toggle_flips_and_persists() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        controller.select_panel(&PanelName::TOGGLES).unwrap();

        controller.press(1).unwrap();
        assert_eq!(controller.panel().rows[1].value, RowValue::Toggle(true));
        assert!(controller.params().get_bool("F3").unwrap());

        controller.press(1).unwrap();
        assert!(!controller.params().get_bool("F3").unwrap());
        assert!(!controller.has_notices());
    }

    #[test]
    fn test_trigger_row() {
        let (mut controller, _) = controller(UnknownPanelPolicy::Strict);
        let row = controller
            .panel()
            .labels()
            .iter()
            .position(|l| *l == "Reset Extrinsic Calibration")
            .unwrap();
        let outcome = controller.press(row).unwrap();
        assert!(matches!(outcome, ActionOutcome::Written(ref r) if r.is_clean()));
        assert!(controller
            .params()
            .get_bool("ResetExtrinsicCalibration")
            .unwrap());
    }
}
