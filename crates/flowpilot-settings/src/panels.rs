//! The standard Device, Software and Toggles panels.

use crate::binding::{DisplayTransform, FieldBinding};
use crate::effect::{MetricFlagEffect, RecordSensorEffect};
use crate::error::SettingsResult;
use crate::host::{CameraType, DeviceCommand, ScreenRef, SensorRegistry};
use crate::panel::{
    BuildContext, Command, InfoSource, PanelDescriptor, PanelName, PanelRegistry, RowSpec,
};
use crate::state::SettingsStateWriter;
use flowpilot_params::keys;
use std::rc::Rc;

/// Sensor recorded by the "Record & Upload Road Camera" toggle
pub const ROAD_CAMERA_SENSOR: &str = "roadCamera";

/// Number of characters of the commit hash shown on the Software panel
pub const COMMIT_DISPLAY_LEN: usize = 10;

impl PanelRegistry {
    /// Registry holding the three standard panels.
    pub fn standard(
        state: Rc<SettingsStateWriter>,
        sensors: SensorRegistry,
    ) -> SettingsResult<Self> {
        let mut registry = PanelRegistry::new();
        registry.register(device_panel())?;
        registry.register(software_panel())?;
        registry.register(toggles_panel(state, sensors))?;
        Ok(registry)
    }
}

/// The wide calibration row only makes sense when a separate wide camera
/// exists and the device is not configured to drive on it alone.
pub fn show_wide_calibration(ctx: &BuildContext<'_>) -> bool {
    ctx.env.has_wide_camera
        && !ctx
            .params
            .exists_and_compare(keys::WIDE_CAMERA_ONLY.as_str(), true)
}

fn device_panel() -> PanelDescriptor {
    PanelDescriptor::new(PanelName::DEVICE, "Device")
        .row(RowSpec::field(
            "Dongle ID",
            FieldBinding::display(keys::DONGLE_ID, "N/A"),
        ))
        .row(RowSpec::field(
            "Device Manufacturer",
            FieldBinding::display(keys::DEVICE_MANUFACTURER, ""),
        ))
        .row(RowSpec::field(
            "Device Name",
            FieldBinding::display(keys::DEVICE_MODEL, ""),
        ))
        .row(RowSpec::action(
            "Reset Intrinsic Calibration",
            "RESET",
            Command::Navigate(ScreenRef::Calibration {
                camera: CameraType::Road,
                reset: true,
            }),
        ))
        .row(
            RowSpec::action(
                "Reset Wide Intrinsic Calibration",
                "RESET",
                Command::Navigate(ScreenRef::Calibration {
                    camera: CameraType::Wide,
                    reset: true,
                }),
            )
            .when(show_wide_calibration),
        )
        .row(RowSpec::field(
            "Reset Extrinsic Calibration",
            FieldBinding::trigger(keys::RESET_EXTRINSIC_CALIBRATION, "RESET"),
        ))
        .row(RowSpec::action(
            "Review Training Guide",
            "REVIEW",
            Command::Navigate(ScreenRef::Training),
        ))
        .row(RowSpec::action(
            "Reboot",
            "REBOOT",
            Command::Device(DeviceCommand::Reboot),
        ))
        .row(
            RowSpec::action(
                "Power Off",
                "POWER OFF",
                Command::Device(DeviceCommand::PowerOff),
            )
            .critical()
            .without_divider(),
        )
}

fn software_panel() -> PanelDescriptor {
    PanelDescriptor::new(PanelName::SOFTWARE, "Software")
        .row(RowSpec::field(
            "Version",
            FieldBinding::display(keys::VERSION, "")
                .with_transform(DisplayTransform::Prefix("flowpilot v".to_string())),
        ))
        .row(RowSpec::field(
            "Last Updated",
            FieldBinding::display(keys::LAST_UPDATE_TIME, "never")
                .with_transform(DisplayTransform::Timestamp),
        ))
        .row(RowSpec::action(
            "Check For Update",
            "CHECK",
            Command::Device(DeviceCommand::CheckForUpdate),
        ))
        .row(RowSpec::field(
            "Git Branch",
            FieldBinding::display(keys::GIT_BRANCH, ""),
        ))
        .row(RowSpec::field(
            "Git Commit",
            FieldBinding::display(keys::GIT_COMMIT, "")
                .with_transform(DisplayTransform::Truncate(COMMIT_DISPLAY_LEN)),
        ))
        .row(RowSpec::info("Device Type", InfoSource::Platform))
        .row(
            RowSpec::action(
                "Uninstall FlowPilot",
                "UNINSTALL",
                Command::Device(DeviceCommand::Uninstall),
            )
            .critical()
            .without_divider(),
        )
}

fn toggles_panel(state: Rc<SettingsStateWriter>, sensors: SensorRegistry) -> PanelDescriptor {
    PanelDescriptor::new(PanelName::TOGGLES, "Toggles")
        .row(RowSpec::field(
            "Enable FlowPilot",
            FieldBinding::toggle(keys::FLOWPILOT_ENABLED, false),
        ))
        .row(RowSpec::field(
            "Enable F3",
            FieldBinding::toggle(keys::F3, false),
        ))
        .row(RowSpec::field(
            "Enable Lane Departure Warnings",
            FieldBinding::toggle(keys::IS_LDW_ENABLED, false),
        ))
        .row(RowSpec::field(
            "Enable Right Hand Driving",
            FieldBinding::toggle(keys::IS_RHD, false),
        ))
        .row(RowSpec::field(
            "Use Metric System",
            FieldBinding::toggle(keys::IS_METRIC, false)
                .with_effect(Rc::new(MetricFlagEffect::new(state))),
        ))
        .row(RowSpec::field(
            "Record & Upload Road Camera",
            FieldBinding::toggle(keys::RECORD_ROAD, false)
                .with_effect(Rc::new(RecordSensorEffect::new(sensors, ROAD_CAMERA_SENSOR))),
        ))
        .row(RowSpec::field(
            "Record & Upload Driver Camera",
            FieldBinding::toggle(keys::RECORD_FRONT, false),
        ))
        .row(RowSpec::field(
            "Disable Use of LaneLines (alpha)",
            FieldBinding::toggle(keys::END_TO_END, false),
        ))
        .row(
            RowSpec::field(
                "Disengage on Accelerator Pedal",
                FieldBinding::toggle(keys::DISENGAGE_ON_ACCELERATOR, false),
            )
            .without_divider(),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedPlatform;
    use crate::panel::{ButtonStyle, Environment, Panel, RowValue};
    use crate::state::{settings_state, SettingsState};
    use flowpilot_params::{MemoryStore, Params};

    fn registry() -> PanelRegistry {
        let (writer, _reader) = settings_state(SettingsState::default());
        PanelRegistry::standard(Rc::new(writer), SensorRegistry::new()).unwrap()
    }

    fn build(registry: &PanelRegistry, params: &Params, wide: bool, name: PanelName) -> Panel {
        let platform = FixedPlatform("Android".into());
        let ctx = BuildContext {
            params,
            env: Environment {
                has_wide_camera: wide,
            },
            platform: &platform,
        };
        registry.build_panel(&name, &ctx).unwrap()
    }

    #[test]
    fn test_standard_panels_in_order() {
        let registry = registry();
        assert_eq!(
            registry.names(),
            vec![PanelName::DEVICE, PanelName::SOFTWARE, PanelName::TOGGLES]
        );
    }

    #[test]
    fn test_device_panel_defaults() {
        let registry = registry();
        let params = Params::new(MemoryStore::new());
        let panel = build(&registry, &params, false, PanelName::DEVICE);
        assert_eq!(
            panel.labels(),
            vec![
                "Dongle ID",
                "Device Manufacturer",
                "Device Name",
                "Reset Intrinsic Calibration",
                "Reset Extrinsic Calibration",
                "Review Training Guide",
                "Reboot",
                "Power Off",
            ]
        );
        assert_eq!(
            panel.row("Dongle ID").unwrap().value,
            RowValue::Text("N/A".into())
        );
        assert_eq!(
            panel.row("Power Off").unwrap().value,
            RowValue::Button {
                caption: "POWER OFF".into(),
                style: ButtonStyle::Critical
            }
        );
    }

    #[test]
    fn test_wide_calibration_row_inclusion() {
        let registry = registry();
        let params = Params::new(MemoryStore::new());
        let has_wide = |params: &Params, wide: bool| {
            build(&registry, params, wide, PanelName::DEVICE)
                .row("Reset Wide Intrinsic Calibration")
                .is_some()
        };

        assert!(!has_wide(&params, false));
        assert!(has_wide(&params, true));

        params.put_bool("WideCameraOnly", false).unwrap();
        assert!(has_wide(&params, true));

        params.put_bool("WideCameraOnly", true).unwrap();
        assert!(!has_wide(&params, true));
        assert!(!has_wide(&params, false));
    }

    #[test]
    fn test_software_panel_transforms() {
        let registry = registry();
        let params = Params::new(MemoryStore::new());
        params.put_string("Version", "0.9.2").unwrap();
        params.put_string("GitBranch", "release").unwrap();
        params.put_string("GitCommit", "abcdefghijklmnop").unwrap();
        params
            .put_string("LastUpdateTime", "2025-01-05T08:15:00Z")
            .unwrap();

        let panel = build(&registry, &params, false, PanelName::SOFTWARE);
        let text = |label: &str| panel.row(label).unwrap().value.clone();
        assert_eq!(text("Version"), RowValue::Text("flowpilot v0.9.2".into()));
        assert_eq!(text("Git Branch"), RowValue::Text("release".into()));
        assert_eq!(text("Git Commit"), RowValue::Text("abcdefghij".into()));
        assert_eq!(
            text("Last Updated"),
            RowValue::Text("2025-01-05 08:15 UTC".into())
        );
        assert_eq!(text("Device Type"), RowValue::Text("Android".into()));
        assert_eq!(
            params.get_string("GitCommit").unwrap(),
            "abcdefghijklmnop"
        );
    }

    #[test]
    fn test_toggles_panel_all_unchecked_on_empty_store() {
        let registry = registry();
        let params = Params::new(MemoryStore::new());
        let panel = build(&registry, &params, false, PanelName::TOGGLES);
        assert_eq!(panel.rows.len(), 9);
        assert!(panel
            .rows
            .iter()
            .all(|row| row.value == RowValue::Toggle(false)));
    }
}
