//! Names of the parameters read and written by the settings screen.

use crate::key::ParamKey;

pub const DONGLE_ID: ParamKey = ParamKey::from_static("DongleId");
pub const DEVICE_MANUFACTURER: ParamKey = ParamKey::from_static("DeviceManufacturer");
pub const DEVICE_MODEL: ParamKey = ParamKey::from_static("DeviceModel");
pub const VERSION: ParamKey = ParamKey::from_static("Version");
pub const GIT_BRANCH: ParamKey = ParamKey::from_static("GitBranch");
pub const GIT_COMMIT: ParamKey = ParamKey::from_static("GitCommit");
/// RFC 3339 timestamp of the last successful update
pub const LAST_UPDATE_TIME: ParamKey = ParamKey::from_static("LastUpdateTime");

pub const FLOWPILOT_ENABLED: ParamKey = ParamKey::from_static("FlowpilotEnabledToggle");
pub const F3: ParamKey = ParamKey::from_static("F3");
pub const IS_LDW_ENABLED: ParamKey = ParamKey::from_static("IsLdwEnabled");
pub const IS_RHD: ParamKey = ParamKey::from_static("IsRHD");
pub const IS_METRIC: ParamKey = ParamKey::from_static("IsMetric");
pub const RECORD_ROAD: ParamKey = ParamKey::from_static("RecordRoad");
pub const RECORD_FRONT: ParamKey = ParamKey::from_static("RecordFront");
pub const END_TO_END: ParamKey = ParamKey::from_static("EndToEndToggle");
pub const DISENGAGE_ON_ACCELERATOR: ParamKey = ParamKey::from_static("DisengageOnAccelerator");
pub const WIDE_CAMERA_ONLY: ParamKey = ParamKey::from_static("WideCameraOnly");

/// Write-only trigger consumed by the calibration daemon
pub const RESET_EXTRINSIC_CALIBRATION: ParamKey =
    ParamKey::from_static("ResetExtrinsicCalibration");

/// Every key the settings screen knows about, in display order
pub const ALL: &[ParamKey] = &[
    DONGLE_ID,
    DEVICE_MANUFACTURER,
    DEVICE_MODEL,
    VERSION,
    GIT_BRANCH,
    GIT_COMMIT,
    LAST_UPDATE_TIME,
    FLOWPILOT_ENABLED,
    F3,
    IS_LDW_ENABLED,
    IS_RHD,
    IS_METRIC,
    RECORD_ROAD,
    RECORD_FRONT,
    END_TO_END,
    DISENGAGE_ON_ACCELERATOR,
    WIDE_CAMERA_ONLY,
    RESET_EXTRINSIC_CALIBRATION,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::is_valid_key;
    use std::collections::HashSet;

    #[test]
    fn test_known_keys_are_valid_and_unique() {
        let mut seen = HashSet::new();
        for key in ALL {
            assert!(is_valid_key(key.as_str()), "bad key {}", key);
            assert!(seen.insert(key.as_str()), "duplicate key {}", key);
        }
    }
}
