//! Settings state shared with other screens.
//!
//! The settings surface is the only writer. Other screens (the on-road view
//! reads the unit system, for example) get a [`SettingsStateReader`], which
//! can be cloned freely but exposes no setters.

use crate::types::{shared, Shared};
use flowpilot_params::{keys, Params};

/// Live values derived from parameters and consumed outside the settings UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsState {
    /// Display speeds and distances in metric units
    pub is_metric: bool,
}

/// Create a writer/reader pair over the same state.
pub fn settings_state(initial: SettingsState) -> (SettingsStateWriter, SettingsStateReader) {
    let inner = shared(initial);
    (
        SettingsStateWriter {
            inner: inner.clone(),
        },
        SettingsStateReader { inner },
    )
}

/// Sole writer of [`SettingsState`]. Deliberately not `Clone`.
#[derive(Debug)]
pub struct SettingsStateWriter {
    inner: Shared<SettingsState>,
}

impl SettingsStateWriter {
    /// Set the unit system flag
    pub fn set_metric(&self, is_metric: bool) {
        self.inner.borrow_mut().is_metric = is_metric;
    }

    /// Reload every field from the parameter store
    pub fn sync_from(&self, params: &Params) {
        let is_metric = params.get_bool_or(keys::IS_METRIC.as_str(), false);
        self.inner.borrow_mut().is_metric = is_metric;
        tracing::debug!("Settings state synced from store (metric={})", is_metric);
    }

    /// Hand out another read-only view
    pub fn reader(&self) -> SettingsStateReader {
        SettingsStateReader {
            inner: self.inner.clone(),
        }
    }
}

/// Read-only view of [`SettingsState`].
#[derive(Debug, Clone)]
pub struct SettingsStateReader {
    inner: Shared<SettingsState>,
}

impl SettingsStateReader {
    /// Current unit system flag
    pub fn is_metric(&self) -> bool {
        self.inner.borrow().is_metric
    }

    /// Copy of the whole state
    pub fn snapshot(&self) -> SettingsState {
        *self.inner.borrow()
    }
}
