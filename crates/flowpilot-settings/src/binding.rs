//! Field Binding
//!
//! A [`FieldBinding`] ties one parameter key to one control. It is immutable
//! configuration: the control it seeds is recreated on every panel build,
//! and the store is always the source of truth for its value.

use crate::effect::SideEffect;
use crate::error::{SettingsError, SettingsResult};
use chrono::{DateTime, Utc};
use flowpilot_params::{ParamKey, ParamValue, Params, ParamsError};
use std::fmt;
use std::rc::Rc;

/// Presentation-only transform applied to a text value after reading it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayTransform {
    /// Show the value as stored
    #[default]
    Verbatim,
    /// Show at most the first `n` characters
    Truncate(usize),
    /// Prepend fixed text
    Prefix(String),
    /// Render an RFC 3339 timestamp as `YYYY-MM-DD HH:MM UTC`
    Timestamp,
}

impl DisplayTransform {
    /// Transform a stored value for display
    pub fn apply(&self, raw: &str) -> String {
        match self {
            DisplayTransform::Verbatim => raw.to_string(),
            DisplayTransform::Truncate(n) => raw.chars().take(*n).collect(),
            DisplayTransform::Prefix(prefix) => format!("{}{}", prefix, raw),
            DisplayTransform::Timestamp => match DateTime::parse_from_rfc3339(raw.trim()) {
                Ok(ts) => ts
                    .with_timezone(&Utc)
                    .format("%Y-%m-%d %H:%M UTC")
                    .to_string(),
                Err(_) => raw.to_string(),
            },
        }
    }
}

/// What kind of control a binding drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Checkbox backed by a boolean parameter
    Toggle { default: bool },
    /// Read-only text
    Display {
        default: String,
        transform: DisplayTransform,
    },
    /// Button that writes a fixed value (write-only flag)
    Trigger { value: ParamValue, caption: String },
}

/// Initial state of a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayValue {
    Toggle(bool),
    Text(String),
    Button(String),
}

/// A side effect that failed after a write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectFailure {
    pub effect: String,
    pub reason: String,
}

/// Outcome of a user edit.
#[derive(Debug)]
pub struct ChangeReport {
    pub key: ParamKey,
    pub value: ParamValue,
    /// Set when the store rejected the write
    pub write_error: Option<ParamsError>,
    /// Side effects that failed, in registration order
    pub effect_failures: Vec<EffectFailure>,
}

impl ChangeReport {
    /// True iff the value reached the store
    pub fn persisted(&self) -> bool {
        self.write_error.is_none()
    }

    /// True iff the write and every side effect succeeded
    pub fn is_clean(&self) -> bool {
        self.persisted() && self.effect_failures.is_empty()
    }
}

/// Binding between one parameter key and one control.
#[derive(Clone)]
pub struct FieldBinding {
    key: ParamKey,
    kind: FieldKind,
    effects: Vec<Rc<dyn SideEffect>>,
}

impl FieldBinding {
    /// Checkbox bound to a boolean key
    pub fn toggle(key: ParamKey, default: bool) -> Self {
        Self::with_kind(key, FieldKind::Toggle { default })
    }

    /// Read-only text bound to a string key
    pub fn display(key: ParamKey, default: impl Into<String>) -> Self {
        Self::with_kind(
            key,
            FieldKind::Display {
                default: default.into(),
                transform: DisplayTransform::Verbatim,
            },
        )
    }

    /// Button that writes `true` to `key` when pressed
    pub fn trigger(key: ParamKey, caption: impl Into<String>) -> Self {
        Self::with_kind(
            key,
            FieldKind::Trigger {
                value: ParamValue::Bool(true),
                caption: caption.into(),
            },
        )
    }

    fn with_kind(key: ParamKey, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            effects: Vec::new(),
        }
    }

    /// Set the display transform. Ignored for non-display bindings.
    pub fn with_transform(mut self, transform: DisplayTransform) -> Self {
        if let FieldKind::Display { transform: t, .. } = &mut self.kind {
            *t = transform;
        }
        self
    }

    /// Append a side effect, run after each successful or failed write
    pub fn with_effect(mut self, effect: Rc<dyn SideEffect>) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn key(&self) -> &ParamKey {
        &self.key
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Toggles and triggers write to the store; displays only read
    pub fn is_writable(&self) -> bool {
        !matches!(self.kind, FieldKind::Display { .. })
    }

    /// Names of the registered side effects, in order
    pub fn effect_names(&self) -> Vec<&str> {
        self.effects.iter().map(|e| e.name()).collect()
    }

    /// Seed value for the control: `exists(key) ? get(key) : default`.
    ///
    /// Never writes and never fails.
    pub fn initialize(&self, params: &Params) -> DisplayValue {
        let key = self.key.as_str();
        match &self.kind {
            FieldKind::Toggle { default } => DisplayValue::Toggle(params.get_bool_or(key, *default)),
            FieldKind::Display { default, transform } => {
                if params.exists(key) {
                    match params.get_string(key) {
                        Ok(raw) => DisplayValue::Text(transform.apply(&raw)),
                        Err(e) => {
                            tracing::warn!("Falling back to default for {}: {}", key, e);
                            DisplayValue::Text(default.clone())
                        }
                    }
                } else {
                    DisplayValue::Text(default.clone())
                }
            }
            FieldKind::Trigger { caption, .. } => DisplayValue::Button(caption.clone()),
        }
    }

    /// Persist a user edit, then run side effects.
    ///
    /// The write happens first. Side effects run in order whether or not the
    /// write succeeded; their failures are collected in the report.
    pub fn on_user_change(
        &self,
        params: &Params,
        value: impl Into<ParamValue>,
    ) -> SettingsResult<ChangeReport> {
        let value = self.coerce(value.into())?;
        let key = self.key.as_str();

        let write_error = match params.put(key, value.clone()) {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!("Failed to persist {}: {}", key, e);
                Some(e)
            }
        };

        let mut effect_failures = Vec::new();
        for effect in &self.effects {
            if let Err(e) = effect.apply(&value) {
                tracing::warn!("Side effect {} for {} failed: {:#}", effect.name(), key, e);
                effect_failures.push(EffectFailure {
                    effect: effect.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(ChangeReport {
            key: self.key.clone(),
            value,
            write_error,
            effect_failures,
        })
    }

    /// Fire a trigger binding with its configured value
    pub fn press(&self, params: &Params) -> SettingsResult<ChangeReport> {
        match &self.kind {
            FieldKind::Trigger { value, .. } => self.on_user_change(params, value.clone()),
            _ => Err(SettingsError::NotInteractive(self.key.to_string())),
        }
    }

    fn coerce(&self, value: ParamValue) -> SettingsResult<ParamValue> {
        match &self.kind {
            FieldKind::Toggle { .. } => value.as_bool().map(ParamValue::Bool).ok_or_else(|| {
                SettingsError::InvalidValue {
                    key: self.key.to_string(),
                    reason: format!("expected a boolean, got {}", value.type_name()),
                }
            }),
            FieldKind::Trigger { .. } => Ok(value),
            FieldKind::Display { .. } => Err(SettingsError::NotInteractive(self.key.to_string())),
        }
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("effects", &self.effect_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::FnEffect;
    use anyhow::bail;
    use flowpilot_params::{keys, MemoryStore};
    use std::cell::RefCell;
    use std::sync::Arc;

    fn params() -> Params {
        Params::new(MemoryStore::new())
    }

    #[test]
    fn test_toggle_initialize_uses_default_then_store() {
        let p = params();
        let binding = FieldBinding::toggle(keys::IS_RHD, false);
        assert_eq!(binding.initialize(&p), DisplayValue::Toggle(false));

        let on_by_default = FieldBinding::toggle(keys::F3, true);
        assert_eq!(on_by_default.initialize(&p), DisplayValue::Toggle(true));

        p.put_bool("IsRHD", true).unwrap();
        assert_eq!(binding.initialize(&p), DisplayValue::Toggle(true));
    }

    #[test]
    fn test_display_initialize_and_transforms() {
        let p = params();
        let version = FieldBinding::display(keys::VERSION, "")
            .with_transform(DisplayTransform::Prefix("flowpilot v".into()));
        assert_eq!(version.initialize(&p), DisplayValue::Text(String::new()));

        p.put_string("Version", "0.3.1").unwrap();
        assert_eq!(
            version.initialize(&p),
            DisplayValue::Text("flowpilot v0.3.1".into())
        );
    }

    #[test]
    fn test_truncation_is_presentation_only() {
        let p = params();
        p.put_string("GitCommit", "abcdefghijklmnop").unwrap();
        let commit = FieldBinding::display(keys::GIT_COMMIT, "")
            .with_transform(DisplayTransform::Truncate(10));
        assert_eq!(
            commit.initialize(&p),
            DisplayValue::Text("abcdefghij".into())
        );
        assert_eq!(p.get_string("GitCommit").unwrap(), "abcdefghijklmnop");

        // Short values do not panic
        p.put_string("GitCommit", "abc").unwrap();
        assert_eq!(commit.initialize(&p), DisplayValue::Text("abc".into()));
    }

    #[test]
    fn test_timestamp_transform() {
        let t = DisplayTransform::Timestamp;
        assert_eq!(t.apply("2024-03-01T12:30:00+02:00"), "2024-03-01 10:30 UTC");
        assert_eq!(t.apply("last tuesday"), "last tuesday");
    }

    #[test]
    fn test_on_user_change_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let p = Params::from_shared(store.clone());
        let binding = FieldBinding::toggle(keys::IS_METRIC, false);

        binding.on_user_change(&p, true).unwrap();
        let once = p.snapshot(&[keys::IS_METRIC]).unwrap();
        binding.on_user_change(&p, true).unwrap();
        let twice = p.snapshot(&[keys::IS_METRIC]).unwrap();

        assert_eq!(once, twice);
        assert!(p.get_bool("IsMetric").unwrap());
    }

    #[test]
    fn test_effects_run_in_order_after_write() {
        let p = params();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first_log = log.clone();
        let first_params = p.clone();
        let first = FnEffect::new("first", move |_: &ParamValue| {
            // The write is already visible when effects run
            let stored = first_params.get_bool("EndToEndToggle")?;
            first_log.borrow_mut().push(format!("first:{}", stored));
            Ok(())
        });
        let failing = FnEffect::new("failing", |_: &ParamValue| bail!("sensor offline"));
        let last_log = log.clone();
        let last = FnEffect::new("last", move |_: &ParamValue| {
            last_log.borrow_mut().push("last".to_string());
            Ok(())
        });

        let binding = FieldBinding::toggle(keys::END_TO_END, false)
            .with_effect(Rc::new(first))
            .with_effect(Rc::new(failing))
            .with_effect(Rc::new(last));

        let report = binding.on_user_change(&p, true).unwrap();
        assert!(report.persisted());
        assert!(!report.is_clean());
        assert_eq!(
            report.effect_failures,
            vec![EffectFailure {
                effect: "failing".into(),
                reason: "sensor offline".into()
            }]
        );
        assert_eq!(*log.borrow(), vec!["first:true", "last"]);
        assert!(p.get_bool("EndToEndToggle").unwrap());
    }

    #[test]
    fn test_write_failure_still_runs_effects() {
        let store = Arc::new(MemoryStore::new());
        let p = Params::from_shared(store.clone());
        store.set_available(false);

        let ran = Rc::new(RefCell::new(false));
        let flag = ran.clone();
        let binding = FieldBinding::toggle(keys::IS_LDW_ENABLED, false).with_effect(Rc::new(
            FnEffect::new("flag", move |_: &ParamValue| {
                *flag.borrow_mut() = true;
                Ok(())
            }),
        ));

        let report = binding.on_user_change(&p, true).unwrap();
        assert!(!report.persisted());
        assert!(report.write_error.as_ref().unwrap().is_unavailable());
        assert!(*ran.borrow());
    }

    #[test]
    fn test_display_bindings_are_read_only() {
        let p = params();
        let binding = FieldBinding::display(keys::DONGLE_ID, "N/A");
        assert!(!binding.is_writable());
        assert!(matches!(
            binding.on_user_change(&p, "x"),
            Err(SettingsError::NotInteractive(_))
        ));
        assert!(!p.exists("DongleId"));
    }

    #[test]
    fn test_toggle_rejects_non_boolean() {
        let p = params();
        let binding = FieldBinding::toggle(keys::F3, false);
        assert!(matches!(
            binding.on_user_change(&p, "fast"),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(!p.exists("F3"));
    }

    #[test]
    fn test_trigger_writes_fixed_value() {
        let p = params();
        let binding = FieldBinding::trigger(keys::RESET_EXTRINSIC_CALIBRATION, "RESET");
        assert_eq!(binding.initialize(&p), DisplayValue::Button("RESET".into()));
        assert!(!p.exists("ResetExtrinsicCalibration"));

        let report = binding.press(&p).unwrap();
        assert!(report.is_clean());
        assert!(p.get_bool("ResetExtrinsicCalibration").unwrap());
    }
}
