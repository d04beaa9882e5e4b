//! Binding side effects
//!
//! Side effects run after a binding has written its value, synchronously and
//! in registration order. A failure is reported but never undoes the write.

use crate::host::SensorRegistry;
use crate::state::SettingsStateWriter;
use anyhow::{anyhow, bail};
use flowpilot_params::ParamValue;
use std::fmt;
use std::rc::Rc;

/// Work triggered by a user edit, beyond persisting the value.
pub trait SideEffect {
    /// Short name used in logs and failure reports
    fn name(&self) -> &str;

    /// React to the new value
    fn apply(&self, value: &ParamValue) -> anyhow::Result<()>;
}

fn expect_bool(effect: &str, value: &ParamValue) -> anyhow::Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| anyhow!("{} expects a boolean, got {}", effect, value.type_name()))
}

/// Mirrors the unit-system toggle into the shared settings state.
#[derive(Debug)]
pub struct MetricFlagEffect {
    state: Rc<SettingsStateWriter>,
}

impl MetricFlagEffect {
    pub fn new(state: Rc<SettingsStateWriter>) -> Self {
        Self { state }
    }
}

impl SideEffect for MetricFlagEffect {
    fn name(&self) -> &str {
        "metric-flag"
    }

    fn apply(&self, value: &ParamValue) -> anyhow::Result<()> {
        let is_metric = expect_bool(self.name(), value)?;
        self.state.set_metric(is_metric);
        Ok(())
    }
}

/// Starts or stops recording on a named sensor.
#[derive(Debug)]
pub struct RecordSensorEffect {
    sensors: SensorRegistry,
    sensor: String,
    name: String,
}

impl RecordSensorEffect {
    pub fn new(sensors: SensorRegistry, sensor: impl Into<String>) -> Self {
        let sensor = sensor.into();
        Self {
            name: format!("record:{}", sensor),
            sensors,
            sensor,
        }
    }
}

impl SideEffect for RecordSensorEffect {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: &ParamValue) -> anyhow::Result<()> {
        let enabled = expect_bool(&self.name, value)?;
        let Some(sensor) = self.sensors.get(&self.sensor) else {
            bail!("sensor '{}' is not registered", self.sensor);
        };
        sensor.record(enabled)
    }
}

/// Side effect backed by a closure.
pub struct FnEffect<F> {
    name: String,
    f: F,
}

impl<F> FnEffect<F>
where
    F: Fn(&ParamValue) -> anyhow::Result<()>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> SideEffect for FnEffect<F>
where
    F: Fn(&ParamValue) -> anyhow::Result<()>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, value: &ParamValue) -> anyhow::Result<()> {
        (self.f)(value)
    }
}

impl<F> fmt::Debug for FnEffect<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEffect").field("name", &self.name).finish()
    }
}
