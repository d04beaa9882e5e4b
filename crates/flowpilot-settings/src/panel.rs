//! Panel descriptors and the panel registry.
//!
//! A panel is declared once as an ordered list of rows and rebuilt from the
//! parameter store every time it is shown.

use crate::binding::{DisplayValue, FieldBinding};
use crate::error::{SettingsError, SettingsResult};
use crate::host::{DeviceCommand, PlatformInfo, ScreenRef};
use flowpilot_params::Params;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Identifier of a settings panel
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PanelName(Cow<'static, str>);

impl PanelName {
    pub const DEVICE: PanelName = PanelName::from_static("device");
    pub const SOFTWARE: PanelName = PanelName::from_static("software");
    pub const TOGGLES: PanelName = PanelName::from_static("toggles");

    pub const fn from_static(name: &'static str) -> Self {
        PanelName(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        PanelName(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelName {
    fn from(name: &str) -> Self {
        PanelName::new(name)
    }
}

/// Visual weight of an action button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonStyle {
    #[default]
    Normal,
    /// Destructive or irreversible actions
    Critical,
}

/// What an action row does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Navigate(ScreenRef),
    Device(DeviceCommand),
}

/// Source of a non-persisted info row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoSource {
    /// Host platform name
    Platform,
    Fixed(String),
}

/// Content of one row
#[derive(Debug, Clone)]
pub enum RowContent {
    Field(FieldBinding),
    Action {
        caption: String,
        style: ButtonStyle,
        command: Command,
    },
    Info(InfoSource),
}

/// Decides whether a row is part of the panel for a given build
pub type RowPredicate = Rc<dyn Fn(&BuildContext<'_>) -> bool>;

/// One declared row of a panel.
#[derive(Clone)]
pub struct RowSpec {
    pub label: String,
    pub content: RowContent,
    pub include_when: Option<RowPredicate>,
    pub divider: bool,
}

impl RowSpec {
    fn new(label: impl Into<String>, content: RowContent) -> Self {
        Self {
            label: label.into(),
            content,
            include_when: None,
            divider: true,
        }
    }

    /// Row backed by a parameter binding
    pub fn field(label: impl Into<String>, binding: FieldBinding) -> Self {
        Self::new(label, RowContent::Field(binding))
    }

    /// Row with a command button
    pub fn action(label: impl Into<String>, caption: impl Into<String>, command: Command) -> Self {
        Self::new(
            label,
            RowContent::Action {
                caption: caption.into(),
                style: ButtonStyle::Normal,
                command,
            },
        )
    }

    /// Row with read-only text that is not a parameter
    pub fn info(label: impl Into<String>, source: InfoSource) -> Self {
        Self::new(label, RowContent::Info(source))
    }

    /// Mark an action row as critical
    pub fn critical(mut self) -> Self {
        if let RowContent::Action { style, .. } = &mut self.content {
            *style = ButtonStyle::Critical;
        }
        self
    }

    /// Include the row only when `predicate` holds at build time
    pub fn when(mut self, predicate: impl Fn(&BuildContext<'_>) -> bool + 'static) -> Self {
        self.include_when = Some(Rc::new(predicate));
        self
    }

    pub fn without_divider(mut self) -> Self {
        self.divider = false;
        self
    }

    /// The binding of a field row
    pub fn binding(&self) -> Option<&FieldBinding> {
        match &self.content {
            RowContent::Field(binding) => Some(binding),
            _ => None,
        }
    }

    fn included(&self, ctx: &BuildContext<'_>) -> bool {
        self.include_when.as_ref().map_or(true, |p| p(ctx))
    }
}

impl fmt::Debug for RowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowSpec")
            .field("label", &self.label)
            .field("content", &self.content)
            .field("conditional", &self.include_when.is_some())
            .field("divider", &self.divider)
            .finish()
    }
}

/// Declarative description of one panel
#[derive(Debug, Clone)]
pub struct PanelDescriptor {
    pub name: PanelName,
    pub title: String,
    pub rows: Vec<RowSpec>,
}

impl PanelDescriptor {
    pub fn new(name: PanelName, title: impl Into<String>) -> Self {
        Self {
            name,
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, row: RowSpec) -> Self {
        self.rows.push(row);
        self
    }
}

/// Hardware facts that do not live in the parameter store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Environment {
    pub has_wide_camera: bool,
}

/// Everything a panel build reads from
pub struct BuildContext<'a> {
    pub params: &'a Params,
    pub env: Environment,
    pub platform: &'a dyn PlatformInfo,
}

/// Rendered value of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowValue {
    Text(String),
    Toggle(bool),
    Button { caption: String, style: ButtonStyle },
}

/// One built row, ready to draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelRow {
    pub label: String,
    pub value: RowValue,
    pub divider: bool,
    /// Index of the declaring row in the descriptor
    pub spec_index: usize,
}

/// A panel built from the store at one point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub name: PanelName,
    pub title: String,
    pub rows: Vec<PanelRow>,
}

impl Panel {
    /// Find a row by label
    pub fn row(&self, label: &str) -> Option<&PanelRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }
}

/// Registered panels, in registration order.
#[derive(Debug, Default)]
pub struct PanelRegistry {
    panels: Vec<PanelDescriptor>,
    /// Writable key -> label of the owning row
    owners: HashMap<String, String>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a panel.
    ///
    /// Fails when the name is taken or when a writable binding targets a key
    /// that another writable binding already owns.
    pub fn register(&mut self, descriptor: PanelDescriptor) -> SettingsResult<()> {
        if self.contains(&descriptor.name) {
            return Err(SettingsError::DuplicatePanel(descriptor.name.to_string()));
        }

        let mut claimed: HashMap<String, String> = HashMap::new();
        for row in &descriptor.rows {
            let Some(binding) = row.binding().filter(|b| b.is_writable()) else {
                continue;
            };
            let key = binding.key().to_string();
            if let Some(owner) = self.owners.get(&key).or_else(|| claimed.get(&key)) {
                return Err(SettingsError::DuplicateBinding {
                    key,
                    owner: owner.clone(),
                    label: row.label.clone(),
                });
            }
            claimed.insert(key, row.label.clone());
        }

        tracing::debug!(
            "Registered panel {} ({} rows)",
            descriptor.name,
            descriptor.rows.len()
        );
        self.owners.extend(claimed);
        self.panels.push(descriptor);
        Ok(())
    }

    pub fn descriptor(&self, name: &PanelName) -> Option<&PanelDescriptor> {
        self.panels.iter().find(|p| &p.name == name)
    }

    pub fn contains(&self, name: &PanelName) -> bool {
        self.descriptor(name).is_some()
    }

    /// Panel names in registration order
    pub fn names(&self) -> Vec<PanelName> {
        self.panels.iter().map(|p| p.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Build a panel from the current store state. Deterministic for a given
    /// store state and environment.
    pub fn build_panel(&self, name: &PanelName, ctx: &BuildContext<'_>) -> SettingsResult<Panel> {
        let descriptor = self
            .descriptor(name)
            .ok_or_else(|| SettingsError::InvalidPanelName(name.to_string()))?;

        let rows = descriptor
            .rows
            .iter()
            .enumerate()
            .filter(|(_, spec)| spec.included(ctx))
            .map(|(spec_index, spec)| PanelRow {
                label: spec.label.clone(),
                value: build_value(spec, ctx),
                divider: spec.divider,
                spec_index,
            })
            .collect::<Vec<_>>();

        tracing::debug!("Built panel {} with {} rows", name, rows.len());
        Ok(Panel {
            name: descriptor.name.clone(),
            title: descriptor.title.clone(),
            rows,
        })
    }
}

fn build_value(spec: &RowSpec, ctx: &BuildContext<'_>) -> RowValue {
    match &spec.content {
        RowContent::Field(binding) => match binding.initialize(ctx.params) {
            DisplayValue::Toggle(checked) => RowValue::Toggle(checked),
            DisplayValue::Text(text) => RowValue::Text(text),
            DisplayValue::Button(caption) => RowValue::Button {
                caption,
                style: ButtonStyle::Normal,
            },
        },
        RowContent::Action { caption, style, .. } => RowValue::Button {
            caption: caption.clone(),
            style: *style,
        },
        RowContent::Info(InfoSource::Platform) => RowValue::Text(ctx.platform.platform_name()),
        RowContent::Info(InfoSource::Fixed(text)) => RowValue::Text(text.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::FixedPlatform;
    use flowpilot_params::{keys, MemoryStore, ParamKey};

    fn sample() -> PanelDescriptor {
        PanelDescriptor::new(PanelName::new("sample"), "Sample")
            .row(RowSpec::field(
                "Dongle ID",
                FieldBinding::display(keys::DONGLE_ID, "N/A"),
            ))
            .row(RowSpec::field("Metric", FieldBinding::toggle(keys::IS_METRIC, false)))
            .row(
                RowSpec::info("Only with wide", InfoSource::Fixed("wide".into()))
                    .when(|ctx| ctx.env.has_wide_camera),
            )
            .row(RowSpec::info("Device Type", InfoSource::Platform).without_divider())
    }

    #[test]
    fn test_build_panel_reads_store_and_filters_rows() {
        let params = Params::new(MemoryStore::new());
        let platform = FixedPlatform("Android".into());
        let mut registry = PanelRegistry::new();
        registry.register(sample()).unwrap();

        let ctx = BuildContext {
            params: &params,
            env: Environment::default(),
            platform: &platform,
        };
        let panel = registry.build_panel(&PanelName::new("sample"), &ctx).unwrap();
        assert_eq!(panel.labels(), vec!["Dongle ID", "Metric", "Device Type"]);
        assert_eq!(panel.rows[0].value, RowValue::Text("N/A".into()));
        assert_eq!(panel.rows[1].value, RowValue::Toggle(false));
        assert_eq!(panel.rows[2].value, RowValue::Text("Android".into()));
        assert_eq!(panel.rows[2].spec_index, 3);
        assert!(!panel.rows[2].divider);

        let ctx = BuildContext {
            params: &params,
            env: Environment {
                has_wide_camera: true,
            },
            platform: &platform,
        };
        let panel = registry.build_panel(&PanelName::new("sample"), &ctx).unwrap();
        assert_eq!(panel.rows.len(), 4);
        // Building never writes
        assert!(!params.exists("DongleId"));
        assert!(!params.exists("IsMetric"));
    }

    #[test]
    fn test_unknown_panel() {
        let params = Params::new(MemoryStore::new());
        let platform = FixedPlatform("Linux".into());
        let registry = PanelRegistry::new();
        let ctx = BuildContext {
            params: &params,
            env: Environment::default(),
            platform: &platform,
        };
        assert!(matches!(
            registry.build_panel(&PanelName::new("network"), &ctx),
            Err(SettingsError::InvalidPanelName(name)) if name == "network"
        ));
    }

    #[test]
    fn test_duplicate_panel_rejected() {
        let mut registry = PanelRegistry::new();
        registry.register(sample()).unwrap();
        assert!(matches!(
            registry.register(PanelDescriptor::new(PanelName::new("sample"), "Again")),
            Err(SettingsError::DuplicatePanel(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_writable_key_has_one_owner() {
        let mut registry = PanelRegistry::new();
        registry.register(sample()).unwrap();

        let clash = PanelDescriptor::new(PanelName::new("units"), "Units").row(RowSpec::field(
            "Metric Units",
            FieldBinding::toggle(keys::IS_METRIC, true),
        ));
        let err = registry.register(clash).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::DuplicateBinding { ref key, ref owner, ref label }
                if key == "IsMetric" && owner == "Metric" && label == "Metric Units"
        ));
        assert!(!registry.contains(&PanelName::new("units")));

        // Read-only displays of an owned key are fine
        let mirror = PanelDescriptor::new(PanelName::new("mirror"), "Mirror").row(
            RowSpec::field("Metric?", FieldBinding::display(keys::IS_METRIC, "0")),
        );
        registry.register(mirror).unwrap();
    }

    #[test]
    fn test_duplicate_within_one_panel() {
        let key = ParamKey::from_static("Twice");
        let panel = PanelDescriptor::new(PanelName::new("twice"), "Twice")
            .row(RowSpec::field("A", FieldBinding::toggle(key.clone(), false)))
            .row(RowSpec::field("B", FieldBinding::trigger(key, "GO")));
        let mut registry = PanelRegistry::new();
        assert!(matches!(
            registry.register(panel),
            Err(SettingsError::DuplicateBinding { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_critical_style() {
        let row = RowSpec::action("Power Off", "POWER OFF", Command::Device(DeviceCommand::PowerOff))
            .critical();
        assert!(matches!(
            row.content,
            RowContent::Action {
                style: ButtonStyle::Critical,
                ..
            }
        ));
    }
}
