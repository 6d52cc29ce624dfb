//! Diagram configuration.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use strum_macros::{Display, EnumString};

use objviz_core::{Error, FilterPolicy, Result};

/// Layout direction passed to Graphviz as `rankdir`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(ascii_case_insensitive)]
pub enum Direction {
    /// Top to bottom
    #[default]
    TB,
    /// Left to right
    LR,
    /// Bottom to top
    BT,
    /// Right to left
    RL,
}

/// Options controlling what is drawn and how.
///
/// Loadable from TOML; every key is optional:
///
/// ```toml
/// direction = "LR"
/// treat_as_primitive = ["String", "Integer"]
/// ignore_fields = ["hash"]
/// show_field_names = false
///
/// [field_attributes]
/// left = "color=red,fontcolor=red"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagramConfig {
    pub direction: Direction,
    pub treat_as_primitive: Vec<String>,
    pub ignore_fields: Vec<String>,
    /// Prefix inline field values with `name: `.
    pub show_field_names: bool,
    pub ignore_null_fields: bool,
    pub ignore_private_fields: bool,
    /// Fill objects that did not exist in the previous drawing.
    pub highlight_new_objects: bool,
    /// Color array cells whose content changed since the previous drawing.
    pub highlight_changed_elements: bool,
    /// Keep node labels (and the drawn null node) across drawings.
    pub retain_labels: bool,
    /// Edge attributes keyed by field name.
    pub field_attributes: BTreeMap<String, String>,
    /// Node attributes keyed by class name.
    pub class_attributes: BTreeMap<String, String>,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            treat_as_primitive: Vec::new(),
            ignore_fields: Vec::new(),
            show_field_names: true,
            ignore_null_fields: false,
            ignore_private_fields: false,
            highlight_new_objects: false,
            highlight_changed_elements: false,
            retain_labels: false,
            field_attributes: BTreeMap::new(),
            class_attributes: BTreeMap::new(),
        }
    }
}

impl DiagramConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|err| {
            Error::config_invalid(err.message().to_string())
                .with_operation("config::from_toml_str")
                .set_source(err)
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|err| Error::from(err).with_context("path", path.display().to_string()))?;
        Self::from_toml_str(&source)
            .map_err(|err| err.with_context("path", path.display().to_string()))
    }

    /// Field filtering rules for the graph walker.
    pub fn filter_policy(&self) -> FilterPolicy {
        FilterPolicy {
            treat_as_primitive: self.treat_as_primitive.iter().cloned().collect(),
            ignore_fields: self.ignore_fields.iter().cloned().collect(),
            ignore_private_fields: self.ignore_private_fields,
            ignore_null_fields: self.ignore_null_fields,
        }
    }
}
