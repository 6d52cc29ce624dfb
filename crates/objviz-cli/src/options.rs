//! Rendering options shared by the command line and library callers.
//!
//! Every flag overrides the matching key of a loaded `DiagramConfig`; flags
//! that are absent leave the config untouched.

use clap::Args;

use objviz_core::{Error, Result};
use objviz_dot::{DiagramConfig, Direction};

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Layout direction: TB, LR, BT or RL
    #[arg(long, value_name = "DIR")]
    pub direction: Option<Direction>,

    /// Draw objects of this class inline, like a primitive (repeatable)
    #[arg(long = "primitive", value_name = "CLASS", action = clap::ArgAction::Append)]
    pub treat_as_primitive: Vec<String>,

    /// Leave out fields with this name (repeatable)
    #[arg(long = "ignore-field", value_name = "FIELD", action = clap::ArgAction::Append)]
    pub ignore_fields: Vec<String>,

    /// Show inline field values without their names
    #[arg(long = "hide-field-names")]
    pub hide_field_names: bool,

    /// Skip fields whose value is null
    #[arg(long = "ignore-null-fields")]
    pub ignore_null_fields: bool,

    /// Skip non-public fields
    #[arg(long = "ignore-private-fields")]
    pub ignore_private_fields: bool,

    /// Extra DOT attributes for edges of a field, as FIELD=ATTRS (repeatable)
    #[arg(long = "field-attr", value_name = "FIELD=ATTRS", action = clap::ArgAction::Append)]
    pub field_attributes: Vec<String>,

    /// Extra DOT attributes for nodes of a class, as CLASS=ATTRS (repeatable)
    #[arg(long = "class-attr", value_name = "CLASS=ATTRS", action = clap::ArgAction::Append)]
    pub class_attributes: Vec<String>,
}

impl RenderArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn with_field_attribute(mut self, spec: impl Into<String>) -> Self {
        self.field_attributes.push(spec.into());
        self
    }

    /// Layer these flags over `config`.
    pub fn apply(&self, config: &mut DiagramConfig) -> Result<()> {
        if let Some(direction) = self.direction {
            config.direction = direction;
        }
        config
            .treat_as_primitive
            .extend(self.treat_as_primitive.iter().cloned());
        config.ignore_fields.extend(self.ignore_fields.iter().cloned());
        if self.hide_field_names {
            config.show_field_names = false;
        }
        config.ignore_null_fields |= self.ignore_null_fields;
        config.ignore_private_fields |= self.ignore_private_fields;

        for spec in &self.field_attributes {
            let (field, attrs) = split_assignment(spec, "--field-attr")?;
            config.field_attributes.insert(field, attrs);
        }
        for spec in &self.class_attributes {
            let (class, attrs) = split_assignment(spec, "--class-attr")?;
            config.class_attributes.insert(class, attrs);
        }
        Ok(())
    }
}

fn split_assignment(spec: &str, flag: &'static str) -> Result<(String, String)> {
    match spec.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(Error::invalid_argument(format!("expected NAME=ATTRS, got '{spec}'"))
            .with_context("flag", flag)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use objviz_core::ErrorKind;

    #[test]
    fn flags_override_config() {
        let mut config = DiagramConfig::default();
        config.treat_as_primitive.push("String".to_string());

        let args = RenderArgs {
            treat_as_primitive: vec!["Integer".to_string()],
            hide_field_names: true,
            ignore_null_fields: true,
            ..RenderArgs::new()
        }
        .with_direction(Direction::LR)
        .with_field_attribute("left=color=red,fontcolor=red");
        args.apply(&mut config).unwrap();

        assert_eq!(config.direction, Direction::LR);
        assert_eq!(config.treat_as_primitive, ["String", "Integer"]);
        assert!(!config.show_field_names);
        assert!(config.ignore_null_fields);
        assert!(!config.ignore_private_fields);
        assert_eq!(config.field_attributes["left"], "color=red,fontcolor=red");
    }

    #[test]
    fn absent_flags_keep_config() {
        let mut config = DiagramConfig {
            direction: Direction::BT,
            show_field_names: false,
            ..DiagramConfig::default()
        };
        RenderArgs::new().apply(&mut config).unwrap();
        assert_eq!(config.direction, Direction::BT);
        assert!(!config.show_field_names);
    }

    #[test]
    fn malformed_attribute_is_rejected() {
        let mut config = DiagramConfig::default();
        let err = RenderArgs::new()
            .with_field_attribute("=color=red")
            .apply(&mut config)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("--field-attr"));
    }
}
