//! Changelog category rules.
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::{ChangelingError, Result, version::BumpLevel};

static LABEL_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{6}$").unwrap());

/// Full description of a repository label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LabelSpec {
    /// Label name as it appears on pull requests.
    pub name: String,
    /// Six hexadecimal digits, without a leading `#`.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A category label, given either as a bare name or with color and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum LabelConfig {
    Name(String),
    Spec(LabelSpec),
}

impl LabelConfig {
    pub fn name(&self) -> &str {
        match self {
            LabelConfig::Name(name) => name,
            LabelConfig::Spec(spec) => &spec.name,
        }
    }

    /// Normalize into a [`LabelSpec`] with unset color and description for
    /// the bare-name form.
    pub fn to_spec(&self) -> LabelSpec {
        match self {
            LabelConfig::Name(name) => LabelSpec {
                name: name.clone(),
                color: None,
                description: None,
            },
            LabelConfig::Spec(spec) => spec.clone(),
        }
    }
}

/// Maps a pull request label to a changelog category and a bump level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CategoryRule {
    /// Heading the snippet is filed under.
    pub name: String,
    #[serde(default)]
    pub bump: BumpLevel,
    #[serde(default)]
    pub label: Option<LabelConfig>,
}

impl CategoryRule {
    pub fn new(
        name: impl Into<String>,
        bump: BumpLevel,
        label: Option<&str>,
    ) -> Self {
        Self {
            name: name.into(),
            bump,
            label: label.map(|l| LabelConfig::Name(l.to_string())),
        }
    }

    pub fn label_name(&self) -> Option<&str> {
        self.label.as_ref().map(LabelConfig::name)
    }

    /// Validate this rule. `field` is the rule's path within the config,
    /// e.g. `categories[2]`.
    pub fn validate(&self, field: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ChangelingError::invalid_config(
                format!("{field}.name"),
                "must not be empty",
            ));
        }

        let Some(label) = &self.label else {
            return Ok(());
        };

        if label.name().trim().is_empty() {
            let path = match label {
                LabelConfig::Name(_) => format!("{field}.label"),
                LabelConfig::Spec(_) => format!("{field}.label.name"),
            };
            return Err(ChangelingError::invalid_config(
                path,
                "must not be empty",
            ));
        }

        if let LabelConfig::Spec(spec) = label
            && let Some(color) = &spec.color
            && !LABEL_COLOR_REGEX.is_match(color)
        {
            return Err(ChangelingError::invalid_config(
                format!("{field}.label.color"),
                format!("{color:?} must be exactly six hexadecimal digits"),
            ));
        }

        Ok(())
    }
}
