//! Configuration loading and validation for `.changeling.yaml` files.
use log::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{ChangelingError, Result};

pub mod category;

pub use category::{CategoryRule, LabelConfig, LabelSpec};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = ".changeling.yaml";
/// Default directory holding pending changelog fragments.
pub const DEFAULT_FRAGMENT_DIRECTORY: &str = "changelog.d";

/// Root configuration structure for `.changeling.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing one changelog fragment per pending pull request.
    #[serde(default = "default_fragment_directory", alias = "snippets_dir")]
    pub fragment_directory: PathBuf,
    /// Prefix stripped from git tags before parsing them as versions.
    #[serde(default)]
    pub tag_prefix: String,
    /// Ordered category rules. The first rule whose label a pull request
    /// carries decides its category.
    pub categories: Vec<CategoryRule>,
}

fn default_fragment_directory() -> PathBuf {
    PathBuf::from(DEFAULT_FRAGMENT_DIRECTORY)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fragment_directory: default_fragment_directory(),
            tag_prefix: "".into(),
            categories: vec![],
        }
    }
}

impl Config {
    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the configuration file at `path`.
    pub async fn load(path: &Path) -> Result<Self> {
        info!("loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ChangelingError::invalid_config(
                path.display().to_string(),
                format!("unable to read file: {e}"),
            )
        })?;
        let config = Self::from_yaml(&content)?;
        debug!("loaded configuration: {:#?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fragment_directory.as_os_str().is_empty() {
            return Err(ChangelingError::invalid_config(
                "fragment_directory",
                "must not be empty",
            ));
        }

        if self.categories.is_empty() {
            warn!("no changelog categories configured");
        }

        for (i, rule) in self.categories.iter().enumerate() {
            rule.validate(&format!("categories[{i}]"))?;
        }

        Ok(())
    }
}
