//! Generation options and the `sourcedocs.toml` file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::AccessLevel;

/// Conventional name of the configuration file.
pub const CONFIG_FILE: &str = "sourcedocs.toml";

/// Options controlling a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// Minimum access level a declaration needs to be documented.
    pub min_acl: AccessLevel,

    /// Emit one file per category instead of one file per declaration.
    pub collapse: bool,

    /// Module name used in the index title.
    pub module_name: Option<String>,

    /// Add a contents list of members at the top of each page.
    pub table_of_contents: bool,

    /// Wrap member details in collapsible `<details>` blocks.
    pub collapsible: bool,

    /// Prefix added to every generated link.
    pub link_beginning: String,

    /// Suffix added to every generated link, `.md` by default.
    pub link_ending: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_acl: AccessLevel::Public,
            collapse: false,
            module_name: None,
            table_of_contents: false,
            collapsible: false,
            link_beginning: String::new(),
            link_ending: String::from(".md"),
        }
    }
}

impl Config {
    /// Load a config from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a config from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.link_ending.contains('/') {
            return Err(ConfigError::InvalidLinkEnding(self.link_ending.clone()));
        }
        Ok(())
    }

    /// Title of the root index document.
    pub fn index_title(&self) -> String {
        match self.module_name.as_deref() {
            Some(name) if !name.is_empty() => format!("{} Reference", name),
            _ => String::from("Reference Documentation"),
        }
    }
}
