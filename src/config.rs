//! Generator configuration.
//!
//! Values come from an optional JSON file and are then overridden by CLI
//! flags. Every field has a default, so an empty object is a valid file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::environment::{Environment, Host, HostProbe, DEFAULT_BROWSER_PREFIX};
use crate::error::{GeneratorError, Result};

pub const DEFAULT_DIFFERENTIAL_ONE_IN: u32 = 5;
pub const DEFAULT_BROWSER_ZEAL_ONE_IN: u32 = 100;
pub const DEFAULT_FEATURE_FLAG: &str = "isAsmJSCompilationAvailable";

/// Which host to generate for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostSelection {
    /// Decide with a [`HostProbe`].
    #[default]
    Auto,
    Shell,
    Browser,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub host: HostSelection,
    /// Namespace prepended to testing-function names in the browser.
    pub browser_prefix: String,
    /// In the shell, one reference in this many is wrapped in the
    /// feature-flag conditional.
    pub differential_one_in: u32,
    /// In the browser, the gczeal entry only fires once in this many picks.
    pub browser_zeal_one_in: u32,
    /// Zero-argument host function whose result gates the conditional wrapper.
    pub feature_flag: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: HostSelection::Auto,
            browser_prefix: DEFAULT_BROWSER_PREFIX.to_string(),
            differential_one_in: DEFAULT_DIFFERENTIAL_ONE_IN,
            browser_zeal_one_in: DEFAULT_BROWSER_ZEAL_ONE_IN,
            feature_flag: DEFAULT_FEATURE_FLAG.to_string(),
        }
    }
}

impl Config {
    /// Read a JSON config file. The result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.differential_one_in == 0 {
            return Err(GeneratorError::InvalidConfig(
                "differential_one_in must be at least 1".to_string(),
            ));
        }
        if self.browser_zeal_one_in == 0 {
            return Err(GeneratorError::InvalidConfig(
                "browser_zeal_one_in must be at least 1".to_string(),
            ));
        }
        if self.browser_prefix.is_empty() {
            return Err(GeneratorError::InvalidConfig(
                "browser_prefix must not be empty".to_string(),
            ));
        }
        if !is_identifier(&self.feature_flag) {
            return Err(GeneratorError::InvalidConfig(format!(
                "feature_flag must be a plain identifier, got '{}'",
                self.feature_flag
            )));
        }
        Ok(())
    }

    /// Resolve the host. `probe` is only consulted for [`HostSelection::Auto`].
    pub fn environment(&self, probe: &(impl HostProbe + ?Sized)) -> Environment {
        match self.host {
            HostSelection::Auto => Environment::resolve(probe, &self.browser_prefix),
            HostSelection::Shell => Environment::for_host(Host::Shell, &self.browser_prefix),
            HostSelection::Browser => Environment::for_host(Host::Browser, &self.browser_prefix),
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
