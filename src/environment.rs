//! Host detection.
//!
//! Generated text targets one of two hosts: the engine's standalone shell,
//! where testing functions are plain globals, or a browser build, where they
//! hang off a privileged namespace object. The host is resolved once, when the
//! generator is built, and every later decision reads the resulting
//! [`Environment`] value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Global whose presence marks a browser host.
pub const BROWSER_MARKER: &str = "window";

/// Namespace testing functions live under in the browser.
pub const DEFAULT_BROWSER_PREFIX: &str = "fuzzPriv.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Host {
    /// Embedded command-line runtime.
    Shell,
    /// Browser-hosted environment.
    Browser,
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::Shell => f.write_str("shell"),
            Host::Browser => f.write_str("browser"),
        }
    }
}

/// Capability check against the target host's global object.
pub trait HostProbe {
    fn has_global(&self, name: &str) -> bool;
}

impl HostProbe for [&str] {
    fn has_global(&self, name: &str) -> bool {
        self.iter().any(|g| *g == name)
    }
}

impl HostProbe for Vec<String> {
    fn has_global(&self, name: &str) -> bool {
        self.iter().any(|g| g == name)
    }
}

/// Probe fed by a comma-separated list of global names, typically taken from
/// the `TESTING_FUNCTIONS_HOST_GLOBALS` environment variable.
#[derive(Debug, Clone, Default)]
pub struct AdvertisedGlobals(Vec<String>);

impl AdvertisedGlobals {
    pub const ENV_VAR: &'static str = "TESTING_FUNCTIONS_HOST_GLOBALS";

    pub fn parse(list: &str) -> Self {
        Self(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn from_env() -> Self {
        std::env::var(Self::ENV_VAR)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }
}

impl HostProbe for AdvertisedGlobals {
    fn has_global(&self, name: &str) -> bool {
        self.0.has_global(name)
    }
}

/// Resolved host plus the prefix used to reach testing functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    host: Host,
    access_prefix: String,
}

impl Environment {
    pub fn shell() -> Self {
        Self {
            host: Host::Shell,
            access_prefix: String::new(),
        }
    }

    pub fn browser(prefix: impl Into<String>) -> Self {
        Self {
            host: Host::Browser,
            access_prefix: prefix.into(),
        }
    }

    pub fn for_host(host: Host, browser_prefix: &str) -> Self {
        match host {
            Host::Shell => Self::shell(),
            Host::Browser => Self::browser(browser_prefix),
        }
    }

    /// Probe the host once for the browser marker.
    pub fn resolve(probe: &(impl HostProbe + ?Sized), browser_prefix: &str) -> Self {
        let env = if probe.has_global(BROWSER_MARKER) {
            Self::browser(browser_prefix)
        } else {
            Self::shell()
        };
        tracing::debug!(host = %env.host, prefix = %env.access_prefix, "resolved host environment");
        env
    }

    pub fn host(&self) -> Host {
        self.host
    }

    pub fn is_hosted(&self) -> bool {
        self.host == Host::Browser
    }

    /// Empty in the shell.
    pub fn access_prefix(&self) -> &str {
        &self.access_prefix
    }

    /// Qualify a testing-function name for this host.
    pub fn apply_access_prefix(&self, name: &str) -> String {
        match self.host {
            Host::Browser => format!("{}{}", self.access_prefix, name),
            Host::Shell => name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn marker_selects_browser() {
        let globals: &[&str] = &["document", "window"];
        let env = Environment::resolve(globals, DEFAULT_BROWSER_PREFIX);
        assert!(env.is_hosted());
        assert_eq!(env.access_prefix(), "fuzzPriv.");
    }

    #[test]
    fn missing_marker_selects_shell() {
        let globals: &[&str] = &["print", "gc"];
        let env = Environment::resolve(globals, DEFAULT_BROWSER_PREFIX);
        assert_eq!(env.host(), Host::Shell);
        assert_eq!(env.access_prefix(), "");
    }

    #[test]
    fn advertised_globals_parse_loosely() {
        let probe = AdvertisedGlobals::parse(" self , window,,");
        assert!(probe.has_global("window"));
        assert!(probe.has_global("self"));
        assert!(!probe.has_global(""));
    }

    proptest! {
        #[test]
        fn shell_leaves_names_untouched(name in "[A-Za-z_][A-Za-z0-9_]{0,24}") {
            prop_assert_eq!(Environment::shell().apply_access_prefix(&name), name);
        }

        #[test]
        fn browser_prepends_prefix(
            prefix in "[A-Za-z_][A-Za-z0-9_]{0,8}\\.",
            name in "[A-Za-z_][A-Za-z0-9_]{0,24}",
        ) {
            let env = Environment::browser(prefix.clone());
            prop_assert_eq!(env.apply_access_prefix(&name), format!("{prefix}{name}"));
        }
    }
}
