//! Gateway configuration
//!
//! Built once at process entry from an optional TOML file and command-line
//! overrides, then handed to the server. Nothing reads configuration after
//! startup.
//!
//! ```toml
//! [git]
//! program = "/usr/bin/git"
//! timeout_secs = 120
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub git: GitConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Executable used for every tool, resolved on `PATH` if not absolute.
    pub program: String,
    /// Upper bound on a single command. Absent means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    /// Parse configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Apply command-line values on top of whatever the file said.
    pub fn with_overrides(mut self, program: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(program) = program {
            self.git.program = program;
        }
        if timeout_secs.is_some() {
            self.git.timeout_secs = timeout_secs;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.git.program.trim().is_empty() {
            return Err(Error::InvalidConfig {
                message: "git program must not be empty".to_string(),
            });
        }
        if self.git.timeout_secs == Some(0) {
            return Err(Error::InvalidConfig {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.git.timeout_secs.map(Duration::from_secs)
    }
}
