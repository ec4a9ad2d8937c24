//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::JiffyConfig;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV: &str = "JIFFY_CONFIG";

/// Production implementation of `ConfigStore` reading `~/.jiffyirc` as YAML.
pub struct YamlConfigStore {
    path: PathBuf,
}

impl YamlConfigStore {
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store at `$JIFFY_CONFIG`, falling back to `~/.jiffyirc`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            return Ok(Self::at(PathBuf::from(val)));
        }
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::at(home.join(".jiffyirc")))
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<JiffyConfig> {
        let path = &self.path;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file");
            return Ok(JiffyConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(JiffyConfig::default());
        }
        let config: JiffyConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), profiles = config.0.len(), "config loaded");
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        Ok(self.path.clone())
    }
}
