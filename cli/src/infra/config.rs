//! Infrastructure implementation of the `ConfigStore` port.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::application::ports::ConfigStore;
use crate::domain::config::SvcConfig;

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "svc.yaml";

/// Production implementation of `ConfigStore` that reads a YAML file.
///
/// Lookup order: `$SVC_CONFIG`, `./svc.yaml`, `<config dir>/svc/config.yaml`.
#[derive(Default)]
pub struct YamlConfigStore {
    /// Working directory to search; the process cwd when `None`.
    pub base_dir: Option<PathBuf>,
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SvcConfig> {
        let path = self.path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(SvcConfig::default());
        }
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(SvcConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }

    fn path(&self) -> Result<PathBuf> {
        if let Ok(val) = std::env::var("SVC_CONFIG") {
            return Ok(PathBuf::from(val));
        }
        let local = match &self.base_dir {
            Some(dir) => dir.join(LOCAL_CONFIG),
            None => std::env::current_dir()
                .context("cannot determine working directory")?
                .join(LOCAL_CONFIG),
        };
        if local.exists() {
            return Ok(local);
        }
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(config_dir.join("svc").join("config.yaml"))
    }
}
