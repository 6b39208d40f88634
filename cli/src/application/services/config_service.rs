//! Application service — configuration use-cases.

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{SvcConfig, validate_config};

/// Load and validate configuration.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub fn load_config(store: &impl ConfigStore) -> Result<SvcConfig> {
    let config = store.load()?;
    validate_config(&config).with_context(|| match store.path() {
        Ok(path) => format!("invalid configuration in {}", path.display()),
        Err(_) => "invalid configuration".to_string(),
    })?;
    Ok(config)
}
