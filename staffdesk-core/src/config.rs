//! Controller tuning configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Page size and batch sizes used by every entity page.
///
/// Loaded from the `[controller]` table of the CLI config or any TOML document of
/// the same shape. Missing keys fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Records per page on first load
    pub page_size: u32,
    /// Page size used when collecting every id matching the filters
    pub resolve_batch_size: u32,
    /// Deletes issued concurrently per round
    pub delete_batch_size: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            resolve_batch_size: 100,
            delete_batch_size: 10,
        }
    }
}

impl ControllerConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(raw: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| CoreError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file; a missing file yields the defaults.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            log::debug!("No controller config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::ConfigError(format!("read {}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.page_size == 0 {
            return Err(CoreError::ConfigError(
                "page_size must be greater than zero".to_string(),
            ));
        }
        if self.resolve_batch_size == 0 {
            return Err(CoreError::ConfigError(
                "resolve_batch_size must be greater than zero".to_string(),
            ));
        }
        if self.delete_batch_size == 0 {
            return Err(CoreError::ConfigError(
                "delete_batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
