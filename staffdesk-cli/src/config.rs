//! Config file loading

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use staffdesk_core::ControllerConfig;
use staffdesk_transport::HttpTransportConfig;

/// `staffdesk.toml`
///
/// ```toml
/// [server]
/// base_url = "https://api.example.com/v1/"
/// tenant = "north-clinic"
///
/// [controller]
/// delete_batch_size = 5
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: Option<HttpTransportConfig>,
    #[serde(default)]
    pub controller: ControllerConfig,
}

impl CliConfig {
    /// Read `path`; a missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parse config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.controller.validate()?;
        Ok(config)
    }

    /// Server settings with command line overrides applied.
    pub fn transport_config(
        &self,
        base_url: Option<&str>,
        token: Option<&str>,
    ) -> Result<HttpTransportConfig> {
        let mut server = match (self.server.clone(), base_url) {
            (Some(mut server), Some(url)) => {
                server.base_url = url.to_string();
                server
            }
            (Some(server), None) => server,
            (None, Some(url)) => HttpTransportConfig::new(url),
            (None, None) => {
                return Err(anyhow!(
                    "no server configured; set [server] base_url in the config file or pass --base-url"
                ))
            }
        };
        if let Some(token) = token {
            server.bearer_token = Some(token.to_string());
        }
        Ok(server)
    }
}
