use serde::{Deserialize, Serialize};

use crate::common::types::AnyResult;
use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
  #[serde(default)]
  pub server: ServerConfig,
  pub logging: Option<LoggingConfig>,
  #[serde(default)]
  pub youtube: YouTubeConfig,
  #[serde(default)]
  pub transcoder: TranscoderConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

impl Config {
  pub fn load() -> AnyResult<Self> {
    let config_path = if std::path::Path::new("config.toml").exists() {
      Some("config.toml")
    } else if std::path::Path::new("config.default.toml").exists() {
      Some("config.default.toml")
    } else {
      None
    };

    let mut config = match config_path {
      Some(path) => {
        crate::log_println!("Loading configuration from: {}", path);
        Self::parse(&std::fs::read_to_string(path)?)?
      }
      None => {
        crate::log_println!("No config.toml found, using built-in defaults");
        Self::default()
      }
    };

    config.apply_env(std::env::var("PORT").ok().as_deref())?;
    Ok(config)
  }

  pub fn parse(config_str: &str) -> AnyResult<Self> {
    Ok(toml::from_str(config_str)?)
  }

  /// `PORT` wins over the configured port, as on most PaaS hosts.
  pub fn apply_env(&mut self, port: Option<&str>) -> AnyResult<()> {
    if let Some(port) = port.map(str::trim).filter(|p| !p.is_empty()) {
      self.server.port = port
        .parse()
        .map_err(|e| format!("invalid PORT value '{}': {}", port, e))?;
    }
    Ok(())
  }
}
