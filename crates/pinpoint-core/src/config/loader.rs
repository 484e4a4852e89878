use super::schema::PinpointConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./pinpoint.yaml
    /// 2. ~/.pinpoint/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<PinpointConfig, ConfigError> {
        let local_config = PathBuf::from("./pinpoint.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".pinpoint").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(PinpointConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<PinpointConfig, ConfigError> {
        debug!("Loading config from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        // An empty file means "all defaults".
        if content.trim().is_empty() {
            return Ok(PinpointConfig::default());
        }
        let config: PinpointConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}
