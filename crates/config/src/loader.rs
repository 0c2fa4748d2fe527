use super::defaults::DEFAULT_CONFIG_TEMPLATE;
use super::errors::ConfigError;
use super::migration::migrate_config_if_needed;
use super::models::Config;
use craftwatch_models::{MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};
use std::path::Path;
use std::sync::Arc;

impl Config {
    /// Loads configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::from_file_with_events(path, None).await
    }

    /// Loads configuration from a file with optional event bus for notifications
    pub async fn from_file_with_events<P: AsRef<Path>>(
        path: P,
        events: Option<&Arc<craftwatch_events::EventBus>>,
    ) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        // Create default config if it doesn't exist
        if !path.exists() {
            create_default_config(path).await?;
        }

        migrate_config_if_needed(path, events).await?;

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.default_host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "dashboard.default_host must not be blank".to_string(),
            ));
        }
        if self.dashboard.timeout_ms < MIN_TIMEOUT_MS {
            return Err(ConfigError::InvalidConfig(format!(
                "dashboard.timeout_ms must be at least {} (got {})",
                MIN_TIMEOUT_MS, self.dashboard.timeout_ms
            )));
        }
        if self.dashboard.timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::InvalidConfig(format!(
                "dashboard.timeout_ms must be at most {} (got {})",
                MAX_TIMEOUT_MS, self.dashboard.timeout_ms
            )));
        }
        // A probe outliving the request timeout would surface as a 408
        if self.dashboard.timeout_ms >= self.server.timeout_secs.saturating_mul(1000) {
            return Err(ConfigError::InvalidConfig(format!(
                "dashboard.timeout_ms ({}) must be shorter than server.timeout_secs ({}s)",
                self.dashboard.timeout_ms, self.server.timeout_secs
            )));
        }
        if self.dashboard.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "dashboard.refresh_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.server.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidConfig(
                "server.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Creates a default configuration file
async fn create_default_config<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
    tokio::fs::write(path, DEFAULT_CONFIG_TEMPLATE).await?;
    Ok(())
}
