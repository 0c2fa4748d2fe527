use craftwatch_models::{Edition, TargetDefaults};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "super::defaults::server_settings")]
    pub server: ServerSettings,
    #[serde(default = "super::defaults::dashboard_settings")]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "super::defaults::host")]
    pub host: String,
    #[serde(default = "super::defaults::port")]
    pub port: u16,
    #[serde(default = "super::defaults::tcp_nodelay")]
    pub tcp_nodelay: bool,
    #[serde(default = "super::defaults::timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "super::defaults::max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "super::defaults::allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "super::defaults::enable_compression")]
    pub enable_compression: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DashboardSettings {
    #[serde(default = "super::defaults::default_host")]
    pub default_host: String,
    #[serde(default = "super::defaults::default_edition")]
    pub default_edition: Edition,
    #[serde(default = "super::defaults::probe_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "super::defaults::timeout_control")]
    pub timeout_control: bool,
    #[serde(default = "super::defaults::auto_refresh")]
    pub auto_refresh: bool,
    #[serde(default = "super::defaults::refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: super::defaults::server_settings(),
            dashboard: super::defaults::dashboard_settings(),
        }
    }
}

impl DashboardSettings {
    pub fn target_defaults(&self) -> TargetDefaults {
        TargetDefaults::new(self.default_host.trim(), self.default_edition)
    }
}
