use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    // Application lifecycle
    Starting,
    Ready { addr: String, default_target: String },
    Shutdown,

    // Configuration
    ConfigLoading { path: String },
    ConfigLoaded { default_target: String, timeout_ms: u64 },
    ConfigCreated { path: String },
    ConfigMigrated { added_fields: Vec<String> },
    ConfigError { error: String },

    // Probes
    ProbeUp { target: String, latency_ms: Option<f64> },
    ProbeDown { target: String, error: String },

    // Errors
    Error { context: String, error: String },
}

pub struct EventBus {
    pub(super) silent_mode: bool,
}
