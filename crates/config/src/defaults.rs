//! Default values for configuration fields

use craftwatch_models::Edition;

pub fn host() -> String {
    "0.0.0.0".to_string()
}

pub fn port() -> u16 {
    8080
}

pub fn tcp_nodelay() -> bool {
    true
}

pub fn timeout_secs() -> u64 {
    30
}

pub fn max_concurrent_requests() -> usize {
    256
}

pub fn allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

pub fn enable_compression() -> bool {
    true
}

pub fn server_settings() -> super::models::ServerSettings {
    super::models::ServerSettings {
        host: host(),
        port: port(),
        tcp_nodelay: tcp_nodelay(),
        timeout_secs: timeout_secs(),
        max_concurrent_requests: max_concurrent_requests(),
        allowed_origins: allowed_origins(),
        enable_compression: enable_compression(),
    }
}

// Dashboard defaults
pub fn default_host() -> String {
    "xaprosmp.xyz".to_string()
}

pub fn default_edition() -> Edition {
    Edition::Java
}

pub fn probe_timeout_ms() -> u64 {
    2500
}

pub fn timeout_control() -> bool {
    false  // Fixed timeout, no UI field
}

pub fn auto_refresh() -> bool {
    true
}

pub fn refresh_interval_secs() -> u64 {
    30
}

pub fn dashboard_settings() -> super::models::DashboardSettings {
    super::models::DashboardSettings {
        default_host: default_host(),
        default_edition: default_edition(),
        timeout_ms: probe_timeout_ms(),
        timeout_control: timeout_control(),
        auto_refresh: auto_refresh(),
        refresh_interval_secs: refresh_interval_secs(),
    }
}

pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# ===============================================================================
# Craftwatch Configuration
# ===============================================================================

[server]
# Network
host = "0.0.0.0"                     # Dashboard bind address (0.0.0.0 = all interfaces)
port = 8080                          # Dashboard port

# Performance
tcp_nodelay = true                   # Disable Nagle's algorithm (lower latency)
timeout_secs = 30                    # Request timeout in seconds
max_concurrent_requests = 256        # Max simultaneous requests
enable_compression = true            # HTTP compression (gzip/brotli/deflate)

# CORS
allowed_origins = ["*"]              # "*" = all origins | ["https://example.com"] for production

# ===============================================================================
# DASHBOARD
# ===============================================================================
[dashboard]
default_host = "xaprosmp.xyz"        # Server shown on first load and by the reset button
default_edition = "java"             # "java" (TCP 25565) or "bedrock" (UDP 19132)
timeout_ms = 2500                    # Probe timeout in milliseconds (100 to 10000)
timeout_control = false              # Show a timeout field in the form
auto_refresh = true                  # Auto-refresh checkbox initial state
refresh_interval_secs = 30           # Auto-refresh interval
"#;
