use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str =
    "craftwatch=info,craftwatch_api=info,craftwatch_probe=info,tower_http=info";

/// Installs the global subscriber; `RUST_LOG` overrides the default filter
pub fn initialize() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be set (tests, embedding)
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}
