use craftwatch_events::{AppEvent, EventBus};
use craftwatch_config::Config;
use craftwatch_models::ServerTarget;
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub async fn load(config_path: &str, events: &Arc<EventBus>) -> Result<Config> {
    let abs_config_path = absolute_path_string(config_path)?;

    events.emit(AppEvent::ConfigLoading {
        path: abs_config_path.clone(),
    });

    let config_exists = Path::new(config_path).exists();
    let config = match Config::from_file_with_events(config_path, Some(events)).await {
        Ok(config) => config,
        Err(e) => {
            events.emit(AppEvent::ConfigError { error: e.to_string() });
            return Err(e.into());
        }
    };

    if !config_exists {
        events.emit(AppEvent::ConfigCreated {
            path: abs_config_path,
        });
    }

    events.emit(AppEvent::ConfigLoaded {
        default_target: ServerTarget::default_for(&config.dashboard.target_defaults()).to_string(),
        timeout_ms: config.dashboard.timeout_ms,
    });

    Ok(config)
}

fn absolute_path_string(path: &str) -> Result<String> {
    let path = Path::new(path);
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(abs_path.to_string_lossy().to_string())
}
