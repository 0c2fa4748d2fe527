mod bootstrap;

use craftwatch_api::AppState;
use craftwatch_events::{AppEvent, EventBus};
use craftwatch_models::ServerTarget;
use craftwatch_probe::{NetworkBackend, Prober};
use crate::bootstrap::{config, logging, router};
use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    logging::initialize();

    let events = EventBus::new(false);
    events.emit(AppEvent::Starting);

    let config_path =
        std::env::var("CRAFTWATCH_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = config::load(&config_path, &events).await?;

    let prober = Prober::new(Arc::new(NetworkBackend::new()));
    let default_target = ServerTarget::default_for(&config.dashboard.target_defaults()).to_string();
    let app_state = AppState::new(prober, Arc::clone(&events), config.dashboard.clone());

    let app = router::build(&config, app_state);
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let listener = bind_server(&addr).await?;

    events.emit(AppEvent::Ready {
        addr: addr.to_string(),
        default_target,
    });

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received, initiating graceful shutdown...");
    };

    if let Err(e) = axum::serve(listener, app.into_make_service())
        .tcp_nodelay(config.server.tcp_nodelay)
        .with_graceful_shutdown(shutdown_signal)
        .await
    {
        events.emit(AppEvent::Error {
            context: "HTTP server".to_string(),
            error: e.to_string(),
        });
        return Err(e.into());
    }

    events.emit(AppEvent::Shutdown);
    Ok(())
}

async fn bind_server(addr: &str) -> Result<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            let port = addr.rsplit(':').next().unwrap_or("unknown");
            tracing::error!("Port {} is already in use", port);
            tracing::error!("Stop the other application or change [server].port in the config");
            #[cfg(target_os = "windows")]
            tracing::error!("Find the process with: netstat -ano | findstr :{}", port);
            #[cfg(not(target_os = "windows"))]
            tracing::error!("Find the process with: lsof -i :{}", port);
        } else {
            tracing::error!("Failed to bind server on {}: {}", addr, e);
        }
        anyhow::anyhow!("Failed to bind server: {}", e)
    })
}
