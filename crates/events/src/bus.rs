use super::models::{AppEvent, EventBus};
use std::sync::Arc;
use colored::Colorize;

impl EventBus {
    pub fn new(silent_mode: bool) -> Arc<Self> {
        Arc::new(Self { silent_mode })
    }

    pub fn emit(&self, event: AppEvent) {
        match event {
            // Application lifecycle
            AppEvent::Starting => {
                println!("\n{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
                println!("  {}", "Craftwatch - Minecraft Server Status".white().bold());
                println!("  {} {}", "Version".dimmed(), env!("CARGO_PKG_VERSION").cyan());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
            }
            AppEvent::Ready { addr, default_target } => {
                println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
                println!("  {} {}", "Dashboard".white(), format!("http://{}", addr).cyan());
                println!("  {} {}", "Target   ".white(), default_target.blue());
                println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".green());
            }
            AppEvent::Shutdown => {
                println!("\n{}", "Server shutting down".red());
            }

            // Configuration
            AppEvent::ConfigLoading { path } => {
                println!("  {} {}", "Loading config".dimmed(), path.cyan());
            }
            AppEvent::ConfigLoaded { default_target, timeout_ms } => {
                println!(
                    "  {} {} (timeout {}ms)",
                    "✓".green(),
                    default_target.cyan(),
                    timeout_ms.to_string().dimmed()
                );
            }
            AppEvent::ConfigCreated { path } => {
                tracing::warn!("Configuration file not found");
                tracing::info!("Created default configuration at: {}", path);
            }
            AppEvent::ConfigMigrated { added_fields } => {
                if !added_fields.is_empty() {
                    println!("  {} Config updated: added {}",
                        "↻".blue(),
                        added_fields.join(", ").dimmed()
                    );
                }
            }
            AppEvent::ConfigError { error } => {
                tracing::error!("Configuration error: {}", error);
            }

            // Probes go to the log only; the dashboard already shows them
            AppEvent::ProbeUp { target, latency_ms } => {
                match latency_ms {
                    Some(ms) => tracing::info!(server = %target, latency_ms = ms, "server up"),
                    None => tracing::info!(server = %target, "server up (latency unknown)"),
                }
            }
            AppEvent::ProbeDown { target, error } => {
                if !self.silent_mode {
                    println!("  {} {} {}", "✗".red(), target.cyan(), error.dimmed());
                }
                tracing::warn!(server = %target, %error, "server down");
            }

            // Errors
            AppEvent::Error { context, error } => {
                tracing::error!("{}: {}", context, error);
            }
        }
    }
}
