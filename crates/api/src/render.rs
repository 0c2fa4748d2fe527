//! Server-side HTML for the dashboard page.

use crate::session::DashboardSession;
use chrono::{DateTime, Utc};
use craftwatch_config::DashboardSettings;
use craftwatch_models::{
    Edition, StatusResult, DEFAULT_BEDROCK_PORT, DEFAULT_JAVA_PORT, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS,
};
use minijinja::{AutoEscape, Environment};
use once_cell::sync::Lazy;
use serde::Serialize;

const DASHBOARD_TEMPLATE: &str = "dashboard.html";

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    // A broken template surfaces as a render error on every request
    let source = include_str!("../templates/dashboard.html");
    if let Err(e) = env.add_template(DASHBOARD_TEMPLATE, source) {
        tracing::error!(error = %e, "failed to compile dashboard template");
    }
    env
});

pub struct DashboardPage<'a> {
    pub session: &'a DashboardSession,
    pub settings: &'a DashboardSettings,
    pub result: &'a StatusResult,
    pub checked_at: DateTime<Utc>,
}

#[derive(Serialize)]
struct PageContext<'a> {
    edition: &'static str,
    editions: Vec<EditionOption>,
    host: &'a str,
    port: u16,
    timeout_control: bool,
    timeout_ms: u64,
    min_timeout_ms: u64,
    max_timeout_ms: u64,
    auto_refresh: bool,
    refresh_interval_secs: u64,
    default_host: &'a str,
    checked_at: String,
    java_port: u16,
    bedrock_port: u16,
    status: StatusView<'a>,
}

#[derive(Serialize)]
struct EditionOption {
    value: &'static str,
    label: &'static str,
    checked: bool,
}

/// Result fields with the dashboard's placeholders already applied
#[derive(Serialize)]
struct StatusView<'a> {
    up: bool,
    latency: i64,
    online: i64,
    max: Option<i64>,
    version: Option<&'a str>,
    motd: Option<&'a str>,
    error: Option<&'a str>,
}

impl<'a> StatusView<'a> {
    fn new(result: &'a StatusResult) -> Self {
        match result {
            StatusResult::Up {
                latency_ms,
                players,
                version_name,
                motd,
                ..
            } => Self {
                up: true,
                latency: latency_ms.unwrap_or(0.0) as i64,
                online: players.online.unwrap_or(0),
                max: players.max,
                version: version_name.as_deref(),
                motd: motd.as_deref().filter(|m| !m.is_empty()),
                error: None,
            },
            StatusResult::Down { error, .. } => Self {
                up: false,
                latency: 0,
                online: 0,
                max: None,
                version: None,
                motd: None,
                error: Some(error.as_str()),
            },
        }
    }
}

pub fn dashboard_page(page: &DashboardPage<'_>) -> Result<String, minijinja::Error> {
    let target = &page.session.target;
    let context = PageContext {
        edition: target.edition.as_str(),
        editions: [Edition::Java, Edition::Bedrock]
            .into_iter()
            .map(|edition| EditionOption {
                value: edition.as_str(),
                label: edition.label(),
                checked: target.edition == edition,
            })
            .collect(),
        host: &target.host,
        port: target.port,
        timeout_control: page.settings.timeout_control,
        timeout_ms: page.session.timeout_ms,
        min_timeout_ms: MIN_TIMEOUT_MS,
        max_timeout_ms: MAX_TIMEOUT_MS,
        auto_refresh: page.session.auto_refresh,
        refresh_interval_secs: page.settings.refresh_interval_secs,
        default_host: page.settings.default_host.trim(),
        checked_at: page.checked_at.format("%H:%M:%S UTC").to_string(),
        java_port: DEFAULT_JAVA_PORT,
        bedrock_port: DEFAULT_BEDROCK_PORT,
        status: StatusView::new(page.result),
    };

    ENV.get_template(DASHBOARD_TEMPLATE)?.render(context)
}
