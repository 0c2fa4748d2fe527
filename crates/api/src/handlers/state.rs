use super::models::AppState;
use craftwatch_config::DashboardSettings;
use craftwatch_events::{AppEvent, EventBus};
use craftwatch_models::{ServerTarget, StatusResult};
use craftwatch_probe::{probe_timeout, Prober};
use std::sync::Arc;

impl AppState {
    pub fn new(prober: Prober, events: Arc<EventBus>, dashboard: DashboardSettings) -> Self {
        Self {
            prober: Arc::new(prober),
            events,
            dashboard: Arc::new(dashboard),
        }
    }

    /// Runs one probe and reports the outcome on the event bus
    pub async fn check(&self, target: &ServerTarget, timeout_ms: u64) -> StatusResult {
        let result = self.prober.probe(target, probe_timeout(timeout_ms)).await;

        match &result {
            StatusResult::Up { latency_ms, .. } => self.events.emit(AppEvent::ProbeUp {
                target: target.to_string(),
                latency_ms: *latency_ms,
            }),
            StatusResult::Down { error, .. } => self.events.emit(AppEvent::ProbeDown {
                target: target.to_string(),
                error: error.clone(),
            }),
        }

        result
    }
}
