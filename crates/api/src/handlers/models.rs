use craftwatch_config::DashboardSettings;
use craftwatch_events::EventBus;
use craftwatch_probe::Prober;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub(super) prober: Arc<Prober>,
    pub(super) events: Arc<EventBus>,
    pub(super) dashboard: Arc<DashboardSettings>,
}
