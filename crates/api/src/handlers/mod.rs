mod models;
mod state;
mod dashboard;
mod status;

pub use models::AppState;
pub use dashboard::{dashboard, check, reset};
pub use status::{api_status, health, not_found};
