pub mod handlers;
pub mod models;
pub mod errors;
pub mod render;
pub mod session;

pub use handlers::*;
pub use models::*;
pub use errors::ApiError;
pub use session::{DashboardSession, SESSION_COOKIE};
