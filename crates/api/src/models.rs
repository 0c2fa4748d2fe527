use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Query string of `GET /api/status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub host: Option<String>,
    pub port: Option<String>,
    pub edition: Option<String>,
    pub timeout_ms: Option<String>,
}

/// Dashboard form fields, as submitted by the browser.
///
/// Everything arrives as text; coercion happens in the session.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckForm {
    pub edition: Option<String>,
    pub host: Option<String>,
    pub port: Option<String>,
    pub timeout_ms: Option<String>,
    /// Checkbox: present ("on") when ticked
    pub auto: Option<String>,
}
