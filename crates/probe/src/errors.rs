use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("could not resolve {0}")]
    Resolve(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("malformed status response: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised by handles that cannot take a per-call timeout
    #[error("status query does not accept a timeout argument")]
    TimeoutUnsupported,
}
