use axum::{
    http::StatusCode,
    response::{IntoResponse, Response, Json},
};
use thiserror::Error;

use crate::models::{ErrorResponse, ErrorDetail};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Failed to render page: {0}")]
    Render(#[from] minijinja::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            ApiError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "INVALID_INPUT".to_string(),
                        message: msg,
                    },
                },
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: ErrorDetail {
                        code: "NOT_FOUND".to_string(),
                        message: "Resource not found".to_string(),
                    },
                },
            ),
            ApiError::Render(err) => {
                tracing::error!(error = %err, "dashboard render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: ErrorDetail {
                            code: "RENDER_ERROR".to_string(),
                            message: "Failed to render page".to_string(),
                        },
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}
