use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Location data unavailable for ({latitude}, {longitude})")]
    LocationUnavailable { latitude: f64, longitude: f64 },

    #[error("Weather data unavailable for ({latitude}, {longitude})")]
    WeatherUnavailable { latitude: f64, longitude: f64 },

    /// A request-fatal fault: `error` is shown to the client, `details` carries the cause.
    #[error("{error}: {details}")]
    Failed { error: &'static str, details: String },

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Wraps an underlying fault with the message the client should see.
    pub fn failed(error: &'static str, source: impl std::fmt::Display) -> Self {
        AppError::Failed {
            error,
            details: source.to_string(),
        }
    }

    /// Wraps `self` as a request-fatal fault unless it is already client-facing.
    pub fn context(self, error: &'static str) -> Self {
        match self {
            AppError::NotFound(_) | AppError::InvalidInput(_) | AppError::Failed { .. } => self,
            other => AppError::failed(error, other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::LocationUnavailable { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Error fetching location data", "details": self.to_string() }),
            ),
            AppError::WeatherUnavailable { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Error fetching weather data", "details": self.to_string() }),
            ),
            AppError::Failed { error, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": error, "details": details }),
            ),
            AppError::ExternalApi(_) | AppError::HttpClient(_) => {
                (StatusCode::BAD_GATEWAY, json!({ "error": self.to_string() }))
            }
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": self.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
