use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Failures reported by a location source. Each one is terminal for the
/// subscription that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum LocationError {
    #[error("This environment doesn't support geolocation.")]
    Unsupported,
    #[error("Please enable location services to use the speedometer.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    PositionUnavailable,
    #[error("The request to get user location timed out.")]
    Timeout,
    #[error("An unknown error occurred.")]
    Unknown,
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Classification failed: {0}")]
    Failed(String),
    #[error("Classification timed out")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Preference store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Preference store is corrupt: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Store(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
