use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, LocationError};
use crate::location::LocationEvent;
use crate::state::AppState;
use crate::types::location::{Coordinate, Sample};
use crate::types::session::SessionSnapshot;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/location/sample", post(push_sample))
        .route("/api/location/error", post(push_error))
        .route("/api/location/subscribe", post(resubscribe))
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct SampleRequest {
    latitude: f64,
    longitude: f64,
    speed: Option<f64>,
    timestamp: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct ErrorRequest {
    code: LocationError,
}

#[derive(Serialize)]
struct DeliveryResponse {
    delivered: usize,
}

async fn push_sample(
    State(state): State<AppState>,
    Json(payload): Json<SampleRequest>,
) -> Result<Json<DeliveryResponse>, AppError> {
    if !payload.latitude.is_finite() || !payload.longitude.is_finite() {
        return Err(AppError::BadRequest(
            "latitude and longitude must be finite numbers".to_string(),
        ));
    }

    let sample = Sample {
        coordinate: Coordinate::new(payload.latitude, payload.longitude),
        speed_mps: payload.speed,
        timestamp: payload.timestamp.unwrap_or_else(Utc::now),
    };

    let delivered = state.location().publish(LocationEvent::Sample(sample));
    if delivered == 0 {
        tracing::debug!("Sample published with no active subscription");
    }

    Ok(Json(DeliveryResponse { delivered }))
}

async fn push_error(
    State(state): State<AppState>,
    Json(payload): Json<ErrorRequest>,
) -> Json<DeliveryResponse> {
    let delivered = state.location().publish(LocationEvent::Error(payload.code));
    Json(DeliveryResponse { delivered })
}

async fn resubscribe(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.start_observing().await;
    Json(state.session().snapshot().await)
}
