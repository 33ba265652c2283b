use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::state::AppState;
use crate::types::session::SessionSnapshot;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/session", get(snapshot))
        .route("/api/unit/toggle", post(toggle_unit))
        .route("/api/view/toggle", post(toggle_view))
        .route("/api/theme/toggle", post(toggle_theme))
        .route("/api/journey/start", post(start_journey))
        .route("/api/journey/end", post(end_journey))
        .route("/api/journey/reset", post(reset_journey))
}

async fn snapshot(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session().snapshot().await)
}

async fn toggle_unit(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let unit = state.session().toggle_unit().await;
    tracing::debug!("Unit switched to {}", unit.as_str());
    Json(state.session().snapshot().await)
}

async fn toggle_view(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session().toggle_view().await;
    Json(state.session().snapshot().await)
}

async fn toggle_theme(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let theme = state.session().toggle_theme().await;
    tracing::debug!("Theme switched to {}", theme.as_str());
    Json(state.session().snapshot().await)
}

async fn start_journey(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session().start_journey().await;
    Json(state.session().snapshot().await)
}

async fn end_journey(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session().end_journey().await;
    Json(state.session().snapshot().await)
}

async fn reset_journey(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session().reset_journey().await;
    Json(state.session().snapshot().await)
}
