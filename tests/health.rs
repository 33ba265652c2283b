use std::sync::Arc;

use axum::{body::to_bytes, http::Request, Router};
use speedgrip_rs::{
    config::Config, pipeline::classify::SpeedBandClassifier, routes, state::AppState,
    store::MemoryStore,
};
use tower::ServiceExt;

async fn app() -> Router {
    let config = Config {
        location_timeout: None,
        ..Config::default()
    };
    let state = AppState::with_parts(config, Arc::new(SpeedBandClassifier), Arc::new(MemoryStore::new())).await;
    Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::location::router())
        .with_state(state)
}

#[tokio::test]
async fn health_returns_ok() {
    let response = app()
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .method("GET")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let text = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(text.contains("\"status\":\"ok\""));
}
