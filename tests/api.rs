use std::sync::Arc;
use std::time::Duration;

use axum::{body::to_bytes, http::Request, Router};
use serde_json::Value;
use speedgrip_rs::{
    config::Config,
    location::LocationEvent,
    pipeline::classify::SpeedBandClassifier,
    routes,
    state::AppState,
    store::{MemoryStore, PreferenceStore},
    types::location::{Coordinate, Sample},
    types::session::{JourneyStatus, PermissionStatus, SessionSnapshot},
};
use tower::ServiceExt;

async fn app_with(config: Config, store: Arc<MemoryStore>) -> (Router, AppState) {
    let state = AppState::with_parts(config, Arc::new(SpeedBandClassifier), store).await;
    let router = Router::new()
        .merge(routes::health::router())
        .merge(routes::session::router())
        .merge(routes::location::router())
        .with_state(state.clone());
    (router, state)
}

async fn app() -> (Router, AppState) {
    let config = Config {
        location_timeout: None,
        ..Config::default()
    };
    app_with(config, Arc::new(MemoryStore::new())).await
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (axum::http::StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(json.to_string())),
        None => builder.body(axum::body::Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn wait_for(state: &AppState, done: impl Fn(&SessionSnapshot) -> bool) -> SessionSnapshot {
    for _ in 0..200 {
        let snapshot = state.session().snapshot().await;
        if done(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session never reached the expected state");
}

#[tokio::test]
async fn initial_snapshot() {
    let (app, _state) = app().await;
    let (status, json) = call(&app, "GET", "/api/session", None).await;

    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(json["unit"], "kmh");
    assert_eq!(json["view_mode"], "digital");
    assert_eq!(json["theme"], "light");
    assert_eq!(json["permission_status"], "pending");
    assert_eq!(json["journey_status"], "idle");
    assert_eq!(json["current_label"], "🤔");
    assert_eq!(json["speed"], Value::Null);
    assert_eq!(json["display"]["speed"], 0);
    assert_eq!(json["display"]["distance"], "0.00");
}

#[tokio::test]
async fn toggles_cycle_through_values() {
    let (app, _state) = app().await;

    let (_, json) = call(&app, "POST", "/api/unit/toggle", None).await;
    assert_eq!(json["unit"], "mph");
    assert_eq!(json["display"]["speed_label"], "mph");
    let (_, json) = call(&app, "POST", "/api/unit/toggle", None).await;
    assert_eq!(json["unit"], "mps");
    let (_, json) = call(&app, "POST", "/api/unit/toggle", None).await;
    assert_eq!(json["unit"], "kmh");

    let (_, json) = call(&app, "POST", "/api/view/toggle", None).await;
    assert_eq!(json["view_mode"], "analogue");

    let (_, json) = call(&app, "POST", "/api/theme/toggle", None).await;
    assert_eq!(json["theme"], "dark");
}

#[tokio::test]
async fn theme_is_written_to_store() {
    let store = Arc::new(MemoryStore::new());
    let config = Config {
        location_timeout: None,
        ..Config::default()
    };
    let (app, _state) = app_with(config, store.clone()).await;

    call(&app, "POST", "/api/theme/toggle", None).await;
    assert_eq!(store.get("theme").await.expect("get").as_deref(), Some("dark"));
}

#[tokio::test]
async fn journey_lifecycle_over_http() {
    let (app, state) = app().await;
    state.start_observing().await;

    let (_, json) = call(&app, "POST", "/api/journey/start", None).await;
    assert_eq!(json["journey_status"], "tracking");

    for lon in [0.0, 0.01, 0.02] {
        let body = serde_json::json!({ "latitude": 0.0, "longitude": lon, "speed": 15.0 });
        let (status, json) = call(&app, "POST", "/api/location/sample", Some(body)).await;
        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(json["delivered"], 1);
    }

    let snapshot = wait_for(&state, |s| s.journey_path.len() == 3).await;
    assert_eq!(snapshot.permission_status, PermissionStatus::Granted);
    assert_eq!(snapshot.display.speed, 54);
    assert!((snapshot.journey_distance_km - 2.22).abs() < 0.01);

    let (_, json) = call(&app, "POST", "/api/journey/end", None).await;
    assert_eq!(json["journey_status"], "finished");
    assert_eq!(json["display"]["distance"], "2.22");

    let (_, json) = call(&app, "POST", "/api/journey/reset", None).await;
    assert_eq!(json["journey_status"], "idle");
    assert_eq!(json["journey_distance_km"], 0.0);
    assert_eq!(json["journey_path"].as_array().map(Vec::len), Some(0));

    state.stop_observing().await;
    assert_eq!(state.location().subscriber_count(), 0);
}

#[tokio::test]
async fn source_error_denies_until_resubscribed() {
    let (app, state) = app().await;
    state.start_observing().await;

    let body = serde_json::json!({ "code": "permission_denied" });
    let (status, _) = call(&app, "POST", "/api/location/error", Some(body)).await;
    assert_eq!(status, axum::http::StatusCode::OK);

    let snapshot = wait_for(&state, |s| s.permission_status == PermissionStatus::Denied).await;
    assert_eq!(
        snapshot.error_message.as_deref(),
        Some("Please enable location services to use the speedometer.")
    );
    wait_for(&state, |_| state.location().subscriber_count() == 0).await;

    let body = serde_json::json!({ "latitude": 1.0, "longitude": 1.0, "speed": 3.0 });
    let (_, json) = call(&app, "POST", "/api/location/sample", Some(body)).await;
    assert_eq!(json["delivered"], 0);

    let (_, json) = call(&app, "POST", "/api/location/subscribe", None).await;
    assert_eq!(json["permission_status"], "pending");
    assert_eq!(json["error_message"], Value::Null);

    let body = serde_json::json!({ "latitude": 1.0, "longitude": 1.0, "speed": 3.0 });
    call(&app, "POST", "/api/location/sample", Some(body)).await;
    let snapshot = wait_for(&state, |s| s.permission_status == PermissionStatus::Granted).await;
    assert_eq!(snapshot.journey_status, JourneyStatus::Idle);

    state.stop_observing().await;
}

#[tokio::test]
async fn unsupported_environment_is_denied_on_subscribe() {
    let config = Config {
        location_timeout: None,
        location_supported: false,
        ..Config::default()
    };
    let (app, _state) = app_with(config, Arc::new(MemoryStore::new())).await;

    let (_, json) = call(&app, "POST", "/api/location/subscribe", None).await;
    assert_eq!(json["permission_status"], "denied");
    assert_eq!(json["error_message"], "This environment doesn't support geolocation.");
}

#[tokio::test]
async fn malformed_sample_is_rejected() {
    let (app, _state) = app().await;
    let body = serde_json::json!({ "latitude": "north", "longitude": 1.0 });
    let (status, _) = call(&app, "POST", "/api/location/sample", Some(body)).await;
    assert!(status.is_client_error());

    let body = serde_json::json!({ "code": "gremlins" });
    let (status, _) = call(&app, "POST", "/api/location/error", Some(body)).await;
    assert!(status.is_client_error());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_resubscribes_leave_one_observer() {
    let (_app, state) = app().await;

    let restarts: Vec<_> = (0..8)
        .map(|_| {
            let state = state.clone();
            tokio::spawn(async move { state.start_observing().await })
        })
        .collect();
    for restart in restarts {
        restart.await.expect("restart");
    }
    assert_eq!(state.location().subscriber_count(), 1);

    state.session().start_journey().await;
    let sample = Sample::new(Coordinate::new(0.0, 0.0), Some(2.0));
    let delivered = state.location().publish(LocationEvent::Sample(sample));
    assert_eq!(delivered, 1);

    let snapshot = wait_for(&state, |s| !s.journey_path.is_empty()).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(state.session().snapshot().await.journey_path, snapshot.journey_path);
    assert_eq!(snapshot.journey_path.len(), 1);

    state.stop_observing().await;
    assert_eq!(state.location().subscriber_count(), 0);
}
