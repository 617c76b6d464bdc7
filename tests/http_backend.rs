//! HttpBackend and Session against a local axum server.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use trafficwatch::api::{Backend, Endpoints, FetchError, FetchReason, HttpBackend};
use trafficwatch::playback::ClockPlayer;
use trafficwatch::session::Session;
use trafficwatch::store::{ApiStatus, Notifications};

#[derive(Clone, Default)]
struct ServerState {
    failing: Arc<AtomicBool>,
}

async fn violations(State(state): State<ServerState>) -> Response {
    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "detector crashed").into_response();
    }
    Json(json!([
        {
            "id": "v1",
            "timestamp": 30.0,
            "plate": "ABC123",
            "type": "Red Light",
            "confidence": 0.93,
            "image": "v1.jpg",
            "video": "cam1.mp4"
        },
        {
            "id": "v2",
            "timestamp": 12.5,
            "plate": "UNKNOWN",
            "type": "Speeding",
            "confidence": 0.61,
            "video": "cam2.mp4"
        }
    ]))
    .into_response()
}

async fn videos(State(state): State<ServerState>) -> Response {
    if state.failing.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "disk offline").into_response();
    }
    Json(json!([
        { "name": "cam1.mp4", "size": 1048576, "created": 1700000000.0, "duration": 60.0 },
        { "name": "cam2.mp4", "size": 2048, "created": 1700000500.0 }
    ]))
    .into_response()
}

async fn metadata(Path(name): Path<String>) -> Response {
    if name == "cam1.mp4" {
        Json(json!({ "size": 1048576, "created": 1700000000.0 })).into_response()
    } else {
        (StatusCode::NOT_FOUND, "no such video").into_response()
    }
}

async fn garbage() -> &'static str {
    "<html>not json</html>"
}

/// Serve the fake detector backend on an ephemeral port.
async fn serve(state: ServerState) -> String {
    let app = Router::new()
        .route("/api/violations", get(violations))
        .route("/api/videos", get(videos))
        .route("/api/video/metadata/{name}", get(metadata))
        .with_state(state);
    let broken = Router::new().route("/broken/api/violations", get(garbage));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.merge(broken)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn backend(base: &str) -> HttpBackend {
    HttpBackend::new(Endpoints::new(base), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetches_decode_backend_json() {
    let base = serve(ServerState::default()).await;
    let backend = backend(&base);

    let violations = backend.fetch_violations().await.unwrap();
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0].kind.as_deref(), Some("Red Light"));
    assert_eq!(violations[0].offset(), Some(30.0));
    assert_eq!(violations[1].known_plate(), None);

    let videos = backend.fetch_videos().await.unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].duration, Some(60.0));
    assert_eq!(videos[1].duration, None);

    let metadata = backend.fetch_video_metadata("cam1.mp4").await.unwrap();
    assert_eq!(metadata.size, 1048576);
}

#[tokio::test]
async fn test_non_2xx_is_a_status_error() {
    let state = ServerState::default();
    state.failing.store(true, Ordering::SeqCst);
    let base = serve(state).await;

    let err = backend(&base).fetch_violations().await.unwrap_err();
    assert_eq!(err.reason(), FetchReason::Non2xx);
    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            body: "detector crashed".to_string()
        }
    );

    let err = backend(&base)
        .fetch_video_metadata("missing.mp4")
        .await
        .unwrap_err();
    assert_eq!(err.reason(), FetchReason::Non2xx);
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let base = serve(ServerState::default()).await;

    let err = backend(&format!("{}/broken", base))
        .fetch_violations()
        .await
        .unwrap_err();
    assert_eq!(err.reason(), FetchReason::Decode);
}

#[tokio::test]
async fn test_session_keeps_stale_data_when_backend_fails() {
    let state = ServerState::default();
    let base = serve(state.clone()).await;
    let backend = backend(&base);

    let mut session = Session::new(
        Endpoints::new(base.as_str()),
        ClockPlayer::new(),
        Notifications::new(Duration::from_secs(5)),
    );

    session.refresh_all(&backend).await;
    assert_eq!(session.status(), ApiStatus::Online);
    assert_eq!(session.violations().len(), 2);
    assert_eq!(session.selected_video().map(|v| v.name.as_str()), Some("cam1.mp4"));
    assert_eq!(session.metadata().map(|m| m.size), Some(1048576));

    // Duration comes from the catalog hint once the player reports it
    session.pump_playback();
    assert_eq!(session.timeline().duration(), Some(60.0));
    assert_eq!(session.timeline().markers().len(), 1);
    assert!((session.timeline().markers()[0].position_fraction - 0.5).abs() < 1e-9);

    let before = session.notifications().len();
    state.failing.store(true, Ordering::SeqCst);
    session.refresh_all(&backend).await;

    assert_eq!(session.status(), ApiStatus::Offline);
    assert_eq!(session.violations().len(), 2);
    assert_eq!(session.catalog().len(), 2);
    assert_eq!(session.timeline().markers().len(), 1);
    // One toast for going offline, not one per failed endpoint
    assert_eq!(session.notifications().len(), before + 1);
}
