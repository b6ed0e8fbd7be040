//! Integration tests against in-process control-plane fixtures.

use std::sync::{Arc, Mutex};

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use rp_client::{
    ControlPlaneConfig, Credential, CredentialStore, DeviceController, Error, PlaybackResolver,
    RemoteControl, SessionChecker,
};
use rp_protocol::PlayerCommand;
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn serve_fixture(app: Router) -> ControlPlaneConfig {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    ControlPlaneConfig::new("127.0.0.1", port).insecure()
}

fn credential(token: &str) -> Credential {
    Credential {
        access_token: token.to_string(),
        expires_at: None,
    }
}

fn temp_store(dir: &tempfile::TempDir) -> CredentialStore {
    CredentialStore::at(dir.path().join("credentials.json"))
}

fn device(id: &str, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "is_active": active,
        "is_private_session": false,
        "is_restricted": false,
        "name": name,
        "type": "speaker",
        "volume_percent": 40,
        "supports_volume": true
    })
}

#[tokio::test]
async fn device_listing_preserves_server_order() {
    let app = Router::new().route(
        "/api/device/all",
        get(|| async {
            Json(json!({
                "data": {"devices": [
                    device("D2", "Kitchen", false),
                    device("D0", "Living Room", true),
                    device("D1", "Office", false),
                ]},
                "error_code": ""
            }))
        }),
    );
    let config = serve_fixture(app).await;

    let devices = DeviceController::new(config)
        .unwrap()
        .list_devices()
        .await
        .unwrap();

    let ids: Vec<&str> = devices.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, ["D2", "D0", "D1"]);
    assert_eq!(devices[1].name, "Living Room");
    assert!(devices[1].is_active);
}

#[tokio::test]
async fn device_listing_surfaces_error_code() {
    let app = Router::new().route(
        "/api/device/all",
        get(|| async {
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"data": null, "error_code": "GET_DEVICES_FAILED"})),
            )
        }),
    );
    let config = serve_fixture(app).await;

    let err = DeviceController::new(config)
        .unwrap()
        .list_devices()
        .await
        .unwrap_err();

    match err {
        Error::Response { status, error_code } => {
            assert_eq!(status, StatusCode::BAD_GATEWAY);
            assert_eq!(error_code.as_deref(), Some("GET_DEVICES_FAILED"));
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn handoff_accepted_with_204() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new().route(
        "/api/device/control-playback",
        post({
            let seen = Arc::clone(&seen);
            move |Json(body): Json<Value>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().unwrap() = Some(body);
                    StatusCode::NO_CONTENT
                }
            }
        }),
    );
    let config = serve_fixture(app).await;

    let taken = DeviceController::new(config)
        .unwrap()
        .take_over_playback(&credential("tok-abc"), "D0")
        .await
        .unwrap();

    assert!(taken);
    assert_eq!(
        seen.lock().unwrap().take().unwrap(),
        json!({"access_token": "tok-abc", "device_id": "D0"})
    );
}

#[tokio::test]
async fn handoff_refusal_is_false_not_an_error() {
    let app = Router::new().route(
        "/api/device/control-playback",
        post(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({"data": null, "error_code": "CONTROL_PLAYBACK_FAILED"})),
            )
        }),
    );
    let config = serve_fixture(app).await;

    let taken = DeviceController::new(config)
        .unwrap()
        .take_over_playback(&credential("tok-abc"), "D9")
        .await
        .unwrap();

    assert!(!taken);
}

#[tokio::test]
async fn handoff_transport_failure_is_an_error() {
    // Grab a free port, then close it so the connection is refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = ControlPlaneConfig::new("127.0.0.1", port).insecure();

    let result = DeviceController::new(config)
        .unwrap()
        .take_over_playback(&credential("tok-abc"), "D0")
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn logged_out_session_carries_redirect() {
    // Bare body: this endpoint does not use the envelope.
    let app = Router::new().route(
        "/api/auth/login",
        get(|| async {
            Json(json!({
                "logged_in": false,
                "redirect_url": "https://accounts.example/authorize"
            }))
        }),
    );
    let config = serve_fixture(app).await;
    let dir = tempfile::tempdir().unwrap();

    let login = SessionChecker::new(config, temp_store(&dir))
        .unwrap()
        .check_session()
        .await
        .unwrap();

    assert!(!login.logged_in);
    assert_eq!(login.redirect_url, "https://accounts.example/authorize");
    assert!(login.user.is_none());
}

#[tokio::test]
async fn logged_in_session_parses_bare_body() {
    let app = Router::new().route(
        "/api/auth/login",
        get(|| async {
            Json(json!({"logged_in": true, "redirect_url": "", "user": null}))
        }),
    );
    let config = serve_fixture(app).await;
    let dir = tempfile::tempdir().unwrap();

    let login = SessionChecker::new(config, temp_store(&dir))
        .unwrap()
        .check_session()
        .await
        .unwrap();

    assert!(login.logged_in);
    assert!(login.user.is_none());
}

#[tokio::test]
async fn controller_connect_reports_claim() {
    // Bare body: this endpoint does not use the envelope.
    let app = Router::new().route(
        "/api/player/connect",
        post(|| async {
            Json(json!({
                "logged_in": true,
                "redirect_url": "",
                "user": {
                    "display_name": "dj",
                    "profile_image_url": "",
                    "is_controller": true
                },
                "connected": true
            }))
        }),
    );
    let config = serve_fixture(app).await;
    let dir = tempfile::tempdir().unwrap();

    let connect = SessionChecker::new(config, temp_store(&dir))
        .unwrap()
        .connect_as_controller()
        .await
        .unwrap();

    assert!(connect.connected);
    assert!(connect.login.logged_in);
}

#[tokio::test]
async fn refresh_persists_token_and_expiry() {
    let auth_seen: Arc<Mutex<Option<String>>> = Arc::default();
    let app = Router::new().route(
        "/api/player/connect",
        get({
            let auth_seen = Arc::clone(&auth_seen);
            move |headers: HeaderMap| {
                let auth_seen = Arc::clone(&auth_seen);
                async move {
                    *auth_seen.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    Json(json!({
                        "data": {
                            "access_token": "fresh-token",
                            "expires_at": "2026-01-02T03:04:05Z"
                        },
                        "error_code": ""
                    }))
                }
            }
        }),
    );
    let config = serve_fixture(app).await;
    let dir = tempfile::tempdir().unwrap();
    let store = temp_store(&dir);

    let refreshed = SessionChecker::new(config, store.clone())
        .unwrap()
        .refresh_access_token("B64")
        .await
        .unwrap();

    assert_eq!(auth_seen.lock().unwrap().as_deref(), Some("Basic B64"));
    assert_eq!(refreshed.access_token, "fresh-token");
    assert_eq!(refreshed.expires_at, Some(1_767_323_045_000));

    // This is the expiry-carrying path; both fields land in the store.
    let stored = store.get();
    assert_eq!(stored.access_token, "fresh-token");
    assert_eq!(stored.expires_at, Some(1_767_323_045_000));
}

#[tokio::test]
async fn track_metadata_exposes_external_urls() {
    let auth_seen: Arc<Mutex<Option<String>>> = Arc::default();
    let app = Router::new().route(
        "/api/player/track/{id}",
        get({
            let auth_seen = Arc::clone(&auth_seen);
            move |headers: HeaderMap| {
                let auth_seen = Arc::clone(&auth_seen);
                async move {
                    *auth_seen.lock().unwrap() = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    Json(json!({
                        "data": {
                            "external_urls": {"spotify": "https://open.example/t/track9"},
                            "duration_ms": 20_000
                        },
                        "error_code": ""
                    }))
                }
            }
        }),
    );
    let config = serve_fixture(app).await;

    let track = PlaybackResolver::new(config)
        .unwrap()
        .get_track(&credential("tok-p"), "track9")
        .await
        .unwrap();

    assert_eq!(auth_seen.lock().unwrap().as_deref(), Some("Basic tok-p"));
    assert_eq!(
        track.external_urls.get("spotify").map(String::as_str),
        Some("https://open.example/t/track9")
    );
}

#[tokio::test]
async fn server_rejection_is_a_response_error() {
    let app = Router::new().route(
        "/api/player/track/{id}",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"data": null, "error_code": "INVALID_TOKEN"})),
            )
        }),
    );
    let config = serve_fixture(app).await;

    let err = PlaybackResolver::new(config)
        .unwrap()
        .get_track(&credential("bogus"), "track9")
        .await
        .unwrap_err();

    match err {
        Error::Response { status, error_code } => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(error_code.as_deref(), Some("INVALID_TOKEN"));
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_credential_is_refused_before_any_request() {
    // No server at all: the expiry check fires before the request.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = ControlPlaneConfig::new("127.0.0.1", port).insecure();

    let stale = Credential {
        access_token: "tok".to_string(),
        expires_at: Some(1_000),
    };

    let err = DeviceController::new(config.clone())
        .unwrap()
        .take_over_playback(&stale, "D0")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthExpired));

    let err = PlaybackResolver::new(config)
        .unwrap()
        .get_track(&stale, "track9")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::AuthExpired));
}

#[tokio::test]
async fn fallback_resolution_requests_cached_search() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new().route(
        "/api/player/youtube",
        post({
            let seen = Arc::clone(&seen);
            move |Json(body): Json<Value>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().unwrap() = Some(body);
                    Json(json!({"data": {"video_id": "yt42"}, "error_code": ""}))
                }
            }
        }),
    );
    let config = serve_fixture(app).await;

    let resolved = PlaybackResolver::new(config)
        .unwrap()
        .resolve_fallback(&credential("tok-p"), "artist title", "track9")
        .await
        .unwrap();

    assert_eq!(resolved.video_id, "yt42");
    assert_eq!(
        seen.lock().unwrap().take().unwrap(),
        json!({
            "query": "artist title",
            "spotify_track_id": "track9",
            "cache_results": true
        })
    );
}

#[tokio::test]
async fn login_qr_returns_data_url() {
    let app = Router::new().route(
        "/api/player/login-qr",
        get(|| async {
            Json(json!({"data": {"qr": "data:image/png;base64,AAAA"}, "error_code": ""}))
        }),
    );
    let config = serve_fixture(app).await;

    let qr = RemoteControl::new(config)
        .unwrap()
        .login_qr("B64")
        .await
        .unwrap();

    assert_eq!(qr, "data:image/png;base64,AAAA");
}

#[tokio::test]
async fn player_command_posts_lowercase_tag() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let app = Router::new().route(
        "/api/player/command",
        post({
            let seen = Arc::clone(&seen);
            move |Json(body): Json<Value>| {
                let seen = Arc::clone(&seen);
                async move {
                    *seen.lock().unwrap() = Some(body);
                    StatusCode::NO_CONTENT
                }
            }
        }),
    );
    let config = serve_fixture(app).await;

    RemoteControl::new(config)
        .unwrap()
        .send_player_command("B64", PlayerCommand::Restart)
        .await
        .unwrap();

    assert_eq!(
        seen.lock().unwrap().take().unwrap(),
        json!({"command": "restart"})
    );
}

#[tokio::test]
async fn success_envelope_without_data_is_an_error() {
    let app = Router::new().route(
        "/api/device/all",
        get(|| async { Json(json!({"data": null, "error_code": ""})) }),
    );
    let config = serve_fixture(app).await;

    let err = DeviceController::new(config)
        .unwrap()
        .list_devices()
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Response { .. }));
}
