//! Integration tests for the axum server.
//!
//! HTTP routes are exercised with `oneshot`; the WebSocket channel runs
//! against a real listener on an ephemeral port.

#![cfg(feature = "web")]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

use rs_wifibot::config::{Config, SiteProfile, WebConfig};
use rs_wifibot::hal::{MockMotorChannel, MockStatusLed};
use rs_wifibot::services::{build_app, DriveLink, SharedDriveState};
use rs_wifibot::{Command, Direction, MotorController, DUTY_MAX, DUTY_STOP};

type Shared = Arc<SharedDriveState<MockMotorChannel>>;

fn shared() -> Shared {
    let drive = MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
    Arc::new(SharedDriveState::new(drive))
}

fn control_panel() -> Config {
    Config::default()
}

fn greeter() -> Config {
    Config::default().with_web(WebConfig::default().with_site(SiteProfile::Greeter))
}

fn create_test_app(config: &Config) -> (axum::Router, Shared) {
    let state = shared();
    let router = build_app(config, Arc::clone(&state), MockStatusLed::new());
    (router, state)
}

async fn send(app: axum::Router, method: &str, uri: &str) -> (StatusCode, String, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string())
        .unwrap_or_default();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(body.to_vec()).unwrap())
}

// ============================================================================
// Greeter
// ============================================================================

#[tokio::test]
async fn test_greeter_root() {
    let (app, _state) = create_test_app(&greeter());
    let (status, content_type, body) = send(app, "GET", "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/plain");
    assert_eq!(body, "hello from wifibot!");
}

#[tokio::test]
async fn test_greeter_inline() {
    let (app, _state) = create_test_app(&greeter());
    let (status, _, body) = send(app, "GET", "/inline").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "this works as well");
}

#[tokio::test]
async fn test_greeter_uses_device_name() {
    let config = greeter().with_device(rs_wifibot::config::DeviceConfig::default().with_name("rover"));
    let (app, _state) = create_test_app(&config);
    let (_, _, body) = send(app, "GET", "/").await;

    assert_eq!(body, "hello from rover!");
}

#[tokio::test]
async fn test_greeter_has_no_websocket() {
    let (app, _state) = create_test_app(&greeter());
    let (status, _, body) = send(app, "GET", "/ws").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("URI: /ws"));
}

// ============================================================================
// Not Found
// ============================================================================

#[tokio::test]
async fn test_not_found_echoes_request() {
    let (app, _state) = create_test_app(&greeter());
    let (status, content_type, body) = send(app, "GET", "/does/not/exist?a=1&b=two").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(content_type, "text/plain");
    assert_eq!(
        body,
        "File Not Found\n\nURI: /does/not/exist\nMethod: GET\nArguments: 2\n a: 1\n b: two\n"
    );
}

#[tokio::test]
async fn test_not_found_any_method() {
    for method in ["POST", "PUT", "DELETE", "PATCH"] {
        let (app, _state) = create_test_app(&control_panel());
        let (status, _, body) = send(app, method, "/").await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert!(body.contains(&format!("Method: {method}")));
        assert!(body.contains("URI: /"));
    }
}

// ============================================================================
// Control Panel
// ============================================================================

#[tokio::test]
async fn test_control_page_and_stylesheet() {
    let (app, _state) = create_test_app(&control_panel());

    let (status, content_type, body) = send(app.clone(), "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/html");
    assert!(body.contains("<html"));

    let (status, content_type, body) = send(app, "GET", "/style.css").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "text/css");
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_get_state() {
    let (app, state) = create_test_app(&control_panel());
    state.submit(Command::Right);

    let (status, content_type, body) = send(app, "GET", "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "application/json");

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["last_command"], "right");
    assert_eq!(json["state"]["left"]["direction"], "forward");
    assert_eq!(json["state"]["left"]["duty"], 1023);
    assert_eq!(json["state"]["right"]["direction"], "backward");
    assert_eq!(json["state"]["right"]["duty"], 0);
}

#[tokio::test]
async fn test_cors_header_when_permissive() {
    let (app, _state) = create_test_app(&control_panel());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/state")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap()
            .to_str()
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_no_cors_header_when_disabled() {
    let config = Config::default().with_web(WebConfig::default().with_cors(false));
    let (app, _state) = create_test_app(&config);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/state")
                .header(header::ORIGIN, "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

// ============================================================================
// WebSocket
// ============================================================================

async fn spawn_server(config: &Config, state: Shared) -> std::net::SocketAddr {
    let router = build_app(config, state, MockStatusLed::new());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Poll until the drive reports `cmd` or give up after a second.
async fn wait_for(state: &Shared, cmd: Command) {
    for _ in 0..100 {
        if DriveLink::snapshot(state).last_command == cmd {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("drive never reached {cmd}");
}

#[tokio::test]
async fn test_websocket_drives_motors() {
    let state = shared();
    let addr = spawn_server(&control_panel(), Arc::clone(&state)).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();

    let hello = ws.next().await.unwrap().unwrap();
    assert_eq!(hello, Message::Text("Connected".into()));

    ws.send(Message::Text("#F".into())).await.unwrap();
    wait_for(&state, Command::Forward).await;
    let snap = DriveLink::snapshot(&state);
    assert_eq!(snap.state.left.duty, DUTY_MAX);
    assert_eq!(snap.state.right.direction, Direction::Forward);

    ws.send(Message::Text("#B".into())).await.unwrap();
    wait_for(&state, Command::Backward).await;

    // Empty frame: stop.
    ws.send(Message::Text(String::new())).await.unwrap();
    wait_for(&state, Command::Stop).await;
    assert_eq!(DriveLink::snapshot(&state).state.right.duty, DUTY_STOP);

    ws.send(Message::Text("#B".into())).await.unwrap();
    wait_for(&state, Command::Backward).await;

    // Unknown code: stop, directions held.
    ws.send(Message::Text("#Q".into())).await.unwrap();
    wait_for(&state, Command::Stop).await;
    let snap = DriveLink::snapshot(&state);
    assert_eq!(snap.state.left.duty, DUTY_STOP);
    assert_eq!(snap.state.left.direction, Direction::Backward);
    assert_eq!(snap.state.right.direction, Direction::Backward);

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn test_websocket_ignores_binary_frames() {
    let state = shared();
    let addr = spawn_server(&control_panel(), Arc::clone(&state)).await;

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    let _hello = ws.next().await.unwrap().unwrap();

    ws.send(Message::Binary(b"#F".to_vec())).await.unwrap();
    ws.send(Message::Text("#L".into())).await.unwrap();
    wait_for(&state, Command::Left).await;

    // Frames are handled in order, so the binary one came and went first.
    state.with_controller(|c| {
        assert_eq!(c.left_channel().direction, Direction::Backward);
        assert_eq!(c.left_channel().duty_writes, 2);
    });
}

#[tokio::test]
async fn test_websocket_multiple_clients() {
    let state = shared();
    let addr = spawn_server(&control_panel(), Arc::clone(&state)).await;
    let url = format!("ws://{addr}/ws");

    let (mut a, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let (mut b, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    assert_eq!(a.next().await.unwrap().unwrap(), Message::Text("Connected".into()));
    assert_eq!(b.next().await.unwrap().unwrap(), Message::Text("Connected".into()));

    a.send(Message::Text("#R".into())).await.unwrap();
    wait_for(&state, Command::Right).await;

    b.send(Message::Text("#L".into())).await.unwrap();
    wait_for(&state, Command::Left).await;

    drop(a);
    b.send(Message::Text("#S".into())).await.unwrap();
    wait_for(&state, Command::Stop).await;
}

#[tokio::test]
async fn test_control_page_follows_ws_path() {
    let config = Config::default().with_web(WebConfig::default().with_ws_path("/drive"));
    let state = shared();
    let addr = spawn_server(&config, Arc::clone(&state)).await;

    let (app, _) = create_test_app(&config);
    let (_, _, page) = send(app.clone(), "GET", "/").await;
    let marker = "data-ws-path=\"";
    let start = page.find(marker).expect("page names its socket path") + marker.len();
    let end = start + page[start..].find('"').unwrap();
    let ws_path = &page[start..end];
    assert_eq!(ws_path, "/drive");

    let (status, _, _) = send(app, "GET", "/ws").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}{ws_path}"))
        .await
        .unwrap();
    assert_eq!(ws.next().await.unwrap().unwrap(), Message::Text("Connected".into()));

    ws.send(Message::Text("#F".into())).await.unwrap();
    wait_for(&state, Command::Forward).await;
}
