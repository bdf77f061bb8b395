//! Axum server for desktop: the shared HTTP responder plus the WebSocket
//! command channel.
//!
//! - `GET {ws_path}` - WebSocket upgrade (control panel only, default `/ws`)
//! - anything else - handed to [`HttpResponder`], which serves the site
//!   profile's routes or the diagnostic 404

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::{Config, WebConfig};
use crate::traits::{ClientId, HttpMethod, HttpRequest, HttpResponse, StatusIndicator, WsEvent};

use super::assets::StaticAssets;
use super::realtime::RealtimeHandler;
use super::router::{site_routes, HttpResponder};
use super::shared::DriveLink;

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

// ============================================================================
// Server State
// ============================================================================

/// State shared by every axum handler.
pub struct WebState<L: DriveLink, S: StatusIndicator> {
    responder: Mutex<HttpResponder<S>>,
    realtime: RealtimeHandler<L>,
    next_client: AtomicU32,
}

impl<L: DriveLink, S: StatusIndicator> WebState<L, S> {
    /// Combine a responder and the drive link used by WebSocket clients.
    pub fn new(responder: HttpResponder<S>, link: L) -> Self {
        Self {
            responder: Mutex::new(responder),
            realtime: RealtimeHandler::new(link),
            next_client: AtomicU32::new(1),
        }
    }

    /// Run `f` against the responder with the lock held.
    pub fn with_responder<R>(&self, f: impl FnOnce(&mut HttpResponder<S>) -> R) -> R {
        let mut guard = self.responder.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn next_client_id(&self) -> ClientId {
        self.next_client.fetch_add(1, Ordering::Relaxed)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Fallback: every non-WebSocket request goes through the responder.
async fn dispatch<L, S>(
    State(state): State<Arc<WebState<L, S>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response
where
    L: DriveLink + 'static,
    S: StatusIndicator + Send + 'static,
{
    let Some(method) = HttpMethod::parse(method.as_str()) else {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    };

    let target = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    let mut req = HttpRequest::from_uri(method, target);
    if !body.is_empty() {
        req = req.with_body(body.to_vec());
    }

    state.with_responder(|responder| responder.handle(&req)).into_response()
}

/// GET {ws_path} - upgrade to the command channel.
async fn ws_upgrade<L, S>(
    State(state): State<Arc<WebState<L, S>>>,
    ws: WebSocketUpgrade,
) -> Response
where
    L: DriveLink + 'static,
    S: StatusIndicator + Send + 'static,
{
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket<L, S>(mut socket: WebSocket, state: Arc<WebState<L, S>>)
where
    L: DriveLink + 'static,
    S: StatusIndicator + Send + 'static,
{
    let client = state.next_client_id();
    let realtime = &state.realtime;

    if let Some(ack) = realtime.on_event(WsEvent::Connected { client }) {
        if socket.send(Message::Text(ack.to_string())).await.is_err() {
            realtime.on_event(WsEvent::Disconnected { client });
            return;
        }
    }

    while let Some(msg) = socket.recv().await {
        match msg {
            Ok(Message::Text(text)) => {
                realtime.on_event(WsEvent::Text {
                    client,
                    payload: text.as_bytes(),
                });
            }
            Ok(Message::Binary(data)) => {
                realtime.on_event(WsEvent::Binary {
                    client,
                    len: data.len(),
                });
            }
            Ok(Message::Close(_)) => break,
            // Ping/pong are answered by axum.
            Ok(_) => {}
            Err(e) => {
                warn!(client, error = %e, "websocket receive failed");
                break;
            }
        }
    }

    realtime.on_event(WsEvent::Disconnected { client });
}

// ============================================================================
// Server Builder
// ============================================================================

/// Build the axum router around an existing responder.
pub fn build_router<L, S>(responder: HttpResponder<S>, link: L, config: &WebConfig) -> Router
where
    L: DriveLink + 'static,
    S: StatusIndicator + Send + 'static,
{
    let state = Arc::new(WebState::new(responder, link));

    let mut router = Router::new();
    if config.site.has_realtime() {
        router = router.route(config.ws_path.as_str(), get(ws_upgrade::<L, S>));
    }
    let mut router = router.fallback(dispatch::<L, S>).with_state(state);

    if config.cors_permissive {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Build the full app for `config`: site routes, assets and WebSocket.
///
/// Assets come from `config.web.assets_dir`, or the embedded copies when it
/// is empty.
pub fn build_app<L, S>(config: &Config, link: L, indicator: S) -> Router
where
    L: DriveLink + Clone + 'static,
    S: StatusIndicator + Send + 'static,
{
    let assets = StaticAssets::from_dir_or_embedded(config.web.assets_dir.as_str());
    let responder = HttpResponder::new(site_routes(config, assets, link.clone()), indicator);
    build_router(responder, link, &config.web)
}

/// Serve `config` on `0.0.0.0:{port}` until the server stops.
pub async fn run_server<L, S>(config: &Config, link: L, indicator: S) -> Result<(), std::io::Error>
where
    L: DriveLink + Clone + 'static,
    S: StatusIndicator + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], config.web.port));
    let router = build_app(config, link, indicator);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, site = ?config.web.site, "web server listening");

    axum::serve(listener, router).await
}
