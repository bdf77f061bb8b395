//! HTTP and WebSocket server for ESP32.
//!
//! Wraps esp-idf-svc's `EspHttpServer`. Every plain HTTP request is turned
//! into an [`HttpRequest`] and answered by the shared [`HttpResponder`], so
//! routes, the 404 page and the LED pulse match the desktop server. The
//! control panel additionally gets a WebSocket endpoint whose frames go
//! through [`RealtimeHandler`].
//!
//! Handlers run on the httpd task. They never touch the motors: commands are
//! parked in [`Esp32SharedState`] and the control loop applies them.
//!
//! # Example
//!
//! ```ignore
//! use rs_wifibot::hal::esp32::{Esp32HttpServer, Esp32SharedState};
//! use rs_wifibot::services::{greeter_routes, HttpResponder};
//! use std::sync::{Arc, Mutex};
//!
//! let shared = Arc::new(Mutex::new(Esp32SharedState::default()));
//! let responder = HttpResponder::new(greeter_routes("wifibot"), led);
//! let server = Esp32HttpServer::new(&config.web, responder, shared)?;
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use esp_idf_svc::http::server::ws::EspHttpWsConnection;
use esp_idf_svc::http::server::{Configuration, EspHttpServer};
use esp_idf_svc::http::Method;
use esp_idf_svc::io::{Read, Write};
use esp_idf_svc::sys::EspError;
use esp_idf_svc::ws::FrameType;
use tracing::{info, warn};

use crate::commands::Command;
use crate::config::WebConfig;
use crate::drive::DriveState;
use crate::services::{DriveLink, DriveSnapshot, HttpResponder, RealtimeHandler};
use crate::traits::{read_body, HttpMethod, HttpRequest, StatusIndicator, WsEvent};

/// Largest request body or WebSocket frame we read; longer bodies are cut.
const MAX_BODY_LEN: usize = 1024;

/// Methods routed to the responder.
const METHODS: [HttpMethod; 7] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
    HttpMethod::Patch,
    HttpMethod::Head,
    HttpMethod::Options,
];

fn esp_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
        HttpMethod::Delete => Method::Delete,
        HttpMethod::Patch => Method::Patch,
        HttpMethod::Head => Method::Head,
        HttpMethod::Options => Method::Options,
    }
}

// ============================================================================
// Shared State
// ============================================================================

/// State shared between the HTTP task and the control loop.
///
/// The control loop should:
/// 1. Take `pending_command` each tick and apply it
/// 2. Publish the resulting state with [`publish`](Self::publish)
#[derive(Debug, Default)]
pub struct Esp32SharedState {
    /// Pin state as of the last control loop tick
    pub state: DriveState,
    /// Command applied on the last control loop tick
    pub last_command: Command,
    /// Command waiting for the control loop (latest wins)
    pub pending_command: Option<Command>,
}

impl Esp32SharedState {
    /// Take the pending command, leaving the slot empty.
    pub fn take_pending(&mut self) -> Option<Command> {
        self.pending_command.take()
    }

    /// Record what the control loop just applied.
    pub fn publish(&mut self, state: DriveState, last_command: Command) {
        self.state = state;
        self.last_command = last_command;
    }
}

impl DriveLink for Arc<Mutex<Esp32SharedState>> {
    fn submit(&self, cmd: Command) {
        let mut shared = self.lock().unwrap_or_else(PoisonError::into_inner);
        shared.pending_command = Some(cmd);
    }

    fn snapshot(&self) -> DriveSnapshot {
        let shared = self.lock().unwrap_or_else(PoisonError::into_inner);
        DriveSnapshot {
            state: shared.state,
            last_command: shared.last_command,
        }
    }
}

// ============================================================================
// Server
// ============================================================================

/// HTTP server plus optional WebSocket command channel.
///
/// Dropping this stops the server.
pub struct Esp32HttpServer {
    _server: EspHttpServer<'static>,
}

impl Esp32HttpServer {
    /// Start the server on `config.port`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to start or a handler fails to
    /// register.
    pub fn new<S>(
        config: &WebConfig,
        responder: HttpResponder<S>,
        shared: Arc<Mutex<Esp32SharedState>>,
    ) -> anyhow::Result<Self>
    where
        S: StatusIndicator + Send + 'static,
    {
        let server_config = Configuration {
            http_port: config.port,
            uri_match_wildcard: true,
            // One wildcard handler per method plus the WebSocket.
            max_uri_handlers: METHODS.len() + 1,
            ..Default::default()
        };

        let mut server = EspHttpServer::new(&server_config)?;

        // Registered before the wildcard so the upgrade request reaches it.
        if config.site.has_realtime() {
            let realtime = RealtimeHandler::new(shared);
            server.ws_handler(config.ws_path.as_str(), move |ws: &mut EspHttpWsConnection| {
                handle_ws(&realtime, ws)
            })?;
            info!("[HTTP] WebSocket on {}", config.ws_path);
        }

        let responder = Arc::new(Mutex::new(responder));
        for method in METHODS {
            let responder = Arc::clone(&responder);
            server.fn_handler("/*", esp_method(method), move |mut req| {
                let mut http_req = HttpRequest::from_uri(method, req.uri());

                let mut buf = [0u8; MAX_BODY_LEN];
                let len = read_body(&mut buf, |chunk| req.read(chunk));
                if len > 0 {
                    http_req = http_req.with_body(&buf[..len]);
                }

                let resp = responder
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle(&http_req);

                let mut out =
                    req.into_response(resp.status, None, &[("Content-Type", resp.content_type)])?;
                out.write_all(&resp.body)?;
                Ok::<_, anyhow::Error>(())
            })?;
        }

        info!("[HTTP] Server started on port {}", config.port);

        Ok(Self { _server: server })
    }
}

fn handle_ws<L: DriveLink>(
    realtime: &RealtimeHandler<L>,
    ws: &mut EspHttpWsConnection,
) -> Result<(), EspError> {
    let client = ws.session() as u32;

    if ws.is_new() {
        if let Some(ack) = realtime.on_event(WsEvent::Connected { client }) {
            ws.send(FrameType::Text(false), ack.as_bytes())?;
        }
        return Ok(());
    }

    if ws.is_closed() {
        realtime.on_event(WsEvent::Disconnected { client });
        return Ok(());
    }

    // First call with an empty buffer only reports the frame length.
    let (frame_type, len) = ws.recv(&mut [])?;
    if len > MAX_BODY_LEN {
        warn!(client, len, "[WS] Frame too large, dropped");
        return Ok(());
    }

    let mut buf = [0u8; MAX_BODY_LEN];
    ws.recv(&mut buf[..len])?;

    match frame_type {
        FrameType::Text(_) => {
            // esp-idf counts the trailing NUL in text frames.
            let payload = match buf[..len].split_last() {
                Some((0, rest)) => rest,
                _ => &buf[..len],
            };
            realtime.on_event(WsEvent::Text { client, payload });
        }
        FrameType::Binary(_) => {
            realtime.on_event(WsEvent::Binary { client, len });
        }
        _ => {}
    }

    Ok(())
}
