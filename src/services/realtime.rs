//! WebSocket command channel.
//!
//! Transport-neutral: the axum route and the esp-idf `ws_handler` both turn
//! their frames into [`WsEvent`]s and pass them here. Each text frame is
//! decoded into a [`Command`] and handed to the drive as-is. There is no
//! per-client state beyond the id used in log lines.

use tracing::{debug, info};

use crate::commands::Command;
use crate::traits::WsEvent;

use super::shared::DriveLink;

/// Text sent to a client right after the handshake.
pub const CONNECTED_ACK: &str = "Connected";

/// Turns WebSocket events into drive commands.
#[derive(Clone, Debug)]
pub struct RealtimeHandler<L: DriveLink> {
    link: L,
}

impl<L: DriveLink> RealtimeHandler<L> {
    /// Create a handler that submits to `link`.
    pub fn new(link: L) -> Self {
        Self { link }
    }

    /// Handle one event and return the text to send back, if any.
    ///
    /// Only `Connected` produces a reply. Text frames never fail: anything
    /// that is not a valid command decodes to stop.
    pub fn on_event(&self, event: WsEvent<'_>) -> Option<&'static str> {
        match event {
            WsEvent::Connected { client } => {
                info!(client, "websocket connected");
                Some(CONNECTED_ACK)
            }
            WsEvent::Text { client, payload } => {
                let cmd = Command::decode(payload);
                debug!(client, frame = %String::from_utf8_lossy(payload), command = cmd.as_str(), "websocket command");
                self.link.submit(cmd);
                None
            }
            WsEvent::Binary { client, len } => {
                debug!(client, len, "ignoring binary frame");
                None
            }
            WsEvent::Disconnected { client } => {
                info!(client, "websocket disconnected");
                None
            }
        }
    }

    /// The drive link.
    pub fn link(&self) -> &L {
        &self.link
    }
}
