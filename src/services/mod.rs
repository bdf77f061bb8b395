//! Network services: HTTP responder, WebSocket command channel and the
//! desktop axum server.
//!
//! The responder and the realtime handler are platform-neutral; the axum
//! server (`web` feature) and the esp-idf server (`esp32-http` feature) are
//! thin adapters around them.
//!
//! # Shared Drive Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_wifibot::services::{run_server, SharedDriveState};
//!
//! let drive = Arc::new(SharedDriveState::new(controller));
//! run_server(&config, Arc::clone(&drive), NoIndicator).await?;
//! ```

pub mod assets;
pub mod realtime;
pub mod router;
pub mod shared;

#[cfg(feature = "web")]
pub mod web;

pub use assets::*;
pub use realtime::*;
pub use router::*;
pub use shared::*;

#[cfg(feature = "web")]
pub use web::*;
