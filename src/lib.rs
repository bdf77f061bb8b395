//! # rs-wifibot
//!
//! A WiFi-controlled two-motor robot: an HTTP responder, a WebSocket command
//! channel and the motor actuation behind them.
//!
//! ## Features
//!
//! - **Hardware abstraction**: Traits for motor channels and a status indicator
//! - **Two site profiles**: a plain-text greeter, or a control page that
//!   drives the robot over WebSocket
//! - **Fixed drive table**: forward, backward, pivot left/right and a
//!   mid-scale stop that holds directions
//! - **Same behavior everywhere**: the responder and command channel run
//!   unchanged under axum on desktop and esp-idf on ESP32
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware and network abstractions
//! - `commands` - Wire command decoding
//! - `drive` - Motor actuation for the two channels
//! - `config` - Shared configuration
//! - `services` - HTTP responder, WebSocket handler, axum server
//! - `hal` - Concrete implementations (mock for testing, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_wifibot::{Command, Direction, MotorController, hal::MockMotorChannel};
//!
//! // Create controller with mock channels
//! let mut drive =
//!     MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
//!
//! // Decode a frame from the control page and apply it
//! drive.apply(Command::decode(b"#L")).unwrap();
//!
//! let state = drive.state();
//! assert_eq!(state.left.direction, Direction::Backward);
//! assert_eq!(state.right.duty, 1023);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Wire command decoding for the realtime channel.
pub mod commands;
/// Shared configuration system for desktop and ESP32.
pub mod config;
/// Motor actuation: the drive table and the channel owner.
pub mod drive;
/// Error types for configuration and assets.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Core traits for hardware and network abstraction.
pub mod traits;

/// HTTP responder, realtime channel and servers (requires `std`).
#[cfg(feature = "std")]
pub mod services;

pub use commands::{Command, COMMAND_SENTINEL};
pub use config::Config;
pub use drive::{ChannelState, DriveState, MotorController, DUTY_MAX, DUTY_MIN, DUTY_STOP};
pub use error::ConfigError;
pub use traits::{Direction, HttpMethod, HttpRequest, HttpResponse, MotorChannel, StatusIndicator};

#[cfg(feature = "std")]
pub use error::AssetError;
