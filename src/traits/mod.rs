//! Trait definitions for hardware abstraction and networking.
//!
//! This module defines the core abstractions that allow rs-wifibot to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Share HTTP and WebSocket handling between axum and esp-idf-svc
//!
//! # Submodules
//!
//! - `hardware`: Motor channels and the status indicator
//! - `network`: HTTP request/response types and WebSocket events
//!
//! # Hardware Abstraction
//!
//! - [`MotorChannel`]: direction pin + PWM duty for one DC motor
//! - [`StatusIndicator`]: status LED

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;
