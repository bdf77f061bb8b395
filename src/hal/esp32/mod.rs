//! ESP32-C3 hardware abstraction layer for the two-motor robot.
//!
//! This module provides hardware implementations for an ESP32-C3 SuperMini
//! driving two DC motors through a DIR/PWM motor driver (one direction pin
//! and one PWM pin per motor).
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Motor Driver**: two-channel DIR/PWM H-bridge shield
//! - **Status LED**: onboard blue LED (active low)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments.

mod led;
mod motor;

pub use led::{Esp32StatusLed, new_status_led};
pub use motor::{Esp32MotorChannel, new_motor_channels, ChannelPins};

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

#[cfg(feature = "esp32-http")]
mod http;
#[cfg(feature = "esp32-http")]
pub use http::{Esp32HttpServer, Esp32SharedState};

/// Pin assignments for the SuperMini ESP32-C3.
pub mod pins {
    // =========================================================================
    // Left motor
    // =========================================================================

    /// Left motor direction (driver polarity input A)
    pub const LEFT_DIR: i32 = 6;

    /// Left motor PWM (driver speed input A)
    pub const LEFT_PWM: i32 = 5;

    // =========================================================================
    // Right motor
    // =========================================================================

    /// Right motor direction (driver polarity input B)
    pub const RIGHT_DIR: i32 = 7;

    /// Right motor PWM (driver speed input B)
    pub const RIGHT_PWM: i32 = 4;

    // =========================================================================
    // Status
    // =========================================================================

    /// Onboard LED, lit when driven low
    pub const STATUS_LED: i32 = 8;
}
