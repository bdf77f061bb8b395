//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `embedded`: Generic channel over embedded-hal 1.0 (requires `embedded-hal` feature)
//! - `esp32`: ESP32-C3 with a two-channel DIR/PWM motor driver (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "embedded-hal")]
pub mod embedded;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "embedded-hal")]
pub use embedded::{HalChannelError, HalMotorChannel, PinIndicator};

#[cfg(feature = "esp32")]
pub use esp32::*;
