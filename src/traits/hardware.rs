//! Hardware abstraction traits for motor channels and the status indicator.
//!
//! This module defines the hardware seams that let rs-wifibot run on an
//! ESP32 as well as on desktop with mocks.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MotorChannel`] | One DC motor: a direction output plus a PWM duty output |
//! | [`StatusIndicator`] | Single status LED pulsed while serving requests |
//!
//! # Example
//!
//! ```rust
//! use rs_wifibot::traits::{Direction, MotorChannel};
//! use rs_wifibot::hal::MockMotorChannel;
//!
//! let mut channel = MockMotorChannel::new();
//! channel.set_direction(Direction::Backward).unwrap();
//! channel.set_duty(1023).unwrap();
//!
//! assert_eq!(channel.direction, Direction::Backward);
//! assert_eq!(channel.duty, 1023);
//! ```

/// Rotation direction of a single motor.
///
/// Drives the polarity input of the motor driver. [`Forward`](Self::Forward)
/// is a high level on the direction pin, [`Backward`](Self::Backward) a low
/// level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    /// Forward rotation (direction pin high).
    #[default]
    Forward,
    /// Backward rotation (direction pin low).
    Backward,
}

impl Direction {
    /// Returns the direction as a lowercase string.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_wifibot::Direction;
    ///
    /// assert_eq!(Direction::Forward.as_str(), "forward");
    /// assert_eq!(Direction::Backward.as_str(), "backward");
    /// ```
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }

    /// Logic level to drive on the direction pin.
    #[inline]
    pub const fn is_high(&self) -> bool {
        matches!(self, Direction::Forward)
    }
}

/// One DC motor behind a direction/PWM pin pair.
///
/// Implement this for your motor driver. Writes are plain side effects with
/// no feedback; the associated error only exists so real HALs can report
/// driver failures.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_wifibot::traits::{Direction, MotorChannel};
///
/// struct MyChannel { /* pin handles */ }
///
/// impl MotorChannel for MyChannel {
///     type Error = ();
///
///     fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
///         // Drive the polarity pin high or low...
///         Ok(())
///     }
///
///     fn set_duty(&mut self, duty: u16) -> Result<(), ()> {
///         // Write the 10-bit duty to the PWM peripheral...
///         Ok(())
///     }
/// }
/// ```
pub trait MotorChannel {
    /// Error type for channel writes.
    type Error;

    /// Drive the direction output.
    fn set_direction(&mut self, dir: Direction) -> Result<(), Self::Error>;

    /// Write the PWM duty, 0 to [`DUTY_MAX`](crate::drive::DUTY_MAX).
    ///
    /// Values above the maximum should be clamped.
    fn set_duty(&mut self, duty: u16) -> Result<(), Self::Error>;
}

/// Status indicator output (usually the onboard LED).
pub trait StatusIndicator {
    /// Turn the indicator on or off.
    fn set(&mut self, on: bool);

    /// Turn the indicator on.
    fn on(&mut self) {
        self.set(true);
    }

    /// Turn the indicator off.
    fn off(&mut self) {
        self.set(false);
    }
}

/// Indicator that drives nothing, for setups without a status LED.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoIndicator;

impl StatusIndicator for NoIndicator {
    fn set(&mut self, _on: bool) {}
}
