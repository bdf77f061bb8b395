//! Mock implementations for testing without hardware.
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockMotorChannel`] | [`MotorChannel`] | Records direction/duty writes |
//! | [`MockStatusLed`] | [`StatusIndicator`] | Counts pulses |
//!
//! # Example
//!
//! ```rust
//! use rs_wifibot::{Command, MotorController};
//! use rs_wifibot::hal::{ChannelWrite, MockMotorChannel};
//!
//! let mut drive =
//!     MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
//! drive.apply(Command::Forward).unwrap();
//!
//! let left = drive.left_channel();
//! assert_eq!(left.history.last(), Some(&ChannelWrite::Duty(1023)));
//! ```
//!
//! [`MotorChannel`]: crate::traits::MotorChannel
//! [`StatusIndicator`]: crate::traits::StatusIndicator

extern crate alloc;
use alloc::vec::Vec;

use crate::drive::DUTY_MAX;
use crate::traits::{Direction, MotorChannel, StatusIndicator};

/// A single write recorded by [`MockMotorChannel`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelWrite {
    /// `set_direction` call.
    Direction(Direction),
    /// `set_duty` call (after clamping).
    Duty(u16),
}

/// Mock motor channel for testing.
///
/// Public fields expose the last written pin state and every write in order.
#[derive(Debug, Default)]
pub struct MockMotorChannel {
    /// Last direction written.
    pub direction: Direction,
    /// Last duty written.
    pub duty: u16,
    /// Number of `set_direction` calls.
    pub direction_writes: usize,
    /// Number of `set_duty` calls.
    pub duty_writes: usize,
    /// Every write, oldest first.
    pub history: Vec<ChannelWrite>,
}

impl MockMotorChannel {
    /// Creates a channel with direction forward and duty 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget recorded writes, keeping the current pin state.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.direction_writes = 0;
        self.duty_writes = 0;
    }
}

impl MotorChannel for MockMotorChannel {
    type Error = ();

    fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
        self.direction = dir;
        self.direction_writes += 1;
        self.history.push(ChannelWrite::Direction(dir));
        Ok(())
    }

    fn set_duty(&mut self, duty: u16) -> Result<(), ()> {
        let duty = duty.min(DUTY_MAX);
        self.duty = duty;
        self.duty_writes += 1;
        self.history.push(ChannelWrite::Duty(duty));
        Ok(())
    }
}

/// Mock status LED.
///
/// ```rust
/// use rs_wifibot::hal::MockStatusLed;
/// use rs_wifibot::traits::StatusIndicator;
///
/// let mut led = MockStatusLed::new();
/// led.on();
/// led.off();
/// assert_eq!(led.pulses, 1);
/// assert!(!led.lit);
/// ```
#[derive(Debug, Default)]
pub struct MockStatusLed {
    /// Whether the LED is currently on.
    pub lit: bool,
    /// Number of on→off transitions.
    pub pulses: usize,
    /// Number of `set` calls.
    pub writes: usize,
}

impl MockStatusLed {
    /// Creates an LED that starts off.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusIndicator for MockStatusLed {
    fn set(&mut self, on: bool) {
        if self.lit && !on {
            self.pulses += 1;
        }
        self.lit = on;
        self.writes += 1;
    }
}
