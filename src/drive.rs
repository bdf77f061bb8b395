//! Motor actuation for the two drive channels.
//!
//! [`MotorController`] owns the left and right [`MotorChannel`]s and is the
//! only thing that writes to them. Each [`Command`] maps to a fixed pin state:
//!
//! | Command  | Left dir | Right dir | Left duty | Right duty |
//! |----------|----------|-----------|-----------|------------|
//! | stop     | hold     | hold      | 512       | 512        |
//! | forward  | forward  | forward   | 1023      | 1023       |
//! | backward | backward | backward  | 0         | 0          |
//! | left     | backward | forward   | 0         | 1023       |
//! | right    | forward  | backward  | 1023      | 0          |
//!
//! Stop is the PWM midpoint, not zero. On this H-bridge wiring a zero duty is
//! a full drive signal in the backward sense, so mid-scale is the only value
//! that holds the motors still.
//!
//! # Example
//!
//! ```rust
//! use rs_wifibot::{Command, Direction, MotorController, hal::MockMotorChannel};
//! use rs_wifibot::drive::{DUTY_MAX, DUTY_STOP};
//!
//! let mut drive =
//!     MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
//!
//! drive.apply(Command::decode(b"#F")).unwrap();
//! assert_eq!(drive.state().left.duty, DUTY_MAX);
//! assert_eq!(drive.state().right.direction, Direction::Forward);
//!
//! drive.apply(Command::decode(b"#Q")).unwrap();
//! assert_eq!(drive.state().left.duty, DUTY_STOP);
//! assert_eq!(drive.state().left.direction, Direction::Forward); // held
//! ```

use crate::commands::Command;
use crate::traits::{Direction, MotorChannel};

/// Lowest PWM duty (full drive, backward sense on this wiring).
pub const DUTY_MIN: u16 = 0;

/// PWM midpoint; holds the motor still.
pub const DUTY_STOP: u16 = 512;

/// Highest PWM duty for the 10-bit PWM (full drive, forward sense).
pub const DUTY_MAX: u16 = 1023;

/// Direction and duty of one motor channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelState {
    /// Direction pin state.
    pub direction: Direction,
    /// PWM duty, 0 to [`DUTY_MAX`].
    pub duty: u16,
}

impl ChannelState {
    /// Create a channel state.
    pub const fn new(direction: Direction, duty: u16) -> Self {
        Self { direction, duty }
    }

    /// Stopped channel facing `direction`.
    pub const fn stopped(direction: Direction) -> Self {
        Self::new(direction, DUTY_STOP)
    }

    /// Returns true when the duty is the stop midpoint.
    pub const fn is_stopped(&self) -> bool {
        self.duty == DUTY_STOP
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::stopped(Direction::Forward)
    }
}

/// Pin state of both drive channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveState {
    /// Left motor.
    pub left: ChannelState,
    /// Right motor.
    pub right: ChannelState,
}

impl DriveState {
    /// State asserted at boot: both channels forward and stopped.
    pub const BOOT: DriveState = DriveState {
        left: ChannelState::stopped(Direction::Forward),
        right: ChannelState::stopped(Direction::Forward),
    };

    /// State after applying `cmd` to `self`.
    ///
    /// Pure: only stop depends on the current state (it keeps the directions).
    pub const fn after(self, cmd: Command) -> DriveState {
        use Direction::{Backward, Forward};

        match cmd {
            Command::Stop => DriveState {
                left: ChannelState::stopped(self.left.direction),
                right: ChannelState::stopped(self.right.direction),
            },
            Command::Forward => DriveState {
                left: ChannelState::new(Forward, DUTY_MAX),
                right: ChannelState::new(Forward, DUTY_MAX),
            },
            Command::Backward => DriveState {
                left: ChannelState::new(Backward, DUTY_MIN),
                right: ChannelState::new(Backward, DUTY_MIN),
            },
            Command::Left => DriveState {
                left: ChannelState::new(Backward, DUTY_MIN),
                right: ChannelState::new(Forward, DUTY_MAX),
            },
            Command::Right => DriveState {
                left: ChannelState::new(Forward, DUTY_MAX),
                right: ChannelState::new(Backward, DUTY_MIN),
            },
        }
    }

    /// Returns true when both channels sit at the stop midpoint.
    pub const fn is_stopped(&self) -> bool {
        self.left.is_stopped() && self.right.is_stopped()
    }
}

/// Owner of the two drive channels.
///
/// # Type Parameter
///
/// - `C`: the channel implementation ([`MotorChannel`] trait); both sides use
///   the same type.
///
/// # Thread Safety
///
/// The controller itself is not thread-safe. On the device it lives in the
/// control loop; on desktop, wrap it in `SharedDriveState` from the services
/// module.
pub struct MotorController<C: MotorChannel> {
    left: C,
    right: C,
    state: DriveState,
    last_command: Command,
}

impl<C: MotorChannel> MotorController<C> {
    /// Take ownership of both channels and assert the boot state.
    ///
    /// # Errors
    ///
    /// Returns the first channel write error.
    pub fn new(left: C, right: C) -> Result<Self, C::Error> {
        let mut controller = Self {
            left,
            right,
            state: DriveState::BOOT,
            last_command: Command::Stop,
        };
        controller.write(DriveState::BOOT, true)?;
        Ok(controller)
    }

    /// Apply a command to both channels.
    ///
    /// Stop writes only the duties. Every other command writes direction,
    /// then duty, on the left channel and then the right. Re-applying the
    /// same command re-asserts the same pin state.
    ///
    /// On a write error the pins written so far stay written and
    /// [`state`](Self::state) reflects them; `last_command` is unchanged.
    pub fn apply(&mut self, cmd: Command) -> Result<(), C::Error> {
        let next = self.state.after(cmd);
        self.write(next, !cmd.is_stop())?;

        tracing::debug!(
            command = cmd.as_str(),
            left_dir = next.left.direction.as_str(),
            left_duty = next.left.duty,
            right_dir = next.right.direction.as_str(),
            right_duty = next.right.duty,
            "drive applied"
        );

        self.last_command = cmd;
        Ok(())
    }

    /// Hold position (duties at mid-scale, directions unchanged).
    pub fn stop(&mut self) -> Result<(), C::Error> {
        self.apply(Command::Stop)
    }

    /// Drive both motors forward.
    pub fn forward(&mut self) -> Result<(), C::Error> {
        self.apply(Command::Forward)
    }

    /// Drive both motors backward.
    pub fn backward(&mut self) -> Result<(), C::Error> {
        self.apply(Command::Backward)
    }

    /// Pivot left in place.
    pub fn left(&mut self) -> Result<(), C::Error> {
        self.apply(Command::Left)
    }

    /// Pivot right in place.
    pub fn right(&mut self) -> Result<(), C::Error> {
        self.apply(Command::Right)
    }

    /// Current pin state of both channels.
    #[inline]
    pub fn state(&self) -> DriveState {
        self.state
    }

    /// Most recently applied command ([`Command::Stop`] at boot).
    #[inline]
    pub fn last_command(&self) -> Command {
        self.last_command
    }

    /// Left channel (for inspection).
    pub fn left_channel(&self) -> &C {
        &self.left
    }

    /// Right channel (for inspection).
    pub fn right_channel(&self) -> &C {
        &self.right
    }

    /// Give the channels back.
    pub fn into_channels(self) -> (C, C) {
        (self.left, self.right)
    }

    /// Write `next` to the pins, recording each pin in `self.state` as soon
    /// as its write succeeds. On error the recorded state still matches the
    /// hardware.
    fn write(&mut self, next: DriveState, directions: bool) -> Result<(), C::Error> {
        if directions {
            self.left.set_direction(next.left.direction)?;
            self.state.left.direction = next.left.direction;
        }
        self.left.set_duty(next.left.duty)?;
        self.state.left.duty = next.left.duty;

        if directions {
            self.right.set_direction(next.right.direction)?;
            self.state.right.direction = next.right.direction;
        }
        self.right.set_duty(next.right.duty)?;
        self.state.right.duty = next.right.duty;
        Ok(())
    }
}
