//! Shared drive state for the desktop services.
//!
//! `SharedDriveState` wraps the single [`MotorController`] so that the HTTP
//! responder and every WebSocket client write through one lock, keeping the
//! controller the only writer to the channels.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rs_wifibot::{Command, MotorController, hal::MockMotorChannel};
//! use rs_wifibot::services::{DriveLink, SharedDriveState};
//!
//! let drive = MotorController::new(MockMotorChannel::new(), MockMotorChannel::new()).unwrap();
//! let shared = Arc::new(SharedDriveState::new(drive));
//!
//! shared.submit(Command::Forward);
//! assert_eq!(shared.snapshot().last_command, Command::Forward);
//! ```

use std::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use crate::commands::Command;
use crate::drive::{DriveState, MotorController};
use crate::traits::MotorChannel;

// ============================================================================
// Drive Link Trait
// ============================================================================

/// Point-in-time view of the drive, as served on `/api/state`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveSnapshot {
    /// Pin state of both channels.
    pub state: DriveState,
    /// Most recently applied command.
    pub last_command: Command,
}

/// Handle through which network services reach the motors.
///
/// Desktop implements this by applying the command immediately under a lock.
/// The ESP32 implementation parks the command for the control loop.
pub trait DriveLink: Send + Sync {
    /// Hand a decoded command to the drive.
    fn submit(&self, cmd: Command);

    /// Current drive state.
    fn snapshot(&self) -> DriveSnapshot;
}

// ============================================================================
// Shared Drive State
// ============================================================================

/// Thread-safe owner of the motor controller (desktop).
///
/// Uses `Mutex` rather than `RwLock`: writes (one per WebSocket frame) are as
/// frequent as reads.
pub struct SharedDriveState<C: MotorChannel> {
    controller: Mutex<MotorController<C>>,
}

impl<C: MotorChannel> SharedDriveState<C> {
    /// Wrap a controller.
    pub fn new(controller: MotorController<C>) -> Self {
        Self {
            controller: Mutex::new(controller),
        }
    }

    /// Access the controller with the lock held.
    ///
    /// The closure form keeps the guard from living across an `.await`.
    pub fn with_controller<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut MotorController<C>) -> R,
    {
        let mut guard = self.controller.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    /// Apply `cmd` and return the channel error, if any.
    pub fn apply(&self, cmd: Command) -> Result<(), C::Error> {
        self.with_controller(|controller| controller.apply(cmd))
    }

    /// Current pin state.
    pub fn state(&self) -> DriveState {
        self.with_controller(|controller| controller.state())
    }

    /// Current pin state plus the last command.
    pub fn snapshot(&self) -> DriveSnapshot {
        self.with_controller(|controller| DriveSnapshot {
            state: controller.state(),
            last_command: controller.last_command(),
        })
    }
}

impl<C> DriveLink for Arc<SharedDriveState<C>>
where
    C: MotorChannel + Send + 'static,
    C::Error: Debug,
{
    fn submit(&self, cmd: Command) {
        if let Err(e) = self.apply(cmd) {
            tracing::warn!(command = cmd.as_str(), error = ?e, "motor write failed");
        }
    }

    fn snapshot(&self) -> DriveSnapshot {
        SharedDriveState::snapshot(self)
    }
}
