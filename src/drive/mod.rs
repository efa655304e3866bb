//! Drive state machine and cascaded control loop
//!
//! The drive walks a five-state machine:
//!
//! ```text
//!            enter_*_control()
//!   Ready ───────────────────────▶ PositionControl
//!     ▲                            VelocityControl      safety violation
//!     │         stop()             CurrentControl  ──────────────▶ Fault
//!     └────────────────────────────────┘                            │
//!     ▲                                                             │
//!     └──────────────────── reset_faults() ─────────────────────────┘
//! ```
//!
//! `Fault` is terminal for the control loop: outputs stay disabled and no
//! control arithmetic runs until an explicit [`reset_faults`]
//! (MotorController::reset_faults) re-arms the drive.

pub mod config;
pub mod controller;
pub mod history;
pub mod stats;

pub use config::{DriveConfig, DEFAULT_CONTROL_HZ, DEFAULT_ENCODER_PPR};
pub use controller::{MotorController, TickOutcome};
pub use history::{FaultEvent, FaultEventKind, FaultHistory, FAULT_HISTORY_SIZE};
pub use stats::LoopStats;

use core::fmt;

/// Drive control state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorState {
    /// Armed but idle: outputs disabled, no control loop active
    Ready,
    /// Full cascade: position -> velocity -> current
    PositionControl,
    /// Velocity and current loops only
    VelocityControl,
    /// Current loop only
    CurrentControl,
    /// Latched fault: outputs held at zero until fault reset
    Fault,
}

/// Errors rejecting a mode-select command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// Drive is in `Fault`; a fault reset is required before any mode change
    Faulted,
    /// Setpoint is NaN or infinite
    InvalidSetpoint {
        /// The rejected value
        value: f32,
    },
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::Faulted => {
                write!(f, "Drive is faulted: reset faults before changing mode")
            }
            ModeError::InvalidSetpoint { value } => {
                write!(f, "Setpoint {} is not a finite value", value)
            }
        }
    }
}
