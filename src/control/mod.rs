//! Control algorithms for the drive loop
//!
//! This module contains the three signal-processing stages of the cascaded
//! controller, each as an independent, host-testable unit:
//!
//! - [`pid`]: single-loop PID with anti-windup and derivative filtering
//! - [`velocity`]: encoder-delta velocity estimation with low-pass smoothing
//! - [`svm`]: space-vector modulation producing centered 3-phase duties

pub mod pid;
pub mod svm;
pub mod velocity;

pub use pid::{Pid, PidConfig};
pub use svm::{modulate, FULL_MODULATION};
pub use velocity::VelocityEstimator;
