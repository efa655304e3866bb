//! Mock platform for host testing
//!
//! Scriptable stand-ins for every hardware collaborator of the drive loop.
//! Tests set sensor values between ticks and inspect what the controller
//! committed to the PWM output.

mod pwm;
mod sensors;

pub use pwm::MockPhaseOutput;
pub use sensors::{MockCurrentSensor, MockEncoder, MockTempSensor};
