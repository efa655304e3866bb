//! Platform-agnostic trait abstractions
//!
//! Hardware collaborators are injected into the drive loop through these
//! traits, so the whole control core runs on host against the mock platform:
//!
//! - [`time`]: monotonic time source for dt measurement and loop statistics
//! - [`feedback`]: encoder, current, and temperature sensor reads
//! - [`output`]: atomic 3-phase PWM duty commit

pub mod feedback;
pub mod output;
pub mod time;

pub use feedback::{CurrentSensor, PositionSensor, TemperatureSensor};
pub use output::{OutputError, PhaseOutput};
pub use time::{MockTime, TimeSource};
