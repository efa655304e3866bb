//! Platform implementations
//!
//! Only the mock platform lives in this crate: it backs the host test suite.
//! Hardware platforms (encoder timer peripherals, ADC current sense, 3-phase
//! PWM timers) implement the same traits in their firmware crates.

pub mod mock;
