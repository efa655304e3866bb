//! 3-phase PWM output trait
//!
//! The drive controller commits duty fractions through this trait. The commit
//! must be atomic: all three phases take effect as one switching pattern, never
//! a mix of old and new duties.

use core::fmt;

/// PWM output error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// PWM hardware unavailable or the commit failed
    HardwareFault,
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputError::HardwareFault => write!(f, "PWM hardware fault"),
        }
    }
}

/// Atomic 3-phase duty-cycle sink.
pub trait PhaseOutput {
    /// Apply three duty fractions as the new switching pattern.
    ///
    /// # Arguments
    ///
    /// * `duties` - `[phase_a, phase_b, phase_c]`, each in `[0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `OutputError::HardwareFault` if the hardware rejects the
    /// commit.
    fn apply(&mut self, duties: [f32; 3]) -> Result<(), OutputError>;

    /// Disable all outputs (gate drivers off, duties forced to zero).
    ///
    /// This is the fault shutdown path and must leave the bridge in its
    /// safest state even if a later `apply` would fail.
    fn disable(&mut self) -> Result<(), OutputError>;
}
