//! Safety limits and fault flags
//!
//! Limit evaluation is a pure decision over a snapshot of measurements: it
//! raises flags but performs no hardware action. The drive controller is the
//! single place that acts on the decision (zeroing outputs and latching the
//! fault state), which keeps this logic testable without hardware.
//!
//! All four conditions are evaluated on every call, without short-circuiting,
//! so the returned flags reflect the complete current evaluation rather than
//! the first violation found. Stickiness across ticks is the drive state's
//! responsibility (flags are OR-accumulated there).

use bitflags::bitflags;
use libm::fabsf;

bitflags! {
    /// Independent fault conditions.
    ///
    /// Sticky once latched into the drive state: they persist after the
    /// triggering condition clears, until an explicit fault reset.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FaultFlags: u8 {
        /// Measured current magnitude exceeded `max_current`
        const OVERCURRENT = 1 << 0;
        /// Velocity magnitude exceeded `max_velocity`
        const OVERSPEED = 1 << 1;
        /// Position left the `[position_min_deg, position_max_deg]` window
        const POSITION_LIMIT = 1 << 2;
        /// Temperature exceeded `max_temperature`
        const OVERTEMPERATURE = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FaultFlags {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FaultFlags({=u8:b})", self.bits());
    }
}

/// Snapshot of drive feedback for one control tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurements {
    /// Mechanical position in degrees
    pub position_deg: f32,
    /// Filtered velocity in RPM
    pub velocity_rpm: f32,
    /// Phase current in amperes
    pub current_amps: f32,
    /// Motor temperature in degrees Celsius
    pub temperature_c: f32,
}

/// Configured safety limits for one drive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafetyLimits {
    /// Maximum current magnitude in amperes
    pub max_current: f32,
    /// Maximum velocity magnitude in RPM
    pub max_velocity: f32,
    /// Lower mechanical position bound in degrees
    pub position_min_deg: f32,
    /// Upper mechanical position bound in degrees
    pub position_max_deg: f32,
    /// Maximum motor temperature in degrees Celsius
    pub max_temperature: f32,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_current: 5.0,
            max_velocity: 1000.0,
            position_min_deg: -180.0,
            position_max_deg: 180.0,
            max_temperature: 85.0,
        }
    }
}

impl SafetyLimits {
    /// Evaluate all four limit conditions against a measurement snapshot.
    ///
    /// Returns the flags raised by this evaluation only. An empty result
    /// means the snapshot is safe.
    pub fn evaluate(&self, m: &Measurements) -> FaultFlags {
        let mut flags = FaultFlags::empty();

        if fabsf(m.current_amps) > self.max_current {
            flags |= FaultFlags::OVERCURRENT;
        }
        if fabsf(m.velocity_rpm) > self.max_velocity {
            flags |= FaultFlags::OVERSPEED;
        }
        if m.position_deg < self.position_min_deg || m.position_deg > self.position_max_deg {
            flags |= FaultFlags::POSITION_LIMIT;
        }
        if m.temperature_c > self.max_temperature {
            flags |= FaultFlags::OVERTEMPERATURE;
        }

        flags
    }

    /// True when the snapshot violates no limit.
    pub fn is_safe(&self, m: &Measurements) -> bool {
        self.evaluate(m).is_empty()
    }
}
