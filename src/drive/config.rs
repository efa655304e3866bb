//! Drive configuration
//!
//! Loop frequency, encoder scaling, per-stage PID gains, and safety limits
//! for one drive instance. Defaults reproduce the reference servo tuning:
//! 10 kHz loop, 4096 PPR quadrature encoder, and the stock gain set for each
//! cascade stage.

use crate::control::PidConfig;
use crate::safety::SafetyLimits;

/// Default control loop frequency in Hz
pub const DEFAULT_CONTROL_HZ: u32 = 10_000;

/// Default encoder pulses per revolution (pre-quadrature)
pub const DEFAULT_ENCODER_PPR: u32 = 4_096;

/// Configuration for one drive instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriveConfig {
    /// Control loop frequency in Hz
    pub control_hz: u32,
    /// Encoder pulses per revolution; counts/rev is 4x this (quadrature)
    pub encoder_ppr: u32,
    /// Outer loop: position error (deg) -> velocity setpoint (RPM)
    pub position_pid: PidConfig,
    /// Middle loop: velocity error (RPM) -> current setpoint (A)
    pub velocity_pid: PidConfig,
    /// Inner loop: current error (A) -> voltage command (normalized)
    pub current_pid: PidConfig,
    /// Safety limits checked every tick
    pub limits: SafetyLimits,
}

impl Default for DriveConfig {
    fn default() -> Self {
        let nominal_dt = 1.0 / DEFAULT_CONTROL_HZ as f32;
        Self {
            control_hz: DEFAULT_CONTROL_HZ,
            encoder_ppr: DEFAULT_ENCODER_PPR,
            // Integral clamps sized so ki * bound stays within each stage's
            // actuator range (RPM, amperes, normalized volts respectively).
            position_pid: PidConfig::new(10.0, 0.1, 0.05)
                .with_integral_limits(-100.0, 100.0)
                .with_nominal_dt(nominal_dt),
            velocity_pid: PidConfig::new(0.5, 0.05, 0.01)
                .with_integral_limits(-100.0, 100.0)
                .with_nominal_dt(nominal_dt),
            current_pid: PidConfig::new(2.0, 20.0, 0.0)
                .with_integral_limits(-0.05, 0.05)
                .with_nominal_dt(nominal_dt),
            limits: SafetyLimits::default(),
        }
    }
}

impl DriveConfig {
    /// Encoder counts per mechanical revolution after quadrature decoding.
    #[inline]
    pub const fn counts_per_rev(&self) -> u32 {
        4 * self.encoder_ppr
    }

    /// Control loop period in microseconds.
    #[inline]
    pub const fn period_us(&self) -> u32 {
        1_000_000 / self.control_hz
    }

    /// Control loop period in seconds.
    #[inline]
    pub fn nominal_dt(&self) -> f32 {
        1.0 / self.control_hz as f32
    }

    /// Convert a raw encoder count to mechanical degrees.
    #[inline]
    pub fn position_degrees(&self, counts: i32) -> f32 {
        counts as f32 * 360.0 / self.counts_per_rev() as f32
    }
}
