//! Encoder-based velocity estimation
//!
//! Converts successive raw encoder counts into a smoothed velocity signal in
//! revolutions per minute. The raw estimate differentiates the count delta at
//! the loop frequency; an exponential filter then suppresses the quantization
//! noise inherent to single-period differentiation.
//!
//! # Known limitation
//!
//! Counter wrap-around is not detected here. The upstream encoder collaborator
//! must provide a monotonically consistent (unwrapped) count, or the estimate
//! will show a transient spike on wrap.

/// Smoothing coefficient for the velocity low-pass filter.
///
/// `filtered = 0.1 * raw + 0.9 * previous`. At a 10 kHz loop this gives a
/// time constant of roughly 1 ms.
pub const VELOCITY_FILTER_ALPHA: f32 = 0.1;

/// Velocity estimator state
///
/// Owns the last raw count and the filter output. One instance per drive,
/// embedded in the drive state and updated once per control tick.
#[derive(Debug, Clone, Default)]
pub struct VelocityEstimator {
    last_counts: Option<i32>,
    filtered_rpm: f32,
}

impl VelocityEstimator {
    /// Create an estimator with no count history (first sample seeds it).
    pub const fn new() -> Self {
        Self {
            last_counts: None,
            filtered_rpm: 0.0,
        }
    }

    /// Update the estimate from a new raw encoder count.
    ///
    /// # Arguments
    ///
    /// * `raw_counts` - Current encoder count (quadrature-decoded)
    /// * `loop_hz` - Control loop frequency the deltas are sampled at
    /// * `counts_per_rev` - Encoder counts per mechanical revolution,
    ///   including the 4x quadrature multiplier
    ///
    /// Returns the filtered velocity in RPM. The first call seeds the count
    /// history and contributes a zero raw sample, so startup does not produce
    /// a spurious spike from an arbitrary initial count.
    pub fn estimate(&mut self, raw_counts: i32, loop_hz: f32, counts_per_rev: u32) -> f32 {
        let raw_rpm = match self.last_counts {
            Some(last) => {
                raw_counts.wrapping_sub(last) as f32 * loop_hz * 60.0 / counts_per_rev as f32
            }
            None => 0.0,
        };

        self.filtered_rpm =
            VELOCITY_FILTER_ALPHA * raw_rpm + (1.0 - VELOCITY_FILTER_ALPHA) * self.filtered_rpm;
        self.last_counts = Some(raw_counts);

        self.filtered_rpm
    }

    /// Current filtered velocity in RPM.
    pub fn velocity_rpm(&self) -> f32 {
        self.filtered_rpm
    }

    /// Re-seed the estimator at the given count and zero the filter.
    ///
    /// Called on fault reset so the first post-reset tick does not
    /// differentiate across the outage.
    pub fn reset(&mut self, counts: i32) {
        self.last_counts = Some(counts);
        self.filtered_rpm = 0.0;
    }
}
