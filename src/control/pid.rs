//! PID controller with anti-windup and derivative filtering
//!
//! Single-loop proportional-integral-derivative compute unit used by all
//! three stages of the cascade. The integral term is hard-clamped every call
//! (anti-windup) and the derivative is smoothed by a one-pole low-pass filter
//! to suppress measurement noise amplification.
//!
//! State is explicit: each control stage owns its own [`Pid`] instance, so
//! multiple drives can run independently and tests are deterministic.

/// Smoothing coefficient for the derivative low-pass filter.
///
/// `filtered = 0.2 * raw + 0.8 * previous` — a one-pole filter that trades
/// ~5 samples of lag for strong attenuation of sample-to-sample noise.
pub const DERIVATIVE_FILTER_ALPHA: f32 = 0.2;

/// PID gain and limit configuration
///
/// The integral clamp bounds are inclusive and apply to the raw accumulator
/// (the sum of `error * dt`), not to the `ki`-scaled contribution. Pick them
/// so `ki * bound` stays within the actuator range of the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Lower clamp for the integral accumulator (inclusive)
    pub integral_min: f32,
    /// Upper clamp for the integral accumulator (inclusive)
    pub integral_max: f32,
    /// Fallback timestep (seconds) substituted when the caller supplies
    /// `dt <= 0`, e.g. on the first tick or a timer glitch
    pub nominal_dt: f32,
}

impl PidConfig {
    /// Create a config with the given gains and default clamp/timestep.
    ///
    /// Defaults: integral clamp ±100.0, nominal timestep 100 µs (10 kHz loop).
    pub const fn new(kp: f32, ki: f32, kd: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            integral_min: -100.0,
            integral_max: 100.0,
            nominal_dt: 1.0 / 10_000.0,
        }
    }

    /// Override the integral clamp bounds.
    pub const fn with_integral_limits(mut self, min: f32, max: f32) -> Self {
        self.integral_min = min;
        self.integral_max = max;
        self
    }

    /// Override the fallback timestep.
    pub const fn with_nominal_dt(mut self, dt: f32) -> Self {
        self.nominal_dt = dt;
        self
    }
}

/// PID controller state
///
/// Persists the integral accumulator, last error, and filtered derivative
/// across [`compute`](Pid::compute) calls.
#[derive(Debug, Clone)]
pub struct Pid {
    config: PidConfig,
    integral: f32,
    last_error: f32,
    derivative_filtered: f32,
}

impl Pid {
    /// Create a controller with zeroed state.
    pub const fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            last_error: 0.0,
            derivative_filtered: 0.0,
        }
    }

    /// Run one control step and return the output.
    ///
    /// # Arguments
    ///
    /// * `error` - Setpoint minus measurement
    /// * `dt` - Elapsed seconds since the previous compute call for this
    ///   stage. If `dt <= 0`, the configured nominal timestep is used
    ///   instead (never divides by zero or a negative interval).
    ///
    /// The output is `kp*error + ki*integral + kd*derivative_filtered`,
    /// where the integral is clamped to the configured bounds after every
    /// accumulation and the derivative is low-pass filtered.
    pub fn compute(&mut self, error: f32, dt: f32) -> f32 {
        let dt = if dt > 0.0 { dt } else { self.config.nominal_dt };

        self.integral = (self.integral + error * dt)
            .clamp(self.config.integral_min, self.config.integral_max);

        let raw_derivative = (error - self.last_error) / dt;
        self.derivative_filtered = DERIVATIVE_FILTER_ALPHA * raw_derivative
            + (1.0 - DERIVATIVE_FILTER_ALPHA) * self.derivative_filtered;

        self.last_error = error;

        self.config.kp * error
            + self.config.ki * self.integral
            + self.config.kd * self.derivative_filtered
    }

    /// Clear integral, last error, and filtered derivative.
    ///
    /// Called on mode entry and fault reset so a re-engaged loop does not
    /// act on stale windup.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
        self.derivative_filtered = 0.0;
    }

    /// Current integral accumulator value (diagnostics).
    pub fn integral(&self) -> f32 {
        self.integral
    }

    /// Current filtered derivative value (diagnostics).
    pub fn derivative_filtered(&self) -> f32 {
        self.derivative_filtered
    }

    /// Gain and limit configuration.
    pub fn config(&self) -> &PidConfig {
        &self.config
    }
}
