//! Cascaded control loop
//!
//! `MotorController` is the fixed-rate loop body: it reads feedback, derives
//! velocity, evaluates safety, walks the active PID stages top-down (each
//! stage's output is the next stage's setpoint), modulates the voltage
//! command into 3-phase duties, and commits them atomically.
//!
//! # Tick ordering
//!
//! Within one tick the steps execute in strict sequence — acquire, estimate,
//! safety, position loop, velocity loop, current loop, modulate, commit. No
//! reordering is possible because each stage feeds the next. The safety gate
//! runs before any PID stage: an unsafe snapshot zeroes the outputs and
//! latches `Fault` without running control arithmetic that tick.
//!
//! # Concurrency contract
//!
//! One logical thread per drive. The periodic trigger must not re-enter
//! `tick` before it returns; a deadline overrun that causes re-entry is a
//! fatal timing fault outside this contract (overruns are counted in
//! [`LoopStats`] so supervisors can watch for them).

use crate::control::{modulate, Pid, VelocityEstimator};
use crate::drive::config::DriveConfig;
use crate::drive::history::{FaultEvent, FaultEventKind, FaultHistory};
use crate::drive::stats::LoopStats;
use crate::drive::{ModeError, MotorState};
use crate::safety::{FaultFlags, Measurements};
use crate::traits::feedback::{CurrentSensor, PositionSensor, TemperatureSensor};
use crate::traits::output::{OutputError, PhaseOutput};
use crate::traits::time::TimeSource;

/// Returns zero feedforward (no trajectory shaping applied).
/// Used as default when no feedforward provider is configured.
fn zero_feedforward(_position_setpoint_deg: f32) -> f32 {
    0.0
}

/// Summary of one control tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Drive state after the tick
    pub state: MotorState,
    /// Duty fractions held by the drive after the tick
    pub duties: [f32; 3],
    /// Sticky fault flags after the tick
    pub faults: FaultFlags,
    /// Position measured this tick in degrees
    pub position_deg: f32,
    /// Filtered velocity this tick in RPM
    pub velocity_rpm: f32,
}

/// Cascaded motor controller for one drive
///
/// Exclusively owns all per-drive state: the three PID stages, the velocity
/// estimator, sticky fault flags, committed duties, loop statistics, and the
/// fault history. Collaborators (sensors, PWM) are passed into [`tick`]
/// (MotorController::tick) each call.
pub struct MotorController<T: TimeSource> {
    config: DriveConfig,
    time: T,

    state: MotorState,
    position_setpoint_deg: f32,
    velocity_setpoint_rpm: f32,
    current_setpoint_amps: f32,
    measurements: Measurements,

    position_pid: Pid,
    velocity_pid: Pid,
    current_pid: Pid,
    velocity_estimator: VelocityEstimator,
    /// Provider mapping the position setpoint trajectory to a velocity
    /// feedforward term in RPM. Opaque: the algorithm belongs to the caller.
    velocity_feedforward: fn(f32) -> f32,

    faults: FaultFlags,
    duties: [f32; 3],
    last_tick_us: Option<u64>,
    stats: LoopStats,
    history: FaultHistory,
}

impl<T: TimeSource> MotorController<T> {
    /// Create a controller in `Ready` with zeroed state.
    pub fn new(config: DriveConfig, time: T) -> Self {
        Self {
            position_pid: Pid::new(config.position_pid),
            velocity_pid: Pid::new(config.velocity_pid),
            current_pid: Pid::new(config.current_pid),
            velocity_estimator: VelocityEstimator::new(),
            velocity_feedforward: zero_feedforward,
            config,
            time,
            state: MotorState::Ready,
            position_setpoint_deg: 0.0,
            velocity_setpoint_rpm: 0.0,
            current_setpoint_amps: 0.0,
            measurements: Measurements::default(),
            faults: FaultFlags::empty(),
            duties: [0.0; 3],
            last_tick_us: None,
            stats: LoopStats::default(),
            history: FaultHistory::new(),
        }
    }

    /// Install a velocity feedforward provider for position control.
    pub fn set_velocity_feedforward(&mut self, provider: fn(f32) -> f32) {
        self.velocity_feedforward = provider;
    }

    // ========================================================================
    // Mode selection (external command surface)
    // ========================================================================

    /// Enter position control with the given target in degrees.
    ///
    /// All three PID stages are reset on entry so the re-engaged cascade
    /// does not act on windup accumulated in a previous mode.
    pub fn enter_position_control(&mut self, setpoint_deg: f32) -> Result<(), ModeError> {
        self.ensure_command_allowed(setpoint_deg)?;
        self.reset_stages();
        self.position_setpoint_deg = setpoint_deg;
        self.velocity_setpoint_rpm = 0.0;
        self.current_setpoint_amps = 0.0;
        self.state = MotorState::PositionControl;
        Ok(())
    }

    /// Enter velocity control with the given target in RPM.
    pub fn enter_velocity_control(&mut self, setpoint_rpm: f32) -> Result<(), ModeError> {
        self.ensure_command_allowed(setpoint_rpm)?;
        self.reset_stages();
        self.velocity_setpoint_rpm = setpoint_rpm;
        self.current_setpoint_amps = 0.0;
        self.state = MotorState::VelocityControl;
        Ok(())
    }

    /// Enter current control with the given target in amperes.
    pub fn enter_current_control(&mut self, setpoint_amps: f32) -> Result<(), ModeError> {
        self.ensure_command_allowed(setpoint_amps)?;
        self.reset_stages();
        self.current_setpoint_amps = setpoint_amps;
        self.state = MotorState::CurrentControl;
        Ok(())
    }

    /// Return to `Ready`: outputs disabled, no control loop active.
    pub fn stop(&mut self) -> Result<(), ModeError> {
        if self.state == MotorState::Fault {
            return Err(ModeError::Faulted);
        }
        self.reset_stages();
        self.duties = [0.0; 3];
        self.state = MotorState::Ready;
        Ok(())
    }

    /// Clear fault flags and re-arm the drive into `Ready`.
    ///
    /// Resets all PID integral/derivative state and re-seeds the velocity
    /// estimator at `encoder_counts` so the first post-reset tick does not
    /// differentiate across the outage. This is the only exit from `Fault`.
    pub fn reset_faults(&mut self, encoder_counts: i32) {
        let cleared = self.faults;
        self.faults = FaultFlags::empty();
        self.reset_stages();
        self.velocity_estimator.reset(encoder_counts);
        self.velocity_setpoint_rpm = 0.0;
        self.current_setpoint_amps = 0.0;
        self.duties = [0.0; 3];
        self.last_tick_us = None;
        if self.state == MotorState::Fault {
            self.history.record(FaultEvent {
                timestamp_us: self.time.now_us(),
                flags: cleared,
                kind: FaultEventKind::Cleared,
            });
        }
        self.state = MotorState::Ready;
    }

    fn ensure_command_allowed(&self, setpoint: f32) -> Result<(), ModeError> {
        if self.state == MotorState::Fault {
            return Err(ModeError::Faulted);
        }
        if !setpoint.is_finite() {
            return Err(ModeError::InvalidSetpoint { value: setpoint });
        }
        Ok(())
    }

    fn reset_stages(&mut self) {
        self.position_pid.reset();
        self.velocity_pid.reset();
        self.current_pid.reset();
    }

    // ========================================================================
    // Control tick
    // ========================================================================

    /// Run one control tick.
    ///
    /// Invoked by the periodic trigger at the configured loop frequency.
    /// Must not be re-entered before it returns.
    ///
    /// # Errors
    ///
    /// Propagates `OutputError` from the PWM collaborator. The drive state
    /// reflects everything decided before the failed commit; in particular a
    /// fault latch survives a failed `disable` call.
    pub fn tick<P, C, S, O>(
        &mut self,
        encoder: &mut P,
        current_sensor: &mut C,
        temperature_sensor: &mut S,
        pwm: &mut O,
    ) -> Result<TickOutcome, OutputError>
    where
        P: PositionSensor,
        C: CurrentSensor,
        S: TemperatureSensor,
        O: PhaseOutput,
    {
        let tick_start = self.time.now_us();
        // First tick (or reset) has no interval to measure; the PID stages
        // substitute their nominal timestep for dt <= 0.
        let dt = match self.last_tick_us {
            Some(prev) => tick_start.saturating_sub(prev) as f32 * 1e-6,
            None => 0.0,
        };
        self.last_tick_us = Some(tick_start);

        // Fault is terminal: no acquisition, no control, no commitment
        if self.state == MotorState::Fault {
            self.finish_stats(tick_start);
            return Ok(self.outcome());
        }

        // 1. Acquire feedback
        let counts = encoder.read_counts();
        self.measurements.position_deg = self.config.position_degrees(counts);
        self.measurements.current_amps = current_sensor.read_amps();
        self.measurements.temperature_c = temperature_sensor.read_celsius();

        // 2. Derive velocity
        self.measurements.velocity_rpm = self.velocity_estimator.estimate(
            counts,
            self.config.control_hz as f32,
            self.config.counts_per_rev(),
        );

        // 3. Safety gate before any control arithmetic
        let raised = self.config.limits.evaluate(&self.measurements);
        if !raised.is_empty() {
            self.faults |= raised;
            self.trip(pwm, tick_start)?;
            self.finish_stats(tick_start);
            return Ok(self.outcome());
        }

        // 4-8. Active cascade stages, outermost first
        match self.state {
            MotorState::Ready => {
                // Armed but idle: hold the bridge disabled
                self.duties = [0.0; 3];
                pwm.disable()?;
            }
            MotorState::PositionControl => {
                let position_error =
                    self.position_setpoint_deg - self.measurements.position_deg;
                self.velocity_setpoint_rpm = self.position_pid.compute(position_error, dt)
                    + (self.velocity_feedforward)(self.position_setpoint_deg);
                self.run_velocity_stage(dt, pwm)?;
            }
            MotorState::VelocityControl => {
                self.run_velocity_stage(dt, pwm)?;
            }
            MotorState::CurrentControl => {
                self.run_current_stage(dt, pwm)?;
            }
            // Fault ticks returned before acquisition
            MotorState::Fault => {}
        }

        self.finish_stats(tick_start);
        Ok(self.outcome())
    }

    /// Velocity loop feeding the current loop.
    fn run_velocity_stage<O: PhaseOutput>(
        &mut self,
        dt: f32,
        pwm: &mut O,
    ) -> Result<(), OutputError> {
        let velocity_error = self.velocity_setpoint_rpm - self.measurements.velocity_rpm;
        self.current_setpoint_amps = self.velocity_pid.compute(velocity_error, dt);
        self.run_current_stage(dt, pwm)
    }

    /// Innermost loop: current error -> voltage command -> SVM -> commit.
    fn run_current_stage<O: PhaseOutput>(
        &mut self,
        dt: f32,
        pwm: &mut O,
    ) -> Result<(), OutputError> {
        let current_error = self.current_setpoint_amps - self.measurements.current_amps;
        let voltage_command = self.current_pid.compute(current_error, dt);

        // The mechanical angle doubles as the electrical angle here; drives
        // with pole pairs > 1 scale it in their feedback implementation.
        let electrical_angle = self.measurements.position_deg.to_radians();
        self.duties = modulate(voltage_command, electrical_angle);
        pwm.apply(self.duties)
    }

    /// The single authoritative fault shutdown: zero duties, latch `Fault`,
    /// record the event, and disable the bridge.
    fn trip<O: PhaseOutput>(&mut self, pwm: &mut O, now_us: u64) -> Result<(), OutputError> {
        self.duties = [0.0; 3];
        self.state = MotorState::Fault;
        self.history.record(FaultEvent {
            timestamp_us: now_us,
            flags: self.faults,
            kind: FaultEventKind::Trip,
        });
        pwm.disable()
    }

    fn finish_stats(&mut self, tick_start: u64) {
        let execution_us = self.time.elapsed_since(tick_start) as u32;
        self.stats.record(execution_us, self.config.period_us());
    }

    fn outcome(&self) -> TickOutcome {
        TickOutcome {
            state: self.state,
            duties: self.duties,
            faults: self.faults,
            position_deg: self.measurements.position_deg,
            velocity_rpm: self.measurements.velocity_rpm,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current drive state.
    pub fn state(&self) -> MotorState {
        self.state
    }

    /// Sticky fault flags.
    pub fn faults(&self) -> FaultFlags {
        self.faults
    }

    /// Duty fractions held by the drive.
    pub fn duties(&self) -> [f32; 3] {
        self.duties
    }

    /// Most recent measurement snapshot.
    pub fn measurements(&self) -> &Measurements {
        &self.measurements
    }

    /// Position target in degrees.
    pub fn position_setpoint_deg(&self) -> f32 {
        self.position_setpoint_deg
    }

    /// Velocity target in RPM (set directly or produced by the position loop).
    pub fn velocity_setpoint_rpm(&self) -> f32 {
        self.velocity_setpoint_rpm
    }

    /// Current target in amperes (set directly or produced by the velocity
    /// loop).
    pub fn current_setpoint_amps(&self) -> f32 {
        self.current_setpoint_amps
    }

    /// Position-loop PID state (diagnostics).
    pub fn position_pid(&self) -> &Pid {
        &self.position_pid
    }

    /// Velocity-loop PID state (diagnostics).
    pub fn velocity_pid(&self) -> &Pid {
        &self.velocity_pid
    }

    /// Current-loop PID state (diagnostics).
    pub fn current_pid(&self) -> &Pid {
        &self.current_pid
    }

    /// Loop timing statistics.
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }

    /// Fault transition history.
    pub fn history(&self) -> &FaultHistory {
        &self.history
    }

    /// Drive configuration.
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    /// The controller's time source (tests advance a `MockTime` through
    /// this handle).
    pub fn time(&self) -> &T {
        &self.time
    }
}
