//! Host integration tests for the full drive loop
//!
//! Each scenario runs a `MotorController` against the mock platform for many
//! ticks, scripting sensor values between ticks the way a real plant would
//! evolve, and asserts on externally observable behavior only: state, fault
//! flags, committed duties, and timing statistics.

use pico_drive::drive::{DriveConfig, MotorController, MotorState};
use pico_drive::platform::mock::{
    MockCurrentSensor, MockEncoder, MockPhaseOutput, MockTempSensor,
};
use pico_drive::safety::FaultFlags;
use pico_drive::traits::MockTime;

const TICK_US: u64 = 100; // 10 kHz loop period

struct Bench {
    controller: MotorController<MockTime>,
    encoder: MockEncoder,
    current: MockCurrentSensor,
    temperature: MockTempSensor,
    pwm: MockPhaseOutput,
}

impl Bench {
    fn new() -> Self {
        Self {
            controller: MotorController::new(DriveConfig::default(), MockTime::new()),
            encoder: MockEncoder::new(),
            current: MockCurrentSensor::new(),
            temperature: MockTempSensor::new(),
            pwm: MockPhaseOutput::new(),
        }
    }

    /// One tick followed by one loop period of simulated time.
    fn tick(&mut self) {
        self.controller
            .tick(
                &mut self.encoder,
                &mut self.current,
                &mut self.temperature,
                &mut self.pwm,
            )
            .expect("mock PWM only fails when scripted");
        self.controller.time().advance(TICK_US);
    }

    fn run(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.tick();
        }
    }
}

#[test]
fn position_control_drives_toward_target() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_position_control(90.0)
        .expect("drive starts ready");

    // Crude plant: the rotor creeps toward the commanded direction a few
    // counts per tick whenever the drive commits non-centered duties.
    for _ in 0..500 {
        bench.tick();
        let sign = bench.controller.velocity_setpoint_rpm().signum() as i32;
        bench.encoder.advance(sign * 3);
    }

    let position = bench.controller.measurements().position_deg;
    assert!(
        position > 0.0 && position <= 90.0,
        "Rotor should have moved toward the 90 degree target, at {}",
        position
    );
    assert_eq!(bench.controller.state(), MotorState::PositionControl);
    assert!(bench.controller.faults().is_empty());

    // The cascade produced chained setpoints on the way
    assert!(bench.controller.velocity_setpoint_rpm() != 0.0);
    assert!(bench.pwm.last_duties().is_some());
}

#[test]
fn velocity_control_tracks_measured_velocity() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(366.0)
        .expect("drive starts ready");

    // 10 counts per tick is 366.21 RPM at 16384 counts/rev and 10 kHz
    for _ in 0..300 {
        bench.encoder.advance(10);
        bench.tick();
    }

    let velocity = bench.controller.measurements().velocity_rpm;
    assert!(
        (velocity - 366.21).abs() < 1.0,
        "Filtered velocity should converge near 366 RPM, got {}",
        velocity
    );
    // Near-zero velocity error leaves only a small current demand
    assert!(bench.controller.current_setpoint_amps().abs() < 5.0);
    assert_eq!(bench.controller.state(), MotorState::VelocityControl);
}

#[test]
fn overcurrent_mid_run_latches_fault_and_zeroes_outputs() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(200.0)
        .expect("drive starts ready");
    bench.run(50);
    assert_eq!(bench.controller.state(), MotorState::VelocityControl);

    // Current spikes past the 5 A limit for a single tick
    bench.current.set_amps(7.5);
    bench.tick();

    assert_eq!(bench.controller.state(), MotorState::Fault);
    assert_eq!(bench.controller.faults(), FaultFlags::OVERCURRENT);
    assert_eq!(bench.controller.duties(), [0.0, 0.0, 0.0]);
    assert_eq!(bench.pwm.last_duties(), Some([0.0, 0.0, 0.0]));
    assert!(bench.pwm.is_disabled());

    // Flag stays latched after the condition clears, outputs stay down
    bench.current.set_amps(0.0);
    let applies_at_fault = bench.pwm.apply_count();
    bench.run(100);
    assert_eq!(bench.controller.state(), MotorState::Fault);
    assert_eq!(bench.controller.faults(), FaultFlags::OVERCURRENT);
    assert_eq!(bench.pwm.apply_count(), applies_at_fault);
}

#[test]
fn fault_reset_cycle_rearms_and_runs_again() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(100.0)
        .expect("drive starts ready");
    bench.current.set_amps(6.0);
    bench.tick();
    assert_eq!(bench.controller.state(), MotorState::Fault);

    // Commands are rejected until the fault is reset
    assert!(bench.controller.enter_position_control(0.0).is_err());
    assert!(bench.controller.stop().is_err());

    bench.current.set_amps(0.0);
    let counts = bench.encoder.counts();
    bench.controller.reset_faults(counts);

    assert_eq!(bench.controller.state(), MotorState::Ready);
    assert!(bench.controller.faults().is_empty());

    // The history kept the whole trip/clear cycle
    assert_eq!(bench.controller.history().len(), 2);
    assert_eq!(bench.controller.history().total_trips(), 1);

    // A fresh run works without residue from the faulted run
    bench
        .controller
        .enter_velocity_control(50.0)
        .expect("reset drive accepts commands");
    bench.run(20);
    assert_eq!(bench.controller.state(), MotorState::VelocityControl);
    assert!(!bench.pwm.is_disabled());
}

#[test]
fn multiple_violations_accumulate_distinct_flags() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(10.0)
        .expect("drive starts ready");

    bench.current.set_amps(6.0);
    bench.tick();
    assert_eq!(bench.controller.faults(), FaultFlags::OVERCURRENT);

    // A second condition while already faulted is not evaluated (the fault
    // tick skips acquisition), so clear first and re-trip on temperature.
    bench.current.set_amps(0.0);
    bench.controller.reset_faults(bench.encoder.counts());
    bench
        .controller
        .enter_velocity_control(10.0)
        .expect("reset drive accepts commands");

    bench.temperature.set_celsius(95.0);
    bench.tick();
    assert_eq!(bench.controller.faults(), FaultFlags::OVERTEMPERATURE);
    assert_eq!(bench.controller.history().total_trips(), 2);
}

#[test]
fn simultaneous_violations_raise_all_flags_in_one_tick() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_current_control(1.0)
        .expect("drive starts ready");

    bench.current.set_amps(9.0);
    bench.temperature.set_celsius(100.0);
    bench.encoder.set_counts(20_000); // well past +180 degrees
    bench.tick();

    let faults = bench.controller.faults();
    assert!(faults.contains(FaultFlags::OVERCURRENT));
    assert!(faults.contains(FaultFlags::OVERTEMPERATURE));
    assert!(faults.contains(FaultFlags::POSITION_LIMIT));
    assert_eq!(bench.controller.state(), MotorState::Fault);
}

#[test]
fn velocity_feedforward_biases_the_inner_setpoint() {
    fn trajectory_feedforward(position_setpoint_deg: f32) -> f32 {
        position_setpoint_deg * 2.0
    }

    let mut bench = Bench::new();
    bench.controller.set_velocity_feedforward(trajectory_feedforward);
    bench
        .controller
        .enter_position_control(30.0)
        .expect("drive starts ready");
    bench.tick();

    let mut plain = Bench::new();
    plain
        .controller
        .enter_position_control(30.0)
        .expect("drive starts ready");
    plain.tick();

    let bias = bench.controller.velocity_setpoint_rpm()
        - plain.controller.velocity_setpoint_rpm();
    assert!(
        (bias - 60.0).abs() < 1e-3,
        "Feedforward of 2 * 30 deg should add 60 RPM, added {}",
        bias
    );
}

#[test]
fn loop_stats_track_every_tick_and_count_overruns() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(100.0)
        .expect("drive starts ready");
    bench.run(10);

    let stats = bench.controller.stats();
    assert_eq!(stats.tick_count, 10);
    assert_eq!(stats.overruns, 0);

    // A long gap between ticks is idle time, not execution time, and must
    // not count as an overrun
    bench.controller.time().advance(1_000_000);
    bench.tick();
    assert_eq!(bench.controller.stats().tick_count, 11);
    assert_eq!(bench.controller.stats().overruns, 0);
}

#[test]
fn stop_returns_to_ready_and_disables_outputs() {
    let mut bench = Bench::new();
    bench
        .controller
        .enter_velocity_control(100.0)
        .expect("drive starts ready");
    bench.run(10);
    assert!(!bench.pwm.is_disabled());

    bench.controller.stop().expect("running drive can stop");
    assert_eq!(bench.controller.state(), MotorState::Ready);
    assert_eq!(bench.controller.duties(), [0.0; 3]);

    bench.tick();
    assert!(bench.pwm.is_disabled(), "Ready ticks hold the bridge disabled");
}
