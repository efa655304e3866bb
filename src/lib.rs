#![cfg_attr(not(test), no_std)]

//! pico_drive - Cascaded motor control core for embedded servo drives
//!
//! This library provides the real-time control loop for a 3-phase servo drive:
//! nested position/velocity/current PID stages, encoder-based velocity
//! estimation, space-vector PWM modulation, and layered safety interlocks.
//!
//! # Design Principles
//!
//! - **Pure no_std**: all algorithms run on host for testing; hardware is
//!   injected through traits
//! - **Explicit state**: every controller and filter owns its state in a
//!   struct, enabling multiple independent drive instances and deterministic
//!   unit tests
//! - **Fail-safe by construction**: safety evaluation is a pure decision;
//!   the controller performs the single authoritative output shutdown
//!
//! # Modules
//!
//! - [`control`]: PID controller, velocity estimator, space-vector modulator
//! - [`safety`]: Fault flags, safety limits, and limit evaluation
//! - [`drive`]: Drive state machine and the cascaded control loop
//! - [`traits`]: Platform-agnostic trait abstractions (time, sensors, PWM)
//! - [`platform`]: Mock platform implementations for host testing

pub mod control;
pub mod drive;
pub mod platform;
pub mod safety;
pub mod traits;
