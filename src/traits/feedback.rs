//! Sensor feedback traits
//!
//! The control tick acquires all feedback through these traits. Reads must be
//! synchronous and non-blocking with bounded latency: the tick body has a hard
//! real-time deadline of one loop period and performs no I/O waits.

/// Raw position counter source (quadrature-decoded encoder).
///
/// The count must be monotonically consistent: wrap-around is the
/// implementation's responsibility to unwrap. The velocity estimator does not
/// correct for wrap and will show a transient spike on a wrapped count.
pub trait PositionSensor {
    /// Read the current encoder count.
    fn read_counts(&mut self) -> i32;
}

/// Phase current measurement source.
pub trait CurrentSensor {
    /// Read the current in amperes. Sign follows the drive direction.
    fn read_amps(&mut self) -> f32;
}

/// Motor temperature source, used only by the safety evaluation.
pub trait TemperatureSensor {
    /// Read the temperature in degrees Celsius.
    fn read_celsius(&mut self) -> f32;
}
