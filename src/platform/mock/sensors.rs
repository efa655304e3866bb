//! Mock feedback sensors

use crate::traits::feedback::{CurrentSensor, PositionSensor, TemperatureSensor};

/// Mock quadrature encoder with a directly settable count.
#[derive(Debug, Default)]
pub struct MockEncoder {
    counts: i32,
}

impl MockEncoder {
    /// Create an encoder reading zero counts.
    pub fn new() -> Self {
        Self { counts: 0 }
    }

    /// Set the absolute count.
    pub fn set_counts(&mut self, counts: i32) {
        self.counts = counts;
    }

    /// Advance the count by a delta (simulates rotation between ticks).
    pub fn advance(&mut self, delta: i32) {
        self.counts = self.counts.wrapping_add(delta);
    }

    /// Current count without going through the sensor trait.
    pub fn counts(&self) -> i32 {
        self.counts
    }
}

impl PositionSensor for MockEncoder {
    fn read_counts(&mut self) -> i32 {
        self.counts
    }
}

/// Mock current sensor with a settable reading.
#[derive(Debug, Default)]
pub struct MockCurrentSensor {
    amps: f32,
}

impl MockCurrentSensor {
    /// Create a sensor reading zero amperes.
    pub fn new() -> Self {
        Self { amps: 0.0 }
    }

    /// Set the measured current.
    pub fn set_amps(&mut self, amps: f32) {
        self.amps = amps;
    }
}

impl CurrentSensor for MockCurrentSensor {
    fn read_amps(&mut self) -> f32 {
        self.amps
    }
}

/// Mock temperature sensor with a settable reading.
#[derive(Debug)]
pub struct MockTempSensor {
    celsius: f32,
}

impl MockTempSensor {
    /// Create a sensor reading room temperature (25 °C).
    pub fn new() -> Self {
        Self { celsius: 25.0 }
    }

    /// Set the measured temperature.
    pub fn set_celsius(&mut self, celsius: f32) {
        self.celsius = celsius;
    }
}

impl Default for MockTempSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureSensor for MockTempSensor {
    fn read_celsius(&mut self) -> f32 {
        self.celsius
    }
}
