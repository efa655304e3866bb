//! Control loop timing statistics
//!
//! The tick body must complete within one loop period (100 µs at 10 kHz).
//! These statistics make that deadline observable: execution times are
//! tracked with an exponential moving average in fixed-point arithmetic and
//! every overrun of the period is counted.

/// Runtime statistics for the control loop
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoopStats {
    /// Last tick execution time in microseconds
    pub last_execution_us: u32,

    /// Average execution time in microseconds (EMA, alpha = 0.1)
    pub avg_execution_us: u32,

    /// Maximum execution time observed in microseconds
    pub max_execution_us: u32,

    /// Number of ticks whose execution time exceeded the loop period
    pub overruns: u32,

    /// Total number of ticks executed
    pub tick_count: u64,
}

impl LoopStats {
    /// Record one tick execution.
    ///
    /// # Arguments
    ///
    /// * `execution_us` - Measured tick duration in microseconds
    /// * `period_us` - Loop period the tick had to fit into
    pub fn record(&mut self, execution_us: u32, period_us: u32) {
        self.last_execution_us = execution_us;
        self.tick_count = self.tick_count.saturating_add(1);

        // EMA with alpha = 0.1 in fixed point: (value + 9 * avg) / 10
        if self.avg_execution_us == 0 {
            self.avg_execution_us = execution_us;
        } else {
            self.avg_execution_us = (execution_us + 9 * self.avg_execution_us) / 10;
        }

        if execution_us > self.max_execution_us {
            self.max_execution_us = execution_us;
        }

        if execution_us > period_us {
            self.overruns = self.overruns.saturating_add(1);
        }
    }

    /// Reset all statistics to initial state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
