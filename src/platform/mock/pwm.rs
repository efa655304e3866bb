//! Mock 3-phase PWM output

use crate::traits::output::{OutputError, PhaseOutput};

/// Mock PWM sink recording every commit.
///
/// Can be scripted to fail the next operation to exercise hardware-fault
/// propagation paths.
#[derive(Debug, Default)]
pub struct MockPhaseOutput {
    last_duties: Option<[f32; 3]>,
    disabled: bool,
    apply_count: u32,
    fail_next: bool,
}

impl MockPhaseOutput {
    /// Create an output with nothing committed and gates disabled.
    pub fn new() -> Self {
        Self {
            last_duties: None,
            disabled: true,
            apply_count: 0,
            fail_next: false,
        }
    }

    /// Last committed duty triple, if any commit happened.
    pub fn last_duties(&self) -> Option<[f32; 3]> {
        self.last_duties
    }

    /// True while the gate drivers are disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of successful `apply` commits.
    pub fn apply_count(&self) -> u32 {
        self.apply_count
    }

    /// Make the next `apply` or `disable` return a hardware fault.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }
}

impl PhaseOutput for MockPhaseOutput {
    fn apply(&mut self, duties: [f32; 3]) -> Result<(), OutputError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(OutputError::HardwareFault);
        }
        self.last_duties = Some(duties);
        self.disabled = false;
        self.apply_count += 1;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), OutputError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(OutputError::HardwareFault);
        }
        self.last_duties = Some([0.0; 3]);
        self.disabled = true;
        Ok(())
    }
}
