//! The 3-2-1 lead-in played before a fresh run starts.

use super::beep::beep_frequency;

/// Number of lead-in steps before the engine starts.
pub const LEAD_IN_STEPS: u32 = 3;

/// One step of the lead-in: the number to show and the tone to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownStep {
    pub count: u32,
    pub frequency_hz: u32,
}

/// Iterator over the lead-in steps, highest count first.
///
/// The host paces it at one step per second and starts the engine once it is
/// exhausted.
#[derive(Debug, Clone)]
pub struct PreStartCountdown {
    next: u32,
}

impl PreStartCountdown {
    pub fn new(from: u32) -> Self {
        Self { next: from }
    }
}

impl Default for PreStartCountdown {
    fn default() -> Self {
        Self::new(LEAD_IN_STEPS)
    }
}

impl Iterator for PreStartCountdown {
    type Item = CountdownStep;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == 0 {
            return None;
        }
        let count = self.next;
        self.next -= 1;
        Some(CountdownStep {
            count,
            frequency_hz: beep_frequency(count),
        })
    }
}
