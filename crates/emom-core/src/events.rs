use serde::{Deserialize, Serialize};

use crate::timer::RunSnapshot;

/// Everything the timer engine tells its host.
///
/// The engine returns these from its commands; the host renders snapshots,
/// plays tones, and persists the run on `Completed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Full state after a tick, reset, or completion.
    Tick { snapshot: RunSnapshot },
    /// A round began (zero-based).
    IntervalStarted { index: u32 },
    /// A countdown tone should sound.
    CountdownBeep { frequency_hz: u32 },
    /// The schedule ran to the end.
    Completed,
}

impl Event {
    pub fn snapshot(&self) -> Option<&RunSnapshot> {
        match self {
            Event::Tick { snapshot } => Some(snapshot),
            _ => None,
        }
    }
}
