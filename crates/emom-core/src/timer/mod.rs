mod beep;
mod clock;
mod config;
mod countdown;
mod engine;
pub mod progress;
mod state;

pub use beep::{beep_frequency, countdown_beep, Beep, BeepKey};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{TimerConfig, DEFAULT_ACTIVITY_TYPE};
pub use countdown::{CountdownStep, PreStartCountdown, LEAD_IN_STEPS};
pub use engine::TimerEngine;
pub use progress::RoundInfo;
pub use state::{Location, RunSnapshot, RunState, TimerState};
