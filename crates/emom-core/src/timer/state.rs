use serde::{Deserialize, Serialize};

use super::beep::BeepKey;
use super::config::TimerConfig;
use super::progress::{self, RoundInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

/// A geographic fix attached to a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Mutable state of one run, owned by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub is_running: bool,
    /// Epoch milliseconds elapsed time is measured from.
    pub start_time_ms: i64,
    /// Seconds elapsed in this run.
    pub current_total_elapsed: f64,
    /// Last countdown tone played, for deduplication only.
    pub last_beep: Option<BeepKey>,
    /// Highest round whose start was announced; `None` before the first start.
    pub last_interval_index: Option<u32>,
    pub location: Option<Location>,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            is_running: false,
            start_time_ms: 0,
            current_total_elapsed: 0.0,
            last_beep: None,
            last_interval_index: None,
            location: None,
        }
    }
}

impl RunState {
    pub fn timer_state(&self, config: &TimerConfig) -> TimerState {
        if self.is_running {
            TimerState::Running
        } else if self.current_total_elapsed <= 0.0 {
            TimerState::Idle
        } else if progress::is_finished(
            self.current_total_elapsed,
            config.total_duration_secs() as f64,
        ) {
            TimerState::Completed
        } else {
            TimerState::Paused
        }
    }
}

/// Read-only view handed to observers on every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub state: TimerState,
    pub is_running: bool,
    pub current_total_elapsed: f64,
    pub last_beep: Option<BeepKey>,
    pub location: Option<Location>,
    pub config: TimerConfig,
    pub round: RoundInfo,
    /// Seconds left in the current interval.
    pub interval_remaining: f64,
    pub total_progress: f64,
    pub interval_progress: f64,
}

impl RunSnapshot {
    pub fn capture(run: &RunState, config: &TimerConfig) -> Self {
        let elapsed = run.current_total_elapsed;
        let interval = f64::from(config.interval_secs());
        let total = config.total_duration_secs() as f64;
        Self {
            state: run.timer_state(config),
            is_running: run.is_running,
            current_total_elapsed: elapsed,
            last_beep: run.last_beep,
            location: run.location,
            config: *config,
            round: progress::current_round(elapsed, interval, total),
            interval_remaining: progress::display_time(elapsed, interval),
            total_progress: progress::total_progress(elapsed, total),
            interval_progress: progress::interval_progress(elapsed, interval),
        }
    }

    /// `MM:SS` left in the current interval, or the full total once done.
    pub fn display_clock(&self) -> String {
        if self.state == TimerState::Completed {
            return progress::format_time(self.config.total_duration_secs() as f64);
        }
        progress::format_time(self.interval_remaining)
    }
}
