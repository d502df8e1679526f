//! Pure time and progress arithmetic.
//!
//! All inputs are seconds as `f64`. Durations that are zero or negative yield
//! defined neutral values instead of panicking or producing NaN.

use serde::{Deserialize, Serialize};

/// Slack allowed when deciding that a run has reached its total duration.
pub const FINISH_TOLERANCE_SECS: f64 = 0.05;

/// 1-based round position within a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub current: u32,
    pub total: u32,
}

/// Render seconds as `MM:SS`, flooring both parts.
///
/// Negative input renders as `00:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes:02}:{secs:02}")
}

/// Fraction of the whole schedule completed, clamped to `[0, 1]`.
pub fn total_progress(elapsed: f64, total_duration: f64) -> f64 {
    if total_duration <= 0.0 {
        return 1.0;
    }
    (elapsed / total_duration).clamp(0.0, 1.0)
}

/// Fraction of the current interval completed, in `[0, 1)`.
pub fn interval_progress(elapsed: f64, interval_duration: f64) -> f64 {
    if interval_duration <= 0.0 {
        return 0.0;
    }
    (elapsed % interval_duration) / interval_duration
}

/// Seconds left in the current interval.
///
/// On an exact interval boundary this is the full interval length: the next
/// round is about to start, not the previous one just ending.
pub fn display_time(elapsed: f64, interval_duration: f64) -> f64 {
    if interval_duration <= 0.0 {
        return 0.0;
    }
    (interval_duration - elapsed % interval_duration).max(0.0)
}

/// Current round, clamped to the last round once the schedule is exhausted.
pub fn current_round(elapsed: f64, interval_duration: f64, total_duration: f64) -> RoundInfo {
    if interval_duration <= 0.0 {
        return RoundInfo { current: 0, total: 0 };
    }
    let total = (total_duration / interval_duration).floor().max(0.0) as u32;
    let current = ((elapsed / interval_duration).floor().max(0.0) as u32).saturating_add(1);
    RoundInfo {
        current: current.min(total),
        total,
    }
}

/// Zero-based index of the interval `elapsed` falls in.
pub fn interval_index(elapsed: f64, interval_duration: f64) -> u32 {
    if interval_duration <= 0.0 {
        return 0;
    }
    (elapsed / interval_duration).floor().max(0.0) as u32
}

/// Whether the run has reached its total, within [`FINISH_TOLERANCE_SECS`].
pub fn is_finished(elapsed: f64, total_duration: f64) -> bool {
    elapsed >= total_duration - FINISH_TOLERANCE_SECS
}
