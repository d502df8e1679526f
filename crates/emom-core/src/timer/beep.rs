//! Countdown beep decider.
//!
//! The engine asks on every tick whether a countdown tone is due. Ticks run
//! far more often than once per second, so each tone is keyed by round and
//! whole second remaining and only fires when the key changes.

use serde::{Deserialize, Serialize};

/// Identity of one countdown tone: zero-based round plus seconds remaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeepKey {
    pub round: u32,
    pub remaining: u32,
}

/// A countdown tone that should sound now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Beep {
    pub frequency_hz: u32,
    pub key: BeepKey,
}

/// Rising three-note countdown: 3 -> A4, 2 -> C#5, 1 -> E5.
pub fn beep_frequency(seconds_remaining: u32) -> u32 {
    match seconds_remaining {
        2 => 554,
        1 => 659,
        _ => 440,
    }
}

/// Decide whether a countdown tone fires at `elapsed`.
///
/// Returns `None` outside the last three seconds of an interval, or when the
/// tone for this round and second was already played (`last` matches).
pub fn countdown_beep(elapsed: f64, interval_duration: f64, last: Option<BeepKey>) -> Option<Beep> {
    if interval_duration <= 0.0 {
        return None;
    }
    let remaining = (interval_duration - elapsed % interval_duration).ceil();
    if remaining <= 0.0 || remaining > 3.0 {
        return None;
    }
    let key = BeepKey {
        round: (elapsed / interval_duration).floor().max(0.0) as u32,
        remaining: remaining as u32,
    };
    if last == Some(key) {
        return None;
    }
    Some(Beep {
        frequency_hz: beep_frequency(key.remaining),
        key,
    })
}
