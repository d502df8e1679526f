//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the host calls `tick()` from its frame or timer
//! scheduler and stops calling once `is_running()` turns false.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running -> ... -> Completed -> Idle (reset)
//! ```
//!
//! Elapsed time is always recomputed as `now - start_time`, never accumulated
//! from per-tick deltas, so scheduling jitter cannot make the run drift.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(config, SystemClock);
//! let mut events = engine.start();
//! while engine.is_running() {
//!     events.extend(engine.tick());
//!     // render / play tones, then wait for the next frame
//! }
//! ```

use tracing::debug;

use super::beep::countdown_beep;
use super::clock::{Clock, SystemClock};
use super::config::TimerConfig;
use super::progress::{interval_index, is_finished};
use super::state::{Location, RunSnapshot, RunState, TimerState};
use crate::events::Event;

/// Core timer engine.
///
/// Owns the run state exclusively; observers only ever see snapshots.
#[derive(Debug, Clone)]
pub struct TimerEngine<C: Clock = SystemClock> {
    config: TimerConfig,
    run: RunState,
    clock: C,
}

impl<C: Clock> TimerEngine<C> {
    pub fn new(config: TimerConfig, clock: C) -> Self {
        Self {
            config,
            run: RunState::default(),
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.run.timer_state(&self.config)
    }

    pub fn is_running(&self) -> bool {
        self.run.is_running
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.run.current_total_elapsed
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    pub fn location(&self) -> Option<Location> {
        self.run.location
    }

    pub fn snapshot(&self) -> RunSnapshot {
        RunSnapshot::capture(&self.run, &self.config)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh run or resume a paused one.
    ///
    /// A fresh start announces round 0 immediately. Calling this while
    /// already running, or on a completed run, does nothing; use `reset()`
    /// or `toggle()` to go again.
    pub fn start(&mut self) -> Vec<Event> {
        if matches!(self.state(), TimerState::Running | TimerState::Completed) {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.run.is_running = true;
        self.run.start_time_ms =
            self.clock.now_ms() - (self.run.current_total_elapsed * 1000.0).round() as i64;

        if self.run.current_total_elapsed == 0.0 {
            self.run.last_interval_index = Some(0);
            events.push(Event::IntervalStarted { index: 0 });
        }
        debug!(
            elapsed = self.run.current_total_elapsed,
            start_time_ms = self.run.start_time_ms,
            "timer started"
        );

        events.extend(self.tick());
        events
    }

    /// Stop ticking. Elapsed time stays at its last computed value.
    pub fn pause(&mut self) {
        if self.run.is_running {
            debug!(elapsed = self.run.current_total_elapsed, "timer paused");
        }
        self.run.is_running = false;
    }

    /// Return the run to its initial state, keeping the configuration.
    pub fn reset(&mut self) -> Event {
        self.pause();
        self.run = RunState::default();
        Event::Tick {
            snapshot: self.snapshot(),
        }
    }

    /// Pause when running; restart a completed run; otherwise start or resume.
    pub fn toggle(&mut self) -> Vec<Event> {
        match self.state() {
            TimerState::Running => {
                self.pause();
                Vec::new()
            }
            TimerState::Completed => {
                let mut events = vec![self.reset()];
                events.extend(self.start());
                events
            }
            TimerState::Idle | TimerState::Paused => self.start(),
        }
    }

    /// Replace the configuration wholesale.
    ///
    /// A different round count or interval length resets the run and returns
    /// the reset snapshot; other changes apply in place.
    pub fn set_config(&mut self, config: TimerConfig) -> Option<Event> {
        let schedule_changed = self.config.schedule_differs(&config);
        self.config = config;
        if schedule_changed {
            Some(self.reset())
        } else {
            None
        }
    }

    /// Attach a location to this run. The first fix wins.
    ///
    /// Returns whether the location was recorded.
    pub fn set_location(&mut self, location: Location) -> bool {
        if self.run.location.is_some() {
            return false;
        }
        self.run.location = Some(location);
        true
    }

    /// Advance the run from the wall clock.
    ///
    /// Returns nothing when not running. The last tick of a run returns a
    /// final snapshot followed by `Completed`, after which the engine is no
    /// longer running.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.run.is_running {
            return Vec::new();
        }

        let mut events = Vec::new();
        let now = self.clock.now_ms();
        self.run.current_total_elapsed = ((now - self.run.start_time_ms) as f64 / 1000.0).max(0.0);

        self.handle_countdown(&mut events);

        if self.check_completion(&mut events) {
            return events;
        }

        self.check_interval_transition(&mut events);

        events.push(Event::Tick {
            snapshot: self.snapshot(),
        });
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn handle_countdown(&mut self, events: &mut Vec<Event>) {
        let beep = countdown_beep(
            self.run.current_total_elapsed,
            f64::from(self.config.interval_secs()),
            self.run.last_beep,
        );
        if let Some(beep) = beep {
            self.run.last_beep = Some(beep.key);
            events.push(Event::CountdownBeep {
                frequency_hz: beep.frequency_hz,
            });
        }
    }

    fn check_completion(&mut self, events: &mut Vec<Event>) -> bool {
        let total = self.config.total_duration_secs() as f64;
        if !is_finished(self.run.current_total_elapsed, total) {
            return false;
        }
        self.run.current_total_elapsed = total;
        self.pause();
        debug!(total, "timer completed");
        events.push(Event::Tick {
            snapshot: self.snapshot(),
        });
        events.push(Event::Completed);
        true
    }

    fn check_interval_transition(&mut self, events: &mut Vec<Event>) {
        let index = interval_index(
            self.run.current_total_elapsed,
            f64::from(self.config.interval_secs()),
        );
        let is_new = self.run.last_interval_index.map_or(true, |last| index > last);
        if is_new && index > 0 {
            self.run.last_interval_index = Some(index);
            events.push(Event::IntervalStarted { index });
        }
    }
}
