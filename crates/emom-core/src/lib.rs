//! # EMOM Timer Core Library
//!
//! Core logic for an "every minute on the minute" interval timer: a fixed
//! number of equal-length rounds, a rising three-tone countdown at the end of
//! each round, and a daily workout streak. The `emom` CLI is a thin terminal
//! layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A wall-clock-based state machine that requires the caller
//!   to periodically invoke `tick()`; elapsed time is always recomputed from the
//!   clock, never accumulated
//! - **Time arithmetic**: Pure functions for progress, round and display values
//! - **Storage**: SQLite workout history and TOML-based configuration
//! - **Integrations**: Optional cloud mirror of completed workouts (Google Fit)
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`normalize_settings`]: Turns stored, possibly legacy settings into a [`TimerConfig`]
//! - [`calculate_streak`]: Consecutive-day streak with a grace day
//! - [`WorkoutService`]: Saves and uploads completed runs

pub mod error;
pub mod events;
pub mod integrations;
pub mod service;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, OAuthError, SyncError};
pub use events::Event;
pub use integrations::{CloudSync, GoogleFitClient, OAuthTokens};
pub use service::{should_acquire_location, CompletionOutcome, UploadStatus, WorkoutService};
pub use settings::{normalize_settings, StoredSettings};
pub use stats::{calculate_streak, calculate_streak_at};
pub use storage::{Config, Database, NewWorkout, SyncConfig, WorkoutRecord};
pub use timer::{
    Clock, Location, ManualClock, PreStartCountdown, RunSnapshot, SystemClock, TimerConfig,
    TimerEngine, TimerState,
};
