//! Statistics derived from workout history.

pub mod streak;

pub use streak::{calculate_streak, calculate_streak_at, streak_from_days};
