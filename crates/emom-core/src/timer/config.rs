use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Activity code used when none (or zero) is configured.
pub const DEFAULT_ACTIVITY_TYPE: i32 = 115;

/// Schedule and sync options for one run.
///
/// `total_duration_secs` is derived from the round count and interval length
/// and is recomputed whenever either of them changes, so a stored value can
/// never drift from the two inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerConfig {
    interval_count: u32,
    interval_secs: u32,
    total_duration_secs: u64,
    activity_type: i32,
    include_location: bool,
}

impl TimerConfig {
    /// Build a config, rejecting an empty schedule.
    pub fn new(
        interval_count: u32,
        interval_secs: u32,
        activity_type: i32,
        include_location: bool,
    ) -> Result<Self, ConfigError> {
        if interval_count == 0 {
            return Err(ConfigError::InvalidValue {
                key: "interval_count".into(),
                message: "must be at least 1".into(),
            });
        }
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "interval_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(Self {
            interval_count,
            interval_secs,
            total_duration_secs: u64::from(interval_count) * u64::from(interval_secs),
            activity_type,
            include_location,
        })
    }

    pub fn interval_count(&self) -> u32 {
        self.interval_count
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.total_duration_secs
    }

    pub fn activity_type(&self) -> i32 {
        self.activity_type
    }

    pub fn include_location(&self) -> bool {
        self.include_location
    }

    /// Replace the schedule, keeping the sync options.
    pub fn with_schedule(self, interval_count: u32, interval_secs: u32) -> Result<Self, ConfigError> {
        Self::new(
            interval_count,
            interval_secs,
            self.activity_type,
            self.include_location,
        )
    }

    /// Replace the sync options, keeping the schedule.
    pub fn with_sync_options(self, activity_type: i32, include_location: bool) -> Self {
        Self {
            activity_type,
            include_location,
            ..self
        }
    }

    /// Whether the two configs describe a different round structure.
    pub fn schedule_differs(&self, other: &TimerConfig) -> bool {
        self.interval_count != other.interval_count || self.interval_secs != other.interval_secs
    }
}

impl Default for TimerConfig {
    /// Five one-minute rounds, kettlebell activity, no location.
    fn default() -> Self {
        Self {
            interval_count: 5,
            interval_secs: 60,
            total_duration_secs: 300,
            activity_type: DEFAULT_ACTIVITY_TYPE,
            include_location: false,
        }
    }
}

/// Wire shape used when a config is read back from JSON snapshots.
#[derive(Deserialize)]
struct RawTimerConfig {
    interval_count: u32,
    interval_secs: u32,
    activity_type: i32,
    include_location: bool,
}

impl<'de> Deserialize<'de> for TimerConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawTimerConfig::deserialize(deserializer)?;
        TimerConfig::new(
            raw.interval_count,
            raw.interval_secs,
            raw.activity_type,
            raw.include_location,
        )
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_derived() {
        let cfg = TimerConfig::new(10, 45, 114, true).unwrap();
        assert_eq!(cfg.total_duration_secs(), 450);

        let cfg = cfg.with_schedule(3, 30).unwrap();
        assert_eq!(cfg.total_duration_secs(), 90);
        assert_eq!(cfg.activity_type(), 114);
        assert!(cfg.include_location());
    }

    #[test]
    fn rejects_empty_schedule() {
        assert!(TimerConfig::new(0, 60, 115, false).is_err());
        assert!(TimerConfig::new(5, 0, 115, false).is_err());
    }

    #[test]
    fn default_matches_constructor() {
        let built = TimerConfig::new(5, 60, DEFAULT_ACTIVITY_TYPE, false).unwrap();
        assert_eq!(TimerConfig::default(), built);
    }

    #[test]
    fn sync_options_do_not_touch_schedule() {
        let cfg = TimerConfig::default().with_sync_options(114, true);
        assert!(!cfg.schedule_differs(&TimerConfig::default()));
        assert_eq!(cfg.total_duration_secs(), 300);
    }

    #[test]
    fn deserialize_recomputes_total() {
        let json = r#"{"interval_count":4,"interval_secs":20,"total_duration_secs":999,"activity_type":115,"include_location":false}"#;
        let cfg: TimerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.total_duration_secs(), 80);

        let bad = r#"{"interval_count":0,"interval_secs":20,"activity_type":115,"include_location":false}"#;
        assert!(serde_json::from_str::<TimerConfig>(bad).is_err());
    }
}
