//! Persisted timer settings and their reconciliation into a [`TimerConfig`].
//!
//! Settings on disk may be partial, hand-edited, or in the older shape that
//! stored a total duration instead of a round count. Nothing here fails: any
//! missing or unusable value falls back to a default, so the engine only ever
//! sees a valid schedule.

use serde::{Deserialize, Deserializer, Serialize};

use crate::timer::{TimerConfig, DEFAULT_ACTIVITY_TYPE};

/// Timer settings as stored, before normalization.
///
/// camelCase aliases accept the settings shape written by earlier releases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    #[serde(
        default,
        alias = "intervalCount",
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval_count: Option<i64>,
    #[serde(
        default,
        alias = "intervalSecs",
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval_secs: Option<i64>,
    /// Legacy: total workout length, from before rounds were configurable.
    #[serde(
        default,
        alias = "totalDurationSecs",
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_duration_secs: Option<i64>,
    #[serde(
        default,
        alias = "activityType",
        deserialize_with = "lenient_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub activity_type: Option<i64>,
    #[serde(
        default,
        alias = "includeLocation",
        deserialize_with = "truthy",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_location: Option<bool>,
    /// Whether first-run setup has been completed.
    #[serde(default, alias = "setupComplete", deserialize_with = "truthy_flag")]
    pub setup_complete: bool,
}

impl StoredSettings {
    /// Current-shape settings for `config`. Never carries a total duration.
    pub fn from_config(config: &TimerConfig, setup_complete: bool) -> Self {
        Self {
            interval_count: Some(i64::from(config.interval_count())),
            interval_secs: Some(i64::from(config.interval_secs())),
            total_duration_secs: None,
            activity_type: Some(i64::from(config.activity_type())),
            include_location: Some(config.include_location()),
            setup_complete,
        }
    }
}

/// Resolve stored settings into a usable config.
///
/// Round count: an explicit positive `interval_count`; else the legacy
/// `total_duration_secs / interval_secs` when the legacy key is present and
/// the quotient is positive; else the default count. `interval_secs` falls
/// back to the default when missing or not positive. An activity code of zero
/// counts as missing. `include_location` defaults to off.
pub fn normalize_settings(settings: Option<&StoredSettings>, defaults: &TimerConfig) -> TimerConfig {
    let Some(settings) = settings else {
        return *defaults;
    };

    let interval_secs = positive(settings.interval_secs).unwrap_or(defaults.interval_secs());
    let interval_count = determine_interval_count(settings, defaults);
    let activity_type = settings
        .activity_type
        .filter(|code| *code != 0)
        .and_then(|code| i32::try_from(code).ok())
        .unwrap_or(DEFAULT_ACTIVITY_TYPE);
    let include_location = settings.include_location.unwrap_or(false);

    TimerConfig::new(interval_count, interval_secs, activity_type, include_location)
        .unwrap_or(*defaults)
}

/// Round count from explicit, legacy, or default values, in that order.
pub fn determine_interval_count(settings: &StoredSettings, defaults: &TimerConfig) -> u32 {
    if let Some(count) = positive(settings.interval_count) {
        return count;
    }
    if let Some(total) = settings.total_duration_secs {
        let interval_secs = positive(settings.interval_secs).unwrap_or(defaults.interval_secs());
        return positive(Some(total.div_euclid(i64::from(interval_secs))))
            .unwrap_or(defaults.interval_count());
    }
    defaults.interval_count()
}

fn positive(value: Option<i64>) -> Option<u32> {
    value
        .filter(|v| *v > 0)
        .and_then(|v| u32::try_from(v).ok())
}

/// Integer from a number (floored), a numeric string, or nothing.
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64)),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.floor() as i64),
        _ => None,
    }))
}

/// Loose boolean coercion: zero, empty strings and null are false.
fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }))
}

fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(truthy(deserializer)?.unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> StoredSettings {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_settings_yield_defaults() {
        let defaults = TimerConfig::default();
        assert_eq!(normalize_settings(None, &defaults), defaults);
    }

    #[test]
    fn empty_object_yields_defaults() {
        let defaults = TimerConfig::default();
        assert_eq!(normalize_settings(Some(&parse("{}")), &defaults), defaults);
    }

    #[test]
    fn legacy_total_duration_becomes_round_count() {
        let settings = parse(r#"{"totalDurationSecs": 600, "intervalSecs": 60}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 10);
        assert_eq!(cfg.total_duration_secs(), 600);
    }

    #[test]
    fn legacy_zero_total_falls_back_to_default_count() {
        let settings = parse(r#"{"totalDurationSecs": 0, "intervalSecs": 60}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 5);

        // Shorter than one interval also floors to zero.
        let settings = parse(r#"{"totalDurationSecs": 30, "intervalSecs": 60}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 5);
    }

    #[test]
    fn explicit_count_beats_legacy_total() {
        let settings =
            parse(r#"{"intervalCount": 8, "totalDurationSecs": 600, "intervalSecs": 60}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 8);
        assert_eq!(cfg.total_duration_secs(), 480);
    }

    #[test]
    fn legacy_total_uses_default_interval_when_missing() {
        let defaults = TimerConfig::new(5, 30, 115, false).unwrap();
        let settings = parse(r#"{"totalDurationSecs": 300}"#);
        let cfg = normalize_settings(Some(&settings), &defaults);
        assert_eq!(cfg.interval_count(), 10);
        assert_eq!(cfg.interval_secs(), 30);
    }

    #[test]
    fn zero_or_negative_values_fall_back() {
        let settings = parse(r#"{"intervalCount": 0, "intervalSecs": -20, "activityType": 0}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 5);
        assert_eq!(cfg.interval_secs(), 60);
        assert_eq!(cfg.activity_type(), DEFAULT_ACTIVITY_TYPE);
    }

    #[test]
    fn activity_default_is_fixed_not_inherited() {
        let defaults = TimerConfig::new(5, 60, 42, false).unwrap();
        let cfg = normalize_settings(Some(&parse("{}")), &defaults);
        assert_eq!(cfg.activity_type(), DEFAULT_ACTIVITY_TYPE);
    }

    #[test]
    fn include_location_is_coerced() {
        let defaults = TimerConfig::default();
        for (json, expected) in [
            (r#"{"includeLocation": true}"#, true),
            (r#"{"includeLocation": 1}"#, true),
            (r#"{"includeLocation": "yes"}"#, true),
            (r#"{"includeLocation": 0}"#, false),
            (r#"{"includeLocation": ""}"#, false),
            (r#"{"includeLocation": null}"#, false),
            ("{}", false),
        ] {
            let cfg = normalize_settings(Some(&parse(json)), &defaults);
            assert_eq!(cfg.include_location(), expected, "{json}");
        }
    }

    #[test]
    fn numeric_strings_and_floats_are_accepted() {
        let settings = parse(r#"{"intervalCount": "7", "intervalSecs": 45.9}"#);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.interval_count(), 7);
        assert_eq!(cfg.interval_secs(), 45);
    }

    #[test]
    fn snake_case_toml_shape_parses() {
        let settings: StoredSettings = toml::from_str(
            "interval_count = 12\ninterval_secs = 40\nactivity_type = 114\ninclude_location = true\nsetup_complete = true\n",
        )
        .unwrap();
        assert!(settings.setup_complete);
        let cfg = normalize_settings(Some(&settings), &TimerConfig::default());
        assert_eq!(cfg.total_duration_secs(), 480);
        assert_eq!(cfg.activity_type(), 114);
        assert!(cfg.include_location());
    }

    #[test]
    fn from_config_drops_total() {
        let cfg = TimerConfig::new(3, 20, 114, true).unwrap();
        let stored = StoredSettings::from_config(&cfg, true);
        assert_eq!(stored.total_duration_secs, None);
        let json = serde_json::to_value(&stored).unwrap();
        assert!(json.get("total_duration_secs").is_none());
        assert_eq!(normalize_settings(Some(&stored), &TimerConfig::default()), cfg);
    }
}
