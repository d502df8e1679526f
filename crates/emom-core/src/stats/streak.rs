//! Consecutive-day attendance streak.
//!
//! A streak counts calendar days (local time) with at least one workout,
//! walking backward from today. If nothing was recorded today the walk starts
//! from yesterday instead, so the streak survives until the end of the day.

use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Streak over already-normalized calendar days.
///
/// Duplicate days count once; days after `today` are never reached by the
/// backward walk and so never extend the streak.
pub fn streak_from_days<I>(days: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: HashSet<NaiveDate> = days.into_iter().collect();

    let anchor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    let mut cursor = Some(anchor);
    while let Some(day) = cursor.filter(|d| days.contains(d)) {
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

/// Streak for timestamps, bucketed by local calendar day relative to `now`.
pub fn calculate_streak_at<Tz: TimeZone>(dates: &[DateTime<Tz>], now: DateTime<Local>) -> u32 {
    let days = dates.iter().map(|d| d.with_timezone(&Local).date_naive());
    streak_from_days(days, now.date_naive())
}

/// Streak for timestamps as of the current local day.
pub fn calculate_streak<Tz: TimeZone>(dates: &[DateTime<Tz>]) -> u32 {
    calculate_streak_at(dates, Local::now())
}
