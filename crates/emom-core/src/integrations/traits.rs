use chrono::{DateTime, Utc};

use crate::error::SyncError;
use crate::storage::WorkoutRecord;

/// A fitness service completed workouts are mirrored to.
///
/// Implementations hold their own credentials. Every call is best-effort from
/// the caller's point of view: the local record is already saved by the time
/// an upload is attempted.
#[allow(async_fn_in_trait)]
pub trait CloudSync {
    /// Unique identifier (e.g. "google_fit").
    fn name(&self) -> &str;

    /// Whether a usable credential is present.
    fn is_connected(&self) -> bool;

    /// Push one completed workout.
    async fn upload_workout(&self, record: &WorkoutRecord) -> Result<(), SyncError>;

    /// Start-of-day timestamps of days with a recorded workout, going back
    /// `days` days from now.
    async fn fetch_workout_history(&self, days: u32) -> Result<Vec<DateTime<Utc>>, SyncError>;
}
