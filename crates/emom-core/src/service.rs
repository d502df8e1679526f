//! Completion handling around the engine.
//!
//! The engine only reports that a run finished. Saving the record, mirroring
//! it to the cloud, and merging cloud history into the streak all live here,
//! and none of the cloud steps can fail a call once local storage succeeded.

use crate::error::DatabaseError;
use crate::integrations::{CloudSync, GoogleFitClient};
use crate::stats::calculate_streak;
use crate::storage::{Database, NewWorkout, SyncConfig, WorkoutRecord};
use crate::timer::{Location, TimerConfig};

/// What happened to the cloud copy of a completed workout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// No connected client, or uploads are turned off.
    Skipped,
    Uploaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub record: WorkoutRecord,
    pub upload: UploadStatus,
}

/// Local storage plus an optional cloud mirror.
pub struct WorkoutService<S = GoogleFitClient> {
    db: Database,
    sync: Option<S>,
    options: SyncConfig,
}

impl<S: CloudSync> WorkoutService<S> {
    pub fn new(db: Database, sync: Option<S>, options: SyncConfig) -> Self {
        Self { db, sync, options }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn sync(&self) -> Option<&S> {
        self.sync.as_ref()
    }

    /// Whether a cloud client is present and holds a usable credential.
    pub fn is_connected(&self) -> bool {
        self.connected().is_some()
    }

    fn connected(&self) -> Option<&S> {
        self.sync.as_ref().filter(|s| s.is_connected())
    }

    /// Save a finished run of `config`, then try to upload it.
    ///
    /// # Errors
    /// Only the local save can fail the call. Upload problems are logged and
    /// reported through [`CompletionOutcome::upload`].
    pub async fn record_completion(
        &self,
        config: &TimerConfig,
        location: Option<Location>,
    ) -> Result<CompletionOutcome, DatabaseError> {
        let record = self
            .db
            .save_workout(&NewWorkout::from_config(config, location))?;
        tracing::info!(
            id = record.id,
            duration_secs = record.duration_secs,
            has_location = record.location.is_some(),
            "workout saved"
        );

        let upload = match self.connected() {
            Some(sync) if self.options.upload => match sync.upload_workout(&record).await {
                Ok(()) => UploadStatus::Uploaded,
                Err(e) => {
                    tracing::warn!(service = sync.name(), error = %e, "workout upload failed");
                    UploadStatus::Failed(e.to_string())
                }
            },
            _ => UploadStatus::Skipped,
        };

        Ok(CompletionOutcome { record, upload })
    }

    /// Streak from local records only.
    pub fn local_streak(&self) -> Result<u32, DatabaseError> {
        self.db.streak()
    }

    /// The larger of the local streak and the streak implied by cloud history.
    ///
    /// A failed history fetch keeps the local value.
    pub async fn current_streak(&self) -> Result<u32, DatabaseError> {
        let local = self.local_streak()?;
        let Some(sync) = self.connected() else {
            return Ok(local);
        };
        match sync.fetch_workout_history(self.options.history_days).await {
            Ok(dates) => {
                let cloud = calculate_streak(&dates);
                tracing::debug!(local, cloud, "merged streaks");
                Ok(local.max(cloud))
            }
            Err(e) => {
                tracing::warn!(service = sync.name(), error = %e, "history fetch failed, using local streak");
                Ok(local)
            }
        }
    }
}

/// Location is only worth asking for when it will be uploaded and the run
/// does not have one yet.
pub fn should_acquire_location(
    config: &TimerConfig,
    sync_connected: bool,
    current: Option<Location>,
) -> bool {
    sync_connected && config.include_location() && current.is_none()
}
