//! SQLite-based workout storage.
//!
//! Provides persistent storage for:
//! - Completed workouts (one row per finished run)
//! - Key-value store for application state (access tokens)
//!
//! Records are immutable once written. Calendar-day bucketing for streaks
//! happens in [`crate::stats::streak`], not in SQL.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{CoreError, DatabaseError};
use crate::stats::calculate_streak;
use crate::timer::{Location, TimerConfig, DEFAULT_ACTIVITY_TYPE};

/// A workout as handed to storage and cloud sync.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NewWorkout {
    pub duration_secs: u64,
    pub interval_secs: u32,
    pub activity_type: i32,
    pub location: Option<Location>,
}

impl NewWorkout {
    /// The record for a completed run of `config`.
    pub fn from_config(config: &TimerConfig, location: Option<Location>) -> Self {
        let activity_type = match config.activity_type() {
            0 => DEFAULT_ACTIVITY_TYPE,
            code => code,
        };
        Self {
            duration_secs: config.total_duration_secs(),
            interval_secs: config.interval_secs(),
            activity_type,
            location,
        }
    }
}

/// A stored workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: i64,
    pub duration_secs: u64,
    pub interval_secs: u32,
    pub activity_type: i32,
    pub location: Option<Location>,
    pub recorded_at: DateTime<Utc>,
}

/// A `workouts` row before its timestamp text is parsed.
struct WorkoutRow {
    id: i64,
    duration_secs: u64,
    interval_secs: u32,
    activity_type: i32,
    lat: Option<f64>,
    lng: Option<f64>,
    recorded_at: String,
}

impl WorkoutRow {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            duration_secs: row.get(1)?,
            interval_secs: row.get(2)?,
            activity_type: row.get(3)?,
            lat: row.get(4)?,
            lng: row.get(5)?,
            recorded_at: row.get(6)?,
        })
    }

    fn into_record(self) -> Result<WorkoutRecord, DatabaseError> {
        let recorded_at = DateTime::parse_from_rfc3339(&self.recorded_at)
            .map_err(|e| DatabaseError::CorruptRow {
                table: "workouts".to_string(),
                message: format!("id {}: bad recorded_at '{}': {e}", self.id, self.recorded_at),
            })?
            .with_timezone(&Utc);
        Ok(WorkoutRecord {
            id: self.id,
            duration_secs: self.duration_secs,
            interval_secs: self.interval_secs,
            activity_type: self.activity_type,
            location: self.lat.zip(self.lng).map(|(lat, lng)| Location { lat, lng }),
            recorded_at,
        })
    }
}

/// SQLite database for workout storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/emom-timer/emom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory is unavailable or the database
    /// cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("emom.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS workouts (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                duration_secs INTEGER NOT NULL,
                interval_secs INTEGER NOT NULL,
                activity_type INTEGER NOT NULL,
                lat           REAL,
                lng           REAL,
                recorded_at   TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_workouts_recorded_at ON workouts(recorded_at);",
        )?;
        Ok(())
    }

    /// Record a workout stamped with the current time.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn save_workout(&self, workout: &NewWorkout) -> Result<WorkoutRecord, DatabaseError> {
        self.save_workout_at(workout, Utc::now())
    }

    /// Record a workout with an explicit timestamp.
    pub fn save_workout_at(
        &self,
        workout: &NewWorkout,
        recorded_at: DateTime<Utc>,
    ) -> Result<WorkoutRecord, DatabaseError> {
        self.conn.execute(
            "INSERT INTO workouts (duration_secs, interval_secs, activity_type, lat, lng, recorded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                workout.duration_secs,
                workout.interval_secs,
                workout.activity_type,
                workout.location.map(|l| l.lat),
                workout.location.map(|l| l.lng),
                recorded_at.to_rfc3339(),
            ],
        )?;
        Ok(WorkoutRecord {
            id: self.conn.last_insert_rowid(),
            duration_secs: workout.duration_secs,
            interval_secs: workout.interval_secs,
            activity_type: workout.activity_type,
            location: workout.location,
            recorded_at,
        })
    }

    /// All workouts, oldest first.
    pub fn history(&self) -> Result<Vec<WorkoutRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, duration_secs, interval_secs, activity_type, lat, lng, recorded_at
             FROM workouts
             ORDER BY recorded_at, id",
        )?;
        let rows = stmt.query_map([], WorkoutRow::from_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// Timestamps of every recorded workout.
    pub fn workout_dates(&self) -> Result<Vec<DateTime<Utc>>, DatabaseError> {
        Ok(self.history()?.into_iter().map(|r| r.recorded_at).collect())
    }

    /// Current local streak.
    pub fn streak(&self) -> Result<u32, DatabaseError> {
        Ok(calculate_streak(&self.workout_dates()?))
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a value from the kv store. Missing keys are fine.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn workout(location: Option<Location>) -> NewWorkout {
        NewWorkout {
            duration_secs: 300,
            interval_secs: 60,
            activity_type: 115,
            location,
        }
    }

    #[test]
    fn record_and_query() {
        let db = Database::open_memory().unwrap();
        let saved = db.save_workout(&workout(None)).unwrap();
        assert_eq!(saved.id, 1);

        let history = db.history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].duration_secs, 300);
        assert_eq!(history[0].location, None);
        assert_eq!(db.streak().unwrap(), 1);
    }

    #[test]
    fn location_roundtrips() {
        let db = Database::open_memory().unwrap();
        let loc = Location { lat: 51.5, lng: -0.12 };
        db.save_workout(&workout(Some(loc))).unwrap();
        assert_eq!(db.history().unwrap()[0].location, Some(loc));
    }

    #[test]
    fn history_is_ordered_by_date() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();
        db.save_workout_at(&workout(None), now).unwrap();
        db.save_workout_at(&workout(None), now - Duration::days(3)).unwrap();
        let dates = db.workout_dates().unwrap();
        assert_eq!(dates.len(), 2);
        assert!(dates[0] < dates[1]);
    }

    #[test]
    fn from_config_fills_activity() {
        let cfg = TimerConfig::new(4, 30, 0, false).unwrap();
        let w = NewWorkout::from_config(&cfg, None);
        assert_eq!(w.activity_type, DEFAULT_ACTIVITY_TYPE);
        assert_eq!(w.duration_secs, 120);
        assert_eq!(w.interval_secs, 30);
    }

    #[test]
    fn unparseable_timestamp_is_corrupt_row() {
        let db = Database::open_memory().unwrap();
        db.save_workout(&workout(None)).unwrap();
        db.conn()
            .execute(
                "INSERT INTO workouts (duration_secs, interval_secs, activity_type, recorded_at)
                 VALUES (60, 60, 115, 'yesterday')",
                [],
            )
            .unwrap();

        match db.history() {
            Err(DatabaseError::CorruptRow { table, message }) => {
                assert_eq!(table, "workouts");
                assert!(message.contains("yesterday"));
            }
            other => panic!("expected CorruptRow, got {other:?}"),
        }
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
        db.kv_delete("test").unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_delete("test").unwrap();
    }

    #[test]
    fn open_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("emom.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.save_workout(&workout(None)).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.history().unwrap().len(), 1);
    }
}
