pub mod auth;
pub mod config;
pub mod history;
pub mod run;
pub mod setup;
pub mod streak;

use emom_core::{Database, GoogleFitClient, SyncConfig, WorkoutService};

/// Local database plus a Google Fit client holding whatever token is stored.
///
/// An unreadable token is logged and treated as disconnected.
pub fn workout_service(sync: SyncConfig) -> Result<WorkoutService, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let client = match GoogleFitClient::from_database(&db) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!("ignoring stored Google Fit token: {e}");
            GoogleFitClient::new(None)
        }
    };
    Ok(WorkoutService::new(db, Some(client), sync))
}

/// Single-threaded runtime for the few network calls a command makes.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
