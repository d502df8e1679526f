use chrono::Local;
use emom_core::Database;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let records = db.history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("no workouts yet");
        return Ok(());
    }
    for r in &records {
        let rounds = r.duration_secs / u64::from(r.interval_secs.max(1));
        let location = r
            .location
            .map(|l| format!("  @ {:.4},{:.4}", l.lat, l.lng))
            .unwrap_or_default();
        println!(
            "{}  {rounds} x {}s  activity {}{location}",
            r.recorded_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            r.interval_secs,
            r.activity_type,
        );
    }
    Ok(())
}
