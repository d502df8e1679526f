use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use clap::Args;
use emom_core::timer::progress::format_time;
use emom_core::{
    should_acquire_location, Config, Event, Location, PreStartCountdown, RunSnapshot, SystemClock,
    TimerEngine, UploadStatus,
};

use super::{runtime, workout_service};

/// Roughly one display frame.
const FRAME: Duration = Duration::from_millis(16);
const BELL: &str = "\x07";

#[derive(Args)]
pub struct RunArgs {
    /// Number of rounds (defaults to the saved setting)
    #[arg(long)]
    rounds: Option<u32>,
    /// Seconds per round (defaults to the saved setting)
    #[arg(long)]
    interval: Option<u32>,
    /// Skip the 3-2-1 lead-in
    #[arg(long)]
    no_countdown: bool,
    /// Latitude to attach when uploading
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,
    /// Longitude to attach when uploading
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Config::load_or_default();
    if !settings.setup_complete() {
        eprintln!("note: no saved schedule yet, run `emom setup` to choose one");
    }

    let mut config = settings.timer_config();
    if args.rounds.is_some() || args.interval.is_some() {
        config = config.with_schedule(
            args.rounds.unwrap_or(config.interval_count()),
            args.interval.unwrap_or(config.interval_secs()),
        )?;
    }

    let service = workout_service(settings.sync.clone())?;
    let rt = runtime()?;
    let mut engine = TimerEngine::new(config, SystemClock);

    if should_acquire_location(&config, service.is_connected(), engine.location()) {
        match args.lat.zip(args.lng) {
            Some((lat, lng)) => {
                engine.set_location(Location { lat, lng });
                tracing::info!(lat, lng, "location attached to run");
            }
            None => tracing::warn!("location upload is on but no --lat/--lng was given"),
        }
    }

    let mut out = io::stdout();
    println!(
        "{} rounds x {}s ({})",
        config.interval_count(),
        config.interval_secs(),
        format_time(config.total_duration_secs() as f64)
    );

    if !args.no_countdown {
        for step in PreStartCountdown::default() {
            write!(out, "\r{}...{BELL}", step.count)?;
            out.flush()?;
            thread::sleep(Duration::from_secs(1));
        }
        writeln!(out)?;
    }

    let mut last_line = String::new();
    let mut events = engine.start();
    loop {
        for event in events.drain(..) {
            render(&mut out, &event, &mut last_line)?;
        }
        out.flush()?;
        if !engine.is_running() {
            break;
        }
        thread::sleep(FRAME);
        events = engine.tick();
    }

    let outcome = rt.block_on(service.record_completion(engine.config(), engine.location()))?;
    match outcome.upload {
        UploadStatus::Uploaded => println!("Uploaded to Google Fit"),
        UploadStatus::Failed(e) => eprintln!("warning: upload failed: {e}"),
        UploadStatus::Skipped => {}
    }

    let streak = rt.block_on(service.current_streak())?;
    println!("Streak: {streak} day{}", if streak == 1 { "" } else { "s" });
    Ok(())
}

fn render(out: &mut impl Write, event: &Event, last_line: &mut String) -> io::Result<()> {
    match event {
        Event::Tick { snapshot } => {
            let line = status_line(snapshot);
            if line != *last_line {
                write!(out, "\r{line}")?;
                *last_line = line;
            }
        }
        Event::IntervalStarted { .. } | Event::CountdownBeep { .. } => write!(out, "{BELL}")?,
        Event::Completed => writeln!(out, "\nWorkout complete!")?,
    }
    Ok(())
}

fn status_line(snapshot: &RunSnapshot) -> String {
    format!(
        "Round {}/{}  {}",
        snapshot.round.current,
        snapshot.round.total,
        snapshot.display_clock()
    )
}
