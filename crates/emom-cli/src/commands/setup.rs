use clap::Args;
use emom_core::timer::DEFAULT_ACTIVITY_TYPE;
use emom_core::{Config, TimerConfig};

#[derive(Args)]
pub struct SetupArgs {
    /// Number of rounds
    #[arg(long)]
    rounds: u32,
    /// Seconds per round
    #[arg(long)]
    interval: u32,
    /// Google Fit activity code
    #[arg(long, default_value_t = DEFAULT_ACTIVITY_TYPE)]
    activity: i32,
    /// Attach a location to uploaded workouts
    #[arg(long)]
    location: bool,
}

pub fn run(args: SetupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let timer = TimerConfig::new(args.rounds, args.interval, args.activity, args.location)?;
    let mut config = Config::load()?;
    config.set_timer_config(&timer, true);
    config.save()?;
    println!(
        "saved: {} rounds x {}s, activity {}{}",
        timer.interval_count(),
        timer.interval_secs(),
        timer.activity_type(),
        if timer.include_location() { ", with location" } else { "" }
    );
    Ok(())
}
