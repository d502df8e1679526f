use emom_core::Config;

use super::{runtime, workout_service};

pub fn run(local: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let service = workout_service(config.sync)?;
    let streak = if local {
        service.local_streak()?
    } else {
        runtime()?.block_on(service.current_streak())?
    };
    println!("{streak}");
    Ok(())
}
