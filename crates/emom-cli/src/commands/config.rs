//! `emom config`: inspect and edit `config.toml`.
//!
//! The file may hold legacy or partial timer settings, so `list` shows the
//! stored values next to the schedule a run would actually use.

use clap::Subcommand;
use emom_core::Config;
use serde_json::{json, Value};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one stored value
    Get {
        /// Dotted key (e.g. "timer.interval_count", "sync.history_days")
        key: String,
    },
    /// Store one value; it must parse as the key's existing type
    Set {
        key: String,
        value: String,
    },
    /// Show stored values and the effective timer schedule
    #[command(alias = "show")]
    List,
    /// Overwrite config.toml with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match action {
        ConfigAction::Reset => Config::default(),
        _ => Config::load()?,
    };
    match action {
        ConfigAction::Get { key } => match config.get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(format!("unknown key: {key} (see `emom config list`)").into()),
        },
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            let timer = config.timer_config();
            tracing::debug!(
                rounds = timer.interval_count(),
                interval = timer.interval_secs(),
                "config updated"
            );
            println!("ok");
        }
        ConfigAction::List => println!("{}", serde_json::to_string_pretty(&overview(&config))?),
        ConfigAction::Reset => {
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

fn overview(config: &Config) -> Value {
    json!({
        "file": config,
        "effective": config.timer_config(),
        "setup_complete": config.setup_complete(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_normalizes_legacy_total() {
        let mut config = Config::default();
        config.apply("timer.interval_secs", "30").unwrap();
        config.apply("timer.total_duration_secs", "120").unwrap();

        let view = overview(&config);
        assert_eq!(view["file"]["timer"]["interval_secs"], 30);
        assert_eq!(view["effective"]["interval_secs"], 30);
        assert_eq!(view["effective"]["interval_count"], 4);
        assert_eq!(view["effective"]["total_duration_secs"], 120);
        assert_eq!(view["setup_complete"], false);
    }
}
