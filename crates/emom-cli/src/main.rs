use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "emom", version, about = "EMOM interval timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a workout in the terminal
    Run(commands::run::RunArgs),
    /// Save your default schedule
    Setup(commands::setup::SetupArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// List completed workouts
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the current daily streak
    Streak {
        /// Ignore cloud history
        #[arg(long)]
        local: bool,
    },
    /// Google Fit connection
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
}

fn main() {
    // Logs go to stderr so they never interleave with the timer line.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Setup(args) => commands::setup::run(args),
        Commands::Config { action } => commands::config::run(action),
        Commands::History { json } => commands::history::run(json),
        Commands::Streak { local } => commands::streak::run(local),
        Commands::Auth { action } => commands::auth::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
