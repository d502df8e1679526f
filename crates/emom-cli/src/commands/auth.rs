use chrono::{DateTime, Local, Utc};
use clap::Subcommand;
use emom_core::integrations::google_fit::{SCOPES, SERVICE_NAME};
use emom_core::integrations::oauth;
use emom_core::{Database, OAuthTokens};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store a Google Fit access token
    Connect {
        /// Bearer token obtained from Google's consent flow
        #[arg(long)]
        token: String,
        /// Seconds until the token expires
        #[arg(long)]
        expires_in: Option<i64>,
    },
    /// Remove the stored token
    Disconnect,
    /// Check connection status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    match action {
        AuthAction::Connect { token, expires_in } => {
            let tokens = OAuthTokens::bearer(token, expires_in).with_scope(SCOPES.join(" "));
            oauth::store_tokens(&db, SERVICE_NAME, &tokens)?;
            println!("Google Fit connected");
        }
        AuthAction::Disconnect => {
            oauth::clear_tokens(&db, SERVICE_NAME)?;
            println!("Google Fit disconnected");
        }
        AuthAction::Status => match oauth::load_tokens(&db, SERVICE_NAME)? {
            Some(tokens) => {
                let expiry = tokens
                    .expires_at
                    .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));
                match expiry {
                    Some(exp) => println!(
                        "connected (expires {})",
                        exp.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                    ),
                    None => println!("connected"),
                }
            }
            None => println!("not connected"),
        },
    }
    Ok(())
}
