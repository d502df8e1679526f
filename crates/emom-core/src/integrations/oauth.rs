//! Access-token storage for cloud sync.
//!
//! The consent flow happens outside this crate; what lands here is the
//! resulting bearer token. Tokens are kept as JSON in the database kv table
//! under `oauth:{service}` and are dropped once they expire.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, OAuthError};
use crate::storage::Database;

/// Seconds before the recorded expiry at which a token is treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub expires_at: Option<i64>, // Unix timestamp
    pub token_type: String,
    pub scope: Option<String>,
}

impl OAuthTokens {
    /// A bearer token that expires `expires_in` seconds from now, if given.
    ///
    /// Lifetimes past the representable range saturate to the far future.
    pub fn bearer(access_token: impl Into<String>, expires_in: Option<i64>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: expires_in.map(|ei| Utc::now().timestamp().saturating_add(ei)),
            token_type: "Bearer".to_string(),
            scope: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }
}

fn kv_key(service_name: &str) -> String {
    format!("oauth:{service_name}")
}

/// Persist tokens for `service_name`, replacing any previous ones.
pub fn store_tokens(
    db: &Database,
    service_name: &str,
    tokens: &OAuthTokens,
) -> Result<(), CoreError> {
    let json = serde_json::to_string(tokens)?;
    db.kv_set(&kv_key(service_name), &json)?;
    Ok(())
}

/// Load stored tokens. Expired tokens are deleted and reported as absent.
///
/// # Errors
/// Returns an error if the database read fails or the stored JSON is not a
/// token.
pub fn load_tokens(db: &Database, service_name: &str) -> Result<Option<OAuthTokens>, CoreError> {
    let Some(json) = db.kv_get(&kv_key(service_name))? else {
        return Ok(None);
    };
    let tokens: OAuthTokens =
        serde_json::from_str(&json).map_err(|e| OAuthError::Unreadable {
            service: service_name.to_string(),
            message: e.to_string(),
        })?;
    if is_expired(&tokens) {
        tracing::info!(service = service_name, "stored access token expired, discarding");
        db.kv_delete(&kv_key(service_name))?;
        return Ok(None);
    }
    Ok(Some(tokens))
}

/// Remove stored tokens. Removing absent tokens is not an error.
pub fn clear_tokens(db: &Database, service_name: &str) -> Result<(), CoreError> {
    db.kv_delete(&kv_key(service_name))?;
    Ok(())
}

/// Check if tokens are expired (with 60s buffer).
pub fn is_expired(tokens: &OAuthTokens) -> bool {
    is_expired_at(tokens, Utc::now().timestamp())
}

pub fn is_expired_at(tokens: &OAuthTokens, now: i64) -> bool {
    match tokens.expires_at {
        Some(exp) => now > exp.saturating_sub(EXPIRY_BUFFER_SECS),
        None => false,
    }
}
