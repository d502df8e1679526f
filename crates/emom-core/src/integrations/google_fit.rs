//! Google Fit integration.
//!
//! Uploads each completed workout as a Fit session, optionally with a single
//! location sample, and reads back which days had a workout so the streak can
//! include runs recorded on other devices.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::oauth::{self, OAuthTokens};
use super::traits::CloudSync;
use crate::error::{CoreError, OAuthError, SyncError};
use crate::storage::{Database, WorkoutRecord};

pub const SERVICE_NAME: &str = "google_fit";
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com";

/// Activity code sent when a record carries none (HIIT).
pub const HIIT_ACTIVITY_TYPE: i32 = 114;

/// Scopes a token must carry for upload, history and location.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/fitness.activity.write",
    "https://www.googleapis.com/auth/fitness.activity.read",
    "https://www.googleapis.com/auth/fitness.location.write",
];

const LOCATION_SOURCE_ID: &str =
    "raw:com.google.location.sample:com.ccombe.emomtimer:LocationSource";
const DAY_MILLIS: i64 = 86_400_000;
const NANOS_PER_MILLI: i64 = 1_000_000;

/// Google Fit REST client.
pub struct GoogleFitClient {
    http: Client,
    base_url: String,
    tokens: Option<OAuthTokens>,
}

impl GoogleFitClient {
    pub fn new(tokens: Option<OAuthTokens>) -> Self {
        Self {
            http: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            tokens,
        }
    }

    /// Client using whatever token is stored in `db`.
    pub fn from_database(db: &Database) -> Result<Self, CoreError> {
        Ok(Self::new(oauth::load_tokens(db, SERVICE_NAME)?))
    }

    /// Point the client at another host (tests, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, SyncError> {
        url::Url::parse(base_url).map_err(|_| SyncError::InvalidBaseUrl(base_url.to_string()))?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    fn access_token(&self) -> Result<&str, SyncError> {
        match &self.tokens {
            Some(tokens) if !oauth::is_expired(tokens) => Ok(&tokens.access_token),
            Some(_) => Err(OAuthError::TokenExpired {
                service: SERVICE_NAME.to_string(),
            }
            .into()),
            None => Err(OAuthError::NotAuthenticated {
                service: SERVICE_NAME.to_string(),
            }
            .into()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/fitness/v1/users/me/{path}", self.base_url)
    }

    fn request_failed(source: reqwest::Error) -> SyncError {
        SyncError::Request {
            service: SERVICE_NAME.to_string(),
            source,
        }
    }

    async fn upload_location(
        &self,
        token: &str,
        start_ms: i64,
        end_ms: i64,
        lat: f64,
        lng: f64,
    ) -> Result<(), SyncError> {
        let start_ns = start_ms * NANOS_PER_MILLI;
        let end_ns = end_ms * NANOS_PER_MILLI;
        let url = self.url(&format!(
            "dataSources/{LOCATION_SOURCE_ID}/datasets/{start_ns}-{end_ns}"
        ));
        // Accuracy and altitude are not measured; Fit requires all four fields.
        let body = json!({
            "dataSourceId": LOCATION_SOURCE_ID,
            "minStartTimeNs": start_ns,
            "maxEndTimeNs": end_ns,
            "point": [{
                "startTimeNanos": start_ns,
                "endTimeNanos": end_ns,
                "dataTypeName": "com.google.location.sample",
                "value": [
                    { "fpVal": lat, "mapVal": [] },
                    { "fpVal": lng, "mapVal": [] },
                    { "fpVal": 10, "mapVal": [] },
                    { "fpVal": 0, "mapVal": [] },
                ],
            }],
        });

        let resp = self
            .http
            .patch(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(Self::request_failed)?;
        ensure_success(resp, "location upload").await
    }
}

impl CloudSync for GoogleFitClient {
    fn name(&self) -> &str {
        SERVICE_NAME
    }

    fn is_connected(&self) -> bool {
        self.access_token().is_ok()
    }

    async fn upload_workout(&self, record: &WorkoutRecord) -> Result<(), SyncError> {
        let token = self.access_token()?;
        let end_ms = record.recorded_at.timestamp_millis();
        let start_ms = end_ms - record.duration_secs as i64 * 1000;
        let session_id = format!("emom-timer-{start_ms}");
        let activity_type = match record.activity_type {
            0 => HIIT_ACTIVITY_TYPE,
            code => code,
        };

        let body = json!({
            "id": session_id,
            "name": "EMOM Workout",
            "description": "EMOM Timer Session",
            "startTimeMillis": start_ms,
            "endTimeMillis": end_ms,
            "modifiedTimeMillis": end_ms,
            "application": {
                "name": "EMOM Timer",
                "version": env!("CARGO_PKG_VERSION"),
            },
            "activityType": activity_type,
        });

        let resp = self
            .http
            .put(self.url(&format!("sessions/{session_id}")))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(Self::request_failed)?;
        ensure_success(resp, "session upload").await?;
        tracing::info!(session = %session_id, "workout uploaded to Google Fit");

        if let Some(loc) = record.location {
            if let Err(e) = self
                .upload_location(token, start_ms, end_ms, loc.lat, loc.lng)
                .await
            {
                tracing::warn!(error = %e, "failed to store workout location");
            }
        }
        Ok(())
    }

    async fn fetch_workout_history(&self, days: u32) -> Result<Vec<DateTime<Utc>>, SyncError> {
        let token = self.access_token()?;
        let end = Utc::now();
        let start = end - Duration::days(i64::from(days));
        let body = json!({
            "aggregateBy": [{ "dataTypeName": "com.google.activity.segment" }],
            "bucketByTime": { "durationMillis": DAY_MILLIS },
            "startTimeMillis": start.timestamp_millis(),
            "endTimeMillis": end.timestamp_millis(),
        });

        let resp = self
            .http
            .post(self.url("dataset:aggregate"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(Self::request_failed)?;

        if !resp.status().is_success() {
            tracing::warn!(status = resp.status().as_u16(), "history request rejected");
            return Ok(Vec::new());
        }

        let data: AggregateResponse = resp.json().await.map_err(Self::request_failed)?;
        Ok(workout_days(&data))
    }
}

async fn ensure_success(resp: reqwest::Response, operation: &str) -> Result<(), SyncError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SyncError::Rejected {
        service: SERVICE_NAME.to_string(),
        operation: operation.to_string(),
        status: status.as_u16(),
        body,
    })
}

#[derive(Debug, Default, Deserialize)]
struct AggregateResponse {
    #[serde(default)]
    bucket: Vec<Bucket>,
}

#[derive(Debug, Deserialize)]
struct Bucket {
    #[serde(rename = "startTimeMillis", default)]
    start_time_millis: serde_json::Value,
    #[serde(default)]
    dataset: Vec<Dataset>,
}

#[derive(Debug, Deserialize)]
struct Dataset {
    #[serde(default)]
    point: Vec<Point>,
}

#[derive(Debug, Deserialize)]
struct Point {
    #[serde(default)]
    value: Vec<PointValue>,
}

#[derive(Debug, Deserialize)]
struct PointValue {
    #[serde(rename = "intVal")]
    int_val: Option<i64>,
}

/// Bucket start times for buckets whose first dataset holds a HIIT segment.
fn workout_days(data: &AggregateResponse) -> Vec<DateTime<Utc>> {
    data.bucket
        .iter()
        .filter(|bucket| {
            bucket.dataset.first().is_some_and(|ds| {
                ds.point.iter().any(|p| {
                    p.value.first().and_then(|v| v.int_val)
                        == Some(i64::from(HIIT_ACTIVITY_TYPE))
                })
            })
        })
        .filter_map(|bucket| millis_value(&bucket.start_time_millis))
        .filter_map(DateTime::<Utc>::from_timestamp_millis)
        .collect()
}

// Fit encodes int64 fields as JSON strings.
fn millis_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Number(n) => n.as_i64(),
        _ => None,
    }
}
