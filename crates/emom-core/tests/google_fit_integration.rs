//! Google Fit client against a local mock server.

use chrono::{DateTime, Utc};
use emom_core::error::{OAuthError, SyncError};
use emom_core::{CloudSync, GoogleFitClient, Location, OAuthTokens, WorkoutRecord};
use mockito::Matcher;
use serde_json::json;

fn record(activity_type: i32, location: Option<Location>) -> WorkoutRecord {
    WorkoutRecord {
        id: 1,
        duration_secs: 300,
        interval_secs: 60,
        activity_type,
        location,
        recorded_at: DateTime::parse_from_rfc3339("2024-03-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc),
    }
}

fn client(server: &mockito::Server) -> GoogleFitClient {
    GoogleFitClient::new(Some(OAuthTokens::bearer("test-token", Some(3600))))
        .with_base_url(&server.url())
        .unwrap()
}

#[tokio::test]
async fn test_upload_puts_session() {
    let mut server = mockito::Server::new_async().await;
    let session = server
        .mock(
            "PUT",
            "/fitness/v1/users/me/sessions/emom-timer-1710503700000",
        )
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "id": "emom-timer-1710503700000",
            "startTimeMillis": 1_710_503_700_000_i64,
            "endTimeMillis": 1_710_504_000_000_i64,
            "activityType": 115,
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    client(&server).upload_workout(&record(115, None)).await.unwrap();
    session.assert_async().await;
}

#[tokio::test]
async fn test_upload_defaults_activity_to_hiit() {
    let mut server = mockito::Server::new_async().await;
    let session = server
        .mock("PUT", Matcher::Regex(r"^/fitness/v1/users/me/sessions/".into()))
        .match_body(Matcher::PartialJson(json!({ "activityType": 114 })))
        .with_status(200)
        .create_async()
        .await;

    client(&server).upload_workout(&record(0, None)).await.unwrap();
    session.assert_async().await;
}

#[tokio::test]
async fn test_upload_sends_location_sample() {
    let mut server = mockito::Server::new_async().await;
    let session = server
        .mock("PUT", Matcher::Regex(r"^/fitness/v1/users/me/sessions/".into()))
        .with_status(200)
        .create_async()
        .await;
    let location = server
        .mock(
            "PATCH",
            "/fitness/v1/users/me/dataSources/raw:com.google.location.sample:com.ccombe.emomtimer:LocationSource/datasets/1710503700000000000-1710504000000000000",
        )
        .match_body(Matcher::PartialJson(json!({
            "dataSourceId": "raw:com.google.location.sample:com.ccombe.emomtimer:LocationSource",
            "minStartTimeNs": 1_710_503_700_000_000_000_i64,
        })))
        .with_status(200)
        .create_async()
        .await;

    let here = Location { lat: 51.5, lng: -0.1 };
    client(&server)
        .upload_workout(&record(115, Some(here)))
        .await
        .unwrap();
    session.assert_async().await;
    location.assert_async().await;
}

#[tokio::test]
async fn test_location_failure_is_not_fatal() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", Matcher::Regex(r"^/fitness/v1/users/me/sessions/".into()))
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("PATCH", Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let here = Location { lat: 1.0, lng: 2.0 };
    assert!(client(&server)
        .upload_workout(&record(115, Some(here)))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_rejected_upload_reports_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("PUT", Matcher::Any)
        .with_status(401)
        .with_body(r#"{"error": "invalid_token"}"#)
        .create_async()
        .await;

    let err = client(&server)
        .upload_workout(&record(115, None))
        .await
        .unwrap_err();
    match err {
        SyncError::Rejected { status, body, .. } => {
            assert_eq!(status, 401);
            assert!(body.contains("invalid_token"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_history_counts_hiit_buckets() {
    let mut server = mockito::Server::new_async().await;
    let aggregate = server
        .mock("POST", "/fitness/v1/users/me/dataset:aggregate")
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::PartialJson(json!({
            "bucketByTime": { "durationMillis": 86_400_000 },
        })))
        .with_status(200)
        .with_body(
            json!({
                "bucket": [
                    { "startTimeMillis": "1678886400000",
                      "dataset": [{ "point": [{ "value": [{ "intVal": 114 }] }] }] },
                    { "startTimeMillis": "1678972800000",
                      "dataset": [{ "point": [{ "value": [{ "intVal": 3 }] }] }] },
                    { "startTimeMillis": "1679059200000", "dataset": [] }
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let days = client(&server).fetch_workout_history(60).await.unwrap();
    aggregate.assert_async().await;
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].timestamp_millis(), 1_678_886_400_000);
}

#[tokio::test]
async fn test_history_error_status_is_empty() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/fitness/v1/users/me/dataset:aggregate")
        .with_status(500)
        .create_async()
        .await;

    let days = client(&server).fetch_workout_history(60).await.unwrap();
    assert!(days.is_empty());
}

#[tokio::test]
async fn test_requires_token() {
    let client = GoogleFitClient::new(None);
    assert!(!client.is_connected());
    let err = client.fetch_workout_history(60).await.unwrap_err();
    assert!(matches!(
        err,
        SyncError::Auth(OAuthError::NotAuthenticated { .. })
    ));
}
