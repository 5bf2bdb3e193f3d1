//! Integration tests for the HTTP API
//!
//! Tests verify:
//! - `/health` always answers OK
//! - `/update-team-data` followed by `/team-data` round-trips the document
//! - `/generate-sprint-plan` uses the remote plan when it succeeds
//! - Remote failures and malformed remote output fall back to the mock plan
//! - Stored documents reach the remote planner even when the fallback
//!   could not plan them
//! - Load failures surface as 500, bad request bodies as JSON errors

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use sprint_planner::planner::{extract_json, PlanRequestor};
use sprint_planner::server::{build_router, AppState};
use sprint_planner::{RemoteError, TeamDataStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Requestor answering every call with a fixed result
struct StubRequestor(Result<Value, RemoteError>);

#[async_trait]
impl PlanRequestor for StubRequestor {
    async fn request_plan(&self, _document: &Value) -> Result<Value, RemoteError> {
        self.0.clone()
    }
}

/// Requestor that runs raw model text through the real extractor
struct RawTextRequestor(&'static str);

#[async_trait]
impl PlanRequestor for RawTextRequestor {
    async fn request_plan(&self, _document: &Value) -> Result<Value, RemoteError> {
        extract_json(self.0)
    }
}

fn sample_team() -> Value {
    json!({
        "teamVelocity": 10,
        "sprintLength": 2,
        "sprintStartDate": "2025-01-06",
        "epics": [
            { "epicId": "E1", "title": "Onboarding", "priority": "high" },
            { "epicId": "E2", "title": "Reporting", "priority": "low" }
        ],
        "teamMembers": [{ "name": "Ana", "role": "fullstack" }],
        "stories": [
            { "storyId": "S1", "epicId": "E1", "estimationPoints": 5, "title": "Sign up" },
            { "storyId": "S2", "epicId": "E2", "estimationPoints": 8, "dependencies": ["S1"] }
        ]
    })
}

fn setup(requestor: impl PlanRequestor + 'static, document: Option<&Value>) -> (TempDir, PathBuf, axum::Router) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("team-data.json");
    if let Some(doc) = document {
        std::fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    }

    let state = AppState::new(TeamDataStore::new(&path), Arc::new(requestor));
    (temp, path, build_router(state))
}

async fn send(app: axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), None);

    let (status, body) = send(app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_team_data_returns_document() {
    let doc = sample_team();
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), Some(&doc));

    let (status, body) = send(app, Method::GET, "/team-data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, doc);
}

#[tokio::test]
async fn test_team_data_missing_file_is_500() {
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), None);

    let (status, body) = send(app, Method::GET, "/team-data", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Failed to load team data"));
}

#[tokio::test]
async fn test_update_then_read_round_trips_arbitrary_json() {
    let (_temp, path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), None);
    let payload = json!({ "free": "form", "list": [1, { "deep": null }], "n": 1.5 });

    let (status, body) = send(app.clone(), Method::POST, "/update-team-data", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());

    let (status, body) = send(app, Method::GET, "/team-data", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
    assert!(std::fs::read_to_string(path).unwrap().contains("\n  "));
}

#[tokio::test]
async fn test_update_malformed_body_is_json_error() {
    let (_temp, path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), Some(&sample_team()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/update-team-data")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ \"teamVelocity\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let stored: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored, sample_team());
}

#[tokio::test]
async fn test_update_without_content_type_is_json_error() {
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), None);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/update-team-data")
        .body(Body::from(r#"{"teamVelocity": 10}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_write_failure_is_500() {
    let temp = TempDir::new().unwrap();
    let store = TeamDataStore::new(temp.path().join("missing-dir/team.json"));
    let app = build_router(AppState::new(
        store,
        Arc::new(StubRequestor(Err(RemoteError::MissingApiKey))),
    ));

    let (status, body) = send(app, Method::POST, "/update-team-data", Some(json!({}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Failed to save team data"));
}

#[tokio::test]
async fn test_generate_uses_remote_plan() {
    let remote = json!({ "sprints": [{ "sprintNumber": 1 }], "summary": { "totalSprints": 1 } });
    let (_temp, _path, app) = setup(StubRequestor(Ok(remote.clone())), Some(&sample_team()));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "deepseek");
    assert_eq!(body["data"], remote);
    assert!(body.get("note").is_none());
    assert!(body["generatedAt"].is_string());
}

#[tokio::test]
async fn test_generate_falls_back_on_remote_failure() {
    let (_temp, _path, app) = setup(
        StubRequestor(Err(RemoteError::InvalidCredentials)),
        Some(&sample_team()),
    );

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "mock");
    assert!(!body["note"].as_str().unwrap().is_empty());

    let data = &body["data"];
    assert_eq!(data["sprints"][0]["endDate"], "2025-01-20");
    assert_eq!(data["sprints"][0]["totalPoints"], 10);
    assert_eq!(data["sprints"][0]["stories"][0]["assignedTo"], "Ana");
    assert_eq!(data["summary"]["totalSprints"], 2);
    assert_eq!(data["summary"]["projectEndDate"], "2025-02-17");
    assert_eq!(data["epicSummary"][0]["totalPoints"], 5);
    assert_eq!(data["epicSummary"][1]["totalPoints"], 8);
}

#[tokio::test]
async fn test_generate_extracts_fenced_remote_json() {
    let (_temp, _path, app) = setup(
        RawTextRequestor("```json\n{\"summary\": {\"totalSprints\": 4}}\n```"),
        Some(&sample_team()),
    );

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "deepseek");
    assert_eq!(body["data"]["summary"]["totalSprints"], 4);
}

#[tokio::test]
async fn test_generate_malformed_remote_json_falls_back() {
    let (_temp, _path, app) = setup(
        RawTextRequestor("```json\n{\"summary\": {\"totalSprints\": \n```"),
        Some(&sample_team()),
    );

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert!(body["note"].as_str().unwrap().contains("could not be parsed"));
}

#[tokio::test]
async fn test_generate_scalar_remote_output_falls_back() {
    let (_temp, _path, app) = setup(RawTextRequestor("42"), Some(&sample_team()));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert!(body["data"]["sprints"].is_array());
}

#[tokio::test]
async fn test_generate_non_canonical_document_uses_remote_plan() {
    let mut team = sample_team();
    team["teamVelocity"] = json!(12.5);
    team["epics"][0]["priority"] = json!("High");
    team["stories"][0]["estimationPoints"] = json!(2.5);
    let remote = json!({ "sprints": [], "summary": { "totalSprints": 2 } });
    let (_temp, _path, app) = setup(StubRequestor(Ok(remote.clone())), Some(&team));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "deepseek");
    assert_eq!(body["data"], remote);
}

#[tokio::test]
async fn test_generate_fractional_points_fallback_is_400() {
    let mut team = sample_team();
    team["stories"][0]["estimationPoints"] = json!(2.5);
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), Some(&team));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_generate_wrong_shape_fallback_is_400() {
    let (_temp, _path, app) = setup(
        StubRequestor(Err(RemoteError::MissingApiKey)),
        Some(&json!({ "teamVelocity": "fast" })),
    );

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_generate_large_points_fallback() {
    let mut team = sample_team();
    team["teamVelocity"] = json!(1_000_000_000u64);
    team["stories"][0]["estimationPoints"] = json!(3_000_000_000u64);
    team["stories"][1]["estimationPoints"] = json!(3_000_000_000u64);
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), Some(&team));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "mock");
    assert_eq!(body["data"]["summary"]["totalStoryPoints"], 6_000_000_000u64);
    assert_eq!(body["data"]["summary"]["totalSprints"], 6);
}

#[tokio::test]
async fn test_generate_missing_data_is_500() {
    let (_temp, _path, app) = setup(StubRequestor(Ok(json!({}))), None);

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_generate_zero_velocity_fallback_is_400() {
    let mut team = sample_team();
    team["teamVelocity"] = json!(0);
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), Some(&team));

    let (status, body) = send(app, Method::POST, "/generate-sprint-plan", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (_temp, _path, app) = setup(StubRequestor(Err(RemoteError::MissingApiKey)), None);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
