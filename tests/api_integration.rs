//! End-to-end API integration tests
//!
//! These tests verify the complete HTTP flows of the search endpoints:
//! - V1 unpaged search with optional filters
//! - V2 paginated search and its page envelope
//! - Boundary rejection of malformed parameters

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use roster_api::api::handlers::members;
use roster_api::domain::member::NewMember;
use roster_api::domain::repositories::{MemberRepository, TeamRepository};
use roster_api::domain::team::NewTeam;
use roster_api::infrastructure::database;
use roster_api::infrastructure::repositories::{SqliteMemberRepository, SqliteTeamRepository};
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for oneshot

/// Setup test application with routes
fn setup_app(pool: SqlitePool) -> Router {
    Router::new()
        .route("/health", get(members::health_check))
        .route("/v1/members", get(members::search_members_v1))
        .route("/v2/members", get(members::search_members_v2))
        .with_state(pool)
}

/// Setup a fresh in-memory database with the standard roster fixture
async fn setup_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    database::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let team_repo = SqliteTeamRepository::new(pool.clone());
    let member_repo = SqliteMemberRepository::new(pool.clone());

    let team_a = team_repo
        .save(NewTeam::new("TeamA"))
        .await
        .expect("Failed to save TeamA");
    let team_b = team_repo
        .save(NewTeam::new("TeamB"))
        .await
        .expect("Failed to save TeamB");

    for (username, age, team) in [
        ("Member1", 10, &team_a),
        ("Member2", 20, &team_a),
        ("Member3", 30, &team_b),
        ("Member4", 40, &team_b),
    ] {
        member_repo
            .save(NewMember::with_team(username, age, team.id))
            .await
            .expect("Failed to save member");
    }

    pool
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("Request failed");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_v1_search_without_filters_returns_full_roster() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) = get_json(app, "/v1/members").await;

    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().expect("Expected a JSON array");
    assert_eq!(members.len(), 4);
}

#[tokio::test]
async fn test_v1_search_applies_filters() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) =
        get_json(app, "/v1/members?teamName=TeamB&ageGoe=35&ageLoe=40").await;

    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().expect("Expected a JSON array");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["username"], "Member4");
    assert_eq!(members[0]["age"], 40);
    assert_eq!(members[0]["teamName"], "TeamB");
    assert!(members[0]["memberId"].is_i64());
}

#[tokio::test]
async fn test_v1_rejects_malformed_age_filter() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, _) = get_json(app, "/v1/members?ageGoe=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_v2_search_returns_page_envelope() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) =
        get_json(app, "/v2/members?page=0&size=3&sort=username,asc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["number"], 0);
    assert_eq!(body["size"], 3);
    assert_eq!(body["first"], true);
    assert_eq!(body["last"], false);

    let content = body["content"].as_array().expect("Expected content array");
    assert_eq!(content.len(), 3);
    assert_eq!(content[0]["username"], "Member1");
    assert_eq!(content[2]["username"], "Member3");
}

#[tokio::test]
async fn test_v2_last_page_is_partial() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) =
        get_json(app, "/v2/members?page=1&size=3&sort=username,asc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 4);
    assert_eq!(body["last"], true);

    let content = body["content"].as_array().expect("Expected content array");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["username"], "Member4");
}

#[tokio::test]
async fn test_v2_combines_filters_and_pagination() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) =
        get_json(app, "/v2/members?teamName=TeamA&page=0&size=1&sort=age,desc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalElements"], 2);
    assert_eq!(body["totalPages"], 2);

    let content = body["content"].as_array().expect("Expected content array");
    assert_eq!(content.len(), 1);
    assert_eq!(content[0]["username"], "Member2");
}

#[tokio::test]
async fn test_v2_defaults_page_parameters() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) = get_json(app, "/v2/members").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], 0);
    assert_eq!(body["size"], 20);
    assert_eq!(body["totalElements"], 4);

    let content = body["content"].as_array().expect("Expected content array");
    assert_eq!(content.len(), 4);
}

#[tokio::test]
async fn test_v2_rejects_unknown_sort_field() {
    let pool = setup_test_db().await;
    let app = setup_app(pool);

    let (status, body) = get_json(app, "/v2/members?sort=color,asc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .expect("Expected error message")
        .contains("unknown sort field"));
}
