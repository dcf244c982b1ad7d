mod common;

use std::sync::Arc;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use anygym_api::database::models::{Plan, Status};
use anygym_api::handlers::entity_routes;
use anygym_api::AppConfig;
use sqlx::postgres::PgPoolOptions;
use common::{send, Failure, StubStore};

fn statuses(store: StubStore<Status>) -> axum::Router {
    entity_routes::<Status>(Arc::new(store))
}

fn seeded() -> axum::Router {
    statuses(StubStore::with(vec![
        Status { status_id: 1, status_name: "Active".into() },
        Status { status_id: 2, status_name: "Paused".into() },
    ]))
}

#[tokio::test]
async fn list_returns_bare_array() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses?sort=-status_id", None).await?;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(body.is_array(), "expected array: {}", body);
    assert_eq!(body.as_array().unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn unknown_filter_field_is_bad_request() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses?colour=red", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap(), json!({ "message": "Unknown field: colour" }));
    Ok(())
}

#[tokio::test]
async fn unknown_sort_field_is_bad_request() -> Result<()> {
    let (status, _) = send(&seeded(), Method::GET, "/statuses?sort=-colour", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn invalid_filter_value_is_bad_request() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses?status_id=abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["message"].as_str().unwrap().contains("status_id"));
    Ok(())
}

#[tokio::test]
async fn count_reports_matches() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses/count", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({ "count": 2 }));
    Ok(())
}

#[tokio::test]
async fn show_existing_and_missing() -> Result<()> {
    let router = seeded();

    let (status, body) = send(&router, Method::GET, "/statuses/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.unwrap(), json!({ "status_id": 1, "status_name": "Active" }));

    let (status, body) = send(&router, Method::GET, "/statuses/99", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.unwrap(), json!({ "message": "Not Found" }));
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_bad_request() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap(), json!({ "message": "Invalid status_id" }));

    let (status, _) = send(&seeded(), Method::DELETE, "/statuses/1.5", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn create_returns_created_record() -> Result<()> {
    let router = statuses(StubStore::new());
    let (status, body) = send(&router, Method::POST, "/statuses", Some(r#"{"status_name":"Active"}"#)).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.unwrap(), json!({ "status_id": 1, "status_name": "Active" }));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request() -> Result<()> {
    let router = statuses(StubStore::new());

    let (status, body) = send(&router, Method::POST, "/statuses", Some("{not json")).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.unwrap()["message"].is_string());

    let (status, _) = send(&router, Method::PUT, "/statuses/1", Some(r#"{"status_name":42}"#)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn update_missing_record_is_not_found() -> Result<()> {
    let (status, _) = send(&seeded(), Method::PUT, "/statuses/99", Some(r#"{"status_name":"Gone"}"#)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_returns_empty_ok_and_is_not_idempotent() -> Result<()> {
    let router = seeded();

    let (status, body) = send(&router, Method::DELETE, "/statuses/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_none());

    let (status, _) = send(&router, Method::DELETE, "/statuses/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn store_failures_map_to_statuses() -> Result<()> {
    let body = Some(r#"{"plan_name":"Gold","price":"19.99"}"#);

    let conflict = entity_routes::<Plan>(Arc::new(StubStore::failing(Failure::Conflict)));
    let (status, json) = send(&conflict, Method::POST, "/plans", body).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json.unwrap(), json!({ "message": "plan violates a unique constraint" }));

    let timeout = entity_routes::<Plan>(Arc::new(StubStore::failing(Failure::Timeout)));
    let (status, _) = send(&timeout, Method::GET, "/plans", None).await?;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);

    let broken = entity_routes::<Plan>(Arc::new(StubStore::failing(Failure::Infrastructure)));
    let (status, json) = send(&broken, Method::GET, "/plans/1", None).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json.unwrap()["message"].as_str().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn unregistered_entity_route_is_not_found() -> Result<()> {
    let (status, _) = send(&seeded(), Method::GET, "/members", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

/// Full router over a pool that never connects; only routing is exercised
fn full_app() -> Result<axum::Router> {
    let pool = PgPoolOptions::new().connect_lazy("postgres://localhost/anygym")?;
    Ok(anygym_api::app(pool, &AppConfig::from_env()))
}

#[tokio::test]
async fn unrouted_paths_get_message_bodies() -> Result<()> {
    let app = full_app()?;

    let (status, body) = send(&app, Method::GET, "/members", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Some(json!({ "message": "Unknown entity: members" })));

    let (status, body) = send(&app, Method::GET, "/statuses/1/extra", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Some(json!({ "message": "Not Found" })));

    let (status, body) = send(&app, Method::PATCH, "/statuses/1", Some("{}")).await?;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, Some(json!({ "message": "Method Not Allowed" })));
    Ok(())
}

#[tokio::test]
async fn nul_in_text_filter_is_bad_request() -> Result<()> {
    let (status, body) = send(&seeded(), Method::GET, "/statuses?status_name=a%00b", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.unwrap()["message"], "Invalid value for status_name: a\0b");

    let (status, _) = send(&seeded(), Method::GET, "/statuses?status_name=%FF", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
