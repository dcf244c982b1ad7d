use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::database::{self, entities};

/// GET / - service info
pub async fn root() -> Json<Value> {
    let routes: Vec<String> = entities().iter().map(|d| format!("/{}", d.name)).collect();

    Json(json!({
        "name": "AnyGym API",
        "version": env!("CARGO_PKG_VERSION"),
        "entities": routes,
    }))
}

/// GET /health - pings the pool
pub async fn health(State(pool): State<PgPool>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&pool).await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok", "timestamp": now }))),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "timestamp": now, "message": e.to_string() })),
            )
        }
    }
}
