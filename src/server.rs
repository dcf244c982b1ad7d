use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use sqlx::PgPool;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{Device, Feature, Plan, Status, SupportSource};
use crate::database::{Entity, Repository};
use crate::handlers::{self, entity_routes};

/// Full application router over a shared pool
pub fn app(pool: PgPool, config: &AppConfig) -> Router {
    let statement_timeout = Duration::from_millis(config.database.statement_timeout_ms);

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .with_state(pool.clone())
        .merge(repository_routes::<Status>(&pool, statement_timeout))
        .merge(repository_routes::<Device>(&pool, statement_timeout))
        .merge(repository_routes::<Feature>(&pool, statement_timeout))
        .merge(repository_routes::<Plan>(&pool, statement_timeout))
        .merge(repository_routes::<SupportSource>(&pool, statement_timeout))
        .fallback(handlers::not_found)
        .layer(RequestBodyLimitLayer::new(config.api.max_request_size_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)))
        .layer(middleware::map_response(handlers::json_error_bodies));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn repository_routes<T: Entity>(pool: &PgPool, statement_timeout: Duration) -> Router {
    let repository = Repository::<T>::new(pool.clone()).with_statement_timeout(statement_timeout);
    entity_routes::<T>(Arc::new(repository))
}

/// "*" (or an empty list) allows any origin; otherwise only the listed ones
pub fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter(|o| !o.is_empty() && o.as_str() != "*")
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let allow_origin = if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Resolves on SIGINT or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
