use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Errors while establishing the connection pool
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Failed to connect to database after {attempts} attempts")]
    ConnectFailed {
        attempts: u32,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Open the shared pool, retrying with exponential backoff while the
/// database is still coming up
pub async fn open_database(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
    let display_url = redact_url(url)?;

    let options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

    let max_retries = config.connect_retries;
    let mut delay_ms = config.initial_retry_delay_ms;
    let mut attempt = 0;

    loop {
        match options.clone().connect(url).await {
            Ok(pool) => {
                if attempt > 0 {
                    info!("Database connection established after {} retries", attempt);
                }
                info!("Connected to {}", display_url);
                return Ok(pool);
            }
            Err(e) if attempt < max_retries => {
                warn!(
                    "Database connection attempt {}/{} failed, retrying in {}ms: {}",
                    attempt + 1,
                    max_retries + 1,
                    delay_ms,
                    e
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms = next_delay(delay_ms, config.max_retry_delay_ms);
                attempt += 1;
            }
            Err(e) => {
                return Err(DatabaseError::ConnectFailed {
                    attempts: attempt + 1,
                    source: e,
                });
            }
        }
    }
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn next_delay(current_ms: u64, max_ms: u64) -> u64 {
    current_ms.saturating_mul(2).min(max_ms)
}

/// Connection URL with the password masked, for logs
fn redact_url(raw: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("****"))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}
