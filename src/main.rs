use anyhow::Context;
use tracing::info;

use anygym_api::{config, database, logging, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL
    let _ = dotenvy::dotenv();
    logging::init();

    let config = config::config();
    info!("Starting AnyGym API in {:?} mode", config.environment);

    let pool = database::open_database(&config.database)
        .await
        .context("database unavailable")?;

    let app = server::app(pool.clone(), config);

    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("AnyGym API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Database pool closed");
    Ok(())
}
