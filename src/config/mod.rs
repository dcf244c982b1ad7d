use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL; assembled from DATASTORE_* parts when DATABASE_URL is unset
    #[serde(skip_serializing)]
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub statement_timeout_ms: u64,
    /// Extra attempts after the first failed connect
    pub connect_retries: u32,
    pub initial_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        self.database.url = env::var("DATABASE_URL").ok().or_else(database_url_from_parts);
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_MIN_CONNECTIONS") {
            self.database.min_connections = v.parse().unwrap_or(self.database.min_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }
        if let Ok(v) = env::var("DATABASE_STATEMENT_TIMEOUT_MS") {
            self.database.statement_timeout_ms = v.parse().unwrap_or(self.database.statement_timeout_ms);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_RETRIES") {
            self.database.connect_retries = v.parse().unwrap_or(self.database.connect_retries);
        }
        if let Ok(v) = env::var("DATABASE_INITIAL_RETRY_DELAY_MS") {
            self.database.initial_retry_delay_ms = v.parse().unwrap_or(self.database.initial_retry_delay_ms);
        }
        if let Ok(v) = env::var("DATABASE_MAX_RETRY_DELAY_MS") {
            self.database.max_retry_delay_ms = v.parse().unwrap_or(self.database.max_retry_delay_ms);
        }

        // API overrides
        if let Ok(v) = env::var("API_HOST") {
            self.api.host = v;
        }
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_secs: 30,
                statement_timeout_ms: 30_000,
                connect_retries: 15,
                initial_retry_delay_ms: 500,
                max_retry_delay_ms: 5_000,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                request_timeout_secs: 60,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["*".to_string()],
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                min_connections: 2,
                acquire_timeout_secs: 10,
                statement_timeout_ms: 10_000,
                connect_retries: 10,
                initial_retry_delay_ms: 500,
                max_retry_delay_ms: 10_000,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                request_timeout_secs: 30,
                enable_request_logging: true,
                max_request_size_bytes: 256 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.anygym.app".to_string()],
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                min_connections: 5,
                acquire_timeout_secs: 5,
                statement_timeout_ms: 5_000,
                connect_retries: 10,
                initial_retry_delay_ms: 1_000,
                max_retry_delay_ms: 30_000,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                request_timeout_secs: 15,
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://anygym.app".to_string()],
            },
        }
    }
}

/// Build a postgres URL from the individual DATASTORE_* settings
fn database_url_from_parts() -> Option<String> {
    let host = env::var("DATASTORE_HOST").ok()?;
    let database = env::var("DATASTORE_DATABASE").ok()?;
    build_database_url(
        &host,
        env::var("DATASTORE_PORT").ok().and_then(|p| p.parse().ok()),
        env::var("DATASTORE_USER").ok().as_deref(),
        env::var("DATASTORE_PASSWORD").ok().as_deref(),
        &database,
    )
}

pub fn build_database_url(
    host: &str,
    port: Option<u16>,
    user: Option<&str>,
    password: Option<&str>,
    database: &str,
) -> Option<String> {
    let mut url = url::Url::parse("postgres://localhost").ok()?;
    url.set_host(Some(host)).ok()?;
    url.set_port(port).ok()?;
    if let Some(user) = user {
        url.set_username(user).ok()?;
    }
    url.set_password(password).ok()?;
    url.set_path(&format!("/{}", database));
    url.query_pairs_mut().append_pair("sslmode", "disable");
    Some(url.into())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
