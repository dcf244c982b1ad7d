#![allow(dead_code)]

use std::collections::BTreeMap;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use tower::ServiceExt;

use anygym_api::database::{ConstraintKind, Entity, RecordStore, StoreError};
use anygym_api::filter::{FilterClause, ListQuery};

const SCHEMA: &str = include_str!("../fixtures/schema.sql");

// ---------------------------------------------------------------------------
// Spawned server
// ---------------------------------------------------------------------------

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_anygym-api"));
        cmd.env("API_HOST", "127.0.0.1")
            .env("API_PORT", port.to_string())
            .env("DATABASE_CONNECT_RETRIES", "2")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Killed and reaped on drop
impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Spawn a server for one test and wait for `/health`
pub async fn spawn_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// `DATABASE_URL`, or `None` (and a note on stderr) when DB tests should skip
pub fn database_url() -> Option<String> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Some(url),
        _ => {
            eprintln!("DATABASE_URL not set; skipping database test");
            None
        }
    }
}

/// Pool with the fixture schema applied. Parallel tests serialize the DDL
/// on a transaction-scoped advisory lock.
pub async fn test_pool(url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(url)
        .await
        .context("failed to connect to DATABASE_URL")?;

    let ddl = format!("BEGIN; SELECT pg_advisory_xact_lock(7262001); {} COMMIT;", SCHEMA);
    pool.execute(ddl.as_str()).await.context("failed to apply schema")?;
    Ok(pool)
}

/// Unique value so parallel tests never collide on UNIQUE columns
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, uuid::Uuid::new_v4().simple())
}

// ---------------------------------------------------------------------------
// In-process router
// ---------------------------------------------------------------------------

/// Drive one request through the router; the body is parsed as JSON when
/// non-empty
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> Result<(StatusCode, Option<Value>)> {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request.body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))?;

    let response = router.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&bytes)?)
    };
    Ok((status, json))
}

/// Failure a [`StubStore`] reports on every call
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Conflict,
    Timeout,
    Infrastructure,
}

impl Failure {
    fn to_error(self, entity: &'static str) -> StoreError {
        match self {
            Failure::Conflict => StoreError::ConstraintViolation {
                entity,
                kind: ConstraintKind::Unique,
                constraint: Some("name_key".into()),
            },
            Failure::Timeout => StoreError::Timeout(Duration::from_millis(10)),
            Failure::Infrastructure => StoreError::Infrastructure(sqlx::Error::PoolTimedOut),
        }
    }
}

/// In-memory record store keyed by id; ignores filters and sort
pub struct StubStore<T> {
    rows: Mutex<BTreeMap<i64, T>>,
    failure: Option<Failure>,
}

impl<T: Entity + Clone> StubStore<T> {
    pub fn new() -> Self {
        Self { rows: Mutex::new(BTreeMap::new()), failure: None }
    }

    pub fn failing(failure: Failure) -> Self {
        Self { rows: Mutex::new(BTreeMap::new()), failure: Some(failure) }
    }

    pub fn with(records: Vec<T>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.lock().unwrap();
            for r in records {
                rows.insert(r.id(), r);
            }
        }
        store
    }

    fn check(&self) -> Result<(), StoreError> {
        match self.failure {
            Some(f) => Err(f.to_error(T::descriptor().label)),
            None => Ok(()),
        }
    }

    fn not_found(id: i64) -> StoreError {
        StoreError::NotFound { entity: T::descriptor().label, id }
    }

    /// Copy of `record` with its primary key set
    fn with_id(record: &T, id: i64) -> T {
        let mut value = serde_json::to_value(record).unwrap();
        value[T::descriptor().primary_key] = Value::from(id);
        serde_json::from_value(value).unwrap()
    }
}

#[async_trait]
impl<T: Entity + Clone> RecordStore<T> for StubStore<T> {
    async fn list(&self, _query: &ListQuery) -> Result<Vec<T>, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn count(&self, _filter: &FilterClause) -> Result<i64, StoreError> {
        self.check()?;
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn get(&self, id: i64) -> Result<T, StoreError> {
        self.check()?;
        self.rows.lock().unwrap().get(&id).cloned().ok_or_else(|| Self::not_found(id))
    }

    async fn create(&self, record: &T) -> Result<T, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.keys().next_back().copied().unwrap_or(0) + 1;
        let created = Self::with_id(record, id);
        rows.insert(id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: i64, record: &T) -> Result<T, StoreError> {
        self.check()?;
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&id) {
            return Err(Self::not_found(id));
        }
        let updated = Self::with_id(record, id);
        rows.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.check()?;
        self.rows.lock().unwrap().remove(&id).map(|_| ()).ok_or_else(|| Self::not_found(id))
    }
}
