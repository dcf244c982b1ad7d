use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt, TryStreamExt};
use sqlx::{self, PgPool};
use tracing::debug;

use crate::database::descriptor::EntityDescriptor;
use crate::database::error::StoreError;
use crate::database::query_builder::{bind_param_query, bind_param_query_as, QueryBuilder};
use crate::database::record::Entity;
use crate::filter::{FilterClause, ListQuery, SqlResult};

/// Default per-statement deadline when none is configured
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed CRUD over one entity. Handlers only see this trait.
#[async_trait]
pub trait RecordStore<T: Entity>: Send + Sync {
    /// Matching records in sort order; a fresh query on every call
    async fn list(&self, query: &ListQuery) -> Result<Vec<T>, StoreError>;

    async fn count(&self, filter: &FilterClause) -> Result<i64, StoreError>;

    async fn get(&self, id: i64) -> Result<T, StoreError>;

    /// Returns the stored record with its generated id
    async fn create(&self, record: &T) -> Result<T, StoreError>;

    async fn update(&self, id: i64, record: &T) -> Result<T, StoreError>;

    /// Not idempotent: a missing id is `NotFound`
    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}

/// Postgres record store for `T`, sharing an injected pool
pub struct Repository<T> {
    pool: PgPool,
    statement_timeout: Duration,
    builder: QueryBuilder<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            builder: QueryBuilder::new(),
        }
    }

    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn descriptor(&self) -> &'static EntityDescriptor {
        self.builder.descriptor()
    }

    pub fn builder(&self) -> &QueryBuilder<T> {
        &self.builder
    }

    /// Lazily stream rows for a statement built by [`QueryBuilder::select`].
    /// Nothing runs until the stream is polled; no deadline is applied.
    pub fn stream<'a>(&'a self, statement: &'a SqlResult) -> BoxStream<'a, Result<T, StoreError>> {
        let entity = self.descriptor().label;
        let mut q = sqlx::query_as::<_, T>(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query_as(q, p);
        }
        q.fetch(&self.pool)
            .map_err(move |e| StoreError::classify(entity, e))
            .boxed()
    }

    fn classify(&self, err: sqlx::Error) -> StoreError {
        StoreError::classify(self.descriptor().label, err)
    }

    async fn within<F, R>(&self, fut: F) -> Result<R, StoreError>
    where
        F: Future<Output = Result<R, StoreError>>,
    {
        match tokio::time::timeout(self.statement_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.statement_timeout)),
        }
    }

    fn not_found(&self, id: i64) -> StoreError {
        StoreError::NotFound { entity: self.descriptor().label, id }
    }
}

#[async_trait]
impl<T: Entity> RecordStore<T> for Repository<T> {
    async fn list(&self, query: &ListQuery) -> Result<Vec<T>, StoreError> {
        let statement = self.builder.select(query);
        debug!(sql = %statement.query, params = statement.params.len(), "list");
        self.within(self.stream(&statement).try_collect::<Vec<T>>()).await
    }

    async fn count(&self, filter: &FilterClause) -> Result<i64, StoreError> {
        let statement = self.builder.count(filter);
        let mut q = sqlx::query_as::<_, (i64,)>(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let (count,) = self
            .within(async { q.fetch_one(&self.pool).await.map_err(|e| self.classify(e)) })
            .await?;
        Ok(count)
    }

    async fn get(&self, id: i64) -> Result<T, StoreError> {
        let statement = self.builder.select_by_id(id);
        let mut q = sqlx::query_as::<_, T>(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query_as(q, p);
        }
        self.within(async { q.fetch_optional(&self.pool).await.map_err(|e| self.classify(e)) })
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    async fn create(&self, record: &T) -> Result<T, StoreError> {
        let statement = self.builder.insert(record);
        let mut q = sqlx::query_as::<_, T>(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query_as(q, p);
        }
        let created = self
            .within(async { q.fetch_one(&self.pool).await.map_err(|e| self.classify(e)) })
            .await?;
        debug!(entity = self.descriptor().name, id = created.id(), "created");
        Ok(created)
    }

    async fn update(&self, id: i64, record: &T) -> Result<T, StoreError> {
        let statement = self.builder.update(id, record);
        let mut q = sqlx::query_as::<_, T>(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query_as(q, p);
        }
        self.within(async { q.fetch_optional(&self.pool).await.map_err(|e| self.classify(e)) })
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let statement = self.builder.delete(id);
        let mut q = sqlx::query(&statement.query);
        for p in statement.params.iter() {
            q = bind_param_query(q, p);
        }
        let result = self
            .within(async { q.execute(&self.pool).await.map_err(|e| self.classify(e)) })
            .await?;
        if result.rows_affected() == 0 {
            return Err(self.not_found(id));
        }
        debug!(entity = self.descriptor().name, id, "deleted");
        Ok(())
    }
}
