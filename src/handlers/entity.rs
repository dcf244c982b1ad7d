use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::api::{ApiResponse, ApiResult};
use crate::database::{Entity, EntityDescriptor, RecordStore};
use crate::error::ApiError;
use crate::filter::ListQuery;

/// Store handle shared by every route of one entity
pub type Store<T> = Arc<dyn RecordStore<T>>;

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// CRUD routes for `T` under `/{name}`
pub fn entity_routes<T: Entity>(store: Store<T>) -> Router {
    let name = T::descriptor().name;
    Router::new()
        .route(&format!("/{}", name), get(list::<T>).post(create::<T>))
        .route(&format!("/{}/count", name), get(count::<T>))
        .route(
            &format!("/{}/:id", name),
            get(show::<T>).put(update::<T>).delete(remove::<T>),
        )
        .with_state(store)
}

fn parse_id(descriptor: &EntityDescriptor, raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {}", descriptor.primary_key)))
}

fn list_query(descriptor: &EntityDescriptor, raw: Option<String>) -> Result<ListQuery, ApiError> {
    Ok(ListQuery::parse(descriptor, raw.as_deref().unwrap_or(""))?)
}

/// GET /{entity}?field=value&sort=field,-field2
pub async fn list<T: Entity>(State(store): State<Store<T>>, RawQuery(raw): RawQuery) -> ApiResult<Vec<T>> {
    let query = list_query(T::descriptor(), raw)?;
    let records = store.list(&query).await?;
    Ok(ApiResponse::success(records))
}

/// GET /{entity}/count?field=value
pub async fn count<T: Entity>(State(store): State<Store<T>>, RawQuery(raw): RawQuery) -> ApiResult<CountResponse> {
    let query = list_query(T::descriptor(), raw)?;
    let count = store.count(&query.filter).await?;
    Ok(ApiResponse::success(CountResponse { count }))
}

/// GET /{entity}/:id
pub async fn show<T: Entity>(State(store): State<Store<T>>, Path(id): Path<String>) -> ApiResult<T> {
    let id = parse_id(T::descriptor(), &id)?;
    Ok(ApiResponse::success(store.get(id).await?))
}

/// POST /{entity}
pub async fn create<T: Entity>(
    State(store): State<Store<T>>,
    body: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let Json(record) = body?;
    let created = store.create(&record).await?;
    Ok(ApiResponse::created(created))
}

/// PUT /{entity}/:id
pub async fn update<T: Entity>(
    State(store): State<Store<T>>,
    Path(id): Path<String>,
    body: Result<Json<T>, JsonRejection>,
) -> ApiResult<T> {
    let id = parse_id(T::descriptor(), &id)?;
    let Json(record) = body?;
    Ok(ApiResponse::success(store.update(id, &record).await?))
}

/// DELETE /{entity}/:id - 200 with an empty body
pub async fn remove<T: Entity>(State(store): State<Store<T>>, Path(id): Path<String>) -> Result<StatusCode, ApiError> {
    let id = parse_id(T::descriptor(), &id)?;
    store.delete(id).await?;
    Ok(StatusCode::OK)
}
