//! JSON storage endpoints backing the object browser's "load more"

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use super::state::AppState;
use super::types::{ApiError, BucketsResponse, ObjectsParams};
use crate::domain::{validate_bucket_name, ListObjectsQuery, ObjectListing};

pub fn create_storage_router() -> Router<AppState> {
    Router::new()
        .route("/buckets", get(list_buckets))
        .route("/buckets/{bucket}/objects", get(list_objects))
}

pub async fn list_buckets(State(state): State<AppState>) -> Result<Json<BucketsResponse>, ApiError> {
    let buckets = state.storage.list_buckets().await?;
    Ok(Json(BucketsResponse::new(buckets)))
}

pub async fn list_objects(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    Query(params): Query<ObjectsParams>,
) -> Result<Json<ObjectListing>, ApiError> {
    validate_bucket_name(&bucket)?;

    let query = ListObjectsQuery::new(bucket)
        .with_prefix(&params.prefix)
        .with_continuation_token(params.token);

    Ok(Json(state.storage.list_objects(query).await?))
}
