//! Server-rendered page handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::Uri;
use axum::response::{Html, Redirect};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::PageError;
use super::views::{BucketView, BucketsView, IndexView};
use crate::api::state::AppState;
use crate::api::types::ObjectsParams;
use crate::domain::{validate_bucket_name, DomainError, ListObjectsQuery};
use crate::infrastructure::logging::redact_presigned_url;

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub key: String,
}

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let view = IndexView {
        site: &state.site,
        title: "Home",
        provider: state.storage.provider_name(),
    };

    render(&state, "index", &view)
}

pub async fn buckets(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let buckets = state
        .storage
        .list_buckets()
        .await
        .map_err(|e| PageError::from_domain(&state, e))?;

    render(&state, "buckets", &BucketsView::new(&state.site, buckets))
}

pub async fn bucket(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    params: Result<Query<ObjectsParams>, QueryRejection>,
) -> Result<Html<String>, PageError> {
    let Query(params) = query_params(&state, params)?;
    validate_bucket_name(&bucket).map_err(|e| PageError::from_domain(&state, e))?;

    let query = ListObjectsQuery::new(bucket)
        .with_prefix(&params.prefix)
        .with_continuation_token(params.token);

    let listing = state
        .storage
        .list_objects(query)
        .await
        .map_err(|e| PageError::from_domain(&state, e))?;

    render(&state, "bucket", &BucketView::new(&state.site, listing))
}

/// Sends the browser straight to S3 with a presigned URL
pub async fn download(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    params: Result<Query<DownloadParams>, QueryRejection>,
) -> Result<Redirect, PageError> {
    let Query(params) = query_params(&state, params)?;
    let url = state
        .storage
        .presign_download(&bucket, &params.key)
        .await
        .map_err(|e| PageError::from_domain(&state, e))?;

    debug!(
        bucket = %bucket,
        key = %params.key,
        url = %redact_presigned_url(&url),
        "Redirecting to presigned URL"
    );

    Ok(Redirect::temporary(&url))
}

pub async fn error_page(State(state): State<AppState>) -> PageError {
    PageError::generic(&state)
}

pub async fn not_found(State(state): State<AppState>, uri: Uri) -> PageError {
    PageError::from_domain(
        &state,
        DomainError::not_found(format!("Sorry, there's nothing at {}", uri.path())),
    )
}

/// Query-string failures get the rendered error page instead of axum's plain-text body
fn query_params<T>(
    state: &AppState,
    params: Result<Query<T>, QueryRejection>,
) -> Result<Query<T>, PageError> {
    params.map_err(|rejection| {
        PageError::from_domain(state, DomainError::validation(rejection.body_text()))
    })
}

fn render<T: Serialize>(state: &AppState, template: &str, view: &T) -> Result<Html<String>, PageError> {
    state
        .pages
        .render(template, view)
        .map(Html)
        .map_err(|e| PageError::from_domain(state, e))
}
