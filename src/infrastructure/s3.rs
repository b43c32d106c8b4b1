//! Shared Amazon S3 client and its `ObjectStorage` implementation

use std::time::{Duration, Instant};

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Output;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::domain::{
    display_name, validate_bucket_name, BucketSummary, DomainError, FolderEntry,
    ListObjectsQuery, ObjectEntry, ObjectListing, ObjectStorage,
};
use crate::infrastructure::observability::record_storage_request;

/// Owner of the process-wide S3 client.
///
/// Built once during start-up and shared behind an `Arc`. The client is never
/// replaced, so every caller observes the same handle; credential and network
/// problems surface on the first request, not here.
#[derive(Debug)]
pub struct S3Service {
    client: Client,
    config: StorageConfig,
}

impl S3Service {
    /// Resolve credentials and region through the AWS default provider chain
    pub async fn from_config(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.force_path_style)
            .build();

        let service = Self::with_client(Client::from_conf(s3_config), config.clone());

        info!(
            region = service.region().as_deref().unwrap_or("unresolved"),
            endpoint = config.endpoint_url.as_deref().unwrap_or("default"),
            force_path_style = config.force_path_style,
            "S3 client created"
        );

        service
    }

    pub fn with_client(client: Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    /// The shared client handle; identical on every call
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn region(&self) -> Option<String> {
        self.client.config().region().map(|r| r.to_string())
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.config.endpoint_url.as_deref()
    }
}

#[async_trait]
impl ObjectStorage for S3Service {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, DomainError> {
        let started = Instant::now();
        let result = self.client().list_buckets().send().await;
        record_storage_request("list_buckets", result.is_ok(), started.elapsed());

        let output = result.map_err(|e| map_sdk_error("ListBuckets", "buckets", e))?;

        let mut buckets: Vec<BucketSummary> = output
            .buckets()
            .iter()
            .filter_map(|bucket| {
                Some(BucketSummary {
                    name: bucket.name()?.to_string(),
                    created_at: bucket.creation_date().and_then(to_utc),
                })
            })
            .collect();
        buckets.sort_by(|a, b| a.name.cmp(&b.name));

        debug!(count = buckets.len(), "Listed buckets");
        Ok(buckets)
    }

    async fn list_objects(&self, query: ListObjectsQuery) -> Result<ObjectListing, DomainError> {
        validate_bucket_name(&query.bucket)?;

        let max_keys = query.max_keys.unwrap_or(self.config.page_size);
        let started = Instant::now();
        let result = self
            .client()
            .list_objects_v2()
            .bucket(&query.bucket)
            .prefix(&query.prefix)
            .delimiter("/")
            .max_keys(max_keys)
            .set_continuation_token(query.continuation_token.clone())
            .send()
            .await;
        record_storage_request("list_objects", result.is_ok(), started.elapsed());

        let output = result.map_err(|e| map_sdk_error("ListObjectsV2", &query.bucket, e))?;
        let listing = listing_from_output(&query, &output);

        debug!(
            bucket = %query.bucket,
            prefix = %query.prefix,
            folders = listing.folders.len(),
            objects = listing.objects.len(),
            truncated = listing.next_token.is_some(),
            "Listed objects"
        );
        Ok(listing)
    }

    async fn presign_download(&self, bucket: &str, key: &str) -> Result<String, DomainError> {
        validate_bucket_name(bucket)?;

        if key.is_empty() || key.ends_with('/') {
            return Err(DomainError::validation("Object key must name a file"));
        }

        let presigning =
            PresigningConfig::expires_in(Duration::from_secs(self.config.presign_expiry_secs))
                .map_err(|e| DomainError::configuration(format!("Invalid presign expiry: {}", e)))?;

        let started = Instant::now();
        let result = self
            .client()
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await;
        record_storage_request("presign_download", result.is_ok(), started.elapsed());

        let request = result.map_err(|e| map_sdk_error("GetObject", key, e))?;
        Ok(request.uri().to_string())
    }

    fn provider_name(&self) -> &'static str {
        "s3"
    }
}

fn listing_from_output(query: &ListObjectsQuery, output: &ListObjectsV2Output) -> ObjectListing {
    let folders = output
        .common_prefixes()
        .iter()
        .filter_map(|cp| cp.prefix())
        .map(|prefix| FolderEntry {
            prefix: prefix.to_string(),
            name: display_name(prefix).to_string(),
        })
        .collect();

    // Console-created "folders" are zero-byte objects named after the prefix itself
    let objects = output
        .contents()
        .iter()
        .filter_map(|object| {
            let key = object.key()?;
            if key == query.prefix || key.ends_with('/') {
                return None;
            }

            Some(ObjectEntry {
                key: key.to_string(),
                name: display_name(key).to_string(),
                size: object.size().unwrap_or_default().max(0) as u64,
                last_modified: object.last_modified().and_then(to_utc),
                etag: object.e_tag().map(|tag| tag.trim_matches('"').to_string()),
            })
        })
        .collect();

    let next_token = if output.is_truncated() == Some(false) {
        None
    } else {
        output.next_continuation_token().map(str::to_string)
    };

    ObjectListing {
        bucket: query.bucket.clone(),
        prefix: query.prefix.clone(),
        folders,
        objects,
        next_token,
    }
}

fn to_utc(value: &aws_smithy_types::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

fn map_sdk_error<E, R>(operation: &str, subject: &str, err: SdkError<E, R>) -> DomainError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("NoSuchBucket") => DomainError::not_found(format!("Bucket '{}' does not exist", subject)),
        Some("NoSuchKey") | Some("NotFound") => {
            DomainError::not_found(format!("Object '{}' does not exist", subject))
        }
        _ => DomainError::storage(format!("{} failed: {}", operation, DisplayErrorContext(&err))),
    }
}
