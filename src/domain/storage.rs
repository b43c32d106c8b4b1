//! Object storage seam and the read-only views it returns

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::DomainError;

#[cfg(test)]
use mockall::automock;

/// Delimiter used to present keys as a folder hierarchy
pub const DELIMITER: char = '/';

/// A bucket visible to the configured credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub name: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A common prefix one level below the listed prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderEntry {
    pub prefix: String,
    pub name: String,
}

/// A single object in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub key: String,
    pub name: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

/// One page of a delimited object listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectListing {
    pub bucket: String,
    pub prefix: String,
    pub folders: Vec<FolderEntry>,
    pub objects: Vec<ObjectEntry>,
    pub next_token: Option<String>,
}

impl ObjectListing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.objects.is_empty()
    }
}

/// Parameters for listing one page of objects
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListObjectsQuery {
    pub bucket: String,
    pub prefix: String,
    pub continuation_token: Option<String>,
    pub max_keys: Option<i32>,
}

impl ListObjectsQuery {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = normalize_prefix(prefix.as_ref());
        self
    }

    pub fn with_continuation_token(mut self, token: Option<String>) -> Self {
        self.continuation_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_max_keys(mut self, max_keys: i32) -> Self {
        self.max_keys = Some(max_keys);
        self
    }
}

/// Read access to an object store, shared by every request handler
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Lists the buckets owned by the caller, sorted by name
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, DomainError>;

    /// Lists one page of folders and objects directly under a prefix
    async fn list_objects(&self, query: ListObjectsQuery) -> Result<ObjectListing, DomainError>;

    /// Produces a time-limited URL that downloads the object without credentials
    async fn presign_download(&self, bucket: &str, key: &str) -> Result<String, DomainError>;

    fn provider_name(&self) -> &'static str;
}

/// Guarantees a trailing slash on non-empty prefixes.
/// Leading slashes are kept: `/` is a valid first character of an S3 key.
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() || prefix.ends_with(DELIMITER) {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, DELIMITER)
    }
}

/// Parent of a normalized prefix: `a/b/` -> `a/`, `a/` -> ``
pub fn parent_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches(DELIMITER);

    match trimmed.rfind(DELIMITER) {
        Some(idx) => trimmed[..=idx].to_string(),
        None => String::new(),
    }
}

/// Last non-empty path segment of a key or prefix; `/` for an all-slash prefix
pub fn display_name(key: &str) -> &str {
    let trimmed = key.trim_end_matches(DELIMITER);

    if trimmed.is_empty() && !key.is_empty() {
        return &key[..1];
    }

    trimmed.rsplit(DELIMITER).next().unwrap_or(key)
}

/// Checks a bucket name against the S3 naming rules before it reaches the SDK
pub fn validate_bucket_name(name: &str) -> Result<(), DomainError> {
    if !(3..=63).contains(&name.len()) {
        return Err(DomainError::validation(format!(
            "Bucket name must be 3 to 63 characters long: '{}'",
            name
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');

    if !valid_chars {
        return Err(DomainError::validation(format!(
            "Bucket name may only contain lowercase letters, digits, '.' and '-': '{}'",
            name
        )));
    }

    let bytes = name.as_bytes();
    let edge_ok = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit();

    if !edge_ok(bytes[0]) || !edge_ok(bytes[bytes.len() - 1]) {
        return Err(DomainError::validation(format!(
            "Bucket name must begin and end with a letter or digit: '{}'",
            name
        )));
    }

    if name.contains("..") {
        return Err(DomainError::validation(format!(
            "Bucket name must not contain consecutive periods: '{}'",
            name
        )));
    }

    Ok(())
}
