//! Domain layer - storage views, the storage seam and errors

pub mod error;
pub mod storage;

pub use error::DomainError;
pub use storage::{
    display_name, normalize_prefix, parent_prefix, validate_bucket_name, BucketSummary,
    FolderEntry, ListObjectsQuery, ObjectEntry, ObjectListing, ObjectStorage,
};

#[cfg(test)]
pub use storage::MockObjectStorage;
