//! Infrastructure layer - AWS client, logging and observability

pub mod logging;
pub mod observability;
pub mod s3;

pub use s3::S3Service;
