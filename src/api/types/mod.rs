//! Response types of the JSON storage API

pub mod error;
pub mod storage;

pub use error::{status_for, ApiError, ApiErrorResponse, ApiErrorType};
pub use storage::{BucketsResponse, ObjectsParams};
