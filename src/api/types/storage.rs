use serde::{Deserialize, Serialize};

use crate::domain::BucketSummary;

#[derive(Debug, Serialize)]
pub struct BucketsResponse {
    pub object: &'static str,
    pub data: Vec<BucketSummary>,
}

impl BucketsResponse {
    pub fn new(data: Vec<BucketSummary>) -> Self {
        Self { object: "list", data }
    }
}

/// Query string shared by the object browser page and the JSON listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectsParams {
    #[serde(default)]
    pub prefix: String,
    pub token: Option<String>,
}
