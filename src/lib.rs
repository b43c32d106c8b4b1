//! S3 Web Console
//!
//! A server-rendered web front-end over Amazon S3:
//! - One S3 client built at start-up from the AWS default credential chain
//! - Bucket list and folder-style object browser with presigned downloads
//! - Health probes, Prometheus metrics and optional OpenTelemetry export

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::S3Service;
use tracing::info;
use ui::{PageRenderer, SiteView};

/// Build the shared state: the S3 client is created here exactly once
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let s3 = S3Service::from_config(&config.storage).await;

    let site = SiteView::new(
        config.ui.title.clone(),
        config.environment,
        s3.region(),
        s3.endpoint_url().map(str::to_string),
    );
    let pages = PageRenderer::new()?;

    info!(
        environment = config.environment.as_str(),
        detailed_errors = config.environment.is_development(),
        "Application state created"
    );

    Ok(AppState::new(Arc::new(s3), pages, site))
}
