//! Server-rendered UI: bucket list, object browser and error pages

pub mod error;
pub mod pages;
pub mod render;
pub mod views;

use axum::{routing::get, Router};

use crate::api::state::AppState;

pub use error::{panic_response, PageError};
pub use render::PageRenderer;
pub use views::SiteView;

pub fn create_ui_router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/buckets", get(pages::buckets))
        .route("/buckets/{bucket}", get(pages::bucket))
        .route("/buckets/{bucket}/download", get(pages::download))
        .route("/error", get(pages::error_page))
}
