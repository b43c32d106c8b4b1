use std::any::Any;

use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    https_redirect_middleware, logging_middleware, metrics_middleware,
    security_headers_middleware, SecurityPolicy,
};
use super::state::AppState;
use super::storage;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};
use crate::ui;

/// Host-level settings that shape the router but are not request state
#[derive(Clone)]
pub struct RouterOptions {
    pub static_dir: String,
    pub security: SecurityPolicy,
    pub metrics: Option<PrometheusMetrics>,
    pub metrics_path: String,
}

/// Create the full router: pages, JSON API, probes, static assets
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let detailed_errors = state.detailed_errors();

    let router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // JSON storage API
        .nest("/api", storage::create_storage_router())
        // Rendered pages
        .merge(ui::create_ui_router())
        .nest_service("/static", ServeDir::new(&options.static_dir))
        .fallback(ui::pages::not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            options.security,
            security_headers_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            options.security,
            https_redirect_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| ui::panic_response(panic, detailed_errors),
        ));

    match options.metrics {
        Some(metrics) => router.merge(create_metrics_router(metrics, &options.metrics_path)),
        None => router,
    }
}
