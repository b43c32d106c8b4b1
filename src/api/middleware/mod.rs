//! API middleware components

pub mod logging;
pub mod metrics;
pub mod security;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use security::{https_redirect_middleware, security_headers_middleware, SecurityPolicy};
