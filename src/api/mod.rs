//! HTTP layer - probes, JSON storage API, middleware and router

pub mod health;
pub mod middleware;
pub mod router;
pub mod state;
pub mod storage;
pub mod types;

pub use router::{create_router, RouterOptions};
pub use state::AppState;
