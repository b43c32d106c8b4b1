//! Application state shared by every handler

use std::sync::Arc;

use crate::domain::ObjectStorage;
use crate::ui::render::PageRenderer;
use crate::ui::views::SiteView;

/// Cloned into each request; all fields point at values built once at start-up
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStorage>,
    pub pages: Arc<PageRenderer>,
    pub site: Arc<SiteView>,
}

impl AppState {
    pub fn new(storage: Arc<dyn ObjectStorage>, pages: PageRenderer, site: SiteView) -> Self {
        Self {
            storage,
            pages: Arc::new(pages),
            site: Arc::new(site),
        }
    }

    /// Error pages include diagnostic detail only in development
    pub fn detailed_errors(&self) -> bool {
        self.site.development
    }
}
