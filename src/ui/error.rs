//! Rendered error pages

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, warn};

use super::render::FALLBACK_ERROR_HTML;
use super::views::ErrorView;
use crate::api::state::AppState;
use crate::api::types::status_for;
use crate::domain::DomainError;

const GENERIC_MESSAGE: &str = "An error occurred while processing your request.";

/// An HTML error response, already rendered with the site layout
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    html: String,
}

impl PageError {
    pub fn from_domain(state: &AppState, err: DomainError) -> Self {
        let status = status_for(&err);

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %err, "Page request failed");
        } else {
            warn!(status = status.as_u16(), error = %err, "Page request rejected");
        }

        // Client errors describe the caller's mistake; server errors stay generic
        let message = if status.is_client_error() {
            err.message().to_string()
        } else {
            GENERIC_MESSAGE.to_string()
        };
        let detail = state.detailed_errors().then(|| err.to_string());

        Self::render(state, status, message, detail)
    }

    /// The page served at `/error`
    pub fn generic(state: &AppState) -> Self {
        Self::render(
            state,
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_MESSAGE.to_string(),
            None,
        )
    }

    fn render(state: &AppState, status: StatusCode, message: String, detail: Option<String>) -> Self {
        let view = ErrorView {
            site: &state.site,
            title: "Error",
            status: status.as_u16(),
            message,
            detail,
        };

        let html = state.pages.render("error", &view).unwrap_or_else(|e| {
            error!(error = %e, "Failed to render error page");
            FALLBACK_ERROR_HTML.to_string()
        });

        Self { status, html }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(self.html)).into_response()
    }
}

/// Response for a panicking handler; the panic text is shown only when `detailed`
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, detailed: bool) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    error!(panic = %message, "Request handler panicked");

    let body = if detailed {
        format!(
            "<!DOCTYPE html><html><head><title>Error</title></head><body>\
             <h1>Error.</h1><h3>Unhandled panic</h3><pre>{}</pre></body></html>",
            handlebars::html_escape(&message)
        )
    } else {
        FALLBACK_ERROR_HTML.to_string()
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Environment;
    use crate::domain::MockObjectStorage;
    use crate::ui::render::PageRenderer;
    use crate::ui::views::SiteView;

    fn state(environment: Environment) -> AppState {
        AppState::new(
            Arc::new(MockObjectStorage::new()),
            PageRenderer::new().unwrap(),
            SiteView::new("Console", environment, None, None),
        )
    }

    #[test]
    fn test_server_error_hides_detail_in_production() {
        let state = state(Environment::Production);
        let err = PageError::from_domain(&state, DomainError::storage("secret endpoint details"));

        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert!(err.html.contains(GENERIC_MESSAGE));
        assert!(!err.html.contains("secret endpoint details"));
    }

    #[test]
    fn test_server_error_shows_detail_in_development() {
        let state = state(Environment::Development);
        let err = PageError::from_domain(&state, DomainError::storage("dispatch failure"));

        assert!(err.html.contains("Storage error: dispatch failure"));
    }

    #[test]
    fn test_client_error_shows_message() {
        let state = state(Environment::Production);
        let err =
            PageError::from_domain(&state, DomainError::not_found("Bucket 'gone' does not exist"));

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.html.contains("gone"));
        assert!(err.html.contains("does not exist"));
    }

    async fn body_text(response: Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_panic_response_detailed() {
        let response = panic_response(Box::new("boom <b>"), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(body.contains("boom &lt;b&gt;"));
        assert!(!body.contains("<b>"));
    }

    #[tokio::test]
    async fn test_panic_response_hides_message() {
        let response = panic_response(Box::new("boom".to_string()), false);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(!body.contains("boom"));
        assert!(body.contains(GENERIC_MESSAGE));

        let response = panic_response(Box::new(42_u8), true);
        assert!(body_text(response).await.contains("unknown panic payload"));
    }
}
