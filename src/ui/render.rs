//! Handlebars page renderer with templates compiled into the binary

use handlebars::Handlebars;
use serde::Serialize;

use crate::domain::DomainError;

const TEMPLATES: &[(&str, &str)] = &[
    ("index", include_str!("templates/index.hbs")),
    ("buckets", include_str!("templates/buckets.hbs")),
    ("bucket", include_str!("templates/bucket.hbs")),
    ("error", include_str!("templates/error.hbs")),
];

const LAYOUT: &str = include_str!("templates/layout.hbs");

/// Shown when the error template itself cannot be rendered
pub const FALLBACK_ERROR_HTML: &str = "<!DOCTYPE html><html><head><title>Error</title></head>\
<body><h1>Error.</h1><p>An error occurred while processing your request.</p></body></html>";

pub struct PageRenderer {
    engine: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, DomainError> {
        let mut engine = Handlebars::new();

        engine.register_partial("layout", LAYOUT).map_err(|e| {
            DomainError::configuration(format!("Failed to register layout: {}", e))
        })?;

        for (name, source) in TEMPLATES {
            engine.register_template_string(name, source).map_err(|e| {
                DomainError::configuration(format!("Failed to register template '{}': {}", name, e))
            })?;
        }

        Ok(Self { engine })
    }

    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<String, DomainError> {
        self.engine
            .render(template, data)
            .map_err(|e| DomainError::internal(format!("Failed to render '{}': {}", template, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn site() -> serde_json::Value {
        json!({
            "title": "Console",
            "environment": "development",
            "development": true,
            "region": "us-east-1",
            "endpoint": null
        })
    }

    #[test]
    fn test_all_templates_register() {
        assert!(PageRenderer::new().is_ok());
    }

    #[test]
    fn test_layout_wraps_page() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                "index",
                &json!({"site": site(), "title": "Home", "provider": "s3"}),
            )
            .unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Home - Console</title>"));
        assert!(html.contains("/static/site.css"));
        assert!(html.contains("us-east-1"));
    }

    #[test]
    fn test_values_are_html_escaped() {
        let renderer = PageRenderer::new().unwrap();
        let html = renderer
            .render(
                "error",
                &json!({
                    "site": site(),
                    "title": "Error",
                    "status": 400,
                    "message": "<script>alert(1)</script>",
                    "detail": null
                }),
            )
            .unwrap();

        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let renderer = PageRenderer::new().unwrap();
        let result = renderer.render("missing", &json!({}));
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }
}
