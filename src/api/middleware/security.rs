//! Transport and response-header hardening

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::AppConfig;

const PAGE_CSP: &str = "default-src 'self'; \
     script-src 'self'; \
     style-src 'self'; \
     img-src 'self' data:; \
     form-action 'self'; \
     frame-ancestors 'none'";

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Which protections apply in the current environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityPolicy {
    pub hsts: bool,
    pub https_redirect: bool,
}

impl SecurityPolicy {
    /// HSTS is withheld in development so local plain-HTTP hosts are not pinned
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            hsts: !config.environment.is_development(),
            https_redirect: config.server.https_redirect,
        }
    }
}

/// Middleware to add security headers to all responses
pub async fn security_headers_middleware(
    State(policy): State<SecurityPolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let is_html = content_type.starts_with("text/html");
    let is_json = content_type.starts_with("application/json");

    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(if is_html { PAGE_CSP } else { API_CSP }),
    );

    if policy.hsts {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=2592000"),
        );
    }

    // Rendered pages and listings reflect live bucket contents; static assets stay cacheable
    if (is_html || is_json) && !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    }

    response
}

/// Redirects requests that reached the proxy over plain HTTP
pub async fn https_redirect_middleware(
    State(policy): State<SecurityPolicy>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if policy.https_redirect {
        if let Some(location) = https_location(&request) {
            return Redirect::temporary(&location).into_response();
        }
    }

    next.run(request).await
}

fn https_location(request: &Request<Body>) -> Option<String> {
    let forwarded_proto = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())?;

    if !forwarded_proto.eq_ignore_ascii_case("http") {
        return None;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())?;
    // Drop the plain-HTTP port; a colon inside brackets belongs to an IPv6 literal
    let host = match host.rfind(':') {
        Some(idx) if !host[idx..].contains(']') => &host[..idx],
        _ => host,
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    Some(format!("https://{}{}", host, path_and_query))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::middleware;
    use axum::response::Html;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Environment;

    fn app(policy: SecurityPolicy) -> Router {
        Router::new()
            .route("/", get(|| async { Html("<p>page</p>") }))
            .route("/api", get(|| async { axum::Json(serde_json::json!({})) }))
            .route(
                "/site.css",
                get(|| async { ([(header::CONTENT_TYPE, "text/css")], "body {}") }),
            )
            .layer(middleware::from_fn_with_state(policy, security_headers_middleware))
            .layer(middleware::from_fn_with_state(policy, https_redirect_middleware))
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = AppConfig::default();
        let policy = SecurityPolicy::from_config(&config);
        assert!(policy.hsts);
        assert!(!policy.https_redirect);

        config.environment = Environment::Development;
        config.server.https_redirect = true;
        let policy = SecurityPolicy::from_config(&config);
        assert!(!policy.hsts);
        assert!(policy.https_redirect);
    }

    #[tokio::test]
    async fn test_page_headers_with_hsts() {
        let policy = SecurityPolicy {
            hsts: true,
            https_redirect: false,
        };

        let response = app(policy)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get(header::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(headers.get(header::CONTENT_SECURITY_POLICY).unwrap(), PAGE_CSP);
        assert!(headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_api_headers_without_hsts() {
        let policy = SecurityPolicy {
            hsts: false,
            https_redirect: false,
        };

        let response = app(policy)
            .oneshot(Request::builder().uri("/api").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers.get(header::CONTENT_SECURITY_POLICY).unwrap(), API_CSP);
        assert!(!headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_no_store_only_on_pages_and_json() {
        let policy = SecurityPolicy {
            hsts: false,
            https_redirect: false,
        };
        let router = app(policy);

        for uri in ["/", "/api"] {
            let response = router
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        }

        let response = router
            .oneshot(Request::builder().uri("/site.css").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(!response.headers().contains_key(header::CACHE_CONTROL));
    }

    #[tokio::test]
    async fn test_https_redirect_for_forwarded_http() {
        let policy = SecurityPolicy {
            hsts: true,
            https_redirect: true,
        };

        let response = app(policy)
            .oneshot(
                Request::builder()
                    .uri("/buckets?x=1")
                    .header(header::HOST, "console.example.com:80")
                    .header("x-forwarded-proto", "http")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://console.example.com/buckets?x=1"
        );
    }

    #[tokio::test]
    async fn test_no_redirect_when_already_https() {
        let policy = SecurityPolicy {
            hsts: true,
            https_redirect: true,
        };

        let response = app(policy)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::HOST, "console.example.com")
                    .header("x-forwarded-proto", "https")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
