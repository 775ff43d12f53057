/// Bearer token extraction and per-request deadlines
use crate::{config::RequestConfig, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::time::Duration;

/// Header carrying a caller-supplied deadline in milliseconds
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Extract bearer token from Authorization header.
///
/// The scheme must be exactly `Bearer ` followed by a non-empty token.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Deadline for a request: the caller's value capped at the configured
/// maximum, or the configured default when absent or unusable.
pub fn request_budget(headers: &HeaderMap, limits: &RequestConfig) -> Duration {
    let requested = headers
        .get(REQUEST_TIMEOUT_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0);

    let ms = match requested {
        Some(ms) => ms.min(limits.max_timeout_ms),
        None => limits.default_timeout_ms,
    };

    Duration::from_millis(ms)
}

/// Run the rest of the stack under the request's deadline.
///
/// On expiry the inner future is dropped, which cancels any in-flight query.
pub async fn enforce_deadline(
    State(limits): State<RequestConfig>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let budget = request_budget(req.headers(), &limits);
    let method = req.method().clone();
    let uri = req.uri().clone();

    match tokio::time::timeout(budget, next.run(req)).await {
        Ok(response) => Ok(response),
        Err(_) => {
            tracing::warn!(
                %method,
                %uri,
                budget_ms = budget.as_millis() as u64,
                "Request deadline exceeded"
            );
            Err(ApiError::DeadlineExceeded(budget))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{HeaderValue, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn limits() -> RequestConfig {
        RequestConfig {
            default_timeout_ms: 10_000,
            max_timeout_ms: 60_000,
        }
    }

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        let headers = headers_with("authorization", "Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_scheme_is_case_sensitive() {
        assert_eq!(extract_bearer_token(&headers_with("authorization", "bearer abc")), None);
        assert_eq!(extract_bearer_token(&headers_with("authorization", "BEARER abc")), None);
        assert_eq!(extract_bearer_token(&headers_with("authorization", "Basic abc")), None);
        assert_eq!(extract_bearer_token(&headers_with("authorization", "Bearer ")), None);
        assert_eq!(extract_bearer_token(&headers_with("authorization", "Bearerabc")), None);
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_request_budget() {
        let limits = limits();

        assert_eq!(
            request_budget(&HeaderMap::new(), &limits),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            request_budget(&headers_with(REQUEST_TIMEOUT_HEADER, "250"), &limits),
            Duration::from_millis(250)
        );
        assert_eq!(
            request_budget(&headers_with(REQUEST_TIMEOUT_HEADER, "999999"), &limits),
            Duration::from_millis(60_000)
        );
        assert_eq!(
            request_budget(&headers_with(REQUEST_TIMEOUT_HEADER, "0"), &limits),
            Duration::from_millis(10_000)
        );
        assert_eq!(
            request_budget(&headers_with(REQUEST_TIMEOUT_HEADER, "soon"), &limits),
            Duration::from_millis(10_000)
        );
    }

    fn slow_router(limits: RequestConfig) -> Router {
        Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(middleware::from_fn_with_state(limits, enforce_deadline))
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_504() {
        let app = slow_router(RequestConfig {
            default_timeout_ms: 50,
            max_timeout_ms: 100,
        });

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/slow")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_caller_deadline_is_capped() {
        // The caller asks for a minute but the cap is 100ms
        let app = slow_router(RequestConfig {
            default_timeout_ms: 50,
            max_timeout_ms: 100,
        });

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/slow")
                    .header(REQUEST_TIMEOUT_HEADER, "60000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_fast_request_passes_through() {
        let app = slow_router(limits());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/fast")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
