//! API Middleware
//!
//! Token gate for account-scoped routes and request logging.

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::AuthenticatedAccount;
use crate::state::AppState;

/// Header carrying the bearer token
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Header set by the request-id layer
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =========================================================================
// Token authentication
// =========================================================================

/// Authorize the token in `x-jwt-token` for the account in the `:id` path
/// segment.
///
/// A missing header is treated as an empty token. Every rejection becomes
/// `403 {"Error": "permission denied"}`; on success the resolved account is
/// available to the handler as an [`AuthenticatedAccount`] extension.
pub async fn require_account_token(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    // An unreadable path id falls through to the id check and is rejected there.
    let raw_account_id = path.map(|Path(id)| id).unwrap_or_default();

    match state.authenticator.authenticate(&token, &raw_account_id).await {
        Ok(account) => {
            request.extensions_mut().insert(AuthenticatedAccount(account));
            next.run(request).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

// =========================================================================
// Request logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &[TOKEN_HEADER, "authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    let headers = mask_headers_for_logging(request.headers());

    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let start = std::time::Instant::now();

    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        request_id = ?request_id,
        headers = ?headers,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        request_id = ?request_id,
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_headers_for_logging() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-jwt-token", "eyJhbGciOiJIUzI1NiJ9.e30.sig".parse().unwrap());
        headers.insert("x-request-id", "req-123".parse().unwrap());

        let masked = mask_headers_for_logging(&headers);

        let token = masked.iter().find(|(k, _)| k == "x-jwt-token");
        let content_type = masked.iter().find(|(k, _)| k == "content-type");
        let request_id = masked.iter().find(|(k, _)| k == "x-request-id");

        assert_eq!(token.unwrap().1, "[REDACTED]");
        assert_eq!(content_type.unwrap().1, "application/json");
        assert_eq!(request_id.unwrap().1, "req-123");
    }

    #[test]
    fn test_sensitive_headers_list() {
        assert!(SENSITIVE_HEADERS.contains(&"x-jwt-token"));
        assert!(SENSITIVE_HEADERS.contains(&"authorization"));
        assert!(!SENSITIVE_HEADERS.contains(&"content-type"));
    }
}
