use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

use crate::{errors::AppError, AppState};

#[derive(Debug, Deserialize)]
struct ApiKeyQuery {
    #[serde(rename = "apiKey")]
    api_key: Option<String>,
}

/// Gates opening the SSE stream behind the optional shared secret.
///
/// The `Authorization` header wins over the `apiKey` query parameter; a
/// `Bearer ` prefix on the header is stripped before comparing.
pub async fn require_shared_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.mcp_api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let authorized = presented_api_key(&request)
        .is_some_and(|presented| secrets_match(presented.as_bytes(), expected.as_bytes()));
    if !authorized {
        return Err(AppError::unauthorized("Invalid API key"));
    }

    Ok(next.run(request).await)
}

fn presented_api_key(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix("Bearer ").unwrap_or(value))
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        Query::<ApiKeyQuery>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(query)| query.api_key)
    })
}

/// Compares without short-circuiting on the first differing byte.
fn secrets_match(presented: &[u8], expected: &[u8]) -> bool {
    if presented.len() != expected.len() {
        return false;
    }
    presented
        .iter()
        .zip(expected)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::secrets_match;

    #[test]
    fn secrets_match_only_on_identical_bytes() {
        assert!(secrets_match(b"abc", b"abc"));
        assert!(secrets_match(b"", b""));
        assert!(!secrets_match(b"abd", b"abc"));
        assert!(!secrets_match(b"xbc", b"abc"));
        assert!(!secrets_match(b"ab", b"abc"));
        assert!(!secrets_match(b"abcd", b"abc"));
    }
}
