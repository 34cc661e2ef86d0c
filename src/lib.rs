use std::sync::Arc;

use axum::{middleware, routing::get, Router};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod stdio;
pub mod vapi_client;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::dispatcher::CallDispatcher;
use crate::http::{handlers::SSE_ENDPOINT, sessions::SessionRegistry};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CallDispatcher>,
    pub mcp_api_key: Option<Arc<str>>,
    pub sessions: Arc<SessionRegistry>,
}

impl AppState {
    pub fn new(dispatcher: Arc<CallDispatcher>, mcp_api_key: Option<String>) -> Self {
        Self {
            dispatcher,
            mcp_api_key: mcp_api_key.map(Arc::<str>::from),
            sessions: Arc::new(SessionRegistry::default()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    // Only opening the stream is gated; the session id it hands out is the
    // credential for posting messages.
    let channel = get(http::handlers::sse_connect)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_shared_secret,
        ))
        .post(http::handlers::sse_message);

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/", get(http::handlers::server_info))
        .route(SSE_ENDPOINT, channel)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
