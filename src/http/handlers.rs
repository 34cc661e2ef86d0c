//! Axum HTTP handlers for the web server
//!
//! Provides the MCP over SSE channel plus health and descriptor endpoints.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::tools::tool_names;
use crate::errors::AppError;
use crate::mcp::server::handle_json_rpc_bytes;
use crate::AppState;

pub const SSE_ENDPOINT: &str = "/sse";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub assistant_id: String,
    pub server: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub transport: &'static str,
    pub endpoint: &'static str,
    pub assistant_id: String,
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        assistant_id: state.dispatcher.assistant_id().to_string(),
        server: env!("CARGO_PKG_NAME"),
    })
}

pub async fn server_info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Vapi MCP Server",
        version: env!("CARGO_PKG_VERSION"),
        description: "MCP server for triggering Vapi outbound calls",
        transport: "SSE (Server-Sent Events)",
        endpoint: SSE_ENDPOINT,
        assistant_id: state.dispatcher.assistant_id().to_string(),
        tools: tool_names(),
    })
}

/// Opens an MCP session. The first event tells the client where to POST its
/// messages; every response for the session follows as a `message` event.
pub async fn sse_connect(State(state): State<AppState>) -> Response {
    let (session_id, receiver, guard) = state.sessions.open();
    info!(session_id = %session_id, "sse session opened");

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{SSE_ENDPOINT}?sessionId={session_id}"));
    let messages = ReceiverStream::new(receiver).map(move |message| {
        let _session = &guard;
        Ok::<Event, Infallible>(Event::default().event("message").data(message.to_string()))
    });
    let stream = tokio_stream::once(Ok::<Event, Infallible>(endpoint)).chain(messages);

    (
        [
            (header::CONNECTION, "keep-alive"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Cache-Control"),
        ],
        Sse::new(stream).keep_alive(KeepAlive::default()),
    )
        .into_response()
}

/// Accepts a client message for an open session and answers on its stream.
///
/// Processing runs detached from this request, so a provider call already in
/// flight finishes even if the stream goes away.
pub async fn sse_message(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: Bytes,
) -> Result<Response, AppError> {
    let session_id = query
        .session_id
        .as_deref()
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or(AppError::SessionNotFound)?;
    let sender = state
        .sessions
        .sender(&session_id)
        .ok_or(AppError::SessionNotFound)?;

    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        if let Some(response) = handle_json_rpc_bytes(&dispatcher, &body).await {
            if sender.send(response).await.is_err() {
                debug!(session_id = %session_id, "session closed before response was delivered");
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        "Accepted",
    )
        .into_response())
}
