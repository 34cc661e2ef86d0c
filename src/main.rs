use std::sync::Arc;

use tracing::info;
use vapi_mcp_server::{
    build_app, config::Config, domain::dispatcher::CallDispatcher, logging, AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::load()?;
    let bind_socket = config.bind_socket()?;

    let dispatcher = Arc::new(CallDispatcher::from_config(&config));
    let state = AppState::new(dispatcher, config.mcp_api_key.clone());
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(bind_socket).await?;

    info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        assistant_id = %config.assistant_id,
        shared_secret = config.mcp_api_key.is_some(),
        sse_endpoint = %format!("http://localhost:{}/sse", config.port),
        health_endpoint = %format!("http://localhost:{}/health", config.port),
        "server starting"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
