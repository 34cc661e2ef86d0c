use tracing::info;
use vapi_mcp_server::{config::Config, domain::dispatcher::CallDispatcher, logging, stdio};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = Config::load()?;
    let dispatcher = CallDispatcher::from_config(&config);

    info!(assistant_id = %config.assistant_id, "server running on stdio");

    stdio::serve(&dispatcher, tokio::io::stdin(), tokio::io::stdout()).await?;
    Ok(())
}
