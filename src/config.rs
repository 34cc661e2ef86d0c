use std::{env, net::SocketAddr};

use thiserror::Error;

pub const DEFAULT_ASSISTANT_ID: &str = "cde00b8a-3ebf-4d4f-8587-7e8fec8e5fda";
pub const DEFAULT_VAPI_BASE_URL: &str = "https://api.vapi.ai";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub vapi_api_key: String,
    pub assistant_id: String,
    pub vapi_base_url: String,
    pub bind_addr: String,
    pub port: u16,
    pub mcp_api_key: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("VAPI_API_KEY environment variable is required")]
    MissingVapiApiKey,
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    /// Loads `.env.local` when present, then reads the process environment.
    ///
    /// Variables already set in the environment take precedence over the file.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let vapi_api_key = non_empty_var("VAPI_API_KEY").ok_or(ConfigError::MissingVapiApiKey)?;

        let assistant_id =
            non_empty_var("ANDY").unwrap_or_else(|| DEFAULT_ASSISTANT_ID.to_string());
        let vapi_base_url = non_empty_var("VAPI_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_VAPI_BASE_URL.to_string());
        let bind_addr = non_empty_var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = non_empty_var("PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let mcp_api_key = non_empty_var("MCP_API_KEY");

        let config = Self {
            vapi_api_key,
            assistant_id,
            vapi_base_url,
            bind_addr,
            port,
            mcp_api_key,
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
