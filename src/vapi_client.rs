use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of `POST /call`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallPayload {
    pub assistant_id: String,
    pub customer: Customer,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Customer {
    pub number: String,
}

impl CallPayload {
    pub fn new(assistant_id: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            assistant_id: assistant_id.into(),
            customer: Customer {
                number: phone_number.into(),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CallResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum CallError {
    #[error("Phone number is required")]
    MissingPhoneNumber,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Vapi API error: {status} - {body}")]
    Upstream { status: u16, body: String },
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait CallProvider: Send + Sync {
    async fn create_call(&self, payload: &CallPayload) -> Result<CallResponse, CallError>;
}

pub struct VapiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VapiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn call_url(&self) -> String {
        format!("{}/call", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CallProvider for VapiClient {
    async fn create_call(&self, payload: &CallPayload) -> Result<CallResponse, CallError> {
        let response = self
            .http
            .post(self.call_url())
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(CallError::Upstream { status, body });
        }

        Ok(response.json::<CallResponse>().await?)
    }
}
