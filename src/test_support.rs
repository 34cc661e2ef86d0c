use std::sync::Mutex;

use async_trait::async_trait;
use rust_mcp_sdk::schema::CallToolResult;

use crate::vapi_client::{CallError, CallPayload, CallProvider, CallResponse};

/// Provider double that records every payload and answers with a fixed outcome.
pub struct RecordingProvider {
    calls: Mutex<Vec<CallPayload>>,
    outcome: Result<CallResponse, (u16, String)>,
}

impl RecordingProvider {
    pub fn queued(id: &str) -> Self {
        Self::answering(CallResponse {
            id: id.to_string(),
            status: "queued".to_string(),
            message: None,
        })
    }

    pub fn with_message(id: &str, message: &str) -> Self {
        Self::answering(CallResponse {
            id: id.to_string(),
            status: "queued".to_string(),
            message: Some(message.to_string()),
        })
    }

    pub fn failing(status: u16, body: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Err((status, body.to_string())),
        }
    }

    fn answering(response: CallResponse) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            outcome: Ok(response),
        }
    }

    pub fn calls(&self) -> Vec<CallPayload> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl CallProvider for RecordingProvider {
    async fn create_call(&self, payload: &CallPayload) -> Result<CallResponse, CallError> {
        self.calls.lock().expect("calls lock").push(payload.clone());
        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err((status, body)) => Err(CallError::Upstream {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

pub fn result_text(result: &CallToolResult) -> String {
    let value = serde_json::to_value(result).expect("tool result serialization");
    value["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}
