//! Shared tool invocation used by every transport
//!
//! Turns a `tools/call` into at most one provider request and always answers
//! with a single text block, whatever the outcome.

use std::sync::Arc;

use rust_mcp_sdk::schema::{CallToolResult, ContentBlock, TextContent};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::domain::tools::TRIGGER_VAPI_CALL;
use crate::vapi_client::{CallError, CallPayload, CallProvider, CallResponse, VapiClient};

pub struct CallDispatcher {
    provider: Arc<dyn CallProvider>,
    assistant_id: String,
}

impl CallDispatcher {
    pub fn new(provider: Arc<dyn CallProvider>, assistant_id: impl Into<String>) -> Self {
        Self {
            provider,
            assistant_id: assistant_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let client = VapiClient::new(config.vapi_base_url.clone(), config.vapi_api_key.clone());
        Self::new(Arc::new(client), config.assistant_id.clone())
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> CallToolResult {
        let text = match self.trigger(tool_name, arguments).await {
            Ok(text) => text,
            Err(err @ CallError::UnknownTool(_)) => {
                warn!(tool = %tool_name, "unknown tool requested");
                err.to_string()
            }
            Err(err) => {
                warn!(tool = %tool_name, error = %err, "vapi call failed");
                format!("Error triggering Vapi call: {err}")
            }
        };

        CallToolResult {
            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
            is_error: None,
            meta: None,
            structured_content: None,
        }
    }

    async fn trigger(
        &self,
        tool_name: &str,
        arguments: Option<&Map<String, Value>>,
    ) -> Result<String, CallError> {
        if tool_name != TRIGGER_VAPI_CALL {
            return Err(CallError::UnknownTool(tool_name.to_string()));
        }

        let phone_number = phone_number_argument(arguments)?;
        let payload = CallPayload::new(self.assistant_id.as_str(), phone_number.as_str());
        let response = self.provider.create_call(&payload).await?;

        info!(call_id = %response.id, status = %response.status, "vapi call triggered");
        Ok(success_text(&response, &phone_number, &self.assistant_id))
    }
}

fn phone_number_argument(arguments: Option<&Map<String, Value>>) -> Result<String, CallError> {
    arguments
        .and_then(|arguments| arguments.get("phoneNumber"))
        .and_then(Value::as_str)
        .filter(|number| !number.trim().is_empty())
        .map(str::to_string)
        .ok_or(CallError::MissingPhoneNumber)
}

fn success_text(response: &CallResponse, phone_number: &str, assistant_id: &str) -> String {
    let mut text = format!(
        "Successfully triggered Vapi call!\n\nCall ID: {}\nStatus: {}\nPhone Number: {}\nAssistant ID: {}",
        response.id, response.status, phone_number, assistant_id
    );
    if let Some(message) = response.message.as_deref().filter(|m| !m.is_empty()) {
        text.push_str("\nMessage: ");
        text.push_str(message);
    }
    text
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{json, Map, Value};

    use super::CallDispatcher;
    use crate::test_support::{result_text, RecordingProvider};
    use crate::vapi_client::VapiClient;

    fn arguments(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object arguments")
    }

    #[tokio::test]
    async fn valid_number_issues_exactly_one_call() {
        let provider = Arc::new(RecordingProvider::queued("c1"));
        let dispatcher = CallDispatcher::new(provider.clone(), "assistant-1");

        let result = dispatcher
            .invoke(
                "trigger_vapi_call",
                Some(&arguments(json!({ "phoneNumber": "+15551234567" }))),
            )
            .await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].customer.number, "+15551234567");
        assert_eq!(calls[0].assistant_id, "assistant-1");

        let text = result_text(&result);
        assert!(text.starts_with("Successfully triggered Vapi call!"));
        assert!(text.contains("Call ID: c1"));
        assert!(text.contains("Status: queued"));
        assert!(text.contains("Phone Number: +15551234567"));
        assert!(text.contains("Assistant ID: assistant-1"));
        assert!(!text.contains("Message:"));
    }

    #[tokio::test]
    async fn provider_message_is_appended() {
        let provider = Arc::new(RecordingProvider::with_message("c9", "dialing"));
        let dispatcher = CallDispatcher::new(provider, "assistant-1");

        let result = dispatcher
            .invoke(
                "trigger_vapi_call",
                Some(&arguments(json!({ "phoneNumber": "+15551234567" }))),
            )
            .await;

        assert!(result_text(&result).ends_with("\nMessage: dialing"));
    }

    #[tokio::test]
    async fn missing_number_never_calls_provider() {
        let provider = Arc::new(RecordingProvider::queued("c1"));
        let dispatcher = CallDispatcher::new(provider.clone(), "assistant-1");

        let cases = [
            None,
            Some(arguments(json!({}))),
            Some(arguments(json!({ "phoneNumber": "" }))),
            Some(arguments(json!({ "phoneNumber": "  " }))),
            Some(arguments(json!({ "phoneNumber": 12345 }))),
        ];

        for args in cases {
            let result = dispatcher.invoke("trigger_vapi_call", args.as_ref()).await;
            assert_eq!(result.content.len(), 1);
            assert_eq!(
                result_text(&result),
                "Error triggering Vapi call: Phone number is required"
            );
        }

        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_tool_never_calls_provider() {
        let provider = Arc::new(RecordingProvider::queued("c1"));
        let dispatcher = CallDispatcher::new(provider.clone(), "assistant-1");

        let result = dispatcher
            .invoke(
                "hang_up",
                Some(&arguments(json!({ "phoneNumber": "+15551234567" }))),
            )
            .await;

        assert_eq!(result_text(&result), "Unknown tool: hang_up");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_is_enveloped() {
        let provider = Arc::new(RecordingProvider::failing(500, "server error"));
        let dispatcher = CallDispatcher::new(provider.clone(), "assistant-1");

        let result = dispatcher
            .invoke(
                "trigger_vapi_call",
                Some(&arguments(json!({ "phoneNumber": "+15551234567" }))),
            )
            .await;

        assert_eq!(provider.calls().len(), 1);
        assert_eq!(
            result_text(&result),
            "Error triggering Vapi call: Vapi API error: 500 - server error"
        );
    }

    #[tokio::test]
    async fn number_is_forwarded_as_given() {
        let provider = Arc::new(RecordingProvider::queued("c1"));
        let dispatcher = CallDispatcher::new(provider.clone(), "assistant-1");

        let result = dispatcher
            .invoke(
                "trigger_vapi_call",
                Some(&arguments(json!({ "phoneNumber": " +15551234567 " }))),
            )
            .await;

        assert_eq!(provider.calls()[0].customer.number, " +15551234567 ");
        assert!(result_text(&result).contains("Phone Number:  +15551234567 \n"));
    }

    #[tokio::test]
    async fn unreachable_provider_is_enveloped() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = VapiClient::new(format!("http://{addr}"), "test-key");
        let dispatcher = CallDispatcher::new(Arc::new(client), "assistant-1");

        let result = dispatcher
            .invoke(
                "trigger_vapi_call",
                Some(&arguments(json!({ "phoneNumber": "+15551234567" }))),
            )
            .await;

        let text = result_text(&result);
        assert_eq!(result.content.len(), 1);
        assert!(text.starts_with("Error triggering Vapi call: "));
        assert!(text.len() > "Error triggering Vapi call: ".len());
        assert!(!text.contains("Vapi API error"));
    }
}
