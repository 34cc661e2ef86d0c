//! Tools exposed via Model Context Protocol
//!
//! Declares `trigger_vapi_call` and routes `tools/call` requests to the
//! shared `CallDispatcher`.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::dispatcher::CallDispatcher;
use crate::mcp::rpc::{json_rpc_error, json_rpc_result};

pub const TRIGGER_VAPI_CALL: &str = "trigger_vapi_call";

#[macros::mcp_tool(
    name = "trigger_vapi_call",
    description = "Trigger an outbound phone call using Vapi AI assistant (Andy)"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct TriggerVapiCallTool {
    /// Phone number to call (include country code, e.g., +1234567890)
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![TriggerVapiCallTool::tool()]
}

pub fn tool_names() -> Vec<String> {
    build_tools_list()
        .into_iter()
        .map(|tool| tool.name)
        .collect()
}

pub async fn handle_tools_call(
    dispatcher: &CallDispatcher,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let result = dispatcher
        .invoke(&tool_call.name, tool_call.arguments.as_ref())
        .await;

    json_rpc_result(
        id,
        serde_json::to_value(result).expect("trigger_vapi_call tool result serialization"),
    )
}

#[cfg(test)]
mod tests {
    use super::{build_tools_list, tool_names, TRIGGER_VAPI_CALL};

    #[test]
    fn catalog_declares_single_call_tool() {
        let tools = build_tools_list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, TRIGGER_VAPI_CALL);
        assert_eq!(
            tools[0].description.as_deref(),
            Some("Trigger an outbound phone call using Vapi AI assistant (Andy)")
        );
    }

    #[test]
    fn input_schema_requires_phone_number_string() {
        let tool = serde_json::to_value(&build_tools_list()[0]).expect("tool serialization");

        assert_eq!(tool["inputSchema"]["type"], "object");
        assert_eq!(tool["inputSchema"]["required"][0], "phoneNumber");
        assert_eq!(
            tool["inputSchema"]["properties"]["phoneNumber"]["type"],
            "string"
        );
    }

    #[test]
    fn tool_names_match_catalog() {
        assert_eq!(tool_names(), vec![TRIGGER_VAPI_CALL.to_string()]);
    }
}
