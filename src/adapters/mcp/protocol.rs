//! JSON-RPC 2.0 message handling shared by the MCP transports.
//!
//! The only tool is `human_interaction`, which reports progress to the
//! operator and blocks until they decide what happens next.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::models::parse_next_options;
use crate::services::{InteractionCoordinator, InteractionRequest};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const TOOL_NAME: &str = "human_interaction";

pub const PARSE_ERROR: i32 = -32700;
pub const INVALID_REQUEST: i32 = -32600;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;

/// JSON-RPC 2.0 request or notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Notifications carry no id and get no response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    pub fn params(&self) -> Value {
        self.params.clone().unwrap_or_else(|| json!({}))
    }
}

/// JSON-RPC 2.0 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            json!({"jsonrpc": "2.0", "id": null, "error": {"code": -32603, "message": "Internal error"}})
                .to_string()
        })
    }
}

/// Parse one line of input. Errors come back as ready-made responses.
pub fn parse_request(line: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| JsonRpcResponse::error(Value::Null, PARSE_ERROR, format!("Parse error: {e}")))?;
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| JsonRpcResponse::error(id, INVALID_REQUEST, format!("Invalid request: {e}")))
}

/// Dispatches MCP methods to the interaction coordinator.
#[derive(Clone)]
pub struct McpHandler {
    coordinator: Arc<InteractionCoordinator>,
}

impl McpHandler {
    pub fn new(coordinator: Arc<InteractionCoordinator>) -> Self {
        Self { coordinator }
    }

    /// Handle one request. Returns `None` for notifications.
    pub async fn handle(
        &self,
        request: JsonRpcRequest,
        cancel: &CancellationToken,
    ) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, id = ?request.id, "mcp request");

        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                warn!(method = %request.method, "request without id ignored");
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result()),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": [tool_definition()] })),
            "tools/call" => self.handle_tools_call(id, &request.params(), cancel).await,
            other => JsonRpcResponse::error(id, METHOD_NOT_FOUND, format!("Method not found: {other}")),
        };
        Some(response)
    }

    async fn handle_tools_call(
        &self,
        id: Value,
        params: &Value,
        cancel: &CancellationToken,
    ) -> JsonRpcResponse {
        let name = params.get("name").and_then(Value::as_str).unwrap_or("");
        if name != TOOL_NAME {
            return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Unknown tool: {name}"));
        }

        let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
        let result = match interaction_request(&args) {
            Ok(request) => {
                let reply = self.coordinator.interact(request, cancel).await;
                json!({
                    "content": [{ "type": "text", "text": reply.text }]
                })
            }
            Err(message) => json!({
                "content": [{ "type": "text", "text": message }],
                "isError": true
            }),
        };
        JsonRpcResponse::success(id, result)
    }
}

/// Build a request from tool arguments. Only `summary` is required.
pub fn interaction_request(args: &Value) -> Result<InteractionRequest, String> {
    let summary = args
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or("Missing required field: summary")?;
    let text = |key: &str| {
        args.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(InteractionRequest {
        summary: summary.to_string(),
        difficulties: text("difficulties"),
        next_options: parse_next_options(args.get("nextOptions").unwrap_or(&Value::Null)),
        task_id: text("taskId"),
        conversation_id: text("conversationId"),
    })
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "human-in-mcp",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

fn tool_definition() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": "Report what you just did to the human operator and wait for their next instruction. Call this after finishing every task. The reply either tells you the next task and its taskId, or tells you to stop.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "summary": { "type": "string", "description": "What you did since the last call" },
                "difficulties": { "type": "string", "description": "Problems you ran into, or \"none\"" },
                "nextOptions": {
                    "description": "Suggested next steps for the operator to pick from, as a JSON array of strings or a string holding one",
                    "oneOf": [
                        { "type": "array", "items": { "type": "string" } },
                        { "type": "string" }
                    ]
                },
                "taskId": { "type": "string", "description": "taskId from the previous reply, marking that task completed" },
                "conversationId": { "type": "string", "description": "Conversation this report belongs to" }
            },
            "required": ["summary"]
        }
    })
}
