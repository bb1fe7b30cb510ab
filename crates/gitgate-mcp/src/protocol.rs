//! MCP Protocol message types
//!
//! JSON-RPC 2.0 message structures for MCP communication, plus the closed
//! set of methods the gateway routes on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol revision announced in the `initialize` handshake.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;

/// JSON-RPC 2.0 Request
///
/// Read leniently from any JSON object: `jsonrpc` is ignored, a missing (or
/// `null`) `id` marks a notification, and a `method` that is absent or not a
/// string is kept only so it can be reported as not found.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    pub id: Option<Value>,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    /// Build a request from a parsed message. Returns `None` for anything
    /// that is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut message) = value else {
            return None;
        };
        let id = message.remove("id").filter(|id| !id.is_null());
        let method = match message.remove("method") {
            Some(Value::String(method)) => method,
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        let params = message.remove("params").unwrap_or(Value::Null);
        Some(Self { id, method, params })
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// JSON-RPC 2.0 Response
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
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
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

/// Methods the gateway understands. Anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method<'a> {
    Initialize,
    /// The client's post-handshake notification, never answered.
    Initialized,
    ToolsList,
    ToolsCall,
    Unknown(&'a str),
}

impl<'a> Method<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "initialized" | "notifications/initialized" => Method::Initialized,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            other => Method::Unknown(other),
        }
    }
}

/// Initialize request params
///
/// Only used for logging who connected; every field is optional.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct InitializeParams {
    pub protocol_version: Option<String>,
    pub client_info: Option<ClientInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// Initialize response result
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Serialize)]
pub struct ServerCapabilities {
    pub tools: ToolsCapability,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    pub list_changed: bool,
}

#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Tool call params
///
/// A `name` that is missing or not a string is carried as its JSON text (or
/// empty) and then fails to resolve like any other unknown tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Value,
}

impl ToolCallParams {
    pub fn from_params(params: Value) -> Self {
        let Value::Object(mut params) = params else {
            return Self {
                name: String::new(),
                arguments: Value::Null,
            };
        };
        let name = match params.remove("name") {
            Some(Value::String(name)) => name,
            None | Some(Value::Null) => String::new(),
            Some(other) => other.to_string(),
        };
        let arguments = params.remove("arguments").unwrap_or(Value::Null);
        Self { name, arguments }
    }
}
