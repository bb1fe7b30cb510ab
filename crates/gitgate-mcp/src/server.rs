//! MCP Server implementation
//!
//! Parses one protocol message at a time, routes it by method and produces
//! at most one serialized response. Holds no per-request state: every
//! message is handled independently.

use std::sync::Arc;

use gitgate_exec::{Invoker, ProcessInvoker};
use serde_json::{Value, json};

use crate::config::GatewayConfig;
use crate::handlers::{ToolContext, handle_tool_call};
use crate::protocol::{
    InitializeParams, InitializeResult, JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND,
    Method, PARSE_ERROR, PROTOCOL_VERSION, ServerCapabilities, ServerInfo, ToolCallParams,
    ToolsCapability,
};
use crate::tools::{ToolRegistry, ToolResult};
use crate::{Error, Result};

/// Name announced in `serverInfo`.
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Gateway exposing git operations as MCP tools.
///
/// # Example
///
/// ```ignore
/// use gitgate_mcp::{GatewayConfig, GatewayServer};
///
/// let server = GatewayServer::new(&GatewayConfig::default());
/// let reply = server
///     .handle_message(r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#)
///     .await?;
/// ```
pub struct GatewayServer {
    registry: ToolRegistry,
    invoker: Arc<dyn Invoker>,
    git_program: String,
}

impl GatewayServer {
    /// Create a server that runs real processes as described by `config`.
    pub fn new(config: &GatewayConfig) -> Self {
        let invoker = ProcessInvoker::new().with_timeout(config.timeout());
        Self::with_invoker(Arc::new(invoker), config.git.program.clone())
    }

    /// Create a server around any [`Invoker`].
    pub fn with_invoker(invoker: Arc<dyn Invoker>, git_program: impl Into<String>) -> Self {
        Self {
            registry: ToolRegistry::new(),
            invoker,
            git_program: git_program.into(),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn git_program(&self) -> &str {
        &self.git_program
    }

    /// Handle a single MCP message
    ///
    /// # Returns
    ///
    /// The serialized JSON-RPC response, or `None` when nothing may be sent
    /// back (notifications). Unparsable input always yields a parse error
    /// without an `id`.
    ///
    /// # Errors
    ///
    /// Only internal faults (a response that cannot be serialized) are
    /// returned as `Err`.
    pub async fn handle_message(&self, message: &str) -> Result<Option<String>> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => return Self::parse_error(format!("Parse error: {e}")),
        };
        let Some(request) = JsonRpcRequest::from_value(value) else {
            return Self::parse_error("Parse error: expected a JSON object".to_string());
        };

        let is_notification = request.is_notification();
        let id = request.id;

        let response = match Method::parse(&request.method) {
            Method::Initialize => self.handle_initialize(id, request.params)?,
            Method::Initialized => return Ok(None),
            Method::ToolsList => self.handle_tools_list(id),
            Method::ToolsCall => self.handle_tools_call(id, request.params).await?,
            Method::Unknown(method) => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {method}"),
            ),
        };

        if is_notification {
            tracing::debug!(method = %request.method, "Dropping response to notification");
            return Ok(None);
        }

        serde_json::to_string(&response).map(Some).map_err(Error::from)
    }

    fn parse_error(message: String) -> Result<Option<String>> {
        tracing::debug!(%message, "Unparsable message");
        let response = JsonRpcResponse::error(None, PARSE_ERROR, message);
        serde_json::to_string(&response).map(Some).map_err(Error::from)
    }

    /// Handle the initialize request
    ///
    /// Returns server capabilities and info.
    fn handle_initialize(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let params: InitializeParams = serde_json::from_value(params).unwrap_or_default();
        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = %client.version,
                protocol = ?params.protocol_version,
                "Client connected"
            );
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability {
                    list_changed: false,
                },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(id, serde_json::to_value(result)?))
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.registry.list() }))
    }

    /// Handle tools/call request
    ///
    /// Unknown tools (including a missing name) are a protocol error;
    /// everything that happens once a tool runs is reported as text in a
    /// successful result.
    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> Result<JsonRpcResponse> {
        let call = ToolCallParams::from_params(params);

        let Some(tool) = self.registry.resolve(&call.name) else {
            return Ok(JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Unknown tool: {}", call.name),
            ));
        };

        let ctx = ToolContext::new(self.invoker.as_ref(), &self.git_program);
        let summary = handle_tool_call(&ctx, tool, call.arguments).await;

        Ok(JsonRpcResponse::success(
            id,
            serde_json::to_value(ToolResult::text(summary))?,
        ))
    }
}
