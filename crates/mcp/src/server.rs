//! MCP server implementation.
//!
//! Wraps a `ToolRegistry` and exposes its tools over the MCP protocol.
//! The server owns a single read loop: each line is parsed, classified as
//! a request or notification, dispatched, and awaited to completion before
//! the next line is read, so responses always leave in arrival order.

use serde_json::Value;

use pagemark_toolkit::ToolRegistry;

use crate::error::McpError;
use crate::transport::Transport;
use crate::types::*;

/// MCP server that bridges a `ToolRegistry` to MCP clients.
pub struct McpServer {
    registry: ToolRegistry,
    server_name: String,
    server_version: String,
}

impl McpServer {
    /// Create a new MCP server wrapping the given tool registry.
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            server_name: "pagemark".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Set the server name reported during initialization.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Set the server version reported during initialization.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.server_version = version.into();
        self
    }

    /// Run the server loop, reading from and writing to the transport.
    ///
    /// Processes messages until the transport is closed. A bad message is
    /// answered (or ignored, for notifications) and the loop continues;
    /// only transport failure or closure ends it.
    pub async fn run<T: Transport>(&self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!(server = %self.server_name, "MCP server starting");

        loop {
            let line = match transport.receive().await? {
                Some(line) => line,
                None => {
                    tracing::info!("Transport closed, shutting down");
                    break;
                }
            };

            tracing::debug!(message = %line, "Received message");

            if let Some(response) = self.handle_line(&line).await {
                let json = serde_json::to_string(&response)?;
                tracing::debug!(response = %json, "Sending response");
                transport.send(&json).await?;
            }
        }

        Ok(())
    }

    /// Handle one raw input line. Returns the response to send, or `None`
    /// for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let raw: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON");
                // No id can be recovered from a malformed line.
                return Some(error_response(None, &McpError::JsonParse(e)));
            }
        };

        // No "id" (or a null one) means notification: never answered.
        if raw.get("id").map_or(true, Value::is_null) {
            if let Ok(notif) = serde_json::from_value::<JsonRpcNotification>(raw) {
                self.handle_notification(&notif);
            }
            return None;
        }

        let request: JsonRpcRequest = match serde_json::from_value(raw) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse JSON-RPC request");
                return Some(error_response(None, &McpError::JsonParse(e)));
            }
        };

        Some(self.handle_request(&request).await)
    }

    /// Handle a single JSON-RPC request and produce a response.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, &request.params).await,
            method => {
                tracing::warn!(method = %method, "Unknown method");
                error_response(Some(id), &McpError::MethodNotFound(method.to_string()))
            }
        }
    }

    fn handle_notification(&self, notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client confirmed initialization");
            }
            method => {
                tracing::debug!(method = %method, "Ignoring notification");
            }
        }
    }

    fn handle_initialize(&self, id: RpcId) -> JsonRpcResponse {
        tracing::info!("Handling initialize");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: Some(self.server_version.clone()),
            },
        };

        success_response(id, &result)
    }

    fn handle_list_tools(&self, id: RpcId) -> JsonRpcResponse {
        tracing::debug!("Handling tools/list");

        let tools: Vec<ToolInfo> = self
            .registry
            .definitions()
            .into_iter()
            .map(ToolInfo::from)
            .collect();

        success_response(id, &ListToolsResult { tools })
    }

    /// The tool invoker: resolve, validate, execute, normalize.
    ///
    /// This is the single boundary where handler failures become protocol
    /// data. A handler error maps to INTERNAL_ERROR; a `ToolOutput` with
    /// `is_error` set passes through untouched as a *result*.
    async fn handle_call_tool(&self, id: RpcId, params: &Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            let err = McpError::InvalidParams("missing params".to_string());
            return error_response(Some(id), &err);
        };

        let call: CallToolParams = match serde_json::from_value(params.clone()) {
            Ok(p) => p,
            Err(e) => {
                return error_response(Some(id), &McpError::InvalidParams(e.to_string()));
            }
        };

        tracing::debug!(tool = %call.name, "Handling tools/call");

        let Some(tool) = self.registry.get(&call.name) else {
            return error_response(Some(id), &McpError::ToolNotFound(call.name));
        };

        let args = call.arguments.unwrap_or_else(|| serde_json::json!({}));
        if let Err(e) = tool.definition().schema.validate(&args) {
            return error_response(Some(id), &McpError::InvalidParams(e.to_string()));
        }

        match tool.execute(args).await {
            Ok(output) => success_response(id, &output),
            Err(e) => error_response(Some(id), &McpError::ToolExecution(e.to_string())),
        }
    }
}

fn success_response<T: serde::Serialize>(id: RpcId, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => error_response(Some(id), &McpError::ToolExecution(e.to_string())),
    }
}

fn error_response(id: Option<RpcId>, err: &McpError) -> JsonRpcResponse {
    let rpc = err.to_rpc_error();
    JsonRpcResponse::error(id, rpc.code, rpc.message)
}
