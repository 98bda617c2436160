//! Error types for the MCP crate.

use crate::types::{error_codes, JsonRpcError};

/// Errors that can occur during MCP operations.
///
/// Display strings double as JSON-RPC error messages, so variants that
/// reach the wire carry exactly the text the protocol promises.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Transport I/O error.
    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// The requested method is not supported.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The requested tool was not found in the registry.
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Invalid parameters for a method; the message is the validator's
    /// description, passed through bare.
    #[error("{0}")]
    InvalidParams(String),

    /// A tool handler failed; the message is the handler error's text.
    #[error("{0}")]
    ToolExecution(String),
}

impl McpError {
    /// Convert to a JSON-RPC error object.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        let code = match self {
            McpError::JsonParse(_) => error_codes::PARSE_ERROR,
            McpError::MethodNotFound(_) | McpError::ToolNotFound(_) => {
                error_codes::METHOD_NOT_FOUND
            }
            McpError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            McpError::Transport(_) | McpError::ToolExecution(_) => error_codes::INTERNAL_ERROR,
        };
        JsonRpcError {
            code,
            message: self.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_tool_maps_to_method_not_found() {
        let err = McpError::ToolNotFound("missing".to_string());
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, error_codes::METHOD_NOT_FOUND);
        assert_eq!(rpc.message, "Unknown tool: missing");
    }

    #[test]
    fn test_invalid_params_message_passes_through() {
        let err = McpError::InvalidParams("missing required argument 'url'".to_string());
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, error_codes::INVALID_PARAMS);
        assert_eq!(rpc.message, "missing required argument 'url'");
    }

    #[test]
    fn test_parse_error_code() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let rpc = McpError::JsonParse(json_err).to_rpc_error();
        assert_eq!(rpc.code, error_codes::PARSE_ERROR);
        assert!(rpc.message.starts_with("JSON parse error"));
    }
}
