use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{ArgType, ToolSchema};

/// Describes a tool's interface: name, description, and argument schema.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    /// Unique tool name (e.g., "fetch_page")
    pub name: String,
    /// Human-readable description for the client
    pub description: String,
    /// Declarative schema for the expected arguments
    pub schema: ToolSchema,
}

/// Result of executing a tool, delivered verbatim as a JSON-RPC result.
///
/// `is_error` marks a tool-domain failure (an unreachable URL, a failing
/// subprocess). It is still a *successful* protocol response; only handler
/// panics and protocol violations become JSON-RPC errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Content block within a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        data: String,
        mime_type: String,
    },
    Resource {
        resource: Value,
    },
}

impl ToolOutput {
    /// A successful single-text result.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// A tool-domain failure carried as a result with `isError: true`.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }
}

/// The primary extension point: all tools implement this trait.
///
/// Tools are object-safe, Send + Sync, and async; the server awaits each
/// call to completion before reading the next request.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON arguments.
    ///
    /// Arguments have already been validated against the definition's schema
    /// when called through the server.
    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
    #[error("Timeout after {0:?}")]
    Timeout(std::time::Duration),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Simple echo tool for testing purposes.
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "echo".to_string(),
            description: "Echoes back the input message. For testing.".to_string(),
            schema: ToolSchema::object().required(
                "message",
                ArgType::String,
                "The message to echo back",
            ),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let message = args
            .get("message")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing 'message' argument".to_string()))?;

        Ok(ToolOutput::text(format!("Received: {message}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_serialization() {
        let out = ToolOutput::text("hello");
        let json = serde_json::to_string(&out).unwrap();
        assert_eq!(json, r#"{"content":[{"type":"text","text":"hello"}]}"#);
    }

    #[test]
    fn test_error_output_keeps_flag() {
        let out = ToolOutput::error("boom");
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains(r#""isError":true"#));
        let roundtrip: ToolOutput = serde_json::from_str(&json).unwrap();
        assert!(roundtrip.is_error);
    }

    #[test]
    fn test_image_block_serialization() {
        let out = ToolOutput {
            content: vec![ContentBlock::Image {
                data: "aGk=".to_string(),
                mime_type: "image/png".to_string(),
            }],
            is_error: false,
        };
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.contains(r#""type":"image""#));
        assert!(json.contains(r#""mimeType":"image/png""#));
    }

    #[tokio::test]
    async fn test_echo_tool() {
        let tool = EchoTool;
        let def = tool.definition();
        assert_eq!(def.name, "echo");

        let result = tool
            .execute(serde_json::json!({"message": "hi"}))
            .await
            .unwrap();
        assert!(!result.is_error);
        match &result.content[0] {
            ContentBlock::Text { text } => assert_eq!(text, "Received: hi"),
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_echo_tool_missing_message() {
        let err = EchoTool.execute(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }
}
