//! Web page fetch tool.
//!
//! Fetches a URL with browser-like headers, renders HTML to readable text,
//! and can forward the result to an external assistant subprocess. HTTP and
//! network failures are tool-domain outcomes: they come back as results
//! with `isError: true`, not as protocol errors.

use async_trait::async_trait;
use reqwest::header;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::assist::AssistantCommand;
use crate::html::{html_to_text, is_html_content_type};
use crate::schema::{ArgType, ToolSchema};
use crate::tool::{Tool, ToolDefinition, ToolError, ToolOutput};

/// Configuration for [`FetchPageTool`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout: Duration,
    /// Assistant to forward pages to when a `prompt` argument is given.
    pub assistant: Option<AssistantCommand>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout: Duration::from_secs(30),
            assistant: None,
        }
    }
}

/// Fetch a URL and return its content as readable text.
pub struct FetchPageTool {
    client: reqwest::Client,
    config: FetchConfig,
}

impl FetchPageTool {
    pub fn new(config: FetchConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Default for FetchPageTool {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

#[async_trait]
impl Tool for FetchPageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "fetch_page".to_string(),
            description: "Fetch a URL and return its content as readable text. \
                          HTML pages are converted to plain text; pass raw=true to \
                          skip conversion. An optional prompt forwards the page to \
                          a local assistant and returns its answer."
                .to_string(),
            schema: ToolSchema::object()
                .required("url", ArgType::String, "The URL to fetch")
                .optional(
                    "raw",
                    ArgType::Boolean,
                    "Return the response body without HTML-to-text conversion",
                )
                .optional(
                    "prompt",
                    ArgType::String,
                    "Question to ask the assistant about the fetched page",
                ),
        }
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput, ToolError> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidInput("missing 'url' argument".to_string()))?;
        let raw = args.get("raw").and_then(|v| v.as_bool()).unwrap_or(false);
        let prompt = args.get("prompt").and_then(|v| v.as_str());

        debug!(url = url, raw = raw, "fetching page");

        let response = match self
            .client
            .get(url)
            .timeout(self.config.timeout)
            .header(header::USER_AGENT, &self.config.user_agent)
            .header(header::ACCEPT, &self.config.accept)
            .header(header::ACCEPT_LANGUAGE, &self.config.accept_language)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = url, error = %e, "request failed");
                return Ok(ToolOutput::error(format!("Error: {e}")));
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Ok(ToolOutput::error(status_error_text(status)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(ToolOutput::error(format!("Error: {e}"))),
        };

        let text = render_body(&body, &content_type, raw);

        match prompt {
            None => Ok(ToolOutput::text(text)),
            Some(prompt) => {
                let Some(assistant) = &self.config.assistant else {
                    return Ok(ToolOutput::error(
                        "Error: no assistant command configured".to_string(),
                    ));
                };
                let full_prompt = format!("{prompt}\n\n---\n\n{text}");
                match assistant.run(&full_prompt).await {
                    Ok(answer) => Ok(ToolOutput::text(answer)),
                    Err(e) => Ok(ToolOutput::error(format!("Error: {e}"))),
                }
            }
        }
    }
}

/// Error text for a non-2xx response: `Error: HTTP <status> <statusText>`.
fn status_error_text(status: StatusCode) -> String {
    format!(
        "Error: HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )
}

/// Pick the text to return for a fetched body.
fn render_body(body: &str, content_type: &str, raw: bool) -> String {
    if !raw && is_html_content_type(content_type) {
        html_to_text(body)
    } else {
        body.to_string()
    }
}
