//! URL fetching through a reader proxy that converts pages to cleaned text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use scout_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::config::ToolsConfig;

const DEFAULT_MAX_LENGTH: usize = 50_000;

/// The `fetch_url` tool's structured output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchToolResult {
    pub url: String,
    pub content: String,
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct FetchUrlArgs {
    url: String,
    #[serde(default)]
    max_length: Option<usize>,
}

pub struct FetchUrlTool {
    client: Client,
    config: ToolsConfig,
}

impl FetchUrlTool {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("scout/0.1.0")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn fetch(&self, url: &str) -> Result<String, Error> {
        let proxied = format!("{}/{}", self.config.reader_base_url.trim_end_matches('/'), url);
        let response = self
            .client
            .get(&proxied)
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::api(
                response.status().as_u16(),
                format!("reader proxy error for {url}"),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| Error::network(e.to_string()))
    }
}

/// Collapse runs of whitespace; keep at most two consecutive newlines.
pub fn clean_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_whitespace = false;
    let mut newline_count = 0;

    for ch in text.chars() {
        if ch == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push('\n');
            }
            prev_was_whitespace = true;
        } else if ch.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
            newline_count = 0;
        } else {
            result.push(ch);
            prev_was_whitespace = false;
            newline_count = 0;
        }
    }

    result.trim().to_string()
}

/// Truncate to `max_length` characters, appending a note when content was cut.
pub fn truncate_content(content: &str, max_length: usize) -> (String, bool) {
    let total = content.chars().count();
    if total <= max_length {
        return (content.to_string(), false);
    }

    let mut truncated: String = content.chars().take(max_length).collect();
    truncated.push_str(&format!(
        "\n\n... (truncated, {total} total characters)"
    ));
    (truncated, true)
}

#[async_trait]
impl Tool for FetchUrlTool {
    fn name(&self) -> &str {
        "fetch_url"
    }

    fn description(&self) -> &str {
        "Fetch a URL and return its content as cleaned plain text."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("url", PropertySchema::string("URL to fetch"), true)
                .add_property(
                    "max_length",
                    PropertySchema::integer("Maximum characters to return")
                        .with_default(serde_json::json!(DEFAULT_MAX_LENGTH)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: FetchUrlArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool("fetch_url", format!("Invalid arguments: {e}")))?;

        let max_length = args.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

        let result = match self.fetch(&args.url).await {
            Ok(raw) => {
                let (content, truncated) = truncate_content(&clean_text(&raw), max_length);
                FetchToolResult {
                    url: args.url,
                    content,
                    truncated,
                    error: None,
                }
            }
            Err(e) => {
                warn!(url = %args.url, error = %e, "Fetch failed, returning pointer fallback");
                FetchToolResult {
                    content: format!("Unable to fetch content. Source available at: {}", args.url),
                    url: args.url,
                    truncated: false,
                    error: Some(e.to_string()),
                }
            }
        };

        Ok(ToolOutput::success(serde_json::to_string(&result)?))
    }
}
