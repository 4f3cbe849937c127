//! Web search via a SerpAPI-shaped endpoint, with constructed-link fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use scout_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::config::ToolsConfig;

const MAX_RESULTS: u32 = 10;
const DEFAULT_RESULTS: u32 = 5;
const FALLBACK_SCORE: f32 = 0.3;

/// One normalized search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub score: f32,
}

/// The `web_search` tool's structured output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchToolResult {
    pub query: String,
    pub results: Vec<SearchHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
    #[serde(default)]
    num_results: Option<u32>,
    #[serde(default)]
    timeframe: Option<String>,
}

pub struct WebSearchTool {
    client: Client,
    config: ToolsConfig,
}

impl WebSearchTool {
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

    async fn search(
        &self,
        query: &str,
        num_results: u32,
        timeframe: Option<&str>,
        api_key: &str,
    ) -> Result<Vec<SearchHit>, Error> {
        let mut request = self
            .client
            .get(&self.config.search_base_url)
            .query(&[("q", query), ("api_key", api_key)])
            .query(&[("num", num_results)]);

        if let Some(tbs) = timeframe.and_then(timeframe_param) {
            request = request.query(&[("tbs", tbs)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::api(
                response.status().as_u16(),
                "search API returned an error",
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::serialization(e.to_string()))?;

        Ok(parse_organic_results(&body, num_results as usize))
    }
}

/// Map a human timeframe onto the search API's time filter parameter.
fn timeframe_param(timeframe: &str) -> Option<&'static str> {
    match timeframe.to_lowercase().as_str() {
        "day" | "24h" => Some("qdr:d"),
        "week" => Some("qdr:w"),
        "month" => Some("qdr:m"),
        "year" => Some("qdr:y"),
        _ => None,
    }
}

/// Parse `organic_results` out of a search API payload.
pub fn parse_organic_results(body: &serde_json::Value, limit: usize) -> Vec<SearchHit> {
    let Some(organic) = body.get("organic_results").and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    organic
        .iter()
        .take(limit)
        .enumerate()
        .filter_map(|(idx, entry)| {
            let title = entry.get("title")?.as_str()?.to_string();
            let url = entry.get("link")?.as_str()?.to_string();
            let snippet = entry
                .get("snippet")
                .or_else(|| entry.get("description"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            Some(SearchHit {
                title,
                url,
                snippet,
                score: (0.9 - 0.05 * idx as f32).max(FALLBACK_SCORE),
            })
        })
        .collect()
}

/// Exactly three constructed search-portal links: the degraded payload used
/// when there is no API key or the live search failed.
pub fn fallback_results(query: &str) -> Vec<SearchHit> {
    let encoded = urlencoding::encode(query);
    vec![
        SearchHit {
            title: format!("Web search: {query}"),
            url: format!("https://www.google.com/search?q={encoded}"),
            snippet: "Constructed search link; live search results unavailable.".to_string(),
            score: FALLBACK_SCORE,
        },
        SearchHit {
            title: format!("Wikipedia search: {query}"),
            url: format!("https://en.wikipedia.org/w/index.php?search={encoded}"),
            snippet: "Encyclopedia entry point for this topic.".to_string(),
            score: FALLBACK_SCORE,
        },
        SearchHit {
            title: format!("Google Scholar: {query}"),
            url: format!("https://scholar.google.com/scholar?q={encoded}"),
            snippet: "Academic portal entry point for this topic.".to_string(),
            score: FALLBACK_SCORE,
        },
    ]
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for current information. Returns titles, URLs, snippets, and relevance scores."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("query", PropertySchema::string("The search query"), true)
                .add_property(
                    "num_results",
                    PropertySchema::integer("Number of results to return (max 10)")
                        .with_default(serde_json::json!(DEFAULT_RESULTS)),
                    false,
                )
                .add_property(
                    "timeframe",
                    PropertySchema::string("Restrict results by recency: day, week, month, or year"),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: WebSearchArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool("web_search", format!("Invalid arguments: {e}")))?;

        let num_results = args.num_results.unwrap_or(DEFAULT_RESULTS).min(MAX_RESULTS);

        let result = match &self.config.serpapi_key {
            None => {
                debug!(query = %args.query, "No search API key, returning fallback links");
                SearchToolResult {
                    query: args.query.clone(),
                    results: fallback_results(&args.query),
                    error: None,
                }
            }
            Some(key) => match self
                .search(&args.query, num_results, args.timeframe.as_deref(), key)
                .await
            {
                Ok(results) => SearchToolResult {
                    query: args.query.clone(),
                    results,
                    error: None,
                },
                Err(e) => {
                    warn!(query = %args.query, error = %e, "Web search failed, degrading to fallback links");
                    SearchToolResult {
                        query: args.query.clone(),
                        results: fallback_results(&args.query),
                        error: Some(e.to_string()),
                    }
                }
            },
        };

        Ok(ToolOutput::success(serde_json::to_string(&result)?))
    }
}
