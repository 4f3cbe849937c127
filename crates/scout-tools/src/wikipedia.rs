//! Encyclopedia lookup via the OpenSearch API, with a constructed
//! direct-link fallback.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use scout_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::config::ToolsConfig;
use crate::search::{SearchHit, SearchToolResult};

const DEFAULT_LIMIT: u32 = 5;
const HIT_SCORE: f32 = 0.85;
const FALLBACK_SCORE: f32 = 0.4;

#[derive(Deserialize)]
struct WikipediaSearchArgs {
    query: String,
    #[serde(default)]
    limit: Option<u32>,
}

pub struct WikipediaSearchTool {
    client: Client,
    config: ToolsConfig,
}

impl WikipediaSearchTool {
    pub fn new(config: ToolsConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("scout/0.1.0 (research tool)")
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>, Error> {
        let response = self
            .client
            .get(&self.config.wikipedia_base_url)
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("format", "json"),
            ])
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::api(
                response.status().as_u16(),
                "opensearch API returned an error",
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::serialization(e.to_string()))?;

        parse_opensearch(&body)
    }
}

/// Parse an OpenSearch 4-tuple `[query, titles[], descriptions[], urls[]]`.
pub fn parse_opensearch(body: &serde_json::Value) -> Result<Vec<SearchHit>, Error> {
    let tuple: (String, Vec<String>, Vec<String>, Vec<String>) =
        serde_json::from_value(body.clone())
            .map_err(|_| Error::serialization("opensearch response is not a 4-tuple"))?;

    let (_query, titles, descriptions, urls) = tuple;

    Ok(titles
        .into_iter()
        .zip(urls)
        .enumerate()
        .map(|(idx, (title, url))| SearchHit {
            snippet: descriptions.get(idx).cloned().unwrap_or_default(),
            title,
            url,
            score: HIT_SCORE,
        })
        .collect())
}

/// Constructed article link used when the live lookup fails: the topic words
/// joined with underscores, the encyclopedia's canonical URL shape.
pub fn direct_link_fallback(query: &str) -> SearchHit {
    let path = query.trim().replace(' ', "_");
    SearchHit {
        title: query.trim().to_string(),
        url: format!("https://en.wikipedia.org/wiki/{}", urlencoding::encode(&path)),
        snippet: "Constructed encyclopedia link; live lookup unavailable.".to_string(),
        score: FALLBACK_SCORE,
    }
}

#[async_trait]
impl Tool for WikipediaSearchTool {
    fn name(&self) -> &str {
        "wikipedia_search"
    }

    fn description(&self) -> &str {
        "Search Wikipedia for encyclopedic background on a topic."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("query", PropertySchema::string("Topic to look up"), true)
                .add_property(
                    "limit",
                    PropertySchema::integer("Maximum number of articles")
                        .with_default(serde_json::json!(DEFAULT_LIMIT)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: WikipediaSearchArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool("wikipedia_search", format!("Invalid arguments: {e}")))?;

        let limit = args.limit.unwrap_or(DEFAULT_LIMIT);

        let result = match self.search(&args.query, limit).await {
            Ok(results) => SearchToolResult {
                query: args.query,
                results,
                error: None,
            },
            Err(e) => {
                warn!(query = %args.query, error = %e, "Wikipedia lookup failed, constructing direct link");
                SearchToolResult {
                    results: vec![direct_link_fallback(&args.query)],
                    query: args.query,
                    error: Some(e.to_string()),
                }
            }
        };

        Ok(ToolOutput::success(serde_json::to_string(&result)?))
    }
}
