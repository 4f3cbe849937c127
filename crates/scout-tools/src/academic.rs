//! Scholarly paper search via a Semantic-Scholar-shaped endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use scout_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

use crate::config::ToolsConfig;

const DEFAULT_RESULTS: u32 = 5;
const SEARCH_FIELDS: &str = "title,authors,year,citationCount,url,abstract,venue";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperHit {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub citation_count: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub r#abstract: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
}

/// The `academic_search` tool's structured output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcademicToolResult {
    pub query: String,
    pub papers: Vec<PaperHit>,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize)]
struct AcademicSearchArgs {
    query: String,
    #[serde(default)]
    num_results: Option<u32>,
}

// Wire shape of the scholarly search API.
#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiPaper>,
    #[serde(default)]
    total: u32,
}

#[derive(Deserialize)]
struct ApiPaper {
    #[serde(default)]
    title: String,
    #[serde(default)]
    authors: Vec<ApiAuthor>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(rename = "citationCount", default)]
    citation_count: u32,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "abstract", default)]
    abstract_text: Option<String>,
    #[serde(default)]
    venue: Option<String>,
}

#[derive(Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: String,
}

pub struct AcademicSearchTool {
    client: Client,
    config: ToolsConfig,
}

impl AcademicSearchTool {
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

    async fn search(&self, query: &str, limit: u32) -> Result<(Vec<PaperHit>, u32), Error> {
        let response = self
            .client
            .get(&self.config.academic_base_url)
            .query(&[("query", query), ("fields", SEARCH_FIELDS)])
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| Error::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::api(
                response.status().as_u16(),
                "academic search API returned an error",
            ));
        }

        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::serialization(e.to_string()))?;

        let papers = body.data.into_iter().map(convert_paper).collect();
        Ok((papers, body.total))
    }
}

fn convert_paper(paper: ApiPaper) -> PaperHit {
    PaperHit {
        title: paper.title,
        authors: paper.authors.into_iter().map(|a| a.name).collect(),
        year: paper.year,
        citation_count: paper.citation_count,
        url: paper.url,
        r#abstract: paper.abstract_text,
        venue: paper.venue,
    }
}

#[async_trait]
impl Tool for AcademicSearchTool {
    fn name(&self) -> &str {
        "academic_search"
    }

    fn description(&self) -> &str {
        "Search scholarly papers. Returns titles, authors, venues, citation counts, and abstracts."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("query", PropertySchema::string("The search query"), true)
                .add_property(
                    "num_results",
                    PropertySchema::integer("Number of papers to return")
                        .with_default(serde_json::json!(DEFAULT_RESULTS)),
                    false,
                ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: AcademicSearchArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool("academic_search", format!("Invalid arguments: {e}")))?;

        let limit = args.num_results.unwrap_or(DEFAULT_RESULTS);

        let result = match self.search(&args.query, limit).await {
            Ok((papers, total)) => AcademicToolResult {
                query: args.query,
                papers,
                total,
                fallback_url: None,
                error: None,
            },
            Err(e) => {
                warn!(query = %args.query, error = %e, "Academic search failed, pointing at the portal");
                let encoded = urlencoding::encode(&args.query).into_owned();
                AcademicToolResult {
                    query: args.query,
                    papers: Vec::new(),
                    total: 0,
                    fallback_url: Some(format!(
                        "https://www.semanticscholar.org/search?q={encoded}"
                    )),
                    error: Some(e.to_string()),
                }
            }
        };

        Ok(ToolOutput::success(serde_json::to_string(&result)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_parsing() {
        let body = serde_json::json!({
            "data": [{
                "title": "Attention Is All You Need",
                "authors": [{"name": "Ashish Vaswani"}, {"name": "Noam Shazeer"}],
                "year": 2017,
                "citationCount": 100000,
                "url": "https://www.semanticscholar.org/paper/abc",
                "abstract": "We propose the Transformer.",
                "venue": "NeurIPS"
            }],
            "total": 1
        });

        let parsed: ApiResponse = serde_json::from_value(body).unwrap();
        let paper = convert_paper(parsed.data.into_iter().next().unwrap());
        assert_eq!(paper.title, "Attention Is All You Need");
        assert_eq!(paper.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(paper.year, Some(2017));
        assert_eq!(paper.citation_count, 100000);
        assert_eq!(paper.venue.as_deref(), Some("NeurIPS"));
    }

    #[test]
    fn test_api_response_with_missing_fields() {
        let body = serde_json::json!({"data": [{"title": "Sparse entry"}], "total": 1});
        let parsed: ApiResponse = serde_json::from_value(body).unwrap();
        let paper = convert_paper(parsed.data.into_iter().next().unwrap());
        assert!(paper.authors.is_empty());
        assert!(paper.year.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_degrades_to_portal_link() {
        let config = ToolsConfig {
            academic_base_url: "http://127.0.0.1:9/graph/v1/paper/search".to_string(),
            ..ToolsConfig::default()
        };
        let tool = AcademicSearchTool::new(config);

        let output = tool
            .execute(serde_json::json!({"query": "transformer models"}))
            .await
            .unwrap();
        let result: AcademicToolResult = serde_json::from_str(&output.content).unwrap();
        assert!(result.papers.is_empty());
        assert!(result.error.is_some());
        assert!(result.fallback_url.unwrap().contains("semanticscholar.org"));
    }
}
