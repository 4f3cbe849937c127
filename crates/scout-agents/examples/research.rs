//! Run one research query end to end against the live Anthropic API.
//!
//! Requires ANTHROPIC_API_KEY; SERPAPI_API_KEY is optional (web search
//! degrades to constructed links without it).
//!
//!     cargo run --example research -- "What is driving fusion energy investment?"

use anyhow::Context;
use scout_agents::default_orchestrator;
use scout_core::Complexity;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "What are the latest developments in battery recycling?".to_string());

    let orchestrator = default_orchestrator().context("building orchestrator from environment")?;
    let result = orchestrator.conduct_research(&query, Complexity::Medium).await;

    println!("# Summary\n{}\n", result.summary);
    println!("# Key points");
    for point in &result.key_points {
        println!("- {point}");
    }
    println!("\n# Citations");
    for citation in &result.citations {
        println!(
            "- {} ({}){}",
            citation.title,
            citation.confidence,
            citation
                .url
                .as_deref()
                .map(|u| format!(" <{u}>"))
                .unwrap_or_default()
        );
    }
    println!(
        "\nconfidence: {:.2}  tokens: {}  elapsed: {}ms",
        result.confidence, result.tokens_used, result.time_elapsed_ms
    );
    Ok(())
}
