//! Query decomposition. Produces a [`ResearchPlan`] of independent
//! sub-tasks sized by the query's complexity tier.

use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use scout_core::{decode_lenient, Error, ResearchPlan, ResearchQuery};

use crate::client::ModelClient;
use crate::prompts::{planner_user_prompt, PLANNER_SYSTEM_PROMPT};

/// Wire shape of the planner's JSON response. Numeric fields come back as
/// whatever the model felt like (ints, floats), so they are captured as f64.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanWire {
    #[serde(default)]
    approach: String,
    #[serde(default)]
    sub_tasks: Vec<String>,
    #[serde(default)]
    estimated_complexity: f64,
    #[serde(default)]
    estimated_time: f64,
    #[serde(default)]
    tools_required: Vec<String>,
}

pub struct Planner {
    client: ModelClient,
}

impl Planner {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Plan the research for a query. Returns the plan plus tokens spent.
    ///
    /// Planning failures are absorbed into a generic two-task mock plan so
    /// one bad model turn does not kill the whole call. The exception is
    /// capacity errors (429/529/overloaded), which are re-raised so the
    /// orchestrator can produce a degraded result instead of burning the
    /// rest of the pipeline against a saturated API.
    pub async fn create_plan(&self, query: &ResearchQuery) -> Result<(ResearchPlan, u32), Error> {
        let user = planner_user_prompt(
            &query.query,
            &query.complexity.to_string(),
            self.client.config().max_sub_tasks,
        );
        let outcome = match self
            .client
            .chat(PLANNER_SYSTEM_PROMPT, &user, self.client.config().planner_max_tokens)
            .await
        {
            Ok(outcome) => outcome,
            Err(e) if e.is_capacity() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Planner call failed, substituting mock plan");
                return Ok((mock_plan(query), 0));
            }
        };

        let plan = match self.parse_plan(query, &outcome.content) {
            Ok(plan) => plan,
            Err(e) => {
                warn!(error = %e, "Planner response unusable, substituting mock plan");
                mock_plan(query)
            }
        };

        debug!(
            sub_tasks = plan.sub_tasks.len(),
            approach = %plan.approach,
            "Research plan created"
        );
        Ok((plan, outcome.tokens_used))
    }

    fn parse_plan(&self, query: &ResearchQuery, raw: &str) -> Result<ResearchPlan, Error> {
        let value = decode_lenient(raw)?;
        let wire: PlanWire = serde_json::from_value(value)?;
        if wire.sub_tasks.is_empty() {
            return Err(Error::invalid_request("plan contains no sub-tasks"));
        }
        Ok(ResearchPlan {
            id: Uuid::new_v4().to_string(),
            query_id: query.id.clone(),
            approach: wire.approach,
            sub_tasks: wire.sub_tasks,
            estimated_complexity: wire.estimated_complexity.max(0.0) as u32,
            estimated_time: wire.estimated_time.max(0.0) as u32,
            tools_required: wire.tools_required,
        })
    }
}

/// Generic fallback plan used when planning itself fails.
fn mock_plan(query: &ResearchQuery) -> ResearchPlan {
    ResearchPlan {
        id: Uuid::new_v4().to_string(),
        query_id: query.id.clone(),
        approach: format!("Direct investigation of: {}", query.query),
        sub_tasks: vec![
            format!(
                "Gather background information and key facts about: {}",
                query.query
            ),
            format!(
                "Identify recent developments, analyses, and credible sources about: {}",
                query.query
            ),
        ],
        estimated_complexity: 2,
        estimated_time: 60,
        tools_required: vec!["web_search".to_string(), "wikipedia_search".to_string()],
    }
}
