//! Sprint plan generation
//!
//! A plan is first requested from the remote model with the stored document
//! as is. Any remote failure is absorbed here: the document is decoded for
//! the local fallback planner, which produces the plan instead, and the
//! failure is reported as an informational note.

pub mod client;
pub mod extract;
pub mod fallback;
pub mod prompts;

pub use client::DeepSeekClient;
pub use extract::extract_json;
pub use fallback::fallback_plan;

use crate::error::{PlannerError, PlannerResult, RemoteError};
use crate::models::TeamData;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Source of sprint plans computed outside this process
#[async_trait]
pub trait PlanRequestor: Send + Sync {
    /// Request a plan for a stored team document. The returned JSON is not
    /// schema-checked.
    async fn request_plan(&self, document: &Value) -> Result<Value, RemoteError>;
}

/// Where a generated plan came from
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Deepseek,
    Mock,
}

/// A generated plan with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub plan: Value,
    pub source: PlanSource,
    /// Why the fallback was used, if it was
    pub note: Option<String>,
}

/// Generate a plan, falling back to the local planner on remote failure.
///
/// Only fails when the fallback itself rejects the team data.
pub async fn generate_plan(
    requestor: &dyn PlanRequestor,
    document: &Value,
) -> PlannerResult<PlanOutcome> {
    match requestor.request_plan(document).await {
        Ok(plan) => Ok(PlanOutcome {
            plan,
            source: PlanSource::Deepseek,
            note: None,
        }),
        Err(err) => {
            tracing::warn!(error = %err, "remote planning failed, using fallback plan");
            let team = TeamData::from_document(document)?;
            let plan = fallback_plan(&team)?;
            let plan = serde_json::to_value(&plan)
                .map_err(|e| PlannerError::Internal(e.to_string()))?;
            Ok(PlanOutcome {
                plan,
                source: PlanSource::Mock,
                note: Some(format!("Using fallback plan: {}", err)),
            })
        }
    }
}
