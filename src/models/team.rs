//! Team data models
//!
//! The team-data document is the service's only persisted state and is
//! stored exactly as written. Plan requests send the raw document to the
//! remote planner; these typed views are only decoded for the local fallback
//! planner, so they accept any JSON number and any priority label.

use crate::error::{PlannerError, PlannerResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level unit of work grouping stories
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Epic {
    pub epic_id: String,

    #[serde(default)]
    pub title: String,

    /// Free-form label, usually `high`, `medium` or `low`
    #[serde(default)]
    pub priority: String,
}

/// Estimated unit of work belonging to an epic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub epic_id: String,
    pub estimation_points: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Story IDs that must be scheduled no later than this one
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Team member available for assignment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,
}

/// Sprint-planning state of a team
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    /// Story points completed per sprint
    pub team_velocity: f64,

    /// Sprint length in weeks
    pub sprint_length: f64,

    pub sprint_start_date: NaiveDate,

    #[serde(default)]
    pub epics: Vec<Epic>,

    #[serde(default)]
    pub team_members: Vec<Member>,

    #[serde(default)]
    pub stories: Vec<Story>,
}

impl TeamData {
    /// Decode a stored document. A document of the wrong shape is
    /// `InvalidInput`: it was stored fine but cannot be planned locally.
    pub fn from_document(document: &Value) -> PlannerResult<Self> {
        TeamData::deserialize(document)
            .map_err(|e| PlannerError::InvalidInput(format!("unexpected team data shape: {}", e)))
    }
}
