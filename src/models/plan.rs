//! Sprint plan output models
//!
//! A plan is never persisted. The remote planner is asked to answer in this
//! shape, and the fallback planner always produces it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Story scheduled into a sprint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SprintStory {
    pub story_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub epic_id: String,
    pub estimation_points: u64,
    pub assigned_to: String,
    pub justification: String,
}

/// One time-boxed sprint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
    pub sprint_number: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_points: u64,
    pub stories: Vec<SprintStory>,
}

/// Completion tracking for an epic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EpicSummary {
    pub epic_id: String,
    pub title: String,
    pub total_points: u64,
    pub completed_in_sprint: u32,
    pub completion_date: NaiveDate,
    pub status: String,
}

/// Aggregate figures for the whole plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    pub total_sprints: u64,
    pub total_story_points: u64,
    pub utilization_rate: String,
    pub project_end_date: NaiveDate,
}

/// Complete sprint plan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SprintPlan {
    pub sprints: Vec<Sprint>,
    pub epic_summary: Vec<EpicSummary>,
    pub summary: PlanSummary,
}
