//! Local fallback planner
//!
//! Deterministic stand-in used when the remote planner fails. It produces a
//! single sprint and per-epic totals so the caller always gets a plan shaped
//! like a real one.
//!
//! Velocity, sprint length and story points must be whole numbers here,
//! velocity strictly positive. `projectEndDate` is always start + 3 sprints,
//! independent of `totalSprints`.

use crate::error::{PlannerError, PlannerResult};
use crate::models::{EpicSummary, PlanSummary, Sprint, SprintPlan, SprintStory, TeamData};
use chrono::{Duration, NaiveDate};

/// Assignee used when the team has no members
pub const UNASSIGNED: &str = "Unassigned";

/// Justification attached to every fallback assignment
pub const FALLBACK_JUSTIFICATION: &str =
    "Placeholder assignment from the local fallback planner (AI planning unavailable)";

/// Utilization marker for fallback plans
pub const FALLBACK_UTILIZATION: &str = "Mock data";

const FALLBACK_STORY_COUNT: usize = 2;
const ASSUMED_PROJECT_SPRINTS: u64 = 3;

/// Largest integer an f64 holds exactly
const MAX_WHOLE: f64 = 9_007_199_254_740_991.0;

/// Build the fallback plan for `team`
pub fn fallback_plan(team: &TeamData) -> PlannerResult<SprintPlan> {
    let velocity = whole_number(team.team_velocity, "teamVelocity")?;
    if velocity == 0 {
        return Err(PlannerError::InvalidInput(
            "teamVelocity must be greater than zero".to_string(),
        ));
    }
    let sprint_length = whole_number(team.sprint_length, "sprintLength")?;

    let points = team
        .stories
        .iter()
        .map(|s| whole_number(s.estimation_points, &format!("estimationPoints of {}", s.story_id)))
        .collect::<PlannerResult<Vec<u64>>>()?;
    let total_points = checked_sum(points.iter().copied())?;

    let start = team.sprint_start_date;
    let end = add_weeks(start, sprint_length)?;

    let assignee = team
        .team_members
        .first()
        .map(|m| m.name.clone())
        .unwrap_or_else(|| UNASSIGNED.to_string());

    let stories = team
        .stories
        .iter()
        .zip(&points)
        .take(FALLBACK_STORY_COUNT)
        .map(|(story, &estimation_points)| SprintStory {
            story_id: story.story_id.clone(),
            title: story.title.clone(),
            epic_id: story.epic_id.clone(),
            estimation_points,
            assigned_to: assignee.clone(),
            justification: FALLBACK_JUSTIFICATION.to_string(),
        })
        .collect();

    let sprint = Sprint {
        sprint_number: 1,
        start_date: start,
        end_date: end,
        total_points: velocity.min(total_points),
        stories,
    };

    let epic_summary = team
        .epics
        .iter()
        .map(|epic| {
            let epic_points = team
                .stories
                .iter()
                .zip(&points)
                .filter(|(story, _)| story.epic_id == epic.epic_id)
                .map(|(_, &p)| p);
            Ok(EpicSummary {
                epic_id: epic.epic_id.clone(),
                title: epic.title.clone(),
                total_points: checked_sum(epic_points)?,
                completed_in_sprint: 1,
                completion_date: end,
                status: "planned".to_string(),
            })
        })
        .collect::<PlannerResult<Vec<_>>>()?;

    let project_weeks = sprint_length
        .checked_mul(ASSUMED_PROJECT_SPRINTS)
        .ok_or_else(|| PlannerError::InvalidInput("sprintLength is too large".to_string()))?;

    let summary = PlanSummary {
        total_sprints: total_points.div_ceil(velocity),
        total_story_points: total_points,
        utilization_rate: FALLBACK_UTILIZATION.to_string(),
        project_end_date: add_weeks(start, project_weeks)?,
    };

    Ok(SprintPlan {
        sprints: vec![sprint],
        epic_summary,
        summary,
    })
}

/// Convert a JSON number to a non-negative whole number
fn whole_number(value: f64, field: &str) -> PlannerResult<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= MAX_WHOLE {
        Ok(value as u64)
    } else {
        Err(PlannerError::InvalidInput(format!(
            "{} must be a non-negative whole number, got {}",
            field, value
        )))
    }
}

fn checked_sum(mut values: impl Iterator<Item = u64>) -> PlannerResult<u64> {
    values.try_fold(0u64, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| PlannerError::InvalidInput("total story points overflow".to_string()))
    })
}

fn add_weeks(date: NaiveDate, weeks: u64) -> PlannerResult<NaiveDate> {
    i64::try_from(weeks)
        .ok()
        .and_then(Duration::try_weeks)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| PlannerError::InvalidInput(format!("{} + {} weeks is out of range", date, weeks)))
}
