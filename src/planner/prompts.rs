//! Prompt templates for the remote sprint planner
//!
//! The user prompt carries the stored team document verbatim plus the
//! planning rules and the exact JSON shape the answer must take.

use serde_json::Value;

/// System message sent with every planning request
pub const SYSTEM_PROMPT: &str = "You are an expert agile project manager. \
You always respond with valid JSON only, without explanations or markdown.";

/// Answer shape shown to the model
const EXAMPLE_OUTPUT: &str = r#"{
  "sprints": [
    {
      "sprintNumber": 1,
      "startDate": "YYYY-MM-DD",
      "endDate": "YYYY-MM-DD",
      "totalPoints": 0,
      "stories": [
        {
          "storyId": "S1",
          "title": "Story title",
          "epicId": "E1",
          "estimationPoints": 0,
          "assignedTo": "Member name",
          "justification": "Why this story is in this sprint and assigned to this member"
        }
      ]
    }
  ],
  "epicSummary": [
    {
      "epicId": "E1",
      "title": "Epic title",
      "totalPoints": 0,
      "completedInSprint": 1,
      "completionDate": "YYYY-MM-DD",
      "status": "planned"
    }
  ],
  "summary": {
    "totalSprints": 0,
    "totalStoryPoints": 0,
    "utilizationRate": "0%",
    "projectEndDate": "YYYY-MM-DD"
  }
}"#;

/// Generate the sprint planning prompt for a stored team document
pub fn sprint_plan_prompt(document: &Value) -> String {
    format!(
        r#"## Team
- Velocity: {velocity} story points per sprint
- Sprint length: {length} week(s)
- First sprint starts: {start}

## Epics
{epics}

## Team Members
{members}

## Stories
{stories}

## Planning Rules
1. Schedule stories of high-priority epics first, then medium, then low.
2. Respect story dependencies: a story is never scheduled in an earlier sprint than any story it depends on.
3. Do not exceed the team velocity in any sprint.
4. Sprint 1 starts on {start}; each sprint lasts {length} week(s) and the next sprint starts when the previous one ends.
5. Assign each story to the team member whose role and skills fit it best, and justify the assignment.
6. Group stories by epic and report for each epic the sprint in which it completes.

## Output Format
Respond with a single JSON object in exactly this shape:
{example}
"#,
        velocity = scalar(&document["teamVelocity"]),
        length = scalar(&document["sprintLength"]),
        start = scalar(&document["sprintStartDate"]),
        epics = list(&document["epics"]),
        members = list(&document["teamMembers"]),
        stories = list(&document["stories"]),
        example = EXAMPLE_OUTPUT,
    )
}

/// Strings without quotes, anything else as JSON
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "unknown".to_string(),
        other => other.to_string(),
    }
}

/// Pretty JSON of a document section; a missing section renders as `[]`
fn list(value: &Value) -> String {
    match value {
        Value::Null => "[]".to_string(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}
