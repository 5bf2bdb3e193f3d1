pub mod plan;
pub mod team;

pub use plan::{EpicSummary, PlanSummary, Sprint, SprintPlan, SprintStory};
pub use team::{Epic, Member, Story, TeamData};
