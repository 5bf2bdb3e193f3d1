// Sprint Planner - team data store with AI-generated sprint plans
// Plans come from the DeepSeek chat API, with a deterministic local fallback

pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod server;
pub mod store;

pub use anyhow::{Context, Result};

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{PlannerError, RemoteError};
pub use models::{SprintPlan, TeamData};
pub use planner::{generate_plan, PlanOutcome, PlanRequestor, PlanSource};
pub use store::TeamDataStore;
