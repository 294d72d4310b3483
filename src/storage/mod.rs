pub mod memory;
pub mod postgres;
pub mod seed;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::priority::{NewPriority, Priority};
use crate::models::project::{NewProject, Project};
use crate::models::status::{NewStatus, Status};
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::team_member::{NewTeamMember, TeamMember};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} named '{name}' already exists")]
    Duplicate { entity: &'static str, name: String },
    #[error("{entity} {id} is still referenced by one or more tasks")]
    Referenced { entity: &'static str, id: i32 },
    #[error("{0}")]
    InvalidReference(String),
    #[error("{entity} order cannot go past {max}; send an explicit order", max = i32::MAX)]
    OrderExhausted { entity: &'static str },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One past the highest existing `order`, or 1 for an empty table.
pub(crate) fn next_order(entity: &'static str, max: Option<i64>) -> StoreResult<i32> {
    i32::try_from(max.unwrap_or(0) + 1).map_err(|_| StoreError::OrderExhausted { entity })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub team_members: i64,
    pub projects: i64,
    pub statuses: i64,
    pub priorities: i64,
    pub tasks: i64,
}

impl StoreStats {
    pub fn log_stats(&self) {
        log::info!("📈 Store statistics:");
        log::info!("   👥 Team members: {}", self.team_members);
        log::info!("   📁 Projects: {}", self.projects);
        log::info!("   🚦 Statuses: {}", self.statuses);
        log::info!("   🔥 Priorities: {}", self.priorities);
        log::info!("   📋 Tasks: {}", self.tasks);
    }
}

/// Record store behind the HTTP layer. Every mutation touches exactly one row.
///
/// Lookup rows (team members, projects, statuses, priorities) are immutable
/// once created; only tasks can be updated. Deleting a lookup row that a task
/// still references fails with [`StoreError::Referenced`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn health_check(&self) -> StoreResult<()>;
    async fn stats(&self) -> StoreResult<StoreStats>;

    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>>;
    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>>;
    async fn create_team_member(&self, member: NewTeamMember) -> StoreResult<TeamMember>;
    async fn delete_team_member(&self, id: i32) -> StoreResult<()>;

    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>>;
    async fn create_project(&self, project: NewProject) -> StoreResult<Project>;
    async fn delete_project(&self, id: i32) -> StoreResult<()>;

    /// Ascending by `order`.
    async fn list_statuses(&self) -> StoreResult<Vec<Status>>;
    async fn get_status(&self, id: i32) -> StoreResult<Option<Status>>;
    async fn create_status(&self, status: NewStatus) -> StoreResult<Status>;
    async fn delete_status(&self, id: i32) -> StoreResult<()>;
    async fn next_status_order(&self) -> StoreResult<i32>;

    /// Ascending by `order`.
    async fn list_priorities(&self) -> StoreResult<Vec<Priority>>;
    async fn get_priority(&self, id: i32) -> StoreResult<Option<Priority>>;
    async fn create_priority(&self, priority: NewPriority) -> StoreResult<Priority>;
    async fn delete_priority(&self, id: i32) -> StoreResult<()>;
    async fn next_priority_order(&self) -> StoreResult<i32>;

    /// Newest first.
    async fn list_tasks(&self) -> StoreResult<Vec<Task>>;
    async fn get_task(&self, id: i32) -> StoreResult<Option<Task>>;
    async fn create_task(&self, task: NewTask) -> StoreResult<Task>;
    async fn update_task(&self, id: i32, changes: TaskChanges) -> StoreResult<Option<Task>>;
    async fn delete_task(&self, id: i32) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_order_follows_the_maximum() {
        assert_eq!(next_order("Status", None).unwrap(), 1);
        assert_eq!(next_order("Status", Some(-5)).unwrap(), -4);
        assert_eq!(next_order("Status", Some(41)).unwrap(), 42);
    }

    #[test]
    fn next_order_stops_at_i32_max() {
        let err = next_order("Priority", Some(i32::MAX as i64)).unwrap_err();
        assert!(matches!(err, StoreError::OrderExhausted { entity: "Priority" }));
    }
}
