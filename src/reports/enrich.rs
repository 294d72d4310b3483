use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::priority::Priority;
use crate::models::project::Project;
use crate::models::status::Status;
use crate::models::task::Task;
use crate::models::team_member::TeamMember;

/// Display name used when a foreign key has no matching lookup row.
pub const UNKNOWN: &str = "Unknown";

/// A task with its foreign keys resolved to display names. The original ids
/// are kept for filtering and identity comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTask {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub project: String,
    pub project_id: i32,
    pub status: String,
    pub status_id: i32,
    pub priority: String,
    pub priority_id: i32,
    pub assignee: String,
    pub assignee_id: i32,
    pub due_date: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn name_or_unknown(name: Option<&String>) -> String {
    name.cloned().unwrap_or_else(|| UNKNOWN.to_string())
}

pub fn enrich_tasks(
    tasks: &[Task],
    team_members: &[TeamMember],
    projects: &[Project],
    statuses: &[Status],
    priorities: &[Priority],
) -> Vec<EnrichedTask> {
    tasks
        .iter()
        .map(|task| {
            let assignee = team_members.iter().find(|m| m.id == task.assignee_id);
            let project = projects.iter().find(|p| p.id == task.project_id);
            let status = statuses.iter().find(|s| s.id == task.status_id);
            let priority = priorities.iter().find(|p| p.id == task.priority_id);

            EnrichedTask {
                id: task.id,
                title: task.title.clone(),
                description: task.description.clone(),
                project: name_or_unknown(project.map(|p| &p.name)),
                project_id: task.project_id,
                status: name_or_unknown(status.map(|s| &s.name)),
                status_id: task.status_id,
                priority: name_or_unknown(priority.map(|p| &p.name)),
                priority_id: task.priority_id,
                assignee: name_or_unknown(assignee.map(|m| &m.name)),
                assignee_id: task.assignee_id,
                due_date: task.due_date,
                completed_at: task.completed_at,
                created_at: task.created_at,
                updated_at: task.updated_at,
            }
        })
        .collect()
}
