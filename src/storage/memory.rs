use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{next_order, Store, StoreError, StoreResult, StoreStats};
use crate::models::priority::{NewPriority, Priority};
use crate::models::project::{NewProject, Project};
use crate::models::status::{NewStatus, Status};
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::team_member::{NewTeamMember, TeamMember};

#[derive(Default)]
struct Tables {
    team_members: Vec<TeamMember>,
    projects: Vec<Project>,
    statuses: Vec<Status>,
    priorities: Vec<Priority>,
    tasks: Vec<Task>,
    last_id: LastIds,
}

#[derive(Default)]
struct LastIds {
    team_member: i32,
    project: i32,
    status: i32,
    priority: i32,
    task: i32,
}

fn bump(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl Tables {
    fn check_references(
        &self,
        project_id: i32,
        status_id: i32,
        priority_id: i32,
        assignee_id: i32,
    ) -> StoreResult<()> {
        if !self.projects.iter().any(|p| p.id == project_id) {
            return Err(StoreError::InvalidReference(format!(
                "Project {} does not exist",
                project_id
            )));
        }
        if !self.statuses.iter().any(|s| s.id == status_id) {
            return Err(StoreError::InvalidReference(format!(
                "Status {} does not exist",
                status_id
            )));
        }
        if !self.priorities.iter().any(|p| p.id == priority_id) {
            return Err(StoreError::InvalidReference(format!(
                "Priority {} does not exist",
                priority_id
            )));
        }
        if !self.team_members.iter().any(|m| m.id == assignee_id) {
            return Err(StoreError::InvalidReference(format!(
                "Team member {} does not exist",
                assignee_id
            )));
        }
        Ok(())
    }

    fn referenced_by_task(&self, pred: impl Fn(&Task) -> bool) -> bool {
        self.tasks.iter().any(pred)
    }
}

/// Process-local store. One lock guards all five tables, so the uniqueness
/// and reference checks run atomically with the write that depends on them.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let t = self.tables.lock().await;
        Ok(StoreStats {
            team_members: t.team_members.len() as i64,
            projects: t.projects.len() as i64,
            statuses: t.statuses.len() as i64,
            priorities: t.priorities.len() as i64,
            tasks: t.tasks.len() as i64,
        })
    }

    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        Ok(self.tables.lock().await.team_members.clone())
    }

    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>> {
        let t = self.tables.lock().await;
        Ok(t.team_members.iter().find(|m| m.id == id).cloned())
    }

    async fn create_team_member(&self, member: NewTeamMember) -> StoreResult<TeamMember> {
        let mut t = self.tables.lock().await;
        let row = TeamMember {
            id: bump(&mut t.last_id.team_member),
            name: member.name,
            role: member.role,
            created_at: Utc::now(),
        };
        t.team_members.push(row.clone());
        Ok(row)
    }

    async fn delete_team_member(&self, id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if t.referenced_by_task(|task| task.assignee_id == id) {
            return Err(StoreError::Referenced {
                entity: "Team member",
                id,
            });
        }
        t.team_members.retain(|m| m.id != id);
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(self.tables.lock().await.projects.clone())
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>> {
        let t = self.tables.lock().await;
        Ok(t.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        let mut t = self.tables.lock().await;
        if t.projects.iter().any(|p| p.name == project.name) {
            return Err(StoreError::Duplicate {
                entity: "Project",
                name: project.name,
            });
        }
        let row = Project {
            id: bump(&mut t.last_id.project),
            name: project.name,
            created_at: Utc::now(),
        };
        t.projects.push(row.clone());
        Ok(row)
    }

    async fn delete_project(&self, id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if t.referenced_by_task(|task| task.project_id == id) {
            return Err(StoreError::Referenced {
                entity: "Project",
                id,
            });
        }
        t.projects.retain(|p| p.id != id);
        Ok(())
    }

    async fn list_statuses(&self) -> StoreResult<Vec<Status>> {
        let mut rows = self.tables.lock().await.statuses.clone();
        rows.sort_by_key(|s| (s.order, s.id));
        Ok(rows)
    }

    async fn get_status(&self, id: i32) -> StoreResult<Option<Status>> {
        let t = self.tables.lock().await;
        Ok(t.statuses.iter().find(|s| s.id == id).cloned())
    }

    async fn create_status(&self, status: NewStatus) -> StoreResult<Status> {
        let mut t = self.tables.lock().await;
        if t.statuses.iter().any(|s| s.name == status.name) {
            return Err(StoreError::Duplicate {
                entity: "Status",
                name: status.name,
            });
        }
        let row = Status {
            id: bump(&mut t.last_id.status),
            name: status.name,
            order: status.order,
            created_at: Utc::now(),
        };
        t.statuses.push(row.clone());
        Ok(row)
    }

    async fn delete_status(&self, id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if t.referenced_by_task(|task| task.status_id == id) {
            return Err(StoreError::Referenced { entity: "Status", id });
        }
        t.statuses.retain(|s| s.id != id);
        Ok(())
    }

    async fn next_status_order(&self) -> StoreResult<i32> {
        let t = self.tables.lock().await;
        next_order("Status", t.statuses.iter().map(|s| s.order as i64).max())
    }

    async fn list_priorities(&self) -> StoreResult<Vec<Priority>> {
        let mut rows = self.tables.lock().await.priorities.clone();
        rows.sort_by_key(|p| (p.order, p.id));
        Ok(rows)
    }

    async fn get_priority(&self, id: i32) -> StoreResult<Option<Priority>> {
        let t = self.tables.lock().await;
        Ok(t.priorities.iter().find(|p| p.id == id).cloned())
    }

    async fn create_priority(&self, priority: NewPriority) -> StoreResult<Priority> {
        let mut t = self.tables.lock().await;
        if t.priorities.iter().any(|p| p.name == priority.name) {
            return Err(StoreError::Duplicate {
                entity: "Priority",
                name: priority.name,
            });
        }
        let row = Priority {
            id: bump(&mut t.last_id.priority),
            name: priority.name,
            order: priority.order,
            created_at: Utc::now(),
        };
        t.priorities.push(row.clone());
        Ok(row)
    }

    async fn delete_priority(&self, id: i32) -> StoreResult<()> {
        let mut t = self.tables.lock().await;
        if t.referenced_by_task(|task| task.priority_id == id) {
            return Err(StoreError::Referenced {
                entity: "Priority",
                id,
            });
        }
        t.priorities.retain(|p| p.id != id);
        Ok(())
    }

    async fn next_priority_order(&self) -> StoreResult<i32> {
        let t = self.tables.lock().await;
        next_order("Priority", t.priorities.iter().map(|p| p.order as i64).max())
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let mut rows = self.tables.lock().await.tasks.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn get_task(&self, id: i32) -> StoreResult<Option<Task>> {
        let t = self.tables.lock().await;
        Ok(t.tasks.iter().find(|task| task.id == id).cloned())
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let mut t = self.tables.lock().await;
        t.check_references(
            task.project_id,
            task.status_id,
            task.priority_id,
            task.assignee_id,
        )?;
        let now = Utc::now();
        let row = Task {
            id: bump(&mut t.last_id.task),
            title: task.title,
            description: task.description,
            project_id: task.project_id,
            status_id: task.status_id,
            priority_id: task.priority_id,
            assignee_id: task.assignee_id,
            due_date: task.due_date,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        t.tasks.push(row.clone());
        Ok(row)
    }

    async fn update_task(&self, id: i32, changes: TaskChanges) -> StoreResult<Option<Task>> {
        let mut t = self.tables.lock().await;
        let Some(current) = t.tasks.iter().find(|task| task.id == id).cloned() else {
            return Ok(None);
        };

        let mut updated = current;
        changes.apply(&mut updated);
        t.check_references(
            updated.project_id,
            updated.status_id,
            updated.priority_id,
            updated.assignee_id,
        )?;
        updated.updated_at = Utc::now();

        if let Some(slot) = t.tasks.iter_mut().find(|task| task.id == id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn delete_task(&self, id: i32) -> StoreResult<()> {
        self.tables.lock().await.tasks.retain(|task| task.id != id);
        Ok(())
    }
}
