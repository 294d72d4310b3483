use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use super::{next_order, Store, StoreError, StoreResult, StoreStats};
use crate::models::priority::{NewPriority, Priority};
use crate::models::project::{NewProject, Project};
use crate::models::status::{NewStatus, Status};
use crate::models::task::{NewTask, Task, TaskChanges};
use crate::models::team_member::{NewTeamMember, TeamMember};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

const TASK_COLUMNS: &str = "id, title, description, project_id, status_id, priority_id, \
     assignee_id, due_date, completed_at, created_at, updated_at";

pub struct PgStore {
    pub pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        log::info!("🔗 Connecting to database...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to the database")?;

        log::info!("✅ Database connection established");

        Ok(PgStore { pool })
    }

    /// Creates the five relations if they are missing.
    pub async fn ensure_schema(&self) -> Result<()> {
        log::info!("📋 Ensuring database schema...");

        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("Failed to apply database schema")?;

        let tables = sqlx::query(
            r#"
            SELECT table_name
            FROM information_schema.tables
            WHERE table_schema = current_schema()
            AND table_name IN ('team_members', 'projects', 'statuses', 'priorities', 'tasks')
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to check database tables")?;

        let found_tables: Vec<String> = tables
            .iter()
            .map(|row| row.get::<String, _>("table_name"))
            .collect();

        log::info!("📊 Found tables: {:?}", found_tables);
        Ok(())
    }
}

fn unique_violation(err: sqlx::Error, entity: &'static str, name: String) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::Duplicate { entity, name };
        }
    }
    log::error!("Database error creating {}: {}", entity, err);
    StoreError::Database(err)
}

fn referenced_violation(err: sqlx::Error, entity: &'static str, id: i32) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            return StoreError::Referenced { entity, id };
        }
    }
    log::error!("Database error deleting {} {}: {}", entity, id, err);
    StoreError::Database(err)
}

/// Foreign keys a task write tried to store, for error messages.
struct TaskRefs {
    project_id: i32,
    status_id: i32,
    priority_id: i32,
    assignee_id: i32,
}

impl From<&Task> for TaskRefs {
    fn from(task: &Task) -> Self {
        TaskRefs {
            project_id: task.project_id,
            status_id: task.status_id,
            priority_id: task.priority_id,
            assignee_id: task.assignee_id,
        }
    }
}

impl From<&NewTask> for TaskRefs {
    fn from(task: &NewTask) -> Self {
        TaskRefs {
            project_id: task.project_id,
            status_id: task.status_id,
            priority_id: task.priority_id,
            assignee_id: task.assignee_id,
        }
    }
}

fn dangling_reference(err: sqlx::Error, refs: TaskRefs) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_foreign_key_violation() {
            let message = match db_err.constraint() {
                Some("tasks_project_fk") => format!("Project {} does not exist", refs.project_id),
                Some("tasks_status_fk") => format!("Status {} does not exist", refs.status_id),
                Some("tasks_priority_fk") => {
                    format!("Priority {} does not exist", refs.priority_id)
                }
                Some("tasks_assignee_fk") => {
                    format!("Team member {} does not exist", refs.assignee_id)
                }
                _ => "Task references a row that does not exist".to_string(),
            };
            return StoreError::InvalidReference(message);
        }
    }
    log::error!("Database error writing task: {}", err);
    StoreError::Database(err)
}

#[async_trait]
impl Store for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        log::info!("🔍 Running database health check...");
        let row = sqlx::query("SELECT 1 as health_check")
            .fetch_one(&self.pool)
            .await?;
        let result: i32 = row.get("health_check");
        if result != 1 {
            return Err(StoreError::Database(sqlx::Error::Protocol(
                "unexpected health check result".to_string(),
            )));
        }
        Ok(())
    }

    async fn stats(&self) -> StoreResult<StoreStats> {
        let stats = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM team_members) as team_member_count,
                (SELECT COUNT(*) FROM projects) as project_count,
                (SELECT COUNT(*) FROM statuses) as status_count,
                (SELECT COUNT(*) FROM priorities) as priority_count,
                (SELECT COUNT(*) FROM tasks) as task_count
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreStats {
            team_members: stats.get::<i64, _>("team_member_count"),
            projects: stats.get::<i64, _>("project_count"),
            statuses: stats.get::<i64, _>("status_count"),
            priorities: stats.get::<i64, _>("priority_count"),
            tasks: stats.get::<i64, _>("task_count"),
        })
    }

    async fn list_team_members(&self) -> StoreResult<Vec<TeamMember>> {
        let rows = sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, role, created_at FROM team_members ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_team_member(&self, id: i32) -> StoreResult<Option<TeamMember>> {
        let row = sqlx::query_as::<_, TeamMember>(
            "SELECT id, name, role, created_at FROM team_members WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_team_member(&self, member: NewTeamMember) -> StoreResult<TeamMember> {
        let row = sqlx::query_as::<_, TeamMember>(
            "INSERT INTO team_members (name, role) VALUES ($1, $2)
             RETURNING id, name, role, created_at",
        )
        .bind(&member.name)
        .bind(&member.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_team_member(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| referenced_violation(e, "Team member", id))?;
        Ok(())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let rows =
            sqlx::query_as::<_, Project>("SELECT id, name, created_at FROM projects ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    async fn get_project(&self, id: i32) -> StoreResult<Option<Project>> {
        let row =
            sqlx::query_as::<_, Project>("SELECT id, name, created_at FROM projects WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn create_project(&self, project: NewProject) -> StoreResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(&project.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Project", project.name))
    }

    async fn delete_project(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| referenced_violation(e, "Project", id))?;
        Ok(())
    }

    async fn list_statuses(&self) -> StoreResult<Vec<Status>> {
        let rows = sqlx::query_as::<_, Status>(
            r#"SELECT id, name, "order", created_at FROM statuses ORDER BY "order", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_status(&self, id: i32) -> StoreResult<Option<Status>> {
        let row = sqlx::query_as::<_, Status>(
            r#"SELECT id, name, "order", created_at FROM statuses WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_status(&self, status: NewStatus) -> StoreResult<Status> {
        sqlx::query_as::<_, Status>(
            r#"INSERT INTO statuses (name, "order") VALUES ($1, $2)
               RETURNING id, name, "order", created_at"#,
        )
        .bind(&status.name)
        .bind(status.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Status", status.name))
    }

    async fn delete_status(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM statuses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| referenced_violation(e, "Status", id))?;
        Ok(())
    }

    async fn next_status_order(&self) -> StoreResult<i32> {
        let max: Option<i64> = sqlx::query_scalar(r#"SELECT MAX("order")::bigint FROM statuses"#)
            .fetch_one(&self.pool)
            .await?;
        next_order("Status", max)
    }

    async fn list_priorities(&self) -> StoreResult<Vec<Priority>> {
        let rows = sqlx::query_as::<_, Priority>(
            r#"SELECT id, name, "order", created_at FROM priorities ORDER BY "order", id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_priority(&self, id: i32) -> StoreResult<Option<Priority>> {
        let row = sqlx::query_as::<_, Priority>(
            r#"SELECT id, name, "order", created_at FROM priorities WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_priority(&self, priority: NewPriority) -> StoreResult<Priority> {
        sqlx::query_as::<_, Priority>(
            r#"INSERT INTO priorities (name, "order") VALUES ($1, $2)
               RETURNING id, name, "order", created_at"#,
        )
        .bind(&priority.name)
        .bind(priority.order)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| unique_violation(e, "Priority", priority.name))
    }

    async fn delete_priority(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM priorities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| referenced_violation(e, "Priority", id))?;
        Ok(())
    }

    async fn next_priority_order(&self) -> StoreResult<i32> {
        let max: Option<i64> =
            sqlx::query_scalar(r#"SELECT MAX("order")::bigint FROM priorities"#)
                .fetch_one(&self.pool)
                .await?;
        next_order("Priority", max)
    }

    async fn list_tasks(&self) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_task(&self, id: i32) -> StoreResult<Option<Task>> {
        let row = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_task(&self, task: NewTask) -> StoreResult<Task> {
        let refs = TaskRefs::from(&task);
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (title, description, project_id, status_id, priority_id, assignee_id, due_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.project_id)
        .bind(task.status_id)
        .bind(task.priority_id)
        .bind(task.assignee_id)
        .bind(task.due_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| dangling_reference(e, refs))
    }

    async fn update_task(&self, id: i32, changes: TaskChanges) -> StoreResult<Option<Task>> {
        let Some(current) = self.get_task(id).await? else {
            return Ok(None);
        };
        if changes.is_empty() {
            // Nothing to merge but the row still counts as touched.
            let touched = sqlx::query_as::<_, Task>(&format!(
                "UPDATE tasks SET updated_at = NOW() WHERE id = $1 RETURNING {}",
                TASK_COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            return Ok(touched);
        }

        let mut attempted = current;
        changes.clone().apply(&mut attempted);
        let refs = TaskRefs::from(&attempted);

        let mut query_builder = sqlx::QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");
        if let Some(title) = changes.title {
            query_builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = changes.description {
            query_builder.push(", description = ").push_bind(description);
        }
        if let Some(project_id) = changes.project_id {
            query_builder.push(", project_id = ").push_bind(project_id);
        }
        if let Some(status_id) = changes.status_id {
            query_builder.push(", status_id = ").push_bind(status_id);
        }
        if let Some(priority_id) = changes.priority_id {
            query_builder.push(", priority_id = ").push_bind(priority_id);
        }
        if let Some(assignee_id) = changes.assignee_id {
            query_builder.push(", assignee_id = ").push_bind(assignee_id);
        }
        if let Some(due_date) = changes.due_date {
            query_builder.push(", due_date = ").push_bind(due_date);
        }
        if let Some(completed_at) = changes.completed_at {
            query_builder.push(", completed_at = ").push_bind(completed_at);
        }
        query_builder.push(" WHERE id = ").push_bind(id);
        query_builder.push(" RETURNING ");
        query_builder.push(TASK_COLUMNS);

        query_builder
            .build_query_as::<Task>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| dangling_reference(e, refs))
    }

    async fn delete_task(&self, id: i32) -> StoreResult<()> {
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
