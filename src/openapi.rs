use utoipa::OpenApi;

use crate::handlers::{health, priority, project, report, status, task, team_member};
use crate::models::priority::{CreatePriorityRequest, Priority};
use crate::models::project::{CreateProjectRequest, Project};
use crate::models::status::{CreateStatusRequest, Status};
use crate::models::task::{CreateTaskRequest, Task, UpdateTaskRequest};
use crate::models::team_member::{CreateTeamMemberRequest, TeamMember};
use crate::models::ErrorResponse;
use crate::reports::{
    BucketCount, EnrichedTask, NameCount, Overview, Period, ProjectHealth, ProjectSummary,
    SortDirection, SortField, TaskRow, VelocityPoint,
};
use crate::storage::StoreStats;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Dashboard API",
        description = "Tasks, projects, team members, statuses and priorities, plus dashboard reports"
    ),
    paths(
        health::health_check,
        team_member::get_team_members,
        team_member::get_team_member,
        team_member::create_team_member,
        team_member::delete_team_member,
        project::get_projects,
        project::get_project,
        project::create_project,
        project::delete_project,
        status::get_statuses,
        status::get_status,
        status::create_status,
        status::delete_status,
        priority::get_priorities,
        priority::get_priority,
        priority::create_priority,
        priority::delete_priority,
        task::get_tasks,
        task::get_task,
        task::create_task,
        task::update_task,
        task::delete_task,
        report::get_overview,
        report::get_aging,
        report::get_workload,
        report::get_priority_distribution,
        report::get_project_portfolio,
        report::get_velocity,
        report::get_task_table,
    ),
    components(schemas(
        ErrorResponse,
        StoreStats,
        TeamMember,
        CreateTeamMemberRequest,
        Project,
        CreateProjectRequest,
        Status,
        CreateStatusRequest,
        Priority,
        CreatePriorityRequest,
        Task,
        CreateTaskRequest,
        UpdateTaskRequest,
        EnrichedTask,
        TaskRow,
        BucketCount,
        NameCount,
        Overview,
        ProjectHealth,
        ProjectSummary,
        Period,
        SortField,
        SortDirection,
        VelocityPoint,
    )),
    tags(
        (name = "health", description = "Service health"),
        (name = "team-members", description = "Team member management"),
        (name = "projects", description = "Project management"),
        (name = "statuses", description = "Workflow statuses"),
        (name = "priorities", description = "Task priorities"),
        (name = "tasks", description = "Task management"),
        (name = "reports", description = "Derived dashboard views")
    )
)]
pub struct ApiDoc;
