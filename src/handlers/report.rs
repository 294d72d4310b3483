use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::ErrorResponse;
use crate::reports::{
    aging_buckets, apply_view, completion_velocity, enrich_tasks, overview,
    priority_distribution, project_portfolio, to_rows, workload, BucketCount, EnrichedTask,
    NameCount, Overview, Period, ProjectSummary, SortDirection, SortField, SortState, TaskFilter,
    TaskRow, VelocityPoint,
};
use crate::storage::Store;
use crate::utils::errors::ServiceError;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OverviewQuery {
    /// Team member whose own and delegated open tasks are counted
    pub assignee_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VelocityQuery {
    /// week, month, quarter or year; month when omitted
    pub period: Option<Period>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TableQuery {
    /// Status name, or "all"
    pub status: Option<String>,
    /// Priority name, or "all"
    pub priority: Option<String>,
    /// Assignee name, or "all"
    pub assignee: Option<String>,
    pub sort: Option<SortField>,
    pub direction: Option<SortDirection>,
}

impl TableQuery {
    fn filter(&self) -> TaskFilter {
        TaskFilter::from_params(
            self.status.as_deref(),
            self.priority.as_deref(),
            self.assignee.as_deref(),
        )
    }

    fn sort_state(&self) -> SortState {
        let default = SortState::default();
        SortState::new(
            self.sort.unwrap_or(default.field),
            self.direction.unwrap_or(default.direction),
        )
    }
}

// Loads the five collections and joins them
async fn load_enriched(store: &dyn Store) -> Result<Vec<EnrichedTask>, ServiceError> {
    let (tasks, team_members, projects, statuses, priorities) = tokio::try_join!(
        store.list_tasks(),
        store.list_team_members(),
        store.list_projects(),
        store.list_statuses(),
        store.list_priorities(),
    )?;

    Ok(enrich_tasks(
        &tasks,
        &team_members,
        &projects,
        &statuses,
        &priorities,
    ))
}

/// Headline dashboard counters
#[utoipa::path(
    get,
    path = "/api/reports/overview",
    tag = "reports",
    params(OverviewQuery),
    responses(
        (status = 200, description = "Overview computed", body = Overview),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    )
)]
pub async fn get_overview(
    store: web::Data<dyn Store>,
    query: web::Query<OverviewQuery>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/overview - assignee: {:?}", query.assignee_id);

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(overview(&tasks, Utc::now(), query.assignee_id)))
}

/// Open tasks by age bucket
#[utoipa::path(
    get,
    path = "/api/reports/aging",
    tag = "reports",
    responses(
        (status = 200, description = "Aging buckets computed", body = Vec<BucketCount>)
    )
)]
pub async fn get_aging(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/aging");

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(aging_buckets(&tasks, Utc::now())))
}

/// Open tasks per assignee, busiest first
#[utoipa::path(
    get,
    path = "/api/reports/workload",
    tag = "reports",
    responses(
        (status = 200, description = "Workload computed", body = Vec<NameCount>)
    )
)]
pub async fn get_workload(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/workload");

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(workload(&tasks)))
}

/// Open tasks per priority
#[utoipa::path(
    get,
    path = "/api/reports/priorities",
    tag = "reports",
    responses(
        (status = 200, description = "Priority distribution computed", body = Vec<NameCount>)
    )
)]
pub async fn get_priority_distribution(
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/priorities");

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(priority_distribution(&tasks)))
}

/// Per-project active counts and health
#[utoipa::path(
    get,
    path = "/api/reports/projects",
    tag = "reports",
    responses(
        (status = 200, description = "Project portfolio computed", body = Vec<ProjectSummary>)
    )
)]
pub async fn get_project_portfolio(
    store: web::Data<dyn Store>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/projects");

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(project_portfolio(&tasks, Utc::now())))
}

/// Completed tasks per time slot
#[utoipa::path(
    get,
    path = "/api/reports/velocity",
    tag = "reports",
    params(VelocityQuery),
    responses(
        (status = 200, description = "Velocity computed", body = Vec<VelocityPoint>),
        (status = 400, description = "Unknown period", body = ErrorResponse)
    )
)]
pub async fn get_velocity(
    store: web::Data<dyn Store>,
    query: web::Query<VelocityQuery>,
) -> Result<HttpResponse, ServiceError> {
    let period = query.period.unwrap_or_default();
    log::info!("GET /api/reports/velocity - period: {:?}", period);

    let tasks = load_enriched(store.get_ref()).await?;

    Ok(HttpResponse::Ok().json(completion_velocity(&tasks, period, Utc::now())))
}

/// Filtered and sorted task table
#[utoipa::path(
    get,
    path = "/api/reports/tasks",
    tag = "reports",
    params(TableQuery),
    responses(
        (status = 200, description = "Task rows", body = Vec<TaskRow>),
        (status = 400, description = "Unknown sort key or direction", body = ErrorResponse)
    )
)]
pub async fn get_task_table(
    store: web::Data<dyn Store>,
    query: web::Query<TableQuery>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/reports/tasks - {:?}", query);

    let tasks = load_enriched(store.get_ref()).await?;
    let rows = apply_view(&tasks, &query.filter(), query.sort_state());

    log::info!("Task table has {} of {} tasks", rows.len(), tasks.len());
    Ok(HttpResponse::Ok().json(to_rows(rows, Utc::now())))
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/overview", web::get().to(get_overview))
            .route("/aging", web::get().to(get_aging))
            .route("/workload", web::get().to(get_workload))
            .route("/priorities", web::get().to(get_priority_distribution))
            .route("/projects", web::get().to(get_project_portfolio))
            .route("/velocity", web::get().to(get_velocity))
            .route("/tasks", web::get().to(get_task_table)),
    );
}
