use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::project::{CreateProjectRequest, Project};
use crate::models::ErrorResponse;
use crate::storage::Store;
use crate::utils::errors::ServiceError;

/// Get all projects
#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, description = "Projects retrieved successfully", body = Vec<Project>)
    )
)]
pub async fn get_projects(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/projects");

    let projects = store.list_projects().await?;

    log::info!("Retrieved {} projects", projects.len());
    Ok(HttpResponse::Ok().json(projects))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "projects",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project retrieved successfully", body = Project),
        (status = 404, description = "Project not found", body = ErrorResponse)
    )
)]
pub async fn get_project(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let project_id = path.into_inner();
    log::info!("GET /api/projects/{}", project_id);

    let project = store
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Project not found".to_string()))?;

    Ok(HttpResponse::Ok().json(project))
}

/// Create a project
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = Project),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_project(
    store: web::Data<dyn Store>,
    project_req: web::Json<CreateProjectRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/projects - Creating project: {}", project_req.name);

    project_req.validate()?;

    let project = store.create_project(project_req.into_inner().into()).await?;

    log::info!("Project created successfully with ID: {}", project.id);
    Ok(HttpResponse::Created().json(project))
}

/// Delete a project that no task belongs to
#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    tag = "projects",
    params(
        ("id" = i32, Path, description = "Project ID")
    ),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 409, description = "Project still has tasks", body = ErrorResponse)
    )
)]
pub async fn delete_project(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let project_id = path.into_inner();
    log::info!("DELETE /api/projects/{}", project_id);

    store.delete_project(project_id).await?;

    log::info!("Project deleted: {}", project_id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn project_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(get_projects))
            .route("", web::post().to(create_project))
            .route("/{id}", web::get().to(get_project))
            .route("/{id}", web::delete().to(delete_project)),
    );
}
