use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::priority::{CreatePriorityRequest, NewPriority, Priority};
use crate::models::ErrorResponse;
use crate::storage::Store;
use crate::utils::errors::ServiceError;

/// Get all priorities in ranking order
#[utoipa::path(
    get,
    path = "/api/priorities",
    tag = "priorities",
    responses(
        (status = 200, description = "Priorities retrieved successfully", body = Vec<Priority>)
    )
)]
pub async fn get_priorities(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/priorities");

    let priorities = store.list_priorities().await?;

    log::info!("Retrieved {} priorities", priorities.len());
    Ok(HttpResponse::Ok().json(priorities))
}

/// Get a priority by ID
#[utoipa::path(
    get,
    path = "/api/priorities/{id}",
    tag = "priorities",
    params(
        ("id" = i32, Path, description = "Priority ID")
    ),
    responses(
        (status = 200, description = "Priority retrieved successfully", body = Priority),
        (status = 404, description = "Priority not found", body = ErrorResponse)
    )
)]
pub async fn get_priority(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let priority_id = path.into_inner();
    log::info!("GET /api/priorities/{}", priority_id);

    let priority = store
        .get_priority(priority_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Priority not found".to_string()))?;

    Ok(HttpResponse::Ok().json(priority))
}

/// Create a priority
#[utoipa::path(
    post,
    path = "/api/priorities",
    tag = "priorities",
    request_body = CreatePriorityRequest,
    responses(
        (status = 201, description = "Priority created successfully", body = Priority),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_priority(
    store: web::Data<dyn Store>,
    priority_req: web::Json<CreatePriorityRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/priorities - Creating priority: {}", priority_req.name);

    priority_req.validate()?;

    let req = priority_req.into_inner();
    let order = match req.order {
        Some(order) => order,
        None => store.next_priority_order().await?,
    };

    let priority = store
        .create_priority(NewPriority {
            name: req.name,
            order,
        })
        .await?;

    log::info!("Priority created successfully with ID: {}", priority.id);
    Ok(HttpResponse::Created().json(priority))
}

/// Delete a priority that no task uses
#[utoipa::path(
    delete,
    path = "/api/priorities/{id}",
    tag = "priorities",
    params(
        ("id" = i32, Path, description = "Priority ID")
    ),
    responses(
        (status = 204, description = "Priority deleted"),
        (status = 409, description = "Priority still used by tasks", body = ErrorResponse)
    )
)]
pub async fn delete_priority(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let priority_id = path.into_inner();
    log::info!("DELETE /api/priorities/{}", priority_id);

    store.delete_priority(priority_id).await?;

    log::info!("Priority deleted: {}", priority_id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn priority_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/priorities")
            .route("", web::get().to(get_priorities))
            .route("", web::post().to(create_priority))
            .route("/{id}", web::get().to(get_priority))
            .route("/{id}", web::delete().to(delete_priority)),
    );
}
