use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::status::{CreateStatusRequest, NewStatus, Status};
use crate::models::ErrorResponse;
use crate::storage::Store;
use crate::utils::errors::ServiceError;

/// Get all statuses in workflow order
#[utoipa::path(
    get,
    path = "/api/statuses",
    tag = "statuses",
    responses(
        (status = 200, description = "Statuses retrieved successfully", body = Vec<Status>)
    )
)]
pub async fn get_statuses(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/statuses");

    let statuses = store.list_statuses().await?;

    log::info!("Retrieved {} statuses", statuses.len());
    Ok(HttpResponse::Ok().json(statuses))
}

/// Get a status by ID
#[utoipa::path(
    get,
    path = "/api/statuses/{id}",
    tag = "statuses",
    params(
        ("id" = i32, Path, description = "Status ID")
    ),
    responses(
        (status = 200, description = "Status retrieved successfully", body = Status),
        (status = 404, description = "Status not found", body = ErrorResponse)
    )
)]
pub async fn get_status(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let status_id = path.into_inner();
    log::info!("GET /api/statuses/{}", status_id);

    let status = store
        .get_status(status_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Status not found".to_string()))?;

    Ok(HttpResponse::Ok().json(status))
}

/// Create a status. Without an explicit order it goes after the last one.
#[utoipa::path(
    post,
    path = "/api/statuses",
    tag = "statuses",
    request_body = CreateStatusRequest,
    responses(
        (status = 201, description = "Status created successfully", body = Status),
        (status = 400, description = "Validation error or duplicate name", body = ErrorResponse)
    )
)]
pub async fn create_status(
    store: web::Data<dyn Store>,
    status_req: web::Json<CreateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/statuses - Creating status: {}", status_req.name);

    status_req.validate()?;

    let req = status_req.into_inner();
    let order = match req.order {
        Some(order) => order,
        None => store.next_status_order().await?,
    };

    let status = store
        .create_status(NewStatus {
            name: req.name,
            order,
        })
        .await?;

    log::info!("Status created successfully with ID: {} (order {})", status.id, status.order);
    Ok(HttpResponse::Created().json(status))
}

/// Delete a status that no task is in
#[utoipa::path(
    delete,
    path = "/api/statuses/{id}",
    tag = "statuses",
    params(
        ("id" = i32, Path, description = "Status ID")
    ),
    responses(
        (status = 204, description = "Status deleted"),
        (status = 409, description = "Status still used by tasks", body = ErrorResponse)
    )
)]
pub async fn delete_status(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let status_id = path.into_inner();
    log::info!("DELETE /api/statuses/{}", status_id);

    store.delete_status(status_id).await?;

    log::info!("Status deleted: {}", status_id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn status_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/statuses")
            .route("", web::get().to(get_statuses))
            .route("", web::post().to(create_status))
            .route("/{id}", web::get().to(get_status))
            .route("/{id}", web::delete().to(delete_status)),
    );
}
