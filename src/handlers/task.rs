use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::models::task::{
    parse_timestamp, CreateTaskRequest, NewTask, Task, TaskChanges, UpdateTaskRequest,
};
use crate::models::ErrorResponse;
use crate::storage::Store;
use crate::utils::errors::ServiceError;

// Helper function to turn an optional ISO-8601 string into a timestamp
fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ServiceError> {
    match raw {
        None => Ok(None),
        Some(value) => parse_timestamp(value).map(Some).ok_or_else(|| {
            ServiceError::ValidationError(format!("{} must be an ISO-8601 date", field))
        }),
    }
}

impl TryFrom<CreateTaskRequest> for NewTask {
    type Error = ServiceError;

    fn try_from(req: CreateTaskRequest) -> Result<Self, Self::Error> {
        let due_date = parse_optional_date("dueDate", req.due_date.as_deref())?;
        Ok(NewTask {
            title: req.title,
            description: req.description,
            project_id: req.project_id,
            status_id: req.status_id,
            priority_id: req.priority_id,
            assignee_id: req.assignee_id,
            due_date,
        })
    }
}

impl TryFrom<UpdateTaskRequest> for TaskChanges {
    type Error = ServiceError;

    fn try_from(req: UpdateTaskRequest) -> Result<Self, Self::Error> {
        let due_date = match req.due_date {
            Some(raw) => Some(parse_optional_date("dueDate", raw.as_deref())?),
            None => None,
        };
        let completed_at = match req.completed_at {
            Some(raw) => Some(parse_optional_date("completedAt", raw.as_deref())?),
            None => None,
        };
        Ok(TaskChanges {
            title: req.title,
            description: req.description,
            project_id: req.project_id,
            status_id: req.status_id,
            priority_id: req.priority_id,
            assignee_id: req.assignee_id,
            due_date,
            completed_at,
        })
    }
}

/// Get all tasks, newest first
#[utoipa::path(
    get,
    path = "/api/tasks",
    tag = "tasks",
    responses(
        (status = 200, description = "Tasks retrieved successfully", body = Vec<Task>)
    )
)]
pub async fn get_tasks(store: web::Data<dyn Store>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/tasks");

    let tasks = store.list_tasks().await?;

    log::info!("Retrieved {} tasks", tasks.len());
    Ok(HttpResponse::Ok().json(tasks))
}

/// Get task by ID
#[utoipa::path(
    get,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 200, description = "Task retrieved successfully", body = Task),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn get_task(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("GET /api/tasks/{}", task_id);

    let task = store
        .get_task(task_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Create a new task
#[utoipa::path(
    post,
    path = "/api/tasks",
    tag = "tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created successfully", body = Task),
        (status = 400, description = "Validation error or unknown reference", body = ErrorResponse)
    )
)]
pub async fn create_task(
    store: web::Data<dyn Store>,
    task_req: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/tasks - Creating task: {}", task_req.title);

    task_req.validate()?;
    let new_task = NewTask::try_from(task_req.into_inner())?;

    let task = store.create_task(new_task).await?;

    log::info!("Task created successfully with ID: {}", task.id);
    Ok(HttpResponse::Created().json(task))
}

/// Update any subset of a task's fields
#[utoipa::path(
    patch,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated successfully", body = Task),
        (status = 400, description = "Validation error or unknown reference", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse)
    )
)]
pub async fn update_task(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
    task_req: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("PATCH /api/tasks/{}", task_id);

    task_req.validate()?;
    let changes = TaskChanges::try_from(task_req.into_inner())?;

    let task = store
        .update_task(task_id, changes)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Task not found".to_string()))?;

    log::info!("Task updated successfully: {}", task.id);
    Ok(HttpResponse::Ok().json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/api/tasks/{id}",
    tag = "tasks",
    params(
        ("id" = i32, Path, description = "Task ID")
    ),
    responses(
        (status = 204, description = "Task deleted")
    )
)]
pub async fn delete_task(
    store: web::Data<dyn Store>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("DELETE /api/tasks/{}", task_id);

    store.delete_task(task_id).await?;

    log::info!("Task deleted: {}", task_id);
    Ok(HttpResponse::NoContent().finish())
}

pub fn task_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .route("", web::get().to(get_tasks))
            .route("", web::post().to(create_task))
            .route("/{id}", web::get().to(get_task))
            .route("/{id}", web::patch().to(update_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_body(due_date: Option<&str>) -> CreateTaskRequest {
        CreateTaskRequest {
            title: "  Ship it ".to_string(),
            description: None,
            project_id: 1,
            status_id: 1,
            priority_id: 1,
            assignee_id: 1,
            due_date: due_date.map(str::to_string),
        }
    }

    #[test]
    fn create_request_keeps_title_and_parses_due_date() {
        let task = NewTask::try_from(create_body(Some("2025-07-01"))).unwrap();
        assert_eq!(task.title, "  Ship it ");
        assert_eq!(task.due_date, parse_timestamp("2025-07-01T00:00:00Z"));
    }

    #[test]
    fn create_request_rejects_bad_due_date() {
        let err = NewTask::try_from(create_body(Some("soon"))).unwrap_err();
        assert_eq!(err.to_string(), "Validation Error: dueDate must be an ISO-8601 date");
    }

    #[test]
    fn update_request_keeps_null_and_missing_apart() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"completedAt": "2025-07-01T10:00:00Z", "dueDate": null}"#)
                .unwrap();
        let changes = TaskChanges::try_from(req).unwrap();
        assert_eq!(changes.due_date, Some(None));
        assert!(matches!(changes.completed_at, Some(Some(_))));
        assert!(changes.description.is_none());
        assert!(!changes.is_empty());
    }
}
