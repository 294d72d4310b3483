use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Status name that marks a task as done for every derived view.
pub const COMPLETED_STATUS: &str = "Completed";

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub id: i32,
    pub name: String,
    /// Position in the workflow, ascending.
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStatusRequest {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    /// Defaults to one past the highest existing order.
    pub order: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewStatus {
    pub name: String,
    pub order: i32,
}
