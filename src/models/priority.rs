use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    pub id: i32,
    pub name: String,
    /// Explicit ranking, ascending. Not tied to severity.
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePriorityRequest {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub name: String,
    pub order: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewPriority {
    pub name: String,
    pub order: i32,
}
