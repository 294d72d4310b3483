use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::double_option;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub project_id: i32,
    pub status_id: i32,
    pub priority_id: i32,
    pub assignee_id: i32,
    pub due_date: Option<DateTime<Utc>>,
    /// Set explicitly by clients; never derived from the status.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/tasks`. Server-owned fields (`id`, `completedAt`,
/// `createdAt`, `updatedAt`) are not part of the shape and are dropped if sent.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub project_id: i32,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub status_id: i32,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub priority_id: i32,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub assignee_id: i32,
    /// ISO-8601 timestamp or calendar date.
    pub due_date: Option<String>,
}

/// Body of `PATCH /api/tasks/{id}`. For the nullable fields an explicit
/// `null` clears the value and a missing key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[validate(custom(function = "crate::models::not_blank"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub project_id: Option<i32>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub status_id: Option<i32>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub priority_id: Option<i32>,
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub assignee_id: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub completed_at: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub project_id: i32,
    pub status_id: i32,
    pub priority_id: i32,
    pub assignee_id: i32,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub project_id: Option<i32>,
    pub status_id: Option<i32>,
    pub priority_id: Option<i32>,
    pub assignee_id: Option<i32>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.project_id.is_none()
            && self.status_id.is_none()
            && self.priority_id.is_none()
            && self.assignee_id.is_none()
            && self.due_date.is_none()
            && self.completed_at.is_none()
    }

    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(project_id) = self.project_id {
            task.project_id = project_id;
        }
        if let Some(status_id) = self.status_id {
            task.status_id = status_id;
        }
        if let Some(priority_id) = self.priority_id {
            task.priority_id = priority_id;
        }
        if let Some(assignee_id) = self.assignee_id {
            task.assignee_id = assignee_id;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
    }
}

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as
/// midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2025-03-01T10:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn parses_plain_date_as_utc_midnight() {
        let ts = parse_timestamp("2025-03-01").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("next tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn patch_body_distinguishes_null_from_missing() {
        let req: UpdateTaskRequest =
            serde_json::from_str(r#"{"description": null, "title": "x"}"#).unwrap();
        assert_eq!(req.description, Some(None));
        assert_eq!(req.due_date, None);
        assert_eq!(req.title.as_deref(), Some("x"));
    }
}
