//! Derived dashboard views. Everything here is a pure function of its
//! inputs; the current time is always passed in.

pub mod enrich;
pub mod metrics;
pub mod table;
pub mod velocity;

use chrono::{DateTime, Duration, Utc};

pub use enrich::{enrich_tasks, EnrichedTask, UNKNOWN};
pub use metrics::{
    aging_buckets, average_cycle_time_days, overview, priority_distribution, project_health,
    project_portfolio, workload, BucketCount, NameCount, Overview, ProjectHealth,
    ProjectSummary,
};
pub use table::{apply_view, to_rows, SortDirection, SortField, SortState, TaskFilter, TaskRow};
pub use velocity::{completion_velocity, Period, VelocityPoint};

use crate::models::status::COMPLETED_STATUS;

/// Window used by the due-soon predicate and project health: exactly
/// 3 × 24 × 60 × 60 × 1000 ms.
pub fn due_soon_window() -> Duration {
    Duration::milliseconds(3 * 24 * 60 * 60 * 1000)
}

pub fn is_completed(task: &EnrichedTask) -> bool {
    task.status == COMPLETED_STATUS
}

/// `dueDate - now`, or `None` for tasks without a due date.
pub fn time_until_due(task: &EnrichedTask, now: DateTime<Utc>) -> Option<Duration> {
    task.due_date.map(|due| due - now)
}

/// Strictly between now and now + 3 days.
pub fn is_due_soon(task: &EnrichedTask, now: DateTime<Utc>) -> bool {
    match time_until_due(task, now) {
        Some(left) => left > Duration::zero() && left < due_soon_window(),
        None => false,
    }
}

pub fn is_overdue(task: &EnrichedTask, now: DateTime<Utc>) -> bool {
    matches!(task.due_date, Some(due) if due < now) && !is_completed(task)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::EnrichedTask;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    pub fn task(id: i32, status: &str, priority: &str, assignee: &str) -> EnrichedTask {
        EnrichedTask {
            id,
            title: format!("Task {}", id),
            description: None,
            project: "Apollo".to_string(),
            project_id: 1,
            status: status.to_string(),
            status_id: 1,
            priority: priority.to_string(),
            priority_id: 1,
            assignee: assignee.to_string(),
            assignee_id: 1,
            due_date: None,
            completed_at: None,
            created_at: now() - Duration::days(1),
            updated_at: now() - Duration::days(1),
        }
    }

    pub fn due_in(mut task: EnrichedTask, left: Duration) -> EnrichedTask {
        task.due_date = Some(now() + left);
        task
    }
}
