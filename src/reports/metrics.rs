use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    due_soon_window, is_completed, is_due_soon, is_overdue, time_until_due, EnrichedTask,
};

/// Upper bounds (inclusive, in days) of the aging buckets, ascending. Anything
/// older lands in the overflow bucket.
const AGING_BOUNDS: [i64; 6] = [7, 14, 30, 60, 90, 120];
const AGING_OVERFLOW: &str = "120+";

/// Priority names in severity order, most severe first.
pub const PRIORITY_NAMES: [&str; 4] = ["Critical", "High", "Medium", "Low"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BucketCount {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProjectHealth {
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Needs Attention")]
    NeedsAttention,
    #[serde(rename = "On Track")]
    OnTrack,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub name: String,
    pub active_tasks: usize,
    pub health: ProjectHealth,
    /// Active tasks per status name, first-seen order.
    pub status_counts: Vec<NameCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub open_tasks: usize,
    pub critical_tasks: usize,
    pub due_soon: usize,
    pub overdue: usize,
    pub completed_tasks: usize,
    pub active_projects: usize,
    pub avg_cycle_time_days: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_open_tasks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delegated_tasks: Option<usize>,
}

fn bump(counts: &mut Vec<NameCount>, name: &str) {
    match counts.iter_mut().find(|c| c.name == name) {
        Some(entry) => entry.count += 1,
        None => counts.push(NameCount {
            name: name.to_string(),
            count: 1,
        }),
    }
}

fn is_high_priority(task: &EnrichedTask) -> bool {
    task.priority == "Critical" || task.priority == "High"
}

/// Counts open tasks by whole days since creation. All seven buckets are
/// always returned, in ascending order.
pub fn aging_buckets(tasks: &[EnrichedTask], now: DateTime<Utc>) -> Vec<BucketCount> {
    let mut counts = [0usize; AGING_BOUNDS.len() + 1];

    for task in tasks.iter().filter(|t| !is_completed(t)) {
        let age = (now - task.created_at).num_days();
        let slot = AGING_BOUNDS
            .iter()
            .position(|bound| age <= *bound)
            .unwrap_or(AGING_BOUNDS.len());
        counts[slot] += 1;
    }

    AGING_BOUNDS
        .iter()
        .map(|bound| bound.to_string())
        .chain(std::iter::once(AGING_OVERFLOW.to_string()))
        .zip(counts)
        .map(|(range, count)| BucketCount { range, count })
        .collect()
}

/// Open tasks per assignee, busiest first. Ties keep first-seen order.
pub fn workload(tasks: &[EnrichedTask]) -> Vec<NameCount> {
    let mut counts = Vec::new();
    for task in tasks.iter().filter(|t| !is_completed(t)) {
        bump(&mut counts, &task.assignee);
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Open tasks per priority in fixed Critical, High, Medium, Low order.
/// Other priority names are not counted.
pub fn priority_distribution(tasks: &[EnrichedTask]) -> Vec<NameCount> {
    PRIORITY_NAMES
        .iter()
        .map(|name| NameCount {
            name: name.to_string(),
            count: tasks
                .iter()
                .filter(|t| !is_completed(t) && t.priority == *name)
                .count(),
        })
        .collect()
}

/// Classifies one project's active tasks. Completed tasks in the input are
/// skipped.
pub fn project_health<'a>(
    tasks: impl IntoIterator<Item = &'a EnrichedTask>,
    now: DateTime<Utc>,
) -> ProjectHealth {
    let mut needs_attention = false;

    for task in tasks.into_iter().filter(|t| !is_completed(t)) {
        let Some(left) = time_until_due(task, now) else {
            continue;
        };
        if is_high_priority(task) {
            if left < due_soon_window() {
                return ProjectHealth::AtRisk;
            }
        } else if left > Duration::zero() && left < due_soon_window() {
            needs_attention = true;
        }
    }

    if needs_attention {
        ProjectHealth::NeedsAttention
    } else {
        ProjectHealth::OnTrack
    }
}

/// One summary per project name seen in `tasks`, in first-seen order.
/// Projects whose tasks are all completed still appear, with no active tasks.
pub fn project_portfolio(tasks: &[EnrichedTask], now: DateTime<Utc>) -> Vec<ProjectSummary> {
    let mut names: Vec<&str> = Vec::new();
    for task in tasks {
        if !names.contains(&task.project.as_str()) {
            names.push(&task.project);
        }
    }

    names
        .into_iter()
        .map(|name| {
            let active: Vec<&EnrichedTask> = tasks
                .iter()
                .filter(|t| t.project == name && !is_completed(t))
                .collect();
            let mut status_counts = Vec::new();
            for task in &active {
                bump(&mut status_counts, &task.status);
            }
            ProjectSummary {
                name: name.to_string(),
                active_tasks: active.len(),
                health: project_health(active.iter().copied(), now),
                status_counts,
            }
        })
        .collect()
}

/// Mean whole days from creation to completion over Completed tasks, rounded.
/// Completed tasks without a `completedAt` add zero days but still count.
pub fn average_cycle_time_days(tasks: &[EnrichedTask]) -> i64 {
    let completed: Vec<&EnrichedTask> = tasks.iter().filter(|t| is_completed(t)).collect();
    if completed.is_empty() {
        return 0;
    }
    let total: i64 = completed
        .iter()
        .filter_map(|t| t.completed_at.map(|done| (done - t.created_at).num_days()))
        .sum();
    (total as f64 / completed.len() as f64).round() as i64
}

/// Headline counters for the dashboard. With `assignee_id` the split between
/// that member's own open tasks and those delegated to others is included.
pub fn overview(tasks: &[EnrichedTask], now: DateTime<Utc>, assignee_id: Option<i32>) -> Overview {
    let open: Vec<&EnrichedTask> = tasks.iter().filter(|t| !is_completed(t)).collect();

    let mut projects: Vec<&str> = Vec::new();
    for task in &open {
        if !projects.contains(&task.project.as_str()) {
            projects.push(&task.project);
        }
    }

    let mine = assignee_id.map(|id| open.iter().filter(|t| t.assignee_id == id).count());

    Overview {
        open_tasks: open.len(),
        critical_tasks: open.iter().filter(|t| t.priority == "Critical").count(),
        due_soon: open.iter().filter(|t| is_due_soon(t, now)).count(),
        overdue: tasks.iter().filter(|t| is_overdue(t, now)).count(),
        completed_tasks: tasks.len() - open.len(),
        active_projects: projects.len(),
        avg_cycle_time_days: average_cycle_time_days(tasks),
        my_open_tasks: mine,
        delegated_tasks: mine.map(|count| open.len() - count),
    }
}
