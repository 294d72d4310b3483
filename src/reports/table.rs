use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{is_due_soon, is_overdue, EnrichedTask};

/// Value of a filter parameter that disables the filter.
pub const ALL: &str = "all";

/// Equality filters for table views, AND-composed. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
}

fn filter_value(raw: Option<&str>) -> Option<String> {
    match raw {
        None | Some(ALL) => None,
        Some(value) => Some(value.to_string()),
    }
}

impl TaskFilter {
    /// Builds a filter from raw request values, where a missing value or
    /// `"all"` means no filter on that column.
    pub fn from_params(status: Option<&str>, priority: Option<&str>, assignee: Option<&str>) -> Self {
        TaskFilter {
            status: filter_value(status),
            priority: filter_value(priority),
            assignee: filter_value(assignee),
        }
    }

    pub fn matches(&self, task: &EnrichedTask) -> bool {
        let keep = |wanted: &Option<String>, actual: &str| {
            wanted.as_deref().map_or(true, |w| w == actual)
        };
        keep(&self.status, &task.status)
            && keep(&self.priority, &task.priority)
            && keep(&self.assignee, &task.assignee)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Status,
    Assignee,
    Priority,
    DueDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            field: SortField::DueDate,
            direction: SortDirection::Asc,
        }
    }
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        SortState { field, direction }
    }

    /// Column-header click: the same key flips direction, a new key starts
    /// ascending.
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            SortState {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortState {
                field,
                direction: SortDirection::Asc,
            }
        }
    }

    pub fn compare(&self, a: &EnrichedTask, b: &EnrichedTask) -> Ordering {
        let ascending = match self.field {
            SortField::Status => a.status.cmp(&b.status),
            SortField::Assignee => a.assignee.cmp(&b.assignee),
            SortField::Priority => priority_rank(&a.priority).cmp(&priority_rank(&b.priority)),
            // Tasks without a due date go after every dated task.
            SortField::DueDate => match (a.due_date, b.due_date) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        };
        match self.direction {
            SortDirection::Asc => ascending,
            SortDirection::Desc => ascending.reverse(),
        }
    }
}

/// Severity rank used for sorting: Critical < High < Medium < Low, then
/// anything else.
pub fn priority_rank(name: &str) -> u8 {
    match name {
        "Critical" => 0,
        "High" => 1,
        "Medium" => 2,
        "Low" => 3,
        _ => 4,
    }
}

/// Filters then stably sorts a copy of `tasks`.
pub fn apply_view(tasks: &[EnrichedTask], filter: &TaskFilter, sort: SortState) -> Vec<EnrichedTask> {
    let mut rows: Vec<EnrichedTask> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    rows.sort_by(|a, b| sort.compare(a, b));
    rows
}

/// One line of the task table, with the per-row deadline flags.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: EnrichedTask,
    pub overdue: bool,
    pub due_soon: bool,
}

pub fn to_rows(tasks: Vec<EnrichedTask>, now: DateTime<Utc>) -> Vec<TaskRow> {
    tasks
        .into_iter()
        .map(|task| TaskRow {
            overdue: is_overdue(&task, now),
            due_soon: is_due_soon(&task, now),
            task,
        })
        .collect()
}
