use chrono::{Duration, Utc};

use super::{Store, StoreResult};
use crate::models::priority::NewPriority;
use crate::models::project::NewProject;
use crate::models::status::NewStatus;
use crate::models::task::{NewTask, TaskChanges};
use crate::models::team_member::NewTeamMember;

const STATUSES: [&str; 5] = ["Todo", "In Progress", "In Review", "Blocked", "Completed"];
const PRIORITIES: [&str; 4] = ["Low", "Medium", "High", "Critical"];
const TEAM: [(&str, &str); 6] = [
    ("Sarah Chen", "Product Manager"),
    ("Michael Rodriguez", "Engineering Lead"),
    ("Emily Watson", "Senior Developer"),
    ("David Kim", "UX Designer"),
    ("Jennifer Liu", "Marketing Director"),
    ("Robert Johnson", "Data Analyst"),
];
const PROJECTS: [&str; 4] = [
    "Website Redesign",
    "Mobile App Launch",
    "Q3 Financials",
    "Customer Onboarding",
];

// (title, project, status, priority, assignee, due in days, completed days ago)
type DemoTask = (&'static str, usize, usize, usize, usize, Option<i64>, Option<i64>);

const TASKS: [DemoTask; 8] = [
    ("Finalize homepage wireframes", 0, 1, 2, 3, Some(2), None),
    ("Migrate CMS content", 0, 0, 1, 2, Some(10), None),
    ("Set up crash reporting", 1, 2, 3, 1, Some(-1), None),
    ("App store screenshots", 1, 0, 0, 3, Some(14), None),
    ("Reconcile vendor invoices", 2, 3, 2, 5, Some(1), None),
    ("Draft quarterly summary", 2, 4, 1, 4, Some(-5), Some(3)),
    ("Welcome email sequence", 3, 1, 1, 4, Some(6), None),
    ("Onboarding checklist v1", 3, 4, 0, 0, None, Some(12)),
];

/// Loads a small demo data set. Returns `false` without writing anything
/// when the store already holds statuses.
pub async fn seed_demo_data(store: &dyn Store) -> StoreResult<bool> {
    if !store.list_statuses().await?.is_empty() {
        log::info!("Store already seeded, skipping demo data");
        return Ok(false);
    }

    let mut statuses = Vec::new();
    for (i, name) in STATUSES.iter().enumerate() {
        statuses.push(
            store
                .create_status(NewStatus {
                    name: name.to_string(),
                    order: i as i32 + 1,
                })
                .await?,
        );
    }

    let mut priorities = Vec::new();
    for (i, name) in PRIORITIES.iter().enumerate() {
        priorities.push(
            store
                .create_priority(NewPriority {
                    name: name.to_string(),
                    order: i as i32 + 1,
                })
                .await?,
        );
    }

    let mut members = Vec::new();
    for (name, role) in TEAM {
        members.push(
            store
                .create_team_member(NewTeamMember {
                    name: name.to_string(),
                    role: role.to_string(),
                })
                .await?,
        );
    }

    let mut projects = Vec::new();
    for name in PROJECTS {
        projects.push(
            store
                .create_project(NewProject {
                    name: name.to_string(),
                })
                .await?,
        );
    }

    let now = Utc::now();
    for (title, project, status, priority, assignee, due_in, completed_ago) in TASKS {
        let task = store
            .create_task(NewTask {
                title: title.to_string(),
                description: None,
                project_id: projects[project].id,
                status_id: statuses[status].id,
                priority_id: priorities[priority].id,
                assignee_id: members[assignee].id,
                due_date: due_in.map(|days| now + Duration::days(days)),
            })
            .await?;

        if let Some(days) = completed_ago {
            store
                .update_task(
                    task.id,
                    TaskChanges {
                        completed_at: Some(Some(now - Duration::days(days))),
                        ..Default::default()
                    },
                )
                .await?;
        }
    }

    log::info!(
        "🌱 Seeded {} statuses, {} priorities, {} team members, {} projects, {} tasks",
        statuses.len(),
        priorities.len(),
        members.len(),
        projects.len(),
        TASKS.len()
    );
    Ok(true)
}
