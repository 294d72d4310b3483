use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{is_completed, EnrichedTask};

/// Reporting window for completion velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 7 daily slots.
    Week,
    /// 30 daily slots.
    #[default]
    Month,
    /// 12 weekly slots starting on Mondays.
    Quarter,
    /// 12 calendar-month slots.
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VelocityPoint {
    pub label: String,
    pub start: DateTime<Utc>,
    pub count: usize,
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn month_start(year: i32, month: u32, offset: i32) -> Option<NaiveDate> {
    let index = year * 12 + month as i32 - 1 + offset;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)
}

/// Slot boundaries, oldest first. `n` slots need `n + 1` boundaries; the last
/// one is the end of the slot containing `now`.
fn boundaries(period: Period, now: DateTime<Utc>) -> Vec<DateTime<Utc>> {
    let today = now.date_naive();
    match period {
        Period::Week | Period::Month => {
            let days = if period == Period::Week { 7 } else { 30 };
            (0..=days)
                .map(|i| midnight(today) - Duration::days(days - 1 - i))
                .collect()
        }
        Period::Quarter => {
            let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
            (0..=12)
                .map(|i| midnight(monday) - Duration::weeks(11 - i))
                .collect()
        }
        Period::Year => (0..=12)
            .filter_map(|i| month_start(today.year(), today.month(), i - 11))
            .map(midnight)
            .collect(),
    }
}

fn label(period: Period, start: DateTime<Utc>) -> String {
    match period {
        Period::Year => start.format("%Y-%m").to_string(),
        _ => start.format("%Y-%m-%d").to_string(),
    }
}

/// Completed tasks counted per slot of `period`, ending with the slot that
/// contains `now`. Only tasks in the Completed status with a `completedAt`
/// inside the window are counted.
pub fn completion_velocity(
    tasks: &[EnrichedTask],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<VelocityPoint> {
    let bounds = boundaries(period, now);
    let completed: Vec<DateTime<Utc>> = tasks
        .iter()
        .filter(|t| is_completed(t))
        .filter_map(|t| t.completed_at)
        .collect();

    bounds
        .windows(2)
        .map(|slot| {
            let (start, end) = (slot[0], slot[1]);
            VelocityPoint {
                label: label(period, start),
                start,
                count: completed.iter().filter(|at| **at >= start && **at < end).count(),
            }
        })
        .collect()
}
