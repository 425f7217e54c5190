/// Read-only statistics over one user's tasks
///
/// Everything here is a pure function of an in-memory task list, a category
/// list and the current date/time, so the handlers load once and aggregate
/// without further queries. Dates are UTC calendar days.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::category::Category;
use crate::models::task::{StatusCounts, Task, TaskStatus};

/// Number of tasks shown in the "recent" panel
pub const RECENT_TASK_LIMIT: usize = 4;

/// Status counts plus pending tasks due after today
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: i64,
    pub pending: i64,
    pub progress: i64,
    pub completed: i64,
    pub upcoming: i64,
}

pub fn task_stats(tasks: &[Task], today: NaiveDate) -> TaskStats {
    let counts = StatusCounts::tally(tasks);
    let upcoming = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending && t.due_date.is_some_and(|d| d > today))
        .count() as i64;

    TaskStats {
        total: counts.total,
        pending: counts.pending,
        progress: counts.progress,
        completed: counts.completed,
        upcoming,
    }
}

/// Headline numbers for the summary cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_project: i64,
    pub ongoing_project: i64,
    pub upcoming_projects: i64,
    pub complete_project: i64,
}

impl From<TaskStats> for Summary {
    fn from(stats: TaskStats) -> Self {
        Self {
            total_project: stats.total,
            ongoing_project: stats.progress,
            upcoming_projects: stats.upcoming,
            complete_project: stats.completed,
        }
    }
}

/// Share of the user's tasks in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub count: i64,
    /// Percent of all the user's tasks, one decimal place
    pub percentage: f64,
}

/// Per-category task counts, omitting empty categories
///
/// Categories keep the order they are given in.
pub fn category_breakdown(tasks: &[Task], categories: &[Category]) -> Vec<CategoryShare> {
    let total = tasks.len() as i64;

    let mut counts: HashMap<i64, i64> = HashMap::new();
    for category_id in tasks.iter().filter_map(|t| t.category_id) {
        *counts.entry(category_id).or_default() += 1;
    }

    categories
        .iter()
        .filter_map(|category| {
            let count = counts.get(&category.id).copied().unwrap_or(0);
            (count > 0).then(|| CategoryShare {
                name: category.name.clone(),
                count,
                percentage: percentage(count, total),
            })
        })
        .collect()
}

fn percentage(count: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 1000.0).round() / 10.0
}

/// Window for the creation analytics chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsPeriod {
    Week,
    Month,
    Year,
}

impl AnalyticsPeriod {
    /// "week" and "month" are recognised; anything else is a year
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => AnalyticsPeriod::Week,
            "month" => AnalyticsPeriod::Month,
            _ => AnalyticsPeriod::Year,
        }
    }

    pub fn days(&self) -> u32 {
        match self {
            AnalyticsPeriod::Week => 7,
            AnalyticsPeriod::Month => 30,
            AnalyticsPeriod::Year => 365,
        }
    }
}

/// Tasks created on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    /// Weekday abbreviation, e.g. "Mon"
    pub day: String,
    pub count: i64,
}

/// One bucket per day for the `days` days ending today, oldest first
pub fn daily_created(tasks: &[Task], today: NaiveDate, days: u32) -> Vec<DailyCount> {
    let mut per_day: HashMap<NaiveDate, i64> = HashMap::new();
    for task in tasks {
        *per_day.entry(task.created_at.date_naive()).or_default() += 1;
    }

    (0..days as i64)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            DailyCount {
                date,
                day: date.format("%a").to_string(),
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect()
}

/// Tasks created on `day`, in input order
pub fn created_on(tasks: &[Task], day: NaiveDate) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.created_at.date_naive() == day)
        .collect()
}

/// Coarse relative age: "just now", "N min ago", "N hour ago"
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);

    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{} min ago", seconds / 60)
    } else {
        format!("{} hour ago", seconds / 3600)
    }
}
