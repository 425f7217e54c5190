/// CSV and JSON rendering of a user's todo items for download
///
/// # Example
///
/// ```
/// use taskdesk_shared::export::{ExportFormat, render};
///
/// let body = render(ExportFormat::Csv, &[], &[]).unwrap();
/// assert!(body.starts_with("ID,Title,Description"));
///
/// let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// assert_eq!(ExportFormat::Json.filename(date), "todos_2025-03-01.json");
/// ```

use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use crate::models::category::{name_index, Category};
use crate::models::task::Task;

/// Column headers of the CSV export, in order
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Title",
    "Description",
    "Status",
    "Priority",
    "Category",
    "Due Date",
    "Tags",
    "Created At",
];

/// Error type for export rendering
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    CsvBuffer(String),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }

    /// `todos_<YYYY-MM-DD>.<ext>`
    pub fn filename(&self, date: NaiveDate) -> String {
        format!("todos_{}.{}", date.format("%Y-%m-%d"), self.extension())
    }
}

/// One task in the JSON export
#[derive(Debug, Clone, Serialize)]
pub struct ExportedTask<'a> {
    pub id: i64,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub status: &'static str,
    /// Label: High, Medium or Low
    pub priority: &'static str,
    pub priority_value: i32,
    pub category: Option<&'a str>,
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Renders tasks in the requested format
///
/// `categories` resolves category IDs to names; unknown IDs render as no
/// category.
pub fn render(
    format: ExportFormat,
    tasks: &[Task],
    categories: &[Category],
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(tasks, categories),
        ExportFormat::Json => to_json(tasks, categories),
    }
}

pub fn to_csv(tasks: &[Task], categories: &[Category]) -> Result<String, ExportError> {
    let names = name_index(categories);
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for task in tasks {
        let category = task
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or_default();
        let due_date = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        writer.write_record([
            task.id.to_string().as_str(),
            task.title.as_str(),
            task.description.as_deref().unwrap_or_default(),
            task.status.as_str(),
            task.priority_label(),
            category,
            due_date.as_str(),
            task.tags.as_deref().unwrap_or_default(),
            task.created_at.format("%Y-%m-%d %H:%M:%S").to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvBuffer(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ExportError::CsvBuffer(e.to_string()))
}

pub fn to_json(tasks: &[Task], categories: &[Category]) -> Result<String, ExportError> {
    let names = name_index(categories);

    let rows: Vec<ExportedTask<'_>> = tasks
        .iter()
        .map(|task| ExportedTask {
            id: task.id,
            title: &task.title,
            description: task.description.as_deref(),
            status: task.status.as_str(),
            priority: task.priority_label(),
            priority_value: task.priority,
            category: task.category_id.and_then(|id| names.get(&id).copied()),
            due_date: task.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            tags: task.tag_list(),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}
