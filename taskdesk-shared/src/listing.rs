/// Filtering, sorting and pagination of a user's todo items
///
/// [`TaskQuery`] is the validated form of the listing parameters accepted by
/// the todo page and the dashboard. Sort columns come from a closed set so
/// they can be spliced into SQL safely; everything else is bound.
///
/// # Example
///
/// ```
/// use taskdesk_shared::listing::{PageInfo, SortField, SortOrder, TaskQuery};
///
/// let query = TaskQuery::default()
///     .search(Some("milk"))
///     .sort(SortField::parse("due_date"), SortOrder::parse("asc"))
///     .page(2, 500);
///
/// assert_eq!(query.per_page, 100);
/// assert_eq!(query.offset(), 100);
///
/// let info = PageInfo::new(query.page, query.per_page, 150);
/// assert_eq!(info.total_pages, 2);
/// assert!(!info.has_next);
/// ```

use serde::Serialize;

use crate::models::task::TaskStatus;

/// Default page size for listings
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Largest page size a caller may request
pub const MAX_PER_PAGE: u32 = 100;

/// Column a listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Title,
    Priority,
    Status,
    DueDate,
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parses a sort key; unknown keys fall back to `created_at`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => SortField::Title,
            "priority" => SortField::Priority,
            "status" => SortField::Status,
            "due_date" => SortField::DueDate,
            "updated_at" => SortField::UpdatedAt,
            _ => SortField::CreatedAt,
        }
    }

    /// SQL column backing this sort key
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Priority => "priority",
            SortField::Status => "status",
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Anything other than "asc" sorts descending
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Listing parameters for a single owner's todo items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskQuery {
    /// Case-insensitive substring matched against title, description and tags
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub category_id: Option<i64>,
    pub priority: Option<i32>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    /// 1-based page number
    pub page: u32,
    pub per_page: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category_id: None,
            priority: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl TaskQuery {
    /// Sets the search term; blank terms clear it
    pub fn search(mut self, term: Option<&str>) -> Self {
        self.search = term
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        self
    }

    pub fn status(mut self, status: Option<TaskStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn category(mut self, category_id: Option<i64>) -> Self {
        self.category_id = category_id;
        self
    }

    pub fn priority(mut self, priority: Option<i32>) -> Self {
        self.priority = priority;
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = field;
        self.sort_order = order;
        self
    }

    /// Sets the page window, clamping `page` to at least 1 and `per_page`
    /// to `1..=MAX_PER_PAGE`
    pub fn page(mut self, page: i64, per_page: i64) -> Self {
        self.page = page.clamp(1, u32::MAX as i64) as u32;
        self.per_page = per_page.clamp(1, MAX_PER_PAGE as i64) as u32;
        self
    }

    /// Row offset of the first item on the requested page
    pub fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// `LIKE` pattern for the search term with wildcards escaped
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|term| {
            let mut escaped = String::with_capacity(term.len() + 2);
            escaped.push('%');
            for c in term.chars() {
                if matches!(c, '%' | '_' | '\\') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            escaped
        })
    }
}

/// Pagination metadata returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub total_count: i64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// Computes page metadata; `total_pages` is `ceil(total_count / per_page)`
    pub fn new(page: u32, per_page: u32, total_count: i64) -> Self {
        let per_page = per_page.max(1);
        let total = total_count.max(0);
        let total_pages = ((total + per_page as i64 - 1) / per_page as i64) as u32;

        Self {
            page,
            per_page,
            total_pages,
            total_count: total,
            has_prev: page > 1,
            has_next: page < total_pages,
        }
    }
}
