/// Form and query-string decoding helpers
///
/// Browser forms submit every field, so an untouched input arrives as an
/// empty string. These deserializers read blank values as absent.
use serde::{de, Deserialize, Deserializer};
use std::{fmt, str::FromStr};
use taskdesk_shared::{
    listing::{SortField, SortOrder, TaskQuery, DEFAULT_PER_PAGE},
    models::task::TaskStatus,
};

/// Blank → `None`; anything else must parse as `T`
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Blank or unparseable → `None`
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().map(str::trim).and_then(|s| s.parse().ok()))
}

/// Listing parameters shared by the todo page and the dashboard
///
/// Malformed values fall back to defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default, deserialize_with = "lenient")]
    pub search: Option<String>,

    /// Unknown statuses are ignored
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TaskStatus>,

    #[serde(default, deserialize_with = "lenient")]
    pub category_id: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<i32>,

    #[serde(default, deserialize_with = "lenient")]
    pub sort_by: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub sort_order: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub page: Option<i64>,

    #[serde(default, deserialize_with = "lenient")]
    pub per_page: Option<i64>,
}

impl ListingParams {
    pub fn to_query(&self) -> TaskQuery {
        TaskQuery::default()
            .search(self.search.as_deref())
            .status(self.status)
            .category(self.category_id)
            .priority(self.priority)
            .sort(
                SortField::parse(self.sort_by.as_deref().unwrap_or_default()),
                SortOrder::parse(self.sort_order.as_deref().unwrap_or_default()),
            )
            .page(
                self.page.unwrap_or(1),
                self.per_page.unwrap_or(DEFAULT_PER_PAGE as i64),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use chrono::NaiveDate;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        priority: Option<i32>,
        #[serde(default, deserialize_with = "lenient")]
        due_date: Option<NaiveDate>,
    }

    fn decode<T: for<'de> Deserialize<'de>>(query: &str) -> Result<T, String> {
        let uri = format!("/?{}", query).parse().unwrap();
        Query::<T>::try_from_uri(&uri)
            .map(|Query(value)| value)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let sample: Sample = decode("priority=&due_date=").unwrap();
        assert_eq!(sample.priority, None);
        assert_eq!(sample.due_date, None);

        let sample: Sample = decode("").unwrap();
        assert_eq!(sample.priority, None);
    }

    #[test]
    fn test_strict_and_lenient_parsing() {
        let sample: Sample = decode("priority=2&due_date=2025-06-01").unwrap();
        assert_eq!(sample.priority, Some(2));
        assert_eq!(sample.due_date, NaiveDate::from_ymd_opt(2025, 6, 1));

        let sample: Sample = decode("due_date=next+tuesday").unwrap();
        assert_eq!(sample.due_date, None);

        assert!(decode::<Sample>("priority=high").is_err());
    }

    #[test]
    fn test_listing_params_defaults() {
        let params: ListingParams = decode("status=archived&page=abc&per_page=1000").unwrap();
        let query = params.to_query();

        assert_eq!(query.status, None);
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 100);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_listing_params_filters() {
        let params: ListingParams =
            decode("search=milk&status=progress&category_id=3&priority=1&sort_by=title&sort_order=asc&page=2&per_page=5")
                .unwrap();
        let query = params.to_query();

        assert_eq!(query.search.as_deref(), Some("milk"));
        assert_eq!(query.status, Some(TaskStatus::Progress));
        assert_eq!(query.category_id, Some(3));
        assert_eq!(query.priority, Some(1));
        assert_eq!(query.sort_by, SortField::Title);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(query.offset(), 5);
    }
}
