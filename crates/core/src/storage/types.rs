use std::{cmp::Ordering, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::serde::{
    deserialize_optional_count, deserialize_optional_sort_dir, deserialize_optional_string,
};

/// Page returned when the caller does not ask for one.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// Direction of a single-key sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Returns the lowercase name used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    pub fn reverse(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Orients an ascending comparison result in this direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown sort direction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid sort direction: {0}")]
pub struct ParseSortDirectionError(pub String);

impl FromStr for SortDirection {
    type Err = ParseSortDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ParseSortDirectionError(s.to_string())),
        }
    }
}

/// Query parameters for a repository search.
///
/// Every field is optional. Missing or non-positive `page`/`per_page`
/// values fall back to [`DEFAULT_PAGE`] and [`DEFAULT_PER_PAGE`]; they are
/// never rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_count")]
    pub per_page: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub sort: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_sort_dir")]
    pub sort_dir: Option<SortDirection>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub filter: Option<String>,
}

impl SearchParams {
    /// Creates empty parameters: first page, default page size, no sort, no filter.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Sets the sort field and direction.
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some(field.into());
        self.sort_dir = Some(direction);
        self
    }

    /// Sets the sort field, leaving the direction to the default.
    pub fn with_sort_field(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// The page that will be served, clamped to at least 1.
    pub fn effective_page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    /// The page size that will be served, clamped to at least 1.
    pub fn effective_per_page(&self) -> u64 {
        self.per_page.filter(|p| *p > 0).unwrap_or(DEFAULT_PER_PAGE)
    }

    /// The filter that will be applied. Empty filters are treated as absent.
    pub fn effective_filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.is_empty())
    }
}

/// One page of search results plus the parameters that produced it.
///
/// `total` counts every record matching the filter, not just this page.
/// `sort` and `sort_dir` report the ordering that was actually applied,
/// after any fallback to the schema default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult<E> {
    pub items: Vec<E>,
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub filter: Option<String>,
}

impl<E> SearchResult<E> {
    /// Number of the last non-empty page (0 when nothing matched).
    pub fn last_page(&self) -> u64 {
        self.total.div_ceil(self.per_page.max(1))
    }

    /// Converts the items while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(E) -> U) -> SearchResult<U> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            sort: self.sort,
            sort_dir: self.sort_dir,
            filter: self.filter,
        }
    }

    /// Builds the output returned by search use cases.
    pub fn into_pagination(self) -> PaginationOutput<E> {
        let last_page = self.last_page();
        PaginationOutput {
            items: self.items,
            per_page: self.per_page,
            total: self.total,
            current_page: self.current_page,
            last_page,
        }
    }
}

/// Pagination envelope handed to callers of search use cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationOutput<E> {
    pub items: Vec<E>,
    pub per_page: u64,
    pub total: u64,
    pub current_page: u64,
    pub last_page: u64,
}
