//! The three search stages: filter, then sort, then paginate.
//!
//! Pure functions over an owned snapshot of records. Stages never fail:
//! an absent filter or sort passes records through unchanged and a page
//! past the end is simply empty.

use super::{SortDirection, SortField};

/// Keeps the records for which `matches(record, filter)` is true.
///
/// An absent or empty filter returns `items` untouched and never calls
/// `matches`.
pub fn apply_filter<E, F>(items: Vec<E>, filter: Option<&str>, mut matches: F) -> Vec<E>
where
    F: FnMut(&E, &str) -> bool,
{
    let Some(filter) = filter.filter(|f| !f.is_empty()) else {
        return items;
    };

    items
        .into_iter()
        .filter(|item| matches(item, filter))
        .collect()
}

/// Stable sort by a single field.
///
/// `None` leaves the input order untouched. Records comparing equal keep
/// their relative order in both directions.
pub fn apply_sort<E>(mut items: Vec<E>, order: Option<(&SortField<E>, SortDirection)>) -> Vec<E> {
    if let Some((field, direction)) = order {
        items.sort_by(|a, b| direction.apply(field.compare(a, b)));
    }
    items
}

/// Returns the `[(page - 1) * per_page, page * per_page)` slice, clamped to
/// the bounds of `items`.
pub fn apply_paginate<E>(items: Vec<E>, page: u64, per_page: u64) -> Vec<E> {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    let start = usize::try_from(start).unwrap_or(usize::MAX);
    let len = usize::try_from(per_page).unwrap_or(usize::MAX);

    items.into_iter().skip(start).take(len).collect()
}

/// Substring match with ASCII case folding.
///
/// Matches SQLite's `instr(lower(a), lower(b))`, which also folds ASCII only.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
