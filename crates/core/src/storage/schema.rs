//! Per-entity search configuration.
//!
//! A [`SearchSchema`] names the field the filter matches against, the
//! allow-list of sortable fields (each with its own comparator) and an
//! optional default ordering. Every backend resolves [`SearchParams`]
//! through the same schema, which is what keeps their results identical.

use std::{cmp::Ordering, fmt};

use super::{
    apply_filter, apply_paginate, apply_sort, contains_ignore_ascii_case, SearchParams,
    SearchResult, SortDirection,
};

/// Compares two records by one field, ascending.
pub type Comparator<E> = fn(&E, &E) -> Ordering;

/// Reads a text field from a record.
pub type FieldAccessor<E> = fn(&E) -> &str;

/// A field that callers are allowed to sort on.
///
/// `name` doubles as the column name in persisted backends.
pub struct SortField<E> {
    name: &'static str,
    compare: Comparator<E>,
}

impl<E> SortField<E> {
    pub fn new(name: &'static str, compare: Comparator<E>) -> Self {
        Self { name, compare }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Ascending comparison of `a` and `b` on this field.
    pub fn compare(&self, a: &E, b: &E) -> Ordering {
        (self.compare)(a, b)
    }
}

impl<E> Clone for SortField<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for SortField<E> {}

impl<E> fmt::Debug for SortField<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortField").field("name", &self.name).finish()
    }
}

/// Filter field, sortable fields and default ordering for one entity.
pub struct SearchSchema<E> {
    filter_field: &'static str,
    filter_accessor: FieldAccessor<E>,
    sortable: Vec<SortField<E>>,
    default_sort: Option<(&'static str, SortDirection)>,
}

impl<E> SearchSchema<E> {
    /// Creates a schema filtering on `filter_field`, with no sortable fields.
    pub fn new(filter_field: &'static str, filter_accessor: FieldAccessor<E>) -> Self {
        Self {
            filter_field,
            filter_accessor,
            sortable: Vec::new(),
            default_sort: None,
        }
    }

    /// Adds a field to the sortable allow-list.
    pub fn sortable(mut self, name: &'static str, compare: Comparator<E>) -> Self {
        self.sortable.push(SortField::new(name, compare));
        self
    }

    /// Ordering used when the caller asks for no sort or a field outside the
    /// allow-list. Ignored unless `name` is itself sortable.
    pub fn with_default_sort(mut self, name: &'static str, direction: SortDirection) -> Self {
        self.default_sort = Some((name, direction));
        self
    }

    pub fn filter_field(&self) -> &'static str {
        self.filter_field
    }

    pub fn sortable_fields(&self) -> Vec<&'static str> {
        self.sortable.iter().map(|f| f.name).collect()
    }

    /// Looks up a sortable field by name. `None` if not allow-listed.
    pub fn sort_field(&self, name: &str) -> Option<&SortField<E>> {
        self.sortable.iter().find(|f| f.name == name)
    }

    pub fn default_sort(&self) -> Option<(&SortField<E>, SortDirection)> {
        let (name, direction) = self.default_sort?;
        self.sort_field(name).map(|field| (field, direction))
    }

    /// Whether `record`'s filter field contains `filter`, ignoring ASCII case.
    pub fn matches(&self, record: &E, filter: &str) -> bool {
        contains_ignore_ascii_case((self.filter_accessor)(record), filter)
    }

    /// Filter stage using this schema's filter field.
    pub fn apply_filter(&self, items: Vec<E>, filter: Option<&str>) -> Vec<E> {
        apply_filter(items, filter, |record, filter| self.matches(record, filter))
    }

    /// Sort stage for a raw sort request.
    ///
    /// Returns `items` unchanged when `sort` is absent or not allow-listed.
    /// A missing direction sorts descending.
    pub fn apply_sort(
        &self,
        items: Vec<E>,
        sort: Option<&str>,
        direction: Option<SortDirection>,
    ) -> Vec<E> {
        let order = sort
            .and_then(|name| self.sort_field(name))
            .map(|field| (field, direction.unwrap_or(SortDirection::Desc)));
        apply_sort(items, order)
    }

    /// Normalizes search parameters against this schema.
    ///
    /// - page and per_page are clamped to their defaults
    /// - an allow-listed sort is kept, defaulting to descending
    /// - anything else falls back to the schema's default sort (keeping a
    ///   requested direction), or to store order when there is none
    /// - an empty filter becomes `None`
    pub fn resolve(&self, params: &SearchParams) -> ResolvedSearch<'_, E> {
        let order = match params.sort.as_deref().and_then(|name| self.sort_field(name)) {
            Some(field) => Some((field, params.sort_dir.unwrap_or(SortDirection::Desc))),
            None => self
                .default_sort()
                .map(|(field, direction)| (field, params.sort_dir.unwrap_or(direction))),
        };

        ResolvedSearch {
            page: params.effective_page(),
            per_page: params.effective_per_page(),
            order,
            filter: params.effective_filter().map(str::to_string),
        }
    }

    /// Runs filter, sort and paginate over `records`, which must be in
    /// store order.
    pub fn search(&self, records: Vec<E>, params: &SearchParams) -> SearchResult<E> {
        let resolved = self.resolve(params);

        let filtered = self.apply_filter(records, resolved.filter.as_deref());
        let total = filtered.len() as u64;
        let ordered = apply_sort(filtered, resolved.order);
        let items = apply_paginate(ordered, resolved.page, resolved.per_page);

        resolved.into_result(items, total)
    }
}

/// Search parameters after normalization against a [`SearchSchema`].
pub struct ResolvedSearch<'a, E> {
    pub page: u64,
    pub per_page: u64,
    pub order: Option<(&'a SortField<E>, SortDirection)>,
    pub filter: Option<String>,
}

impl<E> ResolvedSearch<'_, E> {
    /// Number of records skipped before this page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// Name of the sort field applied, if any.
    pub fn sort_name(&self) -> Option<&'static str> {
        self.order.map(|(field, _)| field.name())
    }

    /// Assembles the result, echoing the effective parameters.
    pub fn into_result(self, items: Vec<E>, total: u64) -> SearchResult<E> {
        SearchResult {
            items,
            total,
            current_page: self.page,
            per_page: self.per_page,
            sort: self.sort_name().map(str::to_string),
            sort_dir: self.order.map(|(_, direction)| direction),
            filter: self.filter,
        }
    }
}
