mod error;
mod http_mapping;
mod pipeline;
mod record;
mod schema;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use pipeline::{apply_filter, apply_paginate, apply_sort, contains_ignore_ascii_case};
pub use record::{generate_id, timestamp_now, Record};
pub use schema::{Comparator, FieldAccessor, ResolvedSearch, SearchSchema, SortField};
pub use traits::Repository;
pub use types::{
    PaginationOutput, ParseSortDirectionError, SearchParams, SearchResult, SortDirection,
    DEFAULT_PAGE, DEFAULT_PER_PAGE,
};
