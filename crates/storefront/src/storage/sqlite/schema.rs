//! SQLite schema definitions and SQL statement builders.
//!
//! Pure data and string building, no I/O. Table and column names always come
//! from the `SqliteRecord` constants and the search schema allow-list, never
//! from caller input. Values are bound as numbered parameters.

use storefront_core::storage::SortDirection;

/// SQL statement to create all tables.
///
/// Unique fields (product name, user email, token value) carry a plain index,
/// not a UNIQUE constraint: uniqueness is checked by the use cases through
/// `conflicting_field`, the same way for every backend.
pub const CREATE_TABLES: &str = r#"
-- Products table
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    quantity INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    password TEXT NOT NULL,
    avatar TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- User tokens table
CREATE TABLE IF NOT EXISTS user_tokens (
    id TEXT PRIMARY KEY,
    token TEXT NOT NULL,
    user_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Indexes for unique-field lookups
CREATE INDEX IF NOT EXISTS idx_products_name ON products(name);
CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
CREATE INDEX IF NOT EXISTS idx_user_tokens_token ON user_tokens(token);
"#;

/// Column every table uses as its primary key. Must be the first column.
pub const ID_COLUMN: &str = "id";

/// Column that `update` never overwrites.
pub const CREATED_AT_COLUMN: &str = "created_at";

/// Most ids bound by one [`select_by_ids`] statement.
///
/// 999 is the lowest `SQLITE_MAX_VARIABLE_NUMBER` any SQLite build ships with.
pub const MAX_BOUND_IDS: usize = 999;

/// `INSERT` binding every column in order as `?1..?n`.
pub fn insert(table: &str, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

/// `SELECT` of the first row, in store order, whose `column` equals `?1`.
pub fn select_by(table: &str, columns: &[&str], column: &str) -> String {
    format!(
        "SELECT {} FROM {table} WHERE {column} = ?1 ORDER BY rowid LIMIT 1",
        columns.join(", ")
    )
}

/// `SELECT` of every row whose id is one of `?1..?count`, in store order.
///
/// `rowid` follows the record columns so results of several statements can be
/// merged back into store order. `count` must not exceed [`MAX_BOUND_IDS`].
pub fn select_by_ids(table: &str, columns: &[&str], count: usize) -> String {
    let placeholders = (1..=count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "SELECT {}, rowid FROM {table} WHERE {ID_COLUMN} IN ({placeholders}) ORDER BY rowid",
        columns.join(", ")
    )
}

/// `UPDATE` keyed on `?1`, setting every column except the id and
/// `created_at` to `?2..`, in column order.
pub fn update(table: &str, columns: &[&str]) -> String {
    let assignments = updatable_columns(columns)
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {table} SET {assignments} WHERE {ID_COLUMN} = ?1")
}

/// Columns written by [`update`], in order.
pub fn updatable_columns<'a>(columns: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    columns
        .iter()
        .copied()
        .filter(|c| *c != ID_COLUMN && *c != CREATED_AT_COLUMN)
}

pub fn delete(table: &str) -> String {
    format!("DELETE FROM {table} WHERE {ID_COLUMN} = ?1")
}

/// Builds the `WHERE` clause shared by the search and count queries.
///
/// The match is an ASCII case-insensitive literal substring test, the same
/// rule the in-memory pipeline applies.
fn filter_clause(filter_column: Option<&str>) -> String {
    match filter_column {
        Some(column) => format!(" WHERE instr(lower({column}), lower(?1)) > 0"),
        None => String::new(),
    }
}

/// One page of rows.
///
/// Binds the filter as `?1` when `filter_column` is set, followed by
/// `LIMIT` and `OFFSET`. Ties, and the unsorted order, follow `rowid`,
/// which is insertion order.
pub fn search(
    table: &str,
    columns: &[&str],
    filter_column: Option<&str>,
    order: Option<(&str, SortDirection)>,
) -> String {
    let next = if filter_column.is_some() { 2 } else { 1 };
    let order_by = match order {
        Some((column, direction)) => format!(
            "{column} {}, rowid ASC",
            direction.as_str().to_ascii_uppercase()
        ),
        None => "rowid ASC".to_string(),
    };
    format!(
        "SELECT {} FROM {table}{} ORDER BY {order_by} LIMIT ?{} OFFSET ?{}",
        columns.join(", "),
        filter_clause(filter_column),
        next,
        next + 1
    )
}

/// Number of rows matching the filter, bound as `?1` when set.
pub fn count(table: &str, filter_column: Option<&str>) -> String {
    format!(
        "SELECT COUNT(*) FROM {table}{}",
        filter_clause(filter_column)
    )
}
