//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

use storefront_core::products::Product;
use storefront_core::storage::Record;
use storefront_core::users::{User, UserToken};

/// A record type with a table in the SQLite backend.
///
/// `COLUMNS` starts with `id`. [`SqliteRecord::to_values`] and
/// [`SqliteRecord::from_row`] both follow the order of `COLUMNS`.
pub trait SqliteRecord: Record {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    fn to_values(&self) -> Vec<Value>;
}

// ============================================================================
// Product conversions
// ============================================================================

impl SqliteRecord for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "price",
        "quantity",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at: String = row.get(4)?;
        let updated_at: String = row.get(5)?;

        Ok(Product {
            id: row.get(0)?,
            name: row.get(1)?,
            price: row.get(2)?,
            quantity: row.get(3)?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.clone()),
            Value::from(self.name.clone()),
            Value::Real(self.price),
            Value::Integer(i64::from(self.quantity)),
            Value::from(format_datetime(&self.created_at)),
            Value::from(format_datetime(&self.updated_at)),
        ]
    }
}

// ============================================================================
// User conversions
// ============================================================================

impl SqliteRecord for User {
    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "password",
        "avatar",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at: String = row.get(5)?;
        let updated_at: String = row.get(6)?;

        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            avatar: row.get(4)?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.clone()),
            Value::from(self.name.clone()),
            Value::from(self.email.clone()),
            Value::from(self.password.clone()),
            Value::from(self.avatar.clone()),
            Value::from(format_datetime(&self.created_at)),
            Value::from(format_datetime(&self.updated_at)),
        ]
    }
}

// ============================================================================
// User token conversions
// ============================================================================

impl SqliteRecord for UserToken {
    const TABLE: &'static str = "user_tokens";
    const COLUMNS: &'static [&'static str] =
        &["id", "token", "user_id", "created_at", "updated_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let created_at: String = row.get(3)?;
        let updated_at: String = row.get(4)?;

        Ok(UserToken {
            id: row.get(0)?,
            token: row.get(1)?,
            user_id: row.get(2)?,
            created_at: parse_datetime(&created_at)?,
            updated_at: parse_datetime(&updated_at)?,
        })
    }

    fn to_values(&self) -> Vec<Value> {
        vec![
            Value::from(self.id.clone()),
            Value::from(self.token.clone()),
            Value::from(self.user_id.clone()),
            Value::from(format_datetime(&self.created_at)),
            Value::from(format_datetime(&self.updated_at)),
        ]
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Format a DateTime<Utc> as fixed-width RFC 3339 with nanoseconds and `Z`.
///
/// Every stored timestamp has the same width, so comparing the text compares
/// the instants. Nothing below the nanosecond exists, so the value is lossless.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse an RFC 3339 string into a DateTime<Utc>.
pub fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}
