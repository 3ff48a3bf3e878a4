use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{generate_id, timestamp_now, Record, SearchSchema, SortDirection};

/// An opaque token issued to a user (e.g. for password resets).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    pub id: String,
    /// Random token value. Unique across tokens.
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input fields for creating a user token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserTokenProps {
    pub user_id: String,
}

impl UserToken {
    /// Creates a new token for `user_id` with a fresh ID, token value and timestamps.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            id: generate_id(),
            token: generate_id(),
            user_id: user_id.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

fn filter_token(token: &UserToken) -> &str {
    &token.token
}

fn compare_created_at(a: &UserToken, b: &UserToken) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

fn compare_updated_at(a: &UserToken, b: &UserToken) -> Ordering {
    a.updated_at.cmp(&b.updated_at)
}

impl Record for UserToken {
    const ENTITY_TYPE: &'static str = "UserToken";
    const UNIQUE_FIELD: &'static str = "token";

    type CreateProps = CreateUserTokenProps;

    fn create(props: CreateUserTokenProps) -> Self {
        UserToken::new(props.user_id)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_value(&self) -> &str {
        &self.token
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    fn search_schema() -> SearchSchema<Self> {
        SearchSchema::new("token", filter_token)
            .sortable("created_at", compare_created_at)
            .sortable("updated_at", compare_updated_at)
            .with_default_sort("created_at", SortDirection::Desc)
    }
}
