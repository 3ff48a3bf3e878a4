use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{generate_id, timestamp_now, Record, SearchSchema, SortDirection};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    /// Unique across users.
    pub email: String,
    /// Password hash. Hashing happens before the value reaches the repository.
    #[serde(skip_serializing)]
    pub password: String,
    /// Stored avatar file name, if one was uploaded.
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input fields for creating a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserProps {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// Creates a new user with a fresh ID and timestamps.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: generate_id(),
            name: name.into(),
            email: email.into(),
            password: password.into(),
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific creation time for this user (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = created_at;
        self
    }

    /// Marks the user as modified now.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now();
    }
}

fn filter_name(user: &User) -> &str {
    &user.name
}

fn compare_name(a: &User, b: &User) -> Ordering {
    a.name.cmp(&b.name)
}

fn compare_email(a: &User, b: &User) -> Ordering {
    a.email.cmp(&b.email)
}

fn compare_created_at(a: &User, b: &User) -> Ordering {
    a.created_at.cmp(&b.created_at)
}

impl Record for User {
    const ENTITY_TYPE: &'static str = "User";
    const UNIQUE_FIELD: &'static str = "email";

    type CreateProps = CreateUserProps;

    fn create(props: CreateUserProps) -> Self {
        User::new(props.name, props.email, props.password)
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_value(&self) -> &str {
        &self.email
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_created_at(&mut self, created_at: DateTime<Utc>) {
        self.created_at = created_at;
    }

    fn search_schema() -> SearchSchema<Self> {
        SearchSchema::new("name", filter_name)
            .sortable("name", compare_name)
            .sortable("email", compare_email)
            .sortable("created_at", compare_created_at)
            .with_default_sort("created_at", SortDirection::Desc)
    }
}
