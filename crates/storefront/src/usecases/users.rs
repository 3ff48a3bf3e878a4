use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::storage::{PaginationOutput, Repository, SearchParams};
use storefront_core::users::{CreateUserProps, User, UsersRepository};

use super::{require, Result, UseCaseError};

/// Largest accepted avatar upload, in bytes (3 MiB).
pub const MAX_AVATAR_SIZE: u64 = 3 * 1024 * 1024;

/// Content types accepted for avatars.
pub const ACCEPTED_AVATAR_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Registers a user under an email no other user has.
///
/// `password` must already be hashed by the caller.
pub struct CreateUser {
    users: Arc<dyn Repository<User>>,
}

impl CreateUser {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, input: CreateUserProps) -> Result<User> {
        require("name", &input.name)?;
        require("email", &input.email)?;
        require("password", &input.password)?;

        self.users.conflicting_email(&input.email).await?;

        let user = self.users.create(input);
        let user = self.users.insert(user).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }
}

pub struct SearchUsers {
    users: Arc<dyn Repository<User>>,
}

impl SearchUsers {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, params: SearchParams) -> Result<PaginationOutput<User>> {
        let result = self.users.search(params).await?;
        Ok(result.into_pagination())
    }
}

/// Metadata of an uploaded avatar image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAvatarInput {
    pub user_id: String,
    pub filename: String,
    pub filesize: u64,
    pub filetype: String,
}

/// Records a new avatar file name on a user.
///
/// The stored name is prefixed with a fresh UUID so uploads never collide.
/// Moving the file bytes to object storage is the caller's concern.
pub struct UpdateAvatar {
    users: Arc<dyn Repository<User>>,
}

impl UpdateAvatar {
    pub fn new(users: Arc<dyn Repository<User>>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, input: UpdateAvatarInput) -> Result<User> {
        if !ACCEPTED_AVATAR_TYPES.contains(&input.filetype.as_str()) {
            return Err(UseCaseError::InvalidInput(
                "Invalid file type, only .jpeg, .jpg, .png and .webp are accepted".to_string(),
            ));
        }
        if input.filesize > MAX_AVATAR_SIZE {
            return Err(UseCaseError::InvalidInput(
                "File size must be less than 3MB".to_string(),
            ));
        }

        let mut user = self.users.find_by_id(&input.user_id).await?;
        user.avatar = Some(format!("{}-{}", Uuid::new_v4(), input.filename));
        user.touch();

        let user = self.users.update(user).await?;
        tracing::info!(user_id = %user.id, avatar = ?user.avatar, "Avatar updated");
        Ok(user)
    }
}
