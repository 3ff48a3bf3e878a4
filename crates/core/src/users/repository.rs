use async_trait::async_trait;

use crate::storage::{Repository, Result};

use super::{CreateUserTokenProps, User, UserToken};

/// User-specific lookups on top of the generic repository contract.
#[async_trait]
pub trait UsersRepository: Repository<User> {
    /// Gets the user registered with exactly this email.
    async fn find_by_email(&self, email: &str) -> Result<User> {
        self.find_by_unique_field(email).await
    }

    /// Fails with `Conflict` if another user already registered this email.
    async fn conflicting_email(&self, email: &str) -> Result<()> {
        self.conflicting_field(email).await
    }
}

impl<T: Repository<User> + ?Sized> UsersRepository for T {}

/// Token issuing and lookup on top of the generic repository contract.
#[async_trait]
pub trait UserTokensRepository: Repository<UserToken> {
    /// Issues and stores a new token for an existing user.
    ///
    /// Fails with `NotFound` if `user_id` does not exist in `users`.
    async fn generate(&self, users: &dyn Repository<User>, user_id: &str) -> Result<UserToken> {
        let user = users.find_by_id(user_id).await?;
        let token = self.create(CreateUserTokenProps { user_id: user.id });
        self.insert(token).await
    }

    /// Gets the token record with exactly this token value.
    async fn find_by_token(&self, token: &str) -> Result<UserToken> {
        self.find_by_unique_field(token).await
    }
}

impl<T: Repository<UserToken> + ?Sized> UserTokensRepository for T {}
