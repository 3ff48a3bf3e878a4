mod repository;
mod tokens;
mod types;

pub use repository::{UserTokensRepository, UsersRepository};
pub use tokens::{CreateUserTokenProps, UserToken};
pub use types::{CreateUserProps, User};
