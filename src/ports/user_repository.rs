use crate::domain::{AppError, User};

/// Lookup of user entities for authentication adapters.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: u64) -> Result<Option<User>, AppError>;

    /// Find a user by username or email.
    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError>;
}
