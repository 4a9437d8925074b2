use crate::domain::{AppError, User};

/// A named authentication scheme exposing the current user.
pub trait AuthAdapter: Send + Sync {
    /// Name the adapter is registered under in the gatekeeper.
    fn name(&self) -> &str;

    /// The authenticated user, or `None` for guests.
    fn user(&self) -> Result<Option<User>, AppError>;

    fn is_logged_in(&self) -> Result<bool, AppError> {
        Ok(self.user()?.is_some())
    }

    fn is_guest(&self) -> Result<bool, AppError> {
        Ok(!self.is_logged_in()?)
    }

    /// Forget the authenticated user.
    fn logout(&self) -> Result<(), AppError>;
}
