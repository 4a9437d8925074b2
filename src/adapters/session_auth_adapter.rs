//! Authentication adapter that remembers the user id in the session.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{AppError, LoginStatus, Session, User};
use crate::ports::{AuthAdapter, UserRepository};

pub const DEFAULT_ADAPTER_NAME: &str = "session";
pub const DEFAULT_AUTH_KEY: &str = "gatekeeper_auth_key";

pub struct SessionAuthAdapter<R: UserRepository> {
    name: String,
    auth_key: String,
    session: Arc<Session>,
    users: R,
}

impl<R: UserRepository> SessionAuthAdapter<R> {
    pub fn new(session: Arc<Session>, users: R) -> Self {
        Self {
            name: DEFAULT_ADAPTER_NAME.to_string(),
            auth_key: DEFAULT_AUTH_KEY.to_string(),
            session,
            users,
        }
    }

    /// Register under a different adapter name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Store the user id under a different session key.
    pub fn with_auth_key(mut self, auth_key: impl Into<String>) -> Self {
        self.auth_key = auth_key.into();
        self
    }

    /// Authenticate `user` without checking credentials.
    ///
    /// The session id and CSRF token are regenerated on success.
    pub fn login_as(&self, user: &User) -> LoginStatus {
        let status = LoginStatus::for_user(user);
        if status.is_ok() {
            self.session.regenerate_id(false);
            self.session.regenerate_token();
            self.session.put(&self.auth_key, user.id);
            tracing::debug!("user {} logged in through adapter '{}'", user.id, self.name);
        }
        status
    }

    /// Authenticate by username or email.
    pub fn login_by_identifier(&self, identifier: &str) -> Result<LoginStatus, AppError> {
        Ok(match self.users.find_by_identifier(identifier)? {
            Some(user) => self.login_as(&user),
            None => LoginStatus::InvalidCredentials,
        })
    }
}

impl<R: UserRepository> AuthAdapter for SessionAuthAdapter<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn user(&self) -> Result<Option<User>, AppError> {
        let Some(id) = self.session.get(&self.auth_key).as_ref().and_then(Value::as_u64) else {
            return Ok(None);
        };

        Ok(self.users.find_by_id(id)?.filter(User::can_log_in))
    }

    fn logout(&self) -> Result<(), AppError> {
        self.session.regenerate_id(false);
        self.session.regenerate_token();
        self.session.remove(&self.auth_key);
        Ok(())
    }
}
