use serde::{Deserialize, Serialize};

/// A user entity as seen by authentication adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    #[serde(default = "activated_by_default")]
    pub activated: bool,
    #[serde(default)]
    pub banned: bool,
}

fn activated_by_default() -> bool {
    true
}

impl User {
    /// An activated, non-banned user.
    pub fn new(id: u64, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self { id, username: username.into(), email: email.into(), activated: true, banned: false }
    }

    /// Whether the user may hold an authenticated session.
    pub fn can_log_in(&self) -> bool {
        self.activated && !self.banned
    }
}

/// Outcome of an attempt to authenticate a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginStatus {
    Ok,
    NotActivated,
    Banned,
    InvalidCredentials,
}

impl LoginStatus {
    pub fn for_user(user: &User) -> Self {
        if user.banned {
            LoginStatus::Banned
        } else if !user.activated {
            LoginStatus::NotActivated
        } else {
            LoginStatus::Ok
        }
    }

    pub fn is_ok(self) -> bool {
        self == LoginStatus::Ok
    }
}
