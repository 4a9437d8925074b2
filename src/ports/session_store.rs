use std::time::Duration;

use serde_json::{Map, Value};

use crate::domain::AppError;

/// Key/value payload of one session.
pub type SessionData = Map<String, Value>;

/// Persistence for session payloads, keyed by session id.
pub trait SessionStore: Send + Sync {
    /// Load a session. Unknown or expired ids yield an empty payload.
    fn read(&self, id: &str) -> Result<SessionData, AppError>;

    /// Persist a session payload for at least `ttl`.
    fn write(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<(), AppError>;

    /// Remove a session. Removing an unknown id is not an error.
    fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Drop sessions untouched for longer than `max_lifetime`. Returns how many were removed.
    fn gc(&self, max_lifetime: Duration) -> Result<usize, AppError>;
}
