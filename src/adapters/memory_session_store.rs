use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::domain::AppError;
use crate::ports::{SessionData, SessionStore};

#[derive(Debug, Clone)]
struct StoredSession {
    data: SessionData,
    written_at: Instant,
    ttl: Duration,
}

/// In-process session store. Clones share the same sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, StoredSession>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn read(&self, id: &str) -> Result<SessionData, AppError> {
        let sessions = self.sessions.lock();
        Ok(sessions
            .get(id)
            .filter(|stored| stored.written_at.elapsed() <= stored.ttl)
            .map(|stored| stored.data.clone())
            .unwrap_or_default())
    }

    fn write(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<(), AppError> {
        self.sessions.lock().insert(
            id.to_string(),
            StoredSession { data: data.clone(), written_at: Instant::now(), ttl },
        );
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        self.sessions.lock().remove(id);
        Ok(())
    }

    fn gc(&self, max_lifetime: Duration) -> Result<usize, AppError> {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, stored| stored.written_at.elapsed() <= max_lifetime);
        Ok(before - sessions.len())
    }
}
