use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::domain::AppError;
use crate::domain::session::is_valid_id;
use crate::ports::{SessionData, SessionStore};

/// On-disk layout of one session file.
#[derive(Serialize, Deserialize)]
struct SessionFile {
    /// Milliseconds since the Unix epoch.
    expires_at: u64,
    data: SessionData,
}

/// Session store keeping one JSON file per session id.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    /// Use `root` as the session directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn session_path(&self, id: &str) -> Result<PathBuf, AppError> {
        if !is_valid_id(id) {
            return Err(AppError::SessionStore(format!("Invalid session id '{}'", id)));
        }
        Ok(self.root.join(id))
    }
}

impl SessionStore for FileSessionStore {
    fn read(&self, id: &str) -> Result<SessionData, AppError> {
        let path = self.session_path(id)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(SessionData::new()),
            Err(err) => return Err(err.into()),
        };

        let file: SessionFile = serde_json::from_str(&content).map_err(|err| {
            AppError::SessionStore(format!("Corrupt session file {}: {}", path.display(), err))
        })?;
        if file.expires_at <= now_millis() {
            return Ok(SessionData::new());
        }
        Ok(file.data)
    }

    fn write(&self, id: &str, data: &SessionData, ttl: Duration) -> Result<(), AppError> {
        let path = self.session_path(id)?;
        let ttl = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let file = SessionFile { expires_at: now_millis().saturating_add(ttl), data: data.clone() };
        let content = serde_json::to_string(&file)
            .map_err(|err| AppError::SessionStore(format!("Failed to encode session: {}", err)))?;
        fs::write(path, content)?;
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), AppError> {
        let path = self.session_path(id)?;
        match fs::remove_file(path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn gc(&self, max_lifetime: Duration) -> Result<usize, AppError> {
        let now = SystemTime::now();
        let mut removed = 0;

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let age = now.duration_since(metadata.modified()?).unwrap_or_default();
            if age > max_lifetime {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(
                "removed {} expired session file(s) from {}",
                removed,
                self.root.display()
            );
        }
        Ok(removed)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileSessionStore) {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("sessions")).unwrap();
        (dir, store)
    }

    #[test]
    fn sessions_round_trip_through_files() {
        let (_dir, store) = store();
        let mut data = SessionData::new();
        data.insert("cart".into(), json!(["a", "b"]));

        store.write("abc123", &data, Duration::from_secs(60)).unwrap();
        assert!(store.root().join("abc123").is_file());
        assert_eq!(store.read("abc123").unwrap(), data);

        store.delete("abc123").unwrap();
        store.delete("abc123").unwrap();
        assert!(store.read("abc123").unwrap().is_empty());
    }

    #[test]
    fn ids_that_could_escape_the_directory_are_rejected() {
        let (_dir, store) = store();
        assert!(matches!(store.read("../secrets"), Err(AppError::SessionStore(_))));
        assert!(matches!(
            store.write("a/b", &SessionData::new(), Duration::ZERO),
            Err(AppError::SessionStore(_))
        ));
    }

    #[test]
    fn corrupt_files_are_reported() {
        let (_dir, store) = store();
        fs::write(store.root().join("broken"), "not json").unwrap();
        assert!(matches!(store.read("broken"), Err(AppError::SessionStore(_))));
    }

    #[test]
    fn expired_sessions_read_as_empty() {
        let (_dir, store) = store();
        let mut data = SessionData::new();
        data.insert("user".into(), json!(7));

        store.write("stale", &data, Duration::ZERO).unwrap();
        assert!(store.root().join("stale").is_file());
        assert!(store.read("stale").unwrap().is_empty());

        store.write("fresh", &data, Duration::from_secs(60)).unwrap();
        assert_eq!(store.read("fresh").unwrap(), data);
    }

    #[test]
    fn gc_keeps_recent_sessions() {
        let (_dir, store) = store();
        store.write("recent", &SessionData::new(), Duration::from_secs(60)).unwrap();

        assert_eq!(store.gc(Duration::from_secs(3600)).unwrap(), 0);
        assert!(store.root().join("recent").is_file());
    }
}
