//! Session state for a single request.
//!
//! Flash values written during one request are readable during the next
//! one only. On start, the pending flash table saved by the previous request
//! becomes the readable flash set and a fresh pending table is created.

mod tokens;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::domain::AppError;
use crate::domain::config::lookup::ensure_table;
use crate::domain::encoding::random_token;
use crate::ports::{SessionData, SessionStore};

pub use tokens::MAX_ONE_TIME_TOKENS;

/// Session key holding flash values for the next request.
pub const FLASH_KEY: &str = "porter.flashdata";
/// Session key holding the CSRF token.
pub const TOKEN_KEY: &str = "porter.token";
/// Session key holding outstanding one-time tokens.
pub const ONE_TIME_TOKENS_KEY: &str = "porter.tokens";

struct SessionState {
    id: String,
    data: SessionData,
    flash: SessionData,
    stale_id: Option<String>,
    destroyed: bool,
}

/// A started session. Changes are persisted by [`Session::commit`].
pub struct Session {
    store: Arc<dyn SessionStore>,
    ttl: Duration,
    state: Mutex<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id()).field("ttl", &self.ttl).finish()
    }
}

impl Session {
    /// Start the session `id`, or a new one when `id` is absent or malformed.
    pub fn start(
        store: Arc<dyn SessionStore>,
        id: Option<&str>,
        ttl: Duration,
    ) -> Result<Self, AppError> {
        let id = match id {
            Some(id) if is_valid_id(id) => id.to_string(),
            _ => random_token(),
        };

        let mut data = store.read(&id)?;
        let flash = match data.remove(FLASH_KEY) {
            Some(Value::Object(flash)) => flash,
            _ => Map::new(),
        };
        data.insert(FLASH_KEY.to_string(), Value::Object(Map::new()));

        Ok(Self {
            store,
            ttl,
            state: Mutex::new(SessionState { id, data, flash, stale_id: None, destroyed: false }),
        })
    }

    pub fn id(&self) -> String {
        self.state.lock().id.clone()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Switch to a fresh session id, keeping the data.
    ///
    /// Unless `keep_old` is set, the old id is deleted from the store on commit.
    pub fn regenerate_id(&self, keep_old: bool) -> String {
        let mut state = self.state.lock();
        let old = std::mem::replace(&mut state.id, random_token());
        if !keep_old && state.stale_id.is_none() {
            state.stale_id = Some(old);
        }
        state.id.clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().data.get(key).cloned()
    }

    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get(key).unwrap_or_else(|| default.into())
    }

    pub fn put(&self, key: &str, value: impl Into<Value>) {
        self.state.lock().data.insert(key.to_string(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.state.lock().data.contains_key(key)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.state.lock().data.remove(key)
    }

    /// Snapshot of all session data.
    pub fn all(&self) -> SessionData {
        self.state.lock().data.clone()
    }

    /// Remove everything, including flash values and tokens.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.data.clear();
        state.data.insert(FLASH_KEY.to_string(), Value::Object(Map::new()));
        state.flash.clear();
    }

    /// Store a flash value for the next request.
    pub fn put_flash(&self, key: &str, value: impl Into<Value>) {
        let mut state = self.state.lock();
        pending_flash(&mut state.data).insert(key.to_string(), value.into());
    }

    /// Flash value carried over from the previous request.
    pub fn get_flash(&self, key: &str) -> Option<Value> {
        self.state.lock().flash.get(key).cloned()
    }

    pub fn get_flash_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.get_flash(key).unwrap_or_else(|| default.into())
    }

    pub fn has_flash(&self, key: &str) -> bool {
        self.state.lock().flash.contains_key(key)
    }

    pub fn remove_flash(&self, key: &str) -> Option<Value> {
        self.state.lock().flash.remove(key)
    }

    /// Keep flash values from the previous request for one more request.
    ///
    /// With `keys` set, only those values are kept.
    pub fn reflash(&self, keys: Option<&[&str]>) {
        let mut state = self.state.lock();
        let carried: Vec<(String, Value)> = state
            .flash
            .iter()
            .filter(|(key, _)| keys.is_none_or(|keys| keys.contains(&key.as_str())))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let pending = pending_flash(&mut state.data);
        for (key, value) in carried {
            pending.entry(key).or_insert(value);
        }
    }

    /// Flash values queued for the next request.
    pub fn flash_data(&self) -> SessionData {
        match self.state.lock().data.get(FLASH_KEY) {
            Some(Value::Object(pending)) => pending.clone(),
            _ => Map::new(),
        }
    }

    /// Persist the session. Destroyed sessions are not written.
    pub fn commit(&self) -> Result<(), AppError> {
        let mut state = self.state.lock();
        if state.destroyed {
            return Ok(());
        }

        if let Some(stale) = state.stale_id.take() {
            self.store.delete(&stale)?;
        }
        self.store.write(&state.id, &state.data, self.ttl)?;
        tracing::debug!("committed session {} ({} keys)", short_id(&state.id), state.data.len());
        Ok(())
    }

    /// Delete the session from the store and discard its data.
    pub fn destroy(&self) -> Result<(), AppError> {
        let mut state = self.state.lock();
        self.store.delete(&state.id)?;
        if let Some(stale) = state.stale_id.take() {
            self.store.delete(&stale)?;
        }
        state.data.clear();
        state.flash.clear();
        state.destroyed = true;
        Ok(())
    }
}

fn pending_flash(data: &mut SessionData) -> &mut Map<String, Value> {
    ensure_table(data.entry(FLASH_KEY.to_string()).or_insert(Value::Null))
}

/// Session ids are ASCII alphanumeric so that stores can use them as file names.
pub fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.len() <= 128 && id.chars().all(|c| c.is_ascii_alphanumeric())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
