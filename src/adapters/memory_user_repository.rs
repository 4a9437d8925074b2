use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{AppError, User};
use crate::ports::UserRepository;

/// In-process user repository. Clones share the same users.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<BTreeMap<u64, User>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repository = Self::new();
        for user in users {
            repository.insert(user);
        }
        repository
    }

    /// Insert or replace a user.
    pub fn insert(&self, user: User) {
        self.users.write().insert(user.id, user);
    }
}

impl UserRepository for MemoryUserRepository {
    fn find_by_id(&self, id: u64) -> Result<Option<User>, AppError> {
        Ok(self.users.read().get(&id).cloned())
    }

    fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|user| user.username == identifier || user.email.eq_ignore_ascii_case(identifier))
            .cloned())
    }
}
