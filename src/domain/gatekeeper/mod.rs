//! Registry of named authentication adapters.

mod user;

use std::collections::BTreeMap;
use std::fmt;

use crate::domain::AppError;
use crate::ports::AuthAdapter;

pub use user::{LoginStatus, User};

/// Maps adapter names to adapters and remembers which one is the default.
pub struct Gatekeeper {
    default: String,
    adapters: BTreeMap<String, Box<dyn AuthAdapter>>,
}

impl fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("default", &self.default)
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Gatekeeper {
    /// Create a gatekeeper whose default adapter is `adapter`.
    pub fn new(adapter: Box<dyn AuthAdapter>) -> Self {
        let default = adapter.name().to_string();
        let mut adapters = BTreeMap::new();
        adapters.insert(default.clone(), adapter);
        Self { default, adapters }
    }

    pub fn with_adapter(mut self, adapter: Box<dyn AuthAdapter>) -> Self {
        self.register(adapter);
        self
    }

    /// Register an adapter under its name, replacing any adapter with the same name.
    pub fn register(&mut self, adapter: Box<dyn AuthAdapter>) {
        self.adapters.insert(adapter.name().to_string(), adapter);
    }

    /// Make a registered adapter the default.
    pub fn use_as_default(&mut self, name: &str) -> Result<(), AppError> {
        if !self.adapters.contains_key(name) {
            return Err(AppError::AdapterNotFound(name.to_string()));
        }
        self.default = name.to_string();
        Ok(())
    }

    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// The adapter named `name`, or the default adapter.
    pub fn adapter(&self, name: Option<&str>) -> Result<&dyn AuthAdapter, AppError> {
        let name = name.unwrap_or(self.default.as_str());
        self.adapters
            .get(name)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| AppError::AdapterNotFound(name.to_string()))
    }
}
