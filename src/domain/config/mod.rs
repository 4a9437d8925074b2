//! Configuration store.
//!
//! Keys are dotted paths whose first segment names a group. Each group is
//! read lazily from `<config dir>/<group>.toml` the first time one of its
//! keys is touched. When an environment is set, `<config dir>/<env>/<group>.toml`
//! is merged over the base file.

pub(crate) mod lookup;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::AppError;

const CONFIG_EXTENSION: &str = "toml";

/// Lazily loaded, mutable configuration store.
#[derive(Debug)]
pub struct Config {
    path: PathBuf,
    environment: Option<String>,
    groups: Mutex<BTreeMap<String, Value>>,
}

impl Config {
    /// Create a store reading group files from `path`.
    pub fn new(path: impl Into<PathBuf>, environment: Option<String>) -> Self {
        Self { path: path.into(), environment, groups: Mutex::new(BTreeMap::new()) }
    }

    /// Directory the group files are read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// Get the value at `key`, or `None` when it is unset.
    ///
    /// A bare group name returns the whole group table. An empty group is unset.
    pub fn get(&self, key: &str) -> Result<Option<Value>, AppError> {
        let (group, rest) = split_key(key)?;
        self.ensure_loaded(group)?;

        let groups = self.groups.lock();
        let Some(table) = groups.get(group) else { return Ok(None) };
        Ok(match rest {
            Some(path) => lookup::get_path(table, path).cloned(),
            None if is_empty_table(table) => None,
            None => Some(table.clone()),
        })
    }

    /// Get the value at `key`, falling back to `default` when it is unset.
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Result<Value, AppError> {
        Ok(self.get(key)?.unwrap_or_else(|| default.into()))
    }

    /// Get the value at `key` deserialized into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        self.get(key)?
            .map(|value| {
                serde_json::from_value(value).map_err(|err| {
                    AppError::config_error(format!("Config key '{}' has wrong type: {}", key, err))
                })
            })
            .transpose()
    }

    pub fn has(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.get(key)?.is_some())
    }

    /// Set `key` to `value` for the lifetime of this store. Nothing is written to disk.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<(), AppError> {
        let (group, rest) = split_key(key)?;
        self.ensure_loaded(group)?;

        let mut groups = self.groups.lock();
        let table = groups.entry(group.to_string()).or_insert_with(empty_table);
        match rest {
            Some(path) => lookup::set_path(table, path, value.into()),
            None => *table = value.into(),
        }
        Ok(())
    }

    /// Set several keys at once.
    pub fn set_many<I, K, V>(&self, entries: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in entries {
            self.set(key.as_ref(), value)?;
        }
        Ok(())
    }

    /// Remove `key`. Returns whether a value was present.
    pub fn remove(&self, key: &str) -> Result<bool, AppError> {
        let (group, rest) = split_key(key)?;
        self.ensure_loaded(group)?;

        let mut groups = self.groups.lock();
        Ok(match rest {
            Some(path) => {
                groups.get_mut(group).is_some_and(|table| lookup::remove_path(table, path))
            }
            // Keep the group loaded so its file is not read again.
            None => groups.get_mut(group).is_some_and(|table| {
                let present = !is_empty_table(table);
                *table = empty_table();
                present
            }),
        })
    }

    /// Names of the groups read so far.
    pub fn loaded_groups(&self) -> Vec<String> {
        self.groups.lock().keys().cloned().collect()
    }

    fn ensure_loaded(&self, group: &str) -> Result<(), AppError> {
        if self.groups.lock().contains_key(group) {
            return Ok(());
        }

        let table = self.read_group(group)?;
        self.groups.lock().entry(group.to_string()).or_insert(table);
        Ok(())
    }

    fn read_group(&self, group: &str) -> Result<Value, AppError> {
        let file_name = format!("{}.{}", group, CONFIG_EXTENSION);
        let mut table = read_table(&self.path.join(&file_name))?.unwrap_or_else(empty_table);

        if let Some(environment) = &self.environment {
            if let Some(overrides) = read_table(&self.path.join(environment).join(&file_name))? {
                tracing::debug!("applying '{}' overrides to config group '{}'", environment, group);
                lookup::merge(&mut table, overrides);
            }
        }

        tracing::debug!("loaded config group '{}' from {}", group, self.path.display());
        Ok(table)
    }
}

fn read_table(path: &Path) -> Result<Option<Value>, AppError> {
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let table: Value = toml::from_str(&content).map_err(|err| AppError::ConfigParse {
        file: path.display().to_string(),
        details: err.to_string(),
    })?;
    Ok(Some(table))
}

fn empty_table() -> Value {
    Value::Object(Map::new())
}

fn is_empty_table(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

fn split_key(key: &str) -> Result<(&str, Option<&str>), AppError> {
    let (group, rest) = match key.split_once('.') {
        Some((group, rest)) => (group, Some(rest)),
        None => (key, None),
    };

    let valid_group = !group.is_empty()
        && group.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid_group || rest.is_some_and(|path| path.split('.').any(str::is_empty)) {
        return Err(AppError::config_error(format!("Invalid config key '{}'", key)));
    }
    Ok((group, rest))
}
