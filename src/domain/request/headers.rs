use std::collections::BTreeMap;

/// Request headers with case-insensitive names.
#[derive(Debug, Clone, Default)]
pub struct Headers {
    values: BTreeMap<String, Vec<String>>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value. Existing values under the same name are kept.
    pub fn add(&mut self, name: &str, value: impl Into<String>) {
        self.values.entry(normalize(name)).or_default().push(value.into());
    }

    /// Replace all values under `name`.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(normalize(name), vec![value.into()]);
    }

    /// First value of the header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&normalize(name)).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Every value sent under `name`.
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values.get(&normalize(name)).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(&normalize(name))
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(&normalize(name));
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// `Content_Type`, `content-type` and `CONTENT-TYPE` all name the same header.
fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}
