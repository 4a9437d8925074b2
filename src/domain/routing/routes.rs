use std::collections::BTreeMap;

use serde_json::Value;

use crate::domain::AppError;

/// A named URL pattern such as `/articles/{id}/{slug}?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    pattern: String,
}

impl Route {
    pub fn new(name: impl Into<String>, pattern: &str) -> Self {
        Self { name: name.into(), pattern: format!("/{}", pattern.trim_start_matches('/')) }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Substitute `{param}` and `{param}?` placeholders.
    ///
    /// Optional placeholders without a value are dropped together with the
    /// slash in front of them. Values are inserted verbatim.
    pub fn expand(&self, params: &[(&str, &str)]) -> Result<String, AppError> {
        let mut expanded = String::with_capacity(self.pattern.len());
        let mut rest = self.pattern.as_str();

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|offset| open + offset) else { break };
            let name = &rest[open + 1..close];
            let optional = rest[close + 1..].starts_with('?');
            let literal = &rest[..open];

            match params.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => {
                    expanded.push_str(literal);
                    expanded.push_str(value);
                }
                None if optional => {
                    expanded.push_str(literal.strip_suffix('/').unwrap_or(literal));
                }
                None => {
                    return Err(AppError::MissingRouteParameter {
                        route: self.name.clone(),
                        parameter: name.to_string(),
                    });
                }
            }

            rest = &rest[close + 1 + usize::from(optional)..];
        }
        expanded.push_str(rest);

        if expanded.is_empty() {
            expanded.push('/');
        }
        Ok(expanded)
    }
}

/// Registry of named routes.
#[derive(Debug, Clone, Default)]
pub struct Routes {
    named: BTreeMap<String, Route>,
}

impl Routes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, pattern: &str) -> Result<(), AppError> {
        if self.named.contains_key(name) {
            return Err(AppError::DuplicateRoute(name.to_string()));
        }
        self.named.insert(name.to_string(), Route::new(name, pattern));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Route, AppError> {
        self.named.get(name).ok_or_else(|| AppError::RouteNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.named.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.named.values()
    }

    pub fn len(&self) -> usize {
        self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty()
    }

    /// Build from a config table mapping route names to patterns.
    ///
    /// ```toml
    /// "articles.show" = "/articles/{id}"
    /// ```
    pub fn from_config(table: &Value) -> Result<Self, AppError> {
        let table = table
            .as_object()
            .ok_or_else(|| AppError::config_error("Route configuration must be a table"))?;

        let mut routes = Self::new();
        for (name, pattern) in table {
            let pattern = pattern.as_str().ok_or_else(|| {
                AppError::config_error(format!("Pattern of route '{}' must be a string", name))
            })?;
            routes.add(name, pattern)?;
        }
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expand_substitutes_required_and_optional_placeholders() {
        let route = Route::new("articles.show", "/articles/{id}/{slug}?");

        assert_eq!(route.expand(&[("id", "5"), ("slug", "hello")]).unwrap(), "/articles/5/hello");
        assert_eq!(route.expand(&[("id", "5")]).unwrap(), "/articles/5");
    }

    #[test]
    fn expand_rejects_missing_required_placeholders() {
        let route = Route::new("articles.show", "/articles/{id}");

        let err = route.expand(&[("slug", "x")]).unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingRouteParameter { ref route, ref parameter }
                if route == "articles.show" && parameter == "id"
        ));
    }

    #[test]
    fn patterns_without_placeholders_are_returned_as_is() {
        assert_eq!(Route::new("home", "").expand(&[]).unwrap(), "/");
        assert_eq!(Route::new("about", "about").expand(&[]).unwrap(), "/about");
        assert_eq!(Route::new("root-opt", "/{page}?").expand(&[]).unwrap(), "/");
    }

    #[test]
    fn registry_rejects_duplicates_and_unknown_names() {
        let mut routes = Routes::new();
        routes.add("home", "/").unwrap();

        assert!(matches!(routes.add("home", "/index"), Err(AppError::DuplicateRoute(_))));
        assert!(matches!(routes.get("missing"), Err(AppError::RouteNotFound(_))));
        assert_eq!(routes.len(), 1);
    }

    #[test]
    fn from_config_reads_name_to_pattern_tables() {
        let routes = Routes::from_config(&json!({
            "home": "/",
            "articles.show": "/articles/{id}",
        }))
        .unwrap();

        assert_eq!(routes.get("articles.show").unwrap().pattern(), "/articles/{id}");
        assert!(Routes::from_config(&json!({ "bad": 1 })).is_err());
        assert!(Routes::from_config(&json!("nope")).is_err());
    }
}
