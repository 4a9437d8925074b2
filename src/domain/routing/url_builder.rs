use std::sync::Arc;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::domain::routing::Routes;
use crate::domain::{AppError, Request};

/// Everything except RFC 3986 unreserved characters is encoded.
const QUERY_COMPONENT: &AsciiSet =
    &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Which language segment to put in front of the path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language<'a> {
    /// Language of the current request, if it has one.
    #[default]
    Current,
    /// No language segment.
    Omit,
    /// An explicit language segment.
    Named(&'a str),
}

/// Builds absolute URLs for paths and named routes.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    script_name: Option<String>,
    routes: Arc<Routes>,
    language: Option<String>,
    current_path: String,
}

impl UrlBuilder {
    pub fn new(base_url: &str, routes: Arc<Routes>) -> Result<Self, AppError> {
        Url::parse(base_url).map_err(|err| AppError::InvalidBaseUrl {
            url: base_url.to_string(),
            details: err.to_string(),
        })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            script_name: None,
            routes,
            language: None,
            current_path: "/".to_string(),
        })
    }

    /// Insert a front controller (e.g. `index.php`) between base URL and path.
    pub fn with_script_name(mut self, script_name: &str) -> Self {
        let script_name = script_name.trim_matches('/');
        self.script_name = (!script_name.is_empty()).then(|| script_name.to_string());
        self
    }

    /// Bind the builder to the language and path of `request`.
    pub fn for_request(mut self, request: &Request) -> Self {
        self.language = request.language().map(str::to_string);
        self.current_path = request.path().to_string();
        self
    }

    pub fn base(&self) -> &str {
        &self.base_url
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// URL of `path` with an optional query string.
    pub fn to(
        &self,
        path: &str,
        query: &[(&str, &str)],
        separator: &str,
        language: Language<'_>,
    ) -> String {
        let mut url = self.base_url.clone();

        if let Some(script_name) = &self.script_name {
            url.push('/');
            url.push_str(script_name);
        }

        let language = match language {
            Language::Current => self.language.as_deref(),
            Language::Omit => None,
            Language::Named(name) => Some(name),
        };
        if let Some(language) = language {
            url.push('/');
            url.push_str(language);
        }

        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);

        if !query.is_empty() {
            url.push('?');
            url.push_str(&build_query(query, separator));
        }
        url
    }

    /// URL of the named route `name`.
    pub fn to_route(
        &self,
        name: &str,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
        separator: &str,
        language: Language<'_>,
    ) -> Result<String, AppError> {
        let path = self.routes.get(name)?.expand(params)?;
        Ok(self.to(&path, query, separator, language))
    }

    /// URL of the current request path.
    pub fn current(&self, query: &[(&str, &str)], separator: &str) -> String {
        self.to(&self.current_path, query, separator, Language::Current)
    }
}

/// Encode `pairs` as an RFC 3986 query string joined by `separator`.
pub fn build_query(pairs: &[(&str, &str)], separator: &str) -> String {
    pairs
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join(separator)
}
