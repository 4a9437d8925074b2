//! The incoming HTTP request as seen by handlers.

mod cookies;
mod headers;

pub use cookies::Cookies;
pub use headers::Headers;

/// Request-scoped view of method, path, language, headers and cookies.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    path: String,
    language: Option<String>,
    headers: Headers,
    cookies: Cookies,
}

impl Request {
    pub fn builder(method: &str, path: &str) -> RequestBuilder {
        RequestBuilder {
            request: Request {
                method: method.to_ascii_uppercase(),
                path: normalize_path(path),
                language: None,
                headers: Headers::new(),
                cookies: Cookies::new(),
            },
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path without the language prefix, always starting with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Language prefix the request was routed under, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    pub fn is_ajax(&self) -> bool {
        self.headers.get("X-Requested-With") == Some("XMLHttpRequest")
    }
}

pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.request.language = Some(language.into());
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.request.headers.add(name, value);
        self
    }

    /// Use `cookies` as the cookie jar. A `Cookie` header added later is parsed into it.
    pub fn cookies(mut self, cookies: Cookies) -> Self {
        self.request.cookies = cookies;
        self
    }

    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.cookies.add(name, value);
        self
    }

    pub fn build(mut self) -> Request {
        let raw_cookies = self.request.headers.get_all("Cookie").to_vec();
        for header in raw_cookies {
            self.request.cookies.parse_header(&header);
        }
        self.request
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    format!("/{}", trimmed)
}
