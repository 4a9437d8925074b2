use std::sync::Arc;

use serde_json::Value;

use crate::app::{Application, Container};
use crate::domain::{AppError, Config, Gatekeeper, Language, Request, Session, UrlBuilder, User};
use crate::ports::{AuthAdapter, SessionData};

/// Header set by Turbo when a request targets a frame.
pub const TURBO_FRAME_HEADER: &str = "Turbo-Frame";

/// Request context holding the services a handler needs.
///
/// Built once per request; only the application is shared between requests.
pub struct AppContext {
    app: Arc<Application>,
    request: Request,
    url: UrlBuilder,
    session: Arc<Session>,
    gatekeeper: Gatekeeper,
}

impl AppContext {
    /// Create a new request context.
    pub fn new(
        app: Arc<Application>,
        request: Request,
        url: UrlBuilder,
        session: Arc<Session>,
        gatekeeper: Gatekeeper,
    ) -> Self {
        Self { app, request, url, session, gatekeeper }
    }

    /// Get a reference to the application.
    pub fn app(&self) -> &Arc<Application> {
        &self.app
    }

    /// Get a reference to the service container.
    pub fn container(&self) -> &Container {
        self.app.container()
    }

    /// Get a reference to the configuration store.
    pub fn config(&self) -> &Config {
        self.app.config()
    }

    /// Config value at `key`, or `default` when unset.
    pub fn config_value(&self, key: &str, default: impl Into<Value>) -> Result<Value, AppError> {
        self.app.config().get_or(key, default)
    }

    /// Set several config values at once.
    pub fn set_config<I, K, V>(&self, entries: I) -> Result<(), AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.app.config().set_many(entries)
    }

    /// Get a reference to the current request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn header<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.request.headers().get_or(name, default)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.request.headers().has(name)
    }

    /// Name of the Turbo frame the request targets, if any.
    pub fn turbo_frame(&self) -> Option<&str> {
        self.request.headers().get(TURBO_FRAME_HEADER)
    }

    pub fn cookie<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.request.cookies().get_or(name, default)
    }

    /// Verified value of a signed cookie, or `default` when it is absent or tampered with.
    ///
    /// A signer attached to the request's cookies wins over the application secret.
    pub fn signed_cookie(&self, name: &str, default: &str) -> Result<String, AppError> {
        let cookies = self.request.cookies();
        if cookies.has_signer() {
            return cookies.get_signed_or(name, default);
        }

        let signer = self.app.signer()?.ok_or(AppError::SignerMissing)?;
        Ok(cookies.get_signed_with(name, &signer).unwrap_or_else(|| default.to_string()))
    }

    /// Get a reference to the URL builder.
    pub fn url(&self) -> &UrlBuilder {
        &self.url
    }

    /// URL of the named route.
    pub fn route(
        &self,
        name: &str,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
        separator: &str,
        language: Language<'_>,
    ) -> Result<String, AppError> {
        self.url.to_route(name, params, query, separator, language)
    }

    /// Get a reference to the session.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Flash values queued for the next request.
    pub fn flash_data(&self) -> SessionData {
        self.session.flash_data()
    }

    /// Flash value from the previous request, or `default`.
    pub fn flash(&self, key: &str, default: Option<Value>) -> Option<Value> {
        self.session.get_flash(key).or(default)
    }

    pub fn token(&self) -> String {
        self.session.token()
    }

    pub fn one_time_token(&self) -> String {
        self.session.generate_one_time_token()
    }

    /// Named authentication adapter, or the default one when `name` is `None`.
    pub fn gatekeeper(&self, name: Option<&str>) -> Result<&dyn AuthAdapter, AppError> {
        self.gatekeeper.adapter(name)
    }

    /// Authenticated user of the adapter, or `None` for guests.
    pub fn user(&self, adapter: Option<&str>) -> Result<Option<User>, AppError> {
        self.gatekeeper(adapter)?.user()
    }

    /// Public URL path of the versioned Vite file for `path`.
    pub fn vite(&self, path: &str, directory: &str) -> Result<String, AppError> {
        self.app.assets().vite(path, directory)
    }

    pub fn vite_css(&self, path: &str, directory: &str) -> Result<Vec<String>, AppError> {
        self.app.assets().vite_css(path, directory)
    }

    /// Public URL path of the versioned Mix file for `path`.
    pub fn mix(&self, path: &str, directory: &str) -> Result<String, AppError> {
        let display_errors = self.app.display_errors()?;
        self.app.assets().mix(path, directory, display_errors)
    }
}
