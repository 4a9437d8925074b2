use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::app::Container;
use crate::domain::assets::public_path_for;
use crate::domain::{
    AppError, AssetManifests, Config, Request, Routes, Session, Signer, UrlBuilder,
};
use crate::ports::SessionStore;

/// Config key deciding whether asset lookups may degrade instead of failing.
pub const DISPLAY_ERRORS_KEY: &str = "application.error_handler.display_errors";
pub const BASE_URL_KEY: &str = "application.base_url";
pub const CLEAN_URLS_KEY: &str = "application.clean_urls";
pub const SECRET_KEY: &str = "application.secret";
pub const SESSION_COOKIE_KEY: &str = "session.cookie_name";
pub const SESSION_TTL_KEY: &str = "session.ttl";
/// Config group mapping route names to patterns.
pub const ROUTES_GROUP: &str = "routes";

const DEFAULT_BASE_URL: &str = "http://localhost";
const DEFAULT_SCRIPT_NAME: &str = "index.php";
const DEFAULT_SESSION_COOKIE: &str = "porter_session";
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Application-scoped services shared by every request.
#[derive(Debug)]
pub struct Application {
    path: PathBuf,
    environment: Option<String>,
    config: Config,
    container: Container,
    assets: AssetManifests,
}

impl Application {
    pub fn builder(path: impl Into<PathBuf>) -> ApplicationBuilder {
        ApplicationBuilder {
            path: path.into(),
            environment: None,
            config_path: None,
            public_path: None,
        }
    }

    /// Application directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn assets(&self) -> &AssetManifests {
        &self.assets
    }

    pub fn public_path(&self) -> &Path {
        self.assets.public_path()
    }

    /// Whether errors are shown to the client. Unset means no.
    pub fn display_errors(&self) -> Result<bool, AppError> {
        Ok(self.config.get_as::<bool>(DISPLAY_ERRORS_KEY)?.unwrap_or(false))
    }

    /// Cookie signer built from the application secret, if one is configured.
    pub fn signer(&self) -> Result<Option<Arc<Signer>>, AppError> {
        self.config
            .get_as::<String>(SECRET_KEY)?
            .map(|secret| Signer::new(secret).map(Arc::new))
            .transpose()
    }

    /// Named routes from the `routes` config group.
    pub fn routes(&self) -> Result<Routes, AppError> {
        match self.config.get(ROUTES_GROUP)? {
            Some(table) => Routes::from_config(&table),
            None => Ok(Routes::new()),
        }
    }

    /// URL builder bound to `request`, configured from the `application` group.
    pub fn url_builder(
        &self,
        routes: Arc<Routes>,
        request: &Request,
    ) -> Result<UrlBuilder, AppError> {
        let base_url = self.config.get_or(BASE_URL_KEY, DEFAULT_BASE_URL)?;
        let base_url = base_url
            .as_str()
            .ok_or_else(|| AppError::config_error(format!("{} must be a string", BASE_URL_KEY)))?;

        let mut builder = UrlBuilder::new(base_url, routes)?.for_request(request);
        if !self.config.get_as::<bool>(CLEAN_URLS_KEY)?.unwrap_or(true) {
            builder = builder.with_script_name(DEFAULT_SCRIPT_NAME);
        }
        Ok(builder)
    }

    /// Start the session named by the session cookie of `request`.
    pub fn start_session(
        &self,
        store: Arc<dyn SessionStore>,
        request: &Request,
    ) -> Result<Session, AppError> {
        let cookie_name = match self.config.get(SESSION_COOKIE_KEY)? {
            Some(Value::String(name)) => name,
            _ => DEFAULT_SESSION_COOKIE.to_string(),
        };
        let ttl = self.config.get_as::<u64>(SESSION_TTL_KEY)?.unwrap_or(DEFAULT_SESSION_TTL_SECS);

        Session::start(store, request.cookies().get(&cookie_name), Duration::from_secs(ttl))
    }
}

pub struct ApplicationBuilder {
    path: PathBuf,
    environment: Option<String>,
    config_path: Option<PathBuf>,
    public_path: Option<PathBuf>,
}

impl ApplicationBuilder {
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Read config files from `path` instead of `<app>/config`.
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Resolve asset manifests under `path` instead of the app directory's `public` sibling.
    pub fn public_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.public_path = Some(path.into());
        self
    }

    pub fn build(self) -> Application {
        let config_path = self.config_path.unwrap_or_else(|| self.path.join("config"));
        let public_path = self.public_path.unwrap_or_else(|| public_path_for(&self.path));
        tracing::debug!(
            "application at {} (environment: {})",
            self.path.display(),
            self.environment.as_deref().unwrap_or("default")
        );

        Application {
            config: Config::new(config_path, self.environment.clone()),
            container: Container::new(),
            assets: AssetManifests::new(public_path),
            environment: self.environment,
            path: self.path,
        }
    }
}
