//! Fixtures for unit tests: an application rooted in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::adapters::{MemorySessionStore, MemoryUserRepository, SessionAuthAdapter};
use crate::app::{AppContext, Application};
use crate::domain::{Gatekeeper, Request};

/// Temporary `<root>/app` with a `config/` directory and a sibling `public/`.
///
/// Applications built from it read the directory lazily, so keep the
/// `TestApp` alive for as long as they are used.
pub(crate) struct TestApp {
    root: TempDir,
}

impl TestApp {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        fs::create_dir_all(root.path().join("app").join("config"))
            .expect("Failed to create config directory");
        fs::create_dir_all(root.path().join("public")).expect("Failed to create public directory");
        Self { root }
    }

    pub(crate) fn app_path(&self) -> PathBuf {
        self.root.path().join("app")
    }

    pub(crate) fn public_path(&self) -> PathBuf {
        self.root.path().join("public")
    }

    /// Write `<app>/config/<name>`.
    pub(crate) fn config(self, name: &str, content: &str) -> Self {
        write(&self.app_path().join("config").join(name), content);
        self
    }

    /// Write `<public>/<relative>`.
    pub(crate) fn public_file(self, relative: &str, content: &str) -> Self {
        write(&self.public_path().join(relative), content);
        self
    }

    pub(crate) fn build(&self) -> Application {
        Application::builder(self.app_path()).build()
    }

    /// Request context over a fresh application with an in-memory session and a
    /// session-backed default adapter without users.
    pub(crate) fn context(&self, request: Request) -> AppContext {
        let app = Arc::new(self.build());
        let routes = Arc::new(app.routes().expect("Failed to load routes"));
        let url = app.url_builder(routes, &request).expect("Failed to build URL builder");
        let session = Arc::new(
            app.start_session(Arc::new(MemorySessionStore::new()), &request)
                .expect("Failed to start session"),
        );
        let gatekeeper = Gatekeeper::new(Box::new(SessionAuthAdapter::new(
            session.clone(),
            MemoryUserRepository::new(),
        )));

        AppContext::new(app, request, url, session, gatekeeper)
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
}
