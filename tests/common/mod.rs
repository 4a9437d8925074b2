//! Shared testing utilities for porter integration tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use porter::adapters::{MemorySessionStore, MemoryUserRepository, SessionAuthAdapter};
use porter::ports::SessionStore;
use porter::{AppContext, Application, Gatekeeper, Request, Session};

/// Isolated `<root>/app` with `config/` and a sibling `public/` directory.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    app_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated application layout.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let app_dir = root.path().join("app");
        fs::create_dir_all(app_dir.join("config")).expect("Failed to create config directory");
        fs::create_dir_all(root.path().join("public")).expect("Failed to create public directory");

        Self { root, app_dir }
    }

    /// Path to the application directory.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// Path to the public directory next to the application directory.
    pub fn public_dir(&self) -> PathBuf {
        self.root.path().join("public")
    }

    /// Write a config file under `<app>/config`.
    pub fn write_config(&self, relative: &str, content: &str) {
        write(&self.app_dir.join("config").join(relative), content);
    }

    /// Write a file under the public directory.
    pub fn write_public(&self, relative: &str, content: &str) {
        write(&self.public_dir().join(relative), content);
    }

    /// Build an application over this layout.
    pub fn app(&self) -> Arc<Application> {
        Arc::new(Application::builder(&self.app_dir).build())
    }

    /// Build a request context for `request`, reusing `store` and `users` across requests.
    pub fn context(
        &self,
        app: &Arc<Application>,
        store: &Arc<MemorySessionStore>,
        users: &MemoryUserRepository,
        request: Request,
    ) -> AppContext {
        let routes = Arc::new(app.routes().expect("Failed to load routes"));
        let url = app.url_builder(routes, &request).expect("Failed to build URL builder");
        let store: Arc<dyn SessionStore> = store.clone();
        let session: Arc<Session> =
            Arc::new(app.start_session(store, &request).expect("Failed to start session"));
        let gatekeeper =
            Gatekeeper::new(Box::new(SessionAuthAdapter::new(session.clone(), users.clone())));

        AppContext::new(app.clone(), request, url, session, gatekeeper)
    }

    /// Build a command for invoking the compiled `porter` binary from the application directory.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("porter").expect("Failed to locate porter binary");
        cmd.current_dir(&self.app_dir).env_remove("RUST_LOG");
        cmd
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
}
