use std::io;

use thiserror::Error;

/// Library-wide error type for porter operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// A configuration file could not be parsed.
    #[error("Failed to parse config file {file}: {details}")]
    ConfigParse { file: String, details: String },

    /// The asset manifest file does not exist.
    #[error("The manifest file does not exist: {path}")]
    ManifestMissing { path: String },

    /// The asset manifest file is not valid JSON of the expected shape.
    #[error("Failed to parse manifest {path}: {details}")]
    ManifestParse { path: String, details: String },

    /// Logical asset path is not listed in the manifest.
    #[error("Unable to locate {tool} file: {path}.")]
    AssetNotFound { tool: &'static str, path: String },

    /// No route registered under the requested name.
    #[error("No route named '{0}'")]
    RouteNotFound(String),

    /// A route name was registered twice.
    #[error("Route '{0}' is already registered")]
    DuplicateRoute(String),

    /// A required route placeholder was not supplied.
    #[error("Missing parameter '{parameter}' for route '{route}'")]
    MissingRouteParameter { route: String, parameter: String },

    /// Base URL for the URL builder is not absolute.
    #[error("Invalid base URL '{url}': {details}")]
    InvalidBaseUrl { url: String, details: String },

    /// Signed cookies were read without a signer.
    #[error("A signer is required to read signed cookies")]
    SignerMissing,

    /// Gatekeeper has no adapter with the requested name.
    #[error("Gatekeeper adapter '{0}' is not registered")]
    AdapterNotFound(String),

    /// Container has no instance of the requested type.
    #[error("No service of type {0} is registered in the container")]
    ServiceNotRegistered(&'static str),

    /// Session storage failure.
    #[error("Session store error: {0}")]
    SessionStore(String),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers mapping to exit codes or responses.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Io(err) => err.kind(),
            AppError::Configuration(_)
            | AppError::ConfigParse { .. }
            | AppError::ManifestParse { .. }
            | AppError::MissingRouteParameter { .. }
            | AppError::InvalidBaseUrl { .. } => io::ErrorKind::InvalidInput,
            AppError::ManifestMissing { .. }
            | AppError::AssetNotFound { .. }
            | AppError::RouteNotFound(_)
            | AppError::AdapterNotFound(_)
            | AppError::ServiceNotRegistered(_) => io::ErrorKind::NotFound,
            AppError::DuplicateRoute(_) => io::ErrorKind::AlreadyExists,
            AppError::SignerMissing => io::ErrorKind::Unsupported,
            AppError::SessionStore(_) => io::ErrorKind::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_not_found_names_the_tool() {
        let err = AppError::AssetNotFound { tool: "Vite", path: "app.js".into() };
        assert_eq!(err.to_string(), "Unable to locate Vite file: app.js.");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn io_errors_keep_their_kind() {
        let err = AppError::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }
}
