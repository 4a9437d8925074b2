//! Versioned front-end asset lookup through build-tool manifests.
//!
//! Manifests are parsed on first use and cached per manifest path for the
//! lifetime of the [`AssetManifests`] value. A rebuilt manifest is only seen
//! by a new instance.

mod mix;
mod vite;

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::domain::AppError;

pub use mix::{MIX_HOT_FILE, MIX_MANIFEST, MixManifest};
pub use vite::{DEFAULT_VITE_DIRECTORY, VITE_MANIFEST, ViteChunk, ViteManifest};

type ManifestCache<T> = Mutex<HashMap<PathBuf, Arc<T>>>;

/// Manifest readers rooted at the public directory.
#[derive(Debug)]
pub struct AssetManifests {
    public_path: PathBuf,
    vite: ManifestCache<ViteManifest>,
    mix: ManifestCache<MixManifest>,
}

impl AssetManifests {
    pub fn new(public_path: impl Into<PathBuf>) -> Self {
        Self {
            public_path: public_path.into(),
            vite: Mutex::new(HashMap::new()),
            mix: Mutex::new(HashMap::new()),
        }
    }

    pub fn public_path(&self) -> &Path {
        &self.public_path
    }

    /// Number of manifests parsed so far.
    pub fn cached(&self) -> usize {
        self.vite.lock().len() + self.mix.lock().len()
    }
}

/// Public directory for an application directory: its sibling `public` directory.
///
/// Relative paths are resolved against the current directory first.
pub fn public_path_for(app_path: &Path) -> PathBuf {
    let absolute = std::path::absolute(app_path).unwrap_or_else(|_| app_path.to_path_buf());
    let app_path: PathBuf =
        absolute.components().filter(|component| *component != Component::CurDir).collect();
    app_path.parent().unwrap_or(&app_path).join("public")
}

fn load_cached<T: DeserializeOwned>(
    cache: &ManifestCache<T>,
    path: &Path,
) -> Result<Arc<T>, AppError> {
    if let Some(manifest) = cache.lock().get(path) {
        return Ok(Arc::clone(manifest));
    }

    if !path.is_file() {
        return Err(AppError::ManifestMissing { path: path.display().to_string() });
    }

    let content = fs::read_to_string(path)?;
    let manifest: T = serde_json::from_str(&content).map_err(|err| AppError::ManifestParse {
        path: path.display().to_string(),
        details: err.to_string(),
    })?;
    tracing::debug!("loaded asset manifest {}", path.display());

    let mut cache = cache.lock();
    Ok(Arc::clone(cache.entry(path.to_path_buf()).or_insert_with(|| Arc::new(manifest))))
}

/// Strip surrounding slashes from a manifest directory.
fn trim_directory(directory: &str) -> &str {
    directory.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_path_is_the_app_directory_sibling() {
        assert_eq!(public_path_for(Path::new("/srv/site/app")), PathBuf::from("/srv/site/public"));
        assert_eq!(
            public_path_for(Path::new("/srv/apple/app")),
            PathBuf::from("/srv/apple/public")
        );
    }

    #[test]
    fn relative_app_paths_resolve_against_the_current_directory() {
        let cwd = std::env::current_dir().unwrap();
        let parent = cwd.parent().unwrap_or(&cwd);

        assert_eq!(public_path_for(Path::new("app")), cwd.join("public"));
        assert_eq!(public_path_for(Path::new("./app")), cwd.join("public"));
        assert_eq!(public_path_for(Path::new(".")), parent.join("public"));
    }
}
