use std::collections::BTreeMap;

use serde::Deserialize;

use super::{AssetManifests, load_cached, trim_directory};
use crate::domain::AppError;

pub const VITE_MANIFEST: &str = "manifest.json";
pub const DEFAULT_VITE_DIRECTORY: &str = "build";

/// One entry of a Vite `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViteChunk {
    pub file: String,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub is_entry: bool,
    #[serde(default)]
    pub css: Vec<String>,
    #[serde(default)]
    pub imports: Vec<String>,
}

pub type ViteManifest = BTreeMap<String, ViteChunk>;

impl AssetManifests {
    /// Public URL path of the Vite build output for `path`.
    pub fn vite(&self, path: &str, directory: &str) -> Result<String, AppError> {
        let directory = trim_directory(directory);
        let chunk = self.vite_chunk(path, directory)?;
        Ok(public_url(directory, &chunk.file))
    }

    /// Public URL paths of the stylesheets emitted for the entry `path`.
    pub fn vite_css(&self, path: &str, directory: &str) -> Result<Vec<String>, AppError> {
        let directory = trim_directory(directory);
        let chunk = self.vite_chunk(path, directory)?;
        Ok(chunk.css.iter().map(|file| public_url(directory, file)).collect())
    }

    fn vite_chunk(&self, path: &str, directory: &str) -> Result<ViteChunk, AppError> {
        let manifest_path = self.public_path.join(directory).join(VITE_MANIFEST);
        let manifest = load_cached(&self.vite, &manifest_path)?;

        manifest
            .get(path)
            .cloned()
            .ok_or_else(|| AppError::AssetNotFound { tool: "Vite", path: path.to_string() })
    }
}

fn public_url(directory: &str, file: &str) -> String {
    if directory.is_empty() { format!("/{}", file) } else { format!("/{}/{}", directory, file) }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"{
        "resources/js/app.js": {
            "file": "assets/app-4ed993c7.js",
            "src": "resources/js/app.js",
            "isEntry": true,
            "css": ["assets/app-3ab8c3d1.css"]
        }
    }"#;

    fn public_dir(directory: &str) -> TempDir {
        let public = TempDir::new().unwrap();
        let dir = public.path().join(directory);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(VITE_MANIFEST), MANIFEST).unwrap();
        public
    }

    #[test]
    fn resolves_entries_under_the_manifest_directory() {
        let public = public_dir("build");
        let assets = AssetManifests::new(public.path());

        assert_eq!(
            assets.vite("resources/js/app.js", "build").unwrap(),
            "/build/assets/app-4ed993c7.js"
        );
        assert_eq!(
            assets.vite_css("resources/js/app.js", "/build/").unwrap(),
            vec!["/build/assets/app-3ab8c3d1.css".to_string()]
        );
    }

    #[test]
    fn manifest_is_read_once_per_path() {
        let public = public_dir("build");
        let assets = AssetManifests::new(public.path());
        assets.vite("resources/js/app.js", "build").unwrap();

        fs::write(public.path().join("build").join(VITE_MANIFEST), "{}").unwrap();

        assert_eq!(
            assets.vite("resources/js/app.js", "build").unwrap(),
            "/build/assets/app-4ed993c7.js"
        );
        assert_eq!(assets.cached(), 1);
    }

    #[test]
    fn missing_manifest_and_missing_key_are_distinct_errors() {
        let public = public_dir("build");
        let assets = AssetManifests::new(public.path());

        assert!(matches!(
            assets.vite("resources/js/app.js", "dist"),
            Err(AppError::ManifestMissing { .. })
        ));
        assert!(matches!(
            assets.vite("resources/js/admin.js", "build"),
            Err(AppError::AssetNotFound { tool: "Vite", .. })
        ));
    }

    #[test]
    fn malformed_manifests_are_reported() {
        let public = TempDir::new().unwrap();
        fs::create_dir_all(public.path().join("build")).unwrap();
        fs::write(public.path().join("build").join(VITE_MANIFEST), "[1, 2]").unwrap();
        let assets = AssetManifests::new(public.path());

        assert!(matches!(assets.vite("x", "build"), Err(AppError::ManifestParse { .. })));
    }
}
