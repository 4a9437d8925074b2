use std::collections::BTreeMap;
use std::fs;

use super::{AssetManifests, load_cached, trim_directory};
use crate::domain::AppError;

pub const MIX_MANIFEST: &str = "mix-manifest.json";
/// Written by the dev server while hot module replacement is running.
pub const MIX_HOT_FILE: &str = "hot";

const DEFAULT_HOT_ORIGIN: &str = "//localhost:8080";

pub type MixManifest = BTreeMap<String, String>;

impl AssetManifests {
    /// Public URL path of the versioned Mix file for `path`.
    ///
    /// When the key is missing and `display_errors` is false, the
    /// unversioned `directory + path` is returned instead of an error.
    pub fn mix(
        &self,
        path: &str,
        directory: &str,
        display_errors: bool,
    ) -> Result<String, AppError> {
        let path = if path.starts_with('/') { path.to_string() } else { format!("/{}", path) };
        let directory = match trim_directory(directory) {
            "" => String::new(),
            trimmed => format!("/{}", trimmed),
        };
        let base = self.public_path.join(directory.trim_start_matches('/'));

        let hot_file = base.join(MIX_HOT_FILE);
        if hot_file.is_file() {
            let origin = fs::read_to_string(&hot_file)?;
            return Ok(format!("{}{}", hot_origin(origin.trim()), path));
        }

        let manifest = load_cached(&self.mix, &base.join(MIX_MANIFEST))?;
        match manifest.get(&path) {
            Some(versioned) => Ok(format!("{}{}", directory, versioned)),
            None if !display_errors => {
                tracing::warn!("Mix file {} is not in the manifest; serving it unversioned", path);
                Ok(format!("{}{}", directory, path))
            }
            None => Err(AppError::AssetNotFound { tool: "Mix", path }),
        }
    }
}

/// Scheme-relative origin of the dev server recorded in the hot file.
fn hot_origin(recorded: &str) -> &str {
    if recorded.starts_with("http://") || recorded.starts_with("https://") {
        let origin = recorded.split_once(':').map_or(recorded, |(_, rest)| rest);
        origin.trim_end_matches('/')
    } else {
        DEFAULT_HOT_ORIGIN
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    const MANIFEST: &str = r#"{
        "/js/app.js": "/js/app.js?id=911f4a3d",
        "/css/app.css": "/css/app.css?id=0bd5a1f2"
    }"#;

    fn public_with_manifest(directory: &str) -> TempDir {
        let public = TempDir::new().unwrap();
        let dir = public.path().join(directory);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MIX_MANIFEST), MANIFEST).unwrap();
        public
    }

    #[test]
    fn resolves_versioned_paths_with_or_without_leading_slash() {
        let public = public_with_manifest("");
        let assets = AssetManifests::new(public.path());

        assert_eq!(assets.mix("/js/app.js", "", true).unwrap(), "/js/app.js?id=911f4a3d");
        assert_eq!(assets.mix("css/app.css", "", true).unwrap(), "/css/app.css?id=0bd5a1f2");
    }

    #[test]
    fn manifest_directory_prefixes_the_result() {
        let public = public_with_manifest("vendor");
        let assets = AssetManifests::new(public.path());

        assert_eq!(
            assets.mix("/js/app.js", "vendor", true).unwrap(),
            "/vendor/js/app.js?id=911f4a3d"
        );
    }

    #[test]
    fn missing_keys_fall_back_only_when_errors_are_hidden() {
        let public = public_with_manifest("vendor");
        let assets = AssetManifests::new(public.path());

        assert_eq!(assets.mix("/js/admin.js", "vendor", false).unwrap(), "/vendor/js/admin.js");
        assert!(matches!(
            assets.mix("/js/admin.js", "vendor", true),
            Err(AppError::AssetNotFound { tool: "Mix", .. })
        ));
    }

    #[test]
    fn missing_manifest_fails_regardless_of_error_display() {
        let public = TempDir::new().unwrap();
        let assets = AssetManifests::new(public.path());

        assert!(matches!(
            assets.mix("/js/app.js", "", false),
            Err(AppError::ManifestMissing { .. })
        ));
    }

    #[test]
    fn hot_file_redirects_to_the_dev_server() {
        let public = public_with_manifest("");
        fs::write(public.path().join(MIX_HOT_FILE), "http://127.0.0.1:8081/\n").unwrap();
        let assets = AssetManifests::new(public.path());

        assert_eq!(assets.mix("js/app.js", "", true).unwrap(), "//127.0.0.1:8081/js/app.js");
    }

    #[test]
    fn hot_origin_defaults_for_unrecognized_content() {
        assert_eq!(hot_origin("https://dev.local:3000"), "//dev.local:3000");
        assert_eq!(hot_origin(""), DEFAULT_HOT_ORIGIN);
    }
}
