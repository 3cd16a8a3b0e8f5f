//! Overlay schema discovery.
//!
//! Overlays are addressed as `overlays/<package>/overlays.json`. The default
//! set is embedded at build time; a directory with the same layout can be
//! used instead. A package without an overlay is not an error.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use registrygen_core::PackageSpec;
use tracing::debug;

use crate::error::{PipelineError, Result};

mod bundled {
    include!(concat!(env!("OUT_DIR"), "/bundled_overlays.rs"));
}

/// File name of an overlay document inside its package directory.
pub const OVERLAY_FILE_NAME: &str = "overlays.json";

/// Describes where an [`OverlaySet`] reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlaySource {
    /// Documents embedded in the binary.
    Bundled,
    /// A directory containing `<package>/overlays.json` entries.
    Directory(PathBuf),
}

/// Read-only collection of overlay documents keyed by package name.
#[derive(Debug, Clone)]
pub struct OverlaySet {
    source: OverlaySource,
}

impl OverlaySet {
    /// The overlays embedded at build time.
    pub fn bundled() -> Self {
        Self {
            source: OverlaySource::Bundled,
        }
    }

    /// Overlays read from `dir` on demand.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: OverlaySource::Directory(dir.into()),
        }
    }

    pub fn source(&self) -> &OverlaySource {
        &self.source
    }

    /// Conventional path of a package's overlay, relative to the overlay root.
    pub fn overlay_path(package: &str) -> String {
        format!("overlays/{package}/{OVERLAY_FILE_NAME}")
    }

    /// Raw overlay bytes for `package`, or `None` if it has no overlay.
    pub fn raw(&self, package: &str) -> Result<Option<Cow<'static, [u8]>>> {
        if !is_plain_name(package) {
            debug!(package, "package name is not a plain directory name; no overlay");
            return Ok(None);
        }

        match &self.source {
            OverlaySource::Bundled => Ok(bundled::BUNDLED_OVERLAYS
                .iter()
                .find(|(name, _)| *name == package)
                .map(|(_, bytes)| Cow::Borrowed(*bytes))),
            OverlaySource::Directory(dir) => read_overlay_file(&dir.join(package).join(OVERLAY_FILE_NAME)),
        }
    }

    /// Decoded overlay for `package`, or `None` if it has no overlay.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Json`] if the overlay is malformed, or
    /// [`PipelineError::Io`] if it exists but cannot be read.
    pub fn get(&self, package: &str) -> Result<Option<PackageSpec>> {
        let Some(bytes) = self.raw(package)? else {
            debug!(package, "no overlay for package");
            return Ok(None);
        };
        let spec = serde_json::from_slice(&bytes).map_err(|e| {
            PipelineError::json(
                format!(
                    "unmarshalling overlay schema {} into a PackageSpec",
                    Self::overlay_path(package)
                ),
                e,
            )
        })?;
        Ok(Some(spec))
    }
}

impl Default for OverlaySet {
    fn default() -> Self {
        Self::bundled()
    }
}

fn read_overlay_file(path: &Path) -> Result<Option<Cow<'static, [u8]>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(Cow::Owned(bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PipelineError::io("reading overlay file", path, e)),
    }
}

fn is_plain_name(package: &str) -> bool {
    !package.is_empty() && package != "." && package != ".." && !package.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_kubernetes_overlay() {
        let spec = OverlaySet::bundled().get("kubernetes").unwrap().unwrap();
        assert!(spec.resources.contains_key("kubernetes:helm.sh/v3:Chart"));
        assert!(spec.language.contains_key("go"));
    }

    #[test]
    fn test_missing_overlay_is_none() {
        assert!(OverlaySet::bundled().get("random").unwrap().is_none());
    }

    #[test]
    fn test_directory_overlays() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("foo")).unwrap();
        std::fs::write(
            dir.path().join("foo").join(OVERLAY_FILE_NAME),
            r#"{"name":"foo","types":{"foo:index:Extra":{"type":"object"}}}"#,
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();

        let overlays = OverlaySet::from_dir(dir.path());
        assert_eq!(overlays.get("foo").unwrap().unwrap().types.len(), 1);
        assert!(overlays.get("empty").unwrap().is_none());
        assert!(overlays.get("bar").unwrap().is_none());
    }

    #[test]
    fn test_malformed_overlay_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("foo")).unwrap();
        std::fs::write(dir.path().join("foo").join(OVERLAY_FILE_NAME), "[").unwrap();

        let err = OverlaySet::from_dir(dir.path()).get("foo").unwrap_err();
        assert!(err.to_string().contains("overlays/foo/overlays.json"));
    }

    #[test]
    fn test_path_like_names_have_no_overlay() {
        let overlays = OverlaySet::bundled();
        assert!(overlays.get("../kubernetes").unwrap().is_none());
        assert!(overlays.get("").unwrap().is_none());
    }
}
