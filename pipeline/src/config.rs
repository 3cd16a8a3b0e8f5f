//! Generator configuration.
//!
//! Every key is optional; command-line flags take precedence over values
//! loaded from the file.
//!
//! # Example YAML
//!
//! ```yaml
//! host: https://raw.githubusercontent.com
//! github_api_url: https://api.github.com
//! registry_raw_url: https://raw.githubusercontent.com/pulumi/registry/master/themes/default/data/registry/packages
//! metadata_out_dir: output
//! overlays_dir: ./overlays
//! timeout_secs: 30
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::fetch::DEFAULT_HOST;
use crate::github::DEFAULT_API_URL;
use crate::http::ReqwestClient;
use crate::overlay::OverlaySet;

/// Raw-content base of the registry's published package metadata.
pub const DEFAULT_REGISTRY_RAW_URL: &str =
    "https://raw.githubusercontent.com/pulumi/registry/master/themes/default/data/registry/packages";

/// Default directory for generated metadata files.
pub const DEFAULT_METADATA_OUT_DIR: &str = "output";

/// Settings shared by all pipelines.
///
/// # Examples
///
/// ```
/// use registrygen_pipeline::GeneratorConfig;
///
/// let config: GeneratorConfig = serde_yaml::from_str("metadata_out_dir: meta\n").unwrap();
/// assert_eq!(config.metadata_out_dir.to_str(), Some("meta"));
/// assert_eq!(config.host, "https://raw.githubusercontent.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Raw-content host schemas are downloaded from.
    pub host: String,
    /// GitHub REST API base URL.
    pub github_api_url: String,
    /// Base URL of the registry's published `<package>.yaml` files.
    pub registry_raw_url: String,
    /// Where `metadata` writes `<package>.yaml`.
    pub metadata_out_dir: PathBuf,
    /// Overlay directory; the embedded overlays are used when unset.
    pub overlays_dir: Option<PathBuf>,
    /// Total HTTP request timeout. reqwest's default applies when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            github_api_url: DEFAULT_API_URL.to_string(),
            registry_raw_url: DEFAULT_REGISTRY_RAW_URL.to_string(),
            metadata_out_dir: PathBuf::from(DEFAULT_METADATA_OUT_DIR),
            overlays_dir: None,
            timeout_secs: None,
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if the file cannot be read, or
    /// [`PipelineError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            std::fs::File::open(path).map_err(|e| PipelineError::io("opening config", path, e))?;
        serde_yaml::from_reader(std::io::BufReader::new(file))
            .map_err(|e| PipelineError::yaml(format!("parsing config {}", path.display()), e))
    }

    /// An HTTP client honoring `timeout_secs`.
    pub fn http_client(&self) -> Result<ReqwestClient> {
        match self.timeout_secs {
            Some(secs) => ReqwestClient::with_timeout(secs),
            None => ReqwestClient::new(),
        }
    }

    /// The overlay set selected by `overlays_dir`.
    pub fn overlay_set(&self) -> OverlaySet {
        match &self.overlays_dir {
            Some(dir) => OverlaySet::from_dir(dir),
            None => OverlaySet::bundled(),
        }
    }
}
