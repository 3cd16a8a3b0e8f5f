//! Schema retrieval and decoding.
//!
//! A schema lives either at a raw-content URL composed from host, repository
//! slug, version, and relative path, or in a file on local disk. YAML
//! schemas are converted to JSON before decoding into a [`PackageSpec`].

use std::fmt;
use std::path::PathBuf;

use registrygen_core::PackageSpec;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::http::HttpClient;

/// Default raw-content host for schema downloads.
pub const DEFAULT_HOST: &str = "https://raw.githubusercontent.com";

/// Where a schema document is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    /// Absolute URL fetched with HTTP GET.
    Remote(String),
    /// File on local disk.
    Local(PathBuf),
}

impl SchemaLocation {
    /// Builds `<host>/<slug>/<version>/<schema_file>`.
    ///
    /// `repo` may be a bare `owner/name` slug or a repository URL whose path
    /// is the slug.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidRepo`] if no slug can be derived.
    pub fn remote(host: &str, repo: &str, version: &str, schema_file: &str) -> Result<Self> {
        let slug = repo_slug(repo)?;
        Ok(Self::Remote(format!(
            "{}/{}/{}/{}",
            host.trim_end_matches('/'),
            slug,
            version,
            schema_file.trim_start_matches('/')
        )))
    }

    /// Returns `true` if the document should be read as YAML.
    pub fn is_yaml(&self) -> bool {
        let path = match self {
            Self::Remote(url) => url.as_str(),
            Self::Local(path) => path.to_str().unwrap_or_default(),
        };
        path.ends_with(".yaml") || path.ends_with(".yml")
    }
}

impl fmt::Display for SchemaLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Extracts the `owner/name` slug from a slug or repository URL.
///
/// ```
/// use registrygen_pipeline::fetch::repo_slug;
///
/// assert_eq!(repo_slug("pulumi/pulumi-aws").unwrap(), "pulumi/pulumi-aws");
/// assert_eq!(repo_slug("https://github.com/pulumi/pulumi-aws").unwrap(), "pulumi/pulumi-aws");
/// assert!(repo_slug("https://github.com/").is_err());
/// ```
pub fn repo_slug(repo: &str) -> Result<String> {
    let path = if repo.contains("://") {
        reqwest::Url::parse(repo)
            .map_err(|_| PipelineError::InvalidRepo(repo.to_string()))?
            .path()
            .to_string()
    } else {
        repo.to_string()
    };

    let slug = path.trim_matches('/');
    let slug = slug.strip_suffix(".git").unwrap_or(slug);
    if slug.is_empty() {
        return Err(PipelineError::InvalidRepo(repo.to_string()));
    }
    Ok(slug.to_string())
}

/// Reads the raw bytes of a schema document.
///
/// # Errors
///
/// Propagates HTTP failures, or returns [`PipelineError::Io`] if a local file
/// cannot be read.
pub fn read_schema_bytes(http: &dyn HttpClient, location: &SchemaLocation) -> Result<Vec<u8>> {
    info!(%location, "reading schema");
    match location {
        SchemaLocation::Remote(url) => http.get(url, &[]),
        SchemaLocation::Local(path) => {
            std::fs::read(path).map_err(|e| PipelineError::io("reading schema file", path, e))
        }
    }
}

/// Decodes schema bytes, converting YAML to JSON first when `yaml` is set.
///
/// # Errors
///
/// Returns [`PipelineError::Yaml`] or [`PipelineError::Json`] naming
/// `source` if the document is malformed.
pub fn decode_schema(bytes: &[u8], yaml: bool, source: &str) -> Result<PackageSpec> {
    if yaml {
        let value: serde_json::Value = serde_yaml::from_slice(bytes)
            .map_err(|e| PipelineError::yaml(format!("reading YAML schema {source}"), e))?;
        return serde_json::from_value(value).map_err(|e| {
            PipelineError::json(format!("unmarshalling schema {source} into a PackageSpec"), e)
        });
    }
    serde_json::from_slice(bytes).map_err(|e| {
        PipelineError::json(format!("unmarshalling schema {source} into a PackageSpec"), e)
    })
}

/// Reads and decodes the schema at `location`.
pub fn load_schema(http: &dyn HttpClient, location: &SchemaLocation) -> Result<PackageSpec> {
    let bytes = read_schema_bytes(http, location)?;
    decode_schema(&bytes, location.is_yaml(), &location.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;

    #[test]
    fn test_remote_location_composition() {
        let location = SchemaLocation::remote(
            "https://raw.githubusercontent.com/",
            "https://github.com/pulumi/pulumi-random",
            "v4.8.0",
            "/provider/cmd/pulumi-resource-random/schema.json",
        )
        .unwrap();
        assert_eq!(
            location,
            SchemaLocation::Remote(
                "https://raw.githubusercontent.com/pulumi/pulumi-random/v4.8.0/provider/cmd/pulumi-resource-random/schema.json"
                    .into()
            )
        );
        assert!(!location.is_yaml());
    }

    #[test]
    fn test_repo_slug_strips_git_suffix() {
        assert_eq!(repo_slug("/acme/pulumi-foo.git").unwrap(), "acme/pulumi-foo");
        assert!(repo_slug("").is_err());
    }

    #[test]
    fn test_yaml_detection() {
        assert!(SchemaLocation::Local("schema.yaml".into()).is_yaml());
        assert!(SchemaLocation::Remote("https://h/o/r/v/schema.yml".into()).is_yaml());
        assert!(!SchemaLocation::Local("schema.json".into()).is_yaml());
    }

    #[test]
    fn test_decode_yaml_schema() {
        let yaml = b"name: foo\nrepository: https://github.com/acme/pulumi-foo\nkeywords:\n  - category/cloud\nresources:\n  foo:index:Bar:\n    isComponent: true\n";
        let spec = decode_schema(yaml, true, "schema.yaml").unwrap();
        assert_eq!(spec.name, "foo");
        assert_eq!(spec.keywords, vec!["category/cloud"]);
        assert_eq!(spec.resources["foo:index:Bar"]["isComponent"], true);
    }

    #[test]
    fn test_decode_malformed_json_names_source() {
        let err = decode_schema(b"{not json", false, "https://h/schema.json").unwrap_err();
        assert!(err.to_string().contains("https://h/schema.json"));
    }

    #[test]
    fn test_load_remote_schema() {
        let url = "https://raw.githubusercontent.com/acme/pulumi-foo/v1.0.0/schema.json";
        let http = MockHttpClient::default().with(url, r#"{"name":"foo"}"#);
        let spec = load_schema(&http, &SchemaLocation::Remote(url.into())).unwrap();
        assert_eq!(spec.name, "foo");
    }

    #[test]
    fn test_load_local_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        std::fs::write(&path, r#"{"name":"bar"}"#).unwrap();

        let spec = load_schema(&MockHttpClient::default(), &SchemaLocation::Local(path)).unwrap();
        assert_eq!(spec.name, "bar");
    }

    #[test]
    fn test_load_missing_local_schema() {
        let err = load_schema(
            &MockHttpClient::default(),
            &SchemaLocation::Local("/definitely/not/here.json".into()),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }
}
