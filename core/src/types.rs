//! Package schema and registry metadata type definitions.
//!
//! [`PackageSpec`] models the subset of a package schema document this
//! workspace reads or rewrites. Every other top-level field of the document is
//! kept in [`PackageSpec::extra`] so a decode/encode cycle never loses data
//! that the external documentation generator may need.
//!
//! [`PackageMeta`] is the registry-facing record produced by classification.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A package schema document.
///
/// Only the fields listed here are interpreted. `types`, `resources`,
/// `functions`, and `language` hold opaque JSON blobs keyed by token or
/// language identifier.
///
/// # Examples
///
/// ```
/// use registrygen_core::PackageSpec;
///
/// let json = r#"{
///     "name": "random",
///     "repository": "https://github.com/pulumi/pulumi-random",
///     "keywords": ["pulumi", "category/utility"],
///     "resources": { "random:index/randomId:RandomId": {} },
///     "meta": { "moduleFormat": "(.*)(?:/[^/]*)" }
/// }"#;
///
/// let spec: PackageSpec = serde_json::from_str(json).unwrap();
/// assert_eq!(spec.name, "random");
/// assert_eq!(spec.resources.len(), 1);
/// // Unknown fields survive a round trip.
/// assert!(spec.extra.contains_key("meta"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    /// Package name, unique per registry.
    #[serde(default)]
    pub name: String,
    /// Human-friendly package name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub display_name: String,
    /// Package version. Assigned by the caller, never trusted from the document.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Package description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Free-form tags, including `category/<value>` and `kind/<value>` markers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// Source repository URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repository: String,
    /// Logo image URL.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
    /// Publisher display name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,
    /// Attribution note for bridged packages. Empty for native packages.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub attribution: String,
    /// Object type definitions keyed by type token.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub types: BTreeMap<String, Value>,
    /// Resource definitions keyed by resource token.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, Value>,
    /// Function definitions keyed by function token.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub functions: BTreeMap<String, Value>,
    /// Per-language binding configuration keyed by language identifier.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub language: BTreeMap<String, Value>,
    /// All remaining top-level fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageSpec {
    /// Creates an empty spec with the given package name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the repository URL.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    /// Appends a keyword tag.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    /// Returns the first keyword that starts with `prefix`.
    pub fn keyword_with_prefix(&self, prefix: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|k| k.starts_with(prefix))
    }

    /// Returns `true` if `tag` appears verbatim in the keywords.
    pub fn has_keyword(&self, tag: &str) -> bool {
        self.keywords.iter().any(|k| k == tag)
    }
}

/// Registry browsing category. A package has exactly one.
///
/// Serializes as the display label (e.g. `"Version Control"`), while
/// overrides and `category/<value>` tags use the lowercase key returned by
/// [`key`](PackageCategory::key).
///
/// # Examples
///
/// ```
/// use registrygen_core::PackageCategory;
///
/// assert_eq!(PackageCategory::from_key("versioncontrol"), Some(PackageCategory::VersionControl));
/// assert_eq!(PackageCategory::from_key("Cloud"), None);
/// assert_eq!(PackageCategory::VersionControl.to_string(), "Version Control");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PackageCategory {
    #[default]
    Cloud,
    Database,
    Infrastructure,
    Monitoring,
    Network,
    Utility,
    #[serde(rename = "Version Control")]
    VersionControl,
}

impl PackageCategory {
    /// Every category, in display order.
    pub const ALL: [PackageCategory; 7] = [
        PackageCategory::Cloud,
        PackageCategory::Database,
        PackageCategory::Infrastructure,
        PackageCategory::Monitoring,
        PackageCategory::Network,
        PackageCategory::Utility,
        PackageCategory::VersionControl,
    ];

    /// Resolves a known category key. Keys are case-sensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// The lowercase key accepted by overrides and keyword tags.
    pub fn key(self) -> &'static str {
        match self {
            Self::Cloud => "cloud",
            Self::Database => "database",
            Self::Infrastructure => "infrastructure",
            Self::Monitoring => "monitoring",
            Self::Network => "network",
            Self::Utility => "utility",
            Self::VersionControl => "versioncontrol",
        }
    }

    /// The display label written to metadata records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cloud => "Cloud",
            Self::Database => "Database",
            Self::Infrastructure => "Infrastructure",
            Self::Monitoring => "Monitoring",
            Self::Network => "Network",
            Self::Utility => "Utility",
            Self::VersionControl => "Version Control",
        }
    }

    /// Comma-separated list of every known key, for help and error text.
    pub fn known_keys() -> String {
        Self::ALL
            .iter()
            .map(|c| c.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Release maturity of a package version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    #[default]
    Ga,
    PublicPreview,
}

impl PackageStatus {
    /// `v0.*` versions are previews; everything else is generally available.
    ///
    /// ```
    /// use registrygen_core::PackageStatus;
    ///
    /// assert_eq!(PackageStatus::from_version("v0.12.0"), PackageStatus::PublicPreview);
    /// assert_eq!(PackageStatus::from_version("1.2.0"), PackageStatus::Ga);
    /// ```
    pub fn from_version(version: &str) -> Self {
        if version.starts_with("v0.") {
            Self::PublicPreview
        } else {
            Self::Ga
        }
    }
}

/// Registry metadata record for one package.
///
/// Written as `<name>.yaml` by the metadata pipeline and read back by the
/// bulk docs pipeline, so every field defaults when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageMeta {
    pub name: String,
    pub description: String,
    pub logo_url: String,
    pub publisher: String,
    pub title: String,
    pub repo_url: String,
    pub schema_file_path: String,
    pub package_status: PackageStatus,
    /// Unix timestamp (seconds) of the release commit.
    pub updated_on: i64,
    pub version: String,
    pub category: PackageCategory,
    pub component: bool,
    pub featured: bool,
    pub native: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_preserves_unknown_fields() {
        let json = r#"{"name":"foo","config":{"variables":{}},"provider":{"type":"object"}}"#;
        let spec: PackageSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.extra.len(), 2);

        let back = serde_json::to_value(&spec).unwrap();
        assert!(back.get("config").is_some());
        assert!(back.get("provider").is_some());
        assert!(back.get("types").is_none());
    }

    #[test]
    fn test_spec_camel_case_fields() {
        let json = r#"{"name":"foo","displayName":"Foo","logoUrl":"https://x/logo.png"}"#;
        let spec: PackageSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.display_name, "Foo");
        assert_eq!(spec.logo_url, "https://x/logo.png");
        assert!(spec.extra.is_empty());
    }

    #[test]
    fn test_category_keys_roundtrip() {
        for category in PackageCategory::ALL {
            assert_eq!(PackageCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(PackageCategory::from_key("saas"), None);
    }

    #[test]
    fn test_meta_yaml_uses_snake_case_and_labels() {
        let meta = PackageMeta {
            name: "github".into(),
            package_status: PackageStatus::PublicPreview,
            category: PackageCategory::VersionControl,
            ..PackageMeta::default()
        };
        let yaml = serde_yaml::to_string(&meta).unwrap();
        assert!(yaml.contains("package_status: public_preview"));
        assert!(yaml.contains("category: Version Control"));
        assert!(yaml.contains("logo_url:"));
    }

    #[test]
    fn test_meta_deserializes_partial_record() {
        let meta: PackageMeta =
            serde_yaml::from_str("name: aws\nrepo_url: https://github.com/pulumi/pulumi-aws\n")
                .unwrap();
        assert_eq!(meta.name, "aws");
        assert_eq!(meta.category, PackageCategory::Cloud);
        assert_eq!(meta.package_status, PackageStatus::Ga);
    }
}
