//! Registry metadata classification.
//!
//! [`classify`] turns a [`PackageSpec`] plus caller overrides into a
//! [`PackageMeta`] record. Category, title, and publisher each resolve
//! through a fixed priority chain; native/component flags come from keyword
//! tags and the schema's attribution.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use registrygen_core::*;
//!
//! let spec = PackageSpec::new("foo")
//!     .with_repository("https://github.com/acme/pulumi-foo")
//!     .with_keyword("category/monitoring");
//!
//! let options = ClassifyOptions::new(
//!     "provider/cmd/pulumi-resource-foo/schema.json",
//!     Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
//! );
//! let result = classify(&spec, &options).unwrap();
//!
//! assert_eq!(result.meta.category, PackageCategory::Monitoring);
//! assert_eq!(result.meta.title, "foo");
//! assert_eq!(result.meta.publisher, "Pulumi");
//! assert!(result.meta.native);
//! assert!(result.warnings.is_empty());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use crate::lookup::{
    DEFAULT_CATEGORY, DEFAULT_PUBLISHER, category_for_package, is_featured, title_for_package,
};
use crate::{PackageCategory, PackageMeta, PackageSpec, PackageStatus};

const CATEGORY_TAG_PREFIX: &str = "category/";
const NATIVE_TAG: &str = "kind/native";
const COMPONENT_TAG: &str = "kind/component";

/// Classification failures. Any of these aborts metadata generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// A schema field required for classification is empty.
    #[error("{0} field must be set in the package schema")]
    MissingField(&'static str),
    /// The category override is not a known category key.
    #[error("invalid override for category name {name} (expected one of: {known})")]
    InvalidCategory { name: String, known: String },
}

/// Non-fatal findings raised while classifying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyWarning {
    /// A `category/<value>` tag named an unknown category; the default was used.
    InvalidCategoryTag(String),
    /// Both native and component were set; component was kept.
    NativeAndComponent,
}

impl fmt::Display for ClassifyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCategoryTag(tag) => write!(
                f,
                "invalid category tag {tag}, falling back to {DEFAULT_CATEGORY}"
            ),
            Self::NativeAndComponent => f.write_str(
                "package found to be marked as both native and component; \
                 tagging it as a component but not native",
            ),
        }
    }
}

/// Caller-supplied inputs to [`classify`].
#[derive(Debug, Clone)]
pub struct ClassifyOptions {
    /// Category key override.
    pub category: Option<String>,
    /// Publisher display name override.
    pub publisher: Option<String>,
    /// Title override.
    pub title: Option<String>,
    /// Forces the package to be treated as a component.
    pub component: bool,
    /// Schema path relative to the repository root, as passed by the caller.
    pub schema_file: String,
    /// Release timestamp recorded as `updated_on`.
    pub updated_on: DateTime<Utc>,
}

impl ClassifyOptions {
    /// Creates options with no overrides.
    pub fn new(schema_file: impl Into<String>, updated_on: DateTime<Utc>) -> Self {
        Self {
            category: None,
            publisher: None,
            title: None,
            component: false,
            schema_file: schema_file.into(),
            updated_on,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<String>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_component(mut self, component: bool) -> Self {
        self.component = component;
        self
    }
}

/// Result of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub meta: PackageMeta,
    pub warnings: Vec<ClassifyWarning>,
}

/// Classifies `spec` into a registry metadata record.
///
/// `spec.version` must already be set by the caller; see
/// [`PackageContext`](crate::PackageContext).
///
/// # Errors
///
/// Returns [`ClassifyError::MissingField`] if the schema has no repository,
/// or [`ClassifyError::InvalidCategory`] if the category override is unknown.
pub fn classify(spec: &PackageSpec, options: &ClassifyOptions) -> Result<Classification, ClassifyError> {
    if spec.repository.is_empty() {
        return Err(ClassifyError::MissingField("repository"));
    }

    let mut warnings = Vec::new();

    let category = resolve_category(spec, non_empty(&options.category), &mut warnings)?;
    let title = resolve_title(spec, non_empty(&options.title));
    let publisher = non_empty(&options.publisher)
        .or_else(|| Some(spec.publisher.as_str()).filter(|p| !p.is_empty()))
        .unwrap_or(DEFAULT_PUBLISHER)
        .to_string();

    let mut native = spec.attribution.is_empty() || spec.has_keyword(NATIVE_TAG);
    let component = options.component || spec.has_keyword(COMPONENT_TAG);
    if native && component {
        warnings.push(ClassifyWarning::NativeAndComponent);
        native = false;
    }

    for warning in &warnings {
        warn!(package = %spec.name, "{warning}");
    }

    let meta = PackageMeta {
        name: spec.name.clone(),
        description: spec.description.clone(),
        logo_url: spec.logo_url.clone(),
        publisher,
        title,
        repo_url: spec.repository.clone(),
        schema_file_path: clean_schema_file_path(&options.schema_file, &spec.name),
        package_status: PackageStatus::from_version(&spec.version),
        updated_on: options.updated_on.timestamp(),
        version: spec.version.clone(),
        category,
        component,
        featured: is_featured(&spec.name),
        native,
    };

    Ok(Classification { meta, warnings })
}

/// Strips path traversal and provider directory names from a schema path.
///
/// ```
/// use registrygen_core::clean_schema_file_path;
///
/// assert_eq!(
///     clean_schema_file_path("../provider/cmd/pulumi-resource-foo/schema.json", "foo"),
///     "provider/cmd//schema.json"
/// );
/// ```
pub fn clean_schema_file_path(schema_file: &str, package: &str) -> String {
    schema_file
        .replace("../", "")
        .replace(&format!("pulumi-resource-{package}"), "")
        .replace(&format!("pulumi-{package}"), "")
}

fn resolve_category(
    spec: &PackageSpec,
    override_key: Option<&str>,
    warnings: &mut Vec<ClassifyWarning>,
) -> Result<PackageCategory, ClassifyError> {
    if let Some(key) = override_key {
        debug!(category = key, "using category override");
        return PackageCategory::from_key(key).ok_or_else(|| ClassifyError::InvalidCategory {
            name: key.to_string(),
            known: PackageCategory::known_keys(),
        });
    }

    if let Some(category) = category_for_package(&spec.name) {
        debug!(package = %spec.name, "using category from the lookup table");
        return Ok(category);
    }

    let Some(tag) = spec.keyword_with_prefix(CATEGORY_TAG_PREFIX) else {
        debug!(package = %spec.name, "no category tag in keywords");
        return Ok(DEFAULT_CATEGORY);
    };

    let key = tag.strip_prefix(CATEGORY_TAG_PREFIX).unwrap_or(tag);
    match PackageCategory::from_key(key) {
        Some(category) => Ok(category),
        None => {
            warnings.push(ClassifyWarning::InvalidCategoryTag(tag.to_string()));
            Ok(DEFAULT_CATEGORY)
        }
    }
}

fn resolve_title(spec: &PackageSpec, override_title: Option<&str>) -> String {
    if let Some(title) = override_title {
        return title.to_string();
    }
    if !spec.display_name.is_empty() {
        return spec.display_name.clone();
    }
    title_for_package(&spec.name)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| spec.name.clone())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
