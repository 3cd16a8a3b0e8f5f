//! Schema field validation.
//!
//! Checks the handful of fields the pipelines rely on before any output is
//! produced. Structural validation of the schema format itself belongs to
//! the external generator.
//!
//! # Examples
//!
//! ```
//! use registrygen_core::*;
//!
//! let spec = PackageSpec::new("foo").with_repository("https://github.com/acme/pulumi-foo");
//! assert!(validate_spec(&spec).is_empty());
//!
//! let bad = PackageSpec::new("").with_keyword("kind/library");
//! let errors = validate_spec(&bad);
//! assert!(errors.contains(&ValidationError::EmptyPackageName));
//! assert!(errors.contains(&ValidationError::MissingRepository));
//! ```

use thiserror::Error;

use crate::{PackageCategory, PackageSpec};

/// Schema validation findings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The schema has no package name.
    #[error("package name cannot be empty")]
    EmptyPackageName,
    /// The schema has no repository URL.
    #[error("repository field must be set in the package schema")]
    MissingRepository,
    /// A `category/<value>` keyword names an unknown category.
    #[error("invalid category tag: {0}")]
    InvalidCategoryTag(String),
    /// A `kind/<value>` keyword is neither `kind/native` nor `kind/component`.
    #[error("unknown kind tag: {0}")]
    UnknownKindTag(String),
    /// A types or resources map contains an empty key.
    #[error("empty token in {0}")]
    EmptyToken(&'static str),
}

impl ValidationError {
    /// Findings that make a schema unusable for any pipeline.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::EmptyPackageName)
    }
}

/// Validates the fields of `spec` that the pipelines depend on.
pub fn validate_spec(spec: &PackageSpec) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if spec.name.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageName);
    }
    if spec.repository.trim().is_empty() {
        errors.push(ValidationError::MissingRepository);
    }

    for keyword in &spec.keywords {
        if let Some(value) = keyword.strip_prefix("category/") {
            if PackageCategory::from_key(value).is_none() {
                errors.push(ValidationError::InvalidCategoryTag(keyword.clone()));
            }
        } else if keyword.starts_with("kind/")
            && keyword != "kind/native"
            && keyword != "kind/component"
        {
            errors.push(ValidationError::UnknownKindTag(keyword.clone()));
        }
    }

    if spec.types.keys().any(|k| k.is_empty()) {
        errors.push(ValidationError::EmptyToken("types"));
    }
    if spec.resources.keys().any(|k| k.is_empty()) {
        errors.push(ValidationError::EmptyToken("resources"));
    }

    errors
}
