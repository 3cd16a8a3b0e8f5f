//! Package schema model, overlay merging, and registry metadata
//! classification.
//!
//! This crate holds the pure logic behind the registry generator:
//!
//! - [`PackageSpec`]: the parts of a package schema document the tool reads,
//!   with everything else preserved verbatim.
//! - [`merge_overlay`]: additive merge of a hand-authored overlay schema into
//!   a generated one (the main schema always wins).
//! - [`classify`]: derives a [`PackageMeta`] registry record (category,
//!   title, publisher, status, native/component flags).
//! - [`PackageContext`]: the per-package value threaded through both.
//!
//! Nothing here performs I/O; fetching, overlay discovery, and file emission
//! live in `registrygen-pipeline`.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use registrygen_core::*;
//!
//! let spec = PackageSpec::new("github")
//!     .with_repository("https://github.com/pulumi/pulumi-github");
//! let ctx = PackageContext::new(spec, "v5.0.0");
//!
//! let result = ctx
//!     .classify(&ClassifyOptions::new("provider/cmd/pulumi-resource-github/schema.json", Utc::now()))
//!     .unwrap();
//! assert_eq!(result.meta.category, PackageCategory::VersionControl);
//! assert_eq!(result.meta.title, "GitHub");
//! assert_eq!(result.meta.package_status, PackageStatus::Ga);
//! ```

mod classify;
mod context;
pub mod language;
pub mod lookup;
mod merge;
mod types;
mod validate;

pub use classify::{
    Classification, ClassifyError, ClassifyOptions, ClassifyWarning, classify,
    clean_schema_file_path,
};
pub use context::PackageContext;
pub use merge::{MergeError, SchemaSide, merge_overlay};
pub use types::*;
pub use validate::{ValidationError, validate_spec};
