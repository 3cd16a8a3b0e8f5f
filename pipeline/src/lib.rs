//! Pipelines that turn provider schemas into package registry artifacts.
//!
//! Each pipeline is a plain function taking its collaborators explicitly:
//!
//! - [`generate_metadata`]: schema to `<package>.yaml` registry metadata.
//! - [`generate_docs`]: schema plus overlay to API docs and a navigation tree.
//! - [`generate_all_docs`]: [`generate_docs`] for every package in a registry
//!   checkout.
//! - [`check_version`]: latest GitHub release against the published registry
//!   version.
//!
//! Network access goes through the [`HttpClient`] trait so the pipelines can
//! run against canned responses.
//!
//! # Quick start
//!
//! ```no_run
//! use registrygen_pipeline::{GeneratorConfig, GitHubClient, ReqwestClient, check_version};
//!
//! let config = GeneratorConfig::default();
//! let http = ReqwestClient::new().unwrap();
//! let github = GitHubClient::from_env(&http, &config.github_api_url);
//!
//! let check = check_version(&http, &github, &config.registry_raw_url, "pulumi", "pulumi-aws").unwrap();
//! if check.is_outdated() {
//!     println!("{check}");
//! }
//! ```

mod config;
mod docs;
pub mod emit;
mod error;
pub mod fetch;
pub mod generator;
pub mod github;
pub mod http;
mod metadata;
pub mod overlay;
mod pkgversion;

pub use config::{DEFAULT_METADATA_OUT_DIR, DEFAULT_REGISTRY_RAW_URL, GeneratorConfig};
pub use docs::{
    AllDocsRequest, DocsOutcome, DocsRequest, generate_all_docs, generate_docs,
    read_registry_metadata,
};
pub use error::{PipelineError, Result};
pub use fetch::{DEFAULT_HOST, SchemaLocation};
pub use generator::{DocsGenerator, OutlineGenerator, PackageTreeItem};
pub use github::GitHubClient;
pub use http::{HttpClient, ReqwestClient};
pub use metadata::{MetadataOutcome, MetadataRequest, generate_metadata};
pub use overlay::OverlaySet;
pub use pkgversion::{VersionCheck, check_version, package_name};
