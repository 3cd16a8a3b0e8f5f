//! Error types for the registry generation pipelines.
//!
//! Every variant names the URL, path, or document involved so the CLI can
//! print a single descriptive line before exiting.

use std::path::PathBuf;

use registrygen_core::{ClassifyError, MergeError, ValidationError};
use thiserror::Error;

/// Errors that can occur while fetching, transforming, or emitting artifacts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("requesting {url}: {message}")]
    Http { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("requesting {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// File or directory I/O failure.
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be decoded or encoded.
    #[error("{what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML document could not be decoded or encoded.
    #[error("{what}: {source}")]
    Yaml {
        what: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// The schema failed a required-field check.
    #[error("invalid package schema: {0}")]
    Validation(#[from] ValidationError),

    /// Metadata classification failed.
    #[error("classifying package: {0}")]
    Classify(#[from] ClassifyError),

    /// The overlay could not be merged into the main schema.
    #[error("merging the overlay schema spec with the main spec: {0}")]
    Merge(#[from] MergeError),

    /// The documentation generator failed.
    #[error("generating docs: {0}")]
    Generator(String),

    /// The repository reference could not be turned into a slug.
    #[error("invalid repository reference {0:?}")]
    InvalidRepo(String),

    /// A registry metadata record has no repository URL.
    #[error("metadata for package {0:?} does not contain the repo_url")]
    MissingRepoUrl(String),

    /// A generated file path would escape its output directory.
    #[error("refusing to write outside the output directory: {0}")]
    UnsafePath(String),
}

impl PipelineError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }

    pub(crate) fn yaml(what: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            what: what.into(),
            source,
        }
    }
}

/// Convenience alias for results with [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
