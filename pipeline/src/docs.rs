//! The `docs` and `all-docs` pipelines.

use std::path::{Path, PathBuf};

use registrygen_core::{PackageContext, PackageMeta, validate_spec};
use tracing::{debug, info};

use crate::emit::{clear_dir, emit_file};
use crate::error::{PipelineError, Result};
use crate::fetch::{SchemaLocation, load_schema, repo_slug};
use crate::generator::DocsGenerator;
use crate::http::HttpClient;
use crate::overlay::OverlaySet;

/// Conventional provider schema location, used when a registry metadata
/// record does not name one.
fn default_schema_file(package: &str) -> String {
    format!("provider/cmd/pulumi-resource-{package}/schema.json")
}

/// Inputs of one docs run.
#[derive(Debug, Clone)]
pub struct DocsRequest {
    /// Repository slug or URL.
    pub repo: String,
    pub version: String,
    /// Schema path relative to the repository root.
    pub schema_file: String,
    /// Reads the schema from this local file instead of downloading it.
    pub schema_path: Option<PathBuf>,
    pub host: String,
    /// Cleared, then filled with generated pages.
    pub docs_out_dir: PathBuf,
    /// Receives `<package>.json`.
    pub package_tree_out_dir: PathBuf,
}

/// What a docs run produced.
#[derive(Debug, Clone)]
pub struct DocsOutcome {
    pub package: String,
    pub files: Vec<PathBuf>,
    pub tree_path: PathBuf,
    pub overlay_applied: bool,
}

/// Generates API docs and the navigation tree for one package.
///
/// # Errors
///
/// Fails if the schema or its overlay cannot be loaded or merged, the
/// generator fails, or an output cannot be written.
pub fn generate_docs(
    http: &dyn HttpClient,
    overlays: &OverlaySet,
    generator: &dyn DocsGenerator,
    req: &DocsRequest,
) -> Result<DocsOutcome> {
    let location = match &req.schema_path {
        Some(path) => SchemaLocation::Local(path.clone()),
        None => SchemaLocation::remote(&req.host, &req.repo, &req.version, &req.schema_file)?,
    };
    let mut ctx = PackageContext::new(load_schema(http, &location)?, &req.version);
    if let Some(fatal) = validate_spec(ctx.spec()).into_iter().find(|f| f.is_fatal()) {
        return Err(fatal.into());
    }

    let overlay = overlays.get(ctx.name())?;
    let overlay_applied = overlay.is_some();
    if let Some(overlay) = overlay {
        info!(package = ctx.name(), "merging overlay schema");
        ctx = ctx.apply_overlay(&overlay)?;
    }

    let pages = generator.generate_package(ctx.spec())?;
    let tree = generator.generate_package_tree(ctx.spec())?;

    clear_dir(&req.docs_out_dir)?;
    let mut files = Vec::with_capacity(pages.len());
    for (rel, contents) in &pages {
        files.push(emit_file(&req.docs_out_dir, rel, contents)?);
    }

    let tree_json = serde_json::to_vec_pretty(&tree)
        .map_err(|e| PipelineError::json("marshalling the package navigation tree", e))?;
    let tree_path = emit_file(
        &req.package_tree_out_dir,
        &format!("{}.json", ctx.name()),
        &tree_json,
    )?;
    info!(
        package = ctx.name(),
        pages = files.len(),
        tree = %tree_path.display(),
        "generated API docs"
    );

    Ok(DocsOutcome {
        package: ctx.name().to_string(),
        files,
        tree_path,
        overlay_applied,
    })
}

/// Inputs of an all-docs run.
#[derive(Debug, Clone)]
pub struct AllDocsRequest {
    /// Directory of registry `<package>.yaml` metadata files.
    pub registry_packages_path: PathBuf,
    /// Each package's docs go to `<docs_out_dir>/<package>/api-docs`.
    pub docs_out_dir: PathBuf,
    pub package_tree_out_dir: PathBuf,
    pub host: String,
}

/// Reads every registry metadata record in `dir`, sorted by file name.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if the directory or a file cannot be read,
/// or [`PipelineError::Yaml`] naming the file if it is malformed.
pub fn read_registry_metadata(dir: &Path) -> Result<Vec<PackageMeta>> {
    let entries =
        std::fs::read_dir(dir).map_err(|e| PipelineError::io("reading packages directory", dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| PipelineError::io("reading packages directory", dir, e))?
            .path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == "yaml" || e == "yml");
        if is_yaml && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path)
                .map_err(|e| PipelineError::io("reading package metadata", path, e))?;
            serde_yaml::from_slice(&bytes).map_err(|e| {
                PipelineError::yaml(format!("unmarshalling package metadata {}", path.display()), e)
            })
        })
        .collect()
}

/// Runs the docs pipeline for every package listed in the registry.
///
/// Stops at the first failing package.
pub fn generate_all_docs(
    http: &dyn HttpClient,
    overlays: &OverlaySet,
    generator: &dyn DocsGenerator,
    req: &AllDocsRequest,
) -> Result<Vec<DocsOutcome>> {
    let packages = read_registry_metadata(&req.registry_packages_path)?;
    info!(count = packages.len(), "generating docs for registry packages");

    let mut outcomes = Vec::with_capacity(packages.len());
    for meta in packages {
        if meta.repo_url.is_empty() {
            return Err(PipelineError::MissingRepoUrl(meta.name));
        }
        let schema_file = if meta.schema_file_path.is_empty() {
            default_schema_file(&meta.name)
        } else {
            meta.schema_file_path.clone()
        };
        debug!(package = %meta.name, version = %meta.version, "generating docs");

        let docs_req = DocsRequest {
            repo: repo_slug(&meta.repo_url)?,
            version: meta.version.clone(),
            schema_file,
            schema_path: None,
            host: req.host.clone(),
            docs_out_dir: req.docs_out_dir.join(&meta.name).join("api-docs"),
            package_tree_out_dir: req.package_tree_out_dir.clone(),
        };
        outcomes.push(generate_docs(http, overlays, generator, &docs_req)?);
    }
    Ok(outcomes)
}
