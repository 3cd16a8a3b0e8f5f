//! The `metadata` pipeline: schema in, `<package>.yaml` out.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use registrygen_core::{
    ClassifyOptions, ClassifyWarning, PackageContext, PackageMeta, ValidationError, validate_spec,
};
use tracing::{debug, info, warn};

use crate::emit::emit_file;
use crate::error::{PipelineError, Result};
use crate::fetch::{SchemaLocation, load_schema, repo_slug};
use crate::github::GitHubClient;
use crate::http::HttpClient;

/// Inputs of one metadata run.
#[derive(Debug, Clone)]
pub struct MetadataRequest {
    /// `owner/name` of the provider repository, or its GitHub URL.
    pub repo_slug: String,
    /// Release tag; also stamped into the schema.
    pub version: String,
    /// Schema path relative to the repository root.
    pub schema_file: String,
    /// Reads the schema from this local file instead of downloading it.
    pub schema_path: Option<PathBuf>,
    /// Raw-content host used when downloading.
    pub host: String,
    pub category: Option<String>,
    pub publisher: Option<String>,
    pub title: Option<String>,
    pub component: bool,
    /// Directory receiving `<package>.yaml`.
    pub out_dir: PathBuf,
    /// Release timestamp; looked up on GitHub when unset.
    pub updated_on: Option<DateTime<Utc>>,
}

/// What a metadata run produced.
#[derive(Debug, Clone)]
pub struct MetadataOutcome {
    pub meta: PackageMeta,
    pub path: PathBuf,
    pub warnings: Vec<ClassifyWarning>,
}

impl MetadataRequest {
    fn location(&self, slug: &str) -> Result<SchemaLocation> {
        match &self.schema_path {
            Some(path) => Ok(SchemaLocation::Local(path.clone())),
            None => SchemaLocation::remote(&self.host, slug, &self.version, &self.schema_file),
        }
    }

    fn classify_options(&self, updated_on: DateTime<Utc>) -> ClassifyOptions {
        let mut options = ClassifyOptions::new(&self.schema_file, updated_on)
            .with_component(self.component);
        options.category = self.category.clone();
        options.publisher = self.publisher.clone();
        options.title = self.title.clone();
        options
    }
}

/// Generates the registry metadata file for one package.
///
/// # Errors
///
/// Fails if the schema cannot be loaded, has no name or repository, the
/// category override is unknown, the GitHub lookup fails, or the file cannot
/// be written. Nothing is written on failure.
pub fn generate_metadata(
    http: &dyn HttpClient,
    github: &GitHubClient<'_>,
    req: &MetadataRequest,
) -> Result<MetadataOutcome> {
    let slug = repo_slug(&req.repo_slug)?;
    let spec = load_schema(http, &req.location(&slug)?)?;
    let ctx = PackageContext::new(spec, &req.version);

    // The registry links every package to its repository.
    for finding in validate_spec(ctx.spec()) {
        if finding.is_fatal() || finding == ValidationError::MissingRepository {
            return Err(finding.into());
        }
        debug!(package = ctx.name(), "schema check: {finding}");
    }

    let updated_on = resolve_updated_on(github, &slug, req)?;
    let classification = ctx.classify(&req.classify_options(updated_on))?;

    let yaml = serde_yaml::to_string(&classification.meta).map_err(|e| {
        PipelineError::yaml(format!("generating package metadata for {}", ctx.name()), e)
    })?;
    let path = emit_file(&req.out_dir, &format!("{}.yaml", ctx.name()), yaml.as_bytes())?;
    info!(package = ctx.name(), path = %path.display(), "wrote package metadata");

    Ok(MetadataOutcome {
        meta: classification.meta,
        path,
        warnings: classification.warnings,
    })
}

fn resolve_updated_on(
    github: &GitHubClient<'_>,
    slug: &str,
    req: &MetadataRequest,
) -> Result<DateTime<Utc>> {
    if let Some(ts) = req.updated_on {
        return Ok(ts);
    }
    match github.release_date(slug, &req.version)? {
        Some(date) => Ok(date),
        None => {
            warn!(
                repo = slug,
                version = %req.version,
                "no tag found for version; using the current time"
            );
            Ok(Utc::now())
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use registrygen_core::{ClassifyError, PackageCategory, PackageStatus};

    use super::*;
    use crate::fetch::DEFAULT_HOST;
    use crate::github::DEFAULT_API_URL;
    use crate::http::tests::MockHttpClient;

    const SCHEMA_URL: &str =
        "https://raw.githubusercontent.com/acme/pulumi-foo/v1.0.0/provider/cmd/pulumi-resource-foo/schema.json";

    const SCHEMA: &str = r#"{
        "name": "foo",
        "description": "Foo things.",
        "repository": "https://github.com/acme/pulumi-foo",
        "publisher": "Acme",
        "keywords": ["category/network"],
        "attribution": "bridged"
    }"#;

    fn request(out_dir: &std::path::Path) -> MetadataRequest {
        MetadataRequest {
            repo_slug: "acme/pulumi-foo".into(),
            version: "v1.0.0".into(),
            schema_file: "provider/cmd/pulumi-resource-foo/schema.json".into(),
            schema_path: None,
            host: DEFAULT_HOST.into(),
            category: None,
            publisher: None,
            title: None,
            component: false,
            out_dir: out_dir.to_path_buf(),
            updated_on: None,
        }
    }

    fn github_mock() -> MockHttpClient {
        MockHttpClient::default()
            .with(SCHEMA_URL, SCHEMA)
            .with(
                "https://api.github.com/repos/acme/pulumi-foo/tags",
                r#"[{"name": "v1.0.0", "commit": {"sha": "aaa", "url": "https://api.github.com/repos/acme/pulumi-foo/commits/aaa"}}]"#,
            )
            .with(
                "https://api.github.com/repos/acme/pulumi-foo/commits/aaa",
                r#"{"sha": "aaa", "commit": {"author": {"date": "2022-04-15T05:20:00Z"}}}"#,
            )
    }

    #[test]
    fn test_metadata_from_remote_schema() {
        let dir = tempfile::tempdir().unwrap();
        let http = github_mock();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let outcome = generate_metadata(&http, &github, &request(dir.path())).unwrap();
        assert_eq!(outcome.path, dir.path().join("foo.yaml"));
        assert_eq!(outcome.meta.category, PackageCategory::Network);
        assert_eq!(outcome.meta.publisher, "Acme");
        assert_eq!(outcome.meta.schema_file_path, "provider/cmd//schema.json");
        assert_eq!(outcome.meta.package_status, PackageStatus::Ga);
        assert_eq!(outcome.meta.updated_on, 1_650_000_000);
        assert!(!outcome.meta.native);

        let written: PackageMeta =
            serde_yaml::from_str(&std::fs::read_to_string(&outcome.path).unwrap()).unwrap();
        assert_eq!(written, outcome.meta);
    }

    #[test]
    fn test_metadata_accepts_repository_url() {
        let dir = tempfile::tempdir().unwrap();
        let http = github_mock();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(dir.path());
        req.repo_slug = "https://github.com/acme/pulumi-foo".into();
        let outcome = generate_metadata(&http, &github, &req).unwrap();

        assert_eq!(outcome.meta.updated_on, 1_650_000_000);
        let urls: Vec<String> = http.requests.borrow().iter().map(|(url, _)| url.clone()).collect();
        assert!(urls.contains(&SCHEMA_URL.to_string()));
        assert!(urls.contains(&"https://api.github.com/repos/acme/pulumi-foo/tags".to_string()));
    }

    #[test]
    fn test_explicit_updated_on_skips_github() {
        let dir = tempfile::tempdir().unwrap();
        let http = MockHttpClient::default().with(SCHEMA_URL, SCHEMA);
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(dir.path());
        req.updated_on = Some(Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap());
        let outcome = generate_metadata(&http, &github, &req).unwrap();

        assert_eq!(outcome.meta.updated_on, 1_672_628_645);
        assert_eq!(http.requests.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_tag_falls_back_to_now() {
        let dir = tempfile::tempdir().unwrap();
        let http = github_mock();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(dir.path());
        req.version = "v2.0.0".into();
        req.schema_path = Some(write_schema(dir.path(), SCHEMA));
        let before = Utc::now().timestamp();
        let outcome = generate_metadata(&http, &github, &req).unwrap();
        assert!(outcome.meta.updated_on >= before);
        assert_eq!(outcome.meta.version, "v2.0.0");
    }

    #[test]
    fn test_missing_repository_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let http = MockHttpClient::default();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(&out);
        req.schema_path = Some(write_schema(dir.path(), r#"{"name": "foo"}"#));
        let err = generate_metadata(&http, &github, &req).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Validation(ValidationError::MissingRepository)
        ));
        assert!(!out.exists());
        assert!(http.requests.borrow().is_empty());
    }

    #[test]
    fn test_nameless_schema_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let http = MockHttpClient::default();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(dir.path());
        req.schema_path = Some(write_schema(dir.path(), r#"{"repository": "https://x"}"#));
        let err = generate_metadata(&http, &github, &req).unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn test_invalid_category_override_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let http = MockHttpClient::default();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(&out);
        req.schema_path = Some(write_schema(dir.path(), SCHEMA));
        req.updated_on = Some(Utc::now());
        req.category = Some("spaceships".into());
        let err = generate_metadata(&http, &github, &req).unwrap_err();

        assert!(matches!(err, PipelineError::Classify(ClassifyError::InvalidCategory { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let http = MockHttpClient::default();
        let github = GitHubClient::new(&http, DEFAULT_API_URL);

        let mut req = request(dir.path());
        req.schema_path = Some(write_schema(dir.path(), SCHEMA));
        req.updated_on = Some(Utc::now());
        req.category = Some("database".into());
        req.title = Some("Foo DB".into());
        req.component = true;
        let outcome = generate_metadata(&http, &github, &req).unwrap();

        assert_eq!(outcome.meta.category, PackageCategory::Database);
        assert_eq!(outcome.meta.title, "Foo DB");
        assert!(outcome.meta.component);
    }

    fn write_schema(dir: &std::path::Path, body: &str) -> PathBuf {
        let path = dir.join("schema.json");
        std::fs::write(&path, body).unwrap();
        path
    }
}
