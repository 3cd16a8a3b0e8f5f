//! The `pkgversion` check: latest GitHub release against the registry.

use std::fmt;

use registrygen_core::PackageMeta;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::github::GitHubClient;
use crate::http::HttpClient;

/// Latest upstream release and published registry version of a package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub package: String,
    pub latest: String,
    pub registry: String,
}

impl VersionCheck {
    /// Returns `true` if the registry lags behind the latest release.
    pub fn is_outdated(&self) -> bool {
        self.latest != self.registry
    }
}

impl fmt::Display for VersionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Package: {}", self.package)?;
        writeln!(f, "Latest version: {}", self.latest)?;
        write!(f, "Registry version: {}", self.registry)
    }
}

/// Registry package name for a provider repository (`pulumi-aws` → `aws`).
pub fn package_name(repo: &str) -> &str {
    repo.strip_prefix("pulumi-").unwrap_or(repo)
}

/// Compares the latest release of `owner/repo` with the version published
/// under `<registry_raw_url>/<package>.yaml`.
///
/// # Errors
///
/// Fails if either document cannot be fetched or decoded.
pub fn check_version(
    http: &dyn HttpClient,
    github: &GitHubClient<'_>,
    registry_raw_url: &str,
    owner: &str,
    repo: &str,
) -> Result<VersionCheck> {
    let latest = github.latest_release(owner, repo)?;
    let package = package_name(repo);

    let url = format!("{}/{package}.yaml", registry_raw_url.trim_end_matches('/'));
    let body = http.get(&url, &[])?;
    let meta: PackageMeta = serde_yaml::from_slice(&body)
        .map_err(|e| PipelineError::yaml(format!("reading registry metadata from {url}"), e))?;

    let check = VersionCheck {
        package: package.to_string(),
        latest,
        registry: meta.version,
    };
    info!(
        package = %check.package,
        latest = %check.latest,
        registry = %check.registry,
        "checked package version"
    );
    Ok(check)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_REGISTRY_RAW_URL;
    use crate::github::DEFAULT_API_URL;
    use crate::http::tests::MockHttpClient;

    fn mock(registry_yaml: &str) -> MockHttpClient {
        MockHttpClient::default()
            .with(
                "https://api.github.com/repos/pulumi/pulumi-aws/releases/latest",
                r#"{"tag_name": "v5.1.0", "name": "v5.1.0"}"#,
            )
            .with(
                &format!("{DEFAULT_REGISTRY_RAW_URL}/aws.yaml"),
                registry_yaml,
            )
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("pulumi-aws"), "aws");
        assert_eq!(package_name("terraform-provider"), "terraform-provider");
    }

    #[test]
    fn test_outdated_registry() {
        let http = mock("name: aws\nversion: v5.0.0\n");
        let github = GitHubClient::new(&http, DEFAULT_API_URL);
        let check =
            check_version(&http, &github, DEFAULT_REGISTRY_RAW_URL, "pulumi", "pulumi-aws").unwrap();

        assert_eq!(check.package, "aws");
        assert_eq!(check.latest, "v5.1.0");
        assert_eq!(check.registry, "v5.0.0");
        assert!(check.is_outdated());
        assert!(check.to_string().contains("Registry version: v5.0.0"));
    }

    #[test]
    fn test_current_registry() {
        let http = mock("name: aws\nversion: v5.1.0\n");
        let github = GitHubClient::new(&http, DEFAULT_API_URL);
        let check =
            check_version(&http, &github, DEFAULT_REGISTRY_RAW_URL, "pulumi", "pulumi-aws").unwrap();
        assert!(!check.is_outdated());
    }

    #[test]
    fn test_missing_registry_entry() {
        let http = MockHttpClient::default().with(
            "https://api.github.com/repos/pulumi/pulumi-aws/releases/latest",
            r#"{"tag_name": "v5.1.0"}"#,
        );
        let github = GitHubClient::new(&http, DEFAULT_API_URL);
        let err = check_version(&http, &github, DEFAULT_REGISTRY_RAW_URL, "pulumi", "pulumi-aws")
            .unwrap_err();
        assert!(matches!(err, PipelineError::Status { status: 404, .. }));
    }
}
