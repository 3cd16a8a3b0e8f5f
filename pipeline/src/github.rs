//! GitHub REST API access for release metadata.
//!
//! Only the handful of endpoints the pipelines need: repository tags, the
//! commit behind a tag, and the latest release. Requests carry a bearer
//! token when `GITHUB_TOKEN` is set. Rate limiting is left to GitHub's
//! responses; a 403/429 surfaces as [`PipelineError::Status`].

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::http::HttpClient;

/// Default GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding an optional API token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// A repository tag as returned by `GET /repos/{owner}/{repo}/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubTag {
    pub name: String,
    #[serde(default)]
    pub zipball_url: String,
    #[serde(default)]
    pub tarball_url: String,
    pub commit: TagCommit,
    #[serde(default)]
    pub node_id: String,
}

/// Commit reference embedded in a [`GitHubTag`].
#[derive(Debug, Clone, Deserialize)]
pub struct TagCommit {
    pub sha: String,
    pub url: String,
}

/// A commit as returned by `GET /repos/{owner}/{repo}/commits/{sha}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    pub sha: String,
    #[serde(default)]
    pub node_id: String,
    pub commit: CommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub date: DateTime<Utc>,
}

/// A release as returned by `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Thin GitHub API client over an [`HttpClient`].
pub struct GitHubClient<'a> {
    http: &'a dyn HttpClient,
    api_url: String,
    token: Option<String>,
}

impl<'a> GitHubClient<'a> {
    /// Creates an unauthenticated client.
    pub fn new(http: &'a dyn HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Creates a client that authenticates with `GITHUB_TOKEN` when set.
    pub fn from_env(http: &'a dyn HttpClient, api_url: impl Into<String>) -> Self {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self::new(http, api_url).with_token(token)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Lists the tags of `repo_slug`.
    pub fn tags(&self, repo_slug: &str) -> Result<Vec<GitHubTag>> {
        let url = format!("{}/repos/{repo_slug}/tags", self.api_url);
        self.get_json(&url, &format!("constructing tags information for {repo_slug}"))
    }

    /// Fetches a commit by its API URL.
    pub fn commit(&self, url: &str) -> Result<GitHubCommit> {
        self.get_json(url, &format!("constructing commit information from {url}"))
    }

    /// Returns the author date of the commit tagged `version`, or `None` if
    /// no tag has that name.
    pub fn release_date(&self, repo_slug: &str, version: &str) -> Result<Option<DateTime<Utc>>> {
        let tags = self.tags(repo_slug)?;
        let Some(tag) = tags.iter().find(|t| t.name == version) else {
            debug!(repo_slug, version, "no tag matches the version");
            return Ok(None);
        };
        let commit = self.commit(&tag.commit.url)?;
        Ok(Some(commit.commit.author.date))
    }

    /// Returns the tag name of the latest release of `owner/repo`.
    pub fn latest_release(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/releases/latest", self.api_url);
        let release: GitHubRelease =
            self.get_json(&url, &format!("reading the latest release of {owner}/{repo}"))?;
        Ok(release.tag_name)
    }

    fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Accept", "application/vnd.github+json".to_string())];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let body = self.http.get(url, &self.headers())?;
        serde_json::from_slice(&body).map_err(|e| PipelineError::json(what, e))
    }
}
