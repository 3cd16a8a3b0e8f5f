//! HTTP client abstraction for testability.

use std::time::Duration;

use tracing::debug;

use crate::error::{PipelineError, Result};

const USER_AGENT: &str = concat!("registrygen/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP GET.
///
/// Lets the pipelines run against canned responses in tests.
pub trait HttpClient {
    /// Fetches `url` with the given extra request headers and returns the
    /// response body.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the request fails, or
    /// [`PipelineError::Status`] for a non-success status.
    fn get(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with reqwest's default timeouts.
    pub fn new() -> Result<Self> {
        Self::build(reqwest::blocking::Client::builder())
    }

    /// Creates a client with a total request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::build(reqwest::blocking::Client::builder().timeout(Duration::from_secs(timeout_secs)))
    }

    fn build(builder: reqwest::blocking::ClientBuilder) -> Result<Self> {
        let client = builder
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Http {
                url: String::new(),
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        debug!(url, "GET");
        let response = request.send().map_err(|e| PipelineError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| PipelineError::Http {
                url: url.to_string(),
                message: format!("failed to read response: {e}"),
            })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    /// Serves canned bodies keyed by URL and records every request.
    #[derive(Default)]
    pub(crate) struct MockHttpClient {
        responses: HashMap<String, Vec<u8>>,
        pub(crate) requests: RefCell<Vec<(String, Vec<(&'static str, String)>)>>,
    }

    impl MockHttpClient {
        pub(crate) fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.responses.insert(url.to_string(), body.into());
            self
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str, headers: &[(&'static str, String)]) -> Result<Vec<u8>> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), headers.to_vec()));
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| PipelineError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    #[test]
    fn test_mock_client_success() {
        let mock = MockHttpClient::default().with("http://example.com", vec![1, 2, 3]);
        assert_eq!(mock.get("http://example.com", &[]).unwrap(), vec![1, 2, 3]);
        assert_eq!(mock.requests.borrow().len(), 1);
    }

    #[test]
    fn test_mock_client_unknown_url_is_not_found() {
        let mock = MockHttpClient::default();
        let err = mock.get("http://example.com/missing", &[]).unwrap_err();
        assert!(matches!(err, PipelineError::Status { status: 404, .. }));
    }
}
