//! Connection settings for [`BRouterOracle`](super::BRouterOracle).

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::servers::BRouterServer;

/// Default user agent for BRouter requests.
pub const DEFAULT_USER_AGENT: &str = "waypoint-tour/0.1";

/// Profile used when none is configured.
pub const DEFAULT_PROFILE: &str = "trekking";

/// Default base URL, the public `brouter.de` servlet.
const DEFAULT_BASE_URL: &str = "https://brouter.de/brouter";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while constructing a BRouter client.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The base URL is not an absolute HTTP(S) URL.
    #[error("invalid BRouter base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`BRouterOracle`](super::BRouterOracle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BRouterConfig {
    /// Servlet URL, e.g. `"https://brouter.de/brouter"`.
    pub base_url: String,
    /// Routing profile name passed with every request.
    pub profile: String,
    /// Request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for BRouterConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: DEFAULT_PROFILE.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl BRouterConfig {
    /// Create a configuration for the servlet at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create a configuration for one of the known servers.
    #[must_use]
    pub fn for_server(server: &BRouterServer) -> Self {
        Self::new(server.base_url)
    }

    /// Set the routing profile.
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Base URL without trailing slashes.
    pub(crate) fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Check that the base URL is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError::InvalidBaseUrl`] when the URL does not
    /// parse or does not use `http` or `https`.
    pub fn validate(&self) -> Result<(), ProviderBuildError> {
        let invalid = |message: String| ProviderBuildError::InvalidBaseUrl {
            url: self.base_url.clone(),
            message,
        };
        let url = Url::parse(self.trimmed_base_url()).map_err(|err| invalid(err.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme {other:?}"))),
        }
    }
}
