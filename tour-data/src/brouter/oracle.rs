//! Single-leg queries against a BRouter servlet.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use tour_core::{DistanceOracle, OracleError, RouteLeg, Waypoint};

use super::config::{BRouterConfig, ProviderBuildError};
use super::geojson::FeatureCollection;
use crate::pool::LegSource;

/// BRouter-backed [`DistanceOracle`].
///
/// The oracle owns a current-thread Tokio runtime that is reused across
/// synchronous calls. When [`DistanceOracle::query`] runs inside a
/// multi-threaded runtime, the caller's handle is used with
/// [`tokio::task::block_in_place`] instead. Inside a `current_thread`
/// runtime the oracle falls back to its own runtime, which blocks the
/// caller's executor for the duration of the request.
///
/// Async callers should use [`BRouterOracle::route`] or the
/// [`LegSource`] implementation directly.
pub struct BRouterOracle {
    client: Client,
    config: BRouterConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for BRouterOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BRouterOracle")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl BRouterOracle {
    /// Create an oracle for the servlet at `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(BRouterConfig::new(base_url))
    }

    /// Create an oracle with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn with_config(config: BRouterConfig) -> Result<Self, ProviderBuildError> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BRouterConfig {
        &self.config
    }

    /// Switch to another routing profile, e.g. one returned by
    /// [`upload_profile`](super::upload_profile).
    #[must_use]
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.config.profile = profile.into();
        self
    }

    pub(crate) const fn client(&self) -> &Client {
        &self.client
    }

    /// Build the GET URL for one leg.
    ///
    /// Coordinates are written as `lon,lat` with six decimals.
    #[must_use]
    pub fn leg_url(&self, from: &Waypoint, to: &Waypoint) -> String {
        format!(
            "{}?lonlats={:.6},{:.6}|{:.6},{:.6}&profile={}&alternativeidx=0&format=geojson",
            self.config.trimmed_base_url(),
            from.location.x,
            from.location.y,
            to.location.x,
            to.location.y,
            self.config.profile
        )
    }

    /// Fetch the leg `from -> to` asynchronously.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Timeout`] or [`OracleError::NetworkError`] for
    /// transport failures, [`OracleError::HttpError`] for unexpected
    /// statuses, [`OracleError::Unroutable`] when the server answers with a
    /// plain-text routing message and [`OracleError::ParseError`] for
    /// malformed GeoJSON.
    pub async fn route(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        let url = self.leg_url(from, to);
        debug!("routing {} -> {} via {url}", from.name, to.name);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, &url))?;

        classify_response(status, &body, &url).inspect_err(|err| {
            warn!("leg {} -> {} failed: {err}", from.name, to.name);
        })
    }

    /// Convert a reqwest error to an [`OracleError`].
    pub(crate) fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> OracleError {
        if error.is_timeout() {
            return OracleError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return OracleError::HttpError {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        OracleError::NetworkError {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Interpret a BRouter answer.
///
/// JSON bodies must be a successful GeoJSON track. Plain-text bodies are
/// BRouter's routing diagnostics (e.g. `from-position not mapped in existing
/// datafile`) and mean the pair cannot be routed. Anything else is an HTTP
/// failure.
fn classify_response(status: StatusCode, body: &str, url: &str) -> Result<RouteLeg, OracleError> {
    let trimmed = body.trim();
    let http_error = || OracleError::HttpError {
        url: url.to_owned(),
        status: status.as_u16(),
        message: first_line(trimmed),
    };

    if trimmed.starts_with('{') {
        if !status.is_success() {
            return Err(http_error());
        }
        let collection: FeatureCollection =
            serde_json::from_str(trimmed).map_err(|err| OracleError::ParseError {
                message: err.to_string(),
            })?;
        return collection.into_leg();
    }

    let diagnostic_status = status.is_success()
        || status == StatusCode::BAD_REQUEST
        || status == StatusCode::INTERNAL_SERVER_ERROR;
    if trimmed.is_empty() || trimmed.starts_with('<') || !diagnostic_status {
        if status.is_success() {
            return Err(OracleError::ParseError {
                message: "response is neither GeoJSON nor a routing message".to_owned(),
            });
        }
        return Err(http_error());
    }

    Err(OracleError::Unroutable {
        message: first_line(trimmed),
    })
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().trim().to_owned()
}

impl DistanceOracle for BRouterOracle {
    /// Fetch one leg, blocking the calling thread.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime should
    /// be multi-threaded. Inside a `current_thread` runtime the oracle uses
    /// its internal runtime, which may deadlock if the caller's runtime is
    /// driving IO this request depends on.
    fn query(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        let future = self.route(from, to);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[async_trait]
impl LegSource for BRouterOracle {
    async fn leg(&self, from: &Waypoint, to: &Waypoint) -> Result<RouteLeg, OracleError> {
        self.route(from, to).await
    }
}
