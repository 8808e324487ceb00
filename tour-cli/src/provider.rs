//! Routing service settings shared by `matrix` and `verify`.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use tokio::runtime::Runtime;
use tour_data::{
    BRouterConfig, BRouterOracle, BRouterServer, DEFAULT_PROFILE, LegSource, find_server,
    upload_profile,
};

use crate::CliError;
use crate::io::{load_bytes, require_existing};

/// Server used when none is configured.
pub(crate) const DEFAULT_SERVER: &str = "brouter";

/// Resolved routing service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ProviderConfig {
    /// Preset the base URL and web links come from.
    pub(crate) server: &'static BRouterServer,
    /// Connection settings; `base_url` may override the preset.
    pub(crate) brouter: BRouterConfig,
    /// Profile script to upload before routing.
    pub(crate) custom_profile: Option<Utf8PathBuf>,
}

/// Unresolved provider options as they arrive from configuration.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProviderOptions {
    pub(crate) server: Option<String>,
    pub(crate) base_url: Option<String>,
    pub(crate) profile: Option<String>,
    pub(crate) custom_profile: Option<Utf8PathBuf>,
    pub(crate) timeout_secs: Option<u64>,
}

impl TryFrom<ProviderOptions> for ProviderConfig {
    type Error = CliError;

    fn try_from(options: ProviderOptions) -> Result<Self, Self::Error> {
        let server = find_server(options.server.as_deref().unwrap_or(DEFAULT_SERVER))?;
        let mut brouter = BRouterConfig::for_server(server);
        if let Some(base_url) = options.base_url {
            brouter.base_url = base_url;
        }
        if let Some(timeout_secs) = options.timeout_secs {
            if timeout_secs == 0 {
                return Err(CliError::InvalidArgument {
                    field: crate::ARG_TIMEOUT,
                    message: "timeout must be at least one second".to_owned(),
                });
            }
            brouter = brouter.with_timeout(Duration::from_secs(timeout_secs));
        }
        let profile = options.profile.unwrap_or_else(|| DEFAULT_PROFILE.to_owned());
        if options.custom_profile.is_none() && !server.knows_profile(&profile) {
            warn!(
                "profile {profile:?} is not in the known list for {}; the server may still offer it",
                server.name
            );
        }
        Ok(Self {
            server,
            brouter: brouter.with_profile(profile),
            custom_profile: options.custom_profile,
        })
    }
}

impl ProviderConfig {
    /// Check that the custom profile, when configured, exists.
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        self.custom_profile
            .as_deref()
            .map_or(Ok(()), |path| require_existing(path, crate::ARG_CUSTOM_PROFILE))
    }
}

/// Builds the leg source a command routes with.
pub(crate) trait LegSourceBuilder {
    fn build(
        &self,
        config: &ProviderConfig,
        runtime: &Runtime,
    ) -> Result<Box<dyn LegSource>, CliError>;
}

/// Routes through a live BRouter server.
pub(crate) struct BRouterSourceBuilder;

impl LegSourceBuilder for BRouterSourceBuilder {
    fn build(
        &self,
        config: &ProviderConfig,
        runtime: &Runtime,
    ) -> Result<Box<dyn LegSource>, CliError> {
        let oracle = BRouterOracle::with_config(config.brouter.clone()).map_err(|source| {
            CliError::BuildProvider {
                base_url: config.brouter.base_url.clone(),
                source,
            }
        })?;
        let oracle = match config.custom_profile.as_deref() {
            Some(path) => install_custom_profile(oracle, path, runtime)?,
            None => oracle,
        };
        info!(
            "routing with {} profile {:?}",
            oracle.config().base_url,
            oracle.config().profile
        );
        Ok(Box::new(oracle))
    }
}

fn install_custom_profile(
    oracle: BRouterOracle,
    path: &Utf8Path,
    runtime: &Runtime,
) -> Result<BRouterOracle, CliError> {
    let script = load_bytes(path, "custom profile")?;
    let name = runtime
        .block_on(upload_profile(&oracle, script))
        .map_err(|source| CliError::UploadProfile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(oracle.with_profile(name))
}

/// Multi-threaded runtime driving the command's requests.
pub(crate) fn command_runtime() -> Result<Runtime, CliError> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
}
