//! `verify` command: check that every waypoint can be reached and left.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tour_data::verify_waypoints;

use crate::input::{FieldNames, load_waypoints};
use crate::io::{report, require_existing};
use crate::matrix::DEFAULT_CONCURRENCY;
use crate::provider::{
    BRouterSourceBuilder, LegSourceBuilder, ProviderConfig, ProviderOptions, command_runtime,
};
use crate::{
    ARG_BASE_URL, ARG_CONCURRENCY, ARG_CUSTOM_PROFILE, ARG_INPUT, ARG_LIMIT, ARG_NAME_FIELD,
    ARG_PROFILE, ARG_ROLE_FIELD, ARG_SERVER, ARG_TIMEOUT, CliError, ENV_VERIFY_INPUT,
};

/// CLI arguments for the `verify` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "verify",
    long_about = "Route each waypoint from its predecessor in file order, \
                 wrapping from the last back to the first, so every waypoint \
                 is tried once as an origin and once as a destination. Pairs \
                 that fail are listed with a map link. Passing verification \
                 does not guarantee that every leg of the full matrix routes.",
    about = "Check a waypoint file against a BRouter server"
)]
#[ortho_config(prefix = "TOUR")]
pub(crate) struct VerifyArgs {
    /// Waypoint file: a JSON waypoint list or GeoJSON points.
    #[arg(value_name = "waypoints")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// GeoJSON property holding waypoint names.
    #[arg(long = ARG_NAME_FIELD, value_name = "property")]
    #[serde(default)]
    pub(crate) name_field: Option<String>,
    /// GeoJSON property marking the start and end waypoints.
    #[arg(long = ARG_ROLE_FIELD, value_name = "property")]
    #[serde(default)]
    pub(crate) role_field: Option<String>,
    /// Only check the first waypoints of the file.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Known BRouter server (see the servers command).
    #[arg(long = ARG_SERVER, value_name = "name")]
    #[serde(default)]
    pub(crate) server: Option<String>,
    /// Override the server's routing URL.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Routing profile name.
    #[arg(long = ARG_PROFILE, value_name = "name")]
    #[serde(default)]
    pub(crate) profile: Option<String>,
    /// Local profile script to upload and route with.
    #[arg(long = ARG_CUSTOM_PROFILE, value_name = "path")]
    #[serde(default)]
    pub(crate) custom_profile: Option<Utf8PathBuf>,
    /// Per-request timeout in seconds.
    #[arg(long = ARG_TIMEOUT, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout: Option<u64>,
    /// Maximum requests in flight.
    #[arg(long = ARG_CONCURRENCY, value_name = "count")]
    #[serde(default)]
    pub(crate) concurrency: Option<usize>,
}

impl VerifyArgs {
    pub(crate) fn into_config(self) -> Result<VerifyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VerifyConfig::try_from(merged)
    }
}

/// Resolved `verify` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VerifyConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) fields: FieldNames,
    pub(crate) limit: Option<usize>,
    pub(crate) provider: ProviderConfig,
    pub(crate) concurrency: usize,
}

impl TryFrom<VerifyArgs> for VerifyConfig {
    type Error = CliError;

    fn try_from(args: VerifyArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_VERIFY_INPUT,
        })?;
        let defaults = FieldNames::default();
        let provider = ProviderConfig::try_from(ProviderOptions {
            server: args.server,
            base_url: args.base_url,
            profile: args.profile,
            custom_profile: args.custom_profile,
            timeout_secs: args.timeout,
        })?;
        Ok(Self {
            input,
            fields: FieldNames {
                name: args.name_field.unwrap_or(defaults.name),
                role: args.role_field.unwrap_or(defaults.role),
            },
            limit: args.limit,
            provider,
            concurrency: args.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
        })
    }
}

impl VerifyConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)?;
        self.provider.validate_sources()
    }
}

pub(crate) fn run_verify(args: VerifyArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_verify_with(args, &BRouterSourceBuilder, &mut stdout)
}

pub(crate) fn run_verify_with(
    args: VerifyArgs,
    builder: &dyn LegSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_verify(&config, builder, writer)
}

pub(crate) fn execute_verify(
    config: &VerifyConfig,
    builder: &dyn LegSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let mut waypoints = load_waypoints(&config.input, &config.fields)?;
    if let Some(limit) = config.limit {
        waypoints.truncate(limit);
    }
    let runtime = command_runtime()?;
    let source = builder.build(&config.provider, &runtime)?;
    let checks = runtime.block_on(verify_waypoints(
        source.as_ref(),
        &waypoints,
        config.concurrency,
    ));

    let name = |index: usize| waypoints.get(index).map_or("?", |w| w.name.as_str());
    for check in checks.failures() {
        let Err(err) = &check.outcome else { continue };
        report(
            writer,
            &format!("problem from {} to {}: {err}", name(check.from), name(check.to)),
        )?;
        if let (Some(from), Some(to)) = (waypoints.get(check.from), waypoints.get(check.to)) {
            let link = config
                .provider
                .server
                .web_link(from, to, &config.provider.brouter.profile);
            report(writer, &format!("  view: {link}"))?;
        }
    }
    for index in checks.suspect_waypoints() {
        report(
            writer,
            &format!(
                "waypoint {} fails both as origin and destination; it is probably too far from the road network",
                name(index)
            ),
        )?;
    }

    if checks.is_clean() {
        return report(
            writer,
            &format!("verified: all {} waypoints can be routed", waypoints.len()),
        );
    }
    Err(CliError::VerificationFailed {
        failures: checks.failures().count(),
        checked: checks.checks.len(),
    })
}
