//! `matrix` command: fetch every leg between the waypoints and cache them.

use std::io::Write;
use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tour_core::{ProgressCallback, TourMode, arrange_waypoints};
use tour_data::MatrixFetchPool;

use crate::cache::MatrixCache;
use crate::input::{FieldNames, load_waypoints};
use crate::io::{report, require_existing};
use crate::provider::{
    BRouterSourceBuilder, LegSourceBuilder, ProviderConfig, ProviderOptions, command_runtime,
};
use crate::{
    ARG_BASE_URL, ARG_CONCURRENCY, ARG_CUSTOM_PROFILE, ARG_INPUT, ARG_NAME_FIELD, ARG_ONE_WAY_ONLY,
    ARG_OUTPUT, ARG_PROFILE, ARG_RETRIES, ARG_ROLE_FIELD, ARG_SERVER, ARG_TIMEOUT, CliError,
    ENV_MATRIX_INPUT, ENV_MATRIX_OUTPUT,
};

/// Requests in flight when none is configured.
pub(crate) const DEFAULT_CONCURRENCY: usize = 4;

/// CLI arguments for the `matrix` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "matrix",
    long_about = "Route every pair of waypoints through a BRouter server and \
                 store the legs in a JSON cache for the routes command. A \
                 waypoint marked as start is moved first and one marked as \
                 end is moved last.",
    about = "Fetch and cache the leg matrix for a waypoint file"
)]
#[ortho_config(prefix = "TOUR")]
pub(crate) struct MatrixArgs {
    /// Waypoint file: a JSON waypoint list or GeoJSON points.
    #[arg(value_name = "waypoints")]
    #[serde(default)]
    pub(crate) input: Option<Utf8PathBuf>,
    /// Where to write the leg cache.
    #[arg(value_name = "cache")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// GeoJSON property holding waypoint names.
    #[arg(long = ARG_NAME_FIELD, value_name = "property")]
    #[serde(default)]
    pub(crate) name_field: Option<String>,
    /// GeoJSON property marking the start and end waypoints.
    #[arg(long = ARG_ROLE_FIELD, value_name = "property")]
    #[serde(default)]
    pub(crate) role_field: Option<String>,
    /// Only fetch the legs a one-way tour can use.
    #[arg(
        long = ARG_ONE_WAY_ONLY,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) one_way_only: Option<bool>,
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
    /// Retries for timeouts and connection failures.
    #[arg(long = ARG_RETRIES, value_name = "count")]
    #[serde(default)]
    pub(crate) retries: Option<u32>,
}

impl MatrixArgs {
    pub(crate) fn into_config(self) -> Result<MatrixConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        MatrixConfig::try_from(merged)
    }
}

/// Resolved `matrix` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MatrixConfig {
    pub(crate) input: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
    pub(crate) fields: FieldNames,
    pub(crate) mode: TourMode,
    pub(crate) provider: ProviderConfig,
    pub(crate) concurrency: usize,
    pub(crate) retries: u32,
}

impl MatrixConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.input, ARG_INPUT)?;
        self.provider.validate_sources()
    }
}

impl TryFrom<MatrixArgs> for MatrixConfig {
    type Error = CliError;

    fn try_from(args: MatrixArgs) -> Result<Self, Self::Error> {
        let input = args.input.ok_or(CliError::MissingArgument {
            field: ARG_INPUT,
            env: ENV_MATRIX_INPUT,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_MATRIX_OUTPUT,
        })?;
        let defaults = FieldNames::default();
        let fields = FieldNames {
            name: args.name_field.unwrap_or(defaults.name),
            role: args.role_field.unwrap_or(defaults.role),
        };
        let mode = if args.one_way_only.unwrap_or(false) {
            TourMode::OneWay
        } else {
            TourMode::RoundTrip
        };
        let provider = ProviderConfig::try_from(ProviderOptions {
            server: args.server,
            base_url: args.base_url,
            profile: args.profile,
            custom_profile: args.custom_profile,
            timeout_secs: args.timeout,
        })?;
        Ok(Self {
            input,
            output,
            fields,
            mode,
            provider,
            concurrency: args.concurrency.unwrap_or(DEFAULT_CONCURRENCY).max(1),
            retries: args.retries.unwrap_or(0),
        })
    }
}

pub(crate) fn run_matrix(args: MatrixArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_matrix_with(args, &BRouterSourceBuilder, &mut stdout)
}

pub(crate) fn run_matrix_with(
    args: MatrixArgs,
    builder: &dyn LegSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_matrix(&config, builder, writer)
}

pub(crate) fn execute_matrix(
    config: &MatrixConfig,
    builder: &dyn LegSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let waypoints = arrange_waypoints(load_waypoints(&config.input, &config.fields)?).map_err(
        |source| CliError::InvalidWaypoints {
            path: config.input.clone(),
            source,
        },
    )?;
    let runtime = command_runtime()?;
    let source = builder.build(&config.provider, &runtime)?;
    let pool = MatrixFetchPool::new(source.as_ref())
        .with_concurrency(config.concurrency)
        .with_retries(config.retries)
        .with_progress(progress_logger());
    let legs = runtime.block_on(pool.fetch(&waypoints, config.mode))?;

    let count = waypoints.len();
    let cache = MatrixCache::new(waypoints, legs)?;
    cache.save(&config.output)?;
    report(
        writer,
        &format!("{} written with legs for {count} waypoints", config.output),
    )
}

fn progress_logger() -> ProgressCallback {
    Arc::new(|done, total| {
        let step = (total / 10).max(1);
        if done % step == 0 || done == total {
            info!("fetched {done} of {total} legs");
        }
    })
}

#[cfg(test)]
pub(crate) fn matrix_config_from_layers(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<MatrixConfig, CliError> {
    let merged = MatrixArgs::merge_from_layers(layers).map_err(CliError::from)?;
    MatrixConfig::try_from(merged)
}
