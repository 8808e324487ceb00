//! `routes` command: solve tours over a cached leg matrix and export them.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::{info, warn};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tour_core::{
    CostMatrixBuilder, EngineOptions, GeometryMatrix, Metric, RouteConstructionEngine,
    Tour, Waypoint,
};

use crate::cache::MatrixCache;
use crate::io::{report, require_existing, write_json};
use crate::{
    ARG_CACHE, ARG_EXACT, ARG_METRIC, ARG_ONE_WAY, ARG_OUTPUT, ARG_ROUND_TRIP, ARG_VRP,
    ARG_VRP_GENERATIONS, CliError, ENV_ROUTES_CACHE, ENV_ROUTES_OUTPUT,
};

/// Above this many waypoints the exhaustive search gets very slow.
const EXACT_WARNING_THRESHOLD: usize = 12;

/// CLI arguments for the `routes` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "routes",
    long_about = "Run the tour construction algorithms over a leg cache \
                 written by the matrix command and export one GeoJSON \
                 track per successful algorithm.",
    about = "Build tours from a cached leg matrix"
)]
#[ortho_config(prefix = "TOUR")]
pub(crate) struct RoutesArgs {
    /// Leg cache written by the matrix command.
    #[arg(value_name = "cache")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
    /// Where to write the GeoJSON tracks.
    #[arg(value_name = "tracks")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Build round trips returning to the start.
    #[arg(
        long = ARG_ROUND_TRIP,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) round_trip: Option<bool>,
    /// Build one-way tours from the first to the last waypoint.
    #[arg(
        long = ARG_ONE_WAY,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) one_way: Option<bool>,
    /// Also run the exhaustive search.
    #[arg(
        long = ARG_EXACT,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) exact: Option<bool>,
    /// Figure to minimise: distance, time, energy or cost.
    #[arg(long = ARG_METRIC, value_name = "metric")]
    #[serde(default)]
    pub(crate) metric: Option<String>,
    /// Also run the vrp-core optimiser.
    #[arg(
        long = ARG_VRP,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) vrp: Option<bool>,
    /// Generation limit for the vrp-core optimiser.
    #[arg(long = ARG_VRP_GENERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) vrp_generations: Option<usize>,
}

impl RoutesArgs {
    pub(crate) fn into_config(self) -> Result<RoutesConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RoutesConfig::try_from(merged)
    }
}

/// Resolved `routes` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RoutesConfig {
    pub(crate) cache: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
    pub(crate) options: EngineOptions,
    pub(crate) metric: Metric,
    /// Generation limit when the external optimiser is requested.
    pub(crate) vrp_generations: Option<usize>,
}

impl TryFrom<RoutesArgs> for RoutesConfig {
    type Error = CliError;

    fn try_from(args: RoutesArgs) -> Result<Self, Self::Error> {
        let cache = args.cache.ok_or(CliError::MissingArgument {
            field: ARG_CACHE,
            env: ENV_ROUTES_CACHE,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_ROUTES_OUTPUT,
        })?;
        let metric = match args.metric {
            Some(name) => name
                .parse::<Metric>()
                .map_err(|err| CliError::InvalidArgument {
                    field: ARG_METRIC,
                    message: err.to_string(),
                })?,
            None => Metric::default(),
        };
        let options = EngineOptions::default()
            .with_round_trip(args.round_trip.unwrap_or(false))
            .with_one_way(args.one_way.unwrap_or(false))
            .with_exact(args.exact.unwrap_or(false));
        let vrp_generations = args
            .vrp
            .unwrap_or(false)
            .then(|| args.vrp_generations.unwrap_or(DEFAULT_VRP_GENERATIONS));
        Ok(Self {
            cache,
            output,
            options,
            metric,
            vrp_generations,
        })
    }
}

/// Generation limit for the external optimiser when none is configured.
const DEFAULT_VRP_GENERATIONS: usize = 50;

impl RoutesConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.cache, ARG_CACHE)
    }
}

pub(crate) fn run_routes(args: RoutesArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_routes_with(args, &mut stdout)
}

pub(crate) fn run_routes_with(args: RoutesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    execute_routes(&config, writer)
}

pub(crate) fn execute_routes(config: &RoutesConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let engine = build_engine(config)?;
    let cache = MatrixCache::load(&config.cache)?;
    if config.options.include_exact && cache.waypoints.len() > EXACT_WARNING_THRESHOLD {
        warn!(
            "exhaustive search over {} waypoints may take a very long time",
            cache.waypoints.len()
        );
    }
    let (costs, geometry) = CostMatrixBuilder::from_legs(&cache.legs, config.metric)?;
    let outcomes = engine.run(&costs, &config.options)?;

    let mut features = Vec::new();
    for outcome in &outcomes {
        let line = match &outcome.result {
            Ok(tour) => match track_feature(tour, &geometry, &cache.waypoints, config.metric) {
                Some(feature) => {
                    features.push(feature);
                    format!("{}: {:.1} {}", outcome.label, tour.cost(), config.metric)
                }
                None => format!(
                    "{}: {:.1} {} (no geometry)",
                    outcome.label,
                    tour.cost(),
                    config.metric
                ),
            },
            Err(err) => format!("{}: failed: {err}", outcome.label),
        };
        report(writer, &line)?;
    }
    let written = features.len();
    write_json(&config.output, "tracks", &TrackCollection::new(features))?;
    info!("wrote {written} of {} tours", outcomes.len());
    report(writer, &format!("{} written with {written} tracks", config.output))
}

fn build_engine(config: &RoutesConfig) -> Result<RouteConstructionEngine, CliError> {
    let engine = RouteConstructionEngine::new();
    match config.vrp_generations {
        None => Ok(engine),
        Some(generations) => with_vrp(engine, generations),
    }
}

#[cfg(feature = "solver-vrp")]
fn with_vrp(
    engine: RouteConstructionEngine,
    generations: usize,
) -> Result<RouteConstructionEngine, CliError> {
    use tour_core::ExternalSolverAdapter;
    use tour_solver_vrp::{VrpExternalSolver, VrpSolverConfig};

    let solver = VrpExternalSolver::with_config(
        VrpSolverConfig::default().with_max_generations(generations.max(1)),
    );
    Ok(engine.with_external_solver(ExternalSolverAdapter::new(solver)))
}

#[cfg(not(feature = "solver-vrp"))]
fn with_vrp(
    _engine: RouteConstructionEngine,
    _generations: usize,
) -> Result<RouteConstructionEngine, CliError> {
    Err(CliError::MissingFeature {
        feature: "solver-vrp",
        action: "--vrp",
    })
}

/// GeoJSON document holding one line per tour.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TrackCollection {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) features: Vec<TrackFeature>,
}

impl TrackCollection {
    fn new(features: Vec<TrackFeature>) -> Self {
        Self {
            kind: "FeatureCollection".to_owned(),
            features,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TrackFeature {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) properties: TrackProperties,
    pub(crate) geometry: TrackGeometry,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TrackProperties {
    /// Algorithm label such as `RTSS`.
    pub(crate) name: String,
    pub(crate) cost: f64,
    pub(crate) metric: Metric,
    /// Waypoint names in visiting order.
    pub(crate) stops: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TrackGeometry {
    #[serde(rename = "type")]
    pub(crate) kind: String,
    pub(crate) coordinates: Vec<[f64; 2]>,
}

fn track_feature(
    tour: &Tour,
    geometry: &GeometryMatrix,
    waypoints: &[Waypoint],
    metric: Metric,
) -> Option<TrackFeature> {
    let line = match tour.track(geometry) {
        Ok(line) => line,
        Err(err) => {
            warn!("{}: {err}", tour.label());
            return None;
        }
    };
    let stops = tour
        .order()
        .into_iter()
        .filter_map(|index| waypoints.get(index).map(|w| w.name.clone()))
        .collect();
    Some(TrackFeature {
        kind: "Feature".to_owned(),
        properties: TrackProperties {
            name: tour.label().to_string(),
            cost: tour.cost(),
            metric,
            stops,
        },
        geometry: TrackGeometry {
            kind: "LineString".to_owned(),
            coordinates: line.coords().map(|c| [c.x, c.y]).collect(),
        },
    })
}

#[cfg(test)]
pub(crate) fn routes_config_from_layers(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RoutesConfig, CliError> {
    let merged = RoutesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RoutesConfig::try_from(merged)
}
