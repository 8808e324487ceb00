//! `VrpExternalSolver` implementation backed by `vrp-core`.

use log::debug;
use tour_core::{ExternalProblem, ExternalSolution, ExternalSolver, TourError};

use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpExternalSolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VrpSolverConfig {
    /// Upper bound on `vrp-core` generations.
    pub max_generations: usize,
    /// Optional wall-clock limit in seconds.
    pub max_time_secs: Option<usize>,
}

impl Default for VrpSolverConfig {
    fn default() -> Self {
        Self {
            max_generations: 50,
            max_time_secs: None,
        }
    }
}

impl VrpSolverConfig {
    /// Override the generation limit.
    #[must_use]
    pub const fn with_max_generations(mut self, generations: usize) -> Self {
        self.max_generations = generations;
        self
    }

    /// Stop searching after `seconds`.
    #[must_use]
    pub const fn with_max_time_secs(mut self, seconds: usize) -> Self {
        self.max_time_secs = Some(seconds);
        self
    }
}

/// Single-vehicle optimiser using `vrp-core` metaheuristics.
#[derive(Debug, Clone, Default)]
pub struct VrpExternalSolver {
    config: VrpSolverConfig,
}

impl VrpExternalSolver {
    /// Construct a solver with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpSolverConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpSolverConfig {
        &self.config
    }
}

impl ExternalSolver for VrpExternalSolver {
    fn solve(&self, problem: &ExternalProblem) -> Result<ExternalSolution, TourError> {
        if problem.size() < 2 {
            return Err(TourError::SolverFailure {
                message: format!("problem has {} nodes, need at least 2", problem.size()),
            });
        }
        debug!(
            "vrp solve over {} nodes ({} -> {}), max {} generations",
            problem.size(),
            problem.start,
            problem.end,
            self.config.max_generations
        );
        let route = VrpSolveContext::new(&self.config).solve(problem)?;
        Ok(ExternalSolution { route })
    }
}
