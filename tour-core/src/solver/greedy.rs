//! Greedy cheapest-segment tour construction.
//!
//! Edges are accepted cheapest first. Accepting `(i, j)` closes row `i` and
//! column `j`, and the cell that would close the growing chain into a cycle
//! is forbidden. The solver owns a private copy of the costs for this
//! bookkeeping.

use std::collections::BTreeMap;

use log::debug;

use crate::matrix::{CostMatrix, Matrix};
use crate::solver::{TourError, TourSolver, ensure_size};
use crate::tour::{Algorithm, AlgorithmLabel, Edge, Tour, TourMode, thread_edges};

/// Builds tours by repeatedly accepting the globally cheapest segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyEdgeSolver;

/// Disjoint chains of accepted edges, keyed by chain start.
#[derive(Debug, Default)]
struct ChainRecord {
    chains: BTreeMap<usize, (usize, usize)>,
}

impl ChainRecord {
    fn ending_at(&self, node: usize) -> Option<(usize, usize)> {
        self.chains.values().copied().find(|&(_, end)| end == node)
    }

    /// Endpoints of the chain that accepting `from -> to` would produce.
    fn resolve(&self, from: usize, to: usize) -> (usize, usize) {
        let end = self.chains.get(&to).map_or(to, |&(_, end)| end);
        let start = self.ending_at(from).map_or(from, |(start, _)| start);
        (start, end)
    }

    /// Join `from -> to` with its neighbours and return the merged chain.
    fn merge(&mut self, from: usize, to: usize) -> (usize, usize) {
        let mut chain = (from, to);
        if let Some((_, end)) = self.chains.remove(&to) {
            chain.1 = end;
        }
        if let Some((start, _)) = self.ending_at(from) {
            self.chains.remove(&start);
            chain.0 = start;
        }
        self.chains.insert(chain.0, chain);
        chain
    }
}

/// Private mutable copy of the costs.
struct WorkingCosts {
    cells: Matrix<f64>,
}

impl WorkingCosts {
    fn new(costs: &CostMatrix, mode: TourMode) -> Self {
        let mut cells = costs.as_matrix().clone();
        let size = cells.size();
        if mode == TourMode::OneWay {
            let end = size.saturating_sub(1);
            for other in 0..size {
                cells.set(end, other, f64::INFINITY);
                cells.set(other, 0, f64::INFINITY);
            }
            cells.set(0, end, f64::INFINITY);
        }
        Self { cells }
    }

    /// Cheapest finite off-diagonal cell, first in row-major order on ties.
    fn cheapest(&self) -> Option<(usize, usize, f64)> {
        let mut best: Option<(usize, usize, f64)> = None;
        for (from, row) in self.cells.rows().enumerate() {
            for (to, &cost) in row.iter().enumerate() {
                if from != to
                    && cost.is_finite()
                    && best.is_none_or(|(_, _, lowest)| cost < lowest)
                {
                    best = Some((from, to, cost));
                }
            }
        }
        best
    }

    fn forbid(&mut self, from: usize, to: usize) {
        self.cells.set(from, to, f64::INFINITY);
    }

    fn forbid_row_and_column(&mut self, row: usize, column: usize) {
        for other in 0..self.cells.size() {
            self.forbid(row, other);
            self.forbid(other, column);
        }
    }
}

impl TourSolver for GreedyEdgeSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ShortestSegment
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "tour cost is the sum of floating-point edge costs"
    )]
    fn solve(&self, costs: &CostMatrix, mode: TourMode) -> Result<Tour, TourError> {
        let size = costs.size();
        ensure_size(size, mode)?;
        let end = mode.end_index(size);
        let mut working = WorkingCosts::new(costs, mode);
        let mut chains = ChainRecord::default();
        let mut accepted: Vec<Edge> = Vec::with_capacity(size);
        let mut total = 0.0;
        let mut closing: Option<Edge> = None;

        while let Some((from, to, cost)) = working.cheapest() {
            if mode == TourMode::OneWay
                && accepted.len() < size.saturating_sub(2)
                && chains.resolve(from, to) == (0, end)
            {
                working.forbid(from, to);
                continue;
            }
            accepted.push(Edge::new(from, to));
            total += cost;
            working.forbid_row_and_column(from, to);
            working.forbid(to, from);

            let (start, finish) = chains.merge(from, to);
            working.forbid(finish, start);
            closing = Some(Edge::new(finish, start));
        }
        debug!("greedy {mode} accepted {} of {size} candidate edges", accepted.len());

        let required = size.saturating_sub(1);
        if accepted.len() != required {
            return Err(TourError::IncompleteTour {
                at: accepted.last().map_or(0, |edge| edge.to),
                remaining: required.saturating_sub(accepted.len()),
            });
        }
        if mode == TourMode::RoundTrip {
            let Some(edge) = closing else {
                return Err(TourError::IncompleteTour { at: 0, remaining: 1 });
            };
            let cost = costs.cost(edge.from, edge.to);
            if !cost.is_finite() {
                return Err(TourError::NoFeasibleTour {
                    algorithm: Algorithm::ShortestSegment,
                });
            }
            accepted.push(edge);
            total += cost;
        }

        let edges = thread_edges(accepted, 0)?;
        Ok(Tour::new(
            edges,
            total,
            AlgorithmLabel::new(mode, Algorithm::ShortestSegment),
        ))
    }
}
