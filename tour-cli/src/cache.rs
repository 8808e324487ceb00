//! The leg matrix cache shared by `matrix` and `routes`.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use tour_core::{LegMatrix, MatrixError, Waypoint};

use crate::CliError;
use crate::io::{load_json, write_json};

/// Waypoints in solver order with every fetched leg.
///
/// `legs` has one row per waypoint; cells that were not fetched are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct MatrixCache {
    pub(crate) waypoints: Vec<Waypoint>,
    pub(crate) legs: LegMatrix,
}

impl MatrixCache {
    pub(crate) fn new(waypoints: Vec<Waypoint>, legs: LegMatrix) -> Result<Self, MatrixError> {
        let cache = Self { waypoints, legs };
        cache.check_size()?;
        Ok(cache)
    }

    pub(crate) fn load(path: &Utf8Path) -> Result<Self, CliError> {
        let cache: Self = load_json(path, "matrix cache")?;
        cache.check_size()?;
        Ok(cache)
    }

    pub(crate) fn save(&self, path: &Utf8Path) -> Result<(), CliError> {
        write_json(path, "matrix cache", self)
    }

    const fn check_size(&self) -> Result<(), MatrixError> {
        if self.legs.size() == self.waypoints.len() {
            Ok(())
        } else {
            Err(MatrixError::SizeMismatch {
                expected: self.waypoints.len(),
                actual: self.legs.size(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;
    use tour_core::test_support::grid_waypoints;
    use tour_core::{CostMatrixBuilder, Matrix, Metric, TourMode};

    #[rstest]
    fn caches_survive_a_trip_through_disk() {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("legs.json");
        let waypoints = grid_waypoints(3);
        let oracle = tour_core::test_support::FixedLegOracle::planar();
        let legs = CostMatrixBuilder::new(Metric::Time)
            .fetch_legs(&waypoints, TourMode::RoundTrip, &oracle)
            .expect("legs");
        let cache = MatrixCache::new(waypoints, legs).expect("cache");
        cache.save(&path).expect("save");
        let loaded = MatrixCache::load(&path).expect("load");
        let names: Vec<&str> = loaded.waypoints.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["w0", "w1", "w2"]);
        let (costs, geometry) = CostMatrixBuilder::from_legs(&loaded.legs, Metric::Time)
            .expect("cached legs are valid");
        let (expected, _) = CostMatrixBuilder::from_legs(&cache.legs, Metric::Time)
            .expect("fetched legs are valid");
        assert!((costs.cost(0, 2) - expected.cost(0, 2)).abs() < 1e-6);
        assert!(geometry.get(2, 1).is_some_and(Option::is_some));
    }

    #[rstest]
    fn mismatched_sizes_are_rejected() {
        let legs: LegMatrix = Matrix::filled(2, None);
        let err = MatrixCache::new(grid_waypoints(3), legs).expect_err("size mismatch");
        assert_eq!(
            err,
            MatrixError::SizeMismatch {
                expected: 3,
                actual: 2
            }
        );
    }
}
