use std::fmt;
use std::str::FromStr;

use geo::LineString;
use thiserror::Error;

/// Cost dimension a tour is optimised for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Metric {
    /// Track length in metres.
    Distance,
    /// Travel time in seconds.
    #[default]
    Time,
    /// Energy in joules.
    Energy,
    /// The routing profile's own cost figure.
    Cost,
}

impl Metric {
    /// Every metric, in declaration order.
    pub const ALL: [Self; 4] = [Self::Distance, Self::Time, Self::Energy, Self::Cost];

    /// Lower-case name used on the command line and in cache files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Distance => "distance",
            Self::Time => "time",
            Self::Energy => "energy",
            Self::Cost => "cost",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a [`Metric`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric {0:?}; expected one of distance, time, energy, cost")]
pub struct ParseMetricError(pub String);

impl FromStr for Metric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseMetricError(s.to_owned()))
    }
}

/// Every figure the routing service reports for one leg.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegMetrics {
    /// Track length in metres.
    pub distance: f64,
    /// Travel time in seconds.
    pub time: f64,
    /// Energy in joules.
    pub energy: f64,
    /// Profile cost.
    pub cost: f64,
}

impl LegMetrics {
    /// Value of the selected metric.
    ///
    /// ```
    /// use tour_core::{LegMetrics, Metric};
    ///
    /// let metrics = LegMetrics { distance: 1200.0, time: 300.0, energy: 0.0, cost: 1500.0 };
    /// assert_eq!(metrics.get(Metric::Time), 300.0);
    /// ```
    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Distance => self.distance,
            Metric::Time => self.time,
            Metric::Energy => self.energy,
            Metric::Cost => self.cost,
        }
    }
}

/// One directed leg as answered by a [`crate::DistanceOracle`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Reported figures.
    pub metrics: LegMetrics,
    /// Path followed by the leg.
    pub geometry: LineString<f64>,
}
