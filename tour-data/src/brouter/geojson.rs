//! BRouter GeoJSON response types.
//!
//! BRouter answers a `format=geojson` request with a feature collection
//! holding one `LineString` feature. Its properties carry the leg metrics as
//! decimal strings; some deployments emit plain numbers instead, so both are
//! accepted.

use geo::{Coord, LineString};
use serde::Deserialize;
use tour_core::{LegMetrics, OracleError, RouteLeg};

/// Top-level GeoJSON document.
#[derive(Debug, Deserialize)]
pub(crate) struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Feature {
    pub properties: TrackProperties,
    pub geometry: Geometry,
}

/// Metric properties of a BRouter track.
#[derive(Debug, Deserialize)]
pub(crate) struct TrackProperties {
    #[serde(rename = "track-length")]
    pub track_length: Figure,
    #[serde(rename = "total-time")]
    pub total_time: Figure,
    #[serde(rename = "total-energy")]
    pub total_energy: Figure,
    pub cost: Figure,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[lon, lat]` or `[lon, lat, elevation]` positions.
    pub coordinates: Vec<Vec<f64>>,
}

/// A number that may arrive as a JSON number or a decimal string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Figure {
    Number(f64),
    Text(String),
}

impl Figure {
    fn value(&self, field: &str) -> Result<f64, OracleError> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse().map_err(|_| OracleError::ParseError {
                message: format!("property {field:?} is not a number: {text:?}"),
            }),
        }
    }
}

impl FeatureCollection {
    /// Convert the first feature into a [`RouteLeg`].
    pub(crate) fn into_leg(self) -> Result<RouteLeg, OracleError> {
        let feature = self
            .features
            .into_iter()
            .next()
            .ok_or_else(|| OracleError::ParseError {
                message: "GeoJSON response holds no features".to_owned(),
            })?;
        let properties = &feature.properties;
        let metrics = LegMetrics {
            distance: properties.track_length.value("track-length")?,
            time: properties.total_time.value("total-time")?,
            energy: properties.total_energy.value("total-energy")?,
            cost: properties.cost.value("cost")?,
        };
        Ok(RouteLeg {
            metrics,
            geometry: feature.geometry.into_line_string()?,
        })
    }
}

impl Geometry {
    fn into_line_string(self) -> Result<LineString<f64>, OracleError> {
        if self.kind != "LineString" {
            return Err(OracleError::ParseError {
                message: format!("expected LineString geometry, found {}", self.kind),
            });
        }
        self.coordinates
            .into_iter()
            .map(|position| match position.as_slice() {
                [x, y, ..] => Ok(Coord { x: *x, y: *y }),
                _ => Err(OracleError::ParseError {
                    message: format!("position {position:?} has fewer than two values"),
                }),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(LineString::from)
    }
}
