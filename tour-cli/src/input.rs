//! Waypoint files accepted by `matrix` and `verify`.
//!
//! Two shapes are understood: a JSON array of waypoints as `tour-core`
//! serialises them, or a GeoJSON `FeatureCollection` of `Point` features.
//! For GeoJSON the waypoint name and journey role are read from configurable
//! properties; features without a name are named by their position.

use camino::Utf8Path;
use geo::Coord;
use serde::Deserialize;
use serde_json::{Map, Value};
use tour_core::{Waypoint, WaypointRole};

use crate::CliError;
use crate::io::load_json;

/// Property read for waypoint names when none is configured.
pub(crate) const DEFAULT_NAME_FIELD: &str = "name";
/// Property read for `start` / `end` markers when none is configured.
pub(crate) const DEFAULT_ROLE_FIELD: &str = "role";

/// Property names used when reading GeoJSON points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldNames {
    pub(crate) name: String,
    pub(crate) role: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME_FIELD.to_owned(),
            role: DEFAULT_ROLE_FIELD.to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WaypointDocument {
    List(Vec<Waypoint>),
    Points(PointCollection),
}

#[derive(Debug, Deserialize)]
struct PointCollection {
    features: Vec<PointFeature>,
}

#[derive(Debug, Deserialize)]
struct PointFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<PointGeometry>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

/// Read the waypoints stored at `path` in file order.
pub(crate) fn load_waypoints(path: &Utf8Path, fields: &FieldNames) -> Result<Vec<Waypoint>, CliError> {
    match load_json::<WaypointDocument>(path, "waypoints")? {
        WaypointDocument::List(waypoints) => Ok(waypoints),
        WaypointDocument::Points(collection) => collection
            .features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                feature.into_waypoint(index, fields).map_err(|message| {
                    CliError::InvalidWaypointFeature {
                        path: path.to_path_buf(),
                        index,
                        message,
                    }
                })
            })
            .collect(),
    }
}

impl PointFeature {
    fn into_waypoint(self, index: usize, fields: &FieldNames) -> Result<Waypoint, String> {
        let geometry = self.geometry.ok_or_else(|| "feature has no geometry".to_owned())?;
        if geometry.kind != "Point" {
            return Err(format!("expected a Point geometry, found {}", geometry.kind));
        }
        let [x, y, ..] = geometry.coordinates.as_slice() else {
            return Err("point needs a longitude and a latitude".to_owned());
        };
        let properties = self.properties.unwrap_or_default();
        let name = match properties.get(&fields.name) {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Null) | None => index.to_string(),
            Some(other) => other.to_string(),
        };
        let role = match properties.get(&fields.role).and_then(Value::as_str) {
            Some(role) if role.eq_ignore_ascii_case("start") => WaypointRole::Start,
            Some(role) if role.eq_ignore_ascii_case("end") => WaypointRole::End,
            _ => WaypointRole::Via,
        };
        Ok(Waypoint::new(name, Coord { x: *x, y: *y }).with_role(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write(contents: &str) -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let path = root.join("waypoints.json");
        std::fs::write(&path, contents).expect("write waypoints");
        (tmp, path)
    }

    #[rstest]
    fn plain_waypoint_lists_are_read_verbatim() {
        let (_tmp, path) = write(
            r#"[{"name":"hut","location":{"x":7.5,"y":46.1},"role":"start"},
                {"name":"lake","location":{"x":7.6,"y":46.2}}]"#,
        );
        let waypoints = load_waypoints(&path, &FieldNames::default()).expect("load");
        assert_eq!(waypoints.len(), 2);
        assert_eq!(waypoints[0].role, WaypointRole::Start);
        assert_eq!(waypoints[1].name, "lake");
    }

    #[rstest]
    fn geojson_points_use_the_configured_fields() {
        let (_tmp, path) = write(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"label":"cafe"},
                 "geometry":{"type":"Point","coordinates":[8.5,47.3]}},
                {"type":"Feature","properties":{"label":"home","se":"START"},
                 "geometry":{"type":"Point","coordinates":[8.6,47.4,410.0]}},
                {"type":"Feature","properties":null,
                 "geometry":{"type":"Point","coordinates":[8.7,47.5]}}
            ]}"#,
        );
        let fields = FieldNames {
            name: "label".to_owned(),
            role: "se".to_owned(),
        };
        let waypoints = load_waypoints(&path, &fields).expect("load");
        let names: Vec<&str> = waypoints.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, ["cafe", "home", "2"]);
        assert_eq!(waypoints[1].role, WaypointRole::Start);
        assert_eq!(waypoints[1].location, Coord { x: 8.6, y: 47.4 });
    }

    #[rstest]
    #[case(r#"{"type":"LineString","coordinates":[[1.0,2.0],[3.0,4.0]]}"#)]
    #[case(r#"{"type":"Point","coordinates":[1.0]}"#)]
    fn unusable_features_are_reported_by_index(#[case] geometry: &str) {
        let (_tmp, path) = write(&format!(
            r#"{{"type":"FeatureCollection","features":[{{"type":"Feature","properties":{{}},"geometry":{geometry}}}]}}"#
        ));
        let err = load_waypoints(&path, &FieldNames::default()).expect_err("invalid feature");
        assert!(matches!(err, CliError::InvalidWaypointFeature { index: 0, .. }));
    }
}
