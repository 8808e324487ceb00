//! Public BRouter deployments and the profiles they are known to serve.
//!
//! Servers may host more profiles than listed here; the lists only seed
//! `servers` output and CLI validation hints.

use thiserror::Error;
use tour_core::Waypoint;

/// A named BRouter deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BRouterServer {
    /// Short name used on the command line.
    pub name: &'static str,
    /// Routing servlet URL.
    pub base_url: &'static str,
    /// `brouter-web` front end for viewing a leg in a browser.
    pub web_url: &'static str,
    /// Map zoom level used by [`BRouterServer::web_link`].
    pub web_zoom: u8,
    /// Profiles known to exist on the server.
    pub profiles: &'static [&'static str],
}

/// Raised when a server name is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown BRouter server {name:?}; expected one of: {known}")]
pub struct ServerLookupError {
    /// Requested name.
    pub name: String,
    /// Comma-separated known names.
    pub known: String,
}

const SERVERS: &[BRouterServer] = &[
    BRouterServer {
        name: "brouter",
        base_url: "https://brouter.de/brouter",
        web_url: "https://brouter.de/brouter-web/",
        web_zoom: 10,
        profiles: &[
            "trekking",
            "fastbike",
            "car-eco",
            "car-fast",
            "safety",
            "shortest",
            "trekking-ignore-cr",
            "trekking-steep",
            "trekking-noferries",
            "trekking-nosteps",
            "moped",
            "rail",
            "river",
            "vm-forum-liegerad-schnell",
            "vm-forum-velomobil-schnell",
            "fastbike-lowtraffic",
            "fastbike-asia-pacific",
            "hiking-beta",
        ],
    },
    BRouterServer {
        name: "m11n",
        base_url: "https://brouter.m11n.de/brouter-engine/brouter",
        web_url: "https://brouter.m11n.de/",
        web_zoom: 11,
        profiles: &[
            "Fastbike-lowtraffic-tertiaries",
            "fastbike-lowtraffic",
            "fastbike",
            "m11n-gravel-pre",
            "m11n-gravel",
            "cxb-gravel",
            "Trekking-tracks",
            "mtb-zossebart",
            "mtb-zossebart-hard",
            "MTB",
            "MTB-light",
            "trekking",
            "fastbike-asia-pacific",
            "fastbike-verylowtraffic",
            "MTB-light-wet",
            "MTB-wet",
            "reroute-zossebart",
            "Trekking-dry",
            "Trekking-Fast-wet",
            "Trekking-Fast",
            "Trekking-FCR-dry",
            "Trekking-FCR-wet",
            "Trekking-hilly-paths",
            "Trekking-ICR-dry",
            "Trekking-ICR-wet",
            "trekking-ignore-cr",
            "Trekking-LCR-dry",
            "Trekking-LCR-wet",
            "Trekking-MTB-light-wet",
            "Trekking-MTB-light",
            "Trekking-MTB-medium-wet",
            "Trekking-MTB-medium",
            "Trekking-MTB-strong-wet",
            "Trekking-MTB-strong",
            "Trekking-No-Flat",
            "trekking-noferries",
            "trekking-nosteps",
            "Trekking-SmallRoads-wet",
            "Trekking-SmallRoads",
            "trekking-steep",
            "Trekking-Tertiaries",
            "Trekking-valley",
            "Trekking-wet",
            "vm-forum-liegerad-schnell",
            "vm-forum-velomobil-schnell",
            "car-eco",
            "car-fast",
            "car-vario",
            "dummy",
            "hiking-beta",
            "moped",
            "rail",
            "river",
            "safety",
            "shortest",
        ],
    },
    BRouterServer {
        name: "damsy",
        base_url: "https://brouter.damsy.net/api/brouter",
        web_url: "https://brouter.damsy.net/latest/",
        web_zoom: 11,
        profiles: &[
            "trekking",
            "fastbike",
            "safety",
            "shortest",
            "trekking-ignore-cr",
            "trekking-steep",
            "trekking-noferries",
            "trekking-nosteps",
            "fastbike-lowtraffic",
            "rail",
            "river",
            "vm-forum-liegerad-schnell",
            "vm-forum-velomobil-schnell",
            "fastbike-asia-pacific",
            "moped",
            "car-test",
            "hiking-beta",
        ],
    },
];

/// All known servers, `brouter` first.
#[must_use]
pub const fn known_servers() -> &'static [BRouterServer] {
    SERVERS
}

/// Look up a server by name.
///
/// # Errors
///
/// Returns [`ServerLookupError`] when no server has that name.
///
/// # Examples
///
/// ```
/// use tour_data::find_server;
///
/// let server = find_server("damsy")?;
/// assert_eq!(server.base_url, "https://brouter.damsy.net/api/brouter");
/// assert!(find_server("nowhere").is_err());
/// # Ok::<(), tour_data::ServerLookupError>(())
/// ```
pub fn find_server(name: &str) -> Result<&'static BRouterServer, ServerLookupError> {
    SERVERS
        .iter()
        .find(|server| server.name == name)
        .ok_or_else(|| ServerLookupError {
            name: name.to_owned(),
            known: SERVERS
                .iter()
                .map(|server| server.name)
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl BRouterServer {
    /// Whether `profile` is one of the known profiles.
    #[must_use]
    pub fn knows_profile(&self, profile: &str) -> bool {
        self.profiles.contains(&profile)
    }

    /// Browser link showing the leg `from -> to` on the server's map.
    #[must_use]
    pub fn web_link(&self, from: &Waypoint, to: &Waypoint, profile: &str) -> String {
        let mid_x = (from.location.x + to.location.x) / 2.0;
        let mid_y = (from.location.y + to.location.y) / 2.0;
        format!(
            "{}#map={}/{mid_y:.6}/{mid_x:.6}/standard&lonlats={:.6},{:.6};{:.6},{:.6}&profile={profile}",
            self.web_url, self.web_zoom, from.location.x, from.location.y, to.location.x, to.location.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    #[rstest]
    #[case("brouter", "https://brouter.de/brouter")]
    #[case("m11n", "https://brouter.m11n.de/brouter-engine/brouter")]
    #[case("damsy", "https://brouter.damsy.net/api/brouter")]
    fn known_names_resolve(#[case] name: &str, #[case] base_url: &str) {
        let server = find_server(name).expect("known server");
        assert_eq!(server.base_url, base_url);
        assert!(server.knows_profile("trekking"));
    }

    #[rstest]
    fn unknown_name_lists_alternatives() {
        let err = find_server("osrm").expect_err("unknown server");
        assert_eq!(err.known, "brouter, m11n, damsy");
    }

    #[rstest]
    fn web_link_centres_the_map_between_waypoints() {
        let server = find_server("brouter").expect("known server");
        let link = server.web_link(
            &Waypoint::new("a", Coord { x: 30.0, y: 36.0 }),
            &Waypoint::new("b", Coord { x: 31.0, y: 37.0 }),
            "trekking",
        );
        assert_eq!(
            link,
            "https://brouter.de/brouter-web/#map=10/36.500000/30.500000/standard\
             &lonlats=30.000000,36.000000;31.000000,37.000000&profile=trekking"
        );
    }

    #[rstest]
    fn profile_lists_are_not_empty() {
        assert!(known_servers().iter().all(|server| !server.profiles.is_empty()));
        assert!(!find_server("damsy").expect("known").knows_profile("m11n-gravel"));
    }
}
