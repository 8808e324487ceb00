//! Behavioural tests for [`BRouterOracle`] against a local stub servlet.

mod support;

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tour_core::{DistanceOracle, LegMatrix, MatrixError, OracleError, RouteLeg, TourMode, Waypoint};
use tour_core::test_support::grid_waypoints;
use tour_data::{BRouterConfig, BRouterOracle, MatrixFetchPool, upload_profile};

use support::{StubServer, TRACK, closed_base_url};

const SCRIPT: &str = "---context:global\nassign processUnusedTags = false\n";

#[derive(Default)]
struct OracleWorld {
    server: RefCell<Option<StubServer>>,
    base_url: RefCell<String>,
    leg: RefCell<Option<Result<RouteLeg, OracleError>>>,
    matrix: RefCell<Option<Result<LegMatrix, MatrixError>>>,
    profile: RefCell<Option<Result<String, OracleError>>>,
}

impl OracleWorld {
    fn serve(&self, server: StubServer) {
        self.base_url.replace(server.base_url.clone());
        self.server.replace(Some(server));
    }

    fn oracle(&self) -> BRouterOracle {
        BRouterOracle::with_config(
            BRouterConfig::new(self.base_url.borrow().clone()).with_profile("trekking"),
        )
        .expect("oracle should build")
    }

    fn leg(&self) -> Result<RouteLeg, OracleError> {
        self.leg.borrow().clone().expect("leg should be queried first")
    }

    fn received(&self) -> Vec<support::Received> {
        self.server
            .borrow()
            .as_ref()
            .map(StubServer::received)
            .expect("server should be running")
    }
}

#[fixture]
fn world() -> OracleWorld {
    OracleWorld::default()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("test runtime")
}

// --- Given steps ---

#[given("a BRouter server answering with a track")]
fn given_track(world: &OracleWorld) {
    world.serve(StubServer::always(200, TRACK));
}

#[given("a BRouter server that cannot map the start position")]
fn given_not_mapped(world: &OracleWorld) {
    world.serve(StubServer::always(
        400,
        "from-position not mapped in existing datafile\n",
    ));
}

#[given("a BRouter server failing with status 503")]
fn given_unavailable(world: &OracleWorld) {
    world.serve(StubServer::always(503, "<html>busy</html>"));
}

#[given("no BRouter server is listening")]
fn given_nothing(world: &OracleWorld) {
    world.base_url.replace(closed_base_url());
}

#[given("a BRouter server accepting profile uploads")]
fn given_upload_endpoint(world: &OracleWorld) {
    world.serve(StubServer::spawn(|request| {
        let id = request
            .line
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        (200, format!("{{\"profileid\":\"{id}\"}}"))
    }));
}

// --- When steps ---

#[when("I query the leg between two waypoints")]
fn when_query(world: &OracleWorld) {
    let from = Waypoint::new("Bern", Coord { x: 7.4474, y: 46.948 });
    let to = Waypoint::new("Thun", Coord { x: 7.628, y: 46.758 });
    let outcome = world.oracle().query(&from, &to);
    world.leg.replace(Some(outcome));
}

#[when("I fetch a round trip matrix for 3 waypoints")]
fn when_fetch_matrix(world: &OracleWorld) {
    let pool = MatrixFetchPool::new(world.oracle()).with_concurrency(3);
    let waypoints = grid_waypoints(3);
    let outcome = runtime().block_on(pool.fetch(&waypoints, TourMode::RoundTrip));
    world.matrix.replace(Some(outcome));
}

#[when("I upload a custom profile")]
fn when_upload(world: &OracleWorld) {
    let oracle = world.oracle();
    let outcome = runtime().block_on(upload_profile(&oracle, SCRIPT.as_bytes().to_vec()));
    world.profile.replace(Some(outcome));
}

// --- Then steps ---

#[then("the leg is 1523 metres long and takes 341 seconds")]
fn then_leg_metrics(world: &OracleWorld) {
    let leg = world.leg().expect("expected a routed leg");
    assert_eq!(leg.metrics.distance, 1523.0);
    assert_eq!(leg.metrics.time, 341.0);
    assert_eq!(leg.geometry.0.len(), 2);
}

#[then("the server saw a geojson request for the trekking profile")]
fn then_request_shape(world: &OracleWorld) {
    let received = world.received();
    let request = received.first().expect("one request");
    assert!(request.line.starts_with("GET /brouter?lonlats=7.447400,46.948000"));
    assert!(request.line.contains("profile=trekking"));
    assert!(request.line.contains("alternativeidx=0"));
    assert!(request.line.contains("format=geojson"));
}

#[then("the leg is reported as unroutable")]
fn then_unroutable(world: &OracleWorld) {
    assert_eq!(
        world.leg(),
        Err(OracleError::Unroutable {
            message: "from-position not mapped in existing datafile".to_owned()
        })
    );
}

#[then("an HTTP error with status 503 is reported")]
fn then_http_error(world: &OracleWorld) {
    let err = world.leg().expect_err("expected failure");
    assert!(matches!(err, OracleError::HttpError { status: 503, .. }), "{err:?}");
    assert!(!err.is_transient());
}

#[then("a network error is reported")]
fn then_network_error(world: &OracleWorld) {
    let err = world.leg().expect_err("expected failure");
    assert!(matches!(err, OracleError::NetworkError { .. }), "{err:?}");
    assert!(err.is_transient());
}

#[then("6 legs are filled")]
fn then_six_legs(world: &OracleWorld) {
    let matrix = world.matrix.borrow();
    let legs = matrix
        .as_ref()
        .expect("matrix should be fetched")
        .as_ref()
        .expect("fetch should succeed");
    assert_eq!(legs.rows().flatten().filter(|leg| leg.is_some()).count(), 6);
}

#[then("the server received 6 requests")]
fn then_six_requests(world: &OracleWorld) {
    assert_eq!(world.received().len(), 6);
}

#[then("the returned profile name is custom_ followed by digits")]
fn then_profile_name(world: &OracleWorld) {
    let profile = world.profile.borrow();
    let name = profile
        .as_ref()
        .expect("upload should run")
        .as_ref()
        .expect("upload should succeed");
    assert!(name.starts_with("custom_"), "{name}");
    assert!(name.trim_start_matches("custom_").chars().all(|c| c.is_ascii_digit()));
}

#[then("the server received the profile script")]
fn then_script_received(world: &OracleWorld) {
    let received = world.received();
    let request = received.first().expect("one request");
    assert!(request.line.starts_with("POST /brouter/profile/custom_"));
    assert_eq!(request.body, SCRIPT.as_bytes());
}

// --- Scenario registrations ---

#[scenario(path = "tests/features/brouter_oracle.feature", index = 0)]
fn routable_leg(world: OracleWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/brouter_oracle.feature", index = 1)]
fn off_network_waypoint(world: OracleWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/brouter_oracle.feature", index = 2)]
fn overloaded_server(world: OracleWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/brouter_oracle.feature", index = 3)]
fn no_server(world: OracleWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/brouter_oracle.feature", index = 4)]
fn concurrent_matrix(world: OracleWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/brouter_oracle.feature", index = 5)]
fn custom_profile_upload(world: OracleWorld) {
    let _ = world;
}
