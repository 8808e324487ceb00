//! Temporary workspaces and stub routing for CLI tests.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tokio::runtime::Runtime;
use tour_core::test_support::grid_waypoints;
use tour_data::LegSource;
use tour_data::test_support::StubLegSource;

use crate::CliError;
use crate::provider::{LegSourceBuilder, ProviderConfig};

/// A temporary directory addressed through UTF-8 paths.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `count` grid waypoints named `w0`, `w1`, ... and return the
    /// file path.
    pub(super) fn waypoint_file(&self, count: usize) -> Utf8PathBuf {
        let path = self.path("waypoints.json");
        let payload = serde_json::to_vec(&grid_waypoints(count)).expect("serialise waypoints");
        write_utf8(&path, &payload);
        path
    }
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace").field("root", &self.root).finish()
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture");
}

/// Answers from coordinates and refuses the listed directed pairs.
#[derive(Debug, Default)]
pub(super) struct StubSourceBuilder {
    pub(super) failing: Vec<(usize, usize)>,
}

impl LegSourceBuilder for StubSourceBuilder {
    fn build(
        &self,
        _config: &ProviderConfig,
        _runtime: &Runtime,
    ) -> Result<Box<dyn LegSource>, CliError> {
        let source = self
            .failing
            .iter()
            .fold(StubLegSource::planar(), |source, &(from, to)| {
                source.failing_on(from, to)
            });
        Ok(Box::new(source))
    }
}
