// Test utilities used across `backroads-cli` unit tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use std::path::PathBuf;

use backroads_lib::{build_graph, read_road_segments, LatLng, RoadGraph, DEFAULT_CLASS_PROPERTY};

/// Path to the sample road network shared with the library tests.
pub fn sample_roads_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/sample_roads.geojson")
}

pub fn sample_graph() -> RoadGraph {
    let segments =
        read_road_segments(&sample_roads_path(), DEFAULT_CLASS_PROPERTY).expect("fixture loads");
    build_graph(&segments)
}

/// Both ends of the highway running across the sample network.
pub fn sample_waypoints() -> Vec<LatLng> {
    vec![LatLng::new(49.0, -123.0), LatLng::new(49.0, -122.98)]
}
