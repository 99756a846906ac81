//! Common test utilities and fixture helpers.
//!
//! This module provides shared test infrastructure for integration tests,
//! including fixture paths and a builder for hand-made graphs.

use std::path::PathBuf;

use backroads_lib::{GraphEdge, GraphNode, LatLng, RoadClass, RoadGraph};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Path to the sample road network.
#[allow(dead_code)]
pub fn sample_roads_path() -> PathBuf {
    fixtures_dir().join("sample_roads.geojson")
}

/// Builder for small graphs with explicit edge weights.
///
/// Roads are added in both directions, mirroring what the graph builder
/// emits.
#[allow(dead_code)]
pub struct TestGraphBuilder {
    nodes: Vec<GraphNode>,
}

#[allow(dead_code)]
impl TestGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn node(mut self, id: &str, lat: f64, lng: f64) -> Self {
        self.nodes.push(GraphNode {
            id: id.to_string(),
            position: LatLng::new(lat, lng),
            edges: Vec::new(),
        });
        self
    }

    pub fn road(mut self, from: &str, to: &str, weight: f64, class: RoadClass) -> Self {
        let segment = format!("{from}-{to}");
        self.push_edge(from, to, &segment, weight, class);
        self.push_edge(to, from, &segment, weight, class);
        self
    }

    /// Add a road whose weight is the haversine distance between its nodes.
    pub fn straight_road(self, from: &str, to: &str, class: RoadClass) -> Self {
        let weight = self.position(from).haversine_to(&self.position(to));
        self.road(from, to, weight, class)
    }

    pub fn build(self) -> RoadGraph {
        RoadGraph::from_nodes(self.nodes)
    }

    fn position(&self, id: &str) -> LatLng {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.position)
            .expect("node declared before road")
    }

    fn push_edge(&mut self, from: &str, to: &str, segment: &str, weight: f64, class: RoadClass) {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id == from)
            .expect("node declared before road");
        node.edges.push(GraphEdge {
            target_node_id: to.to_string(),
            road_segment_id: segment.to_string(),
            weight,
            road_class: class,
        });
    }
}

/// Diamond `s -> {a, b} -> t`; the path through `a` totals 300 m, the path
/// through `b` totals 500 m.
#[allow(dead_code)]
pub fn diamond_graph() -> RoadGraph {
    TestGraphBuilder::new()
        .node("s", 0.0, 0.0)
        .node("a", 0.001, 0.001)
        .node("b", -0.001, 0.001)
        .node("t", 0.0, 0.002)
        .road("s", "a", 100.0, RoadClass::Local)
        .road("a", "t", 200.0, RoadClass::Local)
        .road("s", "b", 250.0, RoadClass::Local)
        .road("b", "t", 250.0, RoadClass::Local)
        .build()
}

/// Relative comparison with an absolute floor for values near zero.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}
