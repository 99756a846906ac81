//! Offline construction of the routable road graph.
//!
//! Only polyline endpoints become nodes; interior vertices contribute to edge
//! length but are never routable on their own. Every distinct endpoint key
//! becomes a node, including dead ends touched by a single polyline, so that
//! line termini stay reachable and snappable.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::geometry::{LatLng, RoadSegment};
use crate::graph::{GraphEdge, GraphNode, NodeId, RoadGraph};
use crate::keying::{EndpointIndex, DEFAULT_PRECISION};

/// Options controlling graph construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildOptions {
    /// Decimal places used when keying endpoints.
    pub precision: u32,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Counters describing what the builder kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    pub segments: usize,
    pub too_short: usize,
    /// Segments with a non-finite or out-of-range coordinate.
    pub invalid: usize,
    pub loops: usize,
    pub dead_ends: usize,
    pub nodes: usize,
    pub edges: usize,
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} segments -> {} nodes ({} dead ends), {} edges; skipped {} short, {} invalid, {} loops",
            self.segments,
            self.nodes,
            self.dead_ends,
            self.edges,
            self.too_short,
            self.invalid,
            self.loops
        )
    }
}

/// Build a graph with default options.
pub fn build_graph(segments: &[RoadSegment]) -> RoadGraph {
    build_graph_with_report(segments, &BuildOptions::default()).0
}

/// Build a graph and return the accompanying report.
pub fn build_graph_with_report(
    segments: &[RoadSegment],
    options: &BuildOptions,
) -> (RoadGraph, BuildReport) {
    let mut report = BuildReport {
        segments: segments.len(),
        ..BuildReport::default()
    };

    // Pass 1: key every usable endpoint.
    let mut index = EndpointIndex::new(options.precision);
    let mut usable = Vec::with_capacity(segments.len());
    for segment in segments {
        let Some((first, last)) = segment.endpoints() else {
            report.too_short += 1;
            continue;
        };
        if !segment.vertices.iter().all(LatLng::is_valid) {
            debug!(segment = %segment.id, "dropping segment with invalid coordinates");
            report.invalid += 1;
            continue;
        }
        let from = index.record(first);
        let to = index.record(last);
        usable.push((segment, from, to));
    }

    let mut nodes: Vec<GraphNode> = index
        .iter()
        .map(|(_, endpoint)| GraphNode {
            id: node_id(endpoint.index),
            position: endpoint.position,
            edges: Vec::new(),
        })
        .collect();

    // Pass 2: connect endpoints.
    for (segment, from, to) in usable {
        let (Some(from), Some(to)) = (index.get(&from), index.get(&to)) else {
            continue;
        };
        if from.index == to.index {
            debug!(segment = %segment.id, "dropping closed loop");
            report.loops += 1;
            continue;
        }

        let weight = segment.length();
        nodes[from.index].edges.push(GraphEdge {
            target_node_id: node_id(to.index),
            road_segment_id: segment.id.clone(),
            weight,
            road_class: segment.road_class,
        });
        nodes[to.index].edges.push(GraphEdge {
            target_node_id: node_id(from.index),
            road_segment_id: segment.id.clone(),
            weight,
            road_class: segment.road_class,
        });
        report.edges += 2;
    }

    report.nodes = nodes.len();
    report.dead_ends = index.dead_end_count();

    let graph = RoadGraph::from_nodes(nodes);
    info!(
        segments = report.segments,
        nodes = report.nodes,
        edges = report.edges,
        dead_ends = report.dead_ends,
        loops = report.loops,
        too_short = report.too_short,
        invalid = report.invalid,
        "built road graph"
    );
    (graph, report)
}

fn node_id(index: usize) -> NodeId {
    format!("n{index}")
}
