//! Nearest-node lookup and waypoint snapping.
//!
//! Lookups scan every node. Graphs at the scale this crate targets (a few
//! hundred thousand nodes at most) make that fast enough; a spatial index
//! would be the next step beyond that.

use serde::Serialize;

use crate::geometry::{haversine_distance, LatLng};
use crate::graph::{GraphNode, RoadGraph};

/// Maximum distance in meters at which a waypoint snaps onto a node.
pub const SNAP_RADIUS_M: f64 = 500.0;

/// Nearest node to a query position.
#[derive(Debug, Clone, Copy)]
pub struct NearestNode<'a> {
    pub node: &'a GraphNode,
    /// Haversine distance from the query position in meters.
    pub distance: f64,
}

/// Return the node closest to `position`, or `None` for an empty graph.
///
/// Ties keep the node whose id sorts first as a string, so `n10` wins over
/// `n2` even though the builder created `n2` first.
pub fn nearest_node(graph: &RoadGraph, position: LatLng) -> Option<NearestNode<'_>> {
    let mut best: Option<NearestNode<'_>> = None;
    for node in graph.nodes() {
        let distance = haversine_distance(position, node.position);
        if best.map_or(true, |current| distance < current.distance) {
            best = Some(NearestNode { node, distance });
        }
    }
    best
}

/// Result of snapping a waypoint for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnappedWaypoint {
    /// Position to render: the node's position when snapped, otherwise the
    /// original one.
    pub position: LatLng,
    pub snapped: bool,
    pub node_id: Option<String>,
    /// Distance to the nearest node, when there is one.
    pub distance: Option<f64>,
}

/// Snap `position` onto the nearest node if it lies within
/// [`SNAP_RADIUS_M`].
pub fn snap_waypoint(graph: &RoadGraph, position: LatLng) -> SnappedWaypoint {
    match nearest_node(graph, position) {
        Some(nearest) if nearest.distance <= SNAP_RADIUS_M => SnappedWaypoint {
            position: nearest.node.position,
            snapped: true,
            node_id: Some(nearest.node.id.clone()),
            distance: Some(nearest.distance),
        },
        Some(nearest) => SnappedWaypoint {
            position,
            snapped: false,
            node_id: Some(nearest.node.id.clone()),
            distance: Some(nearest.distance),
        },
        None => SnappedWaypoint {
            position,
            snapped: false,
            node_id: None,
            distance: None,
        },
    }
}
