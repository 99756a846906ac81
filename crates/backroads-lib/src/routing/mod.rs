//! Multi-waypoint route composition.
//!
//! This module provides:
//! - [`compose_route`] - stitch per-leg shortest paths into one route
//! - [`RouteResult`] / [`RouteLeg`] - route output with per-class breakdowns
//!
//! Composition never fails. Without a usable graph the whole route becomes a
//! straight line through the raw waypoints; when two waypoints are not
//! connected in the graph only that leg becomes a straight line. Fallback
//! distance and time are always attributed to [`RoadClass::Local`].
//!
//! [`RoadClass::Local`]: crate::graph::RoadClass::Local

mod result;

pub use result::{RouteLeg, RouteMode, RouteResult, POINT_TOLERANCE_DEG};

use tracing::debug;

use crate::geometry::LatLng;
use crate::graph::{GraphNode, RoadGraph};
use crate::locate::nearest_node;
use crate::path::find_path_with_preferences;
use crate::preferences::RoadPreferences;
use result::{join_leg, push_point};

/// Compose a route through `waypoints`.
///
/// Returns `None` when fewer than two waypoints are supplied. Every waypoint
/// is matched to its nearest node regardless of distance.
pub fn compose_route(
    graph: Option<&RoadGraph>,
    waypoints: &[LatLng],
    preferences: &RoadPreferences,
) -> Option<RouteResult> {
    if waypoints.len() < 2 {
        return None;
    }

    let Some(graph) = graph else {
        debug!("no graph available; routing straight lines");
        return Some(straight_line_route(waypoints));
    };

    let Some(nodes) = waypoints
        .iter()
        .map(|waypoint| nearest_node(graph, *waypoint).map(|nearest| nearest.node))
        .collect::<Option<Vec<&GraphNode>>>()
    else {
        debug!("graph has no nodes; routing straight lines");
        return Some(straight_line_route(waypoints));
    };

    let mut path = Vec::new();
    let mut legs = Vec::with_capacity(nodes.len() - 1);
    for (index, pair) in nodes.windows(2).enumerate() {
        let (from, to) = (pair[0], pair[1]);
        match find_path_with_preferences(graph, &from.id, &to.id, preferences) {
            Some(found) => {
                let mut positions = found.nodes.iter().filter_map(|id| graph.node(id));
                if let Some(first) = positions.next() {
                    join_leg(&mut path, first.position);
                }
                for node in positions {
                    push_point(&mut path, node.position);
                }
                legs.push(RouteLeg::from_path(index, &found));
            }
            None => {
                debug!(from = %from.id, to = %to.id, leg = index, "no path; using straight line");
                join_leg(&mut path, from.position);
                push_point(&mut path, to.position);
                legs.push(RouteLeg::straight_line(index, from.position, to.position));
            }
        }
    }

    let used = nodes.iter().map(|node| node.position).collect();
    Some(RouteResult::from_legs(used, path, legs, RouteMode::Graph))
}

/// Route through the raw waypoints with straight lines only.
pub fn straight_line_route(waypoints: &[LatLng]) -> RouteResult {
    let mut path = Vec::with_capacity(waypoints.len());
    for pair in waypoints.windows(2) {
        join_leg(&mut path, pair[0]);
        push_point(&mut path, pair[1]);
    }
    let legs = waypoints
        .windows(2)
        .enumerate()
        .map(|(index, pair)| RouteLeg::straight_line(index, pair[0], pair[1]))
        .collect();
    RouteResult::from_legs(waypoints.to_vec(), path, legs, RouteMode::StraightLine)
}
