use serde::Serialize;

use crate::breakdown::ClassTotals;
use crate::geometry::{haversine_distance, LatLng};
use crate::graph::RoadClass;
use crate::path::PathResult;

/// A leg's first point is dropped when it lies within this many degrees
/// (~1 m) of the previous leg's last point on both axes.
pub const POINT_TOLERANCE_DEG: f64 = 1e-5;

/// How the route was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteMode {
    /// Waypoints were matched to graph nodes; individual legs may still be
    /// straight lines when no path connects them.
    Graph,
    /// No graph was usable; every leg is a straight line.
    StraightLine,
}

/// Routed sub-path between two consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLeg {
    pub from_waypoint_index: usize,
    pub to_waypoint_index: usize,
    /// Meters.
    pub distance: f64,
    pub distance_by_road_class: ClassTotals,
    /// Seconds.
    pub travel_time: f64,
    pub travel_time_by_road_class: ClassTotals,
    /// `false` for straight-line fallback legs.
    pub routed: bool,
}

impl RouteLeg {
    pub(crate) fn from_path(from: usize, path: &PathResult) -> Self {
        Self {
            from_waypoint_index: from,
            to_waypoint_index: from + 1,
            distance: path.distance,
            distance_by_road_class: path.distance_by_class.clone(),
            travel_time: path.travel_time,
            travel_time_by_road_class: path.travel_time_by_class.clone(),
            routed: true,
        }
    }

    /// Straight line between two positions, attributed to local roads.
    pub(crate) fn straight_line(from: usize, a: LatLng, b: LatLng) -> Self {
        let distance = haversine_distance(a, b);
        let travel_time = RoadClass::Local.travel_time(distance);
        Self {
            from_waypoint_index: from,
            to_waypoint_index: from + 1,
            distance,
            distance_by_road_class: ClassTotals::single(RoadClass::Local, distance),
            travel_time,
            travel_time_by_road_class: ClassTotals::single(RoadClass::Local, travel_time),
            routed: false,
        }
    }
}

/// Complete multi-waypoint route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    /// Positions actually routed from: node positions in graph mode, the raw
    /// waypoints otherwise.
    pub waypoints: Vec<LatLng>,
    /// Rendered polyline without consecutive duplicates.
    pub path: Vec<LatLng>,
    pub distance: f64,
    pub distance_by_road_class: ClassTotals,
    pub travel_time: f64,
    pub travel_time_by_road_class: ClassTotals,
    pub legs: Vec<RouteLeg>,
    pub mode: RouteMode,
}

impl RouteResult {
    /// Aggregate legs into route totals.
    pub(crate) fn from_legs(
        waypoints: Vec<LatLng>,
        path: Vec<LatLng>,
        legs: Vec<RouteLeg>,
        mode: RouteMode,
    ) -> Self {
        let mut distance_by_road_class = ClassTotals::zero();
        let mut travel_time_by_road_class = ClassTotals::zero();
        for leg in &legs {
            distance_by_road_class.merge(&leg.distance_by_road_class);
            travel_time_by_road_class.merge(&leg.travel_time_by_road_class);
        }

        Self {
            waypoints,
            path,
            distance: legs.iter().map(|leg| leg.distance).sum(),
            distance_by_road_class,
            travel_time: legs.iter().map(|leg| leg.travel_time).sum(),
            travel_time_by_road_class,
            legs,
            mode,
        }
    }

    /// Number of legs that fell back to a straight line.
    pub fn straight_line_legs(&self) -> usize {
        self.legs.iter().filter(|leg| !leg.routed).count()
    }
}

/// Append the first point of a leg, merging it into the previous leg's end
/// when the two are within [`POINT_TOLERANCE_DEG`].
pub(crate) fn join_leg(path: &mut Vec<LatLng>, point: LatLng) {
    if path
        .last()
        .is_some_and(|last| last.approx_eq(&point, POINT_TOLERANCE_DEG))
    {
        return;
    }
    path.push(point);
}

/// Append a point inside a leg unless it exactly repeats the last one.
pub(crate) fn push_point(path: &mut Vec<LatLng>, point: LatLng) {
    if path.last() == Some(&point) {
        return;
    }
    path.push(point);
}
