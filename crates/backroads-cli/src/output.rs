//! Output formatting for build reports, routes, and snapped waypoints.
//!
//! Renderers return strings so the command handlers stay thin and the
//! formatting can be tested without capturing stdout.

use std::fmt::Write as _;
use std::path::Path;

use backroads_lib::{BuildReport, RouteMode, RouteResult, SnappedWaypoint, SNAP_RADIUS_M};
use clap::ValueEnum;
use serde::Serialize;

use crate::terminal::{format_distance, format_duration, ColorPalette};

/// Output format selectable on every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Serialize `value` as pretty-printed JSON.
pub fn render_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Summary of a finished `build` run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary<'a> {
    pub output: &'a Path,
    #[serde(flatten)]
    pub report: &'a BuildReport,
}

pub fn render_build_text(summary: &BuildSummary<'_>, palette: ColorPalette) -> String {
    let report = summary.report;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}Graph written to {}{}",
        palette.white_bold,
        summary.output.display(),
        palette.reset
    );
    let _ = writeln!(out, "  nodes: {} ({} dead ends)", report.nodes, report.dead_ends);
    let _ = writeln!(out, "  edges: {}", report.edges);
    let _ = writeln!(out, "  segments read: {}", report.segments);
    let skipped = report.too_short + report.invalid + report.loops;
    if skipped > 0 {
        let _ = writeln!(
            out,
            "  {}skipped: {} too short, {} invalid, {} loops{}",
            palette.gray, report.too_short, report.invalid, report.loops, palette.reset
        );
    }
    out
}

/// Render a route as text.
///
/// Only road classes with a non-zero share are listed; the JSON output
/// always carries all of them.
pub fn render_route_text(route: &RouteResult, palette: ColorPalette) -> String {
    let mut out = String::new();
    let mode = match route.mode {
        RouteMode::Graph => "road network",
        RouteMode::StraightLine => "straight line",
    };
    let _ = writeln!(
        out,
        "{}Route via {} ({} waypoints){}",
        palette.white_bold,
        mode,
        route.waypoints.len(),
        palette.reset
    );
    let _ = writeln!(
        out,
        "  distance:    {}{}{}",
        palette.cyan,
        format_distance(route.distance),
        palette.reset
    );
    let _ = writeln!(out, "  travel time: {}", format_duration(route.travel_time));

    let classes: Vec<_> = route
        .distance_by_road_class
        .iter()
        .filter(|(_, distance)| *distance > 0.0)
        .collect();
    if !classes.is_empty() {
        let _ = writeln!(out, "  by road class:");
        for (class, distance) in classes {
            let _ = writeln!(
                out,
                "    {:<15} {:>10}  {}",
                class.as_str(),
                format_distance(distance),
                format_duration(route.travel_time_by_road_class.get(class))
            );
        }
    }

    let _ = writeln!(out, "  legs:");
    for (index, leg) in route.legs.iter().enumerate() {
        let (color, note) = if leg.routed {
            (palette.green, "")
        } else {
            (palette.yellow, " (straight line)")
        };
        let _ = writeln!(
            out,
            "    {}{}. #{} -> #{}{}  {}  {}{}",
            color,
            index + 1,
            leg.from_waypoint_index,
            leg.to_waypoint_index,
            palette.reset,
            format_distance(leg.distance),
            format_duration(leg.travel_time),
            note
        );
    }

    let _ = writeln!(out, "  path:");
    for point in &route.path {
        let _ = writeln!(out, "    {}{}{}", palette.gray, point, palette.reset);
    }
    out
}

pub fn render_snap_text(snap: &SnappedWaypoint, palette: ColorPalette) -> String {
    match (&snap.node_id, snap.distance) {
        (Some(node_id), Some(distance)) if snap.snapped => format!(
            "{}{}{} at {} ({} away)\n",
            palette.green,
            node_id,
            palette.reset,
            snap.position,
            format_distance(distance)
        ),
        (Some(node_id), Some(distance)) => format!(
            "{}not snapped{}: nearest node {} is {} away (limit {})\n",
            palette.yellow,
            palette.reset,
            node_id,
            format_distance(distance),
            format_distance(SNAP_RADIUS_M)
        ),
        _ => format!("{}graph has no nodes{}\n", palette.yellow, palette.reset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_graph, sample_waypoints};
    use backroads_lib::{
        compose_route, snap_waypoint, straight_line_route, LatLng, RoadPreferences,
    };

    #[test]
    fn route_text_lists_used_classes_and_legs() {
        let graph = sample_graph();
        let route = compose_route(
            Some(&graph),
            &sample_waypoints(),
            &RoadPreferences::default(),
        )
        .expect("route");
        let text = render_route_text(&route, ColorPalette::plain());

        assert!(text.starts_with("Route via road network (2 waypoints)"));
        assert!(text.contains("highway"));
        assert!(!text.contains("resource"));
        assert!(text.contains("1. #0 -> #1"));
        assert!(!text.contains("straight line)"));
    }

    #[test]
    fn straight_line_route_is_flagged() {
        let route = straight_line_route(&sample_waypoints());
        let text = render_route_text(&route, ColorPalette::plain());
        assert!(text.starts_with("Route via straight line"));
        assert!(text.contains("(straight line)"));
    }

    #[test]
    fn snap_text_reports_distance_limit() {
        let graph = sample_graph();
        let far = snap_waypoint(&graph, LatLng::new(48.0, -123.0));
        let text = render_snap_text(&far, ColorPalette::plain());
        assert!(text.starts_with("not snapped"));
        assert!(text.contains("limit 500 m"));

        let near = snap_waypoint(&graph, LatLng::new(49.0, -123.0));
        assert!(render_snap_text(&near, ColorPalette::plain()).contains("0 m away"));
    }

    #[test]
    fn route_json_uses_camel_case() {
        let route = straight_line_route(&sample_waypoints());
        let json = render_json(&route).expect("json");
        assert!(json.contains("\"distanceByRoadClass\""));
        assert!(json.contains("\"mode\": \"straightLine\""));
    }
}
