//! Backroads library entry points.
//!
//! This crate turns road polylines into a routable graph and computes
//! multi-waypoint routes across it. Higher-level consumers (the CLI, a map
//! front end) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod breakdown;
pub mod builder;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod keying;
pub mod loader;
pub mod locate;
pub mod path;
pub mod preferences;
pub mod routing;
pub mod source;

pub use breakdown::ClassTotals;
pub use builder::{build_graph, build_graph_with_report, BuildOptions, BuildReport};
pub use engine::{Computed, RouteEngine, RouteTicket};
pub use error::{Error, Result};
pub use geometry::{
    haversine_distance, normalize_features, parse_road_segments, read_road_segments, LatLng,
    RoadSegment, DEFAULT_CLASS_PROPERTY,
};
pub use graph::{GraphEdge, GraphMetadata, GraphNode, NodeId, RoadClass, RoadGraph};
pub use keying::{CoordKey, EndpointIndex, DEFAULT_PRECISION};
pub use loader::{fetch_graph, GraphCache};
pub use locate::{nearest_node, snap_waypoint, NearestNode, SnappedWaypoint, SNAP_RADIUS_M};
pub use path::{find_path, find_path_with_preferences, PathResult};
pub use preferences::RoadPreferences;
pub use routing::{compose_route, straight_line_route, RouteLeg, RouteMode, RouteResult};
pub use source::{default_graph_path, resolve_graph_source, GraphSource};
