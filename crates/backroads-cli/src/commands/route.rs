//! Route command handler for multi-waypoint routes.

use anyhow::{bail, Result};
use tracing::warn;

use backroads_lib::{
    resolve_graph_source, GraphCache, LatLng, RoadClass, RoadPreferences, RouteEngine, RouteMode,
};
use backroads_cli::output::{render_json, render_route_text, OutputFormat};
use backroads_cli::terminal::ColorPalette;

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Waypoints in travel order.
    pub waypoints: Vec<LatLng>,
    /// Preferred road classes, most preferred first.
    pub prefer: Vec<RoadClass>,
    /// Preferred surfaces; accepted but not yet used by the router.
    pub prefer_surface: Vec<String>,
}

impl RouteCommandArgs {
    pub fn preferences(&self) -> RoadPreferences {
        RoadPreferences::classes(self.prefer.iter().copied())
            .with_surfaces(self.prefer_surface.iter().cloned())
    }
}

/// Handle the route subcommand.
///
/// A missing or unreadable graph degrades to straight-line legs rather than
/// failing the command.
pub async fn handle_route_command(
    graph_override: Option<&str>,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    if args.waypoints.len() < 2 {
        bail!("at least two waypoints are required (got {})", args.waypoints.len());
    }

    let cache = match resolve_graph_source(graph_override) {
        Ok(source) => GraphCache::new(source),
        Err(err) => {
            warn!(error = %err, "no graph location available");
            GraphCache::unavailable()
        }
    };
    let engine = RouteEngine::new(cache);

    let Some(route) = engine.route(&args.waypoints, &args.preferences()).await else {
        bail!("at least two waypoints are required");
    };
    if route.mode == RouteMode::StraightLine {
        warn!("road graph unavailable; route uses straight lines");
    } else if route.straight_line_legs() > 0 {
        warn!(
            legs = route.straight_line_legs(),
            "some legs have no road connection and use straight lines"
        );
    }

    match format {
        OutputFormat::Json => println!("{}", render_json(&route)?),
        OutputFormat::Text => print!("{}", render_route_text(&route, ColorPalette::detect())),
    }
    Ok(())
}
