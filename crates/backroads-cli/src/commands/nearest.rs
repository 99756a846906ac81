//! Nearest command handler: report where a position snaps onto the graph.

use anyhow::{anyhow, Context, Result};

use backroads_lib::{resolve_graph_source, snap_waypoint, GraphCache, LatLng};
use backroads_cli::output::{render_json, render_snap_text, OutputFormat};
use backroads_cli::terminal::ColorPalette;

/// Handle the nearest subcommand.
pub async fn handle_nearest_command(
    graph_override: Option<&str>,
    at: LatLng,
    format: OutputFormat,
) -> Result<()> {
    let source =
        resolve_graph_source(graph_override).context("failed to resolve the graph location")?;
    let cache = GraphCache::new(source.clone());
    let graph = cache
        .load()
        .await
        .ok_or_else(|| anyhow!("road graph unavailable at {source}"))?;

    let snap = snap_waypoint(&graph, at);
    match format {
        OutputFormat::Json => println!("{}", render_json(&snap)?),
        OutputFormat::Text => print!("{}", render_snap_text(&snap, ColorPalette::detect())),
    }
    Ok(())
}
