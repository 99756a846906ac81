//! Build command handler: GeoJSON road polylines in, road graph file out.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use backroads_lib::source::graph_output_path;
use backroads_lib::{
    build_graph_with_report, read_road_segments, resolve_graph_source, BuildOptions, GraphSource,
};
use backroads_cli::output::{render_build_text, render_json, BuildSummary, OutputFormat};
use backroads_cli::terminal::ColorPalette;

/// Arguments for the build command.
#[derive(Debug, Clone)]
pub struct BuildCommandArgs {
    /// GeoJSON FeatureCollection of road polylines.
    pub input: PathBuf,
    /// Destination file or directory; defaults to the resolved graph path.
    pub output: Option<PathBuf>,
    /// Decimal places used when merging endpoints.
    pub precision: u32,
    /// Feature property naming the road class.
    pub class_property: String,
}

/// Handle the build subcommand.
pub fn handle_build_command(
    graph_override: Option<&str>,
    args: &BuildCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let output = resolve_output(graph_override, args.output.as_deref())?;

    let segments = read_road_segments(&args.input, &args.class_property)
        .with_context(|| format!("failed to read road segments from {}", args.input.display()))?;
    let options = BuildOptions {
        precision: args.precision,
    };
    let (graph, report) = build_graph_with_report(&segments, &options);
    graph
        .write_to(&output)
        .with_context(|| format!("failed to write graph to {}", output.display()))?;

    let summary = BuildSummary {
        output: &output,
        report: &report,
    };
    match format {
        OutputFormat::Json => println!("{}", render_json(&summary)?),
        OutputFormat::Text => print!("{}", render_build_text(&summary, ColorPalette::detect())),
    }
    Ok(())
}

fn resolve_output(graph_override: Option<&str>, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(graph_output_path(path));
    }
    match resolve_graph_source(graph_override).context("failed to resolve the graph location")? {
        GraphSource::File(path) => Ok(graph_output_path(&path)),
        GraphSource::Url(url) => {
            bail!("graph location {url} is remote; pass --output to choose a file")
        }
    }
}
