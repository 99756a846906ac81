use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use backroads_cli::output::OutputFormat;
use backroads_lib::{LatLng, RoadClass, DEFAULT_CLASS_PROPERTY, DEFAULT_PRECISION};

mod commands;

use commands::build::{handle_build_command, BuildCommandArgs};
use commands::nearest::handle_nearest_command;
use commands::route::{handle_route_command, RouteCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Backroads graph builder and router")]
struct Cli {
    /// Graph file path or http(s) URL. Falls back to BACKROADS_GRAPH, then
    /// the platform data directory.
    #[arg(long, global = true)]
    graph: Option<String>,

    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a road graph from a GeoJSON FeatureCollection of polylines.
    Build {
        /// Input GeoJSON file.
        #[arg(long)]
        input: PathBuf,
        /// Output file or directory (defaults to the --graph location).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Decimal places used to merge coincident endpoints.
        #[arg(long, default_value_t = DEFAULT_PRECISION)]
        precision: u32,
        /// Feature property holding the road class.
        #[arg(long, default_value = DEFAULT_CLASS_PROPERTY)]
        class_property: String,
    },
    /// Route through two or more waypoints.
    Route {
        /// Waypoint as LAT,LNG; repeat in travel order.
        #[arg(long = "waypoint", short = 'w', required = true, allow_hyphen_values = true)]
        waypoints: Vec<LatLng>,
        /// Preferred road classes, most preferred first (comma-separated or
        /// repeated).
        #[arg(long = "prefer", value_delimiter = ',')]
        prefer: Vec<RoadClass>,
        /// Preferred surfaces, most preferred first.
        #[arg(long = "prefer-surface", value_delimiter = ',')]
        prefer_surface: Vec<String>,
    },
    /// Show the graph node a position snaps to.
    Nearest {
        /// Position as LAT,LNG.
        #[arg(long, allow_hyphen_values = true)]
        at: LatLng,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let graph = cli.graph.as_deref();

    match cli.command {
        Command::Build {
            input,
            output,
            precision,
            class_property,
        } => {
            let args = BuildCommandArgs {
                input,
                output,
                precision,
                class_property,
            };
            handle_build_command(graph, &args, cli.format)
        }
        Command::Route {
            waypoints,
            prefer,
            prefer_surface,
        } => {
            let args = RouteCommandArgs {
                waypoints,
                prefer,
                prefer_surface,
            };
            handle_route_command(graph, &args, cli.format).await
        }
        Command::Nearest { at } => handle_nearest_command(graph, at, cli.format).await,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
