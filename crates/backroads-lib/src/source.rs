use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{Error, Result};

/// Environment variable overriding the default graph location.
pub const GRAPH_ENV: &str = "BACKROADS_GRAPH";

/// Default filename for the graph inside the platform data directory.
const GRAPH_FILENAME: &str = "road_graph.json";

/// Where the routing graph is fetched from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphSource {
    /// Fetched over HTTP(S).
    Url(String),
    /// Read from local disk.
    File(PathBuf),
}

impl GraphSource {
    /// Interpret `value` as a URL when it has an HTTP scheme, otherwise as a
    /// path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            GraphSource::Url(trimmed.to_string())
        } else {
            GraphSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::Url(url) => f.write_str(url),
            GraphSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolve the default graph location using platform-specific project
/// directories.
pub fn default_graph_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("org", "backroads", "backroads").ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().join(GRAPH_FILENAME))
}

/// Resolve the graph source.
///
/// The resolution order is:
/// 1. Explicit `explicit` argument when provided.
/// 2. `BACKROADS_GRAPH` environment variable.
/// 3. Platform data directory (`<data_dir>/road_graph.json`).
pub fn resolve_graph_source(explicit: Option<&str>) -> Result<GraphSource> {
    if let Some(value) = explicit {
        return Ok(GraphSource::parse(value));
    }

    if let Some(value) = env::var_os(GRAPH_ENV) {
        return Ok(GraphSource::parse(&value.to_string_lossy()));
    }

    default_graph_path().map(GraphSource::File)
}

/// Resolve the output path for a freshly built graph, appending the default
/// filename when `target` names a directory.
pub fn graph_output_path(target: &Path) -> PathBuf {
    if target.is_dir() {
        target.join(GRAPH_FILENAME)
    } else {
        target.to_path_buf()
    }
}
