use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the backroads library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the default graph location")]
    ProjectDirsUnavailable,

    /// Raised when a graph file could not be found on disk.
    #[error("graph file not found at {path}")]
    GraphNotFound { path: PathBuf },

    /// Raised when a fetched graph document violates the graph file schema.
    #[error("invalid graph document: {message}")]
    InvalidGraph { message: String },

    /// Raised when a graph URL answers with a non-success status.
    #[error("graph request to {url} failed with status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Raised when the builder input is not a GeoJSON feature collection.
    #[error("road input must be a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    /// Raised when a `LAT,LNG` pair cannot be parsed or is out of range.
    #[error("invalid coordinate '{input}': {reason}")]
    InvalidCoordinate { input: String, reason: String },

    /// Raised when a road class name does not match any known class.
    #[error("unknown road class: {name}")]
    UnknownRoadClass { name: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for GeoJSON parsing errors.
    #[error(transparent)]
    GeoJson(#[from] Box<geojson::Error>),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Raised when persisting a temporary graph file fails.
    #[error(transparent)]
    Persist(#[from] tempfile::PersistError),
}

impl From<geojson::Error> for Error {
    fn from(err: geojson::Error) -> Self {
        Error::GeoJson(Box::new(err))
    }
}
