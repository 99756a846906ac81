//! Load-once cache for the routing graph.
//!
//! A [`GraphCache`] is owned by the composition root and handed to whatever
//! computes routes. The first [`GraphCache::load`] call fetches the graph;
//! concurrent callers wait on that same fetch instead of starting their own,
//! and share its outcome even when it fails. Failures never escape: they are logged and reported as `None` so routing
//! can fall back to straight lines.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::graph::RoadGraph;
use crate::source::GraphSource;

/// Memoized, single-flight graph loader.
#[derive(Debug)]
pub struct GraphCache {
    source: Option<GraphSource>,
    client: reqwest::Client,
    graph: OnceCell<Arc<RoadGraph>>,
    /// Held for the whole duration of a fetch.
    in_flight: Mutex<()>,
    /// Number of fetches that have failed so far.
    failures: AtomicU64,
}

impl GraphCache {
    fn with_parts(source: Option<GraphSource>, graph: OnceCell<Arc<RoadGraph>>) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
            graph,
            in_flight: Mutex::new(()),
            failures: AtomicU64::new(0),
        }
    }

    /// Cache that fetches from `source` on first use.
    pub fn new(source: GraphSource) -> Self {
        Self::with_parts(Some(source), OnceCell::new())
    }

    /// Cache pre-populated with an in-memory graph.
    pub fn with_graph(graph: RoadGraph) -> Self {
        Self::with_parts(None, OnceCell::new_with(Some(Arc::new(graph))))
    }

    /// Cache with nothing to load; every call resolves to `None`.
    pub fn unavailable() -> Self {
        Self::with_parts(None, OnceCell::new())
    }

    pub fn source(&self) -> Option<&GraphSource> {
        self.source.as_ref()
    }

    /// Graph if a previous load already succeeded.
    pub fn cached(&self) -> Option<Arc<RoadGraph>> {
        self.graph.get().cloned()
    }

    /// Load the graph from the configured source, at most once.
    pub async fn load(&self) -> Option<Arc<RoadGraph>> {
        let Some(source) = &self.source else {
            return self.cached();
        };
        self.load_with(|| fetch_graph(&self.client, source)).await
    }

    /// Load the graph with a caller-supplied fetch.
    ///
    /// At most one fetch runs at a time, and callers that arrive while a
    /// fetch is running share its outcome, failure included. A successful
    /// result is kept for the lifetime of the cache; after a failure the
    /// next call that arrives fetches again.
    pub async fn load_with<F, Fut>(&self, fetch: F) -> Option<Arc<RoadGraph>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RoadGraph>>,
    {
        if let Some(graph) = self.cached() {
            return Some(graph);
        }

        let failures_seen = self.failures.load(Ordering::SeqCst);
        let _guard = self.in_flight.lock().await;

        if let Some(graph) = self.cached() {
            return Some(graph);
        }
        if self.failures.load(Ordering::SeqCst) != failures_seen {
            debug!("joined a graph fetch that failed");
            return None;
        }

        let started = Instant::now();
        match fetch().await {
            Ok(graph) => {
                info!(
                    load_ms = started.elapsed().as_millis(),
                    nodes = graph.node_count(),
                    edges = graph.edge_count(),
                    "road graph loaded"
                );
                let graph = Arc::new(graph);
                // Only this task sets the cell while holding the lock.
                let _ = self.graph.set(Arc::clone(&graph));
                Some(graph)
            }
            Err(error) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                warn!(%error, "road graph unavailable; routes will use straight lines");
                None
            }
        }
    }
}

/// Fetch and validate a graph document from `source`.
pub async fn fetch_graph(client: &reqwest::Client, source: &GraphSource) -> Result<RoadGraph> {
    match source {
        GraphSource::Url(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(Error::HttpStatus {
                    url: url.clone(),
                    status: status.as_u16(),
                });
            }
            let bytes = response.bytes().await?;
            RoadGraph::from_slice(&bytes)
        }
        GraphSource::File(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|error| {
                if error.kind() == std::io::ErrorKind::NotFound {
                    Error::GraphNotFound { path: path.clone() }
                } else {
                    Error::Io(error)
                }
            })?;
            RoadGraph::from_slice(&bytes)
        }
    }
}
