//! Route engine entry point with stale-result discarding.
//!
//! Inputs can change while a route is still being computed. Callers take a
//! [`RouteTicket`] with [`RouteEngine::begin`] whenever inputs change and
//! pass it to [`RouteEngine::compute`]; a result whose ticket has been
//! superseded by a newer `begin` is reported as [`Computed::Superseded`] and
//! must not be applied. The computation itself always runs to completion.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::LatLng;
use crate::loader::GraphCache;
use crate::preferences::RoadPreferences;
use crate::routing::{compose_route, RouteResult};

/// Generation marker for one set of route inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteTicket {
    generation: u64,
}

impl RouteTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of a ticketed computation.
#[derive(Debug, Clone, PartialEq)]
pub enum Computed {
    /// Inputs are still current. `None` when fewer than two waypoints were
    /// supplied.
    Current(Option<RouteResult>),
    /// Newer inputs arrived while computing; discard.
    Superseded,
}

/// Computes routes against a shared graph cache.
#[derive(Debug)]
pub struct RouteEngine {
    cache: GraphCache,
    generation: AtomicU64,
}

impl RouteEngine {
    pub fn new(cache: GraphCache) -> Self {
        Self {
            cache,
            generation: AtomicU64::new(0),
        }
    }

    pub fn cache(&self) -> &GraphCache {
        &self.cache
    }

    /// Start a new generation, superseding every earlier ticket.
    pub fn begin(&self) -> RouteTicket {
        RouteTicket {
            generation: self.generation.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }

    pub fn is_current(&self, ticket: &RouteTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Compute a route. Returns `None` when fewer than two waypoints are
    /// supplied; otherwise always produces a result, falling back to
    /// straight lines when the graph is unavailable.
    pub async fn route(
        &self,
        waypoints: &[LatLng],
        preferences: &RoadPreferences,
    ) -> Option<RouteResult> {
        if waypoints.len() < 2 {
            return None;
        }
        let graph = self.cache.load().await;
        compose_route(graph.as_deref(), waypoints, preferences)
    }

    /// Compute a route for `ticket`, discarding the result if a newer ticket
    /// was issued in the meantime.
    pub async fn compute(
        &self,
        ticket: &RouteTicket,
        waypoints: &[LatLng],
        preferences: &RoadPreferences,
    ) -> Computed {
        let result = self.route(waypoints, preferences).await;
        if self.is_current(ticket) {
            Computed::Current(result)
        } else {
            tracing::debug!(
                generation = ticket.generation,
                "discarding superseded route result"
            );
            Computed::Superseded
        }
    }
}
