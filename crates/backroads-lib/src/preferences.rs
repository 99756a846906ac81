use serde::{Deserialize, Serialize};

use crate::graph::RoadClass;

/// Cost multiplier for the top-ranked preference.
const BASE_PREFERRED_MULTIPLIER: f64 = 0.5;
/// Added per rank below the top.
const RANK_STEP: f64 = 0.1;
/// Applied to anything missing from a non-empty preference list.
const UNPREFERRED_MULTIPLIER: f64 = 1.5;

/// Ranked road class and surface preferences. Rank 0 is the strongest
/// preference; an empty list means no preference.
///
/// Surface preferences are carried for callers but do not influence routing:
/// graph edges have no surface attribute, so there is nothing to weigh them
/// against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoadPreferences {
    pub road_classes: Vec<RoadClass>,
    pub surfaces: Vec<String>,
}

impl RoadPreferences {
    pub fn classes(road_classes: impl IntoIterator<Item = RoadClass>) -> Self {
        Self {
            road_classes: road_classes.into_iter().collect(),
            surfaces: Vec::new(),
        }
    }

    pub fn with_surfaces<S: Into<String>>(mut self, surfaces: impl IntoIterator<Item = S>) -> Self {
        self.surfaces = surfaces.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.road_classes.is_empty() && self.surfaces.is_empty()
    }

    /// Multiplier applied to an edge of `class` during path search.
    pub fn class_multiplier(&self, class: RoadClass) -> f64 {
        rank_multiplier(
            self.road_classes.iter().position(|c| *c == class),
            self.road_classes.is_empty(),
        )
    }

    /// Multiplier an edge with `surface` would receive. Not applied to edge
    /// cost.
    pub fn surface_multiplier(&self, surface: &str) -> f64 {
        rank_multiplier(
            self.surfaces
                .iter()
                .position(|s| s.eq_ignore_ascii_case(surface)),
            self.surfaces.is_empty(),
        )
    }
}

fn rank_multiplier(rank: Option<usize>, list_empty: bool) -> f64 {
    match rank {
        Some(rank) => BASE_PREFERRED_MULTIPLIER + RANK_STEP * rank as f64,
        None if list_empty => 1.0,
        None => UNPREFERRED_MULTIPLIER,
    }
}
