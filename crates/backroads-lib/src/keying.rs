//! Coordinate keys used to decide when two polyline endpoints coincide.
//!
//! Longitude and latitude are rounded independently to a fixed number of
//! decimal places. Five decimals is roughly 1.1 m at the equator.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use crate::geometry::LatLng;

/// Default rounding precision in decimal places.
pub const DEFAULT_PRECISION: u32 = 5;

/// Largest precision accepted; beyond this the scaled value loses integer
/// precision in an `f64`.
pub const MAX_PRECISION: u32 = 9;

/// Canonical key for a rounded coordinate.
///
/// Stored as scaled integers so equality is exact and hashing is cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey {
    lng: i64,
    lat: i64,
    precision: u32,
}

impl CoordKey {
    /// Round `position` to `precision` decimal places.
    pub fn new(position: LatLng, precision: u32) -> Self {
        let precision = precision.min(MAX_PRECISION);
        let scale = 10f64.powi(precision as i32);
        Self {
            lng: (position.lng * scale).round() as i64,
            lat: (position.lat * scale).round() as i64,
            precision,
        }
    }
}

impl fmt::Display for CoordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10f64.powi(self.precision as i32);
        let digits = self.precision as usize;
        write!(
            f,
            "{:.digits$},{:.digits$}",
            self.lng as f64 / scale,
            self.lat as f64 / scale
        )
    }
}

/// Entry tracked for each distinct endpoint key.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Discovery index; node ids derive from it.
    pub index: usize,
    /// First raw coordinate that produced the key.
    pub position: LatLng,
    /// Number of polyline endpoints that rounded to this key.
    pub occurrences: usize,
}

/// Index of polyline endpoints keyed by their rounded coordinate.
#[derive(Debug, Clone)]
pub struct EndpointIndex {
    precision: u32,
    entries: HashMap<CoordKey, Endpoint>,
    order: Vec<CoordKey>,
}

impl EndpointIndex {
    pub fn new(precision: u32) -> Self {
        Self {
            precision: precision.min(MAX_PRECISION),
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn key(&self, position: LatLng) -> CoordKey {
        CoordKey::new(position, self.precision)
    }

    /// Record one endpoint occurrence and return its key.
    pub fn record(&mut self, position: LatLng) -> CoordKey {
        let key = self.key(position);
        match self.entries.entry(key) {
            Entry::Occupied(mut entry) => entry.get_mut().occurrences += 1,
            Entry::Vacant(entry) => {
                entry.insert(Endpoint {
                    index: self.order.len(),
                    position,
                    occurrences: 1,
                });
                self.order.push(key);
            }
        }
        key
    }

    pub fn get(&self, key: &CoordKey) -> Option<&Endpoint> {
        self.entries.get(key)
    }

    pub fn occurrences(&self, key: &CoordKey) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.occurrences)
    }

    /// Endpoints in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&CoordKey, &Endpoint)> {
        self.order
            .iter()
            .filter_map(move |key| self.entries.get(key).map(|entry| (key, entry)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys touched by exactly one polyline endpoint.
    pub fn dead_end_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.occurrences == 1)
            .count()
    }
}
