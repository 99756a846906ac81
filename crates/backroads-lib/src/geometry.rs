//! Coordinates, great-circle distance, and road polyline extraction.
//!
//! The builder consumes [`RoadSegment`] vertex chains. This module turns a
//! GeoJSON `FeatureCollection` into those chains: `LineString` features
//! become one segment, `MultiLineString` features become one segment per
//! part, and every other geometry type is skipped.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use geojson::feature::Id;
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::RoadClass;

/// Mean Earth radius in meters used for every haversine computation.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default GeoJSON property holding the road classification.
pub const DEFAULT_CLASS_PROPERTY: &str = "road_class";

/// WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Great-circle distance to `other` in meters.
    pub fn haversine_to(&self, other: &LatLng) -> f64 {
        haversine_distance(*self, *other)
    }

    /// Whether both axes are finite and inside the WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Both axes within `tolerance` degrees of `other`.
    pub fn approx_eq(&self, other: &LatLng, tolerance: f64) -> bool {
        (self.lat - other.lat).abs() <= tolerance && (self.lng - other.lng).abs() <= tolerance
    }
}

impl From<geo::Coord<f64>> for LatLng {
    fn from(coord: geo::Coord<f64>) -> Self {
        Self {
            lat: coord.y,
            lng: coord.x,
        }
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl FromStr for LatLng {
    type Err = Error;

    /// Parse a `LAT,LNG` pair.
    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidCoordinate {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (lat, lng) = input
            .split_once(',')
            .ok_or_else(|| invalid("expected LAT,LNG"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| invalid("latitude is not a number"))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| invalid("longitude is not a number"))?;

        let position = LatLng::new(lat, lng);
        if !position.is_valid() {
            return Err(invalid("outside the WGS84 range"));
        }
        Ok(position)
    }
}

/// Haversine great-circle distance between two positions, in meters.
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Sum of haversine distances between consecutive positions.
pub fn polyline_length(vertices: &[LatLng]) -> f64 {
    vertices
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

/// A single road polyline ready for graph construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadSegment {
    /// Identifier of the source polyline, carried onto edges for diagnostics.
    pub id: String,
    pub road_class: RoadClass,
    pub vertices: Vec<LatLng>,
}

impl RoadSegment {
    pub fn new(id: impl Into<String>, road_class: RoadClass, vertices: Vec<LatLng>) -> Self {
        Self {
            id: id.into(),
            road_class,
            vertices,
        }
    }

    /// First and last vertex, when the segment has at least two vertices.
    pub fn endpoints(&self) -> Option<(LatLng, LatLng)> {
        if self.vertices.len() < 2 {
            return None;
        }
        Some((*self.vertices.first()?, *self.vertices.last()?))
    }

    pub fn length(&self) -> f64 {
        polyline_length(&self.vertices)
    }
}

/// Read a GeoJSON file and extract its road segments.
pub fn read_road_segments(path: &Path, class_property: &str) -> Result<Vec<RoadSegment>> {
    let text = std::fs::read_to_string(path)?;
    parse_road_segments(&text, class_property)
}

/// Parse GeoJSON text and extract its road segments.
pub fn parse_road_segments(text: &str, class_property: &str) -> Result<Vec<RoadSegment>> {
    let GeoJson::FeatureCollection(collection) = text.parse::<GeoJson>()? else {
        return Err(Error::NotAFeatureCollection);
    };
    Ok(normalize_features(&collection.features, class_property))
}

/// Extract vertex chains from a list of features.
///
/// Features without geometry or with a geometry other than `LineString` or
/// `MultiLineString` are skipped. Unknown or missing classifications fall
/// into [`RoadClass::Local`].
pub fn normalize_features(features: &[Feature], class_property: &str) -> Vec<RoadSegment> {
    let mut segments = Vec::new();
    let mut unclassified = 0usize;
    let mut unsupported = 0usize;

    for (index, feature) in features.iter().enumerate() {
        let Some(geometry) = feature.geometry.clone() else {
            unsupported += 1;
            continue;
        };
        let Ok(geometry) = geo::Geometry::<f64>::try_from(geometry) else {
            unsupported += 1;
            continue;
        };

        let road_class = match feature_road_class(feature, class_property) {
            Some(class) => class,
            None => {
                unclassified += 1;
                RoadClass::Local
            }
        };
        let base_id = feature_id(feature, index);

        match geometry {
            geo::Geometry::LineString(line) => {
                segments.push(RoadSegment::new(
                    base_id,
                    road_class,
                    line.0.into_iter().map(LatLng::from).collect(),
                ));
            }
            geo::Geometry::MultiLineString(lines) => {
                for (part, line) in lines.0.into_iter().enumerate() {
                    segments.push(RoadSegment::new(
                        format!("{base_id}:{part}"),
                        road_class,
                        line.0.into_iter().map(LatLng::from).collect(),
                    ));
                }
            }
            _ => unsupported += 1,
        }
    }

    debug!(
        features = features.len(),
        segments = segments.len(),
        unclassified,
        unsupported,
        "normalized road features"
    );
    segments
}

fn feature_road_class(feature: &Feature, class_property: &str) -> Option<RoadClass> {
    feature
        .property(class_property)
        .and_then(|value| value.as_str())
        .and_then(|name| name.parse().ok())
}

fn feature_id(feature: &Feature, index: usize) -> String {
    match &feature.id {
        Some(Id::String(id)) => id.clone(),
        Some(Id::Number(id)) => id.to_string(),
        None => format!("seg-{index}"),
    }
}
