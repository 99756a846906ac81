use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::geometry::LatLng;

/// Identifier for a graph node, stable within one graph generation.
pub type NodeId = String;

/// Primary routing classification of a road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadClass {
    Highway,
    Arterial,
    Collector,
    Local,
    Resource,
    Decommissioned,
}

impl RoadClass {
    /// Every class, in declaration order.
    pub const ALL: [RoadClass; 6] = [
        RoadClass::Highway,
        RoadClass::Arterial,
        RoadClass::Collector,
        RoadClass::Local,
        RoadClass::Resource,
        RoadClass::Decommissioned,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RoadClass::Highway => "highway",
            RoadClass::Arterial => "arterial",
            RoadClass::Collector => "collector",
            RoadClass::Local => "local",
            RoadClass::Resource => "resource",
            RoadClass::Decommissioned => "decommissioned",
        }
    }

    /// Assumed travel speed in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            RoadClass::Highway => 100.0,
            RoadClass::Arterial => 80.0,
            RoadClass::Collector => 60.0,
            RoadClass::Local => 50.0,
            RoadClass::Resource => 40.0,
            RoadClass::Decommissioned => 20.0,
        }
    }

    /// Seconds needed to cover `meters` at this class's speed.
    pub fn travel_time(self, meters: f64) -> f64 {
        meters / (self.speed_kmh() / 3.6)
    }
}

impl fmt::Display for RoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoadClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim();
        RoadClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownRoadClass {
                name: name.to_string(),
            })
    }
}

/// Directed edge within the road graph. Every traversable polyline yields a
/// forward and a backward edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub target_node_id: NodeId,
    pub road_segment_id: String,
    /// Polyline length in meters.
    pub weight: f64,
    pub road_class: RoadClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: LatLng,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetadata {
    pub node_count: usize,
    /// Counts both directions of every bidirectional pair.
    pub edge_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// Routable road graph. Immutable once built or loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadGraph {
    nodes: BTreeMap<NodeId, GraphNode>,
    metadata: GraphMetadata,
}

impl RoadGraph {
    /// Assemble a graph from nodes, stamping fresh metadata.
    pub fn from_nodes(nodes: impl IntoIterator<Item = GraphNode>) -> Self {
        let nodes: BTreeMap<NodeId, GraphNode> = nodes
            .into_iter()
            .map(|node| (node.id.clone(), node))
            .collect();
        let metadata = GraphMetadata {
            node_count: nodes.len(),
            edge_count: nodes.values().map(|node| node.edges.len()).sum(),
            generated_at: Utc::now(),
        };
        Self { nodes, metadata }
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Nodes in their stable iteration order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// Return the outgoing edges for a node.
    pub fn neighbours(&self, id: &str) -> &[GraphEdge] {
        self.nodes
            .get(id)
            .map(|node| node.edges.as_slice())
            .unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|node| node.edges.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parse and validate a graph document.
    pub fn from_json(text: &str) -> Result<Self> {
        let graph: RoadGraph = serde_json::from_str(text)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let graph: RoadGraph = serde_json::from_slice(bytes)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Check structural invariants the routing code relies on.
    pub fn validate(&self) -> Result<()> {
        for (key, node) in &self.nodes {
            if key != &node.id {
                return Err(invalid(format!(
                    "node stored under '{key}' declares id '{}'",
                    node.id
                )));
            }
            if !node.position.is_valid() {
                return Err(invalid(format!(
                    "node '{key}' has an invalid position {}",
                    node.position
                )));
            }
            for edge in &node.edges {
                if !self.nodes.contains_key(&edge.target_node_id) {
                    return Err(invalid(format!(
                        "edge from '{key}' targets unknown node '{}'",
                        edge.target_node_id
                    )));
                }
                if !edge.weight.is_finite() || edge.weight < 0.0 {
                    return Err(invalid(format!(
                        "edge from '{key}' to '{}' has weight {}",
                        edge.target_node_id, edge.weight
                    )));
                }
            }
        }

        let edge_count = self.edge_count();
        if self.metadata.node_count != self.nodes.len() || self.metadata.edge_count != edge_count {
            warn!(
                declared_nodes = self.metadata.node_count,
                declared_edges = self.metadata.edge_count,
                actual_nodes = self.nodes.len(),
                actual_edges = edge_count,
                "graph metadata counts disagree with graph contents"
            );
        }
        Ok(())
    }

    /// Write the graph as JSON, replacing `path` atomically.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(directory)?;

        let mut file = NamedTempFile::new_in(directory)?;
        serde_json::to_writer(&mut file, self)?;
        file.flush()?;
        file.persist(path)?;

        info!(
            path = %path.display(),
            nodes = self.node_count(),
            edges = self.edge_count(),
            "wrote road graph"
        );
        Ok(())
    }

    /// Read and validate a graph file from disk.
    pub fn read_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::GraphNotFound {
                path: path.to_path_buf(),
            });
        }
        Self::from_slice(&std::fs::read(path)?)
    }
}

impl Default for RoadGraph {
    fn default() -> Self {
        Self::from_nodes(Vec::new())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidGraph { message }
}
