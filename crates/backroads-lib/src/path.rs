use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::breakdown::ClassTotals;
use crate::graph::{GraphEdge, NodeId, RoadGraph};
use crate::preferences::RoadPreferences;

/// Path found between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Node ids from start to goal, inclusive.
    pub nodes: Vec<NodeId>,
    /// Edges traversed, in order. One shorter than `nodes`.
    pub edges: Vec<GraphEdge>,
    /// True length in meters. Never the preference-weighted cost.
    pub distance: f64,
    pub distance_by_class: ClassTotals,
    /// Seconds, from per-class speeds.
    pub travel_time: f64,
    pub travel_time_by_class: ClassTotals,
}

/// Find the shortest path between `start` and `goal` without preferences.
pub fn find_path(graph: &RoadGraph, start: &str, goal: &str) -> Option<PathResult> {
    find_path_with_preferences(graph, start, goal, &RoadPreferences::default())
}

/// Run Dijkstra's algorithm with edge weights scaled by road class
/// preference.
///
/// The weighted cost only steers the search. Distance is accumulated
/// separately from raw edge weights and is what the result reports. Returns
/// `None` when either node is unknown or the goal is unreachable.
pub fn find_path_with_preferences(
    graph: &RoadGraph,
    start: &str,
    goal: &str,
    preferences: &RoadPreferences,
) -> Option<PathResult> {
    let start = graph.node(start)?.id.as_str();
    let goal = graph.node(goal)?.id.as_str();

    if start == goal {
        return Some(summarize(vec![start.to_string()], Vec::new(), 0.0));
    }

    let mut weighted: HashMap<&str, f64> = HashMap::new();
    let mut true_distance: HashMap<&str, f64> = HashMap::new();
    let mut parents: HashMap<&str, (&str, &GraphEdge)> = HashMap::new();
    let mut queue = BinaryHeap::new();

    weighted.insert(start, 0.0);
    true_distance.insert(start, 0.0);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_cost = match weighted.get(entry.node) {
            Some(cost) if *cost < entry.cost.0 => continue,
            Some(cost) => *cost,
            None => continue,
        };

        if entry.node == goal {
            break;
        }

        let current_distance = true_distance.get(entry.node).copied().unwrap_or(0.0);
        for edge in graph.neighbours(entry.node) {
            let next = edge.target_node_id.as_str();
            let next_cost =
                current_cost + edge.weight * preferences.class_multiplier(edge.road_class);

            if next_cost < *weighted.get(next).unwrap_or(&f64::INFINITY) {
                weighted.insert(next, next_cost);
                true_distance.insert(next, current_distance + edge.weight);
                parents.insert(next, (entry.node, edge));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    if !weighted.contains_key(goal) {
        return None;
    }

    let (nodes, edges) = reconstruct_path(&parents, start, goal);
    let distance = true_distance.get(goal).copied().unwrap_or(0.0);
    Some(summarize(nodes, edges, distance))
}

fn reconstruct_path(
    parents: &HashMap<&str, (&str, &GraphEdge)>,
    start: &str,
    goal: &str,
) -> (Vec<NodeId>, Vec<GraphEdge>) {
    let mut nodes = vec![goal.to_string()];
    let mut edges = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(&(previous, edge)) = parents.get(current) else {
            break;
        };
        edges.push(edge.clone());
        nodes.push(previous.to_string());
        current = previous;
    }
    nodes.reverse();
    edges.reverse();
    (nodes, edges)
}

fn summarize(nodes: Vec<NodeId>, edges: Vec<GraphEdge>, distance: f64) -> PathResult {
    let mut distance_by_class = ClassTotals::zero();
    let mut travel_time_by_class = ClassTotals::zero();
    for edge in &edges {
        distance_by_class.add(edge.road_class, edge.weight);
        travel_time_by_class.add(edge.road_class, edge.road_class.travel_time(edge.weight));
    }
    let travel_time = edges
        .iter()
        .map(|edge| edge.road_class.travel_time(edge.weight))
        .sum();

    PathResult {
        nodes,
        edges,
        distance,
        distance_by_class,
        travel_time,
        travel_time_by_class,
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'a> {
    node: &'a str,
    cost: FloatOrd,
}

impl<'a> QueueEntry<'a> {
    fn new(node: &'a str, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(self.node))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
