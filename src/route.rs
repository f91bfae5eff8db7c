// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::{Coord, Edge, Graph, Mode};

/// Distance reported by [Path] when no route exists.
pub const NO_PATH_DISTANCE: f64 = -1.0;

/// Error conditions which may occur during [find_route].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// The start or end nodes don't exist in a graph.
    InvalidReference(i64),
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(node_id) => write!(f, "invalid node: {}", node_id),
        }
    }
}

impl std::error::Error for RouteError {}

/// Sequence of node ids forming the shortest route between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<i64>,

    /// Total length of the route, in meters.
    pub distance: f64,
}

/// Sequence of positions between two arbitrary coordinates.
///
/// Unreachable destinations are represented by an empty `coords` list
/// and a `distance` of [NO_PATH_DISTANCE].
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub coords: Vec<Coord>,

    /// Total length of the path, in meters, or [NO_PATH_DISTANCE].
    pub distance: f64,
}

impl Path {
    pub fn not_found() -> Self {
        Self {
            coords: Vec::default(),
            distance: NO_PATH_DISTANCE,
        }
    }

    pub fn is_found(&self) -> bool {
        self.distance != NO_PATH_DISTANCE
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: i64,
    cost: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // NOTE: We revert the order of comparison,
        // as lower costs are considered better ("higher"),
        // and Rust's BinaryHeap is a max-heap.
        // Ties are resolved towards lower node ids.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.at.cmp(&self.at))
    }
}

fn reconstruct_path(came_from: &HashMap<i64, i64>, mut last: i64) -> Vec<i64> {
    let mut path = vec![last];

    while let Some(&nd) = came_from.get(&last) {
        path.push(nd);
        last = nd;
    }

    path.reverse();
    path
}

/// Uses [Dijkstra's algorithm](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm)
/// to find the shortest route between two nodes, using only the edges of the given [Mode].
///
/// Returns `Ok(None)` if there is no route between the two nodes, including when
/// the start node has no edges in the given mode.
///
/// All search state is local to the call, so multiple searches may run
/// concurrently over a shared [Graph]. When multiple nodes have the same tentative
/// distance, the node with the lowest id is expanded first.
pub fn find_route(
    g: &Graph,
    mode: Mode,
    from_id: i64,
    to_id: i64,
) -> Result<Option<Route>, RouteError> {
    g.get_node(from_id)
        .ok_or(RouteError::InvalidReference(from_id))?;
    g.get_node(to_id).ok_or(RouteError::InvalidReference(to_id))?;

    let mg = g.mode(mode);
    if !mg.is_connected(from_id) {
        log::debug!("{} has no {} edges - no route to {}", from_id, mode, to_id);
        return Ok(None);
    }

    let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
    let mut came_from: HashMap<i64, i64> = HashMap::default();
    let mut known_costs: HashMap<i64, f64> = HashMap::default();
    let mut finalized: HashSet<i64> = HashSet::default();

    queue.push(QueueItem {
        at: from_id,
        cost: 0.0,
    });
    known_costs.insert(from_id, 0.0);

    while let Some(item) = queue.pop() {
        // Multiple items for the same node might be kept in the queue.
        if !finalized.insert(item.at) {
            continue;
        }

        if item.at == to_id {
            return Ok(Some(Route {
                nodes: reconstruct_path(&came_from, to_id),
                distance: item.cost,
            }));
        }

        for &Edge {
            to: neighbor_id,
            distance: edge_distance,
            ..
        } in mg.get_edges(item.at)
        {
            if finalized.contains(&neighbor_id) {
                continue;
            }

            let neighbor_cost = item.cost + edge_distance;
            if neighbor_cost
                < known_costs
                    .get(&neighbor_id)
                    .copied()
                    .unwrap_or(f64::INFINITY)
            {
                came_from.insert(neighbor_id, item.at);
                known_costs.insert(neighbor_id, neighbor_cost);
                queue.push(QueueItem {
                    at: neighbor_id,
                    cost: neighbor_cost,
                });
            }
        }
    }

    Ok(None)
}
