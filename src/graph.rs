// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{earth_distance, initial_bearing, Coord, Edge, Mode, Node};
use std::collections::btree_map::{BTreeMap, Entry};

/// Edge set of the [Graph] usable by a single [Mode].
///
/// Each node's edges are kept sorted by [Edge::to], without duplicates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ModeGraph {
    edges: BTreeMap<i64, Vec<Edge>>,
    connected: Vec<Node>,
}

impl ModeGraph {
    /// Gets all [Edges](Edge) from a node with a given id, sorted by neighbor id.
    pub fn get_edges(&self, from_id: i64) -> &[Edge] {
        self.edges
            .get(&from_id)
            .map(|e| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the distance of an [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, from_id: i64, to_id: i64) -> f64 {
        let edges = self.get_edges(from_id);
        match edges.binary_search_by_key(&to_id, |e| e.to) {
            Ok(idx) => edges[idx].distance,
            Err(_) => f64::INFINITY,
        }
    }

    /// Returns the nodes with at least one edge in this mode, in ascending id order.
    ///
    /// Only up-to-date after [Graph::refresh_connected] has been called.
    pub fn connected(&self) -> &[Node] {
        &self.connected
    }

    /// Checks if a node with the given id has at least one edge in this mode.
    pub fn is_connected(&self, id: i64) -> bool {
        self.edges.get(&id).is_some_and(|e| !e.is_empty())
    }

    /// Returns the total number of (directed) edges.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Inserts an [Edge] into the sorted adjacency of `from_id`, unless an edge
    /// to the same neighbor already exists. Returns true if the edge was inserted.
    fn insert_edge(&mut self, from_id: i64, edge: Edge) -> bool {
        let edges = self.edges.entry(from_id).or_default();
        match edges.binary_search_by_key(&edge.to, |e| e.to) {
            Ok(_) => false,
            Err(idx) => {
                edges.insert(idx, edge);
                true
            }
        }
    }

    /// Finds the [Node] with at least one edge in this mode closest to the given position.
    ///
    /// This function requires computing the distance to every connected node,
    /// and is not suitable for large graphs. On ties, the node with the lowest id wins.
    pub fn find_nearest_node(&self, lat: f64, lon: f64) -> Option<Snap> {
        self.connected
            .iter()
            .map(|&node| Snap {
                node,
                distance: earth_distance(lat, lon, node.lat, node.lon),
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Result of matching a free-form position to the closest connected [Node].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    pub node: Node,

    /// Distance between the queried position and the node, in meters.
    pub distance: f64,
}

/// Represents an OpenStreetMap network as a set of [Nodes](Node)
/// and two [edge sets](ModeGraph) between them: one per [Mode].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Graph {
    nodes: BTreeMap<i64, Node>,
    walk: ModeGraph,
    bike: ModeGraph,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Nodes](Node) in the graph, in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Retrieves a [Node] with the provided id.
    pub fn get_node(&self, id: i64) -> Option<Node> {
        self.nodes.get(&id).copied()
    }

    /// Creates a [Node] with `node.id`. Returns false if a node with the same id
    /// already exists, in which case the graph is left unchanged.
    ///
    /// Moving existing nodes would break the edge distance invariant,
    /// and is therefore disallowed.
    pub fn add_node(&mut self, node: Node) -> bool {
        match self.nodes.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert(node);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Returns the edge set for the given [Mode].
    pub fn mode(&self, mode: Mode) -> &ModeGraph {
        match mode {
            Mode::Walk => &self.walk,
            Mode::Bike => &self.bike,
        }
    }

    fn mode_mut(&mut self, mode: Mode) -> &mut ModeGraph {
        match mode {
            Mode::Walk => &mut self.walk,
            Mode::Bike => &mut self.bike,
        }
    }

    /// Gets all [Edges](Edge) from a node with a given id in the given [Mode].
    pub fn get_edges(&self, mode: Mode, from_id: i64) -> &[Edge] {
        self.mode(mode).get_edges(from_id)
    }

    /// Gets the distance of an edge between two nodes in the given [Mode].
    /// If such an edge doesn't exist, returns [f64::INFINITY].
    pub fn get_edge(&self, mode: Mode, from_id: i64, to_id: i64) -> f64 {
        self.mode(mode).get_edge(from_id, to_id)
    }

    /// Connects two existing nodes in the given [Mode] with a pair of symmetric [Edges](Edge),
    /// weighted by the great-circle distance between the nodes.
    ///
    /// Each direction is skipped if the corresponding edge already exists.
    /// Returns false (without changing the graph) if either node doesn't exist
    /// or both ids are the same.
    pub fn connect(&mut self, mode: Mode, a_id: i64, b_id: i64) -> bool {
        if a_id == b_id {
            return false;
        }
        let (a, b) = match (self.get_node(a_id), self.get_node(b_id)) {
            (Some(a), Some(b)) => (a, b),
            _ => return false,
        };

        let distance = earth_distance(a.lat, a.lon, b.lat, b.lon);
        let mg = self.mode_mut(mode);
        mg.insert_edge(
            a.id,
            Edge {
                to: b.id,
                distance,
                azimuth: initial_bearing(a.lat, a.lon, b.lat, b.lon),
            },
        );
        mg.insert_edge(
            b.id,
            Edge {
                to: a.id,
                distance,
                azimuth: initial_bearing(b.lat, b.lon, a.lat, a.lon),
            },
        );
        true
    }

    /// Recomputes the list of [connected nodes](ModeGraph::connected) of both modes.
    /// Must be called after the last call to [Graph::connect].
    pub fn refresh_connected(&mut self) {
        for mode in Mode::ALL {
            let connected: Vec<Node> = self
                .nodes
                .values()
                .filter(|n| self.mode(mode).is_connected(n.id))
                .copied()
                .collect();
            self.mode_mut(mode).connected = connected;
        }
    }

    /// Finds the closest [Node] with at least one edge in the given [Mode].
    ///
    /// See [ModeGraph::find_nearest_node].
    pub fn find_nearest_node(&self, mode: Mode, pos: Coord) -> Option<Snap> {
        self.mode(mode).find_nearest_node(pos.lat, pos.lon)
    }
}
