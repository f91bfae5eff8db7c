// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::osm::Bounds;
use crate::{find_route, Coord, Graph, Mode, Path, Poi};

/// Loaded routing data: the [Graph], the query region and [points of interest](Poi).
///
/// An Engine is immutable once loaded; all queries take `&self`
/// and may be issued concurrently from multiple threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    graph: Graph,
    bounds: Bounds,
    pois: BTreeMap<String, Poi>,
}

/// Named location, as presented to end users for picking route endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,

    /// Position to use in routing requests, see [Poi::anchor].
    pub anchor: Coord,

    /// Outline of the location, empty for point features.
    pub polygon: Vec<Coord>,
}

/// Paths between the same two positions in both [modes](Mode), with a suggestion
/// which one is faster.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeComparison {
    pub walk: Path,
    pub bike: Path,
    pub recommended: Mode,
}

/// Summary of the loaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub nodes: usize,
    pub walk_edges: usize,
    pub walk_connected_nodes: usize,
    pub bike_edges: usize,
    pub bike_connected_nodes: usize,
    pub pois: usize,
}

impl Engine {
    /// Creates an Engine from its parts. The graph must have its
    /// [connected node lists](Graph::refresh_connected) up-to-date.
    pub(crate) fn new(graph: Graph, bounds: Bounds, pois: BTreeMap<String, Poi>) -> Self {
        Self {
            graph,
            bounds,
            pois,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns an iterator over all [points of interest](Poi), sorted by name.
    pub fn pois(&self) -> impl Iterator<Item = &Poi> {
        self.pois.values()
    }

    /// Retrieves a [point of interest](Poi) by its name.
    pub fn poi(&self, name: &str) -> Option<&Poi> {
        self.pois.get(name)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            nodes: self.graph.len(),
            walk_edges: self.graph.mode(Mode::Walk).edge_count() / 2,
            walk_connected_nodes: self.graph.mode(Mode::Walk).connected().len(),
            bike_edges: self.graph.mode(Mode::Bike).edge_count() / 2,
            bike_connected_nodes: self.graph.mode(Mode::Bike).connected().len(),
            pois: self.pois.len(),
        }
    }

    /// Lists all named locations, sorted by name.
    pub fn locations(&self) -> Vec<Location> {
        self.pois
            .values()
            .filter_map(|poi| {
                Some(Location {
                    name: poi.name.clone(),
                    anchor: poi.anchor()?,
                    polygon: poi.polygon.clone(),
                })
            })
            .collect()
    }

    /// Finds the shortest [Path] between two arbitrary positions.
    ///
    /// Both positions are matched to their closest nodes with edges in the given [Mode],
    /// and the returned path starts at `start`, goes through the route between
    /// the matched nodes and ends at `end`. Its distance includes the straight-line
    /// segments to and from the graph.
    ///
    /// Returns [Path::not_found] if either position is outside of [Engine::bounds]
    /// or there is no route between the positions.
    pub fn find_path(&self, start: Coord, end: Coord, mode: Mode) -> Path {
        if !self.bounds.contains(start) || !self.bounds.contains(end) {
            log::debug!("{:?} -> {:?}: out of bounds", start, end);
            return Path::not_found();
        }

        let (start_snap, end_snap) = match (
            self.graph.find_nearest_node(mode, start),
            self.graph.find_nearest_node(mode, end),
        ) {
            (Some(s), Some(e)) => (s, e),
            _ => return Path::not_found(),
        };

        if start_snap.node.id == end_snap.node.id {
            return Path {
                coords: vec![start, start_snap.node.coord(), end],
                distance: start_snap.distance + end_snap.distance,
            };
        }

        let route = match find_route(&self.graph, mode, start_snap.node.id, end_snap.node.id) {
            Ok(Some(route)) => route,
            Ok(None) => return Path::not_found(),
            Err(e) => {
                log::error!("{:?} -> {:?}: {}", start, end, e);
                return Path::not_found();
            }
        };

        let mut coords = Vec::with_capacity(route.nodes.len() + 2);
        coords.push(start);
        coords.extend(
            route
                .nodes
                .iter()
                .filter_map(|&id| self.graph.get_node(id))
                .map(|n| n.coord()),
        );
        coords.push(end);

        Path {
            coords,
            distance: start_snap.distance + route.distance + end_snap.distance,
        }
    }

    /// Finds paths between two positions in both modes, and recommends
    /// the one with the shorter estimated [travel time](Mode::travel_time).
    ///
    /// Walking is recommended unless cycling is possible and strictly faster.
    pub fn compare_modes(&self, start: Coord, end: Coord) -> ModeComparison {
        let walk = self.find_path(start, end, Mode::Walk);
        let bike = self.find_path(start, end, Mode::Bike);

        let recommended = match (walk.is_found(), bike.is_found()) {
            (true, true)
                if Mode::Bike.travel_time(bike.distance)
                    < Mode::Walk.travel_time(walk.distance) =>
            {
                Mode::Bike
            }
            (false, true) => Mode::Bike,
            _ => Mode::Walk,
        };

        ModeComparison {
            walk,
            bike,
            recommended,
        }
    }
}
