// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::btree_map::{BTreeMap, Entry};
use std::collections::HashSet;

use crate::osm::Bounds;
use crate::{Coord, Graph, Mode, Snap};

/// Named feature (building, sports ground, park or a named point)
/// attached to the closest connected node of each [Mode].
#[derive(Debug, Clone, PartialEq)]
pub struct Poi {
    pub name: String,

    /// Closest node with [Mode::Walk] edges, if any.
    pub walk: Option<Snap>,

    /// Closest node with [Mode::Bike] edges, if any.
    pub bike: Option<Snap>,

    /// Outline of the feature. Empty for point features.
    pub polygon: Vec<Coord>,
}

impl Poi {
    /// Returns the snapped node for the given [Mode].
    pub fn snap(&self, mode: Mode) -> Option<Snap> {
        match mode {
            Mode::Walk => self.walk,
            Mode::Bike => self.bike,
        }
    }

    /// Returns the position used to represent this POI in routing requests:
    /// the walk-snapped node, falling back to the bike-snapped node.
    pub fn anchor(&self) -> Option<Coord> {
        self.walk.or(self.bike).map(|s| s.node.coord())
    }
}

/// Named way with a POI key (see [Profile::poi_keys](crate::osm::Profile::poi_keys)),
/// before being attached to the graph.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Outline {
    pub name: String,
    pub nodes: Vec<i64>,
}

/// Named node, before being attached to the graph.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NamedPoint {
    pub id: i64,
    pub name: String,
    pub pos: Coord,
}

/// Attaches outlines and named points to the graph, which must have its
/// [connected node lists](Graph::refresh_connected) up-to-date.
///
/// Outlines are processed first, then points. If a name is used multiple
/// times, the first feature wins. Points referenced by any outline, points outside
/// of `bounds` and features which can't be snapped to any mode are ignored.
pub(crate) fn associate(
    g: &Graph,
    bounds: &Bounds,
    outlines: &[Outline],
    points: &[NamedPoint],
) -> BTreeMap<String, Poi> {
    let mut pois = BTreeMap::default();
    let mut outline_nodes: HashSet<i64> = HashSet::default();

    for outline in outlines {
        outline_nodes.extend(outline.nodes.iter().copied());
        if pois.contains_key(&outline.name) {
            log::debug!("duplicate POI name {:?} - ignoring outline", outline.name);
            continue;
        }

        let polygon: Vec<Coord> = outline
            .nodes
            .iter()
            .filter_map(|&id| g.get_node(id))
            .map(|n| n.coord())
            .collect();

        let poi = Poi {
            name: outline.name.clone(),
            walk: nearest_to_any(g, Mode::Walk, &polygon),
            bike: nearest_to_any(g, Mode::Bike, &polygon),
            polygon,
        };
        insert(&mut pois, poi);
    }

    for point in points {
        if outline_nodes.contains(&point.id) {
            continue;
        }
        if !bounds.contains(point.pos) {
            log::debug!("POI {:?} ({}) is out of bounds", point.name, point.id);
            continue;
        }
        if pois.contains_key(&point.name) {
            log::debug!("duplicate POI name {:?} - ignoring node {}", point.name, point.id);
            continue;
        }

        let poi = Poi {
            name: point.name.clone(),
            walk: g.find_nearest_node(Mode::Walk, point.pos),
            bike: g.find_nearest_node(Mode::Bike, point.pos),
            polygon: Vec::default(),
        };
        insert(&mut pois, poi);
    }

    pois
}

fn insert(pois: &mut BTreeMap<String, Poi>, poi: Poi) {
    if poi.walk.is_none() && poi.bike.is_none() {
        log::debug!("POI {:?} has no connected nodes nearby", poi.name);
        return;
    }

    if let Entry::Vacant(e) = pois.entry(poi.name.clone()) {
        e.insert(poi);
    }
}

/// Finds the single closest connected node to any of the provided positions.
/// On ties, the earliest position wins.
fn nearest_to_any(g: &Graph, mode: Mode, positions: &[Coord]) -> Option<Snap> {
    positions
        .iter()
        .filter_map(|&pos| g.find_nearest_node(mode, pos))
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{earth_distance, Node};

    /// Nodes 1-2 are a footway, 3-4 a road (walk & bike).
    /// Nodes 10-13 are "free" - not connected in any mode.
    fn graph() -> Graph {
        let mut g = Graph::new();
        for (id, lat, lon) in [
            (1, 31.3100, 121.3850),
            (2, 31.3100, 121.3860),
            (3, 31.3150, 121.3850),
            (4, 31.3150, 121.3860),
            (10, 31.31004, 121.38550),
            (11, 31.31004, 121.38560),
            (12, 31.31040, 121.38560),
            (13, 31.31040, 121.38550),
            (20, 31.31490, 121.38510),
            (21, 40.0, 120.0),
        ] {
            g.add_node(Node { id, lat, lon });
        }
        g.connect(Mode::Walk, 1, 2);
        g.connect(Mode::Walk, 3, 4);
        g.connect(Mode::Bike, 3, 4);
        g.refresh_connected();
        g
    }

    fn outline(name: &str, nodes: &[i64]) -> Outline {
        Outline {
            name: name.to_string(),
            nodes: nodes.to_vec(),
        }
    }

    fn point(g: &Graph, id: i64, name: &str) -> NamedPoint {
        NamedPoint {
            id,
            name: name.to_string(),
            pos: g.get_node(id).unwrap().coord(),
        }
    }

    #[test]
    fn outline_snaps_per_mode() {
        let g = graph();
        let pois = associate(
            &g,
            &Bounds::FALLBACK,
            &[outline("Library", &[10, 11, 12, 13, 10])],
            &[],
        );

        let library = &pois["Library"];
        assert_eq!(library.polygon.len(), 5);
        assert_eq!(library.polygon[1], Coord::new(31.31004, 121.38560));

        let walk = library.walk.unwrap();
        assert_eq!(walk.node.id, 2);
        assert_eq!(
            walk.distance,
            earth_distance(31.31004, 121.38560, 31.3100, 121.3860)
        );

        // Bike must use the road, even though the footway is closer
        let bike = library.bike.unwrap();
        assert_eq!(bike.node.id, 4);
        assert_eq!(
            bike.distance,
            earth_distance(31.31040, 121.38560, 31.3150, 121.3860)
        );

        assert_eq!(library.anchor(), Some(Coord::new(31.3100, 121.3860)));
    }

    #[test]
    fn closer_node_wins() {
        let mut g = Graph::new();
        // X is ~5 m from the POI, Y is ~50 m from the POI
        g.add_node(Node { id: 1, lat: 31.31, lon: 121.39 });
        g.add_node(Node { id: 2, lat: 31.31 + 0.000045, lon: 121.39 });
        g.add_node(Node { id: 3, lat: 31.31 - 0.00045, lon: 121.39 });
        g.add_node(Node { id: 4, lat: 31.30, lon: 121.39 });
        g.connect(Mode::Walk, 2, 4);
        g.connect(Mode::Walk, 3, 4);
        g.refresh_connected();

        let pois = associate(&g, &Bounds::FALLBACK, &[], &[point(&g, 1, "Gate")]);
        let snap = pois["Gate"].walk.unwrap();
        assert_eq!(snap.node.id, 2);
        assert!((snap.distance - 5.0).abs() < 0.1);
        assert!(pois["Gate"].bike.is_none());
        assert!(pois["Gate"].polygon.is_empty());
    }

    #[test]
    fn first_name_wins() {
        let g = graph();
        let pois = associate(
            &g,
            &Bounds::FALLBACK,
            &[
                outline("Hall", &[10, 11]),
                outline("Hall", &[12, 13]),
            ],
            &[point(&g, 20, "Hall")],
        );
        assert_eq!(pois.len(), 1);
        assert_eq!(pois["Hall"].polygon[0], Coord::new(31.31004, 121.38550));
    }

    #[test]
    fn points_filtered() {
        let g = graph();
        let pois = associate(
            &g,
            &Bounds::FALLBACK,
            &[outline("Hall", &[10, 11, 12])],
            &[
                point(&g, 11, "Entrance"),
                point(&g, 21, "Far away"),
                point(&g, 20, "Kiosk"),
            ],
        );
        let names: Vec<&str> = pois.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Hall", "Kiosk"]);
        assert_eq!(pois["Kiosk"].walk.unwrap().node.id, 3);
        assert_eq!(pois["Kiosk"].bike.unwrap().node.id, 3);
    }

    #[test]
    fn unconnected_graph_has_no_pois() {
        let mut g = Graph::new();
        g.add_node(Node { id: 1, lat: 31.31, lon: 121.39 });
        g.refresh_connected();

        let pois = associate(
            &g,
            &Bounds::FALLBACK,
            &[outline("Hall", &[1])],
            &[point(&g, 1, "Kiosk")],
        );
        assert!(pois.is_empty());
    }

    #[test]
    fn anchor_falls_back_to_bike() {
        let node = Node { id: 7, lat: 1.0, lon: 2.0 };
        let poi = Poi {
            name: "Garage".to_string(),
            walk: None,
            bike: Some(Snap { node, distance: 3.0 }),
            polygon: vec![],
        };
        assert_eq!(poi.anchor(), Some(Coord::new(1.0, 2.0)));
        assert_eq!(poi.snap(Mode::Bike).unwrap().node.id, 7);
        assert!(poi.snap(Mode::Walk).is_none());
    }
}
