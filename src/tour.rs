// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Coord, Engine, Mode};

/// Name recorded as the first element of [Tour::sequence].
pub const START_MARKER: &str = "start";

/// Named position to be visited during a [Tour].
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub pos: Coord,
}

impl Stop {
    pub fn new(name: impl Into<String>, pos: Coord) -> Self {
        Self {
            name: name.into(),
            pos,
        }
    }
}

/// Result of [Engine::find_tour].
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    /// Concatenated paths of all reachable legs.
    pub coords: Vec<Coord>,

    /// Total length of all reachable legs, in meters.
    pub distance: f64,

    /// [START_MARKER] followed by names of the stops in visiting order.
    pub sequence: Vec<String>,

    /// Names of stops which couldn't be reached from the previous stop, in visiting order.
    pub unreachable: Vec<String>,
}

impl Engine {
    /// Visits all `stops` starting from `start`, using a greedy nearest-neighbor heuristic:
    /// the next stop is always the one closest in a straight line to the current position.
    /// On ties, the stop given first wins.
    ///
    /// Each leg is routed with [Engine::find_path]. A leg without a path contributes
    /// nothing to [Tour::coords] and [Tour::distance] and is recorded in [Tour::unreachable],
    /// but the tour continues from that stop as if it had been reached.
    pub fn find_tour(&self, start: Coord, mode: Mode, stops: &[Stop]) -> Tour {
        let mut tour = Tour {
            coords: Vec::default(),
            distance: 0.0,
            sequence: vec![START_MARKER.to_string()],
            unreachable: Vec::default(),
        };

        let mut current = start;
        let mut unvisited: Vec<&Stop> = stops.iter().collect();

        while let Some(idx) = nearest_stop(current, &unvisited) {
            let stop = unvisited.remove(idx);
            tour.sequence.push(stop.name.clone());

            let leg = self.find_path(current, stop.pos, mode);
            if leg.is_found() {
                let skip = match (tour.coords.last(), leg.coords.first()) {
                    (Some(last), Some(first)) if last == first => 1,
                    _ => 0,
                };
                tour.coords.extend_from_slice(&leg.coords[skip..]);
                tour.distance += leg.distance;
            } else {
                log::debug!("tour: {:?} is unreachable in {} mode", stop.name, mode);
                tour.unreachable.push(stop.name.clone());
            }

            current = stop.pos;
        }

        tour
    }
}

fn nearest_stop(pos: Coord, stops: &[&Stop]) -> Option<usize> {
    stops
        .iter()
        .enumerate()
        .map(|(idx, stop)| (idx, pos.distance_to(stop.pos)))
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::osm::{load_from_buffer, Bounds, Options};
    use crate::{Graph, Node};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b) as f64).abs() < 1e-6,
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    /// Straight footway along the equator, nodes every 0.001° of longitude,
    /// plus an unconnected island at (0.005, 0.005) - (0.005, 0.006).
    fn line() -> Engine {
        let mut g = Graph::new();
        for id in 0..=10 {
            g.add_node(Node {
                id: id + 1,
                lat: 0.0,
                lon: id as f64 / 1000.0,
            });
        }
        for id in 1..=10 {
            g.connect(Mode::Walk, id, id + 1);
        }
        g.add_node(Node { id: 100, lat: 0.005, lon: 0.005 });
        g.add_node(Node { id: 101, lat: 0.005, lon: 0.006 });
        g.connect(Mode::Walk, 100, 101);
        g.refresh_connected();

        let bounds = Bounds {
            min_lat: -0.01,
            max_lat: 0.01,
            min_lon: -0.01,
            max_lon: 0.02,
        };
        Engine::new(g, bounds, BTreeMap::default())
    }

    fn names(t: &Tour) -> Vec<&str> {
        t.sequence.iter().map(String::as_str).collect()
    }

    #[test]
    fn greedy_order() {
        // P is 1 unit from S; Q is 2 units from S, but only 1 unit from P
        let e = line();
        let s = Coord::new(0.0, 0.0);
        let p = Coord::new(0.0, 0.001);
        let q = Coord::new(0.0, 0.002);
        let stops = [Stop::new("Q", q), Stop::new("P", p)];

        let t = e.find_tour(s, Mode::Walk, &stops);
        assert_eq!(names(&t), vec!["start", "P", "Q"]);
        assert!(t.unreachable.is_empty());

        let w = e.graph().get_edge(Mode::Walk, 1, 2);
        assert_almost_eq!(t.distance, 2.0 * w);

        // Junctions between legs are not duplicated
        assert_eq!(t.coords, vec![s, s, p, p, p, q, q]);
    }

    #[test]
    fn nearest_is_not_first_given() {
        let e = line();
        let stops = [
            Stop::new("far", Coord::new(0.0, 0.009)),
            Stop::new("middle", Coord::new(0.0, 0.005)),
            Stop::new("near", Coord::new(0.0, 0.001)),
        ];
        let t = e.find_tour(Coord::new(0.0, 0.0), Mode::Walk, &stops);
        assert_eq!(names(&t), vec!["start", "near", "middle", "far"]);
        assert_almost_eq!(
            t.distance,
            Coord::new(0.0, 0.0).distance_to(Coord::new(0.0, 0.009))
        );
    }

    #[test]
    fn ties_go_to_first_given() {
        let e = line();
        let stops = [
            Stop::new("north", Coord::new(0.001, 0.005)),
            Stop::new("south", Coord::new(-0.001, 0.005)),
        ];
        let t = e.find_tour(Coord::new(0.0, 0.005), Mode::Walk, &stops);
        assert_eq!(names(&t), vec!["start", "north", "south"]);
    }

    #[test]
    fn unreachable_stop_is_skipped() {
        let e = line();
        let west = Coord::new(0.005, 0.005);
        let east = Coord::new(0.005, 0.006);
        let stops = [Stop::new("island east", east), Stop::new("island west", west)];
        let t = e.find_tour(Coord::new(0.0, 0.004), Mode::Walk, &stops);

        // The island can't be reached from the main line, but the tour
        // continues from "island west" as if it was reached.
        assert_eq!(names(&t), vec!["start", "island west", "island east"]);
        assert_eq!(t.unreachable, vec!["island west".to_string()]);
        assert_eq!(t.coords, vec![west, west, east, east]);
        assert_almost_eq!(t.distance, west.distance_to(east));
    }

    #[test]
    fn empty_tour() {
        let e = line();
        let t = e.find_tour(Coord::new(0.0, 0.0), Mode::Walk, &[]);
        assert_eq!(names(&t), vec!["start"]);
        assert!(t.coords.is_empty());
        assert_eq!(t.distance, 0.0);
    }

    #[test]
    fn out_of_bounds_stop() {
        let e = line();
        let stops = [
            Stop::new("a", Coord::new(0.0, 0.003)),
            Stop::new("nowhere", Coord::new(1.0, 1.0)),
        ];
        let t = e.find_tour(Coord::new(0.0, 0.0), Mode::Walk, &stops);
        assert_eq!(names(&t), vec!["start", "a", "nowhere"]);
        assert_eq!(t.unreachable, vec!["nowhere".to_string()]);
        assert_eq!(t.coords.last(), Some(&Coord::new(0.0, 0.003)));
    }

    #[test]
    fn campus_tour() {
        let e = load_from_buffer(
            &Options::default(),
            include_bytes!("osm/reader/test_fixtures/campus.osm"),
        )
        .unwrap();

        let stops: Vec<Stop> = e
            .locations()
            .into_iter()
            .map(|l| Stop::new(l.name, l.anchor))
            .collect();

        let t = e.find_tour(Coord::new(31.31, 121.385), Mode::Bike, &stops);
        assert_eq!(names(&t), vec!["start", "Library", "Gym & Pool", "Cafe"]);
        assert!(t.unreachable.is_empty());
        assert_eq!(t.coords.first(), Some(&Coord::new(31.31, 121.385)));
        assert_eq!(t.coords.last(), Some(&Coord::new(31.31, 121.395)));
        assert!(t.distance > 0.0);
    }
}
