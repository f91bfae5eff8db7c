// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Walking and cycling routes over [OpenStreetMap](https://www.openstreetmap.org/) campus maps.
//!
//! An OSM XML document is converted into a [Graph] with two edge sets over the same nodes:
//! one for pedestrians ([Mode::Walk]) and one for bicycles and other vehicles ([Mode::Bike]).
//! Named buildings and points are attached to their closest connected nodes as
//! [points of interest](Poi). The resulting [Engine] answers shortest-path queries
//! between arbitrary coordinates and orders multi-stop [tours](Tour).
//!
//! # Example
//!
//! ```no_run
//! let options = campusnav::osm::Options::default();
//! let engine = campusnav::osm::load_from_file(&options, "path/to/campus.osm")
//!     .expect("failed to load campus.osm");
//!
//! let start = campusnav::Coord::new(31.3105, 121.3852);
//! let end = campusnav::Coord::new(31.3178, 121.3931);
//! let path = engine.find_path(start, end, campusnav::Mode::Walk);
//!
//! if path.is_found() {
//!     println!("{:.0} m: {:?}", path.distance, path.coords);
//! }
//! ```

mod distance;
mod engine;
mod graph;
pub mod osm;
mod poi;
mod route;
mod tour;

pub use distance::{earth_distance, initial_bearing};
pub use engine::{Engine, Location, ModeComparison, Stats};
pub use graph::{Graph, ModeGraph, Snap};
pub use poi::Poi;
pub use route::{find_route, Path, Route, RouteError, NO_PATH_DISTANCE};
pub use tour::{Stop, Tour, START_MARKER};

/// A position on Earth, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance to another position, in meters.
    pub fn distance_to(&self, other: Coord) -> f64 {
        earth_distance(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Represents an element of the [Graph], corresponding 1:1 to an OSM node.
///
/// Node ids are unique within a [Graph]. A single Node may participate in both
/// [mode graphs](ModeGraph).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
}

impl Node {
    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lon)
    }
}

/// Represents a connection from a specific [Node] to one of its neighbors.
///
/// Edges are always inserted in pairs, so that for every A→B edge
/// with a given `distance`, a B→A edge with the same `distance` exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: i64,

    /// Great-circle distance between the two nodes, in meters.
    pub distance: f64,

    /// Initial bearing from the owning node towards `to`, in degrees.
    /// Informational only - not used for route finding.
    pub azimuth: f64,
}

/// Travel mode, selecting which edge set of the [Graph] is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Pedestrian routing over footways, paths and all roads.
    Walk,

    /// Bicycle (and other vehicle) routing over roads only.
    Bike,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Walk, Mode::Bike];

    /// Typical travel speed, in meters per second.
    pub fn speed(self) -> f64 {
        match self {
            Mode::Walk => 1.2,
            Mode::Bike => 3.1,
        }
    }

    /// Estimated travel time over `distance` meters, in seconds.
    pub fn travel_time(self, distance: f64) -> f64 {
        distance / self.speed()
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Walk => write!(f, "walk"),
            Self::Bike => write!(f, "bike"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode: {0:?} (expected \"walk\" or \"bike\")")]
pub struct ParseModeError(String);

impl std::str::FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" | "foot" | "1" => Ok(Self::Walk),
            "bike" | "bicycle" | "2" => Ok(Self::Bike),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode() {
        assert_eq!("walk".parse(), Ok(Mode::Walk));
        assert_eq!("1".parse(), Ok(Mode::Walk));
        assert_eq!("bike".parse(), Ok(Mode::Bike));
        assert_eq!("2".parse(), Ok(Mode::Bike));
        assert!("car".parse::<Mode>().is_err());
    }

    #[test]
    fn travel_time() {
        assert_eq!(Mode::Walk.travel_time(120.0), 100.0);
        assert_eq!(Mode::Bike.travel_time(310.0), 100.0);
    }
}
