// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::Coord;

/// Region in which routing queries are accepted, as read from the
/// [`<bounds>`](https://wiki.openstreetmap.org/wiki/OSM_XML) element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Region assumed when the OSM document has no `<bounds>` element.
    pub const FALLBACK: Self = Self {
        min_lat: 31.30,
        max_lat: 31.33,
        min_lon: 121.38,
        max_lon: 121.40,
    };

    /// Checks if the position lies within (or on the edge of) the region.
    pub fn contains(&self, pos: Coord) -> bool {
        pos.lat >= self.min_lat
            && pos.lat <= self.max_lat
            && pos.lon >= self.min_lon
            && pos.lon <= self.max_lon
    }

    /// Checks that all values are finite and that the minimums don't exceed the maximums.
    pub fn is_valid(&self) -> bool {
        [self.min_lat, self.max_lat, self.min_lon, self.max_lon]
            .iter()
            .all(|x| x.is_finite())
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::FALLBACK
    }
}
