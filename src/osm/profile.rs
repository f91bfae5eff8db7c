// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::Mode;

/// Describes how to convert OSM data into a [Graph](crate::Graph) and
/// [points of interest](crate::Poi).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    /// Human readable name of the profile. Only used for logging.
    pub name: &'a str,

    /// Array of tags which OSM ways can be used for routing.
    ///
    /// A way is matched against all [WayClass] objects in order, and
    /// once an exact key and value match is found, the way is used for routing
    /// in the matched [WayClass::mode]. Ways matching no [WayClass] are ignored.
    ///
    /// Ways classified as [Mode::Bike] are also usable in [Mode::Walk].
    pub ways: &'a [WayClass<'a>],

    /// Keys marking named OSM ways as points of interest, e.g. "building".
    /// The value of the tag is not considered.
    pub poi_keys: &'a [&'a str],
}

/// Assignment of OSM ways with specific keys and values to a travel [Mode].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WayClass<'a> {
    /// Key of an OSM way for which this class applies (e.g. "highway").
    pub key: &'a str,

    /// Value under [WayClass::key] of an OSM way for which this class applies.
    /// E.g. "footway", "residential".
    pub value: &'a str,

    /// Most permissive mode which can use the way.
    pub mode: Mode,
}

impl<'a> Profile<'a> {
    /// Returns the [Mode] of the first matching [WayClass],
    /// or None if the way is not routable.
    pub fn way_mode(&self, tags: &HashMap<String, String>) -> Option<Mode> {
        self.ways.iter().find_map(|c| {
            if tags.get(c.key).map(|v| v.as_str()) == Some(c.value) {
                Some(c.mode)
            } else {
                None
            }
        })
    }

    /// Returns the edge sets into which a way with given tags should be inserted.
    pub fn way_modes(&self, tags: &HashMap<String, String>) -> &'static [Mode] {
        match self.way_mode(tags) {
            Some(Mode::Bike) => &[Mode::Walk, Mode::Bike],
            Some(Mode::Walk) => &[Mode::Walk],
            None => &[],
        }
    }

    /// Returns the name of a way, if it should be treated as a point of interest.
    pub fn poi_name<'t>(&self, tags: &'t HashMap<String, String>) -> Option<&'t str> {
        let name = tags.get("name")?;
        if self.poi_keys.iter().any(|&k| tags.contains_key(k)) {
            Some(name.as_str())
        } else {
            None
        }
    }
}

/// Default [Profile] for university campuses: footpaths are walk-only,
/// and regular streets are usable by bikes and pedestrians.
pub const CAMPUS_PROFILE: Profile = Profile {
    name: "campus",
    ways: &[
        WayClass {
            key: "highway",
            value: "tertiary",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "residential",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "service",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "primary",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "secondary",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "unclassified",
            mode: Mode::Bike,
        },
        WayClass {
            key: "highway",
            value: "footway",
            mode: Mode::Walk,
        },
        WayClass {
            key: "highway",
            value: "track",
            mode: Mode::Walk,
        },
        WayClass {
            key: "highway",
            value: "path",
            mode: Mode::Walk,
        },
        WayClass {
            key: "highway",
            value: "living_street",
            mode: Mode::Walk,
        },
        WayClass {
            key: "highway",
            value: "pedestrian",
            mode: Mode::Walk,
        },
    ],
    poi_keys: &["building", "sport", "leisure"],
};

impl Default for Profile<'static> {
    fn default() -> Self {
        CAMPUS_PROFILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! tags {
        {} => { HashMap::default() };
        {$( $k:literal : $v:literal ),+} => {
            HashMap::from_iter([ $( ($k.to_string(), $v.to_string()) ),+ ])
        };
    }

    #[test]
    fn way_mode() {
        let p = CAMPUS_PROFILE;
        assert_eq!(p.way_mode(&tags! {"highway": "residential"}), Some(Mode::Bike));
        assert_eq!(p.way_mode(&tags! {"highway": "unclassified"}), Some(Mode::Bike));
        assert_eq!(p.way_mode(&tags! {"highway": "footway"}), Some(Mode::Walk));
        assert_eq!(p.way_mode(&tags! {"highway": "living_street"}), Some(Mode::Walk));
        assert_eq!(p.way_mode(&tags! {"highway": "motorway"}), None);
        assert_eq!(p.way_mode(&tags! {"highway": "steps"}), None);
        assert_eq!(p.way_mode(&tags! {"building": "yes"}), None);
        assert_eq!(p.way_mode(&tags! {}), None);
    }

    #[test]
    fn way_modes() {
        let p = CAMPUS_PROFILE;
        assert_eq!(
            p.way_modes(&tags! {"highway": "service"}),
            &[Mode::Walk, Mode::Bike]
        );
        assert_eq!(p.way_modes(&tags! {"highway": "path"}), &[Mode::Walk]);
        assert!(p.way_modes(&tags! {"highway": "cycleway"}).is_empty());
    }

    #[test]
    fn poi_name() {
        let p = CAMPUS_PROFILE;
        assert_eq!(
            p.poi_name(&tags! {"building": "university", "name": "Library"}),
            Some("Library")
        );
        assert_eq!(
            p.poi_name(&tags! {"leisure": "pitch", "sport": "soccer", "name": "Field"}),
            Some("Field")
        );
        assert_eq!(p.poi_name(&tags! {"building": "yes"}), None);
        assert_eq!(
            p.poi_name(&tags! {"highway": "residential", "name": "Main Street"}),
            None
        );
    }
}
