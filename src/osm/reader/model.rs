// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::Bounds;
use crate::Node;
use std::collections::HashMap;

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node) with its tags.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedNode {
    pub node: Node,
    pub tags: HashMap<String, String>,
}

/// Represents an [OSM way](https://wiki.openstreetmap.org/wiki/Way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Way {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// Union over all OSM elements relevant for routing.
/// Relations are skipped by the readers.
#[derive(Debug, Clone)]
pub enum Feature {
    Bounds(Bounds),
    Node(TaggedNode),
    Way(Way),
}
