// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::osm::Bounds;
use crate::poi::{associate, NamedPoint, Outline};
use crate::{Engine, Graph, Mode};

use super::{model, Options};

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into an [Engine].
pub(super) struct GraphBuilder<'a> {
    g: Graph,
    options: &'a Options<'a>,
    bounds: Option<Bounds>,
    outlines: Vec<Outline>,
    points: Vec<NamedPoint>,
}

impl<'a> GraphBuilder<'a> {
    /// Create a new, empty graph builder.
    pub(super) fn new(options: &'a Options<'a>) -> Self {
        Self {
            g: Graph::default(),
            options,
            bounds: None,
            outlines: Vec::default(),
            points: Vec::default(),
        }
    }

    /// Add all features from the provided iterator and attach points of interest
    /// to the resulting graph.
    pub(super) fn add_features<E, I>(mut self, features: I) -> Result<Engine, E>
    where
        I: IntoIterator<Item = Result<model::Feature, E>>,
    {
        for f in features {
            self.add_feature(f?);
        }
        Ok(self.finish())
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Bounds(b) => self.add_bounds(b),
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_bounds(&mut self, b: Bounds) {
        if self.bounds.is_none() {
            self.bounds = Some(b);
        } else {
            log::debug!("ignoring additional <bounds>: {:?}", b);
        }
    }

    fn add_node(&mut self, n: model::TaggedNode) {
        if !self.g.add_node(n.node) {
            log::debug!("duplicate node {} - keeping the first one", n.node.id);
            return;
        }

        if let Some(name) = n.tags.get("name") {
            self.points.push(NamedPoint {
                id: n.node.id,
                name: name.clone(),
                pos: n.node.coord(),
            });
        }
    }

    fn add_way(&mut self, w: model::Way) {
        let modes = self.options.profile.way_modes(&w.tags);
        if !modes.is_empty() {
            self.create_edges(w.id, &w.nodes, modes);
        } else if let Some(highway) = w.tags.get("highway") {
            log::debug!("way {}: unsupported highway={:?}", w.id, highway);
        }

        if let Some(name) = self.options.profile.poi_name(&w.tags) {
            self.outlines.push(Outline {
                name: name.to_string(),
                nodes: w.nodes,
            });
        }
    }

    fn create_edges(&mut self, way_id: i64, nodes: &[i64], modes: &[Mode]) {
        nodes.windows(2).for_each(|pair| {
            for &mode in modes {
                if !self.g.connect(mode, pair[0], pair[1]) {
                    log::debug!(
                        "way {}: no {} edge between {} and {} (unknown or repeated node)",
                        way_id,
                        mode,
                        pair[0],
                        pair[1],
                    );
                }
            }
        });
    }

    fn finish(mut self) -> Engine {
        self.g.refresh_connected();

        let bounds = self.bounds.unwrap_or_else(|| {
            log::warn!(
                "no <bounds> in the OSM data - assuming {:?}",
                self.options.fallback_bounds
            );
            self.options.fallback_bounds
        });

        for mode in Mode::ALL {
            let mg = self.g.mode(mode);
            if mg.connected().is_empty() {
                log::warn!("profile {:?}: no {} edges", self.options.profile.name, mode);
            } else {
                log::info!(
                    "{} graph: {} connected nodes, {} edges",
                    mode,
                    mg.connected().len(),
                    mg.edge_count() / 2,
                );
            }
        }

        let pois = associate(&self.g, &bounds, &self.outlines, &self.points);
        log::info!("{} points of interest", pois.len());

        Engine::new(self.g, bounds, pois)
    }
}
