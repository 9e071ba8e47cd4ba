use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

pub mod dijkstra;
pub mod graph;
pub mod itinerary;

pub use dijkstra::{PathWeight, ShortestPathIndex};
pub use graph::{Edge, EdgeId, Graph, RideWeight, RouteGraph, VertexId};
pub use itinerary::{Itinerary, Leg};

use crate::catalogue::Catalogue;
use dijkstra::SourceTable;

/// km/h to meters per minute.
pub const KMH_TO_MPM: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Boarding wait at every stop, whole minutes.
    pub wait_time: u32,
    /// Bus velocity in meters per minute.
    pub velocity: f64,
}

impl RoutingSettings {
    /// Builds settings from the document units: minutes and km/h.
    pub fn from_kmh(wait_time: u32, velocity_kmh: f64) -> Self {
        Self {
            wait_time,
            velocity: velocity_kmh * KMH_TO_MPM,
        }
    }
}

/// Pieces of a router recovered from a snapshot, ready to be adopted
/// without re-running graph construction.
pub struct RouterParts {
    pub(crate) settings: RoutingSettings,
    pub(crate) graph: RouteGraph,
    pub(crate) tables: Vec<(VertexId, SourceTable<RideWeight>)>,
}

/// Answers from/to route queries over a built catalogue.
///
/// Construction builds the full ride graph and attaches a fresh solver
/// index; both are read-only afterwards. The catalogue is borrowed for
/// the router's whole lifetime and must not change underneath it.
pub struct Router<'a> {
    catalogue: &'a Catalogue,
    settings: RoutingSettings,
    graph: Rc<RouteGraph>,
    index: ShortestPathIndex<RideWeight>,
}

impl<'a> Router<'a> {
    pub fn new(catalogue: &'a Catalogue, settings: RoutingSettings) -> Self {
        let graph = Rc::new(RouteGraph::build(catalogue, &settings));
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "route graph built"
        );
        let index = ShortestPathIndex::new(graph.clone());
        Self {
            catalogue,
            settings,
            graph,
            index,
        }
    }

    /// Re-assembles a router from snapshot parts, adopting the restored
    /// graph and any pre-warmed solver tables as-is.
    pub fn from_parts(catalogue: &'a Catalogue, parts: RouterParts) -> Self {
        let graph = Rc::new(parts.graph);
        let index = ShortestPathIndex::new(graph.clone());
        for (source, table) in parts.tables {
            index.insert_table(source, table);
        }
        info!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "route graph restored"
        );
        Self {
            catalogue,
            settings: parts.settings,
            graph,
            index,
        }
    }

    pub fn settings(&self) -> &RoutingSettings {
        &self.settings
    }

    /// Builds the fastest route between two stop names.
    ///
    /// None covers both an unknown stop name and the absence of any
    /// feasible path; callers wanting to tell them apart check stop
    /// existence up front. Same-name queries return a zero-leg,
    /// zero-time itinerary.
    pub fn build_route(&self, from: &str, to: &str) -> Option<Itinerary> {
        let from = self.catalogue.stop(from)?;
        let to = self.catalogue.stop(to)?;
        let edges = self.index.route(from.index, to.index)?;
        Some(Itinerary::from_edges(
            &edges,
            &self.graph,
            self.catalogue,
            self.settings.wait_time.into(),
        ))
    }

    pub(crate) fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    pub(crate) fn warm_tables(&self) -> Vec<(VertexId, Rc<SourceTable<RideWeight>>)> {
        self.index.warm_tables()
    }
}
