use std::sync::Arc;

use crate::{
    catalogue::Catalogue,
    router::{RoutingSettings, dijkstra::PathWeight},
    shared::time::Minutes,
};

pub type VertexId = usize;
pub type EdgeId = usize;

/// The weight of one ride edge: board `bus` and stay on it over
/// `span_count` stops, `total_time` covering the boarding wait plus the
/// ride itself.
#[derive(Debug, Clone)]
pub struct RideWeight {
    pub bus: Arc<str>,
    pub total_time: Minutes,
    pub span_count: u32,
}

impl PathWeight for RideWeight {
    fn cost(&self) -> Minutes {
        self.total_time
    }

    fn combine(&self, other: &Self) -> Self {
        // Only the scalar survives accumulation; bus and span are
        // leaf-edge data.
        Self {
            bus: Arc::default(),
            total_time: self.total_time + other.total_time,
            span_count: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Edge<W> {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: W,
}

/// A directed weighted multigraph over a fixed vertex set.
///
/// Edges live in an arena addressed by [`EdgeId`]; per-vertex incidence
/// lists hold the outgoing edge ids. Parallel edges between the same
/// vertex pair are kept as-is, never merged.
#[derive(Debug, Clone)]
pub struct Graph<W> {
    edges: Vec<Edge<W>>,
    incidence: Vec<Vec<EdgeId>>,
}

impl<W> Graph<W> {
    pub fn new(vertex_count: usize) -> Self {
        Self {
            edges: Vec::new(),
            incidence: vec![Vec::new(); vertex_count],
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn add_edge(&mut self, edge: Edge<W>) -> EdgeId {
        let id = self.edges.len();
        self.incidence[edge.from].push(id);
        self.edges.push(edge);
        id
    }

    pub fn edge(&self, id: EdgeId) -> &Edge<W> {
        &self.edges[id]
    }

    pub fn edges(&self) -> &[Edge<W>] {
        &self.edges
    }

    pub fn edges_from(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incidence[vertex].iter().copied()
    }
}

pub type RouteGraph = Graph<RideWeight>;

impl Graph<RideWeight> {
    /// Builds the ride multigraph for a catalogue.
    ///
    /// Vertex ids are stop arena indices. Per bus, every pairwise span
    /// i -> j gets its own edge; the running time is extended by one
    /// segment per step of j, so a line of N stops costs O(N^2) instead
    /// of recomputing each span from scratch. Non-roundtrip lines add
    /// the mirrored return edges with an independently accumulated
    /// backward running time.
    pub fn build(catalogue: &Catalogue, settings: &RoutingSettings) -> Self {
        let mut graph = Self::new(catalogue.stops().len());
        let wait: Minutes = settings.wait_time.into();

        for bus in catalogue.buses() {
            let stops = &bus.stops;
            let count = stops.len();
            for i in 0..count.saturating_sub(1) {
                let mut time = wait;
                let mut time_back = wait;
                for j in i + 1..count {
                    let segment = catalogue.distance_between(stops[j - 1], stops[j]);
                    time += Minutes::from_minutes(segment.as_meters() / settings.velocity);
                    graph.add_edge(Edge {
                        from: stops[i],
                        to: stops[j],
                        weight: RideWeight {
                            bus: bus.name.clone(),
                            total_time: time,
                            span_count: (j - i) as u32,
                        },
                    });

                    if !bus.is_roundtrip {
                        let i_back = count - 1 - i;
                        let j_back = count - 1 - j;
                        let segment_back =
                            catalogue.distance_between(stops[j_back + 1], stops[j_back]);
                        time_back +=
                            Minutes::from_minutes(segment_back.as_meters() / settings.velocity);
                        graph.add_edge(Edge {
                            from: stops[i_back],
                            to: stops[j_back],
                            weight: RideWeight {
                                bus: bus.name.clone(),
                                total_time: time_back,
                                span_count: (j - i) as u32,
                            },
                        });
                    }
                }
            }
        }
        graph
    }
}
