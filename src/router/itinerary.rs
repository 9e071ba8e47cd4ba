use std::sync::Arc;

use crate::{
    catalogue::Catalogue,
    router::graph::{EdgeId, RouteGraph},
    shared::time::Minutes,
};

/// One rider-facing segment of a solved route. Every boarding expands
/// into a Wait at the stop followed by a Ride on the bus.
#[derive(Debug, Clone)]
pub enum Leg {
    Wait {
        stop: Arc<str>,
        time: Minutes,
    },
    Ride {
        bus: Arc<str>,
        from: Arc<str>,
        to: Arc<str>,
        span_count: u32,
        time: Minutes,
    },
}

#[derive(Debug, Clone)]
pub struct Itinerary {
    pub total_time: Minutes,
    pub legs: Vec<Leg>,
}

impl Itinerary {
    /// Translates solved graph edges into Wait/Ride legs. Each edge's
    /// total_time already embeds the boarding wait exactly once, so the
    /// route total is the plain sum over edges.
    pub(crate) fn from_edges(
        edges: &[EdgeId],
        graph: &RouteGraph,
        catalogue: &Catalogue,
        wait: Minutes,
    ) -> Self {
        let mut total_time = Minutes::default();
        let mut legs = Vec::with_capacity(edges.len() * 2);

        for edge_id in edges {
            let edge = graph.edge(*edge_id);
            let from = &catalogue.stops()[edge.from];
            let to = &catalogue.stops()[edge.to];
            total_time += edge.weight.total_time;

            legs.push(Leg::Wait {
                stop: from.name.clone(),
                time: wait,
            });
            legs.push(Leg::Ride {
                bus: edge.weight.bus.clone(),
                from: from.name.clone(),
                to: to.name.clone(),
                span_count: edge.weight.span_count,
                time: edge.weight.total_time - wait,
            });
        }

        Self { total_time, legs }
    }
}
