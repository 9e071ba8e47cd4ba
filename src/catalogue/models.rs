use std::sync::Arc;

use crate::shared::geo::{Coordinate, Distance};

/// Arena index of a stop record. Doubles as the vertex id of the stop in
/// the route graph, so it has to stay stable across snapshots.
pub type StopId = usize;

/// Arena index of a bus record.
pub type BusId = usize;

#[derive(Debug, Default, Clone)]
pub struct Stop {
    pub index: StopId,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
}

/// A named line over an ordered stop sequence.
///
/// A roundtrip bus is a loop; a non-roundtrip bus runs the sequence
/// forward and then back over the same stops.
#[derive(Debug, Default, Clone)]
pub struct Bus {
    pub index: BusId,
    pub name: Arc<str>,
    pub stops: Vec<StopId>,
    pub is_roundtrip: bool,
}

/// Derived per-bus statistics, computed at query time.
#[derive(Debug, Clone)]
pub struct BusStats {
    pub name: Arc<str>,
    pub stop_count: usize,
    pub unique_stop_count: usize,
    pub road_length: Distance,
    pub great_circle_length: Distance,
    /// Road length over great-circle length. NaN for degenerate lines
    /// whose great-circle length is zero.
    pub curvature: f64,
}
