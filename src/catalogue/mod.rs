use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Arc,
};

mod models;
pub use models::*;

use crate::shared::geo::{Coordinate, Distance};

/// The catalogue owns every stop, bus line and directed road distance of
/// the network.
///
/// Records live in append-only arenas; name lookups go through maps onto
/// arena indices. Re-adding a stop name repoints the lookup at the new
/// record and leaves the earlier slot allocated but unreachable.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    pub(crate) stops: Vec<Stop>,
    pub(crate) buses: Vec<Bus>,
    pub(crate) stop_lookup: HashMap<Arc<str>, StopId>,
    pub(crate) bus_lookup: HashMap<Arc<str>, BusId>,
    pub(crate) stop_to_buses: HashMap<Arc<str>, BTreeSet<Arc<str>>>,
    pub(crate) distances: HashMap<(StopId, StopId), u32>,
}

impl Catalogue {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a stop under its name and returns its arena index.
    pub fn add_stop(&mut self, name: &str, coordinate: Coordinate) -> StopId {
        let index = self.stops.len();
        let name: Arc<str> = name.into();
        self.stops.push(Stop {
            index,
            name: name.clone(),
            coordinate,
        });
        self.stop_lookup.insert(name, index);
        index
    }

    /// Get a stop with the given name.
    /// If no stop is found with the given name None is returned.
    pub fn stop(&self, name: &str) -> Option<&Stop> {
        let index = self.stop_lookup.get(name)?;
        Some(&self.stops[*index])
    }

    /// Get a bus with the given name.
    /// If no bus is found with the given name None is returned.
    pub fn bus(&self, name: &str) -> Option<&Bus> {
        let index = self.bus_lookup.get(name)?;
        Some(&self.buses[*index])
    }

    /// Every stop record in arena order, unreachable duplicates included.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// Every explicitly supplied directed distance entry, in no
    /// particular order.
    pub fn distances(&self) -> impl Iterator<Item = (StopId, StopId, u32)> + '_ {
        self.distances
            .iter()
            .map(|((from, to), meters)| (*from, *to, *meters))
    }

    /// The sorted names of all buses serving a stop.
    /// None when the stop is unknown or no bus visits it.
    pub fn buses_at(&self, stop: &str) -> Option<&BTreeSet<Arc<str>>> {
        self.stop_to_buses.get(stop)
    }

    /// Sets the directed road distance for one ordered stop pair,
    /// overwriting any earlier entry for the same pair. Unknown names are
    /// ignored.
    pub fn set_distance(&mut self, from: &str, to: &str, meters: u32) {
        let (Some(from), Some(to)) = (self.stop_lookup.get(from), self.stop_lookup.get(to))
        else {
            return;
        };
        self.distances.insert((*from, *to), meters);
    }

    /// Sets the directed road distances from one stop to a list of
    /// (neighbor, meters) pairs.
    pub fn set_distances<'a, I>(&mut self, from: &str, pairs: I)
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        for (to, meters) in pairs {
            self.set_distance(from, to, meters);
        }
    }

    /// Directed road distance between two stop records.
    ///
    /// Falls back to the reverse entry when the forward one is absent,
    /// and to zero when neither exists. The asymmetry is intentional:
    /// road distance is supplied per direction and is not geographic.
    pub fn distance_between(&self, from: StopId, to: StopId) -> Distance {
        if let Some(meters) = self.distances.get(&(from, to)) {
            (*meters).into()
        } else if let Some(meters) = self.distances.get(&(to, from)) {
            (*meters).into()
        } else {
            Distance::default()
        }
    }

    /// Adds a bus line, resolving its stop names to arena indices.
    /// Stops are expected to be registered first; unresolvable names are
    /// skipped.
    pub fn add_bus<'a, I>(&mut self, name: &str, is_roundtrip: bool, stops: I) -> BusId
    where
        I: IntoIterator<Item = &'a str>,
    {
        let index = self.buses.len();
        let name: Arc<str> = name.into();
        let stops: Vec<StopId> = stops
            .into_iter()
            .filter_map(|stop_name| self.stop_lookup.get(stop_name).copied())
            .collect();
        for stop_id in stops.iter() {
            self.stop_to_buses
                .entry(self.stops[*stop_id].name.clone())
                .or_default()
                .insert(name.clone());
        }
        self.buses.push(Bus {
            index,
            name: name.clone(),
            stops,
            is_roundtrip,
        });
        self.bus_lookup.insert(name, index);
        index
    }

    /// Computes the derived statistics for a bus.
    /// If no bus is found with the given name None is returned.
    pub fn bus_stats(&self, name: &str) -> Option<BusStats> {
        let bus = self.bus(name)?;
        let mut road_length = Distance::default();
        let mut great_circle_length = Distance::default();

        for pair in bus.stops.windows(2) {
            road_length += self.distance_between(pair[0], pair[1]);
            great_circle_length += self.stops[pair[0]]
                .coordinate
                .great_circle_distance(&self.stops[pair[1]].coordinate);
        }

        let stop_count = match (bus.is_roundtrip, bus.stops.len()) {
            (_, 0) => 0,
            (true, len) => len,
            (false, len) => len * 2 - 1,
        };

        if !bus.is_roundtrip {
            // The return leg is accumulated on its own: forward and
            // backward road distances may differ per direction.
            let forward = great_circle_length;
            great_circle_length += forward;
            for pair in bus.stops.windows(2).rev() {
                road_length += self.distance_between(pair[1], pair[0]);
            }
        }

        let unique_stop_count = bus.stops.iter().collect::<HashSet<_>>().len();
        let curvature = if great_circle_length.as_meters() == 0.0 {
            f64::NAN
        } else {
            road_length.as_meters() / great_circle_length.as_meters()
        };

        Some(BusStats {
            name: bus.name.clone(),
            stop_count,
            unique_stop_count,
            road_length,
            great_circle_length,
            curvature,
        })
    }
}
