use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
    path::Path,
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{
    catalogue::{Bus, Catalogue},
    router::{
        RideWeight, Router, RouterParts, RoutingSettings,
        dijkstra::{RouteState, SourceTable},
        graph::{Edge, Graph, RouteGraph},
    },
    shared::{geo::Coordinate, time::Minutes},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("Malformed snapshot: {0}")]
    Malformed(&'static str),
}

#[derive(Debug, Serialize, Deserialize)]
struct StopData {
    name: String,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct BusData {
    name: String,
    is_roundtrip: bool,
    stops: Vec<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeData {
    from: usize,
    to: usize,
    bus: usize,
    total_time: f64,
    span_count: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableEntryData {
    total_time: f64,
    prev_edge: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableData {
    source: usize,
    states: Vec<Option<TableEntryData>>,
}

/// The whole index as one flat artifact: catalogue arenas in order (so
/// stop ids survive byte-for-byte), settings, the built graph, and any
/// solver tables already computed at capture time.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotData {
    stops: Vec<StopData>,
    buses: Vec<BusData>,
    distances: Vec<(usize, usize, u32)>,
    settings: RoutingSettings,
    vertex_count: usize,
    edges: Vec<EdgeData>,
    tables: Vec<TableData>,
}

/// Everything a serve process needs back from the artifact.
pub struct Restored {
    pub catalogue: Catalogue,
    pub parts: RouterParts,
}

/// Writes the full index to one binary artifact.
///
/// The write is all-or-nothing at the encoding level only; atomically
/// replacing a previous artifact is the caller's business.
pub fn save(path: &Path, catalogue: &Catalogue, router: &Router) -> Result<(), Error> {
    let data = capture(catalogue, router)?;
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    bincode::serialize_into(writer, &data)?;
    info!(
        path = %path.display(),
        stops = data.stops.len(),
        buses = data.buses.len(),
        edges = data.edges.len(),
        warm_sources = data.tables.len(),
        "snapshot written"
    );
    Ok(())
}

/// Reads an artifact back, validating every cross-reference before
/// anything is rehydrated. A malformed snapshot fails the whole load.
pub fn load(path: &Path) -> Result<Restored, Error> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let data: SnapshotData = bincode::deserialize_from(reader)?;
    validate(&data)?;

    // Identity mappings come back first so every stored index resolves
    // to the same record it named at build time.
    let mut catalogue = Catalogue::new();
    for stop in &data.stops {
        catalogue.add_stop(
            &stop.name,
            Coordinate {
                latitude: stop.latitude,
                longitude: stop.longitude,
            },
        );
    }
    for bus in &data.buses {
        let index = catalogue.buses.len();
        let name: Arc<str> = bus.name.as_str().into();
        for stop_id in &bus.stops {
            catalogue
                .stop_to_buses
                .entry(catalogue.stops[*stop_id].name.clone())
                .or_default()
                .insert(name.clone());
        }
        catalogue.buses.push(Bus {
            index,
            name: name.clone(),
            stops: bus.stops.clone(),
            is_roundtrip: bus.is_roundtrip,
        });
        catalogue.bus_lookup.insert(name, index);
    }
    for (from, to, meters) in &data.distances {
        catalogue.distances.insert((*from, *to), *meters);
    }

    let mut graph: RouteGraph = Graph::new(data.vertex_count);
    for edge in &data.edges {
        graph.add_edge(Edge {
            from: edge.from,
            to: edge.to,
            weight: RideWeight {
                bus: catalogue.buses[edge.bus].name.clone(),
                total_time: Minutes::from_minutes(edge.total_time),
                span_count: edge.span_count,
            },
        });
    }

    let tables = data
        .tables
        .into_iter()
        .map(|table| {
            let states = table
                .states
                .into_iter()
                .map(|state| {
                    state.map(|entry| RouteState {
                        // Accumulated weights keep only the scalar; bus
                        // and span are already blank after summation.
                        weight: RideWeight {
                            bus: Arc::default(),
                            total_time: Minutes::from_minutes(entry.total_time),
                            span_count: 0,
                        },
                        prev_edge: entry.prev_edge,
                    })
                })
                .collect();
            (table.source, SourceTable { states })
        })
        .collect();

    info!(
        path = %path.display(),
        stops = catalogue.stops.len(),
        buses = catalogue.buses.len(),
        edges = graph.edge_count(),
        "snapshot restored"
    );

    Ok(Restored {
        catalogue,
        parts: RouterParts {
            settings: data.settings,
            graph,
            tables,
        },
    })
}

fn capture(catalogue: &Catalogue, router: &Router) -> Result<SnapshotData, Error> {
    let stops = catalogue
        .stops()
        .iter()
        .map(|stop| StopData {
            name: stop.name.to_string(),
            latitude: stop.coordinate.latitude,
            longitude: stop.coordinate.longitude,
        })
        .collect();

    let buses = catalogue
        .buses()
        .iter()
        .map(|bus| BusData {
            name: bus.name.to_string(),
            is_roundtrip: bus.is_roundtrip,
            stops: bus.stops.clone(),
        })
        .collect();

    let mut distances: Vec<(usize, usize, u32)> = catalogue.distances().collect();
    distances.sort_unstable();

    let graph = router.graph();
    let edges = graph
        .edges()
        .iter()
        .map(|edge| {
            let bus = catalogue
                .bus_lookup
                .get(&edge.weight.bus)
                .copied()
                .ok_or(Error::Malformed("graph edge references an unknown bus"))?;
            Ok(EdgeData {
                from: edge.from,
                to: edge.to,
                bus,
                total_time: edge.weight.total_time.as_minutes(),
                span_count: edge.weight.span_count,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let tables = router
        .warm_tables()
        .into_iter()
        .map(|(source, table)| TableData {
            source,
            states: table
                .states
                .iter()
                .map(|state| {
                    state.as_ref().map(|state| TableEntryData {
                        total_time: state.weight.total_time.as_minutes(),
                        prev_edge: state.prev_edge,
                    })
                })
                .collect(),
        })
        .collect();

    Ok(SnapshotData {
        stops,
        buses,
        distances,
        settings: *router.settings(),
        vertex_count: graph.vertex_count(),
        edges,
        tables,
    })
}

fn validate(data: &SnapshotData) -> Result<(), Error> {
    let stop_count = data.stops.len();
    if data.vertex_count != stop_count {
        return Err(Error::Malformed("vertex count does not match stop count"));
    }
    for bus in &data.buses {
        if bus.stops.iter().any(|stop| *stop >= stop_count) {
            return Err(Error::Malformed("bus references a stop out of range"));
        }
    }
    for (from, to, _) in &data.distances {
        if *from >= stop_count || *to >= stop_count {
            return Err(Error::Malformed("distance references a stop out of range"));
        }
    }
    for edge in &data.edges {
        if edge.from >= data.vertex_count || edge.to >= data.vertex_count {
            return Err(Error::Malformed("edge endpoint out of range"));
        }
        if edge.bus >= data.buses.len() {
            return Err(Error::Malformed("edge references a bus out of range"));
        }
    }
    for table in &data.tables {
        if table.source >= data.vertex_count {
            return Err(Error::Malformed("solver table source out of range"));
        }
        if table.states.len() != data.vertex_count {
            return Err(Error::Malformed("solver table has the wrong vertex count"));
        }
        if table
            .states
            .iter()
            .flatten()
            .any(|state| state.prev_edge >= data.edges.len())
        {
            return Err(Error::Malformed("solver table edge id out of range"));
        }
    }
    Ok(())
}
