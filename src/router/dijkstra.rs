use std::{
    cell::RefCell,
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    rc::Rc,
};

use crate::{
    router::graph::{EdgeId, Graph, VertexId},
    shared::time::Minutes,
};

/// An edge weight the solver can order and accumulate.
///
/// Only the scalar returned by [`cost`](PathWeight::cost) participates in
/// path comparison; whatever else the weight carries is leaf-edge data
/// that [`combine`](PathWeight::combine) is free to discard.
pub trait PathWeight: Clone {
    fn cost(&self) -> Minutes;

    /// Additive accumulation along a path. Associative.
    fn combine(&self, other: &Self) -> Self;
}

/// Best known way to reach one vertex from a fixed source: the
/// accumulated weight and the inbound edge on the best path.
#[derive(Debug, Clone)]
pub(crate) struct RouteState<W> {
    pub(crate) weight: W,
    pub(crate) prev_edge: EdgeId,
}

/// The full single-source result, indexed by vertex id. The source
/// itself has no entry.
#[derive(Debug, Clone)]
pub(crate) struct SourceTable<W> {
    pub(crate) states: Vec<Option<RouteState<W>>>,
}

/// Lazily-memoizing single-source shortest-path solver.
///
/// The first query from a source runs a full Dijkstra pass and caches
/// the table; later queries from the same source reuse it. The cache is
/// tied to the graph instance it was built for and must be discarded
/// with it. Interior mutability is single-threaded by design: sharing an
/// index across threads needs external synchronization.
#[derive(Debug)]
pub struct ShortestPathIndex<W> {
    graph: Rc<Graph<W>>,
    cache: RefCell<HashMap<VertexId, Rc<SourceTable<W>>>>,
}

struct HeapEntry {
    cost: Minutes,
    vertex: VertexId,
}

impl Eq for HeapEntry {}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted so BinaryHeap pops the cheapest entry first.
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W: PathWeight> ShortestPathIndex<W> {
    pub fn new(graph: Rc<Graph<W>>) -> Self {
        Self {
            graph,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// The edge ids of the best path from `from` to `to`.
    ///
    /// `from == to` short-circuits to an empty path without touching the
    /// solver. An unreached target is None.
    pub fn route(&self, from: VertexId, to: VertexId) -> Option<Vec<EdgeId>> {
        if from == to {
            return Some(Vec::new());
        }
        let table = self.source_table(from);
        table.states.get(to)?.as_ref()?;

        let mut edges = Vec::new();
        let mut current = to;
        while current != from {
            let state = table.states[current].as_ref()?;
            edges.push(state.prev_edge);
            // An honest path never repeats an edge; a table restored from
            // a bad artifact must not hang us.
            if edges.len() > self.graph.edge_count() {
                return None;
            }
            current = self.graph.edge(state.prev_edge).from;
        }
        edges.reverse();
        Some(edges)
    }

    fn source_table(&self, source: VertexId) -> Rc<SourceTable<W>> {
        if let Some(table) = self.cache.borrow().get(&source) {
            return table.clone();
        }
        let table = Rc::new(self.solve(source));
        self.cache.borrow_mut().insert(source, table.clone());
        table
    }

    /// Full Dijkstra pass from one source, O((V+E) log V).
    fn solve(&self, source: VertexId) -> SourceTable<W> {
        fn relax<W: PathWeight>(
            states: &mut [Option<RouteState<W>>],
            heap: &mut BinaryHeap<HeapEntry>,
            vertex: VertexId,
            weight: W,
            edge_id: EdgeId,
        ) {
            let improved = match &states[vertex] {
                None => true,
                Some(state) => weight.cost().total_cmp(&state.weight.cost()) == Ordering::Less,
            };
            if improved {
                heap.push(HeapEntry {
                    cost: weight.cost(),
                    vertex,
                });
                states[vertex] = Some(RouteState {
                    weight,
                    prev_edge: edge_id,
                });
            }
        }

        let mut states: Vec<Option<RouteState<W>>> = vec![None; self.graph.vertex_count()];
        let mut heap = BinaryHeap::new();

        // Seed with the source's own out-edges; the accumulated weight of
        // a one-edge path is the edge weight itself.
        for edge_id in self.graph.edges_from(source) {
            let edge = self.graph.edge(edge_id);
            relax(&mut states, &mut heap, edge.to, edge.weight.clone(), edge_id);
        }

        while let Some(entry) = heap.pop() {
            let Some(state) = &states[entry.vertex] else {
                continue;
            };
            if entry.cost.total_cmp(&state.weight.cost()) == Ordering::Greater {
                // Stale heap entry, a cheaper path got there first.
                continue;
            }
            let through = state.weight.clone();
            for edge_id in self.graph.edges_from(entry.vertex) {
                let edge = self.graph.edge(edge_id);
                relax(
                    &mut states,
                    &mut heap,
                    edge.to,
                    through.combine(&edge.weight),
                    edge_id,
                );
            }
        }

        SourceTable { states }
    }

    /// Already-solved tables, sorted by source id. Used for snapshot
    /// pre-warming.
    pub(crate) fn warm_tables(&self) -> Vec<(VertexId, Rc<SourceTable<W>>)> {
        let mut tables: Vec<_> = self
            .cache
            .borrow()
            .iter()
            .map(|(source, table)| (*source, table.clone()))
            .collect();
        tables.sort_by_key(|(source, _)| *source);
        tables
    }

    /// Adopts a table restored from a snapshot.
    pub(crate) fn insert_table(&self, source: VertexId, table: SourceTable<W>) {
        self.cache.borrow_mut().insert(source, Rc::new(table));
    }
}
