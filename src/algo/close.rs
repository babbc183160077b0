//! Closing open edge chains into loops.
//!
//! The closing path is found with a Dijkstra search whose states are directed
//! edges, so the cost of turning from one edge onto the next is known when an
//! edge is relaxed. Costs compare lexicographically: fewest edges first, then
//! the smallest accumulated turn cost, then discovery order.
//!
//! # Example
//!
//! ```
//! use loopsmith::prelude::*;
//! use loopsmith::algo::close::{close_loop, CloseOptions};
//!
//! let model: TopologyModel = TopologyModel::build(&primitives::quad_grid(3, 3)).unwrap();
//!
//! // Three sides of the center quad
//! let chain: Vec<EdgeId> = [(5, 9), (9, 10), (10, 6)]
//!     .iter()
//!     .map(|&(a, b)| model.edge_between(VertexId::new(a), VertexId::new(b)).unwrap())
//!     .collect();
//! let selection = Selection::from_edges(&model, SelectMode::Edge, chain);
//!
//! let outcome = close_loop(&model, &selection, &CloseOptions::default()).unwrap();
//! assert_eq!(outcome.selection.edges().len(), 4);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashSet};

use super::classify::SelectionGraph;
use super::loops::Loop;
use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, MeshIndex, TopologyModel, VertexId};
use crate::selection::{Outcome, Selection};

/// How much a path is penalized for not running straight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TurnCost {
    /// Sum of the angles, in radians, between consecutive edge directions,
    /// including the turns where the path meets the chain.
    #[default]
    Angular,
    /// Number of turns onto an edge that shares a face with the previous edge.
    Topological,
    /// Edge count only.
    None,
}

impl TurnCost {
    /// Cost of arriving at `at` along `prev` and leaving along `next`.
    pub fn turn<I: MeshIndex>(
        self,
        model: &TopologyModel<I>,
        prev: EdgeId<I>,
        at: VertexId<I>,
        next: EdgeId<I>,
    ) -> f64 {
        match self {
            TurnCost::Angular => {
                let incoming = -model.edge_direction(prev, at);
                let outgoing = model.edge_direction(next, at);
                incoming.dot(&outgoing).clamp(-1.0, 1.0).acos()
            }
            TurnCost::Topological => {
                if model.shares_face(prev, next) {
                    1.0
                } else {
                    0.0
                }
            }
            TurnCost::None => 0.0,
        }
    }
}

/// Options for closing loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CloseOptions {
    /// Straightness term used to break edge-count ties.
    pub turn_cost: TurnCost,
}

impl CloseOptions {
    /// Set the turn cost.
    pub fn with_turn_cost(mut self, turn_cost: TurnCost) -> Self {
        self.turn_cost = turn_cost;
        self
    }
}

/// Entry in the search's priority queue.
#[derive(Debug, Clone)]
struct SearchEntry {
    /// Directed edge state.
    state: usize,
    /// Edges on the path so far.
    edges: usize,
    /// Accumulated turn cost.
    turn: f64,
    /// Push order, the final tie-break.
    order: usize,
    /// The path has reached the target and includes the closing turn.
    arrived: bool,
}

impl SearchEntry {
    fn key(&self) -> (usize, f64, usize) {
        (self.edges, self.turn, self.order)
    }
}

// Implement ordering for min-heap (BinaryHeap is a max-heap by default)
impl PartialEq for SearchEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchEntry {}

impl PartialOrd for SearchEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SearchEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a_edges, a_turn, a_order) = self.key();
        let (b_edges, b_turn, b_order) = other.key();
        b_edges
            .cmp(&a_edges)
            .then_with(|| b_turn.total_cmp(&a_turn))
            .then_with(|| b_order.cmp(&a_order))
    }
}

/// Dijkstra state over directed edges.
struct Search<'a, I: MeshIndex> {
    model: &'a TopologyModel<I>,
    target: VertexId<I>,
    first_edge: EdgeId<I>,
    turn_cost: TurnCost,
    best: Vec<Option<(usize, f64)>>,
    settled: Vec<bool>,
    predecessors: Vec<Option<usize>>,
    heap: BinaryHeap<SearchEntry>,
    order: usize,
}

impl<'a, I: MeshIndex> Search<'a, I> {
    fn new(model: &'a TopologyModel<I>, target: VertexId<I>, first_edge: EdgeId<I>, turn_cost: TurnCost) -> Self {
        let num_states = model.num_edges() * 2;
        Self {
            model,
            target,
            first_edge,
            turn_cost,
            best: vec![None; num_states],
            settled: vec![false; num_states],
            predecessors: vec![None; num_states],
            heap: BinaryHeap::new(),
            order: 0,
        }
    }

    /// Offer a path that reaches `head` along `next`.
    fn relax(&mut self, from: Option<usize>, next: EdgeId<I>, head: VertexId<I>, edges: usize, turn: f64) {
        let state = state_of(self.model, next, head);
        let improves = match self.best[state] {
            None => true,
            Some(known) => (edges, turn) < known,
        };
        if !improves {
            return;
        }
        self.best[state] = Some((edges, turn));
        self.predecessors[state] = from;
        self.push(state, edges, turn, false);

        if head == self.target {
            // Include the turn back into the chain
            let closing = self.turn_cost.turn(self.model, next, head, self.first_edge);
            self.push(state, edges, turn + closing, true);
        }
    }

    fn push(&mut self, state: usize, edges: usize, turn: f64, arrived: bool) {
        self.order += 1;
        self.heap.push(SearchEntry {
            state,
            edges,
            turn,
            order: self.order,
            arrived,
        });
    }
}

/// Encode "traverse `e` towards `head`" as a state index.
fn state_of<I: MeshIndex>(model: &TopologyModel<I>, e: EdgeId<I>, head: VertexId<I>) -> usize {
    let forward = model.edge_vertices(e)[1] == head;
    e.index() * 2 + usize::from(forward)
}

fn edge_of<I: MeshIndex>(state: usize) -> EdgeId<I> {
    EdgeId::new(state / 2)
}

fn head_of<I: MeshIndex>(model: &TopologyModel<I>, state: usize) -> VertexId<I> {
    model.edge_vertices(edge_of(state))[state % 2]
}

/// Find the edges that close an open `chain`.
///
/// Searches from the chain's last vertex to its first without using chain
/// edges, `blocked` edges, or the chain's interior vertices. Returns the path
/// edges in order from the last vertex to the first; a closed chain needs no
/// edges and yields an empty path.
///
/// # Errors
///
/// Returns [`MeshError::NoPath`] if the ends are not connected.
pub fn close_chain<I: MeshIndex>(
    model: &TopologyModel<I>,
    chain: &Loop<I>,
    blocked: &HashSet<EdgeId<I>>,
    options: &CloseOptions,
) -> Result<Vec<EdgeId<I>>> {
    if chain.is_empty() || chain.is_closed() {
        return Ok(Vec::new());
    }

    let source = chain.last_vertex();
    let target = chain.first_vertex();
    let first_edge = chain.edges()[0];
    let last_edge = chain.edges()[chain.len() - 1];
    let interior: BTreeSet<VertexId<I>> = chain.vertices()[1..chain.vertices().len() - 1]
        .iter()
        .copied()
        .filter(|&v| v != source && v != target)
        .collect();

    let excluded = |e: EdgeId<I>| chain.contains_edge(e) || blocked.contains(&e);
    let enterable = |v: VertexId<I>| v == target || (v != source && !interior.contains(&v));
    let mut search = Search::new(model, target, first_edge, options.turn_cost);

    // Leave the source, turning out of the chain's last edge
    for &e in model.vertex_edges(source) {
        if excluded(e) {
            continue;
        }
        let far = model.other_vertex(e, source);
        if !enterable(far) {
            continue;
        }
        let turn = search.turn_cost.turn(model, last_edge, source, e);
        search.relax(None, e, far, 1, turn);
    }

    while let Some(entry) = search.heap.pop() {
        if entry.arrived {
            let path = reconstruct(&search.predecessors, entry.state);
            log::debug!(
                "closed chain of {} edges with {} edge(s), turn cost {:.3}",
                chain.len(),
                path.len(),
                entry.turn
            );
            return Ok(path);
        }

        if search.settled[entry.state] {
            continue;
        }
        search.settled[entry.state] = true;

        let current = edge_of::<I>(entry.state);
        let head = head_of(model, entry.state);
        if head == target {
            continue;
        }
        log::trace!("settled {:?} at {:?}, {} edges", current, head, entry.edges);

        for &e in model.vertex_edges(head) {
            if e == current || excluded(e) {
                continue;
            }
            let far = model.other_vertex(e, head);
            if !enterable(far) || search.settled[state_of(model, e, far)] {
                continue;
            }
            let turn = entry.turn + search.turn_cost.turn(model, current, head, e);
            search.relax(Some(entry.state), e, far, entry.edges + 1, turn);
        }
    }

    Err(MeshError::NoPath {
        from: source.index(),
        to: target.index(),
    })
}

fn reconstruct<I: MeshIndex>(predecessors: &[Option<usize>], last: usize) -> Vec<EdgeId<I>> {
    let mut path = vec![edge_of(last)];
    let mut state = last;
    while let Some(prev) = predecessors[state] {
        path.push(edge_of(prev));
        state = prev;
    }
    path.reverse();
    path
}

/// Close every open island of the selected edges.
///
/// Each island with exactly two free ends is closed with [`close_chain`];
/// later closures avoid the edges of earlier ones and of every other selected
/// edge. Selections with no free ends or with branches are refused. If any
/// island cannot be closed the selection is returned unchanged with a warning.
///
/// # Errors
///
/// Returns [`MeshError::InvalidElement`] if the selection references elements
/// outside `model`.
pub fn close_loop<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    options: &CloseOptions,
) -> Result<Outcome<I>> {
    selection.validate(model)?;
    let selection = selection.flushed(model);
    let graph = SelectionGraph::new(model, &selection);

    if graph.has_no_edges() {
        return Ok(Outcome::declined(selection, "No edges selected"));
    }
    if graph.endpoints().is_empty() || !graph.branches().is_empty() {
        return Ok(Outcome::declined(selection, "Cannot close loop: not an open loop"));
    }

    let mut blocked: HashSet<EdgeId<I>> = selection.edges().iter().copied().collect();
    let mut added: Vec<EdgeId<I>> = Vec::new();
    let mut closed = 0;

    for (i, island) in graph.islands().iter().enumerate() {
        if graph.island_endpoints(model, i).len() != 2 {
            continue;
        }
        let Some(chain) = Loop::from_unordered(model, island) else {
            continue;
        };

        match close_chain(model, &chain, &blocked, options) {
            Ok(path) => {
                blocked.extend(path.iter().copied());
                added.extend(path);
                closed += 1;
            }
            Err(MeshError::NoPath { from, to }) => {
                log::debug!("no closing path from vertex {} to vertex {}", from, to);
                return Ok(Outcome::declined(selection, "Could not find clean closures"));
            }
            Err(e) => return Err(e),
        }
    }

    let message = if closed == 1 && added.len() == 1 {
        "Closed loop trivially with a single edge".to_string()
    } else if closed == 1 {
        format!("Closed loop with {} edges", added.len())
    } else {
        format!("Closed {} loops with {} edges", closed, added.len())
    };

    Ok(Outcome::finished(selection.with_edges(model, &added), message))
}
