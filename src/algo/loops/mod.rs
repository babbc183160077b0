//! Edge loops: walking, enumerating, ranking and selecting them.
//!
//! A loop is followed from edge to edge with
//! [`TopologyModel::continuation`], so it passes straight through regular
//! vertices and ends at poles, at dead ends, or when it returns to where it
//! started.
//!
//! - [`natural_loop`] gives the loop a seed edge belongs to by continuation
//!   alone.
//! - [`enumerate`] also searches for closed loops that route through poles and
//!   ranks every candidate by how many poles it crosses.
//! - [`select_loop`] is the interactive operation: repeated invocations on the
//!   same seed cycle through the candidates and back to the original selection.
//!
//! # Example
//!
//! ```
//! use loopsmith::prelude::*;
//! use loopsmith::algo::loops::{enumerate, natural_loop};
//!
//! let model: TopologyModel = TopologyModel::build(&primitives::quad_torus(8, 4)).unwrap();
//! let seed = EdgeId::new(0);
//!
//! let natural = natural_loop(&model, seed);
//! assert!(natural.is_closed());
//!
//! let candidates = enumerate(&model, seed).unwrap();
//! assert_eq!(candidates.len(), 1);
//! ```

mod enumerate;
mod select;

use std::collections::{BTreeSet, HashSet};

use crate::mesh::{EdgeId, FaceId, MeshIndex, TopologyModel, VertexId};

pub use enumerate::{enumerate, rank_candidates, CandidateSet, Cursor, MAX_CANDIDATES};
pub use select::{select_loop, LoopMode, LoopSelectOptions, LoopSession};

/// An ordered chain of edges, open or closed.
///
/// `vertices` has one more entry than `edges`; edge `i` joins vertex `i` and
/// vertex `i + 1`. A closed loop repeats its first vertex at the end.
///
/// Two loops compare equal when they contain the same edges, regardless of
/// direction or starting point.
#[derive(Debug, Clone)]
pub struct Loop<I: MeshIndex = u32> {
    vertices: Vec<VertexId<I>>,
    edges: Vec<EdgeId<I>>,
    edge_set: BTreeSet<EdgeId<I>>,
    pole_crossings: usize,
}

impl<I: MeshIndex> Loop<I> {
    /// Create a loop from its ordered vertices and edges, counting the poles
    /// it crosses.
    pub fn new(model: &TopologyModel<I>, vertices: Vec<VertexId<I>>, edges: Vec<EdgeId<I>>) -> Self {
        debug_assert_eq!(vertices.len(), edges.len() + 1);
        let distinct: BTreeSet<VertexId<I>> = vertices.iter().copied().collect();
        let pole_crossings = distinct.iter().filter(|&&v| model.is_pole(v)).count();
        Self {
            edge_set: edges.iter().copied().collect(),
            vertices,
            edges,
            pole_crossings,
        }
    }

    /// Order a set of connected edges in which no vertex has more than two of
    /// them into a path or cycle.
    ///
    /// Returns `None` if the edges branch, are disconnected, or are empty.
    pub fn from_unordered(model: &TopologyModel<I>, edges: &[EdgeId<I>]) -> Option<Self> {
        let set: BTreeSet<EdgeId<I>> = edges.iter().copied().collect();
        let first = *set.iter().next()?;

        let degree = |v: VertexId<I>| {
            model
                .vertex_edges(v)
                .iter()
                .filter(|e| set.contains(e))
                .count()
        };

        // Start from the lowest free end, or anywhere on a cycle
        let start = set
            .iter()
            .flat_map(|&e| model.edge_vertices(e))
            .filter(|&v| degree(v) == 1)
            .min()
            .unwrap_or(model.edge_vertices(first)[0]);

        let mut vertices = vec![start];
        let mut ordered = Vec::with_capacity(set.len());
        let mut used: HashSet<EdgeId<I>> = HashSet::with_capacity(set.len());
        let mut head = start;

        loop {
            if degree(head) > 2 {
                return None;
            }
            let next = model
                .vertex_edges(head)
                .iter()
                .copied()
                .find(|e| set.contains(e) && !used.contains(e));
            let Some(e) = next else { break };
            used.insert(e);
            ordered.push(e);
            head = model.other_vertex(e, head);
            vertices.push(head);
        }

        if ordered.len() != set.len() {
            return None;
        }
        Some(Self::new(model, vertices, ordered))
    }

    /// Join consecutive segments that meet end to start.
    pub(crate) fn join(model: &TopologyModel<I>, segments: &[Loop<I>]) -> Self {
        let mut vertices = Vec::new();
        let mut edges = Vec::new();
        for seg in segments {
            if vertices.is_empty() {
                vertices.extend_from_slice(&seg.vertices);
            } else {
                debug_assert_eq!(vertices.last(), seg.vertices.first());
                vertices.extend_from_slice(&seg.vertices[1..]);
            }
            edges.extend_from_slice(&seg.edges);
        }
        Self::new(model, vertices, edges)
    }

    /// Ordered vertices.
    #[inline]
    pub fn vertices(&self) -> &[VertexId<I>] {
        &self.vertices
    }

    /// Ordered edges.
    #[inline]
    pub fn edges(&self) -> &[EdgeId<I>] {
        &self.edges
    }

    /// The edges as a set.
    #[inline]
    pub fn edge_set(&self) -> &BTreeSet<EdgeId<I>> {
        &self.edge_set
    }

    /// Number of distinct vertices on the loop that are poles.
    #[inline]
    pub fn pole_crossings(&self) -> usize {
        self.pole_crossings
    }

    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the loop has no edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns true if the loop ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.edges.len() > 1 && self.vertices.first() == self.vertices.last()
    }

    /// Returns true for a lone open edge, the loop of an edge nothing continues.
    pub fn is_degenerate(&self) -> bool {
        self.edges.len() == 1
    }

    /// Returns true if the loop contains the edge.
    #[inline]
    pub fn contains_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_set.contains(&e)
    }

    /// First vertex.
    #[inline]
    pub fn first_vertex(&self) -> VertexId<I> {
        self.vertices[0]
    }

    /// Last vertex.
    #[inline]
    pub fn last_vertex(&self) -> VertexId<I> {
        self.vertices[self.vertices.len() - 1]
    }

    /// The same loop traversed the other way.
    pub fn reversed(&self) -> Self {
        let mut vertices = self.vertices.clone();
        let mut edges = self.edges.clone();
        vertices.reverse();
        edges.reverse();
        Self {
            vertices,
            edges,
            edge_set: self.edge_set.clone(),
            pole_crossings: self.pole_crossings,
        }
    }
}

impl<I: MeshIndex> PartialEq for Loop<I> {
    fn eq(&self, other: &Self) -> bool {
        self.edge_set == other.edge_set
    }
}

impl<I: MeshIndex> Eq for Loop<I> {}

/// Follow continuations from `edge`, leaving `start`, until a pole, a dead
/// end, a vertex in `stop`, or a return to `edge`.
///
/// Only a closed result is a complete loop; an open result may extend further
/// behind `start`.
pub fn walk<I: MeshIndex>(
    model: &TopologyModel<I>,
    edge: EdgeId<I>,
    start: VertexId<I>,
    stop: &BTreeSet<VertexId<I>>,
) -> Loop<I> {
    let mut last = edge;
    let mut head = model.other_vertex(edge, start);
    let mut vertices = vec![start, head];
    let mut edges = vec![edge];
    let mut visited: HashSet<EdgeId<I>> = HashSet::new();
    visited.insert(edge);

    while !stop.contains(&head) {
        let Some(next) = model.continuation(last, head) else {
            break;
        };
        if next == edge {
            break;
        }
        if !visited.insert(next) {
            // Continuation that is not symmetric on odd geometry; treat as a pole
            break;
        }
        last = next;
        head = model.other_vertex(next, head);
        vertices.push(head);
        edges.push(next);
    }

    Loop::new(model, vertices, edges)
}

/// The loop through `seed` found by continuation alone, extended in both
/// directions.
///
/// An open result starts at one stopping vertex and ends at the other. A seed
/// that nothing continues yields the degenerate single-edge loop.
pub fn natural_loop<I: MeshIndex>(model: &TopologyModel<I>, seed: EdgeId<I>) -> Loop<I> {
    let none = BTreeSet::new();
    let [a, _] = model.edge_vertices(seed);

    let partial = walk(model, seed, a, &none);
    if partial.is_closed() {
        return partial;
    }

    // Walk back over the partial loop and past its start
    let tail_edge = partial.edges()[partial.len() - 1];
    let result = walk(model, tail_edge, partial.last_vertex(), &none);

    if result.is_degenerate() {
        log::debug!("no loop continues through {:?}; using the edge alone", seed);
    }

    if result.edges()[result.len() - 1] == seed && result.len() > 1 {
        result.reversed()
    } else {
        result
    }
}

/// The ring of quads crossed by walking from `seed` to the opposite edge of
/// each face, in both directions.
///
/// Stops at non-quad faces, open or non-manifold edges, and when the ring
/// closes. Faces are listed in walking order.
pub fn face_loop<I: MeshIndex>(model: &TopologyModel<I>, seed: EdgeId<I>) -> Vec<FaceId<I>> {
    let mut faces: Vec<FaceId<I>> = Vec::new();
    let mut seen: HashSet<FaceId<I>> = HashSet::new();

    let sides = model.edge_faces(seed);
    if sides.len() > 2 {
        return faces;
    }

    // The first side is walked outward and reversed so the result reads in one direction
    for (side, &first) in sides.iter().enumerate() {
        let mut run = Vec::new();
        let mut face = first;
        let mut entry = seed;

        while seen.insert(face) {
            run.push(face);
            let Some(exit) = model.opposite_edge_in_face(face, entry) else {
                break;
            };
            if !model.is_manifold_edge(exit) {
                break;
            }
            let next = model.edge_faces(exit).iter().copied().find(|&f| f != face);
            match next {
                Some(f) => {
                    face = f;
                    entry = exit;
                }
                None => break,
            }
        }

        if side == 0 {
            run.reverse();
        }
        faces.extend(run);
    }

    faces
}
