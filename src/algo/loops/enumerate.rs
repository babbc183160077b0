//! Candidate loop search and ranking.
//!
//! When the natural loop through a seed edge is open, closed loops can still be
//! formed by joining it with other continuation segments that meet at poles or
//! border corners. Segments are joined best-first by total length until the
//! chain returns to the natural loop's start, so shorter closures are found
//! first.

use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashSet};

use super::{natural_loop, walk, Loop};
use crate::error::Result;
use crate::mesh::{EdgeId, MeshIndex, TopologyModel, VertexId};

/// Maximum number of candidates kept for one seed.
pub const MAX_CANDIDATES: usize = 10;

/// Position in the selection cycle of a [`CandidateSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Candidates were computed but none has been shown.
    Seeded,
    /// The candidate at this index is shown.
    Candidate(usize),
    /// The selection from before the first candidate is shown.
    Original,
}

/// Ranked candidate loops through one seed edge.
///
/// Never empty: the natural loop (possibly degenerate) is always a candidate.
#[derive(Debug, Clone)]
pub struct CandidateSet<I: MeshIndex = u32> {
    seed: EdgeId<I>,
    loops: Vec<Loop<I>>,
}

impl<I: MeshIndex> CandidateSet<I> {
    /// The seed edge every candidate contains.
    #[inline]
    pub fn seed(&self) -> EdgeId<I> {
        self.seed
    }

    /// Candidates, best first.
    #[inline]
    pub fn loops(&self) -> &[Loop<I>] {
        &self.loops
    }

    /// Number of candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns true if there are no candidates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }

    /// The best candidate.
    #[inline]
    pub fn first(&self) -> &Loop<I> {
        &self.loops[0]
    }

    /// The candidate shown at `cursor`, if any.
    pub fn at(&self, cursor: Cursor) -> Option<&Loop<I>> {
        match cursor {
            Cursor::Candidate(i) => self.loops.get(i),
            Cursor::Seeded | Cursor::Original => None,
        }
    }

    /// Advance the cursor one step.
    ///
    /// The cycle is `Candidate(0) .. Candidate(n - 1)`, then `Original`, then
    /// back to `Candidate(0)`. Returns the new cursor and the candidate it
    /// shows (`None` at `Original`).
    pub fn cycle(&self, cursor: Cursor) -> (Cursor, Option<&Loop<I>>) {
        let next = match cursor {
            Cursor::Seeded | Cursor::Original => Cursor::Candidate(0),
            Cursor::Candidate(i) if i + 1 < self.loops.len() => Cursor::Candidate(i + 1),
            Cursor::Candidate(_) => Cursor::Original,
        };
        (next, self.at(next))
    }
}

/// Partial chain of segments in the best-first search.
struct SearchNode<I: MeshIndex> {
    length: usize,
    end: VertexId<I>,
    order: usize,
    segments: Vec<Loop<I>>,
}

impl<I: MeshIndex> PartialEq for SearchNode<I> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<I: MeshIndex> Eq for SearchNode<I> {}

impl<I: MeshIndex> PartialOrd for SearchNode<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I: MeshIndex> Ord for SearchNode<I> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap
        other
            .length
            .cmp(&self.length)
            .then_with(|| other.end.cmp(&self.end))
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Compute the ranked candidate loops through `seed`.
///
/// The natural loop is always the first discovered candidate. If it is open,
/// closed loops through poles are searched for, up to [`MAX_CANDIDATES`] in
/// total, duplicates (same edge set) removed. Candidates are then ordered by
/// [`rank_candidates`].
///
/// # Errors
///
/// Returns [`MeshError::InvalidElement`](crate::MeshError::InvalidElement) if
/// `seed` is not an edge of `model`.
pub fn enumerate<I: MeshIndex>(model: &TopologyModel<I>, seed: EdgeId<I>) -> Result<CandidateSet<I>> {
    model.check_edge(seed)?;

    let natural = natural_loop(model, seed);
    let mut found = vec![natural.clone()];

    if !natural.is_closed() {
        search_closures(model, natural, &mut found);
    }

    rank_candidates(&mut found);

    log::debug!(
        "{} candidate loop(s) through {:?}, best crosses {} pole(s)",
        found.len(),
        seed,
        found[0].pole_crossings()
    );

    Ok(CandidateSet { seed, loops: found })
}

fn search_closures<I: MeshIndex>(model: &TopologyModel<I>, natural: Loop<I>, found: &mut Vec<Loop<I>>) {
    let start = natural.first_vertex();
    let stop: BTreeSet<VertexId<I>> = [start].into_iter().collect();

    let mut heap = BinaryHeap::new();
    let mut expanded: HashSet<VertexId<I>> = HashSet::new();
    let mut order = 0;

    heap.push(SearchNode {
        length: natural.len(),
        end: natural.last_vertex(),
        order,
        segments: vec![natural],
    });

    while let Some(node) = heap.pop() {
        if found.len() >= MAX_CANDIDATES {
            break;
        }

        if node.end == start {
            let closed = Loop::join(model, &node.segments);
            if !found.contains(&closed) {
                log::trace!("closed candidate of {} edges", closed.len());
                found.push(closed);
            }
            continue;
        }

        if !expanded.insert(node.end) {
            continue;
        }

        for &e in model.vertex_edges(node.end) {
            if node.segments.iter().any(|s| s.contains_edge(e)) {
                continue;
            }
            let segment = walk(model, e, node.end, &stop);
            order += 1;

            let mut segments = node.segments.clone();
            let end = segment.last_vertex();
            let length = node.length + segment.len();
            segments.push(segment);

            heap.push(SearchNode {
                length,
                end,
                order,
                segments,
            });
        }
    }
}

/// Order candidates by pole crossings, then by length, keeping discovery order
/// among equals.
pub fn rank_candidates<I: MeshIndex>(candidates: &mut [Loop<I>]) {
    candidates.sort_by_key(|l| (l.pole_crossings(), l.len()));
}
