//! Interactive loop selection with candidate cycling.
//!
//! The host owns a [`LoopSession`] and passes it to every [`select_loop`]
//! call. Invoking the operation again on the same seed, with the selection it
//! produced last time, steps to the next candidate; after the last candidate
//! the selection from before the first invocation comes back, then the cycle
//! repeats. Anything else (another seed, an edited mesh, a selection changed
//! by the user) starts a new cycle.

use super::enumerate::{enumerate, CandidateSet, Cursor};
use super::{face_loop, natural_loop, Loop};
use crate::error::Result;
use crate::mesh::{EdgeId, MeshIndex, TopologyModel};
use crate::selection::{Outcome, SelectMode, Selection};

/// Which loop a click selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopMode {
    /// Ranked candidates with cycling.
    #[default]
    Smart,
    /// Only the natural loop, toggled by repeated extend clicks.
    BlenderDefault,
}

/// Options for [`select_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopSelectOptions {
    /// Add to the existing selection instead of replacing it.
    pub extend: bool,
    /// Which loop to select.
    pub mode: LoopMode,
}

impl LoopSelectOptions {
    /// Set whether to extend the selection.
    pub fn with_extend(mut self, extend: bool) -> Self {
        self.extend = extend;
        self
    }

    /// Set the loop mode.
    pub fn with_mode(mut self, mode: LoopMode) -> Self {
        self.mode = mode;
        self
    }
}

#[derive(Debug, Clone)]
struct Cycle<I: MeshIndex> {
    signature: u64,
    extend: bool,
    candidates: CandidateSet<I>,
    cursor: Cursor,
    original: Selection<I>,
    produced: Selection<I>,
}

/// Cycling state carried between [`select_loop`] invocations.
///
/// Holds no references into the mesh; a session built against one mesh is
/// simply reset when used with another.
#[derive(Debug, Clone, Default)]
pub struct LoopSession<I: MeshIndex = u32> {
    cycle: Option<Cycle<I>>,
}

impl<I: MeshIndex> LoopSession<I> {
    /// A session with no cycle in progress.
    pub fn new() -> Self {
        Self { cycle: None }
    }

    /// Forget any cycle in progress.
    pub fn reset(&mut self) {
        self.cycle = None;
    }

    /// Returns true if a cycle is in progress.
    pub fn is_active(&self) -> bool {
        self.cycle.is_some()
    }

    /// Where the cycle in progress stands.
    pub fn cursor(&self) -> Option<Cursor> {
        self.cycle.as_ref().map(|c| c.cursor)
    }

    /// Candidates of the cycle in progress.
    pub fn candidates(&self) -> Option<&CandidateSet<I>> {
        self.cycle.as_ref().map(|c| &c.candidates)
    }

    fn continues(&self, model: &TopologyModel<I>, selection: &Selection<I>, seed: EdgeId<I>, extend: bool) -> bool {
        self.cycle.as_ref().is_some_and(|c| {
            c.signature == model.signature()
                && c.candidates.seed() == seed
                && c.extend == extend
                && c.produced == *selection
        })
    }
}

/// Select a loop through `seed`.
///
/// In [`LoopMode::Smart`] with vertex or edge selection, successive calls on
/// the same seed cycle through the ranked candidates and then restore the
/// original selection. With `extend`, candidates are added to the selection
/// held before the cycle started, and clicking a loop that is already fully
/// selected deselects it instead.
///
/// In [`LoopMode::BlenderDefault`], or in face mode, the natural loop (or the
/// face loop) is selected without cycling.
///
/// # Errors
///
/// Returns [`MeshError::InvalidElement`](crate::MeshError::InvalidElement) if
/// `seed` or any selected element is not part of `model`.
pub fn select_loop<I: MeshIndex>(
    model: &TopologyModel<I>,
    session: &mut LoopSession<I>,
    selection: &Selection<I>,
    seed: EdgeId<I>,
    options: &LoopSelectOptions,
) -> Result<Outcome<I>> {
    model.check_edge(seed)?;
    selection.validate(model)?;

    if selection.mode() == SelectMode::Face {
        session.reset();
        return Ok(select_face_loop(model, selection, seed, options.extend));
    }

    if options.mode == LoopMode::BlenderDefault {
        session.reset();
        return Ok(select_natural(model, selection, seed, options.extend));
    }

    if session.continues(model, selection, seed, options.extend) {
        if let Some(cycle) = session.cycle.as_mut() {
            let (cursor, shown) = cycle.candidates.cycle(cycle.cursor);
            let outcome = show(model, &cycle.original, shown, cursor, &cycle.candidates, options.extend);
            log::debug!("loop cycle on {:?} moved to {:?}", seed, cursor);
            cycle.cursor = cursor;
            cycle.produced = outcome.selection.clone();
            return Ok(outcome);
        }
    }

    let candidates = enumerate(model, seed)?;
    log::debug!("new loop cycle on {:?} with {} candidates", seed, candidates.len());
    let first = candidates.first();

    let outcome;
    let original;
    let cursor;
    if options.extend && selection.contains_all_edges(first.edge_set()) {
        // Clicking a selected loop deselects it; the next click selects it again
        original = selection.without_edges(model, first.edges());
        cursor = Cursor::Original;
        outcome = Outcome::finished(original.clone(), "Deselected loop");
    } else {
        original = selection.clone();
        cursor = Cursor::Candidate(0);
        outcome = show(
            model,
            &original,
            Some(first),
            cursor,
            &candidates,
            options.extend,
        );
    }

    session.cycle = Some(Cycle {
        signature: model.signature(),
        extend: options.extend,
        candidates,
        cursor,
        original,
        produced: outcome.selection.clone(),
    });

    Ok(outcome)
}

fn show<I: MeshIndex>(
    model: &TopologyModel<I>,
    original: &Selection<I>,
    shown: Option<&Loop<I>>,
    cursor: Cursor,
    candidates: &CandidateSet<I>,
    extend: bool,
) -> Outcome<I> {
    match (shown, cursor) {
        (Some(l), Cursor::Candidate(i)) => {
            let selection = if extend {
                original.with_edges(model, l.edges())
            } else {
                Selection::from_edges(model, original.mode(), l.edges().iter().copied())
            };
            let shape = if l.is_closed() { "closed" } else { "open" };
            let message = format!(
                "Selected {} loop {} of {} ({} edges, {} poles)",
                shape,
                i + 1,
                candidates.len(),
                l.len(),
                l.pole_crossings()
            );
            Outcome::finished(selection, message)
        }
        _ => Outcome::finished(original.clone(), "Restored original selection"),
    }
}

fn select_natural<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    seed: EdgeId<I>,
    extend: bool,
) -> Outcome<I> {
    let l = natural_loop(model, seed);
    if !extend {
        let sel = Selection::from_edges(model, selection.mode(), l.edges().iter().copied());
        return Outcome::finished(sel, format!("Selected loop ({} edges)", l.len()));
    }
    if selection.contains_all_edges(l.edges()) {
        Outcome::finished(selection.without_edges(model, l.edges()), "Deselected loop")
    } else {
        Outcome::finished(
            selection.with_edges(model, l.edges()),
            format!("Selected loop ({} edges)", l.len()),
        )
    }
}

fn select_face_loop<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    seed: EdgeId<I>,
    extend: bool,
) -> Outcome<I> {
    let ring = face_loop(model, seed);
    if ring.is_empty() {
        return Outcome::declined(selection.clone(), "No face loop through this edge");
    }

    let faces = if !extend {
        ring.iter().copied().collect()
    } else if ring.iter().all(|f| selection.faces().contains(f)) {
        let mut faces = selection.faces().clone();
        for f in &ring {
            faces.remove(f);
        }
        faces
    } else {
        let mut faces = selection.faces().clone();
        faces.extend(ring.iter().copied());
        faces
    };

    let message = if faces.len() < selection.faces().len() {
        "Deselected face loop".to_string()
    } else {
        format!("Selected face loop ({} faces)", ring.len())
    };
    Outcome::finished(Selection::from_faces(model, SelectMode::Face, faces), message)
}
