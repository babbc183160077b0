//! Growing and shrinking selections by one ring.
//!
//! Loop-like selections are resized as the boundary of the region they
//! enclose: the region is grown or shrunk one face step and its new boundary
//! becomes the selection, so a loop moves outward or inward as a whole. Other
//! selections step by faces or edges the way an editor's "select more/less"
//! does.
//!
//! No mode ever shrinks a non-empty selection to nothing; such a shrink is
//! refused and the input comes back with a warning.
//!
//! # Example
//!
//! ```
//! use loopsmith::prelude::*;
//! use loopsmith::algo::resize::{resize, Direction, ResizeOptions};
//!
//! let model: TopologyModel = TopologyModel::build(&primitives::quad_grid(4, 4)).unwrap();
//! let face = Selection::from_faces(&model, SelectMode::Face, [FaceId::new(5)]);
//!
//! let grown = resize(&model, &face, &ResizeOptions::default()).unwrap();
//! assert_eq!(grown.selection.faces().len(), 9);
//!
//! let back = resize(&model, &grown.selection, &ResizeOptions::default().with_direction(Direction::Shrink)).unwrap();
//! assert!(!back.selection.is_empty());
//! ```

mod region;

use std::collections::BTreeSet;
use std::fmt;

use super::classify::{classify_graph, SelectionGraph, SelectionShape};
use crate::error::Result;
use crate::mesh::{MeshIndex, TopologyModel, VertexId};
use crate::selection::{Outcome, SelectMode, Selection};

pub use region::{
    edges_within, faces_within, grow_faces, grow_vertices, loop_to_region, region_to_loop, region_vertices,
    shrink_faces, shrink_vertices, Step,
};

/// How [`resize`] decides what one ring is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeMode {
    /// Pick a strategy from the selection's shape.
    #[default]
    Automatic,
    /// Move the boundary loop of the selected region.
    Boundaries,
    /// Step by faces.
    Faces,
    /// Plain face-stepped select more/less.
    DefaultFaces,
    /// Plain edge-stepped select more/less.
    DefaultEdges,
}

/// Grow or shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Add one ring.
    #[default]
    Grow,
    /// Remove one ring.
    Shrink,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Grow => write!(f, "grow"),
            Direction::Shrink => write!(f, "shrink"),
        }
    }
}

/// Options for [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeOptions {
    /// Resize strategy.
    pub mode: ResizeMode,
    /// Grow or shrink.
    pub direction: Direction,
}

impl ResizeOptions {
    /// Set the resize strategy.
    pub fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

const NOTHING_SELECTED: &str = "No vertices selected";
const WOULD_EMPTY: &str = "Can't shrink selection: selection would become empty";

/// Grow or shrink `selection` by one ring.
///
/// The returned selection keeps the input's select mode. Conditions that
/// prevent a change (empty input, a shrink that would empty the selection, a
/// boundary already at the mesh border) return the input with a warning.
///
/// # Errors
///
/// Returns [`MeshError::InvalidElement`](crate::MeshError::InvalidElement) if
/// the selection references elements outside `model`.
pub fn resize<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    options: &ResizeOptions,
) -> Result<Outcome<I>> {
    selection.validate(model)?;
    let selection = selection.flushed(model);
    if selection.is_empty() {
        return Ok(Outcome::declined(selection, NOTHING_SELECTED));
    }

    let direction = options.direction;
    let graph = SelectionGraph::new(model, &selection);

    let outcome = match options.mode {
        ResizeMode::DefaultFaces => step(model, &selection, direction, Step::Face, "face selection (Blender default)"),
        ResizeMode::DefaultEdges => step(model, &selection, direction, Step::Edge, "edge selection (Blender default)"),
        ResizeMode::Faces => step(model, &selection, direction, Step::Face, "face selection"),
        ResizeMode::Boundaries => boundaries(model, &selection, &graph, direction),
        ResizeMode::Automatic => automatic(model, &selection, &graph, direction),
    };

    log::debug!("{} with {:?}: {}", direction, options.mode, outcome.report);
    Ok(outcome)
}

fn automatic<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    graph: &SelectionGraph<I>,
    direction: Direction,
) -> Outcome<I> {
    match classify_graph(model, selection, graph) {
        SelectionShape::ClosedLoop(_) => boundaries(model, selection, graph, direction),
        SelectionShape::OpenChain(_) => match direction {
            Direction::Grow => boundaries(model, selection, graph, direction),
            Direction::Shrink => step(model, selection, direction, Step::Face, "face selection"),
        },
        SelectionShape::FaceRegion(_) => step(model, selection, direction, Step::Face, "face selection"),
        SelectionShape::Mixed => {
            log::debug!("ambiguous selection, falling back to face stepping");
            let mut outcome = step(model, selection, direction, Step::Face, "face selection");
            outcome.report.message.push_str(" (not a loop or region, stepped by faces)");
            outcome
        }
    }
}

/// Select-more/less by one step at the selection's own level.
fn step<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    direction: Direction,
    step: Step,
    what: &str,
) -> Outcome<I> {
    let mode = selection.mode();
    let result = match mode {
        SelectMode::Face => {
            let faces = match direction {
                Direction::Grow => grow_faces(model, selection.faces(), step),
                Direction::Shrink => shrink_faces(model, selection.faces(), step),
            };
            Selection::from_faces(model, mode, faces)
        }
        SelectMode::Vertex | SelectMode::Edge => {
            let verts = match direction {
                Direction::Grow => grow_vertices(model, selection.vertices(), step),
                Direction::Shrink => shrink_vertices(model, selection.vertices(), step),
            };
            from_stepped_vertices(model, mode, verts)
        }
    };
    finish(selection, result, direction, what)
}

/// In edge mode, vertices left without a selected edge are dropped.
fn from_stepped_vertices<I: MeshIndex>(
    model: &TopologyModel<I>,
    mode: SelectMode,
    verts: BTreeSet<VertexId<I>>,
) -> Selection<I> {
    let selection = Selection::from_vertices(model, mode, verts);
    match mode {
        SelectMode::Edge => Selection::from_edges(model, mode, selection.edges().iter().copied()),
        SelectMode::Vertex | SelectMode::Face => selection,
    }
}

fn finish<I: MeshIndex>(original: &Selection<I>, result: Selection<I>, direction: Direction, what: &str) -> Outcome<I> {
    match direction {
        Direction::Shrink if result.is_empty() => Outcome::declined(original.clone(), WOULD_EMPTY),
        Direction::Grow if result == *original => Outcome::declined(original.clone(), format!("Can't grow {}", what)),
        Direction::Shrink if result == *original => {
            Outcome::declined(original.clone(), format!("Can't shrink {}", what))
        }
        Direction::Grow => Outcome::finished(result, format!("Grew {}", what)),
        Direction::Shrink => Outcome::finished(result, format!("Shrank {}", what)),
    }
}

/// Move the boundary loop of the selected region one face step.
///
/// The region is the faces a closed selection encloses, plus the selected
/// vertices themselves. A ring that encloses nothing is a region of zero
/// width: growing it selects the two parallel rings beside it, and shrinking
/// those two rings collapses the band between them back to the middle ring.
fn boundaries<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    graph: &SelectionGraph<I>,
    direction: Direction,
) -> Outcome<I> {
    let mode = selection.mode();

    if mode == SelectMode::Face {
        let faces = match direction {
            Direction::Grow => grow_faces(model, selection.faces(), Step::Face),
            Direction::Shrink => shrink_faces(model, selection.faces(), Step::Face),
        };
        let result = Selection::from_faces(model, mode, faces);
        return finish(selection, result, direction, "boundary selection");
    }

    let open = graph.is_open() || graph.has_no_edges();
    if open && direction == Direction::Shrink {
        return Outcome::declined(
            selection.clone(),
            "Can't shrink boundary selection (it has free ends or branches)",
        );
    }

    let mut base = selection.vertices().clone();
    if !open {
        base.extend(region_vertices(model, &loop_to_region(model, graph.islands())));
    }

    match direction {
        Direction::Grow => {
            let grown = faces_within(model, &grow_vertices(model, &base, Step::Face));
            let result = Selection::from_edges(model, mode, region_to_loop(model, &grown));

            if grown.is_empty() {
                Outcome::declined(selection.clone(), "Can't grow boundary selection (no faces around it)")
            } else if result.edges().is_empty() {
                Outcome::declined(
                    selection.clone(),
                    "Can't grow boundary selection (it would cover the whole mesh)",
                )
            } else if result.edges() == selection.edges() {
                Outcome::declined(
                    selection.clone(),
                    "Can't grow boundary selection (already at the mesh boundary)",
                )
            } else {
                Outcome::finished(result, "Grew boundary selection")
            }
        }
        Direction::Shrink => {
            // The loops are the region's border, open mesh edges included
            let inner: BTreeSet<VertexId<I>> = base.difference(selection.vertices()).copied().collect();
            let shrunk = faces_within(model, &inner);
            let edges = if shrunk.is_empty() {
                // The region collapsed to a line
                edges_within(model, &inner)
            } else {
                region_to_loop(model, &shrunk)
            };
            let result = Selection::from_edges(model, mode, edges);
            finish(selection, result, direction, "boundary selection")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::{quad_cylinder, quad_grid, quad_torus};
    use crate::mesh::{EdgeId, FaceId};

    const ALL_MODES: [ResizeMode; 5] = [
        ResizeMode::Automatic,
        ResizeMode::Boundaries,
        ResizeMode::Faces,
        ResizeMode::DefaultFaces,
        ResizeMode::DefaultEdges,
    ];

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn grow(mode: ResizeMode) -> ResizeOptions {
        ResizeOptions::default().with_mode(mode)
    }

    fn shrink(mode: ResizeMode) -> ResizeOptions {
        ResizeOptions::default().with_mode(mode).with_direction(Direction::Shrink)
    }

    /// 8x8 grid with an edge loop around the center 2x2 block of quads.
    fn center_loop() -> (TopologyModel, Selection) {
        let model: TopologyModel = TopologyModel::build(&quad_grid(8, 8)).unwrap();
        let block: BTreeSet<FaceId> = [27, 28, 35, 36].into_iter().map(FaceId::new).collect();
        let ring = region_to_loop(&model, &block);
        let sel = Selection::from_edges(&model, SelectMode::Edge, ring);
        (model, sel)
    }

    #[test]
    fn test_grow_then_shrink_returns_loop() {
        let (model, start) = center_loop();
        assert_eq!(start.edges().len(), 8);

        for mode in [ResizeMode::Automatic, ResizeMode::Boundaries] {
            let grown = resize(&model, &start, &grow(mode)).unwrap();
            assert!(!grown.report.is_warning(), "{:?}: {}", mode, grown.report);
            assert_eq!(grown.selection.edges().len(), 16);
            assert!(grown.selection.faces().is_empty());

            let back = resize(&model, &grown.selection, &shrink(mode)).unwrap();
            assert_eq!(back.selection, start, "{:?}", mode);
            assert_eq!(back.report.message, "Shrank boundary selection");
        }
    }

    /// Edges joining consecutive vertices of a closed vertex cycle.
    fn ring(model: &TopologyModel, verts: &[usize]) -> BTreeSet<EdgeId> {
        (0..verts.len())
            .map(|i| model.edge_between(v(verts[i]), v(verts[(i + 1) % verts.len()])).unwrap())
            .collect()
    }

    #[test]
    fn test_torus_rings_grow_to_parallel_rings() {
        // 8 around the main ring, 6 around the tube: vertex (j, k) = j * 6 + k
        let model: TopologyModel = TopologyModel::build(&quad_torus(8, 6)).unwrap();
        let tube_ring = |j: usize| -> Vec<usize> { (0..6).map(|k| j * 6 + k).collect() };
        let main_ring = |k: usize| -> Vec<usize> { (0..8).map(|j| j * 6 + k).collect() };

        let cases = [
            (ring(&model, &tube_ring(2)), [ring(&model, &tube_ring(1)), ring(&model, &tube_ring(3))]),
            (ring(&model, &main_ring(0)), [ring(&model, &main_ring(5)), ring(&model, &main_ring(1))]),
        ];

        for (start, [before, after]) in cases {
            let start = Selection::from_edges(&model, SelectMode::Edge, start);
            let expected: BTreeSet<EdgeId> = before.union(&after).copied().collect();

            for mode in [ResizeMode::Automatic, ResizeMode::Boundaries] {
                let grown = resize(&model, &start, &grow(mode)).unwrap();
                assert!(!grown.report.is_warning(), "{:?}: {}", mode, grown.report);
                assert_eq!(grown.selection.edges(), &expected);

                let back = resize(&model, &grown.selection, &shrink(mode)).unwrap();
                assert_eq!(back.report.message, "Shrank boundary selection");
                assert_eq!(back.selection, start, "{:?}", mode);
            }
        }
    }

    #[test]
    fn test_thin_torus_ring_cannot_grow() {
        // Three rings around the tube: growing one covers everything
        let model: TopologyModel = TopologyModel::build(&quad_torus(6, 3)).unwrap();
        let start = Selection::from_edges(&model, SelectMode::Edge, ring(&model, &[0, 3, 6, 9, 12, 15]));
        let out = resize(&model, &start, &grow(ResizeMode::Boundaries)).unwrap();
        assert!(out.report.is_warning());
        assert_eq!(out.report.message, "Can't grow boundary selection (it would cover the whole mesh)");
        assert_eq!(out.selection, start);
    }

    #[test]
    fn test_wire_loop_cannot_grow() {
        use crate::mesh::MeshSnapshot;
        use nalgebra::Point3;

        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let snapshot = MeshSnapshot::new(positions, vec![[0, 1], [1, 2], [2, 0]], vec![]);
        let model: TopologyModel = TopologyModel::build(&snapshot).unwrap();
        let start = Selection::from_edges(&model, SelectMode::Edge, model.edge_ids());

        let out = resize(&model, &start, &grow(ResizeMode::Automatic)).unwrap();
        assert!(out.report.is_warning());
        assert_eq!(out.report.message, "Can't grow boundary selection (no faces around it)");
        assert_eq!(out.selection, start);
    }

    #[test]
    fn test_cylinder_ring_round_trip() {
        // 8 around, 6 along: vertex (k, j) = j * 8 + k
        let model: TopologyModel = TopologyModel::build(&quad_cylinder(8, 6)).unwrap();
        let around = |j: usize| -> Vec<usize> { (0..8).map(|k| j * 8 + k).collect() };

        for j in [1, 3] {
            let start = Selection::from_edges(&model, SelectMode::Edge, ring(&model, &around(j)));
            let expected: BTreeSet<EdgeId> = ring(&model, &around(j - 1))
                .union(&ring(&model, &around(j + 1)))
                .copied()
                .collect();

            let grown = resize(&model, &start, &grow(ResizeMode::Automatic)).unwrap();
            assert_eq!(grown.report.message, "Grew boundary selection");
            assert_eq!(grown.selection.edges(), &expected, "ring {}", j);
            if j == 3 {
                assert!(grown.selection.edges().iter().all(|&e| !model.is_boundary_edge(e)));
            }

            let back = resize(&model, &grown.selection, &shrink(ResizeMode::Automatic)).unwrap();
            assert_eq!(back.selection, start, "ring {}", j);
        }
    }

    #[test]
    fn test_border_loop_shrinks_inward() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(3, 3)).unwrap();
        let border: Vec<EdgeId> = model.edge_ids().filter(|&e| model.is_boundary_edge(e)).collect();
        let sel = Selection::from_edges(&model, SelectMode::Edge, border);

        // The loop around the center quad: vertex (i, j) = j * 4 + i
        let out = resize(&model, &sel, &shrink(ResizeMode::Boundaries)).unwrap();
        assert_eq!(out.selection.edges(), &ring(&model, &[5, 6, 10, 9]));
    }

    #[test]
    fn test_shrink_never_empties() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let e = model.edge_between(v(6), v(7)).unwrap();
        let inputs = [
            Selection::from_vertices(&model, SelectMode::Vertex, [v(12)]),
            Selection::from_edges(&model, SelectMode::Edge, [e]),
            Selection::from_faces(&model, SelectMode::Face, [FaceId::new(5)]),
            Selection::from_faces(&model, SelectMode::Edge, [FaceId::new(5)]),
        ];

        for input in &inputs {
            for mode in ALL_MODES {
                let out = resize(&model, input, &shrink(mode)).unwrap();
                assert!(!out.selection.is_empty(), "{:?} emptied {:?}", mode, input);
                if out.report.is_warning() {
                    assert_eq!(&out.selection, input);
                }
            }
        }
    }

    #[test]
    fn test_shrink_refusal_report() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let sel = Selection::from_faces(&model, SelectMode::Face, [FaceId::new(5)]);
        let out = resize(&model, &sel, &shrink(ResizeMode::Faces)).unwrap();
        assert!(out.report.is_warning());
        assert_eq!(out.report.message, WOULD_EMPTY);
        assert_eq!(out.selection, sel);
    }

    #[test]
    fn test_empty_selection_is_reported() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(2, 2)).unwrap();
        for mode in ALL_MODES {
            let out = resize(&model, &Selection::default(), &grow(mode)).unwrap();
            assert!(out.report.is_warning());
            assert_eq!(out.report.message, NOTHING_SELECTED);
        }
    }

    #[test]
    fn test_border_loop_cannot_grow() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(3, 3)).unwrap();
        let border: Vec<EdgeId> = model.edge_ids().filter(|&e| model.is_boundary_edge(e)).collect();
        let sel = Selection::from_edges(&model, SelectMode::Edge, border);

        let out = resize(&model, &sel, &grow(ResizeMode::Boundaries)).unwrap();
        assert!(out.report.is_warning());
        assert!(out.report.message.starts_with("Can't grow boundary selection"));
        assert_eq!(out.selection, sel);
    }

    #[test]
    fn test_open_chain_boundary_shrink_refused() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let chain = [(6, 7), (7, 8)].map(|(a, b)| model.edge_between(v(a), v(b)).unwrap());
        let sel = Selection::from_edges(&model, SelectMode::Edge, chain);

        let out = resize(&model, &sel, &shrink(ResizeMode::Boundaries)).unwrap();
        assert!(out.report.is_warning());
        assert!(out.report.message.starts_with("Can't shrink boundary selection"));

        // Growing an open chain selects the loop around the faces it touches
        let out = resize(&model, &sel, &grow(ResizeMode::Automatic)).unwrap();
        assert_eq!(out.report.message, "Grew boundary selection");
        // The faces touching the chain form a 4x2 block spanning the grid
        assert_eq!(out.selection.edges().len(), 12);
    }

    #[test]
    fn test_face_steps() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let sel = Selection::from_faces(&model, SelectMode::Face, [FaceId::new(5)]);

        let out = resize(&model, &sel, &grow(ResizeMode::Faces)).unwrap();
        assert_eq!(out.selection.faces().len(), 9);
        assert_eq!(out.report.message, "Grew face selection");

        let out = resize(&model, &sel, &grow(ResizeMode::DefaultEdges)).unwrap();
        assert_eq!(out.selection.faces().len(), 5);
        assert_eq!(out.report.message, "Grew edge selection (Blender default)");

        // Boundaries in face mode resizes the region itself
        let out = resize(&model, &sel, &grow(ResizeMode::Boundaries)).unwrap();
        assert_eq!(out.selection.mode(), SelectMode::Face);
        assert_eq!(out.selection.faces().len(), 9);
    }

    #[test]
    fn test_vertex_steps() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let sel = Selection::from_vertices(&model, SelectMode::Vertex, [v(12)]);

        let out = resize(&model, &sel, &grow(ResizeMode::DefaultEdges)).unwrap();
        assert_eq!(out.selection.vertices().len(), 5);
        assert_eq!(out.selection.mode(), SelectMode::Vertex);

        let out = resize(&model, &sel, &grow(ResizeMode::DefaultFaces)).unwrap();
        assert_eq!(out.selection.vertices().len(), 9);
        assert_eq!(out.selection.faces().len(), 4);
    }

    #[test]
    fn test_mixed_falls_back_to_faces() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(4, 4)).unwrap();
        let sel = Selection::from_vertices(&model, SelectMode::Vertex, [v(12)]);
        let out = resize(&model, &sel, &grow(ResizeMode::Automatic)).unwrap();
        assert_eq!(out.selection.vertices().len(), 9);
        assert!(out.report.message.contains("stepped by faces"));

        // Faces meeting only at a corner are not one region either
        let sel = Selection::from_faces(&model, SelectMode::Face, [FaceId::new(0), FaceId::new(5)]);
        let out = resize(&model, &sel, &grow(ResizeMode::Automatic)).unwrap();
        assert_eq!(out.report.message, "Grew face selection (not a loop or region, stepped by faces)");
        assert_eq!(out.selection.faces().len(), 9);
    }

    #[test]
    fn test_whole_closed_mesh_cannot_grow() {
        let model: TopologyModel = TopologyModel::build(&quad_torus(6, 4)).unwrap();
        let sel = Selection::from_faces(&model, SelectMode::Face, model.face_ids());
        let out = resize(&model, &sel, &grow(ResizeMode::Faces)).unwrap();
        assert!(out.report.is_warning());
        assert_eq!(out.report.message, "Can't grow face selection");
    }

    #[test]
    fn test_invalid_selection() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(2, 2)).unwrap();
        let sel: Selection = Selection::from_parts(
            SelectMode::Face,
            std::iter::empty(),
            std::iter::empty(),
            [FaceId::new(9)],
        );
        assert!(resize(&model, &sel, &ResizeOptions::default()).is_err());
    }
}
