//! Selection state exchanged with the host.
//!
//! A [`Selection`] holds selected vertices, edges and faces plus the active
//! [`SelectMode`]. The mode's own element set is the primary one; the other
//! two are always derived from it ("flushed"), the way an editor keeps its
//! selection coherent:
//!
//! | Mode | Primary | Derived |
//! |------|---------|---------|
//! | Vertex | vertices | edges with both ends selected, faces with all vertices selected |
//! | Edge | edges | endpoints of selected edges, faces with all edges selected |
//! | Face | faces | edges and vertices of selected faces |
//!
//! Operations never change the mode of a selection.

mod report;

use std::collections::BTreeSet;

use crate::error::{MeshError, Result};
use crate::mesh::{EdgeId, FaceId, MeshIndex, TopologyModel, VertexId};

pub use report::{Outcome, Report, ReportLevel};

/// Which element kind the user is selecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectMode {
    /// Vertex select mode.
    Vertex,
    /// Edge select mode.
    #[default]
    Edge,
    /// Face select mode.
    Face,
}

/// Selected elements of a mesh plus the active select mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection<I: MeshIndex = u32> {
    mode: SelectMode,
    vertices: BTreeSet<VertexId<I>>,
    edges: BTreeSet<EdgeId<I>>,
    faces: BTreeSet<FaceId<I>>,
}

impl<I: MeshIndex> Selection<I> {
    /// An empty selection in the given mode.
    pub fn empty(mode: SelectMode) -> Self {
        Self {
            mode,
            vertices: BTreeSet::new(),
            edges: BTreeSet::new(),
            faces: BTreeSet::new(),
        }
    }

    /// A selection exactly as the host reports it, without flushing.
    ///
    /// Use [`validate`](Self::validate) before handing it to an operation.
    pub fn from_parts<V, E, F>(mode: SelectMode, vertices: V, edges: E, faces: F) -> Self
    where
        V: IntoIterator<Item = VertexId<I>>,
        E: IntoIterator<Item = EdgeId<I>>,
        F: IntoIterator<Item = FaceId<I>>,
    {
        Self {
            mode,
            vertices: vertices.into_iter().collect(),
            edges: edges.into_iter().collect(),
            faces: faces.into_iter().collect(),
        }
    }

    /// Select vertices in the given mode.
    ///
    /// In vertex and edge mode the vertices are primary and edges/faces are
    /// flushed from them. In face mode, faces whose vertices are all selected
    /// become the selection.
    pub fn from_vertices<V>(model: &TopologyModel<I>, mode: SelectMode, vertices: V) -> Self
    where
        V: IntoIterator<Item = VertexId<I>>,
    {
        let vertices: BTreeSet<VertexId<I>> = vertices.into_iter().collect();
        match mode {
            SelectMode::Vertex | SelectMode::Edge => {
                let edges = model
                    .edge_ids()
                    .filter(|&e| model.edge_vertices(e).iter().all(|v| vertices.contains(v)))
                    .collect();
                let faces = model
                    .face_ids()
                    .filter(|&f| model.face_vertices(f).iter().all(|v| vertices.contains(v)))
                    .collect();
                Self {
                    mode,
                    vertices,
                    edges,
                    faces,
                }
            }
            SelectMode::Face => {
                let faces: BTreeSet<FaceId<I>> = model
                    .face_ids()
                    .filter(|&f| model.face_vertices(f).iter().all(|v| vertices.contains(v)))
                    .collect();
                Self::from_faces(model, mode, faces)
            }
        }
    }

    /// Select edges in the given mode.
    ///
    /// In vertex mode the edge endpoints are selected and flushed; in face
    /// mode the faces whose edges are all selected become the selection.
    pub fn from_edges<E>(model: &TopologyModel<I>, mode: SelectMode, edges: E) -> Self
    where
        E: IntoIterator<Item = EdgeId<I>>,
    {
        let edges: BTreeSet<EdgeId<I>> = edges.into_iter().collect();
        match mode {
            SelectMode::Vertex => {
                let vertices: BTreeSet<VertexId<I>> = edges.iter().flat_map(|&e| model.edge_vertices(e)).collect();
                Self::from_vertices(model, mode, vertices)
            }
            SelectMode::Edge => {
                let vertices = edges.iter().flat_map(|&e| model.edge_vertices(e)).collect();
                let faces = model
                    .face_ids()
                    .filter(|&f| model.face_edges(f).iter().all(|e| edges.contains(e)))
                    .collect();
                Self {
                    mode,
                    vertices,
                    edges,
                    faces,
                }
            }
            SelectMode::Face => {
                let faces: BTreeSet<FaceId<I>> = model
                    .face_ids()
                    .filter(|&f| model.face_edges(f).iter().all(|e| edges.contains(e)))
                    .collect();
                Self::from_faces(model, mode, faces)
            }
        }
    }

    /// Select faces in the given mode.
    ///
    /// In vertex and edge mode the faces' vertices or edges become primary and
    /// are flushed as usual.
    pub fn from_faces<F>(model: &TopologyModel<I>, mode: SelectMode, faces: F) -> Self
    where
        F: IntoIterator<Item = FaceId<I>>,
    {
        let faces: BTreeSet<FaceId<I>> = faces.into_iter().collect();
        match mode {
            SelectMode::Vertex => {
                let vertices: BTreeSet<VertexId<I>> =
                    faces.iter().flat_map(|&f| model.face_vertices(f).iter().copied()).collect();
                Self::from_vertices(model, mode, vertices)
            }
            SelectMode::Edge => {
                let edges: BTreeSet<EdgeId<I>> = faces.iter().flat_map(|&f| model.face_edges(f).iter().copied()).collect();
                Self::from_edges(model, mode, edges)
            }
            SelectMode::Face => {
                let edges = faces
                    .iter()
                    .flat_map(|&f| model.face_edges(f).iter().copied())
                    .collect();
                let vertices = faces
                    .iter()
                    .flat_map(|&f| model.face_vertices(f).iter().copied())
                    .collect();
                Self {
                    mode,
                    vertices,
                    edges,
                    faces,
                }
            }
        }
    }

    /// Re-derive the non-primary sets from the primary one.
    pub fn flushed(&self, model: &TopologyModel<I>) -> Self {
        match self.mode {
            SelectMode::Vertex => Self::from_vertices(model, self.mode, self.vertices.iter().copied()),
            SelectMode::Edge => Self::from_edges(model, self.mode, self.edges.iter().copied()),
            SelectMode::Face => Self::from_faces(model, self.mode, self.faces.iter().copied()),
        }
    }

    /// Fail with [`MeshError::InvalidElement`] if any element is outside the mesh.
    pub fn validate(&self, model: &TopologyModel<I>) -> Result<()> {
        if let Some(v) = self.vertices.iter().find(|&&v| !model.contains_vertex(v)) {
            return Err(MeshError::invalid_element("vertex", v.index()));
        }
        if let Some(e) = self.edges.iter().find(|&&e| !model.contains_edge(e)) {
            return Err(MeshError::invalid_element("edge", e.index()));
        }
        if let Some(f) = self.faces.iter().find(|&&f| !model.contains_face(f)) {
            return Err(MeshError::invalid_element("face", f.index()));
        }
        Ok(())
    }

    /// The active select mode.
    #[inline]
    pub fn mode(&self) -> SelectMode {
        self.mode
    }

    /// Selected vertices.
    #[inline]
    pub fn vertices(&self) -> &BTreeSet<VertexId<I>> {
        &self.vertices
    }

    /// Selected edges.
    #[inline]
    pub fn edges(&self) -> &BTreeSet<EdgeId<I>> {
        &self.edges
    }

    /// Selected faces.
    #[inline]
    pub fn faces(&self) -> &BTreeSet<FaceId<I>> {
        &self.faces
    }

    /// Returns true if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Returns true if the edge is selected.
    #[inline]
    pub fn contains_edge(&self, e: EdgeId<I>) -> bool {
        self.edges.contains(&e)
    }

    /// Returns true if every given edge is selected.
    pub fn contains_all_edges<'a, E>(&self, edges: E) -> bool
    where
        E: IntoIterator<Item = &'a EdgeId<I>>,
    {
        edges.into_iter().all(|e| self.edges.contains(e))
    }

    /// This selection with the given edges added, expressed in the same mode.
    pub fn with_edges<'a, E>(&self, model: &TopologyModel<I>, edges: E) -> Self
    where
        E: IntoIterator<Item = &'a EdgeId<I>>,
    {
        let mut all = self.edges.clone();
        all.extend(edges.into_iter().copied());
        self.retarget(model, all)
    }

    /// This selection with the given edges removed, expressed in the same mode.
    pub fn without_edges<'a, E>(&self, model: &TopologyModel<I>, edges: E) -> Self
    where
        E: IntoIterator<Item = &'a EdgeId<I>>,
    {
        let mut all = self.edges.clone();
        for e in edges {
            all.remove(e);
        }
        self.retarget(model, all)
    }

    fn retarget(&self, model: &TopologyModel<I>, edges: BTreeSet<EdgeId<I>>) -> Self {
        match self.mode {
            SelectMode::Vertex => {
                // Keep isolated selected vertices that no edge covers
                let covered: BTreeSet<VertexId<I>> =
                    self.edges.iter().flat_map(|&e| model.edge_vertices(e)).collect();
                let mut vertices: BTreeSet<VertexId<I>> =
                    self.vertices.iter().copied().filter(|v| !covered.contains(v)).collect();
                vertices.extend(edges.iter().flat_map(|&e| model.edge_vertices(e)));
                Self::from_vertices(model, self.mode, vertices)
            }
            SelectMode::Edge | SelectMode::Face => Self::from_edges(model, self.mode, edges),
        }
    }
}

impl<I: MeshIndex> Default for Selection<I> {
    fn default() -> Self {
        Self::empty(SelectMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::quad_grid;

    fn grid() -> TopologyModel {
        TopologyModel::build(&quad_grid(2, 2)).unwrap()
    }

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    #[test]
    fn test_vertex_flush() {
        let model = grid();
        // Vertices of the lower-left quad
        let sel = Selection::from_vertices(&model, SelectMode::Vertex, [v(0), v(1), v(3), v(4)]);
        assert_eq!(sel.edges().len(), 4);
        assert_eq!(sel.faces().len(), 1);
    }

    #[test]
    fn test_edge_flush() {
        let model = grid();
        let e01 = model.edge_between(v(0), v(1)).unwrap();
        let e14 = model.edge_between(v(1), v(4)).unwrap();
        let sel = Selection::from_edges(&model, SelectMode::Edge, [e01, e14]);
        assert_eq!(sel.vertices().len(), 3);
        assert!(sel.faces().is_empty());
    }

    #[test]
    fn test_face_flush() {
        let model = grid();
        let sel = Selection::from_faces(&model, SelectMode::Face, [FaceId::new(0), FaceId::new(1)]);
        assert_eq!(sel.vertices().len(), 6);
        assert_eq!(sel.edges().len(), 7);
    }

    #[test]
    fn test_faces_in_edge_mode_keep_mode() {
        let model = grid();
        let sel = Selection::from_faces(&model, SelectMode::Edge, [FaceId::new(0)]);
        assert_eq!(sel.mode(), SelectMode::Edge);
        assert_eq!(sel.edges().len(), 4);
        assert_eq!(sel.faces().len(), 1);
    }

    #[test]
    fn test_cross_mode_construction() {
        let model = grid();
        let f0 = FaceId::new(0);

        let sel = Selection::from_faces(&model, SelectMode::Vertex, [f0]);
        assert_eq!(sel.vertices().len(), 4);
        assert_eq!(sel.edges().len(), 4);
        assert_eq!(sel.faces().len(), 1);

        let quad_edges = model.face_edges(f0).to_vec();
        let sel = Selection::from_edges(&model, SelectMode::Face, quad_edges);
        assert_eq!(sel.faces().iter().copied().collect::<Vec<_>>(), vec![f0]);

        let sel = Selection::from_vertices(&model, SelectMode::Face, [v(0), v(1), v(3), v(4)]);
        assert_eq!(sel.faces().iter().copied().collect::<Vec<_>>(), vec![f0]);
        assert_eq!(sel.edges().len(), 4);

        let e01 = model.edge_between(v(0), v(1)).unwrap();
        let e14 = model.edge_between(v(1), v(4)).unwrap();
        let sel = Selection::from_edges(&model, SelectMode::Vertex, [e01, e14]);
        assert_eq!(sel.vertices().len(), 3);
        assert_eq!(sel.edges().len(), 2);
        assert!(sel.faces().is_empty());

        // Removing an edge in vertex mode drops its far endpoint only
        let back = sel.without_edges(&model, &[e14]);
        assert_eq!(back.edges().len(), 1);
        assert_eq!(back.vertices().len(), 2);
    }

    #[test]
    fn test_validate() {
        let model = grid();
        let sel: Selection = Selection::from_parts(
            SelectMode::Edge,
            std::iter::empty(),
            [EdgeId::new(99)],
            std::iter::empty(),
        );
        assert_eq!(
            sel.validate(&model).unwrap_err(),
            MeshError::invalid_element("edge", 99)
        );
        assert!(Selection::<u32>::default().validate(&model).is_ok());
    }

    #[test]
    fn test_with_and_without_edges() {
        let model = grid();
        let e01 = model.edge_between(v(0), v(1)).unwrap();
        let e12 = model.edge_between(v(1), v(2)).unwrap();
        let sel = Selection::from_edges(&model, SelectMode::Edge, [e01]);
        let grown = sel.with_edges(&model, &[e12]);
        assert_eq!(grown.edges().len(), 2);
        let back = grown.without_edges(&model, &[e12]);
        assert_eq!(back, sel);
    }
}
