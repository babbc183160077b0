//! Read-only adjacency model over a mesh snapshot.
//!
//! Unlike a half-edge structure, the model stores explicit incidence lists
//! (vertex → edges and faces, edge → faces, face → vertices and edges), so it
//! represents wire edges and edges with more than two faces without special
//! cases. Every list is ordered by element id, which keeps all derived
//! searches deterministic.
//!
//! # Edge kinds
//!
//! | Incident faces | Kind |
//! |----------------|------|
//! | 0 | wire |
//! | 1 | boundary |
//! | 2 | manifold |
//! | > 2 | non-manifold |

use nalgebra::{Point3, Vector3};

use super::builder::{build_topology, MeshSnapshot};
use super::continuation::{ContinuationRule, VertexClass};
use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// A vertex with its incidence lists.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Incident edges, in edge id order.
    pub edges: Vec<EdgeId<I>>,

    /// Faces containing this vertex, in face id order.
    pub faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new vertex at the given position with no incidences.
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            edges: Vec::new(),
            faces: Vec::new(),
        }
    }
}

/// An edge with its endpoints and incident faces.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    /// The two endpoint vertices, in snapshot order.
    pub vertices: [VertexId<I>; 2],

    /// Incident faces, in face id order.
    pub faces: Vec<FaceId<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// Create a new edge between two vertices with no faces.
    pub fn new(v0: VertexId<I>, v1: VertexId<I>) -> Self {
        Self {
            vertices: [v0, v1],
            faces: Vec::new(),
        }
    }

    /// Returns true if the vertex is an endpoint of this edge.
    #[inline]
    pub fn has_vertex(&self, v: VertexId<I>) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }
}

/// A face with its ordered boundary.
#[derive(Debug, Clone)]
pub struct Face<I: MeshIndex = u32> {
    /// Boundary vertices in winding order.
    pub vertices: Vec<VertexId<I>>,

    /// Boundary edges; edge `i` joins vertex `i` and vertex `i + 1`.
    pub edges: Vec<EdgeId<I>>,
}

/// Read-only adjacency view over a [`MeshSnapshot`].
///
/// # Example
/// ```
/// use loopsmith::mesh::{primitives, TopologyModel, VertexId};
///
/// let model: TopologyModel = TopologyModel::build(&primitives::quad_grid(2, 2)).unwrap();
/// let center = VertexId::new(4);
/// assert_eq!(model.valence(center), 4);
/// assert!(!model.is_pole(center));
/// assert!(model.is_pole(VertexId::new(0))); // corner
/// ```
#[derive(Debug, Clone)]
pub struct TopologyModel<I: MeshIndex = u32> {
    vertices: Vec<Vertex<I>>,
    edges: Vec<Edge<I>>,
    faces: Vec<Face<I>>,
    classes: Vec<VertexClass>,
    signature: u64,
}

impl<I: MeshIndex> TopologyModel<I> {
    /// Build a model from a snapshot.
    ///
    /// Fails if the snapshot is empty or has dangling, degenerate or duplicate
    /// references.
    pub fn build(snapshot: &MeshSnapshot) -> Result<Self> {
        build_topology(snapshot)
    }

    pub(crate) fn from_parts(
        vertices: Vec<Vertex<I>>,
        edges: Vec<Edge<I>>,
        faces: Vec<Face<I>>,
        classes: Vec<VertexClass>,
        signature: u64,
    ) -> Self {
        Self {
            vertices,
            edges,
            faces,
            classes,
            signature,
        }
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// A hash of the connectivity, used to detect topology changes between
    /// invocations.
    #[inline]
    pub fn signature(&self) -> u64 {
        self.signature
    }

    /// Returns true if the vertex exists in this mesh.
    #[inline]
    pub fn contains_vertex(&self, v: VertexId<I>) -> bool {
        v.is_valid() && v.index() < self.vertices.len()
    }

    /// Returns true if the edge exists in this mesh.
    #[inline]
    pub fn contains_edge(&self, e: EdgeId<I>) -> bool {
        e.is_valid() && e.index() < self.edges.len()
    }

    /// Returns true if the face exists in this mesh.
    #[inline]
    pub fn contains_face(&self, f: FaceId<I>) -> bool {
        f.is_valid() && f.index() < self.faces.len()
    }

    /// Fail with [`MeshError::InvalidElement`] unless the edge exists.
    pub fn check_edge(&self, e: EdgeId<I>) -> Result<()> {
        if self.contains_edge(e) {
            Ok(())
        } else {
            Err(MeshError::invalid_element("edge", e.index()))
        }
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Adjacency ====================

    /// Edges incident to a vertex.
    #[inline]
    pub fn vertex_edges(&self, v: VertexId<I>) -> &[EdgeId<I>] {
        &self.vertex(v).edges
    }

    /// Faces containing a vertex.
    #[inline]
    pub fn vertex_faces(&self, v: VertexId<I>) -> &[FaceId<I>] {
        &self.vertex(v).faces
    }

    /// Vertices joined to a vertex by an edge.
    pub fn vertex_neighbors(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.vertex_edges(v).iter().map(move |&e| self.other_vertex(e, v))
    }

    /// The two endpoints of an edge.
    #[inline]
    pub fn edge_vertices(&self, e: EdgeId<I>) -> [VertexId<I>; 2] {
        self.edge(e).vertices
    }

    /// Faces incident to an edge.
    #[inline]
    pub fn edge_faces(&self, e: EdgeId<I>) -> &[FaceId<I>] {
        &self.edge(e).faces
    }

    /// Boundary vertices of a face in winding order.
    #[inline]
    pub fn face_vertices(&self, f: FaceId<I>) -> &[VertexId<I>] {
        &self.face(f).vertices
    }

    /// Boundary edges of a face in winding order.
    #[inline]
    pub fn face_edges(&self, f: FaceId<I>) -> &[EdgeId<I>] {
        &self.face(f).edges
    }

    /// The endpoint of `e` that is not `v`.
    ///
    /// `v` must be an endpoint of `e`.
    #[inline]
    pub fn other_vertex(&self, e: EdgeId<I>, v: VertexId<I>) -> VertexId<I> {
        let [a, b] = self.edge_vertices(e);
        debug_assert!(a == v || b == v, "{:?} is not an endpoint of {:?}", v, e);
        if a == v {
            b
        } else {
            a
        }
    }

    /// The vertex shared by two edges, if any.
    pub fn shared_vertex(&self, a: EdgeId<I>, b: EdgeId<I>) -> Option<VertexId<I>> {
        let [a0, a1] = self.edge_vertices(a);
        let eb = self.edge(b);
        if eb.has_vertex(a0) {
            Some(a0)
        } else if eb.has_vertex(a1) {
            Some(a1)
        } else {
            None
        }
    }

    /// The edge joining two vertices, if any.
    pub fn edge_between(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        self.vertex_edges(a)
            .iter()
            .copied()
            .find(|&e| self.other_vertex(e, a) == b)
    }

    /// Returns true if two edges have a face in common.
    pub fn shares_face(&self, a: EdgeId<I>, b: EdgeId<I>) -> bool {
        let fb = self.edge_faces(b);
        self.edge_faces(a).iter().any(|f| fb.contains(f))
    }

    /// For a face and one of its edges, the edge two steps around the face.
    ///
    /// Returns `None` unless the face is a quad containing the edge.
    pub fn opposite_edge_in_face(&self, f: FaceId<I>, e: EdgeId<I>) -> Option<EdgeId<I>> {
        let edges = self.face_edges(f);
        if edges.len() != 4 {
            return None;
        }
        let pos = edges.iter().position(|&x| x == e)?;
        Some(edges[(pos + 2) % 4])
    }

    // ==================== Classification ====================

    /// Number of edges incident to a vertex.
    #[inline]
    pub fn valence(&self, v: VertexId<I>) -> usize {
        self.vertex(v).edges.len()
    }

    /// The local topological class of a vertex.
    #[inline]
    pub fn vertex_class(&self, v: VertexId<I>) -> VertexClass {
        self.classes[v.index()]
    }

    /// Returns true if loops cannot pass straight through the vertex.
    #[inline]
    pub fn is_pole(&self, v: VertexId<I>) -> bool {
        self.vertex_class(v).is_pole(self.valence(v))
    }

    /// Returns true if the vertex lies on an open (single-face) edge.
    pub fn is_boundary_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_edges(v).iter().any(|&e| self.is_boundary_edge(e))
    }

    /// Returns true if every edge of the vertex is a wire edge.
    #[inline]
    pub fn is_wire_vertex(&self, v: VertexId<I>) -> bool {
        self.vertex_class(v) == VertexClass::Wire
    }

    /// Returns true if the edge has no faces.
    #[inline]
    pub fn is_wire_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_faces(e).is_empty()
    }

    /// Returns true if the edge has exactly one face.
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_faces(e).len() == 1
    }

    /// Returns true if the edge has exactly two faces.
    #[inline]
    pub fn is_manifold_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_faces(e).len() == 2
    }

    /// Returns true if the edge has more than two faces.
    #[inline]
    pub fn is_non_manifold_edge(&self, e: EdgeId<I>) -> bool {
        self.edge_faces(e).len() > 2
    }

    // ==================== Loop continuation ====================

    /// The edge that continues a loop straight through `v`, arriving along `e`.
    ///
    /// Returns `None` if `v` is not an endpoint of `e`, if `v` is a pole, if
    /// either edge is non-manifold, or if the local rule does not single out
    /// exactly one edge.
    pub fn continuation(&self, e: EdgeId<I>, v: VertexId<I>) -> Option<EdgeId<I>> {
        if !self.edge(e).has_vertex(v) || self.is_non_manifold_edge(e) {
            return None;
        }

        let rule = self.vertex_class(v).rule_for(self.valence(v));
        let mut candidates = self.vertex_edges(v).iter().copied().filter(|&x| x != e);

        let next = match rule {
            ContinuationRule::Stop => None,
            ContinuationRule::PassThrough => candidates.next(),
            ContinuationRule::Opposite => {
                let mut straight = candidates.filter(|&x| !self.shares_face(x, e));
                match (straight.next(), straight.next()) {
                    (Some(x), None) => Some(x),
                    _ => None,
                }
            }
        };

        next.filter(|&x| !self.is_non_manifold_edge(x))
    }

    // ==================== Geometry ====================

    /// Direction of an edge leaving `from`, normalized.
    ///
    /// Returns the zero vector for zero-length edges.
    pub fn edge_direction(&self, e: EdgeId<I>, from: VertexId<I>) -> Vector3<f64> {
        let to = self.other_vertex(e, from);
        let d = self.position(to) - self.position(from);
        d.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros)
    }

    /// Length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        let [a, b] = self.edge_vertices(e);
        (self.position(b) - self.position(a)).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::{quad_cylinder, quad_grid, quad_torus};

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn edge(model: &TopologyModel, a: usize, b: usize) -> EdgeId {
        model.edge_between(v(a), v(b)).unwrap()
    }

    #[test]
    fn test_grid_classification() {
        // 3x3 quads: vertex (i, j) = j * 4 + i
        let model: TopologyModel = TopologyModel::build(&quad_grid(3, 3)).unwrap();

        // Corner: boundary with valence 2 is a pole
        assert_eq!(model.vertex_class(v(0)), VertexClass::Boundary);
        assert_eq!(model.valence(v(0)), 2);
        assert!(model.is_pole(v(0)));

        // Side: boundary with valence 3 is regular
        assert_eq!(model.valence(v(1)), 3);
        assert!(model.is_boundary_vertex(v(1)));
        assert!(!model.is_pole(v(1)));

        // Interior
        assert_eq!(model.vertex_class(v(5)), VertexClass::Interior);
        assert!(!model.is_pole(v(5)));
        assert!(!model.is_boundary_vertex(v(5)));
    }

    #[test]
    fn test_torus_has_no_poles() {
        let model: TopologyModel = TopologyModel::build(&quad_torus(6, 4)).unwrap();
        for v in model.vertex_ids() {
            assert_eq!(model.valence(v), 4);
            assert!(!model.is_pole(v));
            assert!(!model.is_boundary_vertex(v));
        }
        for e in model.edge_ids() {
            assert!(model.is_manifold_edge(e));
        }
    }

    #[test]
    fn test_continuation_interior() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(3, 3)).unwrap();
        // Horizontal edge 4-5 continues through 5 to 5-6
        let e45 = edge(&model, 4, 5);
        assert_eq!(model.continuation(e45, v(5)), Some(edge(&model, 5, 6)));
        // Vertical edge 1-5 continues through 5 to 5-9
        let e15 = edge(&model, 1, 5);
        assert_eq!(model.continuation(e15, v(5)), Some(edge(&model, 5, 9)));
    }

    #[test]
    fn test_continuation_boundary() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(3, 3)).unwrap();
        // Along the bottom border: 0-1 continues through 1 to 1-2
        let e01 = edge(&model, 0, 1);
        assert_eq!(model.continuation(e01, v(1)), Some(edge(&model, 1, 2)));
        // Interior edge arriving at the border stops
        let e15 = edge(&model, 1, 5);
        assert_eq!(model.continuation(e15, v(1)), None);
        // Corner is a pole
        assert_eq!(model.continuation(e01, v(0)), None);
    }

    #[test]
    fn test_continuation_wrong_endpoint() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(2, 2)).unwrap();
        let e01 = edge(&model, 0, 1);
        assert_eq!(model.continuation(e01, v(4)), None);
    }

    #[test]
    fn test_continuation_wire_chain() {
        let positions = (0..4).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect();
        let snapshot = MeshSnapshot::new(positions, vec![[0, 1], [1, 2], [2, 3]], vec![]);
        let model: TopologyModel = TopologyModel::build(&snapshot).unwrap();

        assert!(model.is_wire_vertex(v(1)));
        assert!(!model.is_pole(v(1)));
        assert!(model.is_pole(v(0)));
        assert_eq!(model.continuation(EdgeId::new(0), v(1)), Some(EdgeId::new(1)));
        assert_eq!(model.continuation(EdgeId::new(2), v(3)), None);
    }

    #[test]
    fn test_continuation_non_manifold() {
        // Three quads sharing edge 0-1
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let snapshot = MeshSnapshot::from_polygons(
            positions,
            vec![vec![0, 1, 2, 3], vec![1, 0, 5, 4], vec![0, 1, 6, 7]],
        );
        let model: TopologyModel = TopologyModel::build(&snapshot).unwrap();
        let shared = edge(&model, 0, 1);

        assert!(model.is_non_manifold_edge(shared));
        assert_eq!(model.vertex_class(v(0)), VertexClass::NonManifold);
        assert!(model.is_pole(v(0)));
        assert_eq!(model.continuation(shared, v(1)), None);
        assert_eq!(model.continuation(edge(&model, 1, 2), v(1)), None);
    }

    #[test]
    fn test_adjacency_queries() {
        let model: TopologyModel = TopologyModel::build(&quad_cylinder(4, 2)).unwrap();
        let e = model.edge_ids().next().unwrap();
        let [a, b] = model.edge_vertices(e);
        assert_eq!(model.other_vertex(e, a), b);
        assert_eq!(model.edge_between(b, a), Some(e));
        assert_eq!(model.vertex_neighbors(a).count(), model.valence(a));

        let f = model.face_ids().next().unwrap();
        let fe = model.face_edges(f);
        assert_eq!(fe.len(), 4);
        assert_eq!(model.opposite_edge_in_face(f, fe[0]), Some(fe[2]));
        assert!(model.shares_face(fe[0], fe[1]));
        assert!(model.shared_vertex(fe[0], fe[1]).is_some());
        assert_eq!(model.shared_vertex(fe[0], fe[2]), None);
    }

    #[test]
    fn test_edge_direction() {
        let model: TopologyModel = TopologyModel::build(&quad_grid(1, 1)).unwrap();
        let e = edge(&model, 0, 1);
        let d = model.edge_direction(e, v(1));
        assert!((d - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-10);
        assert!((model.edge_length(e) - 1.0).abs() < 1e-10);
    }
}
