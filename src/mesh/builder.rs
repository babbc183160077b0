//! Mesh snapshot input and topology construction.
//!
//! A [`MeshSnapshot`] is the host's view of its mesh at the start of an
//! invocation: vertex positions, an explicit edge list and faces given as
//! vertex cycles. Edge and face identities are the positions in those lists,
//! so selections exchanged with the host use the host's own numbering.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use nalgebra::Point3;

use super::continuation::VertexClass;
use super::index::{EdgeId, FaceId, MeshIndex, VertexId};
use super::topology::{Edge, Face, TopologyModel, Vertex};
use crate::error::{MeshError, Result};

/// An immutable description of a polygon mesh supplied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshSnapshot {
    /// Vertex positions, indexed by vertex id.
    pub positions: Vec<Point3<f64>>,

    /// Edges as pairs of vertex indices, indexed by edge id.
    pub edges: Vec<[usize; 2]>,

    /// Faces as ordered vertex cycles, indexed by face id.
    pub faces: Vec<Vec<usize>>,
}

impl MeshSnapshot {
    /// Create a snapshot from explicit vertex, edge and face lists.
    pub fn new(positions: Vec<Point3<f64>>, edges: Vec<[usize; 2]>, faces: Vec<Vec<usize>>) -> Self {
        Self {
            positions,
            edges,
            faces,
        }
    }

    /// Create a snapshot from polygons, deriving the edge list.
    ///
    /// Edges are numbered in the order their first face side is seen.
    ///
    /// # Example
    /// ```
    /// use loopsmith::mesh::MeshSnapshot;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let snapshot = MeshSnapshot::from_polygons(positions, vec![vec![0, 1, 2, 3]]);
    /// assert_eq!(snapshot.edges, vec![[0, 1], [1, 2], [2, 3], [3, 0]]);
    /// ```
    pub fn from_polygons(positions: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Self {
        let mut edges = Vec::new();
        let mut seen: HashMap<(usize, usize), usize> = HashMap::new();

        for face in &faces {
            for (i, &a) in face.iter().enumerate() {
                let b = face[(i + 1) % face.len()];
                let key = (a.min(b), a.max(b));
                if !seen.contains_key(&key) {
                    seen.insert(key, edges.len());
                    edges.push([a, b]);
                }
            }
        }

        Self {
            positions,
            edges,
            faces,
        }
    }

    /// Create a snapshot from quad faces, deriving the edge list.
    pub fn from_quads(positions: Vec<Point3<f64>>, quads: &[[usize; 4]]) -> Self {
        Self::from_polygons(positions, quads.iter().map(|q| q.to_vec()).collect())
    }

    /// Append loose (wire) edges that belong to no face.
    pub fn with_wire_edges<T: IntoIterator<Item = [usize; 2]>>(mut self, edges: T) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
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
}

/// Build a topology model from a snapshot, validating every reference.
pub(crate) fn build_topology<I: MeshIndex>(snapshot: &MeshSnapshot) -> Result<TopologyModel<I>> {
    let num_vertices = snapshot.positions.len();
    if num_vertices == 0 || (snapshot.edges.is_empty() && snapshot.faces.is_empty()) {
        return Err(MeshError::EmptyMesh);
    }

    let max = I::MAX.to_usize();
    for (kind, count) in [
        ("vertex", num_vertices),
        ("edge", snapshot.edges.len()),
        ("face", snapshot.faces.len()),
    ] {
        if count.saturating_sub(1) > max {
            return Err(MeshError::TooManyElements { kind, count, max });
        }
    }

    // Validate faces
    for (fi, face) in snapshot.faces.iter().enumerate() {
        if let Some(&vi) = face.iter().find(|&&vi| vi >= num_vertices) {
            return Err(MeshError::InvalidVertexIndex { face: fi, vertex: vi });
        }
        if face.len() < 3 {
            return Err(MeshError::DegenerateFace { face: fi });
        }
        let mut sorted = face.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    // Validate edges and index them by unordered vertex pair
    let mut edge_map: HashMap<(usize, usize), usize> = HashMap::with_capacity(snapshot.edges.len());
    for (ei, &[a, b]) in snapshot.edges.iter().enumerate() {
        for v in [a, b] {
            if v >= num_vertices {
                return Err(MeshError::InvalidEdgeEndpoint { edge: ei, vertex: v });
            }
        }
        if a == b {
            return Err(MeshError::DegenerateEdge { edge: ei });
        }
        let key = (a.min(b), a.max(b));
        if edge_map.insert(key, ei).is_some() {
            return Err(MeshError::DuplicateEdge {
                edge: ei,
                v0: key.0,
                v1: key.1,
            });
        }
    }

    let mut vertices: Vec<Vertex<I>> = snapshot
        .positions
        .iter()
        .map(|&p| Vertex::new(p))
        .collect();

    let mut edges: Vec<Edge<I>> = snapshot
        .edges
        .iter()
        .map(|&[a, b]| Edge::new(VertexId::new(a), VertexId::new(b)))
        .collect();

    for (ei, &[a, b]) in snapshot.edges.iter().enumerate() {
        vertices[a].edges.push(EdgeId::new(ei));
        vertices[b].edges.push(EdgeId::new(ei));
    }

    // Resolve face sides to edges
    let mut faces: Vec<Face<I>> = Vec::with_capacity(snapshot.faces.len());
    for (fi, face) in snapshot.faces.iter().enumerate() {
        let face_id = FaceId::<I>::new(fi);
        let mut face_edges = Vec::with_capacity(face.len());

        for (i, &a) in face.iter().enumerate() {
            let b = face[(i + 1) % face.len()];
            let ei = *edge_map
                .get(&(a.min(b), a.max(b)))
                .ok_or(MeshError::MissingFaceEdge { face: fi, v0: a, v1: b })?;
            face_edges.push(EdgeId::new(ei));
            edges[ei].faces.push(face_id);
            vertices[a].faces.push(face_id);
        }

        faces.push(Face {
            vertices: face.iter().map(|&v| VertexId::new(v)).collect(),
            edges: face_edges,
        });
    }

    let classes: Vec<VertexClass> = vertices
        .iter()
        .map(|v| VertexClass::from_face_counts(v.edges.iter().map(|e| edges[e.index()].faces.len())))
        .collect();

    let signature = topology_signature(snapshot);

    log::debug!(
        "built topology: {} vertices, {} edges, {} faces (signature {:016x})",
        vertices.len(),
        edges.len(),
        faces.len(),
        signature
    );

    Ok(TopologyModel::from_parts(vertices, edges, faces, classes, signature))
}

/// Hash the connectivity of a snapshot. Positions are ignored, so moving
/// vertices does not count as a topology change.
fn topology_signature(snapshot: &MeshSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    snapshot.positions.len().hash(&mut hasher);
    snapshot.edges.hash(&mut hasher);
    snapshot.faces.hash(&mut hasher);
    hasher.finish()
}
