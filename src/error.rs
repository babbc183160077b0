//! Error types for loopsmith.
//!
//! Only structurally invalid input is an error. Conditions a user can run into
//! during normal editing (a seed edge without a loop, an ambiguous selection, a
//! shrink that would empty the selection) are reported through
//! [`Report`](crate::selection::Report) instead.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building a topology model or running an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// The snapshot has no vertices, or neither edges nor faces.
    #[error("mesh snapshot is empty")]
    EmptyMesh,

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An edge references an invalid vertex index.
    #[error("edge {edge} references invalid vertex index {vertex}")]
    InvalidEdgeEndpoint {
        /// The edge index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An edge connects a vertex to itself.
    #[error("edge {edge} is degenerate (both endpoints are the same vertex)")]
    DegenerateEdge {
        /// The edge index.
        edge: usize,
    },

    /// Two edges connect the same pair of vertices.
    #[error("edge {edge} duplicates the edge between vertices ({v0}, {v1})")]
    DuplicateEdge {
        /// The duplicate edge index.
        edge: usize,
        /// First vertex of the edge.
        v0: usize,
        /// Second vertex of the edge.
        v1: usize,
    },

    /// A face has fewer than three vertices or repeats a vertex.
    #[error("face {face} is degenerate (fewer than three distinct vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// A face side has no matching entry in the explicit edge list.
    #[error("face {face} uses side ({v0}, {v1}) which is not in the edge list")]
    MissingFaceEdge {
        /// The face index.
        face: usize,
        /// First vertex of the side.
        v0: usize,
        /// Second vertex of the side.
        v1: usize,
    },

    /// The snapshot has more elements than the index type can address.
    #[error("mesh has {count} {kind} elements, more than the index type can address (max index {max})")]
    TooManyElements {
        /// The element kind ("vertex", "edge" or "face").
        kind: &'static str,
        /// Number of elements in the snapshot.
        count: usize,
        /// Largest index the index type can hold.
        max: usize,
    },

    /// A selection or seed references an element outside the snapshot.
    #[error("{kind} {index} does not exist in the mesh snapshot")]
    InvalidElement {
        /// The element kind ("vertex", "edge" or "face").
        kind: &'static str,
        /// The offending index.
        index: usize,
    },

    /// No path connects the two free ends of an open chain.
    #[error("no path connects vertex {from} to vertex {to}")]
    NoPath {
        /// Vertex the search started from.
        from: usize,
        /// Vertex the search tried to reach.
        to: usize,
    },
}

impl MeshError {
    /// Create an invalid element error.
    pub fn invalid_element(kind: &'static str, index: usize) -> Self {
        MeshError::InvalidElement { kind, index }
    }

    /// Returns true if this error describes a malformed snapshot.
    pub fn is_invalid_mesh(&self) -> bool {
        matches!(
            self,
            MeshError::EmptyMesh
                | MeshError::InvalidVertexIndex { .. }
                | MeshError::InvalidEdgeEndpoint { .. }
                | MeshError::DegenerateEdge { .. }
                | MeshError::DuplicateEdge { .. }
                | MeshError::DegenerateFace { .. }
                | MeshError::MissingFaceEdge { .. }
                | MeshError::TooManyElements { .. }
        )
    }
}
