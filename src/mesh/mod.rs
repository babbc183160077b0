//! Core mesh data structures.
//!
//! This module provides the read-only topology model every loop algorithm
//! queries, the snapshot type it is built from, and the continuation policy
//! that decides where loops may pass straight through a vertex.
//!
//! # Overview
//!
//! The primary type is [`TopologyModel`], an incidence-list view over a
//! [`MeshSnapshot`]. It handles arbitrary polygons, wire edges and
//! non-manifold edges, and classifies every vertex with a [`VertexClass`].
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an edge
//! - [`FaceId`] - Identifies a face
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` to match the host mesh.
//!
//! # Construction
//!
//! ```
//! use loopsmith::mesh::{MeshSnapshot, TopologyModel};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let snapshot = MeshSnapshot::from_polygons(positions, vec![vec![0, 1, 2, 3]]);
//!
//! let model: TopologyModel = TopologyModel::build(&snapshot).unwrap();
//! assert_eq!(model.num_edges(), 4);
//! ```

mod builder;
mod continuation;
mod index;
pub mod primitives;
mod topology;

pub use builder::MeshSnapshot;
pub use continuation::{ContinuationRule, VertexClass};
pub use index::{EdgeId, FaceId, MeshIndex, VertexId};
pub use topology::{Edge, Face, TopologyModel, Vertex};
