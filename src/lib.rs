//! # Loopsmith
//!
//! Edge-loop topology for polygon meshes: selecting, classifying, resizing and
//! closing loops the way an interactive mesh editor needs them.
//!
//! Loopsmith works on a read-only snapshot of the host's mesh and selection,
//! and returns a new selection together with a short report for the status
//! bar. It never edits geometry.
//!
//! ## Features
//!
//! - **Incidence topology**: arbitrary polygons, wire edges and non-manifold
//!   edges, with type-safe indices over 16-, 32- or 64-bit integers
//! - **Explicit continuation policy**: where a loop may pass straight through a
//!   vertex is decided by a small table per vertex class
//! - **Smart loop selection**: candidate loops through poles, ranked by pole
//!   count and cycled by repeated clicks
//! - **Loop-aware grow/shrink**: boundary loops move outward and inward as a
//!   whole; everything else steps by faces or edges
//! - **Loop closing**: fewest edges first, then the straightest path
//!
//! ## Quick Start
//!
//! ```
//! use loopsmith::prelude::*;
//! use loopsmith::algo::loops::{select_loop, LoopSelectOptions, LoopSession};
//! use loopsmith::algo::resize::{resize, ResizeOptions};
//!
//! // A 6x6 grid of quads
//! let model: TopologyModel = TopologyModel::build(&primitives::quad_grid(6, 6)).unwrap();
//!
//! // Click the edge between (3, 2) and (3, 3)
//! let seed = model.edge_between(VertexId::new(17), VertexId::new(24)).unwrap();
//! let mut session = LoopSession::new();
//! let picked = select_loop(
//!     &model,
//!     &mut session,
//!     &Selection::default(),
//!     seed,
//!     &LoopSelectOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(picked.selection.edges().len(), 6);
//! println!("{}", picked.report);
//!
//! // Grow it
//! let grown = resize(&model, &picked.selection, &ResizeOptions::default()).unwrap();
//! println!("{}", grown.report);
//! ```
//!
//! ## Building Models from Host Data
//!
//! ```
//! use loopsmith::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(2.0, 0.0, 0.0),
//! ];
//!
//! // One quad plus a dangling wire edge
//! let snapshot = MeshSnapshot::from_polygons(positions, vec![vec![0, 1, 2, 3]])
//!     .with_wire_edges([[1, 4]]);
//!
//! let model: TopologyModel = TopologyModel::build(&snapshot).unwrap();
//! assert_eq!(model.num_edges(), 5);
//! assert!(model.is_wire_vertex(VertexId::new(4)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod mesh;
pub mod selection;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types:
///
/// ```
/// use loopsmith::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        primitives, ContinuationRule, EdgeId, FaceId, MeshIndex, MeshSnapshot, TopologyModel, VertexClass,
        VertexId,
    };
    pub use crate::selection::{Outcome, Report, ReportLevel, SelectMode, Selection};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
