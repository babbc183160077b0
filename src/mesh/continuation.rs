//! Loop continuation policy.
//!
//! Whether a loop may pass straight through a vertex depends only on the
//! vertex's local pattern: the face counts of its incident edges and its
//! valence. That pattern is reduced to a [`VertexClass`], and each class maps
//! to one row of the policy table:
//!
//! | Class | Regular valence | Rule |
//! |-------|-----------------|------|
//! | [`Interior`](VertexClass::Interior) | 4 | [`Opposite`](ContinuationRule::Opposite) |
//! | [`Boundary`](VertexClass::Boundary) | 3 | [`Opposite`](ContinuationRule::Opposite) |
//! | [`Wire`](VertexClass::Wire) | 2 | [`PassThrough`](ContinuationRule::PassThrough) |
//! | [`NonManifold`](VertexClass::NonManifold) | - | [`Stop`](ContinuationRule::Stop) |
//! | [`Isolated`](VertexClass::Isolated) | - | [`Stop`](ContinuationRule::Stop) |
//!
//! A vertex whose valence differs from its class's regular valence is a pole.
//! At a boundary vertex the opposite rule only succeeds for an incoming
//! boundary edge, so loops follow open borders but never leave the mesh.

/// Local topological pattern of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexClass {
    /// No incident edges.
    Isolated,
    /// Every incident edge is a wire edge (no faces).
    Wire,
    /// Every incident edge has exactly two faces.
    Interior,
    /// At least one incident edge has exactly one face, none has more than two.
    Boundary,
    /// An incident edge has more than two faces, or wire and face edges meet.
    NonManifold,
}

/// How a loop continues through a regular vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContinuationRule {
    /// Take the unique incident edge that shares no face with the incoming edge.
    Opposite,
    /// Take the only other incident edge.
    PassThrough,
    /// The loop ends here.
    Stop,
}

impl VertexClass {
    /// Classify a vertex from the face counts of its incident edges.
    pub fn from_face_counts<T: IntoIterator<Item = usize>>(face_counts: T) -> Self {
        let mut any = false;
        let mut wire = false;
        let mut boundary = false;
        let mut faced = false;

        for count in face_counts {
            any = true;
            match count {
                0 => wire = true,
                1 => {
                    boundary = true;
                    faced = true;
                }
                2 => faced = true,
                _ => return VertexClass::NonManifold,
            }
        }

        match (any, wire, faced, boundary) {
            (false, _, _, _) => VertexClass::Isolated,
            (true, true, false, _) => VertexClass::Wire,
            (true, true, true, _) => VertexClass::NonManifold,
            (true, false, _, true) => VertexClass::Boundary,
            (true, false, _, false) => VertexClass::Interior,
        }
    }

    /// The valence at which a vertex of this class lets loops pass through.
    pub fn regular_valence(self) -> Option<usize> {
        match self {
            VertexClass::Interior => Some(4),
            VertexClass::Boundary => Some(3),
            VertexClass::Wire => Some(2),
            VertexClass::NonManifold | VertexClass::Isolated => None,
        }
    }

    /// The continuation rule applied at a regular vertex of this class.
    pub fn rule(self) -> ContinuationRule {
        match self {
            VertexClass::Interior | VertexClass::Boundary => ContinuationRule::Opposite,
            VertexClass::Wire => ContinuationRule::PassThrough,
            VertexClass::NonManifold | VertexClass::Isolated => ContinuationRule::Stop,
        }
    }

    /// Returns true if a vertex of this class with the given valence is a pole.
    pub fn is_pole(self, valence: usize) -> bool {
        self.regular_valence() != Some(valence)
    }

    /// The rule that actually applies at a vertex with the given valence.
    pub fn rule_for(self, valence: usize) -> ContinuationRule {
        if self.is_pole(valence) {
            ContinuationRule::Stop
        } else {
            self.rule()
        }
    }
}
