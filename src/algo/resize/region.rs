//! Region stepping primitives.
//!
//! Growing and shrinking vertex and face sets by one step, and converting
//! between a boundary loop and the region of faces it encloses.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::mesh::{EdgeId, FaceId, MeshIndex, TopologyModel, VertexId};

/// Which neighbors one step reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Everything sharing a face.
    Face,
    /// Everything sharing an edge (vertices) or an edge (faces).
    Edge,
}

/// Vertices reachable in one step from `verts`, including `verts`.
///
/// Wire edges are always followed.
pub fn grow_vertices<I: MeshIndex>(
    model: &TopologyModel<I>,
    verts: &BTreeSet<VertexId<I>>,
    step: Step,
) -> BTreeSet<VertexId<I>> {
    let mut out = verts.clone();
    for &v in verts {
        out.extend(model.vertex_neighbors(v));
        if step == Step::Face {
            for &f in model.vertex_faces(v) {
                out.extend(model.face_vertices(f).iter().copied());
            }
        }
    }
    out
}

/// `verts` minus every vertex one step away from an unselected vertex.
pub fn shrink_vertices<I: MeshIndex>(
    model: &TopologyModel<I>,
    verts: &BTreeSet<VertexId<I>>,
    step: Step,
) -> BTreeSet<VertexId<I>> {
    verts
        .iter()
        .copied()
        .filter(|&v| {
            let edges_inside = model.vertex_neighbors(v).all(|n| verts.contains(&n));
            let faces_inside = step == Step::Edge
                || model
                    .vertex_faces(v)
                    .iter()
                    .all(|&f| model.face_vertices(f).iter().all(|u| verts.contains(u)));
            edges_inside && faces_inside
        })
        .collect()
}

fn face_neighbors<I: MeshIndex>(
    model: &TopologyModel<I>,
    f: FaceId<I>,
    step: Step,
) -> impl Iterator<Item = FaceId<I>> + '_ {
    let touching: Vec<FaceId<I>> = match step {
        Step::Face => model
            .face_vertices(f)
            .iter()
            .flat_map(|&v| model.vertex_faces(v).iter().copied())
            .collect(),
        Step::Edge => model
            .face_edges(f)
            .iter()
            .flat_map(|&e| model.edge_faces(e).iter().copied())
            .collect(),
    };
    touching.into_iter().filter(move |&g| g != f)
}

/// Faces reachable in one step from `faces`, including `faces`.
///
/// A face step reaches faces sharing a vertex, an edge step faces sharing an
/// edge.
pub fn grow_faces<I: MeshIndex>(
    model: &TopologyModel<I>,
    faces: &BTreeSet<FaceId<I>>,
    step: Step,
) -> BTreeSet<FaceId<I>> {
    let mut out = faces.clone();
    for &f in faces {
        out.extend(face_neighbors(model, f, step));
    }
    out
}

/// `faces` minus every face one step away from an unselected face.
///
/// The open border of the mesh does not count as unselected.
pub fn shrink_faces<I: MeshIndex>(
    model: &TopologyModel<I>,
    faces: &BTreeSet<FaceId<I>>,
    step: Step,
) -> BTreeSet<FaceId<I>> {
    faces
        .iter()
        .copied()
        .filter(|&f| face_neighbors(model, f, step).all(|g| faces.contains(&g)))
        .collect()
}

/// Faces whose vertices are all in `verts`.
pub fn faces_within<I: MeshIndex>(model: &TopologyModel<I>, verts: &BTreeSet<VertexId<I>>) -> BTreeSet<FaceId<I>> {
    verts
        .iter()
        .flat_map(|&v| model.vertex_faces(v).iter().copied())
        .filter(|&f| model.face_vertices(f).iter().all(|v| verts.contains(v)))
        .collect()
}

/// Vertices of `faces`.
pub fn region_vertices<I: MeshIndex>(model: &TopologyModel<I>, faces: &BTreeSet<FaceId<I>>) -> BTreeSet<VertexId<I>> {
    faces
        .iter()
        .flat_map(|&f| model.face_vertices(f).iter().copied())
        .collect()
}

/// The boundary edges of a face region.
///
/// An edge is on the boundary when some but not all of its faces are in the
/// region, or when it is an open edge of a region face.
pub fn region_to_loop<I: MeshIndex>(model: &TopologyModel<I>, faces: &BTreeSet<FaceId<I>>) -> BTreeSet<EdgeId<I>> {
    faces
        .iter()
        .flat_map(|&f| model.face_edges(f).iter().copied())
        .filter(|&e| {
            let sides = model.edge_faces(e);
            sides.len() == 1 || !sides.iter().all(|f| faces.contains(f))
        })
        .collect()
}

/// Edges whose endpoints are both in `verts`.
pub fn edges_within<I: MeshIndex>(model: &TopologyModel<I>, verts: &BTreeSet<VertexId<I>>) -> BTreeSet<EdgeId<I>> {
    verts
        .iter()
        .flat_map(|&v| model.vertex_edges(v).iter().copied())
        .filter(|&e| model.edge_vertices(e).iter().all(|v| verts.contains(v)))
        .collect()
}

/// The regions enclosed by closed edge islands.
///
/// Faces are split into components by the selected edges. A component
/// encloses an island when it lies on only one side of every island edge and
/// reaches no unselected open border of the mesh. For each island the
/// smallest enclosing component is taken (ties go to the component with the
/// lowest face), and the union of those components is returned.
///
/// An island that encloses nothing, such as a ring around a torus or around
/// the middle of an open tube, contributes no faces.
pub fn loop_to_region<I: MeshIndex>(
    model: &TopologyModel<I>,
    islands: &[Vec<EdgeId<I>>],
) -> BTreeSet<FaceId<I>> {
    let cut: HashSet<EdgeId<I>> = islands.iter().flatten().copied().collect();
    let components = face_components(model, &cut);

    let mut region = BTreeSet::new();
    for island in islands {
        let mut touching = BTreeSet::new();
        let mut both_sides = BTreeSet::new();
        for &e in island {
            let labels: Vec<usize> = model.edge_faces(e).iter().map(|f| components.label[f.index()]).collect();
            touching.extend(labels.iter().copied());
            if let [a, b] = labels[..] {
                if a == b {
                    both_sides.insert(a);
                }
            }
        }

        let best = touching
            .into_iter()
            .filter(|c| !both_sides.contains(c) && !components.open[*c])
            .min_by_key(|&c| {
                let faces = &components.members[c];
                (faces.len(), faces.first().copied())
            });

        if let Some(c) = best {
            region.extend(components.members[c].iter().copied());
        }
    }
    region
}

struct Components<I: MeshIndex> {
    label: Vec<usize>,
    members: Vec<Vec<FaceId<I>>>,
    /// Whether the component reaches an open border edge outside the cut.
    open: Vec<bool>,
}

/// Flood-fill faces across edges not in `cut`.
fn face_components<I: MeshIndex>(model: &TopologyModel<I>, cut: &HashSet<EdgeId<I>>) -> Components<I> {
    let mut label = vec![usize::MAX; model.num_faces()];
    let mut members = Vec::new();
    let mut open = Vec::new();

    for seed in model.face_ids() {
        if label[seed.index()] != usize::MAX {
            continue;
        }
        let id = members.len();
        let mut faces = Vec::new();
        let mut reaches_border = false;
        let mut queue = VecDeque::from([seed]);
        label[seed.index()] = id;

        while let Some(f) = queue.pop_front() {
            faces.push(f);
            for &e in model.face_edges(f) {
                if cut.contains(&e) {
                    continue;
                }
                let sides = model.edge_faces(e);
                if sides.len() == 1 {
                    reaches_border = true;
                }
                for &g in sides {
                    if label[g.index()] == usize::MAX {
                        label[g.index()] = id;
                        queue.push_back(g);
                    }
                }
            }
        }

        faces.sort();
        members.push(faces);
        open.push(reaches_border);
    }

    Components { label, members, open }
}
