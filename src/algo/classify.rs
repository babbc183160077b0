//! Selection shape classification.
//!
//! Decides whether a selection is loop-like (paths or cycles of edges), a
//! region of faces, or neither. The result is recomputed on every call; nothing
//! is cached between invocations.
//!
//! Rules, first match wins:
//!
//! 1. Face select mode with faces forming one patch: [`SelectionShape::FaceRegion`].
//!    Faces are one patch when they connect through shared edges; touching at a
//!    corner is not enough.
//! 2. Selected edges with at most two per vertex: [`SelectionShape::ClosedLoop`]
//!    when every island is a cycle, otherwise [`SelectionShape::OpenChain`].
//! 3. Branching edges that all border selected faces, and those faces form
//!    one patch: [`SelectionShape::FaceRegion`].
//! 4. Anything else, including lone vertices and scattered faces:
//!    [`SelectionShape::Mixed`].

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use super::loops::Loop;
use crate::mesh::{EdgeId, FaceId, MeshIndex, TopologyModel, VertexId};
use crate::selection::{SelectMode, Selection};

/// Connectivity statistics of the selected edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGraph<I: MeshIndex = u32> {
    islands: Vec<Vec<EdgeId<I>>>,
    endpoints: BTreeSet<VertexId<I>>,
    branches: BTreeSet<VertexId<I>>,
    vertices: BTreeSet<VertexId<I>>,
}

impl<I: MeshIndex> SelectionGraph<I> {
    /// Analyze the selected edges of `selection`.
    pub fn new(model: &TopologyModel<I>, selection: &Selection<I>) -> Self {
        let mut incident: BTreeMap<VertexId<I>, Vec<EdgeId<I>>> = BTreeMap::new();
        for &e in selection.edges() {
            for v in model.edge_vertices(e) {
                incident.entry(v).or_default().push(e);
            }
        }

        let endpoints = incident
            .iter()
            .filter(|(_, edges)| edges.len() == 1)
            .map(|(&v, _)| v)
            .collect();
        let branches = incident
            .iter()
            .filter(|(_, edges)| edges.len() > 2)
            .map(|(&v, _)| v)
            .collect();

        let mut islands = Vec::new();
        let mut searched: HashSet<EdgeId<I>> = HashSet::new();
        for &e in selection.edges() {
            if searched.contains(&e) {
                continue;
            }
            let mut island = Vec::new();
            let mut stack = vec![e];
            searched.insert(e);
            while let Some(current) = stack.pop() {
                island.push(current);
                for v in model.edge_vertices(current) {
                    for &next in incident.get(&v).into_iter().flatten() {
                        if searched.insert(next) {
                            stack.push(next);
                        }
                    }
                }
            }
            island.sort();
            islands.push(island);
        }

        Self {
            islands,
            endpoints,
            branches,
            vertices: selection.vertices().clone(),
        }
    }

    /// Connected groups of selected edges, each sorted.
    pub fn islands(&self) -> &[Vec<EdgeId<I>>] {
        &self.islands
    }

    /// Vertices with exactly one selected edge.
    pub fn endpoints(&self) -> &BTreeSet<VertexId<I>> {
        &self.endpoints
    }

    /// Vertices with more than two selected edges.
    pub fn branches(&self) -> &BTreeSet<VertexId<I>> {
        &self.branches
    }

    /// All selected vertices, including ones without selected edges.
    pub fn vertices(&self) -> &BTreeSet<VertexId<I>> {
        &self.vertices
    }

    /// Returns true if no edges are selected.
    pub fn has_no_edges(&self) -> bool {
        self.islands.is_empty()
    }

    /// Returns true if some island has a free end or a branch.
    pub fn is_open(&self) -> bool {
        !self.endpoints.is_empty() || !self.branches.is_empty()
    }

    /// The free ends that lie on one island, in ascending order.
    pub fn island_endpoints(&self, model: &TopologyModel<I>, island: usize) -> Vec<VertexId<I>> {
        let verts: BTreeSet<VertexId<I>> = self.islands[island]
            .iter()
            .flat_map(|&e| model.edge_vertices(e))
            .collect();
        self.endpoints.iter().copied().filter(|v| verts.contains(v)).collect()
    }
}

/// The shape of a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionShape<I: MeshIndex = u32> {
    /// One or more closed cycles of edges.
    ClosedLoop(Vec<Loop<I>>),
    /// Paths and possibly cycles, at least one path.
    OpenChain(Vec<Loop<I>>),
    /// A patch of selected faces, connected through shared edges.
    FaceRegion(Vec<FaceId<I>>),
    /// Neither loop-like nor a region.
    Mixed,
}

impl<I: MeshIndex> SelectionShape<I> {
    /// Short name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionShape::ClosedLoop(_) => "closed loop",
            SelectionShape::OpenChain(_) => "open chain",
            SelectionShape::FaceRegion(_) => "face region",
            SelectionShape::Mixed => "mixed",
        }
    }
}

/// Classify `selection`.
pub fn classify<I: MeshIndex>(model: &TopologyModel<I>, selection: &Selection<I>) -> SelectionShape<I> {
    let shape = classify_graph(model, selection, &SelectionGraph::new(model, selection));
    log::debug!("selection classified as {}", shape.name());
    shape
}

pub(crate) fn classify_graph<I: MeshIndex>(
    model: &TopologyModel<I>,
    selection: &Selection<I>,
    graph: &SelectionGraph<I>,
) -> SelectionShape<I> {
    let faces = selection.faces();
    if selection.mode() == SelectMode::Face && !faces.is_empty() {
        return if is_patch(model, faces) {
            SelectionShape::FaceRegion(faces.iter().copied().collect())
        } else {
            SelectionShape::Mixed
        };
    }

    if graph.has_no_edges() {
        return SelectionShape::Mixed;
    }

    if graph.branches().is_empty() {
        let loops: Option<Vec<Loop<I>>> = graph
            .islands()
            .iter()
            .map(|island| Loop::from_unordered(model, island))
            .collect();
        return match loops {
            Some(loops) if loops.iter().all(Loop::is_closed) => SelectionShape::ClosedLoop(loops),
            Some(loops) => SelectionShape::OpenChain(loops),
            None => SelectionShape::Mixed,
        };
    }

    let enclosed = selection
        .edges()
        .iter()
        .all(|&e| model.edge_faces(e).iter().any(|f| faces.contains(f)));
    if enclosed && is_patch(model, faces) {
        return SelectionShape::FaceRegion(faces.iter().copied().collect());
    }

    SelectionShape::Mixed
}

/// Returns true if `faces` is non-empty and connected through shared edges.
fn is_patch<I: MeshIndex>(model: &TopologyModel<I>, faces: &BTreeSet<FaceId<I>>) -> bool {
    let Some(&first) = faces.iter().next() else {
        return false;
    };
    let mut reached: HashSet<FaceId<I>> = HashSet::from([first]);
    let mut queue = VecDeque::from([first]);
    while let Some(f) = queue.pop_front() {
        for &e in model.face_edges(f) {
            for &g in model.edge_faces(e) {
                if faces.contains(&g) && reached.insert(g) {
                    queue.push_back(g);
                }
            }
        }
    }
    reached.len() == faces.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::primitives::quad_grid;

    fn v(i: usize) -> VertexId {
        VertexId::new(i)
    }

    fn path(model: &TopologyModel, verts: &[usize]) -> Vec<EdgeId> {
        verts
            .windows(2)
            .map(|w| model.edge_between(v(w[0]), v(w[1])).unwrap())
            .collect()
    }

    fn grid() -> TopologyModel {
        // 4x4 quads: vertex (i, j) = j * 5 + i
        TopologyModel::build(&quad_grid(4, 4)).unwrap()
    }

    #[test]
    fn test_six_edge_cycle_is_closed_loop() {
        let model = grid();
        // Around a 2x1 block of quads
        let edges = path(&model, &[6, 7, 8, 13, 12, 11, 6]);
        assert_eq!(edges.len(), 6);
        let sel = Selection::from_edges(&model, SelectMode::Edge, edges);

        match classify(&model, &sel) {
            SelectionShape::ClosedLoop(loops) => {
                assert_eq!(loops.len(), 1);
                assert_eq!(loops[0].len(), 6);
                assert!(loops[0].is_closed());
            }
            other => panic!("expected a closed loop, got {:?}", other),
        }
    }

    #[test]
    fn test_four_faces_is_face_region() {
        let model = grid();
        let block = [0, 1, 4, 5].map(FaceId::new);

        let sel = Selection::from_faces(&model, SelectMode::Face, block);
        assert_eq!(classify(&model, &sel), SelectionShape::FaceRegion(block.to_vec()));

        // Same faces picked in edge mode: branching edges, all enclosed
        let sel = Selection::from_faces(&model, SelectMode::Edge, block);
        assert_eq!(classify(&model, &sel), SelectionShape::FaceRegion(block.to_vec()));
    }

    #[test]
    fn test_scattered_faces_are_mixed() {
        let model = grid();
        // Diagonal neighbors touch at vertex 6 only
        let diagonal = [0, 5].map(FaceId::new);
        let sel = Selection::from_faces(&model, SelectMode::Face, diagonal);
        assert_eq!(classify(&model, &sel), SelectionShape::Mixed);

        let sel = Selection::from_faces(&model, SelectMode::Edge, diagonal);
        assert_eq!(classify(&model, &sel), SelectionShape::Mixed);

        let apart = [0, 2].map(FaceId::new);
        let sel = Selection::from_faces(&model, SelectMode::Face, apart);
        assert_eq!(classify(&model, &sel), SelectionShape::Mixed);

        // Sharing an edge makes one patch
        let side_by_side = [0, 1].map(FaceId::new);
        let sel = Selection::from_faces(&model, SelectMode::Face, side_by_side);
        assert_eq!(classify(&model, &sel), SelectionShape::FaceRegion(side_by_side.to_vec()));
    }

    #[test]
    fn test_open_chain() {
        let model = grid();
        let sel = Selection::from_edges(&model, SelectMode::Edge, path(&model, &[6, 7, 8]));
        match classify(&model, &sel) {
            SelectionShape::OpenChain(loops) => {
                assert_eq!(loops.len(), 1);
                assert_eq!(loops[0].vertices(), &[v(6), v(7), v(8)]);
            }
            other => panic!("expected an open chain, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_plus_path_is_open() {
        let model = grid();
        let mut edges = path(&model, &[6, 7, 12, 11, 6]);
        edges.extend(path(&model, &[18, 19]));
        let sel = Selection::from_edges(&model, SelectMode::Edge, edges);
        assert!(matches!(classify(&model, &sel), SelectionShape::OpenChain(l) if l.len() == 2));
    }

    #[test]
    fn test_lone_vertex_and_branch_are_mixed() {
        let model = grid();
        let sel = Selection::from_vertices(&model, SelectMode::Vertex, [v(12)]);
        assert_eq!(classify(&model, &sel), SelectionShape::Mixed);

        // A plus shape around vertex 12 with no faces
        let mut edges = path(&model, &[11, 12, 13]);
        edges.extend(path(&model, &[7, 12, 17]));
        let sel = Selection::from_edges(&model, SelectMode::Edge, edges);
        assert_eq!(classify(&model, &sel), SelectionShape::Mixed);
    }

    #[test]
    fn test_graph_statistics() {
        let model = grid();
        let mut edges = path(&model, &[0, 1, 2]);
        edges.extend(path(&model, &[11, 12, 13]));
        edges.extend(path(&model, &[7, 12]));
        let sel = Selection::from_edges(&model, SelectMode::Edge, edges);
        let graph = SelectionGraph::new(&model, &sel);

        assert_eq!(graph.islands().len(), 2);
        let branches: BTreeSet<VertexId> = [v(12)].into_iter().collect();
        assert_eq!(graph.branches(), &branches);
        assert_eq!(graph.endpoints().len(), 5);
        assert_eq!(graph.island_endpoints(&model, 0), vec![v(0), v(2)]);
        assert!(graph.is_open());
        assert_eq!(graph.vertices().len(), 7);
    }
}
