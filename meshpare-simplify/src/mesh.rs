//! Working mesh store for edge-collapse simplification
//!
//! [`CollapseMesh`] keeps the vertex/face/adjacency graph in flat index-based
//! arrays with soft-delete flags. Collapses relabel indices in place; storage
//! is only compacted once, by the final re-index in [`CollapseMesh::into_triangle_mesh`].

use std::collections::{BTreeSet, HashSet};

use meshpare_core::{Matrix4, Point3f, TriangleMesh};

use crate::quadric::{face_plane, plane_quadric};

const UNMAPPED: usize = usize::MAX;

/// Mutable vertex/face/adjacency store driven by the simplifier.
///
/// Vertices and faces are soft-deleted: a removed entry keeps its slot so
/// that indices held elsewhere (faces, heap records) stay valid. Neighbor
/// sets are ordered ([`BTreeSet`]), which makes re-seeding after a collapse
/// iterate in a deterministic order.
pub struct CollapseMesh {
    pub(crate) positions: Vec<Point3f>,
    pub(crate) vertex_removed: Vec<bool>,
    pub(crate) quadrics: Vec<Matrix4<f64>>,
    pub(crate) faces: Vec<[usize; 3]>,
    pub(crate) face_removed: Vec<bool>,
    pub(crate) neighbors: Vec<BTreeSet<usize>>,
    /// Canonical (small, large) seed edges, deduplicated, in face order.
    pub(crate) edges: Vec<(usize, usize)>,
    /// Count of non-removed faces, decremented once per face marked removed.
    pub(crate) active_faces: usize,
}

impl CollapseMesh {
    /// Build the working store from an exchange mesh.
    ///
    /// Copies positions and faces, derives the adjacency sets and the seed
    /// edge list from the faces, and zeroes all quadrics. The edge list built
    /// here is the single source used to seed the collapse queue.
    pub fn from_triangle_mesh(mesh: &TriangleMesh) -> Self {
        let nv = mesh.vertices.len();
        let mut neighbors = vec![BTreeSet::new(); nv];
        let mut edges = Vec::new();
        let mut seen: HashSet<(usize, usize)> = HashSet::new();

        for face in &mesh.faces {
            for i in 0..3 {
                let a = face[i];
                let b = face[(i + 1) % 3];
                if a == b {
                    continue;
                }
                neighbors[a].insert(b);
                neighbors[b].insert(a);

                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    edges.push(key);
                }
            }
        }

        Self {
            positions: mesh.vertices.clone(),
            vertex_removed: vec![false; nv],
            quadrics: vec![Matrix4::zeros(); nv],
            faces: mesh.faces.clone(),
            face_removed: vec![false; mesh.faces.len()],
            neighbors,
            edges,
            active_faces: mesh.faces.len(),
        }
    }

    /// Number of non-removed faces.
    pub fn active_face_count(&self) -> usize {
        self.active_faces
    }

    /// Accumulate the quadric of every non-removed vertex from the planes of
    /// its non-removed incident faces.
    ///
    /// Faces with area below 1e-9 contribute nothing. Called once at the
    /// start of simplification; afterwards each collapse maintains the sums
    /// by absorbing the removed endpoint's quadric.
    pub fn compute_vertex_quadrics(&mut self) {
        for v in 0..self.quadrics.len() {
            if !self.vertex_removed[v] {
                self.quadrics[v] = Matrix4::zeros();
            }
        }

        for fi in 0..self.faces.len() {
            if self.face_removed[fi] {
                continue;
            }
            let [a, b, c] = self.faces[fi];
            let plane = match face_plane(&self.positions[a], &self.positions[b], &self.positions[c])
            {
                Some(plane) => plane,
                None => continue,
            };
            let kp = plane_quadric(&plane);
            self.quadrics[a] += kp;
            self.quadrics[b] += kp;
            self.quadrics[c] += kp;
        }
    }

    /// Compact the store into an exchange mesh, discarding removed vertices
    /// and faces.
    ///
    /// Surviving vertices keep their original relative order; every surviving
    /// face is rewritten through the old-to-new index map.
    pub fn into_triangle_mesh(self) -> TriangleMesh {
        let mut old_to_new = vec![UNMAPPED; self.positions.len()];
        let mut vertices = Vec::new();

        for (i, &removed) in self.vertex_removed.iter().enumerate() {
            if !removed {
                old_to_new[i] = vertices.len();
                vertices.push(self.positions[i]);
            }
        }

        let mut faces = Vec::new();
        for (fi, face) in self.faces.iter().enumerate() {
            if self.face_removed[fi] {
                continue;
            }
            faces.push([
                old_to_new[face[0]],
                old_to_new[face[1]],
                old_to_new[face[2]],
            ]);
        }

        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }
}
