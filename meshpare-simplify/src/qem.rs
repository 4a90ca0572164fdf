//! Quadric-error-metric edge-collapse simplification
//!
//! Drives a lazy min-heap of edge-collapse candidates against the mutating
//! [`CollapseMesh`]: rather than re-keying the queue when a collapse changes
//! its neighborhood, fresh records are pushed for every touched edge and
//! stale ones are filtered when popped.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use meshpare_core::{Error, Point3f, Result, TriangleMesh};
use tracing::{debug, info, warn};

use crate::mesh::CollapseMesh;
use crate::quadric::collapse_cost;
use crate::MeshSimplifier;

// ============================================================
// Edge candidates in the priority queue
// ============================================================

/// One entry in the collapse queue. The same logical edge may appear several
/// times with different costs; only the freshest state matters, enforced at
/// pop time.
#[derive(Debug, Clone)]
struct EdgeCandidate {
    v0: usize,
    v1: usize,
    cost: f64,
    /// Push order, used to break cost ties first-pushed-first-popped.
    seq: u64,
}

impl PartialEq for EdgeCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cost.total_cmp(&other.cost) == Ordering::Equal && self.seq == other.seq
    }
}
impl Eq for EdgeCandidate {}

impl PartialOrd for EdgeCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: smallest cost first, earliest push wins ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ============================================================
// Validity gate
// ============================================================

/// Screen a candidate collapse of (`v_a`, `v_b`) onto `new_pos` for manifold
/// violations and normal flips.
///
/// The manifold screen rejects when the endpoints share more than two
/// neighbors: on a closed 2-manifold an interior edge has exactly two
/// opposite vertices, a boundary edge one, so a third common neighbor means
/// the collapse would pinch the surface.
///
/// The normal-flip screen previews every face touching either endpoint with
/// the collapse applied. Faces that preview to a sliver (area under 1e-12)
/// are skipped, since the executor removes them anyway. Any other face whose
/// normal inverts past a -0.001 tolerance rejects the collapse; the slack
/// admits slight rotations in nearly flat neighborhoods.
pub(crate) fn is_valid_pair(
    mesh: &CollapseMesh,
    v_a: usize,
    v_b: usize,
    new_pos: Point3f,
) -> bool {
    if v_a >= mesh.positions.len() || v_b >= mesh.positions.len() {
        return false;
    }
    if mesh.vertex_removed[v_a] || mesh.vertex_removed[v_b] {
        return false;
    }

    let common = mesh.neighbors[v_a]
        .intersection(&mesh.neighbors[v_b])
        .count();
    if common > 2 {
        return false;
    }

    for fi in 0..mesh.faces.len() {
        if mesh.face_removed[fi] {
            continue;
        }
        let face = mesh.faces[fi];
        if !face.contains(&v_a) && !face.contains(&v_b) {
            continue;
        }

        let old = face.map(|v| mesh.positions[v]);
        let old_normal = (old[1] - old[0]).cross(&(old[2] - old[0]));

        let new = face.map(|v| {
            if v == v_a || v == v_b {
                new_pos
            } else {
                mesh.positions[v]
            }
        });
        let new_normal = (new[1] - new[0]).cross(&(new[2] - new[0]));

        if new_normal.norm() < 1e-12 {
            continue;
        }
        if old_normal.dot(&new_normal) < -0.001 {
            return false;
        }
    }

    true
}

// ============================================================
// Collapse executor
// ============================================================

/// Apply one validated collapse: merge `v_b` into `v_a` at `new_pos`.
///
/// `v_a` absorbs `v_b`'s quadric, faces are relabeled in place, faces whose
/// corners coincide after relabeling are marked removed, and `v_b`'s
/// neighbors migrate to `v_a`.
pub(crate) fn collapse_edge(mesh: &mut CollapseMesh, v_a: usize, v_b: usize, new_pos: Point3f) {
    mesh.positions[v_a] = new_pos;
    let absorbed = mesh.quadrics[v_b];
    mesh.quadrics[v_a] += absorbed;
    mesh.vertex_removed[v_b] = true;

    for fi in 0..mesh.faces.len() {
        if mesh.face_removed[fi] {
            continue;
        }
        let mut face = mesh.faces[fi];
        let mut changed = false;
        for corner in face.iter_mut() {
            if *corner == v_b {
                *corner = v_a;
                changed = true;
            }
        }
        if changed {
            mesh.faces[fi] = face;
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                mesh.face_removed[fi] = true;
                mesh.active_faces -= 1;
            }
        }
    }

    let migrated: Vec<usize> = mesh.neighbors[v_b]
        .iter()
        .copied()
        .filter(|&n| n != v_a)
        .collect();
    for n in migrated {
        mesh.neighbors[n].remove(&v_b);
        mesh.neighbors[n].insert(v_a);
        mesh.neighbors[v_a].insert(n);
    }
    mesh.neighbors[v_a].remove(&v_b);
    mesh.neighbors[v_b].clear();
}

/// Push freshly costed records for every edge on the 1-ring of `v_a`.
///
/// Old records for the same edges stay in the heap; they are filtered out
/// lazily when popped.
fn reseed_vertex_edges(
    mesh: &CollapseMesh,
    v_a: usize,
    heap: &mut BinaryHeap<EdgeCandidate>,
    seq: &mut u64,
) {
    for &n in &mesh.neighbors[v_a] {
        let combined = mesh.quadrics[v_a] + mesh.quadrics[n];
        let candidate = collapse_cost(&combined, &mesh.positions[v_a], &mesh.positions[n]);
        heap.push(EdgeCandidate {
            v0: v_a,
            v1: n,
            cost: candidate.cost,
            seq: *seq,
        });
        *seq += 1;
    }
}

// ============================================================
// Simplifier driver
// ============================================================

/// Result of one simplification run.
#[derive(Debug, Clone)]
pub struct SimplifyOutcome {
    /// The simplified, re-indexed mesh.
    pub mesh: TriangleMesh,
    /// Number of faces in the input mesh.
    pub original_faces: usize,
    /// Number of faces in the output mesh.
    pub final_faces: usize,
    /// Number of edge collapses performed.
    pub collapses_performed: usize,
    /// Number of popped candidates the validity gate rejected.
    pub collapses_rejected: usize,
}

impl SimplifyOutcome {
    /// Fraction of faces removed.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_faces == 0 {
            0.0
        } else {
            (1.0 - self.final_faces as f64 / self.original_faces as f64) * 100.0
        }
    }
}

impl std::fmt::Display for SimplifyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "simplified {} -> {} faces ({:.1}% reduction, {} collapses, {} rejected)",
            self.original_faces,
            self.final_faces,
            self.reduction_percent(),
            self.collapses_performed,
            self.collapses_rejected
        )
    }
}

/// Quadric-error-metric edge-collapse simplifier.
///
/// Runs are deterministic for a given input mesh and target: the queue is
/// seeded in edge-list order and equal costs pop in push order.
#[derive(Debug, Default)]
pub struct QemSimplifier;

impl QemSimplifier {
    pub fn new() -> Self {
        Self
    }

    /// Collapse edges until at most `target_faces` faces remain, then
    /// re-index.
    ///
    /// If the queue drains before the target is reached (every remaining
    /// candidate is gated off), the run ends normally with whatever face
    /// count remains, which the outcome reports.
    pub fn simplify_to_face_count(
        &self,
        mesh: &TriangleMesh,
        target_faces: usize,
    ) -> Result<SimplifyOutcome> {
        let original_faces = mesh.face_count();

        let mut cm = CollapseMesh::from_triangle_mesh(mesh);
        cm.compute_vertex_quadrics();

        info!(
            original = original_faces,
            target = target_faces,
            "starting mesh simplification"
        );

        let mut heap: BinaryHeap<EdgeCandidate> = BinaryHeap::new();
        let mut seq = 0u64;
        for &(a, b) in &cm.edges {
            let combined = cm.quadrics[a] + cm.quadrics[b];
            let candidate = collapse_cost(&combined, &cm.positions[a], &cm.positions[b]);
            heap.push(EdgeCandidate {
                v0: a,
                v1: b,
                cost: candidate.cost,
                seq,
            });
            seq += 1;
        }

        let mut collapses_performed = 0usize;
        let mut collapses_rejected = 0usize;

        while cm.active_face_count() > target_faces {
            let Some(record) = heap.pop() else {
                warn!(
                    active = cm.active_face_count(),
                    target = target_faces,
                    "collapse queue exhausted before reaching target"
                );
                break;
            };
            let (v0, v1) = (record.v0, record.v1);

            // Staleness filter: a collapse already consumed one endpoint
            if cm.vertex_removed[v0] || cm.vertex_removed[v1] {
                continue;
            }

            // The record's cost and position may predate collapses that
            // changed these quadrics; re-run the oracle so the gate and the
            // executor only ever see the current optimum
            let combined = cm.quadrics[v0] + cm.quadrics[v1];
            let fresh = collapse_cost(&combined, &cm.positions[v0], &cm.positions[v1]);

            if !is_valid_pair(&cm, v0, v1, fresh.position) {
                collapses_rejected += 1;
                continue;
            }

            collapse_edge(&mut cm, v0, v1, fresh.position);
            reseed_vertex_edges(&cm, v0, &mut heap, &mut seq);
            collapses_performed += 1;

            if collapses_performed % 100 == 0 {
                debug!(
                    active = cm.active_face_count(),
                    target = target_faces,
                    "collapse progress"
                );
            }
        }

        let final_mesh = cm.into_triangle_mesh();
        let final_faces = final_mesh.face_count();

        info!(
            final_faces,
            collapses = collapses_performed,
            rejected = collapses_rejected,
            "simplification complete"
        );

        Ok(SimplifyOutcome {
            mesh: final_mesh,
            original_faces,
            final_faces,
            collapses_performed,
            collapses_rejected,
        })
    }
}

impl MeshSimplifier for QemSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh> {
        if mesh.is_empty() {
            return Err(Error::InvalidData("Mesh is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&reduction_ratio) {
            return Err(Error::InvalidData(
                "Reduction ratio must be between 0.0 and 1.0".to_string(),
            ));
        }
        if reduction_ratio == 0.0 {
            return Ok(mesh.clone());
        }

        let target_faces = ((1.0 - reduction_ratio) * mesh.face_count() as f32) as usize;
        Ok(self.simplify_to_face_count(mesh, target_faces)?.mesh)
    }
}
