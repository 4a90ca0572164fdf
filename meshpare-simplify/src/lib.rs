//! Mesh simplification via quadric error metrics
//!
//! This crate reduces triangle meshes by iterative edge collapse, always
//! removing the edge with the lowest quadric error next. Candidate collapses
//! are screened for manifold violations and normal flips before they are
//! applied, and the priority queue is maintained lazily: stale entries are
//! filtered when popped instead of being re-keyed in place.

pub mod mesh;
pub mod qem;
pub mod quadric;

pub use mesh::CollapseMesh;
pub use qem::{QemSimplifier, SimplifyOutcome};
pub use quadric::{collapse_cost, CollapseCandidate};

use meshpare_core::{Result, TriangleMesh};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh>;
}
