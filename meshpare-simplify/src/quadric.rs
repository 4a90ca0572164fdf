//! Quadric error math and the collapse cost oracle

use meshpare_core::{Matrix4, Point3f, Vector4};

/// Determinant magnitude below which the constrained quadric system is
/// treated as ill-conditioned and the midpoint fallback is used.
const DET_EPSILON: f64 = 1e-4;

/// Face area (cross-product norm) below which a face is degenerate and
/// contributes no plane.
const AREA_EPSILON: f32 = 1e-9;

/// Homogeneous plane (nx, ny, nz, -n·p0) of a triangle, or `None` when the
/// triangle is degenerate.
pub(crate) fn face_plane(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Option<Vector4<f64>> {
    let n = (p1 - p0).cross(&(p2 - p0));
    if n.norm() < AREA_EPSILON {
        return None;
    }
    let n = n.normalize();
    let d = -n.dot(&p0.coords);
    Some(Vector4::new(n.x as f64, n.y as f64, n.z as f64, d as f64))
}

/// Rank-1 fundamental quadric p·pᵀ of a plane.
pub(crate) fn plane_quadric(plane: &Vector4<f64>) -> Matrix4<f64> {
    plane * plane.transpose()
}

/// Result of the collapse cost oracle for one edge.
#[derive(Debug, Clone, Copy)]
pub struct CollapseCandidate {
    /// Position the surviving vertex would take.
    pub position: Point3f,
    /// Quadric error at that position.
    pub cost: f64,
    /// Whether the constrained system was solved; `false` means the midpoint
    /// fallback was taken.
    pub solved: bool,
}

/// Compute the optimal contraction point and quadric error for collapsing an
/// edge with combined quadric `q_edge` and endpoint positions `p0`, `p1`.
///
/// The bottom row of the combined quadric is replaced with (0, 0, 0, 1) and
/// the system solved for the homogeneous minimizer. When the determinant is
/// within `1e-4` of zero the system is ill-conditioned (near-flat or
/// symmetric neighborhoods) and the solution can land arbitrarily far away,
/// so the edge midpoint is used instead.
///
/// Pure function: no mesh state is touched.
pub fn collapse_cost(q_edge: &Matrix4<f64>, p0: &Point3f, p1: &Point3f) -> CollapseCandidate {
    let mut constrained = *q_edge;
    constrained[(3, 0)] = 0.0;
    constrained[(3, 1)] = 0.0;
    constrained[(3, 2)] = 0.0;
    constrained[(3, 3)] = 1.0;

    let mut solved = false;
    let position = if constrained.determinant().abs() > DET_EPSILON {
        match constrained.try_inverse() {
            Some(inverse) => {
                let vh = inverse * Vector4::new(0.0, 0.0, 0.0, 1.0);
                solved = true;
                Point3f::new(vh.x as f32, vh.y as f32, vh.z as f32)
            }
            None => Point3f::from((p0.coords + p1.coords) * 0.5),
        }
    } else {
        Point3f::from((p0.coords + p1.coords) * 0.5)
    };

    let vh = Vector4::new(position.x as f64, position.y as f64, position.z as f64, 1.0);
    let cost = (vh.transpose() * q_edge * vh)[0].max(0.0);

    CollapseCandidate {
        position,
        cost,
        solved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_plane_unit_triangle() {
        let plane = face_plane(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((plane - Vector4::new(0.0, 0.0, 1.0, 0.0)).norm() < 1e-9);
    }

    #[test]
    fn test_face_plane_offset_from_origin() {
        let plane = face_plane(
            &Point3f::new(0.0, 0.0, 2.0),
            &Point3f::new(1.0, 0.0, 2.0),
            &Point3f::new(0.0, 1.0, 2.0),
        )
        .unwrap();
        // z = 2 plane: nz = 1, d = -2
        assert!((plane - Vector4::new(0.0, 0.0, 1.0, -2.0)).norm() < 1e-9);
    }

    #[test]
    fn test_face_plane_degenerate() {
        let plane = face_plane(
            &Point3f::new(0.0, 0.0, 0.0),
            &Point3f::new(1.0, 0.0, 0.0),
            &Point3f::new(2.0, 0.0, 0.0),
        );
        assert!(plane.is_none());
    }

    #[test]
    fn test_plane_quadric_measures_squared_distance() {
        let q = plane_quadric(&Vector4::new(0.0, 0.0, 1.0, 0.0));
        // Point at z = 3: squared distance to z = 0 plane is 9
        let vh = Vector4::new(7.0, -2.0, 3.0, 1.0);
        let err = (vh.transpose() * q * vh)[0];
        assert!((err - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_collapse_cost_well_conditioned() {
        // Three orthogonal planes meeting at (1, 2, 3): the minimizer is the
        // corner, with zero error
        let mut q = plane_quadric(&Vector4::new(1.0, 0.0, 0.0, -1.0));
        q += plane_quadric(&Vector4::new(0.0, 1.0, 0.0, -2.0));
        q += plane_quadric(&Vector4::new(0.0, 0.0, 1.0, -3.0));

        let cand = collapse_cost(&q, &Point3f::new(0.0, 0.0, 0.0), &Point3f::new(2.0, 4.0, 6.0));
        assert!(cand.solved);
        assert!((cand.position - Point3f::new(1.0, 2.0, 3.0)).norm() < 1e-4);
        assert!(cand.cost < 1e-9);
    }

    #[test]
    fn test_collapse_cost_fallback_is_exact_midpoint() {
        // A single plane gives a rank-deficient system
        let q = plane_quadric(&Vector4::new(0.0, 0.0, 1.0, 0.0));
        let p0 = Point3f::new(0.0, 0.0, 0.0);
        let p1 = Point3f::new(1.0, 2.0, 0.0);

        let cand = collapse_cost(&q, &p0, &p1);
        assert!(!cand.solved);
        assert_eq!(cand.position, Point3f::new(0.5, 1.0, 0.0));
        assert!(cand.cost.abs() < 1e-12);
    }

    #[test]
    fn test_collapse_cost_never_negative() {
        let q = plane_quadric(&Vector4::new(0.6, 0.0, 0.8, 0.25));
        let cand = collapse_cost(&q, &Point3f::new(-4.0, 1.0, 9.0), &Point3f::new(3.0, -7.0, 2.0));
        assert!(cand.cost >= 0.0);
    }
}
