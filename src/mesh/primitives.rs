//! Quad-dominant primitive snapshots.
//!
//! Regular quad meshes with known vertex numbering, handy for exercising loop
//! logic: an open grid (boundary on all sides, poles at the corners), an open
//! cylinder (two boundary rings, no poles) and a torus (closed, all vertices
//! valence 4).

use std::f64::consts::TAU;

use nalgebra::Point3;

use super::builder::MeshSnapshot;

/// A planar grid of `nx` by `ny` unit quads in the XY plane.
///
/// Vertex `(i, j)` has index `j * (nx + 1) + i` and sits at `(i, j, 0)`.
pub fn quad_grid(nx: usize, ny: usize) -> MeshSnapshot {
    let mut positions = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            positions.push(Point3::new(i as f64, j as f64, 0.0));
        }
    }

    let mut quads = Vec::with_capacity(nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let v00 = j * (nx + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (nx + 1);
            let v11 = v01 + 1;
            quads.push([v00, v10, v11, v01]);
        }
    }

    MeshSnapshot::from_quads(positions, &quads)
}

/// An open cylinder with `around` quads per ring and `along` rings of quads.
///
/// Vertex `(k, j)` (k-th around, j-th ring) has index `j * around + k`.
/// Needs `around >= 3`.
pub fn quad_cylinder(around: usize, along: usize) -> MeshSnapshot {
    debug_assert!(around >= 3, "a cylinder needs at least three sides");

    let mut positions = Vec::with_capacity(around * (along + 1));
    for j in 0..=along {
        for k in 0..around {
            let t = TAU * k as f64 / around as f64;
            positions.push(Point3::new(t.cos(), t.sin(), j as f64));
        }
    }

    let idx = |k: usize, j: usize| j * around + (k % around);
    let mut quads = Vec::with_capacity(around * along);
    for j in 0..along {
        for k in 0..around {
            quads.push([idx(k, j), idx(k + 1, j), idx(k + 1, j + 1), idx(k, j + 1)]);
        }
    }

    MeshSnapshot::from_quads(positions, &quads)
}

/// A closed torus with `major` quads around the main ring and `minor` around
/// the tube.
///
/// Vertex `(j, k)` (j-th around the ring, k-th around the tube) has index
/// `j * minor + k`. Needs `major >= 3` and `minor >= 3`.
pub fn quad_torus(major: usize, minor: usize) -> MeshSnapshot {
    debug_assert!(major >= 3 && minor >= 3, "a torus needs at least three segments each way");

    let (big_r, small_r) = (2.0, 0.5);
    let mut positions = Vec::with_capacity(major * minor);
    for j in 0..major {
        let u = TAU * j as f64 / major as f64;
        for k in 0..minor {
            let w = TAU * k as f64 / minor as f64;
            let r = big_r + small_r * w.cos();
            positions.push(Point3::new(r * u.cos(), r * u.sin(), small_r * w.sin()));
        }
    }

    let idx = |j: usize, k: usize| (j % major) * minor + (k % minor);
    let mut quads = Vec::with_capacity(major * minor);
    for j in 0..major {
        for k in 0..minor {
            quads.push([idx(j, k), idx(j + 1, k), idx(j + 1, k + 1), idx(j, k + 1)]);
        }
    }

    MeshSnapshot::from_quads(positions, &quads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let s = quad_grid(3, 2);
        assert_eq!(s.num_vertices(), 12);
        assert_eq!(s.num_faces(), 6);
        // 3 * 3 horizontal + 4 * 2 vertical
        assert_eq!(s.num_edges(), 17);
    }

    #[test]
    fn test_cylinder_counts() {
        let s = quad_cylinder(8, 3);
        assert_eq!(s.num_vertices(), 32);
        assert_eq!(s.num_faces(), 24);
        // 4 rings of 8 + 3 layers of 8 verticals
        assert_eq!(s.num_edges(), 56);
    }

    #[test]
    fn test_torus_counts() {
        let s = quad_torus(6, 4);
        assert_eq!(s.num_vertices(), 24);
        assert_eq!(s.num_faces(), 24);
        // Euler characteristic 0: E = V + F
        assert_eq!(s.num_edges(), 48);
    }
}
