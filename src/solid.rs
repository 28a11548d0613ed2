//! The shaded solid: a cube seen along its body diagonal
//!
//! Topology is fixed data; only four scalars (three offsets and a scale)
//! change between frames. Vertices are regenerated from those scalars every
//! time they are needed.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point3D, Segment3D};

const SQRT_2: f64 = std::f64::consts::SQRT_2;
const SQRT_6: f64 = 2.449_489_742_783_178;

/// Vertex positions in units of the expansion coefficient
const VERTEX_COEFFS: [(f64, f64, f64); 8] = [
    (0.0, 0.0, -3.0),
    (0.0, 0.0, 3.0),
    (SQRT_6, -SQRT_2, 1.0),
    (0.0, -2.0 * SQRT_2, -1.0),
    (SQRT_6, SQRT_2, -1.0),
    (-SQRT_6, -SQRT_2, 1.0),
    (0.0, 2.0 * SQRT_2, 1.0),
    (-SQRT_6, SQRT_2, -1.0),
];

pub const EDGES: [[usize; 2]; 12] = [
    [0, 2],
    [0, 5],
    [0, 6],
    [1, 3],
    [1, 4],
    [1, 7],
    [2, 3],
    [2, 4],
    [3, 5],
    [4, 6],
    [5, 7],
    [6, 7],
];

/// Faces as vertex indices in cyclic order
pub const FACES: [[usize; 4]; 6] = [
    [0, 2, 4, 6],
    [0, 2, 3, 5],
    [0, 5, 7, 6],
    [1, 3, 2, 4],
    [1, 3, 5, 7],
    [1, 4, 6, 7],
];

/// Largest expansion the solid can grow to
///
/// Keeps every vertex coordinate within a few million of the offsets, so
/// differences between vertices always fit in an `i32`.
pub const MAX_EXPANSION: i32 = 1 << 20;

/// The mutable state of the solid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolidParams {
    pub offset_x: i32,
    pub offset_y: i32,
    pub offset_z: i32,
    pub expansion: i32,
}

impl Default for SolidParams {
    fn default() -> Self {
        Self {
            offset_x: 200,
            offset_y: 200,
            offset_z: 200,
            expansion: 50,
        }
    }
}

impl SolidParams {
    /// Move the solid on screen
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.offset_x = self.offset_x.saturating_add(dx);
        self.offset_y = self.offset_y.saturating_add(dy);
    }

    /// Grow or shrink, staying within `min_expansion..=MAX_EXPANSION`
    pub fn resize(&mut self, delta: i32, min_expansion: i32) {
        self.expansion = self
            .expansion
            .saturating_add(delta)
            .min(MAX_EXPANSION)
            .max(min_expansion);
    }

    /// Bring the solid nearer (positive delta) or push it away
    pub fn approach(&mut self, delta: i32) {
        self.offset_z = self.offset_z.saturating_sub(delta);
    }

    /// Regenerate the eight vertex positions
    pub fn vertices(&self) -> [Point3D; 8] {
        let k = self.expansion as f64;
        VERTEX_COEFFS.map(|(cx, cy, cz)| {
            Point3D::snapped(
                k * cx + self.offset_x as f64,
                k * cy + self.offset_y as f64,
                k * cz + self.offset_z as f64,
            )
        })
    }

    /// The twelve wireframe edges
    pub fn edges(&self) -> impl Iterator<Item = Segment3D> {
        let v = self.vertices();
        EDGES.into_iter().map(move |[a, b]| Segment3D::new(v[a], v[b]))
    }

    /// The six faces, each a quad in cyclic vertex order
    pub fn faces(&self) -> impl Iterator<Item = [Point3D; 4]> {
        let v = self.vertices();
        FACES.into_iter().map(move |f| f.map(|i| v[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_vertices() {
        let v = SolidParams::default().vertices();
        assert_eq!(v[0], Point3D::new(200, 200, 50.0));
        assert_eq!(v[1], Point3D::new(200, 200, 350.0));
        assert_eq!((v[2].x, v[2].y), (322, 129));
        assert_eq!((v[6].x, v[6].y), (200, 341));
        assert_eq!((v[7].x, v[7].y), (78, 271));
    }

    #[test]
    fn test_every_face_edge_is_a_wireframe_edge() {
        let edges: HashSet<(usize, usize)> = EDGES
            .iter()
            .map(|&[a, b]| (a.min(b), a.max(b)))
            .collect();
        for face in FACES {
            for i in 0..4 {
                let (a, b) = (face[i], face[(i + 1) % 4]);
                assert!(edges.contains(&(a.min(b), a.max(b))), "{:?}", face);
            }
        }
    }

    #[test]
    fn test_each_vertex_has_three_edges() {
        for v in 0..8 {
            let degree = EDGES.iter().filter(|e| e.contains(&v)).count();
            assert_eq!(degree, 3);
        }
    }

    #[test]
    fn test_translate_moves_all_vertices() {
        let mut params = SolidParams::default();
        let before = params.vertices();
        params.translate(15, -7);
        for (a, b) in before.iter().zip(params.vertices().iter()) {
            assert_eq!(b.x - a.x, 15);
            assert_eq!(b.y - a.y, -7);
            assert_eq!(a.z, b.z);
        }
    }

    #[test]
    fn test_resize_respects_minimum() {
        let mut params = SolidParams::default();
        params.resize(-100, 1);
        assert_eq!(params.expansion, 1);
        params.resize(9, 1);
        assert_eq!(params.expansion, 10);
    }

    #[test]
    fn test_extreme_deltas_saturate() {
        let mut params = SolidParams::default();
        params.resize(i32::MAX, 1);
        assert_eq!(params.expansion, MAX_EXPANSION);
        params.resize(i32::MIN, 1);
        assert_eq!(params.expansion, 1);

        params.translate(i32::MAX, i32::MIN);
        assert_eq!((params.offset_x, params.offset_y), (i32::MAX, i32::MIN));
        params.translate(i32::MAX, i32::MIN);
        assert_eq!((params.offset_x, params.offset_y), (i32::MAX, i32::MIN));

        params.approach(i32::MAX);
        params.approach(i32::MAX);
        assert_eq!(params.offset_z, i32::MIN);
        params.approach(i32::MIN);
        assert_eq!(params.offset_z, 0);
    }

    #[test]
    fn test_extreme_state_still_builds_geometry() {
        let mut params = SolidParams::default();
        params.resize(i32::MAX, 1);
        params.translate(i32::MAX, i32::MIN);
        // Segment deltas must not overflow
        assert_eq!(params.edges().count(), 12);
        for v in params.vertices() {
            assert!(v.x > i32::MAX - 4 * MAX_EXPANSION);
            assert!(v.y < i32::MIN + 4 * MAX_EXPANSION);
        }
    }

    #[test]
    fn test_approach_lowers_depth() {
        let mut params = SolidParams::default();
        params.approach(30);
        assert_eq!(params.offset_z, 170);
        assert_eq!(params.vertices()[0].z, 20.0);
    }

    #[test]
    fn test_edges_and_faces_counts() {
        let params = SolidParams::default();
        assert_eq!(params.edges().count(), 12);
        assert_eq!(params.faces().count(), 6);
    }
}
