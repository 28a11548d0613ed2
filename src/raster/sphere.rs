//! Sphere rasterizer
//!
//! Scans the disc silhouette column by column and assigns each cell the depth
//! of the front hemisphere. The back half is never generated.

use serde::{Deserialize, Serialize};

use super::{plot, Brush};
use crate::display::FrameBuffer;
use crate::geometry::{round_to_grid, Point3D};

/// A sphere in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub cx: i32,
    pub cy: i32,
    pub cz: f64,
    pub radius: i32,
}

impl Sphere {
    pub const fn new(cx: i32, cy: i32, cz: f64, radius: i32) -> Self {
        Self { cx, cy, cz, radius }
    }

    /// Every cell of the silhouette with its front-surface depth
    ///
    /// Rows at the rounded rim of a column can sit slightly outside the true
    /// circle; they have no surface point and are skipped.
    pub fn samples(&self) -> impl Iterator<Item = Point3D> {
        let Sphere { cx, cy, cz, radius } = *self;
        let r = radius.max(0) as i64;
        (-r..=r).flat_map(move |x| {
            let col_sq = r * r - x * x;
            let max_y = round_to_grid((col_sq as f64).sqrt()) as i64;
            (-max_y..=max_y).filter_map(move |y| {
                let rest = col_sq - y * y;
                (rest >= 0).then(|| {
                    Point3D::new(cx + x as i32, cy + y as i32, cz - (rest as f64).sqrt())
                })
            })
        })
    }
}

/// Rasterize a sphere into the frame buffer
pub fn fill_sphere(buffer: &mut FrameBuffer, sphere: &Sphere, brush: &Brush) {
    for p in sphere.samples() {
        plot(buffer, p.x as f64, p.y as f64, p.z, brush);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_is_nearest_point() {
        let sphere = Sphere::new(20, 20, 100.0, 10);
        let nearest = sphere
            .samples()
            .min_by(|a, b| a.z.total_cmp(&b.z))
            .map(|p| (p.x, p.y, p.z));
        assert_eq!(nearest, Some((20, 20, 90.0)));
    }

    #[test]
    fn test_silhouette_extent() {
        let sphere = Sphere::new(0, 0, 0.0, 5);
        let pts: Vec<Point3D> = sphere.samples().collect();
        assert_eq!(pts.iter().map(|p| p.x).min(), Some(-5));
        assert_eq!(pts.iter().map(|p| p.x).max(), Some(5));
        assert_eq!(pts.iter().map(|p| p.y).min(), Some(-5));
        // Column x = 3 reaches |y| = 4 exactly
        let col: Vec<i32> = pts.iter().filter(|p| p.x == 3).map(|p| p.y).collect();
        assert_eq!(col, (-4..=4).collect::<Vec<_>>());
        assert!(pts.iter().all(|p| p.z <= 0.0 && p.z >= -5.0));
    }

    #[test]
    fn test_rim_cells_outside_circle_are_skipped() {
        for radius in 0..40 {
            let sphere = Sphere::new(0, 0, 50.0, radius);
            let r_sq = (radius * radius) as i64;
            for p in sphere.samples() {
                let d = (p.x as i64).pow(2) + (p.y as i64).pow(2);
                assert!(d <= r_sq, "r = {}: ({}, {})", radius, p.x, p.y);
            }
        }
        // Column x = 2 of r = 5 rounds up to |y| = 5, which is outside
        let col: Vec<i32> = Sphere::new(0, 0, 50.0, 5)
            .samples()
            .filter(|p| p.x == 2)
            .map(|p| p.y)
            .collect();
        assert_eq!(col, (-4..=4).collect::<Vec<_>>());
    }

    #[test]
    fn test_depth_on_surface() {
        let sphere = Sphere::new(0, 0, 50.0, 5);
        let p = sphere.samples().find(|p| p.x == 3 && p.y == 0);
        assert_relative_eq!(p.map_or(f64::NAN, |p| p.z), 46.0);
    }

    #[test]
    fn test_fill_sphere_writes_disc() {
        let mut fb = FrameBuffer::with_size(40, 40, (255, 255, 255));
        fill_sphere(&mut fb, &Sphere::new(20, 20, 0.0, 8), &Brush::new((255, 0, 0), 0.0));
        assert_eq!(fb.get_pixel(20, 20), Some((255, 0, 0)));
        assert_eq!(fb.get_pixel(28, 20), Some((255, 0, 0)));
        assert_eq!(fb.get_pixel(27, 27), Some((255, 255, 255)));
        assert!(!fb.in_silhouette(20, 20));
    }

    #[test]
    fn test_zero_radius_is_single_cell() {
        let pts: Vec<Point3D> = Sphere::new(3, 4, 7.0, 0).samples().collect();
        assert_eq!(pts, vec![Point3D::new(3, 4, 7.0)]);
    }
}
