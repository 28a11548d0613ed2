//! Geometry primitives shared by the rasterizer and the hull builder
//!
//! Screen coordinates are integers with x growing to the right and y growing
//! downwards. Depth is a real number where smaller means nearer to the viewer.

use serde::{Deserialize, Serialize};

use crate::raster::SegmentWalker;

/// A point on the screen grid carrying a depth value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3D {
    pub x: i32,
    pub y: i32,
    pub z: f64,
}

impl Point3D {
    #[inline]
    pub const fn new(x: i32, y: i32, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Snap real screen coordinates to the nearest grid point
    #[inline]
    pub fn snapped(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: round_to_grid(x),
            y: round_to_grid(y),
            z,
        }
    }
}

/// Directed segment between two points with cached deltas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3D {
    pub p1: Point3D,
    pub p2: Point3D,
    pub dx: i32,
    pub dy: i32,
    pub dz: f64,
}

impl Segment3D {
    pub fn new(p1: Point3D, p2: Point3D) -> Self {
        Self {
            p1,
            p2,
            dx: p2.x - p1.x,
            dy: p2.y - p1.y,
            dz: p2.z - p1.z,
        }
    }

    /// True when x is the loop variable for this segment
    #[inline]
    pub fn x_dominant(&self) -> bool {
        self.dx.abs() > self.dy.abs()
    }

    /// Both endpoints fall on the same grid cell
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Whether the column `x` lies within the segment's x extent
    #[inline]
    pub fn spans_column(&self, x: i32) -> bool {
        x >= self.p1.x.min(self.p2.x) && x <= self.p1.x.max(self.p2.x)
    }

    /// Point at parameter t along the segment (t = 0 at p1, t = 1 at p2)
    #[inline]
    pub fn lerp(&self, t: f64) -> (f64, f64, f64) {
        (
            self.p1.x as f64 + t * self.dx as f64,
            self.p1.y as f64 + t * self.dy as f64,
            self.p1.z + t * self.dz,
        )
    }

    /// Lazily walk every grid step along the dominant axis, endpoints included
    pub fn walk(&self) -> SegmentWalker {
        SegmentWalker::new(*self)
    }
}

/// Integer point used by the hull view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point2D {
    pub x: i32,
    pub y: i32,
}

impl Point2D {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance, exact for any pair of points
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> i128 {
        let dx = self.x as i128 - other.x as i128;
        let dy = self.y as i128 - other.y as i128;
        dx * dx + dy * dy
    }
}

/// 2D cross product of (b - a) and (c - a)
///
/// Positive when a -> b -> c turns counter-clockwise in a y-up frame, which
/// is clockwise on screen. Computed in `i128` so it is exact over the whole
/// `i32` plane.
#[inline]
pub fn cross(a: Point2D, b: Point2D, c: Point2D) -> i128 {
    let abx = b.x as i128 - a.x as i128;
    let aby = b.y as i128 - a.y as i128;
    let acx = c.x as i128 - a.x as i128;
    let acy = c.y as i128 - a.y as i128;
    abx * acy - aby * acx
}

/// Round to the nearest grid cell, halves going up
#[inline]
pub fn round_to_grid(v: f64) -> i32 {
    (v + 0.5).floor() as i32
}
