//! Convex hull of a 2D point set
//!
//! Graham scan: sort the points by slope around the leftmost point, then walk
//! them keeping a stack that only ever turns one way. All comparisons are done
//! in integer arithmetic so ties are decided exactly.
//!
//! Hull vertices are strict corners. Points lying on a hull edge (and repeated
//! points) are not part of the result.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use crate::geometry::{cross, Point2D};
use crate::util::Rng;

/// Order two points by the slope of the line joining them to `origin`,
/// nearest first on equal slopes.
///
/// Both points must have `x >= origin.x`; a vertical line has the largest slope.
fn slope_order(origin: Point2D, a: Point2D, b: Point2D) -> Ordering {
    let (ox, oy) = (origin.x as i128, origin.y as i128);
    let (ax, ay) = (a.x as i128 - ox, a.y as i128 - oy);
    let (bx, by) = (b.x as i128 - ox, b.y as i128 - oy);
    let by_slope = match (ax == 0, bx == 0) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        // ay / ax vs by / bx with positive denominators
        (false, false) => (ay * bx).cmp(&(by * ax)),
    };
    by_slope.then_with(|| origin.distance_squared(&a).cmp(&origin.distance_squared(&b)))
}

/// Compute the convex hull of `points`.
///
/// The result starts at the point with the smallest x (smallest y on ties)
/// and runs clockwise on screen (y pointing down). Returns an empty vector
/// when fewer than three points are given or all points are collinear.
pub fn convex_hull(points: &[Point2D]) -> Vec<Point2D> {
    if points.len() < 3 {
        return Vec::new();
    }
    let Some(&origin) = points.iter().min_by_key(|p| (p.x, p.y)) else {
        return Vec::new();
    };

    let mut candidates: Vec<Point2D> = points.iter().copied().filter(|&p| p != origin).collect();
    candidates.sort_by(|&a, &b| slope_order(origin, a, b));

    let mut hull = Vec::with_capacity(candidates.len() + 1);
    hull.push(origin);
    for w in candidates {
        // Pop while prev -> top -> w is not a strict turn
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], w) <= 0 {
            hull.pop();
        }
        hull.push(w);
    }

    if hull.len() < 3 {
        return Vec::new();
    }
    hull
}

/// Uniformly distributed points over inclusive coordinate ranges
pub fn generate_random_points(
    n: usize,
    x_range: RangeInclusive<i32>,
    y_range: RangeInclusive<i32>,
    rng: &mut Rng,
) -> Vec<Point2D> {
    (0..n)
        .map(|_| {
            Point2D::new(
                rng.range_i32(*x_range.start(), *x_range.end()),
                rng.range_i32(*y_range.start(), *y_range.end()),
            )
        })
        .collect()
}

/// A point set together with its hull
///
/// Every mutation rebuilds the hull from scratch, so [`HullSet::hull`] always
/// matches [`HullSet::points`].
#[derive(Debug, Clone, Default)]
pub struct HullSet {
    points: Vec<Point2D>,
    hull: Vec<Point2D>,
}

impl HullSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: Vec<Point2D>) -> Self {
        let mut set = Self {
            points,
            hull: Vec::new(),
        };
        set.rebuild();
        set
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn hull(&self) -> &[Point2D] {
        &self.hull
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append one point (a click) and rebuild
    pub fn push(&mut self, point: Point2D) {
        self.points.push(point);
        self.rebuild();
    }

    /// Replace the whole set with `n` random points
    pub fn regenerate(
        &mut self,
        n: usize,
        x_range: RangeInclusive<i32>,
        y_range: RangeInclusive<i32>,
        rng: &mut Rng,
    ) {
        self.points = generate_random_points(n, x_range, y_range, rng);
        self.rebuild();
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.hull.clear();
    }

    fn rebuild(&mut self) {
        self.hull = convex_hull(&self.points);
    }
}
