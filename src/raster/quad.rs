//! Quad plane filler
//!
//! Splits a planar quadrilateral into two boundary chains that both start at
//! the leftmost vertex and meet at the opposite vertex. Each screen column
//! between the leftmost and rightmost vertex is bounded by where those chains
//! cross it, and the span between the bounds is rasterized with the segment
//! walker so depth is interpolated the same way as along edges.
//!
//! Only convex quads are handled correctly. Concave or self-intersecting
//! input is filled with its column-wise outer span.

use super::walker::last_index;
use super::{plot, Brush, Sample};
use crate::display::FrameBuffer;
use crate::geometry::{Point3D, Segment3D};

/// Where a boundary edge crosses a column: (y, z) at the top and bottom
type Crossing = ((f64, f64), (f64, f64));

/// The four boundary half-edges, `[a, b, a*, b*]`
///
/// `a` and `b` leave the leftmost vertex towards its cyclic neighbours;
/// `a*` and `b*` continue from there to the opposite vertex.
fn half_edges(quad: &[Point3D; 4]) -> [Segment3D; 4] {
    let left = (0..4).fold(0, |best, i| if quad[i].x < quad[best].x { i } else { best });
    let v_min = quad[left];
    let prev = quad[(left + 3) % 4];
    let next = quad[(left + 1) % 4];
    let opposite = quad[(left + 2) % 4];
    [
        Segment3D::new(v_min, prev),
        Segment3D::new(v_min, next),
        Segment3D::new(prev, opposite),
        Segment3D::new(next, opposite),
    ]
}

/// Intersection of an edge with column x, if the edge reaches that column
fn crossing(edge: &Segment3D, x: i32) -> Option<Crossing> {
    if !edge.spans_column(x) {
        return None;
    }
    if edge.dx == 0 {
        // Vertical edge: the whole edge lies in this column
        let (a, b) = ((edge.p1.y as f64, edge.p1.z), (edge.p2.y as f64, edge.p2.z));
        return Some(if a.0 <= b.0 { (a, b) } else { (b, a) });
    }
    let t = (x - edge.p1.x) as f64 / edge.dx as f64;
    let (_, y, z) = edge.lerp(t);
    Some(((y, z), (y, z)))
}

/// Vertical span of the quad at column x, bottom to top
fn column_span(edges: &[Segment3D; 4], x: i32) -> Option<Segment3D> {
    let mut top: Option<(f64, f64)> = None;
    let mut bottom: Option<(f64, f64)> = None;
    for (upper, lower) in edges.iter().filter_map(|e| crossing(e, x)) {
        if top.map_or(true, |t| upper.0 < t.0) {
            top = Some(upper);
        }
        if bottom.map_or(true, |b| lower.0 > b.0) {
            bottom = Some(lower);
        }
    }
    let ((y_top, z_top), (y_bottom, z_bottom)) = (top?, bottom?);
    Some(Segment3D::new(
        Point3D::snapped(x as f64, y_bottom, z_bottom),
        Point3D::snapped(x as f64, y_top, z_top),
    ))
}

/// Samples of the quad restricted to the given inclusive column and row bounds
fn bounded_samples(
    quad: [Point3D; 4],
    (x_lo, x_hi): (i32, i32),
    (y_lo, y_hi): (i32, i32),
) -> impl Iterator<Item = Sample> {
    let edges = half_edges(&quad);
    let min_x = quad.iter().map(|p| p.x).min().unwrap_or(0).max(x_lo);
    let max_x = quad.iter().map(|p| p.x).max().unwrap_or(-1).min(x_hi);
    (min_x..=max_x).flat_map(move |x| {
        column_span(&edges, x)
            .into_iter()
            .flat_map(move |span| span.walk().clamp_axis(y_lo, y_hi))
    })
}

/// Lazily produce every interior sample of a convex quad, column by column
pub fn quad_samples(quad: [Point3D; 4]) -> impl Iterator<Item = Sample> {
    let all = (i32::MIN, i32::MAX);
    bounded_samples(quad, all, all)
}

/// The samples of [`quad_samples`] that land on a `width` x `height` screen
///
/// Columns and rows outside the screen are never visited, so the cost is
/// bounded by the screen area however large the quad is.
pub fn quad_samples_clipped(
    quad: [Point3D; 4],
    width: u32,
    height: u32,
) -> impl Iterator<Item = Sample> {
    bounded_samples(quad, (0, last_index(width)), (0, last_index(height)))
}

/// Rasterize a convex quad into the frame buffer
pub fn fill_quad(buffer: &mut FrameBuffer, quad: [Point3D; 4], brush: &Brush) {
    for s in quad_samples_clipped(quad, buffer.width(), buffer.height()) {
        plot(buffer, s.x, s.y, s.z, brush);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;

    fn cells(quad: [Point3D; 4]) -> HashSet<(i32, i32)> {
        quad_samples(quad)
            .map(|s| (s.x.round() as i32, s.y.round() as i32))
            .collect()
    }

    fn square(z: [f64; 4]) -> [Point3D; 4] {
        [
            Point3D::new(0, 0, z[0]),
            Point3D::new(4, 0, z[1]),
            Point3D::new(4, 4, z[2]),
            Point3D::new(0, 4, z[3]),
        ]
    }

    #[test]
    fn test_square_fills_every_cell() {
        let filled = cells(square([1.0; 4]));
        assert_eq!(filled.len(), 25);
        for x in 0..=4 {
            for y in 0..=4 {
                assert!(filled.contains(&(x, y)), "missing ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut reversed = square([1.0; 4]);
        reversed.reverse();
        assert_eq!(cells(reversed), cells(square([1.0; 4])));

        let rotated = [
            Point3D::new(4, 4, 1.0),
            Point3D::new(0, 4, 1.0),
            Point3D::new(0, 0, 1.0),
            Point3D::new(4, 0, 1.0),
        ];
        assert_eq!(cells(rotated), cells(square([1.0; 4])));
    }

    #[test]
    fn test_depth_interpolated_across_column() {
        let mut fb = FrameBuffer::with_size(8, 8, (255, 255, 255));
        fill_quad(&mut fb, square([0.0, 0.0, 8.0, 8.0]), &Brush::new((0, 0, 255), 0.0));
        assert_relative_eq!(fb.depth_at(2, 0).unwrap_or(f64::NAN), 0.0);
        assert_relative_eq!(fb.depth_at(2, 2).unwrap_or(f64::NAN), 4.0);
        assert_relative_eq!(fb.depth_at(3, 4).unwrap_or(f64::NAN), 8.0);
        assert_eq!(fb.depth_at(5, 2), Some(f64::INFINITY));
    }

    #[test]
    fn test_diamond_stays_inside() {
        // Rightmost vertex is a neighbour of the leftmost one
        let diamond = [
            Point3D::new(0, 10, 0.0),
            Point3D::new(20, 0, 0.0),
            Point3D::new(12, 14, 0.0),
            Point3D::new(6, 18, 0.0),
        ];
        let filled = cells(diamond);
        assert!(filled.contains(&(10, 10)));
        assert!(filled.contains(&(18, 3)));
        assert!(filled.contains(&(20, 0)));
        assert!(!filled.contains(&(0, 0)));
        assert!(!filled.contains(&(19, 10)));
        assert!(!filled.contains(&(2, 17)));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let quad = [
            Point3D::new(3, 2, 10.0),
            Point3D::new(17, 5, 30.0),
            Point3D::new(14, 16, 50.0),
            Point3D::new(1, 12, 20.0),
        ];
        let brush = Brush::new((0, 0, 255), 0.5);
        let mut once = FrameBuffer::with_size(20, 20, (255, 255, 255));
        fill_quad(&mut once, quad, &brush);
        let mut twice = FrameBuffer::with_size(20, 20, (255, 255, 255));
        fill_quad(&mut twice, quad, &brush);
        fill_quad(&mut twice, quad, &brush);
        assert_eq!(once.to_rgb(), twice.to_rgb());
        for y in 0..20 {
            for x in 0..20 {
                assert_eq!(once.depth_at(x, y), twice.depth_at(x, y));
            }
        }
    }

    #[test]
    fn test_clipped_samples_match_on_screen_part() {
        let quad = [
            Point3D::new(-6, 2, 10.0),
            Point3D::new(9, -5, 30.0),
            Point3D::new(14, 16, 50.0),
            Point3D::new(1, 12, 20.0),
        ];
        let on_screen = |s: &Sample| (0.0..8.0).contains(&s.x) && (0.0..8.0).contains(&s.y);
        let expected: Vec<Sample> = quad_samples(quad).filter(on_screen).collect();
        let clipped: Vec<Sample> = quad_samples_clipped(quad, 8, 8).collect();
        assert!(!clipped.is_empty());
        assert_eq!(clipped, expected);
    }

    #[test]
    fn test_huge_quad_costs_screen_area() {
        let big = 1 << 28;
        let quad = [
            Point3D::new(-big, -big, 1.0),
            Point3D::new(big, -big, 1.0),
            Point3D::new(big, big, 1.0),
            Point3D::new(-big, big, 1.0),
        ];
        assert_eq!(quad_samples_clipped(quad, 30, 20).count(), 600);

        let mut fb = FrameBuffer::with_size(30, 20, (255, 255, 255));
        fill_quad(&mut fb, quad, &Brush::new((0, 0, 255), 0.0));
        assert_eq!(fb.get_pixel(0, 0), Some((0, 0, 255)));
        assert_eq!(fb.get_pixel(29, 19), Some((0, 0, 255)));
    }

    #[test]
    fn test_degenerate_quad_is_a_point() {
        let p = Point3D::new(5, 5, 2.0);
        let samples: Vec<Sample> = quad_samples([p; 4]).collect();
        assert_eq!(samples.len(), 1);
        assert_eq!((samples[0].x, samples[0].y, samples[0].z), (5.0, 5.0, 2.0));
    }
}
