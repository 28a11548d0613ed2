//! Frame rendering and interactive state
//!
//! The renderer owns the frame buffer and the four solid scalars. A frame is
//! always rendered in one pass: clear, edges, faces, sphere. Input handlers
//! only touch the scalars; the next `render_frame` picks them up.

use crate::config::{Config, Palette, Shading};
use crate::display::FrameBuffer;
use crate::geometry::Point2D;
use crate::hull::HullSet;
use crate::raster::{draw_segment, fill_quad, fill_sphere, Brush, Sphere};
use crate::solid::SolidParams;

/// Side length of the square marker drawn for each hull input point
const POINT_MARKER_SIZE: u32 = 3;

pub struct Renderer {
    buffer: FrameBuffer,
    solid: SolidParams,
    min_expansion: i32,
    sphere: Sphere,
    palette: Palette,
    shading: Shading,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            buffer: FrameBuffer::with_size(config.width, config.height, config.palette.background),
            solid: config.solid.initial,
            min_expansion: config.solid.min_expansion,
            sphere: config.sphere,
            palette: config.palette,
            shading: config.shading,
        }
    }

    /// The most recently rendered frame
    pub fn frame(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn solid(&self) -> &SolidParams {
        &self.solid
    }

    /// Render the solid and the sphere into a fresh frame
    pub fn render_frame(&mut self) -> &FrameBuffer {
        self.buffer.set_background(self.palette.background);
        self.buffer.clear_all();

        let edge = Brush::new(self.palette.edge, self.shading.edge).with_silhouette();
        for segment in self.solid.edges() {
            draw_segment(&mut self.buffer, &segment, &edge);
        }

        let face = Brush::new(self.palette.solid, self.shading.solid).with_silhouette();
        for quad in self.solid.faces() {
            fill_quad(&mut self.buffer, quad, &face);
        }

        let globe = Brush::new(self.palette.sphere, self.shading.sphere);
        fill_sphere(&mut self.buffer, &self.sphere, &globe);

        &self.buffer
    }

    /// Render a hull point set: point markers plus the closed hull outline
    pub fn render_hull(&mut self, set: &HullSet) -> &FrameBuffer {
        self.buffer.set_background(self.palette.background);
        self.buffer.clear_all();

        let half = (POINT_MARKER_SIZE / 2) as i32;
        for p in set.points() {
            self.buffer.fill_rect(
                p.x.saturating_sub(half),
                p.y.saturating_sub(half),
                POINT_MARKER_SIZE,
                POINT_MARKER_SIZE,
                self.palette.hull_points,
            );
        }

        let hull = set.hull();
        for (i, a) in hull.iter().enumerate() {
            let b: Point2D = hull[(i + 1) % hull.len()];
            self.buffer.line(a.x, a.y, b.x, b.y, self.palette.hull_outline);
        }

        &self.buffer
    }

    /// Drag the solid by a mouse delta
    pub fn on_drag_delta(&mut self, dx: i32, dy: i32) {
        self.solid.translate(dx, dy);
    }

    /// Grow (positive) or shrink (negative) the solid
    pub fn on_size_delta(&mut self, delta: i32) {
        self.solid.resize(delta, self.min_expansion);
    }

    /// Move the solid towards (positive) or away from (negative) the viewer
    pub fn on_closeness_delta(&mut self, delta: i32) {
        self.solid.approach(delta);
    }

    /// Whether the last rendered frame drew the solid at this pixel
    pub fn hit_test(&self, x: i32, y: i32) -> bool {
        self.buffer.in_silhouette(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::round_to_grid;
    use crate::raster::quad_samples;
    use std::collections::HashMap;

    /// Small window with the sphere parked off screen
    fn solid_only() -> Config {
        Config {
            width: 400,
            height: 400,
            sphere: Sphere::new(-500, -500, 0.0, 0),
            ..Config::default()
        }
    }

    #[test]
    fn test_nearest_vertex_shows_edge_color() {
        let mut r = Renderer::new(&solid_only());
        let frame = r.render_frame();
        assert_eq!(frame.get_pixel(200, 200), Some((0, 0, 0)));
        assert_eq!(frame.depth_at(200, 200), Some(50.0));
        assert_eq!(frame.get_pixel(5, 5), Some((255, 255, 255)));
    }

    #[test]
    fn test_face_interior_is_shaded_solid() {
        let mut r = Renderer::new(&solid_only());
        let frame = r.render_frame();
        let (red, green, blue) = frame.get_pixel(250, 240).unwrap_or_default();
        assert_eq!((red, green), (0, 0));
        assert!(blue > 0 && blue < 255);
        let z = frame.depth_at(250, 240).unwrap_or(f64::INFINITY);
        assert_eq!(blue, (255.0 - z * 0.4) as u8);
    }

    #[test]
    fn test_hit_test_follows_solid() {
        let mut r = Renderer::new(&solid_only());
        r.render_frame();
        assert!(r.hit_test(200, 200));
        assert!(r.hit_test(250, 240));
        assert!(!r.hit_test(10, 10));
        assert!(!r.hit_test(-1, 200));

        r.on_drag_delta(100, 20);
        // The mask belongs to the last frame until the next render
        assert!(r.hit_test(200, 200));
        r.render_frame();
        assert!(r.hit_test(300, 220));
        assert_eq!(r.frame().depth_at(300, 220), Some(50.0));
        assert!(!r.hit_test(80, 200));
    }

    #[test]
    fn test_sphere_is_not_draggable() {
        let mut config = solid_only();
        config.sphere = Sphere::new(350, 350, 100.0, 30);
        let mut r = Renderer::new(&config);
        let frame = r.render_frame();
        // Front of the sphere: z = 70, shade 0.5
        assert_eq!(frame.get_pixel(350, 350), Some((220, 0, 0)));
        assert!(!r.hit_test(350, 350));
    }

    #[test]
    fn test_closeness_and_size() {
        let mut r = Renderer::new(&solid_only());
        r.on_closeness_delta(10);
        r.render_frame();
        assert_eq!(r.frame().depth_at(200, 200), Some(40.0));

        r.on_size_delta(-1000);
        assert_eq!(r.solid().expansion, 1);
        r.render_frame();
        assert!(r.hit_test(200, 200));
        assert!(!r.hit_test(250, 240));
    }

    #[test]
    fn test_oversized_solid_renders_within_window() {
        let mut r = Renderer::new(&solid_only());
        r.on_size_delta(i32::MAX);
        assert_eq!(r.solid().expansion, crate::solid::MAX_EXPANSION);
        r.render_frame();
        // The solid covers the whole window
        for (x, y) in [(0, 0), (399, 0), (0, 399), (399, 399), (200, 200)] {
            assert!(r.hit_test(x, y), "({}, {})", x, y);
        }
    }

    #[test]
    fn test_frames_do_not_accumulate() {
        let mut r = Renderer::new(&solid_only());
        let first = r.render_frame().to_rgb();
        r.on_drag_delta(50, 0);
        r.render_frame();
        r.on_drag_delta(-50, 0);
        let again = r.render_frame().to_rgb();
        assert_eq!(first, again);
    }

    #[test]
    fn test_frame_depth_is_minimum_of_all_surfaces() {
        let mut config = solid_only();
        config.sphere = Sphere::new(220, 210, 180.0, 60);
        let mut r = Renderer::new(&config);
        r.render_frame();

        let mut expected: HashMap<(i32, i32), f64> = HashMap::new();
        let mut record = |x: f64, y: f64, z: f64| {
            let key = (round_to_grid(x), round_to_grid(y));
            let slot = expected.entry(key).or_insert(f64::INFINITY);
            *slot = slot.min(z);
        };
        let solid = *r.solid();
        for seg in solid.edges() {
            seg.walk().for_each(|s| record(s.x, s.y, s.z));
        }
        for quad in solid.faces() {
            quad_samples(quad).for_each(|s| record(s.x, s.y, s.z));
        }
        config
            .sphere
            .samples()
            .for_each(|p| record(p.x as f64, p.y as f64, p.z));

        for y in 0..400 {
            for x in 0..400 {
                let want = expected.get(&(x, y)).copied().unwrap_or(f64::INFINITY);
                assert_eq!(r.frame().depth_at(x, y), Some(want), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_render_hull_outline() {
        let mut config = solid_only();
        config.palette.hull_outline = (255, 0, 0);
        let mut r = Renderer::new(&config);
        let set = HullSet::from_points(vec![
            Point2D::new(100, 100),
            Point2D::new(200, 100),
            Point2D::new(200, 200),
            Point2D::new(100, 200),
            Point2D::new(150, 150),
        ]);
        let frame = r.render_hull(&set);
        assert_eq!(frame.get_pixel(150, 100), Some((255, 0, 0)));
        assert_eq!(frame.get_pixel(100, 150), Some((255, 0, 0)));
        assert_eq!(frame.get_pixel(150, 150), Some((0, 0, 0)));
        assert_eq!(frame.get_pixel(151, 151), Some((0, 0, 0)));
        assert_eq!(frame.get_pixel(130, 130), Some((255, 255, 255)));
        assert!(!r.hit_test(150, 100));
    }

    #[test]
    fn test_render_hull_with_extreme_points() {
        let mut r = Renderer::new(&solid_only());
        let mut set = HullSet::new();
        for (x, y) in [(i32::MIN, i32::MIN), (i32::MAX, i32::MIN), (0, i32::MAX), (200, 200)] {
            set.push(Point2D::new(x, y));
        }
        assert_eq!(set.hull().len(), 3);
        let frame = r.render_hull(&set);
        assert_eq!(frame.get_pixel(200, 200), Some((0, 0, 0)));
    }

    #[test]
    fn test_render_hull_without_polygon() {
        let mut r = Renderer::new(&solid_only());
        let set = HullSet::from_points(vec![Point2D::new(10, 10), Point2D::new(20, 20)]);
        let frame = r.render_hull(&set);
        assert_eq!(frame.get_pixel(10, 10), Some((0, 0, 0)));
        assert_eq!(frame.get_pixel(15, 15), Some((255, 255, 255)));
    }
}
