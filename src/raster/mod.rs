//! Software rasterization primitives
//!
//! Every primitive produces a lazy sequence of grid samples; the `draw_*`
//! helpers feed those samples into a [`FrameBuffer`] through a [`Brush`].

mod quad;
mod sphere;
mod walker;

pub use quad::{fill_quad, quad_samples, quad_samples_clipped};
pub use sphere::{fill_sphere, Sphere};
pub use walker::{Sample, SegmentWalker};

use crate::display::{FrameBuffer, Rgb};
use crate::geometry::Segment3D;

/// How samples land in the frame buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub color: Rgb,
    /// Subtracted from each channel per unit of depth
    pub shade: f64,
    /// Samples also mark the silhouette mask used for hit testing
    pub marks_silhouette: bool,
}

impl Brush {
    pub const fn new(color: Rgb, shade: f64) -> Self {
        Self {
            color,
            shade,
            marks_silhouette: false,
        }
    }

    pub const fn with_silhouette(mut self) -> Self {
        self.marks_silhouette = true;
        self
    }
}

/// Composite one sample with the brush
#[inline]
pub fn plot(buffer: &mut FrameBuffer, x: f64, y: f64, z: f64, brush: &Brush) {
    if brush.marks_silhouette {
        buffer.mark_silhouette(x, y);
    }
    buffer.composite(x, y, z, brush.color, brush.shade);
}

/// Draw a depth-tested line segment
pub fn draw_segment(buffer: &mut FrameBuffer, segment: &Segment3D, brush: &Brush) {
    for s in segment.walk().clip_to_screen(buffer.width(), buffer.height()) {
        plot(buffer, s.x, s.y, s.z, brush);
    }
}
