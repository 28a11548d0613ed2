use crate::geometry::round_to_grid;

/// RGB triple, one byte per channel
pub type Rgb = (u8, u8, u8);

// ============================================================================
// Utility Functions
// ============================================================================

/// Write ABGR pixel to slice (RGBA8888 little-endian byte order)
#[inline]
fn write_pixel(dest: &mut [u8], (r, g, b): Rgb) {
    dest[0] = 255; // A
    dest[1] = b; // B
    dest[2] = g; // G
    dest[3] = r; // R
}

/// Darken a color by depth: every channel loses `z * coeff`, clamped to 0..=255
#[inline]
pub fn shade((r, g, b): Rgb, z: f64, coeff: f64) -> Rgb {
    let darken = z * coeff;
    let channel = |c: u8| (c as f64 - darken).clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}

// ============================================================================
// FrameBuffer
// ============================================================================

/// Color buffer with a per-pixel depth buffer and a silhouette mask
///
/// Colors are stored in the same RGBA8888 layout the SDL texture expects, so
/// a finished frame can be uploaded without conversion. Every write goes
/// through a depth test: a pixel only changes when the new surface is nearer
/// than everything drawn there since the last [`FrameBuffer::clear_all`].
pub struct FrameBuffer {
    pixels: Vec<u8>,
    depth: Vec<f64>,
    silhouette: Vec<bool>,
    width: u32,
    height: u32,
    background: Rgb,
}

impl FrameBuffer {
    /// Create a cleared frame buffer with custom resolution and background
    pub fn with_size(width: u32, height: u32, background: Rgb) -> Self {
        let pixel_count = (width * height) as usize;
        let mut buffer = Self {
            pixels: vec![0; pixel_count * 4],
            depth: vec![f64::INFINITY; pixel_count],
            silhouette: vec![false; pixel_count],
            width,
            height,
            background,
        };
        buffer.clear_all();
        buffer
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn set_background(&mut self, background: Rgb) {
        self.background = background;
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Cell index for an in-bounds pixel
    #[inline]
    fn cell(&self, x: i32, y: i32) -> usize {
        (y as u32 * self.width + x as u32) as usize
    }

    /// Reset colors to the background, depths to infinity and the silhouette mask
    pub fn clear_all(&mut self) {
        let background = self.background;
        for chunk in self.pixels.chunks_exact_mut(4) {
            write_pixel(chunk, background);
        }
        self.depth.fill(f64::INFINITY);
        self.silhouette.fill(false);
    }

    // ========================================================================
    // Depth-tested compositing
    // ========================================================================

    /// Depth-tested write of a shaded color at real screen coordinates.
    ///
    /// Coordinates are rounded to the nearest cell; anything off screen is
    /// silently dropped. Returns true when this surface became the nearest one.
    #[inline]
    pub fn composite(&mut self, x: f64, y: f64, z: f64, color: Rgb, shade_coeff: f64) -> bool {
        let (col, row) = (round_to_grid(x), round_to_grid(y));
        if !self.in_bounds(col, row) {
            return false;
        }
        let pi = self.cell(col, row);
        if z >= self.depth[pi] || z.is_nan() {
            return false;
        }
        self.depth[pi] = z;
        let idx = pi * 4;
        write_pixel(&mut self.pixels[idx..idx + 4], shade(color, z, shade_coeff));
        true
    }

    /// Read depth value at (x, y). Returns None if out of bounds.
    #[inline]
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f64> {
        if self.in_bounds(x, y) {
            Some(self.depth[self.cell(x, y)])
        } else {
            None
        }
    }

    // ========================================================================
    // Silhouette mask
    // ========================================================================

    /// Mark the cell under (x, y) as covered by the solid
    #[inline]
    pub fn mark_silhouette(&mut self, x: f64, y: f64) {
        let (col, row) = (round_to_grid(x), round_to_grid(y));
        if self.in_bounds(col, row) {
            let pi = self.cell(col, row);
            self.silhouette[pi] = true;
        }
    }

    /// Whether the last frame drew the solid at (x, y)
    #[inline]
    pub fn in_silhouette(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.silhouette[self.cell(x, y)]
    }

    // ========================================================================
    // Plain drawing (no depth test)
    // ========================================================================

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if self.in_bounds(x, y) {
            let idx = self.cell(x, y) * 4;
            write_pixel(&mut self.pixels[idx..idx + 4], color);
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        if self.in_bounds(x, y) {
            let idx = self.cell(x, y) * 4;
            Some((
                self.pixels[idx + 3], // R
                self.pixels[idx + 2], // G
                self.pixels[idx + 1], // B
            ))
        } else {
            None
        }
    }

    /// Fill a rectangle, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb) {
        let (x0, y0) = (x.max(0), y.max(0));
        let x1 = (x as i64 + w as i64).min(self.width as i64) as i32;
        let y1 = (y as i64 + h as i64).min(self.height as i64) as i32;
        for row in y0..y1 {
            for col in x0..x1 {
                self.set_pixel(col, row, color);
            }
        }
    }

    /// Draw a line using Bresenham's algorithm with Cohen-Sutherland clipping
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
        let Some((cx0, cy0, cx1, cy1)) = self.clip_line(x0, y0, x1, y1) else {
            return;
        };

        let dx = (cx1 - cx0).abs();
        let dy = -((cy1 - cy0).abs());
        let sx = if cx0 < cx1 { 1 } else { -1 };
        let sy = if cy0 < cy1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = cx0;
        let mut y = cy0;

        loop {
            self.set_pixel(x, y, color);
            if x == cx1 && y == cy1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Cohen-Sutherland line clipping
    /// Returns the clipped endpoints, or None when the line is entirely off screen
    fn clip_line(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        const INSIDE: u8 = 0;
        const LEFT: u8 = 1;
        const RIGHT: u8 = 2;
        const BOTTOM: u8 = 4;
        const TOP: u8 = 8;
        // Converges in at most 4 rounds for valid input
        const MAX_ITERATIONS: u32 = 16;

        let w = self.width as i128;
        let h = self.height as i128;
        // Products of two i32 spans need more than 64 bits
        let (mut x0, mut y0, mut x1, mut y1) = (x0 as i128, y0 as i128, x1 as i128, y1 as i128);

        let outcode = |x: i128, y: i128| -> u8 {
            let mut code = INSIDE;
            if x < 0 {
                code |= LEFT;
            } else if x >= w {
                code |= RIGHT;
            }
            if y < 0 {
                code |= TOP;
            } else if y >= h {
                code |= BOTTOM;
            }
            code
        };

        let mut code0 = outcode(x0, y0);
        let mut code1 = outcode(x1, y1);

        for _ in 0..MAX_ITERATIONS {
            if (code0 | code1) == 0 {
                return Some((x0 as i32, y0 as i32, x1 as i32, y1 as i32));
            }
            if (code0 & code1) != 0 {
                return None;
            }

            let code_out = if code0 != 0 { code0 } else { code1 };
            let dy = y1 - y0;
            let dx = x1 - x0;
            let (x, y);

            if (code_out & BOTTOM) != 0 {
                if dy == 0 {
                    return None;
                }
                x = x0 + dx * (h - 1 - y0) / dy;
                y = h - 1;
            } else if (code_out & TOP) != 0 {
                if dy == 0 {
                    return None;
                }
                x = x0 + dx * -y0 / dy;
                y = 0;
            } else if (code_out & RIGHT) != 0 {
                if dx == 0 {
                    return None;
                }
                y = y0 + dy * (w - 1 - x0) / dx;
                x = w - 1;
            } else {
                if dx == 0 {
                    return None;
                }
                y = y0 + dy * -x0 / dx;
                x = 0;
            }

            if code_out == code0 {
                x0 = x;
                y0 = y;
                code0 = outcode(x0, y0);
            } else {
                x1 = x;
                y1 = y;
                code1 = outcode(x1, y1);
            }
        }

        None
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Raw bytes for SDL texture upload
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Row-major RGB image, three bytes per pixel
    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity((self.width * self.height * 3) as usize);
        for px in self.pixels.chunks_exact(4) {
            rgb.extend_from_slice(&[px[3], px[2], px[1]]);
        }
        rgb
    }
}
