//! Parametric segment walker
//!
//! Steps one grid unit at a time along the dominant axis of a segment and
//! interpolates the other screen coordinate and the depth. Used directly for
//! wireframe edges and as the column filler inside quads.

use std::iter::FusedIterator;

use crate::geometry::Segment3D;

/// One grid step along a segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Normalized position along the segment, 0 at the start and 1 at the end
    pub t: f64,
}

/// Iterator over the grid samples of a segment
///
/// Cloning a walker restarts nothing: the clone continues from the same
/// position. Call [`Segment3D::walk`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct SegmentWalker {
    segment: Segment3D,
    along_x: bool,
    current: i32,
    end: i32,
    step: i32,
    finished: bool,
}

impl SegmentWalker {
    pub fn new(segment: Segment3D) -> Self {
        let along_x = segment.x_dominant();
        let (start, end, delta) = if along_x {
            (segment.p1.x, segment.p2.x, segment.dx)
        } else {
            (segment.p1.y, segment.p2.y, segment.dy)
        };
        Self {
            segment,
            along_x,
            current: start,
            end,
            step: if delta < 0 { -1 } else { 1 },
            finished: false,
        }
    }

    /// Keep only the samples whose dominant-axis coordinate lies in `lo..=hi`
    ///
    /// The samples that remain are exactly those of the full walk.
    pub fn clamp_axis(mut self, lo: i32, hi: i32) -> Self {
        if self.step > 0 {
            self.current = self.current.max(lo);
            self.end = self.end.min(hi);
            self.finished |= self.current > self.end;
        } else {
            self.current = self.current.min(hi);
            self.end = self.end.max(lo);
            self.finished |= self.current < self.end;
        }
        self
    }

    /// Skip the samples whose dominant-axis coordinate is off a
    /// `width` x `height` screen
    pub fn clip_to_screen(self, width: u32, height: u32) -> Self {
        let extent = if self.along_x { width } else { height };
        self.clamp_axis(0, last_index(extent))
    }

    fn sample_at(&self, v: i32) -> Sample {
        let s = &self.segment;
        // A zero-length segment is a single point at t = 0
        if s.is_degenerate() {
            return Sample {
                x: s.p1.x as f64,
                y: s.p1.y as f64,
                z: s.p1.z,
                t: 0.0,
            };
        }

        if self.along_x {
            let t = (v - s.p1.x) as f64 / s.dx as f64;
            Sample {
                x: v as f64,
                y: s.p1.y as f64 + t * s.dy as f64,
                z: s.p1.z + t * s.dz,
                t,
            }
        } else {
            let t = (v - s.p1.y) as f64 / s.dy as f64;
            Sample {
                x: s.p1.x as f64 + t * s.dx as f64,
                y: v as f64,
                z: s.p1.z + t * s.dz,
                t,
            }
        }
    }

    fn remaining(&self) -> usize {
        if self.finished {
            0
        } else {
            (self.end - self.current).unsigned_abs() as usize + 1
        }
    }
}

/// Highest grid index on an axis of the given extent (-1 when empty)
pub(crate) fn last_index(extent: u32) -> i32 {
    i32::try_from(extent).unwrap_or(i32::MAX) - 1
}

impl Iterator for SegmentWalker {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.finished {
            return None;
        }
        let sample = self.sample_at(self.current);
        if self.current == self.end {
            self.finished = true;
        } else {
            self.current += self.step;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for SegmentWalker {}

impl FusedIterator for SegmentWalker {}
