//! Ink canvas: persistent stroke raster, composited over live video.
//!
//! Pixels are packed ARGB (`0xAARRGGBB`).  A value of [`NO_INK`] means the
//! pixel was never stroked; every stroked pixel is forced opaque, so "has ink"
//! is simply `pixel != NO_INK`.  Compositing uses that as a binary mask: ink
//! replaces the video pixel outright, there is no blending.

use hand_landmarks::Point2;

use crate::error::{Error, Result};

/// Canvas value for an unstroked pixel.
pub const NO_INK: u32 = 0;

const OPAQUE: u32 = 0xFF00_0000;

// ════════════════════════════════════════════════════════════════════════════
// Brush
// ════════════════════════════════════════════════════════════════════════════

/// Stroke colour and width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Brush {
    pub color:     u32,
    pub thickness: f32,
}

impl Brush {
    pub fn new(color: u32, thickness: f32) -> Result<Self> {
        if !thickness.is_finite() || thickness < 1.0 {
            return Err(Error::InvalidBrush(format!("thickness must be ≥ 1, got {}", thickness)));
        }
        if color == NO_INK {
            return Err(Error::InvalidBrush("colour 0 is reserved for \"no ink\"".to_string()));
        }
        Ok(Brush { color: color | OPAQUE, thickness })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InkCanvas
// ════════════════════════════════════════════════════════════════════════════

/// Frame-sized raster of accumulated strokes.
#[derive(Clone, Debug)]
pub struct InkCanvas {
    width:  usize,
    height: usize,
    pixels: Vec<u32>,
    /// Count of pixels that are not `NO_INK`.
    inked:  usize,
}

impl InkCanvas {
    /// Empty canvas.
    pub fn new(width: usize, height: usize) -> Self {
        InkCanvas { width, height, pixels: vec![NO_INK; width * height], inked: 0 }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Ink colour at `(x, y)`, or `None` when unstroked or out of bounds.
    pub fn ink_at(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.pixels[y * self.width + x] {
            NO_INK => None,
            c      => Some(c),
        }
    }

    pub fn has_ink(&self, x: usize, y: usize) -> bool {
        self.ink_at(x, y).is_some()
    }

    /// Number of stroked pixels.
    pub fn ink_pixels(&self) -> usize {
        self.inked
    }

    /// Paint a round-capped segment `from → to`.
    ///
    /// Every pixel within `thickness / 2` of the segment takes `color`
    /// (forced opaque).  `from == to` paints a dot.  Parts outside the canvas
    /// are clipped.
    pub fn stroke(&mut self, from: Point2, to: Point2, color: u32, thickness: f32) {
        let radius = if thickness.is_finite() { (thickness / 2.0).max(0.5) } else { 0.5 };
        let color = color | OPAQUE;

        let min_x = (from.x.min(to.x) - radius).floor().max(0.0);
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0);
        let max_x = (from.x.max(to.x) + radius).ceil().min(self.width as f32 - 1.0);
        let max_y = (from.y.max(to.y) + radius).ceil().min(self.height as f32 - 1.0);
        if max_x < min_x || max_y < min_y {
            return;
        }

        let r2 = radius * radius;
        for y in min_y as usize..=max_y as usize {
            let row = y * self.width;
            for x in min_x as usize..=max_x as usize {
                let p = Point2::new(x as f32, y as f32);
                if distance_sq_to_segment(p, from, to) <= r2 {
                    if self.pixels[row + x] == NO_INK {
                        self.inked += 1;
                    }
                    self.pixels[row + x] = color;
                }
            }
        }
    }

    /// Paint with a [`Brush`].
    pub fn stroke_with(&mut self, from: Point2, to: Point2, brush: &Brush) {
        self.stroke(from, to, brush.color, brush.thickness);
    }

    /// Remove all ink.
    pub fn clear(&mut self) {
        self.pixels.fill(NO_INK);
        self.inked = 0;
    }

    /// Write `video` with ink laid over it into `out`.
    ///
    /// Both buffers must be exactly `width × height`.
    pub fn composite(&self, video: &[u32], out: &mut [u32]) -> Result<()> {
        let expected = self.pixels.len();
        for actual in [video.len(), out.len()] {
            if actual != expected {
                return Err(Error::FrameSize { expected, actual });
            }
        }
        for ((o, &v), &ink) in out.iter_mut().zip(video).zip(&self.pixels) {
            *o = if ink != NO_INK { ink } else { v };
        }
        Ok(())
    }
}

fn distance_sq_to_segment(p: Point2, a: Point2, b: Point2) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0)
    };
    let d = p - a.lerp(b, t);
    d.x * d.x + d.y * d.y
}

// ════════════════════════════════════════════════════════════════════════════
// DrawContinuity
// ════════════════════════════════════════════════════════════════════════════

/// The previous draw point, so consecutive Draw frames join into a line.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawContinuity {
    previous: Option<Point2>,
}

impl DrawContinuity {
    pub fn new() -> Self {
        DrawContinuity::default()
    }

    pub fn previous(&self) -> Option<Point2> {
        self.previous
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Stroke from the previous point (or a dot, if there is none) to
    /// `point`, then remember `point`.
    pub fn step(&mut self, canvas: &mut InkCanvas, point: Point2, brush: &Brush) {
        let from = self.previous.unwrap_or(point);
        canvas.stroke_with(from, point, brush);
        self.previous = Some(point);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const RED: u32 = 0xFFFF0000;

    fn video(w: usize, h: usize) -> Vec<u32> {
        (0..w * h).map(|i| 0xFF000000 | (i as u32 & 0xFFFF)).collect()
    }

    #[test]
    fn new_canvas_is_empty() {
        let c = InkCanvas::new(32, 16);
        assert_eq!(c.ink_pixels(), 0);
        assert_eq!(c.pixels().len(), 32 * 16);
    }

    #[test]
    fn zero_length_stroke_is_a_dot() {
        let mut c = InkCanvas::new(40, 40);
        let p = Point2::new(20.0, 20.0);
        c.stroke(p, p, RED, 5.0);
        assert!(c.has_ink(20, 20));
        assert!(c.has_ink(22, 20));
        assert!(!c.has_ink(24, 20));
        assert!(c.ink_pixels() > 1 && c.ink_pixels() < 30);
    }

    #[test]
    fn thin_dot_still_marks_its_pixel() {
        let mut c = InkCanvas::new(10, 10);
        c.stroke(Point2::new(3.0, 4.0), Point2::new(3.0, 4.0), RED, 1.0);
        assert_eq!(c.ink_pixels(), 1);
        assert_eq!(c.ink_at(3, 4), Some(RED));
    }

    #[test]
    fn stroke_covers_segment() {
        let mut c = InkCanvas::new(100, 20);
        c.stroke(Point2::new(10.0, 10.0), Point2::new(90.0, 10.0), RED, 3.0);
        for x in 10..=90 {
            assert!(c.has_ink(x, 10), "gap at x={}", x);
        }
        assert!(!c.has_ink(50, 15));
        assert!(!c.has_ink(95, 10));
    }

    #[test]
    fn stroke_is_clipped() {
        let mut c = InkCanvas::new(20, 20);
        c.stroke(Point2::new(-50.0, 10.0), Point2::new(70.0, 10.0), RED, 4.0);
        assert!(c.has_ink(0, 10));
        assert!(c.has_ink(19, 10));
        c.stroke(Point2::new(-50.0, -50.0), Point2::new(-40.0, -40.0), RED, 4.0);
    }

    #[test]
    fn ink_is_forced_opaque() {
        let mut c = InkCanvas::new(5, 5);
        c.stroke(Point2::new(2.0, 2.0), Point2::new(2.0, 2.0), 0x00000000, 1.0);
        assert_eq!(c.ink_at(2, 2), Some(0xFF000000));
    }

    #[test]
    fn composite_prefers_ink() {
        let (w, h) = (16, 8);
        let v = video(w, h);
        let mut c = InkCanvas::new(w, h);
        c.stroke(Point2::new(4.0, 4.0), Point2::new(4.0, 4.0), RED, 1.0);
        let mut out = vec![0; w * h];
        c.composite(&v, &mut out).unwrap();
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let want = if (x, y) == (4, 4) { RED } else { v[i] };
                assert_eq!(out[i], want);
            }
        }
    }

    #[test]
    fn composite_after_clear_is_video() {
        let (w, h) = (16, 8);
        let v = video(w, h);
        let mut c = InkCanvas::new(w, h);
        c.stroke(Point2::new(0.0, 0.0), Point2::new(15.0, 7.0), RED, 6.0);
        c.clear();
        let mut out = vec![0; w * h];
        c.composite(&v, &mut out).unwrap();
        assert_eq!(out, v);
    }

    #[test]
    fn composite_rejects_wrong_size() {
        let c = InkCanvas::new(4, 4);
        let mut out = vec![0; 16];
        assert!(matches!(
            c.composite(&[0; 15], &mut out),
            Err(Error::FrameSize { expected: 16, actual: 15 })
        ));
        let mut short = vec![0; 3];
        assert!(c.composite(&[0; 16], &mut short).is_err());
    }

    #[test]
    fn brush_validation() {
        assert!(Brush::new(RED, 0.5).is_err());
        assert!(Brush::new(RED, f32::NAN).is_err());
        assert_eq!(Brush::new(0x00123456, 2.0).unwrap().color, 0xFF123456);
    }

    #[test]
    fn brush_rejects_the_no_ink_colour() {
        assert!(matches!(Brush::new(NO_INK, 2.0), Err(Error::InvalidBrush(_))));
        assert!(Brush::new(0xFF000000, 2.0).is_ok());
    }

    #[test]
    fn ink_count_tracks_overlapping_strokes_and_clear() {
        let mut c = InkCanvas::new(40, 30);
        c.stroke(Point2::new(5.0, 5.0), Point2::new(35.0, 25.0), RED, 5.0);
        c.stroke(Point2::new(5.0, 25.0), Point2::new(35.0, 5.0), 0xFF00FF00, 5.0);
        c.stroke(Point2::new(20.0, 15.0), Point2::new(20.0, 15.0), RED, 9.0);
        let scanned = c.pixels().iter().filter(|&&p| p != NO_INK).count();
        assert_eq!(c.ink_pixels(), scanned);
        c.clear();
        assert_eq!(c.ink_pixels(), 0);
        c.stroke(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0), RED, 1.0);
        assert_eq!(c.ink_pixels(), 1);
    }

    #[test]
    fn continuity_first_step_is_a_dot() {
        let mut c = InkCanvas::new(100, 100);
        let mut dc = DrawContinuity::new();
        let brush = Brush::new(RED, 1.0).unwrap();
        dc.step(&mut c, Point2::new(50.0, 50.0), &brush);
        assert_eq!(c.ink_pixels(), 1);
        assert_eq!(dc.previous(), Some(Point2::new(50.0, 50.0)));
    }

    #[test]
    fn continuity_joins_consecutive_points() {
        let mut c = InkCanvas::new(100, 100);
        let mut dc = DrawContinuity::new();
        let brush = Brush::new(RED, 1.0).unwrap();
        dc.step(&mut c, Point2::new(10.0, 50.0), &brush);
        dc.step(&mut c, Point2::new(60.0, 50.0), &brush);
        for x in 10..=60 {
            assert!(c.has_ink(x, 50));
        }
    }

    #[test]
    fn continuity_reset_breaks_the_line() {
        let mut c = InkCanvas::new(100, 100);
        let mut dc = DrawContinuity::new();
        let brush = Brush::new(RED, 1.0).unwrap();
        dc.step(&mut c, Point2::new(10.0, 50.0), &brush);
        dc.reset();
        dc.step(&mut c, Point2::new(60.0, 50.0), &brush);
        assert_eq!(c.ink_pixels(), 2);
        assert!(!c.has_ink(35, 50));
    }
}
