//! Exponential-lag smoothing of a tracked 2-D point.
//!
//! `current = previous + (target − previous) / k`
//!
//! Every output lies on the segment between the previous output and the new
//! target, so the filter never overshoots.  A sustained target is approached
//! geometrically: the remaining distance shrinks by `(1 − 1/k)` per frame.

use hand_landmarks::Point2;

use crate::error::{Error, Result};

/// Last two smoothed positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorState {
    pub previous: Point2,
    pub current:  Point2,
}

/// Smoothing filter with its own cursor state.
///
/// Starts undefined; the first [`update`](Self::update) passes the target
/// through unchanged.  Only [`reset`](Self::reset) returns it to undefined.
#[derive(Clone, Debug)]
pub struct SmoothingFilter {
    k:     f32,
    state: Option<CursorState>,
}

impl SmoothingFilter {
    pub fn new(k: f32) -> Result<Self> {
        if !(k.is_finite() && k >= 1.0) {
            return Err(Error::Config(format!("smoothing k must be ≥ 1, got {}", k)));
        }
        Ok(SmoothingFilter { k, state: None })
    }

    pub fn k(&self) -> f32 {
        self.k
    }

    /// Feed a raw target, get the smoothed position.
    pub fn update(&mut self, target: Point2) -> Point2 {
        let next = match self.state {
            None => CursorState { previous: target, current: target },
            Some(s) => CursorState {
                previous: s.current,
                current:  s.current + (target - s.current) * (1.0 / self.k),
            },
        };
        self.state = Some(next);
        next.current
    }

    /// Latest smoothed position, if any update has happened.
    pub fn current(&self) -> Option<Point2> {
        self.state.map(|s| s.current)
    }

    pub fn state(&self) -> Option<CursorState> {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = None;
    }
}

/// Frames of a sustained target needed to close all but `fraction` of the
/// initial gap: `⌈ln(fraction) / ln(1 − 1/k)⌉`.
pub fn frames_to_within(k: f32, fraction: f32) -> u32 {
    if k <= 1.0 {
        return 1;
    }
    let keep = 1.0 - 1.0 / k as f64;
    ((fraction as f64).ln() / keep.ln()).ceil() as u32
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_k_below_one() {
        assert!(SmoothingFilter::new(0.9).is_err());
        assert!(SmoothingFilter::new(f32::INFINITY).is_err());
        assert!(SmoothingFilter::new(1.0).is_ok());
    }

    #[test]
    fn first_update_is_exact() {
        let mut f = SmoothingFilter::new(7.0).unwrap();
        assert_eq!(f.current(), None);
        let p = Point2::new(812.5, 33.0);
        assert_eq!(f.update(p), p);
        assert_eq!(f.state(), Some(CursorState { previous: p, current: p }));
    }

    #[test]
    fn one_step_moves_one_kth() {
        let mut f = SmoothingFilter::new(4.0).unwrap();
        f.update(Point2::new(0.0, 0.0));
        let out = f.update(Point2::new(100.0, 40.0));
        assert_eq!(out, Point2::new(25.0, 10.0));
        assert_eq!(f.state().unwrap().previous, Point2::new(0.0, 0.0));
    }

    #[test]
    fn k_one_tracks_exactly() {
        let mut f = SmoothingFilter::new(1.0).unwrap();
        f.update(Point2::new(5.0, 5.0));
        assert_eq!(f.update(Point2::new(9.0, -3.0)), Point2::new(9.0, -3.0));
    }

    #[test]
    fn never_overshoots() {
        let mut f = SmoothingFilter::new(3.0).unwrap();
        let mut prev = f.update(Point2::new(0.0, 0.0));
        let targets = [(100.0, 0.0), (-50.0, 20.0), (10.0, 10.0), (10.0, 10.0), (300.0, -80.0)];
        for &(x, y) in &targets {
            let t = Point2::new(x, y);
            let out = f.update(t);
            // Collinear and between prev and t.
            let seg = prev.distance(t);
            let sum = prev.distance(out) + out.distance(t);
            assert!((sum - seg).abs() < 1e-3, "off segment: {:?} -> {:?} -> {:?}", prev, out, t);
            prev = out;
        }
    }

    #[test]
    fn converges_geometrically() {
        let k = 7.0;
        let mut f = SmoothingFilter::new(k).unwrap();
        let start = Point2::new(0.0, 0.0);
        let target = Point2::new(640.0, 480.0);
        f.update(start);
        let initial = start.distance(target);

        let n = frames_to_within(k, 0.01);
        assert_eq!(n, 30);

        let mut last = initial;
        for _ in 0..n {
            let d = f.update(target).distance(target);
            assert!(d < last, "distance must strictly decrease");
            last = d;
        }
        assert!(last <= 0.01 * initial, "{} not within 1% of {}", last, initial);
    }

    #[test]
    fn frames_to_within_edge_cases() {
        assert_eq!(frames_to_within(1.0, 0.01), 1);
        assert_eq!(frames_to_within(2.0, 0.01), 7);
    }

    #[test]
    fn reset_returns_to_undefined() {
        let mut f = SmoothingFilter::new(7.0).unwrap();
        f.update(Point2::new(1.0, 1.0));
        f.update(Point2::new(50.0, 50.0));
        f.reset();
        assert_eq!(f.current(), None);
        assert_eq!(f.update(Point2::new(9.0, 9.0)), Point2::new(9.0, 9.0));
    }
}
