//! Virtual-mouse mapping: camera frame → screen, and pinch → click.

use hand_landmarks::Point2;

/// Target for the system pointer this frame, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerIntent {
    pub target: Point2,
    pub click:  bool,
}

// ════════════════════════════════════════════════════════════════════════════
// ActiveRegion
// ════════════════════════════════════════════════════════════════════════════

/// Inner rectangle of the camera frame that spans the whole screen.
///
/// The frame is shrunk by `margin` on every side so a hand near the middle of
/// the camera view can still reach the screen corners.  Points outside the
/// region clamp to the screen edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveRegion {
    pub frame_w:  f32,
    pub frame_h:  f32,
    pub margin:   f32,
    pub screen_w: f32,
    pub screen_h: f32,
    pub mirror:   bool,
}

impl ActiveRegion {
    /// Top-left and bottom-right corners of the region in frame pixels.
    pub fn bounds(&self) -> (Point2, Point2) {
        (
            Point2::new(self.margin, self.margin),
            Point2::new(self.frame_w - self.margin, self.frame_h - self.margin),
        )
    }

    /// Frame point → screen point (before smoothing, not mirrored).
    pub fn map(&self, p: Point2) -> Point2 {
        let (lo, hi) = self.bounds();
        Point2::new(
            interp(p.x, lo.x, hi.x, self.screen_w),
            interp(p.y, lo.y, hi.y, self.screen_h),
        )
    }

    /// Apply the horizontal flip to a smoothed screen point.
    pub fn output(&self, p: Point2) -> Point2 {
        if self.mirror {
            Point2::new(self.screen_w - p.x, p.y)
        } else {
            p
        }
    }
}

fn interp(v: f32, lo: f32, hi: f32, out: f32) -> f32 {
    if hi <= lo {
        return 0.0;
    }
    ((v - lo) / (hi - lo)).clamp(0.0, 1.0) * out
}

// ════════════════════════════════════════════════════════════════════════════
// ClickGate
// ════════════════════════════════════════════════════════════════════════════

/// Debounces the pinch signal into single clicks.
///
/// Fires once when a pinch has been held for `hold_frames` consecutive
/// frames, then stays quiet until the pinch is released.
#[derive(Clone, Debug)]
pub struct ClickGate {
    hold_frames: u32,
    held:        u32,
    fired:       bool,
}

impl ClickGate {
    pub fn new(hold_frames: u32) -> Self {
        ClickGate { hold_frames: hold_frames.max(1), held: 0, fired: false }
    }

    /// Feed this frame's pinch state; returns `true` on the frame a click fires.
    pub fn update(&mut self, pinching: bool) -> bool {
        if !pinching {
            self.held = 0;
            self.fired = false;
            return false;
        }
        self.held = self.held.saturating_add(1);
        if !self.fired && self.held >= self.hold_frames {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.held = 0;
        self.fired = false;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
