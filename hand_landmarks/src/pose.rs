//! Synthetic hand poses.
//!
//! [`HandPose`] lays out a stylised upright hand, palm facing the camera,
//! and places it so that the index fingertip lands on a chosen pixel.  Each
//! finger can be extended or curled, the thumb can be pinched against the
//! index tip, and the whole hand can be scaled or mirrored.
//!
//! The layout (wrist at the origin, `y` up is negative, unit scale):
//!
//! ```text
//!            I   M   R
//!            |   |   |   P
//!            |   |   |   |
//!     T      5   9  13  17      ← MCP knuckle line
//!      \ 3
//!        2
//!         1
//!             0 (wrist)
//! ```

use crate::landmark::{Finger, LandmarkFrame, LANDMARK_COUNT};
use crate::point::Point2;

/// MCP knuckle positions for index, middle, ring and pinky, relative to the
/// wrist at unit scale.
const KNUCKLES: [Point2; 4] = [
    Point2::new(-30.0, -90.0),
    Point2::new( -8.0, -95.0),
    Point2::new( 14.0, -90.0),
    Point2::new( 34.0, -80.0),
];

/// PIP, DIP and tip offsets from the MCP for a straight finger.
const STRAIGHT: [Point2; 3] = [
    Point2::new(0.0, -30.0),
    Point2::new(0.0, -52.0),
    Point2::new(0.0, -70.0),
];

/// PIP, DIP and tip offsets from the MCP for a finger folded into the palm.
const FOLDED: [Point2; 3] = [
    Point2::new(0.0, -22.0),
    Point2::new(2.0, -12.0),
    Point2::new(1.0,   5.0),
];

const THUMB_CMC: Point2 = Point2::new(-25.0, -20.0);
const THUMB_MCP: Point2 = Point2::new(-45.0, -40.0);
const THUMB_IP:  Point2 = Point2::new(-60.0, -55.0);
const THUMB_TIP_OPEN:   Point2 = Point2::new(-80.0, -65.0);
const THUMB_TIP_FOLDED: Point2 = Point2::new(-20.0, -45.0);

/// Offset of the thumb tip from the index tip when pinching.
const PINCH_OFFSET: Point2 = Point2::new(-10.0, 6.0);

/// Detector confidence reported on synthetic frames.
const CONFIDENCE: f32 = 0.95;

/// Builder for a synthetic [`LandmarkFrame`].
#[derive(Clone, Debug)]
pub struct HandPose {
    anchor:    Point2,
    extended:  [bool; 5],
    scale:     f32,
    mirrored:  bool,
    pinch:     bool,
    thumb_tip: Option<Point2>,
}

impl HandPose {
    /// A relaxed fist whose index fingertip sits at `index_tip`.
    pub fn new(index_tip: Point2) -> Self {
        HandPose {
            anchor:    index_tip,
            extended:  [false; 5],
            scale:     1.0,
            mirrored:  false,
            pinch:     false,
            thumb_tip: None,
        }
    }

    pub fn extend(mut self, finger: Finger) -> Self {
        self.extended[finger.slot()] = true;
        self
    }

    /// Extend every finger (open palm).
    pub fn open(mut self) -> Self {
        self.extended = [true; 5];
        self
    }

    /// Bring the thumb tip against the index tip.
    pub fn pinch(mut self) -> Self {
        self.pinch = true;
        self
    }

    /// Put the thumb tip at an absolute pixel position.
    pub fn thumb_tip(mut self, at: Point2) -> Self {
        self.thumb_tip = Some(at);
        self
    }

    /// Hand size multiplier; `1.0` suits a 640-pixel-wide frame.
    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Flip left/right, so the thumb points toward larger `x`.
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Lay out the 21 landmarks.
    pub fn build(&self) -> LandmarkFrame {
        let mut local = [Point2::ZERO; LANDMARK_COUNT];

        local[Finger::Thumb.base()   as usize] = THUMB_CMC;
        local[Finger::Thumb.second() as usize] = THUMB_MCP;
        local[Finger::Thumb.third()  as usize] = THUMB_IP;
        local[Finger::Thumb.tip()    as usize] = if self.extended[Finger::Thumb.slot()] {
            THUMB_TIP_OPEN
        } else {
            THUMB_TIP_FOLDED
        };

        for (finger, knuckle) in Finger::ALL[1..].iter().zip(KNUCKLES.iter()) {
            let joints = if self.extended[finger.slot()] { &STRAIGHT } else { &FOLDED };
            local[finger.base() as usize] = *knuckle;
            for (k, offset) in joints.iter().enumerate() {
                local[finger.base() as usize + 1 + k] = *knuckle + *offset;
            }
        }

        let flip = if self.mirrored { -1.0 } else { 1.0 };
        let origin = local[Finger::Index.tip() as usize];
        let mut points = [Point2::ZERO; LANDMARK_COUNT];
        for (out, p) in points.iter_mut().zip(local.iter()) {
            let d = (*p - origin) * self.scale;
            *out = self.anchor + Point2::new(d.x * flip, d.y);
        }

        let thumb = Finger::Thumb.tip() as usize;
        if let Some(at) = self.thumb_tip {
            points[thumb] = at;
        } else if self.pinch {
            let d = PINCH_OFFSET * self.scale;
            points[thumb] = self.anchor + Point2::new(d.x * flip, d.y);
        }

        LandmarkFrame::from_points(points, CONFIDENCE)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
