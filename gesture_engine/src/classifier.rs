//! Gesture classifier: landmark frame → finger states + pinch metric.
//!
//! Pure functions, no state.  Hysteresis on the pinch signal belongs to
//! whoever consumes it (see [`crate::pointer::ClickGate`]).
//!
//! # Rules
//!
//! * **Index, middle, ring, pinky** are extended when the tip is above its
//!   PIP joint (smaller `y`) by more than the extension margin.
//! * **Thumb** extends sideways, so it is judged on the lateral axis of the
//!   palm instead: the knuckle line from index MCP to pinky MCP tells which
//!   way is "outward", and the thumb is extended when its tip sits further
//!   outward than its IP joint by more than the margin.  This holds for
//!   either hand and for mirrored video.
//! * **Pinch** is the pixel distance between thumb tip and index tip.

use hand_landmarks::{ids, Finger, LandmarkFrame, Point2};

/// Extended (`true`) / curled (`false`) per finger: thumb, index, middle,
/// ring, pinky.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FingerState(pub [bool; 5]);

impl FingerState {
    /// All fingers curled.
    pub const NEUTRAL: FingerState = FingerState([false; 5]);

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger.slot()]
    }

    pub fn thumb(&self)  -> bool { self.0[0] }
    pub fn index(&self)  -> bool { self.0[1] }
    pub fn middle(&self) -> bool { self.0[2] }
    pub fn ring(&self)   -> bool { self.0[3] }
    pub fn pinky(&self)  -> bool { self.0[4] }

    /// Number of extended fingers.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    /// True iff `finger` is the one and only extended finger.
    pub fn only(&self, finger: Finger) -> bool {
        self.is_extended(finger) && self.count() == 1
    }
}

/// Classifier output for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Classification {
    pub fingers: FingerState,
    /// Thumb-tip ↔ index-tip distance in pixels; `None` when no usable hand.
    pub pinch:   Option<f32>,
}

impl Classification {
    /// Output for a frame with no usable hand.
    pub const NO_HAND: Classification = Classification {
        fingers: FingerState::NEUTRAL,
        pinch:   None,
    };

    pub fn hand_present(&self) -> bool {
        self.pinch.is_some()
    }
}

/// Thresholds for [`classify`], already scaled to frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierRules {
    pub extension_margin: f32,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        ClassifierRules { extension_margin: 10.0 }
    }
}

/// Classify one frame.
///
/// Empty and incomplete frames both yield [`Classification::NO_HAND`].
pub fn classify(frame: &LandmarkFrame, rules: &ClassifierRules) -> Classification {
    if !frame.is_complete() {
        return Classification::NO_HAND;
    }

    let mut fingers = FingerState::NEUTRAL;
    fingers.0[Finger::Thumb.slot()] = thumb_extended(frame, rules.extension_margin);
    for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
        fingers.0[finger.slot()] = finger_extended(frame, finger, rules.extension_margin);
    }

    Classification {
        fingers,
        pinch: pinch_distance(frame, ids::THUMB_TIP, ids::INDEX_TIP),
    }
}

/// Pixel distance between two landmarks, if both are present.
pub fn pinch_distance(frame: &LandmarkFrame, a: u8, b: u8) -> Option<f32> {
    Some(frame.point(a)?.distance(frame.point(b)?))
}

// `frame` is complete here, so indexing by id is safe.
fn at(frame: &LandmarkFrame, id: u8) -> Point2 {
    frame.landmarks[id as usize].pos
}

fn finger_extended(frame: &LandmarkFrame, finger: Finger, margin: f32) -> bool {
    let tip = at(frame, finger.tip());
    let pip = at(frame, finger.second());
    tip.y < pip.y - margin
}

fn thumb_extended(frame: &LandmarkFrame, margin: f32) -> bool {
    let index_mcp = at(frame, ids::INDEX_MCP);
    let pinky_mcp = at(frame, ids::PINKY_MCP);
    // +1 when the pinky side is toward larger x, so "outward" is toward smaller x.
    let side = if pinky_mcp.x >= index_mcp.x { 1.0 } else { -1.0 };

    let tip = at(frame, ids::THUMB_TIP);
    let ip  = at(frame, ids::THUMB_IP);
    (ip.x - tip.x) * side > margin
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
