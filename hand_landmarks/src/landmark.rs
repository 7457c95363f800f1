//! Landmarks and landmark frames.

use crate::point::Point2;

/// Number of landmarks in a complete hand.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Anatomical indices
// ════════════════════════════════════════════════════════════════════════════

/// Fixed landmark indices.  Stable across every frame in which a hand is
/// present.
pub mod ids {
    pub const WRIST:      u8 = 0;
    pub const THUMB_CMC:  u8 = 1;
    pub const THUMB_MCP:  u8 = 2;
    pub const THUMB_IP:   u8 = 3;
    pub const THUMB_TIP:  u8 = 4;
    pub const INDEX_MCP:  u8 = 5;
    pub const INDEX_PIP:  u8 = 6;
    pub const INDEX_DIP:  u8 = 7;
    pub const INDEX_TIP:  u8 = 8;
    pub const MIDDLE_MCP: u8 = 9;
    pub const MIDDLE_PIP: u8 = 10;
    pub const MIDDLE_DIP: u8 = 11;
    pub const MIDDLE_TIP: u8 = 12;
    pub const RING_MCP:   u8 = 13;
    pub const RING_PIP:   u8 = 14;
    pub const RING_DIP:   u8 = 15;
    pub const RING_TIP:   u8 = 16;
    pub const PINKY_MCP:  u8 = 17;
    pub const PINKY_PIP:  u8 = 18;
    pub const PINKY_DIP:  u8 = 19;
    pub const PINKY_TIP:  u8 = 20;
}

/// Bone connections for drawing the hand skeleton.
pub const HAND_SKELETON: [(u8, u8); 21] = {
    use ids::*;
    [
        (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
        (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
        (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
        (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
        (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
        (INDEX_MCP, MIDDLE_MCP),
    ]
};

// ════════════════════════════════════════════════════════════════════════════
// Finger
// ════════════════════════════════════════════════════════════════════════════

/// The five digits, in landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    /// Position in the 5-element finger-state vector.
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Base joint id (CMC for the thumb, MCP otherwise).
    pub fn base(self) -> u8 {
        1 + 4 * self as u8
    }

    /// Second joint id (MCP for the thumb, PIP otherwise).
    pub fn second(self) -> u8 {
        self.base() + 1
    }

    /// Third joint id (IP for the thumb, DIP otherwise).
    pub fn third(self) -> u8 {
        self.base() + 2
    }

    pub fn tip(self) -> u8 {
        self.base() + 3
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark / LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// One labeled keypoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub id:    u8,
    pub pos:   Point2,
    /// Relative depth when the detector reports one (2.5-D landmarks).
    pub depth: Option<f32>,
}

impl Landmark {
    pub fn new(id: u8, pos: Point2) -> Self {
        Landmark { id, pos, depth: None }
    }
}

/// All landmarks reported for the tracked hand in one video frame.
///
/// Empty when no hand is tracked.  A frame that holds landmarks but is not
/// [`complete`](Self::is_complete) is ambiguous and downstream consumers
/// treat it like an absent hand.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LandmarkFrame {
    pub landmarks:  Vec<Landmark>,
    /// Detector confidence, 0.0–1.0.
    pub confidence: f32,
}

impl LandmarkFrame {
    /// A frame with no hand in it.
    pub fn empty() -> Self {
        LandmarkFrame::default()
    }

    /// Build a frame from 21 points ordered by landmark id.
    pub fn from_points(points: [Point2; LANDMARK_COUNT], confidence: f32) -> Self {
        let landmarks = points
            .iter()
            .enumerate()
            .map(|(i, &p)| Landmark::new(i as u8, p))
            .collect();
        LandmarkFrame { landmarks, confidence }
    }

    /// True when the detector reported a hand at all.
    pub fn is_present(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// True when all 21 landmarks are present, ordered by id.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() == LANDMARK_COUNT
            && self.landmarks.iter().enumerate().all(|(i, lm)| lm.id as usize == i)
    }

    /// Position of landmark `id`, if present.
    pub fn point(&self, id: u8) -> Option<Point2> {
        match self.landmarks.get(id as usize) {
            Some(lm) if lm.id == id => Some(lm.pos),
            _ => self.landmarks.iter().find(|lm| lm.id == id).map(|lm| lm.pos),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
