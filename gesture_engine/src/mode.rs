//! Modal state machine.
//!
//! The mode is recomputed every frame from the current classification only.
//! The previous mode matters for exactly one thing: entering [`Mode::Draw`]
//! from any other mode emits [`SideEffect::ResetDrawContinuity`], so a new
//! stroke never joins onto the end of an old one.
//!
//! Precedence, highest first:
//!
//! | Condition | Mode |
//! |---|---|
//! | no usable hand | `Idle` |
//! | pinch distance < threshold | `PinchActive` |
//! | index + middle extended | `HoverSelect` |
//! | index extended, middle curled | `Draw` (canvas) / `Point` (mouse, cube) |
//! | anything else | `Idle` |

use std::fmt;

use crate::classifier::Classification;
use crate::config::Profile;

/// Discrete interaction state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Idle,
    HoverSelect,
    Draw,
    Point,
    PinchActive,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Idle        => "idle",
            Mode::HoverSelect => "hover-select",
            Mode::Draw        => "draw",
            Mode::Point       => "point",
            Mode::PinchActive => "pinch",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State change the engine must apply because of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideEffect {
    /// Forget the previous draw point.
    ResetDrawContinuity,
}

/// Result of one step of the state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub mode:    Mode,
    pub effects: Vec<SideEffect>,
}

/// Mode thresholds, already scaled to frame pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeRules {
    pub pinch_threshold: f32,
    pub profile:         Profile,
}

impl Default for ModeRules {
    fn default() -> Self {
        ModeRules { pinch_threshold: 30.0, profile: Profile::Canvas }
    }
}

/// Mode for a classification, ignoring history.
pub fn select_mode(c: &Classification, rules: &ModeRules) -> Mode {
    let pinch = match c.pinch {
        Some(d) => d,
        None    => return Mode::Idle,
    };
    let f = &c.fingers;

    if pinch < rules.pinch_threshold {
        Mode::PinchActive
    } else if f.index() && f.middle() {
        Mode::HoverSelect
    } else if f.index() {
        rules.profile.index_only_mode()
    } else {
        Mode::Idle
    }
}

/// Advance the state machine by one frame.
pub fn transition(prev: Mode, c: &Classification, rules: &ModeRules) -> Transition {
    let mode = select_mode(c, rules);
    let mut effects = Vec::new();
    if mode == Mode::Draw && prev != Mode::Draw {
        effects.push(SideEffect::ResetDrawContinuity);
    }
    Transition { mode, effects }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FingerState;

    const ALL_MODES: [Mode; 5] = [
        Mode::Idle, Mode::HoverSelect, Mode::Draw, Mode::Point, Mode::PinchActive,
    ];

    fn hand(fingers: [bool; 5], pinch: f32) -> Classification {
        Classification { fingers: FingerState(fingers), pinch: Some(pinch) }
    }

    const INDEX:        [bool; 5] = [false, true, false, false, false];
    const INDEX_MIDDLE: [bool; 5] = [false, true, true,  false, false];

    #[test]
    fn no_hand_is_idle_from_any_mode() {
        let rules = ModeRules::default();
        for prev in ALL_MODES {
            let t = transition(prev, &Classification::NO_HAND, &rules);
            assert_eq!(t.mode, Mode::Idle, "prev={}", prev);
            assert!(t.effects.is_empty());
        }
    }

    #[test]
    fn index_only_depends_on_profile() {
        let c = hand(INDEX, 200.0);
        let canvas = ModeRules { profile: Profile::Canvas, ..ModeRules::default() };
        let mouse  = ModeRules { profile: Profile::Mouse,  ..ModeRules::default() };
        let cube   = ModeRules { profile: Profile::Cube,   ..ModeRules::default() };
        assert_eq!(select_mode(&c, &canvas), Mode::Draw);
        assert_eq!(select_mode(&c, &mouse),  Mode::Point);
        assert_eq!(select_mode(&c, &cube),   Mode::Point);
    }

    #[test]
    fn two_fingers_hover() {
        assert_eq!(select_mode(&hand(INDEX_MIDDLE, 200.0), &ModeRules::default()), Mode::HoverSelect);
    }

    #[test]
    fn pinch_beats_hover_select() {
        let c = hand(INDEX_MIDDLE, 12.0);
        assert_eq!(select_mode(&c, &ModeRules::default()), Mode::PinchActive);
    }

    #[test]
    fn pinch_beats_draw() {
        let c = hand(INDEX, 20.0);
        assert_eq!(select_mode(&c, &ModeRules::default()), Mode::PinchActive);
    }

    #[test]
    fn pinch_threshold_is_strict() {
        let rules = ModeRules::default();
        assert_eq!(select_mode(&hand(INDEX, 30.0), &rules), Mode::Draw);
        assert_eq!(select_mode(&hand(INDEX, 29.9), &rules), Mode::PinchActive);
    }

    #[test]
    fn other_patterns_are_idle() {
        let rules = ModeRules::default();
        assert_eq!(select_mode(&hand([false; 5], 200.0), &rules), Mode::Idle);
        assert_eq!(select_mode(&hand([true, false, true, true, true], 200.0), &rules), Mode::Idle);
    }

    #[test]
    fn entering_draw_resets_continuity() {
        let rules = ModeRules::default();
        let c = hand(INDEX, 200.0);
        for prev in ALL_MODES.iter().copied().filter(|&m| m != Mode::Draw) {
            let t = transition(prev, &c, &rules);
            assert_eq!(t.mode, Mode::Draw);
            assert_eq!(t.effects, vec![SideEffect::ResetDrawContinuity], "prev={}", prev);
        }
    }

    #[test]
    fn staying_in_draw_keeps_continuity() {
        let t = transition(Mode::Draw, &hand(INDEX, 200.0), &ModeRules::default());
        assert_eq!(t.mode, Mode::Draw);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn leaving_draw_has_no_effect() {
        let t = transition(Mode::Draw, &hand(INDEX_MIDDLE, 200.0), &ModeRules::default());
        assert_eq!(t.mode, Mode::HoverSelect);
        assert!(t.effects.is_empty());
    }
}
