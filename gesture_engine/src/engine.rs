//! Per-frame engine.
//!
//! `GestureEngine` owns every piece of cross-frame state and processes one
//! landmark frame to completion per call:
//!
//! 1. classify the frame,
//! 2. step the mode state machine and apply its side effects,
//! 3. run the active profile's behaviour for the new mode.
//!
//! Nothing here blocks or spawns; the host decides how frames arrive.

use hand_landmarks::{ids, LandmarkFrame, Point2};
use tracing::{debug, info};

use crate::canvas::{Brush, DrawContinuity, InkCanvas};
use crate::classifier::{classify, Classification, ClassifierRules};
use crate::config::{EngineConfig, Profile};
use crate::error::Result;
use crate::mode::{transition, Mode, ModeRules, SideEffect};
use crate::pointer::{ActiveRegion, ClickGate, PointerIntent};
use crate::projection::{CameraModel, CubeAnchor, CubeOverlay};
use crate::smoothing::SmoothingFilter;

// ════════════════════════════════════════════════════════════════════════════
// Commands
// ════════════════════════════════════════════════════════════════════════════

/// Control input from the host (usually keyboard).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ClearCanvas,
    /// Switch to the next palette colour.
    CycleBrush,
    SetProfile(Profile),
    Quit,
}

/// What the host should do after a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// FrameOutput
// ════════════════════════════════════════════════════════════════════════════

/// Index and middle fingertips while hovering; the host draws a selection
/// bar between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoverSelection {
    pub index_tip:  Point2,
    pub middle_tip: Point2,
}

/// Everything one frame produced.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameOutput {
    pub mode:           Mode,
    pub previous_mode:  Mode,
    pub classification: Classification,
    pub effects:        Vec<SideEffect>,
    /// Set in the mouse profile when the cursor moved or a click fired.
    pub pointer:        Option<PointerIntent>,
    /// Set in the cube profile whenever a hand is in view.
    pub cube:           Option<CubeOverlay>,
    pub hover:          Option<HoverSelection>,
    /// Raw fingertip that was inked this frame.
    pub draw_point:     Option<Point2>,
}

impl FrameOutput {
    fn new(previous_mode: Mode, mode: Mode, classification: Classification, effects: Vec<SideEffect>) -> Self {
        FrameOutput {
            mode,
            previous_mode,
            classification,
            effects,
            pointer:    None,
            cube:       None,
            hover:      None,
            draw_point: None,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

pub struct GestureEngine {
    config:     EngineConfig,
    classifier: ClassifierRules,
    rules:      ModeRules,
    mode:       Mode,

    // ── mouse ────────────────────────────────────────────────────────────
    region:     ActiveRegion,
    cursor:     SmoothingFilter,
    click:      ClickGate,

    // ── canvas ───────────────────────────────────────────────────────────
    canvas:     InkCanvas,
    continuity: DrawContinuity,
    brush:      Brush,
    brush_slot: usize,

    // ── cube ─────────────────────────────────────────────────────────────
    anchor:        CubeAnchor,
    anchor_filter: SmoothingFilter,

    frames: u64,
}

impl GestureEngine {
    /// Build an engine for a fresh session.  Fails only on invalid config.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let (w, h) = (config.frame.width, config.frame.height);
        let region = ActiveRegion {
            frame_w:  w as f32,
            frame_h:  h as f32,
            margin:   config.frame_margin(),
            screen_w: config.pointer.screen_width as f32,
            screen_h: config.pointer.screen_height as f32,
            mirror:   config.pointer.mirror,
        };
        let camera = CameraModel::centered(config.cube.focal_length, w, h);
        let brush = Brush::new(config.canvas.palette[0], config.canvas.brush_thickness)?;

        info!(
            profile = config.profile.name(),
            width = w,
            height = h,
            scale = config.resolution_scale(),
            "gesture engine ready"
        );

        Ok(GestureEngine {
            classifier:    config.classifier_rules(),
            rules:         config.mode_rules(),
            mode:          Mode::Idle,
            region,
            cursor:        SmoothingFilter::new(config.smoothing.k)?,
            click:         ClickGate::new(config.pointer.click_hold_frames),
            canvas:        InkCanvas::new(w as usize, h as usize),
            continuity:    DrawContinuity::new(),
            brush,
            brush_slot:    0,
            anchor:        CubeAnchor::new(camera, config.cube.anchor_depth, config.cube.half_extent),
            anchor_filter: SmoothingFilter::new(config.smoothing.k)?,
            frames:        0,
            config,
        })
    }

    // ── per-frame ────────────────────────────────────────────────────────

    /// Process one landmark frame.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutput {
        self.frames += 1;

        let classification = classify(frame, &self.classifier);
        let step = transition(self.mode, &classification, &self.rules);
        for effect in &step.effects {
            match effect {
                SideEffect::ResetDrawContinuity => self.continuity.reset(),
            }
        }
        if step.mode != self.mode {
            debug!(frame = self.frames, from = %self.mode, to = %step.mode, "mode transition");
        }
        let previous = std::mem::replace(&mut self.mode, step.mode);
        let mut out = FrameOutput::new(previous, step.mode, classification, step.effects);

        // Only complete frames get past Idle, so these are present when needed.
        let index_tip = frame.point(ids::INDEX_TIP);

        match self.rules.profile {
            Profile::Canvas => self.canvas_step(frame, index_tip, &mut out),
            Profile::Mouse  => self.mouse_step(index_tip, &mut out),
            Profile::Cube   => self.cube_step(index_tip, &mut out),
        }
        out
    }

    fn canvas_step(&mut self, frame: &LandmarkFrame, index_tip: Option<Point2>, out: &mut FrameOutput) {
        match (out.mode, index_tip) {
            (Mode::Draw, Some(tip)) => {
                self.continuity.step(&mut self.canvas, tip, &self.brush);
                out.draw_point = Some(tip);
            }
            (Mode::HoverSelect, Some(tip)) => {
                if let Some(middle) = frame.point(ids::MIDDLE_TIP) {
                    out.hover = Some(HoverSelection { index_tip: tip, middle_tip: middle });
                }
            }
            _ => {}
        }
    }

    fn mouse_step(&mut self, index_tip: Option<Point2>, out: &mut FrameOutput) {
        let mut moved = false;
        if let (Mode::Point, Some(tip)) = (out.mode, index_tip) {
            self.cursor.update(self.region.map(tip));
            moved = true;
        }
        let click = self.click.update(out.mode == Mode::PinchActive);
        if click {
            debug!(frame = self.frames, "click");
            // A pinch before any pointing frame clicks where the fingertip is.
            if let (None, Some(tip)) = (self.cursor.current(), index_tip) {
                self.cursor.update(self.region.map(tip));
            }
        }
        if moved || click {
            if let Some(current) = self.cursor.current() {
                out.pointer = Some(PointerIntent { target: self.region.output(current), click });
            }
        }
    }

    fn cube_step(&mut self, index_tip: Option<Point2>, out: &mut FrameOutput) {
        if !out.classification.hand_present() {
            return;
        }
        if let Some(tip) = index_tip {
            let smoothed = self.anchor_filter.update(tip);
            out.cube = Some(self.anchor.place(smoothed, out.mode == Mode::PinchActive));
        }
    }

    // ── commands ─────────────────────────────────────────────────────────

    pub fn apply(&mut self, command: Command) -> Control {
        match command {
            Command::ClearCanvas => {
                self.canvas.clear();
                info!("canvas cleared");
            }
            Command::CycleBrush => {
                let palette = &self.config.canvas.palette;
                self.brush_slot = (self.brush_slot + 1) % palette.len();
                self.brush.color = Brush::new(palette[self.brush_slot], self.brush.thickness)
                    .map(|b| b.color)
                    .unwrap_or(self.brush.color);
                debug!(color = %format!("{:#010X}", self.brush.color), "brush changed");
            }
            Command::SetProfile(profile) => {
                if profile != self.rules.profile {
                    self.rules.profile = profile;
                    self.config.profile = profile;
                    self.click.reset();
                    info!(profile = profile.name(), "profile switched");
                }
            }
            Command::Quit => {
                info!(frames = self.frames, "session ending");
                return Control::Quit;
            }
        }
        Control::Continue
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn mode(&self)           -> Mode          { self.mode }
    pub fn profile(&self)        -> Profile       { self.rules.profile }
    pub fn config(&self)         -> &EngineConfig { &self.config }
    pub fn canvas(&self)         -> &InkCanvas    { &self.canvas }
    pub fn brush(&self)          -> Brush         { self.brush }
    pub fn cursor(&self)         -> &SmoothingFilter { &self.cursor }
    pub fn active_region(&self)  -> &ActiveRegion { &self.region }
    pub fn frames_processed(&self) -> u64         { self.frames }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
