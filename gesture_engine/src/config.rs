//! Engine configuration.
//!
//! Pixel thresholds are written for a 640-pixel-wide reference frame and
//! scaled by `frame.width / 640` when the engine is built, so the same
//! config file behaves the same at any capture resolution.  Frame counts
//! (smoothing constant, click hold) and camera constants are not scaled.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierRules;
use crate::canvas::NO_INK;
use crate::error::{Error, Result};
use crate::mode::{Mode, ModeRules};
use crate::projection::DEPTH_FLOOR;

/// Frame width the pixel thresholds are tuned for.
pub const REFERENCE_WIDTH: f32 = 640.0;

// ════════════════════════════════════════════════════════════════════════════
// Profile
// ════════════════════════════════════════════════════════════════════════════

/// Which interaction the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Air canvas: index finger draws, two fingers hover.
    #[default]
    Canvas,
    /// Virtual mouse: index finger steers the cursor, pinch clicks.
    Mouse,
    /// AR cube: the cube follows the index fingertip, pinch grabs it.
    Cube,
}

impl Profile {
    pub const ALL: [Profile; 3] = [Profile::Canvas, Profile::Mouse, Profile::Cube];

    pub fn name(self) -> &'static str {
        match self {
            Profile::Canvas => "canvas",
            Profile::Mouse  => "mouse",
            Profile::Cube   => "cube",
        }
    }

    /// Mode selected when only the index finger (of index/middle) is up.
    pub fn index_only_mode(self) -> Mode {
        match self {
            Profile::Canvas => Mode::Draw,
            Profile::Mouse | Profile::Cube => Mode::Point,
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Profile::ALL
            .iter()
            .copied()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown profile {:?}", s)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EngineConfig
// ════════════════════════════════════════════════════════════════════════════

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub profile:    Profile,
    #[serde(default)]
    pub frame:      FrameConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub smoothing:  SmoothingConfig,
    #[serde(default)]
    pub pointer:    PointerConfig,
    #[serde(default)]
    pub cube:       CubeConfig,
    #[serde(default)]
    pub canvas:     CanvasConfig,
}

/// Video frame geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameConfig {
    pub width:  u32,
    pub height: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        FrameConfig { width: 1280, height: 720 }
    }
}

/// Gesture thresholds, in reference-width pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// How far past its middle joint a fingertip must be to count as extended.
    pub extension_margin_px: f32,
    /// Thumb-to-index distance below which the hand is pinching.
    pub pinch_threshold_px:  f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            extension_margin_px: 10.0,
            pinch_threshold_px:  30.0,
        }
    }
}

/// Cursor smoothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Lag constant `k ≥ 1`; larger is smoother and slower.
    pub k: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        SmoothingConfig { k: 7.0 }
    }
}

/// Virtual mouse mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerConfig {
    pub screen_width:      u32,
    pub screen_height:     u32,
    /// Border of the camera frame (reference-width pixels) that maps past the
    /// screen edges, so the hand can reach the corners.
    pub frame_margin_px:   f32,
    /// Flip the cursor horizontally (mirror-view cameras).
    pub mirror:            bool,
    /// Consecutive pinch frames required before a click fires.
    pub click_hold_frames: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig {
            screen_width:      1920,
            screen_height:     1080,
            frame_margin_px:   100.0,
            mirror:            true,
            click_hold_frames: 3,
        }
    }
}

/// AR cube camera and object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeConfig {
    pub focal_length: f32,
    /// Assumed fingertip depth used for back-projection.
    pub anchor_depth: f32,
    pub half_extent:  f32,
}

impl Default for CubeConfig {
    fn default() -> Self {
        CubeConfig {
            focal_length: 600.0,
            anchor_depth: 500.0,
            half_extent:  75.0,
        }
    }
}

/// Ink brush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Brush thickness in frame pixels.
    pub brush_thickness: f32,
    /// ARGB colours the brush cycles through; the first is the default.
    pub palette:         Vec<u32>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        CanvasConfig {
            brush_thickness: 15.0,
            palette: vec![0xFFFF00FF, 0xFF00A0FF, 0xFF30FF30, 0xFFFFE000],
        }
    }
}

impl EngineConfig {
    /// Config for `profile` with every other section at its default.
    pub fn for_profile(profile: Profile) -> Self {
        EngineConfig { profile, ..EngineConfig::default() }
    }

    /// Multiplier applied to reference-width pixel thresholds.
    pub fn resolution_scale(&self) -> f32 {
        self.frame.width as f32 / REFERENCE_WIDTH
    }

    pub fn classifier_rules(&self) -> ClassifierRules {
        ClassifierRules {
            extension_margin: self.classifier.extension_margin_px * self.resolution_scale(),
        }
    }

    pub fn mode_rules(&self) -> ModeRules {
        ModeRules {
            pinch_threshold: self.classifier.pinch_threshold_px * self.resolution_scale(),
            profile:         self.profile,
        }
    }

    /// Pointer frame margin in frame pixels.
    pub fn frame_margin(&self) -> f32 {
        self.pointer.frame_margin_px * self.resolution_scale()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        fn check(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
            if ok { Ok(()) } else { Err(Error::Config(msg())) }
        }

        check(self.frame.width > 0 && self.frame.height > 0, || {
            format!("frame must be non-empty, got {}x{}", self.frame.width, self.frame.height)
        })?;
        check(self.classifier.extension_margin_px >= 0.0, || {
            format!("extension_margin_px must be ≥ 0, got {}", self.classifier.extension_margin_px)
        })?;
        check(self.classifier.pinch_threshold_px > 0.0, || {
            format!("pinch_threshold_px must be > 0, got {}", self.classifier.pinch_threshold_px)
        })?;
        check(self.smoothing.k.is_finite() && self.smoothing.k >= 1.0, || {
            format!("smoothing k must be ≥ 1, got {}", self.smoothing.k)
        })?;
        check(self.pointer.screen_width > 0 && self.pointer.screen_height > 0, || {
            "screen size must be non-empty".to_string()
        })?;
        let margin = self.frame_margin();
        check(
            margin >= 0.0
                && 2.0 * margin < self.frame.width as f32
                && 2.0 * margin < self.frame.height as f32,
            || format!("frame_margin_px {} leaves no active region", self.pointer.frame_margin_px),
        )?;
        check(self.pointer.click_hold_frames >= 1, || {
            "click_hold_frames must be ≥ 1".to_string()
        })?;
        check(self.cube.focal_length > 0.0, || {
            format!("focal_length must be > 0, got {}", self.cube.focal_length)
        })?;
        check(self.cube.anchor_depth > DEPTH_FLOOR, || {
            format!("anchor_depth must be > {}, got {}", DEPTH_FLOOR, self.cube.anchor_depth)
        })?;
        check(self.cube.half_extent > 0.0, || {
            format!("half_extent must be > 0, got {}", self.cube.half_extent)
        })?;
        check(self.canvas.brush_thickness.is_finite() && self.canvas.brush_thickness >= 1.0, || {
            format!("brush_thickness must be ≥ 1, got {}", self.canvas.brush_thickness)
        })?;
        check(!self.canvas.palette.is_empty(), || "palette must not be empty".to_string())?;
        check(!self.canvas.palette.contains(&NO_INK), || {
            "palette colour 0 is reserved for \"no ink\"".to_string()
        })?;
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Generate TOML representation.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
