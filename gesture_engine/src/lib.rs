//! # gesture_engine
//!
//! Turns a stream of 21-point hand-landmark frames into interaction state:
//! a per-frame mode, a smoothed cursor, an ink canvas, and a cube anchored
//! under the index fingertip.
//!
//! ## Gesture → Mode mapping
//!
//! | Gesture | Mode | Canvas | Mouse | Cube |
//! |---|---|---|---|---|
//! | No hand / fist | `Idle` | nothing | nothing | hidden |
//! | Thumb tip on index tip | `PinchActive` | nothing | click (debounced) | grabbed |
//! | Index + middle up | `HoverSelect` | selection bar, no ink | hold | shown |
//! | Index up, middle down | `Draw` / `Point` | ink | cursor follows | follows |
//!
//! ## Pipeline
//!
//! ```text
//!  LandmarkFrame ─▶ classify ─▶ transition ─▶ profile step ─▶ FrameOutput
//!                       │            │              │
//!                 FingerState    Mode + side    canvas / cursor / cube
//!                 + pinch        effects
//! ```
//!
//! [`GestureEngine`] owns every piece of cross-frame state.  The pieces it
//! is built from ([`classify`], [`transition`], [`SmoothingFilter`],
//! [`CameraModel`], [`InkCanvas`], [`ActiveRegion`]) are public and usable
//! on their own.
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_engine::{EngineConfig, GestureEngine, Mode, Profile};
//! use hand_landmarks::{Finger, HandPose, Point2};
//!
//! let mut cfg = EngineConfig::for_profile(Profile::Canvas);
//! cfg.frame.width = 640;
//! cfg.frame.height = 480;
//! let mut engine = GestureEngine::new(cfg).unwrap();
//!
//! let frame = HandPose::new(Point2::new(200.0, 150.0)).extend(Finger::Index).build();
//! let out = engine.process(&frame);
//! assert_eq!(out.mode, Mode::Draw);
//! assert!(engine.canvas().has_ink(200, 150));
//! ```

pub mod error;
pub mod config;
pub mod classifier;
pub mod mode;
pub mod smoothing;
pub mod projection;
pub mod canvas;
pub mod pointer;
pub mod engine;

pub use error::{Error, Result};
pub use config::{
    CanvasConfig, ClassifierConfig, CubeConfig, EngineConfig, FrameConfig, PointerConfig,
    Profile, SmoothingConfig, REFERENCE_WIDTH,
};
pub use classifier::{classify, pinch_distance, Classification, ClassifierRules, FingerState};
pub use mode::{select_mode, transition, Mode, ModeRules, SideEffect, Transition};
pub use smoothing::{frames_to_within, CursorState, SmoothingFilter};
pub use projection::{CameraModel, Cube, CubeAnchor, CubeOverlay, Vec3, CUBE_EDGES, DEPTH_FLOOR};
pub use canvas::{Brush, DrawContinuity, InkCanvas, NO_INK};
pub use pointer::{ActiveRegion, ClickGate, PointerIntent};
pub use engine::{Command, Control, FrameOutput, GestureEngine, HoverSelection};
