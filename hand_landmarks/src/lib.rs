//! # hand_landmarks
//!
//! The data contract between a hand-landmark detector and everything
//! downstream of it.
//!
//! A detector reports, per video frame, either nothing (no hand) or an
//! ordered set of 21 labeled keypoints in pixel space.  The indices have a
//! fixed anatomical meaning for every frame:
//!
//! | Index | Landmark |
//! |---|---|
//! | 0 | wrist |
//! | 1–4 | thumb CMC, MCP, IP, tip |
//! | 5–8 | index MCP, PIP, DIP, tip |
//! | 9–12 | middle MCP, PIP, DIP, tip |
//! | 13–16 | ring MCP, PIP, DIP, tip |
//! | 17–20 | pinky MCP, PIP, DIP, tip |
//!
//! Besides the types, the crate ships [`HandPose`], a small builder that
//! produces anatomically plausible frames from a fingertip position and a
//! set of extended fingers.  Simulated sources and tests use it in place of a
//! real detector.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_landmarks::{HandPose, Finger, Point2, ids};
//!
//! let frame = HandPose::new(Point2::new(400.0, 300.0))
//!     .extend(Finger::Index)
//!     .build();
//!
//! assert!(frame.is_complete());
//! assert_eq!(frame.point(ids::INDEX_TIP), Some(Point2::new(400.0, 300.0)));
//! ```

pub mod point;
pub mod landmark;
pub mod pose;

pub use point::Point2;
pub use landmark::{ids, Finger, Landmark, LandmarkFrame, HAND_SKELETON, LANDMARK_COUNT};
pub use pose::HandPose;
