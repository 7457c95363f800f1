//! # air_gesture
//!
//! Hand-gesture host for the gesture engine: air canvas drawing, a virtual
//! mouse and an AR cube, all driven by 21-point hand landmarks and shown in a
//! software-rendered window.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Canvas profile | Mouse profile | Cube profile |
//! |---|---|---|---|
//! | Index finger up | Draw ink under the fingertip | Move the cursor (smoothed) | Cube follows the fingertip |
//! | Index + middle up | Hover: selection bar, pen lifted | Hold | Cube follows |
//! | Thumb to index tip | Pen lifted | Click once per pinch | Grab the cube |
//! | Fist | Idle | Idle | Cube follows, ungrabbed |
//! | No hand | Idle | Idle | Cube hidden |
//!
//! Re-entering draw after any other gesture starts a new stroke.
//!
//! ## Visualization
//!
//! A drifting backdrop stands in for the camera image.  Ink is composited
//! over it, then the hand skeleton and the active profile's overlay are
//! drawn on top.  A status bar shows the profile, the current mode and
//! per-profile counters.
//!
//! ## Feature flags
//!
//! * (default): **Simulation mode**, the mouse and held keys drive a synthetic hand.
//! * `leap`: **Hardware mode**, polls a real LeapMotion controller via LeapC.
//! * `os-pointer`: the mouse profile moves and clicks the real system cursor.
//!
//! ### Keyboard
//!
//! | Key | Action |
//! |---|---|
//! | `D` (hold) | Index finger up |
//! | `H` (hold) | Index + middle up |
//! | `P` (hold) | Pinch |
//! | `N` (hold) | Hand out of view |
//! | `C` | Clear the canvas |
//! | `B` | Next brush colour |
//! | `1` / `2` / `3` | Canvas / mouse / cube profile |
//! | `Q` / `Escape` | Quit |

pub mod source;
pub mod visualizer;
pub mod app;
