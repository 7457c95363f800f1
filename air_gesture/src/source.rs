//! Landmark sources: LeapMotion hardware, keyboard/mouse simulation, and
//! scripted replay.
//!
//! Every source delivers [`LandmarkFrame`]s over an `mpsc` channel, in
//! order, one per detector frame.  An empty frame means "no hand this
//! frame".  The consumer doesn't need to know where frames came from.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use hand_landmarks::{Finger, HandPose, LandmarkFrame, Point2};

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait: unified interface for hw, sim and replay
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver [`LandmarkFrame`]s over a channel.
///
/// `run` returns when the source is exhausted or the receiver hangs up;
/// dropping `tx` is how the consumer learns the stream has ended.
pub trait LandmarkSource: Send + 'static {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>);
}

/// Spawn a landmark source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<LandmarkFrame> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Hand shape requested by the held simulation keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    /// No keys held: a relaxed fist.
    Fist,
    /// `D`: index finger up.
    Index,
    /// `H`: index and middle up.
    IndexMiddle,
    /// `P`: thumb pressed to the index tip.
    Pinch,
    /// `N`: hand out of view.
    Hidden,
}

/// Raw input snapshot from the simulation window, once per window frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Mouse position in frame pixels (`None` when outside the window) and
    /// the requested pose.
    Hand { pointer: Option<(f32, f32)>, pose: SimPose },
    Quit,
}

/// Landmark source driven by [`SimInput`] events (from the visualizer's
/// window).
///
/// The visualizer sends a snapshot of mouse and keys each frame; this
/// translator synthesises a full 21-landmark hand with its index fingertip
/// under the mouse.  The window event loop stays free of hand geometry.
pub struct SimLandmarkSource {
    pub rx:    Receiver<SimInput>,
    /// Hand size multiplier; `frame_width / 640` keeps the simulated hand
    /// proportionate to the frame.
    pub scale: f32,
}

impl SimLandmarkSource {
    pub fn new(rx: Receiver<SimInput>, frame_width: u32) -> Self {
        SimLandmarkSource { rx, scale: frame_width as f32 / 640.0 }
    }

    /// Landmark frame for one input snapshot.
    pub fn synthesize(&self, pointer: Option<(f32, f32)>, pose: SimPose) -> LandmarkFrame {
        let (x, y) = match (pointer, pose) {
            (None, _) | (_, SimPose::Hidden) => return LandmarkFrame::empty(),
            (Some(p), _) => p,
        };

        let hand = HandPose::new(Point2::new(x, y)).scale(self.scale);
        let hand = match pose {
            SimPose::Fist        => hand,
            SimPose::Index       => hand.extend(Finger::Index),
            SimPose::IndexMiddle => hand.extend(Finger::Index).extend(Finger::Middle),
            SimPose::Pinch       => hand.extend(Finger::Index).pinch(),
            SimPose::Hidden      => return LandmarkFrame::empty(),
        };
        hand.build()
    }
}

impl LandmarkSource for SimLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        for input in self.rx.iter() {
            let frame = match input {
                SimInput::Hand { pointer, pose } => self.synthesize(pointer, pose),
                SimInput::Quit => return,
            };
            if tx.send(frame).is_err() { return; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ScriptedSource: fixed frame sequence (tests, demos)
// ════════════════════════════════════════════════════════════════════════════

/// Replays a fixed list of frames, optionally paced.
pub struct ScriptedSource {
    pub frames:   Vec<LandmarkFrame>,
    pub interval: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(frames: Vec<LandmarkFrame>) -> Self {
        ScriptedSource { frames, interval: None }
    }

    pub fn paced(frames: Vec<LandmarkFrame>, interval: Duration) -> Self {
        ScriptedSource { frames, interval: Some(interval) }
    }
}

impl LandmarkSource for ScriptedSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        for frame in self.frames {
            if tx.send(frame).is_err() { return; }
            if let Some(d) = self.interval {
                thread::sleep(d);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// # Mapping
///
/// The first tracked hand is converted to the 21-point layout:
///
/// * wrist ← base of the middle metacarpal
/// * per digit: proximal base, intermediate base, distal base, distal tip
///
/// Positions (millimetres above the device) are projected orthographically
/// into the frame: `x ∈ [-X_RANGE, X_RANGE]` spans the width and
/// `y ∈ [Y_NEAR, Y_FAR]` spans the height, bottom to top.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource {
    pub width:  u32,
    pub height: u32,
}

#[cfg(feature = "leap")]
impl LeapLandmarkSource {
    const X_RANGE: f32 = 200.0;
    const Y_NEAR:  f32 = 100.0;
    const Y_FAR:   f32 = 400.0;

    fn to_pixel(&self, x: f32, y: f32) -> Point2 {
        let u = (x + Self::X_RANGE) / (2.0 * Self::X_RANGE);
        let v = 1.0 - (y - Self::Y_NEAR) / (Self::Y_FAR - Self::Y_NEAR);
        Point2::new(u * self.width as f32, v * self.height as f32)
    }
}

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn run(self: Box<Self>, tx: Sender<LandmarkFrame>) {
        use hand_landmarks::LANDMARK_COUNT;
        use leaprs::{Connection, ConnectionConfig, Event};
        use tracing::{error, info};

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c)  => c,
            Err(e) => {
                error!(error = ?e, "failed to create LeapC connection");
                return;
            }
        };
        if let Err(e) = connection.open() {
            error!(error = ?e, "failed to open LeapMotion device");
            return;
        }
        info!("LeapMotion connection open");

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };

            if let Event::Tracking(frame) = msg.event() {
                let landmarks = match frame.hands().next() {
                    None => LandmarkFrame::empty(),
                    Some(hand) => {
                        let mut points = [Point2::ZERO; LANDMARK_COUNT];
                        let digits: Vec<_> = hand.digits().collect();
                        if digits.len() < 5 {
                            LandmarkFrame::empty()
                        } else {
                            let wrist = digits[2].metacarpal().prev_joint();
                            points[0] = self.to_pixel(wrist.x, wrist.y);
                            for (d, digit) in digits.iter().take(5).enumerate() {
                                let joints = [
                                    digit.proximal().prev_joint(),
                                    digit.intermediate().prev_joint(),
                                    digit.distal().prev_joint(),
                                    digit.distal().next_joint(),
                                ];
                                for (k, j) in joints.iter().enumerate() {
                                    points[1 + 4 * d + k] = self.to_pixel(j.x, j.y);
                                }
                            }
                            LandmarkFrame::from_points(points, 1.0)
                        }
                    }
                };
                if tx.send(landmarks).is_err() { return; }
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_landmarks::ids;

    fn sim() -> (Sender<SimInput>, SimLandmarkSource) {
        let (tx, rx) = mpsc::channel();
        (tx, SimLandmarkSource::new(rx, 640))
    }

    #[test]
    fn sim_places_index_tip_under_pointer() {
        let (_tx, s) = sim();
        let f = s.synthesize(Some((123.0, 321.0)), SimPose::Index);
        assert!(f.is_complete());
        assert_eq!(f.point(ids::INDEX_TIP), Some(Point2::new(123.0, 321.0)));
    }

    #[test]
    fn sim_hidden_or_offscreen_is_empty() {
        let (_tx, s) = sim();
        assert!(!s.synthesize(Some((10.0, 10.0)), SimPose::Hidden).is_present());
        assert!(!s.synthesize(None, SimPose::Index).is_present());
    }

    #[test]
    fn sim_pinch_closes_thumb() {
        let (_tx, s) = sim();
        let f = s.synthesize(Some((300.0, 300.0)), SimPose::Pinch);
        let d = f.point(ids::THUMB_TIP).unwrap().distance(f.point(ids::INDEX_TIP).unwrap());
        assert!(d < 20.0);
    }

    #[test]
    fn sim_scales_with_frame_width() {
        let (_tx, rx) = mpsc::channel();
        let big = SimLandmarkSource::new(rx, 1280);
        let (_tx2, small) = sim();
        let span = |f: LandmarkFrame| {
            f.point(ids::WRIST).unwrap().distance(f.point(ids::INDEX_TIP).unwrap())
        };
        let b = span(big.synthesize(Some((600.0, 600.0)), SimPose::Fist));
        let s = span(small.synthesize(Some((300.0, 300.0)), SimPose::Fist));
        assert!((b - 2.0 * s).abs() < 1e-3);
    }

    #[test]
    fn sim_thread_forwards_in_order_and_stops_on_quit() {
        let (tx, s) = sim();
        let frames = spawn_landmark_source(s);
        tx.send(SimInput::Hand { pointer: Some((100.0, 100.0)), pose: SimPose::Index }).unwrap();
        tx.send(SimInput::Hand { pointer: Some((100.0, 100.0)), pose: SimPose::Hidden }).unwrap();
        tx.send(SimInput::Quit).unwrap();

        let got: Vec<LandmarkFrame> = frames.iter().collect();
        assert_eq!(got.len(), 2);
        assert!(got[0].is_present());
        assert!(!got[1].is_present());
    }

    #[test]
    fn scripted_source_replays_everything() {
        let script = vec![
            HandPose::new(Point2::new(10.0, 10.0)).build(),
            LandmarkFrame::empty(),
            HandPose::new(Point2::new(20.0, 20.0)).build(),
        ];
        let rx = spawn_landmark_source(ScriptedSource::new(script.clone()));
        let got: Vec<LandmarkFrame> = rx.iter().collect();
        assert_eq!(got, script);
    }

    #[test]
    fn paced_source_keeps_order() {
        let script: Vec<LandmarkFrame> = (0..5)
            .map(|i| HandPose::new(Point2::new(10.0 * i as f32, 50.0)).build())
            .collect();
        let rx = spawn_landmark_source(ScriptedSource::paced(script.clone(), Duration::from_millis(1)));
        assert_eq!(rx.iter().collect::<Vec<_>>(), script);
    }
}
