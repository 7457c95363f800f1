//! End-to-end scenarios: synthetic hand poses driven through `GestureEngine`.

use gesture_engine::{
    classify, frames_to_within, Command, EngineConfig, GestureEngine, Mode, Profile, SideEffect,
};
use hand_landmarks::{Finger, HandPose, LandmarkFrame, Point2};

const W: u32 = 640;
const H: u32 = 480;

fn engine(profile: Profile) -> GestureEngine {
    let mut cfg = EngineConfig::for_profile(profile);
    cfg.frame.width = W;
    cfg.frame.height = H;
    GestureEngine::new(cfg).unwrap()
}

fn draw_pose(x: f32, y: f32) -> LandmarkFrame {
    HandPose::new(Point2::new(x, y)).extend(Finger::Index).build()
}

fn hover_pose(x: f32, y: f32) -> LandmarkFrame {
    HandPose::new(Point2::new(x, y))
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .build()
}

fn backdrop() -> Vec<u32> {
    (0..(W * H)).map(|i| 0xFF10_2030 ^ (i.wrapping_mul(2654435761) & 0x00FF_FFFF)).collect()
}

#[test]
fn pinch_with_index_up_is_pinch_active() {
    // Index tip at (400,300), middle curled, thumb tip 20 px away.
    let frame = HandPose::new(Point2::new(400.0, 300.0))
        .extend(Finger::Index)
        .thumb_tip(Point2::new(420.0, 300.0))
        .build();

    for profile in Profile::ALL {
        let mut e = engine(profile);
        assert_eq!(e.process(&frame).mode, Mode::PinchActive, "{:?}", profile);
    }
}

#[test]
fn pinch_outranks_hover_select() {
    let frame = HandPose::new(Point2::new(300.0, 250.0))
        .extend(Finger::Index)
        .extend(Finger::Middle)
        .pinch()
        .build();
    let mut e = engine(Profile::Canvas);
    let out = e.process(&frame);
    assert!(out.classification.fingers.index() && out.classification.fingers.middle());
    assert_eq!(out.mode, Mode::PinchActive);
    assert_eq!(e.canvas().ink_pixels(), 0);
}

#[test]
fn empty_frames_are_idle_everywhere() {
    for profile in Profile::ALL {
        let mut e = engine(profile);
        e.process(&draw_pose(200.0, 200.0));
        let out = e.process(&LandmarkFrame::empty());
        assert_eq!(out.mode, Mode::Idle);
        assert_eq!(out.pointer, None);
        assert_eq!(out.cube, None);
        assert_eq!(out.draw_point, None);
    }
}

#[test]
fn classification_is_repeatable() {
    let frame = hover_pose(250.0, 260.0);
    let cfg = {
        let mut c = EngineConfig::default();
        c.frame.width = W;
        c
    };
    let first = classify(&frame, &cfg.classifier_rules());
    for _ in 0..10 {
        assert_eq!(classify(&frame, &cfg.classifier_rules()), first);
    }
}

#[test]
fn consecutive_draw_frames_join() {
    let mut e = engine(Profile::Canvas);
    e.process(&draw_pose(100.0, 200.0));
    e.process(&draw_pose(300.0, 200.0));
    for x in (100..=300).step_by(10) {
        assert!(e.canvas().has_ink(x, 200), "gap at x={}", x);
    }
}

#[test]
fn re_entering_draw_starts_with_a_dot() {
    let mut e = engine(Profile::Canvas);
    e.process(&draw_pose(100.0, 100.0));

    let out = e.process(&hover_pose(300.0, 100.0));
    assert_eq!(out.mode, Mode::HoverSelect);
    assert!(out.hover.is_some());

    let out = e.process(&draw_pose(300.0, 300.0));
    assert_eq!(out.previous_mode, Mode::HoverSelect);
    assert_eq!(out.effects, vec![SideEffect::ResetDrawContinuity]);

    // Both dots are inked; the stretch between them is not.
    assert!(e.canvas().has_ink(100, 100));
    assert!(e.canvas().has_ink(300, 300));
    assert!(!e.canvas().has_ink(200, 200));
}

#[test]
fn drawing_after_idle_gap_does_not_join() {
    let mut e = engine(Profile::Canvas);
    e.process(&draw_pose(50.0, 400.0));
    e.process(&LandmarkFrame::empty());
    e.process(&draw_pose(550.0, 400.0));
    assert!(!e.canvas().has_ink(300, 400));
}

#[test]
fn clear_then_composite_is_the_video() {
    let mut e = engine(Profile::Canvas);
    for i in 0..20 {
        e.process(&draw_pose(100.0 + 20.0 * i as f32, 150.0 + 5.0 * i as f32));
    }
    assert!(e.canvas().ink_pixels() > 0);

    let video = backdrop();
    let mut out = vec![0u32; video.len()];
    e.canvas().composite(&video, &mut out).unwrap();
    assert_ne!(out, video);

    e.apply(Command::ClearCanvas);
    e.canvas().composite(&video, &mut out).unwrap();
    assert_eq!(out, video);
}

#[test]
fn cursor_converges_on_a_held_fingertip() {
    let mut e = engine(Profile::Mouse);
    e.process(&draw_pose(120.0, 120.0));

    let tip = Point2::new(520.0, 360.0);
    let goal = e.active_region().map(tip);
    let start = e.cursor().current().unwrap().distance(goal);
    let frames = frames_to_within(e.cursor().k(), 0.01);
    assert_eq!(frames, 30);

    let mut last = start;
    for _ in 0..frames {
        let out = e.process(&draw_pose(tip.x, tip.y));
        assert_eq!(out.mode, Mode::Point);
        let d = e.cursor().current().unwrap().distance(goal);
        assert!(d < last, "distance {} did not shrink from {}", d, last);
        last = d;
    }
    assert!(last <= 0.01 * start, "remaining {} of {}", last, start);
}

#[test]
fn held_pinch_clicks_once() {
    let mut e = engine(Profile::Mouse);
    e.process(&draw_pose(320.0, 240.0));
    let pinch = HandPose::new(Point2::new(320.0, 240.0)).extend(Finger::Index).pinch().build();

    let mut clicks = 0;
    for _ in 0..20 {
        if e.process(&pinch).pointer.map_or(false, |p| p.click) {
            clicks += 1;
        }
    }
    assert_eq!(clicks, 1);

    // Release and pinch again: a second click.
    e.process(&draw_pose(320.0, 240.0));
    for _ in 0..5 {
        if e.process(&pinch).pointer.map_or(false, |p| p.click) {
            clicks += 1;
        }
    }
    assert_eq!(clicks, 2);
}

#[test]
fn first_pinch_of_a_session_clicks_at_the_fingertip() {
    let mut e = engine(Profile::Mouse);
    let tip = Point2::new(400.0, 300.0);
    let pinch = HandPose::new(tip).extend(Finger::Index).pinch().build();

    let mut targets = Vec::new();
    for _ in 0..10 {
        let out = e.process(&pinch);
        assert_eq!(out.mode, Mode::PinchActive);
        if let Some(p) = out.pointer.filter(|p| p.click) {
            targets.push(p.target);
        }
    }
    let region = e.active_region();
    assert_eq!(targets, vec![region.output(region.map(tip))]);
}

#[test]
fn cube_tracks_and_grabs() {
    let mut e = engine(Profile::Cube);
    let overlay = e.process(&draw_pose(320.0, 240.0)).cube.unwrap();
    assert!(!overlay.grabbed);
    assert_eq!(overlay.segments().count(), 12);

    let pinch = HandPose::new(Point2::new(320.0, 240.0)).extend(Finger::Index).pinch().build();
    let held = e.process(&pinch).cube.unwrap();
    assert!(held.grabbed);
}

#[test]
fn thresholds_follow_capture_width() {
    // 25 px pinch: inside the 30 px threshold at 640 wide, and inside the
    // scaled 60 px threshold at 1280 wide.
    let frame = |scale: f32| {
        HandPose::new(Point2::new(400.0 * scale, 300.0 * scale))
            .extend(Finger::Index)
            .scale(scale)
            .thumb_tip(Point2::new(400.0 * scale + 25.0 * scale, 300.0 * scale))
            .build()
    };
    let mut small = engine(Profile::Canvas);
    assert_eq!(small.process(&frame(1.0)).mode, Mode::PinchActive);

    let mut big = GestureEngine::new(EngineConfig::default()).unwrap();
    assert_eq!(big.process(&frame(2.0)).mode, Mode::PinchActive);

    // The same 50 px gap at 640 wide is not a pinch.
    let wide = HandPose::new(Point2::new(400.0, 300.0))
        .extend(Finger::Index)
        .thumb_tip(Point2::new(450.0, 300.0))
        .build();
    assert_eq!(small.process(&wide).mode, Mode::Draw);
}
