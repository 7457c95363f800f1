//! Top-level application loop.
//!
//! `AppState` owns the `GestureEngine` and the `PointerBridge`.  It feeds
//! landmark frames through the engine in arrival order, forwards pointer
//! intents, applies keyboard commands, and hands the latest results to the
//! visualizer each window frame.

use std::sync::mpsc::{self, Receiver, TryRecvError};

use gesture_engine::{Command, Control, EngineConfig, FrameOutput, GestureEngine, Mode, Profile};
use hand_landmarks::LandmarkFrame;
use pointer_bridge::{open_sink, PointerBridge, PointerSink};
use tracing::{debug, info, warn};

use crate::source::{spawn_landmark_source, SimInput, SimLandmarkSource};
use crate::visualizer::Visualizer;

/// Frames drained in one window frame above which the loop reports that
/// rendering is falling behind the source.
const BACKLOG_WARN: usize = 8;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Window error: {0}")]
    Window(String),

    #[error(transparent)]
    Engine(#[from] gesture_engine::Error),

    #[error("Landmark source error: {0}")]
    Source(String),
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Where landmark frames come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// Keyboard and mouse drive a synthetic hand.
    #[default]
    Sim,
    /// LeapMotion controller (needs the `leap` feature).
    Leap,
}

/// Configuration for the full application.
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub engine:     EngineConfig,
    pub source:     SourceKind,
    /// Drive the real system cursor in the mouse profile.
    pub os_pointer: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

/// Outcome of draining the landmark channel once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pump {
    /// The source is still live; this many frames were processed.
    Live(usize),
    /// The source hung up after this many frames.
    Ended(usize),
}

pub struct AppState {
    engine:      GestureEngine,
    bridge:      PointerBridge,
    last_output: Option<FrameOutput>,
    last_frame:  LandmarkFrame,

    // ── status message ────────────────────────────────────────────────────
    pub status:  String,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Result<Self, AppError> {
        AppState::with_sink(cfg.engine.clone(), open_sink(cfg.os_pointer))
    }

    /// Build with an explicit pointer backend.
    pub fn with_sink(config: EngineConfig, sink: Box<dyn PointerSink>) -> Result<Self, AppError> {
        let bridge = PointerBridge::new(sink, config.pointer.screen_width, config.pointer.screen_height);
        let engine = GestureEngine::new(config)?;
        let mut app = AppState {
            engine,
            bridge,
            last_output: None,
            last_frame:  LandmarkFrame::empty(),
            status:      String::new(),
        };
        app.refresh_status();
        Ok(app)
    }

    // ── process one LandmarkFrame ────────────────────────────────────────

    pub fn handle_frame(&mut self, frame: LandmarkFrame) {
        let out = self.engine.process(&frame);
        if let Some(intent) = &out.pointer {
            self.bridge.deliver(intent);
        }
        self.last_frame = frame;
        self.last_output = Some(out);
        self.refresh_status();
    }

    /// Process every frame waiting on `rx`, oldest first.
    pub fn pump(&mut self, rx: &Receiver<LandmarkFrame>) -> Pump {
        let mut n = 0;
        loop {
            match rx.try_recv() {
                Ok(frame) => {
                    self.handle_frame(frame);
                    n += 1;
                }
                Err(TryRecvError::Empty)        => return Pump::Live(n),
                Err(TryRecvError::Disconnected) => return Pump::Ended(n),
            }
        }
    }

    // ── process one keyboard Command ─────────────────────────────────────

    pub fn handle_command(&mut self, command: Command) -> Control {
        debug!(?command, "command");
        let control = self.engine.apply(command);
        if let Command::SetProfile(_) = command {
            self.last_output = None;
        }
        self.refresh_status();
        control
    }

    fn refresh_status(&mut self) {
        let mode = self.last_output.as_ref().map_or(Mode::Idle, |o| o.mode);
        let mut status = format!(
            "{}  mode {}  frames {}",
            self.engine.profile().name(),
            mode,
            self.engine.frames_processed(),
        );
        match self.engine.profile() {
            Profile::Canvas => {
                status.push_str(&format!(
                    "  brush {:06X}  ink {}",
                    self.engine.brush().color & 0x00FF_FFFF,
                    self.engine.canvas().ink_pixels(),
                ));
            }
            Profile::Mouse => {
                let s = self.bridge.stats();
                status.push_str(&format!(
                    "  pointer {}  clicks {}  dropped {}",
                    self.bridge.sink_name(),
                    s.clicks,
                    s.failures,
                ));
            }
            Profile::Cube => {
                let grabbed = self.last_output.as_ref().and_then(|o| o.cube).map_or(false, |c| c.grabbed);
                status.push_str(if grabbed { "  cube grabbed" } else { "  cube free" });
            }
        }
        self.status = status;
    }

    // ── Accessors for the render loop ─────────────────────────────────────

    pub fn engine(&self)      -> &GestureEngine       { &self.engine }
    pub fn bridge(&self)      -> &PointerBridge       { &self.bridge }
    pub fn last_output(&self) -> Option<&FrameOutput> { self.last_output.as_ref() }
    pub fn last_frame(&self)  -> &LandmarkFrame       { &self.last_frame }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the main application loop
// ════════════════════════════════════════════════════════════════════════════

fn open_source(cfg: &AppConfig, sim_rx: Receiver<SimInput>) -> Result<Receiver<LandmarkFrame>, AppError> {
    match cfg.source {
        SourceKind::Sim => Ok(spawn_landmark_source(SimLandmarkSource::new(sim_rx, cfg.engine.frame.width))),

        #[cfg(feature = "leap")]
        SourceKind::Leap => Ok(spawn_landmark_source(crate::source::LeapLandmarkSource {
            width:  cfg.engine.frame.width,
            height: cfg.engine.frame.height,
        })),

        #[cfg(not(feature = "leap"))]
        SourceKind::Leap => Err(AppError::Source(
            "built without the `leap` feature; rebuild with --features leap".to_string(),
        )),
    }
}

/// Run the full application.
///
/// This is the entry point called from `main.rs`.  It creates the visualizer,
/// the landmark source (simulation by default, hardware with `--features
/// leap`), and drives the input/process/render loop at ~60 fps until the
/// window closes, a quit key is pressed, or the source ends.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.engine.validate()?;

    // ── Sim input channel (unused by hardware sources) ───────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();
    let frames = open_source(&cfg, sim_rx)?;

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.engine.frame.width as usize, cfg.engine.frame.height as usize, sim_tx)?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg)?;
    info!(profile = app.engine().profile().name(), source = ?cfg.source, "session started");

    // ── Main loop ─────────────────────────────────────────────────────────
    'session: while vis.is_open() {
        // 1. Poll window input → commands (+ sim snapshot to the source)
        for command in vis.poll_input() {
            if app.handle_command(command) == Control::Quit {
                break 'session;
            }
        }

        // 2. Drain landmark frames, in order
        match app.pump(&frames) {
            Pump::Live(n) if n > BACKLOG_WARN => {
                warn!(frames = n, "landmark backlog, rendering is falling behind");
            }
            Pump::Live(_) => {}
            Pump::Ended(_) => {
                info!("landmark source ended");
                break 'session;
            }
        }

        // 3. Render
        vis.render(&app)?;
    }

    vis.stop_source();
    info!(frames = app.engine().frames_processed(), "session ended");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use hand_landmarks::{Finger, HandPose, Point2};
    use pointer_bridge::{NullSink, PointerEvent, RecordingSink};

    fn config(profile: Profile) -> EngineConfig {
        let mut cfg = EngineConfig::for_profile(profile);
        cfg.frame.width = 640;
        cfg.frame.height = 480;
        cfg
    }

    fn make_app(profile: Profile) -> AppState {
        AppState::with_sink(config(profile), Box::new(NullSink)).unwrap()
    }

    fn index_at(x: f32, y: f32) -> LandmarkFrame {
        HandPose::new(Point2::new(x, y)).extend(Finger::Index).build()
    }

    #[test]
    fn invalid_engine_config_is_an_engine_error() {
        let mut cfg = config(Profile::Canvas);
        cfg.canvas.palette.clear();
        let err = AppState::with_sink(cfg, Box::new(NullSink)).err().unwrap();
        assert!(matches!(err, AppError::Engine(_)));
    }

    #[test]
    fn frame_updates_output_and_status() {
        let mut app = make_app(Profile::Canvas);
        assert!(app.last_output().is_none());
        app.handle_frame(index_at(200.0, 200.0));
        assert_eq!(app.last_output().unwrap().mode, Mode::Draw);
        assert!(app.status.contains("draw"));
        assert!(app.last_frame().is_present());
    }

    #[test]
    fn mouse_intents_reach_the_sink() {
        let sink = RecordingSink::new();
        let log = sink.log();
        let mut app = AppState::with_sink(config(Profile::Mouse), Box::new(sink)).unwrap();
        app.handle_frame(index_at(320.0, 240.0));
        // Centre of the frame, mirrored, is still the centre of the screen.
        assert_eq!(log.events(), vec![PointerEvent::Move { x: 960, y: 540 }]);
    }

    #[test]
    fn refused_pointer_does_not_stop_the_session() {
        let mut app = AppState::with_sink(config(Profile::Mouse), Box::new(RecordingSink::failing())).unwrap();
        for i in 0..5 {
            app.handle_frame(index_at(300.0 + i as f32, 240.0));
        }
        assert_eq!(app.bridge().stats().failures, 5);
        assert_eq!(app.engine().mode(), Mode::Point);
        assert!(app.status.contains("dropped 5"));
    }

    #[test]
    fn canvas_profile_never_touches_the_pointer() {
        let sink = RecordingSink::new();
        let log = sink.log();
        let mut app = AppState::with_sink(config(Profile::Canvas), Box::new(sink)).unwrap();
        app.handle_frame(index_at(320.0, 240.0));
        assert!(log.events().is_empty());
    }

    #[test]
    fn commands_pass_through() {
        let mut app = make_app(Profile::Canvas);
        app.handle_frame(index_at(100.0, 100.0));
        assert_eq!(app.handle_command(Command::ClearCanvas), Control::Continue);
        assert_eq!(app.engine().canvas().ink_pixels(), 0);

        app.handle_command(Command::SetProfile(Profile::Cube));
        assert_eq!(app.engine().profile(), Profile::Cube);
        assert!(app.last_output().is_none());
        assert!(app.status.starts_with("cube"));

        assert_eq!(app.handle_command(Command::Quit), Control::Quit);
    }

    #[test]
    fn pump_processes_scripted_frames_in_order() {
        let script = vec![
            index_at(100.0, 100.0),
            LandmarkFrame::empty(),
            index_at(200.0, 100.0),
        ];
        let rx = spawn_landmark_source(ScriptedSource::new(script));
        let mut app = make_app(Profile::Canvas);

        let mut total = 0;
        loop {
            match app.pump(&rx) {
                Pump::Live(n) => total += n,
                Pump::Ended(n) => {
                    total += n;
                    break;
                }
            }
        }
        assert_eq!(total, 3);
        assert_eq!(app.engine().frames_processed(), 3);
        // The empty frame in the middle broke the stroke.
        assert!(app.engine().canvas().has_ink(100, 100));
        assert!(app.engine().canvas().has_ink(200, 100));
        assert!(!app.engine().canvas().has_ink(150, 100));
    }

    #[cfg(not(feature = "leap"))]
    #[test]
    fn leap_source_needs_the_feature() {
        let cfg = AppConfig { source: SourceKind::Leap, ..AppConfig::default() };
        let (_tx, rx) = mpsc::channel();
        assert!(matches!(open_source(&cfg, rx), Err(AppError::Source(_))));
    }
}
