//! # pointer_bridge
//!
//! Delivers [`PointerIntent`]s from the gesture engine to a cursor backend.
//!
//! Delivery is best-effort.  A backend that refuses a move or a click costs
//! that one event: the error is logged, counted, and the next frame carries
//! on.  The engine's smoothed cursor is never touched from here, so a failed
//! delivery cannot disturb tracking.
//!
//! ## Backends
//!
//! | Sink | Feature | Use |
//! |---|---|---|
//! | [`NullSink`] | (default) | discard everything |
//! | [`RecordingSink`] | (default) | keep a log, optionally fail on demand (tests, dry runs) |
//! | `EnigoSink` | `os-pointer` | move and click the real system cursor |
//!
//! ## Quick start
//!
//! ```rust
//! use gesture_engine::PointerIntent;
//! use hand_landmarks::Point2;
//! use pointer_bridge::{PointerBridge, PointerEvent, RecordingSink};
//!
//! let sink = RecordingSink::new();
//! let log = sink.log();
//! let mut bridge = PointerBridge::new(Box::new(sink), 1920, 1080);
//!
//! bridge.deliver(&PointerIntent { target: Point2::new(960.4, 539.6), click: true });
//! assert_eq!(
//!     log.events(),
//!     vec![PointerEvent::Move { x: 960, y: 540 }, PointerEvent::Click],
//! );
//! ```

use std::sync::{Arc, Mutex};

use gesture_engine::PointerIntent;
use hand_landmarks::Point2;
use tracing::{debug, info, warn};

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Why a backend refused an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointerError {
    #[error("Pointer backend error: {0}")]
    Backend(String),

    #[error("Pointer target ({x}, {y}) is off screen")]
    OutOfBounds { x: i32, y: i32 },
}

// ════════════════════════════════════════════════════════════════════════════
// PointerSink: abstraction over the OS cursor / null / recording
// ════════════════════════════════════════════════════════════════════════════

pub trait PointerSink {
    fn name(&self) -> &'static str;
    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError>;
    /// Left-button press and release at the current position.
    fn click(&mut self) -> Result<(), PointerError>;
}

// ── null backend ──────────────────────────────────────────────────────────

pub struct NullSink;

impl PointerSink for NullSink {
    fn name(&self) -> &'static str { "null" }
    fn move_to(&mut self, _x: i32, _y: i32) -> Result<(), PointerError> { Ok(()) }
    fn click(&mut self) -> Result<(), PointerError> { Ok(()) }
}

// ── recording backend ─────────────────────────────────────────────────────

/// One event a [`RecordingSink`] accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Move { x: i32, y: i32 },
    Click,
}

/// Shared view of a [`RecordingSink`]'s log, readable after the sink has
/// been boxed into a bridge.
#[derive(Clone, Debug, Default)]
pub struct PointerLog(Arc<Mutex<Vec<PointerEvent>>>);

impl PointerLog {
    pub fn events(&self) -> Vec<PointerEvent> {
        match self.0.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn push(&self, event: PointerEvent) -> Result<(), PointerError> {
        self.0
            .lock()
            .map(|mut events| events.push(event))
            .map_err(|_| PointerError::Backend("recording log poisoned".to_string()))
    }
}

/// Records every accepted event.  Can be told to reject everything, which
/// stands in for an OS that refuses input injection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    log:     PointerLog,
    failing: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        RecordingSink::default()
    }

    /// A sink whose every call fails with [`PointerError::Backend`].
    pub fn failing() -> Self {
        RecordingSink { log: PointerLog::default(), failing: true }
    }

    pub fn log(&self) -> PointerLog {
        self.log.clone()
    }

    fn accept(&self, event: PointerEvent) -> Result<(), PointerError> {
        if self.failing {
            return Err(PointerError::Backend("input injection refused".to_string()));
        }
        self.log.push(event)
    }
}

impl PointerSink for RecordingSink {
    fn name(&self) -> &'static str { "recording" }

    fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
        self.accept(PointerEvent::Move { x, y })
    }

    fn click(&mut self) -> Result<(), PointerError> {
        self.accept(PointerEvent::Click)
    }
}

// ── enigo backend ─────────────────────────────────────────────────────────

#[cfg(feature = "os-pointer")]
pub use os::EnigoSink;

#[cfg(feature = "os-pointer")]
mod os {
    use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

    use super::{PointerError, PointerSink};

    /// Drives the real system cursor.
    pub struct EnigoSink {
        enigo:   Enigo,
        display: (i32, i32),
    }

    impl EnigoSink {
        pub fn new() -> Result<Self, PointerError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| PointerError::Backend(e.to_string()))?;
            let display = enigo
                .main_display()
                .map_err(|e| PointerError::Backend(e.to_string()))?;
            Ok(EnigoSink { enigo, display })
        }

        pub fn display(&self) -> (i32, i32) {
            self.display
        }
    }

    impl PointerSink for EnigoSink {
        fn name(&self) -> &'static str { "os" }

        fn move_to(&mut self, x: i32, y: i32) -> Result<(), PointerError> {
            let (w, h) = self.display;
            if x < 0 || y < 0 || x >= w || y >= h {
                return Err(PointerError::OutOfBounds { x, y });
            }
            self.enigo
                .move_mouse(x, y, Coordinate::Abs)
                .map_err(|e| PointerError::Backend(e.to_string()))
        }

        fn click(&mut self) -> Result<(), PointerError> {
            self.enigo
                .button(Button::Left, Direction::Click)
                .map_err(|e| PointerError::Backend(e.to_string()))
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// open_sink: pick a backend, falling back to null
// ════════════════════════════════════════════════════════════════════════════

/// The OS backend when `os_pointer` is requested and available, otherwise
/// [`NullSink`] with a warning.
pub fn open_sink(os_pointer: bool) -> Box<dyn PointerSink> {
    if !os_pointer {
        return Box::new(NullSink);
    }

    #[cfg(feature = "os-pointer")]
    {
        match EnigoSink::new() {
            Ok(sink) => {
                let (w, h) = sink.display();
                info!(width = w, height = h, "driving the system cursor");
                return Box::new(sink);
            }
            Err(e) => warn!(error = %e, "system cursor unavailable, using null pointer"),
        }
    }
    #[cfg(not(feature = "os-pointer"))]
    warn!("built without the os-pointer feature, using null pointer");

    Box::new(NullSink)
}

// ════════════════════════════════════════════════════════════════════════════
// PointerBridge
// ════════════════════════════════════════════════════════════════════════════

/// Delivery counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    pub moves:    u64,
    pub clicks:   u64,
    pub failures: u64,
}

/// Owns a sink and turns intents into sink calls.
pub struct PointerBridge {
    sink:          Box<dyn PointerSink>,
    screen_width:  u32,
    screen_height: u32,
    last:          Option<(i32, i32)>,
    stats:         DeliveryStats,
}

impl PointerBridge {
    pub fn new(sink: Box<dyn PointerSink>, screen_width: u32, screen_height: u32) -> Self {
        info!(sink = sink.name(), screen_width, screen_height, "pointer bridge ready");
        PointerBridge {
            sink,
            screen_width,
            screen_height,
            last:  None,
            stats: DeliveryStats::default(),
        }
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    pub fn stats(&self) -> DeliveryStats {
        self.stats
    }

    /// Screen pixel for a target: rounded, then kept on the last row/column
    /// (a target at exactly `screen_width` is the right edge, not past it).
    pub fn to_pixel(&self, p: Point2) -> (i32, i32) {
        let (x, y) = p.round();
        let max_x = self.screen_width.saturating_sub(1) as i32;
        let max_y = self.screen_height.saturating_sub(1) as i32;
        (x.clamp(0, max_x), y.clamp(0, max_y))
    }

    /// Send one intent.  Returns `true` when every call succeeded.
    ///
    /// Moves to the pixel already under the cursor are skipped.  A click is
    /// attempted even if the preceding move failed.
    pub fn deliver(&mut self, intent: &PointerIntent) -> bool {
        let mut ok = true;
        let pixel = self.to_pixel(intent.target);

        if self.last != Some(pixel) {
            match self.sink.move_to(pixel.0, pixel.1) {
                Ok(()) => {
                    self.last = Some(pixel);
                    self.stats.moves += 1;
                }
                Err(e) => {
                    self.stats.failures += 1;
                    warn!(error = %e, x = pixel.0, y = pixel.1, "pointer move dropped");
                    ok = false;
                }
            }
        }

        if intent.click {
            match self.sink.click() {
                Ok(()) => {
                    self.stats.clicks += 1;
                    debug!(x = pixel.0, y = pixel.1, "click delivered");
                }
                Err(e) => {
                    self.stats.failures += 1;
                    warn!(error = %e, "click dropped");
                    ok = false;
                }
            }
        }
        ok
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
