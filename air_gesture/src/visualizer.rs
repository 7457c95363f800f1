//! Software-rendered visualizer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  backdrop (stands in for the camera frame)          │
//! │    + ink canvas, composited                         │
//! │    + hand skeleton                                  │
//! │    + profile overlay: hover bar / brush tip,        │
//! │      active region + cursor, or cube wireframe      │
//! ├─────────────────────────────────────────────────────┤
//! │  status bar                                         │
//! │  key legend                                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! The window is exactly as wide as the landmark frame, so window mouse
//! coordinates are frame pixels.

use std::sync::mpsc::Sender;

use gesture_engine::{Command, Mode, Profile};
use hand_landmarks::{LandmarkFrame, Point2, HAND_SKELETON};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::app::{AppError, AppState};
use crate::source::{SimInput, SimPose};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const STATUS_H:       usize = 36;
const TEXT_BG:        u32   = 0xFF0F3460;
const BONE_COLOR:     u32   = 0xFFE0E0E0;
const JOINT_COLOR:    u32   = 0xFFFF3040;
const REGION_COLOR:   u32   = 0xFFFF00FF;
const CURSOR_COLOR:   u32   = 0xFFFF00FF;
const CLICK_COLOR:    u32   = 0xFF30FF30;
const CUBE_COLOR:     u32   = 0xFF00E0FF;
const GRABBED_COLOR:  u32   = 0xFF30FF30;
/// Half-height of the hover-select bar, in frame pixels at 640 wide.
const HOVER_HALF_H:   f32   = 25.0;

// ════════════════════════════════════════════════════════════════════════════
// Surface: plain ARGB framebuffer with drawing primitives
// ════════════════════════════════════════════════════════════════════════════

pub struct Surface {
    pub width:  usize,
    pub height: usize,
    pub buf:    Vec<u32>,
}

impl Surface {
    pub fn new(width: usize, height: usize) -> Self {
        Surface { width, height, buf: vec![0xFF000000; width * height] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height { Some(self.buf[y * self.width + x]) } else { None }
    }

    /// Copy a `w × h` image to the top-left corner.
    pub fn blit(&mut self, src: &[u32], w: usize, h: usize) {
        let w_copy = w.min(self.width);
        for row in 0..h.min(self.height) {
            let s = &src[row * w..row * w + w_copy];
            self.buf[row * self.width..row * self.width + w_copy].copy_from_slice(s);
        }
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    pub fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col as i32, y as i32, color);
            self.set_pixel(col as i32, (y + h - 1) as i32, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x as i32, row as i32, color);
            self.set_pixel((x + w - 1) as i32, row as i32, color);
        }
    }

    /// Off-surface coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.buf[y as usize * self.width + x as usize] = color;
        }
    }

    /// Bresenham line, clipped per pixel.
    pub fn draw_line(&mut self, a: Point2, b: Point2, color: u32) {
        let (mut x0, mut y0) = a.round();
        let (x1, y1) = b.round();
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        // Bounded so that wild endpoints can't stall a frame.
        for _ in 0..=(dx - dy).min(8192) {
            self.set_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    pub fn fill_circle(&mut self, c: Point2, r: f32, color: u32) {
        let (cx, cy) = c.round();
        let ri = r.ceil() as i32;
        let r2 = r * r;
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if (dx * dx + dy * dy) as f32 <= r2 {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    pub fn draw_ring(&mut self, c: Point2, r: f32, color: u32) {
        let steps = ((r * 6.0) as usize).max(16);
        for i in 0..steps {
            let t0 = i as f32 / steps as f32 * std::f32::consts::TAU;
            let t1 = (i + 1) as f32 / steps as f32 * std::f32::consts::TAU;
            self.draw_line(
                Point2::new(c.x + r * t0.cos(), c.y + r * t0.sin()),
                Point2::new(c.x + r * t1.cos(), c.y + r * t1.sin()),
                color,
            );
        }
    }

    /// Minimal bitmap font: 3×5 characters for status text.
    /// Each character is encoded as 5 rows × 3 bits.
    pub fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.set_pixel((cx + col) as i32, (y + row) as i32, color);
                    }
                }
            }
            cx += 4; // 3 wide + 1 gap
            if cx + 4 > self.width { break; }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Backdrop
// ════════════════════════════════════════════════════════════════════════════

/// Slowly drifting gradient with a moving scan band; stands in for the
/// camera image so compositing is visible.
pub fn fill_backdrop(buf: &mut [u32], width: usize, height: usize, tick: u64) {
    let band = (tick as usize * 3) % height.max(1);
    for y in 0..height {
        let g = (40 + 60 * y / height.max(1)) as u32;
        let lit = y.abs_diff(band) < 6;
        for x in 0..width {
            let r = (20 + 40 * x / width.max(1)) as u32;
            let b = 70u32;
            let (r, g, b) = if lit { (r + 30, g + 30, b + 30) } else { (r, g, b) };
            buf[y * width + x] = 0xFF000000 | (r << 16) | (g << 8) | b;
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:    Window,
    surface:   Surface,
    frame_w:   usize,
    frame_h:   usize,
    video:     Vec<u32>,
    composite: Vec<u32>,
    sim_tx:    Sender<SimInput>,
    tick:      u64,
}

impl Visualizer {
    pub fn new(frame_w: usize, frame_h: usize, sim_tx: Sender<SimInput>) -> Result<Self, AppError> {
        let (win_w, win_h) = (frame_w, frame_h + STATUS_H);
        let mut window = Window::new(
            "Air Gesture: canvas / mouse / cube",
            win_w, win_h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| AppError::Window(e.to_string()))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            surface:   Surface::new(win_w, win_h),
            frame_w,
            frame_h,
            video:     vec![0; frame_w * frame_h],
            composite: vec![0; frame_w * frame_h],
            sim_tx,
            tick:      0,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Tell the simulated source to stop.
    pub fn stop_source(&self) {
        let _ = self.sim_tx.send(SimInput::Quit);
    }

    /// Poll keyboard and mouse.  Sends this frame's simulated hand to the
    /// sim source and returns the host commands pressed.
    pub fn poll_input(&mut self) -> Vec<Command> {
        let mut commands = Vec::new();
        if !self.window.is_open() {
            commands.push(Command::Quit);
            return commands;
        }

        // Keys that trigger on first press only
        let one_shot = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);
        // Keys that count while held
        let held     = |k: Key| self.window.is_key_down(k);

        if one_shot(Key::Q) || one_shot(Key::Escape) { commands.push(Command::Quit); }
        if one_shot(Key::C)    { commands.push(Command::ClearCanvas); }
        if one_shot(Key::B)    { commands.push(Command::CycleBrush); }
        if one_shot(Key::Key1) { commands.push(Command::SetProfile(Profile::Canvas)); }
        if one_shot(Key::Key2) { commands.push(Command::SetProfile(Profile::Mouse)); }
        if one_shot(Key::Key3) { commands.push(Command::SetProfile(Profile::Cube)); }

        let pose = if held(Key::N) {
            SimPose::Hidden
        } else if held(Key::P) {
            SimPose::Pinch
        } else if held(Key::H) {
            SimPose::IndexMiddle
        } else if held(Key::D) {
            SimPose::Index
        } else {
            SimPose::Fist
        };

        let frame_h = self.frame_h as f32;
        let pointer = self
            .window
            .get_mouse_pos(MouseMode::Discard)
            .filter(|&(_, y)| y < frame_h);
        let _ = self.sim_tx.send(SimInput::Hand { pointer, pose });

        commands
    }

    /// Render one frame.
    pub fn render(&mut self, app: &AppState) -> Result<(), AppError> {
        self.tick += 1;
        let engine = app.engine();
        let scale = engine.config().resolution_scale();

        // ── Backdrop + ink ────────────────────────────────────────────────
        fill_backdrop(&mut self.video, self.frame_w, self.frame_h, self.tick);
        engine.canvas().composite(&self.video, &mut self.composite)?;
        self.surface.blit(&self.composite, self.frame_w, self.frame_h);

        // ── Profile overlays ──────────────────────────────────────────────
        if engine.profile() == Profile::Mouse {
            let (lo, hi) = engine.active_region().bounds();
            self.surface.draw_border(
                lo.x.max(0.0) as usize,
                lo.y.max(0.0) as usize,
                (hi.x - lo.x).max(0.0) as usize,
                (hi.y - lo.y).max(0.0) as usize,
                REGION_COLOR,
            );
        }

        if let Some(out) = app.last_output() {
            let brush = engine.brush();

            if let Some(h) = out.hover {
                let (a, b) = (h.index_tip, h.middle_tip);
                let half = HOVER_HALF_H * scale;
                let x0 = a.x.min(b.x).max(0.0) as usize;
                let y0 = (a.y.min(b.y) - half).max(0.0) as usize;
                let x1 = a.x.max(b.x).max(0.0) as usize;
                let y1 = (a.y.max(b.y) + half).max(0.0) as usize;
                self.surface.fill_rect(x0, y0, x1.saturating_sub(x0).max(1), y1.saturating_sub(y0), brush.color);
            }

            if let Some(p) = out.draw_point {
                self.surface.fill_circle(p, brush.thickness / 2.0, brush.color);
            }

            if out.mode == Mode::Point || out.mode == Mode::PinchActive {
                if let Some(tip) = app.last_frame().point(hand_landmarks::ids::INDEX_TIP) {
                    let clicked = out.pointer.map_or(false, |p| p.click);
                    if engine.profile() == Profile::Mouse {
                        if clicked {
                            self.surface.fill_circle(tip, 14.0 * scale, CLICK_COLOR);
                        } else {
                            self.surface.draw_ring(tip, 8.0 * scale, CURSOR_COLOR);
                        }
                    }
                }
            }

            if let Some(cube) = out.cube {
                let color = if cube.grabbed { GRABBED_COLOR } else { CUBE_COLOR };
                for (a, b) in cube.segments() {
                    self.surface.draw_line(a, b, color);
                }
                for &p in cube.points.iter() {
                    self.surface.fill_circle(p, 2.0 * scale, color);
                }
            }
        }

        // ── Hand skeleton ─────────────────────────────────────────────────
        self.draw_skeleton(app.last_frame(), scale);

        // ── Status bar ────────────────────────────────────────────────────
        self.surface.fill_rect(0, self.frame_h, self.frame_w, STATUS_H, TEXT_BG);
        self.surface.draw_label(&app.status, 10, self.frame_h + 8, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.surface.draw_label(
            "hold D=index H=two fingers P=pinch N=no hand  C=clear B=brush 1/2/3=profile Q=quit",
            10, self.frame_h + 22, 0xFF888888,
        );

        self.window
            .update_with_buffer(&self.surface.buf, self.surface.width, self.surface.height)
            .map_err(|e| AppError::Window(e.to_string()))
    }

    fn draw_skeleton(&mut self, frame: &LandmarkFrame, scale: f32) {
        if !frame.is_complete() { return; }
        for &(a, b) in HAND_SKELETON.iter() {
            if let (Some(pa), Some(pb)) = (frame.point(a), frame.point(b)) {
                self.surface.draw_line(pa, pb, BONE_COLOR);
            }
        }
        for lm in &frame.landmarks {
            self.surface.fill_circle(lm.pos, 2.5 * scale, JOINT_COLOR);
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
