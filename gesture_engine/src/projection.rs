//! Pinhole projection, back-projection and the anchored cube.
//!
//! The camera looks down +z.  World `x`/`y` share the image axes (right,
//! down), so the forward map is
//!
//! ```text
//! x2d = x · f / z + cx
//! y2d = y · f / z + cy
//! ```
//!
//! A single 2-D fingertip carries no depth, so anchoring assumes a fixed
//! working depth `z0` and inverts the formula at that depth.

use std::ops::{Add, Sub};

use hand_landmarks::Point2;

/// Depths at or below this are clamped before dividing.  Near-camera points
/// are distorted rather than inverted or sent to infinity.
pub const DEPTH_FLOOR: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// Vec3
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Vec3 { x, y, z }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CameraModel
// ════════════════════════════════════════════════════════════════════════════

/// Focal length and principal point, fixed for a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraModel {
    pub focal: f32,
    pub cx:    f32,
    pub cy:    f32,
}

impl CameraModel {
    pub fn new(focal: f32, cx: f32, cy: f32) -> Self {
        CameraModel { focal, cx, cy }
    }

    /// Principal point at the centre of a `width × height` frame.
    pub fn centered(focal: f32, width: u32, height: u32) -> Self {
        CameraModel::new(focal, (width / 2) as f32, (height / 2) as f32)
    }

    /// 3-D → 2-D.  `z` is clamped up to [`DEPTH_FLOOR`] first.
    pub fn project(&self, p: Vec3) -> Point2 {
        let z = p.z.max(DEPTH_FLOOR);
        let s = self.focal / z;
        Point2::new(p.x * s + self.cx, p.y * s + self.cy)
    }

    /// 2-D + assumed depth → 3-D; the exact inverse of [`project`](Self::project)
    /// at `z = depth`.
    pub fn back_project(&self, p: Point2, depth: f32) -> Vec3 {
        Vec3::new(
            (p.x - self.cx) * depth / self.focal,
            (p.y - self.cy) * depth / self.focal,
            depth,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Cube
// ════════════════════════════════════════════════════════════════════════════

/// Corner pairs of the cube wireframe: back square, front square, then the
/// four connectors.  Indexes [`Cube::corners`].
pub const CUBE_EDGES: [(usize, usize); 12] = [
    (0, 1), (1, 2), (2, 3), (3, 0),
    (4, 5), (5, 6), (6, 7), (7, 4),
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// Axis-aligned cube.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cube {
    pub center:      Vec3,
    pub half_extent: f32,
}

impl Cube {
    pub fn new(center: Vec3, half_extent: f32) -> Self {
        Cube { center, half_extent }
    }

    /// Eight corners.  0–3 walk the back face (z − r) clockwise from
    /// top-left, 4–7 the front face (z + r) in the same order.
    pub fn corners(&self) -> [Vec3; 8] {
        let r = self.half_extent;
        let c = self.center;
        [
            c + Vec3::new(-r, -r, -r),
            c + Vec3::new( r, -r, -r),
            c + Vec3::new( r,  r, -r),
            c + Vec3::new(-r,  r, -r),
            c + Vec3::new(-r, -r,  r),
            c + Vec3::new( r, -r,  r),
            c + Vec3::new( r,  r,  r),
            c + Vec3::new(-r,  r,  r),
        ]
    }

    pub fn project(&self, camera: &CameraModel, grabbed: bool) -> CubeOverlay {
        let corners = self.corners();
        let mut points = [Point2::ZERO; 8];
        for (out, c) in points.iter_mut().zip(corners.iter()) {
            *out = camera.project(*c);
        }
        CubeOverlay { points, edges: &CUBE_EDGES, grabbed }
    }
}

/// What the host draws for the cube this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeOverlay {
    pub points:  [Point2; 8],
    pub edges:   &'static [(usize, usize); 12],
    /// Pinch is held; render in the "grabbed" colour.
    pub grabbed: bool,
}

impl CubeOverlay {
    /// Edge endpoints as pixel-space segments.
    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.edges.iter().map(move |&(a, b)| (self.points[a], self.points[b]))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// CubeAnchor
// ════════════════════════════════════════════════════════════════════════════

/// Rebuilds the cube every frame at the back-projected fingertip.
///
/// Feed it a smoothed point; it keeps no memory besides the last centre.
#[derive(Clone, Debug)]
pub struct CubeAnchor {
    camera:      CameraModel,
    depth:       f32,
    half_extent: f32,
    center:      Option<Vec3>,
}

impl CubeAnchor {
    pub fn new(camera: CameraModel, depth: f32, half_extent: f32) -> Self {
        CubeAnchor { camera, depth, half_extent, center: None }
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    /// Last anchor position, if the cube has been placed.
    pub fn center(&self) -> Option<Vec3> {
        self.center
    }

    /// Place the cube under `fingertip` and project it for rendering.
    pub fn place(&mut self, fingertip: Point2, grabbed: bool) -> CubeOverlay {
        let center = self.camera.back_project(fingertip, self.depth);
        self.center = Some(center);
        Cube::new(center, self.half_extent).project(&self.camera, grabbed)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
