//! Face pipeline: view transform, near reject, cull, project, painter's sort, fill
//!
//! There is no depth buffer. Faces are ordered back to front by mean view depth
//! and drawn in that order, so nearer faces overwrite farther ones.

use glam::{Vec2, Vec3};

use super::camera::Camera;
use super::raster::Framebuffer;
use crate::color::Rgb;
use crate::sim::Surface;

/// Projection scale in pixels at depth 1
pub const FOCAL_LENGTH: f32 = 500.0;
pub const NEAR_CLIP: f32 = 10.0;
pub const FAR_CLIP: f32 = 12000.0;
/// Faces nearer than this get an outline
pub const OUTLINE_DISTANCE: f32 = 2500.0;
const OUTLINE_SHADE: f32 = 0.6;
const MAX_TESSELLATION: usize = 16;

/// World-space quad ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub verts: [Vec3; 4],
    pub normal: Vec3,
    pub color: Rgb,
}

impl Face {
    pub fn new(verts: [Vec3; 4], normal: Vec3, color: Rgb) -> Self {
        Self { verts, normal, color }
    }

    pub fn center(&self) -> Vec3 {
        self.verts.iter().copied().sum::<Vec3>() * 0.25
    }

    /// Split into a bilinear grid of quads no longer than `tile` per edge.
    ///
    /// Large floors straddle the camera, and any face with a vertex behind
    /// the near plane is rejected whole; tiles keep the visible part.
    pub fn tessellate(&self, tile: f32) -> Vec<Face> {
        let [a, b, c, d] = self.verts;
        let cells = |len: f32| ((len / tile.max(1.0)).ceil() as usize).clamp(1, MAX_TESSELLATION);
        let nu = cells(a.distance(b).max(d.distance(c)));
        let nv = cells(a.distance(d).max(b.distance(c)));
        if nu == 1 && nv == 1 {
            return vec![*self];
        }
        let at = |u: usize, v: usize| {
            let (u, v) = (u as f32 / nu as f32, v as f32 / nv as f32);
            a.lerp(b, u).lerp(d.lerp(c, u), v)
        };
        let mut out = Vec::with_capacity(nu * nv);
        for v in 0..nv {
            for u in 0..nu {
                out.push(Face::new(
                    [at(u, v), at(u + 1, v), at(u + 1, v + 1), at(u, v + 1)],
                    self.normal,
                    self.color,
                ));
            }
        }
        out
    }
}

impl From<&Surface> for Face {
    fn from(surface: &Surface) -> Self {
        Self::new(surface.verts, surface.normal, surface.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOptions {
    pub fog: bool,
    pub outlines: bool,
    pub outline_distance: f32,
    pub sky: Rgb,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            fog: true,
            outlines: true,
            outline_distance: OUTLINE_DISTANCE,
            sky: crate::color::palette::DEFAULT_SKY,
        }
    }
}

/// Per-frame face counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: usize,
    pub near_rejected: usize,
    pub culled: usize,
    pub far_rejected: usize,
    pub drawn: usize,
}

/// Face after projection, waiting for the sort
#[derive(Debug, Clone, Copy)]
struct Projected {
    points: [Vec2; 4],
    depth: f32,
    color: Rgb,
}

/// Perspective divide to pixel coordinates; `view.z` must be positive
pub fn project(view: Vec3, width: usize, height: usize) -> Vec2 {
    let scale = FOCAL_LENGTH / view.z;
    Vec2::new(
        width as f32 * 0.5 + view.x * scale,
        height as f32 * 0.5 - view.y * scale,
    )
}

/// Fog blend factor toward the sky at `depth`
pub fn fog_factor(depth: f32) -> f32 {
    let t = (depth / FAR_CLIP).clamp(0.0, 1.0);
    t * t
}

/// Transform, reject and cull `faces`; survivors come back ordered far to near
fn depth_sorted(camera: &Camera, faces: &[Face], width: usize, height: usize, stats: &mut FrameStats) -> Vec<Projected> {
    let mut queue: Vec<Projected> = Vec::with_capacity(faces.len());

    for face in faces {
        let view = face.verts.map(|v| camera.to_view(v));
        if view.iter().any(|v| v.z <= NEAR_CLIP) {
            stats.near_rejected += 1;
            continue;
        }
        if face.normal.dot(camera.pos - face.center()) < 0.0 {
            stats.culled += 1;
            continue;
        }
        let depth = view.iter().map(|v| v.z).sum::<f32>() * 0.25;
        if depth > FAR_CLIP {
            stats.far_rejected += 1;
            continue;
        }
        queue.push(Projected {
            points: view.map(|v| project(v, width, height)),
            depth,
            color: face.color,
        });
    }

    // Stable: equal depths keep submission order
    queue.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    queue
}

pub fn draw_faces(fb: &mut Framebuffer, camera: &Camera, faces: &[Face], options: &DrawOptions) -> FrameStats {
    let mut stats = FrameStats {
        submitted: faces.len(),
        ..Default::default()
    };
    let queue = depth_sorted(camera, faces, fb.width(), fb.height(), &mut stats);

    for face in &queue {
        let color = if options.fog {
            face.color.lerp(options.sky, fog_factor(face.depth))
        } else {
            face.color
        };
        fb.fill_polygon(&face.points, color);
        if options.outlines && face.depth < options.outline_distance {
            fb.stroke_polygon(&face.points, color.shade(OUTLINE_SHADE));
        }
    }
    stats.drawn = queue.len();
    stats
}
