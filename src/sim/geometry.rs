//! Planar collision surfaces and the builders that produce them
//!
//! Every surface is a coplanar quad with a unit normal. Boxes emit five faces
//! (no bottom), matching how level geometry is authored.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::consts::FLOOR_NORMAL_MIN;

/// Surface material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceKind {
    #[default]
    Default,
    /// Standing on it launches the character upward and hurts
    Lava,
    /// Reduced ground friction
    Slippery,
    /// Very low ground friction
    Ice,
    /// Touching it costs a wedge and respawns the character
    DeathPlane,
    /// Halves walking speed
    Water,
    /// Caps walking speed
    Sand,
}

impl SurfaceKind {
    /// Multiplier on ground acceleration and friction
    pub fn traction(&self) -> f32 {
        match self {
            SurfaceKind::Slippery => 0.5,
            SurfaceKind::Ice => 0.25,
            _ => 1.0,
        }
    }

    /// Multiplier on the walking target speed
    pub fn speed_scale(&self) -> f32 {
        match self {
            SurfaceKind::Water => 0.5,
            SurfaceKind::Sand => 0.6,
            _ => 1.0,
        }
    }
}

/// Collision role derived from the normal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    Floor,
    Ceiling,
    Wall,
}

/// A planar quad used for both collision and rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "SurfaceRaw")]
pub struct Surface {
    pub verts: [Vec3; 4],
    pub normal: Vec3,
    pub kind: SurfaceKind,
    pub color: Rgb,
    /// Level this surface warps to, if any
    #[serde(default)]
    pub warp: Option<u32>,
}

/// Unvalidated surface as it appears in level JSON
#[derive(Deserialize)]
struct SurfaceRaw {
    verts: [Vec3; 4],
    normal: Vec3,
    kind: SurfaceKind,
    color: Rgb,
    #[serde(default)]
    warp: Option<u32>,
}

impl TryFrom<SurfaceRaw> for Surface {
    type Error = String;

    fn try_from(raw: SurfaceRaw) -> Result<Self, Self::Error> {
        if winding_normal(&raw.verts).is_none() {
            return Err(format!("degenerate surface {:?}", raw.verts));
        }
        let surface = Surface::new(raw.verts, raw.normal, raw.kind, raw.color)
            .ok_or_else(|| format!("invalid surface normal {:?}", raw.normal))?;
        Ok(match raw.warp {
            Some(target) => surface.with_warp(target),
            None => surface,
        })
    }
}

impl Surface {
    /// Build a surface, normalizing `normal`.
    ///
    /// A zero-length normal is recomputed from the winding of the first three
    /// vertices; if that is degenerate too the surface is rejected.
    pub fn new(verts: [Vec3; 4], normal: Vec3, kind: SurfaceKind, color: Rgb) -> Option<Self> {
        let normal = if normal.length_squared() > 1e-8 {
            normal.normalize()
        } else {
            winding_normal(&verts)?
        };
        if !normal.is_finite() {
            return None;
        }
        Some(Self {
            verts,
            normal,
            kind,
            color,
            warp: None,
        })
    }

    /// Build a surface whose normal comes from the vertex winding
    pub fn from_winding(verts: [Vec3; 4], kind: SurfaceKind, color: Rgb) -> Option<Self> {
        Self::new(verts, Vec3::ZERO, kind, color)
    }

    pub fn with_warp(mut self, target: u32) -> Self {
        self.warp = Some(target);
        self
    }

    pub fn class(&self) -> SurfaceClass {
        if self.normal.y >= FLOOR_NORMAL_MIN {
            SurfaceClass::Floor
        } else if self.normal.y <= -FLOOR_NORMAL_MIN {
            SurfaceClass::Ceiling
        } else {
            SurfaceClass::Wall
        }
    }

    /// Component-wise minimum corner of the bounding box
    pub fn min(&self) -> Vec3 {
        self.verts.iter().copied().fold(Vec3::splat(f32::MAX), Vec3::min)
    }

    /// Component-wise maximum corner of the bounding box
    pub fn max(&self) -> Vec3 {
        self.verts.iter().copied().fold(Vec3::splat(f32::MIN), Vec3::max)
    }

    /// Mean of the four vertices
    pub fn center(&self) -> Vec3 {
        self.verts.iter().copied().sum::<Vec3>() * 0.25
    }

    /// Height of the surface plane at (x, z). Only meaningful for non-vertical planes.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let p = self.verts[0];
        let n = self.normal;
        (n.dot(p) - n.x * x - n.z * z) / n.y
    }

    /// Horizontal signed distance from (x, z) to the plane (wall surfaces)
    pub fn horizontal_distance(&self, x: f32, z: f32) -> f32 {
        let p = self.verts[0];
        (x - p.x) * self.normal.x + (z - p.z) * self.normal.z
    }
}

fn winding_normal(verts: &[Vec3; 4]) -> Option<Vec3> {
    let n = (verts[1] - verts[0]).cross(verts[2] - verts[0]);
    if n.length_squared() < 1e-8 {
        log::warn!("Rejecting degenerate surface at {:?}", verts[0]);
        return None;
    }
    Some(n.normalize())
}

/// Axis box centered at `center` with size `size`: top and four sides.
///
/// Faces are shaded per direction so boxes read as solid under flat fill.
pub fn make_box(center: Vec3, size: Vec3, color: Rgb, kind: SurfaceKind) -> Vec<Surface> {
    let h = size * 0.5;
    let (x, y, z) = (center.x, center.y, center.z);
    let top = color.shade(1.12);
    let front = color.shade(0.88);
    let back = color.shade(0.82);
    let side = color.shade(0.78);

    let faces = [
        (
            [
                Vec3::new(x - h.x, y + h.y, z - h.z),
                Vec3::new(x + h.x, y + h.y, z - h.z),
                Vec3::new(x + h.x, y + h.y, z + h.z),
                Vec3::new(x - h.x, y + h.y, z + h.z),
            ],
            Vec3::Y,
            top,
        ),
        (
            [
                Vec3::new(x - h.x, y - h.y, z + h.z),
                Vec3::new(x + h.x, y - h.y, z + h.z),
                Vec3::new(x + h.x, y + h.y, z + h.z),
                Vec3::new(x - h.x, y + h.y, z + h.z),
            ],
            Vec3::Z,
            front,
        ),
        (
            [
                Vec3::new(x + h.x, y - h.y, z - h.z),
                Vec3::new(x - h.x, y - h.y, z - h.z),
                Vec3::new(x - h.x, y + h.y, z - h.z),
                Vec3::new(x + h.x, y + h.y, z - h.z),
            ],
            Vec3::NEG_Z,
            back,
        ),
        (
            [
                Vec3::new(x - h.x, y - h.y, z - h.z),
                Vec3::new(x - h.x, y - h.y, z + h.z),
                Vec3::new(x - h.x, y + h.y, z + h.z),
                Vec3::new(x - h.x, y + h.y, z - h.z),
            ],
            Vec3::NEG_X,
            side,
        ),
        (
            [
                Vec3::new(x + h.x, y - h.y, z + h.z),
                Vec3::new(x + h.x, y - h.y, z - h.z),
                Vec3::new(x + h.x, y + h.y, z - h.z),
                Vec3::new(x + h.x, y + h.y, z + h.z),
            ],
            Vec3::X,
            side,
        ),
    ];

    faces
        .into_iter()
        .filter_map(|(verts, normal, shade)| Surface::new(verts, normal, kind, shade))
        .collect()
}

/// Quad with its normal taken from the p1→p2, p1→p3 winding
pub fn make_quad(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3, color: Rgb, kind: SurfaceKind) -> Option<Surface> {
    // Winding p1,p2,p3 counter-clockwise seen from above yields -y; flip so
    // ground quads authored in the usual order face up.
    let n = (p3 - p1).cross(p2 - p1);
    Surface::new([p1, p2, p3, p4], n, kind, color)
}

/// Horizontal ground rectangle of size `w` × `d` at height `y`
pub fn make_ground(x: f32, z: f32, w: f32, d: f32, y: f32, color: Rgb, kind: SurfaceKind) -> Option<Surface> {
    let (hw, hd) = (w * 0.5, d * 0.5);
    make_quad(
        Vec3::new(x - hw, y, z - hd),
        Vec3::new(x + hw, y, z - hd),
        Vec3::new(x + hw, y, z + hd),
        Vec3::new(x - hw, y, z + hd),
        color,
        kind,
    )
}

/// Ramp of width `w` from `from` to `to` (extruded along x)
pub fn make_slope(from: Vec3, to: Vec3, w: f32, color: Rgb, kind: SurfaceKind) -> Option<Surface> {
    let hw = w * 0.5;
    make_quad(
        Vec3::new(from.x - hw, from.y, from.z),
        Vec3::new(from.x + hw, from.y, from.z),
        Vec3::new(to.x + hw, to.y, to.z),
        Vec3::new(to.x - hw, to.y, to.z),
        color,
        kind,
    )
}

/// `count` stacked boxes rising along `dir` (x, z unit steps)
pub fn make_stairs(
    base: Vec3,
    count: u32,
    step_size: Vec3,
    dir: (f32, f32),
    color: Rgb,
) -> Vec<Surface> {
    (0..count)
        .flat_map(|i| {
            let i = i as f32;
            let center = Vec3::new(
                base.x + dir.0 * i * step_size.z,
                base.y + i * step_size.y + step_size.y * 0.5,
                base.z + dir.1 * i * step_size.z,
            );
            make_box(center, step_size, color, SurfaceKind::Default)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Rgb = Rgb::new(200, 200, 200);

    #[test]
    fn test_ground_faces_up() {
        let g = make_ground(0.0, 0.0, 100.0, 100.0, 5.0, GREY, SurfaceKind::Default).unwrap();
        assert!((g.normal - Vec3::Y).length() < 1e-5);
        assert_eq!(g.class(), SurfaceClass::Floor);
        assert!((g.height_at(10.0, -20.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_normal_is_normalized() {
        let s = Surface::new(
            [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 0.0, 1.0), Vec3::Z],
            Vec3::new(0.0, 10.0, 0.0),
            SurfaceKind::Default,
            GREY,
        )
        .unwrap();
        assert!((s.normal.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_surface_rejected() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert!(Surface::new([p; 4], Vec3::ZERO, SurfaceKind::Default, GREY).is_none());
    }

    #[test]
    fn test_zero_normal_recomputed_from_winding() {
        let s = Surface::from_winding(
            [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y],
            SurfaceKind::Default,
            GREY,
        )
        .unwrap();
        assert!((s.normal.z.abs() - 1.0).abs() < 1e-6);
        assert_eq!(s.class(), SurfaceClass::Wall);
    }

    #[test]
    fn test_box_has_top_and_four_walls() {
        let faces = make_box(Vec3::new(0.0, 50.0, 0.0), Vec3::splat(100.0), GREY, SurfaceKind::Lava);
        assert_eq!(faces.len(), 5);
        let floors = faces.iter().filter(|s| s.class() == SurfaceClass::Floor).count();
        let walls = faces.iter().filter(|s| s.class() == SurfaceClass::Wall).count();
        assert_eq!((floors, walls), (1, 4));
        assert!(faces.iter().all(|s| s.kind == SurfaceKind::Lava));
        assert!((faces[0].height_at(0.0, 0.0) - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_slope_height_interpolates() {
        let s = make_slope(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 100.0, 200.0),
            100.0,
            GREY,
            SurfaceKind::Default,
        )
        .unwrap();
        assert_eq!(s.class(), SurfaceClass::Floor);
        assert!((s.height_at(0.0, 100.0) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_stairs_rise() {
        let stairs = make_stairs(Vec3::ZERO, 3, Vec3::new(100.0, 20.0, 50.0), (0.0, 1.0), GREY);
        assert_eq!(stairs.len(), 15);
        let top_heights: Vec<f32> = stairs
            .iter()
            .filter(|s| s.class() == SurfaceClass::Floor)
            .map(|s| s.max().y)
            .collect();
        assert_eq!(top_heights, vec![20.0, 40.0, 60.0]);
    }
}
