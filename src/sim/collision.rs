//! Floor and wall queries over the level's surface list
//!
//! Both queries are linear scans. Level surface counts are small and the
//! scan order doubles as the tie-break rule: the first surface found wins.

use super::geometry::{Surface, SurfaceClass};
use crate::consts::{BOUNDS_MARGIN, FLOOR_SENTINEL, STEP_ALLOWANCE, WALL_REACH};

/// Result of a floor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorHit {
    /// Plane height under the query point, or `FLOOR_SENTINEL`
    pub height: f32,
    /// Index of the floor surface, `None` means open air
    pub surface: Option<usize>,
}

impl FloorHit {
    pub const MISS: FloorHit = FloorHit {
        height: FLOOR_SENTINEL,
        surface: None,
    };

    #[inline]
    pub fn is_miss(&self) -> bool {
        self.surface.is_none()
    }
}

/// Find the highest floor under (x, z) that is not above `y + STEP_ALLOWANCE`.
///
/// Only upward-facing surfaces (`normal.y >= FLOOR_NORMAL_MIN`) are
/// candidates. Ceilings share the steep `|normal.y|` but are never stood on.
///
/// Returns `FloorHit::MISS` when nothing qualifies; callers treat that as
/// open air and keep falling.
pub fn find_floor(surfaces: &[Surface], x: f32, y: f32, z: f32) -> FloorHit {
    let mut best = FloorHit::MISS;
    let ceiling = y + STEP_ALLOWANCE;

    for (idx, surface) in surfaces.iter().enumerate() {
        if surface.class() != SurfaceClass::Floor {
            continue;
        }
        let (min, max) = (surface.min(), surface.max());
        if x < min.x - BOUNDS_MARGIN
            || x > max.x + BOUNDS_MARGIN
            || z < min.z - BOUNDS_MARGIN
            || z > max.z + BOUNDS_MARGIN
        {
            continue;
        }

        let height = surface.height_at(x, z);
        // Strictly greater keeps the first surface on ties
        if height > best.height && height <= ceiling {
            best = FloorHit {
                height,
                surface: Some(idx),
            };
        }
    }

    best
}

/// Look for a wall ahead of (x, y, z) along the horizontal direction (dx, dz).
///
/// A wall is hit when the segment from the current point to the point
/// `WALL_REACH` units ahead crosses the wall plane from its front side.
pub fn find_wall(surfaces: &[Surface], x: f32, y: f32, z: f32, dx: f32, dz: f32) -> Option<usize> {
    let tx = x + dx * WALL_REACH;
    let tz = z + dz * WALL_REACH;

    surfaces.iter().position(|surface| {
        if surface.class() != SurfaceClass::Wall {
            return false;
        }
        let (min, max) = (surface.min(), surface.max());
        if y < min.y - BOUNDS_MARGIN || y > max.y + BOUNDS_MARGIN {
            return false;
        }
        // Horizontal extent, grown by the reach so a crossing near an edge still counts
        if x < min.x - WALL_REACH
            || x > max.x + WALL_REACH
            || z < min.z - WALL_REACH
            || z > max.z + WALL_REACH
        {
            return false;
        }

        let before = surface.horizontal_distance(x, z);
        let after = surface.horizontal_distance(tx, tz);
        before > 0.0 && after <= 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::sim::geometry::{SurfaceKind, make_box, make_ground};
    use glam::Vec3;
    use proptest::prelude::*;

    const GREY: Rgb = Rgb::new(128, 128, 128);

    fn ground(y: f32) -> Surface {
        make_ground(0.0, 0.0, 1000.0, 1000.0, y, GREY, SurfaceKind::Default).unwrap()
    }

    #[test]
    fn test_find_floor_flat() {
        let surfaces = vec![ground(0.0)];
        let hit = find_floor(&surfaces, 10.0, 50.0, -10.0);
        assert_eq!(hit.surface, Some(0));
        assert!(hit.height.abs() < 1e-4);
    }

    #[test]
    fn test_find_floor_outside_bounds_misses() {
        let surfaces = vec![ground(0.0)];
        let hit = find_floor(&surfaces, 600.0, 50.0, 0.0);
        assert!(hit.is_miss());
        assert_eq!(hit.height, FLOOR_SENTINEL);
    }

    #[test]
    fn test_find_floor_picks_highest_below_allowance() {
        let surfaces = vec![ground(0.0), ground(100.0), ground(400.0)];
        // Query at y=0: 100 is a valid step-up, 400 is too high
        let hit = find_floor(&surfaces, 0.0, 0.0, 0.0);
        assert_eq!(hit.surface, Some(1));
        assert!((hit.height - 100.0).abs() < 1e-4);

        // Standing well above everything, the top floor wins
        let hit = find_floor(&surfaces, 0.0, 500.0, 0.0);
        assert_eq!(hit.surface, Some(2));
    }

    #[test]
    fn test_find_floor_tie_keeps_first() {
        let surfaces = vec![ground(20.0), ground(20.0)];
        assert_eq!(find_floor(&surfaces, 0.0, 20.0, 0.0).surface, Some(0));
    }

    #[test]
    fn test_find_floor_ignores_walls_and_ceilings() {
        // Box top is a floor; its sides are walls and never returned
        let surfaces = make_box(Vec3::new(0.0, 50.0, 0.0), Vec3::splat(100.0), GREY, SurfaceKind::Default);
        let hit = find_floor(&surfaces, 0.0, 120.0, 0.0);
        assert_eq!(hit.surface, Some(0));
        assert!((hit.height - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_find_wall_crossing() {
        // Box spanning x in [-50, 50]; the -x face sits at x = -50 facing -x
        let surfaces = make_box(Vec3::new(0.0, 50.0, 0.0), Vec3::splat(100.0), GREY, SurfaceKind::Default);

        // 20 units in front of the -x face, probing +x: crosses
        let hit = find_wall(&surfaces, -70.0, 50.0, 0.0, 1.0, 0.0);
        let idx = hit.expect("wall should be hit");
        assert!((surfaces[idx].normal - Vec3::NEG_X).length() < 1e-5);

        // Facing away: no crossing
        assert!(find_wall(&surfaces, -70.0, 50.0, 0.0, -1.0, 0.0).is_none());

        // Too far to reach
        assert!(find_wall(&surfaces, -200.0, 50.0, 0.0, 1.0, 0.0).is_none());

        // Above the box
        assert!(find_wall(&surfaces, -70.0, 300.0, 0.0, 1.0, 0.0).is_none());
    }

    #[test]
    fn test_find_wall_respects_horizontal_extent() {
        let surfaces = make_box(Vec3::new(0.0, 50.0, 0.0), Vec3::splat(100.0), GREY, SurfaceKind::Default);
        // In line with the -x plane but far off to the side in z
        assert!(find_wall(&surfaces, -70.0, 50.0, 500.0, 1.0, 0.0).is_none());
    }

    proptest! {
        #[test]
        fn prop_floor_never_above_step_allowance(
            heights in proptest::collection::vec(-2000.0f32..2000.0, 1..8),
            qx in -400.0f32..400.0,
            qy in -3000.0f32..3000.0,
            qz in -400.0f32..400.0,
        ) {
            let surfaces: Vec<Surface> = heights.iter().map(|&h| ground(h)).collect();
            let hit = find_floor(&surfaces, qx, qy, qz);
            prop_assert!(hit.height <= qy + STEP_ALLOWANCE);
            if let Some(idx) = hit.surface {
                prop_assert!((surfaces[idx].height_at(qx, qz) - hit.height).abs() < 1e-3);
            }
        }
    }
}
