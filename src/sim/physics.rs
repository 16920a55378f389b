//! Per-tick integration steps shared by the action handlers
//!
//! Handlers choose the velocity; these steps move the character through the
//! level and report what it touched.

use glam::Vec2;

use super::collision::{find_floor, find_wall};
use super::geometry::Surface;
use super::state::CharacterState;
use crate::consts::*;
use crate::yaw_to_dir;

/// Outcome of a ground or air step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// Still standing on a floor
    Ground,
    /// Still (or now) in the air
    Air,
    /// Touched down during an air step
    Landed,
    /// Ran into a wall; horizontal motion was cancelled
    HitWall,
}

/// Airborne velocity update: drag on forward speed, gravity, terminal velocity
pub fn update_air(c: &mut CharacterState) {
    c.forward_speed *= AIR_DRAG;
    let dir = yaw_to_dir(c.yaw);
    c.vel.x = c.forward_speed * dir.x;
    c.vel.z = c.forward_speed * dir.z;
    c.vel.y = (c.vel.y + GRAVITY).max(MAX_FALL_SPEED);
}

/// Set forward speed and derive horizontal velocity from the facing yaw
pub fn set_forward_speed(c: &mut CharacterState, speed: f32) {
    c.forward_speed = speed;
    let dir = yaw_to_dir(c.yaw);
    c.vel.x = speed * dir.x;
    c.vel.z = speed * dir.z;
}

/// Move horizontally by the current velocity and snap onto the floor.
///
/// A wall ahead of the move cancels it. A floor more than `GROUND_SNAP`
/// below the feet (or no floor) leaves the character airborne.
pub fn ground_step(c: &mut CharacterState, surfaces: &[Surface]) -> StepResult {
    let mut result = StepResult::Ground;
    let horiz = Vec2::new(c.vel.x, c.vel.z);

    if horiz.length_squared() > 1e-6 {
        let dir = horiz.normalize();
        let check_y = c.pos.y + WALL_CHECK_HEIGHT;
        let next_x = c.pos.x + c.vel.x;
        let next_z = c.pos.z + c.vel.z;
        if let Some(wall) = find_wall(surfaces, next_x, check_y, next_z, dir.x, dir.y) {
            c.wall = Some(wall);
            c.stop_horizontal();
            result = StepResult::HitWall;
        } else {
            c.pos.x = next_x;
            c.pos.z = next_z;
        }
    }

    let hit = find_floor(surfaces, c.pos.x, c.pos.y, c.pos.z);
    c.floor = hit.surface;
    c.floor_height = hit.height;
    if c.pos.y > hit.height + GROUND_SNAP {
        return StepResult::Air;
    }
    c.pos.y = hit.height;
    result
}

/// Move by the current velocity in `AIR_SUBSTEPS` equal increments
pub fn air_step(c: &mut CharacterState, surfaces: &[Surface]) -> StepResult {
    air_step_with(c, surfaces, AIR_SUBSTEPS)
}

/// Air step with an explicit sub-step count.
///
/// Floor and wall are re-queried after every increment; touching down or
/// hitting a wall ends the step early.
pub fn air_step_with(c: &mut CharacterState, surfaces: &[Surface], substeps: u32) -> StepResult {
    let substeps = substeps.max(1);
    let step = c.vel / substeps as f32;
    let horiz = Vec2::new(c.vel.x, c.vel.z);
    let dir = (horiz.length_squared() > 1e-6).then(|| horiz.normalize());

    for _ in 0..substeps {
        c.pos += step;

        let hit = find_floor(surfaces, c.pos.x, c.pos.y, c.pos.z);
        c.floor = hit.surface;
        c.floor_height = hit.height;
        if c.pos.y <= hit.height {
            c.pos.y = hit.height;
            c.start_squish();
            return StepResult::Landed;
        }

        if let Some(dir) = dir {
            let check_y = c.pos.y + WALL_CHECK_HEIGHT;
            if let Some(wall) = find_wall(surfaces, c.pos.x, check_y, c.pos.z, dir.x, dir.y) {
                c.wall = Some(wall);
                c.stop_horizontal();
                return StepResult::HitWall;
            }
        }
    }

    StepResult::Air
}
