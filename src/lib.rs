//! Star Hop - a third-person platformer core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (collision, action state machine, actors, particles)
//! - `renderer`: Software rasterizer (projection, culling, painter's sort, fill)
//! - `settings`: Presentation and loop configuration
//! - `color`: RGB color helpers shared by geometry and renderer

pub mod color;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use color::Rgb;
pub use settings::{QualityPreset, Settings};

use glam::Vec3;

/// Game configuration constants
///
/// Distances are world units, speeds are units per logic tick.
pub mod consts {
    use std::f32::consts::PI;

    /// Display refresh the frame-skip clock assumes
    pub const DISPLAY_HZ: u32 = 60;
    /// Logic ticks per second
    pub const LOGIC_HZ: u32 = 30;

    /// Per-tick gravity (added to vertical velocity)
    pub const GRAVITY: f32 = -4.0;
    /// Terminal fall speed
    pub const MAX_FALL_SPEED: f32 = -75.0;
    /// Forward speed at full stick deflection
    pub const MAX_WALK_SPEED: f32 = 32.0;
    /// Forward speed multiplier applied every airborne tick
    pub const AIR_DRAG: f32 = 0.98;
    /// Ground acceleration toward target speed
    pub const WALK_ACCEL: f32 = 1.5;
    /// Ground deceleration toward a lower target speed
    pub const WALK_DECEL: f32 = 1.0;
    /// Friction applied while decelerating with no stick input
    pub const GROUND_FRICTION: f32 = 2.0;
    /// Maximum yaw change per tick (11.25 degrees)
    pub const TURN_RATE: f32 = PI / 16.0;

    /// Initial vertical velocities
    pub const JUMP_VEL: f32 = 42.0;
    pub const DOUBLE_JUMP_VEL: f32 = 52.0;
    pub const TRIPLE_JUMP_VEL: f32 = 69.0;
    pub const BACKFLIP_VEL: f32 = 62.0;
    pub const SIDE_FLIP_VEL: f32 = 62.0;
    pub const LONG_JUMP_VEL: f32 = 30.0;
    pub const WALL_KICK_VEL: f32 = 52.0;
    pub const DIVE_VEL: f32 = 10.0;
    pub const SLIDE_KICK_VEL: f32 = 10.0;
    pub const GROUND_POUND_FALL_VEL: f32 = -60.0;
    pub const LAVA_BOOST_VEL: f32 = 60.0;
    pub const KNOCKBACK_VEL: f32 = 30.0;
    /// Upward bounce after stomping an enemy
    pub const STOMP_BOUNCE_VEL: f32 = 30.0;
    /// Upward bounce after stomping a boss
    pub const BOSS_BOUNCE_VEL: f32 = 40.0;

    /// Forward speed gained from |forward speed| on a single jump
    pub const JUMP_SPEED_BONUS: f32 = 0.25;
    /// Forward speed gained from |forward speed| on a double jump
    pub const DOUBLE_JUMP_SPEED_BONUS: f32 = 0.2;
    /// Forward speed after a wall kick
    pub const WALL_KICK_SPEED: f32 = 24.0;
    /// Long jump forward speed multiplier and cap
    pub const LONG_JUMP_SPEED_SCALE: f32 = 1.5;
    pub const LONG_JUMP_MAX_SPEED: f32 = 48.0;
    /// Minimum forward speed for a long jump
    pub const LONG_JUMP_MIN_SPEED: f32 = 10.0;
    /// Minimum forward speed for a triple jump
    pub const TRIPLE_JUMP_MIN_SPEED: f32 = 15.0;
    /// Minimum forward speed for a side flip out of deceleration
    pub const SIDE_FLIP_MIN_SPEED: f32 = 8.0;
    /// Minimum forward speed for a slide kick instead of a punch
    pub const SLIDE_KICK_MIN_SPEED: f32 = 8.0;
    /// Forward speed floors for dive / slide kick
    pub const DIVE_MIN_SPEED: f32 = 32.0;
    pub const SLIDE_KICK_MIN_LAUNCH: f32 = 28.0;
    /// Backward speed for backflip / knockback
    pub const BACKFLIP_SPEED: f32 = -10.0;
    pub const KNOCKBACK_SPEED: f32 = -20.0;
    pub const SIDE_FLIP_SPEED: f32 = 8.0;

    /// Ticks after landing during which another jump press chains
    pub const JUMP_CHAIN_WINDOW: u32 = 5;
    /// Ticks after wall contact during which a wall kick is accepted
    pub const WALL_KICK_WINDOW: u32 = 5;
    /// Hover ticks before a ground pound starts falling
    pub const GROUND_POUND_HOVER: u32 = 10;
    /// Non-interruptible ticks after a ground pound lands
    pub const GROUND_POUND_LAND_LOCK: u32 = 5;
    /// Ticks before ground pound recovery returns to idle by itself
    pub const GROUND_POUND_LAND_END: u32 = 15;
    /// Star dance duration
    pub const STAR_DANCE_TICKS: u32 = 90;

    /// Collision: floor surfaces above the query point by up to this much still count
    pub const STEP_ALLOWANCE: f32 = 150.0;
    /// Collision: bounding rectangle margin
    pub const BOUNDS_MARGIN: f32 = 10.0;
    /// Collision: height reported when no floor exists below the query point
    pub const FLOOR_SENTINEL: f32 = -11000.0;
    /// Collision: minimum normal.y for a floor surface
    pub const FLOOR_NORMAL_MIN: f32 = 0.5;
    /// Collision: wall check distance ahead of the character
    pub const WALL_REACH: f32 = 30.0;
    /// Collision: height above the feet the wall check runs at
    pub const WALL_CHECK_HEIGHT: f32 = 50.0;
    /// Ground step: maximum drop that still snaps to the floor
    pub const GROUND_SNAP: f32 = 10.0;
    /// Air step: sub-steps per tick
    pub const AIR_SUBSTEPS: u32 = 4;

    /// Health is fixed point: 0x100 per wedge, 8 wedges plus a half
    pub const MAX_HEALTH: u16 = 0x880;
    pub const HEALTH_PER_WEDGE: u16 = 0x100;
    /// Healing per coin value
    pub const COIN_HEAL: u16 = 0x40;
    /// Invulnerability ticks after taking damage
    pub const INVULNERABLE_TICKS: u32 = 60;
    /// Hurt flash ticks after taking damage
    pub const HURT_FLASH_TICKS: u32 = 10;
    /// Starting lives
    pub const START_LIVES: u32 = 4;
    /// Ticks the death action plays before the session reloads
    pub const DEATH_TICKS: u32 = 90;
    /// Falling below this height respawns the character
    pub const FALL_OUT_Y: f32 = -3000.0;

    /// Character collision radius for actor interaction
    pub const CHARACTER_RADIUS: f32 = 30.0;
}

/// Wrap an angle (radians) to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    while angle >= PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Move `current` toward `target` by at most `step`
#[inline]
pub fn approach_f32(current: f32, target: f32, step: f32) -> f32 {
    if current < target {
        (current + step).min(target)
    } else if current > target {
        (current - step).max(target)
    } else {
        current
    }
}

/// Turn `current` toward `target` along the shorter arc by at most `step` (radians)
pub fn approach_angle(current: f32, target: f32, step: f32) -> f32 {
    let delta = normalize_angle(target - current);
    if delta > step {
        normalize_angle(current + step)
    } else if delta < -step {
        normalize_angle(current - step)
    } else {
        normalize_angle(target)
    }
}

/// Unit horizontal direction for a facing yaw (yaw 0 faces +z)
#[inline]
pub fn yaw_to_dir(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Facing yaw pointing along the horizontal (dx, dz) direction
#[inline]
pub fn dir_to_yaw(dx: f32, dz: f32) -> f32 {
    dx.atan2(dz)
}
