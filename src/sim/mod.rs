//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` per logic tick)
//! - Seeded RNG only
//! - Stable iteration order (surfaces and actors in level order)
//! - No rendering or platform dependencies

pub mod action;
pub mod actor;
pub mod collision;
pub mod geometry;
pub mod input;
pub mod interaction;
pub mod level;
pub mod particles;
pub mod physics;
pub mod state;
pub mod tick;

pub use action::{Action, ActionFn, dispatch, dispatch_raw};
pub use actor::{Actor, ActorKind, CrusherPhase, Reward, update_actors};
pub use collision::{FloorHit, find_floor, find_wall};
pub use geometry::{
    Surface, SurfaceClass, SurfaceKind, make_box, make_ground, make_quad, make_slope, make_stairs,
};
pub use input::{Buttons, InputFrame};
pub use interaction::interact;
pub use level::LevelData;
pub use particles::{DEFAULT_MAX_PARTICLES, Particle, ParticleKind, ParticleSystem};
pub use physics::{StepResult, air_step, air_step_with, ground_step, set_forward_speed, update_air};
pub use state::{CharacterState, GameEvent, GamePhase, Session, World};
pub use tick::{LogicClock, tick};
