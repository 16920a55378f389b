//! Game state and core simulation types
//!
//! The `Session` owns everything a logic tick touches: the active level's
//! surfaces, actors and particles plus the character. Nothing lives in globals.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::actor::{Actor, ActorKind};
use super::geometry::Surface;
use super::level::LevelData;
use super::particles::ParticleSystem;
use crate::color::{Rgb, palette};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    #[default]
    Playing,
    /// Game is paused; ticks are no-ops
    Paused,
    /// Out of lives
    GameOver,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    CoinCollected { value: u32 },
    StarCollected { level: u32, star: u32 },
    ExtraLife,
    EnemyDefeated { kind: ActorKind },
    BossHit { hp: i32 },
    CharacterHurt { amount: u16 },
    LavaBurn,
    Warp { level: u32 },
    FellOut,
    LifeLost { lives: u32 },
    LevelLoaded { level: u32 },
    GameOver,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterState {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Signed speed along the facing yaw
    pub forward_speed: f32,
    /// Facing yaw (radians, 0 faces +z)
    pub yaw: f32,
    pub action: Action,
    pub prev_action: Action,
    /// Per-action sub-state (e.g. ground pound hover vs fall)
    pub action_state: u32,
    /// Ticks spent in the current action
    pub action_timer: u32,
    /// Fixed point health, 0x100 per wedge
    pub health: u16,
    pub coins: u32,
    pub lives: u32,
    pub stars: u32,
    /// Star ids owned per level
    pub level_stars: BTreeMap<u32, BTreeSet<u32>>,
    pub invuln_timer: u32,
    pub hurt_timer: u32,
    /// Index of the floor surface under the character
    pub floor: Option<usize>,
    pub floor_height: f32,
    /// Index of the last wall touched in the air
    pub wall: Option<usize>,
    /// Consecutive jumps in the current chain
    pub jump_count: u32,
    /// Grounded ticks left in which a jump press continues the chain
    pub jump_timer: u32,
    /// Ticks left in which a jump press performs a wall kick
    pub wall_kick_timer: u32,
    /// Punch combo stage (0 punch, 1 second punch, 2 kick)
    pub combo: u8,
    pub intended_yaw: f32,
    pub intended_mag: f32,
    /// Height the current airborne action started from
    pub peak_y: f32,
    /// Landing squash scale (1.0 at rest)
    pub squish: f32,
    pub squish_vel: f32,
    /// Walk cycle phase for the body bob
    pub bob_phase: f32,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0)
    }
}

impl CharacterState {
    pub fn new(pos: Vec3, yaw: f32) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            forward_speed: 0.0,
            yaw,
            action: Action::Freefall,
            prev_action: Action::Idle,
            action_state: 0,
            action_timer: 0,
            health: MAX_HEALTH,
            coins: 0,
            lives: START_LIVES,
            stars: 0,
            level_stars: BTreeMap::new(),
            invuln_timer: 0,
            hurt_timer: 0,
            floor: None,
            floor_height: FLOOR_SENTINEL,
            wall: None,
            jump_count: 0,
            jump_timer: 0,
            wall_kick_timer: 0,
            combo: 0,
            intended_yaw: 0.0,
            intended_mag: 0.0,
            peak_y: pos.y,
            squish: 1.0,
            squish_vel: 0.0,
            bob_phase: 0.0,
        }
    }

    /// Switch action, resetting the per-action timer and sub-state
    pub fn set_action(&mut self, next: Action) {
        if next != self.action {
            log::debug!("action {:?} -> {:?}", self.action, next);
        }
        self.prev_action = self.action;
        self.action = next;
        self.action_state = 0;
        self.action_timer = 0;
    }

    /// Apply damage unless invulnerable. Returns whether damage was applied.
    pub fn take_damage(&mut self, amount: u16) -> bool {
        if self.invuln_timer > 0 {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.hurt_timer = HURT_FLASH_TICKS;
        self.invuln_timer = INVULNERABLE_TICKS;
        true
    }

    pub fn heal(&mut self, amount: u16) {
        self.health = self.health.saturating_add(amount).min(MAX_HEALTH);
    }

    /// Health segments shown in the HUD
    pub fn wedges(&self) -> u16 {
        self.health >> 8
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn has_star(&self, level: u32, star: u32) -> bool {
        self.level_stars.get(&level).is_some_and(|set| set.contains(&star))
    }

    /// Record a star. Returns false if it was already owned.
    pub fn grant_star(&mut self, level: u32, star: u32) -> bool {
        let inserted = self.level_stars.entry(level).or_default().insert(star);
        if inserted {
            self.stars += 1;
        }
        inserted
    }

    /// Zero horizontal motion
    pub fn stop_horizontal(&mut self) {
        self.forward_speed = 0.0;
        self.vel.x = 0.0;
        self.vel.z = 0.0;
    }

    /// Kick off the landing squash animation
    pub fn start_squish(&mut self) {
        self.squish = 0.6;
        self.squish_vel = 0.15;
    }

    /// Per-tick cosmetic and timer decay
    pub fn decay_timers(&mut self) {
        self.invuln_timer = self.invuln_timer.saturating_sub(1);
        self.hurt_timer = self.hurt_timer.saturating_sub(1);

        if self.squish < 1.0 {
            self.squish = (self.squish + self.squish_vel).min(1.0);
            self.squish_vel *= 0.85;
            if (self.squish - 1.0).abs() < 0.01 {
                self.squish = 1.0;
            }
        }
    }

    /// Put the character at `pos`, falling, with no momentum
    pub fn place(&mut self, pos: Vec3, yaw: f32) {
        self.pos = pos;
        self.yaw = yaw;
        self.vel = Vec3::ZERO;
        self.forward_speed = 0.0;
        self.floor = None;
        self.floor_height = FLOOR_SENTINEL;
        self.wall = None;
        self.jump_count = 0;
        self.jump_timer = 0;
        self.wall_kick_timer = 0;
        self.combo = 0;
        self.peak_y = pos.y;
        self.set_action(Action::Freefall);
    }
}

/// Everything belonging to the loaded level
#[derive(Debug, Clone)]
pub struct World {
    pub level_id: u32,
    pub name: String,
    pub sky: Rgb,
    pub star_count: u32,
    pub spawn: Vec3,
    pub spawn_yaw: f32,
    pub surfaces: Vec<Surface>,
    pub actors: Vec<Actor>,
    pub particles: ParticleSystem,
}

impl World {
    /// An empty level with no surfaces, for tests and tooling
    pub fn empty(seed: u64) -> Self {
        Self {
            level_id: 0,
            name: String::new(),
            sky: palette::DEFAULT_SKY,
            star_count: 0,
            spawn: Vec3::ZERO,
            spawn_yaw: 0.0,
            surfaces: Vec::new(),
            actors: Vec::new(),
            particles: ParticleSystem::new(seed),
        }
    }

    /// Instantiate a level. Collectible bob phases are drawn from `seed`.
    pub fn from_level(level: &LevelData, seed: u64, max_particles: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed ^ u64::from(level.id));
        let actors = level
            .actors
            .iter()
            .cloned()
            .map(|mut actor| {
                if actor.kind.bobs() {
                    actor.bob_phase = rng.random_range(0.0..std::f32::consts::TAU);
                }
                actor
            })
            .collect();

        let mut particles = ParticleSystem::new(seed.wrapping_add(u64::from(level.id)));
        particles.set_max(max_particles);

        Self {
            level_id: level.id,
            name: level.name.clone(),
            sky: level.sky,
            star_count: level.star_count,
            spawn: level.spawn,
            spawn_yaw: level.spawn_yaw,
            surfaces: level.surfaces.clone(),
            actors,
            particles,
        }
    }
}

/// A play session: the loaded world, the character and run state
#[derive(Debug, Clone)]
pub struct Session {
    pub world: World,
    pub character: CharacterState,
    pub phase: GamePhase,
    /// Logic ticks since the session started
    pub tick_count: u64,
    pub seed: u64,
    max_particles: usize,
    /// Levels reachable by warp, keyed by id
    levels: BTreeMap<u32, LevelData>,
}

impl Session {
    /// Create a session and load `level`
    pub fn new(level: LevelData, seed: u64) -> Self {
        let mut session = Self {
            world: World::empty(seed),
            character: CharacterState::default(),
            phase: GamePhase::Playing,
            tick_count: 0,
            seed,
            max_particles: super::particles::DEFAULT_MAX_PARTICLES,
            levels: BTreeMap::new(),
        };
        session.load_level(level);
        session
    }

    /// Cap live particles (quality setting). Applies to the current world too.
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.world.particles.set_max(max);
    }

    /// Make a level reachable by warps without loading it
    pub fn add_level(&mut self, level: LevelData) {
        self.levels.insert(level.id, level);
    }

    /// Replace the world with `level`, keeping run totals (lives, stars)
    pub fn load_level(&mut self, level: LevelData) {
        self.world = World::from_level(&level, self.seed, self.max_particles);
        self.levels.insert(level.id, level);
        self.reset_character();
        log::info!(
            "Loaded level {} '{}' ({} surfaces, {} actors)",
            self.world.level_id,
            self.world.name,
            self.world.surfaces.len(),
            self.world.actors.len()
        );
    }

    /// Load a registered level by id. Returns false if it is unknown.
    pub fn warp(&mut self, level_id: u32) -> bool {
        match self.levels.get(&level_id).cloned() {
            Some(level) => {
                self.load_level(level);
                true
            }
            None => {
                log::warn!("Warp to unknown level {level_id}");
                false
            }
        }
    }

    /// Rebuild the current level from its source data
    pub fn reload_level(&mut self) {
        let id = self.world.level_id;
        if !self.warp(id) {
            self.reset_character();
        }
    }

    /// Move the character back to the level spawn, falling
    pub fn respawn(&mut self) {
        let (spawn, yaw) = (self.world.spawn, self.world.spawn_yaw);
        self.character.place(spawn, yaw);
    }

    fn reset_character(&mut self) {
        self.respawn();
        self.character.health = MAX_HEALTH;
        self.character.coins = 0;
        self.character.invuln_timer = 0;
        self.character.hurt_timer = 0;
    }

    pub fn level_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.levels.keys().copied()
    }

    /// Toggle between playing and paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            GamePhase::GameOver => GamePhase::GameOver,
        };
    }
}
