//! Secondary actors: collectibles, enemies, hazards and props
//!
//! Actors are created with the level and never removed; collecting or
//! defeating one clears `active`. Updates are deterministic in the actor's own
//! state plus the tick counter.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::CharacterState;
use crate::color::{Rgb, palette};
use crate::{approach_f32, dir_to_yaw, yaw_to_dir};

/// Horizontal distance within which walkers chase the character
pub const CHASE_RADIUS: f32 = 400.0;
/// Horizontal distance within which shovers charge
pub const SHOVE_RADIUS: f32 = 200.0;
/// Horizontal distance within which the boss turns to face the character
pub const BOSS_SIGHT: f32 = 500.0;
/// Half-width of the footprint that triggers a crusher
pub const CRUSHER_TRIGGER: f32 = 100.0;
/// Crusher drop below its home height
pub const CRUSHER_DROP: f32 = 200.0;
/// Maximum reach of a lunger from its anchor
pub const LUNGE_REACH: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Coin,
    RedCoin,
    BlueCoin,
    Star,
    ExtraLife,
    /// Patrols, chases when close; stompable
    Walker,
    /// Charges and pushes the character away; harmless
    Shover,
    /// Creeps up while the character looks away
    Ghost,
    /// Rises from and sinks into the ground on a fixed cycle; stompable
    Snapper,
    /// Orbits its home point; always hurts
    Spark,
    /// Slams down when the character is underneath
    Crusher,
    /// Lunges from its anchor on a fixed cycle; always hurts
    Lunger,
    Boss,
    Tree,
    Pipe,
}

impl ActorKind {
    pub fn is_collectible(&self) -> bool {
        matches!(
            self,
            ActorKind::Coin | ActorKind::RedCoin | ActorKind::BlueCoin | ActorKind::Star | ActorKind::ExtraLife
        )
    }

    /// Kinds whose bob phase is randomized at level load
    pub fn bobs(&self) -> bool {
        self.is_collectible()
    }

    pub fn is_static(&self) -> bool {
        matches!(self, ActorKind::Tree | ActorKind::Pipe)
    }
}

/// What collecting an actor grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Reward {
    #[default]
    None,
    Coins(u32),
    Health(u16),
    Star(u32),
    Life,
}

/// Crusher cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrusherPhase {
    #[default]
    Waiting,
    Slamming,
    Resting,
    Rising,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub kind: ActorKind,
    pub pos: Vec3,
    #[serde(default)]
    pub vel: Vec3,
    #[serde(default)]
    pub yaw: f32,
    pub radius: f32,
    pub height: f32,
    pub hp: i32,
    pub active: bool,
    pub collected: bool,
    #[serde(default)]
    pub timer: u32,
    #[serde(default)]
    pub phase: CrusherPhase,
    pub home: Vec3,
    /// Interaction range (added to the character radius)
    pub range: f32,
    /// Contact damage in health units
    pub damage: u16,
    #[serde(default)]
    pub reward: Reward,
    /// Movement speed per tick
    pub speed: f32,
    /// Patrol direction along x (+1 / -1)
    pub patrol_dir: f32,
    #[serde(default)]
    pub bob_phase: f32,
    /// Hit flash ticks
    #[serde(default)]
    pub flash: u32,
    #[serde(default)]
    pub orbit_radius: f32,
    #[serde(default)]
    pub warp: Option<u32>,
    pub color: Rgb,
}

impl Actor {
    pub fn new(kind: ActorKind, pos: Vec3, radius: f32, height: f32, color: Rgb) -> Self {
        Self {
            kind,
            pos,
            vel: Vec3::ZERO,
            yaw: 0.0,
            radius,
            height,
            hp: 1,
            active: true,
            collected: false,
            timer: 0,
            phase: CrusherPhase::Waiting,
            home: pos,
            range: 80.0,
            damage: 0,
            reward: Reward::None,
            speed: 1.5,
            patrol_dir: 1.0,
            bob_phase: 0.0,
            flash: 0,
            orbit_radius: 0.0,
            warp: None,
            color,
        }
    }

    fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    fn with_damage(mut self, wedges: u16) -> Self {
        self.damage = wedges * crate::consts::HEALTH_PER_WEDGE;
        self
    }

    fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    fn with_hp(mut self, hp: i32) -> Self {
        self.hp = hp;
        self
    }

    fn coin_of(kind: ActorKind, ground: Vec3, value: u32, color: Rgb) -> Self {
        let mut coin = Actor::new(kind, ground + Vec3::Y * 30.0, 30.0, 30.0, color).with_range(60.0);
        coin.reward = Reward::Coins(value);
        coin
    }

    pub fn coin(ground: Vec3) -> Self {
        Self::coin_of(ActorKind::Coin, ground, 1, palette::COIN)
    }

    pub fn red_coin(ground: Vec3) -> Self {
        Self::coin_of(ActorKind::RedCoin, ground, 2, palette::RED_COIN)
    }

    pub fn blue_coin(ground: Vec3) -> Self {
        Self::coin_of(ActorKind::BlueCoin, ground, 5, palette::BLUE_COIN)
    }

    /// `n` coins in a circle of radius `r` around `center`
    pub fn coin_ring(center: Vec3, r: f32, n: u32) -> Vec<Self> {
        (0..n)
            .map(|i| {
                let dir = yaw_to_dir(std::f32::consts::TAU / n as f32 * i as f32);
                Self::coin(center + dir * r)
            })
            .collect()
    }

    /// `n` coins spaced by `step`
    pub fn coin_line(start: Vec3, step: Vec3, n: u32) -> Vec<Self> {
        (0..n).map(|i| Self::coin(start + step * i as f32)).collect()
    }

    pub fn star(ground: Vec3, id: u32) -> Self {
        let mut star = Actor::new(ActorKind::Star, ground + Vec3::Y * 50.0, 40.0, 40.0, palette::STAR);
        star.reward = Reward::Star(id);
        star
    }

    pub fn extra_life(ground: Vec3) -> Self {
        let mut life = Actor::new(ActorKind::ExtraLife, ground + Vec3::Y * 30.0, 25.0, 25.0, palette::EXTRA_LIFE)
            .with_range(50.0);
        life.reward = Reward::Life;
        life
    }

    pub fn walker(pos: Vec3) -> Self {
        Actor::new(ActorKind::Walker, pos, 40.0, 50.0, Rgb::new(150, 80, 30))
            .with_range(60.0)
            .with_damage(1)
    }

    pub fn shover(pos: Vec3) -> Self {
        Actor::new(ActorKind::Shover, pos, 50.0, 60.0, Rgb::new(80, 80, 80))
            .with_range(70.0)
            .with_hp(3)
            .with_speed(2.0)
    }

    pub fn ghost(ground: Vec3) -> Self {
        Actor::new(ActorKind::Ghost, ground + Vec3::Y * 30.0, 50.0, 60.0, Rgb::new(220, 220, 255))
            .with_range(70.0)
            .with_damage(1)
    }

    pub fn snapper(pos: Vec3) -> Self {
        Actor::new(ActorKind::Snapper, pos, 40.0, 80.0, Rgb::new(20, 140, 20))
            .with_range(70.0)
            .with_damage(2)
    }

    pub fn spark(center: Vec3, orbit_radius: f32) -> Self {
        let mut spark = Actor::new(ActorKind::Spark, center, 30.0, 30.0, Rgb::new(30, 30, 200))
            .with_range(50.0)
            .with_damage(1);
        spark.orbit_radius = orbit_radius;
        spark
    }

    pub fn crusher(pos: Vec3) -> Self {
        Actor::new(ActorKind::Crusher, pos, 60.0, 100.0, Rgb::new(130, 130, 150))
            .with_range(80.0)
            .with_damage(2)
    }

    pub fn lunger(anchor: Vec3) -> Self {
        Actor::new(ActorKind::Lunger, anchor, 60.0, 80.0, Rgb::new(20, 20, 30))
            .with_range(90.0)
            .with_damage(3)
    }

    pub fn boss(pos: Vec3, hp: i32) -> Self {
        Actor::new(ActorKind::Boss, pos, 120.0, 150.0, Rgb::new(60, 120, 40))
            .with_range(150.0)
            .with_damage(2)
            .with_hp(hp)
            .with_speed(2.0)
    }

    pub fn tree(pos: Vec3, height: f32) -> Self {
        Actor::new(ActorKind::Tree, pos, 20.0, height, palette::TREE_TRUNK).with_range(0.0)
    }

    pub fn pipe(pos: Vec3, target: u32) -> Self {
        let mut pipe = Actor::new(ActorKind::Pipe, pos, 50.0, 80.0, Rgb::new(0, 180, 0)).with_range(50.0);
        pipe.warp = Some(target);
        pipe
    }

    /// Horizontal offset and distance from this actor to `target`
    fn horizontal_to(&self, target: Vec3) -> (f32, f32, f32) {
        let dx = target.x - self.pos.x;
        let dz = target.z - self.pos.z;
        (dx, dz, (dx * dx + dz * dz).sqrt())
    }

    /// Step toward `target` along the ground plane
    fn step_toward(&mut self, target: Vec3, speed: f32) {
        let (dx, dz, d) = self.horizontal_to(target);
        if d > 0.0 {
            self.pos.x += dx / d * speed;
            self.pos.z += dz / d * speed;
            self.yaw = dir_to_yaw(dx, dz);
        }
    }
}

/// Advance every active actor by one tick
pub fn update_actors(actors: &mut [Actor], character: &CharacterState, tick: u64) {
    let t = tick as f32;
    for actor in actors.iter_mut().filter(|a| a.active) {
        update_actor(actor, character, t);
        actor.flash = actor.flash.saturating_sub(1);
    }
}

fn update_actor(a: &mut Actor, c: &CharacterState, t: f32) {
    match a.kind {
        ActorKind::Coin | ActorKind::RedCoin | ActorKind::BlueCoin => {
            a.pos.y = a.home.y + (t * 0.08 + a.bob_phase).sin() * 10.0;
            a.yaw = crate::normalize_angle(a.yaw + 6f32.to_radians());
        }
        ActorKind::Star => {
            a.pos.y = a.home.y + (t * 0.06 + a.bob_phase).sin() * 15.0;
            a.yaw = crate::normalize_angle(a.yaw + 3f32.to_radians());
        }
        ActorKind::ExtraLife => {
            a.pos.y = a.home.y + (t * 0.07 + a.bob_phase).sin() * 8.0;
        }
        ActorKind::Walker => {
            let (_, _, d) = a.horizontal_to(c.pos);
            if d > 0.0 && d < CHASE_RADIUS {
                a.step_toward(c.pos, a.speed);
            } else {
                a.timer += 1;
                let dir = if a.timer % 120 < 60 { a.patrol_dir } else { -a.patrol_dir };
                a.pos.x += a.speed * dir;
                a.yaw = dir_to_yaw(dir, 0.0);
            }
        }
        ActorKind::Shover => {
            let (_, _, d) = a.horizontal_to(c.pos);
            if d > 0.0 && d < SHOVE_RADIUS {
                a.step_toward(c.pos, a.speed * 1.5);
            }
        }
        ActorKind::Ghost => {
            let (dx, dz, d) = a.horizontal_to(c.pos);
            let facing = yaw_to_dir(c.yaw);
            // Character looks away when the ghost lies behind its facing direction
            let looking_away = facing.x * -dx + facing.z * -dz < 0.0;
            if looking_away && d > 0.0 && d < CHASE_RADIUS {
                a.step_toward(c.pos, 1.5);
            }
            a.pos.y = a.home.y + (t * 0.04).sin() * 20.0;
        }
        ActorKind::Snapper => {
            a.timer += 1;
            let cycle = a.timer % 120;
            if cycle < 30 {
                a.pos.y = approach_f32(a.pos.y, a.home.y + 60.0, 3.0);
            } else if cycle > 90 {
                a.pos.y = approach_f32(a.pos.y, a.home.y - 20.0, 3.0);
            }
        }
        ActorKind::Spark => {
            a.timer += 1;
            let angle = (a.timer as f32 * 3.0).to_radians();
            a.pos.x = a.home.x + a.orbit_radius * angle.sin();
            a.pos.z = a.home.z + a.orbit_radius * angle.cos();
        }
        ActorKind::Crusher => update_crusher(a, c),
        ActorKind::Lunger => {
            a.timer += 1;
            let cycle = a.timer % 90;
            let dx = c.pos.x - a.home.x;
            let dz = c.pos.z - a.home.z;
            let d = (dx * dx + dz * dz).sqrt();
            if cycle < 20 {
                if d > 0.0 && d < 300.0 {
                    let reach = LUNGE_REACH * cycle as f32 / 20.0;
                    a.pos.x = a.home.x + dx / d * reach;
                    a.pos.z = a.home.z + dz / d * reach;
                    a.yaw = dir_to_yaw(dx, dz);
                }
            } else {
                a.pos.x = approach_f32(a.pos.x, a.home.x, 3.0);
                a.pos.z = approach_f32(a.pos.z, a.home.z, 3.0);
            }
        }
        ActorKind::Boss => {
            let (dx, dz, d) = a.horizontal_to(c.pos);
            if d > 0.0 && d < BOSS_SIGHT {
                a.yaw = dir_to_yaw(dx, dz);
                if d > 100.0 {
                    a.step_toward(c.pos, a.speed);
                }
            }
        }
        ActorKind::Tree | ActorKind::Pipe => {}
    }
}

fn update_crusher(a: &mut Actor, c: &CharacterState) {
    match a.phase {
        CrusherPhase::Waiting => {
            if (c.pos.x - a.pos.x).abs() < CRUSHER_TRIGGER && (c.pos.z - a.pos.z).abs() < CRUSHER_TRIGGER {
                a.phase = CrusherPhase::Slamming;
                a.timer = 0;
            }
        }
        CrusherPhase::Slamming => {
            let bottom = a.home.y - CRUSHER_DROP;
            a.pos.y = approach_f32(a.pos.y, bottom, 15.0);
            if a.pos.y <= bottom + 5.0 {
                a.phase = CrusherPhase::Resting;
                a.timer = 0;
            }
        }
        CrusherPhase::Resting => {
            a.timer += 1;
            if a.timer > 30 {
                a.phase = CrusherPhase::Rising;
            }
        }
        CrusherPhase::Rising => {
            a.pos.y = approach_f32(a.pos.y, a.home.y, 3.0);
            if a.pos.y >= a.home.y - 1.0 {
                a.phase = CrusherPhase::Waiting;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character_at(pos: Vec3, yaw: f32) -> CharacterState {
        CharacterState::new(pos, yaw)
    }

    #[test]
    fn test_coin_bobs_around_home() {
        let mut actors = vec![Actor::coin(Vec3::ZERO)];
        let c = character_at(Vec3::new(5000.0, 0.0, 0.0), 0.0);
        for tick in 0..200 {
            update_actors(&mut actors, &c, tick);
            assert!((actors[0].pos.y - 30.0).abs() <= 10.0 + 1e-4);
        }
    }

    #[test]
    fn test_walker_chases_near_and_patrols_far() {
        let c = character_at(Vec3::new(0.0, 0.0, 200.0), 0.0);
        let mut near = vec![Actor::walker(Vec3::ZERO)];
        update_actors(&mut near, &c, 0);
        assert!(near[0].pos.z > 0.0);
        assert_eq!(near[0].pos.x, 0.0);

        let far_char = character_at(Vec3::new(0.0, 0.0, 2000.0), 0.0);
        let mut far = vec![Actor::walker(Vec3::ZERO)];
        for tick in 0..59 {
            update_actors(&mut far, &far_char, tick);
        }
        assert!(far[0].pos.x > 0.0);
        assert_eq!(far[0].pos.z, 0.0);
        // Second half of the cycle walks back, the cycle's last tick steps out again
        for tick in 59..120 {
            update_actors(&mut far, &far_char, tick);
        }
        assert!(far[0].pos.x.abs() < 1e-3);
    }

    #[test]
    fn test_ghost_only_moves_when_unobserved() {
        // Ghost at +z; character at origin facing +z looks right at it
        let watching = character_at(Vec3::ZERO, 0.0);
        let mut ghost = vec![Actor::ghost(Vec3::new(0.0, 0.0, 300.0))];
        update_actors(&mut ghost, &watching, 0);
        assert_eq!(ghost[0].pos.z, 300.0);

        let turned = character_at(Vec3::ZERO, std::f32::consts::PI);
        update_actors(&mut ghost, &turned, 1);
        assert!(ghost[0].pos.z < 300.0);
    }

    #[test]
    fn test_spark_keeps_orbit_radius() {
        let c = character_at(Vec3::new(1000.0, 0.0, 0.0), 0.0);
        let mut sparks = vec![Actor::spark(Vec3::new(10.0, 50.0, -20.0), 200.0)];
        for tick in 0..50 {
            update_actors(&mut sparks, &c, tick);
            let s = &sparks[0];
            let r = ((s.pos.x - s.home.x).powi(2) + (s.pos.z - s.home.z).powi(2)).sqrt();
            assert!((r - 200.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_crusher_cycle() {
        let mut crushers = vec![Actor::crusher(Vec3::new(0.0, 300.0, 0.0))];
        let away = character_at(Vec3::new(500.0, 0.0, 0.0), 0.0);
        update_actors(&mut crushers, &away, 0);
        assert_eq!(crushers[0].phase, CrusherPhase::Waiting);

        let under = character_at(Vec3::new(20.0, 0.0, -20.0), 0.0);
        update_actors(&mut crushers, &under, 1);
        assert_eq!(crushers[0].phase, CrusherPhase::Slamming);

        let mut tick = 2;
        while crushers[0].phase == CrusherPhase::Slamming {
            update_actors(&mut crushers, &away, tick);
            tick += 1;
            assert!(tick < 100);
        }
        assert_eq!(crushers[0].phase, CrusherPhase::Resting);
        assert!(crushers[0].pos.y <= 300.0 - CRUSHER_DROP + 5.0);

        while crushers[0].phase != CrusherPhase::Waiting {
            update_actors(&mut crushers, &away, tick);
            tick += 1;
            assert!(tick < 500);
        }
        assert!((crushers[0].pos.y - 300.0).abs() <= 1.0);
    }

    #[test]
    fn test_snapper_rises_then_sinks() {
        let c = character_at(Vec3::new(1000.0, 0.0, 0.0), 0.0);
        let mut snappers = vec![Actor::snapper(Vec3::ZERO)];
        for tick in 0..29 {
            update_actors(&mut snappers, &c, tick);
        }
        assert!(snappers[0].pos.y > 50.0);
        for tick in 29..120 {
            update_actors(&mut snappers, &c, tick);
        }
        assert!(snappers[0].pos.y < snappers[0].home.y);
    }

    #[test]
    fn test_inactive_actors_frozen() {
        let c = character_at(Vec3::new(0.0, 0.0, 100.0), 0.0);
        let mut actors = vec![Actor::walker(Vec3::ZERO)];
        actors[0].active = false;
        update_actors(&mut actors, &c, 0);
        assert_eq!(actors[0].pos, Vec3::ZERO);
    }

    #[test]
    fn test_coin_ring_radius() {
        let ring = Actor::coin_ring(Vec3::ZERO, 200.0, 8);
        assert_eq!(ring.len(), 8);
        for coin in &ring {
            let r = (coin.home.x.powi(2) + coin.home.z.powi(2)).sqrt();
            assert!((r - 200.0).abs() < 1e-3);
            assert_eq!(coin.reward, Reward::Coins(1));
        }
    }
}
