//! Short-lived visual feedback particles
//!
//! Particles never affect gameplay, but they draw from a seeded RNG so a
//! replay renders identically.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::color::Rgb;

/// Default cap on live particles
pub const DEFAULT_MAX_PARTICLES: usize = 512;

const PARTICLE_GRAVITY: f32 = 0.3;
const SMOKE_LIFT: f32 = 0.1;
const SMOKE_GROWTH: f32 = 1.03;
const SMOKE_DRAG: f32 = 0.95;

const SPARKLE_COLORS: [Rgb; 4] = [
    Rgb::new(255, 255, 100),
    Rgb::new(255, 200, 50),
    Rgb::new(255, 255, 200),
    Rgb::new(255, 255, 255),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Normal,
    Sparkle,
    Smoke,
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: Rgb,
    /// Remaining lifetime in ticks
    pub life: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: Pcg32,
    max: usize,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            max: DEFAULT_MAX_PARTICLES,
        }
    }

    /// Set the live particle cap, dropping the oldest beyond it
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        self.enforce_cap();
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Burst of `count` particles flying out with horizontal spread `spread`
    pub fn emit(&mut self, pos: Vec3, count: usize, color: Rgb, spread: f32, life: u32) {
        let spread = spread.max(0.01);
        for _ in 0..count {
            let vel = Vec3::new(
                self.rng.random_range(-spread..=spread),
                self.rng.random_range(0.0..=spread * 1.5),
                self.rng.random_range(-spread..=spread),
            );
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life,
                size: 3.0,
                kind: ParticleKind::Normal,
            });
        }
        self.enforce_cap();
    }

    /// Golden sparkles (star pickups)
    pub fn emit_sparkle(&mut self, pos: Vec3, count: usize) {
        for _ in 0..count {
            let vel = Vec3::new(
                self.rng.random_range(-3.0..=3.0),
                self.rng.random_range(2.0..=8.0),
                self.rng.random_range(-3.0..=3.0),
            );
            let color = SPARKLE_COLORS[self.rng.random_range(0..SPARKLE_COLORS.len())];
            let life = self.rng.random_range(15..=30);
            let size = self.rng.random_range(2.0..=5.0);
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life,
                size,
                kind: ParticleKind::Sparkle,
            });
        }
        self.enforce_cap();
    }

    /// Grey puffs that rise, spread out and slow down (landings, ground pounds)
    pub fn emit_smoke(&mut self, pos: Vec3, count: usize) {
        for _ in 0..count {
            let vel = Vec3::new(
                self.rng.random_range(-1.0..=1.0),
                self.rng.random_range(1.0..=4.0),
                self.rng.random_range(-1.0..=1.0),
            );
            let grey = self.rng.random_range(180..=240u8);
            let life = self.rng.random_range(10..=25);
            let size = self.rng.random_range(3.0..=8.0);
            self.particles.push(Particle {
                pos,
                vel,
                color: Rgb::new(grey, grey, grey),
                life,
                size,
                kind: ParticleKind::Smoke,
            });
        }
        self.enforce_cap();
    }

    /// Advance every particle one tick and prune the expired ones
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            match p.kind {
                ParticleKind::Smoke => {
                    p.vel.y += SMOKE_LIFT;
                    p.vel.x *= SMOKE_DRAG;
                    p.vel.z *= SMOKE_DRAG;
                    p.size *= SMOKE_GROWTH;
                }
                ParticleKind::Normal | ParticleKind::Sparkle => p.vel.y -= PARTICLE_GRAVITY,
            }
            p.life = p.life.saturating_sub(1);
        }
        self.particles.retain(|p| p.life > 0);
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.max {
            let excess = self.particles.len() - self.max;
            self.particles.drain(..excess);
        }
    }
}
