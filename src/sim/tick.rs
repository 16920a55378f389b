//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically: action machine,
//! floor effects, actors, particles, interaction, then health bookkeeping.

use super::action::{self, Action};
use super::actor::update_actors;
use super::geometry::SurfaceKind;
use super::input::InputFrame;
use super::interaction::interact;
use super::state::{GameEvent, GamePhase, Session};
use crate::consts::*;

/// Height above the floor still treated as standing on it
const ON_FLOOR_EPSILON: f32 = 1.0;

/// Advance the session by one logic tick and report what happened
pub fn tick(session: &mut Session, input: &InputFrame) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase != GamePhase::Playing {
        return events;
    }
    session.tick_count += 1;

    let Session {
        world,
        character,
        tick_count,
        ..
    } = &mut *session;

    let prev_action = character.action;
    action::dispatch(character, input, &world.surfaces);
    character.decay_timers();

    if prev_action == Action::GroundPound && character.action == Action::GroundPoundLand {
        world.particles.emit_smoke(character.pos, 6);
    }

    // Floor material effects
    let standing = character.pos.y - character.floor_height <= ON_FLOOR_EPSILON;
    let floor_kind = character
        .floor
        .and_then(|idx| world.surfaces.get(idx))
        .map(|s| s.kind)
        .filter(|_| standing);
    match floor_kind {
        Some(SurfaceKind::Lava)
            if !matches!(
                character.action,
                Action::LavaBoost | Action::Knockback | Action::Death
            ) =>
        {
            character.set_action(Action::LavaBoost);
            world.particles.emit_smoke(character.pos, 4);
            events.push(GameEvent::LavaBurn);
        }
        Some(SurfaceKind::DeathPlane) if character.action != Action::Death => {
            character.take_damage(HEALTH_PER_WEDGE);
            character.place(world.spawn, world.spawn_yaw);
            log::info!("Touched a death plane, respawning");
            events.push(GameEvent::FellOut);
        }
        _ => {}
    }

    update_actors(&mut world.actors, character, *tick_count);
    world.particles.update();
    events.extend(interact(
        character,
        &mut world.actors,
        &mut world.particles,
        world.level_id,
        input,
    ));

    if character.pos.y < FALL_OUT_Y {
        character.place(world.spawn, world.spawn_yaw);
        character.take_damage(HEALTH_PER_WEDGE);
        log::info!("Fell out of level {}, respawning", world.level_id);
        events.push(GameEvent::FellOut);
    }

    if character.is_dead() && character.action != Action::Death {
        character.lives = character.lives.saturating_sub(1);
        character.set_action(Action::Death);
        log::info!("Lost a life, {} left", character.lives);
        events.push(GameEvent::LifeLost {
            lives: character.lives,
        });
    }

    let death_done = character.action == Action::Death && character.action_timer >= DEATH_TICKS;
    let no_lives = character.lives == 0;
    let warp = events.iter().find_map(|e| match e {
        GameEvent::Warp { level } => Some(*level),
        _ => None,
    });

    if death_done {
        if no_lives {
            session.phase = GamePhase::GameOver;
            log::info!("Game over after {} ticks", session.tick_count);
            events.push(GameEvent::GameOver);
        } else {
            session.reload_level();
            events.push(GameEvent::LevelLoaded {
                level: session.world.level_id,
            });
        }
    } else if let Some(level) = warp {
        if session.warp(level) {
            events.push(GameEvent::LevelLoaded { level });
        }
    }

    events
}

/// Frame-skip clock: one logic tick every `display_hz / logic_hz` display frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicClock {
    frames_per_tick: u32,
    counter: u32,
}

impl Default for LogicClock {
    fn default() -> Self {
        Self::new(DISPLAY_HZ, LOGIC_HZ)
    }
}

impl LogicClock {
    pub fn new(display_hz: u32, logic_hz: u32) -> Self {
        let frames_per_tick = (display_hz / logic_hz.max(1)).max(1);
        Self {
            frames_per_tick,
            counter: 0,
        }
    }

    pub fn frames_per_tick(&self) -> u32 {
        self.frames_per_tick
    }

    /// Count one display frame; true when a logic tick is due
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        if self.counter >= self.frames_per_tick {
            self.counter = 0;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::sim::actor::Actor;
    use crate::sim::geometry::make_ground;
    use crate::sim::input::Buttons;
    use crate::sim::level::LevelData;
    use glam::Vec3;

    fn flat_level(id: u32, kind: SurfaceKind) -> LevelData {
        let mut level = LevelData::new(id, "flat");
        level.add_surfaces([make_ground(0.0, 0.0, 4000.0, 4000.0, 0.0, Rgb::new(90, 170, 90), kind)]);
        level
    }

    /// Session with the character already standing at the origin
    fn settled(level: LevelData) -> Session {
        let mut session = Session::new(level, 12345);
        tick(&mut session, &InputFrame::default());
        assert_eq!(session.character.action, Action::Idle);
        assert_eq!(session.character.pos.y, 0.0);
        session
    }

    #[test]
    fn test_jump_returns_to_ground() {
        let mut session = settled(flat_level(1, SurfaceKind::Default));

        // Press tick counts as tick 1
        tick(&mut session, &InputFrame::default().press(Buttons::JUMP));
        assert_eq!(session.character.action, Action::Jump);

        let expected = (-2.0 * JUMP_VEL / GRAVITY) as u32;
        for t in 2..expected {
            tick(&mut session, &InputFrame::default());
            assert!(session.character.pos.y > 0.0, "landed early at tick {t}");
        }
        tick(&mut session, &InputFrame::default());
        assert_eq!(session.character.pos.y, 0.0);
        assert_eq!(session.character.action, Action::Idle);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut session = settled(flat_level(1, SurfaceKind::Default));
        session.toggle_pause();
        let before = session.tick_count;
        assert!(tick(&mut session, &InputFrame::default().press(Buttons::JUMP)).is_empty());
        assert_eq!(session.tick_count, before);
        assert_eq!(session.character.action, Action::Idle);
    }

    #[test]
    fn test_coin_collected_once_across_ticks() {
        let mut level = flat_level(1, SurfaceKind::Default);
        level.add_actor(Actor::coin(Vec3::new(0.0, 0.0, 200.0)));
        let mut session = settled(level);

        // Walk through the coin and keep going
        let walk = InputFrame::from_stick(0.0, 1.0, 0.0);
        let mut collected = 0;
        for _ in 0..30 {
            collected += tick(&mut session, &walk)
                .iter()
                .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
                .count();
        }
        assert!(session.character.pos.z > 300.0);
        assert_eq!(collected, 1);
        assert_eq!(session.character.coins, 1);
        assert!(!session.world.actors[0].active);
    }

    #[test]
    fn test_fall_out_respawns_with_damage() {
        let level = LevelData::new(1, "void").with_spawn(Vec3::new(0.0, 100.0, 0.0), 0.0);
        let mut session = Session::new(level, 1);

        let mut fell = false;
        for _ in 0..200 {
            if tick(&mut session, &InputFrame::default()).contains(&GameEvent::FellOut) {
                fell = true;
                break;
            }
        }
        assert!(fell);
        assert_eq!(session.character.pos, Vec3::new(0.0, 100.0, 0.0));
        assert_eq!(session.character.health, MAX_HEALTH - HEALTH_PER_WEDGE);
        assert_eq!(session.character.action, Action::Freefall);
    }

    #[test]
    fn test_death_reloads_then_game_over() {
        let mut session = settled(flat_level(1, SurfaceKind::Default));
        session.character.health = 0;
        let events = tick(&mut session, &InputFrame::default());
        assert!(events.contains(&GameEvent::LifeLost { lives: START_LIVES - 1 }));
        assert_eq!(session.character.action, Action::Death);

        let mut reloaded = false;
        for _ in 0..=DEATH_TICKS {
            if tick(&mut session, &InputFrame::default()).contains(&GameEvent::LevelLoaded { level: 1 }) {
                reloaded = true;
                break;
            }
        }
        assert!(reloaded);
        assert_eq!(session.character.health, MAX_HEALTH);
        assert_eq!(session.character.lives, START_LIVES - 1);

        session.character.lives = 1;
        session.character.health = 0;
        tick(&mut session, &InputFrame::default());
        for _ in 0..=DEATH_TICKS {
            tick(&mut session, &InputFrame::default());
        }
        assert_eq!(session.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_lava_floor_boosts() {
        let mut session = Session::new(flat_level(1, SurfaceKind::Lava), 5);
        // Landing on lava switches to the boost right away
        let events = tick(&mut session, &InputFrame::default());
        assert!(events.contains(&GameEvent::LavaBurn));
        assert_eq!(session.character.action, Action::LavaBoost);

        tick(&mut session, &InputFrame::default());
        assert!(session.character.pos.y > 0.0);
        assert_eq!(session.character.health, MAX_HEALTH - HEALTH_PER_WEDGE);
    }

    #[test]
    fn test_pipe_warps_to_registered_level() {
        let mut start = flat_level(1, SurfaceKind::Default);
        start.add_actor(Actor::pipe(Vec3::new(20.0, 0.0, 0.0), 2));
        let mut session = settled(start);
        session.add_level(flat_level(2, SurfaceKind::Default).with_spawn(Vec3::new(100.0, 0.0, 0.0), 0.0));

        let events = tick(&mut session, &InputFrame::default().press(Buttons::JUMP));
        assert!(events.contains(&GameEvent::Warp { level: 2 }));
        assert!(events.contains(&GameEvent::LevelLoaded { level: 2 }));
        assert_eq!(session.world.level_id, 2);
        assert_eq!(session.character.pos, Vec3::new(100.0, 0.0, 0.0));
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs end identically
        let mut level = flat_level(1, SurfaceKind::Default);
        level.add_actor(Actor::walker(Vec3::new(300.0, 0.0, 300.0)));
        for coin in Actor::coin_ring(Vec3::ZERO, 150.0, 6) {
            level.add_actor(coin);
        }
        let mut a = Session::new(level.clone(), 99999);
        let mut b = Session::new(level, 99999);

        let inputs = [
            InputFrame::from_stick(0.0, 1.0, 0.0),
            InputFrame::from_stick(0.0, 1.0, 0.0).press(Buttons::JUMP),
            InputFrame::from_stick(1.0, 0.0, 0.0),
            InputFrame::default().press(Buttons::ATTACK),
            InputFrame::default(),
        ];
        for _ in 0..20 {
            for input in &inputs {
                assert_eq!(tick(&mut a, input), tick(&mut b, input));
            }
        }

        assert_eq!(a.tick_count, b.tick_count);
        assert_eq!(a.character.pos, b.character.pos);
        assert_eq!(a.character.action, b.character.action);
        assert_eq!(a.world.particles.len(), b.world.particles.len());
        for (pa, pb) in a.world.particles.iter().zip(b.world.particles.iter()) {
            assert_eq!(pa.pos, pb.pos);
        }
    }

    #[test]
    fn test_logic_clock_frame_skip() {
        let mut clock = LogicClock::default();
        assert_eq!(clock.frames_per_tick(), 2);
        let ticks: Vec<bool> = (0..6).map(|_| clock.advance()).collect();
        assert_eq!(ticks, vec![false, true, false, true, false, true]);

        let mut every = LogicClock::new(30, 60);
        assert!(every.advance() && every.advance());
    }
}
