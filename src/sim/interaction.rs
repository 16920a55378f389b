//! Character/actor contact resolution
//!
//! Runs after actors move each tick. All damage goes through
//! `CharacterState::take_damage`, and knockback only starts when that call
//! actually applied damage.

use super::action::Action;
use super::actor::{Actor, ActorKind, CrusherPhase, Reward};
use super::input::{Buttons, InputFrame};
use super::particles::ParticleSystem;
use super::state::{CharacterState, GameEvent};
use crate::color::{Rgb, palette};
use crate::consts::{BOSS_BOUNCE_VEL, CHARACTER_RADIUS, COIN_HEAL, HEALTH_PER_WEDGE, STOMP_BOUNCE_VEL};
use crate::yaw_to_dir;

/// Downward speed the character needs for a stomp
const STOMP_MIN_FALL: f32 = -5.0;
/// Push applied by a shover
const SHOVE_DISTANCE: f32 = 20.0;
const SHOVE_SPEED: f32 = 15.0;

/// Resolve contact between the character and every live actor.
///
/// A pipe warp ends resolution immediately; the caller performs the warp.
pub fn interact(
    character: &mut CharacterState,
    actors: &mut [Actor],
    particles: &mut ParticleSystem,
    level_id: u32,
    input: &InputFrame,
) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if character.action == Action::Death {
        return events;
    }

    for actor in actors.iter_mut() {
        if !actor.active || actor.collected {
            continue;
        }
        let offset = character.pos - actor.pos;
        let dist = offset.length();
        if dist > actor.range + CHARACTER_RADIUS {
            continue;
        }

        match actor.kind {
            ActorKind::Coin | ActorKind::RedCoin | ActorKind::BlueCoin | ActorKind::ExtraLife => {
                collect(character, actor, particles, &mut events);
            }
            ActorKind::Star => {
                let Reward::Star(id) = actor.reward else { continue };
                if character.has_star(level_id, id) {
                    continue;
                }
                actor.active = false;
                actor.collected = true;
                character.grant_star(level_id, id);
                character.stop_horizontal();
                character.set_action(Action::StarDance);
                particles.emit_sparkle(actor.pos, 20);
                log::debug!("Star {id} collected in level {level_id}");
                events.push(GameEvent::StarCollected { level: level_id, star: id });
            }
            ActorKind::Pipe => {
                if let Some(level) = actor.warp.filter(|_| input.pressed(Buttons::JUMP)) {
                    log::debug!("Pipe warp to level {level}");
                    events.push(GameEvent::Warp { level });
                    return events;
                }
            }
            ActorKind::Walker | ActorKind::Snapper => {
                if is_stomp(character, actor, 20.0) {
                    bounce(character, STOMP_BOUNCE_VEL);
                    defeat(character, actor, particles, &mut events);
                } else if character.action.defeats_enemies() {
                    defeat(character, actor, particles, &mut events);
                } else {
                    hurt(character, actor.damage, particles, &mut events);
                }
            }
            ActorKind::Shover => {
                if dist < actor.range {
                    let away = offset.with_y(0.0).normalize_or(yaw_to_dir(actor.yaw));
                    character.pos += away * SHOVE_DISTANCE;
                    character.forward_speed = SHOVE_SPEED;
                }
            }
            ActorKind::Ghost => {
                // Hits land only from behind the ghost
                let ghost_facing = yaw_to_dir(actor.yaw);
                let from_behind = ghost_facing.x * offset.x + ghost_facing.z * offset.z < 0.0;
                let hitting = character.action.is_attack()
                    || matches!(character.action, Action::GroundPound | Action::GroundPoundLand);
                if from_behind && hitting {
                    if actor.flash == 0 {
                        damage_actor(actor, 10, particles, &mut events);
                    }
                } else if !from_behind && dist < actor.range {
                    hurt(character, actor.damage, particles, &mut events);
                }
            }
            ActorKind::Spark | ActorKind::Lunger => {
                hurt(character, actor.damage, particles, &mut events);
            }
            ActorKind::Crusher => {
                if actor.phase == CrusherPhase::Slamming && dist < actor.range {
                    hurt(character, actor.damage, particles, &mut events);
                }
            }
            ActorKind::Boss => {
                if is_stomp(character, actor, 30.0) {
                    bounce(character, BOSS_BOUNCE_VEL);
                    if actor.flash == 0 {
                        damage_actor(actor, 15, particles, &mut events);
                    }
                } else if character.action.is_attack() {
                    if actor.flash == 0 {
                        damage_actor(actor, 10, particles, &mut events);
                    }
                } else {
                    hurt(character, actor.damage, particles, &mut events);
                }
            }
            ActorKind::Tree => {}
        }
    }

    events
}

fn is_stomp(character: &CharacterState, actor: &Actor, clearance: f32) -> bool {
    character.vel.y < STOMP_MIN_FALL && character.pos.y > actor.pos.y + clearance
}

/// Stomp rebound; a ground pound gives way to a plain fall
fn bounce(character: &mut CharacterState, vel_y: f32) {
    character.vel.y = vel_y;
    if character.action == Action::GroundPound {
        character.set_action(Action::Freefall);
    }
}

fn collect(character: &mut CharacterState, actor: &mut Actor, particles: &mut ParticleSystem, events: &mut Vec<GameEvent>) {
    actor.active = false;
    actor.collected = true;
    match actor.reward {
        Reward::Coins(value) => {
            character.coins += value;
            character.heal(COIN_HEAL.saturating_mul(value.min(u32::from(u16::MAX)) as u16));
            particles.emit(actor.pos, 8, actor.color, 4.0, 15);
            events.push(GameEvent::CoinCollected { value });
        }
        Reward::Health(amount) => {
            character.heal(amount);
            particles.emit(actor.pos, 8, actor.color, 4.0, 15);
        }
        Reward::Life => {
            character.lives += 1;
            particles.emit(actor.pos, 10, Rgb::new(0, 255, 0), 3.0, 15);
            events.push(GameEvent::ExtraLife);
        }
        Reward::Star(_) | Reward::None => {}
    }
}

/// Knock out an ordinary enemy; it drops one coin
fn defeat(character: &mut CharacterState, actor: &mut Actor, particles: &mut ParticleSystem, events: &mut Vec<GameEvent>) {
    actor.active = false;
    character.coins += 1;
    particles.emit(actor.pos, 10, actor.color, 4.0, 15);
    log::debug!("{:?} defeated", actor.kind);
    events.push(GameEvent::EnemyDefeated { kind: actor.kind });
}

/// Take one hit point from a multi-hit actor
fn damage_actor(actor: &mut Actor, flash: u32, particles: &mut ParticleSystem, events: &mut Vec<GameEvent>) {
    actor.hp -= 1;
    actor.flash = flash;
    if actor.kind == ActorKind::Boss {
        events.push(GameEvent::BossHit { hp: actor.hp });
    }
    if actor.hp <= 0 {
        actor.active = false;
        let burst = if actor.kind == ActorKind::Boss { 25 } else { 15 };
        particles.emit(actor.pos, burst, actor.color, 6.0, 25);
        events.push(GameEvent::EnemyDefeated { kind: actor.kind });
    }
}

fn hurt(character: &mut CharacterState, amount: u16, particles: &mut ParticleSystem, events: &mut Vec<GameEvent>) {
    let amount = amount.max(HEALTH_PER_WEDGE);
    if character.take_damage(amount) {
        character.set_action(Action::Knockback);
        particles.emit(character.pos, 5, palette::DAMAGE, 3.0, 10);
        events.push(GameEvent::CharacterHurt { amount });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{INVULNERABLE_TICKS, MAX_HEALTH};
    use glam::Vec3;

    fn setup(actor: Actor) -> (CharacterState, Vec<Actor>, ParticleSystem) {
        (CharacterState::new(Vec3::ZERO, 0.0), vec![actor], ParticleSystem::new(7))
    }

    #[test]
    fn test_coin_collected_once() {
        let (mut c, mut actors, mut ps) = setup(Actor::blue_coin(Vec3::new(0.0, -30.0, 0.0)));
        c.health = 0x500;
        let none = InputFrame::default();

        let events = interact(&mut c, &mut actors, &mut ps, 1, &none);
        assert_eq!(events, vec![GameEvent::CoinCollected { value: 5 }]);
        for _ in 0..5 {
            assert!(interact(&mut c, &mut actors, &mut ps, 1, &none).is_empty());
        }
        assert_eq!(c.coins, 5);
        assert_eq!(c.health, 0x500 + 5 * COIN_HEAL);
        assert!(!actors[0].active);
        assert!(actors[0].collected);
    }

    #[test]
    fn test_out_of_range_ignored() {
        let (mut c, mut actors, mut ps) = setup(Actor::coin(Vec3::new(500.0, 0.0, 0.0)));
        assert!(interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default()).is_empty());
        assert!(actors[0].active);
    }

    #[test]
    fn test_star_grants_once_and_dances() {
        let (mut c, mut actors, mut ps) = setup(Actor::star(Vec3::new(0.0, -50.0, 0.0), 3));
        let events = interact(&mut c, &mut actors, &mut ps, 2, &InputFrame::default());
        assert_eq!(events, vec![GameEvent::StarCollected { level: 2, star: 3 }]);
        assert_eq!(c.action, Action::StarDance);
        assert_eq!(c.stars, 1);
        assert!(ps.len() >= 20);
    }

    #[test]
    fn test_owned_star_not_regranted() {
        let (mut c, mut actors, mut ps) = setup(Actor::star(Vec3::new(0.0, -50.0, 0.0), 3));
        c.grant_star(2, 3);
        assert!(interact(&mut c, &mut actors, &mut ps, 2, &InputFrame::default()).is_empty());
        assert_eq!(c.stars, 1);
        assert_ne!(c.action, Action::StarDance);
    }

    #[test]
    fn test_stomp_defeats_walker() {
        let (mut c, mut actors, mut ps) = setup(Actor::walker(Vec3::new(0.0, -40.0, 0.0)));
        c.vel.y = -20.0;
        let events = interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(events, vec![GameEvent::EnemyDefeated { kind: ActorKind::Walker }]);
        assert_eq!(c.vel.y, STOMP_BOUNCE_VEL);
        assert_eq!(c.coins, 1);
        assert_eq!(c.health, MAX_HEALTH);
    }

    #[test]
    fn test_ground_pound_stomp_bounces_then_lands() {
        use crate::sim::action::dispatch;
        use crate::sim::geometry::{SurfaceKind, make_ground};

        let floor = make_ground(0.0, 0.0, 4000.0, 4000.0, 0.0, Rgb::new(90, 90, 90), SurfaceKind::Default);
        let surfaces: Vec<_> = floor.into_iter().collect();
        let (mut c, mut actors, mut ps) = setup(Actor::walker(Vec3::ZERO));
        c.pos.y = 120.0;
        c.set_action(Action::GroundPound);
        c.action_state = 1;
        c.vel.y = -60.0;

        let none = InputFrame::default();
        let mut defeated = 0;
        for _ in 0..200 {
            dispatch(&mut c, &none, &surfaces);
            defeated += interact(&mut c, &mut actors, &mut ps, 1, &none).len();
        }
        assert_eq!(defeated, 1);
        assert!(!actors[0].active);
        assert_eq!(c.pos.y, 0.0);
        assert!(!c.action.is_airborne(), "still in {:?}", c.action);
    }

    #[test]
    fn test_attack_defeats_walker() {
        let (mut c, mut actors, mut ps) = setup(Actor::walker(Vec3::new(30.0, 0.0, 0.0)));
        c.set_action(Action::Kick);
        interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert!(!actors[0].active);
        assert_eq!(c.health, MAX_HEALTH);
    }

    #[test]
    fn test_walker_contact_hurts_then_invulnerable() {
        let (mut c, mut actors, mut ps) = setup(Actor::walker(Vec3::new(30.0, 0.0, 0.0)));
        c.set_action(Action::Walking);
        let events = interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(events, vec![GameEvent::CharacterHurt { amount: HEALTH_PER_WEDGE }]);
        assert_eq!(c.action, Action::Knockback);
        assert_eq!(c.invuln_timer, INVULNERABLE_TICKS);

        // Still touching, still invulnerable: no damage and no new knockback
        c.set_action(Action::Walking);
        assert!(interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default()).is_empty());
        assert_eq!(c.health, MAX_HEALTH - HEALTH_PER_WEDGE);
        assert_eq!(c.action, Action::Walking);
        assert!(actors[0].active);
    }

    #[test]
    fn test_pipe_warps_on_jump_press_only() {
        let (mut c, mut actors, mut ps) = setup(Actor::pipe(Vec3::new(20.0, 0.0, 0.0), 9));
        assert!(interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default()).is_empty());
        let jump = InputFrame::default().press(Buttons::JUMP);
        assert_eq!(
            interact(&mut c, &mut actors, &mut ps, 1, &jump),
            vec![GameEvent::Warp { level: 9 }]
        );
    }

    #[test]
    fn test_crusher_hurts_only_while_slamming() {
        let (mut c, mut actors, mut ps) = setup(Actor::crusher(Vec3::new(0.0, 40.0, 0.0)));
        assert!(interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default()).is_empty());
        actors[0].phase = CrusherPhase::Slamming;
        let events = interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(events, vec![GameEvent::CharacterHurt { amount: 2 * HEALTH_PER_WEDGE }]);
    }

    #[test]
    fn test_boss_stomps_gated_by_flash() {
        let (mut c, mut actors, mut ps) = setup(Actor::boss(Vec3::new(0.0, -100.0, 0.0), 3));
        c.vel.y = -30.0;
        let events = interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(events, vec![GameEvent::BossHit { hp: 2 }]);
        assert_eq!(c.vel.y, BOSS_BOUNCE_VEL);

        // Flashing: a second stomp bounces but does no damage
        c.vel.y = -30.0;
        assert!(interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default()).is_empty());
        assert_eq!(actors[0].hp, 2);

        actors[0].flash = 0;
        actors[0].hp = 1;
        c.vel.y = -30.0;
        let events = interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(
            events,
            vec![GameEvent::BossHit { hp: 0 }, GameEvent::EnemyDefeated { kind: ActorKind::Boss }]
        );
        assert!(!actors[0].active);
    }

    #[test]
    fn test_ghost_hit_from_behind() {
        // Ghost faces +z; character behind it at -z
        let (mut c, mut actors, mut ps) = setup(Actor::ghost(Vec3::new(0.0, -30.0, 40.0)));
        actors[0].hp = 2;
        c.set_action(Action::Punch);
        interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(actors[0].hp, 1);
        assert_eq!(c.health, MAX_HEALTH);

        // In front of it: hurts instead
        let (mut c, mut actors, mut ps) = setup(Actor::ghost(Vec3::new(0.0, -30.0, -40.0)));
        c.set_action(Action::Punch);
        interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(actors[0].hp, 1);
        assert!(c.health < MAX_HEALTH);
    }

    #[test]
    fn test_shover_pushes_without_damage() {
        let (mut c, mut actors, mut ps) = setup(Actor::shover(Vec3::new(-30.0, 0.0, 0.0)));
        interact(&mut c, &mut actors, &mut ps, 1, &InputFrame::default());
        assert_eq!(c.pos.x, SHOVE_DISTANCE);
        assert_eq!(c.health, MAX_HEALTH);
    }
}
