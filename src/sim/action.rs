//! Character action state machine
//!
//! Every `Action` owns one handler. A handler runs once per logic tick: it
//! may launch the action on its first tick (`action_timer == 0`), integrates
//! with a ground or air step, then applies its transitions. The dispatcher
//! advances `action_timer` when the handler did not switch actions.

use serde::{Deserialize, Serialize};

use super::geometry::{Surface, SurfaceKind};
use super::input::{Buttons, InputFrame};
use super::physics::{StepResult, air_step, ground_step, set_forward_speed, update_air};
use super::state::CharacterState;
use crate::consts::*;
use crate::{approach_angle, approach_f32, normalize_angle};

/// Handler signature shared by every action
pub type ActionFn = fn(&mut CharacterState, &InputFrame, &[Surface]);

/// Character actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    #[default]
    Idle,
    Walking,
    Decelerating,
    Crouching,
    Punch,
    Punch2,
    Kick,
    Jump,
    DoubleJump,
    TripleJump,
    Backflip,
    SideFlip,
    LongJump,
    WallKick,
    Freefall,
    Dive,
    BellySlide,
    SlideKick,
    SlideKickSlide,
    GroundPound,
    GroundPoundLand,
    Knockback,
    LavaBoost,
    StarDance,
    Death,
}

impl Action {
    pub const ALL: [Action; 25] = [
        Action::Idle,
        Action::Walking,
        Action::Decelerating,
        Action::Crouching,
        Action::Punch,
        Action::Punch2,
        Action::Kick,
        Action::Jump,
        Action::DoubleJump,
        Action::TripleJump,
        Action::Backflip,
        Action::SideFlip,
        Action::LongJump,
        Action::WallKick,
        Action::Freefall,
        Action::Dive,
        Action::BellySlide,
        Action::SlideKick,
        Action::SlideKickSlide,
        Action::GroundPound,
        Action::GroundPoundLand,
        Action::Knockback,
        Action::LavaBoost,
        Action::StarDance,
        Action::Death,
    ];

    /// Opaque numeric tag
    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Action> {
        Self::ALL.get(usize::from(id)).copied()
    }

    /// Punches, kicks and slide kicks
    pub fn is_attack(self) -> bool {
        matches!(
            self,
            Action::Punch | Action::Punch2 | Action::Kick | Action::SlideKick | Action::SlideKickSlide
        )
    }

    /// Actions that knock out ordinary enemies on contact
    pub fn defeats_enemies(self) -> bool {
        self.is_attack() || matches!(self, Action::Dive | Action::GroundPoundLand)
    }

    pub fn is_airborne(self) -> bool {
        matches!(
            self,
            Action::Jump
                | Action::DoubleJump
                | Action::TripleJump
                | Action::Backflip
                | Action::SideFlip
                | Action::LongJump
                | Action::WallKick
                | Action::Freefall
                | Action::Dive
                | Action::SlideKick
                | Action::GroundPound
                | Action::Knockback
                | Action::LavaBoost
        )
    }

    /// Low-profile poses (crouch, slides)
    pub fn is_crouched(self) -> bool {
        matches!(self, Action::Crouching | Action::BellySlide | Action::SlideKickSlide)
    }

    pub fn handler(self) -> ActionFn {
        match self {
            Action::Idle => act_idle,
            Action::Walking => act_walking,
            Action::Decelerating => act_decelerating,
            Action::Crouching => act_crouching,
            Action::Punch => act_punch,
            Action::Punch2 => act_punch2,
            Action::Kick => act_kick,
            Action::Jump => act_jump,
            Action::DoubleJump => act_double_jump,
            Action::TripleJump => act_triple_jump,
            Action::Backflip => act_backflip,
            Action::SideFlip => act_side_flip,
            Action::LongJump => act_long_jump,
            Action::WallKick => act_wall_kick,
            Action::Freefall => act_freefall,
            Action::Dive => act_dive,
            Action::BellySlide => act_belly_slide,
            Action::SlideKick => act_slide_kick,
            Action::SlideKickSlide => act_slide_kick_slide,
            Action::GroundPound => act_ground_pound,
            Action::GroundPoundLand => act_ground_pound_land,
            Action::Knockback => act_knockback,
            Action::LavaBoost => act_lava_boost,
            Action::StarDance => act_star_dance,
            Action::Death => act_death,
        }
    }
}

/// Run the current action's handler for one tick
pub fn dispatch(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    c.intended_yaw = input.intended_yaw;
    c.intended_mag = input.stick_mag * MAX_WALK_SPEED;

    let before = c.action;
    (before.handler())(c, input, surfaces);
    if c.action == before {
        c.action_timer = c.action_timer.saturating_add(1);
    }
}

/// Dispatch from a raw action id; unknown ids fall back to `Idle`
pub fn dispatch_raw(raw: u8, c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    match Action::from_id(raw) {
        Some(action) => c.action = action,
        None => {
            log::warn!("Unknown action id {raw:#04x}, falling back to Idle");
            c.set_action(Action::Idle);
        }
    }
    dispatch(c, input, surfaces);
}

const PUNCH_LUNGE_TICKS: u32 = 4;
const PUNCH_COMBO_OPEN: u32 = 8;
const PUNCH_END: u32 = 20;
const KICK_LUNGE_TICKS: u32 = 7;
const KICK_END: u32 = 25;

fn floor_kind(c: &CharacterState, surfaces: &[Surface]) -> SurfaceKind {
    c.floor
        .and_then(|idx| surfaces.get(idx))
        .map(|s| s.kind)
        .unwrap_or_default()
}

/// Grounded tick of the jump-chain window; the chain breaks once it runs out
fn tick_jump_chain(c: &mut CharacterState) {
    if c.jump_timer > 0 {
        c.jump_timer -= 1;
    } else {
        c.jump_count = 0;
    }
}

/// Ground step for handlers that fall into Freefall when the floor drops away.
///
/// Every grounded tick runs the jump-chain window down.
fn ground_or_fall(c: &mut CharacterState, surfaces: &[Surface]) -> bool {
    if ground_step(c, surfaces) == StepResult::Air {
        c.set_action(Action::Freefall);
        return false;
    }
    tick_jump_chain(c);
    true
}

fn land(c: &mut CharacterState, input: &InputFrame) {
    c.set_action(if input.has_stick() { Action::Walking } else { Action::Idle });
}

fn begin_jump(c: &mut CharacterState) {
    c.jump_count = 1;
    c.jump_timer = 0;
    c.set_action(Action::Jump);
}

/// Jump press while moving: long jump, or the next jump in the chain
fn begin_ground_jump(c: &mut CharacterState, input: &InputFrame) {
    if c.forward_speed > LONG_JUMP_MIN_SPEED && input.held(Buttons::CROUCH) {
        c.set_action(Action::LongJump);
        return;
    }
    if c.jump_timer == 0 {
        c.jump_count = 0;
    }
    c.jump_timer = 0;
    c.jump_count += 1;

    if c.jump_count >= 3 && c.forward_speed > TRIPLE_JUMP_MIN_SPEED {
        c.jump_count = 0;
        c.set_action(Action::TripleJump);
    } else if c.jump_count >= 2 {
        c.set_action(Action::DoubleJump);
    } else {
        c.set_action(Action::Jump);
    }
}

fn act_idle(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    c.stop_horizontal();

    if input.pressed(Buttons::JUMP) {
        return begin_jump(c);
    }
    if input.pressed(Buttons::CROUCH) {
        return c.set_action(Action::Crouching);
    }
    if input.pressed(Buttons::ATTACK) {
        c.combo = 0;
        return c.set_action(Action::Punch);
    }
    if input.has_stick() {
        return c.set_action(Action::Walking);
    }
    ground_or_fall(c, surfaces);
}

fn act_walking(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    c.bob_phase += c.forward_speed * 0.15;

    if input.pressed(Buttons::JUMP) {
        return begin_ground_jump(c, input);
    }
    if input.pressed(Buttons::ATTACK) {
        if c.forward_speed > SLIDE_KICK_MIN_SPEED {
            return c.set_action(Action::SlideKick);
        }
        c.combo = 0;
        return c.set_action(Action::Punch);
    }
    if !input.has_stick() {
        return c.set_action(Action::Decelerating);
    }

    let kind = floor_kind(c, surfaces);
    let traction = kind.traction();
    c.yaw = approach_angle(c.yaw, input.intended_yaw, TURN_RATE);
    let target = input.stick_mag * MAX_WALK_SPEED * kind.speed_scale();
    let speed = if c.forward_speed < target {
        (c.forward_speed + WALK_ACCEL * traction).min(target)
    } else {
        (c.forward_speed - WALK_DECEL * traction).max(target)
    };
    set_forward_speed(c, speed);
    ground_or_fall(c, surfaces);
}

fn act_decelerating(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if input.pressed(Buttons::JUMP) {
        if c.forward_speed > SIDE_FLIP_MIN_SPEED {
            return c.set_action(Action::SideFlip);
        }
        return begin_jump(c);
    }
    if input.pressed(Buttons::ATTACK) {
        c.combo = 0;
        return c.set_action(Action::Punch);
    }
    if input.has_stick() {
        return c.set_action(Action::Walking);
    }

    let traction = floor_kind(c, surfaces).traction();
    let speed = approach_f32(c.forward_speed, 0.0, GROUND_FRICTION * traction);
    set_forward_speed(c, speed);
    if ground_or_fall(c, surfaces) && speed.abs() < 0.5 {
        c.set_action(Action::Idle);
    }
}

fn act_crouching(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    c.stop_horizontal();
    if !input.held(Buttons::CROUCH) {
        return c.set_action(Action::Idle);
    }
    if input.pressed(Buttons::JUMP) {
        return c.set_action(Action::Backflip);
    }
    ground_or_fall(c, surfaces);
}

/// Shared body of the three combo hits
fn attack_lunge(c: &mut CharacterState, surfaces: &[Surface], lunge: f32, lunge_ticks: u32, decel: f32) {
    let speed = if c.action_timer < lunge_ticks {
        lunge
    } else {
        approach_f32(c.forward_speed, 0.0, decel)
    };
    set_forward_speed(c, speed);
    ground_or_fall(c, surfaces);
}

fn act_punch(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer >= PUNCH_COMBO_OPEN {
        if input.pressed(Buttons::ATTACK) {
            c.combo = 1;
            return c.set_action(Action::Punch2);
        }
        if c.action_timer >= PUNCH_END {
            c.combo = 0;
            return c.set_action(Action::Idle);
        }
    }
    attack_lunge(c, surfaces, 8.0, PUNCH_LUNGE_TICKS, 2.0);
}

fn act_punch2(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer >= PUNCH_COMBO_OPEN {
        if input.pressed(Buttons::ATTACK) {
            c.combo = 2;
            return c.set_action(Action::Kick);
        }
        if c.action_timer >= PUNCH_END {
            c.combo = 0;
            return c.set_action(Action::Idle);
        }
    }
    attack_lunge(c, surfaces, 10.0, PUNCH_LUNGE_TICKS, 2.0);
}

fn act_kick(c: &mut CharacterState, _input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer >= KICK_END {
        c.combo = 0;
        return c.set_action(Action::Idle);
    }
    attack_lunge(c, surfaces, 15.0, KICK_LUNGE_TICKS, 1.5);
}

/// Gravity, drag and a quarter-stepped move; returns the step outcome
fn air_move(c: &mut CharacterState, surfaces: &[Surface]) -> StepResult {
    update_air(c);
    air_step(c, surfaces)
}

/// Jump and double jump share everything but the launch
fn jump_body(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface], launch: f32) {
    if c.action_timer == 0 {
        c.vel.y = launch;
        c.peak_y = c.pos.y;
    }
    if input.pressed(Buttons::CROUCH) {
        return c.set_action(Action::GroundPound);
    }
    if input.pressed(Buttons::ATTACK) {
        return c.set_action(Action::Dive);
    }
    match air_move(c, surfaces) {
        StepResult::Landed => {
            land(c, input);
            c.jump_timer = JUMP_CHAIN_WINDOW;
        }
        StepResult::HitWall => {
            c.wall_kick_timer = WALL_KICK_WINDOW;
            c.set_action(Action::Freefall);
        }
        StepResult::Ground | StepResult::Air => {}
    }
}

fn act_jump(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    let launch = JUMP_VEL + c.forward_speed.abs() * JUMP_SPEED_BONUS;
    jump_body(c, input, surfaces, launch);
}

fn act_double_jump(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    let launch = DOUBLE_JUMP_VEL + c.forward_speed.abs() * DOUBLE_JUMP_SPEED_BONUS;
    jump_body(c, input, surfaces, launch);
}

fn act_triple_jump(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = TRIPLE_JUMP_VEL;
        c.peak_y = c.pos.y;
    }
    if input.pressed(Buttons::CROUCH) {
        return c.set_action(Action::GroundPound);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_backflip(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = BACKFLIP_VEL;
        set_forward_speed(c, BACKFLIP_SPEED);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_side_flip(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = SIDE_FLIP_VEL;
        c.yaw = normalize_angle(c.yaw + std::f32::consts::PI);
        set_forward_speed(c, SIDE_FLIP_SPEED);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_long_jump(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = LONG_JUMP_VEL;
        let speed = (c.forward_speed * LONG_JUMP_SPEED_SCALE).min(LONG_JUMP_MAX_SPEED);
        set_forward_speed(c, speed);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_wall_kick(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = WALL_KICK_VEL;
    }
    match air_move(c, surfaces) {
        StepResult::Landed => land(c, input),
        StepResult::HitWall => {
            c.wall_kick_timer = WALL_KICK_WINDOW;
            c.set_action(Action::Freefall);
        }
        StepResult::Ground | StepResult::Air => {}
    }
}

fn act_freefall(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if input.pressed(Buttons::JUMP) && c.wall_kick_timer > 0 {
        c.wall_kick_timer = 0;
        c.yaw = normalize_angle(c.yaw + std::f32::consts::PI);
        set_forward_speed(c, WALL_KICK_SPEED);
        return c.set_action(Action::WallKick);
    }
    if input.pressed(Buttons::CROUCH) {
        return c.set_action(Action::GroundPound);
    }
    if input.pressed(Buttons::ATTACK) {
        return c.set_action(Action::Dive);
    }

    match air_move(c, surfaces) {
        StepResult::Landed => return land(c, input),
        StepResult::HitWall => c.wall_kick_timer = WALL_KICK_WINDOW,
        StepResult::Ground | StepResult::Air => {}
    }
    c.wall_kick_timer = c.wall_kick_timer.saturating_sub(1);
}

fn act_dive(c: &mut CharacterState, _input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = DIVE_VEL;
        set_forward_speed(c, c.forward_speed.max(DIVE_MIN_SPEED));
    }
    if air_move(c, surfaces) == StepResult::Landed {
        c.set_action(Action::BellySlide);
    }
}

/// Slide to a stop; a jump press hops out
fn slide_body(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface], friction: f32) {
    if input.pressed(Buttons::JUMP) {
        return begin_jump(c);
    }
    let traction = floor_kind(c, surfaces).traction();
    let speed = approach_f32(c.forward_speed, 0.0, friction * traction);
    set_forward_speed(c, speed);
    if ground_or_fall(c, surfaces) && speed.abs() < 1.0 {
        c.set_action(Action::Idle);
    }
}

fn act_belly_slide(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    slide_body(c, input, surfaces, 1.0);
}

fn act_slide_kick(c: &mut CharacterState, _input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = SLIDE_KICK_VEL;
        set_forward_speed(c, c.forward_speed.max(SLIDE_KICK_MIN_LAUNCH));
    }
    if air_move(c, surfaces) == StepResult::Landed {
        c.set_action(Action::SlideKickSlide);
    }
}

fn act_slide_kick_slide(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    slide_body(c, input, surfaces, 0.8);
}

fn act_ground_pound(c: &mut CharacterState, _input: &InputFrame, surfaces: &[Surface]) {
    if c.action_state == 0 {
        // Hover in place before the drop
        c.stop_horizontal();
        c.vel.y = 0.0;
        if c.action_timer >= GROUND_POUND_HOVER {
            c.action_state = 1;
            c.vel.y = GROUND_POUND_FALL_VEL;
        }
        return;
    }
    // A stomp bounce pushes vel.y up; gravity pulls it back to the drop speed
    c.vel.y = (c.vel.y + GRAVITY).max(GROUND_POUND_FALL_VEL);
    if air_step(c, surfaces) == StepResult::Landed {
        c.vel.y = 0.0;
        c.set_action(Action::GroundPoundLand);
    }
}

fn act_ground_pound_land(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    c.stop_horizontal();
    if c.action_timer >= GROUND_POUND_LAND_LOCK {
        if input.pressed(Buttons::JUMP) {
            return begin_jump(c);
        }
        if input.has_stick() {
            return c.set_action(Action::Walking);
        }
        if c.action_timer >= GROUND_POUND_LAND_END {
            return c.set_action(Action::Idle);
        }
    }
    ground_or_fall(c, surfaces);
}

fn act_knockback(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = KNOCKBACK_VEL;
        set_forward_speed(c, KNOCKBACK_SPEED);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_lava_boost(c: &mut CharacterState, input: &InputFrame, surfaces: &[Surface]) {
    if c.action_timer == 0 {
        c.vel.y = LAVA_BOOST_VEL;
        c.stop_horizontal();
        c.take_damage(HEALTH_PER_WEDGE);
    }
    if air_move(c, surfaces) == StepResult::Landed {
        land(c, input);
    }
}

fn act_star_dance(c: &mut CharacterState, _input: &InputFrame, _surfaces: &[Surface]) {
    c.stop_horizontal();
    c.vel.y = 0.0;
    if c.action_timer >= STAR_DANCE_TICKS {
        c.set_action(Action::Idle);
    }
}

fn act_death(c: &mut CharacterState, _input: &InputFrame, surfaces: &[Surface]) {
    c.stop_horizontal();
    c.vel.y = (c.vel.y + GRAVITY).max(MAX_FALL_SPEED);
    if c.floor.is_some() && c.pos.y <= c.floor_height {
        c.vel.y = 0.0;
        return;
    }
    if air_step(c, surfaces) == StepResult::Landed {
        c.vel.y = 0.0;
    }
}
