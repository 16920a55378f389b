//! Box meshes for actors, the character model, shadows and particles

use glam::{Quat, Vec3};

use super::camera::Camera;
use super::pipeline::Face;
use crate::color::{Rgb, palette};
use crate::consts::{CHARACTER_RADIUS, FLOOR_SENTINEL};
use crate::sim::{Actor, ActorKind, CharacterState, Particle};

/// Shade factors so flat-filled boxes read as solid
const TOP_SHADE: f32 = 1.12;
const FRONT_SHADE: f32 = 0.88;
const BACK_SHADE: f32 = 0.82;
const SIDE_SHADE: f32 = 0.78;
const BOTTOM_SHADE: f32 = 0.6;

const TRUNK_WIDTH: f32 = 25.0;
const CANOPY_SIZE: f32 = 100.0;
const PIPE_WIDTH: f32 = 65.0;
const PIPE_RIM_WIDTH: f32 = 75.0;
const PIPE_RIM_HEIGHT: f32 = 10.0;

/// Axis box between `min` and `max`, all six faces
pub fn box_faces(min: Vec3, max: Vec3, color: Rgb) -> Vec<Face> {
    oriented_box(min, max, color, Quat::IDENTITY, Vec3::ZERO)
}

/// Box given in a local frame, rotated by `rot` and moved to `origin`
fn oriented_box(min: Vec3, max: Vec3, color: Rgb, rot: Quat, origin: Vec3) -> Vec<Face> {
    let corner = |x: f32, y: f32, z: f32| origin + rot * Vec3::new(x, y, z);
    let (a, b) = (min, max);
    let sides = [
        (
            [corner(a.x, b.y, a.z), corner(b.x, b.y, a.z), corner(b.x, b.y, b.z), corner(a.x, b.y, b.z)],
            Vec3::Y,
            TOP_SHADE,
        ),
        (
            [corner(a.x, a.y, b.z), corner(b.x, a.y, b.z), corner(b.x, a.y, a.z), corner(a.x, a.y, a.z)],
            Vec3::NEG_Y,
            BOTTOM_SHADE,
        ),
        (
            [corner(a.x, a.y, b.z), corner(b.x, a.y, b.z), corner(b.x, b.y, b.z), corner(a.x, b.y, b.z)],
            Vec3::Z,
            FRONT_SHADE,
        ),
        (
            [corner(b.x, a.y, a.z), corner(a.x, a.y, a.z), corner(a.x, b.y, a.z), corner(b.x, b.y, a.z)],
            Vec3::NEG_Z,
            BACK_SHADE,
        ),
        (
            [corner(a.x, a.y, a.z), corner(a.x, a.y, b.z), corner(a.x, b.y, b.z), corner(a.x, b.y, a.z)],
            Vec3::NEG_X,
            SIDE_SHADE,
        ),
        (
            [corner(b.x, a.y, b.z), corner(b.x, a.y, a.z), corner(b.x, b.y, a.z), corner(b.x, b.y, b.z)],
            Vec3::X,
            SIDE_SHADE,
        ),
    ];
    sides
        .into_iter()
        .map(|(verts, normal, shade)| Face::new(verts, rot * normal, color.shade(shade)))
        .collect()
}

/// Box standing on `base` with square footprint `width`
fn pillar(base: Vec3, width: f32, height: f32, color: Rgb) -> Vec<Face> {
    let h = width * 0.5;
    box_faces(
        base + Vec3::new(-h, 0.0, -h),
        base + Vec3::new(h, height, h),
        color,
    )
}

pub fn actor_faces(actor: &Actor, frame: u64) -> Vec<Face> {
    match actor.kind {
        ActorKind::Tree => {
            let mut faces = pillar(actor.pos, TRUNK_WIDTH, actor.height, palette::TREE_TRUNK);
            let canopy_base = actor.pos + Vec3::Y * actor.height;
            faces.extend(pillar(canopy_base, CANOPY_SIZE, CANOPY_SIZE, palette::TREE_CANOPY));
            faces
        }
        ActorKind::Pipe => {
            let mut faces = pillar(actor.pos, PIPE_WIDTH, actor.height, actor.color);
            let rim_base = actor.pos + Vec3::Y * (actor.height - PIPE_RIM_HEIGHT);
            faces.extend(pillar(rim_base, PIPE_RIM_WIDTH, PIPE_RIM_HEIGHT, actor.color.shade(0.8)));
            faces
        }
        _ => {
            let color = if actor.flash > 0 && actor.flash % 2 == 0 {
                palette::WHITE
            } else {
                actor.color
            };
            let rot = Quat::from_rotation_y(actor.yaw);
            let r = actor.radius;
            oriented_box(
                Vec3::new(-r, 0.0, -r),
                Vec3::new(r, actor.height, r),
                color,
                rot,
                actor.pos,
            )
            .into_iter()
            .chain(spin_marker(actor, frame))
            .collect()
        }
    }
}

/// Small top marker on collectibles that turns with the frame counter
fn spin_marker(actor: &Actor, frame: u64) -> Option<Face> {
    if !actor.kind.is_collectible() {
        return None;
    }
    let rot = Quat::from_rotation_y(frame as f32 * 0.1);
    let r = actor.radius * 0.5;
    let top = actor.pos + Vec3::Y * (actor.height + 1.0);
    let verts = [
        top + rot * Vec3::new(-r, 0.0, -r),
        top + rot * Vec3::new(r, 0.0, -r),
        top + rot * Vec3::new(r, 0.0, r),
        top + rot * Vec3::new(-r, 0.0, r),
    ];
    Some(Face::new(verts, Vec3::Y, palette::WHITE))
}

/// Shirt color for this frame: hurt flash, then invulnerability blink
pub fn character_color(character: &CharacterState, frame: u64) -> Rgb {
    let blink = frame % 4 < 2;
    if character.hurt_timer > 0 && blink {
        palette::HERO_HURT
    } else if character.invuln_timer > 0 && blink {
        palette::HERO_BLINK
    } else {
        palette::HERO_SHIRT
    }
}

pub fn character_faces(character: &CharacterState, frame: u64) -> Vec<Face> {
    let rot = Quat::from_rotation_y(character.yaw);
    let r = CHARACTER_RADIUS;
    let squish = character.squish.max(0.1);
    let bob = character.bob_phase.sin().abs() * 4.0;
    let origin = character.pos + Vec3::Y * bob;

    let legs = 40.0 * squish;
    let torso = 50.0 * squish;
    let head = 40.0 * squish;

    let mut faces = oriented_box(
        Vec3::new(-r * 0.7, 0.0, -r * 0.5),
        Vec3::new(r * 0.7, legs, r * 0.5),
        palette::HERO_OVERALLS,
        rot,
        origin,
    );
    faces.extend(oriented_box(
        Vec3::new(-r, legs, -r * 0.6),
        Vec3::new(r, legs + torso, r * 0.6),
        character_color(character, frame),
        rot,
        origin,
    ));
    faces.extend(oriented_box(
        Vec3::new(-r * 0.6, legs + torso, -r * 0.6),
        Vec3::new(r * 0.6, legs + torso + head, r * 0.6),
        palette::HERO_SKIN,
        rot,
        origin,
    ));
    faces
}

/// Flat square under the character on the floor below; none over the void
pub fn shadow_face(character: &CharacterState) -> Option<Face> {
    if character.floor.is_none() || character.floor_height <= FLOOR_SENTINEL {
        return None;
    }
    let y = character.floor_height + 1.0;
    let (x, z) = (character.pos.x, character.pos.z);
    let r = CHARACTER_RADIUS;
    Some(Face::new(
        [
            Vec3::new(x - r, y, z - r),
            Vec3::new(x + r, y, z - r),
            Vec3::new(x + r, y, z + r),
            Vec3::new(x - r, y, z + r),
        ],
        Vec3::Y,
        palette::SHADOW,
    ))
}

/// Camera-facing square
pub fn particle_face(particle: &Particle, camera: &Camera) -> Face {
    let right = camera.right() * particle.size;
    let up = Vec3::Y * particle.size;
    let p = particle.pos;
    Face::new(
        [p - right - up, p + right - up, p + right + up, p - right + up],
        -camera.forward(),
        particle.color,
    )
}
