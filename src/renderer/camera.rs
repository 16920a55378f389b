//! View transform and the chase camera

use glam::Vec3;

use crate::normalize_angle;
use crate::sim::CharacterState;
use crate::yaw_to_dir;

const CLOSE_DISTANCE: f32 = 800.0;
const MID_DISTANCE: f32 = 900.0;
const FAR_DISTANCE: f32 = 1000.0;
const DISTANCE_SMOOTHING: f32 = 0.05;
const FOCUS_LEAD: f32 = 50.0;
const FOCUS_HEIGHT: f32 = 120.0;
const FOCUS_SMOOTHING_XZ: f32 = 0.12;
const FOCUS_SMOOTHING_Y: f32 = 0.08;
const POSITION_SMOOTHING: f32 = 0.1;
const YAW_SMOOTHING: f32 = 0.05;
const CAMERA_LIFT: f32 = 200.0;
const PITCH: f32 = 15.0 * std::f32::consts::PI / 180.0;

/// Eye position plus heading; looks along `yaw_to_dir(yaw)`, tilted down by `pitch`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32) -> Self {
        Self { pos, yaw, pitch: 0.0 }
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }

    /// World point to view space: +x right, +y up, +z forward
    pub fn to_view(&self, p: Vec3) -> Vec3 {
        let d = p - self.pos;
        let (sin, cos) = self.yaw.sin_cos();
        let x = d.x * cos - d.z * sin;
        let z = d.x * sin + d.z * cos;
        if self.pitch == 0.0 {
            return Vec3::new(x, d.y, z);
        }
        let (ps, pc) = self.pitch.sin_cos();
        Vec3::new(x, d.y * pc + z * ps, z * pc - d.y * ps)
    }

    pub fn forward(&self) -> Vec3 {
        yaw_to_dir(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.yaw.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }
}

/// Smoothed chase camera that hangs behind the character and pulls back with speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub pos: Vec3,
    pub focus: Vec3,
    pub yaw: f32,
    pub distance: f32,
}

impl FollowCamera {
    /// Snap directly to the resting position behind `character`
    pub fn new(character: &CharacterState) -> Self {
        let mut cam = Self {
            pos: Vec3::ZERO,
            focus: Self::focus_target(character),
            yaw: character.yaw,
            distance: CLOSE_DISTANCE,
        };
        cam.pos = cam.position_target();
        cam
    }

    fn focus_target(character: &CharacterState) -> Vec3 {
        character.pos + yaw_to_dir(character.yaw) * FOCUS_LEAD + Vec3::Y * FOCUS_HEIGHT
    }

    fn position_target(&self) -> Vec3 {
        let back = yaw_to_dir(self.yaw) * PITCH.cos() * self.distance;
        Vec3::new(
            self.focus.x - back.x,
            self.focus.y + PITCH.sin() * self.distance * 0.5 + CAMERA_LIFT,
            self.focus.z - back.z,
        )
    }

    pub fn update(&mut self, character: &CharacterState) {
        let speed = character.forward_speed.abs();
        let target_distance = if speed > 20.0 {
            FAR_DISTANCE
        } else if speed > 10.0 {
            MID_DISTANCE
        } else {
            CLOSE_DISTANCE
        };
        self.distance += (target_distance - self.distance) * DISTANCE_SMOOTHING;

        let focus = Self::focus_target(character);
        self.focus.x += (focus.x - self.focus.x) * FOCUS_SMOOTHING_XZ;
        self.focus.y += (focus.y - self.focus.y) * FOCUS_SMOOTHING_Y;
        self.focus.z += (focus.z - self.focus.z) * FOCUS_SMOOTHING_XZ;

        self.yaw = normalize_angle(self.yaw + normalize_angle(character.yaw - self.yaw) * YAW_SMOOTHING);

        let target = self.position_target();
        self.pos += (target - self.pos) * POSITION_SMOOTHING;
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.pos, self.yaw).with_pitch(PITCH)
    }
}
