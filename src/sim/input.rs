//! Per-tick controller input

use serde::{Deserialize, Serialize};

use crate::{dir_to_yaw, normalize_angle};

/// Button bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const JUMP: Buttons = Buttons(0x01);
    pub const ATTACK: Buttons = Buttons(0x02);
    pub const CROUCH: Buttons = Buttons(0x04);

    #[inline]
    pub const fn contains(self, other: Buttons) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub const fn union(self, other: Buttons) -> Buttons {
        Buttons(self.0 | other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for Buttons {
    fn bitor_assign(&mut self, rhs: Buttons) {
        self.0 |= rhs.0;
    }
}

/// Input commands for a single logic tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Stick deflection, 0..=1
    pub stick_mag: f32,
    /// World-space yaw the stick points toward (radians)
    pub intended_yaw: f32,
    /// Buttons that went down this tick
    pub pressed: Buttons,
    /// Buttons currently held
    pub held: Buttons,
}

impl InputFrame {
    /// Build a frame from a camera-relative stick direction.
    ///
    /// `dx` is right, `dz` is forward; both in -1..=1.
    pub fn from_stick(dx: f32, dz: f32, camera_yaw: f32) -> Self {
        let mag = (dx * dx + dz * dz).sqrt().min(1.0);
        let intended_yaw = if mag > 0.0 {
            normalize_angle(dir_to_yaw(dx, dz) + camera_yaw)
        } else {
            0.0
        };
        Self {
            stick_mag: mag,
            intended_yaw,
            ..Default::default()
        }
    }

    /// Mark `buttons` as pressed this tick (and held)
    pub fn press(mut self, buttons: Buttons) -> Self {
        self.pressed |= buttons;
        self.held |= buttons;
        self
    }

    /// Mark `buttons` as held without a new press
    pub fn hold(mut self, buttons: Buttons) -> Self {
        self.held |= buttons;
        self
    }

    #[inline]
    pub fn pressed(&self, button: Buttons) -> bool {
        self.pressed.contains(button)
    }

    #[inline]
    pub fn held(&self, button: Buttons) -> bool {
        self.held.contains(button)
    }

    #[inline]
    pub fn has_stick(&self) -> bool {
        self.stick_mag > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_buttons_contains() {
        let b = Buttons::JUMP | Buttons::CROUCH;
        assert!(b.contains(Buttons::JUMP));
        assert!(b.contains(Buttons::CROUCH));
        assert!(!b.contains(Buttons::ATTACK));
        assert!(!b.contains(Buttons::NONE));
    }

    #[test]
    fn test_press_implies_held() {
        let input = InputFrame::default().press(Buttons::ATTACK);
        assert!(input.pressed(Buttons::ATTACK));
        assert!(input.held(Buttons::ATTACK));
        let input = InputFrame::default().hold(Buttons::CROUCH);
        assert!(!input.pressed(Buttons::CROUCH));
        assert!(input.held(Buttons::CROUCH));
    }

    #[test]
    fn test_from_stick_camera_relative() {
        // Stick forward with camera turned 90° faces +x
        let input = InputFrame::from_stick(0.0, 1.0, FRAC_PI_2);
        assert!((input.intended_yaw - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(input.stick_mag, 1.0);

        // Stick back with no camera turn faces -z
        let input = InputFrame::from_stick(0.0, -1.0, 0.0);
        assert!((input.intended_yaw.abs() - PI).abs() < 1e-5);

        // Diagonal clamps magnitude
        assert_eq!(InputFrame::from_stick(1.0, 1.0, 0.0).stick_mag, 1.0);
        assert!(!InputFrame::from_stick(0.0, 0.0, 0.0).has_stick());
    }
}
