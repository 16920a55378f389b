//! RGB colors for surfaces, actors and the framebuffer

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scale every channel by `factor`, saturating at 0..=255
    pub fn shade(self, factor: f32) -> Self {
        let scale = |c: u8| (c as f32 * factor).clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Linear blend toward `other` (`t` = 0 keeps self, 1 gives other)
    pub fn lerp(self, other: Rgb, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round().clamp(0.0, 255.0) as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// Pack as 0x00RRGGBB
    #[inline]
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from 0x00RRGGBB
    #[inline]
    pub const fn from_u32(packed: u32) -> Self {
        Self::new((packed >> 16) as u8, (packed >> 8) as u8, packed as u8)
    }
}

/// Palette shared by the simulation and renderer
pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const SHADOW: Rgb = Rgb::new(10, 10, 10);
    pub const HERO_SHIRT: Rgb = Rgb::new(255, 20, 20);
    pub const HERO_HURT: Rgb = Rgb::new(255, 150, 150);
    pub const HERO_BLINK: Rgb = Rgb::new(255, 200, 200);
    pub const HERO_OVERALLS: Rgb = Rgb::new(30, 30, 180);
    pub const HERO_SKIN: Rgb = Rgb::new(255, 200, 160);
    pub const COIN: Rgb = Rgb::new(255, 215, 0);
    pub const RED_COIN: Rgb = Rgb::new(255, 50, 50);
    pub const BLUE_COIN: Rgb = Rgb::new(50, 100, 255);
    pub const STAR: Rgb = Rgb::new(255, 255, 100);
    pub const EXTRA_LIFE: Rgb = Rgb::new(0, 200, 0);
    pub const DAMAGE: Rgb = Rgb::new(255, 50, 50);
    pub const TREE_TRUNK: Rgb = Rgb::new(100, 65, 30);
    pub const TREE_CANOPY: Rgb = Rgb::new(30, 140, 30);
    pub const DEFAULT_SKY: Rgb = Rgb::new(135, 206, 235);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_saturates() {
        let c = Rgb::new(200, 100, 0).shade(1.5);
        assert_eq!(c, Rgb::new(255, 150, 0));
        assert_eq!(Rgb::new(200, 100, 50).shade(0.0), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Rgb::new(0, 0, 0);
        let b = Rgb::new(200, 100, 50);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Rgb::new(100, 50, 25));
    }

    #[test]
    fn test_pack_unpack() {
        let c = Rgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_u32(), 0x0012_3456);
        assert_eq!(Rgb::from_u32(c.to_u32()), c);
    }
}
