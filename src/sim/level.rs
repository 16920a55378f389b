//! Level content as supplied by a level builder

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::geometry::Surface;
use crate::color::{Rgb, palette};

/// Static description of a level; `Session::load_level` instantiates it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelData {
    pub id: u32,
    pub name: String,
    #[serde(default = "default_sky")]
    pub sky: Rgb,
    /// Stars the level offers
    #[serde(default)]
    pub star_count: u32,
    pub spawn: Vec3,
    #[serde(default)]
    pub spawn_yaw: f32,
    pub surfaces: Vec<Surface>,
    #[serde(default)]
    pub actors: Vec<Actor>,
}

fn default_sky() -> Rgb {
    palette::DEFAULT_SKY
}

impl LevelData {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sky: palette::DEFAULT_SKY,
            star_count: 0,
            spawn: Vec3::ZERO,
            spawn_yaw: 0.0,
            surfaces: Vec::new(),
            actors: Vec::new(),
        }
    }

    pub fn with_sky(mut self, sky: Rgb) -> Self {
        self.sky = sky;
        self
    }

    pub fn with_spawn(mut self, spawn: Vec3, yaw: f32) -> Self {
        self.spawn = spawn;
        self.spawn_yaw = yaw;
        self
    }

    /// Append surfaces; `None` entries (rejected degenerate quads) are skipped
    pub fn add_surfaces<I>(&mut self, surfaces: I)
    where
        I: IntoIterator,
        I::Item: Into<Option<Surface>>,
    {
        self.surfaces.extend(surfaces.into_iter().filter_map(Into::into));
    }

    pub fn add_actor(&mut self, actor: Actor) {
        if actor.kind == super::actor::ActorKind::Star {
            self.star_count += 1;
        }
        self.actors.push(actor);
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::Actor;
    use crate::sim::geometry::{SurfaceKind, make_box, make_ground};

    #[test]
    fn test_add_surfaces_skips_rejected() {
        let mut level = LevelData::new(1, "yard");
        let grey = Rgb::new(90, 90, 90);
        level.add_surfaces([make_ground(0.0, 0.0, 100.0, 100.0, 0.0, grey, SurfaceKind::Default), None]);
        level.add_surfaces(make_box(Vec3::ZERO, Vec3::splat(10.0), grey, SurfaceKind::Default));
        assert_eq!(level.surfaces.len(), 6);
    }

    #[test]
    fn test_star_count_tracks_stars() {
        let mut level = LevelData::new(1, "yard");
        level.add_actor(Actor::star(Vec3::ZERO, 0));
        level.add_actor(Actor::coin(Vec3::ZERO));
        level.add_actor(Actor::star(Vec3::ZERO, 1));
        assert_eq!(level.star_count, 2);
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "id": 4, "name": "plain", "spawn": [0.0, 100.0, 0.0], "surfaces": [] }"#;
        let level = LevelData::from_json(json).unwrap();
        assert_eq!(level.id, 4);
        assert_eq!(level.sky, palette::DEFAULT_SKY);
        assert!(level.actors.is_empty());
        assert_eq!(level.spawn, Vec3::new(0.0, 100.0, 0.0));
    }

    fn level_with_surface(verts: &str, normal: &str) -> String {
        format!(
            r#"{{ "id": 5, "name": "loaded", "spawn": [0.0, 0.0, 0.0], "surfaces": [
                {{ "verts": {verts}, "normal": {normal}, "kind": "Ice",
                   "color": {{ "r": 1, "g": 2, "b": 3 }}, "warp": 2 }}
            ] }}"#
        )
    }

    #[test]
    fn test_json_surfaces_are_validated() {
        let square = "[[0.0,0.0,0.0],[100.0,0.0,0.0],[100.0,0.0,100.0],[0.0,0.0,100.0]]";
        let level = LevelData::from_json(&level_with_surface(square, "[0.0, 4.0, 0.0]")).unwrap();
        let surface = &level.surfaces[0];
        assert_eq!(surface.normal, Vec3::Y);
        assert_eq!(surface.kind, SurfaceKind::Ice);
        assert_eq!(surface.warp, Some(2));

        let point = "[[5.0,5.0,5.0],[5.0,5.0,5.0],[5.0,5.0,5.0],[5.0,5.0,5.0]]";
        assert!(LevelData::from_json(&level_with_surface(point, "[0.0, 0.0, 0.0]")).is_err());
        assert!(LevelData::from_json(&level_with_surface(point, "[0.0, 1.0, 0.0]")).is_err());
    }
}
