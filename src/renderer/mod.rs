//! Software rendering module
//!
//! Draws a session into a CPU framebuffer with a painter's-algorithm face
//! pipeline. Reads the simulation only; never mutates it.

pub mod camera;
pub mod pipeline;
pub mod raster;
pub mod shapes;

pub use camera::{Camera, FollowCamera};
pub use pipeline::{DrawOptions, Face, FrameStats, draw_faces};
pub use raster::Framebuffer;

use crate::settings::Settings;
use crate::sim::Session;

/// World surfaces are split into tiles this size before drawing
const TILE_SIZE: f32 = 400.0;

/// Scene assembly on top of the face pipeline
#[derive(Debug, Clone)]
pub struct Renderer {
    fog: bool,
    outlines: bool,
    outline_distance: f32,
    particles: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Renderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            fog: settings.fog,
            outlines: settings.outlines,
            outline_distance: settings.outline_distance,
            particles: settings.particles,
        }
    }

    /// World surfaces, live actors, the character and its shadow, then particles
    pub fn collect_faces(&self, session: &Session, camera: &Camera, frame: u64) -> Vec<Face> {
        let world = &session.world;
        let mut faces: Vec<Face> = world
            .surfaces
            .iter()
            .flat_map(|s| Face::from(s).tessellate(TILE_SIZE))
            .collect();
        for actor in world.actors.iter().filter(|a| a.active && !a.collected) {
            faces.extend(shapes::actor_faces(actor, frame));
        }
        faces.extend(shapes::shadow_face(&session.character));
        faces.extend(shapes::character_faces(&session.character, frame));
        if self.particles {
            faces.extend(world.particles.iter().map(|p| shapes::particle_face(p, camera)));
        }
        faces
    }

    pub fn render(&self, session: &Session, camera: &Camera, fb: &mut Framebuffer, frame: u64) -> FrameStats {
        fb.sky_gradient(session.world.sky);
        let faces = self.collect_faces(session, camera, frame);
        let options = DrawOptions {
            fog: self.fog,
            outlines: self.outlines,
            outline_distance: self.outline_distance,
            sky: session.world.sky,
        };
        let stats = draw_faces(fb, camera, &faces, &options);
        log::trace!(
            "Frame {}: {} faces, {} drawn, {} culled",
            frame,
            stats.submitted,
            stats.drawn,
            stats.culled
        );
        stats
    }
}
