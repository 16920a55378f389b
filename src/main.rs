//! Star Hop entry point
//!
//! Headless demo: builds a small course, drives the fixed-step loop with a
//! scripted input track and writes the last frame as a PPM image.
//!
//! Usage: `star-hop [output.ppm] [settings.json] [low|medium|high]`

#![cfg(not(target_arch = "wasm32"))]

use std::error::Error;

use glam::Vec3;
use star_hop::color::Rgb;
use star_hop::renderer::{FollowCamera, Framebuffer, Renderer};
use star_hop::settings::{QualityPreset, Settings};
use star_hop::sim::{
    Actor, Buttons, GameEvent, GamePhase, InputFrame, LevelData, LogicClock, Session, SurfaceKind, make_box,
    make_ground, make_slope, make_stairs, tick,
};

const DEFAULT_OUTPUT: &str = "star_hop_frame.ppm";
const DEFAULT_SETTINGS: &str = "star_hop_settings.json";
const DEMO_SEED: u64 = 0x5eed_cafe;
/// Display frames to simulate (10 s at 60 Hz)
const DEMO_FRAMES: u64 = 600;

const GRASS: Rgb = Rgb::new(80, 170, 70);
const STONE: Rgb = Rgb::new(150, 145, 140);
const DIRT: Rgb = Rgb::new(140, 100, 60);
const LAVA: Rgb = Rgb::new(230, 80, 20);
const ICE: Rgb = Rgb::new(190, 230, 255);

fn meadow() -> LevelData {
    let mut level = LevelData::new(1, "Meadow").with_spawn(Vec3::new(0.0, 50.0, 0.0), 0.0);
    level.add_surfaces([
        make_ground(0.0, 0.0, 4000.0, 4000.0, 0.0, GRASS, SurfaceKind::Default),
        make_ground(-900.0, -800.0, 400.0, 400.0, 2.0, LAVA, SurfaceKind::Lava),
        make_ground(900.0, -900.0, 500.0, 300.0, 2.0, ICE, SurfaceKind::Ice),
        make_slope(
            Vec3::new(-500.0, 0.0, 400.0),
            Vec3::new(-500.0, 200.0, 900.0),
            300.0,
            DIRT,
            SurfaceKind::Default,
        ),
    ]);
    level.add_surfaces(make_box(
        Vec3::new(400.0, 50.0, 600.0),
        Vec3::new(200.0, 100.0, 200.0),
        STONE,
        SurfaceKind::Default,
    ));
    level.add_surfaces(make_box(
        Vec3::new(0.0, 150.0, 1400.0),
        Vec3::new(300.0, 20.0, 300.0),
        STONE,
        SurfaceKind::Default,
    ));
    level.add_surfaces(make_stairs(
        Vec3::new(800.0, 0.0, -200.0),
        5,
        Vec3::new(200.0, 40.0, 80.0),
        (0.0, 1.0),
        STONE,
    ));

    for coin in Actor::coin_ring(Vec3::new(0.0, 0.0, 500.0), 150.0, 8) {
        level.add_actor(coin);
    }
    for coin in Actor::coin_line(Vec3::new(-300.0, 0.0, -300.0), Vec3::new(0.0, 0.0, -120.0), 5) {
        level.add_actor(coin);
    }
    level.add_actor(Actor::red_coin(Vec3::new(400.0, 100.0, 600.0)));
    level.add_actor(Actor::blue_coin(Vec3::new(-500.0, 200.0, 900.0)));
    level.add_actor(Actor::star(Vec3::new(0.0, 160.0, 1400.0), 1));
    level.add_actor(Actor::extra_life(Vec3::new(1200.0, 0.0, -600.0)));
    level.add_actor(Actor::walker(Vec3::new(600.0, 0.0, 200.0)));
    level.add_actor(Actor::shover(Vec3::new(-1200.0, 0.0, 600.0)));
    level.add_actor(Actor::spark(Vec3::new(-200.0, 40.0, 1000.0), 150.0));
    level.add_actor(Actor::tree(Vec3::new(-700.0, 0.0, 0.0), 300.0));
    level.add_actor(Actor::tree(Vec3::new(700.0, 0.0, 1200.0), 260.0));
    level.add_actor(Actor::pipe(Vec3::new(1300.0, 0.0, 900.0), 2));
    level
}

fn courtyard() -> LevelData {
    let mut level = LevelData::new(2, "Courtyard")
        .with_sky(Rgb::new(60, 40, 90))
        .with_spawn(Vec3::new(0.0, 50.0, -600.0), 0.0);
    level.add_surfaces([make_ground(0.0, 0.0, 2400.0, 2400.0, 0.0, STONE, SurfaceKind::Default)]);
    level.add_actor(Actor::ghost(Vec3::new(300.0, 0.0, 0.0)));
    level.add_actor(Actor::crusher(Vec3::new(-300.0, 250.0, 0.0)));
    level.add_actor(Actor::boss(Vec3::new(0.0, 0.0, 500.0), 3));
    level.add_actor(Actor::star(Vec3::new(0.0, 0.0, 900.0), 1));
    level
}

/// Repeating input track relative to the camera heading
fn scripted_input(logic_tick: u64, camera_yaw: f32) -> InputFrame {
    let phase = logic_tick % 240;
    let mut input = match phase {
        0..=89 => InputFrame::from_stick(0.0, 1.0, camera_yaw),
        90..=149 => InputFrame::from_stick(0.7, 0.7, camera_yaw),
        150..=209 => InputFrame::from_stick(-1.0, 0.0, camera_yaw),
        _ => InputFrame::default(),
    };
    if phase % 30 == 10 {
        input = input.press(Buttons::JUMP);
    }
    if phase == 220 {
        input = input.press(Buttons::ATTACK);
    }
    input
}

fn run() -> Result<(), Box<dyn Error>> {
    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS.to_string());

    let mut settings = Settings::load_or_default(&settings_path);
    if let Some(name) = args.next() {
        match QualityPreset::parse(&name) {
            Some(preset) => settings.apply_preset(preset),
            None => log::warn!("Unknown quality preset '{name}', keeping {}", settings.quality.as_str()),
        }
    }
    log::info!(
        "Quality {} ({} particles max)",
        settings.quality.as_str(),
        settings.max_particles()
    );

    let mut session = Session::new(meadow(), DEMO_SEED);
    session.set_max_particles(settings.max_particles());
    session.add_level(courtyard());

    let renderer = Renderer::new(&settings);
    let mut clock = LogicClock::new(settings.display_hz, settings.logic_hz);
    let mut follow = FollowCamera::new(&session.character);
    let mut logic_ticks = 0u64;
    let mut frame = 0u64;

    while frame < DEMO_FRAMES && session.phase != GamePhase::GameOver {
        frame += 1;
        if !clock.advance() {
            continue;
        }
        let input = scripted_input(logic_ticks, follow.yaw);
        logic_ticks += 1;
        for event in tick(&mut session, &input) {
            match event {
                GameEvent::LevelLoaded { .. } => follow = FollowCamera::new(&session.character),
                other => log::debug!("tick {}: {:?}", session.tick_count, other),
            }
        }
        follow.update(&session.character);
    }

    let mut fb = Framebuffer::new(settings.width, settings.height);
    let stats = renderer.render(&session, &follow.camera(), &mut fb, frame);
    std::fs::write(&output, fb.to_ppm())?;

    let c = &session.character;
    log::info!(
        "{} logic ticks over {} frames: level {}, coins {}, stars {}, wedges {}, lives {}",
        logic_ticks,
        frame,
        session.world.level_id,
        c.coins,
        c.stars,
        c.wedges(),
        c.lives
    );
    log::info!("Wrote {} ({} of {} faces drawn)", output, stats.drawn, stats.submitted);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Star Hop (native) starting...");

    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}
