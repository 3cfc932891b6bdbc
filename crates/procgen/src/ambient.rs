//! Ambient instance tables: per-instance phases, speeds and offsets for the room's
//! micro-animations.
//!
//! Every table is generated once from an explicit seed when the scene mounts and is never
//! regenerated, so animation output is a pure function of elapsed time and the table row.

use glam::{Vec2, Vec3};
use rand::prelude::*;

/// Stars painted behind the window glass.
pub const WINDOW_STAR_COUNT: usize = 20;
/// Steam puffs rising from the coffee mug.
pub const STEAM_PUFF_COUNT: usize = 5;
/// Vertical span rain drops fall through before wrapping (window-local units).
pub const RAIN_RANGE: f32 = 0.8;
/// Radius of the inner shell of the background star field.
pub const SKY_RADIUS: f32 = 50.0;
/// Depth of the background star field shell.
pub const SKY_DEPTH: f32 = 50.0;

/// One star behind the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStar {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    /// Angular speed of the twinkle in rad/s.
    pub twinkle_speed: f32,
}

/// One rain drop in the window's batched rain effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainDrop {
    pub x: f32,
    /// Starting height in `0..RAIN_RANGE`.
    pub y: f32,
    pub z: f32,
    /// Fall speed in units per second.
    pub speed: f32,
}

/// One steam puff above the mug.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteamPuff {
    pub offset_x: f32,
    pub offset_z: f32,
    pub speed: f32,
    pub phase: f32,
}

/// One star of the background star field surrounding the room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyStar {
    pub position: Vec3,
    pub size: f32,
}

/// One floating dust mote on the screen-space overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustMote {
    /// Anchor in percent of the viewport (0..100 on both axes).
    pub anchor: Vec2,
    /// Diameter in pixels.
    pub size: f32,
    /// Seconds before the loop starts.
    pub delay: f32,
    /// Length of one keyframe loop in seconds.
    pub duration: f32,
}

/// Instance counts that depend on the device tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbientCounts {
    pub rain_drops: usize,
    pub sky_stars: usize,
    pub dust_motes: usize,
}

/// Every ambient table of the scene.
#[derive(Debug, Clone)]
pub struct AmbientTables {
    pub seed: u64,
    pub window_stars: Vec<WindowStar>,
    pub rain_drops: Vec<RainDrop>,
    pub steam_puffs: Vec<SteamPuff>,
    pub sky_stars: Vec<SkyStar>,
    pub dust_motes: Vec<DustMote>,
}

impl AmbientTables {
    /// Generate all tables from `seed`. Each table draws from its own derived stream, so changing
    /// one count never reshuffles another table.
    pub fn generate(seed: u64, counts: AmbientCounts) -> Self {
        let tables = Self {
            seed,
            window_stars: window_stars(stream(seed, 1)),
            rain_drops: rain_drops(stream(seed, 2), counts.rain_drops),
            steam_puffs: steam_puffs(stream(seed, 3)),
            sky_stars: sky_stars(stream(seed, 4), counts.sky_stars),
            dust_motes: dust_motes(stream(seed, 5), counts.dust_motes),
        };
        log::debug!(
            "Ambient tables seeded {}: {} stars, {} drops, {} puffs, {} sky stars, {} motes",
            seed,
            tables.window_stars.len(),
            tables.rain_drops.len(),
            tables.steam_puffs.len(),
            tables.sky_stars.len(),
            tables.dust_motes.len()
        );
        tables
    }
}

fn stream(seed: u64, table: u64) -> StdRng {
    StdRng::seed_from_u64(seed.wrapping_add(table * 104729))
}

/// Uniform in `-0.5..0.5` scaled by `span`.
fn centred(rng: &mut StdRng, span: f32) -> f32 {
    (rng.gen::<f32>() - 0.5) * span
}

fn window_stars(mut rng: StdRng) -> Vec<WindowStar> {
    (0..WINDOW_STAR_COUNT)
        .map(|_| WindowStar {
            x: centred(&mut rng, 0.8),
            y: centred(&mut rng, 0.6),
            size: rng.gen::<f32>() * 0.02 + 0.01,
            twinkle_speed: rng.gen::<f32>() * 2.0 + 1.0,
        })
        .collect()
}

fn rain_drops(mut rng: StdRng, count: usize) -> Vec<RainDrop> {
    (0..count)
        .map(|_| RainDrop {
            x: centred(&mut rng, 1.0),
            y: rng.gen::<f32>() * RAIN_RANGE,
            z: 0.05 + rng.gen::<f32>() * 0.02,
            speed: 0.8 + rng.gen::<f32>() * 0.5,
        })
        .collect()
}

fn steam_puffs(mut rng: StdRng) -> Vec<SteamPuff> {
    (0..STEAM_PUFF_COUNT)
        .map(|i| SteamPuff {
            offset_x: centred(&mut rng, 0.03),
            offset_z: centred(&mut rng, 0.03),
            speed: 0.3 + rng.gen::<f32>() * 0.2,
            // Evenly spread so the puffs never rise in lockstep.
            phase: (i as f32 / STEAM_PUFF_COUNT as f32) * std::f32::consts::TAU,
        })
        .collect()
}

fn sky_stars(mut rng: StdRng, count: usize) -> Vec<SkyStar> {
    (0..count)
        .map(|_| {
            // Uniform direction on the sphere, radius spread through the shell.
            let y: f32 = rng.gen_range(-1.0..1.0);
            let theta = rng.gen::<f32>() * std::f32::consts::TAU;
            let ring = (1.0 - y * y).sqrt();
            let radius = SKY_RADIUS + rng.gen::<f32>() * SKY_DEPTH;
            SkyStar {
                position: Vec3::new(ring * theta.cos(), y, ring * theta.sin()) * radius,
                size: (0.5 + 0.5 * rng.gen::<f32>()) * 3.0,
            }
        })
        .collect()
}

fn dust_motes(mut rng: StdRng, count: usize) -> Vec<DustMote> {
    (0..count)
        .map(|_| DustMote {
            anchor: Vec2::new(rng.gen::<f32>() * 100.0, rng.gen::<f32>() * 100.0),
            size: rng.gen::<f32>() * 4.0 + 2.0,
            delay: rng.gen::<f32>() * 5.0,
            duration: 8.0 + rng.gen::<f32>() * 4.0,
        })
        .collect()
}
