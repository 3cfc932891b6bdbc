//! Per-tick procedural animation of the room's ambient effects.
//!
//! [`AnimationEngine::tick`] is a pure function of elapsed time, the ambient tables and the
//! current environment. It returns an [`AnimationFrame`] that the render adapter applies; the
//! engine itself never touches the scene graph.

use std::collections::{HashMap, HashSet};

use engine_core::{Rgb, Transform, TransformRaw};
use glam::{Vec2, Vec3};
use procgen::{AmbientTables, DustMote, RainDrop, SteamPuff, RAIN_RANGE};

use crate::objects::{SceneObject, SceneObjectId};
use crate::weather::Environment;

/// Code lines drawn on the monitor.
pub const CODE_LINE_COUNT: usize = 5;
/// Books on the shelf: five on top, four in the middle, four at the bottom.
pub const BOOK_COUNT: usize = 13;
/// The avatar's two hands.
pub const HAND_COUNT: usize = 2;

/// Length of one steam rise before it restarts.
pub const STEAM_CYCLE: f32 = 2.0;
/// Scale of every rain drop instance.
pub const RAIN_DROP_SCALE: Vec3 = Vec3::new(0.002, 0.02, 0.002);

/// Something the engine animates. Each maps to one placed primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectTarget {
    /// A whole object group (the avatar breathes as one).
    Group(SceneObjectId),
    MonitorScreen,
    CodeLine(usize),
    DeskLamp,
    ConsoleLight,
    Moon,
    WindowStar(usize),
    Hand(usize),
    Plant,
    Book(usize),
    Steam(usize),
}

impl EffectTarget {
    /// Object whose group this primitive sits in, if any.
    pub fn owner(self) -> Option<SceneObjectId> {
        match self {
            EffectTarget::Group(id) => Some(id),
            EffectTarget::MonitorScreen | EffectTarget::CodeLine(_) => Some(SceneObjectId::Monitor),
            EffectTarget::ConsoleLight => Some(SceneObjectId::Console),
            EffectTarget::Moon | EffectTarget::WindowStar(_) => Some(SceneObjectId::Window),
            EffectTarget::Hand(_) => Some(SceneObjectId::Avatar),
            EffectTarget::Plant | EffectTarget::Book(_) => Some(SceneObjectId::Bookshelf),
            EffectTarget::DeskLamp | EffectTarget::Steam(_) => None,
        }
    }
}

/// Visual parameters for one target. `None` leaves the parameter as it is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualParams {
    pub emissive_intensity: Option<f32>,
    /// Translation from the base pose, in the owning group's frame.
    pub offset: Option<Vec3>,
    /// Roll about the local Z axis, in radians.
    pub rotation_z: Option<f32>,
    pub scale: Option<Vec3>,
    pub opacity: Option<f32>,
    pub color: Option<Rgb>,
}

impl VisualParams {
    pub fn glow(intensity: f32) -> Self {
        Self {
            emissive_intensity: Some(intensity),
            ..Self::default()
        }
    }

    pub fn offset(offset: Vec3) -> Self {
        Self {
            offset: Some(offset),
            ..Self::default()
        }
    }
}

/// One dust mote on the screen overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DustParams {
    /// Anchor in percent of the viewport.
    pub anchor: Vec2,
    /// Pixel offset from the anchor.
    pub offset: Vec2,
    pub size: f32,
    pub opacity: f32,
}

/// Everything the engine produced for one tick.
#[derive(Debug, Clone, Default)]
pub struct AnimationFrame {
    pub time: f32,
    pub params: HashMap<EffectTarget, VisualParams>,
    /// Fresh rain drop transforms in the window's frame. `None` while dry, so the buffer keeps
    /// its last contents.
    pub rain: Option<Vec<TransformRaw>>,
    /// Dust overlay. Empty while suppressed.
    pub dust: Vec<DustParams>,
}

impl AnimationFrame {
    pub fn get(&self, target: EffectTarget) -> Option<&VisualParams> {
        self.params.get(&target)
    }

    fn set(&mut self, target: EffectTarget, params: VisualParams) {
        self.params.insert(target, params);
    }
}

/// Twinkle of a window star: `0.5 + 0.5 sin(t * speed)`.
pub fn twinkle(t: f32, speed: f32) -> f32 {
    0.5 + 0.5 * (t * speed).sin()
}

/// Monitor screen glow. The animated screen adds high-frequency flicker on a smaller pulse.
pub fn monitor_glow(t: f32, animated: bool) -> f32 {
    if animated {
        0.8 + 0.15 * (2.0 * t).sin() + 0.02 * (30.0 * t).sin() + 0.01 * (50.0 * t).sin()
    } else {
        0.8 + 0.2 * (2.0 * t).sin()
    }
}

/// Resting x of code line `i` on the screen.
pub fn code_line_base_x(i: usize) -> f32 {
    -0.2 + (i % 3) as f32 * 0.05
}

/// Glow and x position of code line `i`. A line is "typed" for half of each 3 s cycle.
pub fn code_line(t: f32, i: usize) -> (f32, f32) {
    let phase = (t * 0.5 + i as f32 * 0.3).rem_euclid(3.0);
    let glow = if phase < 1.5 { 0.5 } else { 0.2 };
    let x = code_line_base_x(i) + 0.005 * (2.0 * t + i as f32).sin();
    (glow, x)
}

pub fn desk_lamp_glow(t: f32) -> f32 {
    0.8 + 0.1 * (0.5 * t).sin()
}

pub fn console_glow(t: f32) -> f32 {
    0.5 + 0.3 * (3.0 * t).sin()
}

pub fn moon_glow(t: f32, env: &Environment) -> f32 {
    if env.is_raining {
        env.moon_intensity
    } else {
        env.moon_intensity + 0.1 * (0.5 * t).sin()
    }
}

pub fn breathing(t: f32) -> f32 {
    0.02 * (2.0 * t).sin()
}

/// Vertical bob of hand `i`, on top of its resting height.
pub fn hand_bob(t: f32, i: usize) -> f32 {
    0.02 * (8.0 * t + i as f32).sin()
}

pub fn plant_sway(t: f32) -> f32 {
    0.05 * (1.5 * t).sin()
}

/// Vertical float and roll of book `i`.
pub fn book_sway(t: f32, i: usize) -> (f32, f32) {
    let i = i as f32;
    (
        0.015 * (0.8 * t + 0.5 * i).sin(),
        0.02 * (0.5 * t + 0.3 * i).sin(),
    )
}

/// Position in the rise cycle, in `0..STEAM_CYCLE`.
pub fn steam_phase(t: f32, puff: &SteamPuff) -> f32 {
    (t * puff.speed + puff.phase).rem_euclid(STEAM_CYCLE)
}

/// Steam puff parameters. The puff rises and grows while fading, never below zero opacity.
pub fn steam(t: f32, puff: &SteamPuff) -> VisualParams {
    let phase = steam_phase(t, puff);
    let wobble = 2.0 * t + puff.phase;
    VisualParams {
        offset: Some(Vec3::new(
            puff.offset_x + 0.01 * wobble.sin(),
            0.08 + 0.15 * phase,
            puff.offset_z + 0.01 * wobble.cos(),
        )),
        scale: Some(Vec3::splat(0.02 + 0.02 * phase)),
        opacity: Some((0.4 - 0.2 * phase).max(0.0)),
        ..VisualParams::default()
    }
}

/// Height of a rain drop, wrapped into `-RAIN_RANGE/2..RAIN_RANGE/2`.
pub fn rain_y(t: f32, drop: &RainDrop) -> f32 {
    (drop.y - t * drop.speed).rem_euclid(RAIN_RANGE) - RAIN_RANGE / 2.0
}

pub fn rain_instance(t: f32, drop: &RainDrop) -> TransformRaw {
    Transform::from_position(Vec3::new(drop.x, rain_y(t, drop), drop.z))
        .with_scale(RAIN_DROP_SCALE)
        .into()
}

const DUST_Y: [f32; 5] = [0.0, -30.0, -10.0, -40.0, 0.0];
const DUST_X: [f32; 5] = [0.0, 10.0, -5.0, 15.0, 0.0];
const DUST_OPACITY: [f32; 5] = [0.2, 0.6, 0.3, 0.7, 0.2];

/// Dust mote drifting through its looping keyframes with ease-in-out between them. Before its
/// delay has elapsed the mote rests on the first keyframe.
pub fn dust(t: f32, mote: &DustMote) -> DustParams {
    let local = (t - mote.delay).max(0.0);
    let progress = (local / mote.duration.max(f32::EPSILON)).fract();
    let segments = (DUST_Y.len() - 1) as f32;
    let scaled = progress * segments;
    let k = (scaled.floor() as usize).min(DUST_Y.len() - 2);
    let s = scaled - k as f32;
    let eased = s * s * (3.0 - 2.0 * s);
    let lerp = |keys: &[f32; 5]| keys[k] + (keys[k + 1] - keys[k]) * eased;
    DustParams {
        anchor: mote.anchor,
        offset: Vec2::new(lerp(&DUST_X), lerp(&DUST_Y)),
        size: mote.size,
        opacity: lerp(&DUST_OPACITY),
    }
}

/// Owns the ambient tables and turns elapsed time into frames.
pub struct AnimationEngine {
    tables: AmbientTables,
    animated: HashSet<SceneObjectId>,
}

impl AnimationEngine {
    pub fn new(tables: AmbientTables, objects: &[SceneObject]) -> Self {
        Self {
            tables,
            animated: objects.iter().filter(|o| o.animated).map(|o| o.id).collect(),
        }
    }

    pub fn tables(&self) -> &AmbientTables {
        &self.tables
    }

    pub fn is_animated(&self, id: SceneObjectId) -> bool {
        self.animated.contains(&id)
    }

    /// Build the frame for elapsed time `t` seconds.
    pub fn tick(&self, t: f32, env: &Environment) -> AnimationFrame {
        let mut frame = AnimationFrame {
            time: t,
            ..AnimationFrame::default()
        };

        let monitor_animated = self.is_animated(SceneObjectId::Monitor);
        frame.set(
            EffectTarget::MonitorScreen,
            VisualParams::glow(monitor_glow(t, monitor_animated)),
        );
        if monitor_animated {
            for i in 0..CODE_LINE_COUNT {
                let (glow, x) = code_line(t, i);
                frame.set(
                    EffectTarget::CodeLine(i),
                    VisualParams {
                        emissive_intensity: Some(glow),
                        offset: Some(Vec3::X * (x - code_line_base_x(i))),
                        ..VisualParams::default()
                    },
                );
            }
        }

        frame.set(EffectTarget::DeskLamp, VisualParams::glow(desk_lamp_glow(t)));

        if self.is_animated(SceneObjectId::Console) {
            frame.set(EffectTarget::ConsoleLight, VisualParams::glow(console_glow(t)));
        }

        self.window(t, env, &mut frame);

        if self.is_animated(SceneObjectId::Avatar) {
            frame.set(
                EffectTarget::Group(SceneObjectId::Avatar),
                VisualParams::offset(Vec3::Y * breathing(t)),
            );
            for i in 0..HAND_COUNT {
                frame.set(EffectTarget::Hand(i), VisualParams::offset(Vec3::Y * hand_bob(t, i)));
            }
        }

        if self.is_animated(SceneObjectId::Bookshelf) {
            for i in 0..BOOK_COUNT {
                let (dy, roll) = book_sway(t, i);
                frame.set(
                    EffectTarget::Book(i),
                    VisualParams {
                        offset: Some(Vec3::Y * dy),
                        rotation_z: Some(roll),
                        ..VisualParams::default()
                    },
                );
            }
            frame.set(
                EffectTarget::Plant,
                VisualParams {
                    rotation_z: Some(plant_sway(t)),
                    ..VisualParams::default()
                },
            );
        }

        for (i, puff) in self.tables.steam_puffs.iter().enumerate() {
            frame.set(EffectTarget::Steam(i), steam(t, puff));
        }

        if env.rain_visible {
            frame.rain = Some(
                self.tables
                    .rain_drops
                    .iter()
                    .map(|drop| rain_instance(t, drop))
                    .collect(),
            );
        }

        if env.dust_visible {
            frame.dust = self.tables.dust_motes.iter().map(|m| dust(t, m)).collect();
        }

        frame
    }

    fn window(&self, t: f32, env: &Environment, frame: &mut AnimationFrame) {
        let animated = self.is_animated(SceneObjectId::Window);
        for (i, star) in self.tables.window_stars.iter().enumerate() {
            let lit = if animated { twinkle(t, star.twinkle_speed) } else { 0.5 };
            let glow = if env.stars_visible { lit } else { env.dimmed_star_intensity };
            frame.set(EffectTarget::WindowStar(i), VisualParams::glow(glow));
        }
        let glow = if animated { moon_glow(t, env) } else { env.moon_intensity };
        frame.set(
            EffectTarget::Moon,
            VisualParams {
                emissive_intensity: Some(glow),
                color: Some(env.moon_color),
                ..VisualParams::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    use crate::tier::TierProfile;
    use crate::weather::derive_environment;

    fn engine() -> AnimationEngine {
        let tables = AmbientTables::generate(42, TierProfile::desktop().ambient_counts());
        AnimationEngine::new(tables, &SceneObject::catalogue())
    }

    fn glow(frame: &AnimationFrame, target: EffectTarget) -> f32 {
        frame
            .get(target)
            .and_then(|p| p.emissive_intensity)
            .unwrap_or(f32::NAN)
    }

    #[test]
    fn twinkle_is_periodic_and_bounded() {
        let speed = 2.3;
        let period = TAU / speed;
        for k in 0..50 {
            let t = k as f32 * 0.173;
            let a = twinkle(t, speed);
            assert!((0.0..=1.0).contains(&a));
            assert!((a - twinkle(t + period, speed)).abs() < 1e-4);
        }
    }

    #[test]
    fn steam_resets_every_cycle_and_never_goes_negative() {
        let puff = SteamPuff {
            offset_x: 0.0,
            offset_z: 0.0,
            speed: 0.4,
            phase: 1.0,
        };
        for k in 0..400 {
            let t = k as f32 * 0.05;
            let p = steam(t, &puff);
            assert!(p.opacity.unwrap_or(-1.0) >= 0.0);
            let phase = steam_phase(t, &puff);
            assert!((0.0..STEAM_CYCLE).contains(&phase));
        }
        // Phase reaching 2 wraps to the bottom again.
        let t_wrap = (STEAM_CYCLE - puff.phase) / puff.speed;
        assert!(steam_phase(t_wrap + 1e-3, &puff) < 0.01);
    }

    #[test]
    fn rain_wraps_within_range() {
        let drop = RainDrop {
            x: 0.1,
            y: 0.3,
            z: 0.06,
            speed: 1.1,
        };
        for k in 0..500 {
            let y = rain_y(k as f32 * 0.037, &drop);
            assert!((-0.4..=0.4).contains(&y), "{y}");
        }
        assert!((rain_y(0.0, &drop) - (-0.1)).abs() < 1e-6);
    }

    #[test]
    fn code_lines_type_for_half_the_cycle() {
        assert_eq!(code_line(0.0, 0).0, 0.5);
        assert_eq!(code_line(3.1, 0).0, 0.2);
        assert_eq!(code_line(6.0, 0).0, 0.5);
        let (_, x) = code_line(0.0, 4);
        assert!((x - (-0.15 + 0.005 * 4.0f32.sin())).abs() < 1e-6);
    }

    #[test]
    fn rain_is_emitted_only_while_raining() {
        let e = engine();
        let dry = e.tick(1.0, &derive_environment(false));
        assert!(dry.rain.is_none());
        let wet = e.tick(1.0, &derive_environment(true));
        assert_eq!(wet.rain.as_ref().map(Vec::len), Some(100));
    }

    #[test]
    fn rain_dims_stars_and_moon() {
        let e = engine();
        let wet = derive_environment(true);
        for t in [0.0, 1.3, 7.9] {
            let frame = e.tick(t, &wet);
            assert_eq!(glow(&frame, EffectTarget::WindowStar(3)), 0.1);
            assert_eq!(glow(&frame, EffectTarget::Moon), 0.1);
            assert!(frame.dust.is_empty());
        }
        let dry = e.tick(0.0, &derive_environment(false));
        assert!((glow(&dry, EffectTarget::Moon) - 0.4).abs() < 1e-6);
        assert_eq!(dry.dust.len(), 30);
    }

    #[test]
    fn worldmap_is_never_animated() {
        let e = engine();
        let frame = e.tick(2.0, &derive_environment(false));
        assert!(frame
            .params
            .keys()
            .all(|k| k.owner() != Some(SceneObjectId::WorldMap)));
    }

    #[test]
    fn static_monitor_uses_plain_pulse() {
        let mut objects = SceneObject::catalogue();
        for o in &mut objects {
            o.animated = false;
        }
        let tables = AmbientTables::generate(1, TierProfile::mobile().ambient_counts());
        let e = AnimationEngine::new(tables, &objects);
        let frame = e.tick(0.7, &derive_environment(false));
        assert!((glow(&frame, EffectTarget::MonitorScreen) - monitor_glow(0.7, false)).abs() < 1e-6);
        assert!(frame.get(EffectTarget::CodeLine(0)).is_none());
        assert!(frame.get(EffectTarget::Hand(0)).is_none());
        assert!(frame.get(EffectTarget::Book(0)).is_none());
    }

    #[test]
    fn dust_loops_through_keyframes() {
        let mote = DustMote {
            anchor: Vec2::new(50.0, 50.0),
            size: 3.0,
            delay: 1.0,
            duration: 8.0,
        };
        let start = dust(0.5, &mote);
        assert_eq!(start.offset, Vec2::ZERO);
        assert!((start.opacity - 0.2).abs() < 1e-6);
        let quarter = dust(1.0 + 2.0, &mote);
        assert!((quarter.offset.y + 30.0).abs() < 1e-4);
        assert!((quarter.opacity - 0.6).abs() < 1e-4);
        let looped = dust(1.0 + 8.0 + 2.0, &mote);
        assert!((looped.offset.y - quarter.offset.y).abs() < 1e-3);
    }

    #[test]
    fn ticks_are_pure() {
        let e = engine();
        let env = derive_environment(true);
        let a = e.tick(3.25, &env);
        let b = e.tick(3.25, &env);
        assert_eq!(a.params, b.params);
        assert_eq!(
            a.rain.as_ref().map(|r| r.len()),
            b.rain.as_ref().map(|r| r.len())
        );
    }
}
