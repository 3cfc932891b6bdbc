//! Bridges animation frames and environment records onto the scene graph.
//!
//! The room is mounted as a flat set of primitives keyed by [`RenderKey`]. Child primitives are
//! stored with world-space base poses that already include their group's placement.

use std::collections::HashMap;

use engine_core::{InstanceBatch, Material, Quat, Rgb, Transform, TransformRaw, Vec3};
use procgen::AmbientTables;
use renderer::{Ray, SceneGraph};

use crate::animation::{
    code_line_base_x, rain_instance, AnimationFrame, EffectTarget, VisualParams, BOOK_COUNT,
    CODE_LINE_COUNT, HAND_COUNT,
};
use crate::objects::{SceneObject, SceneObjectId};
use crate::weather::Environment;

/// Key of every primitive the room places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKey {
    /// Body of an interactive object; carries the pick bounds and hover highlight.
    Object(SceneObjectId),
    Effect(EffectTarget),
    Rain,
    Clouds,
    SkyStars,
    WindowGlass,
    AmbientLight,
    PointLight,
    ScreenLight,
    Spot,
}

impl RenderKey {
    pub fn for_target(target: EffectTarget) -> Self {
        match target {
            EffectTarget::Group(id) => RenderKey::Object(id),
            other => RenderKey::Effect(other),
        }
    }
}

const DESK_LAMP_GROUP: Vec3 = Vec3::new(-0.7, 0.65, -0.5);
const MUG_GROUP: Vec3 = Vec3::new(0.7, 0.68, -0.4);

const BOOK_COLORS: [u32; 6] = [0xef4444, 0x3b82f6, 0x22c55e, 0xf59e0b, 0x8b5cf6, 0xec4899];
/// Shelf-local x of each book, top shelf first.
const BOOK_X: [f32; BOOK_COUNT] = [
    -0.25, -0.15, -0.05, 0.05, 0.15, -0.2, -0.05, 0.1, 0.22, -0.22, -0.08, 0.08, 0.2,
];

fn book_shelf(i: usize) -> (f32, usize) {
    match i {
        0..=4 => (0.47, i),
        5..=8 => (0.13, i - 5 + 2),
        _ => (-0.22, i - 9 + 4),
    }
}

/// Owns the scene graph the host renderer draws from.
pub struct RenderAdapter {
    graph: SceneGraph<RenderKey>,
    highlights: HashMap<SceneObjectId, (Rgb, f32)>,
    hovered: Option<SceneObjectId>,
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderAdapter {
    pub fn new() -> Self {
        Self {
            graph: SceneGraph::new(),
            highlights: HashMap::new(),
            hovered: None,
        }
    }

    pub fn graph(&self) -> &SceneGraph<RenderKey> {
        &self.graph
    }

    /// Place every primitive of the room.
    pub fn mount(&mut self, objects: &[SceneObject], tables: &AmbientTables) {
        for object in objects {
            self.mount_object(object, tables);
        }

        let lamp = Transform::from_position(DESK_LAMP_GROUP);
        self.graph.mount(
            RenderKey::Effect(EffectTarget::DeskLamp),
            child(&lamp, Vec3::new(0.08, 0.34, 0.0)),
            Material::glowing(Rgb::from_hex(0xfef08a), 0.8),
        );
        let mug = Transform::from_position(MUG_GROUP);
        for i in 0..tables.steam_puffs.len() {
            self.graph.mount(
                RenderKey::Effect(EffectTarget::Steam(i)),
                mug,
                Material::new(Rgb::WHITE).with_opacity(0.3),
            );
        }

        let mut stars = InstanceBatch::with_capacity(tables.sky_stars.len());
        stars.instances.extend(tables.sky_stars.iter().map(|s| {
            TransformRaw::from(Transform::from_position(s.position).with_scale(Vec3::splat(s.size)))
        }));
        self.graph.mount(RenderKey::SkyStars, Transform::default(), Material::glowing(Rgb::WHITE, 1.0));
        self.graph.set_batch(RenderKey::SkyStars, stars);

        let lights = [
            (RenderKey::AmbientLight, Vec3::ZERO),
            (RenderKey::PointLight, Vec3::new(-0.6, 1.2, -0.5)),
            (RenderKey::ScreenLight, Vec3::new(0.0, 1.2, -0.8)),
            (RenderKey::Spot, Vec3::new(0.0, 3.0, 2.0)),
        ];
        for (key, position) in lights {
            self.graph
                .mount(key, Transform::from_position(position), Material::new(Rgb::BLACK));
        }

        log::info!("Mounted {} primitives", self.graph.len());
    }

    fn mount_object(&mut self, object: &SceneObject, tables: &AmbientTables) {
        let group = object.base;
        let key = RenderKey::Object(object.id);
        self.graph.mount(key, group, Material::new(object.color));
        self.graph.set_pick_bounds(key, object.bounds);
        self.highlights.insert(object.id, object.highlight);

        let green = Rgb::from_hex(0x4ade80);
        match object.id {
            SceneObjectId::Monitor => {
                self.graph.mount(
                    RenderKey::Effect(EffectTarget::MonitorScreen),
                    child(&group, Vec3::new(0.0, 0.0, 0.05)),
                    Material {
                        emissive: green,
                        emissive_intensity: 0.8,
                        ..Material::new(Rgb::from_hex(0x1a1a2e))
                    },
                );
                for i in 0..CODE_LINE_COUNT {
                    let y = -0.2 + i as f32 * 0.1;
                    self.graph.mount(
                        RenderKey::Effect(EffectTarget::CodeLine(i)),
                        child(&group, Vec3::new(code_line_base_x(i), y, 0.07)),
                        Material::glowing(green, 0.5),
                    );
                }
            }
            SceneObjectId::Console => {
                self.graph.mount(
                    RenderKey::Effect(EffectTarget::ConsoleLight),
                    child(&group, Vec3::new(-0.18, 0.07, 0.15)),
                    Material::glowing(green, 0.5),
                );
            }
            SceneObjectId::Avatar => {
                for i in 0..HAND_COUNT {
                    let side = if i == 0 { -0.28 } else { 0.28 };
                    self.graph.mount(
                        RenderKey::Effect(EffectTarget::Hand(i)),
                        child(&group, Vec3::new(side, 0.1, 0.25)),
                        Material::new(Rgb::from_hex(0xfcd5b5)),
                    );
                }
            }
            SceneObjectId::Window => {
                let glass = RenderKey::WindowGlass;
                self.graph.mount(
                    glass,
                    child(&group, Vec3::new(0.0, 0.0, 0.03)),
                    Material::new(Rgb::from_hex(0x0c1445)).with_opacity(0.9),
                );
                for (i, star) in tables.window_stars.iter().enumerate() {
                    let pose = child(&group, Vec3::new(star.x, star.y, 0.04))
                        .with_scale(Vec3::splat(star.size));
                    self.graph.mount(
                        RenderKey::Effect(EffectTarget::WindowStar(i)),
                        pose,
                        Material::glowing(Rgb::from_hex(0xfffbeb), 0.5),
                    );
                }
                self.graph.mount(
                    RenderKey::Effect(EffectTarget::Moon),
                    child(&group, Vec3::new(0.3, 0.25, 0.04)),
                    Material::glowing(Rgb::from_hex(0xfef3c7), 0.4),
                );
                self.graph.mount(
                    RenderKey::Clouds,
                    child(&group, Vec3::new(-0.1, 0.3, 0.04)),
                    Material::new(Rgb::from_hex(0x4a5568)).with_opacity(0.8),
                );
                self.graph.set_visible(RenderKey::Clouds, false);

                let mut rain = InstanceBatch::with_capacity(tables.rain_drops.len());
                rain.instances
                    .extend(tables.rain_drops.iter().map(|d| rain_instance(0.0, d)));
                self.graph.mount(
                    RenderKey::Rain,
                    group,
                    Material::glowing(Rgb::from_hex(0xa0c4ff), 0.3).with_opacity(0.6),
                );
                self.graph.set_batch(RenderKey::Rain, rain);
                self.graph.set_visible(RenderKey::Rain, false);
            }
            SceneObjectId::Bookshelf => {
                for (i, x) in BOOK_X.iter().enumerate() {
                    let (y, color) = book_shelf(i);
                    self.graph.mount(
                        RenderKey::Effect(EffectTarget::Book(i)),
                        child(&group, Vec3::new(*x, y, 0.02)),
                        Material::new(Rgb::from_hex(BOOK_COLORS[color % BOOK_COLORS.len()])),
                    );
                }
                self.graph.mount(
                    RenderKey::Effect(EffectTarget::Plant),
                    child(&group, Vec3::new(0.28, 0.58, 0.02)),
                    Material::new(Rgb::from_hex(0x22c55e)),
                );
            }
            SceneObjectId::WorldMap => {}
        }
    }

    /// Apply one animation frame. Targets that are not mounted are skipped for this tick.
    /// Returns how many targets were updated.
    pub fn apply_frame(&mut self, frame: &AnimationFrame) -> usize {
        let group_offsets: HashMap<SceneObjectId, Vec3> = frame
            .params
            .iter()
            .filter_map(|(target, p)| match target {
                EffectTarget::Group(id) => p.offset.map(|o| (*id, o)),
                _ => None,
            })
            .collect();

        let mut applied = 0;
        for (target, params) in &frame.params {
            let key = RenderKey::for_target(*target);
            if !self.graph.is_mounted(key) {
                log::trace!("Skipping unmounted target {:?}", target);
                continue;
            }
            let inherited = match target {
                EffectTarget::Group(_) => Vec3::ZERO,
                other => other
                    .owner()
                    .and_then(|id| group_offsets.get(&id).copied())
                    .unwrap_or(Vec3::ZERO),
            };
            self.apply_params(key, params, inherited);
            applied += 1;
        }

        if let Some(instances) = &frame.rain {
            if !self.graph.update_batch(RenderKey::Rain, |b| {
                b.instances.clear();
                b.instances.extend_from_slice(instances);
            }) {
                log::trace!("Skipping unmounted rain batch");
            }
        }
        applied
    }

    fn apply_params(&mut self, key: RenderKey, params: &VisualParams, inherited: Vec3) {
        if params.emissive_intensity.is_some() || params.opacity.is_some() || params.color.is_some()
        {
            self.graph.update_material(key, |m| {
                if let Some(intensity) = params.emissive_intensity {
                    m.emissive_intensity = intensity;
                }
                if let Some(opacity) = params.opacity {
                    m.opacity = opacity;
                }
                if let Some(color) = params.color {
                    m.color = color;
                }
            });
        }
        if params.offset.is_some()
            || params.rotation_z.is_some()
            || params.scale.is_some()
            || inherited != Vec3::ZERO
        {
            self.graph.update_pose(key, |base| {
                let offset = params.offset.unwrap_or(Vec3::ZERO) + inherited;
                let mut live = *base;
                live.position += base.rotation * offset;
                if let Some(roll) = params.rotation_z {
                    live.rotation = base.rotation * Quat::from_rotation_z(roll);
                }
                if let Some(scale) = params.scale {
                    live.scale = scale;
                }
                live
            });
        }
    }

    /// Apply a freshly derived environment to lights, glass, moon and weather visuals.
    pub fn apply_environment(&mut self, env: &Environment) {
        let lights = [
            (RenderKey::AmbientLight, env.ambient),
            (RenderKey::PointLight, env.point_light),
            (RenderKey::ScreenLight, env.screen_light),
            (RenderKey::Spot, env.spot),
        ];
        for (key, light) in lights {
            self.graph.update_material(key, |m| {
                m.emissive = light.color;
                m.emissive_intensity = light.intensity;
            });
        }
        self.graph.update_material(RenderKey::WindowGlass, |m| {
            m.color = env.window_glass_color;
            m.opacity = env.window_opacity;
        });
        self.graph
            .update_material(RenderKey::Effect(EffectTarget::Moon), |m| {
                m.color = env.moon_color;
                m.emissive = env.moon_emissive;
                m.emissive_intensity = env.moon_intensity;
            });
        self.graph.set_visible(RenderKey::Rain, env.rain_visible);
        self.graph.set_visible(RenderKey::Clouds, env.clouds_visible);
        self.graph.set_visible(RenderKey::SkyStars, env.sky_stars_visible);
    }

    /// Highlight the hovered object and clear every other highlight.
    pub fn set_hovered(&mut self, hovered: Option<SceneObjectId>) {
        if hovered == self.hovered {
            return;
        }
        if let Some(prev) = self.hovered.take() {
            self.set_highlight(prev, false);
        }
        if let Some(next) = hovered {
            self.set_highlight(next, true);
        }
        self.hovered = hovered;
    }

    fn set_highlight(&mut self, id: SceneObjectId, on: bool) {
        let (color, intensity) = self
            .highlights
            .get(&id)
            .copied()
            .unwrap_or((Rgb::BLACK, 0.0));
        let key = RenderKey::Object(id);
        self.graph.set_highlighted(key, on);
        self.graph.update_material(key, |m| {
            if on {
                m.emissive = color;
                m.emissive_intensity = intensity;
            } else {
                m.emissive = Rgb::BLACK;
                m.emissive_intensity = 0.0;
            }
        });
    }

    /// Nearest interactive object along `ray`.
    pub fn pick(&self, ray: &Ray) -> Option<SceneObjectId> {
        match self.graph.pick(ray)?.key {
            RenderKey::Object(id) => Some(id),
            _ => None,
        }
    }

    /// Remove an object's body so its updates are skipped. Returns false if it was not mounted.
    pub fn unmount_object(&mut self, id: SceneObjectId) -> bool {
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.graph.unmount(RenderKey::Object(id))
    }

    /// Put an object's body back at its base pose.
    pub fn remount_object(&mut self, object: &SceneObject) {
        let key = RenderKey::Object(object.id);
        self.graph.mount(key, object.base, Material::new(object.color));
        self.graph.set_pick_bounds(key, object.bounds);
    }
}

/// Base pose of a primitive at `local` inside `group`.
fn child(group: &Transform, local: Vec3) -> Transform {
    Transform::from_position_rotation(group.transform_point(local), group.rotation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationEngine;
    use crate::tier::TierProfile;
    use crate::weather::derive_environment;

    fn mounted() -> (RenderAdapter, AnimationEngine) {
        let objects = SceneObject::catalogue();
        let tables = AmbientTables::generate(9, TierProfile::desktop().ambient_counts());
        let mut adapter = RenderAdapter::new();
        adapter.mount(&objects, &tables);
        (adapter, AnimationEngine::new(tables, &objects))
    }

    #[test]
    fn rain_batch_has_tier_count() {
        let (adapter, _) = mounted();
        let batch = adapter.graph().batch(RenderKey::Rain).map(|b| b.len());
        assert_eq!(batch, Some(100));
    }

    #[test]
    fn unmounted_targets_are_skipped_and_resume_after_remount() {
        let (mut adapter, engine) = mounted();
        let env = derive_environment(false);
        let full = adapter.apply_frame(&engine.tick(1.0, &env));

        assert!(adapter.unmount_object(SceneObjectId::Avatar));
        let partial = adapter.apply_frame(&engine.tick(1.5, &env));
        assert_eq!(partial, full - 1);

        let avatar = SceneObject::catalogue()[0];
        adapter.remount_object(&avatar);
        assert_eq!(adapter.apply_frame(&engine.tick(2.0, &env)), full);
    }

    #[test]
    fn hands_follow_breathing() {
        let (mut adapter, engine) = mounted();
        let t = 0.3;
        adapter.apply_frame(&engine.tick(t, &derive_environment(false)));
        let hand = adapter
            .graph()
            .pose(RenderKey::Effect(EffectTarget::Hand(0)))
            .map(|p| p.position.y)
            .unwrap_or(f32::NAN);
        let expected = 0.5 + 0.1 + crate::animation::breathing(t) + crate::animation::hand_bob(t, 0);
        assert!((hand - expected).abs() < 1e-5, "{hand} vs {expected}");
    }

    #[test]
    fn environment_toggles_weather_visuals() {
        let (mut adapter, _) = mounted();
        adapter.apply_environment(&derive_environment(true));
        let g = adapter.graph();
        assert_eq!(g.is_visible(RenderKey::Rain), Some(true));
        assert_eq!(g.is_visible(RenderKey::Clouds), Some(true));
        assert_eq!(g.is_visible(RenderKey::SkyStars), Some(false));
        let glass = g.material(RenderKey::WindowGlass).map(|m| m.color.to_hex());
        assert_eq!(glass, Some(0x1a2a4a));
        let ambient = g.material(RenderKey::AmbientLight).map(|m| m.emissive_intensity);
        assert_eq!(ambient, Some(0.1));
    }

    #[test]
    fn hover_moves_highlight() {
        let (mut adapter, _) = mounted();
        adapter.set_hovered(Some(SceneObjectId::Console));
        let g = adapter.graph();
        assert_eq!(g.is_highlighted(RenderKey::Object(SceneObjectId::Console)), Some(true));
        let m = g.material(RenderKey::Object(SceneObjectId::Console));
        assert_eq!(m.map(|m| m.emissive.to_hex()), Some(0x8b5cf6));

        adapter.set_hovered(Some(SceneObjectId::Window));
        let g = adapter.graph();
        assert_eq!(g.is_highlighted(RenderKey::Object(SceneObjectId::Console)), Some(false));
        assert_eq!(g.is_highlighted(RenderKey::Object(SceneObjectId::Window)), Some(true));
    }

    #[test]
    fn picking_finds_the_monitor_from_the_front() {
        let (adapter, _) = mounted();
        let ray = Ray::new(Vec3::new(0.0, 1.3, 2.0), -Vec3::Z);
        assert_eq!(adapter.pick(&ray), Some(SceneObjectId::Monitor));
    }
}
