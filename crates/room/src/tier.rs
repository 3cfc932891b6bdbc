//! Device tier classification and the per-tier constants selected once at mount.

use glam::Vec3;
use procgen::AmbientCounts;
use renderer::{CameraTarget, OrbitSettings};
use serde::{Deserialize, Serialize};

use crate::objects::SceneObjectId;

/// Viewports narrower than this many pixels use the mobile profile.
pub const DEFAULT_MOBILE_BREAKPOINT: u32 = 768;

/// Point every idle camera looks at.
pub const DEFAULT_LOOK_AT: Vec3 = Vec3::new(0.0, 0.8, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceTier {
    Desktop,
    Mobile,
}

impl DeviceTier {
    /// Classify a viewport by width.
    pub fn classify(width: u32, breakpoint: u32) -> Self {
        if width < breakpoint {
            DeviceTier::Mobile
        } else {
            DeviceTier::Desktop
        }
    }
}

/// Everything that differs between desktop and mobile. Read-only after mount.
#[derive(Debug, Clone, PartialEq)]
pub struct TierProfile {
    pub tier: DeviceTier,
    pub default_camera: CameraTarget,
    pub fov_degrees: f32,
    pub max_pixel_ratio: f32,
    pub sky_star_count: usize,
    pub dust_count: usize,
    pub rain_count: usize,
    pub orbit: OrbitSettings,
    focus_targets: [CameraTarget; 6],
}

impl TierProfile {
    pub fn for_tier(tier: DeviceTier) -> Self {
        match tier {
            DeviceTier::Desktop => Self::desktop(),
            DeviceTier::Mobile => Self::mobile(),
        }
    }

    pub fn desktop() -> Self {
        Self {
            tier: DeviceTier::Desktop,
            default_camera: CameraTarget::new(Vec3::new(5.0, 4.0, 5.0), DEFAULT_LOOK_AT),
            fov_degrees: 50.0,
            max_pixel_ratio: 2.0,
            sky_star_count: 1000,
            dust_count: 30,
            rain_count: 100,
            orbit: OrbitSettings {
                min_distance: 3.0,
                max_distance: 10.0,
                rotate_speed: 1.0,
                zoom_enabled: true,
                ..OrbitSettings::default()
            },
            focus_targets: focus_targets([
                Vec3::new(1.0, 1.2, 1.5),
                Vec3::new(0.0, 1.5, 1.0),
                Vec3::new(-0.5, 1.5, 0.5),
                Vec3::new(2.0, 0.8, 2.0),
                Vec3::new(0.5, 1.5, 0.5),
                Vec3::new(-0.5, 1.2, 0.0),
            ]),
        }
    }

    pub fn mobile() -> Self {
        Self {
            tier: DeviceTier::Mobile,
            default_camera: CameraTarget::new(Vec3::new(7.0, 5.0, 7.0), DEFAULT_LOOK_AT),
            fov_degrees: 55.0,
            max_pixel_ratio: 1.5,
            sky_star_count: 500,
            dust_count: 15,
            rain_count: 50,
            orbit: OrbitSettings {
                min_distance: 5.0,
                max_distance: 12.0,
                rotate_speed: 0.5,
                zoom_enabled: false,
                ..OrbitSettings::default()
            },
            focus_targets: focus_targets([
                Vec3::new(1.5, 1.4, 2.0),
                Vec3::new(0.5, 1.7, 1.5),
                Vec3::new(-0.2, 1.7, 1.0),
                Vec3::new(2.5, 1.0, 2.5),
                Vec3::new(1.0, 1.7, 1.0),
                Vec3::new(-0.2, 1.4, 0.5),
            ]),
        }
    }

    /// Camera viewpoint used while `id` is selected.
    pub fn focus_target(&self, id: SceneObjectId) -> CameraTarget {
        self.focus_targets[slot(id)]
    }

    pub fn ambient_counts(&self) -> AmbientCounts {
        AmbientCounts {
            rain_drops: self.rain_count,
            sky_stars: self.sky_star_count,
            dust_motes: self.dust_count,
        }
    }
}

fn slot(id: SceneObjectId) -> usize {
    match id {
        SceneObjectId::Avatar => 0,
        SceneObjectId::Monitor => 1,
        SceneObjectId::WorldMap => 2,
        SceneObjectId::Console => 3,
        SceneObjectId::Window => 4,
        SceneObjectId::Bookshelf => 5,
    }
}

/// Pair tier-specific eye positions with the shared look-at points.
fn focus_targets(positions: [Vec3; 6]) -> [CameraTarget; 6] {
    let look_at = [
        Vec3::new(0.0, 0.7, 0.0),
        Vec3::new(0.0, 1.1, -0.8),
        Vec3::new(-1.9, 1.2, 0.0),
        Vec3::new(1.2, 0.15, 1.2),
        Vec3::new(1.9, 1.3, 0.0),
        Vec3::new(-1.9, 0.8, -0.8),
    ];
    std::array::from_fn(|i| CameraTarget::new(positions[i], look_at[i]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive() {
        assert_eq!(DeviceTier::classify(767, 768), DeviceTier::Mobile);
        assert_eq!(DeviceTier::classify(768, 768), DeviceTier::Desktop);
        assert_eq!(DeviceTier::classify(1920, 768), DeviceTier::Desktop);
    }

    #[test]
    fn focus_targets_share_look_at_across_tiers() {
        let desktop = TierProfile::desktop();
        let mobile = TierProfile::mobile();
        for id in SceneObjectId::ALL {
            assert_eq!(desktop.focus_target(id).look_at, mobile.focus_target(id).look_at);
            assert_ne!(desktop.focus_target(id).position, mobile.focus_target(id).position);
        }
        assert_eq!(
            desktop.focus_target(SceneObjectId::Monitor),
            CameraTarget::new(Vec3::new(0.0, 1.5, 1.0), Vec3::new(0.0, 1.1, -0.8))
        );
    }

    #[test]
    fn mobile_halves_particle_counts() {
        let d = TierProfile::desktop().ambient_counts();
        let m = TierProfile::mobile().ambient_counts();
        assert_eq!((d.rain_drops, m.rain_drops), (100, 50));
        assert_eq!((d.sky_stars, m.sky_stars), (1000, 500));
        assert_eq!((d.dust_motes, m.dust_motes), (30, 15));
        assert!(!TierProfile::mobile().orbit.zoom_enabled);
    }
}
