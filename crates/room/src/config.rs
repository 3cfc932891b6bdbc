//! Scene settings. Loaded from scene.ron at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use renderer::Smoothing;

use crate::objects::{ModalCatalog, ModalDescriptor, SceneObjectId};
use crate::tier::{DeviceTier, DEFAULT_MOBILE_BREAKPOINT};

/// Camera smoothing as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CameraSmoothing {
    /// Fraction of the remaining distance closed each tick.
    PerTick(f32),
    /// Exponential rate per second, independent of tick rate.
    PerSecond(f32),
}

impl Default for CameraSmoothing {
    fn default() -> Self {
        CameraSmoothing::PerTick(0.04)
    }
}

impl From<CameraSmoothing> for Smoothing {
    fn from(s: CameraSmoothing) -> Self {
        match s {
            CameraSmoothing::PerTick(alpha) => Smoothing::PerTick(alpha),
            CameraSmoothing::PerSecond(rate) => Smoothing::PerSecond(rate),
        }
    }
}

/// Scene settings. Loaded from `scene.ron` in the current directory. Never holds session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Seed for every ambient table.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Viewport size in pixels, used once for tier classification.
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),
    /// Skip classification and use this tier.
    #[serde(default)]
    pub force_tier: Option<DeviceTier>,
    /// Widths below this are mobile.
    #[serde(default = "default_breakpoint")]
    pub mobile_breakpoint: u32,
    #[serde(default)]
    pub camera_smoothing: CameraSmoothing,
    /// Lo-fi loop for clear nights.
    #[serde(default)]
    pub ambient_track: Option<PathBuf>,
    /// Rain loop.
    #[serde(default)]
    pub rain_track: Option<PathBuf>,
    /// Modal copy per object. Objects left out get placeholder copy.
    #[serde(default)]
    pub modals: HashMap<SceneObjectId, ModalDescriptor>,
    /// Length of the headless session.
    #[serde(default = "default_session_seconds")]
    pub session_seconds: f32,
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: f64,
}

fn default_seed() -> u64 {
    0x6e69_6768_74
}
fn default_viewport() -> (u32, u32) {
    (1280, 720)
}
fn default_breakpoint() -> u32 {
    DEFAULT_MOBILE_BREAKPOINT
}
fn default_session_seconds() -> f32 {
    8.0
}
fn default_tick_rate() -> f64 {
    60.0
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            viewport: default_viewport(),
            force_tier: None,
            mobile_breakpoint: default_breakpoint(),
            camera_smoothing: CameraSmoothing::default(),
            ambient_track: None,
            rain_track: None,
            modals: HashMap::new(),
            session_seconds: default_session_seconds(),
            tick_rate_hz: default_tick_rate(),
        }
    }
}

impl SceneConfig {
    /// Load config from `scene.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => {
                    log::info!("Loaded scene config from {:?}", path);
                    return c;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::info!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `scene.ron`. Logs on error.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }

    /// Tier to run with: the forced one, or the viewport's classification.
    pub fn tier(&self) -> DeviceTier {
        self.force_tier
            .unwrap_or_else(|| DeviceTier::classify(self.viewport.0, self.mobile_breakpoint))
    }

    /// Configured modal copy, with placeholders for objects it leaves out.
    pub fn modal_catalog(&self) -> ModalCatalog {
        let mut catalog = ModalCatalog::placeholder();
        for (id, modal) in &self.modals {
            catalog.insert(*id, modal.clone());
        }
        catalog
    }

    pub fn modal(&self, id: SceneObjectId) -> Option<&ModalDescriptor> {
        self.modals.get(&id)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("scene.ron")
}
