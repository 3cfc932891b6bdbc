//! Weather: one boolean and everything derived from it.

use audio::Track;
use engine_core::Rgb;

/// Colour stop in HSL, as the host page paints its background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    /// Saturation in percent.
    pub saturation: f32,
    /// Lightness in percent.
    pub lightness: f32,
}

impl Hsl {
    pub const fn new(hue: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    pub fn to_css(self) -> String {
        format!("hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// A light's derived parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightParams {
    pub intensity: f32,
    pub color: Rgb,
}

impl LightParams {
    const fn new(intensity: f32, hex: u32) -> Self {
        Self {
            intensity,
            color: Rgb::from_hex(hex),
        }
    }
}

/// Every weather-dependent parameter of the scene, recomputed as a whole on each toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub is_raining: bool,
    pub ambient: LightParams,
    /// Desk lamp bulb light.
    pub point_light: LightParams,
    /// Green glow cast by the monitor.
    pub screen_light: LightParams,
    pub spot: LightParams,
    /// Whether the window stars twinkle. While false they sit at `dimmed_star_intensity`.
    pub stars_visible: bool,
    pub dimmed_star_intensity: f32,
    pub moon_color: Rgb,
    pub moon_emissive: Rgb,
    /// Base moon glow. A dry moon pulses around it.
    pub moon_intensity: f32,
    pub window_glass_color: Rgb,
    pub window_opacity: f32,
    pub rain_visible: bool,
    pub clouds_visible: bool,
    /// Background star field around the room.
    pub sky_stars_visible: bool,
    /// Screen-space dust overlay.
    pub dust_visible: bool,
    pub audio_track: Track,
    /// Top, middle and bottom stops of the page background.
    pub background_gradient: [Hsl; 3],
}

/// Derive the environment for the given weather.
pub fn derive_environment(is_raining: bool) -> Environment {
    if is_raining {
        Environment {
            is_raining,
            ambient: LightParams::new(0.1, 0x4a5568),
            point_light: LightParams::new(1.5, 0xe0d8c8),
            screen_light: LightParams::new(0.3, 0x4ade80),
            spot: LightParams::new(0.2, 0x6b7280),
            stars_visible: false,
            dimmed_star_intensity: 0.1,
            moon_color: Rgb::from_hex(0x999999),
            moon_emissive: Rgb::from_hex(0x666666),
            moon_intensity: 0.1,
            window_glass_color: Rgb::from_hex(0x1a2a4a),
            window_opacity: 0.95,
            rain_visible: true,
            clouds_visible: true,
            sky_stars_visible: false,
            dust_visible: false,
            audio_track: Track::Rain,
            background_gradient: [
                Hsl::new(220.0, 30.0, 6.0),
                Hsl::new(220.0, 25.0, 10.0),
                Hsl::new(220.0, 30.0, 8.0),
            ],
        }
    } else {
        Environment {
            is_raining,
            ambient: LightParams::new(0.15, 0x6366f1),
            point_light: LightParams::new(2.0, 0xfef08a),
            screen_light: LightParams::new(0.5, 0x4ade80),
            spot: LightParams::new(0.3, 0xa855f7),
            stars_visible: true,
            dimmed_star_intensity: 0.1,
            moon_color: Rgb::from_hex(0xfef3c7),
            moon_emissive: Rgb::from_hex(0xfef3c7),
            moon_intensity: 0.4,
            window_glass_color: Rgb::from_hex(0x0c1445),
            window_opacity: 0.9,
            rain_visible: false,
            clouds_visible: false,
            sky_stars_visible: true,
            dust_visible: true,
            audio_track: Track::Ambient,
            background_gradient: [
                Hsl::new(230.0, 40.0, 4.0),
                Hsl::new(260.0, 35.0, 8.0),
                Hsl::new(230.0, 35.0, 6.0),
            ],
        }
    }
}

/// The only stored weather state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Weather {
    is_raining: bool,
}

impl Weather {
    pub fn new(is_raining: bool) -> Self {
        Self { is_raining }
    }

    pub fn is_raining(&self) -> bool {
        self.is_raining
    }

    /// Flip the weather and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.is_raining = !self.is_raining;
        log::debug!("Weather now {}", if self.is_raining { "raining" } else { "clear" });
        self.is_raining
    }

    pub fn environment(&self) -> Environment {
        derive_environment(self.is_raining)
    }
}
