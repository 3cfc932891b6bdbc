//! Camera navigation: smoothed travel between viewpoints plus orbit controls for the idle view.

use engine_core::Transform;
use glam::{Mat4, Vec3};

/// A viewpoint: where the camera sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTarget {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraTarget {
    pub const fn new(position: Vec3, look_at: Vec3) -> Self {
        Self { position, look_at }
    }
}

/// How far the camera closes on its target each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Smoothing {
    /// Fixed fraction per tick. Wall-clock speed depends on the tick rate.
    PerTick(f32),
    /// Exponential rate per second, converted with the tick's delta.
    PerSecond(f32),
}

impl Smoothing {
    /// Lerp factor for a tick lasting `dt` seconds, clamped to `0..=1`.
    pub fn factor(&self, dt: f32) -> f32 {
        match *self {
            Smoothing::PerTick(alpha) => alpha.clamp(0.0, 1.0),
            Smoothing::PerSecond(rate) => (1.0 - (-rate.max(0.0) * dt.max(0.0)).exp()).clamp(0.0, 1.0),
        }
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Smoothing::PerTick(0.04)
    }
}

/// Perspective camera that eases toward a target viewpoint.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Rendered camera transform (position and orientation).
    pub transform: Transform,
    /// Point the camera currently looks at.
    look_at: Vec3,
    /// Viewpoint the camera is travelling toward.
    target: CameraTarget,
    smoothing: Smoothing,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl CameraController {
    /// Create a camera mounted at `home`. Mounting snaps without smoothing.
    pub fn new(home: CameraTarget, smoothing: Smoothing, fov_degrees: f32) -> Self {
        let mut camera = Self {
            transform: Transform::from_position(home.position),
            look_at: home.look_at,
            target: home,
            smoothing,
            fov_degrees,
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        };
        camera.mount(home);
        camera
    }

    /// Place the camera directly at `home`.
    pub fn mount(&mut self, home: CameraTarget) {
        self.transform.position = home.position;
        self.look_at = home.look_at;
        self.target = home;
        self.transform.look_at(self.look_at, Vec3::Y);
    }

    /// Update aspect ratio (call on viewport resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Change the viewpoint the camera travels toward.
    pub fn set_target(&mut self, target: CameraTarget) {
        self.target = target;
    }

    pub fn target(&self) -> CameraTarget {
        self.target
    }

    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Step toward the target. The orientation is re-applied every tick, even when settled.
    pub fn advance(&mut self, dt: f32) {
        let alpha = self.smoothing.factor(dt);
        self.transform.position = self.transform.position.lerp(self.target.position, alpha);
        self.look_at = self.look_at.lerp(self.target.look_at, alpha);
        self.transform.look_at(self.look_at, Vec3::Y);
    }

    /// Get camera position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Point the camera currently looks at.
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Distance from the current position to the target position.
    pub fn distance_to_target(&self) -> f32 {
        self.transform.position.distance(self.target.position)
    }

    /// Get the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.transform.position, self.look_at, Vec3::Y)
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Limits and speeds for [`OrbitControls`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitSettings {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Polar angle limits in radians, measured down from +Y.
    pub min_polar: f32,
    pub max_polar: f32,
    pub rotate_speed: f32,
    pub zoom_enabled: bool,
    /// Auto-rotate speed; 2.0 is one revolution per 30 seconds.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 10.0,
            min_polar: 0.5,
            max_polar: std::f32::consts::PI / 2.2,
            rotate_speed: 1.0,
            zoom_enabled: true,
            auto_rotate_speed: 0.3,
        }
    }
}

/// Spherical orbit around a fixed centre. Pan is not supported.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    home: CameraTarget,
    azimuth: f32,
    polar: f32,
    distance: f32,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings, home: CameraTarget) -> Self {
        let mut orbit = Self {
            settings,
            home,
            azimuth: 0.0,
            polar: 0.0,
            distance: 1.0,
        };
        orbit.reset();
        orbit
    }

    /// Return to the home viewpoint.
    pub fn reset(&mut self) {
        let offset = self.home.position - self.home.look_at;
        self.distance = offset.length().max(f32::EPSILON);
        self.azimuth = offset.x.atan2(offset.z);
        self.polar = (offset.y / self.distance).clamp(-1.0, 1.0).acos();
        self.clamp();
    }

    /// Rotate from a pointer drag of `delta` pixels on a viewport `viewport_height` pixels tall.
    pub fn process_drag(&mut self, delta: glam::Vec2, viewport_height: f32) {
        let h = viewport_height.max(1.0);
        self.azimuth -= std::f32::consts::TAU * delta.x / h * self.settings.rotate_speed;
        self.polar -= std::f32::consts::TAU * delta.y / h * self.settings.rotate_speed;
        self.clamp();
    }

    /// Dolly in (positive steps) or out (negative steps).
    pub fn process_zoom(&mut self, steps: f32) {
        if !self.settings.zoom_enabled {
            return;
        }
        self.distance *= 0.95_f32.powf(steps);
        self.clamp();
    }

    /// Advance auto-rotation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let angle = std::f32::consts::TAU / 60.0 * self.settings.auto_rotate_speed * dt;
        self.azimuth -= angle;
    }

    /// Current orbit viewpoint.
    pub fn viewpoint(&self) -> CameraTarget {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        let offset = Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance;
        CameraTarget::new(self.home.look_at + offset, self.home.look_at)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    fn clamp(&mut self) {
        let s = &self.settings;
        self.polar = self.polar.clamp(s.min_polar, s.max_polar);
        self.distance = self.distance.clamp(s.min_distance, s.max_distance);
    }
}
