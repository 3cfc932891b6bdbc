//! Common ECS components for placed primitives.

use glam::Vec3;

use crate::{Transform, TransformRaw};

/// Linear RGB colour in 0..1.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Pose the primitive was placed with. Animation offsets are applied on top of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasePose(pub Transform);

/// Standard surface parameters the animation engine may change per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl Material {
    pub fn new(color: Rgb) -> Self {
        Self {
            color,
            emissive: Rgb::BLACK,
            emissive_intensity: 0.0,
            opacity: 1.0,
        }
    }

    pub fn glowing(color: Rgb, emissive_intensity: f32) -> Self {
        Self {
            color,
            emissive: color,
            emissive_intensity,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Rgb::WHITE)
    }
}

/// Whether the primitive is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visible(pub bool);

impl Default for Visible {
    fn default() -> Self {
        Self(true)
    }
}

/// Pointer highlight state for interactive groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Highlighted(pub bool);

/// Axis-aligned pick bounds in the primitive's local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickBounds {
    pub half_extents: Vec3,
}

impl PickBounds {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }
}

/// Batched instance transforms drawn with one draw call.
#[derive(Debug, Clone, Default)]
pub struct InstanceBatch {
    pub instances: Vec<TransformRaw>,
}

impl InstanceBatch {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            instances: Vec::with_capacity(count),
        }
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
