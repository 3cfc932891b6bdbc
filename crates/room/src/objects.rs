//! The interactive objects of the room: placement, capabilities, and modal content.

use std::collections::HashMap;

use engine_core::{PickBounds, Rgb, Transform, Vec3};
use serde::{Deserialize, Serialize};

/// Interactive objects in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneObjectId {
    Avatar,
    Monitor,
    WorldMap,
    Console,
    Window,
    Bookshelf,
}

impl SceneObjectId {
    pub const ALL: [SceneObjectId; 6] = [
        SceneObjectId::Avatar,
        SceneObjectId::Monitor,
        SceneObjectId::WorldMap,
        SceneObjectId::Console,
        SceneObjectId::Window,
        SceneObjectId::Bookshelf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneObjectId::Avatar => "avatar",
            SceneObjectId::Monitor => "monitor",
            SceneObjectId::WorldMap => "worldmap",
            SceneObjectId::Console => "console",
            SceneObjectId::Window => "window",
            SceneObjectId::Bookshelf => "bookshelf",
        }
    }
}

impl std::fmt::Display for SceneObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    pub id: SceneObjectId,
    /// Placement of the object's group.
    pub base: Transform,
    /// Accepts hover and click.
    pub interactive: bool,
    /// Runs its micro-animations. A static object keeps only its base glow.
    pub animated: bool,
    /// Pick volume around the group origin.
    pub bounds: PickBounds,
    /// Surface colour of the group's main body.
    pub color: Rgb,
    /// Emissive colour and intensity shown while hovered.
    pub highlight: (Rgb, f32),
}

impl SceneObject {
    /// The furniture as placed in the room.
    pub fn catalogue() -> Vec<SceneObject> {
        use std::f32::consts::FRAC_PI_2;
        vec![
            SceneObject {
                id: SceneObjectId::Avatar,
                base: Transform::from_position(Vec3::new(0.0, 0.5, 0.3)),
                interactive: true,
                animated: true,
                bounds: PickBounds::new(Vec3::new(0.35, 0.6, 0.35)),
                color: Rgb::from_hex(0x6366f1),
                highlight: (Rgb::from_hex(0x6366f1), 0.3),
            },
            SceneObject {
                id: SceneObjectId::Monitor,
                base: Transform::from_position(Vec3::new(0.0, 1.1, -0.8)),
                interactive: true,
                animated: true,
                bounds: PickBounds::new(Vec3::new(0.6, 0.4, 0.06)),
                color: Rgb::from_hex(0x2a2a3e),
                highlight: (Rgb::from_hex(0x6366f1), 0.2),
            },
            SceneObject {
                id: SceneObjectId::WorldMap,
                base: Transform::from_position_yaw(Vec3::new(-1.9, 1.2, 0.0), FRAC_PI_2),
                interactive: true,
                animated: false,
                bounds: PickBounds::new(Vec3::new(0.6, 0.4, 0.04)),
                color: Rgb::from_hex(0x2d4a70),
                highlight: (Rgb::from_hex(0x60a5fa), 0.3),
            },
            SceneObject {
                id: SceneObjectId::Console,
                base: Transform::from_position_yaw(Vec3::new(1.2, 0.15, 1.2), -0.3),
                interactive: true,
                animated: true,
                bounds: PickBounds::new(Vec3::new(0.35, 0.1, 0.25)),
                color: Rgb::from_hex(0x1a1a2e),
                highlight: (Rgb::from_hex(0x8b5cf6), 0.3),
            },
            SceneObject {
                id: SceneObjectId::Window,
                base: Transform::from_position_yaw(Vec3::new(1.9, 1.3, 0.0), -FRAC_PI_2),
                interactive: true,
                animated: true,
                bounds: PickBounds::new(Vec3::new(0.6, 0.5, 0.05)),
                color: Rgb::from_hex(0x4a3728),
                highlight: (Rgb::from_hex(0xf59e0b), 0.2),
            },
            SceneObject {
                id: SceneObjectId::Bookshelf,
                base: Transform::from_position_yaw(Vec3::new(-1.9, 0.8, -0.8), FRAC_PI_2),
                interactive: true,
                animated: true,
                bounds: PickBounds::new(Vec3::new(0.4, 0.6, 0.125)),
                color: Rgb::from_hex(0x4a3728),
                highlight: (Rgb::from_hex(0xf59e0b), 0.2),
            },
        ]
    }
}

/// Modal content shown for a focused object. Opaque to the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalDescriptor {
    pub title: String,
    pub content: String,
    pub icon: String,
}

impl ModalDescriptor {
    pub fn new(title: &str, content: &str, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            icon: icon.to_string(),
        }
    }
}

/// Modal content keyed by object, supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ModalCatalog {
    entries: HashMap<SceneObjectId, ModalDescriptor>,
}

impl ModalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: SceneObjectId, modal: ModalDescriptor) {
        self.entries.insert(id, modal);
    }

    pub fn get(&self, id: SceneObjectId) -> Option<&ModalDescriptor> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Placeholder copy used when the config supplies none.
    pub fn placeholder() -> Self {
        let mut catalog = Self::new();
        catalog.insert(
            SceneObjectId::Avatar,
            ModalDescriptor::new("Behind the Screen", "Who sits at this desk.", "user"),
        );
        catalog.insert(
            SceneObjectId::Monitor,
            ModalDescriptor::new("Voice in the Silence", "Where the code gets written.", "monitor"),
        );
        catalog.insert(
            SceneObjectId::WorldMap,
            ModalDescriptor::new("Distant Dreams", "Places worth working from someday.", "map-pin"),
        );
        catalog.insert(
            SceneObjectId::Console,
            ModalDescriptor::new("Hobbies & Recharge", "The reset button.", "gamepad-2"),
        );
        catalog.insert(
            SceneObjectId::Window,
            ModalDescriptor::new("Wordless Dialogue", "Past midnight, the focus gets sharp.", "cloud"),
        );
        catalog.insert(
            SceneObjectId::Bookshelf,
            ModalDescriptor::new("Projects", "Things built so far.", "book-open"),
        );
        catalog
    }
}

impl FromIterator<(SceneObjectId, ModalDescriptor)> for ModalCatalog {
    fn from_iter<I: IntoIterator<Item = (SceneObjectId, ModalDescriptor)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
