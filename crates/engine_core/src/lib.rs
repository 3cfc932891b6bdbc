//! Shared building blocks for the room: transforms, the components placed primitives carry,
//! the scene clock, and the cancellable timer queue.

pub mod components;
pub mod time;
pub mod timer;
pub mod transform;

pub use components::*;
pub use time::*;
pub use timer::*;
pub use transform::*;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use hecs::{Entity, World};
