//! Rendering-side plumbing for the night room: the navigation camera, pointer picking, and the
//! scene graph that animation frames are applied to.
//!
//! Drawing itself belongs to the host renderer; this crate only owns the data it reads.

pub mod camera;
pub mod picking;
pub mod scene_graph;

pub use camera::*;
pub use picking::*;
pub use scene_graph::*;
