//! Night room: an explorable room scene with clickable furniture, a travelling camera,
//! weather-driven lighting and audio, and ambient micro-animations.
//!
//! [`RoomScene`] owns every controller. The host calls [`RoomScene::tick`] once per frame,
//! forwards pointer and keyboard input, and reads a [`UiSnapshot`] for its overlay.

pub mod animation;
pub mod config;
pub mod focus;
pub mod objects;
pub mod render_adapter;
pub mod scene;
pub mod tier;
pub mod weather;

pub use animation::{AnimationEngine, AnimationFrame, EffectTarget, VisualParams};
pub use config::{CameraSmoothing, SceneConfig};
pub use focus::{FocusMachine, FocusPhase, FocusState, CLOSE_DELAY, SELECT_DELAY};
pub use objects::{ModalCatalog, ModalDescriptor, SceneObject, SceneObjectId};
pub use render_adapter::{RenderAdapter, RenderKey};
pub use scene::{RoomScene, SceneError, SceneOptions, UiSnapshot};
pub use tier::{DeviceTier, TierProfile};
pub use weather::{derive_environment, Environment, Weather};
