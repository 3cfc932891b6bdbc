//! The room scene: owns every controller and runs them from one tick.

use std::time::Duration;

use audio::{AudioChannelState, AudioController, AudioOutput};
use engine_core::{Time, Vec2};
use input::{InputState, MouseButton, PointerEvent, PointerTracker};
use procgen::AmbientTables;
use renderer::{CameraController, OrbitControls, Ray, Smoothing};

use crate::animation::{AnimationEngine, DustParams};
use crate::config::SceneConfig;
use crate::focus::{FocusEvent, FocusMachine, FocusState};
use crate::objects::{ModalCatalog, ModalDescriptor, SceneObject, SceneObjectId};
use crate::render_adapter::{RenderAdapter, RenderKey};
use crate::tier::{DeviceTier, TierProfile};
use crate::weather::{Environment, Weather};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("viewport {0}x{1} has no area")]
    EmptyViewport(u32, u32),
    #[error("scene has been torn down")]
    TornDown,
    #[error("object {0} is not mounted")]
    NotMounted(SceneObjectId),
    #[error("object {0} is already mounted")]
    AlreadyMounted(SceneObjectId),
}

/// Everything needed to mount a scene.
#[derive(Debug, Clone)]
pub struct SceneOptions {
    pub seed: u64,
    pub viewport: (u32, u32),
    pub tier: DeviceTier,
    pub smoothing: Smoothing,
    pub modals: ModalCatalog,
}

impl SceneOptions {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            seed: config.seed,
            viewport: config.viewport,
            tier: config.tier(),
            smoothing: config.camera_smoothing.into(),
            modals: config.modal_catalog(),
        }
    }
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self::from_config(&SceneConfig::default())
    }
}

/// What the UI boundary reads each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UiSnapshot {
    pub selected: Option<SceneObjectId>,
    pub hovered: Option<SceneObjectId>,
    pub modal_open: bool,
    /// Copy for the open modal.
    pub modal: Option<ModalDescriptor>,
    pub is_raining: bool,
    pub muted: bool,
    pub orbit_enabled: bool,
    /// "Click objects to explore" hint, shown while nothing is selected.
    pub show_hint: bool,
}

pub struct RoomScene<O: AudioOutput> {
    profile: TierProfile,
    objects: Vec<SceneObject>,
    modals: ModalCatalog,
    viewport: Vec2,
    time: Time,
    camera: CameraController,
    orbit: OrbitControls,
    focus: FocusMachine,
    weather: Weather,
    environment: Environment,
    audio: AudioController<O>,
    animation: AnimationEngine,
    adapter: RenderAdapter,
    pointer: PointerTracker<SceneObjectId>,
    dust: Vec<DustParams>,
    torn_down: bool,
}

impl<O: AudioOutput> RoomScene<O> {
    /// Generate the ambient tables for the tier and place the room.
    pub fn mount(options: SceneOptions, output: O) -> Result<Self, SceneError> {
        let (width, height) = options.viewport;
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyViewport(width, height));
        }
        let profile = TierProfile::for_tier(options.tier);
        log::info!(
            "Mounting room for {:?} ({}x{}, pixel ratio capped at {})",
            profile.tier,
            width,
            height,
            profile.max_pixel_ratio
        );

        let objects = SceneObject::catalogue();
        let tables = AmbientTables::generate(options.seed, profile.ambient_counts());

        let mut adapter = RenderAdapter::new();
        adapter.mount(&objects, &tables);

        let weather = Weather::default();
        let environment = weather.environment();
        adapter.apply_environment(&environment);

        let mut camera =
            CameraController::new(profile.default_camera, options.smoothing, profile.fov_degrees);
        camera.set_aspect(width, height);
        let orbit = OrbitControls::new(profile.orbit, profile.default_camera);

        Ok(Self {
            focus: FocusMachine::new(&objects),
            animation: AnimationEngine::new(tables, &objects),
            audio: AudioController::new(output),
            pointer: PointerTracker::new(),
            viewport: Vec2::new(width as f32, height as f32),
            time: Time::new(),
            dust: Vec::new(),
            torn_down: false,
            modals: options.modals,
            profile,
            objects,
            adapter,
            camera,
            orbit,
            weather,
            environment,
        })
    }

    /// Advance the scene by `dt`: timers, ambient animation, then the camera.
    pub fn tick(&mut self, dt: Duration) -> Result<(), SceneError> {
        if self.torn_down {
            return Err(SceneError::TornDown);
        }
        self.time.advance(dt);
        let now = self.time.elapsed();
        let dt_secs = dt.as_secs_f32();

        for event in self.focus.update(now) {
            if let FocusEvent::Released(_) = event {
                self.orbit.reset();
                // Hover tracked during the selection was held back; hand it over now.
                if let Some(id) = self.pointer.hovered() {
                    self.focus.hover_enter(id);
                }
                self.adapter.set_hovered(self.focus.hovered());
            }
        }
        self.audio.update(now);

        let frame = self
            .animation
            .tick(self.time.elapsed_seconds(), &self.environment);
        self.adapter.apply_frame(&frame);
        self.dust = frame.dust;

        if self.focus.orbit_enabled() {
            self.orbit.update(dt_secs);
        }
        let target = self.focus.camera_target(&self.profile, self.orbit.viewpoint());
        self.camera.set_target(target);
        self.camera.advance(dt_secs);
        Ok(())
    }

    /// Feed one frame of window input.
    pub fn handle_input(&mut self, input: &InputState) {
        if self.torn_down {
            return;
        }
        let cursor = input.cursor_position();
        if input.cursor_delta() != Vec2::ZERO || input.is_mouse_pressed(MouseButton::Left) {
            self.pointer_moved(cursor);
        }
        if input.is_mouse_pressed(MouseButton::Left) {
            self.pointer_pressed(cursor);
        }
        let drag = input.drag_delta();
        if drag != Vec2::ZERO {
            self.drag(drag);
        }
        if input.is_mouse_released(MouseButton::Left) {
            self.pointer_released(cursor);
        }
        if input.scroll() != 0.0 {
            self.scroll(input.scroll());
        }
        if input.is_mute_pressed() {
            self.toggle_mute();
        }
        if input.is_weather_pressed() {
            self.toggle_weather();
        }
        if input.is_close_pressed() {
            self.close_modal();
        }
    }

    /// Re-pick under the cursor and deliver enter/leave.
    pub fn pointer_moved(&mut self, cursor: Vec2) {
        let ray = Ray::from_screen(&self.camera, cursor, self.viewport);
        let hit = self.adapter.pick(&ray);
        for event in self.pointer.update_hover(hit) {
            match event {
                PointerEvent::Enter(id) => {
                    self.focus.hover_enter(id);
                }
                PointerEvent::Leave(id) => {
                    self.focus.hover_leave(id);
                }
                PointerEvent::Click(_) => {}
            }
        }
        self.adapter.set_hovered(self.focus.hovered());
    }

    pub fn pointer_pressed(&mut self, cursor: Vec2) {
        self.pointer.press(cursor);
    }

    pub fn pointer_released(&mut self, cursor: Vec2) {
        if let Some(PointerEvent::Click(id)) = self.pointer.release(cursor) {
            self.click(id);
        }
    }

    /// Orbit drag in pixels. Ignored while an object is selected.
    pub fn drag(&mut self, delta: Vec2) {
        if self.focus.orbit_enabled() {
            self.orbit.process_drag(delta, self.viewport.y);
        }
    }

    /// Wheel zoom in lines. Ignored while an object is selected.
    pub fn scroll(&mut self, steps: f32) {
        if self.focus.orbit_enabled() {
            self.orbit.process_zoom(steps);
        }
    }

    /// Select an object. Returns false when ignored.
    pub fn click(&mut self, id: SceneObjectId) -> bool {
        if self.torn_down {
            return false;
        }
        let accepted = self.focus.click(id, self.time.elapsed());
        if accepted {
            self.adapter.set_hovered(None);
        }
        accepted
    }

    /// Close the open modal. Returns false when no modal is open.
    pub fn close_modal(&mut self) -> bool {
        !self.torn_down && self.focus.close(self.time.elapsed())
    }

    /// Flip the weather, re-derive the environment and start the audio crossfade in one step.
    pub fn toggle_weather(&mut self) -> bool {
        if self.torn_down {
            return self.weather.is_raining();
        }
        let is_raining = self.weather.toggle();
        self.environment = self.weather.environment();
        self.adapter.apply_environment(&self.environment);
        self.audio.on_weather_change(is_raining, self.time.elapsed());
        is_raining
    }

    /// Flip mute. Returns the mute state afterwards.
    pub fn toggle_mute(&mut self) -> bool {
        if self.torn_down {
            return self.audio.is_muted();
        }
        self.audio.toggle_mute(self.weather.is_raining())
    }

    /// Remove an object's body from the scene graph. Its animation is skipped until remounted.
    pub fn unmount_object(&mut self, id: SceneObjectId) -> Result<(), SceneError> {
        if self.adapter.unmount_object(id) {
            Ok(())
        } else {
            Err(SceneError::NotMounted(id))
        }
    }

    pub fn remount_object(&mut self, id: SceneObjectId) -> Result<(), SceneError> {
        if self.adapter.graph().is_mounted(RenderKey::Object(id)) {
            return Err(SceneError::AlreadyMounted(id));
        }
        let object = self
            .objects
            .iter()
            .find(|o| o.id == id)
            .copied()
            .ok_or(SceneError::NotMounted(id))?;
        self.adapter.remount_object(&object);
        Ok(())
    }

    pub fn ui_snapshot(&self) -> UiSnapshot {
        let focus = self.focus.state();
        let modal = if focus.modal_open {
            focus.selected.and_then(|id| self.modals.get(id)).cloned()
        } else {
            None
        };
        UiSnapshot {
            selected: focus.selected,
            hovered: focus.hovered,
            modal_open: focus.modal_open,
            modal,
            is_raining: self.weather.is_raining(),
            muted: self.audio.is_muted(),
            orbit_enabled: self.focus.orbit_enabled(),
            show_hint: focus.selected.is_none(),
        }
    }

    /// Stop everything: pending focus timers and fades are cancelled and audio pauses.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.focus.teardown();
        self.audio.shutdown();
        self.torn_down = true;
        log::info!("Room torn down after {:.2}s", self.time.elapsed_seconds());
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn profile(&self) -> &TierProfile {
        &self.profile
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn orbit(&self) -> &OrbitControls {
        &self.orbit
    }

    pub fn focus(&self) -> FocusState {
        self.focus.state()
    }

    pub fn is_raining(&self) -> bool {
        self.weather.is_raining()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn audio(&self) -> &AudioController<O> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioController<O> {
        &mut self.audio
    }

    pub fn audio_state(&self) -> AudioChannelState {
        self.audio.state()
    }

    pub fn adapter(&self) -> &RenderAdapter {
        &self.adapter
    }

    pub fn animation(&self) -> &AnimationEngine {
        &self.animation
    }

    /// Dust overlay from the last tick.
    pub fn dust(&self) -> &[DustParams] {
        &self.dust
    }

    pub fn elapsed(&self) -> Duration {
        self.time.elapsed()
    }

    pub fn frame_count(&self) -> u64 {
        self.time.frame_count()
    }
}

impl<O: AudioOutput> Drop for RoomScene<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}
