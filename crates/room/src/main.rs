//! nightroom - headless driver for the night room scene.
//!
//! Runs a scripted session at a fixed tick rate and logs what the UI would show.

use std::path::Path;

use anyhow::Result;
use audio::{AudioOutput, HeadlessOutput, KiraOutput, Track};
use engine_core::{tick_duration, Vec2, Vec3};
use input::{ElementState, InputState, KeyCode, MouseButton};
use renderer::CameraController;
use room::{RoomScene, SceneConfig, SceneObject, SceneObjectId, SceneOptions, UiSnapshot};

/// One scripted user action.
#[derive(Debug, Clone, Copy)]
enum Action {
    Key(KeyCode),
    /// Move onto the object and click it.
    Click(SceneObjectId),
    /// Drag the orbit by this many pixels.
    Drag(Vec2),
}

fn script() -> Vec<(f32, Action)> {
    vec![
        (0.5, Action::Key(KeyCode::KeyM)),
        (0.8, Action::Drag(Vec2::new(120.0, -20.0))),
        (1.0, Action::Click(SceneObjectId::Monitor)),
        (1.2, Action::Click(SceneObjectId::Window)),
        (2.5, Action::Key(KeyCode::Escape)),
        (3.5, Action::Key(KeyCode::KeyR)),
        (4.0, Action::Click(SceneObjectId::Bookshelf)),
        (5.5, Action::Key(KeyCode::Escape)),
        (6.5, Action::Key(KeyCode::KeyR)),
        (7.0, Action::Key(KeyCode::KeyM)),
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║                     NIGHT ROOM                       ║");
    println!("╠══════════════════════════════════════════════════════╣");
    println!("║  CONTROLS:                                           ║");
    println!("║    Click  - Focus an object  │  Drag   - Orbit       ║");
    println!("║    Escape - Close modal      │  Scroll - Zoom        ║");
    println!("║    R      - Toggle rain      │  M      - Toggle mute ║");
    println!("╚══════════════════════════════════════════════════════╝");

    let config = SceneConfig::load();
    let options = SceneOptions::from_config(&config);
    let output = open_audio(&config);
    let mut scene = RoomScene::mount(options, output)?;

    let dt = tick_duration(config.tick_rate_hz);
    let ticks = (config.session_seconds as f64 * config.tick_rate_hz).ceil() as u64;
    let viewport = Vec2::new(config.viewport.0 as f32, config.viewport.1 as f32);
    let mut script = script().into_iter().peekable();
    let mut input = InputState::new();
    let mut last = scene.ui_snapshot();
    log_snapshot(&last);

    for _ in 0..ticks {
        let now = scene.elapsed().as_secs_f32();
        input.begin_frame();
        if let Some(&(at, action)) = script.peek() {
            if now >= at {
                script.next();
                log::debug!("Script at {:.2}s: {:?}", now, action);
                perform(&mut scene, &mut input, action, viewport);
            }
        }
        scene.tick(dt)?;

        let snapshot = scene.ui_snapshot();
        if snapshot != last {
            log_snapshot(&snapshot);
            last = snapshot;
        }
    }

    let camera = scene.camera();
    log::info!(
        "Session ended after {} ticks, camera at {} looking at {}",
        scene.frame_count(),
        camera.position(),
        camera.look_at()
    );
    scene.teardown();
    Ok(())
}

/// Open the audio device, or fall back to a silent output when there is none.
fn open_audio(config: &SceneConfig) -> Box<dyn AudioOutput> {
    match KiraOutput::new() {
        Ok(mut output) => {
            let tracks = [
                (Track::Ambient, config.ambient_track.as_deref()),
                (Track::Rain, config.rain_track.as_deref()),
            ];
            for (track, path) in tracks {
                if let Some(path) = path {
                    load(&mut output, track, path);
                }
            }
            Box::new(output)
        }
        Err(e) => {
            log::warn!("Audio device unavailable ({}), running silent", e);
            Box::new(HeadlessOutput::new())
        }
    }
}

fn load(output: &mut KiraOutput, track: Track, path: &Path) {
    if let Err(e) = output.load_track(track, path) {
        log::warn!("Could not load {:?} track from {:?}: {}", track, path, e);
    }
}

/// Feed an action through the same input path a window would use.
fn perform<O: AudioOutput>(
    scene: &mut RoomScene<O>,
    input: &mut InputState,
    action: Action,
    viewport: Vec2,
) {
    match action {
        Action::Key(key) => {
            input.process_keyboard(key, ElementState::Pressed);
            scene.handle_input(input);
            input.process_keyboard(key, ElementState::Released);
        }
        Action::Click(id) => {
            let Some(object) = SceneObject::catalogue().into_iter().find(|o| o.id == id) else {
                return;
            };
            let Some(cursor) = project(scene.camera(), object.base.position, viewport) else {
                log::debug!("{} is off screen", id);
                return;
            };
            input.process_cursor_position((cursor.x as f64, cursor.y as f64));
            input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
            scene.handle_input(input);
            input.begin_frame();
            input.process_mouse_button(MouseButton::Left, ElementState::Released);
            scene.handle_input(input);
        }
        Action::Drag(delta) => {
            let start = viewport * 0.5;
            input.process_cursor_position((start.x as f64, start.y as f64));
            input.begin_frame();
            input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
            let end = start + delta;
            input.process_cursor_position((end.x as f64, end.y as f64));
            input.begin_frame();
            scene.handle_input(input);
            input.process_mouse_button(MouseButton::Left, ElementState::Released);
        }
    }
}

/// Window position of a world point, if it is in front of the camera.
fn project(camera: &CameraController, world: Vec3, viewport: Vec2) -> Option<Vec2> {
    let clip = camera.view_projection_matrix() * world.extend(1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.x,
        (1.0 - ndc.y) * 0.5 * viewport.y,
    ))
}

fn log_snapshot(ui: &UiSnapshot) {
    log::info!(
        "selected={:?} hovered={:?} modal={} raining={} muted={} orbit={} hint={}",
        ui.selected,
        ui.hovered,
        ui.modal
            .as_ref()
            .map(|m| m.title.as_str())
            .unwrap_or(if ui.modal_open { "?" } else { "-" }),
        ui.is_raining,
        ui.muted,
        ui.orbit_enabled,
        ui.show_hint
    );
}
