//! End-to-end scenarios over a mounted room with a recording audio output.

use std::time::Duration;

use audio::{HeadlessOutput, Track};
use glam::Vec3;
use room::{
    DeviceTier, RenderKey, RoomScene, SceneObjectId, SceneOptions, CLOSE_DELAY, SELECT_DELAY,
};

const TICK: Duration = Duration::from_millis(16);

fn mount(tier: DeviceTier) -> RoomScene<HeadlessOutput> {
    let options = SceneOptions {
        tier,
        ..SceneOptions::default()
    };
    RoomScene::mount(options, HeadlessOutput::new()).unwrap()
}

fn run(scene: &mut RoomScene<HeadlessOutput>, ticks: u32, dt: Duration) {
    for _ in 0..ticks {
        scene.tick(dt).unwrap();
    }
}

#[test]
fn scenario_a_monitor_focus() {
    let mut scene = mount(DeviceTier::Desktop);
    assert_eq!(scene.camera().position(), Vec3::new(5.0, 4.0, 5.0));
    assert_eq!(scene.camera().look_at(), Vec3::new(0.0, 0.8, 0.0));

    assert!(scene.click(SceneObjectId::Monitor));
    let ui = scene.ui_snapshot();
    assert_eq!(ui.selected, Some(SceneObjectId::Monitor));
    assert!(!ui.modal_open);

    // 49 ticks of 16ms is 784ms: still travelling.
    run(&mut scene, 49, TICK);
    assert!(!scene.ui_snapshot().modal_open);
    run(&mut scene, 1, TICK);
    assert_eq!(scene.elapsed(), SELECT_DELAY);
    assert!(scene.ui_snapshot().modal_open);

    run(&mut scene, 100, TICK);
    let target = Vec3::new(0.0, 1.5, 1.0);
    let look = Vec3::new(0.0, 1.1, -0.8);
    let start = Vec3::new(5.0, 4.0, 5.0).distance(target);
    assert_eq!(scene.camera().target().position, target);
    assert_eq!(scene.camera().target().look_at, look);
    assert!(scene.camera().position().distance(target) < start * 0.01);
    assert!(scene.camera().look_at().distance(look) < Vec3::new(0.0, 0.8, 0.0).distance(look) * 0.01);
}

#[test]
fn scenario_b_rain_crossfade() {
    let mut scene = mount(DeviceTier::Desktop);
    assert!(!scene.toggle_mute());
    run(&mut scene, 10, Duration::from_millis(10));
    assert!(scene.toggle_weather());

    // 49 steps of 10ms: the fade has not finished.
    run(&mut scene, 49, Duration::from_millis(10));
    assert!(scene.audio().is_fading());
    assert!(scene.audio().output().is_playing(Track::Ambient));

    run(&mut scene, 1, Duration::from_millis(10));
    let out = scene.audio().output();
    assert!(!out.is_playing(Track::Ambient));
    assert_eq!(out.volume(Track::Ambient), 0.0);
    assert!(out.is_playing(Track::Rain));
    assert!((out.volume(Track::Rain) - 0.4).abs() < 1e-6);
    assert!(!scene.audio_state().fading);
    assert_eq!(scene.audio_state().active_track, Track::Rain);
}

#[test]
fn scenario_c_rain_instances_follow_tier_and_freeze_while_dry() {
    for (tier, count) in [(DeviceTier::Desktop, 100), (DeviceTier::Mobile, 50)] {
        let mut scene = mount(tier);
        let rain = |s: &RoomScene<HeadlessOutput>| s.adapter().graph().batch_bytes(RenderKey::Rain);
        assert_eq!(
            scene.adapter().graph().batch(RenderKey::Rain).map(|b| b.len()),
            Some(count)
        );

        let dry = rain(&scene);
        run(&mut scene, 30, TICK);
        assert_eq!(rain(&scene), dry, "dry rain must not move");
        assert_eq!(scene.adapter().graph().is_visible(RenderKey::Rain), Some(false));

        scene.toggle_weather();
        run(&mut scene, 1, TICK);
        let wet = rain(&scene);
        assert_ne!(wet, dry);
        run(&mut scene, 1, TICK);
        assert_ne!(rain(&scene), wet);
        assert_eq!(scene.adapter().graph().is_visible(RenderKey::Rain), Some(true));

        scene.toggle_weather();
        run(&mut scene, 1, TICK);
        let frozen = rain(&scene);
        run(&mut scene, 20, TICK);
        assert_eq!(rain(&scene), frozen);
    }
}

#[test]
fn selection_is_exclusive_until_released() {
    let mut scene = mount(DeviceTier::Desktop);
    assert!(scene.click(SceneObjectId::Console));
    for other in SceneObjectId::ALL {
        assert!(!scene.click(other));
    }
    run(&mut scene, 50, TICK);
    assert!(scene.close_modal());
    assert!(!scene.click(SceneObjectId::Avatar), "closing still holds the selection");

    let ticks = (CLOSE_DELAY.as_millis() / TICK.as_millis()) as u32 + 1;
    run(&mut scene, ticks, TICK);
    let ui = scene.ui_snapshot();
    assert_eq!(ui.selected, None);
    assert!(ui.orbit_enabled && ui.show_hint);
    assert!(scene.click(SceneObjectId::Avatar));
}

#[test]
fn closing_reverts_camera_to_idle_view() {
    let mut scene = mount(DeviceTier::Mobile);
    assert_eq!(scene.camera().position(), Vec3::new(7.0, 5.0, 7.0));
    scene.click(SceneObjectId::Window);
    run(&mut scene, 200, TICK);
    assert!(scene.camera().position().distance(Vec3::new(1.0, 1.7, 1.0)) < 0.05);

    scene.close_modal();
    run(&mut scene, 400, TICK);
    // Back near the orbit eye, which drifts slowly with auto-rotation.
    let eye = scene.orbit().viewpoint().position;
    assert!(scene.camera().position().distance(eye) < 0.2);
    assert!(scene.camera().look_at().distance(Vec3::new(0.0, 0.8, 0.0)) < 0.01);
}

#[test]
fn weather_round_trip_restores_environment() {
    let mut scene = mount(DeviceTier::Desktop);
    let before = *scene.environment();
    scene.toggle_weather();
    assert_ne!(*scene.environment(), before);
    scene.toggle_weather();
    assert_eq!(*scene.environment(), before);
}

#[test]
fn crossfade_leaves_one_audible_track() {
    let mut scene = mount(DeviceTier::Desktop);
    scene.toggle_mute();
    for _ in 0..5 {
        scene.toggle_weather();
        run(&mut scene, 7, TICK);
    }
    run(&mut scene, 60, TICK);
    let out = scene.audio().output();
    let audible = [Track::Ambient, Track::Rain]
        .iter()
        .filter(|t| out.volume(**t) > 0.0)
        .count();
    assert_eq!(audible, 1);
    assert_eq!(scene.audio_state().active_track, Track::Rain);
}

#[test]
fn rejected_playback_stays_muted_and_retries() {
    let mut scene = mount(DeviceTier::Desktop);
    scene.audio_mut().output_mut().reject_playback = true;
    assert!(scene.toggle_mute());
    assert!(scene.ui_snapshot().muted);
    run(&mut scene, 3, TICK);

    scene.audio_mut().output_mut().reject_playback = false;
    assert!(!scene.toggle_mute());
    assert!(scene.audio().output().is_playing(Track::Ambient));
}

#[test]
fn teardown_cancels_pending_timers() {
    let mut scene = mount(DeviceTier::Desktop);
    scene.toggle_mute();
    scene.click(SceneObjectId::Monitor);
    scene.toggle_weather();
    scene.teardown();

    assert!(scene.tick(TICK * 100).is_err());
    let ui = scene.ui_snapshot();
    assert!(!ui.modal_open);
    assert!(ui.muted);
    let out = scene.audio().output();
    assert!(!out.is_playing(Track::Ambient) && !out.is_playing(Track::Rain));
}

#[test]
fn same_seed_replays_identically() {
    let mut a = mount(DeviceTier::Desktop);
    let mut b = mount(DeviceTier::Desktop);
    for s in [&mut a, &mut b] {
        s.toggle_weather();
        s.click(SceneObjectId::Bookshelf);
        run(s, 90, TICK);
    }
    assert_eq!(a.camera().position(), b.camera().position());
    let key = RenderKey::Rain;
    assert_eq!(a.adapter().graph().batch_bytes(key), b.adapter().graph().batch_bytes(key));
}
