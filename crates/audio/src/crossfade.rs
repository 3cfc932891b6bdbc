//! Mute toggling and the weather crossfade between the ambient and rain tracks.
//!
//! The controller is the source of truth for what is audible; the [`AudioOutput`] only mirrors
//! it. A paused track always sits at volume 0, so at quiescence at most one track is nonzero.

use std::time::Duration;

use engine_core::TimerQueue;

use crate::{AudioOutput, Track};

/// Length of one crossfade.
pub const FADE_DURATION: Duration = Duration::from_millis(500);
/// Number of volume steps a fade is cut into.
pub const FADE_STEPS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FadeKind {
    /// Linear ramp from `from` to 0, then pause.
    Out { from: f32 },
    /// Linear ramp from `from` to `to`.
    In { from: f32, to: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FadeStep {
    track: Track,
    step: u32,
    kind: FadeKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Channel {
    volume: f32,
    playing: bool,
}

/// Snapshot of the audio state for the UI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioChannelState {
    pub muted: bool,
    pub active_track: Track,
    pub fading: bool,
}

/// Owns mute state and runs crossfades as independent per-track step timers.
pub struct AudioController<O> {
    output: O,
    muted: bool,
    active: Track,
    channels: [Channel; 2],
    fades: TimerQueue<FadeStep>,
}

impl<O: AudioOutput> AudioController<O> {
    /// Start muted with nothing playing.
    pub fn new(output: O) -> Self {
        Self {
            output,
            muted: true,
            active: Track::Ambient,
            channels: [Channel::default(); 2],
            fades: TimerQueue::new(),
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn active_track(&self) -> Track {
        self.active
    }

    pub fn is_fading(&self) -> bool {
        !self.fades.is_empty()
    }

    pub fn state(&self) -> AudioChannelState {
        AudioChannelState {
            muted: self.muted,
            active_track: self.active,
            fading: self.is_fading(),
        }
    }

    pub fn volume(&self, track: Track) -> f32 {
        self.channels[track.index()].volume
    }

    pub fn is_playing(&self, track: Track) -> bool {
        self.channels[track.index()].playing
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Flip mute. Unmuting starts the weather's track at its nominal volume; if the output
    /// refuses to play, the controller stays muted and the toggle can simply be retried.
    /// Returns the mute state afterwards.
    pub fn toggle_mute(&mut self, is_raining: bool) -> bool {
        if self.fades.is_closed() {
            return self.muted;
        }
        self.fades.clear();
        if self.muted {
            let track = Track::for_weather(is_raining);
            self.stop(track.other());
            let volume = track.nominal_volume();
            self.output.set_volume(track, volume);
            match self.output.play(track, volume) {
                Ok(()) => {
                    self.channels[track.index()] = Channel {
                        volume,
                        playing: true,
                    };
                    self.active = track;
                    self.muted = false;
                    log::debug!("Unmuted, playing {:?} at {}", track, volume);
                }
                Err(e) => {
                    log::warn!("Audio playback failed: {}", e);
                    self.stop(track);
                }
            }
        } else {
            for track in Track::ALL {
                self.stop(track);
            }
            self.muted = true;
            log::debug!("Muted");
        }
        self.muted
    }

    /// React to a weather change at scene time `now`. No-op while muted.
    pub fn on_weather_change(&mut self, is_raining: bool, now: Duration) {
        if self.muted || self.fades.is_closed() {
            return;
        }
        let incoming = Track::for_weather(is_raining);
        let outgoing = incoming.other();
        if self.active == incoming && !self.is_fading() && self.is_playing(incoming) {
            return;
        }

        // Interrupting a running fade: both ramps restart from wherever they got to.
        self.fades.clear();

        let start_in = if self.is_playing(incoming) {
            self.volume(incoming)
        } else {
            self.output.set_volume(incoming, 0.0);
            if let Err(e) = self.output.play(incoming, 0.0) {
                log::warn!("Audio playback failed: {}", e);
                // Keep the previous track as it was before the attempt.
                if self.is_playing(outgoing) {
                    self.set_volume(outgoing, outgoing.nominal_volume());
                }
                return;
            }
            self.channels[incoming.index()] = Channel {
                volume: 0.0,
                playing: true,
            };
            0.0
        };

        let step_time = FADE_DURATION / FADE_STEPS;
        for step in 1..=FADE_STEPS {
            self.fades.schedule(
                now,
                step_time * step,
                FadeStep {
                    track: incoming,
                    step,
                    kind: FadeKind::In {
                        from: start_in,
                        to: incoming.nominal_volume(),
                    },
                },
            );
        }
        if self.is_playing(outgoing) {
            let from = self.volume(outgoing);
            for step in 1..=FADE_STEPS {
                self.fades.schedule(
                    now,
                    step_time * step,
                    FadeStep {
                        track: outgoing,
                        step,
                        kind: FadeKind::Out { from },
                    },
                );
            }
        }
        self.active = incoming;
        log::debug!("Crossfading {:?} -> {:?}", outgoing, incoming);
    }

    /// Apply every fade step due at `now`.
    pub fn update(&mut self, now: Duration) {
        for fade in self.fades.poll(now) {
            let progress = fade.step as f32 / FADE_STEPS as f32;
            match fade.kind {
                FadeKind::In { from, to } => {
                    let volume = (from + (to - from) * progress).min(to);
                    self.set_volume(fade.track, volume);
                }
                FadeKind::Out { from } => {
                    let volume = (from * (1.0 - progress)).max(0.0);
                    self.set_volume(fade.track, volume);
                    if fade.step >= FADE_STEPS {
                        self.stop(fade.track);
                        log::debug!("{:?} faded out", fade.track);
                    }
                }
            }
        }
    }

    /// Cancel pending fades and pause everything. Later calls are no-ops.
    pub fn shutdown(&mut self) {
        self.fades.close();
        for track in Track::ALL {
            if self.is_playing(track) {
                self.stop(track);
            }
        }
        self.muted = true;
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        self.channels[track.index()].volume = volume;
        self.output.set_volume(track, volume);
    }

    fn stop(&mut self, track: Track) {
        self.output.pause(track);
        self.output.set_volume(track, 0.0);
        self.channels[track.index()] = Channel::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HeadlessOutput;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn nonzero_tracks<O: AudioOutput>(c: &AudioController<O>) -> usize {
        Track::ALL.iter().filter(|t| c.volume(**t) > 0.0).count()
    }

    fn unmuted_dry() -> AudioController<HeadlessOutput> {
        let mut c = AudioController::new(HeadlessOutput::new());
        assert!(!c.toggle_mute(false));
        c
    }

    #[test]
    fn unmute_plays_weather_track_at_nominal() {
        let c = unmuted_dry();
        assert!(c.is_playing(Track::Ambient));
        assert_eq!(c.volume(Track::Ambient), 0.3);
        assert!(c.output().is_playing(Track::Ambient));
        assert!(!c.output().is_playing(Track::Rain));
    }

    #[test]
    fn unmute_while_raining_picks_rain() {
        let mut c = AudioController::new(HeadlessOutput::new());
        c.toggle_mute(true);
        assert_eq!(c.active_track(), Track::Rain);
        assert_eq!(c.volume(Track::Rain), 0.4);
    }

    #[test]
    fn rejected_playback_stays_muted_and_is_retryable() {
        let mut out = HeadlessOutput::new();
        out.reject_playback = true;
        let mut c = AudioController::new(out);
        assert!(c.toggle_mute(false));
        assert_eq!(nonzero_tracks(&c), 0);

        c.output_mut().reject_playback = false;
        assert!(!c.toggle_mute(false));
        assert_eq!(c.volume(Track::Ambient), 0.3);
    }

    #[test]
    fn weather_change_while_muted_is_ignored() {
        let mut c = AudioController::new(HeadlessOutput::new());
        c.on_weather_change(true, ms(0));
        assert!(!c.is_fading());
        assert_eq!(c.output().play_calls, 0);
    }

    #[test]
    fn crossfade_completes_at_fade_duration() {
        let mut c = unmuted_dry();
        c.on_weather_change(true, ms(1000));
        assert!(c.is_fading());

        c.update(ms(1499));
        assert!(c.is_playing(Track::Ambient));

        c.update(ms(1500));
        assert!(!c.is_fading());
        assert!(!c.is_playing(Track::Ambient));
        assert_eq!(c.volume(Track::Ambient), 0.0);
        assert!(c.is_playing(Track::Rain));
        assert!((c.volume(Track::Rain) - 0.4).abs() < 1e-6);
        assert!(!c.output().is_playing(Track::Ambient));
    }

    #[test]
    fn volumes_stay_in_range_during_fade() {
        let mut c = unmuted_dry();
        c.on_weather_change(true, ms(0));
        let mut last_rain = 0.0;
        let mut last_ambient = 0.3;
        for t in (0..=500).step_by(5) {
            c.update(ms(t));
            let rain = c.volume(Track::Rain);
            let ambient = c.volume(Track::Ambient);
            assert!((0.0..=0.4 + 1e-6).contains(&rain));
            assert!((0.0..=0.3 + 1e-6).contains(&ambient));
            assert!(rain >= last_rain && ambient <= last_ambient);
            last_rain = rain;
            last_ambient = ambient;
        }
        assert_eq!(nonzero_tracks(&c), 1);
    }

    #[test]
    fn reversing_mid_fade_settles_on_the_new_track() {
        let mut c = unmuted_dry();
        c.on_weather_change(true, ms(0));
        c.update(ms(250));
        c.on_weather_change(false, ms(250));
        c.update(ms(750));
        assert!(!c.is_fading());
        assert!((c.volume(Track::Ambient) - 0.3).abs() < 1e-6);
        assert_eq!(c.volume(Track::Rain), 0.0);
        assert_eq!(c.active_track(), Track::Ambient);
    }

    #[test]
    fn failed_fade_in_keeps_previous_track() {
        let mut c = unmuted_dry();
        c.output_mut().reject_playback = true;
        c.on_weather_change(true, ms(0));
        assert!(!c.is_fading());
        assert_eq!(c.active_track(), Track::Ambient);
        assert_eq!(c.volume(Track::Ambient), 0.3);
    }

    #[test]
    fn mute_cancels_fade() {
        let mut c = unmuted_dry();
        c.on_weather_change(true, ms(0));
        assert!(c.toggle_mute(true));
        c.update(ms(1000));
        assert_eq!(nonzero_tracks(&c), 0);
    }

    #[test]
    fn shutdown_pauses_and_ignores_late_steps() {
        let mut c = unmuted_dry();
        c.on_weather_change(true, ms(0));
        c.shutdown();
        c.update(ms(1000));
        assert!(!c.output().is_playing(Track::Ambient));
        assert!(!c.output().is_playing(Track::Rain));
        assert_eq!(nonzero_tracks(&c), 0);
        assert!(c.toggle_mute(false), "toggling after shutdown does nothing");
    }
}
