//! Audio for the room: two looping background tracks, a Kira output, and the weather crossfade.

pub mod crossfade;

pub use crossfade::*;

use anyhow::Result;
use kira::{
    manager::{backend::DefaultBackend, AudioManager, AudioManagerSettings},
    sound::static_sound::{StaticSoundData, StaticSoundHandle, StaticSoundSettings},
    tween::Tween,
};
use std::path::Path;

/// The two logical background tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Lo-fi loop for clear nights.
    Ambient,
    /// Rain and thunder loop.
    Rain,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Ambient, Track::Rain];

    /// Track that matches the weather.
    pub fn for_weather(is_raining: bool) -> Self {
        if is_raining {
            Track::Rain
        } else {
            Track::Ambient
        }
    }

    /// Volume the track plays at once faded in.
    pub fn nominal_volume(self) -> f32 {
        match self {
            Track::Ambient => 0.3,
            Track::Rain => 0.4,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Track::Ambient => Track::Rain,
            Track::Rain => Track::Ambient,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Track::Ambient => 0,
            Track::Rain => 1,
        }
    }
}

/// Playback failures reported by an [`AudioOutput`].
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("track {0:?} has no sound loaded")]
    NotLoaded(Track),
    #[error("playback of {track:?} rejected: {reason}")]
    Rejected { track: Track, reason: String },
}

/// Device-facing side of the two tracks. Volumes are linear amplitudes in `0..=1`.
pub trait AudioOutput {
    /// Start the track, or resume it if paused, at `volume`.
    fn play(&mut self, track: Track, volume: f32) -> Result<(), AudioError>;
    fn pause(&mut self, track: Track);
    fn set_volume(&mut self, track: Track, volume: f32);
}

/// Output backed by a Kira audio manager.
pub struct KiraOutput {
    manager: AudioManager,
    sounds: [Option<StaticSoundData>; 2],
    handles: [Option<StaticSoundHandle>; 2],
}

impl KiraOutput {
    /// Open the default audio device.
    pub fn new() -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())?;
        Ok(Self {
            manager,
            sounds: [None, None],
            handles: [None, None],
        })
    }

    /// Load a looping track from a file.
    pub fn load_track(&mut self, track: Track, path: &Path) -> Result<()> {
        let sound_data = StaticSoundData::from_file(path)?;
        let settings = StaticSoundSettings::new().loop_region(..);
        self.sounds[track.index()] = Some(sound_data.with_settings(settings));
        log::info!("Loaded {:?} track from {:?}", track, path);
        Ok(())
    }
}

impl AudioOutput for KiraOutput {
    fn play(&mut self, track: Track, volume: f32) -> Result<(), AudioError> {
        if let Some(handle) = &mut self.handles[track.index()] {
            let _ = handle.set_volume(volume as f64, Tween::default());
            let _ = handle.resume(Tween::default());
            return Ok(());
        }
        let Some(sound_data) = &self.sounds[track.index()] else {
            return Err(AudioError::NotLoaded(track));
        };
        let settings = StaticSoundSettings::new().loop_region(..).volume(volume as f64);
        let handle = self
            .manager
            .play(sound_data.clone().with_settings(settings))
            .map_err(|e| AudioError::Rejected {
                track,
                reason: e.to_string(),
            })?;
        self.handles[track.index()] = Some(handle);
        Ok(())
    }

    fn pause(&mut self, track: Track) {
        if let Some(handle) = &mut self.handles[track.index()] {
            let _ = handle.pause(Tween::default());
        }
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        if let Some(handle) = &mut self.handles[track.index()] {
            let _ = handle.set_volume(volume as f64, Tween::default());
        }
    }
}

impl Drop for KiraOutput {
    fn drop(&mut self) {
        for handle in self.handles.iter_mut().flatten() {
            let _ = handle.stop(Tween::default());
        }
    }
}

/// Output with no device behind it. Records what a device would be doing, and can be told to
/// refuse playback the way a browser refuses autoplay.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOutput {
    pub playing: [bool; 2],
    pub volumes: [f32; 2],
    /// When set, every `play` call fails.
    pub reject_playback: bool,
    /// Number of `play` calls made, including rejected ones.
    pub play_calls: usize,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self, track: Track) -> bool {
        self.playing[track.index()]
    }

    pub fn volume(&self, track: Track) -> f32 {
        self.volumes[track.index()]
    }
}

impl AudioOutput for HeadlessOutput {
    fn play(&mut self, track: Track, volume: f32) -> Result<(), AudioError> {
        self.play_calls += 1;
        if self.reject_playback {
            return Err(AudioError::Rejected {
                track,
                reason: "playback not allowed".to_string(),
            });
        }
        self.playing[track.index()] = true;
        self.volumes[track.index()] = volume;
        Ok(())
    }

    fn pause(&mut self, track: Track) {
        self.playing[track.index()] = false;
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        self.volumes[track.index()] = volume;
    }
}

/// Lets a boxed output stand in wherever a concrete one is expected.
impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn play(&mut self, track: Track, volume: f32) -> Result<(), AudioError> {
        (**self).play(track, volume)
    }

    fn pause(&mut self, track: Track) {
        (**self).pause(track)
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        (**self).set_volume(track, volume)
    }
}
