//! Session audio state: one-shot cues and a looping background track.
//!
//! Nothing here plays sound. The service decides *whether* something should
//! play and hands back the event the host audio layer needs; `EngineContext`
//! forwards those events every frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::types::{event_kind, GameEvent, SoundEvent};

/// A one-shot cue and how long it is considered "playing" after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CueDef {
    pub id: u32,
    #[serde(default = "default_cue_duration")]
    pub duration: f32,
}

fn default_cue_duration() -> f32 {
    0.25
}

/// Audio settings a game or level supplies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Volume the music starts at, 0.0 - 1.0.
    pub default_volume: f32,
    /// Host-side id of the background track, if any.
    pub music: Option<u32>,
    pub cues: Vec<CueDef>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            default_volume: 0.5,
            music: None,
            cues: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CueState {
    duration: f32,
    remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MusicTrack {
    id: u32,
    volume: f32,
    playing: bool,
}

#[derive(Debug, Default)]
pub struct AudioService {
    cues: HashMap<SoundEvent, CueState>,
    music: Option<MusicTrack>,
    default_volume: f32,
}

impl AudioService {
    pub fn new() -> Self {
        Self::from_settings(&AudioSettings::default())
    }

    pub fn from_settings(settings: &AudioSettings) -> Self {
        let mut service = Self {
            cues: HashMap::new(),
            music: None,
            default_volume: settings.default_volume.clamp(0.0, 1.0),
        };
        service.apply(settings);
        service
    }

    /// Register cues and the music track from `settings`, keeping existing cues.
    pub fn apply(&mut self, settings: &AudioSettings) {
        self.default_volume = settings.default_volume.clamp(0.0, 1.0);
        for cue in &settings.cues {
            self.register_cue(SoundEvent(cue.id), cue.duration);
        }
        if let Some(id) = settings.music {
            self.set_music(id);
        }
    }

    pub fn register_cue(&mut self, cue: SoundEvent, duration: f32) {
        self.cues.insert(
            cue,
            CueState {
                duration: duration.max(0.0),
                remaining: 0.0,
            },
        );
    }

    pub fn is_registered(&self, cue: SoundEvent) -> bool {
        self.cues.contains_key(&cue)
    }

    pub fn is_playing(&self, cue: SoundEvent) -> bool {
        self.cues.get(&cue).is_some_and(|c| c.remaining > 0.0)
    }

    /// Flag `cue` as playing unless it already is. Returns true when the
    /// caller should emit the sound. Unregistered cues never play.
    pub fn play_if_not_playing(&mut self, cue: SoundEvent) -> bool {
        match self.cues.get_mut(&cue) {
            Some(state) if state.remaining > 0.0 => false,
            Some(state) => {
                state.remaining = state.duration;
                true
            }
            None => {
                log::warn!("Audio cue {:?} is not configured", cue);
                false
            }
        }
    }

    /// Advance cue timers.
    pub fn tick(&mut self, dt: f32) {
        for state in self.cues.values_mut() {
            state.remaining = (state.remaining - dt).max(0.0);
        }
    }

    pub fn set_music(&mut self, id: u32) {
        self.music = Some(MusicTrack {
            id,
            volume: self.default_volume,
            playing: false,
        });
    }

    /// Start the background track looping at the default volume.
    pub fn start_music(&mut self) -> Option<GameEvent> {
        let default_volume = self.default_volume;
        match self.music.as_mut() {
            Some(track) => {
                track.volume = default_volume;
                if track.playing {
                    return None;
                }
                track.playing = true;
                Some(music_play(track))
            }
            None => {
                log::warn!("No background music configured");
                None
            }
        }
    }

    /// Resume the track if it is stopped.
    pub fn play_music(&mut self) -> Option<GameEvent> {
        let track = self.music.as_mut()?;
        if track.playing {
            return None;
        }
        track.playing = true;
        Some(music_play(track))
    }

    pub fn stop_music(&mut self) -> Option<GameEvent> {
        let track = self.music.as_mut()?;
        if !track.playing {
            return None;
        }
        track.playing = false;
        Some(GameEvent::with_payload(event_kind::MUSIC_STOP, track.id as f32, 0.0, 0.0))
    }

    /// Set the music volume, clamped to [0, 1].
    pub fn set_volume(&mut self, volume: f32) -> Option<GameEvent> {
        let track = self.music.as_mut()?;
        track.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        Some(GameEvent::with_payload(
            event_kind::MUSIC_VOLUME,
            track.volume,
            track.id as f32,
            0.0,
        ))
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_some_and(|t| t.playing)
    }

    pub fn music_volume(&self) -> Option<f32> {
        self.music.map(|t| t.volume)
    }
}

fn music_play(track: &MusicTrack) -> GameEvent {
    // c = 1: loop
    GameEvent::with_payload(event_kind::MUSIC_PLAY, track.volume, track.id as f32, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAP: SoundEvent = SoundEvent(1);

    #[test]
    fn cue_does_not_overlap_itself() {
        let mut audio = AudioService::new();
        audio.register_cue(TAP, 0.5);

        assert!(audio.play_if_not_playing(TAP));
        assert!(!audio.play_if_not_playing(TAP));
        audio.tick(0.3);
        assert!(audio.is_playing(TAP));
        audio.tick(0.3);
        assert!(!audio.is_playing(TAP));
        assert!(audio.play_if_not_playing(TAP));
    }

    #[test]
    fn zero_length_cue_always_plays() {
        let mut audio = AudioService::new();
        audio.register_cue(TAP, 0.0);
        assert!(audio.play_if_not_playing(TAP));
        assert!(audio.play_if_not_playing(TAP));
    }

    #[test]
    fn unregistered_cue_is_silent() {
        let mut audio = AudioService::new();
        assert!(!audio.play_if_not_playing(SoundEvent(99)));
    }

    #[test]
    fn music_starts_once_at_default_volume() {
        let settings = AudioSettings {
            default_volume: 0.4,
            music: Some(7),
            cues: vec![],
        };
        let mut audio = AudioService::from_settings(&settings);

        let ev = audio.start_music().unwrap();
        assert_eq!(ev.kind, event_kind::MUSIC_PLAY);
        assert_eq!(ev.a, 0.4);
        assert_eq!(ev.b, 7.0);
        assert!(audio.start_music().is_none());
        assert!(audio.music_playing());
    }

    #[test]
    fn missing_music_is_not_an_error() {
        let mut audio = AudioService::new();
        assert!(audio.start_music().is_none());
        assert!(audio.stop_music().is_none());
        assert!(audio.set_volume(0.3).is_none());
    }

    #[test]
    fn stop_and_resume() {
        let mut audio = AudioService::new();
        audio.set_music(1);
        audio.start_music();
        assert_eq!(audio.stop_music().unwrap().kind, event_kind::MUSIC_STOP);
        assert!(audio.stop_music().is_none());
        assert_eq!(audio.play_music().unwrap().kind, event_kind::MUSIC_PLAY);
    }

    #[test]
    fn volume_is_clamped() {
        let mut audio = AudioService::new();
        audio.set_music(1);
        assert_eq!(audio.set_volume(1.7).unwrap().a, 1.0);
        assert_eq!(audio.set_volume(-2.0).unwrap().a, 0.0);
        assert_eq!(audio.music_volume(), Some(0.0));
    }

    #[test]
    fn settings_from_json_fill_defaults() {
        let settings: AudioSettings =
            serde_json::from_str(r#"{ "cues": [ { "id": 3 } ] }"#).unwrap();
        assert_eq!(settings.default_volume, 0.5);
        assert_eq!(settings.cues[0].duration, 0.25);
        let audio = AudioService::from_settings(&settings);
        assert!(audio.is_registered(SoundEvent(3)));
    }
}
