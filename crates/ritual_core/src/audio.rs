use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Named sound cues used by the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCue {
    Music,
    Drone,
    Click,
    Reveal,
    EndSound,
    ErrorEmail,
    NextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioChannel {
    AmbientMusic,
    AmbientDrone,
    OneShot,
}

impl AudioCue {
    pub const ALL: [AudioCue; 7] = [
        AudioCue::Music,
        AudioCue::Drone,
        AudioCue::Click,
        AudioCue::Reveal,
        AudioCue::EndSound,
        AudioCue::ErrorEmail,
        AudioCue::NextInput,
    ];

    pub fn key(self) -> &'static str {
        match self {
            AudioCue::Music => "music",
            AudioCue::Drone => "drone",
            AudioCue::Click => "click",
            AudioCue::Reveal => "reveal",
            AudioCue::EndSound => "endSound",
            AudioCue::ErrorEmail => "errorEmail",
            AudioCue::NextInput => "nextInput",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            AudioCue::Music => "music.mp3",
            AudioCue::Drone => "drone.mp3",
            AudioCue::Click => "click.mp3",
            AudioCue::Reveal => "reveal.mp3",
            AudioCue::EndSound => "end_sound.mp3",
            AudioCue::ErrorEmail => "error_email.mp3",
            AudioCue::NextInput => "next_input.mp3",
        }
    }

    pub fn volume(self) -> f32 {
        match self {
            AudioCue::Music => 0.1,
            AudioCue::Drone => 0.4,
            AudioCue::Click => 0.2,
            AudioCue::Reveal => 0.5,
            AudioCue::EndSound => 0.6,
            AudioCue::ErrorEmail => 0.5,
            AudioCue::NextInput => 0.03,
        }
    }

    pub fn channel(self) -> AudioChannel {
        match self {
            AudioCue::Music => AudioChannel::AmbientMusic,
            AudioCue::Drone => AudioChannel::AmbientDrone,
            _ => AudioChannel::OneShot,
        }
    }

    pub fn is_loop(self) -> bool {
        self.channel() != AudioChannel::OneShot
    }
}

/// Where a cue lives on disk and how it should be played.
#[derive(Debug, Clone, PartialEq)]
pub struct CueSource {
    pub cue: AudioCue,
    pub path: PathBuf,
    pub volume: f32,
    pub looping: bool,
}

impl CueSource {
    pub fn resolve(assets_dir: &Path, cue: AudioCue) -> Self {
        Self {
            cue,
            path: assets_dir.join(cue.file_name()),
            volume: cue.volume(),
            looping: cue.is_loop(),
        }
    }
}

/// Audio playback collaborator.
///
/// Implementations must swallow playback failures such as a missing file;
/// the flow never observes them.
pub trait AudioService: Send + Sync {
    fn play(&self, cue: AudioCue);
    fn stop(&self, cue: AudioCue);
    fn is_playing(&self, cue: AudioCue) -> bool;
}
