//! Audio cue routing
//!
//! Games only name the cue to play; the host supplies a `CueSink` that
//! actually makes noise.

use serde::{Deserialize, Serialize};

/// Named sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    /// Selection toggled, maze step taken
    Click,
    /// Right answer
    Correct,
    /// Wrong answer or overshoot
    Wrong,
    /// Session or level complete, combo grid cleared
    Success,
    /// Fruit dropped
    Drop,
    /// Two fruits fused
    Merge,
}

impl SoundCue {
    pub const ALL: [SoundCue; 6] = [
        SoundCue::Click,
        SoundCue::Correct,
        SoundCue::Wrong,
        SoundCue::Success,
        SoundCue::Drop,
        SoundCue::Merge,
    ];

    /// Asset name the host maps to a sound file
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Click => "click",
            SoundCue::Correct => "correct",
            SoundCue::Wrong => "wrong",
            SoundCue::Success => "success",
            SoundCue::Drop => "drop",
            SoundCue::Merge => "merge",
        }
    }
}

/// Something that can play a cue
pub trait CueSink {
    fn play(&mut self, cue: SoundCue);
}

/// Sink that remembers every cue it was asked to play
#[derive(Debug, Clone, Default)]
pub struct CueRecorder {
    pub played: Vec<SoundCue>,
}

impl CueSink for CueRecorder {
    fn play(&mut self, cue: SoundCue) {
        self.played.push(cue);
    }
}

/// Sink that only logs
#[derive(Debug, Default)]
pub struct LogSink;

impl CueSink for LogSink {
    fn play(&mut self, cue: SoundCue) {
        log::trace!("cue: {}", cue.as_str());
    }
}

/// Gates cues on the sound setting before handing them to the sink
pub struct AudioManager<S: CueSink> {
    sink: S,
    muted: bool,
}

impl<S: CueSink> AudioManager<S> {
    pub fn new(sink: S, sound_enabled: bool) -> Self {
        Self {
            sink,
            muted: !sound_enabled,
        }
    }

    /// Mute/unmute all cues
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Play a cue unless muted. Returns whether it reached the sink.
    pub fn play(&mut self, cue: SoundCue) -> bool {
        if self.muted {
            return false;
        }
        self.sink.play(cue);
        true
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
