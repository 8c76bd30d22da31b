//! Engine output feeds watched by the REPL

use crate::cue::StatusLine;
use crossbeam_channel::Receiver;
use tactus_core::{Beat, BeatEngine, Face};

/// Receivers for everything shown in the status line
pub struct StatusFeed {
    pub signature: Receiver<String>,
    pub tempo: Receiver<String>,
    pub max_numerator: Receiver<u32>,
    pub playing: Receiver<bool>,
    face: Receiver<Face>,
}

impl StatusFeed {
    pub fn subscribe(engine: &BeatEngine) -> Self {
        Self {
            signature: engine.signature_text(),
            tempo: engine.tempo_text(),
            max_numerator: engine.max_numerator(),
            playing: engine.is_playing(),
            face: engine.face(),
        }
    }

    /// Apply every pending value to `status`, returning whether a setting
    /// changed. Face swings are applied but do not count.
    pub fn drain(&self, status: &mut StatusLine) -> bool {
        let mut changed = false;
        for signature in self.signature.try_iter() {
            status.signature = signature;
            changed = true;
        }
        for tempo in self.tempo.try_iter() {
            status.tempo = tempo;
            changed = true;
        }
        for max in self.max_numerator.try_iter() {
            status.max_numerator = max;
            changed = true;
        }
        for playing in self.playing.try_iter() {
            status.playing = playing;
            changed = true;
        }
        if let Some(face) = self.face.try_iter().last() {
            status.face = face;
        }
        changed
    }
}

/// Beats paired with the face each tick swings to
pub struct BeatFeed {
    pub beats: Receiver<Beat>,
    face: Receiver<Face>,
}

impl BeatFeed {
    pub fn subscribe(engine: &BeatEngine) -> Self {
        Self {
            beats: engine.beats(),
            face: engine.face(),
        }
    }

    /// Face for a beat just taken from `beats`.
    ///
    /// Every tick publishes exactly one swing after its beat, so this only
    /// blocks until the engine finishes the tick. `Center` entries come from
    /// the subscribe replay and from pauses and are skipped. `None` once the
    /// engine is gone.
    pub fn face_of_last_beat(&self) -> Option<Face> {
        loop {
            match self.face.recv() {
                Ok(Face::Center) => continue,
                Ok(face) => return Some(face),
                Err(_) => return None,
            }
        }
    }
}
