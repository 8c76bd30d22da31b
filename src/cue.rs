//! Terminal rendering of engine output
//!
//! Stands in for the audio and animation collaborators: each beat becomes a
//! coloured marker (accented on the first beat of a measure, optionally with
//! the terminal bell) next to the metronome face, and the status line shows
//! the signature, tempo and play state.

use colored::*;
use tactus_core::{Beat, Face};

/// ASCII bell, rung on first beats when enabled
const BELL: char = '\u{7}';

pub fn face_glyph(face: Face) -> &'static str {
    match face {
        Face::Left => "<",
        Face::Center => "|",
        Face::Right => ">",
    }
}

/// Renders beat cues, tracking the position within the current measure
#[derive(Debug, Clone, Default)]
pub struct CueRenderer {
    bell: bool,
    position: u32,
}

impl CueRenderer {
    pub fn new(bell: bool) -> Self {
        Self { bell, position: 0 }
    }

    /// Render one beat next to the face the engine swung to on that tick
    pub fn render(&mut self, beat: Beat, face: Face) -> String {
        self.position = match beat {
            Beat::First => 1,
            Beat::Regular => self.position + 1,
        };

        let glyph = face_glyph(face);
        match beat {
            Beat::First => {
                let bell = if self.bell { BELL.to_string() } else { String::new() };
                format!("{} {}{}", glyph, "● 1".bright_yellow().bold(), bell)
            }
            Beat::Regular => format!("{} {}", glyph, format!("○ {}", self.position).dimmed()),
        }
    }

    /// Forget the measure position, e.g. after playback stops
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

/// Latest values of the engine's display outputs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatusLine {
    pub signature: String,
    pub tempo: String,
    pub max_numerator: u32,
    pub playing: bool,
    pub face: Face,
}

impl StatusLine {
    pub fn render(&self) -> String {
        let state = if self.playing {
            "▶ playing".bright_green()
        } else {
            "■ stopped".bright_red()
        };
        format!(
            "{} {}  {}  {}  {}",
            face_glyph(self.face),
            self.signature.bright_cyan().bold(),
            self.tempo.cyan(),
            state,
            format!("(numerator up to {})", self.max_numerator).dimmed()
        )
    }
}
