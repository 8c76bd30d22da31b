//! Start-up configuration for a [`BeatEngine`](crate::engine::BeatEngine)

use crate::types::{Meter, MeterError};

pub const DEFAULT_METER: &str = "4/4";
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Initial engine settings.
///
/// The meter is kept as signature text and parsed when the engine is built,
/// so a malformed signature surfaces as an error from `BeatEngine::new`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    pub initial_meter: String,
    pub initial_tempo: f64,
    pub autoplay: bool,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_meter(mut self, signature: impl Into<String>) -> Self {
        self.initial_meter = signature.into();
        self
    }

    pub fn with_tempo(mut self, bpm: f64) -> Self {
        self.initial_tempo = bpm;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Parse the configured signature
    pub fn meter(&self) -> Result<Meter, MeterError> {
        Meter::parse(&self.initial_meter)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_meter: DEFAULT_METER.to_string(),
            initial_tempo: DEFAULT_TEMPO,
            autoplay: false,
        }
    }
}
