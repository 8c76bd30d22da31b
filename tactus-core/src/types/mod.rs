// tactus-core/src/types/mod.rs

pub mod beat;
pub mod meter;
pub mod tempo;

pub use beat::{Beat, BeatCounter, BeatParity, Face};
pub use meter::{Meter, MeterError};
pub use tempo::{beat_interval, beat_interval_secs, round_tempo, tempo_text};
