//! Tempo rounding and beat interval computation
//!
//! Tempo arrives as a float (slider position) but the metronome counts in
//! whole BPM, matching what the display shows.

use crate::types::Meter;
use std::time::Duration;

/// Round a raw tempo to the whole BPM used for display and timing
#[inline]
pub fn round_tempo(bpm: f64) -> i64 {
    bpm.round() as i64
}

/// Seconds between two beats at `tempo` BPM in `meter`.
///
/// Base rate is `tempo / 60` beats per second, multiplied by the subdivision
/// `denominator / 4`: an eighth-note meter ticks twice as fast as a
/// quarter-note meter at the same BPM.
pub fn beat_interval_secs(tempo: i64, meter: &Meter) -> f64 {
    60.0 / (tempo as f64 * meter.subdivision())
}

/// [`beat_interval_secs`] as a [`Duration`], or `None` when the tempo does
/// not produce a finite positive interval (zero or negative BPM).
pub fn beat_interval(tempo: i64, meter: &Meter) -> Option<Duration> {
    let secs = beat_interval_secs(tempo, meter);
    if secs > 0.0 {
        Duration::try_from_secs_f64(secs).ok()
    } else {
        None
    }
}

/// Display text for a rounded tempo
pub fn tempo_text(tempo: i64) -> String {
    format!("{} BPM", tempo)
}
