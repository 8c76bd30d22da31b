//! # Tactus
//!
//! Tactus is a terminal metronome built on [`tactus_core::BeatEngine`]. The
//! engine turns meter, tempo and play/pause inputs into a timed stream of
//! beats; this crate wires it to a real-time clock thread and an interactive
//! REPL that prints each beat as it lands.
//!
//! ## Modules
//!
//! - `clock`: Threaded scheduler driving the engine's timer in real time.
//! - `commands`: REPL commands, one per engine input.
//! - `config`: Command-line options.
//! - `cue`: Terminal rendering of beats and the status line.
//! - `logging`: `env_logger` setup.
//! - `repl`: The interactive loop.

pub mod clock;
pub mod commands;
pub mod config;
pub mod cue;
pub mod logging;
pub mod repl;

pub use crate::clock::ClockScheduler;
pub use crate::config::Options;
