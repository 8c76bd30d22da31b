//! # Tactus Core
//!
//! Beat generation for the tactus metronome. Provides the time signature
//! model and a reactive beat engine, without threads, audio or terminal I/O.
//!
//! ## Features
//!
//! - **serde**: Derive Serialize/Deserialize for the value types
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tactus_core::{BeatEngine, EngineConfig, VirtualScheduler, Beat};
//!
//! let scheduler = VirtualScheduler::new();
//! let engine = BeatEngine::new(
//!     EngineConfig::default().with_meter("3/4").with_autoplay(true),
//!     Arc::new(scheduler.clone()),
//! )?;
//! let beats = engine.beats();
//!
//! scheduler.advance_by(Duration::from_secs(2));
//! let heard: Vec<Beat> = beats.try_iter().collect();
//! assert_eq!(heard, [Beat::First, Beat::Regular, Beat::Regular, Beat::First]);
//! # Ok::<(), tactus_core::MeterError>(())
//! ```

pub mod config;
pub mod engine;
pub mod scheduler;
pub mod signal;
pub mod types;

// Re-export commonly used types
pub use config::EngineConfig;
pub use engine::{BeatEngine, EngineSnapshot};
pub use scheduler::{BeatScheduler, PeriodicTask, TimerHandle, VirtualScheduler};
pub use types::{Beat, BeatParity, Face, Meter, MeterError};
