//! Beat Engine
//!
//! Combines the numerator stepper, denominator stepper, tempo and play/pause
//! taps into a live meter and beat interval, and drives a single periodic
//! timer that emits one [`Beat`] per tick.
//!
//! Every derived value is change-suppressed. The timer is restarted only when
//! the pair `(beat interval, is playing)` changes; a restart cancels the
//! previous run and resets the beat counters. Each tick samples the meter
//! current at that moment, so numerator edits take effect without a restart.

use crate::config::EngineConfig;
use crate::scheduler::{BeatScheduler, TimerHandle};
use crate::signal::{EventStream, Signal};
use crate::types::meter::{stepper_value_to_denominator, MAX_STEP, MIN_STEP};
use crate::types::{beat_interval, round_tempo, tempo_text, Beat, BeatCounter, BeatParity, Face, Meter, MeterError};
use crossbeam_channel::Receiver;
use log::{debug, info, warn};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

/// Point-in-time view of the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSnapshot {
    pub meter: Meter,
    pub tempo: i64,
    pub is_playing: bool,
    /// `None` when the tempo does not yield a usable interval
    pub beat_interval: Option<Duration>,
    /// Beats emitted by the current run
    pub beats_in_run: u64,
}

/// One timer generation between two restarts
struct Run {
    generation: u64,
    counter: BeatCounter,
    _timer: TimerHandle,
}

type TimerKey = (Option<Duration>, bool);

struct EngineState {
    /// Numerator as last reported by the stepper, before rounding and clamping
    raw_numerator: f64,
    /// Active denominator, which is also the numerator ceiling
    denominator: Signal<u32>,
    numerator: Signal<u32>,
    meter: Signal<Meter>,
    tempo: Signal<i64>,
    is_playing: Signal<bool>,
    face: Signal<Face>,
    beats: EventStream<Beat>,
    parity: EventStream<BeatParity>,

    timer_key: Option<TimerKey>,
    run: Option<Run>,
    generation: u64,
    closed: bool,
}

impl EngineState {
    fn new(meter: Meter, tempo: f64, autoplay: bool) -> Self {
        Self {
            raw_numerator: meter.numerator() as f64,
            denominator: Signal::new(meter.denominator()),
            numerator: Signal::new(meter.numerator()),
            meter: Signal::new(meter),
            tempo: Signal::new(round_tempo(tempo)),
            is_playing: Signal::new(autoplay),
            face: Signal::new(Face::Center),
            beats: EventStream::new(),
            parity: EventStream::new(),
            timer_key: None,
            run: None,
            generation: 0,
            closed: false,
        }
    }

    /// Recompute the clamped numerator and the meter from the latest inputs
    fn recompute_meter(&mut self) {
        let ceiling = *self.denominator.get();
        let numerator = (self.raw_numerator.round().clamp(1.0, ceiling as f64)) as u32;
        self.numerator.set(numerator);

        match Meter::new(numerator, ceiling) {
            Ok(meter) => {
                if self.meter.set(meter) {
                    debug!("meter is now {}", meter);
                }
            }
            Err(e) => warn!("ignoring meter update: {}", e),
        }
    }

    fn beat_interval(&self) -> Option<Duration> {
        beat_interval(*self.tempo.get(), self.meter.get())
    }

    /// Restart or stop the timer if the interval or play state changed
    fn sync_timer(&mut self, scheduler: &dyn BeatScheduler, state: &Weak<Mutex<EngineState>>) {
        if self.closed {
            return;
        }

        let key = (self.beat_interval(), *self.is_playing.get());
        if self.timer_key == Some(key) {
            return;
        }
        self.timer_key = Some(key);

        // Cancel before creating the replacement so two runs never overlap
        self.run = None;
        self.generation += 1;

        match key {
            (_, false) => debug!("beat timer stopped"),
            (None, true) => warn!(
                "tempo {} BPM gives no valid beat interval, staying idle",
                self.tempo.get()
            ),
            (Some(interval), true) => {
                let generation = self.generation;
                let state = state.clone();
                let timer = scheduler.schedule_periodic(
                    interval,
                    Box::new(move || on_tick(&state, generation)),
                );
                debug!("beat timer #{} started, interval {:?}", generation, interval);
                self.run = Some(Run {
                    generation,
                    counter: BeatCounter::new(),
                    _timer: timer,
                });
            }
        }
    }

    fn tick(&mut self, generation: u64) {
        let numerator = self.meter.get().numerator();
        let Some(run) = self.run.as_mut().filter(|run| run.generation == generation) else {
            debug!("dropping tick from superseded timer #{}", generation);
            return;
        };

        let (beat, parity) = run.counter.advance(numerator);
        self.beats.emit(&beat);
        self.parity.emit(&parity);
        self.face.publish(parity.into());
    }

    fn stop(&mut self) {
        self.closed = true;
        self.run = None;
    }
}

fn lock(state: &Mutex<EngineState>) -> MutexGuard<'_, EngineState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn on_tick(state: &Weak<Mutex<EngineState>>, generation: u64) {
    if let Some(state) = state.upgrade() {
        lock(&state).tick(generation);
    }
}

/// Reactive metronome core.
///
/// Inputs are plain method calls; outputs are channel subscriptions. Value
/// outputs replay their latest value on subscribe, while [`beats`](Self::beats)
/// and [`beat_parity`](Self::beat_parity) only carry ticks that happen after
/// subscribing.
pub struct BeatEngine {
    state: Arc<Mutex<EngineState>>,
    scheduler: Arc<dyn BeatScheduler>,
}

impl BeatEngine {
    /// Build an engine from `config`, starting the timer right away when
    /// `autoplay` is set.
    pub fn new(config: EngineConfig, scheduler: Arc<dyn BeatScheduler>) -> Result<Self, MeterError> {
        let meter = config.meter()?;
        let state = EngineState::new(meter, config.initial_tempo, config.autoplay);
        info!(
            "engine ready: {} at {} BPM{}",
            meter,
            state.tempo.get(),
            if config.autoplay { ", autoplay" } else { "" }
        );

        let engine = Self {
            state: Arc::new(Mutex::new(state)),
            scheduler,
        };
        // The parsed numerator may exceed its denominator, e.g. "24/16"
        engine.update(EngineState::recompute_meter);
        Ok(engine)
    }

    fn update(&self, apply: impl FnOnce(&mut EngineState)) {
        let weak = Arc::downgrade(&self.state);
        let mut state = lock(&self.state);
        apply(&mut state);
        state.sync_timer(self.scheduler.as_ref(), &weak);
    }

    // ----- inputs -----

    /// Numerator stepper moved. The value is rounded and clamped to
    /// `1..=denominator`.
    pub fn step_numerator(&self, value: f64) {
        if !value.is_finite() {
            warn!("ignoring non-finite numerator {}", value);
            return;
        }
        self.update(|state| {
            state.raw_numerator = value;
            state.recompute_meter();
        });
    }

    /// Denominator stepper moved. Steps 1..=4 select 4, 8, 16, 32; other
    /// values are rounded and clamped into that range.
    pub fn step_denominator(&self, step: f64) {
        let denominator = match stepper_value_to_denominator(step.clamp(MIN_STEP as f64, MAX_STEP as f64)) {
            Ok(denominator) => denominator,
            Err(e) => {
                warn!("ignoring denominator step: {}", e);
                return;
            }
        };
        self.update(|state| {
            state.denominator.set(denominator);
            state.recompute_meter();
        });
    }

    /// Tempo slider moved, in BPM. Rounded to whole BPM.
    pub fn set_tempo(&self, bpm: f64) {
        self.update(|state| {
            state.tempo.set(round_tempo(bpm));
        });
    }

    /// Play/pause tapped: flips the play state
    pub fn tap_play_pause(&self) {
        self.update(|state| {
            let playing = !*state.is_playing.get();
            state.is_playing.set(playing);
            if !playing {
                state.face.publish(Face::Center);
            }
            info!("{}", if playing { "playing" } else { "paused" });
        });
    }

    /// Cancel the active timer. The engine keeps answering subscriptions but
    /// never starts another timer.
    pub fn shutdown(&self) {
        lock(&self.state).stop();
    }

    // ----- outputs -----

    pub fn meter(&self) -> Receiver<Meter> {
        lock(&self.state).meter.subscribe()
    }

    pub fn numerator_text(&self) -> Receiver<String> {
        lock(&self.state)
            .meter
            .subscribe_map(|meter| meter.numerator().to_string())
    }

    /// Numerator after rounding and clamping to the active denominator
    pub fn numerator_value(&self) -> Receiver<u32> {
        lock(&self.state).numerator.subscribe()
    }

    /// Upper bound for the numerator stepper, always the active denominator
    pub fn max_numerator(&self) -> Receiver<u32> {
        lock(&self.state).denominator.subscribe()
    }

    pub fn denominator_text(&self) -> Receiver<String> {
        lock(&self.state)
            .meter
            .subscribe_map(|meter| meter.denominator().to_string())
    }

    pub fn signature_text(&self) -> Receiver<String> {
        lock(&self.state).meter.subscribe_map(Meter::signature)
    }

    /// Tempo rounded to whole BPM
    pub fn tempo(&self) -> Receiver<i64> {
        lock(&self.state).tempo.subscribe()
    }

    pub fn tempo_text(&self) -> Receiver<String> {
        lock(&self.state).tempo.subscribe_map(|bpm| tempo_text(*bpm))
    }

    pub fn is_playing(&self) -> Receiver<bool> {
        lock(&self.state).is_playing.subscribe()
    }

    pub fn beats(&self) -> Receiver<Beat> {
        lock(&self.state).beats.subscribe()
    }

    pub fn beat_parity(&self) -> Receiver<BeatParity> {
        lock(&self.state).parity.subscribe()
    }

    /// Metronome face: follows beat parity while playing, centred when stopped
    pub fn face(&self) -> Receiver<Face> {
        lock(&self.state).face.subscribe()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let state = lock(&self.state);
        EngineSnapshot {
            meter: *state.meter.get(),
            tempo: *state.tempo.get(),
            is_playing: *state.is_playing.get(),
            beat_interval: state.beat_interval(),
            beats_in_run: state.run.as_ref().map_or(0, |run| run.counter.total_beats()),
        }
    }
}

impl Drop for BeatEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for BeatEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeatEngine")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
