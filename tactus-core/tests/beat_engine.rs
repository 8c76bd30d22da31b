use crossbeam_channel::Receiver;
use std::sync::Arc;
use std::time::Duration;
use tactus_core::{Beat, BeatEngine, BeatParity, EngineConfig, Face, VirtualScheduler};

/// Collects values pushed to a subscription, stamped with virtual time
struct Recorder<T> {
    rx: Receiver<T>,
    events: Vec<(Duration, T)>,
}

impl<T> Recorder<T> {
    fn new(rx: Receiver<T>) -> Self {
        Self {
            rx,
            events: Vec::new(),
        }
    }

    fn collect(&mut self, now: Duration) {
        self.events.extend(self.rx.try_iter().map(|value| (now, value)));
    }

    fn values(&self) -> Vec<&T> {
        self.events.iter().map(|(_, value)| value).collect()
    }
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

fn engine(config: EngineConfig) -> (BeatEngine, VirtualScheduler) {
    let scheduler = VirtualScheduler::new();
    let engine = BeatEngine::new(config, Arc::new(scheduler.clone())).unwrap();
    (engine, scheduler)
}

fn first_value<T>(rx: Receiver<T>) -> T {
    rx.try_recv().expect("subscription should replay its latest value")
}

#[test]
fn test_defaults_are_replayed_on_subscribe() {
    let (engine, _scheduler) = engine(EngineConfig::default());

    assert_eq!(first_value(engine.numerator_text()), "4");
    assert_eq!(first_value(engine.numerator_value()), 4);
    assert_eq!(first_value(engine.denominator_text()), "4");
    assert_eq!(first_value(engine.max_numerator()), 4);
    assert_eq!(first_value(engine.signature_text()), "4/4");
    assert_eq!(first_value(engine.tempo_text()), "120 BPM");
    assert_eq!(first_value(engine.tempo()), 120);
    assert!(!first_value(engine.is_playing()));
    assert_eq!(first_value(engine.face()), Face::Center);
}

#[test]
fn test_tapping_play_pause_toggles_is_playing() {
    let (engine, scheduler) = engine(EngineConfig::default());
    let mut playing = Recorder::new(engine.is_playing());
    playing.collect(scheduler.now());

    for t in [10, 20, 30] {
        scheduler.advance_to(secs(t));
        engine.tap_play_pause();
        playing.collect(scheduler.now());
    }

    assert_eq!(
        playing.events,
        vec![
            (secs(0), false),
            (secs(10), true),
            (secs(20), false),
            (secs(30), true),
        ]
    );
}

#[test]
fn test_numerator_stepper_updates_text() {
    let (engine, scheduler) = engine(EngineConfig::default());
    let mut numerator = Recorder::new(engine.numerator_text());
    numerator.collect(scheduler.now());

    scheduler.advance_to(secs(10));
    engine.step_numerator(3.0);
    numerator.collect(scheduler.now());

    scheduler.advance_to(secs(15));
    engine.step_numerator(1.0);
    numerator.collect(scheduler.now());

    assert_eq!(
        numerator.events,
        vec![
            (secs(0), "4".to_string()),
            (secs(10), "3".to_string()),
            (secs(15), "1".to_string()),
        ]
    );
}

#[test]
fn test_denominator_stepper_updates_text() {
    let (engine, scheduler) = engine(EngineConfig::default());
    let mut denominator = Recorder::new(engine.denominator_text());
    denominator.collect(scheduler.now());

    // 2 ^ (step + 1): steps 1, 2, 3, 4 select 4, 8, 16, 32
    for (t, step) in [(10, 2.0), (15, 4.0), (20, 3.0), (25, 1.0)] {
        scheduler.advance_to(secs(t));
        engine.step_denominator(step);
        denominator.collect(scheduler.now());
    }

    assert_eq!(denominator.values(), vec!["4", "8", "32", "16", "4"]);
    assert_eq!(
        denominator.events.iter().map(|(t, _)| *t).collect::<Vec<_>>(),
        vec![secs(0), secs(10), secs(15), secs(20), secs(25)]
    );
}

#[test]
fn test_tempo_slider_updates_text() {
    let (engine, scheduler) = engine(EngineConfig::default());
    let mut tempo = Recorder::new(engine.tempo_text());
    tempo.collect(scheduler.now());

    for (t, bpm) in [(10, 75.0), (15, 90.0), (20, 180.0), (25, 60.0)] {
        scheduler.advance_to(secs(t));
        engine.set_tempo(bpm);
        tempo.collect(scheduler.now());
    }

    assert_eq!(
        tempo.values(),
        vec!["120 BPM", "75 BPM", "90 BPM", "180 BPM", "60 BPM"]
    );
}

#[test]
fn test_fractional_tempo_is_rounded() {
    let (engine, _scheduler) = engine(EngineConfig::default().with_tempo(89.6));
    assert_eq!(first_value(engine.tempo_text()), "90 BPM");
}

#[test]
fn test_numerator_clamps_when_denominator_shrinks() {
    let (engine, scheduler) = engine(EngineConfig::default().with_meter("24/32"));
    let mut numerator = Recorder::new(engine.numerator_value());
    let mut ceiling = Recorder::new(engine.max_numerator());
    let mut signature = Recorder::new(engine.signature_text());
    numerator.collect(scheduler.now());
    ceiling.collect(scheduler.now());
    signature.collect(scheduler.now());

    for (t, step) in [(10, 3.0), (20, 2.0), (30, 1.0)] {
        scheduler.advance_to(secs(t));
        engine.step_denominator(step);
        numerator.collect(scheduler.now());
        ceiling.collect(scheduler.now());
        signature.collect(scheduler.now());
    }

    assert_eq!(
        numerator.events,
        vec![(secs(0), 24), (secs(10), 16), (secs(20), 8), (secs(30), 4)]
    );
    assert_eq!(ceiling.values(), vec![&32, &16, &8, &4]);
    assert_eq!(signature.values(), vec!["24/32", "16/16", "8/8", "4/4"]);

    // The raw stepper input is still 24, so widening the meter restores it
    engine.step_denominator(4.0);
    numerator.collect(scheduler.now());
    assert_eq!(numerator.values().last(), Some(&&24));
}

#[test]
fn test_initial_numerator_is_clamped_to_denominator() {
    let (engine, scheduler) = engine(EngineConfig::default().with_meter("24/16").with_autoplay(true));
    assert_eq!(first_value(engine.numerator_value()), 16);
    assert_eq!(first_value(engine.max_numerator()), 16);
    assert_eq!(first_value(engine.signature_text()), "16/16");

    let beats = engine.beats();
    scheduler.advance_by(millis(125 * 17));
    let heard: Vec<Beat> = beats.try_iter().collect();
    assert_eq!(heard.len(), 17);
    assert_eq!(heard[0], Beat::First);
    assert_eq!(heard[16], Beat::First);
    assert!(heard[1..16].iter().all(|beat| *beat == Beat::Regular));

    // The stepper still holds 24, so a wider denominator lets it through
    engine.step_denominator(4.0);
    assert_eq!(engine.snapshot().meter.signature(), "24/32");
}

#[test]
fn test_unchanged_meter_is_not_re_emitted() {
    let (engine, _scheduler) = engine(EngineConfig::default());
    let meter = engine.meter();
    assert_eq!(meter.try_iter().count(), 1);

    engine.step_numerator(4.0);
    engine.step_numerator(4.3);
    engine.step_denominator(1.0);
    engine.set_tempo(100.0);
    assert_eq!(meter.try_iter().count(), 0);

    engine.step_numerator(3.0);
    assert_eq!(
        meter.try_iter().map(|m| m.signature()).collect::<Vec<_>>(),
        vec!["3/4"]
    );
}

#[test]
fn test_beats_in_four_thirty_two() {
    let (engine, scheduler) = engine(EngineConfig::default().with_meter("4/32").with_autoplay(true));
    let mut beats = Recorder::new(engine.beats());

    // 60 / (120 * 32 / 4) = 0.0625 s
    let interval = Duration::from_micros(62_500);
    for _ in 0..8 {
        scheduler.advance_by(interval);
        beats.collect(scheduler.now());
    }

    let expected: Vec<(Duration, Beat)> = [
        Beat::First,
        Beat::Regular,
        Beat::Regular,
        Beat::Regular,
        Beat::First,
        Beat::Regular,
        Beat::Regular,
        Beat::Regular,
    ]
    .into_iter()
    .enumerate()
    .map(|(i, beat)| (interval * (i as u32 + 1), beat))
    .collect();
    assert_eq!(beats.events, expected);
}

#[test]
fn test_first_beat_waits_one_interval() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let beats = engine.beats();

    scheduler.advance_to(Duration::ZERO);
    assert!(beats.try_recv().is_err());

    scheduler.advance_to(millis(499));
    assert!(beats.try_recv().is_err());

    scheduler.advance_to(millis(500));
    assert_eq!(beats.try_recv(), Ok(Beat::First));
}

#[test]
fn test_parity_mirrors_beats() {
    let (engine, scheduler) = engine(EngineConfig::default().with_meter("3/4").with_autoplay(true));
    let beats = engine.beats();
    let parity = engine.beat_parity();

    scheduler.advance_by(secs(3));

    assert_eq!(beats.try_iter().count(), 6);
    assert_eq!(
        parity.try_iter().collect::<Vec<_>>(),
        vec![
            BeatParity::Even,
            BeatParity::Odd,
            BeatParity::Even,
            BeatParity::Odd,
            BeatParity::Even,
            BeatParity::Odd,
        ]
    );
}

#[test]
fn test_tempo_change_restarts_cadence() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let mut beats = Recorder::new(engine.beats());

    scheduler.advance_to(millis(500));
    beats.collect(scheduler.now());
    scheduler.advance_to(millis(1_000));
    beats.collect(scheduler.now());

    scheduler.advance_to(millis(1_200));
    engine.set_tempo(60.0);

    // The old 500 ms cadence would have ticked at 1.5 s
    scheduler.advance_to(millis(2_199));
    beats.collect(scheduler.now());
    assert_eq!(beats.events.len(), 2);

    scheduler.advance_to(millis(2_200));
    beats.collect(scheduler.now());
    scheduler.advance_to(millis(3_200));
    beats.collect(scheduler.now());

    assert_eq!(
        beats.events,
        vec![
            (millis(500), Beat::First),
            (millis(1_000), Beat::Regular),
            (millis(2_200), Beat::First),
            (millis(3_200), Beat::Regular),
        ]
    );
}

#[test]
fn test_denominator_change_restarts_cadence() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let mut beats = Recorder::new(engine.beats());

    scheduler.advance_to(millis(1_000));
    beats.collect(scheduler.now());

    scheduler.advance_to(millis(1_100));
    engine.step_denominator(2.0);

    scheduler.advance_to(millis(1_350));
    beats.collect(scheduler.now());
    scheduler.advance_to(millis(1_600));
    beats.collect(scheduler.now());

    assert_eq!(
        beats.events[2..].to_vec(),
        vec![(millis(1_350), Beat::First), (millis(1_600), Beat::Regular)]
    );
}

#[test]
fn test_numerator_change_keeps_cadence_and_count() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let mut beats = Recorder::new(engine.beats());

    for t in [500, 1_000] {
        scheduler.advance_to(millis(t));
        beats.collect(scheduler.now());
    }

    scheduler.advance_to(millis(1_200));
    engine.step_numerator(2.0);

    for t in [1_500, 2_000, 2_500] {
        scheduler.advance_to(millis(t));
        beats.collect(scheduler.now());
    }

    // Index 1 wraps to 0 under the new numerator of 2
    assert_eq!(
        beats.events,
        vec![
            (millis(500), Beat::First),
            (millis(1_000), Beat::Regular),
            (millis(1_500), Beat::First),
            (millis(2_000), Beat::Regular),
            (millis(2_500), Beat::First),
        ]
    );
}

#[test]
fn test_pause_and_resume_starts_a_fresh_run() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let mut beats = Recorder::new(engine.beats());
    let parity = engine.beat_parity();

    scheduler.advance_to(millis(500));
    beats.collect(scheduler.now());
    scheduler.advance_to(millis(700));
    engine.tap_play_pause();

    scheduler.advance_to(secs(2));
    beats.collect(scheduler.now());
    assert_eq!(beats.events, vec![(millis(500), Beat::First)]);

    engine.tap_play_pause();
    scheduler.advance_to(millis(2_500));
    beats.collect(scheduler.now());

    assert_eq!(beats.events.last(), Some(&(millis(2_500), Beat::First)));
    assert_eq!(
        parity.try_iter().collect::<Vec<_>>(),
        vec![BeatParity::Even, BeatParity::Even]
    );
}

#[test]
fn test_face_swings_and_centres() {
    let (engine, scheduler) = engine(EngineConfig::default());
    let face = engine.face();

    engine.tap_play_pause();
    scheduler.advance_by(secs(1));
    engine.tap_play_pause();

    assert_eq!(
        face.try_iter().collect::<Vec<_>>(),
        vec![Face::Center, Face::Left, Face::Right, Face::Center]
    );
}

#[test]
fn test_dropping_engine_stops_timer() {
    let (engine, scheduler) = engine(EngineConfig::default().with_autoplay(true));
    let beats = engine.beats();
    scheduler.advance_by(secs(1));
    assert_eq!(beats.try_iter().count(), 2);

    drop(engine);
    assert_eq!(scheduler.active_timers(), 0);

    scheduler.advance_by(secs(5));
    assert_eq!(beats.try_iter().count(), 0);
}
