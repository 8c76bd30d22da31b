//! Engine input commands (numerator, denominator, meter, tempo, play/pause)

use crate::commands::{CommandContext, CommandResult};
use crate::config::parse_tempo;
use tactus_core::types::meter::{MAX_STEP, MIN_STEP};
use tactus_core::Meter;

/// Handle `num <n>`: the numerator stepper
pub fn cmd_numerator(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let value = match args.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return CommandResult::Error("Usage: num <beats per measure>".to_string()),
    };
    if value.round() < 1.0 {
        return CommandResult::Error("Numerator must be at least 1".to_string());
    }

    ctx.engine.step_numerator(value);

    let meter = ctx.engine.snapshot().meter;
    if (meter.numerator() as f64) < value.round() {
        return CommandResult::Message(format!(
            "Numerator limited to {} by the denominator",
            meter.denominator()
        ));
    }
    CommandResult::Success
}

/// Handle `den <step>`: the denominator stepper, 1..=4 selecting 4, 8, 16, 32
pub fn cmd_denominator(args: &str, ctx: &mut CommandContext) -> CommandResult {
    match args.parse::<u32>() {
        Ok(step) if (MIN_STEP..=MAX_STEP).contains(&step) => {
            ctx.engine.step_denominator(step as f64);
            CommandResult::Success
        }
        _ => CommandResult::Error(
            "Usage: den <step>, where 1=4, 2=8, 3=16, 4=32".to_string(),
        ),
    }
}

/// Handle `meter <signature>`: set both steppers from a signature
pub fn cmd_meter(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let meter = match Meter::parse(args) {
        Ok(meter) => meter,
        Err(e) => return CommandResult::Error(e.to_string()),
    };

    // Denominator first so the new numerator is clamped against the new ceiling
    ctx.engine.step_denominator(meter.denominator_step() as f64);
    ctx.engine.step_numerator(meter.numerator() as f64);

    let applied = ctx.engine.snapshot().meter;
    if applied != meter {
        return CommandResult::Message(format!(
            "Numerator limited to {} by the denominator, meter is {}",
            applied.denominator(),
            applied
        ));
    }
    CommandResult::Success
}

/// Handle `tempo [bpm]`
pub fn cmd_tempo(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current tempo: {} BPM",
            ctx.engine.snapshot().tempo
        ));
    }

    match parse_tempo(args) {
        Ok(bpm) => {
            ctx.engine.set_tempo(bpm);
            CommandResult::Success
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `play`, `pause` or `p`: all tap the same toggle
pub fn cmd_play_pause(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.engine.tap_play_pause();
    CommandResult::Success
}
