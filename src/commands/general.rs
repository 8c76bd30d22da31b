//! General REPL commands (help, quit, status, cues)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Message(help_text())
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `status` command
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let snapshot = ctx.engine.snapshot();
    let interval = match snapshot.beat_interval {
        Some(interval) => format!("{:.3}s between beats", interval.as_secs_f64()),
        None => "no valid beat interval".to_string(),
    };
    CommandResult::Message(format!(
        "{} at {} BPM, {}, {}{}",
        snapshot.meter,
        snapshot.tempo,
        if snapshot.is_playing { "playing" } else { "stopped" },
        interval,
        if snapshot.is_playing {
            format!(", {} beats this run", snapshot.beats_in_run)
        } else {
            String::new()
        }
    ))
}

/// Handle `cues [on|off]`: toggle printing of beat cues
pub fn cmd_cues(args: &str, ctx: &mut CommandContext) -> CommandResult {
    ctx.show_cues = match args {
        "" => !ctx.show_cues,
        "on" => true,
        "off" => false,
        _ => return CommandResult::Error("Usage: cues [on|off]".to_string()),
    };
    CommandResult::Message(format!(
        "Beat cues {}",
        if ctx.show_cues { "on" } else { "off" }
    ))
}

fn help_text() -> String {
    let lines = [
        format!("{}", "🎵 Tactus Help".bold()),
        format!("{}", "==============".bold()),
        String::new(),
        format!("{}", "Meter:".green()),
        format!("  {}      - Beats per measure, up to the denominator", "num <n>".cyan()),
        format!("  {}   - Denominator step: 1=4, 2=8, 3=16, 4=32", "den <step>".cyan()),
        format!("  {}    - Set both parts, e.g. meter 7/8", "meter <sig>".cyan()),
        String::new(),
        format!("{}", "Playback:".green()),
        format!("  {}    - Tempo in BPM (1-400)", "tempo <bpm>".cyan()),
        format!("  {}  - Toggle play/pause", "play | pause | p".cyan()),
        format!("  {}  - Show or hide beat cues", "cues [on|off]".cyan()),
        String::new(),
        format!("{}", "Other:".green()),
        format!("  {}           - Current settings", "status".cyan()),
        format!("  {}      - Leave", "quit | exit".cyan()),
    ];
    lines.join("\n")
}
