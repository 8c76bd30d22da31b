//! Command-line options
//!
//! Usage:
//!   tactus [--meter 6/8] [--tempo 90] [--autoplay] [--bell]

use anyhow::{bail, Context, Result};
use tactus_core::{EngineConfig, Meter};

/// Tempo range accepted from the command line and the `tempo` command
pub const MIN_TEMPO: f64 = 1.0;
pub const MAX_TEMPO: f64 = 400.0;

pub const USAGE: &str = "Usage: tactus [--meter <num>/<4|8|16|32>] [--tempo <bpm>] [--autoplay] [--bell]";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Options {
    pub engine: EngineConfig,
    /// Ring the terminal bell on the first beat of each measure
    pub bell: bool,
    pub show_help: bool,
}

impl Options {
    /// Parse options from process arguments, program name excluded
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = Options::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--meter" | "-m" => {
                    let signature = args.next().context("--meter needs a value such as 4/4")?;
                    Meter::parse(&signature).with_context(|| format!("bad --meter value '{}'", signature))?;
                    options.engine.initial_meter = signature;
                }
                "--tempo" | "-t" => {
                    let value = args.next().context("--tempo needs a value in BPM")?;
                    options.engine.initial_tempo = parse_tempo(&value)?;
                }
                "--autoplay" | "-a" => options.engine.autoplay = true,
                "--bell" => options.bell = true,
                "--help" | "-h" => options.show_help = true,
                other => bail!("unknown argument '{}'\n{}", other, USAGE),
            }
        }

        Ok(options)
    }
}

/// Parse a tempo in BPM, accepting only the playable range
pub fn parse_tempo(value: &str) -> Result<f64> {
    let bpm: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("tempo '{}' is not a number", value))?;
    if !(MIN_TEMPO..=MAX_TEMPO).contains(&bpm) {
        bail!("tempo must be between {} and {} BPM", MIN_TEMPO, MAX_TEMPO);
    }
    Ok(bpm)
}
