//! Interactive metronome REPL
//!
//! A reader thread feeds lines from rustyline into a channel; the main loop
//! selects over input and the engine's outputs, printing beat cues and the
//! status line as they change.

use crate::clock::ClockScheduler;
use crate::commands::{create_registry, CommandContext, CommandResult};
use crate::config::Options;
use crate::cue::{CueRenderer, StatusLine};
use anyhow::{Context, Result};
use colored::*;
use crossbeam_channel::{unbounded, Receiver, Sender};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::sync::Arc;
use std::thread;
use tactus_core::BeatEngine;

pub mod status;

use status::{BeatFeed, StatusFeed};

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive REPL driving a [`BeatEngine`]
pub struct Repl {
    editor: Option<DefaultEditor>,
    engine: Arc<BeatEngine>,
    options: Options,

    // Event channels
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
}

impl Repl {
    /// Create a REPL with an engine running on the real-time clock
    pub fn new(options: Options) -> Result<Self> {
        let editor = DefaultEditor::new().context("failed to initialize line editor")?;
        let scheduler = Arc::new(ClockScheduler::new().context("failed to start clock thread")?);
        let engine = BeatEngine::new(options.engine.clone(), scheduler)
            .context("invalid initial settings")?;

        let (tx_input, rx_input) = unbounded();

        Ok(Repl {
            editor: Some(editor),
            engine: Arc::new(engine),
            options,
            tx_input,
            rx_input,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎵".bright_yellow(),
            "Tactus Metronome".bright_cyan().bold()
        );
        println!(
            "Try: {}, {}, {}",
            "meter 6/8".cyan(),
            "tempo 90".cyan(),
            "p".cyan()
        );
        println!(
            "Type '{}' for more information, '{}' or {} to exit.\n",
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );

        // Move editor to thread
        let mut editor = self.editor.take().context("REPL is already running")?;
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "tactus>".bright_magenta().bold());
            match editor.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        let registry = create_registry();
        let mut ctx = CommandContext::new(self.engine.clone());

        let status_feed = StatusFeed::subscribe(&self.engine);
        let beat_feed = BeatFeed::subscribe(&self.engine);
        let mut status = StatusLine::default();
        let mut cues = CueRenderer::new(self.options.bell);

        status_feed.drain(&mut status);
        println!("{}", status.render());

        loop {
            let shown = status.clone();

            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if line.is_empty() {
                            continue;
                        }
                        match registry.execute(&line, &mut ctx) {
                            CommandResult::Success => {}
                            CommandResult::Message(msg) => println!("{}", msg),
                            CommandResult::Exit => {
                                println!("{} 🎵", "Goodbye!".bright_cyan());
                                break;
                            }
                            CommandResult::NotACommand => println!(
                                "{} unknown command '{}', try '{}'",
                                "Error:".bright_red().bold(),
                                line,
                                "help".bright_green()
                            ),
                            CommandResult::Error(e) => {
                                println!("{} {}", "Error:".bright_red().bold(), e.red());
                            }
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted)))
                    | Ok(ReplEvent::Input(Err(ReadlineError::Eof))) => {
                        println!("{} 🎵", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break, // Channel closed
                },

                recv(beat_feed.beats) -> msg => match msg {
                    Ok(beat) => {
                        let Some(face) = beat_feed.face_of_last_beat() else {
                            break;
                        };
                        if ctx.show_cues {
                            println!("{}", cues.render(beat, face));
                        }
                    }
                    Err(_) => break,
                },

                recv(status_feed.signature) -> msg => match msg {
                    Ok(signature) => status.signature = signature,
                    Err(_) => break,
                },
                recv(status_feed.tempo) -> msg => match msg {
                    Ok(tempo) => status.tempo = tempo,
                    Err(_) => break,
                },
                recv(status_feed.max_numerator) -> msg => match msg {
                    Ok(max) => status.max_numerator = max,
                    Err(_) => break,
                },
                recv(status_feed.playing) -> msg => match msg {
                    Ok(playing) => status.playing = playing,
                    Err(_) => break,
                },
            }

            // One line per settled change, e.g. a meter change touches
            // both the signature and the numerator ceiling
            status_feed.drain(&mut status);
            if (StatusLine { face: shown.face, ..status.clone() }) != shown {
                if !status.playing {
                    cues.reset();
                }
                println!("{}", status.render());
            }
        }

        self.engine.shutdown();
        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start(options: Options) -> Result<()> {
    let mut repl = Repl::new(options).context("failed to initialize REPL")?;
    repl.run()
}
