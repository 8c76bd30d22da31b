//! Command registry for REPL commands
//!
//! Each command maps onto one engine input (or a query of its state), the
//! way stepper, slider and button events would in a graphical front end.

pub mod general;
pub mod transport;

use std::sync::Arc;
use tactus_core::BeatEngine;

/// Result of executing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// Input matched no command
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub engine: Arc<BeatEngine>,
    /// Whether beat cues are printed
    pub show_cues: bool,
}

impl CommandContext {
    pub fn new(engine: Arc<BeatEngine>) -> Self {
        Self {
            engine,
            show_cues: true,
        }
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Register a command with its prefix
    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        let input = input.trim();
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Engine inputs
    registry.register("numerator", transport::cmd_numerator);
    registry.register("num", transport::cmd_numerator);
    registry.register("denominator", transport::cmd_denominator);
    registry.register("den", transport::cmd_denominator);
    registry.register("meter", transport::cmd_meter);
    registry.register("tempo", transport::cmd_tempo);
    registry.register("play", transport::cmd_play_pause);
    registry.register("pause", transport::cmd_play_pause);
    registry.register("p", transport::cmd_play_pause);

    // General commands
    registry.register("status", general::cmd_status);
    registry.register("cues", general::cmd_cues);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}
