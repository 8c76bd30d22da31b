use std::env;
use std::process::ExitCode;

use colored::*;
use tactus::config::{Options, USAGE};
use tactus::{logging, repl};

fn main() -> ExitCode {
    logging::setup();

    let options = match Options::from_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    if options.show_help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    match repl::start(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("{} {:#}", "Error:".bright_red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
