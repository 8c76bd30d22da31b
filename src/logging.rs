//! Log output setup
//!
//! Logs go to stderr through `env_logger`. The default level is `warn` so
//! engine chatter does not interleave with the REPL; set `RUST_LOG=debug` to
//! follow timer restarts and ticks.

use env_logger::Env;

const DEFAULT_LOG_FILTER: &str = "warn";

pub fn setup() {
    let env = Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    // A second call (e.g. from tests) keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_target(false)
        .try_init();
}
