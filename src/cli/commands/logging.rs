//! `-v`/`--verbose` and `TESSERA_LOG_LEVEL`.

use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `TESSERA_LOG_LEVEL`, indexed by verbosity count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Highest count accepted as a number.
const MAX_VERBOSITY: u8 = 5;

/// Accepts a count (`0..=5`) or a level name.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        if let Ok(count) = level.parse::<u8>() {
            return if count <= MAX_VERBOSITY {
                Ok(count)
            } else {
                Err(format!("log level must be at most {MAX_VERBOSITY}"))
            };
        }

        let level = level.to_lowercase();
        LEVEL_NAMES
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| "invalid log level".to_string())
    })
}

/// Tracing level for a verbosity count; `None` leaves the default (ERROR).
#[must_use]
pub const fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

/// Tracing level selected on the command line or through the environment.
#[must_use]
pub fn verbosity_level(matches: &ArgMatches) -> Option<Level> {
    level_for(
        matches
            .get_one::<u8>(ARG_VERBOSITY)
            .copied()
            .unwrap_or(0),
    )
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("TESSERA_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
