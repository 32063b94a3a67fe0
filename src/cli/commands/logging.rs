use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

// Index is the verbosity count: `-v` is warn, `-vvvv` is trace.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// `PASSGATE_LOG_LEVEL` takes a level name (any case) or its count, 0 to 4.
fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim();

    let index = match value.parse::<usize>() {
        Ok(count) => Some(count).filter(|&count| count < LEVEL_NAMES.len()),
        Err(_) => LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value)),
    };

    index
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level '{value}', expected one of: {} (or 0-4)",
                LEVEL_NAMES.join(", ")
            )
        })
}

#[must_use]
pub fn verbosity_parser() -> ValueParser {
    ValueParser::new(parse_verbosity)
}

/// Tracing level for a verbosity count. `None` keeps the subscriber default
/// (error).
#[must_use]
pub const fn level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase verbosity, repeat for more: -v warn, -vv info, -vvv debug, -vvvv trace")
            .env("PASSGATE_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(verbosity_parser()),
    )
}
