//! Maps validated CLI arguments to the action the binary executes.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{
    hashing, ARG_ALLOWED_ORIGIN, ARG_LISTEN, ARG_PORT, ARG_STATIC_DIR,
};
use anyhow::{Context, Result};
use std::{net::IpAddr, path::PathBuf};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let listen = matches
        .get_one::<IpAddr>(ARG_LISTEN)
        .copied()
        .context("missing required argument: --listen")?;
    let static_dir = matches
        .get_one::<PathBuf>(ARG_STATIC_DIR)
        .cloned()
        .context("missing required argument: --static-dir")?;
    let allowed_origin = matches.get_one::<String>(ARG_ALLOWED_ORIGIN).cloned();

    Ok(Action::Server(Args {
        port,
        listen,
        static_dir,
        allowed_origin,
        argon2: hashing::Options::parse(matches)?,
    }))
}
