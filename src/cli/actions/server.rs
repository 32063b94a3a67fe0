use crate::{
    cli::commands::hashing,
    passgate::{self, handlers::SharedStore},
    store::{CredentialHasher, MemoryCredentialStore},
};
use anyhow::{Context, Result};
use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub listen: IpAddr,
    pub static_dir: PathBuf,
    pub allowed_origin: Option<String>,
    pub argon2: hashing::Options,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the Argon2 parameters or the allowed origin are invalid, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let hasher = CredentialHasher::new(
        args.argon2.memory_kib,
        args.argon2.iterations,
        args.argon2.parallelism,
    )
    .context("Invalid Argon2 parameters")?;

    let store: SharedStore = Arc::new(
        MemoryCredentialStore::new(hasher).context("Failed to prepare credential store")?,
    );

    let allowed_origin = args
        .allowed_origin
        .as_deref()
        .map(passgate::origin_header)
        .transpose()?;

    if !args.static_dir.is_dir() {
        warn!(
            "Static directory {} not found, login and register pages will 404",
            args.static_dir.display()
        );
    }

    passgate::new(
        SocketAddr::new(args.listen, args.port),
        args.static_dir,
        allowed_origin,
        store,
    )
    .await
}

fn log_startup_args(args: &Args) {
    debug!(
        port = args.port,
        listen = %args.listen,
        static_dir = %args.static_dir.display(),
        allowed_origin = args.allowed_origin.as_deref().unwrap_or("*"),
        argon2_memory_kib = args.argon2.memory_kib,
        argon2_iterations = args.argon2.iterations,
        argon2_parallelism = args.argon2.parallelism,
        "Startup configuration"
    );
}
