//! # Passgate (credential registration and login)
//!
//! `passgate` registers username/password identities and authenticates them.
//!
//! ## Credential Store
//!
//! Identities live in process memory for the lifetime of the service; nothing
//! is persisted. Each username maps to exactly one record holding an
//! **Argon2id** hash in PHC string form, with a fresh random salt per
//! registration. Plaintext passwords are never stored or logged.
//!
//! - **Uniqueness:** a username can be registered once; later attempts fail
//!   without touching the existing record, even under concurrent requests.
//! - **Case:** usernames are case-sensitive and trimmed once at the HTTP
//!   boundary; the store itself never re-trims.
//! - **Enumeration:** a login with an unknown username gets the same response
//!   as a wrong password, and still pays for one Argon2 verification.
//!
//! ## HTTP API
//!
//! `POST /api/register` and `POST /api/login` take
//! `{"username": "...", "password": "..."}` and answer with
//! `{"success": bool, "message": "...", "username": "..."}`. Registration
//! requires a password of at least 6 characters.

pub mod cli;
pub mod passgate;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
