use thiserror::Error;

/// Failures of the hashing primitive itself.
///
/// A well-formed register or authenticate call never produces one of these
/// for an ordinary outcome such as a duplicate username or a wrong password;
/// those are reported as `Ok(false)`.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("invalid hashing parameters: {0}")]
    Params(String),
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored credential hash is malformed")]
    MalformedHash,
}
