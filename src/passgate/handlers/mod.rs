pub mod health;
pub use self::health::health;

pub mod login;
pub use self::login::login;

pub mod pages;
pub use self::pages::{login_page, register_page, root};

pub mod register;
pub use self::register::register;

// common types and functions for the handlers
use crate::store::{CredentialError, CredentialStore};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub const MSG_REGISTERED: &str = "user registered successfully";
pub const MSG_LOGGED_IN: &str = "login successful";

pub type SharedStore = Arc<dyn CredentialStore>;

#[derive(ToSchema, Serialize, Deserialize, Default)]
pub struct AuthRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl AuthResponse {
    #[must_use]
    pub fn success(message: &str, username: String) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            username: Some(username),
        }
    }

    #[must_use]
    pub fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            username: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => f.write_str("username"),
            Self::Password => f.write_str("password"),
        }
    }
}

/// Everything a register or login request can fail with.
///
/// The `Display` output is the exact message returned to the client.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{0} is required")]
    MissingField(Field),
    #[error("password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    FieldTooShort,
    #[error("username already exists")]
    DuplicateUsername,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("internal server error")]
    Internal,
}

impl GatewayError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField(_) | Self::FieldTooShort => StatusCode::BAD_REQUEST,
            Self::DuplicateUsername => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(AuthResponse::failure(self.to_string()))).into_response()
    }
}

/// A request that passed the presence checks, username trimmed.
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// Presence checks shared by login and registration.
///
/// # Errors
/// Returns [`GatewayError::MissingField`] for a missing or blank field.
pub fn validate_login(request: AuthRequest) -> Result<Credentials, GatewayError> {
    let username = request
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
        .ok_or(GatewayError::MissingField(Field::Username))?
        .to_string();

    let password = request
        .password
        .filter(|password| !password.trim().is_empty())
        .ok_or(GatewayError::MissingField(Field::Password))?;

    Ok(Credentials {
        username,
        password: SecretString::from(password),
    })
}

/// Login checks plus the minimum password length.
///
/// # Errors
/// Returns [`GatewayError::MissingField`] or [`GatewayError::FieldTooShort`].
pub fn validate_registration(request: AuthRequest) -> Result<Credentials, GatewayError> {
    let too_short = request
        .password
        .as_deref()
        .is_some_and(|password| password.chars().count() < MIN_PASSWORD_LENGTH);

    let credentials = validate_login(request)?;

    if too_short {
        return Err(GatewayError::FieldTooShort);
    }

    Ok(credentials)
}

/// Run a store call on the blocking pool.
///
/// Store errors and panics both surface as [`GatewayError::Internal`]; the
/// detail is logged, never returned.
pub(crate) async fn run_blocking<F>(call: F) -> Result<bool, GatewayError>
where
    F: FnOnce() -> Result<bool, CredentialError> + Send + 'static,
{
    match tokio::task::spawn_blocking(call).await {
        Ok(Ok(outcome)) => Ok(outcome),
        Ok(Err(e)) => {
            error!("Credential store failure: {}", e);
            Err(GatewayError::Internal)
        }
        Err(e) => {
            error!("Credential task failed: {}", e);
            Err(GatewayError::Internal)
        }
    }
}
