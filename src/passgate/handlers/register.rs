use super::{
    run_blocking, validate_registration, AuthRequest, AuthResponse, Credentials, GatewayError,
    SharedStore, MSG_REGISTERED,
};
use axum::{extract::Extension, http::StatusCode, Json};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument};

#[utoipa::path(
    post,
    path= "/api/register",
    request_body = AuthRequest,
    responses (
        (status = 201, description = "Registration successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing username or password, or password too short", body = AuthResponse),
        (status = 409, description = "Username already exists", body = AuthResponse),
        (status = 500, description = "Password hashing failed", body = AuthResponse),
    ),
    tag= "auth"
)]
// axum handler for registration
#[instrument(skip(store, payload))]
pub async fn register(
    store: Extension<SharedStore>,
    payload: Option<Json<AuthRequest>>,
) -> Result<(StatusCode, Json<AuthResponse>), GatewayError> {
    let request = payload.map(|Json(payload)| payload).unwrap_or_default();

    debug!("request: {:?}", request);

    let Credentials { username, password } = validate_registration(request).map_err(|e| {
        debug!("Registration rejected: {}", e);
        e
    })?;

    let store = store.0.clone();
    let candidate = username.clone();
    let registered =
        run_blocking(move || store.register(&candidate, password.expose_secret())).await?;

    if registered {
        info!("User registered: {}", username);

        Ok((
            StatusCode::CREATED,
            Json(AuthResponse::success(MSG_REGISTERED, username)),
        ))
    } else {
        debug!("Username already exists: {}", username);

        Err(GatewayError::DuplicateUsername)
    }
}
