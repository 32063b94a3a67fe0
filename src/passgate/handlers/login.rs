use super::{
    run_blocking, validate_login, AuthRequest, AuthResponse, Credentials, GatewayError,
    SharedStore, MSG_LOGGED_IN,
};
use axum::{extract::Extension, http::StatusCode, Json};
use secrecy::ExposeSecret;
use tracing::{debug, info, instrument};

#[utoipa::path(
    post,
    path= "/api/login",
    request_body = AuthRequest,
    responses (
        (status = 200, description = "Login successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Missing username or password", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = AuthResponse),
        (status = 500, description = "Password verification failed", body = AuthResponse),
    ),
    tag= "auth"
)]
// axum handler for login
#[instrument(skip(store, payload))]
pub async fn login(
    store: Extension<SharedStore>,
    payload: Option<Json<AuthRequest>>,
) -> Result<(StatusCode, Json<AuthResponse>), GatewayError> {
    let request = payload.map(|Json(payload)| payload).unwrap_or_default();

    debug!("request: {:?}", request);

    let Credentials { username, password } = validate_login(request).map_err(|e| {
        debug!("Login rejected: {}", e);
        e
    })?;

    let store = store.0.clone();
    let candidate = username.clone();
    let authenticated =
        run_blocking(move || store.authenticate(&candidate, password.expose_secret())).await?;

    if authenticated {
        info!("Login successful: {}", username);

        Ok((
            StatusCode::OK,
            Json(AuthResponse::success(MSG_LOGGED_IN, username)),
        ))
    } else {
        // same answer for unknown user and wrong password
        debug!("Unauthorized");

        Err(GatewayError::InvalidCredentials)
    }
}
