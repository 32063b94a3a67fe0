#![allow(clippy::needless_for_each)]

use crate::passgate::handlers::{
    health, login, login_page, register, register_page, root, AuthRequest, AuthResponse,
    SharedStore,
};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::{Extension, MatchedPath},
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Json, Router,
};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
};
use tokio::{net::TcpListener, signal};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    services::ServeDir,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa::OpenApi;

pub mod handlers;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::register::register,
        handlers::login::login
    ),
    components(schemas(handlers::health::Health, AuthRequest, AuthResponse)),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Routes only, no middleware.
///
/// Anything not matched by a route is served from `static_dir`.
pub fn router(store: SharedStore, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/api/register", post(register))
        .route("/api/login", post(login))
        .route("/health", get(health).options(health))
        .route("/openapi.json", get(|| async { Json(openapi()) }))
        .fallback_service(ServeDir::new(static_dir))
        .layer(Extension(store))
}

/// Routes wrapped with request-id, tracing and CORS layers.
pub fn app(store: SharedStore, static_dir: &Path, allowed_origin: Option<HeaderValue>) -> Router {
    router(store, static_dir).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static(REQUEST_ID_HEADER),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                REQUEST_ID_HEADER,
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors_layer(allowed_origin)),
    )
}

/// Any origin unless one is pinned.
#[must_use]
pub fn cors_layer(allowed_origin: Option<HeaderValue>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST]);

    match allowed_origin {
        Some(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
        None => cors.allow_origin(Any),
    }
}

/// Reduce a URL to the `scheme://host[:port]` form browsers send in `Origin`.
///
/// # Errors
/// Returns an error if the URL cannot be parsed or has no host.
pub fn origin_header(url: &str) -> Result<HeaderValue> {
    let parsed = Url::parse(url).with_context(|| format!("Invalid allowed origin: {url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Allowed origin must include a valid host: {url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build allowed origin header")
}

/// Start the server
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(
    addr: SocketAddr,
    static_dir: PathBuf,
    allowed_origin: Option<HeaderValue>,
    store: SharedStore,
) -> Result<()> {
    let app = app(store, &static_dir, allowed_origin);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gracefully shutdown");

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Ctrl+C received, starting graceful shutdown"),
        () = terminate => info!("SIGTERM received, starting graceful shutdown"),
    }
}
