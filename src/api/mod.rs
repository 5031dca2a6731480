//! HTTP surface of the service.
//!
//! Everything under `/api/v1` sits behind the authentication guard, which
//! consults the configured exemptions per request. `/health` and
//! `/openapi.json` are served outside of it.

use anyhow::Result;
use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;

pub mod handlers;
mod openapi;
mod state;

pub use self::openapi::openapi;
pub use self::state::{AuthConfig, AuthState, DEFAULT_EXEMPT_PATHS};

use self::handlers::{guard, health, sessions, status, users};

const REQUEST_ID: &str = "x-request-id";

/// Build the application router around `state`.
#[must_use]
pub fn router(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/v1/status", get(status::status))
        .route("/api/v1/status/", get(status::status))
        .route("/api/v1/users", post(users::register))
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/users/me/password", put(users::change_password))
        .route(
            "/api/v1/sessions",
            post(sessions::login).delete(sessions::logout),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_auth,
        ))
        .route("/health", get(health::health))
        .route("/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

async fn openapi_json() -> impl IntoResponse {
    Json(openapi())
}

/// Serve the router on `[::]:port` until Ctrl-C or SIGTERM.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails
pub async fn new(port: u16, state: Arc<AuthState>) -> Result<()> {
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl-C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let path = request.uri().path();
    let request_id = request
        .headers()
        .get(REQUEST_ID)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    info_span!("http.request", method = %request.method(), path, request_id)
}
