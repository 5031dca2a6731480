//! Per-request authentication guard.
//!
//! Exempt paths pass straight through. For every other path the configured
//! authenticator must resolve the request to a user, which is then attached to
//! the request as [`CurrentUser`]. A request that carries neither an
//! `Authorization` header nor the session cookie gets 401; one whose
//! credentials do not resolve gets 403.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::types::CurrentUser;
use crate::{api::AuthState, auth::Authenticator};

pub async fn require_auth(
    State(state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let authenticator = state.authenticator();
    if !authenticator.requires_auth(Some(request.uri().path())) {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();

    let has_credentials = authenticator.authorization_header(&parts.headers).is_some()
        || authenticator.session_cookie(&parts.headers).is_some();
    if !has_credentials {
        debug!(path = parts.uri.path(), "No credentials supplied");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(user) = authenticator.current_identity(&parts.headers).await else {
        debug!(path = parts.uri.path(), "Credentials not accepted");
        return StatusCode::FORBIDDEN.into_response();
    };

    parts.extensions.insert(CurrentUser(user));
    next.run(Request::from_parts(parts, body)).await
}
